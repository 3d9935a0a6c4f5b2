//! Optional TOML configuration layered beneath the command-line flags.

use std::{fs, path::Path};

use anyhow::{Context, Result};
use serde::Deserialize;
use tracing::info;
use wavefront_core::Connectivity;
use wavefront_grid_source::{fixtures::DEFAULT_SCATTER_SEED, DEFAULT_VARIABLE};
use wavefront_rendering::playback::{DEFAULT_FLOOD_RATE, DEFAULT_PATH_RATE};

/// File picked up from the working directory when `--config` is absent.
pub(crate) const DEFAULT_CONFIG_FILE: &str = "wavefront.toml";

/// Settings read from `wavefront.toml`. Every field has a default.
#[derive(Clone, Debug, Default, Deserialize, PartialEq)]
pub(crate) struct WavefrontConfig {
    #[serde(default)]
    pub(crate) planner: PlannerConfig,
    #[serde(default)]
    pub(crate) map: MapConfig,
    #[serde(default)]
    pub(crate) display: DisplayConfig,
}

/// Planner behaviour.
#[derive(Clone, Debug, Deserialize, PartialEq)]
pub(crate) struct PlannerConfig {
    /// Neighborhood used for expansion and backtracking (default: eight)
    #[serde(default)]
    pub(crate) connectivity: Connectivity,

    /// Move a start that lands on a wall to an adjacent walkable cell (default: true)
    #[serde(default = "default_resolve_blocked_start")]
    pub(crate) resolve_blocked_start: bool,
}

/// Map selection and generation.
#[derive(Clone, Debug, Deserialize, PartialEq)]
pub(crate) struct MapConfig {
    /// Variable holding the matrix inside map documents (default: "map")
    #[serde(default = "default_variable")]
    pub(crate) variable: String,

    /// Rows of the generated scattered map (default: 120)
    #[serde(default = "default_scatter_rows")]
    pub(crate) scatter_rows: u32,

    /// Columns of the generated scattered map (default: 160)
    #[serde(default = "default_scatter_columns")]
    pub(crate) scatter_columns: u32,

    /// Probability that an interior cell is a wall (default: 0.2)
    #[serde(default = "default_wall_density")]
    pub(crate) wall_density: f64,

    /// Seed for the scattered map generator
    #[serde(default = "default_seed")]
    pub(crate) seed: u64,
}

/// Window and animation settings.
#[derive(Clone, Debug, Deserialize, PartialEq)]
pub(crate) struct DisplayConfig {
    #[serde(default = "default_window_title")]
    pub(crate) window_title: String,

    /// Synchronise frames with the display refresh rate (default: true)
    #[serde(default = "default_vsync")]
    pub(crate) vsync: bool,

    /// Flood cells revealed per second
    #[serde(default = "default_flood_rate")]
    pub(crate) flood_rate: f32,

    /// Trajectory steps revealed per second
    #[serde(default = "default_path_rate")]
    pub(crate) path_rate: f32,
}

impl Default for PlannerConfig {
    fn default() -> Self {
        Self {
            connectivity: Connectivity::default(),
            resolve_blocked_start: default_resolve_blocked_start(),
        }
    }
}

impl Default for MapConfig {
    fn default() -> Self {
        Self {
            variable: default_variable(),
            scatter_rows: default_scatter_rows(),
            scatter_columns: default_scatter_columns(),
            wall_density: default_wall_density(),
            seed: default_seed(),
        }
    }
}

impl Default for DisplayConfig {
    fn default() -> Self {
        Self {
            window_title: default_window_title(),
            vsync: default_vsync(),
            flood_rate: default_flood_rate(),
            path_rate: default_path_rate(),
        }
    }
}

impl WavefrontConfig {
    /// Loads the configuration from a TOML file.
    pub(crate) fn load(path: &Path) -> Result<Self> {
        let contents = fs::read_to_string(path)
            .with_context(|| format!("failed to read config file {}", path.display()))?;
        Self::parse(&contents)
            .with_context(|| format!("failed to parse config file {}", path.display()))
    }

    /// Parses configuration from TOML text.
    pub(crate) fn parse(contents: &str) -> Result<Self> {
        Ok(toml::from_str(contents)?)
    }

    /// Loads `explicit` when given, otherwise `wavefront.toml` if it exists, otherwise defaults.
    pub(crate) fn discover(explicit: Option<&Path>) -> Result<Self> {
        if let Some(path) = explicit {
            info!("Loading configuration from {}", path.display());
            return Self::load(path);
        }

        let fallback = Path::new(DEFAULT_CONFIG_FILE);
        if fallback.exists() {
            info!("Loading configuration from {DEFAULT_CONFIG_FILE}");
            Self::load(fallback)
        } else {
            info!("Using default configuration");
            Ok(Self::default())
        }
    }
}

fn default_resolve_blocked_start() -> bool {
    true
}
fn default_variable() -> String {
    DEFAULT_VARIABLE.to_string()
}
fn default_scatter_rows() -> u32 {
    120
}
fn default_scatter_columns() -> u32 {
    160
}
fn default_wall_density() -> f64 {
    0.2
}
fn default_seed() -> u64 {
    DEFAULT_SCATTER_SEED
}
fn default_window_title() -> String {
    "Wavefront Planner".to_string()
}
fn default_vsync() -> bool {
    true
}
fn default_flood_rate() -> f32 {
    DEFAULT_FLOOD_RATE
}
fn default_path_rate() -> f32 {
    DEFAULT_PATH_RATE
}
