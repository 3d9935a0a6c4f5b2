#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Shared rendering contracts for wavefront planner adapters.

pub mod playback;
pub mod selection;
pub mod text;

use anyhow::Result as AnyResult;
use glam::Vec2;
use std::{error::Error, fmt};
use wavefront_core::{CellCoord, CellLabel, ExpandedCell, Grid, GridPosition, Trajectory};

pub use self::playback::{Playback, PlaybackPhase};
pub use self::selection::{SelectionOutcome, StartSelection};

/// Grids with more cells than this are drawn as a single raster image.
pub const RASTER_CELL_THRESHOLD: usize = 10_000;

/// RGBA color used when presenting frames.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Color {
    /// Red channel intensity in the range 0.0..=1.0.
    pub red: f32,
    /// Green channel intensity in the range 0.0..=1.0.
    pub green: f32,
    /// Blue channel intensity in the range 0.0..=1.0.
    pub blue: f32,
    /// Alpha channel intensity in the range 0.0..=1.0.
    pub alpha: f32,
}

impl Color {
    /// Creates a new color from floating point channels.
    #[must_use]
    pub const fn new(red: f32, green: f32, blue: f32, alpha: f32) -> Self {
        Self {
            red,
            green,
            blue,
            alpha,
        }
    }

    /// Creates an opaque color from byte RGB values.
    #[must_use]
    pub const fn from_rgb_u8(red: u8, green: u8, blue: u8) -> Self {
        Self {
            red: red as f32 / 255.0,
            green: green as f32 / 255.0,
            blue: blue as f32 / 255.0,
            alpha: 1.0,
        }
    }

    /// Returns a new color lightened towards white by the provided amount.
    #[must_use]
    pub fn lighten(self, amount: f32) -> Self {
        let amount = amount.clamp(0.0, 1.0);

        Self {
            red: lighten_channel(self.red, amount),
            green: lighten_channel(self.green, amount),
            blue: lighten_channel(self.blue, amount),
            alpha: self.alpha,
        }
    }

    /// Channels quantised to bytes in RGBA order.
    #[must_use]
    pub fn to_rgba_u8(self) -> [u8; 4] {
        [
            quantise_channel(self.red),
            quantise_channel(self.green),
            quantise_channel(self.blue),
            quantise_channel(self.alpha),
        ]
    }
}

fn lighten_channel(channel: f32, amount: f32) -> f32 {
    channel + (1.0 - channel) * amount
}

fn quantise_channel(channel: f32) -> u8 {
    (channel.clamp(0.0, 1.0) * 255.0).round() as u8
}

/// Colors assigned to cell labels and plan overlays.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Palette {
    /// Walkable cells.
    pub free: Color,
    /// Impassable cells.
    pub wall: Color,
    /// The goal cell and the final trajectory cell.
    pub goal: Color,
    /// Cells carrying a wave value in the base map.
    pub wave: Color,
    /// The first trajectory cell.
    pub start: Color,
    /// Intermediate trajectory cells.
    pub path: Color,
    /// Cells revealed by the flood animation.
    pub flood: Color,
    /// Lines separating cells in detailed mode.
    pub grid_line: Color,
}

impl Default for Palette {
    fn default() -> Self {
        Self {
            free: Color::from_rgb_u8(255, 255, 255),
            wall: Color::from_rgb_u8(0, 0, 0),
            goal: Color::from_rgb_u8(255, 0, 0),
            wave: Color::from_rgb_u8(0, 0, 255),
            start: Color::from_rgb_u8(0, 0, 255),
            path: Color::from_rgb_u8(0, 255, 0),
            flood: Color::from_rgb_u8(0, 240, 255),
            grid_line: Color::from_rgb_u8(200, 200, 200),
        }
    }
}

impl Palette {
    /// Base color for a cell label.
    #[must_use]
    pub const fn cell_color(&self, label: CellLabel) -> Color {
        match label {
            CellLabel::Free => self.free,
            CellLabel::Wall => self.wall,
            CellLabel::Goal => self.goal,
            CellLabel::Wave(_) => self.wave,
        }
    }

    /// Flood color shaded by how far the wave travelled, relative to `max_wave`.
    #[must_use]
    pub fn flood_color(&self, wave: u32, max_wave: u32) -> Color {
        if max_wave == 0 {
            return self.flood;
        }
        let progress = wave as f32 / max_wave as f32;
        self.flood.lighten(progress * 0.6)
    }
}

/// Strategy used to draw the grid.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum RenderMode {
    /// Every cell is drawn as its own rectangle with grid lines.
    Detailed,
    /// The grid is uploaded as one image, one pixel per cell.
    Raster,
}

impl RenderMode {
    /// Chooses the mode for a grid with the provided cell count.
    #[must_use]
    pub const fn for_cell_count(cells: usize) -> Self {
        if cells > RASTER_CELL_THRESHOLD {
            Self::Raster
        } else {
            Self::Detailed
        }
    }
}

/// Describes the geometry of a grid that can be rendered by adapters.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct GridPresentation {
    /// Number of rows contained in the grid.
    pub rows: u32,
    /// Number of columns contained in the grid.
    pub columns: u32,
    /// Side length of a single cell expressed in world units.
    pub cell_length: f32,
}

impl GridPresentation {
    /// Creates a new grid descriptor.
    ///
    /// Returns an error when `cell_length` is not a positive finite number.
    pub fn new(rows: u32, columns: u32, cell_length: f32) -> Result<Self, RenderingError> {
        if !cell_length.is_finite() || cell_length <= 0.0 {
            return Err(RenderingError::InvalidCellLength { cell_length });
        }

        Ok(Self {
            rows,
            columns,
            cell_length,
        })
    }

    /// Creates a descriptor sized to the provided grid with unit cells.
    #[must_use]
    pub fn for_grid(grid: &Grid) -> Self {
        Self {
            rows: grid.rows(),
            columns: grid.columns(),
            cell_length: 1.0,
        }
    }

    /// Total width of the grid measured in world units.
    #[must_use]
    pub fn width(&self) -> f32 {
        self.columns as f32 * self.cell_length
    }

    /// Total height of the grid measured in world units.
    #[must_use]
    pub fn height(&self) -> f32 {
        self.rows as f32 * self.cell_length
    }

    /// World-space position of the cell's upper-left corner.
    #[must_use]
    pub fn cell_origin(&self, cell: CellCoord) -> Vec2 {
        Vec2::new(
            cell.column() as f32 * self.cell_length,
            cell.row() as f32 * self.cell_length,
        )
    }

    /// Maps a world-space pointer position to the one-based cell underneath it.
    ///
    /// Returns `None` when the position lies outside the grid.
    #[must_use]
    pub fn cell_at(&self, position: Vec2) -> Option<GridPosition> {
        if self.rows == 0 || self.columns == 0 || self.cell_length <= f32::EPSILON {
            return None;
        }
        if !position.is_finite() || position.x < 0.0 || position.y < 0.0 {
            return None;
        }

        let column = (position.x / self.cell_length).floor();
        let row = (position.y / self.cell_length).floor();
        if column >= self.columns as f32 || row >= self.rows as f32 {
            return None;
        }

        Some(GridPosition::from_cell(CellCoord::new(
            row as u32,
            column as u32,
        )))
    }
}

/// Plan data layered over the base grid once planning finished.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PlanOverlay {
    /// Walk from the start toward the goal.
    pub trajectory: Trajectory,
    /// Cells in the order the wavefront reached them.
    pub expansion_order: Vec<ExpandedCell>,
    /// Human-readable summary shown in the status line.
    pub summary: String,
}

impl PlanOverlay {
    /// Creates a new overlay descriptor.
    #[must_use]
    pub fn new<T>(trajectory: Trajectory, expansion_order: Vec<ExpandedCell>, summary: T) -> Self
    where
        T: Into<String>,
    {
        Self {
            trajectory,
            expansion_order,
            summary: summary.into(),
        }
    }

    /// Largest wave value in the expansion order.
    #[must_use]
    pub fn max_wave(&self) -> u32 {
        self.expansion_order
            .iter()
            .map(|cell| cell.wave)
            .max()
            .unwrap_or(0)
    }
}

/// Scene content displayed by rendering backends.
#[derive(Clone, Debug, PartialEq)]
pub struct Scene {
    /// Base map as supplied by the grid source.
    pub grid: Grid,
    /// Geometry used to place cells in world space.
    pub presentation: GridPresentation,
    /// Drawing strategy for the base map.
    pub mode: RenderMode,
    /// Plan overlay, present once a start was chosen and planned.
    pub overlay: Option<PlanOverlay>,
    /// Text displayed above the grid.
    pub status: String,
}

impl Scene {
    /// Creates a scene for the provided base map with no overlay.
    #[must_use]
    pub fn new<T>(grid: Grid, status: T) -> Self
    where
        T: Into<String>,
    {
        let presentation = GridPresentation::for_grid(&grid);
        let mode = RenderMode::for_cell_count(grid.cell_count());
        Self {
            grid,
            presentation,
            mode,
            overlay: None,
            status: status.into(),
        }
    }
}

/// Presentation descriptor consumed by rendering backends.
#[derive(Clone, Debug, PartialEq)]
pub struct Presentation {
    /// Title used by the created window.
    pub window_title: String,
    /// Solid color used to clear each frame.
    pub clear_color: Color,
    /// Colors applied to cells and overlays.
    pub palette: Palette,
    /// Scene content that should be displayed.
    pub scene: Scene,
}

impl Presentation {
    /// Constructs a new presentation descriptor.
    #[must_use]
    pub fn new<T>(window_title: T, clear_color: Color, palette: Palette, scene: Scene) -> Self
    where
        T: Into<String>,
    {
        Self {
            window_title: window_title.into(),
            clear_color,
            palette,
            scene,
        }
    }
}

/// Rendering backend capable of presenting a planning session.
pub trait RenderingBackend {
    /// Runs an interactive session until the user quits.
    ///
    /// The backend first lets the user pick a start cell. The `plan_from`
    /// closure is invoked exactly once with that one-based start and returns
    /// the overlay to animate. Returns the chosen start, or `None` when the
    /// session was cancelled before a start was picked.
    fn run<F>(self, presentation: Presentation, plan_from: F) -> AnyResult<Option<GridPosition>>
    where
        F: FnMut(GridPosition) -> AnyResult<PlanOverlay> + 'static;
}

/// Errors that can occur when constructing rendering descriptors.
#[derive(Debug, PartialEq)]
pub enum RenderingError {
    /// Cell length must be positive and finite to give cells an area.
    InvalidCellLength {
        /// Provided length that failed validation.
        cell_length: f32,
    },
}

impl fmt::Display for RenderingError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidCellLength { cell_length } => {
                write!(
                    f,
                    "cell_length must be positive and finite (received {cell_length})"
                )
            }
        }
    }
}

impl Error for RenderingError {}
