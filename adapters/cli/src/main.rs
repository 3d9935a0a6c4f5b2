#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Command-line adapter that runs the wavefront planner.
//!
//! Without `--headless` a window shows the map and waits for a click on the
//! start cell, then animates the flood and the trajectory. With `--headless`
//! the start comes from `--start` and the value map and trajectory are
//! printed to standard output.

mod config;
mod plan_export;

use std::path::PathBuf;

use anyhow::{anyhow, bail, Context, Result};
use clap::{Parser, ValueEnum};
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;
use wavefront_core::{CellLabel, Connectivity, Grid, GridPosition};
use wavefront_grid_source::{fixtures, load_map};
use wavefront_rendering::{text, Color, Palette, PlanOverlay, Presentation, RenderingBackend, Scene};
use wavefront_rendering_macroquad::MacroquadBackend;
use wavefront_system_planner::{resolve_start, Plan, WavefrontPlanner};

use self::config::WavefrontConfig;
use self::plan_export::{parse_position, PlanExport};

/// Which map the session plans on.
#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
enum MazeChoice {
    /// The built-in 14x20 maze.
    Mini,
    /// A seeded obstacle map sized by the configuration.
    Scattered,
    /// A JSON or TOML document given with `--map`.
    File,
}

/// Neighborhood accepted on the command line.
#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
enum ConnectivityArg {
    /// Orthogonal neighbors only.
    Four,
    /// Orthogonal and diagonal neighbors.
    Eight,
}

impl From<ConnectivityArg> for Connectivity {
    fn from(value: ConnectivityArg) -> Self {
        match value {
            ConnectivityArg::Four => Connectivity::Four,
            ConnectivityArg::Eight => Connectivity::Eight,
        }
    }
}

#[derive(Debug, Parser)]
#[command(name = "wavefront", about = "Wavefront path planning on occupancy grids")]
struct CliArgs {
    /// Map to plan on. Passing --map implies `file`.
    #[arg(long, value_enum, default_value_t = MazeChoice::Mini)]
    maze: MazeChoice,

    /// Map document (.json or .toml) holding a 2D integer array.
    #[arg(long)]
    map: Option<PathBuf>,

    /// Name of the variable holding the map inside the document.
    #[arg(long)]
    variable: Option<String>,

    /// One-based start position written as ROW,COL.
    #[arg(long, value_parser = parse_position)]
    start: Option<GridPosition>,

    /// One-based goal position written as ROW,COL; replaces the map's goal.
    #[arg(long, value_parser = parse_position)]
    goal: Option<GridPosition>,

    /// Neighborhood used by the planner.
    #[arg(long, value_enum)]
    connectivity: Option<ConnectivityArg>,

    /// Seed for the scattered map.
    #[arg(long)]
    seed: Option<u64>,

    /// Plan without opening a window; requires --start.
    #[arg(long)]
    headless: bool,

    /// Write the plan as JSON to this path.
    #[arg(long)]
    output: Option<PathBuf>,

    /// Configuration file; defaults to ./wavefront.toml when present.
    #[arg(long)]
    config: Option<PathBuf>,
}

/// Everything needed to plan once a start is known.
struct Session {
    name: Option<String>,
    grid: Grid,
    planner: WavefrontPlanner,
    resolve_blocked_start: bool,
    output: Option<PathBuf>,
}

impl Session {
    fn plan_from(&self, requested: GridPosition) -> Result<(GridPosition, Plan)> {
        let start = self.effective_start(requested)?;
        let plan = self
            .planner
            .plan(&self.grid, start)
            .with_context(|| format!("failed to plan from {start}"))?;

        let summary = plan.summary();
        info!(%start, goal = %plan.goal(), %summary, "plan ready");
        if let Some(path) = &self.output {
            PlanExport::new(self.name.as_deref(), start, &plan).write(path)?;
            info!("Plan written to {}", path.display());
        }

        Ok((start, plan))
    }

    fn effective_start(&self, requested: GridPosition) -> Result<GridPosition> {
        let on_wall = requested
            .to_cell()
            .and_then(|cell| self.grid.label(cell))
            .is_some_and(|label| label == CellLabel::Wall);
        if !(on_wall && self.resolve_blocked_start) {
            return Ok(requested);
        }

        let resolved = resolve_start(&self.grid, requested, self.planner.connectivity())?;
        if resolved != requested {
            info!(%requested, %resolved, "start was on a wall; moved to an adjacent walkable cell");
        }
        Ok(resolved)
    }

    fn title(&self) -> String {
        self.name
            .clone()
            .unwrap_or_else(|| format!("{}x{} map", self.grid.rows(), self.grid.columns()))
    }
}

/// Entry point for the wavefront command-line interface.
fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("wavefront=info")),
        )
        .init();

    let args = CliArgs::parse();
    let config = WavefrontConfig::discover(args.config.as_deref())?;
    let connectivity = args
        .connectivity
        .map_or(config.planner.connectivity, Connectivity::from);

    let (name, grid) = load_grid(&args, &config)?;
    let grid = place_goal(grid, args.goal)?;
    info!(
        rows = grid.rows(),
        columns = grid.columns(),
        %connectivity,
        "map ready"
    );

    let session = Session {
        name,
        grid,
        planner: WavefrontPlanner::new(connectivity),
        resolve_blocked_start: config.planner.resolve_blocked_start,
        output: args.output.clone(),
    };

    if args.headless {
        let requested = args
            .start
            .ok_or_else(|| anyhow!("--headless requires --start ROW,COL"))?;
        let (_, plan) = session.plan_from(requested)?;
        print!("{}", text::render_report(plan.labeled_grid(), plan.trajectory()));
        return Ok(());
    }

    if args.start.is_some() {
        warn!("--start is only used with --headless; pick the start in the window");
    }
    run_interactive(session, &config)
}

fn load_grid(args: &CliArgs, config: &WavefrontConfig) -> Result<(Option<String>, Grid)> {
    let maze = if args.map.is_some() {
        MazeChoice::File
    } else {
        args.maze
    };

    match maze {
        MazeChoice::Mini => Ok((Some("Mini Maze".to_string()), fixtures::mini_maze())),
        MazeChoice::Scattered => {
            let seed = args.seed.unwrap_or(config.map.seed);
            let grid = fixtures::scattered(
                config.map.scatter_rows,
                config.map.scatter_columns,
                config.map.wall_density,
                seed,
            )
            .context("failed to generate scattered map")?;
            Ok((Some(format!("Scattered Map (seed {seed})")), grid))
        }
        MazeChoice::File => {
            let Some(path) = args.map.as_deref() else {
                bail!("--maze file requires --map PATH");
            };
            let variable = args.variable.as_deref().unwrap_or(&config.map.variable);
            let document = load_map(path, variable)
                .with_context(|| format!("failed to load map from {}", path.display()))?;
            Ok((document.name, document.grid))
        }
    }
}

fn place_goal(mut grid: Grid, goal: Option<GridPosition>) -> Result<Grid> {
    let Some(goal) = goal else {
        return Ok(grid);
    };
    let cell = goal
        .to_cell()
        .ok_or_else(|| anyhow!("goal {goal} must use one-based row and column numbers"))?;
    grid.relocate_goal(cell)
        .with_context(|| format!("cannot place the goal at {goal}"))?;
    info!(%goal, "goal moved");
    Ok(grid)
}

fn run_interactive(session: Session, config: &WavefrontConfig) -> Result<()> {
    let title = session.title();
    let scene = Scene::new(session.grid.clone(), "Select Start Point");
    let presentation = Presentation::new(
        format!("{} - {title}", config.display.window_title),
        Color::from_rgb_u8(235, 235, 235),
        Palette::default(),
        scene,
    );
    let backend = MacroquadBackend::new()
        .with_vsync(config.display.vsync)
        .with_playback_rates(config.display.flood_rate, config.display.path_rate);

    let selected = backend.run(presentation, move |requested| {
        let (start, plan) = session.plan_from(requested)?;
        print!("{}", text::render_report(plan.labeled_grid(), plan.trajectory()));

        let summary = format!("{title}: start {start}, {}", plan.summary());
        let trajectory = plan.trajectory().clone();
        let expansion_order = plan.expansion_order().to_vec();
        Ok(PlanOverlay::new(trajectory, expansion_order, summary))
    })?;

    match selected {
        Some(start) => info!(%start, "session finished"),
        None => info!("window closed before a start was selected"),
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn session(grid: Grid, resolve_blocked_start: bool) -> Session {
        Session {
            name: None,
            grid,
            planner: WavefrontPlanner::default(),
            resolve_blocked_start,
            output: None,
        }
    }

    fn corridor() -> Grid {
        Grid::from_rows(vec![vec![1, 1, 1], vec![1, 0, 2], vec![1, 1, 1]]).expect("valid grid")
    }

    #[test]
    fn blocked_start_moves_to_adjacent_cell_when_enabled() {
        let (start, plan) = session(corridor(), true)
            .plan_from(GridPosition::new(2, 1))
            .expect("plan succeeds");

        assert_eq!(start, GridPosition::new(2, 2));
        assert_eq!(plan.trajectory().start(), Some(GridPosition::new(2, 2)));
        assert!(plan.trajectory().reaches_goal());
    }

    #[test]
    fn blocked_start_is_kept_when_resolution_disabled() {
        let (start, plan) = session(corridor(), false)
            .plan_from(GridPosition::new(2, 1))
            .expect("plan succeeds");

        assert_eq!(start, GridPosition::new(2, 1));
        assert_eq!(plan.trajectory().len(), 3);
    }

    #[test]
    fn out_of_bounds_start_is_an_error() {
        let error = session(corridor(), true)
            .plan_from(GridPosition::new(9, 9))
            .expect_err("start outside the grid");
        assert!(error.to_string().contains("(9, 9)"));
    }

    #[test]
    fn args_parse_start_and_connectivity() {
        let args = CliArgs::try_parse_from([
            "wavefront",
            "--headless",
            "--start",
            "2,1",
            "--connectivity",
            "four",
        ])
        .expect("arguments parse");

        assert!(args.headless);
        assert_eq!(args.start, Some(GridPosition::new(2, 1)));
        assert_eq!(args.connectivity, Some(ConnectivityArg::Four));
        assert_eq!(args.maze, MazeChoice::Mini);
    }

    #[test]
    fn map_path_implies_file_maze() {
        let args = CliArgs::try_parse_from(["wavefront", "--map", "does/not/exist.json"])
            .expect("arguments parse");
        let error = load_grid(&args, &WavefrontConfig::default()).expect_err("file is absent");
        assert!(error.to_string().contains("exist.json"));
    }

    #[test]
    fn goal_flag_moves_the_planning_target() {
        let args = CliArgs::try_parse_from(["wavefront", "--goal", "3,5"]).expect("arguments parse");
        let (_, grid) = load_grid(&args, &WavefrontConfig::default()).expect("mini maze loads");
        let grid = place_goal(grid, args.goal).expect("goal lands on a free cell");

        let (_, plan) = session(grid, true)
            .plan_from(GridPosition::new(13, 2))
            .expect("plan succeeds");

        assert_eq!(plan.goal(), GridPosition::new(3, 5));
        assert_eq!(plan.labeled_grid().goals().count(), 1);
        assert!(plan.trajectory().reaches_goal());
        assert_eq!(plan.trajectory().end(), Some(GridPosition::new(3, 5)));
    }

    #[test]
    fn goal_flag_on_a_wall_is_rejected() {
        let error = place_goal(fixtures::mini_maze(), Some(GridPosition::new(1, 1)))
            .expect_err("border cell is a wall");
        assert!(error.to_string().contains("(1, 1)"));
    }

    #[test]
    fn file_maze_without_path_is_rejected() {
        let args = CliArgs::try_parse_from(["wavefront", "--maze", "file"]).expect("arguments parse");
        assert!(load_grid(&args, &WavefrontConfig::default()).is_err());
    }
}
