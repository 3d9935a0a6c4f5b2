#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Wavefront planner that labels a grid from its goal and descends from a start.
//!
//! Planning runs in two passes over a private copy of the caller's grid. The
//! expansion pass floods outward from the goal breadth-first, overwriting
//! every reachable free cell with its wave value. The descent pass then walks
//! from the start cell onto ever lower labels until it reaches the goal. The
//! caller's grid is borrowed immutably and never modified.

mod backtrack;
mod expansion;
mod start;

use std::fmt;

use serde::Serialize;
use thiserror::Error;
use tracing::{debug, warn};
use wavefront_core::{
    CellCoord, CellLabel, Connectivity, ExpandedCell, Grid, GridPosition, Trajectory,
};

pub use self::start::{resolve_start, StartError};

/// Errors that abort a planning call.
#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum PlanError {
    /// The grid holds no cell labeled as goal.
    #[error("goal position not found in the map")]
    GoalNotFound,
    /// The start position lies outside the grid.
    #[error("start {start} lies outside the {rows}x{columns} grid")]
    StartOutOfBounds {
        /// Requested one-based start.
        start: GridPosition,
        /// Number of rows in the grid.
        rows: u32,
        /// Number of columns in the grid.
        columns: u32,
    },
}

/// Wavefront planner configured with a neighborhood model.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct WavefrontPlanner {
    connectivity: Connectivity,
}

impl WavefrontPlanner {
    /// Creates a planner that expands and descends with the provided connectivity.
    #[must_use]
    pub const fn new(connectivity: Connectivity) -> Self {
        Self { connectivity }
    }

    /// Connectivity used by both planning passes.
    #[must_use]
    pub const fn connectivity(&self) -> Connectivity {
        self.connectivity
    }

    /// Labels `grid` from its goal and traces a trajectory from the one-based `start`.
    ///
    /// When several cells carry the goal label, the first one in row-major
    /// order seeds the expansion. A start that cannot reach the goal yields a
    /// trajectory that stops early; see [`Trajectory::reaches_goal`].
    pub fn plan(&self, grid: &Grid, start: GridPosition) -> Result<Plan, PlanError> {
        let start_cell = start
            .to_cell()
            .filter(|&cell| grid.contains(cell))
            .ok_or(PlanError::StartOutOfBounds {
                start,
                rows: grid.rows(),
                columns: grid.columns(),
            })?;
        let goal = grid.find_goal().ok_or(PlanError::GoalNotFound)?;

        let wavefront = expansion::expand(grid, goal, self.connectivity);
        debug!(
            rows = grid.rows(),
            columns = grid.columns(),
            reached = wavefront.order.len(),
            connectivity = %self.connectivity,
            "wavefront expansion finished"
        );

        let trajectory = backtrack::descend(&wavefront.labels, start_cell, self.connectivity);
        if trajectory.reaches_goal() {
            debug!(%start, steps = trajectory.len(), "trajectory reached the goal");
        } else {
            warn!(
                %start,
                steps = trajectory.len(),
                "start cannot reach the goal; trajectory stops early"
            );
        }

        Ok(Plan {
            labeled: wavefront.labels,
            trajectory,
            goal,
            expansion_order: wavefront.order,
            connectivity: self.connectivity,
        })
    }
}

/// Plans with the default 8-point planner.
pub fn plan(grid: &Grid, start: GridPosition) -> Result<Plan, PlanError> {
    WavefrontPlanner::default().plan(grid, start)
}

/// Result of a single planning call.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Plan {
    labeled: Grid,
    trajectory: Trajectory,
    goal: CellCoord,
    expansion_order: Vec<ExpandedCell>,
    connectivity: Connectivity,
}

impl Plan {
    /// Grid whose reachable free cells carry their wave values.
    #[must_use]
    pub fn labeled_grid(&self) -> &Grid {
        &self.labeled
    }

    /// Walk from the start toward the goal.
    #[must_use]
    pub fn trajectory(&self) -> &Trajectory {
        &self.trajectory
    }

    /// One-based position of the goal that seeded the expansion.
    #[must_use]
    pub fn goal(&self) -> GridPosition {
        GridPosition::from_cell(self.goal)
    }

    /// Cells in the order the expansion dequeued them, goal first.
    #[must_use]
    pub fn expansion_order(&self) -> &[ExpandedCell] {
        &self.expansion_order
    }

    /// Connectivity the plan was produced with.
    #[must_use]
    pub const fn connectivity(&self) -> Connectivity {
        self.connectivity
    }

    /// Aggregated figures describing the plan.
    #[must_use]
    pub fn summary(&self) -> PlanSummary {
        let max_wave = self
            .expansion_order
            .last()
            .and_then(|cell| CellLabel::from_value(cell.wave).wave_distance())
            .unwrap_or(0);

        PlanSummary {
            rows: self.labeled.rows(),
            columns: self.labeled.columns(),
            reached_cells: self.expansion_order.len(),
            trajectory_len: self.trajectory.len(),
            reaches_goal: self.trajectory.reaches_goal(),
            max_wave,
        }
    }

    /// Splits the plan into its labeled grid and trajectory.
    #[must_use]
    pub fn into_parts(self) -> (Grid, Trajectory) {
        (self.labeled, self.trajectory)
    }
}

/// Aggregated figures describing a plan.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
pub struct PlanSummary {
    /// Number of rows in the planned grid.
    pub rows: u32,
    /// Number of columns in the planned grid.
    pub columns: u32,
    /// Cells reached by the expansion, goal included.
    pub reached_cells: usize,
    /// Cells in the trajectory, start and goal included.
    pub trajectory_len: usize,
    /// Whether the trajectory terminates on the goal.
    pub reaches_goal: bool,
    /// Largest wave distance assigned by the expansion.
    pub max_wave: u32,
}

impl fmt::Display for PlanSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}x{} grid, {} cells reached, max wave {}, trajectory of {} cells ({})",
            self.rows,
            self.columns,
            self.reached_cells,
            self.max_wave,
            self.trajectory_len,
            if self.reaches_goal {
                "goal reached"
            } else {
                "goal unreachable"
            }
        )
    }
}
