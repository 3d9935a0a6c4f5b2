//! Resolution of start cells that land on walls.

use thiserror::Error;
use tracing::debug;
use wavefront_core::{Connectivity, Grid, GridPosition};

/// Errors raised while resolving a walkable start cell.
#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum StartError {
    /// The requested start lies outside the grid.
    #[error("start {start} lies outside the {rows}x{columns} grid")]
    OutOfBounds {
        /// Requested one-based start.
        start: GridPosition,
        /// Number of rows in the grid.
        rows: u32,
        /// Number of columns in the grid.
        columns: u32,
    },
    /// The start is a wall and none of its neighbors is walkable.
    #[error("start {start} is a wall with no walkable {connectivity} neighbor")]
    NoWalkableStart {
        /// Requested one-based start.
        start: GridPosition,
        /// Connectivity used for the neighbor scan.
        connectivity: Connectivity,
    },
}

/// Returns a walkable start near `start`.
///
/// Walkable starts are returned unchanged. A wall start is replaced by its
/// first walkable neighbor in the connectivity's scan order, the same order the
/// planner uses for expansion and descent.
pub fn resolve_start(
    grid: &Grid,
    start: GridPosition,
    connectivity: Connectivity,
) -> Result<GridPosition, StartError> {
    let out_of_bounds = || StartError::OutOfBounds {
        start,
        rows: grid.rows(),
        columns: grid.columns(),
    };
    let cell = start
        .to_cell()
        .filter(|&cell| grid.contains(cell))
        .ok_or_else(out_of_bounds)?;

    if grid.is_walkable(cell) {
        return Ok(start);
    }

    let resolved = grid
        .neighbors(cell, connectivity)
        .find(|&neighbor| grid.is_walkable(neighbor))
        .map(GridPosition::from_cell)
        .ok_or(StartError::NoWalkableStart {
            start,
            connectivity,
        })?;

    debug!(%start, %resolved, "start was a wall; moved to adjacent walkable cell");
    Ok(resolved)
}
