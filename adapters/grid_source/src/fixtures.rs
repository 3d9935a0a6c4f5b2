//! Built-in maps that need no external document.

use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use wavefront_core::{CellCoord, Grid, GridError, FREE, GOAL, WALL};

/// Seed used for the scattered map when the caller does not choose one.
pub const DEFAULT_SCATTER_SEED: u64 = 0x42f0_e1eb_d4a5_3c21;

/// Hand-authored 14x20 maze with rooms, a bottleneck and a goal in the far room.
#[must_use]
pub fn mini_maze() -> Grid {
    const MINI_MAZE: [[u32; 20]; 14] = [
        [1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1],
        [1, 0, 0, 0, 0, 0, 1, 1, 0, 0, 0, 0, 0, 0, 1, 1, 0, 0, 0, 1],
        [1, 0, 0, 0, 0, 0, 1, 1, 0, 0, 0, 0, 0, 0, 1, 1, 0, 2, 0, 1],
        [1, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 1, 1, 0, 0, 0, 1],
        [1, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 1, 1, 0, 0, 0, 1],
        [1, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 1, 1, 0, 0, 0, 1],
        [1, 0, 0, 0, 1, 1, 1, 1, 1, 0, 0, 0, 0, 0, 1, 1, 0, 0, 0, 1],
        [1, 0, 0, 0, 1, 1, 1, 1, 1, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 1],
        [1, 0, 0, 0, 0, 0, 0, 1, 1, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 1],
        [1, 0, 0, 0, 0, 0, 0, 1, 1, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 1],
        [1, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 1, 0, 0, 0, 0, 1],
        [1, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 1, 1, 0, 0, 0, 0, 1],
        [1, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 1, 1, 1, 0, 0, 0, 0, 1],
        [1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1],
    ];

    Grid::from_rows(MINI_MAZE.iter().map(|row| row.to_vec()).collect())
        .expect("mini maze fixture is rectangular and non-empty")
}

/// Generates a deterministic obstacle map with a walled border and one goal.
///
/// Interior cells turn into walls with probability `wall_density` (clamped to
/// `0.0..=1.0`). The goal lands on an interior cell whenever the grid has one.
pub fn scattered(
    rows: u32,
    columns: u32,
    wall_density: f64,
    seed: u64,
) -> Result<Grid, GridError> {
    let mut grid = Grid::filled(rows, columns, FREE)?;
    let mut rng = ChaCha8Rng::seed_from_u64(seed);
    let density = if wall_density.is_nan() {
        0.0
    } else {
        wall_density.clamp(0.0, 1.0)
    };

    for row in 0..rows {
        for column in 0..columns {
            let border = row == 0 || column == 0 || row + 1 == rows || column + 1 == columns;
            if border || rng.gen_bool(density) {
                grid.set(CellCoord::new(row, column), WALL)?;
            }
        }
    }

    let goal = if rows > 2 && columns > 2 {
        CellCoord::new(rng.gen_range(1..rows - 1), rng.gen_range(1..columns - 1))
    } else {
        CellCoord::new(rng.gen_range(0..rows), rng.gen_range(0..columns))
    };
    grid.set(goal, GOAL)?;

    Ok(grid)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::validate_goal;

    #[test]
    fn mini_maze_has_expected_shape_and_goal() {
        let grid = mini_maze();
        assert_eq!((grid.rows(), grid.columns()), (14, 20));
        assert_eq!(grid.find_goal(), Some(CellCoord::new(2, 17)));
        assert!(validate_goal(&grid).is_ok());
    }

    #[test]
    fn scattered_maps_are_reproducible_per_seed() {
        let first = scattered(40, 60, 0.25, 7).expect("valid map");
        let second = scattered(40, 60, 0.25, 7).expect("valid map");
        let other = scattered(40, 60, 0.25, 8).expect("valid map");

        assert_eq!(first, second);
        assert_ne!(first, other);
    }

    #[test]
    fn scattered_maps_keep_a_walled_border_and_single_goal() {
        let grid = scattered(12, 9, 0.3, DEFAULT_SCATTER_SEED).expect("valid map");

        for (cell, label) in grid.cells() {
            let border = cell.row() == 0
                || cell.column() == 0
                || cell.row() == grid.rows() - 1
                || cell.column() == grid.columns() - 1;
            if border {
                assert_eq!(label, WALL, "border cell {cell:?} must be a wall");
            }
        }
        assert!(validate_goal(&grid).is_ok());
    }

    #[test]
    fn zero_density_leaves_interior_open() {
        let grid = scattered(5, 5, 0.0, 1).expect("valid map");
        let interior_walls = grid
            .cells()
            .filter(|(cell, label)| {
                (1..4).contains(&cell.row()) && (1..4).contains(&cell.column()) && *label == WALL
            })
            .count();
        assert_eq!(interior_walls, 0);
    }
}
