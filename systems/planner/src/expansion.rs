//! Wavefront labeling seeded from the goal cell.

use std::collections::VecDeque;

use wavefront_core::{CellCoord, Connectivity, ExpandedCell, Grid, FREE};

/// Labeled copy of the input grid plus the order in which cells were reached.
#[derive(Clone, Debug)]
pub(crate) struct Wavefront {
    pub(crate) labels: Grid,
    pub(crate) order: Vec<ExpandedCell>,
}

/// Labels every free cell reachable from `goal` with its wave value.
///
/// The goal keeps its own label and each neighbor of a cell holding `v`
/// receives `v + 1`. Walls and cells that already carry a non-free label are
/// never enqueued, so the caller's goal label is the origin of the field.
pub(crate) fn expand(grid: &Grid, goal: CellCoord, connectivity: Connectivity) -> Wavefront {
    let mut labels = grid.clone();
    let width = labels.columns() as usize;
    let mut visited = vec![false; labels.cell_count()];
    let mut order = Vec::new();
    let mut queue = VecDeque::new();

    if let Some(index) = index(width, goal) {
        visited[index] = true;
        queue.push_back(goal);
    }

    while let Some(cell) = queue.pop_front() {
        let Some(current) = labels.get(cell) else {
            continue;
        };
        order.push(ExpandedCell {
            cell,
            wave: current,
        });

        let Some(next) = current.checked_add(1) else {
            continue;
        };

        let reachable: Vec<CellCoord> = labels
            .neighbors(cell, connectivity)
            .filter(|&neighbor| labels.get(neighbor) == Some(FREE))
            .collect();

        for neighbor in reachable {
            let Some(neighbor_index) = index(width, neighbor) else {
                continue;
            };

            if visited[neighbor_index] {
                continue;
            }

            visited[neighbor_index] = true;
            if labels.set(neighbor, next).is_ok() {
                queue.push_back(neighbor);
            }
        }
    }

    Wavefront { labels, order }
}

fn index(width: usize, cell: CellCoord) -> Option<usize> {
    let column = usize::try_from(cell.column()).ok()?;
    let row = usize::try_from(cell.row()).ok()?;
    row.checked_mul(width)?.checked_add(column)
}

#[cfg(test)]
mod tests {
    use super::*;
    use wavefront_core::WALL;

    #[test]
    fn expand_sets_goal_neighbors_to_goal_plus_one() {
        let grid = Grid::from_rows(vec![vec![0, 0, 0], vec![0, 2, 0], vec![0, 0, 0]])
            .expect("valid grid");
        let wavefront = expand(&grid, CellCoord::new(1, 1), Connectivity::Eight);

        for (cell, label) in wavefront.labels.cells() {
            if cell == CellCoord::new(1, 1) {
                assert_eq!(label, 2);
            } else {
                assert_eq!(label, 3, "cell {cell:?} should be one wave from the goal");
            }
        }
    }

    #[test]
    fn expand_respects_walls() {
        let grid = Grid::from_rows(vec![vec![0, 1, 2], vec![0, 1, 0], vec![0, 0, 0]])
            .expect("valid grid");
        let wavefront = expand(&grid, CellCoord::new(0, 2), Connectivity::Eight);

        assert_eq!(wavefront.labels.get(CellCoord::new(0, 1)), Some(WALL));
        assert_eq!(wavefront.labels.get(CellCoord::new(2, 1)), Some(4));
        assert_eq!(wavefront.labels.get(CellCoord::new(0, 0)), Some(6));
    }

    #[test]
    fn four_point_expansion_skips_diagonals() {
        let grid = Grid::from_rows(vec![vec![2, 0], vec![0, 0]]).expect("valid grid");
        let wavefront = expand(&grid, CellCoord::new(0, 0), Connectivity::Four);

        assert_eq!(wavefront.labels.get(CellCoord::new(1, 1)), Some(4));
    }

    #[test]
    fn expansion_order_starts_at_goal_and_is_non_decreasing() {
        let grid = Grid::filled(4, 5, 0)
            .and_then(|mut grid| grid.set(CellCoord::new(3, 4), 2).map(|()| grid))
            .expect("valid grid");
        let wavefront = expand(&grid, CellCoord::new(3, 4), Connectivity::Eight);

        assert_eq!(
            wavefront.order.first(),
            Some(&ExpandedCell {
                cell: CellCoord::new(3, 4),
                wave: 2,
            })
        );
        assert_eq!(wavefront.order.len(), grid.cell_count());
        assert!(wavefront
            .order
            .windows(2)
            .all(|pair| pair[0].wave <= pair[1].wave));
    }
}
