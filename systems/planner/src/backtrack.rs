//! Greedy descent over a labeled wavefront field.

use wavefront_core::{CellCoord, CellLabel, Connectivity, Grid, GridPosition, Trajectory};

/// Walks from `start` toward the goal, always stepping onto the lowest labeled neighbor.
///
/// Ties resolve to the first minimum in scan order. Walls and unreached free
/// cells are never stepped on. Once the walk stands on a labeled cell every
/// step must strictly lower the label, which bounds the walk by the start's
/// wave distance. The walk stops early when no neighbor qualifies.
pub(crate) fn descend(labels: &Grid, start: CellCoord, connectivity: Connectivity) -> Trajectory {
    let mut steps = Vec::new();
    let mut current = start;

    loop {
        steps.push(GridPosition::from_cell(current));

        let Some(label) = labels.label(current) else {
            return Trajectory::new(steps, false);
        };
        if label == CellLabel::Goal {
            return Trajectory::new(steps, true);
        }

        match lowest_neighbor(labels, current, label, connectivity) {
            Some(next) => current = next,
            None => return Trajectory::new(steps, false),
        }
    }
}

fn lowest_neighbor(
    labels: &Grid,
    cell: CellCoord,
    label: CellLabel,
    connectivity: Connectivity,
) -> Option<CellCoord> {
    let ceiling = if label.is_labeled() {
        label.value()
    } else {
        u32::MAX
    };

    let mut best: Option<(CellCoord, u32)> = None;
    for neighbor in labels.neighbors(cell, connectivity) {
        let Some(candidate) = labels.label(neighbor) else {
            continue;
        };
        if !candidate.is_labeled() {
            continue;
        }

        let value = candidate.value();
        if value >= ceiling {
            continue;
        }
        if best.map_or(true, |(_, lowest)| value < lowest) {
            best = Some((neighbor, value));
        }
    }

    best.map(|(neighbor, _)| neighbor)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ties_resolve_in_scan_order() {
        // Both the cell above and the cell to the right hold the lowest value.
        let labels = Grid::from_rows(vec![vec![4, 3, 4], vec![5, 4, 3], vec![5, 5, 4]])
            .expect("valid grid");
        let next = lowest_neighbor(
            &labels,
            CellCoord::new(1, 1),
            CellLabel::Wave(4),
            Connectivity::Eight,
        );

        assert_eq!(next, Some(CellCoord::new(0, 1)));
    }

    #[test]
    fn unreached_cells_are_never_stepped_on() {
        let labels = Grid::from_rows(vec![vec![0, 0], vec![0, 1]]).expect("valid grid");
        let trajectory = descend(&labels, CellCoord::new(0, 0), Connectivity::Eight);

        assert_eq!(trajectory.steps(), &[GridPosition::new(1, 1)]);
        assert!(!trajectory.reaches_goal());
    }

    #[test]
    fn descent_stops_at_a_plateau() {
        let labels = Grid::from_rows(vec![vec![5, 5]]).expect("valid grid");
        let trajectory = descend(&labels, CellCoord::new(0, 0), Connectivity::Eight);

        assert_eq!(trajectory.len(), 1);
        assert!(!trajectory.reaches_goal());
    }
}
