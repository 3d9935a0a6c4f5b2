#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Core contracts shared across the wavefront planner workspace.
//!
//! This crate defines the vocabulary that connects grid sources, the planner
//! and the rendering adapters. A [`Grid`] stores raw cell labels in row-major
//! order and is the only way any crate addresses cells. Internal addressing
//! uses zero-based [`CellCoord`] values, while the planner's public boundary
//! speaks one-based [`GridPosition`] values; the conversion between the two
//! lives exclusively in [`GridPosition::to_cell`] and
//! [`GridPosition::from_cell`].

use std::fmt;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Label stored in a free cell that has not been reached by the wavefront.
pub const FREE: u32 = 0;
/// Label stored in an impassable cell.
pub const WALL: u32 = 1;
/// Label stored in the goal cell. Wave distances grow upward from this value.
pub const GOAL: u32 = 2;

/// Neighbor offsets in the fixed scan order used for expansion and backtracking.
///
/// The order is up, right, down, left, upper-right, lower-right, lower-left,
/// upper-left. Each entry is a `(row, column)` delta.
pub const NEIGHBOR_SCAN_ORDER: [(i32, i32); 8] = [
    (-1, 0),
    (0, 1),
    (1, 0),
    (0, -1),
    (-1, 1),
    (1, 1),
    (1, -1),
    (-1, -1),
];

/// Classification of a raw cell label.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum CellLabel {
    /// Walkable cell not yet reached by the wavefront.
    Free,
    /// Impassable cell.
    Wall,
    /// The goal cell that seeds the wavefront.
    Goal,
    /// Walkable cell labeled with its wave value (always greater than [`GOAL`]).
    Wave(u32),
}

impl CellLabel {
    /// Classifies a raw label value.
    #[must_use]
    pub const fn from_value(value: u32) -> Self {
        match value {
            FREE => Self::Free,
            WALL => Self::Wall,
            GOAL => Self::Goal,
            wave => Self::Wave(wave),
        }
    }

    /// Raw label value stored in the grid.
    #[must_use]
    pub const fn value(self) -> u32 {
        match self {
            Self::Free => FREE,
            Self::Wall => WALL,
            Self::Goal => GOAL,
            Self::Wave(wave) => wave,
        }
    }

    /// Whether the label was assigned by the wavefront (goal or wave value).
    #[must_use]
    pub const fn is_labeled(self) -> bool {
        matches!(self, Self::Goal | Self::Wave(_))
    }

    /// Number of wave units separating the cell from the goal, if labeled.
    #[must_use]
    pub const fn wave_distance(self) -> Option<u32> {
        match self {
            Self::Goal => Some(0),
            Self::Wave(wave) => wave.checked_sub(GOAL),
            Self::Free | Self::Wall => None,
        }
    }
}

/// Location of a single grid cell expressed as zero-based row and column.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct CellCoord {
    row: u32,
    column: u32,
}

impl CellCoord {
    /// Creates a new zero-based grid cell coordinate.
    #[must_use]
    pub const fn new(row: u32, column: u32) -> Self {
        Self { row, column }
    }

    /// Zero-based row index of the cell.
    #[must_use]
    pub const fn row(&self) -> u32 {
        self.row
    }

    /// Zero-based column index of the cell.
    #[must_use]
    pub const fn column(&self) -> u32 {
        self.column
    }

    /// Applies a `(row, column)` delta, returning `None` when either axis underflows or overflows.
    #[must_use]
    pub fn offset(self, delta: (i32, i32)) -> Option<Self> {
        let row = self.row.checked_add_signed(delta.0)?;
        let column = self.column.checked_add_signed(delta.1)?;
        Some(Self::new(row, column))
    }

    /// Number of 8-connected unit steps separating two cells on an open grid.
    #[must_use]
    pub fn chebyshev_distance(self, other: CellCoord) -> u32 {
        self.row
            .abs_diff(other.row)
            .max(self.column.abs_diff(other.column))
    }

    /// Whether `other` lies within one of the eight neighbor offsets of this cell.
    #[must_use]
    pub fn is_adjacent(self, other: CellCoord) -> bool {
        self.chebyshev_distance(other) == 1
    }
}

/// One-based grid position used at the planner's public boundary.
///
/// Start cells handed to the planner, cells chosen interactively and every
/// element of a [`Trajectory`] are expressed with this type.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct GridPosition {
    row: u32,
    column: u32,
}

impl GridPosition {
    /// Creates a new one-based position. Zero on either axis is representable but never valid.
    #[must_use]
    pub const fn new(row: u32, column: u32) -> Self {
        Self { row, column }
    }

    /// One-based row of the position.
    #[must_use]
    pub const fn row(&self) -> u32 {
        self.row
    }

    /// One-based column of the position.
    #[must_use]
    pub const fn column(&self) -> u32 {
        self.column
    }

    /// Converts a zero-based cell into its one-based boundary position.
    #[must_use]
    pub const fn from_cell(cell: CellCoord) -> Self {
        Self::new(cell.row + 1, cell.column + 1)
    }

    /// Converts the position into a zero-based cell, or `None` when an axis is zero.
    #[must_use]
    pub fn to_cell(self) -> Option<CellCoord> {
        Some(CellCoord::new(
            self.row.checked_sub(1)?,
            self.column.checked_sub(1)?,
        ))
    }
}

impl fmt::Display for GridPosition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.row, self.column)
    }
}

/// Cell reached by the wavefront together with the wave value assigned to it.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ExpandedCell {
    /// Zero-based location of the reached cell.
    pub cell: CellCoord,
    /// Label assigned to the cell; [`GOAL`] for the seed.
    pub wave: u32,
}

/// Neighborhood model shared by expansion, backtracking and start resolution.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Connectivity {
    /// Only the four orthogonal neighbors are adjacent.
    Four,
    /// Orthogonal and diagonal neighbors are adjacent, all at unit cost.
    #[default]
    Eight,
}

impl Connectivity {
    /// Neighbor offsets visited by this connectivity, in scan order.
    #[must_use]
    pub fn offsets(self) -> &'static [(i32, i32)] {
        match self {
            Self::Four => &NEIGHBOR_SCAN_ORDER[..4],
            Self::Eight => &NEIGHBOR_SCAN_ORDER,
        }
    }
}

impl fmt::Display for Connectivity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Four => write!(f, "4-point"),
            Self::Eight => write!(f, "8-point"),
        }
    }
}

/// Errors raised while constructing or editing a [`Grid`].
#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum GridError {
    /// The matrix contained no rows or its first row contained no columns.
    #[error("grid must contain at least one row and one column")]
    Empty,
    /// A row length differed from the first row.
    #[error("row {row} has {found} columns but the grid has {expected}")]
    Ragged {
        /// Zero-based index of the offending row.
        row: usize,
        /// Column count of the first row.
        expected: usize,
        /// Column count of the offending row.
        found: usize,
    },
    /// The matrix dimensions do not fit the coordinate type.
    #[error("grid dimensions {rows}x{columns} exceed the supported range")]
    TooLarge {
        /// Number of rows supplied.
        rows: usize,
        /// Number of columns supplied.
        columns: usize,
    },
    /// The addressed cell lies outside the grid.
    #[error("cell {cell:?} lies outside the grid")]
    OutOfBounds {
        /// Cell that failed the bounds check.
        cell: CellCoord,
    },
    /// The goal cannot be placed onto a wall.
    #[error("cell {cell:?} is a wall and cannot hold the goal")]
    GoalOnWall {
        /// Wall cell that was requested as goal.
        cell: CellCoord,
    },
}

/// Rectangular, non-empty matrix of cell labels stored in row-major order.
///
/// The grid serializes as a nested array of rows so map documents and plan
/// reports stay human readable.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "Vec<Vec<u32>>", into = "Vec<Vec<u32>>")]
pub struct Grid {
    rows: u32,
    columns: u32,
    cells: Vec<u32>,
}

impl Grid {
    /// Builds a grid from nested rows, rejecting empty and ragged input.
    pub fn from_rows(rows: Vec<Vec<u32>>) -> Result<Self, GridError> {
        let row_count = rows.len();
        let column_count = rows.first().map_or(0, Vec::len);
        if row_count == 0 || column_count == 0 {
            return Err(GridError::Empty);
        }

        let too_large = || GridError::TooLarge {
            rows: row_count,
            columns: column_count,
        };
        let row_total = u32::try_from(row_count).map_err(|_| too_large())?;
        let column_total = u32::try_from(column_count).map_err(|_| too_large())?;
        let cell_total = row_count
            .checked_mul(column_count)
            .ok_or_else(too_large)?;

        let mut cells = Vec::with_capacity(cell_total);
        for (index, row) in rows.into_iter().enumerate() {
            if row.len() != column_count {
                return Err(GridError::Ragged {
                    row: index,
                    expected: column_count,
                    found: row.len(),
                });
            }
            cells.extend(row);
        }

        Ok(Self {
            rows: row_total,
            columns: column_total,
            cells,
        })
    }

    /// Builds a grid of the provided dimensions with every cell set to `label`.
    pub fn filled(rows: u32, columns: u32, label: u32) -> Result<Self, GridError> {
        if rows == 0 || columns == 0 {
            return Err(GridError::Empty);
        }
        let too_large = || GridError::TooLarge {
            rows: rows as usize,
            columns: columns as usize,
        };
        let row_count = usize::try_from(rows).map_err(|_| too_large())?;
        let column_count = usize::try_from(columns).map_err(|_| too_large())?;
        let cell_total = row_count.checked_mul(column_count).ok_or_else(too_large)?;

        Ok(Self {
            rows,
            columns,
            cells: vec![label; cell_total],
        })
    }

    /// Number of rows contained in the grid.
    #[must_use]
    pub const fn rows(&self) -> u32 {
        self.rows
    }

    /// Number of columns contained in the grid.
    #[must_use]
    pub const fn columns(&self) -> u32 {
        self.columns
    }

    /// Total number of cells.
    #[must_use]
    pub fn cell_count(&self) -> usize {
        self.cells.len()
    }

    /// Dense labels stored in row-major order.
    #[must_use]
    pub fn as_slice(&self) -> &[u32] {
        &self.cells
    }

    /// Whether the cell lies within the grid bounds.
    #[must_use]
    pub const fn contains(&self, cell: CellCoord) -> bool {
        cell.row < self.rows && cell.column < self.columns
    }

    /// Raw label stored at the cell, or `None` when it lies outside the grid.
    #[must_use]
    pub fn get(&self, cell: CellCoord) -> Option<u32> {
        self.index(cell)
            .and_then(|index| self.cells.get(index).copied())
    }

    /// Classified label stored at the cell, or `None` when it lies outside the grid.
    #[must_use]
    pub fn label(&self, cell: CellCoord) -> Option<CellLabel> {
        self.get(cell).map(CellLabel::from_value)
    }

    /// Overwrites the label stored at the cell.
    pub fn set(&mut self, cell: CellCoord, label: u32) -> Result<(), GridError> {
        let slot = self
            .index(cell)
            .and_then(|index| self.cells.get_mut(index))
            .ok_or(GridError::OutOfBounds { cell })?;
        *slot = label;
        Ok(())
    }

    /// Whether the cell lies inside the grid and is not a wall.
    #[must_use]
    pub fn is_walkable(&self, cell: CellCoord) -> bool {
        self.get(cell).is_some_and(|label| label != WALL)
    }

    /// First goal cell in row-major order.
    #[must_use]
    pub fn find_goal(&self) -> Option<CellCoord> {
        self.goals().next()
    }

    /// Every goal cell in row-major order.
    pub fn goals(&self) -> impl Iterator<Item = CellCoord> + '_ {
        self.cells()
            .filter(|&(_, label)| label == GOAL)
            .map(|(cell, _)| cell)
    }

    /// Iterates over every cell and its raw label in row-major order.
    pub fn cells(&self) -> impl Iterator<Item = (CellCoord, u32)> + '_ {
        let columns = self.columns;
        self.cells.iter().enumerate().map(move |(index, &label)| {
            let index = index as u64;
            let row = (index / u64::from(columns)) as u32;
            let column = (index % u64::from(columns)) as u32;
            (CellCoord::new(row, column), label)
        })
    }

    /// Labels of a single row, or `None` when the row lies outside the grid.
    #[must_use]
    pub fn row(&self, row: u32) -> Option<&[u32]> {
        if row >= self.rows {
            return None;
        }
        let width = usize::try_from(self.columns).ok()?;
        let start = usize::try_from(row).ok()?.checked_mul(width)?;
        self.cells.get(start..start + width)
    }

    /// In-bounds neighbors of a cell in scan order for the given connectivity.
    pub fn neighbors(
        &self,
        cell: CellCoord,
        connectivity: Connectivity,
    ) -> impl Iterator<Item = CellCoord> + '_ {
        connectivity
            .offsets()
            .iter()
            .filter_map(move |&delta| cell.offset(delta))
            .filter(move |&neighbor| self.contains(neighbor))
    }

    /// Clears every existing goal label and marks `cell` as the only goal.
    pub fn relocate_goal(&mut self, cell: CellCoord) -> Result<(), GridError> {
        match self.get(cell) {
            None => return Err(GridError::OutOfBounds { cell }),
            Some(WALL) => return Err(GridError::GoalOnWall { cell }),
            Some(_) => {}
        }

        for label in self.cells.iter_mut().filter(|label| **label == GOAL) {
            *label = FREE;
        }
        self.set(cell, GOAL)
    }

    /// Copies the labels into nested rows.
    #[must_use]
    pub fn to_rows(&self) -> Vec<Vec<u32>> {
        let width = self.columns as usize;
        self.cells
            .chunks(width.max(1))
            .map(<[u32]>::to_vec)
            .collect()
    }

    fn index(&self, cell: CellCoord) -> Option<usize> {
        if !self.contains(cell) {
            return None;
        }
        let row = usize::try_from(cell.row).ok()?;
        let column = usize::try_from(cell.column).ok()?;
        let width = usize::try_from(self.columns).ok()?;
        row.checked_mul(width)?.checked_add(column)
    }
}

impl TryFrom<Vec<Vec<u32>>> for Grid {
    type Error = GridError;

    fn try_from(rows: Vec<Vec<u32>>) -> Result<Self, Self::Error> {
        Self::from_rows(rows)
    }
}

impl From<Grid> for Vec<Vec<u32>> {
    fn from(grid: Grid) -> Self {
        grid.to_rows()
    }
}

/// Ordered walk from the start cell toward the goal, in one-based positions.
///
/// A trajectory is produced once per planning call and never changes
/// afterwards. When the start cannot reach the goal the walk stops early and
/// [`Trajectory::reaches_goal`] reports `false`.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Trajectory {
    steps: Vec<GridPosition>,
    reaches_goal: bool,
}

impl Trajectory {
    /// Captures a finished walk.
    #[must_use]
    pub fn new(steps: Vec<GridPosition>, reaches_goal: bool) -> Self {
        Self {
            steps,
            reaches_goal,
        }
    }

    /// Positions visited in order, starting with the start cell.
    #[must_use]
    pub fn steps(&self) -> &[GridPosition] {
        &self.steps
    }

    /// Number of cells in the walk, including start and goal.
    #[must_use]
    pub fn len(&self) -> usize {
        self.steps.len()
    }

    /// Whether the walk holds no cells.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.steps.is_empty()
    }

    /// First position of the walk.
    #[must_use]
    pub fn start(&self) -> Option<GridPosition> {
        self.steps.first().copied()
    }

    /// Last position of the walk; the goal when [`Self::reaches_goal`] holds.
    #[must_use]
    pub fn end(&self) -> Option<GridPosition> {
        self.steps.last().copied()
    }

    /// Whether the walk terminates on the goal.
    #[must_use]
    pub const fn reaches_goal(&self) -> bool {
        self.reaches_goal
    }

    /// Iterates over the positions of the walk.
    pub fn iter(&self) -> impl Iterator<Item = GridPosition> + '_ {
        self.steps.iter().copied()
    }

    /// Whether each position is one of the eight neighbor offsets of its predecessor.
    #[must_use]
    pub fn is_connected(&self) -> bool {
        self.steps.windows(2).all(|pair| {
            match (pair[0].to_cell(), pair[1].to_cell()) {
                (Some(from), Some(to)) => from.is_adjacent(to),
                _ => false,
            }
        })
    }
}

impl<'a> IntoIterator for &'a Trajectory {
    type Item = &'a GridPosition;
    type IntoIter = std::slice::Iter<'a, GridPosition>;

    fn into_iter(self) -> Self::IntoIter {
        self.steps.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::{
        CellCoord, CellLabel, Connectivity, Grid, GridError, GridPosition, Trajectory, GOAL, WALL,
    };

    fn sample_grid() -> Grid {
        Grid::from_rows(vec![vec![1, 1, 1], vec![1, 0, 2], vec![1, 1, 1]]).expect("valid grid")
    }

    #[test]
    fn from_rows_rejects_empty_input() {
        assert_eq!(Grid::from_rows(Vec::new()), Err(GridError::Empty));
        assert_eq!(Grid::from_rows(vec![Vec::new()]), Err(GridError::Empty));
    }

    #[test]
    fn from_rows_rejects_ragged_rows() {
        let error = Grid::from_rows(vec![vec![0, 0], vec![0]]).expect_err("ragged rows");
        assert_eq!(
            error,
            GridError::Ragged {
                row: 1,
                expected: 2,
                found: 1,
            }
        );
    }

    #[test]
    fn get_is_bounds_checked() {
        let grid = sample_grid();
        assert_eq!(grid.get(CellCoord::new(1, 2)), Some(GOAL));
        assert_eq!(grid.get(CellCoord::new(3, 0)), None);
        assert_eq!(grid.get(CellCoord::new(0, 3)), None);
    }

    #[test]
    fn set_rejects_cells_outside_the_grid() {
        let mut grid = sample_grid();
        let outside = CellCoord::new(5, 5);
        assert_eq!(
            grid.set(outside, WALL),
            Err(GridError::OutOfBounds { cell: outside })
        );
    }

    #[test]
    fn find_goal_scans_row_major() {
        let grid = Grid::from_rows(vec![vec![0, 0, 2], vec![2, 0, 0]]).expect("valid grid");
        assert_eq!(grid.find_goal(), Some(CellCoord::new(0, 2)));
        assert_eq!(grid.goals().count(), 2);
    }

    #[test]
    fn neighbors_follow_scan_order_and_stay_in_bounds() {
        let grid = Grid::filled(3, 3, 0).expect("valid grid");
        let center: Vec<_> = grid
            .neighbors(CellCoord::new(1, 1), Connectivity::Eight)
            .collect();
        assert_eq!(
            center,
            vec![
                CellCoord::new(0, 1),
                CellCoord::new(1, 2),
                CellCoord::new(2, 1),
                CellCoord::new(1, 0),
                CellCoord::new(0, 2),
                CellCoord::new(2, 2),
                CellCoord::new(2, 0),
                CellCoord::new(0, 0),
            ]
        );

        let corner: Vec<_> = grid
            .neighbors(CellCoord::new(0, 0), Connectivity::Four)
            .collect();
        assert_eq!(corner, vec![CellCoord::new(0, 1), CellCoord::new(1, 0)]);
    }

    #[test]
    fn relocate_goal_clears_previous_goals() {
        let mut grid = Grid::from_rows(vec![vec![2, 0], vec![0, 2]]).expect("valid grid");
        grid.relocate_goal(CellCoord::new(1, 0)).expect("free cell");
        assert_eq!(grid.goals().collect::<Vec<_>>(), vec![CellCoord::new(1, 0)]);
    }

    #[test]
    fn relocate_goal_refuses_walls() {
        let mut grid = sample_grid();
        let wall = CellCoord::new(0, 0);
        assert_eq!(
            grid.relocate_goal(wall),
            Err(GridError::GoalOnWall { cell: wall })
        );
        assert_eq!(grid.find_goal(), Some(CellCoord::new(1, 2)));
    }

    #[test]
    fn grid_position_converts_at_the_boundary() {
        let cell = CellCoord::new(1, 0);
        let position = GridPosition::from_cell(cell);
        assert_eq!(position, GridPosition::new(2, 1));
        assert_eq!(position.to_cell(), Some(cell));
        assert_eq!(GridPosition::new(0, 4).to_cell(), None);
    }

    #[test]
    fn cell_label_reports_wave_distance() {
        assert_eq!(CellLabel::from_value(2).wave_distance(), Some(0));
        assert_eq!(CellLabel::from_value(7).wave_distance(), Some(5));
        assert_eq!(CellLabel::from_value(1).wave_distance(), None);
        assert!(!CellLabel::Free.is_labeled());
    }

    #[test]
    fn hand_built_low_wave_has_no_negative_distance() {
        assert_eq!(CellLabel::Wave(0).wave_distance(), None);
        assert_eq!(CellLabel::Wave(1).wave_distance(), None);
        assert_eq!(CellLabel::Wave(2).wave_distance(), Some(0));
    }

    #[test]
    fn trajectory_connectivity_detects_jumps() {
        let connected = Trajectory::new(
            vec![
                GridPosition::new(2, 1),
                GridPosition::new(2, 2),
                GridPosition::new(3, 3),
            ],
            true,
        );
        assert!(connected.is_connected());

        let jumping = Trajectory::new(
            vec![GridPosition::new(1, 1), GridPosition::new(1, 3)],
            false,
        );
        assert!(!jumping.is_connected());
    }

    #[test]
    fn grid_serializes_as_nested_rows() {
        let grid = sample_grid();
        let json = serde_json::to_string(&grid).expect("serialize");
        assert_eq!(json, "[[1,1,1],[1,0,2],[1,1,1]]");

        let ragged = serde_json::from_str::<Grid>("[[0,0],[0]]");
        assert!(ragged.is_err());
    }

    #[test]
    fn grid_survives_bincode_encoding() {
        let grid = sample_grid();
        let bytes = bincode::serialize(&grid).expect("serialize");
        let restored: Grid = bincode::deserialize(&bytes).expect("deserialize");
        assert_eq!(restored, grid);
    }
}
