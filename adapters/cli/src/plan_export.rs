use std::{error::Error, fmt, fs, path::Path};

use anyhow::{Context, Result};
use serde::Serialize;
use wavefront_core::{Connectivity, Grid, GridPosition, Trajectory};
use wavefront_system_planner::{Plan, PlanSummary};

/// Delimiter between the row and column of a `--start` or `--goal` value.
const FIELD_DELIMITER: char = ',';

/// JSON document written by `--output`.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub(crate) struct PlanExport<'a> {
    /// Display name of the planned map, if the source carried one.
    pub(crate) name: Option<&'a str>,
    /// One-based start the trajectory begins at.
    pub(crate) start: GridPosition,
    /// One-based goal that seeded the expansion.
    pub(crate) goal: GridPosition,
    /// Neighborhood the plan was produced with.
    pub(crate) connectivity: Connectivity,
    /// Aggregated figures describing the plan.
    pub(crate) summary: PlanSummary,
    /// Grid with wave values, as nested rows.
    pub(crate) labeled_grid: &'a Grid,
    /// One-based trajectory steps.
    pub(crate) trajectory: &'a Trajectory,
}

impl<'a> PlanExport<'a> {
    /// Captures the parts of `plan` that are written to disk.
    #[must_use]
    pub(crate) fn new(name: Option<&'a str>, start: GridPosition, plan: &'a Plan) -> Self {
        Self {
            name,
            start,
            goal: plan.goal(),
            connectivity: plan.connectivity(),
            summary: plan.summary(),
            labeled_grid: plan.labeled_grid(),
            trajectory: plan.trajectory(),
        }
    }

    /// Encodes the export as pretty-printed JSON.
    pub(crate) fn encode(&self) -> Result<String> {
        serde_json::to_string_pretty(self).context("failed to encode plan as JSON")
    }

    /// Writes the JSON document to `path`.
    pub(crate) fn write(&self, path: &Path) -> Result<()> {
        let encoded = self.encode()?;
        fs::write(path, encoded)
            .with_context(|| format!("failed to write plan to {}", path.display()))
    }
}

/// Errors that can occur while parsing a `--start` or `--goal` value.
#[derive(Debug, PartialEq, Eq)]
pub(crate) enum PositionArgError {
    /// The value did not contain a `ROW,COL` pair.
    MissingDelimiter(String),
    /// A component was not a positive integer.
    InvalidComponent(String),
}

impl fmt::Display for PositionArgError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::MissingDelimiter(value) => {
                write!(f, "position '{value}' must be written as ROW,COL")
            }
            Self::InvalidComponent(value) => {
                write!(f, "position '{value}' must use one-based row and column numbers")
            }
        }
    }
}

impl Error for PositionArgError {}

/// Parses a one-based `ROW,COL` grid position.
pub(crate) fn parse_position(value: &str) -> Result<GridPosition, PositionArgError> {
    let (row, column) = value
        .split_once(FIELD_DELIMITER)
        .ok_or_else(|| PositionArgError::MissingDelimiter(value.to_owned()))?;

    let row = row
        .trim()
        .parse::<u32>()
        .map_err(|_| PositionArgError::InvalidComponent(value.to_owned()))?;
    let column = column
        .trim()
        .parse::<u32>()
        .map_err(|_| PositionArgError::InvalidComponent(value.to_owned()))?;

    if row == 0 || column == 0 {
        return Err(PositionArgError::InvalidComponent(value.to_owned()));
    }

    Ok(GridPosition::new(row, column))
}

#[cfg(test)]
mod tests {
    use super::*;
    use wavefront_system_planner::plan;

    #[test]
    fn parse_position_accepts_one_based_pairs() {
        assert_eq!(parse_position("2,1"), Ok(GridPosition::new(2, 1)));
        assert_eq!(parse_position(" 14 , 20 "), Ok(GridPosition::new(14, 20)));
    }

    #[test]
    fn parse_position_rejects_malformed_values() {
        assert_eq!(
            parse_position("2;1"),
            Err(PositionArgError::MissingDelimiter("2;1".to_owned()))
        );
        assert_eq!(
            parse_position("0,3"),
            Err(PositionArgError::InvalidComponent("0,3".to_owned()))
        );
        assert!(parse_position("a,3").is_err());
        assert!(parse_position("-1,3").is_err());
    }

    #[test]
    fn export_carries_grid_rows_and_one_based_steps() {
        let grid = Grid::from_rows(vec![vec![1, 1, 1], vec![1, 0, 2], vec![1, 1, 1]])
            .expect("valid grid");
        let start = GridPosition::new(2, 1);
        let plan = plan(&grid, start).expect("plan succeeds");

        let encoded = PlanExport::new(Some("corridor"), start, &plan)
            .encode()
            .expect("plan encodes");
        let value: serde_json::Value = serde_json::from_str(&encoded).expect("valid JSON");

        assert_eq!(value["name"], "corridor");
        assert_eq!(value["connectivity"], "eight");
        assert_eq!(value["labeled_grid"][1], serde_json::json!([1, 3, 2]));
        assert_eq!(value["trajectory"]["steps"][0]["row"], 2);
        assert_eq!(value["trajectory"]["steps"][2]["column"], 3);
        assert_eq!(value["summary"]["reaches_goal"], true);
    }

    #[test]
    fn write_creates_the_output_file() {
        let grid = Grid::from_rows(vec![vec![2]]).expect("valid grid");
        let start = GridPosition::new(1, 1);
        let plan = plan(&grid, start).expect("plan succeeds");
        let dir = tempfile::tempdir().expect("temporary directory");
        let path = dir.path().join("plan.json");

        PlanExport::new(None, start, &plan)
            .write(&path)
            .expect("plan writes");

        let written = fs::read_to_string(&path).expect("output exists");
        assert!(written.contains("\"labeled_grid\""));
    }
}
