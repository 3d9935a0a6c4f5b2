#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Grid sources that feed the wavefront planner.
//!
//! Maps arrive either from built-in [`fixtures`] or from an external document
//! holding a table of named variables, one of which is a 2D integer array.
//! JSON and TOML documents are supported; the format follows the file
//! extension. Every source validates that the matrix is rectangular, uses only
//! the free, wall and goal labels, and contains exactly one goal.

pub mod fixtures;

use std::{
    collections::BTreeMap,
    fs, io,
    path::{Path, PathBuf},
};

use thiserror::Error;
use tracing::{debug, info};
use wavefront_core::{Grid, GridError, FREE, GOAL, WALL};

/// Variable name looked up when the caller does not provide one.
pub const DEFAULT_VARIABLE: &str = "map";

/// Optional variable holding a display name for the map.
const NAME_VARIABLE: &str = "name";

/// Errors raised while loading or validating a map.
#[derive(Debug, Error)]
pub enum LoadError {
    /// The map file could not be read.
    #[error("the file at '{}' could not be read", path.display())]
    Io {
        /// Path that failed to open.
        path: PathBuf,
        /// Underlying I/O failure.
        #[source]
        source: io::Error,
    },
    /// The file extension does not name a supported document format.
    #[error("'{}' is not a .json or .toml map document", path.display())]
    UnsupportedFormat {
        /// Offending path.
        path: PathBuf,
    },
    /// The JSON document could not be parsed.
    #[error("could not parse JSON map document")]
    Json(#[source] serde_json::Error),
    /// The TOML document could not be parsed.
    #[error("could not parse TOML map document")]
    Toml(#[source] toml::de::Error),
    /// The document has no variable with the requested name.
    #[error("the '{variable}' variable was not found in the map document")]
    MissingVariable {
        /// Variable that was looked up.
        variable: String,
    },
    /// The named variable is not a 2D integer array.
    #[error("the '{variable}' variable is not a 2D integer array")]
    InvalidMatrix {
        /// Variable that failed to decode.
        variable: String,
        /// Decoding failure.
        #[source]
        source: serde_json::Error,
    },
    /// A cell holds a value other than free, wall or goal.
    #[error("cell at row {row}, column {column} holds unsupported label {value}")]
    InvalidLabel {
        /// Zero-based row of the offending cell.
        row: usize,
        /// Zero-based column of the offending cell.
        column: usize,
        /// Value found in the document.
        value: i64,
    },
    /// The matrix does not form a valid grid.
    #[error(transparent)]
    Grid(#[from] GridError),
    /// The map holds no goal cell.
    #[error("the map holds no goal cell")]
    MissingGoal,
    /// The map holds more than one goal cell.
    #[error("the map holds {count} goal cells but exactly one is required")]
    MultipleGoals {
        /// Number of goal cells found.
        count: usize,
    },
}

/// Structured document formats understood by the loader.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum MapFormat {
    /// A JSON object whose keys are variable names.
    Json,
    /// A TOML table whose keys are variable names.
    Toml,
}

impl MapFormat {
    /// Infers the format from a file extension.
    #[must_use]
    pub fn from_path(path: &Path) -> Option<Self> {
        let extension = path.extension()?.to_str()?;
        if extension.eq_ignore_ascii_case("json") {
            Some(Self::Json)
        } else if extension.eq_ignore_ascii_case("toml") {
            Some(Self::Toml)
        } else {
            None
        }
    }
}

/// Validated map ready for planning.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct MapDocument {
    /// Display name carried by the document, if any.
    pub name: Option<String>,
    /// Grid extracted from the named variable.
    pub grid: Grid,
}

/// Reads the map stored under `variable` in the document at `path`.
pub fn load_map(path: &Path, variable: &str) -> Result<MapDocument, LoadError> {
    let format = MapFormat::from_path(path).ok_or_else(|| LoadError::UnsupportedFormat {
        path: path.to_path_buf(),
    })?;
    let contents = fs::read_to_string(path).map_err(|source| LoadError::Io {
        path: path.to_path_buf(),
        source,
    })?;

    let document = parse_map(&contents, format, variable)?;
    info!(
        path = %path.display(),
        variable,
        rows = document.grid.rows(),
        columns = document.grid.columns(),
        "loaded map"
    );
    Ok(document)
}

/// Extracts and validates the map stored under `variable` in `contents`.
pub fn parse_map(
    contents: &str,
    format: MapFormat,
    variable: &str,
) -> Result<MapDocument, LoadError> {
    let mut variables: BTreeMap<String, serde_json::Value> = match format {
        MapFormat::Json => serde_json::from_str(contents).map_err(LoadError::Json)?,
        MapFormat::Toml => toml::from_str(contents).map_err(LoadError::Toml)?,
    };
    debug!(
        variables = ?variables.keys().collect::<Vec<_>>(),
        "parsed map document"
    );

    let matrix = variables
        .remove(variable)
        .ok_or_else(|| LoadError::MissingVariable {
            variable: variable.to_owned(),
        })?;
    let matrix: Vec<Vec<i64>> =
        serde_json::from_value(matrix).map_err(|source| LoadError::InvalidMatrix {
            variable: variable.to_owned(),
            source,
        })?;
    let name = variables
        .get(NAME_VARIABLE)
        .and_then(serde_json::Value::as_str)
        .map(str::to_owned);

    Ok(MapDocument {
        name,
        grid: grid_from_matrix(matrix)?,
    })
}

/// Converts a raw integer matrix into a validated grid.
pub fn grid_from_matrix(matrix: Vec<Vec<i64>>) -> Result<Grid, LoadError> {
    let mut rows = Vec::with_capacity(matrix.len());
    for (row_index, row) in matrix.into_iter().enumerate() {
        let labels = row
            .into_iter()
            .enumerate()
            .map(|(column_index, value)| match u32::try_from(value) {
                Ok(label @ (FREE | WALL | GOAL)) => Ok(label),
                _ => Err(LoadError::InvalidLabel {
                    row: row_index,
                    column: column_index,
                    value,
                }),
            })
            .collect::<Result<Vec<u32>, LoadError>>()?;
        rows.push(labels);
    }

    let grid = Grid::from_rows(rows)?;
    validate_goal(&grid)?;
    Ok(grid)
}

/// Ensures the grid holds exactly one goal cell.
pub fn validate_goal(grid: &Grid) -> Result<(), LoadError> {
    match grid.goals().count() {
        0 => Err(LoadError::MissingGoal),
        1 => Ok(()),
        count => Err(LoadError::MultipleGoals { count }),
    }
}
