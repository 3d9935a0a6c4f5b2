use std::{fs, path::Path};

use wavefront_core::CellCoord;
use wavefront_grid_source::{load_map, LoadError, DEFAULT_VARIABLE};

fn write(dir: &Path, name: &str, contents: &str) -> std::path::PathBuf {
    let path = dir.join(name);
    fs::write(&path, contents).expect("write map document");
    path
}

#[test]
fn loads_json_map_from_disk() {
    let dir = tempfile::tempdir().expect("temporary directory");
    let path = write(
        dir.path(),
        "level_mini.json",
        r#"{ "name": "Mini", "map": [[0, 0, 0], [0, 1, 2]] }"#,
    );

    let document = load_map(&path, DEFAULT_VARIABLE).expect("map loads");

    assert_eq!(document.name.as_deref(), Some("Mini"));
    assert_eq!(document.grid.find_goal(), Some(CellCoord::new(1, 2)));
}

#[test]
fn loads_toml_map_from_disk() {
    let dir = tempfile::tempdir().expect("temporary directory");
    let path = write(
        dir.path(),
        "obstacle_map.toml",
        "name = \"Obstacles\"\nmap = [\n  [1, 1, 1, 1],\n  [1, 0, 2, 1],\n  [1, 1, 1, 1],\n]\n",
    );

    let document = load_map(&path, DEFAULT_VARIABLE).expect("map loads");

    assert_eq!(document.grid.rows(), 3);
    assert_eq!(document.grid.columns(), 4);
}

#[test]
fn absent_file_reports_its_path() {
    let dir = tempfile::tempdir().expect("temporary directory");
    let path = dir.path().join("missing.json");

    let error = load_map(&path, DEFAULT_VARIABLE).expect_err("file is absent");

    assert!(matches!(error, LoadError::Io { .. }));
    assert!(error.to_string().contains("missing.json"));
}

#[test]
fn unknown_extension_is_rejected_before_reading() {
    let error = load_map(Path::new("static/obstacle_map.mat"), DEFAULT_VARIABLE)
        .expect_err("unsupported format");

    assert!(matches!(error, LoadError::UnsupportedFormat { .. }));
}

#[test]
fn malformed_document_reports_parse_failure() {
    let dir = tempfile::tempdir().expect("temporary directory");
    let path = write(dir.path(), "broken.json", "{ \"map\": [[0, 2]");

    let error = load_map(&path, DEFAULT_VARIABLE).expect_err("malformed JSON");

    assert!(matches!(error, LoadError::Json(_)));
}

#[test]
fn non_matrix_variable_is_rejected() {
    let dir = tempfile::tempdir().expect("temporary directory");
    let path = write(dir.path(), "flat.json", r#"{ "map": [0, 2, 0] }"#);

    let error = load_map(&path, DEFAULT_VARIABLE).expect_err("flat array");

    assert!(matches!(error, LoadError::InvalidMatrix { .. }));
}
