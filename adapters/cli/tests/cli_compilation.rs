use std::process::Command;

#[test]
fn cli_compiles_without_warnings() {
    let status = Command::new(env!("CARGO"))
        .current_dir(env!("CARGO_MANIFEST_DIR"))
        .args(["check", "--quiet", "--bin", "wavefront"])
        .status()
        .expect("failed to invoke cargo check for wavefront CLI binary");

    assert!(status.success(), "cargo check --bin wavefront should succeed");
}

#[test]
fn headless_run_prints_value_map_and_trajectory() {
    let output = Command::new(env!("CARGO_BIN_EXE_wavefront"))
        .args(["--headless", "--maze", "mini", "--start", "13,2"])
        .env("RUST_LOG", "off")
        .output()
        .expect("failed to run wavefront binary");

    assert!(output.status.success(), "headless run should succeed");
    let stdout = String::from_utf8(output.stdout).expect("report is UTF-8");
    assert!(stdout.contains(" Value Map "));
    assert!(stdout.contains(" Trajectory "));
    assert!(stdout.contains("Step 1: (13, 2)"));
    assert!(stdout.trim_end().ends_with("(3, 18)"));
}

#[test]
fn headless_run_without_start_fails() {
    let output = Command::new(env!("CARGO_BIN_EXE_wavefront"))
        .args(["--headless"])
        .env("RUST_LOG", "off")
        .output()
        .expect("failed to run wavefront binary");

    assert!(!output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("--start"));
}

fn headless_stderr(rust_log: &str) -> String {
    let output = Command::new(env!("CARGO_BIN_EXE_wavefront"))
        .args(["--headless", "--maze", "mini", "--start", "13,2"])
        .env("RUST_LOG", rust_log)
        .output()
        .expect("failed to run wavefront binary");

    assert!(output.status.success(), "headless run should succeed");
    String::from_utf8_lossy(&output.stderr).into_owned()
}

#[test]
fn rust_log_replaces_the_default_filter() {
    let silenced = headless_stderr("off");
    assert!(!silenced.contains("plan ready"), "RUST_LOG=off must silence info logs");
    assert!(!silenced.contains("map ready"));

    let verbose = headless_stderr("wavefront=debug");
    assert!(verbose.contains("wavefront expansion finished"));
    assert!(verbose.contains("plan ready"));
}

#[test]
fn headless_run_plans_to_a_moved_goal() {
    let output = Command::new(env!("CARGO_BIN_EXE_wavefront"))
        .args(["--headless", "--start", "13,2", "--goal", "3,5"])
        .env("RUST_LOG", "off")
        .output()
        .expect("failed to run wavefront binary");

    assert!(output.status.success(), "headless run should succeed");
    let stdout = String::from_utf8(output.stdout).expect("report is UTF-8");
    assert!(stdout.trim_end().ends_with("(3, 5)"));
}
