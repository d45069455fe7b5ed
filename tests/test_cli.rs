use std::process::Command;

fn interpolate_area() -> Command {
    let mut command = Command::new(env!("CARGO_BIN_EXE_interpolate-area"));
    command.env("RUST_LOG", "off");
    command
}

#[test]
fn test_invalid_region_reported_with_logging_off() {
    let output = interpolate_area()
        .args(["--start", "5", "5", "--end", "5", "6", "--readings", "unused.csv"])
        .output()
        .unwrap();

    assert!(!output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("invalid region"), "stderr: {}", stderr);
}

#[test]
fn test_missing_input_reported_with_logging_off() {
    let dir = tempfile::tempdir().unwrap();
    let missing = dir.path().join("missing.csv");

    let output = interpolate_area()
        .args(["--start", "0", "0", "--end", "2", "2"])
        .arg("--monitors")
        .arg(&missing)
        .arg("--readings")
        .arg(&missing)
        .arg("--output-dir")
        .arg(dir.path().join("out"))
        .output()
        .unwrap();

    assert!(!output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("missing.csv"), "stderr: {}", stderr);
}
