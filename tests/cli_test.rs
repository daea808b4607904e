//! Calibration CLI Tests
//!
//! Runs the `pipewatch` binary as a subprocess and checks its report.

use std::process::Command;

fn cli() -> Command {
    Command::new(env!("CARGO_BIN_EXE_pipewatch"))
}

#[test]
fn test_cli_help_flag() {
    let output = cli().arg("--help").output().expect("Failed to run CLI");

    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("Calibrate the simulated anomaly rates"));
    assert!(stdout.contains("--rounds"));
    assert!(stdout.contains("--seed"));
    assert!(stdout.contains("--hour"));
}

#[test]
fn test_cli_calibration_report() {
    let output = cli()
        .args(["--rounds", "500", "--seed", "42", "--hour", "0"])
        .output()
        .expect("Failed to run CLI");

    assert!(output.status.success(), "stderr: {}", String::from_utf8_lossy(&output.stderr));
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("Rounds: 500"));
    assert!(stdout.contains("Hour: 00:00"));
    assert!(stdout.contains("2.8x"));
    for station in ["Mardakan", "Sumqayit", "Turkan"] {
        assert!(stdout.contains(station), "missing {}", station);
    }
    assert!(stdout.contains("Generated 1500 readings"));
}

#[test]
fn test_cli_rejects_out_of_range_hour() {
    let output = cli().args(["--hour", "24"]).output().expect("Failed to run CLI");
    assert!(!output.status.success());
}
