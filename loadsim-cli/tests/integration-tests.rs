use std::process::Command;

use assert_cmd::prelude::{CommandCargoExt, OutputAssertExt};
use predicates::prelude::*;

#[test]
fn test_that_cli_app_produces_result() -> Result<(), Box<dyn std::error::Error>> {
    let mut cmd = Command::cargo_bin("loadsim-cli")?;
    cmd.args(["--vehicle", "commuter100", "--speed", "20"]);
    cmd.assert()
        .success()
        .stdout(predicate::str::contains("gear 2nd"))
        .stdout(predicate::str::contains("51.6"));

    Ok(())
}

#[test]
fn test_json_result() -> Result<(), Box<dyn std::error::Error>> {
    let mut cmd = Command::cargo_bin("loadsim-cli")?;
    cmd.args([
        "--vehicle",
        "duke200",
        "--state",
        "accelerating",
        "--res-fmt",
        "json",
    ]);
    cmd.assert()
        .success()
        .stdout(predicate::str::contains("\"total_workload_pct\": 70.9"))
        .stdout(predicate::str::contains("\"gear_label\": \"6th\""));

    Ok(())
}

#[test]
fn test_compare() -> Result<(), Box<dyn std::error::Error>> {
    let mut cmd = Command::cargo_bin("loadsim-cli")?;
    cmd.arg("--compare");
    cmd.assert()
        .success()
        .stdout(predicate::str::contains("100cc Air-Cooled Commuter"))
        .stdout(predicate::str::contains("Maruti Alto K10 (AC ON)"));

    Ok(())
}

#[test]
fn test_sanity_check_passes() -> Result<(), Box<dyn std::error::Error>> {
    let mut cmd = Command::cargo_bin("loadsim-cli")?;
    cmd.arg("--sanity-check");
    cmd.assert()
        .success()
        .stdout(predicate::str::contains(
            "PASS | 70 cruising commuter highest",
        ))
        .stdout(predicate::str::contains("FAIL").not());

    Ok(())
}

#[test]
fn test_unknown_vehicle_fails() -> Result<(), Box<dyn std::error::Error>> {
    let mut cmd = Command::cargo_bin("loadsim-cli")?;
    cmd.args(["--vehicle", "cybertruck"]);
    cmd.assert()
        .failure()
        .stderr(predicate::str::contains("unknown vehicle type"));

    Ok(())
}

#[test]
fn test_source_is_required() -> Result<(), Box<dyn std::error::Error>> {
    let mut cmd = Command::cargo_bin("loadsim-cli")?;
    cmd.args(["--speed", "50"]);
    cmd.assert().failure();

    let mut cmd = Command::cargo_bin("loadsim-cli")?;
    cmd.args(["--vehicle", "duke200", "--compare"]);
    cmd.assert().failure();

    Ok(())
}

#[test]
fn test_bad_speed_fails() -> Result<(), Box<dyn std::error::Error>> {
    let mut cmd = Command::cargo_bin("loadsim-cli")?;
    cmd.args(["--vehicle", "altoK10", "--speed", "NaN"]);
    cmd.assert()
        .failure()
        .stderr(predicate::str::contains("speed must be finite"));

    Ok(())
}

#[test]
fn test_sweep_to_csv() -> Result<(), Box<dyn std::error::Error>> {
    let dir = tempfile::tempdir()?;
    let csv_path = dir.path().join("sweep.csv");
    let mut cmd = Command::cargo_bin("loadsim-cli")?;
    cmd.args([
        "--vehicle",
        "altoK10",
        "--sweep-step",
        "10",
        "--csv",
        csv_path.to_str().unwrap(),
    ]);
    cmd.assert()
        .success()
        .stdout(predicate::str::contains("wrote 13 rows"));
    let contents = std::fs::read_to_string(&csv_path)?;
    assert_eq!(contents.lines().count(), 14);
    assert!(contents.starts_with("speed_kmh,drive_state,rpm,gear_label"));

    Ok(())
}

#[test]
fn test_tiny_sweep_step_fails() -> Result<(), Box<dyn std::error::Error>> {
    let dir = tempfile::tempdir()?;
    let csv_path = dir.path().join("sweep.csv");
    let mut cmd = Command::cargo_bin("loadsim-cli")?;
    cmd.args([
        "--vehicle",
        "duke200",
        "--sweep-step",
        "1e-13",
        "--csv",
        csv_path.to_str().unwrap(),
    ]);
    cmd.assert()
        .failure()
        .stderr(predicate::str::contains("sweep step too small"));
    assert!(!csv_path.exists());

    Ok(())
}

#[test]
fn test_profile_file() -> Result<(), Box<dyn std::error::Error>> {
    let mut cmd = Command::cargo_bin("loadsim-cli")?;
    cmd.args([
        "--profile-file",
        concat!(
            env!("CARGO_MANIFEST_DIR"),
            "/../loadsim-core/tests/assets/commuter100.yaml"
        ),
        "--speed",
        "70",
        "--res-fmt",
        "yaml",
    ]);
    cmd.assert()
        .success()
        .stdout(predicate::str::contains("total_workload_pct: 79.6"));

    Ok(())
}
