//! CLI integration tests using assert_cmd.

use std::path::{Path, PathBuf};

use assert_cmd::Command;
use predicates::prelude::*;
use tempfile::TempDir;

fn mathdrill(dir: &Path) -> Command {
    #[allow(deprecated)]
    let mut cmd = Command::cargo_bin("mathdrill").unwrap();
    cmd.current_dir(dir)
        .env("HOME", dir)
        .env_remove("MATHDRILL_CONFIG")
        .env_remove("RUST_LOG");
    cmd
}

fn saved_report(dir: &Path) -> PathBuf {
    let reports = dir.join("reports");
    std::fs::read_dir(&reports)
        .unwrap()
        .map(|e| e.unwrap().path())
        .find(|p| p.extension().is_some_and(|ext| ext == "json"))
        .expect("a saved report")
}

#[test]
fn help_lists_commands() {
    let dir = TempDir::new().unwrap();
    mathdrill(dir.path())
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("play"))
        .stdout(predicate::str::contains("validate"))
        .stdout(predicate::str::contains("report"))
        .stdout(predicate::str::contains("init"));
}

#[test]
fn version_flag() {
    let dir = TempDir::new().unwrap();
    mathdrill(dir.path())
        .arg("--version")
        .assert()
        .success()
        .stdout(predicate::str::contains("mathdrill"));
}

#[test]
fn init_creates_config() {
    let dir = TempDir::new().unwrap();

    mathdrill(dir.path())
        .arg("init")
        .assert()
        .success()
        .stdout(predicate::str::contains("Created mathdrill.toml"));
    assert!(dir.path().join("mathdrill.toml").exists());

    mathdrill(dir.path())
        .arg("init")
        .assert()
        .success()
        .stdout(predicate::str::contains("already exists"));
}

#[test]
fn init_then_validate() {
    let dir = TempDir::new().unwrap();
    mathdrill(dir.path()).arg("init").assert().success();

    mathdrill(dir.path())
        .args(["validate", "--config", "mathdrill.toml"])
        .assert()
        .success()
        .stdout(predicate::str::contains("add, sub, mul, div"))
        .stdout(predicate::str::contains("Settings valid."));
}

#[test]
fn validate_reports_warnings() {
    let dir = TempDir::new().unwrap();
    std::fs::write(
        dir.path().join("fast.toml"),
        "duration_secs = 10\ntarget_score = 50\n",
    )
    .unwrap();

    mathdrill(dir.path())
        .args(["validate", "--config", "fast.toml"])
        .assert()
        .success()
        .stdout(predicate::str::contains("WARNING"))
        .stdout(predicate::str::contains("1 warning(s) found."));
}

#[test]
fn validate_invalid_settings() {
    let dir = TempDir::new().unwrap();
    std::fs::write(dir.path().join("bad.toml"), "duration_secs = 0\n").unwrap();

    mathdrill(dir.path())
        .args(["validate", "--config", "bad.toml"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Error"))
        .stderr(predicate::str::contains("invalid settings"));
}

#[test]
fn validate_unknown_field() {
    let dir = TempDir::new().unwrap();
    std::fs::write(dir.path().join("typo.toml"), "durration_secs = 60\n").unwrap();

    mathdrill(dir.path())
        .args(["validate", "--config", "typo.toml"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("failed to parse TOML"));
}

#[test]
fn validate_nonexistent_file() {
    let dir = TempDir::new().unwrap();
    mathdrill(dir.path())
        .args(["validate", "--config", "nonexistent.toml"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Error"));
}

#[test]
fn play_without_answers_times_out() {
    let dir = TempDir::new().unwrap();
    mathdrill(dir.path())
        .args(["play", "--duration", "1", "--seed", "7", "--ops", "add"])
        .write_stdin("")
        .assert()
        .success()
        .stdout(predicate::str::contains("Time's up!"))
        .stdout(predicate::str::contains(
            "You didn't answer any questions correctly. Try again!",
        ));
}

#[test]
fn play_with_no_operations_shows_placeholder() {
    let dir = TempDir::new().unwrap();
    mathdrill(dir.path())
        .args(["play", "--duration", "1", "--ops", "none"])
        .write_stdin("")
        .assert()
        .success()
        .stdout(predicate::str::contains("Enable an operation!"))
        .stderr(predicate::str::contains("no operations enabled"));
}

#[test]
fn play_rejects_unknown_operation() {
    let dir = TempDir::new().unwrap();
    mathdrill(dir.path())
        .args(["play", "--ops", "add,pow"])
        .write_stdin("")
        .assert()
        .failure()
        .stderr(predicate::str::contains("invalid command-line settings"));
}

#[test]
fn play_quit_command_exits_early() {
    let dir = TempDir::new().unwrap();
    mathdrill(dir.path())
        .args(["play", "--duration", "60"])
        .write_stdin("abc\n:quit\n")
        .assert()
        .success()
        .stdout(predicate::str::contains("not a valid answer"))
        .stdout(predicate::str::contains("Time's up!").not());
}

#[test]
fn saved_report_can_be_rendered() {
    let dir = TempDir::new().unwrap();
    mathdrill(dir.path())
        .args(["play", "--duration", "1", "--save-report", "reports"])
        .write_stdin("")
        .assert()
        .success()
        .stderr(predicate::str::contains("Report saved to:"));

    let report = saved_report(dir.path());

    mathdrill(dir.path())
        .arg("report")
        .arg("--file")
        .arg(&report)
        .assert()
        .success()
        .stdout(predicate::str::contains("didn't answer any"));

    let output = mathdrill(dir.path())
        .arg("report")
        .arg("--file")
        .arg(&report)
        .args(["--format", "json"])
        .output()
        .unwrap();
    assert!(output.status.success());
    let json: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(json["summary"]["correct"], 0);
    assert_eq!(json["settings"]["duration_secs"], 1);

    mathdrill(dir.path())
        .arg("report")
        .arg("--file")
        .arg(&report)
        .args(["--format", "markdown"])
        .assert()
        .success()
        .stdout(predicate::str::contains("# Session"));
}

#[test]
fn report_rejects_unknown_sort_key() {
    let dir = TempDir::new().unwrap();
    mathdrill(dir.path())
        .args(["play", "--duration", "1", "--save-report", "reports"])
        .write_stdin("")
        .assert()
        .success();

    mathdrill(dir.path())
        .arg("report")
        .arg("--file")
        .arg(saved_report(dir.path()))
        .args(["--sort", "colour"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("unknown sort key"));
}

#[test]
fn unwritable_report_dir_does_not_end_the_session() {
    let dir = TempDir::new().unwrap();
    std::fs::write(dir.path().join("blocked"), "not a directory").unwrap();

    mathdrill(dir.path())
        .args(["play", "--duration", "1", "--save-report", "blocked/reports"])
        .write_stdin("")
        .assert()
        .success()
        .stdout(predicate::str::contains("Time's up!"))
        .stderr(predicate::str::contains("failed to save report"));
}
