//! CLI integration tests for the blinkboard binary.
//!
//! These run the compiled binary. With stdout piped the dashboard takes the
//! non-TTY path and prints a single plain snapshot, so none of these tests
//! enter the interactive loop.

use assert_cmd::Command;
use predicates::prelude::*;

fn blinkboard_cmd() -> Command {
    Command::cargo_bin("blinkboard").expect("failed to find blinkboard binary")
}

#[test]
fn test_version_flag() {
    blinkboard_cmd()
        .arg("--version")
        .assert()
        .success()
        .stdout(predicate::str::contains(env!("CARGO_PKG_VERSION")));
}

#[test]
fn test_help_flag() {
    blinkboard_cmd()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("adaptive traffic-signal"))
        .stdout(predicate::str::contains("--config"))
        .stdout(predicate::str::contains("--tab"))
        .stdout(predicate::str::contains("--no-color"));
}

#[test]
fn test_no_color_flag_runs() {
    blinkboard_cmd()
        .args(["--no-color", "--quiet"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Project BLINK"));
}

#[test]
fn test_print_config_emits_toml() {
    blinkboard_cmd()
        .arg("--print-config")
        .assert()
        .success()
        .stdout(predicate::str::contains("title ="))
        .stdout(predicate::str::contains("[[live_metrics]]"))
        .stdout(predicate::str::contains("[[header_stats]]"));
}

#[test]
fn test_unknown_tab_fails() {
    blinkboard_cmd()
        .args(["--tab", "junctions", "--quiet"])
        .assert()
        .failure();
}

#[test]
fn test_missing_config_file_fails() {
    blinkboard_cmd()
        .args(["--config", "/nonexistent/blinkboard.toml", "--quiet"])
        .assert()
        .failure();
}

#[test]
fn test_piped_run_prints_snapshot() {
    blinkboard_cmd()
        .arg("--quiet")
        .assert()
        .success()
        .stdout(predicate::str::contains("Project BLINK"))
        .stdout(predicate::str::contains("signal"))
        .stdout(predicate::str::contains("[Overview]"));
}

#[test]
fn test_piped_run_respects_initial_tab() {
    blinkboard_cmd()
        .args(["--tab", "training", "--quiet"])
        .assert()
        .success()
        .stdout(predicate::str::contains("[Training]"))
        .stdout(predicate::str::contains("Training Episodes"));
}

#[test]
fn test_custom_config_dataset() {
    use std::io::Write;

    let mut file = tempfile::Builder::new()
        .suffix(".toml")
        .tempfile()
        .unwrap();
    writeln!(
        file,
        r#"
title = "Midtown Pilot"

[[header_stats]]
label = "Corridors"
value = 7.0

[[improvements]]
label = "Wait"
value = 12.0
format = "percent"
"#
    )
    .unwrap();

    blinkboard_cmd()
        .args(["--config", file.path().to_str().unwrap(), "--quiet"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Midtown Pilot"))
        .stdout(predicate::str::contains("Corridors"));
}
