//! Process-level behaviour of the `wayfarer` binary: argument and setup
//! failures, before any request leaves the machine.

use std::path::Path;

use assert_cmd::Command;
use tempfile::TempDir;

/// A `wayfarer` command isolated from the caller's credentials and home.
fn wayfarer(home: &Path) -> Command {
    let mut cmd = Command::new(assert_cmd::cargo::cargo_bin!("wayfarer"));
    cmd.current_dir(home)
        .env("HOME", home)
        .env("USERPROFILE", home)
        .env_remove("OPENAI_API_KEY")
        .env_remove("WAYFARER_API_KEY")
        .env_remove("WAYFARER_MODEL")
        .env_remove("WAYFARER_BASE_URL")
        .env_remove("WAYFARER_MAX_TURNS")
        .env_remove("RUST_LOG");
    cmd
}

fn stderr_of(output: &std::process::Output) -> String {
    String::from_utf8_lossy(&output.stderr).into_owned()
}

fn error_lines(stderr: &str) -> Vec<&str> {
    stderr
        .lines()
        .filter(|line| line.starts_with("[ERROR]"))
        .collect()
}

#[test]
fn missing_message_exits_with_usage_hint() {
    let home = TempDir::new().unwrap();
    let output = wayfarer(home.path()).assert().code(1).get_output().clone();

    assert!(stderr_of(&output).contains("Please provide a message"));
    assert!(output.stdout.is_empty());
}

#[test]
fn blank_message_counts_as_missing() {
    let home = TempDir::new().unwrap();
    let output = wayfarer(home.path())
        .arg("   ")
        .assert()
        .code(1)
        .get_output()
        .clone();

    assert!(stderr_of(&output).contains("Please provide a message"));
}

#[test]
fn missing_credential_is_one_error_line() {
    let home = TempDir::new().unwrap();
    let output = wayfarer(home.path())
        .arg("Plan a 3-day trip to Osaka, budget $1000")
        .assert()
        .code(1)
        .get_output()
        .clone();

    let stderr = stderr_of(&output);
    let errors = error_lines(&stderr);
    assert_eq!(errors.len(), 1, "stderr was: {stderr}");
    assert!(errors[0].contains("OPENAI_API_KEY"));
    assert!(output.stdout.is_empty());
}

#[test]
fn blank_credentials_are_missing() {
    let home = TempDir::new().unwrap();
    let config = home.path().join("config.toml");
    std::fs::write(&config, "api_key = \"\"\n").unwrap();

    let output = wayfarer(home.path())
        .env("WAYFARER_API_KEY", "  ")
        .arg("--config")
        .arg(&config)
        .arg("Plan Osaka")
        .assert()
        .code(1)
        .get_output()
        .clone();

    let stderr = stderr_of(&output);
    let errors = error_lines(&stderr);
    assert_eq!(errors.len(), 1, "stderr was: {stderr}");
    assert!(errors[0].contains("OPENAI_API_KEY"));
}

#[test]
fn zero_turn_budget_is_rejected() {
    let home = TempDir::new().unwrap();
    let output = wayfarer(home.path())
        .env("OPENAI_API_KEY", "sk-test")
        .arg("--turns")
        .arg("0")
        .arg("Plan Osaka")
        .assert()
        .code(1)
        .get_output()
        .clone();

    let stderr = stderr_of(&output);
    let errors = error_lines(&stderr);
    assert_eq!(errors.len(), 1, "stderr was: {stderr}");
    assert!(errors[0].contains("max_turns"));
}
