use assert_cmd::{cargo, prelude::*};
use predicates::prelude::*;
use std::process::Command;
use tempfile::TempDir;

#[test]
fn help_lists_flags() {
    let mut cmd = Command::new(cargo::cargo_bin!("stockrev"));
    cmd.arg("--help");

    cmd.assert()
        .success()
        .stdout(predicate::str::contains("--output-dir"))
        .stdout(predicate::str::contains("--no-image"))
        .stdout(predicate::str::contains("--config"));
}

#[test]
fn missing_config_file_fails_before_any_request() {
    let dir = TempDir::new().expect("failed to create temp dir");
    let out = dir.path().join("out");

    let mut cmd = Command::new(cargo::cargo_bin!("stockrev"));
    cmd.arg("--no-color")
        .arg("--config")
        .arg(dir.path().join("missing.toml"))
        .arg("--output-dir")
        .arg(&out);

    cmd.assert()
        .failure()
        .stderr(predicate::str::contains("Failed to read config file"));

    assert!(!out.exists(), "output dir must not be created");
}

#[test]
fn invalid_config_key_is_reported() {
    let dir = TempDir::new().expect("failed to create temp dir");
    let config = dir.path().join("stockrev.toml");
    std::fs::write(&config, "tickers = [\"AAPL\"]\n").expect("failed to write config");

    let mut cmd = Command::new(cargo::cargo_bin!("stockrev"));
    cmd.arg("--config").arg(&config);

    cmd.assert()
        .failure()
        .stderr(predicate::str::contains("Invalid configuration"));
}
