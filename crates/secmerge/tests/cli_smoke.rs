//! Smoke tests for the secmerge binary.
//!
//! Only paths that never reach AWS are exercised: argument handling, base
//! directory checks, preselected-file validation and CLI-mode failures.

use assert_cmd::Command;
use predicates::prelude::*;
use tempfile::TempDir;

fn secmerge() -> Command {
    let mut cmd = Command::new(env!("CARGO_BIN_EXE_secmerge"));
    for var in [
        "SECMERGE_REGION",
        "SECMERGE_BASE_DIR",
        "SECMERGE_LOG_LEVEL",
        "SECMERGE_AWS_MODE",
        "RUST_LOG",
    ] {
        cmd.env_remove(var);
    }
    cmd
}

#[test]
fn test_help_lists_subcommands() {
    secmerge()
        .arg("--help")
        .assert()
        .success()
        .stdout(
            predicate::str::contains("update-secret")
                .and(predicate::str::contains("rollback-secret"))
                .and(predicate::str::contains("list-secrets")),
        );
}

#[test]
fn test_version() {
    secmerge()
        .arg("--version")
        .assert()
        .success()
        .stdout(predicate::str::contains(env!("CARGO_PKG_VERSION")));
}

#[test]
fn test_unknown_region_is_usage_error() {
    secmerge()
        .args(["update-secret", "--region", "eu"])
        .assert()
        .code(2)
        .stderr(predicate::str::contains("Unknown region code 'eu'"));
}

#[test]
fn test_region_from_environment() {
    secmerge()
        .env("SECMERGE_REGION", "mars")
        .arg("list-secrets")
        .assert()
        .code(2)
        .stderr(predicate::str::contains("Unknown region code 'mars'"));
}

#[test]
fn test_missing_base_dir() {
    let temp = TempDir::new().unwrap();
    secmerge()
        .args(["update-secret", "--base-dir"])
        .arg(temp.path().join("absent"))
        .assert()
        .code(2)
        .stderr(predicate::str::contains("Base directory does not exist"));
}

#[test]
fn test_preselected_missing_file_in_json_mode() {
    let temp = TempDir::new().unwrap();
    secmerge()
        .current_dir(temp.path())
        .args([
            "update-secret",
            "--json",
            "--aws-mode",
            "cli",
            "--region",
            "us",
            "--secret-id",
            "app/prod",
            "--file",
            "absent.env",
        ])
        .arg("--base-dir")
        .arg(temp.path())
        .assert()
        .code(2)
        .stdout(
            predicate::str::contains(r#""status":"error""#)
                .and(predicate::str::contains(r#""code":"config""#))
                .and(predicate::str::contains("Override file not found")),
        );

    assert!(!temp.path().join("updated_secret.json").exists());
}

#[test]
fn test_missing_aws_cli_is_store_error() {
    let temp = TempDir::new().unwrap();
    secmerge()
        .env("PATH", temp.path())
        .env_remove("AWS_ACCESS_KEY_ID")
        .env_remove("AWS_SECRET_ACCESS_KEY")
        .env_remove("AWS_PROFILE")
        .args(["list-secrets", "--region", "ca", "--json"])
        .assert()
        .code(3)
        .stdout(
            predicate::str::contains(r#""code":"store""#)
                .and(predicate::str::contains("Failed to execute aws CLI")),
        );
}
