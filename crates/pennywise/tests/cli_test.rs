//! Integration tests for the `pennywise` CLI binary.
//!
//! These tests validate argument parsing, help output, shell completions,
//! error handling and the offline scratch mode, all without a live
//! document service.
#![allow(clippy::unwrap_used)]

use assert_cmd::cargo::cargo_bin_cmd;
use predicates::prelude::*;

// ── Helpers ─────────────────────────────────────────────────────────

/// Build a [`Command`] for the `pennywise` binary with env isolation.
///
/// Clears all `PENNYWISE_*` env vars and points config directories at a
/// nonexistent path so tests never touch the user's real configuration.
fn pennywise_cmd() -> assert_cmd::Command {
    let mut cmd = cargo_bin_cmd!("pennywise");
    cmd.env("HOME", "/tmp/pennywise-cli-test-nonexistent")
        .env("XDG_CONFIG_HOME", "/tmp/pennywise-cli-test-nonexistent")
        .env_remove("PENNYWISE_PROFILE")
        .env_remove("PENNYWISE_SERVER")
        .env_remove("PENNYWISE_USER")
        .env_remove("PENNYWISE_API_TOKEN")
        .env_remove("PENNYWISE_OUTPUT")
        .env_remove("PENNYWISE_INSECURE")
        .env_remove("PENNYWISE_TIMEOUT")
        .env_remove("RUST_LOG");
    cmd
}

/// Same as [`pennywise_cmd`] with config directories inside `dir`.
fn pennywise_cmd_in(dir: &tempfile::TempDir) -> assert_cmd::Command {
    let mut cmd = pennywise_cmd();
    cmd.env("HOME", dir.path()).env("XDG_CONFIG_HOME", dir.path());
    cmd
}

/// Concatenate stdout + stderr from a command output for flexible matching.
fn combined_output(output: &std::process::Output) -> String {
    let stdout = String::from_utf8_lossy(&output.stdout);
    let stderr = String::from_utf8_lossy(&output.stderr);
    format!("{stdout}{stderr}")
}

// ── Basic invocation ────────────────────────────────────────────────

#[test]
fn test_no_args_shows_help() {
    let output = pennywise_cmd().output().unwrap();
    assert_eq!(output.status.code(), Some(2), "Expected exit code 2");
    let text = combined_output(&output);
    assert!(text.contains("Usage"), "Expected 'Usage' in output:\n{text}");
}

#[test]
fn test_help_flag() {
    pennywise_cmd().arg("--help").assert().success().stdout(
        predicate::str::contains("summary")
            .and(predicate::str::contains("accounts"))
            .and(predicate::str::contains("transactions"))
            .and(predicate::str::contains("budget")),
    );
}

#[test]
fn test_version_flag() {
    pennywise_cmd()
        .arg("--version")
        .assert()
        .success()
        .stdout(predicate::str::contains("pennywise"));
}

#[test]
fn test_transfer_requires_amount() {
    let output = pennywise_cmd()
        .args(["--offline", "accounts", "transfer", "--from", "a", "--to", "b"])
        .output()
        .unwrap();
    assert_eq!(output.status.code(), Some(2));
    assert!(combined_output(&output).contains("--amount"));
}

// ── Shell completions ───────────────────────────────────────────────

#[test]
fn test_completions_bash() {
    pennywise_cmd()
        .args(["completions", "bash"])
        .assert()
        .success()
        .stdout(predicate::str::is_empty().not());
}

#[test]
fn test_completions_zsh() {
    pennywise_cmd()
        .args(["completions", "zsh"])
        .assert()
        .success()
        .stdout(predicate::str::contains("pennywise"));
}

// ── Configuration errors ────────────────────────────────────────────

#[test]
fn test_missing_config_points_at_init() {
    let output = pennywise_cmd().args(["accounts", "list"]).output().unwrap();
    assert_eq!(output.status.code(), Some(1));
    let text = combined_output(&output);
    assert!(
        text.contains("config init"),
        "Expected init hint in output:\n{text}"
    );
}

#[test]
fn test_server_flag_without_user_is_an_auth_error() {
    let output = pennywise_cmd()
        .args(["--server", "http://127.0.0.1:9", "accounts", "list"])
        .output()
        .unwrap();
    assert_eq!(output.status.code(), Some(3));
}

#[test]
fn test_unreachable_server_fails_to_load() {
    let output = pennywise_cmd()
        .args([
            "--server",
            "http://127.0.0.1:9",
            "--user",
            "alice",
            "--timeout",
            "2",
            "accounts",
            "list",
        ])
        .output()
        .unwrap();
    assert_eq!(output.status.code(), Some(5));
    assert!(combined_output(&output).contains("Failed to load your data"));
}

#[test]
fn test_config_set_and_use() {
    let dir = tempfile::tempdir().unwrap();

    pennywise_cmd_in(&dir)
        .args(["--profile", "home", "config", "set", "server", "https://sync.example.com"])
        .assert()
        .success();
    pennywise_cmd_in(&dir)
        .args(["--profile", "home", "config", "set", "api_token", "s3cret"])
        .assert()
        .success();
    pennywise_cmd_in(&dir)
        .args(["config", "use", "home"])
        .assert()
        .success();

    pennywise_cmd_in(&dir)
        .args(["config", "profiles"])
        .assert()
        .success()
        .stdout(predicate::str::contains("home *"));

    pennywise_cmd_in(&dir)
        .args(["config", "show"])
        .assert()
        .success()
        .stdout(
            predicate::str::contains("https://sync.example.com")
                .and(predicate::str::contains("****"))
                .and(predicate::str::contains("s3cret").not()),
        );
}

#[test]
fn test_config_set_rejects_unknown_key() {
    let dir = tempfile::tempdir().unwrap();
    let output = pennywise_cmd_in(&dir)
        .args(["config", "set", "colour", "red"])
        .output()
        .unwrap();
    assert_eq!(output.status.code(), Some(2));
    assert!(combined_output(&output).contains("unknown config key"));
}

#[test]
fn test_config_use_unknown_profile() {
    let dir = tempfile::tempdir().unwrap();
    let output = pennywise_cmd_in(&dir)
        .args(["config", "use", "nope"])
        .output()
        .unwrap();
    assert_eq!(output.status.code(), Some(4));
}

// ── Offline mode ────────────────────────────────────────────────────

#[test]
fn test_offline_starts_empty() {
    pennywise_cmd()
        .args(["--offline", "accounts", "list", "-o", "json-compact"])
        .assert()
        .success()
        .stdout(predicate::str::diff("[]\n"));
}

#[test]
fn test_offline_summary_is_zero() {
    pennywise_cmd()
        .args(["--offline", "summary", "-o", "json-compact"])
        .assert()
        .success()
        .stdout(
            predicate::str::contains(r#""totalBalance":0"#)
                .and(predicate::str::contains(r#""spending":[]"#)),
        );
}

#[test]
fn test_offline_create_account_prints_id() {
    pennywise_cmd()
        .args(["--offline", "-q", "accounts", "create", "--name", "Main"])
        .assert()
        .success()
        .stdout(predicate::str::is_empty());

    pennywise_cmd()
        .args([
            "--offline",
            "accounts",
            "create",
            "--name",
            "Savings",
            "--type",
            "savings",
            "-o",
            "json",
        ])
        .assert()
        .success()
        .stdout(
            predicate::str::contains(r#""type": "savings""#)
                .and(predicate::str::contains(r#""currency": "EUR""#)),
        );
}

#[test]
fn test_offline_transaction_without_account_is_rejected() {
    let output = pennywise_cmd()
        .args(["--offline", "transactions", "create", "--amount", "12.50"])
        .output()
        .unwrap();
    assert_eq!(output.status.code(), Some(2));
    assert!(combined_output(&output).contains("no accounts yet"));
}

#[test]
fn test_offline_delete_unknown_account() {
    let output = pennywise_cmd()
        .args(["--offline", "-y", "accounts", "delete", "missing"])
        .output()
        .unwrap();
    assert_eq!(output.status.code(), Some(4));
    assert!(combined_output(&output).contains("accounts list"));
}

#[test]
fn test_offline_goal_requires_positive_target() {
    let output = pennywise_cmd()
        .args([
            "--offline",
            "goals",
            "create",
            "--name",
            "Trip",
            "--target",
            "0",
            "--deadline",
            "2030-01-01",
        ])
        .output()
        .unwrap();
    assert_eq!(output.status.code(), Some(2));
}

#[test]
fn test_offline_goal_takes_first_palette_color() {
    pennywise_cmd()
        .args([
            "--offline",
            "goals",
            "create",
            "--name",
            "Trip",
            "--target",
            "1500",
            "--deadline",
            "2030-01-01",
            "-o",
            "json-compact",
        ])
        .assert()
        .success()
        .stdout(predicate::str::contains(r##""color":"#4F46E5""##));
}
