//! End-to-end CLI tests driving the compiled `ezpass` binary.
//!
//! The passphrase is supplied through `EZPASS_PASSPHRASE` so no test
//! ever needs an interactive prompt.  Commands that would touch the
//! clipboard use `--show` instead.  Every invocation points `HOME` at
//! the test's temp dir so a config file in the developer's real home
//! directory cannot leak into the run.

use std::fs;

use assert_cmd::Command;
use predicates::prelude::*;
use tempfile::TempDir;

const PASSPHRASE: &str = "integration-test-passphrase";

/// Binary invocation with `HOME` (and the Windows equivalent) pinned to
/// the temp dir, so settings resolve inside the sandbox.
fn ezpass_in(dir: &TempDir) -> Command {
    let mut cmd = Command::cargo_bin("ezpass").expect("binary builds");
    cmd.env("HOME", dir.path()).env("USERPROFILE", dir.path());
    cmd
}

fn ezpass(dir: &TempDir) -> Command {
    let mut cmd = ezpass_in(dir);
    cmd.env("EZPASS_PASSPHRASE", PASSPHRASE)
        .arg("--vault")
        .arg(dir.path().join("vault.ezp"));
    cmd
}

#[test]
fn help_lists_subcommands() {
    let dir = TempDir::new().expect("tempdir");
    ezpass_in(&dir)
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("generate"))
        .stdout(predicate::str::contains("pwgen"));
}

#[test]
fn pwgen_prints_a_password_of_the_requested_length() {
    let dir = TempDir::new().expect("tempdir");
    let output = ezpass_in(&dir)
        .args(["pwgen", "--length", "20"])
        .output()
        .expect("run pwgen");

    assert!(output.status.success());
    let line = String::from_utf8(output.stdout).expect("utf-8").trim().to_string();
    assert_eq!(line.len(), 20);
}

#[test]
fn pwgen_rejects_an_empty_alphabet() {
    let dir = TempDir::new().expect("tempdir");
    ezpass_in(&dir)
        .args([
            "pwgen",
            "--no-lowercase",
            "--no-uppercase",
            "--no-digits",
            "--no-symbols",
        ])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Invalid password policy"));
}

#[test]
fn config_in_home_controls_default_password_length() {
    let dir = TempDir::new().expect("tempdir");
    let config_dir = dir.path().join(".ezpass");
    fs::create_dir_all(&config_dir).expect("config dir");
    fs::write(config_dir.join("config.toml"), "password_length = 24\n").expect("config file");

    let output = ezpass_in(&dir)
        .arg("pwgen")
        .output()
        .expect("run pwgen");

    assert!(output.status.success());
    let line = String::from_utf8(output.stdout).expect("utf-8").trim().to_string();
    assert_eq!(line.len(), 24);
}

#[test]
fn init_generate_get_delete_workflow() {
    let dir = TempDir::new().expect("tempdir");

    ezpass(&dir).arg("init").assert().success();

    ezpass(&dir)
        .args(["generate", "example.com", "--username", "alice", "--show"])
        .assert()
        .success()
        .stdout(predicate::str::contains("example.com"));

    ezpass(&dir)
        .arg("list")
        .assert()
        .success()
        .stdout(predicate::str::contains("example.com"))
        .stdout(predicate::str::contains("alice"));

    let output = ezpass(&dir)
        .args(["get", "example.com", "--username", "alice", "--show"])
        .output()
        .expect("run get");
    assert!(output.status.success());
    let password = String::from_utf8(output.stdout)
        .expect("utf-8")
        .lines()
        .next()
        .expect("password line")
        .to_string();
    assert_eq!(password.len(), 16); // default generated length

    ezpass(&dir)
        .args(["delete", "example.com", "--username", "alice", "--force"])
        .assert()
        .success();

    ezpass(&dir)
        .args(["get", "example.com", "--username", "alice", "--show"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("No credential"));
}

#[test]
fn init_refuses_to_overwrite_an_existing_vault() {
    let dir = TempDir::new().expect("tempdir");

    ezpass(&dir).arg("init").assert().success();
    ezpass(&dir)
        .arg("init")
        .assert()
        .failure()
        .stderr(predicate::str::contains("already exists"));
}

#[test]
fn wrong_passphrase_is_an_authentication_failure() {
    let dir = TempDir::new().expect("tempdir");

    ezpass(&dir).arg("init").assert().success();

    ezpass_in(&dir)
        .env("EZPASS_PASSPHRASE", "not-the-passphrase")
        .arg("--vault")
        .arg(dir.path().join("vault.ezp"))
        .arg("list")
        .assert()
        .failure()
        .stderr(predicate::str::contains("Authentication failed"));
}

#[test]
fn duplicate_add_is_reported() {
    let dir = TempDir::new().expect("tempdir");

    ezpass(&dir).arg("init").assert().success();
    ezpass(&dir)
        .args(["add", "example.com", "--secret", "hunter2"])
        .assert()
        .success();
    ezpass(&dir)
        .args(["add", "example.com", "--secret", "hunter3"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("already exists"));
}
