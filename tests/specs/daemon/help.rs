//! overseerd --help, --version, and unknown-argument specs.

use crate::prelude::*;
use tempfile::tempdir;

#[test]
fn version_flag_prints_version() {
    let state = tempdir().unwrap();
    let output = overseerd_cmd(state.path()).arg("--version").output().unwrap();
    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.starts_with("overseerd "), "got: {stdout}");
}

#[test]
fn short_version_flag_prints_version() {
    let state = tempdir().unwrap();
    let output = overseerd_cmd(state.path()).arg("-v").output().unwrap();
    assert!(output.status.success());
}

#[test]
fn help_flag_shows_usage() {
    let state = tempdir().unwrap();
    let output = overseerd_cmd(state.path()).arg("--help").output().unwrap();
    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("USAGE:"), "got: {stdout}");
    assert!(stdout.contains("--version"));
}

#[test]
fn unknown_arg_fails_with_message() {
    let state = tempdir().unwrap();
    let output = overseerd_cmd(state.path()).arg("--bogus").output().unwrap();
    assert!(!output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("unexpected argument"), "got: {stderr}");
}
