//! overseerd single-instance lock specs.

use crate::prelude::*;
use std::process::Stdio;
use tempfile::tempdir;

#[test]
fn second_instance_fails_while_first_holds_the_lock() {
    let state = tempdir().unwrap();
    let lock_path = state.path().join("overseerd.lock");

    let mut first = overseerd_cmd(state.path())
        .stdout(Stdio::null())
        .stderr(Stdio::null())
        .spawn()
        .expect("overseerd should start");

    let locked = wait_for(2000, || lock_path.exists());
    assert!(locked, "lock file should appear once the daemon starts");

    let second = overseerd_cmd(state.path()).output().expect("overseerd should run");
    assert!(!second.status.success(), "second instance must not start");
    let stderr = String::from_utf8_lossy(&second.stderr);
    assert!(stderr.contains("already running"), "got: {stderr}");

    first.kill().expect("should be able to kill the first instance");
    let _ = first.wait();
}

#[test]
fn a_new_instance_can_start_after_the_previous_one_exits() {
    let state = tempdir().unwrap();
    let lock_path = state.path().join("overseerd.lock");

    let mut first = overseerd_cmd(state.path())
        .stdout(Stdio::null())
        .stderr(Stdio::null())
        .spawn()
        .expect("overseerd should start");
    assert!(wait_for(2000, || lock_path.exists()));

    first.kill().expect("should be able to kill the first instance");
    let _ = first.wait();

    let mut second = overseerd_cmd(state.path())
        .stdout(Stdio::null())
        .stderr(Stdio::null())
        .spawn()
        .expect("overseerd should restart");
    assert!(wait_for(2000, || lock_path.exists()));

    second.kill().expect("should be able to kill the second instance");
    let _ = second.wait();
}
