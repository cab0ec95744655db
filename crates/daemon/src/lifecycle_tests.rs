use super::*;
use tempfile::tempdir;

#[test]
fn acquires_lock_and_writes_pid() {
    let dir = tempdir().unwrap();
    let lock_path = dir.path().join("state").join("overseer.lock");

    let lock = acquire(&lock_path).unwrap();
    assert_eq!(lock.path, lock_path);
    let contents = std::fs::read_to_string(&lock_path).unwrap();
    assert_eq!(contents.trim(), std::process::id().to_string());
}

#[test]
fn second_acquire_on_same_path_fails_while_first_is_held() {
    let dir = tempdir().unwrap();
    let lock_path = dir.path().join("overseer.lock");

    let _first = acquire(&lock_path).unwrap();
    let second = acquire(&lock_path);
    assert!(matches!(second, Err(LifecycleError::LockHeld(_))));
}

#[test]
fn lock_is_released_on_drop_and_can_be_reacquired() {
    let dir = tempdir().unwrap();
    let lock_path = dir.path().join("overseer.lock");

    {
        let _lock = acquire(&lock_path).unwrap();
    }
    let reacquired = acquire(&lock_path);
    assert!(reacquired.is_ok());
}
