// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Single-instance lock: acquired before anything else so two daemons never
//! race on the same state directory.

use fs2::FileExt;
use std::fs::File;
use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum LifecycleError {
    #[error("another daemon already holds the lock at {0}")]
    LockHeld(PathBuf),
    #[error("I/O error acquiring lock: {0}")]
    Io(#[from] std::io::Error),
    #[error("could not determine a home directory")]
    NoHomeDir,
    #[error("log path has no parent directory")]
    NoLogDir,
}

/// Holds the exclusive lock on `lock_path` for as long as this value lives.
/// The lock is released implicitly when the file descriptor closes (process
/// exit or drop).
pub struct InstanceLock {
    _file: File,
    pub path: PathBuf,
}

/// Acquire the single-instance lock, writing this process's pid into the
/// lock file once it's held. Returns [`LifecycleError::LockHeld`] rather
/// than blocking — exactly one daemon should ever run per state directory.
pub fn acquire(lock_path: &Path) -> Result<InstanceLock, LifecycleError> {
    if let Some(parent) = lock_path.parent() {
        std::fs::create_dir_all(parent)?;
    }

    let file = std::fs::OpenOptions::new()
        .write(true)
        .create(true)
        .truncate(false)
        .open(lock_path)?;

    file.try_lock_exclusive()
        .map_err(|_| LifecycleError::LockHeld(lock_path.to_path_buf()))?;

    file.set_len(0)?;
    use std::io::Write;
    let mut file = file;
    writeln!(file, "{}", std::process::id())?;

    Ok(InstanceLock {
        _file: file,
        path: lock_path.to_path_buf(),
    })
}

#[cfg(test)]
#[path = "lifecycle_tests.rs"]
mod tests;
