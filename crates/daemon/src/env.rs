// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Centralized environment variable access for the daemon crate.

use std::path::PathBuf;

use crate::lifecycle::LifecycleError;

/// Resolve state directory: OVERSEER_STATE_DIR > XDG_STATE_HOME/overseer > ~/.local/state/overseer
pub fn state_dir() -> Result<PathBuf, LifecycleError> {
    if let Ok(dir) = std::env::var("OVERSEER_STATE_DIR") {
        return Ok(PathBuf::from(dir));
    }
    if let Ok(xdg) = std::env::var("XDG_STATE_HOME") {
        return Ok(PathBuf::from(xdg).join("overseer"));
    }
    let home = std::env::var("HOME").map_err(|_| LifecycleError::NoHomeDir)?;
    Ok(PathBuf::from(home).join(".local/state/overseer"))
}

/// Coordination folder override, used by liaisons when running multiple
/// instances against a shared task: OVERSEER_COORDINATION_DIR > <state_dir>/coordination
pub fn coordination_dir() -> Result<PathBuf, LifecycleError> {
    if let Ok(dir) = std::env::var("OVERSEER_COORDINATION_DIR") {
        return Ok(PathBuf::from(dir));
    }
    Ok(state_dir()?.join("coordination"))
}
