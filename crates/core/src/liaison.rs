// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Liaison session graph: the on-disk shape a liaison run persists so a
//! future invocation can resume it by `session_id`.

use serde::{Deserialize, Serialize};

/// Role a pane plays within a liaison's tmux session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PaneRole {
    Liaison,
    Worker,
}

/// One pane inside a liaison's terminal-multiplexer session.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PaneInfo {
    pub pane_id: String,
    pub session_name: String,
    pub window_index: u32,
    pub pane_index: u32,
    pub engine: String,
    pub role: PaneRole,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub subagent_resume: Option<String>,
    #[serde(default)]
    pub last_capture_hash: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pending_input_request: Option<String>,
}

impl PaneInfo {
    pub fn new(
        pane_id: impl Into<String>,
        session_name: impl Into<String>,
        engine: impl Into<String>,
        role: PaneRole,
    ) -> Self {
        Self {
            pane_id: pane_id.into(),
            session_name: session_name.into(),
            window_index: 0,
            pane_index: 0,
            engine: engine.into(),
            role,
            subagent_resume: None,
            last_capture_hash: None,
            pending_input_request: None,
        }
    }
}

/// Persisted graph of a liaison run; written to
/// `sessions/<session_id>.json` and read back on resume.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SessionGraph {
    pub session_id: String,
    pub tmux_session: String,
    pub panes: Vec<PaneInfo>,
    pub coordination_folder: String,
    pub created_at: u64,
}

impl SessionGraph {
    pub fn new(
        session_id: impl Into<String>,
        tmux_session: impl Into<String>,
        coordination_folder: impl Into<String>,
        created_at: u64,
    ) -> Self {
        Self {
            session_id: session_id.into(),
            tmux_session: tmux_session.into(),
            panes: Vec::new(),
            coordination_folder: coordination_folder.into(),
            created_at,
        }
    }

    pub fn pane_with_pending(&self, request_id: &str) -> Option<&PaneInfo> {
        self.panes
            .iter()
            .find(|p| p.pending_input_request.as_deref() == Some(request_id))
    }

    pub fn pane_with_pending_mut(&mut self, request_id: &str) -> Option<&mut PaneInfo> {
        self.panes
            .iter_mut()
            .find(|p| p.pending_input_request.as_deref() == Some(request_id))
    }
}

#[cfg(test)]
#[path = "liaison_tests.rs"]
mod tests;
