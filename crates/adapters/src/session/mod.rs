// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Terminal multiplexer session adapters. The liaison orchestrator owns a
//! `SessionAdapter` and drives it to spawn panes, capture their output, and
//! tear them down.

mod noop;
mod tmux;

pub use noop::NoOpSessionAdapter;
pub use tmux::TmuxAdapter;

use async_trait::async_trait;
use std::path::Path;
use thiserror::Error;

/// Errors from session operations.
#[derive(Debug, Error)]
pub enum SessionError {
    #[error("session not found: {0}")]
    NotFound(String),
    #[error("spawn failed: {0}")]
    SpawnFailed(String),
    #[error("command failed: {0}")]
    CommandFailed(String),
}

/// Adapter for managing terminal-multiplexer sessions that host agent CLIs.
#[async_trait]
pub trait SessionAdapter: Clone + Send + Sync + 'static {
    async fn spawn(
        &self,
        name: &str,
        cwd: &Path,
        cmd: &str,
        env: &[(String, String)],
    ) -> Result<String, SessionError>;

    async fn send(&self, id: &str, input: &str) -> Result<(), SessionError>;

    async fn send_literal(&self, id: &str, text: &str) -> Result<(), SessionError>;

    async fn send_enter(&self, id: &str) -> Result<(), SessionError>;

    async fn kill(&self, id: &str) -> Result<(), SessionError>;

    async fn is_alive(&self, id: &str) -> Result<bool, SessionError>;

    async fn capture_output(&self, id: &str, lines: u32) -> Result<String, SessionError>;

    async fn is_process_running(&self, id: &str, pattern: &str) -> Result<bool, SessionError>;

    async fn get_exit_code(&self, id: &str) -> Result<Option<i32>, SessionError>;
}

#[cfg(any(test, feature = "test-support"))]
mod fake;
#[cfg(any(test, feature = "test-support"))]
pub use fake::{FakeSession, FakeSessionAdapter, SessionCall};
