// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Error types surfaced by the engine crate boundary.

use thiserror::Error;

/// Errors that can occur wiring and driving a run through the supervisor.
#[derive(Debug, Error)]
pub enum EngineError {
    #[error("no backend registered for engine {0:?}")]
    UnknownEngine(String),
    #[error("transport error: {0}")]
    Transport(String),
}
