// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

// Allow panic!/unwrap/expect in test code
#![cfg_attr(test, allow(clippy::panic))]
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]

//! Adapters for external I/O: subprocess-driven runner backends, the
//! tmux-pane-driven liaison orchestrator, the inter-liaison coordination
//! folder, and the terminal multiplexer sessions both ride on.

pub mod coordinator;
pub mod decode;
pub mod liaison;
pub mod runner;
pub mod session;

pub use coordinator::{Coordinator, CoordinatorError};
pub use decode::{decode_line, DecodeError, Record, ToolCall, ToolCallFunction, ToolContent};
pub use liaison::{LiaisonConfig, LiaisonError, LiaisonRunner};
pub use runner::{spawn_backend_process, BackendRuntime, RunError, RunState, SpawnedProcess};
pub use session::{NoOpSessionAdapter, SessionAdapter, SessionError, TmuxAdapter};

#[cfg(any(test, feature = "test-support"))]
pub use session::{FakeSession, FakeSessionAdapter, SessionCall};
