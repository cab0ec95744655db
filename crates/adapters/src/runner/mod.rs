// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Runner framework: drives a subprocess, reads its structured stdout
//! stream, and translates it into the canonical event stream every backend
//! exposes. Backend polymorphism is a value (`BackendRuntime`), not a
//! subclass hierarchy — see module docs on `backends`.

pub mod backends;
mod subprocess;
mod tool_actions;

pub use subprocess::{spawn_backend_process, SpawnedProcess};
pub use tool_actions::{single_file_change, tool_input_path, tool_kind_and_title};

use crate::decode::{decode_line, DecodeError, Record};
use overseer_core::{Action, ActionKind, ActionPhase, Event, ResumeToken};
use std::collections::HashMap;
use thiserror::Error;
use tokio::sync::mpsc;

/// Failures a backend runner can hit while driving its subprocess. Never
/// escapes the runner boundary — `run` always converts these into a
/// terminal `completed(ok=false, ...)` event.
#[derive(Debug, Error)]
pub enum RunError {
    #[error("resume token engine {found:?} does not match runner engine {expected:?}")]
    ResumeEngineMismatch { expected: String, found: String },
    #[error("failed to spawn {engine} subprocess: {message}")]
    SpawnFailed { engine: String, message: String },
    #[error("{engine} failed (rc={code}).")]
    NonZeroExit { engine: String, code: i32 },
    #[error("{engine} finished but no session_id was captured")]
    NoSessionCaptured { engine: String },
}

/// Per-run mutable state threaded through decode/translate calls. Generic
/// over nothing — backends stash whatever extra state they need in
/// `backend_state` via `new_state`.
pub struct RunState {
    pub pending_actions: HashMap<String, Action>,
    pub last_assistant_text: String,
    pub did_start: bool,
    pub session_id: Option<String>,
    pub found_resume: Option<ResumeToken>,
}

impl RunState {
    pub fn new() -> Self {
        Self {
            pending_actions: HashMap::new(),
            last_assistant_text: String::new(),
            did_start: false,
            session_id: None,
            found_resume: None,
        }
    }
}

impl Default for RunState {
    fn default() -> Self {
        Self::new()
    }
}

/// The "capability record" each backend provides: a set of function
/// pointers rather than a trait-object hierarchy, per the supervisor's
/// dynamic-dispatch design. Backends are values.
pub struct BackendRuntime {
    pub engine: &'static str,
    pub install_hint: &'static str,
    pub format_resume: fn(&ResumeToken) -> Result<String, RunError>,
    pub extract_resume: fn(&str) -> Option<ResumeToken>,
    pub build_argv: fn(prompt: &str, resume: Option<&ResumeToken>) -> Vec<String>,
    pub decode_line: fn(&str) -> Result<Record, DecodeError>,
    pub translate: fn(record: Record, state: &mut RunState) -> Vec<Event>,
    pub stream_end_events: fn(state: &mut RunState) -> Vec<Event>,
    pub on_nonzero_exit: fn(code: i32, state: &mut RunState) -> Vec<Event>,
}

impl BackendRuntime {
    /// Run a subprocess end-to-end per the canonical lifecycle: compose
    /// argv, spawn, stream stdout line by line through `decode_line` and
    /// `translate`, and emit a terminal `completed` derived from whichever
    /// path the stream took (backend-emitted, synthesized at EOF, or
    /// synthesized on non-zero exit).
    pub async fn run(
        &self,
        prompt: &str,
        resume: Option<ResumeToken>,
        events: mpsc::Sender<Event>,
    ) -> Result<(), RunError> {
        if let Some(ref token) = resume {
            if token.engine != self.engine {
                return Err(RunError::ResumeEngineMismatch {
                    expected: self.engine.to_string(),
                    found: token.engine.clone(),
                });
            }
        }

        let argv = (self.build_argv)(prompt, resume.as_ref());
        let mut process = spawn_backend_process(self.engine, &argv)
            .await
            .map_err(|e| RunError::SpawnFailed {
                engine: self.engine.to_string(),
                message: e.to_string(),
            })?;

        let mut state = RunState::new();
        let mut saw_completed = false;

        while let Some(line) = process.next_line().await {
            let line = line.trim();
            if line.is_empty() {
                continue;
            }
            match (self.decode_line)(line) {
                Ok(record) => {
                    for event in (self.translate)(record, &mut state) {
                        if matches!(event, Event::Completed { .. }) {
                            saw_completed = true;
                        }
                        let _ = events.send(event).await;
                    }
                }
                Err(e) => {
                    tracing::warn!(engine = self.engine, error = %e, "runner.decode.dropped_line");
                }
            }
        }

        let exit_code = process.wait().await;

        if !saw_completed {
            if let Some(code) = exit_code {
                if code != 0 {
                    let note = Event::Action {
                        engine: self.engine.to_string(),
                        action: Action::new(
                            format!("{}-exit-warning", self.engine),
                            ActionKind::Warning,
                            format!("{} exited with code {code}", self.engine),
                        ),
                        phase: ActionPhase::Completed,
                        ok: Some(false),
                        message: None,
                        level: Some(overseer_core::ActionLevel::Warning),
                    };
                    let _ = events.send(note).await;
                    for event in (self.on_nonzero_exit)(code, &mut state) {
                        let _ = events.send(event).await;
                    }
                    return Ok(());
                }
            }
            for event in (self.stream_end_events)(&mut state) {
                let _ = events.send(event).await;
            }
        }

        Ok(())
    }
}

#[cfg(test)]
#[path = "mod_tests.rs"]
mod tests;
