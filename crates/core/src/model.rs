// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Canonical event model shared by every backend runner.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use thiserror::Error;

/// Raised when a canonical event stream is malformed, e.g. an
/// `input_response` whose `request_id` was never seen in an
/// `input_request`, or a resume token whose engine doesn't match the
/// runner emitting it. Consumed for logging; never escapes a runner.
#[derive(Debug, Error)]
pub enum EventError {
    #[error("resume token engine {found:?} does not match runner engine {expected:?}")]
    ResumeEngineMismatch { expected: String, found: String },
    #[error("input_response request_id {0:?} was never seen in an input_request")]
    UnknownRequestId(String),
}

/// Opaque engine-tagged identifier sufficient to reattach to a previous
/// agent session.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResumeToken {
    pub engine: String,
    pub value: String,
}

impl ResumeToken {
    pub fn new(engine: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            engine: engine.into(),
            value: value.into(),
        }
    }
}

/// What an `Action` represents; drives how the tracker classifies it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ActionKind {
    Command,
    Tool,
    FileChange,
    WebSearch,
    Subagent,
    Note,
    Turn,
    Warning,
    Telemetry,
    PaneActivity,
}

/// How a file was touched by a `file_change` action.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FileChangeKind {
    Create,
    Update,
    Delete,
}

/// One entry in a `file_change` action's `detail.changes` list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FileChange {
    pub path: String,
    pub kind: FileChangeKind,
}

/// Free-form key/value detail map attached to an action or event.
pub type Detail = BTreeMap<String, serde_json::Value>;

/// Immutable record describing one unit of agent work.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Action {
    pub id: String,
    pub kind: ActionKind,
    pub title: String,
    #[serde(default)]
    pub detail: Detail,
}

impl Action {
    pub fn new(id: impl Into<String>, kind: ActionKind, title: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            kind,
            title: title.into(),
            detail: Detail::new(),
        }
    }

    pub fn with_detail(mut self, key: impl Into<String>, value: serde_json::Value) -> Self {
        self.detail.insert(key.into(), value);
        self
    }
}

/// Lifecycle phase of an `action` event.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ActionPhase {
    Started,
    Updated,
    Completed,
}

/// Severity annotation carried by some `action` events (notes, warnings).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ActionLevel {
    Info,
    Warning,
    Error,
}

/// Who is being asked to answer an `input_request`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum InputRequestSource {
    Subagent,
    Liaison,
}

/// Escalation urgency assigned to an `input_request`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Urgency {
    Low,
    Normal,
    High,
    Critical,
}

/// Who produced an `input_response`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Responder {
    User,
    Liaison,
    Timeout,
}

/// A set of selectable options offered alongside an `input_request`.
pub type InputOptions = Vec<String>;

/// Resource usage reported alongside a `completed` event, if the backend
/// provides it. Kept as a passthrough map since shape varies per backend.
pub type Usage = BTreeMap<String, serde_json::Value>;

/// The canonical event stream every runner emits. A single run's stream
/// matches `started (action | input_request | input_response)* completed`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Event {
    Started {
        engine: String,
        resume: ResumeToken,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        title: Option<String>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        meta: Option<serde_json::Value>,
    },
    Action {
        engine: String,
        action: Action,
        phase: ActionPhase,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        ok: Option<bool>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        message: Option<String>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        level: Option<ActionLevel>,
    },
    Completed {
        engine: String,
        ok: bool,
        answer: String,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        resume: Option<ResumeToken>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        error: Option<String>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        usage: Option<Usage>,
    },
    InputRequest {
        engine: String,
        request_id: String,
        question: String,
        source: InputRequestSource,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        context: Option<String>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        options: Option<InputOptions>,
        urgency: Urgency,
    },
    InputResponse {
        engine: String,
        request_id: String,
        response: String,
        responder: Responder,
    },
}

impl Event {
    pub fn engine(&self) -> &str {
        match self {
            Event::Started { engine, .. }
            | Event::Action { engine, .. }
            | Event::Completed { engine, .. }
            | Event::InputRequest { engine, .. }
            | Event::InputResponse { engine, .. } => engine,
        }
    }

    pub fn is_started(&self) -> bool {
        matches!(self, Event::Started { .. })
    }

    pub fn is_completed(&self) -> bool {
        matches!(self, Event::Completed { .. })
    }
}

#[cfg(test)]
#[path = "model_tests.rs"]
mod tests;
