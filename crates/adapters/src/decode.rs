// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Structured-output decoder: turns one line of a backend's line-delimited
//! JSON stream into a tagged [`Record`]. Invalid JSON is a recoverable
//! decode error, never fatal to the run.

use serde::Deserialize;
use thiserror::Error;

/// One parsed tool call inside an `assistant` record.
#[derive(Debug, Clone, Deserialize)]
pub struct ToolCall {
    pub id: String,
    #[serde(default)]
    pub r#type: Option<String>,
    pub function: ToolCallFunction,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ToolCallFunction {
    pub name: String,
    /// JSON-encoded argument string; parsed lazily by the backend
    /// translator, not here.
    #[serde(default)]
    pub arguments: String,
}

/// Content of a `tool` record, which a backend may emit as a bare string or
/// as a list of content-block objects.
#[derive(Debug, Clone)]
pub enum ToolContent {
    Text(String),
    Blocks(Vec<serde_json::Value>),
}

impl<'de> Deserialize<'de> for ToolContent {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let value = serde_json::Value::deserialize(deserializer)?;
        match value {
            serde_json::Value::String(s) => Ok(ToolContent::Text(s)),
            serde_json::Value::Array(items) => Ok(ToolContent::Blocks(items)),
            other => Ok(ToolContent::Text(other.to_string())),
        }
    }
}

impl ToolContent {
    pub fn as_text(&self) -> String {
        match self {
            ToolContent::Text(s) => s.clone(),
            ToolContent::Blocks(items) => items
                .iter()
                .filter_map(|v| v.get("text").and_then(|t| t.as_str()))
                .collect::<Vec<_>>()
                .join("\n"),
        }
    }
}

/// One line of a backend's structured stdout stream, tagged by `role` (the
/// common case) or a backend-specific `type` field.
#[derive(Debug, Clone, Deserialize)]
#[serde(tag = "role", rename_all = "snake_case")]
pub enum Record {
    Assistant {
        #[serde(default)]
        content: Option<String>,
        #[serde(default)]
        tool_calls: Option<Vec<ToolCall>>,
        #[serde(default)]
        session_id: Option<String>,
    },
    Tool {
        tool_call_id: String,
        content: ToolContent,
        #[serde(default)]
        is_error: Option<bool>,
    },
    User {
        #[serde(default)]
        content: Option<String>,
    },
    System {
        #[serde(default)]
        subtype: Option<String>,
        #[serde(flatten)]
        extra: serde_json::Value,
    },
}

/// Raised when a line cannot be parsed into any known [`Record`] shape.
/// Carries the offending line for logging; the runner drops the line and
/// continues.
#[derive(Debug, Error)]
#[error("failed to decode structured output line: {message} (line: {line:?})")]
pub struct DecodeError {
    pub line: String,
    pub message: String,
}

/// Decode one line of line-delimited JSON into a [`Record`]. Blank lines
/// are not valid input; callers should filter them before calling this.
pub fn decode_line(line: &str) -> Result<Record, DecodeError> {
    serde_json::from_str(line).map_err(|e| DecodeError {
        line: line.to_string(),
        message: e.to_string(),
    })
}

#[cfg(test)]
#[path = "decode_tests.rs"]
mod tests;
