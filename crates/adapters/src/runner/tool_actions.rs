// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Shared tool-call classification used by every JSONL backend: maps a raw
//! tool name and its parsed arguments onto an [`ActionKind`] and title.

use overseer_core::{ActionKind, FileChange, FileChangeKind};
use serde_json::Value;

const COMMAND_TOOLS: &[&str] = &["shell", "bash", "exec", "run_command", "runcommand"];
const FILE_CHANGE_TOOLS: &[&str] = &["write", "edit", "write_file", "edit_file", "patch"];
const WEB_SEARCH_TOOLS: &[&str] = &["websearch", "web_search", "search"];
const SUBAGENT_TOOLS: &[&str] = &["task", "subagent", "dispatch_agent"];

/// Classify a tool call by name, returning the action kind and a
/// human-readable title. `path_keys` names the argument keys that might
/// carry a file path, tried in order.
pub fn tool_kind_and_title(
    name: &str,
    input: &serde_json::Map<String, Value>,
    path_keys: &[&str],
) -> (ActionKind, String) {
    let lower = name.to_ascii_lowercase();

    if COMMAND_TOOLS.contains(&lower.as_str()) {
        let command = input
            .get("command")
            .and_then(Value::as_str)
            .unwrap_or(name);
        return (ActionKind::Command, command.to_string());
    }

    if FILE_CHANGE_TOOLS.contains(&lower.as_str()) {
        let title = match tool_input_path(input, path_keys) {
            Some(path) => format!("{name} {path}"),
            None => name.to_string(),
        };
        return (ActionKind::FileChange, title);
    }

    if WEB_SEARCH_TOOLS.contains(&lower.as_str()) {
        let query = input.get("query").and_then(Value::as_str).unwrap_or(name);
        return (ActionKind::WebSearch, query.to_string());
    }

    if SUBAGENT_TOOLS.contains(&lower.as_str()) {
        return (ActionKind::Subagent, name.to_string());
    }

    (ActionKind::Tool, name.to_string())
}

/// Look up the first present path-like key among `path_keys` in `input`.
pub fn tool_input_path(input: &serde_json::Map<String, Value>, path_keys: &[&str]) -> Option<String> {
    path_keys
        .iter()
        .find_map(|key| input.get(*key).and_then(Value::as_str).map(str::to_string))
}

/// A single-entry `file_change` detail for a tool call whose arguments name
/// exactly one target path. Always `update`: the distilled JSON tool-call
/// stream has no reliable create/delete signal of its own.
pub fn single_file_change(path: impl Into<String>) -> Vec<FileChange> {
    vec![FileChange {
        path: path.into(),
        kind: FileChangeKind::Update,
    }]
}

#[cfg(test)]
#[path = "tool_actions_tests.rs"]
mod tests;
