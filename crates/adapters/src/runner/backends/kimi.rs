// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Kimi Code CLI backend: `kimi --print --output-format stream-json`.
//! Kimi never emits its own resume line or a terminal result record, so
//! this backend synthesizes both the session id and the `completed` event.

use crate::decode::{Record, ToolCall};
use crate::runner::{single_file_change, tool_kind_and_title, BackendRuntime, RunError, RunState};
use overseer_core::{Action, ActionKind, ActionLevel, ActionPhase, Event, ResumeToken};
use regex::Regex;
use std::sync::OnceLock;

pub const ENGINE: &str = "kimi";

fn resume_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"(?im)^\s*`?kimi\s+(?:--session|-S)\s+(?P<token>\S+)`?\s*$").unwrap()
    })
}

fn format_resume(token: &ResumeToken) -> Result<String, RunError> {
    if token.engine != ENGINE {
        return Err(RunError::ResumeEngineMismatch {
            expected: ENGINE.to_string(),
            found: token.engine.clone(),
        });
    }
    Ok(format!("`kimi --session {}`", token.value))
}

fn extract_resume(line: &str) -> Option<ResumeToken> {
    resume_re()
        .captures(line)
        .map(|c| ResumeToken::new(ENGINE, c.name("token").unwrap().as_str()))
}

fn build_argv(prompt: &str, resume: Option<&ResumeToken>) -> Vec<String> {
    let mut args = vec![
        "kimi".to_string(),
        "--print".to_string(),
        "--output-format".to_string(),
        "stream-json".to_string(),
    ];
    if let Some(token) = resume {
        args.push("--session".to_string());
        args.push(token.value.clone());
    }
    args.push("-p".to_string());
    args.push(prompt.to_string());
    args
}

fn decode_line(line: &str) -> Result<Record, crate::decode::DecodeError> {
    crate::decode::decode_line(line)
}

fn parse_tool_arguments(arguments: &str) -> serde_json::Map<String, serde_json::Value> {
    serde_json::from_str::<serde_json::Value>(arguments)
        .ok()
        .and_then(|v| v.as_object().cloned())
        .unwrap_or_default()
}

fn tool_action(call: &ToolCall) -> Action {
    let input = parse_tool_arguments(&call.function.arguments);
    let (kind, title) = tool_kind_and_title(&call.function.name, &input, &["file_path", "path"]);

    let mut action = Action::new(call.id.clone(), kind, title);
    action = action.with_detail("name", serde_json::Value::String(call.function.name.clone()));
    action = action.with_detail("input", serde_json::Value::Object(input.clone()));

    if kind == ActionKind::FileChange {
        if let Some(path) = input
            .get("file_path")
            .or_else(|| input.get("path"))
            .and_then(|v| v.as_str())
        {
            let changes = single_file_change(path);
            action = action.with_detail("changes", serde_json::to_value(changes).unwrap());
        }
    }

    action
}

fn translate(record: Record, state: &mut RunState) -> Vec<Event> {
    match record {
        Record::Assistant {
            content,
            tool_calls,
            session_id,
        } => {
            let mut out = Vec::new();

            if !state.did_start {
                state.did_start = true;
                let session = session_id
                    .or_else(|| state.session_id.clone())
                    .unwrap_or_else(|| uuid::Uuid::new_v4().to_string());
                state.session_id = Some(session.clone());
                out.push(Event::Started {
                    engine: ENGINE.to_string(),
                    resume: ResumeToken::new(ENGINE, session),
                    title: Some(ENGINE.to_string()),
                    meta: None,
                });
            }

            if let Some(text) = content {
                if !text.is_empty() {
                    state.last_assistant_text = text;
                }
            }

            if let Some(calls) = tool_calls {
                for call in &calls {
                    let action = tool_action(call);
                    state.pending_actions.insert(action.id.clone(), action.clone());
                    out.push(Event::Action {
                        engine: ENGINE.to_string(),
                        action,
                        phase: ActionPhase::Started,
                        ok: None,
                        message: None,
                        level: None,
                    });
                }
            }

            out
        }
        Record::Tool {
            tool_call_id,
            content,
            is_error,
        } => {
            let action = state.pending_actions.remove(&tool_call_id).unwrap_or_else(|| {
                Action::new(tool_call_id.clone(), ActionKind::Tool, "tool result")
            });
            let ok = !is_error.unwrap_or(false);
            let preview = content.as_text();
            let completed = action
                .with_detail("tool_use_id", serde_json::Value::String(tool_call_id.clone()))
                .with_detail("result_preview", serde_json::Value::String(preview.clone()))
                .with_detail("result_len", serde_json::Value::from(preview.len()))
                .with_detail("is_error", serde_json::Value::Bool(!ok));
            vec![Event::Action {
                engine: ENGINE.to_string(),
                action: completed,
                phase: ActionPhase::Completed,
                ok: Some(ok),
                message: None,
                level: if ok { None } else { Some(ActionLevel::Error) },
            }]
        }
        Record::User { .. } | Record::System { .. } => Vec::new(),
    }
}

fn stream_end_events(state: &mut RunState) -> Vec<Event> {
    if !state.last_assistant_text.is_empty() {
        let resume = state
            .session_id
            .clone()
            .map(|id| ResumeToken::new(ENGINE, id));
        return vec![Event::Completed {
            engine: ENGINE.to_string(),
            ok: true,
            answer: state.last_assistant_text.clone(),
            resume,
            error: None,
            usage: None,
        }];
    }

    if state.session_id.is_none() {
        return vec![Event::Completed {
            engine: ENGINE.to_string(),
            ok: false,
            answer: String::new(),
            resume: None,
            error: Some("kimi finished but no session_id was captured".to_string()),
            usage: None,
        }];
    }

    vec![Event::Completed {
        engine: ENGINE.to_string(),
        ok: false,
        answer: String::new(),
        resume: state.session_id.clone().map(|id| ResumeToken::new(ENGINE, id)),
        error: Some("kimi finished without a result".to_string()),
        usage: None,
    }]
}

fn on_nonzero_exit(code: i32, state: &mut RunState) -> Vec<Event> {
    let message = format!("kimi failed (rc={code}).");
    let resume = state
        .session_id
        .clone()
        .map(|id| ResumeToken::new(ENGINE, id));
    vec![Event::Completed {
        engine: ENGINE.to_string(),
        ok: false,
        answer: String::new(),
        resume,
        error: Some(message),
        usage: None,
    }]
}

pub static RUNTIME: BackendRuntime = BackendRuntime {
    engine: ENGINE,
    install_hint: "curl -LsSf https://code.kimi.com/install.sh | bash",
    format_resume,
    extract_resume,
    build_argv,
    decode_line,
    translate,
    stream_end_events,
    on_nonzero_exit,
};

#[cfg(test)]
#[path = "kimi_tests.rs"]
mod tests;
