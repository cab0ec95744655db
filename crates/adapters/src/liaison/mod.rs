// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Liaison: a backend whose "agent" is itself a coding-agent CLI running
//! inside a terminal-multiplexer pane, supervised by this runner rather
//! than by a JSONL subprocess loop. Ignores the runner framework's
//! subprocess hooks entirely and drives its own pane-polling loop, per the
//! outward contract both share.

mod prompt;
mod questions;

use crate::session::{SessionAdapter, SessionError};
use overseer_core::{
    Action, ActionKind, ActionLevel, ActionPhase, Event, InputRequestSource, PaneInfo, PaneRole,
    ResumeToken, Responder, SessionGraph, Urgency,
};
use std::collections::HashMap;
use std::collections::hash_map::DefaultHasher;
use std::hash::{Hash, Hasher};
use std::path::PathBuf;
use std::time::Duration;
use thiserror::Error;
use tokio::sync::mpsc;

pub const ENGINE: &str = "liaison";

#[derive(Debug, Error)]
pub enum LiaisonError {
    #[error("resume token engine {found:?} does not match runner engine {expected:?}")]
    ResumeEngineMismatch { expected: String, found: String },
}

/// Tunables for one liaison runner instance. `captains_chair` decides
/// between the two behaviors left open by the source implementation:
/// `true` keeps the brain pane alive across completion markers (it only
/// ends on an explicit cancel); `false` treats the first completion marker
/// as the end of the run, like every other backend.
pub struct LiaisonConfig {
    pub coordination_folder: PathBuf,
    pub poll_interval: Duration,
    pub capture_lines: u32,
    pub escalation_policy: overseer_core::EscalationPolicy,
    pub captains_chair: bool,
    pub liaison_cmd: String,
    pub max_idle_iterations: u64,
}

impl Default for LiaisonConfig {
    fn default() -> Self {
        Self {
            coordination_folder: dirs::home_dir()
                .unwrap_or_else(|| PathBuf::from("."))
                .join(".takopi")
                .join("liaison"),
            poll_interval: Duration::from_millis(500),
            capture_lines: 50,
            escalation_policy: overseer_core::EscalationPolicy::default(),
            captains_chair: true,
            liaison_cmd: "claude".to_string(),
            max_idle_iterations: 3600,
        }
    }
}

struct RunState {
    session_id: String,
    graph: SessionGraph,
    pending_requests: HashMap<String, Event>,
    note_seq: u64,
    request_seq: u64,
    completed: bool,
    final_answer: String,
}

fn format_resume(token: &ResumeToken) -> Result<String, LiaisonError> {
    if token.engine != ENGINE {
        return Err(LiaisonError::ResumeEngineMismatch {
            expected: ENGINE.to_string(),
            found: token.engine.clone(),
        });
    }
    Ok(format!("`liaison --session {}`", token.value))
}

fn extract_resume(line: &str) -> Option<ResumeToken> {
    use regex::Regex;
    use std::sync::OnceLock;
    static RE: OnceLock<Regex> = OnceLock::new();
    let re = RE.get_or_init(|| {
        Regex::new(r"(?im)^\s*`?liaison\s+--session\s+(?P<token>\S+)`?\s*$").unwrap()
    });
    re.captures(line)
        .map(|c| ResumeToken::new(ENGINE, c.name("token").unwrap().as_str()))
}

fn generate_session_id() -> String {
    use overseer_core::id::IdGen;
    format!("liaison_{}", overseer_core::id::RandomIdGen.next())
}

fn now_ms() -> u64 {
    std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .map(|d| d.as_millis() as u64)
        .unwrap_or(0)
}

/// Runs one liaison session against a [`SessionAdapter`]-backed terminal
/// multiplexer. Generic over the adapter so tests can drive it against
/// `FakeSessionAdapter` instead of real `tmux`.
pub struct LiaisonRunner<S: SessionAdapter> {
    sessions: S,
    config: LiaisonConfig,
}

impl<S: SessionAdapter> LiaisonRunner<S> {
    pub fn new(sessions: S, config: LiaisonConfig) -> Self {
        Self { sessions, config }
    }

    pub fn format_resume(&self, token: &ResumeToken) -> Result<String, LiaisonError> {
        format_resume(token)
    }

    pub fn extract_resume(&self, line: &str) -> Option<ResumeToken> {
        extract_resume(line)
    }

    /// Run the liaison end to end: start or resume a tmux session, spawn
    /// the orchestrating brain pane, then poll panes until the run
    /// completes (or, in captain's-chair mode, until cancelled from
    /// outside — `events` closing is this runner's only cancellation
    /// signal, since the caller drops the channel to cancel).
    pub async fn run(
        &self,
        prompt: &str,
        resume: Option<ResumeToken>,
        events: mpsc::Sender<Event>,
    ) -> Result<(), LiaisonError> {
        if let Some(ref token) = resume {
            if token.engine != ENGINE {
                return Err(LiaisonError::ResumeEngineMismatch {
                    expected: ENGINE.to_string(),
                    found: token.engine.clone(),
                });
            }
        }

        self.ensure_folders().await;

        let mut state = match resume {
            Some(token) => match self.restore_session(&token.value).await {
                Some(graph) => RunState {
                    session_id: token.value.clone(),
                    graph,
                    pending_requests: HashMap::new(),
                    note_seq: 0,
                    request_seq: 0,
                    completed: false,
                    final_answer: String::new(),
                },
                None => {
                    let _ = events
                        .send(Event::Completed {
                            engine: ENGINE.to_string(),
                            ok: false,
                            answer: String::new(),
                            resume: Some(token.clone()),
                            error: Some(format!(
                                "Failed to restore liaison session {}",
                                token.value
                            )),
                            usage: None,
                        })
                        .await;
                    return Ok(());
                }
            },
            None => {
                let session_id = generate_session_id();
                match self
                    .sessions
                    .spawn(&session_id, std::path::Path::new("."), "true", &[])
                    .await
                {
                    Ok(spawned) => RunState {
                        session_id: session_id.clone(),
                        graph: SessionGraph::new(
                            session_id,
                            spawned,
                            self.config.coordination_folder.to_string_lossy(),
                            now_ms(),
                        ),
                        pending_requests: HashMap::new(),
                        note_seq: 0,
                        request_seq: 0,
                        completed: false,
                        final_answer: String::new(),
                    },
                    Err(e) => {
                        let _ = events
                            .send(Event::Completed {
                                engine: ENGINE.to_string(),
                                ok: false,
                                answer: String::new(),
                                resume: None,
                                error: Some(format!("Failed to create tmux session: {e}")),
                                usage: None,
                            })
                            .await;
                        return Ok(());
                    }
                }
            }
        };

        let token = ResumeToken::new(ENGINE, state.session_id.clone());
        let _ = events
            .send(Event::Started {
                engine: ENGINE.to_string(),
                resume: token.clone(),
                title: Some("Liaison Agent".to_string()),
                meta: Some(serde_json::json!({
                    "tmux_session": state.graph.tmux_session,
                    "coordination_folder": state.graph.coordination_folder,
                })),
            })
            .await;

        if let Err(e) = self.spawn_brain(prompt, &mut state).await {
            let _ = events
                .send(Event::Completed {
                    engine: ENGINE.to_string(),
                    ok: false,
                    answer: String::new(),
                    resume: Some(token),
                    error: Some(format!("Failed to spawn liaison brain: {e}")),
                    usage: None,
                })
                .await;
            return Ok(());
        }

        self.save_session(&state).await;
        self.poll_loop(&mut state, &events).await;

        Ok(())
    }

    /// Route a user's answer to whichever pane is waiting for it. Per the
    /// documented open question, a response whose pane has since been
    /// reassigned is logged and dropped rather than retried.
    pub async fn handle_input_response(
        &self,
        request_id: &str,
        response: &str,
        graph: &mut SessionGraph,
    ) -> Option<Event> {
        let pane = match graph.pane_with_pending_mut(request_id) {
            Some(pane) => pane,
            None => {
                tracing::warn!(request_id, "liaison.response.unknown_request");
                return None;
            }
        };
        let target = pane.session_name.clone();
        let engine = pane.engine.clone();
        pane.pending_input_request = None;

        let sent = self.sessions.send_literal(&target, response).await.is_ok()
            && self.sessions.send_enter(&target).await.is_ok();

        Some(Event::Action {
            engine: ENGINE.to_string(),
            action: Action::new(
                format!("liaison-input-{request_id}"),
                ActionKind::Note,
                if sent {
                    format!("Sent response to {engine}")
                } else {
                    format!("Failed to send response to {engine}")
                },
            ),
            phase: ActionPhase::Completed,
            ok: Some(sent),
            message: None,
            level: if sent { None } else { Some(ActionLevel::Warning) },
        })
    }

    async fn ensure_folders(&self) {
        let folder = &self.config.coordination_folder;
        for sub in [
            "sessions",
            "coordination/inbox",
            "coordination/broadcast",
            "state",
            "locks",
        ] {
            let _ = tokio::fs::create_dir_all(folder.join(sub)).await;
        }
    }

    async fn spawn_brain(&self, prompt: &str, state: &mut RunState) -> Result<(), SessionError> {
        let system_prompt = prompt::build_system_prompt(self.config.captains_chair);
        let command = format!(
            "{} -p --system-prompt {} -- {}",
            self.config.liaison_cmd,
            shell_quote(&system_prompt),
            shell_quote(prompt),
        );

        self.sessions
            .send(&state.graph.tmux_session, &command)
            .await?;
        self.sessions.send_enter(&state.graph.tmux_session).await?;

        state.graph.panes.push(PaneInfo::new(
            "liaison_brain",
            state.graph.tmux_session.clone(),
            "claude",
            PaneRole::Liaison,
        ));

        Ok(())
    }

    async fn poll_loop(&self, state: &mut RunState, events: &mpsc::Sender<Event>) {
        let mut iteration: u64 = 0;
        let mut idle_iterations: u64 = 0;

        while !state.completed {
            tokio::time::sleep(self.config.poll_interval).await;
            iteration += 1;

            match self.sessions.is_alive(&state.graph.tmux_session).await {
                Ok(true) => {}
                _ => {
                    let _ = events
                        .send(Event::Completed {
                            engine: ENGINE.to_string(),
                            ok: false,
                            answer: String::new(),
                            resume: Some(ResumeToken::new(ENGINE, state.session_id.clone())),
                            error: Some("Tmux session crashed".to_string()),
                            usage: None,
                        })
                        .await;
                    return;
                }
            }

            let inbox_messages = self.drain_inbox().await;
            let mut had_inbox_activity = false;
            for text in &inbox_messages {
                had_inbox_activity = true;
                let pane_target = state
                    .graph
                    .panes
                    .iter()
                    .find(|p| p.role == PaneRole::Liaison)
                    .map(|p| p.session_name.clone());
                if let Some(target) = pane_target {
                    let _ = self
                        .sessions
                        .send(&target, &format!("NEW USER REQUEST: {text}"))
                        .await;
                    let _ = self.sessions.send_enter(&target).await;
                }
                state.note_seq += 1;
                let _ = events
                    .send(Event::Action {
                        engine: ENGINE.to_string(),
                        action: Action::new(
                            format!("liaison-inbox-{}", state.note_seq),
                            ActionKind::Note,
                            "New request received",
                        )
                        .with_detail("text", serde_json::Value::String(text.clone())),
                        phase: ActionPhase::Completed,
                        ok: Some(true),
                        message: None,
                        level: None,
                    })
                    .await;
            }

            let mut had_activity = false;
            for pane in state.graph.panes.clone() {
                if let Ok(output) = self.sessions.capture_output(&pane.session_name, self.config.capture_lines).await {
                    if output.is_empty() {
                        continue;
                    }

                    let mut hasher = DefaultHasher::new();
                    output.hash(&mut hasher);
                    let hash = hasher.finish();

                    let unchanged = state
                        .graph
                        .panes
                        .iter_mut()
                        .find(|p| p.pane_id == pane.pane_id)
                        .map(|target| {
                            let unchanged = target.last_capture_hash == Some(hash);
                            target.last_capture_hash = Some(hash);
                            unchanged
                        })
                        .unwrap_or(false);
                    if unchanged {
                        continue;
                    }

                    had_activity = true;
                    state.note_seq += 1;
                    let _ = events
                        .send(Event::Action {
                            engine: ENGINE.to_string(),
                            action: Action::new(
                                format!("liaison-pane-{}-{}", pane.pane_id, state.note_seq),
                                ActionKind::PaneActivity,
                                format!("{} ({:?})", pane.engine, pane.role),
                            )
                            .with_detail("pane_id", serde_json::Value::String(pane.pane_id.clone()))
                            .with_detail("engine", serde_json::Value::String(pane.engine.clone()))
                            .with_detail(
                                "output_preview",
                                serde_json::Value::String(truncate_output(&output, 5)),
                            ),
                            phase: ActionPhase::Completed,
                            ok: Some(true),
                            message: None,
                            level: None,
                        })
                        .await;

                    for line in output.lines() {
                        let line = line.trim();
                        if line.is_empty() {
                            continue;
                        }
                        self.handle_pane_line(line, &pane, state, events).await;
                    }
                }
            }

            if state.completed {
                let _ = events
                    .send(Event::Completed {
                        engine: ENGINE.to_string(),
                        ok: true,
                        answer: state.final_answer.clone(),
                        resume: Some(ResumeToken::new(ENGINE, state.session_id.clone())),
                        error: None,
                        usage: None,
                    })
                    .await;
                return;
            }

            if had_activity || had_inbox_activity {
                idle_iterations = 0;
            } else {
                idle_iterations += 1;
            }

            if idle_iterations > self.config.max_idle_iterations {
                let _ = events
                    .send(Event::Completed {
                        engine: ENGINE.to_string(),
                        ok: false,
                        answer: String::new(),
                        resume: Some(ResumeToken::new(ENGINE, state.session_id.clone())),
                        error: Some("Liaison timed out after a long period of inactivity".to_string()),
                        usage: None,
                    })
                    .await;
                return;
            }

            if iteration % 20 == 0 {
                self.save_session(state).await;
            }
        }
    }

    async fn handle_pane_line(
        &self,
        line: &str,
        pane: &PaneInfo,
        state: &mut RunState,
        events: &mpsc::Sender<Event>,
    ) {
        if questions::looks_like_question(line) {
            if self.config.escalation_policy.should_escalate(line, None) {
                if let Some(target_pane) = state
                    .graph
                    .panes
                    .iter_mut()
                    .find(|p| p.pane_id == pane.pane_id)
                {
                    if target_pane.pending_input_request.is_none() {
                        state.request_seq += 1;
                        let request_id = format!("{}_{}", state.session_id, state.request_seq);
                        target_pane.pending_input_request = Some(request_id.clone());
                        let urgency = self.config.escalation_policy.assess_urgency(line, None);
                        let event = Event::InputRequest {
                            engine: ENGINE.to_string(),
                            request_id: request_id.clone(),
                            question: line.to_string(),
                            source: InputRequestSource::Subagent,
                            context: Some(format!("From {} in pane {:?}", pane.engine, pane.role)),
                            options: None,
                            urgency,
                        };
                        state.pending_requests.insert(request_id, event.clone());
                        let _ = events.send(event).await;
                    }
                }
            } else if let Some(response) = self.config.escalation_policy.auto_response(line, None) {
                let _ = self.sessions.send(&pane.session_name, &response).await;
                let _ = self.sessions.send_enter(&pane.session_name).await;
                state.note_seq += 1;
                let _ = events
                    .send(Event::Action {
                        engine: ENGINE.to_string(),
                        action: Action::new(
                            format!("liaison-auto-{}", state.note_seq),
                            ActionKind::Note,
                            format!("Auto-responded: {response}"),
                        )
                        .with_detail("question", serde_json::Value::String(line.to_string())),
                        phase: ActionPhase::Completed,
                        ok: Some(true),
                        message: None,
                        level: None,
                    })
                    .await;
            }
        }

        if questions::is_completion_marker(line) && !self.config.captains_chair {
            state.final_answer = line.to_string();
            state.completed = true;
        }
    }

    async fn drain_inbox(&self) -> Vec<String> {
        let inbox = self.config.coordination_folder.join("coordination").join("inbox");
        let mut entries = match tokio::fs::read_dir(&inbox).await {
            Ok(rd) => rd,
            Err(_) => return Vec::new(),
        };

        let mut messages = Vec::new();
        let mut paths = Vec::new();
        while let Ok(Some(entry)) = entries.next_entry().await {
            if entry.path().extension().and_then(|e| e.to_str()) == Some("json") {
                paths.push(entry.path());
            }
        }
        paths.sort();

        for path in paths {
            if let Ok(raw) = tokio::fs::read_to_string(&path).await {
                if let Ok(message) =
                    serde_json::from_str::<overseer_core::CoordinationMessage>(&raw)
                {
                    if let Some(text) = message.payload.get("text").and_then(|v| v.as_str()) {
                        messages.push(text.to_string());
                    }
                }
            }
            let _ = tokio::fs::remove_file(&path).await;
        }

        messages
    }

    async fn save_session(&self, state: &RunState) {
        let path = self
            .config
            .coordination_folder
            .join("sessions")
            .join(format!("{}.json", state.session_id));
        if let Ok(json) = serde_json::to_string_pretty(&state.graph) {
            let _ = tokio::fs::write(path, json).await;
        }
    }

    async fn restore_session(&self, session_id: &str) -> Option<SessionGraph> {
        let path = self
            .config
            .coordination_folder
            .join("sessions")
            .join(format!("{session_id}.json"));
        let raw = tokio::fs::read_to_string(&path).await.ok()?;
        let graph: SessionGraph = serde_json::from_str(&raw).ok()?;

        match self.sessions.is_alive(&graph.tmux_session).await {
            Ok(true) => Some(graph),
            _ => None,
        }
    }
}

/// Shell-quote a string for embedding in a tmux `send-keys` command line.
/// Bare alphanumerics (plus a small safe-punctuation set) pass through
/// unquoted; everything else gets single-quoted with embedded quotes
/// escaped the POSIX way.
fn shell_quote(s: &str) -> String {
    if !s.is_empty()
        && s.chars()
            .all(|c| c.is_ascii_alphanumeric() || "-_./=".contains(c))
    {
        return s.to_string();
    }
    format!("'{}'", s.replace('\'', "'\"'\"'"))
}

/// Last `max_lines` non-empty lines of a captured pane buffer, for use as
/// a short preview in a `pane_activity` action.
fn truncate_output(output: &str, max_lines: usize) -> String {
    let non_empty: Vec<&str> = output.lines().map(str::trim).filter(|l| !l.is_empty()).collect();
    let start = non_empty.len().saturating_sub(max_lines);
    non_empty[start..].join("\n")
}

#[cfg(test)]
#[path = "mod_tests.rs"]
mod tests;
