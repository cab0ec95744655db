// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Deterministic fold from the canonical event stream to UI-facing progress
//! state.

use crate::model::{Action, ActionKind, ActionPhase, Event, InputRequestSource, ResumeToken, Urgency};
use std::collections::BTreeMap;

/// Latest known state of one action id.
#[derive(Debug, Clone, PartialEq)]
pub struct ActionState {
    pub action: Action,
    pub phase: ActionPhase,
    pub ok: Option<bool>,
    /// `updated` when a subsequent `started` arrives for an already-open id,
    /// or when the incoming phase itself is `updated`.
    pub display_phase: ActionPhase,
    pub completed: bool,
    pub first_seen: u64,
    pub last_update: u64,
}

/// A still-unanswered `input_request`.
#[derive(Debug, Clone, PartialEq)]
pub struct InputRequestState {
    pub request_id: String,
    pub question: String,
    pub source: InputRequestSource,
    pub context: Option<String>,
    pub options: Option<Vec<String>>,
    pub urgency: Urgency,
    pub seen_at: u64,
}

/// Immutable snapshot produced by [`ProgressTracker::snapshot`].
#[derive(Debug, Clone, PartialEq, Default)]
pub struct ProgressState {
    pub actions: Vec<ActionState>,
    pub action_count: usize,
    pub input_requests: Vec<InputRequestState>,
    pub resume: Option<ResumeToken>,
    pub resume_line: Option<String>,
    pub context_line: Option<String>,
}

/// Folds a canonical event stream into [`ProgressState`]. Feeding the same
/// event sequence twice through two separate trackers yields identical
/// snapshots — the fold has no hidden, non-deterministic inputs.
#[derive(Debug, Default)]
pub struct ProgressTracker {
    actions: BTreeMap<String, ActionState>,
    action_order: Vec<String>,
    action_count: usize,
    input_requests: BTreeMap<String, InputRequestState>,
    input_request_order: Vec<String>,
    resume: Option<ResumeToken>,
    seq: u64,
}

impl ProgressTracker {
    pub fn new() -> Self {
        Self::default()
    }

    fn next_seq(&mut self) -> u64 {
        self.seq += 1;
        self.seq
    }

    pub fn note_event(&mut self, event: &Event) {
        match event {
            Event::Started { resume, .. } => {
                self.resume = Some(resume.clone());
            }
            Event::Action {
                action, phase, ok, ..
            } => {
                if action.kind == ActionKind::Turn || action.id.is_empty() {
                    return;
                }
                let now = self.next_seq();
                match self.actions.get_mut(&action.id) {
                    Some(existing) => {
                        let display_phase = if matches!(phase, ActionPhase::Started) {
                            ActionPhase::Updated
                        } else {
                            *phase
                        };
                        existing.action = action.clone();
                        existing.phase = *phase;
                        existing.ok = *ok;
                        existing.display_phase = display_phase;
                        existing.completed = matches!(phase, ActionPhase::Completed);
                        existing.last_update = now;
                    }
                    None => {
                        self.action_count += 1;
                        self.action_order.push(action.id.clone());
                        self.actions.insert(
                            action.id.clone(),
                            ActionState {
                                action: action.clone(),
                                phase: *phase,
                                ok: *ok,
                                display_phase: *phase,
                                completed: matches!(phase, ActionPhase::Completed),
                                first_seen: now,
                                last_update: now,
                            },
                        );
                    }
                }
            }
            Event::InputRequest {
                request_id,
                question,
                source,
                context,
                options,
                urgency,
                ..
            } => {
                let now = self.next_seq();
                if !self.input_requests.contains_key(request_id) {
                    self.input_request_order.push(request_id.clone());
                }
                self.input_requests.insert(
                    request_id.clone(),
                    InputRequestState {
                        request_id: request_id.clone(),
                        question: question.clone(),
                        source: *source,
                        context: context.clone(),
                        options: options.clone(),
                        urgency: *urgency,
                        seen_at: now,
                    },
                );
            }
            Event::InputResponse { .. } | Event::Completed { .. } => {}
        }
    }

    /// Removes a pending input request. Callers do this explicitly upon
    /// observing (or synthesizing) an `input_response`.
    pub fn clear_input_request(&mut self, request_id: &str) {
        self.input_requests.remove(request_id);
        self.input_request_order.retain(|id| id != request_id);
    }

    pub fn set_resume(&mut self, resume: ResumeToken) {
        self.resume = Some(resume);
    }

    pub fn snapshot(
        &self,
        resume_formatter: Option<&dyn Fn(&ResumeToken) -> String>,
        context_line: Option<String>,
    ) -> ProgressState {
        let mut actions: Vec<ActionState> = self
            .action_order
            .iter()
            .filter_map(|id| self.actions.get(id).cloned())
            .collect();
        actions.sort_by_key(|a| a.first_seen);

        let mut input_requests: Vec<InputRequestState> = self
            .input_request_order
            .iter()
            .filter_map(|id| self.input_requests.get(id).cloned())
            .collect();
        input_requests.sort_by_key(|r| r.seen_at);

        let resume_line = self
            .resume
            .as_ref()
            .and_then(|r| resume_formatter.map(|f| f(r)));

        ProgressState {
            actions,
            action_count: self.action_count,
            input_requests,
            resume: self.resume.clone(),
            resume_line,
            context_line,
        }
    }
}

#[cfg(test)]
#[path = "progress_tests.rs"]
mod tests;
