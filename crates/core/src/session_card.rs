// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Renderable UI-facing snapshot aggregating every engine's progress into one
//! session card.

use serde::{Deserialize, Serialize};

/// Per-engine status shown on a badge.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AgentStatus {
    Active,
    Waiting,
    Done,
    Error,
}

/// One engine's badge: status, step count, and last-activity timestamp.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AgentBadge {
    pub engine: String,
    pub status: AgentStatus,
    pub step_count: usize,
    pub last_activity_ms: u64,
    /// True for the engine that owns the top-level run (vs. a liaison worker).
    pub primary: bool,
}

/// One entry in the bounded activity feed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ActivityItem {
    pub engine: String,
    pub kind: String,
    pub text: String,
    pub at_ms: u64,
}

/// An input request still awaiting an answer, as shown on the card.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PendingInput {
    pub request_id: String,
    pub engine: String,
    pub question: String,
    pub urgency: crate::model::Urgency,
}

/// Overall run status. See [`SessionCardBuilder`] for the transition rules.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CardStatus {
    Working,
    WaitingInput,
    Done,
    Cancelled,
    Error,
}

/// Immutable snapshot produced by [`SessionCardBuilder::build`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SessionCardState {
    pub badges: Vec<AgentBadge>,
    pub activity: Vec<ActivityItem>,
    pub activity_total: usize,
    pub activity_truncated: bool,
    pub pending_inputs: Vec<PendingInput>,
    pub status: CardStatus,
    pub error: Option<String>,
    pub resume_line: Option<String>,
    pub context_line: Option<String>,
}

impl SessionCardState {
    pub fn is_multi_agent(&self) -> bool {
        self.badges.len() > 1
    }

    pub fn has_pending_inputs(&self) -> bool {
        !self.pending_inputs.is_empty()
    }

    pub fn is_complete(&self) -> bool {
        matches!(self.status, CardStatus::Done | CardStatus::Error | CardStatus::Cancelled)
    }
}

/// Mutable builder that accumulates badges, activity, and pending inputs
/// across a run before a presenter asks for a [`SessionCardState`] snapshot.
#[derive(Debug, Default)]
pub struct SessionCardBuilder {
    badges: Vec<AgentBadge>,
    activity: Vec<ActivityItem>,
    max_activity_items: usize,
    pending_inputs: Vec<PendingInput>,
    status: Option<CardStatus>,
    error: Option<String>,
    resume_line: Option<String>,
    context_line: Option<String>,
}

const DEFAULT_MAX_ACTIVITY_ITEMS: usize = 50;
const DEFAULT_MAX_VISIBLE_ACTIVITY: usize = 5;

impl SessionCardBuilder {
    pub fn new() -> Self {
        Self {
            max_activity_items: DEFAULT_MAX_ACTIVITY_ITEMS,
            status: Some(CardStatus::Working),
            ..Default::default()
        }
    }

    pub fn with_max_activity_items(mut self, max: usize) -> Self {
        self.max_activity_items = max;
        self
    }

    pub fn add_agent(&mut self, engine: impl Into<String>, primary: bool) {
        self.badges.push(AgentBadge {
            engine: engine.into(),
            status: AgentStatus::Active,
            step_count: 0,
            last_activity_ms: 0,
            primary,
        });
    }

    pub fn update_agent_status(&mut self, engine: &str, status: AgentStatus, at_ms: u64) {
        if let Some(badge) = self.badges.iter_mut().find(|b| b.engine == engine) {
            badge.status = status;
            badge.last_activity_ms = at_ms;
        }
    }

    pub fn increment_step(&mut self, engine: &str, at_ms: u64) {
        if let Some(badge) = self.badges.iter_mut().find(|b| b.engine == engine) {
            badge.step_count += 1;
            badge.last_activity_ms = at_ms;
        }
    }

    pub fn add_activity(&mut self, item: ActivityItem) {
        self.activity.push(item);
        if self.activity.len() > self.max_activity_items {
            let overflow = self.activity.len() - self.max_activity_items;
            self.activity.drain(0..overflow);
        }
    }

    pub fn add_pending_input(&mut self, input: PendingInput) {
        self.pending_inputs.push(input);
        if self.status == Some(CardStatus::Working) {
            self.status = Some(CardStatus::WaitingInput);
        }
    }

    pub fn remove_pending_input(&mut self, request_id: &str) {
        self.pending_inputs.retain(|i| i.request_id != request_id);
        if self.pending_inputs.is_empty() && self.status == Some(CardStatus::WaitingInput) {
            self.status = Some(CardStatus::Working);
        }
    }

    pub fn set_context(&mut self, context_line: impl Into<String>) {
        self.context_line = Some(context_line.into());
    }

    pub fn set_resume(&mut self, resume_line: impl Into<String>) {
        self.resume_line = Some(resume_line.into());
    }

    pub fn set_complete(&mut self, ok: bool, error: Option<String>) {
        let final_status = if ok { AgentStatus::Done } else { AgentStatus::Error };
        for badge in &mut self.badges {
            badge.status = final_status;
        }
        self.status = Some(if ok { CardStatus::Done } else { CardStatus::Error });
        self.error = error;
    }

    pub fn set_cancelled(&mut self) {
        self.status = Some(CardStatus::Cancelled);
    }

    /// Produces an immutable snapshot. Badges are ordered primary-first then
    /// by most-recent activity; the activity feed is sliced to the most
    /// recent `max_visible_activity` items while `activity_total` and
    /// `activity_truncated` report the untruncated picture.
    pub fn build(&self, max_visible_activity: usize) -> SessionCardState {
        let max_visible = if max_visible_activity == 0 {
            DEFAULT_MAX_VISIBLE_ACTIVITY
        } else {
            max_visible_activity
        };

        let mut badges = self.badges.clone();
        badges.sort_by(|a, b| {
            b.primary
                .cmp(&a.primary)
                .then(b.last_activity_ms.cmp(&a.last_activity_ms))
        });

        let activity_total = self.activity.len();
        let activity_truncated = activity_total > max_visible;
        let activity = if activity_truncated {
            self.activity[activity_total - max_visible..].to_vec()
        } else {
            self.activity.clone()
        };

        SessionCardState {
            badges,
            activity,
            activity_total,
            activity_truncated,
            pending_inputs: self.pending_inputs.clone(),
            status: self.status.unwrap_or(CardStatus::Working),
            error: self.error.clone(),
            resume_line: self.resume_line.clone(),
            context_line: self.context_line.clone(),
        }
    }
}

/// Display glyph for a badge status. Presentational, but a small pure
/// function rather than full rich-text rendering.
pub fn badge_symbol(status: AgentStatus) -> &'static str {
    match status {
        AgentStatus::Active => "●",
        AgentStatus::Waiting => "◐",
        AgentStatus::Done => "✓",
        AgentStatus::Error => "✗",
    }
}

/// Display glyph for an overall card status.
pub fn status_symbol(status: CardStatus) -> &'static str {
    match status {
        CardStatus::Working => "⏳",
        CardStatus::WaitingInput => "❓",
        CardStatus::Done => "✅",
        CardStatus::Cancelled => "⏹",
        CardStatus::Error => "❌",
    }
}

/// Display glyph for an activity item's kind string.
pub fn activity_symbol(kind: &str) -> &'static str {
    match kind {
        "command" => "$",
        "tool" => "🔧",
        "file_change" => "📝",
        "web_search" => "🔍",
        "pane_activity" => "🖥",
        "warning" => "⚠",
        _ => "•",
    }
}

#[cfg(test)]
#[path = "session_card_tests.rs"]
mod tests;
