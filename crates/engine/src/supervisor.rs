// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Folds one run's canonical event stream into progress/session-card state
//! and owns cancellation of the task driving that run.

use overseer_core::{
    ActivityItem, PendingInput, ProgressState, ProgressTracker, ResumeToken, SessionCardBuilder,
    SessionCardState,
};

/// Drives one run: owns the progress/session-card fold and the handle used
/// to cancel the underlying runner task. Independent runs get independent
/// supervisors; nothing here is shared across runs.
pub struct Supervisor {
    tracker: ProgressTracker,
    card: SessionCardBuilder,
    cancelled: bool,
}

impl Supervisor {
    pub fn new(primary_engine: impl Into<String>) -> Self {
        let mut card = SessionCardBuilder::new();
        card.add_agent(primary_engine, true);
        Self {
            tracker: ProgressTracker::new(),
            card,
            cancelled: false,
        }
    }

    /// Register a secondary agent (a liaison worker pane) on the same card.
    pub fn add_agent(&mut self, engine: impl Into<String>) {
        self.card.add_agent(engine, false);
    }

    /// Fold one event into both the progress tracker and the session card.
    /// `at_ms` is the caller's clock reading at the moment the event arrived
    /// (kept as a parameter rather than read internally so the fold stays
    /// deterministic and replayable, per the tracker's own contract).
    pub fn apply(&mut self, event: &overseer_core::Event, at_ms: u64) {
        use overseer_core::Event;

        self.tracker.note_event(event);

        match event {
            Event::Started { .. } => {}
            Event::Action {
                engine,
                action,
                phase,
                ..
            } => {
                if !matches!(action.kind, overseer_core::ActionKind::Turn) {
                    self.card.increment_step(engine, at_ms);
                    self.card.add_activity(ActivityItem {
                        engine: engine.clone(),
                        kind: format!("{:?}", phase).to_lowercase(),
                        text: action.title.clone(),
                        at_ms,
                    });
                }
            }
            Event::InputRequest {
                engine,
                request_id,
                question,
                urgency,
                ..
            } => {
                self.card.add_pending_input(PendingInput {
                    request_id: request_id.clone(),
                    engine: engine.clone(),
                    question: question.clone(),
                    urgency: *urgency,
                });
            }
            Event::InputResponse { request_id, .. } => {
                self.tracker.clear_input_request(request_id);
                self.card.remove_pending_input(request_id);
            }
            Event::Completed { ok, error, .. } => {
                self.card.set_complete(*ok, error.clone());
            }
        }
    }

    /// Cancel the run. Idempotent: cancelling twice leaves the card in the
    /// same cancelled state. Does not itself touch any subprocess or tmux
    /// session — callers own the task handle that actually tears those down
    /// and call this only to update the presented state.
    pub fn cancel(&mut self) {
        if self.cancelled {
            return;
        }
        self.cancelled = true;
        self.card.set_cancelled();
    }

    pub fn is_cancelled(&self) -> bool {
        self.cancelled
    }

    pub fn progress(&self, resume_formatter: Option<&dyn Fn(&ResumeToken) -> String>) -> ProgressState {
        self.tracker.snapshot(resume_formatter, None)
    }

    pub fn card(&self) -> SessionCardState {
        self.card.build(5)
    }
}

/// The terminal event a cancelled run should synthesize if its runner task
/// hasn't already emitted one. Timeouts use the same transition with a
/// distinct error string.
pub fn cancelled_event(engine: impl Into<String>, resume: Option<ResumeToken>) -> overseer_core::Event {
    overseer_core::Event::Completed {
        engine: engine.into(),
        ok: false,
        answer: String::new(),
        resume,
        error: Some("cancelled".to_string()),
        usage: None,
    }
}

/// Same transition as [`cancelled_event`], distinguished only by message.
pub fn timed_out_event(engine: impl Into<String>, resume: Option<ResumeToken>) -> overseer_core::Event {
    overseer_core::Event::Completed {
        engine: engine.into(),
        ok: false,
        answer: String::new(),
        resume,
        error: Some("timed out".to_string()),
        usage: None,
    }
}

#[cfg(test)]
#[path = "supervisor_tests.rs"]
mod tests;
