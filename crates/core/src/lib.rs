// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Core data model for the multi-engine agent supervisor: the canonical
//! event schema, the escalation policy, the progress tracker and session
//! card, and the on-disk shapes the liaison and its coordinator persist.
//!
//! This crate has no process, filesystem, or subprocess dependencies — it
//! is pure data and pure functions, so every other crate in the workspace
//! can depend on it without pulling in I/O.

pub mod coordination;
pub mod escalation;
pub mod id;
pub mod liaison;
pub mod model;
pub mod progress;
pub mod session_card;

pub use escalation::{CustomDecider, Escalation, EscalationPolicy};
pub use model::{
    Action, ActionKind, ActionLevel, ActionPhase, Detail, Event, FileChange, FileChangeKind,
    InputOptions, InputRequestSource, ResumeToken, Responder, Urgency, Usage,
};
pub use progress::{ActionState, InputRequestState, ProgressState, ProgressTracker};
pub use session_card::{
    activity_symbol, badge_symbol, status_symbol, ActivityItem, AgentBadge, AgentStatus,
    CardStatus, PendingInput, SessionCardBuilder, SessionCardState,
};
pub use liaison::{PaneInfo, PaneRole, SessionGraph};
pub use coordination::{
    ActiveLiaisonsDoc, CoordinationMessage, LiaisonRecord, LiaisonStatus, MessageKind,
    SharedContextDoc, SharedContextEntry, TaskRecord, TaskRegistryDoc, TaskStatus,
    DISCOVERY_EXPIRY_MS, LIAISON_STALE_AFTER_MS, QUESTION_EXPIRY_MS,
};
