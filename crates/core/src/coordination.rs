// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Data shapes shared by every liaison that talks to the file-backed
//! coordination folder. The I/O (locking, reading, writing) lives in the
//! adapters crate; this module only owns the wire shapes and their
//! `to_dict`/`from_dict`-equivalent round trips.

use serde::{Deserialize, Serialize};

/// Coarse classification of a [`CoordinationMessage`]'s payload.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MessageKind {
    InfoShare,
    Question,
    TaskClaim,
    TaskComplete,
}

/// One message exchanged between liaisons, either direct (`to_liaison =
/// Some`) or broadcast (`to_liaison = None`).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CoordinationMessage {
    pub message_id: String,
    pub from_liaison: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub to_liaison: Option<String>,
    pub timestamp_ms: u64,
    #[serde(rename = "type")]
    pub kind: MessageKind,
    pub payload: serde_json::Value,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub expires_at_ms: Option<u64>,
}

impl CoordinationMessage {
    pub fn is_broadcast(&self) -> bool {
        self.to_liaison.is_none()
    }

    pub fn is_expired(&self, now_ms: u64) -> bool {
        self.expires_at_ms.is_some_and(|exp| exp < now_ms)
    }

    /// Round-trips through a `serde_json::Value`, mirroring the
    /// dataclass `to_dict`/`from_dict` pair this type is grounded on.
    pub fn to_value(&self) -> serde_json::Value {
        serde_json::to_value(self).unwrap_or(serde_json::Value::Null)
    }

    pub fn from_value(value: serde_json::Value) -> Result<Self, serde_json::Error> {
        serde_json::from_value(value)
    }
}

/// Lifecycle status of a registered liaison.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LiaisonStatus {
    Starting,
    Running,
    Idle,
    Stopped,
}

/// One entry of `state/active_liaisons.json`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LiaisonRecord {
    pub started_at_ms: u64,
    pub pid: u32,
    pub task: String,
    pub status: LiaisonStatus,
    pub last_heartbeat_ms: u64,
}

/// Version-wrapped `state/active_liaisons.json` document.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ActiveLiaisonsDoc {
    pub version: u32,
    pub liaisons: std::collections::BTreeMap<String, LiaisonRecord>,
}

impl Default for ActiveLiaisonsDoc {
    fn default() -> Self {
        Self {
            version: 1,
            liaisons: Default::default(),
        }
    }
}

/// Claim status of one entry of `state/task_registry.json`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TaskStatus {
    InProgress,
    Completed,
}

/// One entry of `state/task_registry.json`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TaskRecord {
    pub claimed_by: String,
    pub claimed_at_ms: u64,
    pub description: String,
    pub status: TaskStatus,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub completed_at_ms: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub result: Option<serde_json::Value>,
}

/// Version-wrapped `state/task_registry.json` document.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TaskRegistryDoc {
    pub version: u32,
    pub tasks: std::collections::BTreeMap<String, TaskRecord>,
}

impl Default for TaskRegistryDoc {
    fn default() -> Self {
        Self {
            version: 1,
            tasks: Default::default(),
        }
    }
}

/// One entry of `state/shared_context.json`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SharedContextEntry {
    pub value: serde_json::Value,
    pub from_liaison: String,
    pub updated_at_ms: u64,
}

/// Version-wrapped `state/shared_context.json` document.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SharedContextDoc {
    pub version: u32,
    pub context: std::collections::BTreeMap<String, SharedContextEntry>,
}

impl Default for SharedContextDoc {
    fn default() -> Self {
        Self {
            version: 1,
            context: Default::default(),
        }
    }
}

/// A liaison is considered gone once its heartbeat is older than this.
pub const LIAISON_STALE_AFTER_MS: u64 = 60_000;

/// Discovery broadcasts expire after this long (1 hour).
pub const DISCOVERY_EXPIRY_MS: u64 = 60 * 60 * 1000;

/// Direct questions between liaisons expire after this long (5 minutes).
pub const QUESTION_EXPIRY_MS: u64 = 5 * 60 * 1000;

#[cfg(test)]
#[path = "coordination_tests.rs"]
mod tests;
