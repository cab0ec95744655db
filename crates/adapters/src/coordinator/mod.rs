// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! File-backed coordination between liaisons running as a swarm. Liaisons
//! never talk to each other directly; they read and write JSON files under
//! a shared coordination folder, using `flock` to serialize updates to the
//! small set of files that more than one liaison might write concurrently.
//! Messages themselves are not locked: a reader's `unlink` after reading is
//! the only synchronization a direct message needs, and broadcasts are
//! append-only.

use fs2::FileExt;
use overseer_core::id::{IdGen, RandomIdGen};
use overseer_core::{
    ActiveLiaisonsDoc, CoordinationMessage, LiaisonRecord, LiaisonStatus, MessageKind,
    SharedContextDoc, SharedContextEntry, TaskRecord, TaskRegistryDoc, TaskStatus,
    DISCOVERY_EXPIRY_MS, LIAISON_STALE_AFTER_MS, QUESTION_EXPIRY_MS,
};
use parking_lot::Mutex;
use std::collections::{BTreeMap, HashSet};
use std::path::PathBuf;
use std::sync::Arc;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum CoordinatorError {
    #[error("coordination I/O error: {0}")]
    Io(#[from] std::io::Error),
    #[error("coordination message decode error: {0}")]
    Decode(#[from] serde_json::Error),
    #[error("background lock task panicked")]
    TaskJoin,
}

/// Handle to one liaison's view of the shared coordination folder.
pub struct Coordinator {
    folder: PathBuf,
    liaison_id: String,
    read_broadcast_ids: Arc<Mutex<HashSet<String>>>,
    ids: RandomIdGen,
}

impl Coordinator {
    pub fn new(folder: impl Into<PathBuf>, liaison_id: impl Into<String>) -> Self {
        Self {
            folder: folder.into(),
            liaison_id: liaison_id.into(),
            read_broadcast_ids: Arc::new(Mutex::new(HashSet::new())),
            ids: RandomIdGen,
        }
    }

    pub async fn ensure_folders(&self) -> Result<(), CoordinatorError> {
        for sub in [
            "coordination/inbox".to_string(),
            "coordination/broadcast".to_string(),
            "state".to_string(),
            "locks".to_string(),
        ] {
            tokio::fs::create_dir_all(self.folder.join(sub)).await?;
        }
        Ok(())
    }

    /// Deliver a message: direct messages land in the recipient's inbox
    /// subdirectory, broadcasts land in the shared broadcast directory.
    pub async fn send(&self, message: &CoordinationMessage) -> Result<(), CoordinatorError> {
        let dest = match &message.to_liaison {
            Some(to) => self.folder.join("coordination").join("inbox").join(to),
            None => self.folder.join("coordination").join("broadcast"),
        };
        tokio::fs::create_dir_all(&dest).await?;
        let filename = format!("{}_{}.json", message.timestamp_ms, self.liaison_id);
        let body = serde_json::to_string_pretty(message)?;
        tokio::fs::write(dest.join(filename), body).await?;
        Ok(())
    }

    /// Drain this liaison's direct inbox (deleting each file as it's read)
    /// and pick up any broadcasts not already seen by this handle.
    pub async fn receive(&self, now_ms: u64) -> Result<Vec<CoordinationMessage>, CoordinatorError> {
        let mut messages = Vec::new();

        let direct_inbox = self.folder.join("coordination").join("inbox").join(&self.liaison_id);
        let mut direct_paths = list_json_files(&direct_inbox).await?;
        direct_paths.sort();
        for path in direct_paths {
            if let Some(msg) = self.read_message(&path, now_ms).await? {
                messages.push(msg);
            }
            let _ = tokio::fs::remove_file(&path).await;
        }

        let broadcast = self.folder.join("coordination").join("broadcast");
        let mut broadcast_paths = list_json_files(&broadcast).await?;
        broadcast_paths.sort();
        for path in broadcast_paths {
            if let Some(msg) = self.read_message(&path, now_ms).await? {
                let mut seen = self.read_broadcast_ids.lock();
                if seen.insert(msg.message_id.clone()) {
                    drop(seen);
                    messages.push(msg);
                }
            }
        }

        Ok(messages)
    }

    async fn read_message(
        &self,
        path: &std::path::Path,
        now_ms: u64,
    ) -> Result<Option<CoordinationMessage>, CoordinatorError> {
        let raw = match tokio::fs::read_to_string(path).await {
            Ok(raw) => raw,
            Err(_) => return Ok(None),
        };
        let msg: CoordinationMessage = match serde_json::from_str(&raw) {
            Ok(msg) => msg,
            Err(_) => return Ok(None),
        };
        if msg.is_expired(now_ms) || msg.from_liaison == self.liaison_id {
            return Ok(None);
        }
        Ok(Some(msg))
    }

    pub async fn register(&self, task: &str, pid: u32, now_ms: u64) -> Result<(), CoordinatorError> {
        let liaison_id = self.liaison_id.clone();
        let task = task.to_string();
        self.with_lock("active_liaisons", move |mut doc: ActiveLiaisonsDoc| {
            doc.liaisons.insert(
                liaison_id,
                LiaisonRecord {
                    started_at_ms: now_ms,
                    pid,
                    task,
                    status: LiaisonStatus::Running,
                    last_heartbeat_ms: now_ms,
                },
            );
            Ok(doc)
        })
        .await
    }

    pub async fn heartbeat(&self, status: LiaisonStatus, now_ms: u64) -> Result<(), CoordinatorError> {
        let liaison_id = self.liaison_id.clone();
        self.with_lock("active_liaisons", move |mut doc: ActiveLiaisonsDoc| {
            if let Some(record) = doc.liaisons.get_mut(&liaison_id) {
                record.last_heartbeat_ms = now_ms;
                record.status = status;
            }
            Ok(doc)
        })
        .await
    }

    pub async fn deregister(&self) -> Result<(), CoordinatorError> {
        let liaison_id = self.liaison_id.clone();
        self.with_lock("active_liaisons", move |mut doc: ActiveLiaisonsDoc| {
            doc.liaisons.remove(&liaison_id);
            Ok(doc)
        })
        .await
    }

    /// Liaisons with no heartbeat in the last [`LIAISON_STALE_AFTER_MS`] are
    /// filtered out rather than returned as active.
    pub async fn active_liaisons(
        &self,
        now_ms: u64,
    ) -> Result<BTreeMap<String, LiaisonRecord>, CoordinatorError> {
        let doc: ActiveLiaisonsDoc = self.load_json("active_liaisons").await?;
        Ok(doc
            .liaisons
            .into_iter()
            .filter(|(_, record)| now_ms.saturating_sub(record.last_heartbeat_ms) < LIAISON_STALE_AFTER_MS)
            .collect())
    }

    /// Attempt to claim a task. Returns `false` if another liaison already
    /// holds it `in_progress`; re-claiming a completed task succeeds.
    pub async fn claim_task(
        &self,
        task_id: &str,
        description: &str,
        now_ms: u64,
    ) -> Result<bool, CoordinatorError> {
        let liaison_id = self.liaison_id.clone();
        let task_id = task_id.to_string();
        let description = description.to_string();
        let claimed = Arc::new(Mutex::new(false));
        let claimed_out = claimed.clone();
        self.with_lock("task_registry", move |mut doc: TaskRegistryDoc| {
            if let Some(existing) = doc.tasks.get(&task_id) {
                if existing.status == TaskStatus::InProgress {
                    *claimed_out.lock() = false;
                    return Ok(doc);
                }
            }
            doc.tasks.insert(
                task_id,
                TaskRecord {
                    claimed_by: liaison_id,
                    claimed_at_ms: now_ms,
                    description,
                    status: TaskStatus::InProgress,
                    completed_at_ms: None,
                    result: None,
                },
            );
            *claimed_out.lock() = true;
            Ok(doc)
        })
        .await?;
        let result = *claimed.lock();
        Ok(result)
    }

    pub async fn complete_task(
        &self,
        task_id: &str,
        result: Option<serde_json::Value>,
        now_ms: u64,
    ) -> Result<(), CoordinatorError> {
        let task_id = task_id.to_string();
        self.with_lock("task_registry", move |mut doc: TaskRegistryDoc| {
            if let Some(record) = doc.tasks.get_mut(&task_id) {
                record.status = TaskStatus::Completed;
                record.completed_at_ms = Some(now_ms);
                if result.is_some() {
                    record.result = result;
                }
            }
            Ok(doc)
        })
        .await
    }

    pub async fn share_context(
        &self,
        key: &str,
        value: serde_json::Value,
        now_ms: u64,
    ) -> Result<(), CoordinatorError> {
        let key = key.to_string();
        let liaison_id = self.liaison_id.clone();
        self.with_lock("shared_context", move |mut doc: SharedContextDoc| {
            doc.context.insert(
                key,
                SharedContextEntry {
                    value,
                    from_liaison: liaison_id,
                    updated_at_ms: now_ms,
                },
            );
            Ok(doc)
        })
        .await
    }

    pub async fn shared_context(&self) -> Result<BTreeMap<String, SharedContextEntry>, CoordinatorError> {
        let doc: SharedContextDoc = self.load_json("shared_context").await?;
        Ok(doc.context)
    }

    pub async fn broadcast_discovery(
        &self,
        topic: &str,
        data: serde_json::Value,
        now_ms: u64,
    ) -> Result<(), CoordinatorError> {
        let message = CoordinationMessage {
            message_id: format!("discovery_{}", self.ids.next()),
            from_liaison: self.liaison_id.clone(),
            to_liaison: None,
            timestamp_ms: now_ms,
            kind: MessageKind::InfoShare,
            payload: serde_json::json!({ "topic": topic, "data": data }),
            expires_at_ms: Some(now_ms + DISCOVERY_EXPIRY_MS),
        };
        self.send(&message).await
    }

    /// Send a question to a specific liaison, returning the message id so
    /// the caller can correlate a later reply.
    pub async fn ask_liaison(
        &self,
        to_liaison: &str,
        question: &str,
        context: Option<serde_json::Value>,
        now_ms: u64,
    ) -> Result<String, CoordinatorError> {
        let message_id = format!("question_{}", self.ids.next());
        let message = CoordinationMessage {
            message_id: message_id.clone(),
            from_liaison: self.liaison_id.clone(),
            to_liaison: Some(to_liaison.to_string()),
            timestamp_ms: now_ms,
            kind: MessageKind::Question,
            payload: serde_json::json!({
                "question": question,
                "context": context.unwrap_or_else(|| serde_json::json!({})),
            }),
            expires_at_ms: Some(now_ms + QUESTION_EXPIRY_MS),
        };
        self.send(&message).await?;
        Ok(message_id)
    }

    async fn load_json<T: Default + serde::de::DeserializeOwned>(
        &self,
        stem: &str,
    ) -> Result<T, CoordinatorError> {
        let path = self.folder.join("state").join(format!("{stem}.json"));
        match tokio::fs::read_to_string(&path).await {
            Ok(raw) => Ok(serde_json::from_str(&raw).unwrap_or_default()),
            Err(_) => Ok(T::default()),
        }
    }

    /// Run `f` against the current contents of `state/{stem}.json` while
    /// holding an exclusive lock on `locks/{stem}.lock`, then persist
    /// whatever `f` returns. Mirrors the read-modify-write-under-flock
    /// shape every state file in this module needs.
    async fn with_lock<T, F>(&self, stem: &str, f: F) -> Result<(), CoordinatorError>
    where
        T: Default + serde::Serialize + serde::de::DeserializeOwned + Send + 'static,
        F: FnOnce(T) -> Result<T, CoordinatorError> + Send + 'static,
    {
        let state_path = self.folder.join("state").join(format!("{stem}.json"));
        let lock_path = self.folder.join("locks").join(format!("{stem}.lock"));

        tokio::task::spawn_blocking(move || -> Result<(), CoordinatorError> {
            if let Some(parent) = lock_path.parent() {
                std::fs::create_dir_all(parent)?;
            }
            if let Some(parent) = state_path.parent() {
                std::fs::create_dir_all(parent)?;
            }
            let lock_file = std::fs::OpenOptions::new()
                .write(true)
                .create(true)
                .open(&lock_path)?;
            lock_file.lock_exclusive()?;

            let result = (|| -> Result<(), CoordinatorError> {
                let doc: T = match std::fs::read_to_string(&state_path) {
                    Ok(raw) => serde_json::from_str(&raw).unwrap_or_default(),
                    Err(_) => T::default(),
                };
                let updated = f(doc)?;
                std::fs::write(&state_path, serde_json::to_string_pretty(&updated)?)?;
                Ok(())
            })();

            let _ = FileExt::unlock(&lock_file);
            result
        })
        .await
        .map_err(|_| CoordinatorError::TaskJoin)?
    }
}

async fn list_json_files(dir: &std::path::Path) -> Result<Vec<PathBuf>, CoordinatorError> {
    let mut entries = match tokio::fs::read_dir(dir).await {
        Ok(rd) => rd,
        Err(_) => return Ok(Vec::new()),
    };
    let mut paths = Vec::new();
    while let Ok(Some(entry)) = entries.next_entry().await {
        if entry.path().extension().and_then(|e| e.to_str()) == Some("json") {
            paths.push(entry.path());
        }
    }
    Ok(paths)
}

#[cfg(test)]
#[path = "mod_tests.rs"]
mod tests;
