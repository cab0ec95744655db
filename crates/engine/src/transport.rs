// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! The chat transport contract the supervisor drives against. Wiring a
//! real chat backend is out of scope; this module exists so the crate
//! compiles and runs end to end against an in-memory stand-in.

use async_trait::async_trait;
use parking_lot::Mutex;
use std::collections::VecDeque;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum TransportError {
    #[error("no message found for ref {0:?}")]
    RefNotFound(String),
}

/// An opaque reference to a previously sent message, returned by `send` and
/// reusable with `edit`/`delete`.
pub type MessageRef = String;

/// A callback identifier from a chat UI (a button press, a reply). The
/// supervisor namespaces these itself: `answer:<request_id>`,
/// `auto:<request_id>`, `cancel`, `pause`, `expand`, `continue`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Callback {
    pub channel: String,
    pub id: String,
}

/// An inbound chat message the supervisor should treat as a new prompt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IncomingMessage {
    pub channel: String,
    pub text: String,
}

#[async_trait]
pub trait Transport: Send + Sync {
    async fn send(&self, channel: &str, message: &str) -> Result<MessageRef, TransportError>;
    async fn edit(&self, message_ref: &MessageRef, message: &str) -> Result<MessageRef, TransportError>;
    async fn delete(&self, message_ref: &MessageRef) -> Result<bool, TransportError>;
    /// Drains and returns any messages queued since the last call.
    async fn incoming_messages(&self) -> Vec<IncomingMessage>;
    /// Drains and returns any callbacks queued since the last call.
    async fn callbacks(&self) -> Vec<Callback>;
}

#[derive(Debug, Default)]
struct Inner {
    next_ref: u64,
    messages: std::collections::HashMap<MessageRef, String>,
    incoming: VecDeque<IncomingMessage>,
    callbacks: VecDeque<Callback>,
}

/// An in-process `Transport` backed by plain queues, for tests and local
/// runs without a real chat integration.
#[derive(Default)]
pub struct InMemoryTransport {
    inner: Mutex<Inner>,
}

impl InMemoryTransport {
    pub fn new() -> Self {
        Self::default()
    }

    /// Test/local-run helper: enqueue an inbound message as if a user typed
    /// it in `channel`.
    pub fn push_incoming(&self, channel: &str, text: &str) {
        self.inner.lock().incoming.push_back(IncomingMessage {
            channel: channel.to_string(),
            text: text.to_string(),
        });
    }

    /// Test/local-run helper: enqueue a callback as if a button were pressed.
    pub fn push_callback(&self, channel: &str, id: &str) {
        self.inner.lock().callbacks.push_back(Callback {
            channel: channel.to_string(),
            id: id.to_string(),
        });
    }

    /// Test helper: read back whatever is currently stored under a ref.
    pub fn message_text(&self, message_ref: &MessageRef) -> Option<String> {
        self.inner.lock().messages.get(message_ref).cloned()
    }
}

#[async_trait]
impl Transport for InMemoryTransport {
    async fn send(&self, _channel: &str, message: &str) -> Result<MessageRef, TransportError> {
        let mut inner = self.inner.lock();
        inner.next_ref += 1;
        let message_ref = format!("msg-{}", inner.next_ref);
        inner.messages.insert(message_ref.clone(), message.to_string());
        Ok(message_ref)
    }

    async fn edit(&self, message_ref: &MessageRef, message: &str) -> Result<MessageRef, TransportError> {
        let mut inner = self.inner.lock();
        if !inner.messages.contains_key(message_ref) {
            return Err(TransportError::RefNotFound(message_ref.clone()));
        }
        inner.messages.insert(message_ref.clone(), message.to_string());
        Ok(message_ref.clone())
    }

    async fn delete(&self, message_ref: &MessageRef) -> Result<bool, TransportError> {
        Ok(self.inner.lock().messages.remove(message_ref).is_some())
    }

    async fn incoming_messages(&self) -> Vec<IncomingMessage> {
        self.inner.lock().incoming.drain(..).collect()
    }

    async fn callbacks(&self) -> Vec<Callback> {
        self.inner.lock().callbacks.drain(..).collect()
    }
}

/// Parse one of the supervisor's namespaced callback ids. `answer:<id>` and
/// `auto:<id>` carry a payload; the bare control callbacks don't.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CallbackAction {
    Answer(String),
    Auto(String),
    Cancel,
    Pause,
    Expand,
    Continue,
}

pub fn parse_callback_id(id: &str) -> Option<CallbackAction> {
    if let Some(request_id) = id.strip_prefix("answer:") {
        return Some(CallbackAction::Answer(request_id.to_string()));
    }
    if let Some(request_id) = id.strip_prefix("auto:") {
        return Some(CallbackAction::Auto(request_id.to_string()));
    }
    match id {
        "cancel" => Some(CallbackAction::Cancel),
        "pause" => Some(CallbackAction::Pause),
        "expand" => Some(CallbackAction::Expand),
        "continue" => Some(CallbackAction::Continue),
        _ => None,
    }
}

#[cfg(test)]
#[path = "transport_tests.rs"]
mod tests;
