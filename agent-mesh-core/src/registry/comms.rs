//! Communication log - message creation, emission, and history

use crate::{Error, Result};
use chrono::{DateTime, Utc};
use parking_lot::RwLock;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::debug;

/// A message between two parties on the platform.
///
/// Immutable once created, except for content edits via
/// [`CommsLog::update_message`].
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Message {
    /// Monotonically increasing id, assigned by the log
    pub id: u64,
    pub source: String,
    pub target: String,
    pub content: String,
    pub timestamp: DateTime<Utc>,
    #[serde(rename = "type")]
    pub kind: String,
}

/// Domain events emitted by the communication log
#[derive(Debug, Clone)]
pub enum MessageEvent {
    Created(Message),
    Updated(Message),
}

type MessageListener = Arc<dyn Fn(&MessageEvent) + Send + Sync>;

struct LogInner {
    messages: Vec<Message>,
    next_id: u64,
}

/// The message log. Sole writer for messages; id assignment and insertion
/// happen under one lock so id order always matches call order.
pub struct CommsLog {
    inner: RwLock<LogInner>,
    listeners: RwLock<Vec<MessageListener>>,
}

impl CommsLog {
    pub fn new() -> Self {
        Self {
            inner: RwLock::new(LogInner {
                messages: Vec::new(),
                next_id: 1,
            }),
            listeners: RwLock::new(Vec::new()),
        }
    }

    /// Create and store a message, assigning its id and timestamp.
    ///
    /// Does not notify listeners; callers decide when to [`emit`](Self::emit).
    pub fn create_message(&self, target: &str, source: &str, content: &str) -> Message {
        let message = {
            let mut inner = self.inner.write();
            let message = Message {
                id: inner.next_id,
                source: source.to_string(),
                target: target.to_string(),
                content: content.to_string(),
                timestamp: Utc::now(),
                kind: "message".to_string(),
            };
            inner.next_id += 1;
            inner.messages.push(message.clone());
            message
        };
        debug!(id = message.id, source, target, "Message created");
        message
    }

    /// Broadcast a created message to listeners
    pub fn emit(&self, message: &Message) {
        self.notify(&MessageEvent::Created(message.clone()));
    }

    /// Edit a message's content in place. Emits `MessageEvent::Updated`.
    pub fn update_message(&self, id: u64, content: &str) -> Result<Message> {
        let message = {
            let mut inner = self.inner.write();
            let message = inner
                .messages
                .iter_mut()
                .find(|m| m.id == id)
                .ok_or_else(|| Error::NotFound(format!("Unknown message id: {id}")))?;
            message.content = content.to_string();
            message.clone()
        };

        self.notify(&MessageEvent::Updated(message.clone()));
        Ok(message)
    }

    /// Every message, in id order
    pub fn all(&self) -> Vec<Message> {
        self.inner.read().messages.clone()
    }

    /// Messages sent by `name`
    pub fn by_source(&self, name: &str) -> Vec<Message> {
        self.inner
            .read()
            .messages
            .iter()
            .filter(|m| m.source == name)
            .cloned()
            .collect()
    }

    /// Messages addressed to `name`
    pub fn by_target(&self, name: &str) -> Vec<Message> {
        self.inner
            .read()
            .messages
            .iter()
            .filter(|m| m.target == name)
            .cloned()
            .collect()
    }

    /// Register a listener for message domain events
    pub fn on_event(&self, listener: impl Fn(&MessageEvent) + Send + Sync + 'static) {
        self.listeners.write().push(Arc::new(listener));
    }

    fn notify(&self, event: &MessageEvent) {
        let listeners = self.listeners.read().clone();
        for listener in listeners {
            listener(event);
        }
    }
}

impl Default for CommsLog {
    fn default() -> Self {
        Self::new()
    }
}
