//! Append-only conversation history, keyed by session.

use std::collections::HashMap;

use crate::types::ModelMessage;

/// Ordered, append-only message history for one session.
///
/// `append` is the only mutator. Messages are never reordered, edited, or
/// truncated; the log grows monotonically for the lifetime of the session.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Conversation {
    messages: Vec<ModelMessage>,
}

impl Conversation {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a message to the end of the history.
    pub fn append(&mut self, message: ModelMessage) {
        self.messages.push(message);
    }

    /// The full ordered history.
    pub fn messages(&self) -> &[ModelMessage] {
        &self.messages
    }

    pub fn len(&self) -> usize {
        self.messages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }

    /// The most recent message, if any.
    pub fn last(&self) -> Option<&ModelMessage> {
        self.messages.last()
    }
}

/// Manages conversations keyed by session identifier.
///
/// One `Conversation` per session id; state is never shared across
/// sessions. The binary runs a single session, but the plumbing is
/// session-keyed so nothing assumes a global history.
#[derive(Debug, Default)]
pub struct SessionManager {
    sessions: HashMap<String, Conversation>,
}

impl SessionManager {
    pub fn new() -> Self {
        Self::default()
    }

    /// Get or create a session by id.
    pub fn get_or_create(&mut self, session_id: &str) -> &mut Conversation {
        self.sessions.entry(session_id.to_string()).or_default()
    }

    /// Get an existing session.
    pub fn get(&self, session_id: &str) -> Option<&Conversation> {
        self.sessions.get(session_id)
    }

    /// Remove a session, returning its history.
    pub fn remove(&mut self, session_id: &str) -> Option<Conversation> {
        self.sessions.remove(session_id)
    }

    /// List session ids.
    pub fn session_ids(&self) -> Vec<&str> {
        self.sessions.keys().map(|k| k.as_str()).collect()
    }
}
