//! Session Store
//!
//! In-memory chat session storage. Sessions live for the process
//! lifetime; there is no eviction or persistence.

use dashmap::DashMap;

use crate::types::{ChatMessage, ChatSession, DocweaveError, Result};

/// Storage seam for chat sessions
pub trait SessionStore: Send + Sync {
    /// Insert a new session
    fn create(&self, session: ChatSession);

    /// Fetch a session by id
    fn get(&self, session_id: &str) -> Result<ChatSession>;

    /// Append a message to an existing session
    fn append(&self, session_id: &str, message: ChatMessage) -> Result<()>;
}

/// DashMap-backed store
#[derive(Debug, Default)]
pub struct InMemorySessionStore {
    sessions: DashMap<String, ChatSession>,
}

impl InMemorySessionStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl SessionStore for InMemorySessionStore {
    fn create(&self, session: ChatSession) {
        self.sessions.insert(session.id.clone(), session);
    }

    fn get(&self, session_id: &str) -> Result<ChatSession> {
        self.sessions
            .get(session_id)
            .map(|entry| entry.clone())
            .ok_or_else(|| DocweaveError::SessionNotFound(session_id.to_string()))
    }

    fn append(&self, session_id: &str, message: ChatMessage) -> Result<()> {
        let mut entry = self
            .sessions
            .get_mut(session_id)
            .ok_or_else(|| DocweaveError::SessionNotFound(session_id.to_string()))?;
        entry.messages.push(message);
        Ok(())
    }
}
