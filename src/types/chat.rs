//! Chat Session Types
//!
//! In-memory session model for the documentation assistant. Sessions live
//! for the process lifetime and are never persisted or evicted.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Who produced a chat turn
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MessageRole {
    User,
    Assistant,
}

impl std::fmt::Display for MessageRole {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            MessageRole::User => write!(f, "user"),
            MessageRole::Assistant => write!(f, "assistant"),
        }
    }
}

/// One turn in a chat session
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatMessage {
    pub id: String,
    pub role: MessageRole,
    pub content: String,
    pub timestamp: DateTime<Utc>,
}

impl ChatMessage {
    pub fn new(role: MessageRole, content: impl Into<String>) -> Self {
        Self {
            id: format!("msg-{}", Uuid::new_v4()),
            role,
            content: content.into(),
            timestamp: Utc::now(),
        }
    }
}

/// A previously generated documentation file loaded as context
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DocContext {
    pub file: String,
    pub content: String,
}

/// A chat session bound to one repository's documentation
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChatSession {
    pub id: String,
    pub repository_id: String,
    pub messages: Vec<ChatMessage>,
    pub context: Vec<DocContext>,
    pub created_at: DateTime<Utc>,
}

impl ChatSession {
    pub fn new(repository_id: impl Into<String>, context: Vec<DocContext>) -> Self {
        Self {
            id: format!("session-{}", Uuid::new_v4()),
            repository_id: repository_id.into(),
            messages: Vec::new(),
            context,
            created_at: Utc::now(),
        }
    }
}
