//! Shared Types
//!
//! Data model and error types used across all pipeline stages.

pub mod analysis;
pub mod chat;
pub mod error;
pub mod role;

pub use analysis::{
    AnalysisResult, Endpoint, FileCategories, FileEntry, FunctionInfo, PullRequestResult,
    RepositoryRef, TreeEntry,
};
pub use chat::{ChatMessage, ChatSession, DocContext, MessageRole};
pub use error::{DocweaveError, ErrorCategory, ErrorClassifier, LlmError, Result};
pub use role::Role;
