//! Documentation Chat
//!
//! Session-scoped Q&A over a repository's generated documentation.

mod service;
mod store;

pub use service::ChatService;
pub use store::{InMemorySessionStore, SessionStore};
