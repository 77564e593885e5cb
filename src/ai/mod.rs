//! AI Integration
//!
//! Prompt construction, provider access, retry policy, and response
//! normalization for the generation backend.

pub mod parser;
pub mod prompt;
mod provider;
mod retry;

pub use parser::parse_analysis;
pub use provider::{GeminiProvider, LlmProvider, SharedProvider};
pub use retry::{RetryPolicy, retry_generation};

#[cfg(test)]
pub use provider::testing;
