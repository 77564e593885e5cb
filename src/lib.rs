//! DocWeave - AI-Generated Repository Documentation Service
//!
//! Connects to a GitHub repository, analyzes a capped corpus of its
//! source with a generative model, assembles role-tailored markdown
//! guides, and publishes them back as a pull request. A chat assistant
//! answers questions over the generated docs.
//!
//! ## Pipeline
//!
//! 1. **Connect**: parse the repository URL, fetch metadata
//! 2. **Classify**: partition the file tree into categories
//! 3. **Fetch**: bounded concurrent download of a capped corpus
//! 4. **Analyze**: model call with retry, normalized via strict-JSON or
//!    markdown-fallback parsing
//! 5. **Generate**: role-tailored documentation prompt
//! 6. **Publish**: branch + commit + pull request, partial-failure aware
//!
//! ## Modules
//!
//! - [`github`]: URL parsing, REST client, classifier, fetcher, publisher
//! - [`analyzer`]: heuristic regex extractors over source text
//! - [`ai`]: prompts, provider access, retry policy, response parsing
//! - [`chat`]: session store and documentation assistant
//! - [`pipeline`]: end-to-end orchestration
//! - [`server`]: axum HTTP surface consumed by the UI

pub mod ai;
pub mod analyzer;
pub mod chat;
pub mod config;
pub mod constants;
pub mod github;
pub mod pipeline;
pub mod server;
pub mod types;

// =============================================================================
// Core Re-exports
// =============================================================================

pub use config::{Config, ConfigLoader};
pub use pipeline::Pipeline;
pub use types::{DocweaveError, ErrorCategory, Result, Role};
