//! GitHub Integration
//!
//! URL parsing, REST client, file classification, bounded content
//! fetching, and documentation publishing.

mod classifier;
mod client;
mod fetcher;
mod publisher;
mod url;

pub use classifier::{categorize_files, language_from_extension};
pub use client::{GithubClient, PullRequestParams, RepoInfo};
pub use fetcher::fetch_contents;
pub use publisher::{PublishOutcome, Publisher};
pub use url::parse_repo_url;
