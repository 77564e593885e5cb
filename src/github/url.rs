//! Repository URL Parsing
//!
//! Extracts the owner/repo pair from the common shapes of a GitHub URL.

use regex::Regex;
use std::sync::LazyLock;

use crate::types::{DocweaveError, RepositoryRef, Result};

static REPO_URL: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"github\.com/([^/]+)/([^/?]+)").expect("valid regex"));

/// Parse a GitHub repository URL into its owner/repo pair.
///
/// Accepts `https://github.com/owner/repo`, with or without a trailing
/// `.git` suffix, extra path segments, or query strings. Anything that
/// does not contain a `github.com/owner/repo` core is rejected.
pub fn parse_repo_url(url: &str) -> Result<RepositoryRef> {
    let caps = REPO_URL.captures(url).ok_or_else(|| {
        DocweaveError::InvalidUrl(format!("Invalid GitHub repository URL: {}", url))
    })?;

    let owner = caps[1].to_string();
    let repo = caps[2].trim_end_matches(".git").to_string();

    if owner.is_empty() || repo.is_empty() {
        return Err(DocweaveError::InvalidUrl(format!(
            "Invalid GitHub repository URL: {}",
            url
        )));
    }

    Ok(RepositoryRef::new(owner, repo))
}
