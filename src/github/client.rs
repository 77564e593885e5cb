//! GitHub REST Client
//!
//! Thin wrapper over the GitHub REST API with secure token handling and
//! uniform status-to-error mapping. Every call that can fail upstream
//! goes through `check_status` so auth, missing-resource, and transient
//! failures surface as distinct error variants.

use base64::Engine;
use base64::engine::general_purpose::STANDARD as BASE64;
use secrecy::{ExposeSecret, SecretString};
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::debug;

use crate::config::GithubConfig;
use crate::types::{DocweaveError, FileEntry, RepositoryRef, Result, TreeEntry};

/// Repository metadata returned by `get_repo`
#[derive(Debug, Clone, Deserialize)]
pub struct RepoInfo {
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub language: Option<String>,
    #[serde(default)]
    pub stargazers_count: u64,
    pub html_url: String,
    pub default_branch: String,
}

#[derive(Debug, Deserialize)]
struct TreeResponse {
    tree: Vec<TreeEntry>,
}

#[derive(Debug, Deserialize)]
struct ContentResponse {
    content: String,
    size: usize,
}

#[derive(Debug, Deserialize)]
struct RefResponse {
    object: RefObject,
}

#[derive(Debug, Deserialize)]
struct RefObject {
    sha: String,
}

#[derive(Debug, Deserialize)]
struct PullResponse {
    number: u64,
    html_url: String,
}

/// GitHub REST API client with secure token handling
pub struct GithubClient {
    token: SecretString,
    api_base: String,
    client: reqwest::Client,
}

impl std::fmt::Debug for GithubClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GithubClient")
            .field("token", &"[REDACTED]")
            .field("api_base", &self.api_base)
            .finish()
    }
}

impl GithubClient {
    pub fn new(config: &GithubConfig) -> Result<Self> {
        let token = config.token.clone().ok_or_else(|| {
            DocweaveError::Config(
                "GitHub token not found. Set GITHUB_TOKEN env var or provide in config".to_string(),
            )
        })?;

        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| DocweaveError::GithubApi(format!("Failed to create HTTP client: {}", e)))?;

        Ok(Self {
            token: SecretString::from(token),
            api_base: config.api_base.clone(),
            client,
        })
    }

    // =========================================================================
    // Read Operations
    // =========================================================================

    /// Fetch repository metadata
    pub async fn get_repo(&self, repo: &RepositoryRef) -> Result<RepoInfo> {
        let url = format!("{}/repos/{}/{}", self.api_base, repo.owner, repo.repo);
        let response = self.get(&url).await?;
        response
            .json()
            .await
            .map_err(|e| DocweaveError::GithubApi(format!("Failed to parse repo metadata: {}", e)))
    }

    /// Fetch the full recursive file tree for a branch
    pub async fn get_tree(&self, repo: &RepositoryRef, branch: &str) -> Result<Vec<TreeEntry>> {
        let url = format!(
            "{}/repos/{}/{}/git/trees/{}?recursive=1",
            self.api_base, repo.owner, repo.repo, branch
        );
        let response = self.get(&url).await?;
        let tree: TreeResponse = response
            .json()
            .await
            .map_err(|e| DocweaveError::GithubApi(format!("Failed to parse tree listing: {}", e)))?;
        Ok(tree.tree)
    }

    /// Fetch one file's content, base64-decoded to UTF-8.
    ///
    /// The contents API embeds newlines in its base64 payload; they are
    /// stripped before decoding.
    pub async fn get_content(&self, repo: &RepositoryRef, path: &str) -> Result<FileEntry> {
        let url = format!(
            "{}/repos/{}/{}/contents/{}",
            self.api_base, repo.owner, repo.repo, path
        );
        let response = self.get(&url).await?;
        let body: ContentResponse = response
            .json()
            .await
            .map_err(|e| DocweaveError::GithubApi(format!("Failed to parse content: {}", e)))?;

        let cleaned: String = body.content.chars().filter(|c| !c.is_whitespace()).collect();
        let bytes = BASE64
            .decode(cleaned)
            .map_err(|e| DocweaveError::GithubApi(format!("Invalid base64 for {}: {}", path, e)))?;
        let content = String::from_utf8_lossy(&bytes).into_owned();

        Ok(FileEntry {
            path: path.to_string(),
            content,
            size: body.size,
        })
    }

    /// Resolve a branch name to its head commit sha
    pub async fn get_branch_sha(&self, repo: &RepositoryRef, branch: &str) -> Result<String> {
        let url = format!(
            "{}/repos/{}/{}/git/ref/heads/{}",
            self.api_base, repo.owner, repo.repo, branch
        );
        let response = self.get(&url).await?;
        let reference: RefResponse = response
            .json()
            .await
            .map_err(|e| DocweaveError::GithubApi(format!("Failed to parse ref: {}", e)))?;
        Ok(reference.object.sha)
    }

    // =========================================================================
    // Write Operations
    // =========================================================================

    /// Create a new branch ref pointing at `sha`
    pub async fn create_ref(&self, repo: &RepositoryRef, branch: &str, sha: &str) -> Result<()> {
        let url = format!("{}/repos/{}/{}/git/refs", self.api_base, repo.owner, repo.repo);
        let body = serde_json::json!({
            "ref": format!("refs/heads/{}", branch),
            "sha": sha,
        });
        self.send(self.client.post(&url).json(&body)).await?;
        Ok(())
    }

    /// Create or update one file on a branch
    pub async fn put_file(
        &self,
        repo: &RepositoryRef,
        path: &str,
        message: &str,
        content: &str,
        branch: &str,
    ) -> Result<()> {
        let url = format!(
            "{}/repos/{}/{}/contents/{}",
            self.api_base, repo.owner, repo.repo, path
        );
        let body = serde_json::json!({
            "message": message,
            "content": BASE64.encode(content.as_bytes()),
            "branch": branch,
        });
        self.send(self.client.put(&url).json(&body)).await?;
        Ok(())
    }

    /// Open a pull request from `head` into `base`
    pub async fn create_pull_request(
        &self,
        repo: &RepositoryRef,
        params: &PullRequestParams<'_>,
    ) -> Result<(u64, String)> {
        let url = format!("{}/repos/{}/{}/pulls", self.api_base, repo.owner, repo.repo);
        let response = self.send(self.client.post(&url).json(params)).await?;
        let pull: PullResponse = response
            .json()
            .await
            .map_err(|e| DocweaveError::GithubApi(format!("Failed to parse pull request: {}", e)))?;
        Ok((pull.number, pull.html_url))
    }

    // =========================================================================
    // Internal
    // =========================================================================

    async fn get(&self, url: &str) -> Result<reqwest::Response> {
        self.send(self.client.get(url)).await
    }

    async fn send(&self, request: reqwest::RequestBuilder) -> Result<reqwest::Response> {
        let response = request
            .header(
                "Authorization",
                format!("Bearer {}", self.token.expose_secret()),
            )
            .header("Accept", "application/vnd.github+json")
            .header("User-Agent", "docweave")
            .send()
            .await
            .map_err(|e| DocweaveError::from_transport("GitHub request failed", e))?;

        Self::check_status(response).await
    }

    /// Map error statuses onto upstream error variants:
    /// 401/403 → auth, 404 → not found, 429 and 5xx → transient.
    async fn check_status(response: reqwest::Response) -> Result<reqwest::Response> {
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }

        let body = response.text().await.unwrap_or_default();
        debug!(status = %status, "GitHub API error response");

        let message = format!("GitHub API error ({}): {}", status, body);
        Err(match status.as_u16() {
            401 | 403 => DocweaveError::UpstreamAuth(message),
            404 => DocweaveError::UpstreamNotFound(message),
            429 => DocweaveError::UpstreamTransient(message),
            s if s >= 500 => DocweaveError::UpstreamTransient(message),
            _ => DocweaveError::GithubApi(message),
        })
    }
}

/// Parameters for `create_pull_request`
#[derive(Debug, Serialize)]
pub struct PullRequestParams<'a> {
    pub title: &'a str,
    pub body: &'a str,
    pub head: &'a str,
    pub base: &'a str,
}
