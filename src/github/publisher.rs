//! Documentation Publisher
//!
//! Commits generated documentation to a fresh branch and opens a pull
//! request. A publish failure after the markdown exists is not fatal:
//! the outcome still carries the generated document so callers can hand
//! it back to the client.

use chrono::Utc;
use tracing::{info, warn};

use super::client::{GithubClient, PullRequestParams, RepoInfo};
use crate::types::{AnalysisResult, PullRequestResult, RepositoryRef, Result, Role};

/// Outcome of a publish attempt. `Failed` still carries the markdown.
#[derive(Debug, Clone)]
pub enum PublishOutcome {
    Published(PullRequestResult),
    Failed { error: String, markdown: String },
}

pub struct Publisher<'a> {
    client: &'a GithubClient,
}

impl<'a> Publisher<'a> {
    pub fn new(client: &'a GithubClient) -> Self {
        Self { client }
    }

    /// Publish a generated guide: branch off the default branch, commit
    /// the guide plus an index, open a pull request.
    pub async fn publish(
        &self,
        repo: &RepositoryRef,
        info: &RepoInfo,
        role: Role,
        analysis: &AnalysisResult,
        markdown: &str,
    ) -> PublishOutcome {
        match self
            .publish_inner(repo, info, role, analysis, markdown)
            .await
        {
            Ok(result) => {
                info!(pr = result.number, branch = %result.branch_name, "Documentation published");
                PublishOutcome::Published(result)
            }
            Err(e) => {
                warn!(error = %e, "Publish failed, returning markdown directly");
                PublishOutcome::Failed {
                    error: format!("Could not create pull request: {}", e),
                    markdown: markdown.to_string(),
                }
            }
        }
    }

    async fn publish_inner(
        &self,
        repo: &RepositoryRef,
        info: &RepoInfo,
        role: Role,
        analysis: &AnalysisResult,
        markdown: &str,
    ) -> Result<PullRequestResult> {
        let branch_name = format!(
            "docs/ai-generated-{}-{}",
            role.as_str(),
            Utc::now().timestamp_millis()
        );

        let base_sha = self
            .client
            .get_branch_sha(repo, &info.default_branch)
            .await?;
        self.client.create_ref(repo, &branch_name, &base_sha).await?;

        let guide_path = format!("docs/{}-guide.md", role.as_str());
        let index_path = "docs/README.md".to_string();

        self.client
            .put_file(
                repo,
                &guide_path,
                &format!("Add {} developer guide generated by AI", role.as_str()),
                markdown,
                &branch_name,
            )
            .await?;

        self.client
            .put_file(
                repo,
                &index_path,
                "Add documentation index",
                &Self::index_markdown(info, role),
                &branch_name,
            )
            .await?;

        let title = format!("AI-Generated {} Documentation", role.title());
        let body = Self::pull_request_body(info, role, analysis, &guide_path);
        let (number, url) = self
            .client
            .create_pull_request(
                repo,
                &PullRequestParams {
                    title: &title,
                    body: &body,
                    head: &branch_name,
                    base: &info.default_branch,
                },
            )
            .await?;

        Ok(PullRequestResult {
            number,
            url,
            branch_name,
            files_created: vec![guide_path, index_path],
        })
    }

    fn index_markdown(info: &RepoInfo, role: Role) -> String {
        format!(
            "# {} Documentation\n\n\
             ## Available Guides\n\n\
             - [{} Guide]({}-guide.md) - Generated for {} developers\n\n\
             Generated by AI on {}",
            info.name,
            role.title(),
            role.as_str(),
            role.as_str(),
            Utc::now().format("%Y-%m-%d"),
        )
    }

    fn pull_request_body(
        info: &RepoInfo,
        role: Role,
        analysis: &AnalysisResult,
        guide_path: &str,
    ) -> String {
        format!(
            "# AI-Generated Documentation\n\n\
             ## What's New\n\
             This PR adds documentation tailored specifically for **{} developers**.\n\n\
             ## Files Added\n\
             - `{}` - Complete guide for {} developers\n\
             - `docs/README.md` - Documentation index\n\n\
             ## Analysis Results\n\
             - **Functions Analyzed**: {}\n\
             - **Dependencies Found**: {}\n\
             - **Endpoints Found**: {}\n\n\
             ## Next Steps\n\
             1. Review the generated documentation\n\
             2. Edit/customize as needed for your project\n\
             3. Merge when satisfied with the content\n\n\
             *Generated from analysis of your {} repository.*",
            role.as_str(),
            guide_path,
            role.as_str(),
            analysis.functions.len(),
            analysis.dependencies.len(),
            analysis.endpoints.len(),
            info.language.as_deref().unwrap_or("code"),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::GithubConfig;
    use mockito::Matcher;

    fn test_client(server: &mockito::Server) -> GithubClient {
        let config = GithubConfig {
            token: Some("ghp_test".to_string()),
            api_base: server.url(),
            ..Default::default()
        };
        GithubClient::new(&config).unwrap()
    }

    fn repo_info() -> RepoInfo {
        serde_json::from_value(serde_json::json!({
            "name": "hello-world",
            "description": "demo",
            "language": "JavaScript",
            "stargazers_count": 1,
            "html_url": "https://github.com/octocat/hello-world",
            "default_branch": "main",
        }))
        .unwrap()
    }

    #[tokio::test]
    async fn test_publish_happy_path() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("GET", "/repos/octocat/hello-world/git/ref/heads/main")
            .with_status(200)
            .with_body(r#"{"object": {"sha": "abc123"}}"#)
            .create_async()
            .await;
        server
            .mock("POST", "/repos/octocat/hello-world/git/refs")
            .match_body(Matcher::PartialJsonString(r#"{"sha": "abc123"}"#.into()))
            .with_status(201)
            .with_body("{}")
            .create_async()
            .await;
        server
            .mock(
                "PUT",
                Matcher::Regex(r"^/repos/octocat/hello-world/contents/docs/.*$".into()),
            )
            .with_status(201)
            .with_body("{}")
            .expect(2)
            .create_async()
            .await;
        server
            .mock("POST", "/repos/octocat/hello-world/pulls")
            .with_status(201)
            .with_body(
                r#"{"number": 3, "html_url": "https://github.com/octocat/hello-world/pull/3"}"#,
            )
            .create_async()
            .await;

        let client = test_client(&server);
        let repo = RepositoryRef::new("octocat", "hello-world");
        let outcome = Publisher::new(&client)
            .publish(
                &repo,
                &repo_info(),
                Role::Backend,
                &AnalysisResult::default(),
                "# Guide",
            )
            .await;

        match outcome {
            PublishOutcome::Published(result) => {
                assert_eq!(result.number, 3);
                assert!(result.branch_name.starts_with("docs/ai-generated-backend-"));
                assert_eq!(
                    result.files_created,
                    vec!["docs/backend-guide.md", "docs/README.md"]
                );
            }
            PublishOutcome::Failed { error, .. } => panic!("publish failed: {}", error),
        }
    }

    #[tokio::test]
    async fn test_publish_failure_carries_markdown() {
        let mut server = mockito::Server::new_async().await;
        // Branch resolution fails outright; the markdown must survive.
        server
            .mock("GET", "/repos/octocat/hello-world/git/ref/heads/main")
            .with_status(403)
            .with_body("{}")
            .create_async()
            .await;

        let client = test_client(&server);
        let repo = RepositoryRef::new("octocat", "hello-world");
        let outcome = Publisher::new(&client)
            .publish(
                &repo,
                &repo_info(),
                Role::Frontend,
                &AnalysisResult::default(),
                "# The Guide Content",
            )
            .await;

        match outcome {
            PublishOutcome::Failed { error, markdown } => {
                assert!(error.contains("Could not create pull request"));
                assert_eq!(markdown, "# The Guide Content");
            }
            PublishOutcome::Published(_) => panic!("expected failure"),
        }
    }
}
