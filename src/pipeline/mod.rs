//! Analysis & Documentation Pipeline
//!
//! Orchestrates the end-to-end flows: connect → analyze → generate →
//! publish. The pipeline owns the GitHub client and the AI provider;
//! the HTTP layer only translates requests and responses.

use std::collections::BTreeMap;
use std::sync::Arc;
use tracing::{info, warn};

use crate::ai::{self, GeminiProvider, RetryPolicy, SharedProvider};
use crate::analyzer;
use crate::config::Config;
use crate::github::{
    self, GithubClient, PublishOutcome, Publisher, RepoInfo, categorize_files, fetch_contents,
};
use crate::types::{
    AnalysisResult, DocweaveError, Endpoint, FileCategories, FileEntry, FunctionInfo,
    RepositoryRef, Result, Role,
};

/// Corpus statistics reported alongside analysis
#[derive(Debug, Clone, serde::Serialize)]
pub struct CorpusStats {
    pub total_files: usize,
    pub files_fetched: usize,
    pub categories: CategoryCounts,
    pub languages: BTreeMap<String, usize>,
    /// Import/require edges detected across the fetched corpus
    pub relationships: usize,
}

#[derive(Debug, Clone, serde::Serialize)]
pub struct CategoryCounts {
    pub config: usize,
    pub source: usize,
    pub tests: usize,
    pub docs: usize,
    pub assets: usize,
    pub build: usize,
}

impl From<&FileCategories> for CategoryCounts {
    fn from(categories: &FileCategories) -> Self {
        Self {
            config: categories.config.len(),
            source: categories.source.len(),
            tests: categories.tests.len(),
            docs: categories.docs.len(),
            assets: categories.assets.len(),
            build: categories.build.len(),
        }
    }
}

/// Full analysis output for one repository
#[derive(Debug, Clone)]
pub struct RepositoryAnalysis {
    pub repo: RepositoryRef,
    pub info: RepoInfo,
    pub result: AnalysisResult,
    /// Raw model response before normalization
    pub raw_analysis: String,
    pub stats: CorpusStats,
}

/// Documentation generation output, publish-partial-failure aware
#[derive(Debug, Clone)]
pub struct DocGeneration {
    pub analysis: RepositoryAnalysis,
    pub markdown: String,
    pub outcome: PublishOutcome,
}

pub struct Pipeline {
    github: GithubClient,
    provider: Option<SharedProvider>,
    retry: RetryPolicy,
    config: Config,
}

impl Pipeline {
    /// Build the pipeline from validated configuration. A missing AI key
    /// is tolerated only when degraded mode is allowed; analysis calls
    /// then fail at request time.
    pub fn new(config: Config) -> Result<Self> {
        let github = GithubClient::new(&config.github)?;

        let provider: Option<SharedProvider> =
            if config.ai.api_key.as_deref().unwrap_or("").is_empty() {
                None
            } else {
                Some(Arc::new(GeminiProvider::new(&config.ai)?))
            };

        let retry = RetryPolicy::new(config.ai.max_retries, config.ai.retry_base_delay_ms);

        Ok(Self {
            github,
            provider,
            retry,
            config,
        })
    }

    #[cfg(test)]
    pub fn with_parts(
        github: GithubClient,
        provider: Option<SharedProvider>,
        config: Config,
    ) -> Self {
        let retry = RetryPolicy::new(config.ai.max_retries, config.ai.retry_base_delay_ms);
        Self {
            github,
            provider,
            retry,
            config,
        }
    }

    pub fn provider(&self) -> Option<SharedProvider> {
        self.provider.clone()
    }

    // =========================================================================
    // Operations
    // =========================================================================

    /// Resolve a repository URL and fetch its metadata
    pub async fn connect(&self, repo_url: &str) -> Result<(RepositoryRef, RepoInfo)> {
        let repo = github::parse_repo_url(repo_url)?;
        info!(repository = %repo, "Connecting to repository");
        let info = self.github.get_repo(&repo).await?;
        Ok((repo, info))
    }

    /// Analyze a repository: classify the tree, fetch a capped corpus,
    /// run the model analysis, and normalize the response.
    pub async fn analyze_repository(&self, repo_url: &str, role: Role) -> Result<RepositoryAnalysis> {
        let provider = self.provider.clone().ok_or_else(|| {
            DocweaveError::Config("AI provider not configured - analysis unavailable".to_string())
        })?;

        let (repo, info) = self.connect(repo_url).await?;

        let tree = self.github.get_tree(&repo, &info.default_branch).await?;
        let categories = categorize_files(&tree);
        info!(
            repository = %repo,
            role = %role,
            total = tree.len(),
            source = categories.source.len(),
            config = categories.config.len(),
            "Classified repository tree"
        );

        // Size cap comes from the tree listing; oversized files are never fetched.
        let oversized: std::collections::HashSet<&str> = tree
            .iter()
            .filter(|e| e.size.is_some_and(|s| s > self.config.github.max_file_size))
            .map(|e| e.path.as_str())
            .collect();

        let source_paths: Vec<String> = categories
            .source
            .iter()
            .filter(|p| !oversized.contains(p.as_str()))
            .take(self.config.github.file_limit)
            .cloned()
            .collect();
        let config_paths: Vec<String> = categories
            .config
            .iter()
            .filter(|p| !oversized.contains(p.as_str()))
            .take(self.config.github.config_files_limit)
            .cloned()
            .collect();

        let mut paths = source_paths;
        paths.extend(config_paths);
        let files = fetch_contents(
            &self.github,
            &repo,
            &paths,
            self.config.github.fetch_concurrency,
        )
        .await;

        let stats = Self::corpus_stats(&tree, &categories, &files);

        let corpus = ai::prompt::render_corpus(&files, self.config.github.content_truncate_chars);
        let prompt = ai::prompt::analysis_prompt(&info, &corpus, stats.relationships);

        let raw = {
            let provider = provider.clone();
            ai::retry_generation(self.retry, move || {
                let provider = provider.clone();
                let prompt = prompt.clone();
                async move { provider.generate(&prompt).await }
            })
            .await?
        };

        let mut result = ai::parse_analysis(&raw);
        Self::merge_heuristics(&mut result, &files);

        Ok(RepositoryAnalysis {
            repo,
            info,
            result,
            raw_analysis: raw,
            stats,
        })
    }

    /// Generate role-tailored documentation and publish it as a PR.
    /// Publish failure is not fatal: the outcome carries the markdown.
    pub async fn generate_documentation(&self, repo_url: &str, role: Role) -> Result<DocGeneration> {
        let analysis = self.analyze_repository(repo_url, role).await?;
        let provider = self.provider.clone().ok_or_else(|| {
            DocweaveError::Config("AI provider not configured - generation unavailable".to_string())
        })?;

        let prompt = ai::prompt::documentation_prompt(&analysis.info, role, &analysis.result);
        let markdown = {
            let provider = provider.clone();
            ai::retry_generation(self.retry, move || {
                let provider = provider.clone();
                let prompt = prompt.clone();
                async move { provider.generate(&prompt).await }
            })
            .await?
        };

        self.save_docs_locally(&analysis.repo, role, &markdown);

        let outcome = Publisher::new(&self.github)
            .publish(
                &analysis.repo,
                &analysis.info,
                role,
                &analysis.result,
                &markdown,
            )
            .await;

        Ok(DocGeneration {
            analysis,
            markdown,
            outcome,
        })
    }

    // =========================================================================
    // Internal
    // =========================================================================

    /// Keep a local copy of generated docs so chat sessions can load them
    /// as context. Best-effort only.
    fn save_docs_locally(&self, repo: &RepositoryRef, role: Role, markdown: &str) {
        let dir = self
            .config
            .chat
            .docs_dir
            .join(repo.slug().replace('/', "_"));
        let write = std::fs::create_dir_all(&dir).and_then(|_| {
            std::fs::write(dir.join(format!("{}-guide.md", role.as_str())), markdown)
        });
        if let Err(e) = write {
            warn!(dir = %dir.display(), error = %e, "Failed to save docs locally");
        }
    }

    /// Fold deterministic extractor findings into the model's result so
    /// a thin model response still reports what the regexes can see.
    fn merge_heuristics(result: &mut AnalysisResult, files: &[FileEntry]) {
        for file in files {
            for found in analyzer::extract_endpoints(&file.content, &file.path) {
                let duplicate = result
                    .endpoints
                    .iter()
                    .any(|e| e.method == found.method && e.path == found.path);
                if !duplicate {
                    result.endpoints.push(Endpoint {
                        method: found.method,
                        path: found.path,
                        description: String::new(),
                    });
                }
            }

            for found in analyzer::extract_functions(&file.content, &file.path) {
                if !result.functions.iter().any(|f| f.name == found.name) {
                    result.functions.push(FunctionInfo {
                        name: found.name,
                        description: String::new(),
                    });
                }
            }

            for dep in analyzer::extract_dependencies(&file.path, &file.content) {
                if !result.dependencies.contains(&dep) {
                    result.dependencies.push(dep);
                }
            }
        }
    }

    fn corpus_stats(
        tree: &[crate::types::TreeEntry],
        categories: &FileCategories,
        files: &[FileEntry],
    ) -> CorpusStats {
        let mut languages: BTreeMap<String, usize> = BTreeMap::new();
        for entry in tree.iter().filter(|e| e.is_blob()) {
            if let Some(language) = github::language_from_extension(&entry.path) {
                *languages.entry(language.to_string()).or_default() += 1;
            }
        }

        let relationships = files
            .iter()
            .map(|f| analyzer::extract_imports(&f.content, &f.path).len())
            .sum();

        CorpusStats {
            total_files: tree.iter().filter(|e| e.is_blob()).count(),
            files_fetched: files.len(),
            categories: CategoryCounts::from(categories),
            languages,
            relationships,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ai::testing::ScriptedProvider;
    use crate::config::GithubConfig;

    fn pipeline(server: &mockito::Server, provider: Option<SharedProvider>) -> Pipeline {
        let mut config = Config::default();
        config.github = GithubConfig {
            token: Some("ghp_test".to_string()),
            api_base: server.url(),
            ..Default::default()
        };
        config.chat.docs_dir = std::env::temp_dir().join("docweave-pipeline-tests");
        let github = GithubClient::new(&config.github).unwrap();
        Pipeline::with_parts(github, provider, config)
    }

    async fn mock_repo_endpoints(server: &mut mockito::Server) {
        server
            .mock("GET", "/repos/octocat/hello-world")
            .with_status(200)
            .with_body(
                serde_json::json!({
                    "name": "hello-world",
                    "description": "demo",
                    "language": "JavaScript",
                    "stargazers_count": 5,
                    "html_url": "https://github.com/octocat/hello-world",
                    "default_branch": "main",
                })
                .to_string(),
            )
            .create_async()
            .await;
        server
            .mock("GET", "/repos/octocat/hello-world/git/trees/main?recursive=1")
            .with_status(200)
            .with_body(
                serde_json::json!({
                    "tree": [
                        {"path": "src/app.js", "type": "blob", "size": 120},
                        {"path": "package.json", "type": "blob", "size": 80},
                        {"path": "src", "type": "tree"}
                    ]
                })
                .to_string(),
            )
            .create_async()
            .await;

        use base64::Engine;
        let b64 = |text: &str| base64::engine::general_purpose::STANDARD.encode(text);
        server
            .mock("GET", "/repos/octocat/hello-world/contents/src/app.js")
            .with_status(200)
            .with_body(
                serde_json::json!({
                    "content": b64(
                        "import express from 'express';\napp.get('/api/ping', handler);\nconst start = () => {};\n",
                    ),
                    "size": 50,
                })
                .to_string(),
            )
            .create_async()
            .await;
        server
            .mock("GET", "/repos/octocat/hello-world/contents/package.json")
            .with_status(200)
            .with_body(
                serde_json::json!({
                    "content": b64(r#"{"dependencies": {"express": "^4"}}"#),
                    "size": 35,
                })
                .to_string(),
            )
            .create_async()
            .await;
    }

    #[tokio::test]
    async fn test_connect_rejects_bad_url() {
        let server = mockito::Server::new_async().await;
        let pipeline = pipeline(&server, None);
        assert!(matches!(
            pipeline.connect("not-a-url").await,
            Err(DocweaveError::InvalidUrl(_))
        ));
    }

    #[tokio::test]
    async fn test_analyze_requires_provider() {
        let server = mockito::Server::new_async().await;
        let pipeline = pipeline(&server, None);
        let err = pipeline
            .analyze_repository("https://github.com/octocat/hello-world", Role::Backend)
            .await;
        assert!(matches!(err, Err(DocweaveError::Config(_))));
    }

    #[tokio::test]
    async fn test_analyze_merges_model_and_heuristics() {
        let mut server = mockito::Server::new_async().await;
        mock_repo_endpoints(&mut server).await;

        let provider = ScriptedProvider::always(
            r#"{"overview": "a demo app", "endpoints": [], "dependencies": ["pg"]}"#,
        );
        let pipeline = pipeline(&server, Some(provider));

        let analysis = pipeline
            .analyze_repository("https://github.com/octocat/hello-world", Role::Backend)
            .await
            .unwrap();

        assert_eq!(analysis.result.overview, "a demo app");
        // Heuristics supply what the model left out.
        assert!(
            analysis
                .result
                .endpoints
                .iter()
                .any(|e| e.method == "GET" && e.path == "/api/ping")
        );
        assert!(analysis.result.functions.iter().any(|f| f.name == "start"));
        assert!(analysis.result.dependencies.contains(&"pg".to_string()));
        assert!(analysis.result.dependencies.contains(&"express".to_string()));

        assert_eq!(analysis.stats.total_files, 2);
        assert_eq!(analysis.stats.files_fetched, 2);
        assert_eq!(analysis.stats.categories.source, 1);
        assert_eq!(analysis.stats.languages.get("JavaScript"), Some(&1));
        // The import line in app.js is counted as a relationship edge.
        assert_eq!(analysis.stats.relationships, 1);
    }
}
