//! Core Data Model
//!
//! Repository references, fetched file entries, classification partitions,
//! and the normalized analysis result every parse path converges on.

use serde::{Deserialize, Serialize};

// =============================================================================
// Repository Identity
// =============================================================================

/// Owner/repo pair identifying all hosting-API calls for one request
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RepositoryRef {
    pub owner: String,
    pub repo: String,
}

impl RepositoryRef {
    pub fn new(owner: impl Into<String>, repo: impl Into<String>) -> Self {
        Self {
            owner: owner.into(),
            repo: repo.into(),
        }
    }

    /// `owner/repo` slug used in logs and chat repository ids
    pub fn slug(&self) -> String {
        format!("{}/{}", self.owner, self.repo)
    }
}

impl std::fmt::Display for RepositoryRef {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}/{}", self.owner, self.repo)
    }
}

// =============================================================================
// File Tree & Contents
// =============================================================================

/// One entry of the recursive git tree listing
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TreeEntry {
    pub path: String,
    /// `blob` for files, `tree` for directories
    #[serde(rename = "type")]
    pub entry_type: String,
    #[serde(default)]
    pub size: Option<u64>,
}

impl TreeEntry {
    pub fn is_blob(&self) -> bool {
        self.entry_type == "blob"
    }
}

/// A fetched, UTF-8 decoded repository file
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FileEntry {
    pub path: String,
    pub content: String,
    pub size: usize,
}

/// Partition of a repository's blob paths into disjoint categories.
/// Classification priority: config > tests > docs > build > assets > source.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FileCategories {
    pub config: Vec<String>,
    pub source: Vec<String>,
    pub tests: Vec<String>,
    pub docs: Vec<String>,
    pub assets: Vec<String>,
    pub build: Vec<String>,
}

impl FileCategories {
    pub fn total(&self) -> usize {
        self.config.len()
            + self.source.len()
            + self.tests.len()
            + self.docs.len()
            + self.assets.len()
            + self.build.len()
    }
}

// =============================================================================
// Analysis Result
// =============================================================================

/// An API endpoint surfaced by analysis
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Endpoint {
    pub method: String,
    pub path: String,
    #[serde(default)]
    pub description: String,
}

/// A function surfaced by analysis
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FunctionInfo {
    pub name: String,
    #[serde(default)]
    pub description: String,
}

/// Normalized analysis output. Every field defaults so a partial or absent
/// model response still yields a complete value - no field is ever null
/// once it crosses a component boundary.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct AnalysisResult {
    pub overview: String,
    pub endpoints: Vec<Endpoint>,
    pub functions: Vec<FunctionInfo>,
    pub dependencies: Vec<String>,
    pub architecture: String,
    #[serde(alias = "keyFeatures")]
    pub key_features: Vec<String>,
    #[serde(alias = "setupSteps")]
    pub setup_steps: Vec<String>,
}

// =============================================================================
// Publish Result
// =============================================================================

/// Result of a successful documentation publish
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PullRequestResult {
    pub number: u64,
    pub url: String,
    pub branch_name: String,
    pub files_created: Vec<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_repository_ref_slug() {
        let repo = RepositoryRef::new("octocat", "hello-world");
        assert_eq!(repo.slug(), "octocat/hello-world");
        assert_eq!(repo.to_string(), "octocat/hello-world");
    }

    #[test]
    fn test_tree_entry_blob() {
        let blob = TreeEntry {
            path: "src/main.rs".into(),
            entry_type: "blob".into(),
            size: Some(100),
        };
        let dir = TreeEntry {
            path: "src".into(),
            entry_type: "tree".into(),
            size: None,
        };
        assert!(blob.is_blob());
        assert!(!dir.is_blob());
    }

    #[test]
    fn test_analysis_result_defaults_absent_fields() {
        // A payload missing most keys still decodes with concrete defaults.
        let result: AnalysisResult =
            serde_json::from_str(r#"{"overview": "a tool"}"#).unwrap();
        assert_eq!(result.overview, "a tool");
        assert!(result.endpoints.is_empty());
        assert!(result.functions.is_empty());
        assert!(result.dependencies.is_empty());
        assert_eq!(result.architecture, "");
    }

    #[test]
    fn test_endpoint_description_defaults() {
        let ep: Endpoint =
            serde_json::from_str(r#"{"method": "GET", "path": "/api/users"}"#).unwrap();
        assert_eq!(ep.description, "");
    }
}
