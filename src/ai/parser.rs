//! Response Parser
//!
//! Normalizes whatever the model returns into an `AnalysisResult`. The
//! happy path is strict JSON after stripping code fences; when that
//! fails the raw text is treated as markdown, routed section-by-section
//! through the heuristic extractors, and deduplicated. Both paths
//! converge on the same shape.

use regex::Regex;
use std::collections::HashSet;
use std::sync::LazyLock;
use tracing::debug;

use crate::analyzer;
use crate::types::{AnalysisResult, Endpoint, FunctionInfo};

/// Bullet like `- GET /api/users - list users` or `* POST /login`
static BULLET_ENDPOINT: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?im)^\s*[-*]\s*`?(GET|POST|PUT|DELETE|PATCH)`?\s+`?(/\S+?)`?\s*(?:[-:]\s*(.*))?$")
        .expect("valid regex")
});

/// Bullet like `- fetchUser() - loads a user` or `* parse - parses input`
static BULLET_FUNCTION: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?m)^\s*[-*]\s*`?(\w+)`?(?:\(\))?\s*[-:]\s*(.+)$").expect("valid regex")
});

/// Bullet naming a bare dependency: `- express` or `* lodash`
static BULLET_ITEM: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?m)^\s*[-*]\s*`?([\w@/.-]+)`?\s*$").expect("valid regex"));

/// Parse a raw model response into a normalized `AnalysisResult`.
///
/// Never errors: an unparseable response degrades to whatever the
/// markdown fallback can extract, possibly an empty result.
pub fn parse_analysis(raw: &str) -> AnalysisResult {
    let cleaned = strip_fences(raw);

    match serde_json::from_str::<AnalysisResult>(&cleaned) {
        Ok(result) => dedup(result),
        Err(e) => {
            debug!(error = %e, "Strict JSON decode failed, falling back to markdown parse");
            dedup(parse_markdown(raw))
        }
    }
}

/// Strip a leading/trailing ```json fence pair the model wraps output
/// in. Fences inside the payload are left alone.
fn strip_fences(raw: &str) -> String {
    let trimmed = raw.trim();
    let Some(rest) = trimmed
        .strip_prefix("```json")
        .or_else(|| trimmed.strip_prefix("```"))
    else {
        return trimmed.to_string();
    };
    rest.trim().strip_suffix("```").unwrap_or(rest).trim().to_string()
}

// =============================================================================
// Markdown Fallback
// =============================================================================

fn parse_markdown(raw: &str) -> AnalysisResult {
    let mut result = AnalysisResult::default();

    for (heading, body) in sections(raw) {
        let key = heading.to_lowercase();

        if key.contains("overview") || key.contains("about") || key.contains("description") {
            if result.overview.is_empty() {
                result.overview = body.trim().to_string();
            }
        } else if key.contains("endpoint") || key.contains("api") || key.contains("route") {
            result.endpoints.extend(markdown_endpoints(&body));
        } else if key.contains("function") || key.contains("component") {
            result.functions.extend(markdown_functions(&body));
        } else if key.contains("dependenc") || key.contains("package") || key.contains("library") {
            result.dependencies.extend(markdown_items(&body));
        } else if key.contains("architecture") || key.contains("structure") {
            if result.architecture.is_empty() {
                result.architecture = body.trim().to_string();
            }
        } else if key.contains("feature") {
            result.key_features.extend(markdown_items(&body));
        } else if key.contains("setup") || key.contains("install") || key.contains("getting started")
        {
            result.setup_steps.extend(markdown_items(&body));
        }
    }

    // Headingless responses: treat the whole text as one endpoint/function
    // hunting ground and the first paragraph as the overview.
    if result.overview.is_empty() && !raw.contains("##") {
        result.overview = raw
            .split("\n\n")
            .next()
            .unwrap_or("")
            .trim()
            .to_string();
        result.endpoints.extend(markdown_endpoints(raw));
    }

    result
}

/// Split markdown text into (heading, body) pairs on `##` headers
fn sections(raw: &str) -> Vec<(String, String)> {
    let mut sections = Vec::new();
    let mut heading: Option<String> = None;
    let mut body = String::new();

    for line in raw.lines() {
        if let Some(rest) = line.strip_prefix("##") {
            if let Some(current) = heading.take() {
                sections.push((current, std::mem::take(&mut body)));
            }
            heading = Some(rest.trim_start_matches('#').trim().to_string());
        } else if heading.is_some() {
            body.push_str(line);
            body.push('\n');
        }
    }
    if let Some(current) = heading {
        sections.push((current, body));
    }

    sections
}

fn markdown_endpoints(body: &str) -> Vec<Endpoint> {
    let mut endpoints: Vec<Endpoint> = BULLET_ENDPOINT
        .captures_iter(body)
        .map(|caps| Endpoint {
            method: caps[1].to_uppercase(),
            path: caps[2].to_string(),
            description: caps
                .get(3)
                .map(|m| m.as_str().trim().to_string())
                .unwrap_or_default(),
        })
        .collect();

    // Route-registration snippets inside the section also count.
    endpoints.extend(
        analyzer::extract_endpoints(body, "")
            .into_iter()
            .map(|m| Endpoint {
                method: m.method,
                path: m.path,
                description: String::new(),
            }),
    );

    endpoints
}

fn markdown_functions(body: &str) -> Vec<FunctionInfo> {
    BULLET_FUNCTION
        .captures_iter(body)
        .filter(|caps| !caps[1].chars().next().is_some_and(|c| c.is_ascii_digit()))
        .map(|caps| FunctionInfo {
            name: caps[1].to_string(),
            description: caps[2].trim().to_string(),
        })
        .collect()
}

fn markdown_items(body: &str) -> Vec<String> {
    BULLET_ITEM
        .captures_iter(body)
        .map(|caps| caps[1].to_string())
        .collect()
}

// =============================================================================
// Deduplication
// =============================================================================

/// Dedup endpoints by (method, path), functions by name, dependencies by
/// string, preserving first-seen order.
fn dedup(mut result: AnalysisResult) -> AnalysisResult {
    let mut seen_endpoints = HashSet::new();
    result
        .endpoints
        .retain(|e| seen_endpoints.insert((e.method.clone(), e.path.clone())));

    let mut seen_functions = HashSet::new();
    result.functions.retain(|f| seen_functions.insert(f.name.clone()));

    let mut seen_deps = HashSet::new();
    result.dependencies.retain(|d| seen_deps.insert(d.clone()));

    result
}

#[cfg(test)]
mod tests {
    use super::*;

    const SEED_JSON: &str = r#"{
        "overview": "A REST API for managing users",
        "endpoints": [
            {"method": "GET", "path": "/api/users", "description": "list users"},
            {"method": "POST", "path": "/api/users", "description": "create a user"}
        ],
        "functions": [{"name": "createUser", "description": "inserts a user"}],
        "dependencies": ["express", "pg"],
        "architecture": "Express routes over a Postgres store"
    }"#;

    #[test]
    fn test_strict_json_path() {
        let result = parse_analysis(SEED_JSON);
        assert_eq!(result.overview, "A REST API for managing users");
        assert_eq!(result.endpoints.len(), 2);
        assert_eq!(result.functions[0].name, "createUser");
        assert_eq!(result.dependencies, vec!["express", "pg"]);
    }

    #[test]
    fn test_fenced_json_stripped() {
        let fenced = format!("```json\n{}\n```", SEED_JSON);
        let result = parse_analysis(&fenced);
        assert_eq!(result.endpoints.len(), 2);
    }

    #[test]
    fn test_markdown_fallback_converges_with_json() {
        // The same facts rendered as markdown must produce an equivalent
        // result through the fallback path.
        let markdown = r#"
## Overview
A REST API for managing users

## Endpoints
- GET /api/users - list users
- POST /api/users - create a user

## Functions
- createUser() - inserts a user

## Dependencies
- express
- pg

## Architecture
Express routes over a Postgres store
"#;
        let from_json = parse_analysis(SEED_JSON);
        let from_md = parse_analysis(markdown);

        assert_eq!(from_md.overview, from_json.overview);
        assert_eq!(from_md.endpoints, from_json.endpoints);
        assert_eq!(from_md.functions, from_json.functions);
        assert_eq!(from_md.dependencies, from_json.dependencies);
        assert_eq!(from_md.architecture, from_json.architecture);
    }

    #[test]
    fn test_inner_fences_survive_stripping() {
        // Only the outer fence pair is removed; backticks inside string
        // values must come through untouched.
        let result = parse_analysis(r#"{"overview": "wrap examples in ``` fences"}"#);
        assert_eq!(result.overview, "wrap examples in ``` fences");

        let fenced = "```json\n{\"overview\": \"wrap examples in ``` fences\"}\n```";
        let result = parse_analysis(fenced);
        assert_eq!(result.overview, "wrap examples in ``` fences");
    }

    #[test]
    fn test_dedup_endpoints_by_method_and_path() {
        let markdown = r#"
## API Endpoints
- GET /api/users - list users
- GET /api/users - duplicate listing
- POST /api/users - create
"#;
        let result = parse_analysis(markdown);
        assert_eq!(result.endpoints.len(), 2);
    }

    #[test]
    fn test_route_snippets_in_endpoint_section() {
        let markdown = "## Routes\nrouter.post('/api/login', handler)\n";
        let result = parse_analysis(markdown);
        assert_eq!(result.endpoints.len(), 1);
        assert_eq!(result.endpoints[0].method, "POST");
        assert_eq!(result.endpoints[0].path, "/api/login");
    }

    #[test]
    fn test_garbage_degrades_to_empty() {
        let result = parse_analysis("total nonsense with no structure");
        assert!(result.endpoints.is_empty());
        assert!(result.functions.is_empty());
        // First paragraph becomes the overview in headingless text.
        assert_eq!(result.overview, "total nonsense with no structure");
    }

    #[test]
    fn test_partial_json_defaults_missing_fields() {
        let result = parse_analysis(r#"{"overview": "just an overview"}"#);
        assert_eq!(result.overview, "just an overview");
        assert!(result.endpoints.is_empty());
        assert_eq!(result.architecture, "");
    }

    #[test]
    fn test_camel_case_keys_accepted() {
        let result = parse_analysis(
            r#"{"overview": "x", "keyFeatures": ["auth"], "setupSteps": ["npm install"]}"#,
        );
        assert_eq!(result.key_features, vec!["auth"]);
        assert_eq!(result.setup_steps, vec!["npm install"]);
    }
}
