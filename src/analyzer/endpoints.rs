//! Endpoint Extraction
//!
//! Regex-based scan for HTTP route registrations and GraphQL root types.
//! Lines are scanned as-is: commented-out routes still match, which keeps
//! the scan cheap and surfaces recently disabled endpoints too.

use regex::Regex;
use serde::{Deserialize, Serialize};
use std::sync::LazyLock;

/// Express-style route call: `.get('/path')`, `router.post("/path")`
static ROUTE_CALL: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"(?i)\.(get|post|put|delete|patch)\s*\(\s*['"`]([^'"`]+)['"`]"#)
        .expect("valid regex")
});

/// Flask/FastAPI decorator: `@app.route('/path')`, `@app.get('/path')`
static DECORATOR: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"(?i)@app\.(route|get|post|put|delete)\s*\(\s*['"`]([^'"`]+)['"`]"#)
        .expect("valid regex")
});

/// One endpoint registration found in source text
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EndpointMatch {
    pub method: String,
    pub path: String,
    pub file: String,
    pub line: usize,
}

/// Scan file content for endpoint registrations.
///
/// A `@app.route(...)` decorator without an explicit verb reports GET.
/// GraphQL `type Query` / `type Mutation` lines report method GRAPHQL
/// with the trimmed line as the path. No matches is an empty vec, never
/// an error.
pub fn extract_endpoints(content: &str, file: &str) -> Vec<EndpointMatch> {
    let mut endpoints = Vec::new();

    for (index, line) in content.lines().enumerate() {
        let line_no = index + 1;

        if let Some(caps) = ROUTE_CALL.captures(line) {
            endpoints.push(EndpointMatch {
                method: caps[1].to_uppercase(),
                path: caps[2].to_string(),
                file: file.to_string(),
                line: line_no,
            });
        }

        if let Some(caps) = DECORATOR.captures(line) {
            let verb = &caps[1];
            let method = if verb.eq_ignore_ascii_case("route") {
                "GET".to_string()
            } else {
                verb.to_uppercase()
            };
            endpoints.push(EndpointMatch {
                method,
                path: caps[2].to_string(),
                file: file.to_string(),
                line: line_no,
            });
        }

        if line.contains("type Query") || line.contains("type Mutation") {
            endpoints.push(EndpointMatch {
                method: "GRAPHQL".to_string(),
                path: line.trim().to_string(),
                file: file.to_string(),
                line: line_no,
            });
        }
    }

    endpoints
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_express_route_call() {
        let endpoints = extract_endpoints("router.post('/api/login', handler);", "auth.js");
        assert_eq!(endpoints.len(), 1);
        assert_eq!(endpoints[0].method, "POST");
        assert_eq!(endpoints[0].path, "/api/login");
        assert_eq!(endpoints[0].line, 1);
    }

    #[test]
    fn test_verb_case_insensitive() {
        let endpoints = extract_endpoints("app.GET('/health')", "app.js");
        assert_eq!(endpoints[0].method, "GET");
    }

    #[test]
    fn test_decorator_route_defaults_to_get() {
        let content = "@app.route('/users')\ndef list_users():\n    pass\n";
        let endpoints = extract_endpoints(content, "app.py");
        assert_eq!(endpoints.len(), 1);
        assert_eq!(endpoints[0].method, "GET");
        assert_eq!(endpoints[0].path, "/users");
    }

    #[test]
    fn test_decorator_explicit_verb() {
        let endpoints = extract_endpoints("@app.delete('/users/{id}')", "app.py");
        assert_eq!(endpoints[0].method, "DELETE");
    }

    #[test]
    fn test_graphql_root_types() {
        let content = "type Query {\n  users: [User]\n}\ntype Mutation {\n";
        let endpoints = extract_endpoints(content, "schema.graphql");
        assert_eq!(endpoints.len(), 2);
        assert_eq!(endpoints[0].method, "GRAPHQL");
        assert_eq!(endpoints[0].path, "type Query {");
        assert_eq!(endpoints[1].line, 4);
    }

    #[test]
    fn test_commented_lines_still_match() {
        // Disabled routes are reported on purpose.
        let endpoints = extract_endpoints("// router.get('/legacy')", "routes.js");
        assert_eq!(endpoints.len(), 1);
        assert_eq!(endpoints[0].path, "/legacy");
    }

    #[test]
    fn test_no_matches_yields_empty() {
        assert!(extract_endpoints("const x = 1;", "x.js").is_empty());
    }
}
