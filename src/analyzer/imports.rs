//! Import Edge Extraction
//!
//! Maps module relationships by scanning for import and require lines.

use regex::Regex;
use serde::{Deserialize, Serialize};
use std::sync::LazyLock;

static IMPORT_FROM: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r#"import.*from\s+['"](.*?)['"]"#).expect("valid regex"));

static REQUIRE_CALL: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r#"require\s*\(\s*['"](.*?)['"]\s*\)"#).expect("valid regex"));

/// One import relationship between a file and a module specifier
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImportEdge {
    pub from: String,
    pub to: String,
    pub line: usize,
}

/// Scan file content for `import … from '…'` and `require('…')` edges
pub fn extract_imports(content: &str, file: &str) -> Vec<ImportEdge> {
    let mut edges = Vec::new();

    for (index, line) in content.lines().enumerate() {
        let line_no = index + 1;

        if let Some(caps) = IMPORT_FROM.captures(line) {
            edges.push(ImportEdge {
                from: file.to_string(),
                to: caps[1].to_string(),
                line: line_no,
            });
        }

        if let Some(caps) = REQUIRE_CALL.captures(line) {
            edges.push(ImportEdge {
                from: file.to_string(),
                to: caps[1].to_string(),
                line: line_no,
            });
        }
    }

    edges
}
