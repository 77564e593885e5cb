//! Function Extraction
//!
//! Extension-gated regex scan for function definitions. A fixed keyword
//! set filters the obvious false positives from binding declarations.

use regex::Regex;
use serde::{Deserialize, Serialize};
use std::sync::LazyLock;

static JS_FUNCTION: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?:function\s+|const\s+|let\s+|var\s+)(\w+)\s*[=(]").expect("valid regex")
});

static JS_ARROW: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?:const\s+|let\s+|var\s+)(\w+)\s*=\s*\([^)]*\)\s*=>").expect("valid regex")
});

static PY_FUNCTION: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"def\s+(\w+)\s*\(").expect("valid regex"));

const JS_EXTENSIONS: &[&str] = &[".js", ".ts", ".jsx", ".tsx"];

const KEYWORDS: &[&str] = &[
    "if", "else", "for", "while", "return", "import", "export", "const", "let", "var", "class",
    "interface", "function", "def", "async", "await", "try", "catch", "throw", "new", "this",
    "super", "static", "public", "private", "protected", "abstract", "extends", "implements",
    "package", "module", "namespace", "type", "enum",
];

/// One function definition found in source text
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FunctionMatch {
    pub name: String,
    pub file: String,
    pub line: usize,
}

fn is_keyword(word: &str) -> bool {
    let lower = word.to_lowercase();
    KEYWORDS.contains(&lower.as_str())
}

/// Scan file content for function definitions, gated by extension.
///
/// JS/TS files match declarations, bindings, and arrow functions; Python
/// files match `def`. Other extensions yield nothing.
pub fn extract_functions(content: &str, path: &str) -> Vec<FunctionMatch> {
    let mut functions = Vec::new();

    let is_js = JS_EXTENSIONS.iter().any(|ext| path.ends_with(ext));
    let is_py = path.ends_with(".py");
    if !is_js && !is_py {
        return functions;
    }

    for (index, line) in content.lines().enumerate() {
        let line_no = index + 1;

        if is_js {
            if let Some(caps) = JS_FUNCTION.captures(line)
                && !is_keyword(&caps[1])
            {
                functions.push(FunctionMatch {
                    name: caps[1].to_string(),
                    file: path.to_string(),
                    line: line_no,
                });
            }

            if let Some(caps) = JS_ARROW.captures(line)
                && !is_keyword(&caps[1])
            {
                // Arrow bindings are also caught by the declaration
                // pattern; only record the extra match when they differ.
                let name = caps[1].to_string();
                let already = functions
                    .last()
                    .is_some_and(|f| f.name == name && f.line == line_no);
                if !already {
                    functions.push(FunctionMatch {
                        name,
                        file: path.to_string(),
                        line: line_no,
                    });
                }
            }
        }

        if is_py
            && let Some(caps) = PY_FUNCTION.captures(line)
            && !is_keyword(&caps[1])
        {
            functions.push(FunctionMatch {
                name: caps[1].to_string(),
                file: path.to_string(),
                line: line_no,
            });
        }
    }

    functions
}
