//! File Classifier
//!
//! Partitions a repository's blob paths into disjoint categories using a
//! fixed priority order. Classification is pure and order-deterministic:
//! the first matching category wins, so a path lands in at most one bucket.

use crate::types::{FileCategories, TreeEntry};

// =============================================================================
// Extension Tables
// =============================================================================

const SOURCE_EXTENSIONS: &[&str] = &[
    ".js", ".ts", ".jsx", ".tsx", ".py", ".java", ".cpp", ".c", ".cs", ".php", ".rb", ".go",
    ".rs", ".swift", ".kt", ".scala", ".clj", ".hs", ".ml",
];

const WEB_EXTENSIONS: &[&str] = &[".vue", ".svelte", ".html", ".css", ".scss", ".less"];

const DATA_EXTENSIONS: &[&str] = &[".sql", ".json", ".yaml", ".yml", ".xml"];

/// Well-known config file names; matched by substring against the file name
const CONFIG_FILES: &[&str] = &[
    "package.json",
    "requirements.txt",
    "pom.xml",
    "build.gradle",
    "cargo.toml",
    "go.mod",
    "setup.py",
    ".env.example",
    "docker-compose.yml",
    "dockerfile",
];

/// Non-code extensions treated as assets
const ASSET_EXTENSIONS: &[&str] = &[
    ".txt", ".log", ".lock", ".png", ".jpg", ".gif", ".svg", ".ico", ".woff", ".ttf",
];

// =============================================================================
// Classification
// =============================================================================

/// Partition blob entries into categories.
///
/// Priority: config → tests → docs → build → assets → source. Files that
/// match no category are dropped (binaries with unknown extensions and
/// the like).
pub fn categorize_files(entries: &[TreeEntry]) -> FileCategories {
    let mut categories = FileCategories::default();

    for entry in entries {
        if !entry.is_blob() {
            continue;
        }

        let path = entry.path.to_lowercase();
        let file_name = path.rsplit('/').next().unwrap_or(&path);

        if CONFIG_FILES.iter().any(|c| file_name.contains(c))
            || path.contains(".env")
            || file_name.contains("config")
        {
            categories.config.push(entry.path.clone());
        } else if path.contains("test") || path.contains("spec") || path.contains("__test__") {
            categories.tests.push(entry.path.clone());
        } else if file_name.ends_with(".md") || path.contains("doc") || file_name.contains("readme")
        {
            categories.docs.push(entry.path.clone());
        } else if path.contains("build")
            || path.contains("dist")
            || path.contains(".next")
            || file_name.contains("dockerfile")
            || file_name.contains("deploy")
        {
            categories.build.push(entry.path.clone());
        } else if ASSET_EXTENSIONS.iter().any(|ext| file_name.ends_with(ext)) {
            categories.assets.push(entry.path.clone());
        } else if SOURCE_EXTENSIONS.iter().any(|ext| file_name.ends_with(ext))
            || WEB_EXTENSIONS.iter().any(|ext| file_name.ends_with(ext))
            || DATA_EXTENSIONS.iter().any(|ext| file_name.ends_with(ext))
        {
            categories.source.push(entry.path.clone());
        }
    }

    categories
}

/// Map a path's extension to a display language name for corpus stats
pub fn language_from_extension(path: &str) -> Option<&'static str> {
    let ext = path.rsplit('.').next()?;
    let language = match ext {
        "js" | "jsx" => "JavaScript",
        "ts" | "tsx" => "TypeScript",
        "py" => "Python",
        "rs" => "Rust",
        "go" => "Go",
        "java" => "Java",
        "rb" => "Ruby",
        "php" => "PHP",
        "cs" => "C#",
        "cpp" | "c" => "C/C++",
        "swift" => "Swift",
        "kt" => "Kotlin",
        "scala" => "Scala",
        "vue" => "Vue",
        "svelte" => "Svelte",
        _ => return None,
    };
    Some(language)
}
