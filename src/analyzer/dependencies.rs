//! Dependency Extraction
//!
//! Reads declared dependencies out of the common manifest formats.
//! Malformed manifests yield an empty list rather than an error.

use std::collections::BTreeSet;

/// Extract dependency names from a manifest file, dispatched on name.
///
/// `package.json` yields the union of `dependencies` and
/// `devDependencies` keys; `requirements.txt` yields the package token
/// left of any version pin. Unknown manifests yield nothing.
pub fn extract_dependencies(path: &str, content: &str) -> Vec<String> {
    let file_name = path.rsplit('/').next().unwrap_or(path);
    if file_name == "package.json" {
        from_package_json(content)
    } else if file_name == "requirements.txt" {
        from_requirements(content)
    } else {
        Vec::new()
    }
}

fn from_package_json(content: &str) -> Vec<String> {
    let Ok(value) = serde_json::from_str::<serde_json::Value>(content) else {
        return Vec::new();
    };

    // BTreeSet both dedups and gives a stable order.
    let mut deps = BTreeSet::new();
    for section in ["dependencies", "devDependencies"] {
        if let Some(map) = value.get(section).and_then(|v| v.as_object()) {
            deps.extend(map.keys().cloned());
        }
    }
    deps.into_iter().collect()
}

fn from_requirements(content: &str) -> Vec<String> {
    content
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty() && !line.starts_with('#'))
        .filter_map(|line| {
            let name = line
                .split("==")
                .next()?
                .split(">=")
                .next()?
                .split("~=")
                .next()?
                .trim();
            (!name.is_empty()).then(|| name.to_string())
        })
        .collect()
}
