//! Prompt Builder
//!
//! Renders the fetched corpus and assembles the analysis, documentation,
//! and chat prompts. Truncation is by character count and never errors.

use crate::github::RepoInfo;
use crate::types::{AnalysisResult, ChatMessage, DocContext, FileEntry, Role};

/// Render fetched files as fenced per-file blocks, each truncated to
/// `per_file_chars` characters.
pub fn render_corpus(files: &[FileEntry], per_file_chars: usize) -> String {
    files
        .iter()
        .map(|file| {
            let truncated: String = file.content.chars().take(per_file_chars).collect();
            format!("### File: {}\n```\n{}\n```\n", file.path, truncated)
        })
        .collect::<Vec<_>>()
        .join("\n")
}

/// Build the structured-analysis prompt. The instruction demands ONLY
/// valid JSON in the documented key contract; the parser tolerates
/// anything else.
pub fn analysis_prompt(info: &RepoInfo, corpus: &str, relationships: usize) -> String {
    format!(
        r#"Analyze this {language} repository and return ONLY valid JSON in this exact format:
{{
  "overview": "Detailed project overview explaining what this does",
  "functions": [{{"name": "functionName", "description": "what it does"}}],
  "dependencies": ["package1", "package2", "package3"],
  "endpoints": [{{"method": "GET", "path": "/api/route", "description": "what it does"}}],
  "architecture": "Brief description of how the code is organized",
  "key_features": ["feature1", "feature2", "feature3"],
  "setup_steps": ["step1", "step2", "step3"]
}}

Repository: {name}
Description: {description}
Language: {language}
Internal import relationships: {relationships} detected

Code to analyze:
{corpus}"#,
        language = info.language.as_deref().unwrap_or("Unknown"),
        name = info.name,
        description = info.description.as_deref().unwrap_or("No description"),
        relationships = relationships,
        corpus = corpus,
    )
}

/// Build the role-tailored documentation prompt
pub fn documentation_prompt(info: &RepoInfo, role: Role, analysis: &AnalysisResult) -> String {
    format!(
        r#"Create comprehensive markdown documentation for the {name} repository specifically tailored for {role_upper} developers.

REPOSITORY ANALYSIS:
- Overview: {overview}
- Key Features: {features}
- Functions: {function_count} analyzed
- Dependencies: {dependencies}
- Architecture: {architecture}

TARGET AUDIENCE: {role_upper} DEVELOPERS
FOCUS AREAS: {focus}
KEY QUESTIONS: {questions}

Create detailed markdown documentation with these sections:

# {name} - {role_title} Developer Guide

## Project Overview
[Explain what this project does from a {role} perspective]

## Quick Start for {role_title}s
[Step-by-step setup guide tailored for {role} developers]

## Architecture Overview
[System architecture relevant to {role} work]

## Key Components
[Most important parts for {role} developers to understand]

## Dependencies & Tools
[Dependencies that {role} developers need to know about]

## Development Workflow
[How {role} developers should work with this codebase]

## Testing & Debugging
[Testing approaches for {role} developers]

## Additional Resources
[Links and resources for {role} developers]

Make it practical, actionable, and specific to {role} development needs. Include code examples where helpful."#,
        name = info.name,
        role = role.as_str(),
        role_upper = role.as_str().to_uppercase(),
        role_title = role.title(),
        overview = analysis.overview,
        features = analysis.key_features.join(", "),
        function_count = analysis.functions.len(),
        dependencies = analysis.dependencies.join(", "),
        architecture = analysis.architecture,
        focus = role.focus(),
        questions = role.questions(),
    )
}

/// Build a chat reply prompt from doc context and the trailing turns
pub fn chat_prompt(
    context: &[DocContext],
    history: &[ChatMessage],
    history_window: usize,
    context_truncate_chars: usize,
    user_message: &str,
) -> String {
    let docs = context
        .iter()
        .map(|doc| {
            let truncated: String = doc.content.chars().take(context_truncate_chars).collect();
            format!("### {}\n{}\n", doc.file, truncated)
        })
        .collect::<Vec<_>>()
        .join("\n");

    let start = history.len().saturating_sub(history_window);
    let turns = history[start..]
        .iter()
        .map(|msg| format!("{}: {}", msg.role, msg.content))
        .collect::<Vec<_>>()
        .join("\n");

    format!(
        r#"You are a documentation assistant for a software repository. Answer questions using the generated documentation below. Be concise and practical. If the documentation does not cover something, say so.

DOCUMENTATION:
{docs}

CONVERSATION SO FAR:
{turns}

user: {user_message}

Respond as the assistant."#,
    )
}
