//! Route Handlers
//!
//! Request/response shapes match the UI contract: camelCase fields,
//! `success` flags, and publish partial failure reported as a success
//! response carrying the generated markdown.

use axum::Json;
use axum::extract::{Path, State};
use chrono::Utc;
use serde::{Deserialize, Serialize};
use serde_json::{Value, json};

use super::AppState;
use super::error::ApiError;
use crate::github::PublishOutcome;
use crate::types::{ChatSession, DocweaveError, Role};

type ApiResult = std::result::Result<Json<Value>, ApiError>;

/// Number of preview characters returned with a successful publish
const PREVIEW_CHARS: usize = 500;

// =============================================================================
// Request Bodies
// =============================================================================

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConnectRequest {
    pub repo_url: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalyzeRequest {
    pub repo_url: String,
    #[serde(default)]
    pub role: Option<Role>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateSessionRequest {
    pub repository_id: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChatMessageRequest {
    pub session_id: String,
    pub message: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct SessionView<'a> {
    success: bool,
    session: &'a ChatSession,
}

// =============================================================================
// Handlers
// =============================================================================

/// POST /connect
pub async fn connect(State(state): State<AppState>, Json(body): Json<ConnectRequest>) -> ApiResult {
    let environment = state.config.server.environment;
    let (repo, info) = state
        .pipeline
        .connect(&body.repo_url)
        .await
        .map_err(|e| ApiError::new(e, environment))?;

    Ok(Json(json!({
        "success": true,
        "repository": {
            "name": info.name,
            "description": info.description,
            "language": info.language,
            "stars": info.stargazers_count,
            "url": info.html_url,
            "owner": repo.owner,
            "repo": repo.repo,
        },
    })))
}

/// POST /analyze
pub async fn analyze(State(state): State<AppState>, Json(body): Json<AnalyzeRequest>) -> ApiResult {
    let environment = state.config.server.environment;
    let role = body.role.unwrap_or_default();
    let analysis = state
        .pipeline
        .analyze_repository(&body.repo_url, role)
        .await
        .map_err(|e| ApiError::new(e, environment))?;

    Ok(Json(json!({
        "success": true,
        "role": role,
        "repository": {
            "name": analysis.info.name,
            "description": analysis.info.description,
            "language": analysis.info.language,
            "owner": analysis.repo.owner,
            "repo": analysis.repo.repo,
            "metadata": {
                "overview": analysis.result.overview,
                "endpoints": analysis.result.endpoints,
                "functions": analysis.result.functions,
                "dependencies": analysis.result.dependencies,
                "architecture": analysis.result.architecture,
            },
        },
        "analysis": analysis.raw_analysis,
        "stats": analysis.stats,
    })))
}

/// POST /generate-docs
pub async fn generate_docs(
    State(state): State<AppState>,
    Json(body): Json<AnalyzeRequest>,
) -> ApiResult {
    let environment = state.config.server.environment;
    let role = body.role.unwrap_or_default();
    let generation = state
        .pipeline
        .generate_documentation(&body.repo_url, role)
        .await
        .map_err(|e| ApiError::new(e, environment))?;

    let analysis = &generation.analysis;
    let analysis_counts = json!({
        "functionsCount": analysis.result.functions.len(),
        "dependenciesCount": analysis.result.dependencies.len(),
        "endpointsCount": analysis.result.endpoints.len(),
        "documentationLength": generation.markdown.len(),
    });

    // Publish partial failure is still a success response: the markdown
    // must not be hidden behind a downstream infrastructure failure.
    let response = match &generation.outcome {
        PublishOutcome::Published(pr) => json!({
            "success": true,
            "repository": analysis.repo.slug(),
            "role": role,
            "pullRequest": {
                "number": pr.number,
                "url": pr.url,
                "branch": pr.branch_name,
                "filesCreated": pr.files_created,
            },
            "analysis": analysis_counts,
            "documentationPreview": preview(&generation.markdown),
        }),
        PublishOutcome::Failed { error, markdown } => json!({
            "success": true,
            "repository": analysis.repo.slug(),
            "role": role,
            "pullRequest": {
                "error": error,
                "reason": "Possibly due to permissions or repository access",
            },
            "analysis": analysis_counts,
            "documentationGenerated": markdown,
            "note": "Documentation was generated successfully but could not create pull request",
        }),
    };

    Ok(Json(response))
}

/// POST /chat/session
pub async fn create_chat_session(
    State(state): State<AppState>,
    Json(body): Json<CreateSessionRequest>,
) -> ApiResult {
    if body.repository_id.trim().is_empty() {
        return Err(ApiError::new(
            DocweaveError::InvalidInput("repositoryId is required".to_string()),
            state.config.server.environment,
        ));
    }

    let session = state.chat.create_session(&body.repository_id);
    Ok(Json(json!({
        "success": true,
        "sessionId": session.id,
    })))
}

/// POST /chat/message
pub async fn send_chat_message(
    State(state): State<AppState>,
    Json(body): Json<ChatMessageRequest>,
) -> ApiResult {
    let environment = state.config.server.environment;
    if body.message.trim().is_empty() {
        return Err(ApiError::new(
            DocweaveError::InvalidInput("message is required".to_string()),
            environment,
        ));
    }

    let reply = state
        .chat
        .send_message(&body.session_id, &body.message)
        .await
        .map_err(|e| ApiError::new(e, environment))?;

    Ok(Json(json!({
        "success": true,
        "response": reply,
    })))
}

/// GET /chat/session/{session_id}
pub async fn get_chat_session(
    State(state): State<AppState>,
    Path(session_id): Path<String>,
) -> ApiResult {
    let session = state
        .chat
        .get_session(&session_id)
        .map_err(|e| ApiError::new(e, state.config.server.environment))?;

    let view = SessionView {
        success: true,
        session: &session,
    };
    Ok(Json(serde_json::to_value(view).unwrap_or_default()))
}

/// GET /health
pub async fn health() -> Json<Value> {
    Json(json!({
        "status": "OK",
        "timestamp": Utc::now().to_rfc3339(),
    }))
}

fn preview(markdown: &str) -> String {
    let cut: String = markdown.chars().take(PREVIEW_CHARS).collect();
    if cut.len() < markdown.len() {
        format!("{}...", cut)
    } else {
        cut
    }
}
