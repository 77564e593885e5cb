//! HTTP Server
//!
//! Axum surface consumed by the UI. Routes, CORS, body-size limits, and
//! per-IP rate limiting are assembled here; handlers live in `routes`.

mod error;
mod rate_limit;
mod routes;

use axum::Router;
use axum::extract::DefaultBodyLimit;
use axum::http::{HeaderValue, Method, header};
use axum::middleware;
use axum::routing::{get, post};
use std::net::SocketAddr;
use std::sync::Arc;
use tower_http::cors::CorsLayer;
use tracing::{info, warn};

use crate::chat::ChatService;
use crate::config::Config;
use crate::pipeline::Pipeline;
use crate::types::{DocweaveError, Result};

pub use error::ApiError;
pub use rate_limit::RateLimiter;

/// Shared application state passed to all route handlers
#[derive(Clone)]
pub struct AppState {
    pub pipeline: Arc<Pipeline>,
    pub chat: Arc<ChatService>,
    pub config: Arc<Config>,
}

/// Build the application router from validated configuration
pub fn build_router(state: AppState) -> Router {
    let cors = match state.config.server.cors_origin.parse::<HeaderValue>() {
        Ok(origin) => CorsLayer::new()
            .allow_origin(origin)
            .allow_methods([Method::GET, Method::POST])
            .allow_headers([header::CONTENT_TYPE]),
        Err(_) => {
            warn!(
                origin = %state.config.server.cors_origin,
                "Invalid CORS origin, falling back to same-origin only"
            );
            CorsLayer::new()
        }
    };

    let limiter = Arc::new(RateLimiter::new(&state.config.rate_limit));
    let body_limit = state.config.server.body_limit_bytes;

    Router::new()
        .route("/connect", post(routes::connect))
        .route("/analyze", post(routes::analyze))
        .route("/generate-docs", post(routes::generate_docs))
        .route("/chat/session", post(routes::create_chat_session))
        .route("/chat/message", post(routes::send_chat_message))
        .route("/chat/session/{session_id}", get(routes::get_chat_session))
        .route("/health", get(routes::health))
        .layer(middleware::from_fn_with_state(
            limiter,
            rate_limit::rate_limit_middleware,
        ))
        .layer(cors)
        .layer(DefaultBodyLimit::max(body_limit))
        .with_state(state)
}

/// Bind and serve until the process is terminated
pub async fn run(config: Config) -> Result<()> {
    let bind = config.server.bind.clone();
    let pipeline = Arc::new(Pipeline::new(config.clone())?);

    let store = Arc::new(crate::chat::InMemorySessionStore::new());
    let retry = crate::ai::RetryPolicy::new(config.ai.max_retries, config.ai.retry_base_delay_ms);
    let chat = Arc::new(ChatService::new(
        pipeline.provider(),
        store,
        retry,
        &config.chat,
    ));

    let state = AppState {
        pipeline,
        chat,
        config: Arc::new(config),
    };
    let app = build_router(state);

    let listener = tokio::net::TcpListener::bind(&bind)
        .await
        .map_err(|e| DocweaveError::Config(format!("Failed to bind {}: {}", bind, e)))?;
    info!(bind = %bind, "Server listening");

    axum::serve(
        listener,
        app.into_make_service_with_connect_info::<SocketAddr>(),
    )
    .await
    .map_err(DocweaveError::Io)?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ai::RetryPolicy;
    use crate::chat::InMemorySessionStore;
    use crate::config::GithubConfig;
    use crate::github::GithubClient;
    use axum::body::Body;
    use axum::http::{Request, StatusCode};
    use tower::util::ServiceExt;

    async fn test_state() -> (mockito::ServerGuard, AppState) {
        let server = mockito::Server::new_async().await;
        let mut config = Config::default();
        config.github = GithubConfig {
            token: Some("ghp_test".to_string()),
            api_base: server.url(),
            ..Default::default()
        };
        config.chat.docs_dir = std::env::temp_dir().join("docweave-server-tests");

        let github = GithubClient::new(&config.github).unwrap();
        let pipeline = Arc::new(Pipeline::with_parts(github, None, config.clone()));
        let chat = Arc::new(ChatService::new(
            None,
            Arc::new(InMemorySessionStore::new()),
            RetryPolicy::new(1, 0),
            &config.chat,
        ));

        let state = AppState {
            pipeline,
            chat,
            config: Arc::new(config),
        };
        (server, state)
    }

    async fn body_json(response: axum::response::Response) -> serde_json::Value {
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    #[tokio::test]
    async fn test_health() {
        let (_server, state) = test_state().await;
        let app = build_router(state);

        let response = app
            .oneshot(
                Request::builder()
                    .uri("/health")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let body = body_json(response).await;
        assert_eq!(body["status"], "OK");
        assert!(body["timestamp"].is_string());
    }

    #[tokio::test]
    async fn test_connect_rejects_malformed_url() {
        let (_server, state) = test_state().await;
        let app = build_router(state);

        let response = app
            .oneshot(
                Request::builder()
                    .method("POST")
                    .uri("/connect")
                    .header("content-type", "application/json")
                    .body(Body::from(r#"{"repoUrl": "not a url"}"#))
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let body = body_json(response).await;
        assert_eq!(body["success"], false);
    }

    #[tokio::test]
    async fn test_connect_passes_through_repo() {
        let (mut server, state) = test_state().await;
        server
            .mock("GET", "/repos/octocat/hello-world")
            .with_status(200)
            .with_body(
                serde_json::json!({
                    "name": "hello-world",
                    "description": "demo",
                    "language": "JavaScript",
                    "stargazers_count": 9,
                    "html_url": "https://github.com/octocat/hello-world",
                    "default_branch": "main",
                })
                .to_string(),
            )
            .create_async()
            .await;

        let app = build_router(state);
        let response = app
            .oneshot(
                Request::builder()
                    .method("POST")
                    .uri("/connect")
                    .header("content-type", "application/json")
                    .body(Body::from(
                        r#"{"repoUrl": "https://github.com/octocat/hello-world"}"#,
                    ))
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let body = body_json(response).await;
        assert_eq!(body["success"], true);
        assert_eq!(body["repository"]["name"], "hello-world");
        assert_eq!(body["repository"]["stars"], 9);
        assert_eq!(body["repository"]["owner"], "octocat");
    }

    #[tokio::test]
    async fn test_chat_session_roundtrip_with_canned_replies() {
        let (_server, state) = test_state().await;
        let app = build_router(state);

        // Create a session.
        let response = app
            .clone()
            .oneshot(
                Request::builder()
                    .method("POST")
                    .uri("/chat/session")
                    .header("content-type", "application/json")
                    .body(Body::from(r#"{"repositoryId": "octocat/hello-world"}"#))
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let body = body_json(response).await;
        let session_id = body["sessionId"].as_str().unwrap().to_string();

        // Degraded mode still answers.
        let response = app
            .clone()
            .oneshot(
                Request::builder()
                    .method("POST")
                    .uri("/chat/message")
                    .header("content-type", "application/json")
                    .body(Body::from(format!(
                        r#"{{"sessionId": "{}", "message": "how do I setup?"}}"#,
                        session_id
                    )))
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let body = body_json(response).await;
        assert_eq!(body["success"], true);
        assert!(
            body["response"]["content"]
                .as_str()
                .unwrap()
                .contains("set up")
        );

        // Session is retrievable with both turns recorded.
        let response = app
            .clone()
            .oneshot(
                Request::builder()
                    .uri(format!("/chat/session/{}", session_id))
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let body = body_json(response).await;
        assert_eq!(body["session"]["messages"].as_array().unwrap().len(), 2);

        // Unknown session is a 404.
        let response = app
            .oneshot(
                Request::builder()
                    .method("POST")
                    .uri("/chat/message")
                    .header("content-type", "application/json")
                    .body(Body::from(
                        r#"{"sessionId": "session-missing", "message": "hi"}"#,
                    ))
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }
}
