//! Model Providers
//!
//! The `LlmProvider` trait is the seam between the pipeline and the
//! generation backend. `GeminiProvider` talks to the Generative Language
//! API; tests swap in a scripted double.

use async_trait::async_trait;
use secrecy::{ExposeSecret, SecretString};
use serde::Deserialize;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, info};

use crate::config::AiConfig;
use crate::types::{DocweaveError, ErrorCategory, ErrorClassifier, LlmError, Result};

/// Text generation backend
#[async_trait]
pub trait LlmProvider: Send + Sync {
    /// Generate a completion for the prompt
    async fn generate(&self, prompt: &str) -> Result<String>;

    /// Provider name for logs and error attribution
    fn name(&self) -> &str;
}

/// Shared provider handle
pub type SharedProvider = Arc<dyn LlmProvider>;

// =============================================================================
// Gemini
// =============================================================================

/// Generative Language API provider with secure key handling
pub struct GeminiProvider {
    /// API key stored securely - never exposed in logs or debug output
    api_key: SecretString,
    api_base: String,
    model: String,
    client: reqwest::Client,
}

impl std::fmt::Debug for GeminiProvider {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GeminiProvider")
            .field("api_key", &"[REDACTED]")
            .field("api_base", &self.api_base)
            .field("model", &self.model)
            .finish()
    }
}

impl GeminiProvider {
    pub fn new(config: &AiConfig) -> Result<Self> {
        let api_key = config.api_key.clone().ok_or_else(|| {
            DocweaveError::Config(
                "Gemini API key not found. Set GEMINI_API_KEY env var or provide in config"
                    .to_string(),
            )
        })?;

        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| {
                DocweaveError::llm(
                    ErrorCategory::Unknown,
                    format!("Failed to create HTTP client: {}", e),
                )
            })?;

        Ok(Self {
            api_key: SecretString::from(api_key),
            api_base: config.api_base.clone(),
            model: config.model.clone(),
            client,
        })
    }
}

#[async_trait]
impl LlmProvider for GeminiProvider {
    async fn generate(&self, prompt: &str) -> Result<String> {
        info!(model = %self.model, "Generating with Gemini");

        let url = format!("{}/models/{}:generateContent", self.api_base, self.model);
        let body = serde_json::json!({
            "contents": [{
                "parts": [{"text": prompt}]
            }]
        });

        let response = self
            .client
            .post(&url)
            .header("x-goog-api-key", self.api_key.expose_secret())
            .header("Content-Type", "application/json")
            .json(&body)
            .send()
            .await
            .map_err(|e| {
                let category = if e.is_timeout() || e.is_connect() {
                    ErrorCategory::Network
                } else {
                    ErrorCategory::Unknown
                };
                LlmError::with_provider(category, format!("Gemini request failed: {}", e), "gemini")
            })?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(ErrorClassifier::classify_http_status(
                status.as_u16(),
                &format!("Gemini API error ({}): {}", status, body),
                "gemini",
            )
            .into());
        }

        let parsed: GenerateContentResponse = response.json().await.map_err(|e| {
            LlmError::with_provider(
                ErrorCategory::Unknown,
                format!("Failed to parse Gemini response: {}", e),
                "gemini",
            )
        })?;

        let text = parsed
            .candidates
            .first()
            .map(|c| {
                c.content
                    .parts
                    .iter()
                    .filter_map(|p| p.text.as_deref())
                    .collect::<Vec<_>>()
                    .join("")
            })
            .filter(|t| !t.is_empty())
            .ok_or_else(|| {
                LlmError::with_provider(
                    ErrorCategory::Unknown,
                    "No content in Gemini response",
                    "gemini",
                )
            })?;

        debug!(chars = text.len(), "Received Gemini completion");
        Ok(text)
    }

    fn name(&self) -> &str {
        "gemini"
    }
}

#[derive(Debug, Deserialize)]
struct GenerateContentResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Debug, Deserialize)]
struct Candidate {
    content: CandidateContent,
}

#[derive(Debug, Deserialize)]
struct CandidateContent {
    #[serde(default)]
    parts: Vec<Part>,
}

#[derive(Debug, Deserialize)]
struct Part {
    #[serde(default)]
    text: Option<String>,
}

// =============================================================================
// Test Double
// =============================================================================


#[cfg(test)]
mod tests {
    use super::*;

    fn test_config(server: &mockito::Server) -> AiConfig {
        AiConfig {
            api_key: Some("test-key".to_string()),
            api_base: server.url(),
            model: "gemini-1.5-flash".to_string(),
            ..Default::default()
        }
    }

    #[test]
    fn test_new_requires_key() {
        assert!(matches!(
            GeminiProvider::new(&AiConfig::default()),
            Err(DocweaveError::Config(_))
        ));
    }

    #[test]
    fn test_debug_redacts_key() {
        let config = AiConfig {
            api_key: Some("super-secret".to_string()),
            ..Default::default()
        };
        let provider = GeminiProvider::new(&config).unwrap();
        let debug = format!("{:?}", provider);
        assert!(!debug.contains("super-secret"));
    }

    #[tokio::test]
    async fn test_generate_concatenates_parts() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("POST", "/models/gemini-1.5-flash:generateContent")
            .match_header("x-goog-api-key", "test-key")
            .with_status(200)
            .with_body(
                serde_json::json!({
                    "candidates": [{
                        "content": {
                            "parts": [{"text": "Hello "}, {"text": "world"}]
                        }
                    }]
                })
                .to_string(),
            )
            .create_async()
            .await;

        let provider = GeminiProvider::new(&test_config(&server)).unwrap();
        assert_eq!(provider.generate("hi").await.unwrap(), "Hello world");
    }

    #[tokio::test]
    async fn test_generate_classifies_status() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("POST", "/models/gemini-1.5-flash:generateContent")
            .with_status(503)
            .with_body(r#"{"error": {"message": "The model is overloaded"}}"#)
            .create_async()
            .await;

        let provider = GeminiProvider::new(&test_config(&server)).unwrap();
        let err = provider.generate("hi").await.unwrap_err();
        assert!(err.is_retryable(), "503 must be retryable, got {:?}", err);
    }

    #[tokio::test]
    async fn test_generate_empty_candidates_is_error() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("POST", "/models/gemini-1.5-flash:generateContent")
            .with_status(200)
            .with_body(r#"{"candidates": []}"#)
            .create_async()
            .await;

        let provider = GeminiProvider::new(&test_config(&server)).unwrap();
        assert!(provider.generate("hi").await.is_err());
    }
}
