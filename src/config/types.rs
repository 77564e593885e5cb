//! Configuration Types
//!
//! All configuration structures with sensible defaults. Credentials are
//! never serialized back out.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use crate::constants;
use crate::types::{DocweaveError, Result};

/// Root configuration structure
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct Config {
    /// HTTP server settings
    pub server: ServerConfig,

    /// Hosting API (GitHub) settings
    pub github: GithubConfig,

    /// AI service settings
    pub ai: AiConfig,

    /// Chat assistant settings
    pub chat: ChatConfig,

    /// Per-client rate limiting
    pub rate_limit: RateLimitConfig,
}

impl Config {
    /// Validate configuration. Missing credentials are startup-fatal:
    /// the GitHub token always, the AI key unless degraded mode is allowed.
    pub fn validate(&self) -> Result<()> {
        if self.github.token.as_deref().unwrap_or("").is_empty() {
            return Err(DocweaveError::Config(
                "GitHub token is required. Set DOCWEAVE_GITHUB__TOKEN or GITHUB_TOKEN".to_string(),
            ));
        }

        if self.ai.api_key.as_deref().unwrap_or("").is_empty() && !self.ai.allow_degraded {
            return Err(DocweaveError::Config(
                "AI API key is required. Set DOCWEAVE_AI__API_KEY or GEMINI_API_KEY, \
                 or enable ai.allow_degraded for canned chat responses only"
                    .to_string(),
            ));
        }

        if self.github.file_limit == 0 || self.github.file_limit > 50 {
            return Err(DocweaveError::Config(format!(
                "github.file_limit must be between 1 and 50, got {}",
                self.github.file_limit
            )));
        }

        if self.github.fetch_concurrency == 0 {
            return Err(DocweaveError::Config(
                "github.fetch_concurrency must be greater than 0".to_string(),
            ));
        }

        if self.ai.max_retries == 0 || self.ai.max_retries > 10 {
            return Err(DocweaveError::Config(format!(
                "ai.max_retries must be between 1 and 10, got {}",
                self.ai.max_retries
            )));
        }

        if self.rate_limit.window_secs == 0 || self.rate_limit.max_requests == 0 {
            return Err(DocweaveError::Config(
                "rate_limit window and ceiling must be greater than 0".to_string(),
            ));
        }

        Ok(())
    }
}

// =============================================================================
// Server Configuration
// =============================================================================

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    /// Bind address (host:port)
    pub bind: String,

    /// Allowed CORS origin for the UI
    pub cors_origin: String,

    /// Request body size ceiling in bytes
    pub body_limit_bytes: usize,

    /// Deployment environment; controls error detail exposure
    pub environment: Environment,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind: constants::server::DEFAULT_BIND.to_string(),
            cors_origin: constants::server::DEFAULT_CORS_ORIGIN.to_string(),
            body_limit_bytes: constants::server::BODY_LIMIT_BYTES,
            environment: Environment::Development,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum Environment {
    #[default]
    Development,
    Production,
}

impl Environment {
    /// Whether underlying error messages may be exposed to API clients
    pub fn expose_errors(&self) -> bool {
        matches!(self, Environment::Development)
    }
}

// =============================================================================
// GitHub Configuration
// =============================================================================

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GithubConfig {
    /// Personal access token. Never serialized to output.
    #[serde(skip_serializing)]
    pub token: Option<String>,

    /// REST API base URL (overridable for tests)
    pub api_base: String,

    /// Maximum source files fetched per analysis
    pub file_limit: usize,

    /// Skip files larger than this many bytes
    pub max_file_size: u64,

    /// Per-file character budget in prompt blocks
    pub content_truncate_chars: usize,

    /// Maximum config files fetched for dependency extraction
    pub config_files_limit: usize,

    /// Bounded worker pool size for content fetches
    pub fetch_concurrency: usize,

    /// Per-request timeout in seconds
    pub timeout_secs: u64,
}

impl Default for GithubConfig {
    fn default() -> Self {
        Self {
            token: None,
            api_base: constants::github::DEFAULT_API_BASE.to_string(),
            file_limit: constants::github::FILE_LIMIT,
            max_file_size: constants::github::MAX_FILE_SIZE,
            content_truncate_chars: constants::github::CONTENT_TRUNCATE_CHARS,
            config_files_limit: constants::github::CONFIG_FILES_LIMIT,
            fetch_concurrency: constants::github::FETCH_CONCURRENCY,
            timeout_secs: constants::github::TIMEOUT_SECS,
        }
    }
}

// =============================================================================
// AI Configuration
// =============================================================================

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AiConfig {
    /// API key. Never serialized to output.
    #[serde(skip_serializing)]
    pub api_key: Option<String>,

    /// API base URL (overridable for tests)
    pub api_base: String,

    /// Model identifier
    pub model: String,

    /// Maximum attempts for one generation call
    pub max_retries: u32,

    /// Base delay for exponential backoff in milliseconds
    pub retry_base_delay_ms: u64,

    /// Per-request timeout in seconds
    pub timeout_secs: u64,

    /// Allow startup without an AI key. Analysis and doc generation fail
    /// at request time; chat serves canned responses.
    pub allow_degraded: bool,
}

impl Default for AiConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            api_base: constants::ai::DEFAULT_API_BASE.to_string(),
            model: constants::ai::DEFAULT_MODEL.to_string(),
            max_retries: constants::ai::MAX_RETRIES,
            retry_base_delay_ms: constants::ai::RETRY_BASE_DELAY_MS,
            timeout_secs: constants::ai::TIMEOUT_SECS,
            allow_degraded: false,
        }
    }
}

// =============================================================================
// Chat Configuration
// =============================================================================

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ChatConfig {
    /// Directory scanned for previously generated docs
    pub docs_dir: PathBuf,

    /// Number of trailing turns included in each reply prompt
    pub history_window: usize,

    /// Per-document character budget for loaded context
    pub context_truncate_chars: usize,
}

impl Default for ChatConfig {
    fn default() -> Self {
        Self {
            docs_dir: PathBuf::from(constants::chat::DEFAULT_DOCS_DIR),
            history_window: constants::chat::HISTORY_WINDOW,
            context_truncate_chars: constants::chat::CONTEXT_TRUNCATE_CHARS,
        }
    }
}

// =============================================================================
// Rate Limit Configuration
// =============================================================================

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct RateLimitConfig {
    /// Fixed window length in seconds
    pub window_secs: u64,

    /// Maximum requests per client per window
    pub max_requests: u32,
}

impl Default for RateLimitConfig {
    fn default() -> Self {
        Self {
            window_secs: constants::server::RATE_LIMIT_WINDOW_SECS,
            max_requests: constants::server::RATE_LIMIT_MAX_REQUESTS,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config_with_credentials() -> Config {
        let mut config = Config::default();
        config.github.token = Some("ghp_test".to_string());
        config.ai.api_key = Some("test-key".to_string());
        config
    }

    #[test]
    fn test_validate_requires_github_token() {
        let mut config = config_with_credentials();
        config.github.token = None;
        assert!(matches!(
            config.validate(),
            Err(DocweaveError::Config(_))
        ));
    }

    #[test]
    fn test_validate_requires_ai_key_unless_degraded() {
        let mut config = config_with_credentials();
        config.ai.api_key = None;
        assert!(config.validate().is_err());

        config.ai.allow_degraded = true;
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_validate_ranges() {
        let mut config = config_with_credentials();
        config.github.file_limit = 0;
        assert!(config.validate().is_err());

        let mut config = config_with_credentials();
        config.ai.max_retries = 11;
        assert!(config.validate().is_err());

        let mut config = config_with_credentials();
        config.rate_limit.max_requests = 0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_defaults_are_complete() {
        let config = config_with_credentials();
        assert!(config.validate().is_ok());
        assert_eq!(config.github.file_limit, 10);
        assert_eq!(config.ai.max_retries, 3);
        assert_eq!(config.ai.retry_base_delay_ms, 1_000);
        assert_eq!(config.chat.history_window, 10);
    }

    #[test]
    fn test_token_not_serialized() {
        let config = config_with_credentials();
        let out = toml::to_string(&config).unwrap();
        assert!(!out.contains("ghp_test"));
        assert!(!out.contains("test-key"));
    }
}
