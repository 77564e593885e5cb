//! Unified Error Type System
//!
//! Centralized error types for the entire application, with category-based
//! classification driving retry decisions for the AI call path.
//!
//! ## Error Categories
//!
//! - **RateLimit**: upstream rate limiting (retry with backoff)
//! - **Unavailable**: service unavailable / overloaded (retry with backoff)
//! - **Network**: connectivity or timeout (retry with backoff)
//! - **Auth / NotFound / BadRequest**: fail fast, never retried
//!
//! Only the AI invocation path retries; GitHub fetch failures are dropped
//! per file, and publish failures surface as a partial-failure outcome.

use thiserror::Error;

// =============================================================================
// Error Categories
// =============================================================================

/// Classification of upstream errors for retry decisions
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    /// Rate limited (429) - wait then retry
    RateLimit,
    /// Service unavailable or overloaded (503) - wait then retry
    Unavailable,
    /// Network or timeout issues - retry with backoff
    Network,
    /// Authentication failed - fail fast
    Auth,
    /// Resource not found - fail fast
    NotFound,
    /// Invalid request - fix request, don't retry
    BadRequest,
    /// Temporary server-side issue - retry
    Transient,
    /// Unknown error - propagate without retry
    Unknown,
}

impl std::fmt::Display for ErrorCategory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::RateLimit => write!(f, "RATE_LIMIT"),
            Self::Unavailable => write!(f, "UNAVAILABLE"),
            Self::Network => write!(f, "NETWORK"),
            Self::Auth => write!(f, "AUTH"),
            Self::NotFound => write!(f, "NOT_FOUND"),
            Self::BadRequest => write!(f, "BAD_REQUEST"),
            Self::Transient => write!(f, "TRANSIENT"),
            Self::Unknown => write!(f, "UNKNOWN"),
        }
    }
}

impl ErrorCategory {
    /// Whether the retry wrapper may re-attempt a call that failed with
    /// this category. Everything else propagates immediately.
    pub fn is_retryable(&self) -> bool {
        matches!(
            self,
            Self::RateLimit | Self::Unavailable | Self::Network | Self::Transient
        )
    }
}

// =============================================================================
// LLM Error
// =============================================================================

/// LLM error with category and provider context
#[derive(Debug, Clone)]
pub struct LlmError {
    /// Error category for retry decisions
    pub category: ErrorCategory,
    /// Detailed error message
    pub message: String,
    /// Provider that produced the error
    pub provider: Option<String>,
}

impl std::fmt::Display for LlmError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if let Some(provider) = &self.provider {
            write!(f, "[{}:{}] {}", provider, self.category, self.message)
        } else {
            write!(f, "[{}] {}", self.category, self.message)
        }
    }
}

impl std::error::Error for LlmError {}

impl LlmError {
    pub fn new(category: ErrorCategory, message: impl Into<String>) -> Self {
        Self {
            category,
            message: message.into(),
            provider: None,
        }
    }

    pub fn with_provider(
        category: ErrorCategory,
        message: impl Into<String>,
        provider: impl Into<String>,
    ) -> Self {
        Self {
            category,
            message: message.into(),
            provider: Some(provider.into()),
        }
    }

    pub fn is_retryable(&self) -> bool {
        self.category.is_retryable()
    }
}

// =============================================================================
// Error Classifier
// =============================================================================

/// Classifies upstream error messages and status codes into categories
pub struct ErrorClassifier;

impl ErrorClassifier {
    /// Classify an error message from any provider
    pub fn classify(message: &str, provider: &str) -> LlmError {
        let lower = message.to_lowercase();

        if lower.contains("rate limit")
            || lower.contains("429")
            || lower.contains("too many requests")
            || lower.contains("quota exceeded")
        {
            return LlmError::with_provider(ErrorCategory::RateLimit, message, provider);
        }

        if lower.contains("503") || lower.contains("502") || lower.contains("service unavailable")
        {
            return LlmError::with_provider(ErrorCategory::Unavailable, message, provider);
        }

        if lower.contains("overloaded") || lower.contains("temporar") {
            return LlmError::with_provider(ErrorCategory::Transient, message, provider);
        }

        if lower.contains("auth")
            || lower.contains("401")
            || lower.contains("403")
            || lower.contains("api key")
            || lower.contains("unauthorized")
            || lower.contains("permission denied")
        {
            return LlmError::with_provider(ErrorCategory::Auth, message, provider);
        }

        if lower.contains("timeout")
            || lower.contains("timed out")
            || lower.contains("connection")
            || lower.contains("network")
            || lower.contains("dns")
        {
            return LlmError::with_provider(ErrorCategory::Network, message, provider);
        }

        if lower.contains("404") || lower.contains("not found") {
            return LlmError::with_provider(ErrorCategory::NotFound, message, provider);
        }

        if lower.contains("400") || lower.contains("bad request") || lower.contains("invalid") {
            return LlmError::with_provider(ErrorCategory::BadRequest, message, provider);
        }

        LlmError::with_provider(ErrorCategory::Unknown, message, provider)
    }

    /// Classify an HTTP status code directly (more accurate than string matching)
    pub fn classify_http_status(status: u16, message: &str, provider: &str) -> LlmError {
        match status {
            429 => LlmError::with_provider(ErrorCategory::RateLimit, message, provider),
            401 | 403 => LlmError::with_provider(ErrorCategory::Auth, message, provider),
            400 => LlmError::with_provider(ErrorCategory::BadRequest, message, provider),
            404 => LlmError::with_provider(ErrorCategory::NotFound, message, provider),
            503 => LlmError::with_provider(ErrorCategory::Unavailable, message, provider),
            500 | 502 | 504 => {
                LlmError::with_provider(ErrorCategory::Transient, message, provider)
            }
            _ => LlmError::with_provider(ErrorCategory::Unknown, message, provider),
        }
    }
}

// =============================================================================
// Application Error
// =============================================================================

#[derive(Debug, Error)]
pub enum DocweaveError {
    // -------------------------------------------------------------------------
    // System Errors (auto From impl)
    // -------------------------------------------------------------------------
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    // -------------------------------------------------------------------------
    // Input Errors (400, never retried)
    // -------------------------------------------------------------------------
    #[error("Invalid GitHub URL: {0}")]
    InvalidUrl(String),

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    // -------------------------------------------------------------------------
    // Hosting API Errors
    // -------------------------------------------------------------------------
    /// GitHub rejected the credential (401/403 passthrough)
    #[error("GitHub authentication failed: {0}")]
    UpstreamAuth(String),

    /// Repository or resource absent/inaccessible (404 passthrough)
    #[error("Repository not found or not accessible: {0}")]
    UpstreamNotFound(String),

    /// Transient upstream failure (overloaded, rate limited, 5xx)
    #[error("Upstream service temporarily unavailable: {0}")]
    UpstreamTransient(String),

    /// Other GitHub API failures
    #[error("GitHub API error: {0}")]
    GithubApi(String),

    // -------------------------------------------------------------------------
    // LLM Errors
    // -------------------------------------------------------------------------
    /// Structured LLM error with category for retry routing
    #[error("LLM error: {0}")]
    Llm(LlmError),

    // -------------------------------------------------------------------------
    // Domain Errors
    // -------------------------------------------------------------------------
    #[error("Chat session not found: {0}")]
    SessionNotFound(String),

    #[error("Config error: {0}")]
    Config(String),

    #[error("Publish failed: {0}")]
    Publish(String),
}

impl From<LlmError> for DocweaveError {
    fn from(err: LlmError) -> Self {
        DocweaveError::Llm(err)
    }
}

pub type Result<T> = std::result::Result<T, DocweaveError>;

// =============================================================================
// Helper Functions
// =============================================================================

impl DocweaveError {
    /// Create an LLM error with category
    pub fn llm(category: ErrorCategory, message: impl Into<String>) -> Self {
        Self::Llm(LlmError::new(category, message))
    }

    /// Check if this error may be retried by the AI invoker
    pub fn is_retryable(&self) -> bool {
        match self {
            Self::Llm(e) => e.is_retryable(),
            Self::UpstreamTransient(_) => true,
            _ => false,
        }
    }

    /// Map a reqwest transport error into the upstream taxonomy.
    /// Timeouts and connection failures are transient; everything else is not.
    pub fn from_transport(context: &str, err: reqwest::Error) -> Self {
        if err.is_timeout() || err.is_connect() {
            Self::UpstreamTransient(format!("{context}: {err}"))
        } else {
            Self::GithubApi(format!("{context}: {err}"))
        }
    }
}

// =============================================================================
// Tests
// =============================================================================
