//! Global Constants
//!
//! Centralized defaults for configuration and tuning.

/// GitHub fetch constants
pub mod github {
    /// Default REST API base URL
    pub const DEFAULT_API_BASE: &str = "https://api.github.com";

    /// Maximum number of source files fetched per analysis
    pub const FILE_LIMIT: usize = 10;

    /// Skip files larger than this many bytes (from the tree listing)
    pub const MAX_FILE_SIZE: u64 = 50_000;

    /// Per-file character budget when rendering prompt blocks
    pub const CONTENT_TRUNCATE_CHARS: usize = 2_000;

    /// Maximum number of config files fetched for dependency extraction
    pub const CONFIG_FILES_LIMIT: usize = 5;

    /// Bounded worker pool size for concurrent content fetches
    pub const FETCH_CONCURRENCY: usize = 5;

    /// Per-request timeout (seconds)
    pub const TIMEOUT_SECS: u64 = 30;
}

/// AI service constants
pub mod ai {
    /// Default Generative Language API base URL
    pub const DEFAULT_API_BASE: &str = "https://generativelanguage.googleapis.com/v1beta";

    /// Default model identifier
    pub const DEFAULT_MODEL: &str = "gemini-1.5-flash";

    /// Maximum attempts for one generation call
    pub const MAX_RETRIES: u32 = 3;

    /// Base delay for exponential backoff (milliseconds)
    pub const RETRY_BASE_DELAY_MS: u64 = 1_000;

    /// Per-request timeout (seconds)
    pub const TIMEOUT_SECS: u64 = 60;
}

/// Chat constants
pub mod chat {
    /// Number of trailing turns included in each reply prompt
    pub const HISTORY_WINDOW: usize = 10;

    /// Per-document character budget for loaded doc context
    pub const CONTEXT_TRUNCATE_CHARS: usize = 2_000;

    /// Default directory scanned for previously generated docs
    pub const DEFAULT_DOCS_DIR: &str = "./generated-docs";
}

/// HTTP server constants
pub mod server {
    /// Default bind address
    pub const DEFAULT_BIND: &str = "0.0.0.0:3001";

    /// Default allowed CORS origin (the UI dev server)
    pub const DEFAULT_CORS_ORIGIN: &str = "http://localhost:3000";

    /// Request body size ceiling (bytes)
    pub const BODY_LIMIT_BYTES: usize = 10 * 1024 * 1024;

    /// Fixed rate-limit window (seconds)
    pub const RATE_LIMIT_WINDOW_SECS: u64 = 15 * 60;

    /// Maximum requests per client per window
    pub const RATE_LIMIT_MAX_REQUESTS: u32 = 100;
}
