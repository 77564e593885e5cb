//! Configuration Loader (Figment-based)
//!
//! Loads and merges configuration from multiple sources using Figment:
//! 1. Built-in defaults (Serialized)
//! 2. Config file (docweave.toml, or an explicit path)
//! 3. Environment variables (DOCWEAVE_* prefix, `__` section separator)
//!
//! Bare `GITHUB_TOKEN` and `GEMINI_API_KEY` are honored as credential
//! fallbacks so the service picks up the conventional variables.

use figment::{
    Figment,
    providers::{Env, Format, Serialized, Toml},
};
use std::env;
use std::path::{Path, PathBuf};

use tracing::debug;

use super::types::Config;
use crate::types::{DocweaveError, Result};

/// Configuration loader
pub struct ConfigLoader;

impl ConfigLoader {
    /// Load configuration with full resolution chain using Figment:
    /// defaults → file → env vars
    pub fn load(config_path: Option<&Path>) -> Result<Config> {
        let mut figment = Figment::new().merge(Serialized::defaults(Config::default()));

        let file_path = config_path
            .map(Path::to_path_buf)
            .unwrap_or_else(Self::default_config_path);
        if file_path.exists() {
            debug!("Loading config from: {}", file_path.display());
            figment = figment.merge(Toml::file(&file_path));
        } else if config_path.is_some() {
            return Err(DocweaveError::Config(format!(
                "Config file not found: {}",
                file_path.display()
            )));
        }

        // e.g. DOCWEAVE_AI__MODEL -> ai.model. Double underscore keeps
        // snake_case field names intact.
        figment = figment.merge(Env::prefixed("DOCWEAVE_").split("__").lowercase(true));

        let mut config: Config = figment
            .extract()
            .map_err(|e| DocweaveError::Config(format!("Configuration error: {}", e)))?;

        Self::apply_credential_fallbacks(&mut config);

        config.validate()?;

        Ok(config)
    }

    /// Load configuration from a specific file only (no env merge, no
    /// validation). Used by `config show` to inspect partial files.
    pub fn load_from_file(path: &Path) -> Result<Config> {
        Figment::new()
            .merge(Serialized::defaults(Config::default()))
            .merge(Toml::file(path))
            .extract()
            .map_err(|e| DocweaveError::Config(format!("Configuration error: {}", e)))
    }

    /// Default config file path in the working directory
    pub fn default_config_path() -> PathBuf {
        PathBuf::from("docweave.toml")
    }

    /// Honor the conventional credential variables when the prefixed
    /// forms are absent.
    fn apply_credential_fallbacks(config: &mut Config) {
        if config.github.token.as_deref().unwrap_or("").is_empty()
            && let Ok(token) = env::var("GITHUB_TOKEN")
            && !token.is_empty()
        {
            config.github.token = Some(token);
        }

        if config.ai.api_key.as_deref().unwrap_or("").is_empty()
            && let Ok(key) = env::var("GEMINI_API_KEY")
            && !key.is_empty()
        {
            config.ai.api_key = Some(key);
        }
    }
}
