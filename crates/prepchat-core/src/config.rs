//! Configuration management for Prepchat.
//!
//! Loads configuration from `${PREPCHAT_HOME}/config.toml` with sensible
//! defaults; a missing file is not an error.

use std::fs;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

/// Default interview service endpoint.
const DEFAULT_BASE_URL: &str = "http://127.0.0.1:8000";

/// Default interview domain for new sessions.
const DEFAULT_DOMAIN: &str = "general";

/// Main configuration structure.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Base URL of the interview service.
    pub base_url: String,

    /// Domain used when creating a session without an explicit one
    /// (e.g. "backend", "frontend", "hr").
    pub default_domain: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            default_domain: DEFAULT_DOMAIN.to_string(),
        }
    }
}

impl Config {
    /// Loads the config file, falling back to defaults if it is absent.
    ///
    /// # Errors
    /// Returns an error if the file exists but cannot be read or parsed.
    pub fn load() -> Result<Self> {
        let path = paths::config_path();
        if !path.exists() {
            return Ok(Self::default());
        }
        let contents = fs::read_to_string(&path)
            .with_context(|| format!("Failed to read config from {}", path.display()))?;
        toml::from_str(&contents)
            .with_context(|| format!("Failed to parse config from {}", path.display()))
    }

    /// Resolves the base URL with precedence: env > config.
    ///
    /// # Errors
    /// Returns an error if the resolved URL is not well-formed.
    pub fn resolve_base_url(&self) -> Result<String> {
        if let Ok(env_url) = std::env::var("PREPCHAT_BASE_URL") {
            let trimmed = env_url.trim();
            if !trimmed.is_empty() {
                validate_url(trimmed)?;
                return Ok(trimmed.trim_end_matches('/').to_string());
            }
        }
        validate_url(&self.base_url)?;
        Ok(self.base_url.trim_end_matches('/').to_string())
    }
}

fn validate_url(url: &str) -> Result<()> {
    url::Url::parse(url).with_context(|| format!("Invalid base URL: {url}"))?;
    Ok(())
}

pub mod paths {
    //! Path resolution for Prepchat configuration and data files.
    //!
    //! PREPCHAT_HOME resolution order:
    //! 1. PREPCHAT_HOME environment variable (if set)
    //! 2. ~/.config/prepchat (default)

    use std::path::PathBuf;

    /// Returns the Prepchat home directory.
    pub fn prepchat_home() -> PathBuf {
        if let Ok(home) = std::env::var("PREPCHAT_HOME") {
            return PathBuf::from(home);
        }

        dirs::home_dir()
            .map(|h| h.join(".config").join("prepchat"))
            .expect("Could not determine home directory")
    }

    /// Returns the path to the config.toml file.
    pub fn config_path() -> PathBuf {
        prepchat_home().join("config.toml")
    }

    /// Returns the path to the cached credentials file.
    pub fn credentials_path() -> PathBuf {
        prepchat_home().join("credentials.json")
    }
}
