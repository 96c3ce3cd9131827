//! Access-token storage and retrieval.
//!
//! Stores the bearer token in `${PREPCHAT_HOME}/credentials.json` with
//! restricted permissions (0600). Tokens are never logged.

use std::fs::{self, OpenOptions};
use std::io::Write;
use std::path::PathBuf;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use crate::config::paths;

/// Cached credentials for the interview service.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Credentials {
    /// The access token returned by `/auth/login`.
    pub access: String,
}

impl Credentials {
    pub fn new(access: impl Into<String>) -> Self {
        Self {
            access: access.into(),
        }
    }

    fn path() -> PathBuf {
        paths::credentials_path()
    }

    /// Loads cached credentials, `None` if the file doesn't exist.
    ///
    /// # Errors
    /// Returns an error if the file exists but cannot be read or parsed.
    pub fn load() -> Result<Option<Self>> {
        let path = Self::path();
        if !path.exists() {
            return Ok(None);
        }
        let contents = fs::read_to_string(&path)
            .with_context(|| format!("Failed to read credentials from {}", path.display()))?;
        let creds = serde_json::from_str(&contents)
            .with_context(|| format!("Failed to parse credentials from {}", path.display()))?;
        Ok(Some(creds))
    }

    /// Saves the credentials with restricted permissions (0600).
    ///
    /// # Errors
    /// Returns an error if the file cannot be written.
    pub fn save(&self) -> Result<()> {
        let path = Self::path();
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create directory {}", parent.display()))?;
        }

        let contents = serde_json::to_string_pretty(self).context("Failed to serialize credentials")?;

        #[cfg(unix)]
        {
            use std::os::unix::fs::OpenOptionsExt;
            let mut file = OpenOptions::new()
                .write(true)
                .create(true)
                .truncate(true)
                .mode(0o600)
                .open(&path)
                .with_context(|| format!("Failed to open {} for writing", path.display()))?;
            file.write_all(contents.as_bytes())
                .with_context(|| format!("Failed to write to {}", path.display()))?;
        }

        #[cfg(not(unix))]
        {
            fs::write(&path, contents)
                .with_context(|| format!("Failed to write to {}", path.display()))?;
        }

        Ok(())
    }

    /// Removes the cached credentials; missing file is not an error.
    ///
    /// # Errors
    /// Returns an error if the file exists but cannot be removed.
    pub fn clear() -> Result<()> {
        let path = Self::path();
        if path.exists() {
            fs::remove_file(&path)
                .with_context(|| format!("Failed to remove {}", path.display()))?;
        }
        Ok(())
    }
}

/// Resolves the access token with precedence: `PREPCHAT_TOKEN` env > cache.
///
/// # Errors
/// Returns an error if the cache file exists but is unreadable.
pub fn resolve_token() -> Result<Option<String>> {
    if let Ok(token) = std::env::var("PREPCHAT_TOKEN") {
        let trimmed = token.trim();
        if !trimmed.is_empty() {
            return Ok(Some(trimmed.to_string()));
        }
    }
    Ok(Credentials::load()?.map(|c| c.access))
}

#[cfg(test)]
mod tests {
    use super::*;

    // Credentials::load/save resolve through PREPCHAT_HOME; exercised
    // end-to-end by the CLI integration tests with an isolated home.

    #[test]
    fn test_credentials_roundtrip_json() {
        let creds = Credentials::new("tok-123");
        let json = serde_json::to_string(&creds).expect("serialize");
        let parsed: Credentials = serde_json::from_str(&json).expect("parse");
        assert_eq!(parsed.access, "tok-123");
    }
}
