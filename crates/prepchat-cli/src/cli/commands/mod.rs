//! Command handlers.

use anyhow::{Result, anyhow};

pub mod auth;
pub mod chat;
pub mod sessions;
pub mod stats;

/// Resolves the access token or explains how to get one.
pub fn require_token() -> Result<String> {
    prepchat_core::auth::resolve_token()?
        .ok_or_else(|| anyhow!("Not logged in. Run `prepchat login` or set PREPCHAT_TOKEN."))
}
