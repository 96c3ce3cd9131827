use std::fmt;

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Categories of API errors for consistent handling.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ApiErrorKind {
    /// HTTP status error (4xx, 5xx)
    HttpStatus,
    /// Connection timeout or request timeout
    Timeout,
    /// Failed to parse a response body
    Parse,
}

impl fmt::Display for ApiErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ApiErrorKind::HttpStatus => write!(f, "http_status"),
            ApiErrorKind::Timeout => write!(f, "timeout"),
            ApiErrorKind::Parse => write!(f, "parse"),
        }
    }
}

/// Structured error from the interview service.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiError {
    /// Error category
    pub kind: ApiErrorKind,
    /// One-line summary suitable for display
    pub message: String,
    /// Optional additional details (e.g., raw error body)
    pub details: Option<String>,
}

impl ApiError {
    pub fn new(kind: ApiErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
            details: None,
        }
    }

    /// Creates an HTTP status error, lifting the service's `detail` field
    /// into the message when the body carries one.
    pub fn http_status(status: u16, body: &str) -> Self {
        let message = format!("HTTP {status}");
        let details = if body.is_empty() {
            None
        } else {
            if let Ok(json) = serde_json::from_str::<Value>(body)
                && let Some(detail) = json.get("detail").and_then(|v| v.as_str())
            {
                return Self {
                    kind: ApiErrorKind::HttpStatus,
                    message: format!("HTTP {status}: {detail}"),
                    details: Some(body.to_string()),
                };
            }
            Some(body.to_string())
        };
        Self {
            kind: ApiErrorKind::HttpStatus,
            message,
            details,
        }
    }

    pub fn timeout(message: impl Into<String>) -> Self {
        Self::new(ApiErrorKind::Timeout, message)
    }
}

impl fmt::Display for ApiError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl std::error::Error for ApiError {}

/// Maps low-level reqwest failures onto [`ApiError`] categories.
pub fn classify_reqwest_error(e: reqwest::Error) -> ApiError {
    if e.is_timeout() {
        ApiError::timeout(format!("Request timed out: {e}"))
    } else if e.is_connect() {
        ApiError::timeout(format!("Connection failed: {e}"))
    } else if e.is_request() {
        ApiError::new(ApiErrorKind::HttpStatus, format!("Request error: {e}"))
    } else {
        ApiError::new(ApiErrorKind::HttpStatus, format!("Network error: {e}"))
    }
}
