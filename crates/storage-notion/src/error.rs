//! Error types for the Notion storage crate.

use thiserror::Error;

/// Result type alias for Notion operations.
pub type Result<T> = std::result::Result<T, NotionError>;

/// Errors that can occur while talking to the Notion API.
#[derive(Debug, Error)]
pub enum NotionError {
    /// HTTP client error (connect, timeout, body read)
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// JSON serialization/deserialization error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Error response from the Notion API
    #[error("API error ({status}) {code}: {message}")]
    Api {
        status: u16,
        code: String,
        message: String,
    },

    /// Credentials file missing or unusable
    #[error("Credentials error: {0}")]
    Credentials(String),
}

impl NotionError {
    /// Create an API error from status, Notion error code and message
    pub fn api(status: u16, code: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Api {
            status,
            code: code.into(),
            message: message.into(),
        }
    }

    /// Create a credentials error
    pub fn credentials(message: impl Into<String>) -> Self {
        Self::Credentials(message.into())
    }

    /// Whether Notion asked us to slow down.
    pub fn is_rate_limited(&self) -> bool {
        matches!(self, NotionError::Api { status: 429, .. })
    }
}
