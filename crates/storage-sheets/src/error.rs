//! Error types for the Google Sheets storage crate.

use thiserror::Error;

/// Result type alias for Sheets operations.
pub type Result<T> = std::result::Result<T, SheetsError>;

/// Errors that can occur while talking to the Sheets, Drive or OAuth APIs.
#[derive(Debug, Error)]
pub enum SheetsError {
    /// HTTP client error
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// JSON serialization/deserialization error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Error response from a Google API
    #[error("API error ({status}): {message}")]
    Api { status: u16, message: String },

    /// Signing the service-account assertion failed
    #[error("Token signing error: {0}")]
    Signing(#[from] jsonwebtoken::errors::Error),

    /// OAuth token exchange was refused
    #[error("Authentication error: {0}")]
    Auth(String),

    /// Key file missing or unusable
    #[error("Credentials error: {0}")]
    Credentials(String),

    #[error("Spreadsheet '{0}' not found")]
    SpreadsheetNotFound(String),

    #[error("Spreadsheet '{0}' has no worksheet")]
    WorksheetNotFound(String),
}

impl SheetsError {
    /// Create an API error from status and message
    pub fn api(status: u16, message: impl Into<String>) -> Self {
        Self::Api {
            status,
            message: message.into(),
        }
    }

    /// Create an auth error
    pub fn auth(message: impl Into<String>) -> Self {
        Self::Auth(message.into())
    }

    /// Create a credentials error
    pub fn credentials(message: impl Into<String>) -> Self {
        Self::Credentials(message.into())
    }

    /// Whether the API reported quota exhaustion.
    pub fn is_throttled(&self) -> bool {
        matches!(self, SheetsError::Api { status: 429, .. })
    }
}
