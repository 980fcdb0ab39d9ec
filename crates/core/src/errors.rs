//! Core error types for the read receipt tracker.
//!
//! This module defines backend-agnostic error types. Backend-specific errors
//! (HTTP transport, API responses, token signing) are converted to these types
//! by the storage crates.

use thiserror::Error;

/// Type alias for Result using our Error type.
pub type Result<T> = std::result::Result<T, Error>;

/// Root error type for the tracker.
///
/// Per-request kinds (`MalformedRequest`, `Store`) are recovered by the
/// tracking handler. `Bootstrap` stops startup.
#[derive(Error, Debug)]
pub enum Error {
    #[error("Malformed tracking request: {0}")]
    MalformedRequest(String),

    #[error("Record store operation failed: {0}")]
    Store(#[from] StoreError),

    #[error("Bootstrap failed: {0}")]
    Bootstrap(String),
}

/// Backend-agnostic error type for record store operations.
///
/// Reasons are carried as strings so that the storage crates can flatten
/// transport and API errors into this shape.
#[derive(Error, Debug)]
pub enum StoreError {
    #[error("Lookup of '{identifier}' failed: {reason}")]
    Lookup { identifier: String, reason: String },

    #[error("Write to {target} failed: {reason}")]
    Write { target: String, reason: String },

    #[error("Record reference does not belong to this store: {0}")]
    ForeignRecordRef(String),
}

impl StoreError {
    pub fn lookup(identifier: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::Lookup {
            identifier: identifier.into(),
            reason: reason.into(),
        }
    }

    pub fn write(target: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::Write {
            target: target.into(),
            reason: reason.into(),
        }
    }
}

impl Error {
    /// Short machine-friendly label, used as a structured log field.
    pub fn kind(&self) -> &'static str {
        match self {
            Error::MalformedRequest(_) => "malformed_request",
            Error::Store(StoreError::Lookup { .. }) => "lookup_error",
            Error::Store(StoreError::Write { .. }) => "write_error",
            Error::Store(StoreError::ForeignRecordRef(_)) => "foreign_record_ref",
            Error::Bootstrap(_) => "bootstrap_error",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn store_errors_render_their_context() {
        let err: Error = StoreError::write("row 3, column 5", "HTTP 429: quota exceeded").into();
        assert_eq!(
            err.to_string(),
            "Record store operation failed: Write to row 3, column 5 failed: HTTP 429: quota exceeded"
        );
        assert_eq!(err.kind(), "write_error");
    }

    #[test]
    fn lookup_and_write_failures_have_distinct_kinds() {
        let lookup: Error = StoreError::lookup("alice", "connection reset").into();
        let write: Error = StoreError::write("page p1", "connection reset").into();
        assert_ne!(lookup.kind(), write.kind());
    }
}
