use std::path::Path;

use serde::Deserialize;

use crate::error::{Result, SheetsError};

/// Google OAuth token endpoint used when the key file does not name one.
pub const DEFAULT_TOKEN_URI: &str = "https://oauth2.googleapis.com/token";

/// The fields of a Google service-account key file that we use.
#[derive(Debug, Clone, Deserialize)]
pub struct ServiceAccountKey {
    pub client_email: String,
    pub private_key: String,
    #[serde(default)]
    pub private_key_id: Option<String>,
    #[serde(default = "default_token_uri")]
    pub token_uri: String,
}

fn default_token_uri() -> String {
    DEFAULT_TOKEN_URI.to_string()
}

impl ServiceAccountKey {
    /// Reads and validates the key file. Any failure here is fatal at startup.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let raw = std::fs::read_to_string(path).map_err(|e| {
            SheetsError::credentials(format!("cannot read {}: {}", path.display(), e))
        })?;
        Self::from_json(&raw)
    }

    pub fn from_json(raw: &str) -> Result<Self> {
        let key: ServiceAccountKey = serde_json::from_str(raw)
            .map_err(|e| SheetsError::credentials(format!("key file is not valid: {}", e)))?;
        if key.client_email.trim().is_empty() {
            return Err(SheetsError::credentials("client_email is empty"));
        }
        if !key.private_key.contains("PRIVATE KEY") {
            return Err(SheetsError::credentials(
                "private_key is not a PEM encoded key",
            ));
        }
        Ok(key)
    }
}
