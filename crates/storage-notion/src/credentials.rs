use std::path::Path;

use serde::Deserialize;

use crate::error::{NotionError, Result};

/// Title property holding the identifier when the key file does not name one.
pub const DEFAULT_TITLE_PROPERTY: &str = "email_id";

/// Contents of the Notion key file.
#[derive(Debug, Clone, Deserialize)]
pub struct NotionCredentials {
    pub notion_token: String,
    pub database_id: String,
    #[serde(default = "default_title_property")]
    pub title_property: String,
}

fn default_title_property() -> String {
    DEFAULT_TITLE_PROPERTY.to_string()
}

impl NotionCredentials {
    /// Reads and validates the key file. Any failure here is fatal at startup.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let raw = std::fs::read_to_string(path).map_err(|e| {
            NotionError::credentials(format!("cannot read {}: {}", path.display(), e))
        })?;
        Self::from_json(&raw)
    }

    pub fn from_json(raw: &str) -> Result<Self> {
        let credentials: NotionCredentials = serde_json::from_str(raw)
            .map_err(|e| NotionError::credentials(format!("key file is not valid: {}", e)))?;
        if credentials.notion_token.trim().is_empty() {
            return Err(NotionError::credentials("notion_token is empty"));
        }
        if credentials.database_id.trim().is_empty() {
            return Err(NotionError::credentials("database_id is empty"));
        }
        Ok(credentials)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn title_property_defaults_to_email_id() {
        let creds =
            NotionCredentials::from_json(r#"{"notion_token":"secret_x","database_id":"db1"}"#)
                .unwrap();
        assert_eq!(creds.title_property, "email_id");
        assert_eq!(creds.database_id, "db1");
    }

    #[test]
    fn rejects_missing_or_blank_fields() {
        assert!(NotionCredentials::from_json(r#"{"notion_token":"t"}"#).is_err());
        assert!(
            NotionCredentials::from_json(r#"{"notion_token":" ","database_id":"db"}"#).is_err()
        );
        assert!(NotionCredentials::from_json("not json").is_err());
    }

    #[test]
    fn missing_file_is_a_credentials_error() {
        let err = NotionCredentials::from_file("/nonexistent/notion-keys.json").unwrap_err();
        assert!(matches!(err, NotionError::Credentials(_)));
    }
}
