//! Google Sheets and Drive REST client.

use std::sync::Arc;
use std::time::Duration;

use log::debug;

use crate::auth::TokenProvider;
use crate::error::{Result, SheetsError};
use crate::types::*;

/// Public Sheets API endpoint.
pub const DEFAULT_SHEETS_API_URL: &str = "https://sheets.googleapis.com";

/// Public Drive API endpoint.
pub const DEFAULT_DRIVE_API_URL: &str = "https://www.googleapis.com";

const SPREADSHEET_MIME_TYPE: &str = "application/vnd.google-apps.spreadsheet";

/// Default timeout for API requests.
const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// Client for the Sheets v4 and Drive v3 APIs.
#[derive(Clone)]
pub struct SheetsClient {
    client: reqwest::Client,
    sheets_url: String,
    drive_url: String,
    tokens: Arc<dyn TokenProvider>,
}

impl SheetsClient {
    pub fn new(sheets_url: &str, drive_url: &str, tokens: Arc<dyn TokenProvider>) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(DEFAULT_TIMEOUT_SECS))
            .build()?;
        Ok(Self::with_http_client(client, sheets_url, drive_url, tokens))
    }

    /// Shares an existing HTTP client, e.g. the one used for token exchange.
    pub fn with_http_client(
        client: reqwest::Client,
        sheets_url: &str,
        drive_url: &str,
        tokens: Arc<dyn TokenProvider>,
    ) -> Self {
        Self {
            client,
            sheets_url: sheets_url.trim_end_matches('/').to_string(),
            drive_url: drive_url.trim_end_matches('/').to_string(),
            tokens,
        }
    }

    /// Parse a JSON response body, turning non-2xx statuses into `SheetsError::Api`.
    async fn parse_response<T: serde::de::DeserializeOwned>(
        response: reqwest::Response,
    ) -> Result<T> {
        let status = response.status();
        let body = response.text().await?;
        debug!("Google API response ({}): {}", status, body);

        if !status.is_success() {
            if let Ok(error) = serde_json::from_str::<GoogleErrorResponse>(&body) {
                let message = match error.error.status {
                    Some(kind) => format!("{}: {}", kind, error.error.message),
                    None => error.error.message,
                };
                return Err(SheetsError::api(status.as_u16(), message));
            }
            return Err(SheetsError::api(
                status.as_u16(),
                format!("Request failed: {}", body),
            ));
        }

        Ok(serde_json::from_str(&body)?)
    }

    fn values_url(&self, spreadsheet_id: &str, range: &str) -> String {
        format!(
            "{}/v4/spreadsheets/{}/values/{}",
            self.sheets_url,
            spreadsheet_id,
            urlencoding::encode(range)
        )
    }

    /// Id of the first spreadsheet visible to the account with exactly this name.
    ///
    /// GET /drive/v3/files?q=name = '...' and mimeType = '...'
    pub async fn find_spreadsheet_by_name(&self, name: &str) -> Result<Option<String>> {
        let url = format!("{}/drive/v3/files", self.drive_url);
        let query = format!(
            "name = '{}' and mimeType = '{}' and trashed = false",
            name.replace('\\', "\\\\").replace('\'', "\\'"),
            SPREADSHEET_MIME_TYPE
        );
        debug!("Searching Drive: {}", query);

        let response = self
            .client
            .get(&url)
            .bearer_auth(self.tokens.access_token().await?)
            .query(&[
                ("q", query.as_str()),
                ("fields", "files(id,name)"),
                ("supportsAllDrives", "true"),
                ("includeItemsFromAllDrives", "true"),
            ])
            .send()
            .await?;

        let list: DriveFileList = Self::parse_response(response).await?;
        Ok(list.files.into_iter().next().map(|f| f.id))
    }

    /// Worksheet properties, in tab order.
    ///
    /// GET /v4/spreadsheets/{spreadsheetId}?fields=sheets.properties
    pub async fn sheet_properties(&self, spreadsheet_id: &str) -> Result<Vec<SheetProperties>> {
        let url = format!("{}/v4/spreadsheets/{}", self.sheets_url, spreadsheet_id);

        let response = self
            .client
            .get(&url)
            .bearer_auth(self.tokens.access_token().await?)
            .query(&[("fields", "sheets.properties")])
            .send()
            .await?;

        let metadata: SpreadsheetMetadata = Self::parse_response(response).await?;
        let mut sheets: Vec<SheetProperties> =
            metadata.sheets.into_iter().map(|s| s.properties).collect();
        sheets.sort_by_key(|s| s.index);
        Ok(sheets)
    }

    /// GET /v4/spreadsheets/{spreadsheetId}/values/{range}
    pub async fn get_values(&self, spreadsheet_id: &str, range: &str) -> Result<ValueRange> {
        let url = self.values_url(spreadsheet_id, range);

        let response = self
            .client
            .get(&url)
            .bearer_auth(self.tokens.access_token().await?)
            .query(&[("majorDimension", "ROWS")])
            .send()
            .await?;

        Self::parse_response(response).await
    }

    /// Writes values verbatim (no date or formula parsing).
    ///
    /// PUT /v4/spreadsheets/{spreadsheetId}/values/{range}?valueInputOption=RAW
    pub async fn update_values(
        &self,
        spreadsheet_id: &str,
        values: &ValueRange,
    ) -> Result<UpdateValuesResponse> {
        let range = values
            .range
            .as_deref()
            .ok_or_else(|| SheetsError::api(400, "value range has no range"))?;
        let url = self.values_url(spreadsheet_id, range);
        debug!("Writing {:?} to {}", values.values, range);

        let response = self
            .client
            .put(&url)
            .bearer_auth(self.tokens.access_token().await?)
            .query(&[("valueInputOption", "RAW")])
            .json(values)
            .send()
            .await?;

        Self::parse_response(response).await
    }
}
