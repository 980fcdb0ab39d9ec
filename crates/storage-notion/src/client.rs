//! Minimal Notion REST client: database query and page update.

use std::time::Duration;

use log::debug;
use reqwest::header::{HeaderMap, HeaderValue, AUTHORIZATION, CONTENT_TYPE};

use crate::error::{NotionError, Result};
use crate::types::*;

/// Public Notion API endpoint.
pub const DEFAULT_NOTION_API_URL: &str = "https://api.notion.com";

/// API version sent with every request.
pub const NOTION_API_VERSION: &str = "2022-06-28";

/// Default timeout for API requests.
const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// Client for the Notion API.
///
/// Cheap to clone; the underlying connection pool is shared.
#[derive(Debug, Clone)]
pub struct NotionClient {
    client: reqwest::Client,
    base_url: String,
    headers: HeaderMap,
}

impl NotionClient {
    /// Create a new client with the default timeout.
    ///
    /// # Arguments
    ///
    /// * `base_url` - API root, e.g. "https://api.notion.com"
    /// * `token` - integration token
    pub fn new(base_url: &str, token: &str) -> Result<Self> {
        Self::with_timeout(base_url, token, Duration::from_secs(DEFAULT_TIMEOUT_SECS))
    }

    pub fn with_timeout(base_url: &str, token: &str, timeout: Duration) -> Result<Self> {
        let client = reqwest::Client::builder().timeout(timeout).build()?;
        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
            headers: Self::headers(token)?,
        })
    }

    fn headers(token: &str) -> Result<HeaderMap> {
        let mut headers = HeaderMap::new();
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
        headers.insert("Notion-Version", HeaderValue::from_static(NOTION_API_VERSION));

        let auth_value = HeaderValue::from_str(&format!("Bearer {}", token))
            .map_err(|_| NotionError::credentials("Invalid integration token format"))?;
        headers.insert(AUTHORIZATION, auth_value);
        Ok(headers)
    }

    /// Parse a JSON response body, turning non-2xx statuses into `NotionError::Api`.
    async fn parse_response<T: serde::de::DeserializeOwned>(
        response: reqwest::Response,
    ) -> Result<T> {
        let status = response.status();
        let body = response.text().await?;
        debug!("Notion response ({}): {}", status, body);

        if !status.is_success() {
            if let Ok(error) = serde_json::from_str::<ApiErrorResponse>(&body) {
                return Err(NotionError::api(status.as_u16(), error.code, error.message));
            }
            return Err(NotionError::api(status.as_u16(), "unknown", body));
        }

        Ok(serde_json::from_str(&body)?)
    }

    /// POST /v1/databases/{databaseId}/query
    pub async fn query_database(
        &self,
        database_id: &str,
        query: &QueryDatabaseRequest,
    ) -> Result<QueryDatabaseResponse> {
        let url = format!("{}/v1/databases/{}/query", self.base_url, database_id);
        debug!("Querying database {}: {:?}", database_id, query.filter);

        let response = self
            .client
            .post(&url)
            .headers(self.headers.clone())
            .json(query)
            .send()
            .await?;

        Self::parse_response(response).await
    }

    /// PATCH /v1/pages/{pageId}
    pub async fn update_page(
        &self,
        page_id: &str,
        update: &UpdatePageRequest,
    ) -> Result<PageSummary> {
        let url = format!("{}/v1/pages/{}", self.base_url, page_id);
        debug!("Updating page {}: {:?}", page_id, update.properties);

        let response = self
            .client
            .patch(&url)
            .headers(self.headers.clone())
            .json(update)
            .send()
            .await?;

        Self::parse_response(response).await
    }
}
