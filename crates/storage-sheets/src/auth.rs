//! OAuth access tokens for the Google APIs.

use std::time::{Duration, Instant, SystemTime, UNIX_EPOCH};

use async_trait::async_trait;
use jsonwebtoken::{encode, Algorithm, EncodingKey, Header};
use log::{debug, error};
use tokio::sync::Mutex;

use crate::credentials::ServiceAccountKey;
use crate::error::{Result, SheetsError};
use crate::types::{AssertionClaims, TokenErrorResponse, TokenResponse};

/// Scopes requested for the service account: cell access and spreadsheet
/// discovery by name.
pub const SHEETS_SCOPES: &str =
    "https://www.googleapis.com/auth/spreadsheets https://www.googleapis.com/auth/drive.readonly";

/// Lifetime requested for each signed assertion.
const ASSERTION_TTL_SECS: u64 = 3600;

/// A cached token is replaced this long before it actually expires.
const REFRESH_MARGIN: Duration = Duration::from_secs(60);

/// Source of bearer tokens for API calls.
#[async_trait]
pub trait TokenProvider: Send + Sync {
    async fn access_token(&self) -> Result<String>;
}

/// Always hands out the same token.
pub struct StaticTokenProvider {
    token: String,
}

impl StaticTokenProvider {
    pub fn new(token: impl Into<String>) -> Self {
        Self {
            token: token.into(),
        }
    }
}

#[async_trait]
impl TokenProvider for StaticTokenProvider {
    async fn access_token(&self) -> Result<String> {
        Ok(self.token.clone())
    }
}

struct CachedToken {
    access_token: String,
    expires_at: Instant,
}

/// Exchanges a signed service-account assertion for an access token
/// (JWT bearer grant) and caches it until shortly before expiry.
pub struct ServiceAccountTokenProvider {
    key: ServiceAccountKey,
    encoding_key: EncodingKey,
    http: reqwest::Client,
    scopes: String,
    cached: Mutex<Option<CachedToken>>,
}

impl ServiceAccountTokenProvider {
    pub fn new(key: ServiceAccountKey, http: reqwest::Client) -> Result<Self> {
        let encoding_key = EncodingKey::from_rsa_pem(key.private_key.as_bytes())?;
        Ok(Self {
            key,
            encoding_key,
            http,
            scopes: SHEETS_SCOPES.to_string(),
            cached: Mutex::new(None),
        })
    }

    pub fn assertion_claims(&self, issued_at: u64) -> AssertionClaims {
        AssertionClaims {
            iss: self.key.client_email.clone(),
            scope: self.scopes.clone(),
            aud: self.key.token_uri.clone(),
            iat: issued_at,
            exp: issued_at + ASSERTION_TTL_SECS,
        }
    }

    fn sign_assertion(&self) -> Result<String> {
        let now = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map_err(|_| SheetsError::auth("System clock is before UNIX_EPOCH"))?;
        let mut header = Header::new(Algorithm::RS256);
        header.kid = self.key.private_key_id.clone();
        Ok(encode(
            &header,
            &self.assertion_claims(now.as_secs()),
            &self.encoding_key,
        )?)
    }

    async fn exchange(&self) -> Result<CachedToken> {
        let assertion = self.sign_assertion()?;
        debug!("Requesting access token from {}", self.key.token_uri);

        let response = self
            .http
            .post(&self.key.token_uri)
            .form(&[
                ("grant_type", "urn:ietf:params:oauth:grant-type:jwt-bearer"),
                ("assertion", assertion.as_str()),
            ])
            .send()
            .await?;

        let status = response.status();
        let body = response.text().await?;

        if !status.is_success() {
            let msg = serde_json::from_str::<TokenErrorResponse>(&body)
                .ok()
                .and_then(|err| err.error_description.or(err.error))
                .unwrap_or(body);
            error!("Token exchange failed with status {}: {}", status, msg);
            return Err(SheetsError::auth(format!(
                "token exchange failed ({}): {}",
                status.as_u16(),
                msg
            )));
        }

        let token: TokenResponse = serde_json::from_str(&body)?;
        let now = Instant::now();
        let expires_at = now
            .checked_add(Duration::from_secs(token.expires_in))
            .unwrap_or(now + Duration::from_secs(ASSERTION_TTL_SECS));
        Ok(CachedToken {
            access_token: token.access_token,
            expires_at,
        })
    }
}

#[async_trait]
impl TokenProvider for ServiceAccountTokenProvider {
    async fn access_token(&self) -> Result<String> {
        let mut cached = self.cached.lock().await;
        if let Some(token) = cached.as_ref() {
            if Instant::now() + REFRESH_MARGIN < token.expires_at {
                return Ok(token.access_token.clone());
            }
        }
        let fresh = self.exchange().await?;
        let access_token = fresh.access_token.clone();
        *cached = Some(fresh);
        Ok(access_token)
    }
}
