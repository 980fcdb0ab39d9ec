use std::sync::Arc;

use axum::body::Bytes;
use readreceipt_core::tracking::{RecordStoreTrait, TrackingService, TrackingServiceTrait};
use readreceipt_core::{Error, Result};
use readreceipt_storage_notion::{NotionClient, NotionCredentials, NotionRecordStore};
use readreceipt_storage_sheets::{
    ServiceAccountKey, ServiceAccountTokenProvider, SheetsClient, SheetsRecordStore,
};
use tracing_subscriber::prelude::*;
use tracing_subscriber::{fmt, EnvFilter};

use crate::config::{Backend, Config};

pub struct AppState {
    pub tracking_service: Arc<dyn TrackingServiceTrait>,
    /// Pixel bytes, read once at startup and served for every request.
    pub pixel: Bytes,
}

impl AppState {
    pub fn new(tracking_service: Arc<dyn TrackingServiceTrait>, pixel: impl Into<Bytes>) -> Self {
        Self {
            tracking_service,
            pixel: pixel.into(),
        }
    }
}

pub fn init_tracing() {
    let log_format = std::env::var("RR_LOG_FORMAT").unwrap_or_else(|_| "text".to_string());
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let registry = tracing_subscriber::registry().with(filter);

    if log_format.eq_ignore_ascii_case("json") {
        registry
            .with(fmt::layer().json().with_current_span(false))
            .init();
    } else {
        registry
            .with(fmt::layer().with_target(true).with_line_number(true))
            .init();
    }
}

pub async fn build_state(config: &Config) -> anyhow::Result<Arc<AppState>> {
    let pixel = std::fs::read(&config.pixel_path).map_err(|e| {
        Error::Bootstrap(format!(
            "failed to read pixel image {}: {}",
            config.pixel_path.display(),
            e
        ))
    })?;
    tracing::info!(
        "Serving {} byte pixel from {}",
        pixel.len(),
        config.pixel_path.display()
    );

    let record_store = build_record_store(config).await?;
    let tracking_service = Arc::new(TrackingService::new(record_store));

    Ok(Arc::new(AppState::new(tracking_service, pixel)))
}

fn bootstrap_error(what: &str, err: impl std::fmt::Display) -> Error {
    Error::Bootstrap(format!("{}: {}", what, err))
}

/// Connects the configured backend. Any failure here is fatal to startup.
pub async fn build_record_store(config: &Config) -> Result<Arc<dyn RecordStoreTrait>> {
    let credentials_path = &config.credentials_file;
    let credentials_label = format!("failed to load credentials {}", credentials_path.display());
    tracing::info!(
        "Using {} backend with credentials {}",
        config.backend,
        credentials_path.display()
    );

    match config.backend {
        Backend::Notion => {
            let credentials = NotionCredentials::from_file(credentials_path)
                .map_err(|e| bootstrap_error(&credentials_label, e))?;
            let client = NotionClient::with_timeout(
                &config.notion_api_url,
                &credentials.notion_token,
                config.backend_timeout,
            )
            .map_err(|e| bootstrap_error("failed to build Notion client", e))?;
            Ok(Arc::new(NotionRecordStore::new(client, &credentials)))
        }
        Backend::Sheets => {
            let key = ServiceAccountKey::from_file(credentials_path)
                .map_err(|e| bootstrap_error(&credentials_label, e))?;
            let http = reqwest::Client::builder()
                .timeout(config.backend_timeout)
                .build()
                .map_err(|e| bootstrap_error("failed to build HTTP client", e))?;
            let tokens = ServiceAccountTokenProvider::new(key, http.clone())
                .map_err(|e| bootstrap_error("invalid service account key", e))?;
            let client = SheetsClient::with_http_client(
                http,
                &config.sheets_api_url,
                &config.drive_api_url,
                Arc::new(tokens),
            );
            let store = SheetsRecordStore::open(client, &config.spreadsheet_name)
                .await
                .map_err(|e| {
                    bootstrap_error(
                        &format!("failed to open spreadsheet '{}'", config.spreadsheet_name),
                        e,
                    )
                })?;
            Ok(Arc::new(store))
        }
    }
}
