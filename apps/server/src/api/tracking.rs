use std::sync::Arc;

use axum::{
    body::Bytes,
    extract::{RawQuery, State},
    http::header,
    response::{IntoResponse, Response},
    routing::get,
    Router,
};
use chrono::Local;
use readreceipt_core::constants::{IDENTIFIER_PARAM, SLOT_PARAM, TRACKING_PATH};
use readreceipt_core::tracking::{format_opened_at, TrackingOutcome, TrackingQuery};

use crate::main_lib::AppState;

const PIXEL_CACHE_CONTROL: &str = "no-store, no-cache, must-revalidate, max-age=0";

/// Extracts `id` and `num` from a raw query string. The first occurrence of
/// each key wins; an undecodable query yields no parameters.
pub fn parse_tracking_query(raw: Option<&str>) -> TrackingQuery {
    let pairs: Vec<(String, String)> = raw
        .and_then(|raw| serde_urlencoded::from_str(raw).ok())
        .unwrap_or_default();
    let first = |key: &str| {
        pairs
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    };
    TrackingQuery::new(first(IDENTIFIER_PARAM), first(SLOT_PARAM))
}

async fn handle_tracking_request(
    State(state): State<Arc<AppState>>,
    RawQuery(raw): RawQuery,
) -> Response {
    let query = parse_tracking_query(raw.as_deref());
    let outcome = state
        .tracking_service
        .track(query, Local::now().naive_local())
        .await;
    log_outcome(&outcome);
    pixel_response(state.pixel.clone())
}

fn log_outcome(outcome: &TrackingOutcome) {
    match outcome {
        TrackingOutcome::Skipped => tracing::debug!("No identifier supplied, nothing to record"),
        TrackingOutcome::Malformed(err) => {
            tracing::warn!(kind = err.kind(), "Ignoring tracking request: {}", err)
        }
        TrackingOutcome::NotFound { request } => tracing::info!(
            identifier = %request.identifier,
            slot = %request.slot,
            "No record for identifier"
        ),
        TrackingOutcome::Recorded {
            request,
            record,
            opened_at,
        } => tracing::info!(
            identifier = %request.identifier,
            slot = %request.slot,
            record = %record,
            opened_at = %format_opened_at(opened_at),
            "Recorded open"
        ),
        TrackingOutcome::Failed { request, error } => tracing::error!(
            identifier = %request.identifier,
            slot = %request.slot,
            kind = error.kind(),
            "Open not recorded: {}",
            error
        ),
    }
}

fn pixel_response(pixel: Bytes) -> Response {
    (
        [
            (header::CONTENT_TYPE, "image/png"),
            (header::CACHE_CONTROL, PIXEL_CACHE_CONTROL),
        ],
        pixel,
    )
        .into_response()
}

pub fn router() -> Router<Arc<AppState>> {
    Router::new().route(TRACKING_PATH, get(handle_tracking_request))
}
