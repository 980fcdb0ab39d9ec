use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use axum::{
    body::{to_bytes, Body},
    http::{header, Request},
    Router,
};
use chrono::{Local, NaiveDateTime};
use readreceipt_core::constants::OPENED_AT_FORMAT;
use readreceipt_core::errors::{Result, StoreError};
use readreceipt_core::tracking::{
    format_opened_at, RecordRef, RecordStoreTrait, SlotNumber, TrackingService,
};
use readreceipt_server::{api::app_router, AppState};
use tower::ServiceExt;

const PIXEL: &[u8] = include_bytes!("../assets/blank.png");

/// Identifier -> slot -> timestamp text, like one database row per identifier.
#[derive(Default)]
struct FakeStore {
    records: Mutex<HashMap<String, HashMap<u32, String>>>,
    lookups: Mutex<Vec<String>>,
    writes: Mutex<Vec<(String, u32)>>,
    fail_writes: bool,
}

impl FakeStore {
    fn with_records(identifiers: &[&str]) -> Self {
        let records = identifiers
            .iter()
            .map(|id| (id.to_string(), HashMap::new()))
            .collect();
        Self {
            records: Mutex::new(records),
            ..Default::default()
        }
    }

    fn slot_value(&self, identifier: &str, slot: u32) -> Option<String> {
        self.records
            .lock()
            .unwrap()
            .get(identifier)
            .and_then(|slots| slots.get(&slot).cloned())
    }

    fn lookup_count(&self) -> usize {
        self.lookups.lock().unwrap().len()
    }

    fn write_count(&self) -> usize {
        self.writes.lock().unwrap().len()
    }
}

#[async_trait]
impl RecordStoreTrait for FakeStore {
    async fn find(&self, identifier: &str) -> Result<Option<RecordRef>> {
        self.lookups.lock().unwrap().push(identifier.to_string());
        Ok(self
            .records
            .lock()
            .unwrap()
            .contains_key(identifier)
            .then(|| RecordRef::Page {
                page_id: identifier.to_string(),
            }))
    }

    async fn mark_opened(
        &self,
        record: &RecordRef,
        slot: SlotNumber,
        opened_at: NaiveDateTime,
    ) -> Result<()> {
        let RecordRef::Page { page_id } = record else {
            return Err(StoreError::ForeignRecordRef(record.to_string()).into());
        };
        self.writes.lock().unwrap().push((page_id.clone(), slot.get()));
        if self.fail_writes {
            return Err(StoreError::write(record.to_string(), "connection reset").into());
        }
        self.records
            .lock()
            .unwrap()
            .entry(page_id.clone())
            .or_default()
            .insert(slot.get(), format_opened_at(&opened_at));
        Ok(())
    }
}

fn router_with(store: Arc<FakeStore>) -> Router {
    let service = Arc::new(TrackingService::new(store));
    app_router(Arc::new(AppState::new(service, PIXEL)))
}

async fn fetch(app: &Router, uri: &str) -> (u16, HashMap<String, String>, Vec<u8>) {
    let response = app
        .clone()
        .oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
        .await
        .unwrap();
    let status = response.status().as_u16();
    let headers = response
        .headers()
        .iter()
        .map(|(k, v)| (k.to_string(), v.to_str().unwrap_or_default().to_string()))
        .collect();
    let body = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    (status, headers, body.to_vec())
}

fn assert_pixel(status: u16, headers: &HashMap<String, String>, body: &[u8]) {
    assert_eq!(status, 200);
    assert_eq!(headers[header::CONTENT_TYPE.as_str()], "image/png");
    assert_eq!(body, PIXEL);
}

fn assert_recent(text: &str) {
    let at = NaiveDateTime::parse_from_str(text, OPENED_AT_FORMAT).unwrap();
    let drift = (Local::now().naive_local() - at).num_seconds().abs();
    assert!(drift <= 5, "timestamp {text} is {drift}s away from now");
}

#[tokio::test]
async fn missing_identifier_skips_the_store() {
    let store = Arc::new(FakeStore::with_records(&["alice-promo-42"]));
    let app = router_with(store.clone());

    for uri in ["/read", "/read?num=2", "/read?id=&num=2", "/read?num=abc"] {
        let (status, headers, body) = fetch(&app, uri).await;
        assert_pixel(status, &headers, &body);
    }
    assert_eq!(store.lookup_count(), 0);
    assert_eq!(store.write_count(), 0);
}

#[tokio::test]
async fn malformed_slot_skips_the_store() {
    let store = Arc::new(FakeStore::with_records(&["alice-promo-42"]));
    let app = router_with(store.clone());

    for uri in [
        "/read?id=alice-promo-42&num=abc",
        "/read?id=alice-promo-42&num=0",
        "/read?id=alice-promo-42&num=-3",
        "/read?id=alice-promo-42",
    ] {
        let (status, headers, body) = fetch(&app, uri).await;
        assert_pixel(status, &headers, &body);
    }
    assert_eq!(store.lookup_count(), 0);
    assert_eq!(store.write_count(), 0);
}

#[tokio::test]
async fn known_identifier_records_only_its_slot() {
    let store = Arc::new(FakeStore::with_records(&["alice-promo-42", "bob"]));
    let app = router_with(store.clone());

    let (status, headers, body) = fetch(&app, "/read?id=alice-promo-42&num=2").await;

    assert_pixel(status, &headers, &body);
    assert_recent(&store.slot_value("alice-promo-42", 2).unwrap());
    assert_eq!(store.slot_value("alice-promo-42", 1), None);
    assert_eq!(store.slot_value("alice-promo-42", 3), None);
    assert_eq!(store.slot_value("bob", 2), None);
    assert_eq!(store.write_count(), 1);
}

#[tokio::test]
async fn unknown_identifier_writes_nothing() {
    let store = Arc::new(FakeStore::with_records(&["alice-promo-42"]));
    let app = router_with(store.clone());

    let (status, headers, body) = fetch(&app, "/read?id=carol&num=1").await;

    assert_pixel(status, &headers, &body);
    assert_eq!(store.lookup_count(), 1);
    assert_eq!(store.write_count(), 0);
}

#[tokio::test]
async fn repeated_open_overwrites_the_slot() {
    let store = Arc::new(FakeStore::with_records(&["alice-promo-42"]));
    store
        .records
        .lock()
        .unwrap()
        .get_mut("alice-promo-42")
        .unwrap()
        .insert(1, "2020-01-01 00:00:00".to_string());
    let app = router_with(store.clone());

    fetch(&app, "/read?id=alice-promo-42&num=1").await;
    let (status, headers, body) = fetch(&app, "/read?id=alice-promo-42&num=1").await;

    assert_pixel(status, &headers, &body);
    assert_eq!(store.write_count(), 2);
    assert_recent(&store.slot_value("alice-promo-42", 1).unwrap());
}

#[tokio::test]
async fn write_failure_returns_the_same_image() {
    let store = Arc::new(FakeStore {
        fail_writes: true,
        ..FakeStore::with_records(&["alice-promo-42"])
    });
    let app = router_with(store.clone());

    let (status, headers, body) = fetch(&app, "/read?id=alice-promo-42&num=2").await;

    assert_pixel(status, &headers, &body);
    // single attempt, no retry
    assert_eq!(store.write_count(), 1);
    assert_eq!(store.slot_value("alice-promo-42", 2), None);
}

#[tokio::test]
async fn pixel_is_never_cached_and_requests_are_tagged() {
    let app = router_with(Arc::new(FakeStore::default()));

    let (_, headers, _) = fetch(&app, "/read?id=x&num=1").await;

    assert_eq!(
        headers[header::CACHE_CONTROL.as_str()],
        "no-store, no-cache, must-revalidate, max-age=0"
    );
    assert!(headers.contains_key("x-request-id"));
}

#[tokio::test]
async fn other_paths_are_not_routed() {
    let store = Arc::new(FakeStore::with_records(&["alice-promo-42"]));
    let app = router_with(store.clone());

    let (status, _, _) = fetch(&app, "/open?id=alice-promo-42&num=1").await;

    assert_eq!(status, 404);
    assert_eq!(store.lookup_count(), 0);
}
