use async_trait::async_trait;
use chrono::NaiveDateTime;

use crate::errors::Result;
use crate::tracking::tracking_model::{
    OpenOutcome, RecordRef, SlotNumber, TrackingOutcome, TrackingQuery, TrackingRequest,
};

/// Trait for the external store that holds tracked records.
///
/// Implementations differ in how a slot is addressed: the database store
/// writes a property named `Email {slot} Opened`, the spreadsheet store
/// writes the cell `slot` columns to the right of the identifier.
#[async_trait]
pub trait RecordStoreTrait: Send + Sync {
    /// Exact, case-sensitive lookup. The first match wins when the backend
    /// holds duplicates.
    async fn find(&self, identifier: &str) -> Result<Option<RecordRef>>;

    /// Stores `opened_at` in the slot of the referenced record, replacing any
    /// earlier value.
    async fn mark_opened(
        &self,
        record: &RecordRef,
        slot: SlotNumber,
        opened_at: NaiveDateTime,
    ) -> Result<()>;
}

/// Trait for tracking service operations
#[async_trait]
pub trait TrackingServiceTrait: Send + Sync {
    async fn record_open(
        &self,
        request: &TrackingRequest,
        opened_at: NaiveDateTime,
    ) -> Result<OpenOutcome>;

    /// Validates the query and records the open. Never fails: every error is
    /// folded into the returned outcome.
    async fn track(&self, query: TrackingQuery, opened_at: NaiveDateTime) -> TrackingOutcome;
}
