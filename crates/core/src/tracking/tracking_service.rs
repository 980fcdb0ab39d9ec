use std::sync::Arc;

use async_trait::async_trait;
use chrono::NaiveDateTime;
use log::debug;

use crate::errors::Result;

use super::tracking_model::{OpenOutcome, TrackingOutcome, TrackingQuery, TrackingRequest};
use super::tracking_traits::{RecordStoreTrait, TrackingServiceTrait};

/// Runs the lookup + update pass against one record store.
///
/// Single attempt, no retries: `Lookup -> {Found -> Update | NotFound}`.
pub struct TrackingService {
    record_store: Arc<dyn RecordStoreTrait>,
}

impl TrackingService {
    pub fn new(record_store: Arc<dyn RecordStoreTrait>) -> Self {
        TrackingService { record_store }
    }
}

#[async_trait]
impl TrackingServiceTrait for TrackingService {
    async fn record_open(
        &self,
        request: &TrackingRequest,
        opened_at: NaiveDateTime,
    ) -> Result<OpenOutcome> {
        let Some(record) = self.record_store.find(&request.identifier).await? else {
            return Ok(OpenOutcome::NotFound);
        };
        debug!(
            "Marking slot {} opened for '{}' at {}",
            request.slot, request.identifier, record
        );
        self.record_store
            .mark_opened(&record, request.slot, opened_at)
            .await?;
        Ok(OpenOutcome::Recorded { record, opened_at })
    }

    async fn track(&self, query: TrackingQuery, opened_at: NaiveDateTime) -> TrackingOutcome {
        let request = match query.into_request() {
            Ok(Some(request)) => request,
            Ok(None) => return TrackingOutcome::Skipped,
            Err(err) => return TrackingOutcome::Malformed(err),
        };

        match self.record_open(&request, opened_at).await {
            Ok(OpenOutcome::Recorded { record, opened_at }) => TrackingOutcome::Recorded {
                request,
                record,
                opened_at,
            },
            Ok(OpenOutcome::NotFound) => TrackingOutcome::NotFound { request },
            Err(error) => TrackingOutcome::Failed { request, error },
        }
    }
}
