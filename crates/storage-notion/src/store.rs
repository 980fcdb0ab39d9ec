use async_trait::async_trait;
use chrono::NaiveDateTime;
use log::{debug, warn};
use readreceipt_core::errors::{Result, StoreError};
use readreceipt_core::tracking::{format_opened_at, RecordRef, RecordStoreTrait, SlotNumber};

use crate::client::NotionClient;
use crate::credentials::NotionCredentials;
use crate::error::NotionError;
use crate::types::{QueryDatabaseRequest, UpdatePageRequest};

/// Name of the date property that records opens of the given send.
///
/// The database schema must declare one such property per slot in use.
pub fn opened_property_name(slot: SlotNumber) -> String {
    format!("Email {} Opened", slot)
}

/// Record store backed by a Notion database.
pub struct NotionRecordStore {
    client: NotionClient,
    database_id: String,
    title_property: String,
}

impl NotionRecordStore {
    pub fn new(client: NotionClient, credentials: &NotionCredentials) -> Self {
        Self {
            client,
            database_id: credentials.database_id.clone(),
            title_property: credentials.title_property.clone(),
        }
    }

    fn note_throttling(err: &NotionError) {
        if err.is_rate_limited() {
            warn!("Notion rate limit hit; the update is dropped");
        }
    }
}

#[async_trait]
impl RecordStoreTrait for NotionRecordStore {
    async fn find(&self, identifier: &str) -> Result<Option<RecordRef>> {
        let query = QueryDatabaseRequest::title_equals(&self.title_property, identifier);
        let response = self
            .client
            .query_database(&self.database_id, &query)
            .await
            .map_err(|e| {
                Self::note_throttling(&e);
                StoreError::lookup(identifier, e.to_string())
            })?;

        let page = response.results.into_iter().next();
        debug!(
            "Lookup of '{}' in database {}: {:?}",
            identifier,
            self.database_id,
            page.as_ref().map(|p| p.id.as_str())
        );
        Ok(page.map(|p| RecordRef::Page { page_id: p.id }))
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
        let update =
            UpdatePageRequest::set_date(opened_property_name(slot), format_opened_at(&opened_at));
        self.client
            .update_page(page_id, &update)
            .await
            .map_err(|e| {
                Self::note_throttling(&e);
                StoreError::write(record.to_string(), e.to_string())
            })?;
        Ok(())
    }
}
