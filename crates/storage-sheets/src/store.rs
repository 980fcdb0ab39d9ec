use async_trait::async_trait;
use chrono::NaiveDateTime;
use log::{debug, info, warn};
use readreceipt_core::errors::{Result, StoreError};
use readreceipt_core::tracking::{format_opened_at, RecordRef, RecordStoreTrait, SlotNumber};

use crate::a1::{a1_cell, locate, quote_sheet_title};
use crate::client::SheetsClient;
use crate::error::SheetsError;
use crate::types::ValueRange;

/// Spreadsheet opened when no other name is configured.
pub const DEFAULT_SPREADSHEET_NAME: &str = "email-tracker";

/// Record store backed by one worksheet of a Google spreadsheet.
///
/// Unlike the database store there is no header lookup: slot `n` is the
/// cell `n` columns to the right of the identifier cell.
pub struct SheetsRecordStore {
    client: SheetsClient,
    spreadsheet_id: String,
    sheet_title: String,
}

impl SheetsRecordStore {
    pub fn new(
        client: SheetsClient,
        spreadsheet_id: impl Into<String>,
        sheet_title: impl Into<String>,
    ) -> Self {
        Self {
            client,
            spreadsheet_id: spreadsheet_id.into(),
            sheet_title: sheet_title.into(),
        }
    }

    /// Locates the spreadsheet by name and binds its first worksheet.
    pub async fn open(client: SheetsClient, spreadsheet_name: &str) -> crate::Result<Self> {
        let spreadsheet_id = client
            .find_spreadsheet_by_name(spreadsheet_name)
            .await?
            .ok_or_else(|| SheetsError::SpreadsheetNotFound(spreadsheet_name.to_string()))?;
        let first = client
            .sheet_properties(&spreadsheet_id)
            .await?
            .into_iter()
            .next()
            .ok_or_else(|| SheetsError::WorksheetNotFound(spreadsheet_name.to_string()))?;
        info!(
            "Using worksheet '{}' of spreadsheet '{}' ({})",
            first.title, spreadsheet_name, spreadsheet_id
        );
        Ok(Self::new(client, spreadsheet_id, first.title))
    }

    pub fn sheet_title(&self) -> &str {
        &self.sheet_title
    }

    fn note_throttling(err: &SheetsError) {
        if err.is_throttled() {
            warn!("Sheets API quota exhausted; the update is dropped");
        }
    }
}

#[async_trait]
impl RecordStoreTrait for SheetsRecordStore {
    async fn find(&self, identifier: &str) -> Result<Option<RecordRef>> {
        let range = quote_sheet_title(&self.sheet_title);
        let values = self
            .client
            .get_values(&self.spreadsheet_id, &range)
            .await
            .map_err(|e| {
                Self::note_throttling(&e);
                StoreError::lookup(identifier, e.to_string())
            })?;

        let found = locate(&values.values, identifier);
        debug!("Lookup of '{}' in '{}': {:?}", identifier, self.sheet_title, found);
        Ok(found.map(|(row, col)| RecordRef::Cell { row, col }))
    }

    async fn mark_opened(
        &self,
        record: &RecordRef,
        slot: SlotNumber,
        opened_at: NaiveDateTime,
    ) -> Result<()> {
        let RecordRef::Cell { row, col } = record else {
            return Err(StoreError::ForeignRecordRef(record.to_string()).into());
        };
        let target_col = col
            .checked_add(slot.get())
            .ok_or_else(|| StoreError::write(record.to_string(), "slot column out of range"))?;
        let range = a1_cell(&self.sheet_title, *row, target_col);
        let update = ValueRange::single(range.clone(), format_opened_at(&opened_at));

        self.client
            .update_values(&self.spreadsheet_id, &update)
            .await
            .map_err(|e| {
                Self::note_throttling(&e);
                StoreError::write(range, e.to_string())
            })?;
        Ok(())
    }
}
