//! Tracking domain models.

use std::fmt;
use std::num::NonZeroU32;
use std::str::FromStr;

use chrono::NaiveDateTime;

use crate::constants::OPENED_AT_FORMAT;
use crate::errors::{Error, Result};

/// 1-based number of a tracked send for one identifier.
///
/// Each backend maps it differently: the database store synthesizes a
/// property name from it, the spreadsheet store uses it as a column offset.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SlotNumber(NonZeroU32);

impl SlotNumber {
    pub fn new(value: u32) -> Option<Self> {
        NonZeroU32::new(value).map(Self)
    }

    pub fn get(self) -> u32 {
        self.0.get()
    }
}

impl fmt::Display for SlotNumber {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for SlotNumber {
    type Err = Error;

    fn from_str(raw: &str) -> Result<Self> {
        let value: i64 = raw.trim().parse().map_err(|_| {
            Error::MalformedRequest(format!("slot number '{}' is not an integer", raw))
        })?;
        u32::try_from(value)
            .ok()
            .and_then(SlotNumber::new)
            .ok_or_else(|| {
                Error::MalformedRequest(format!("slot number must be positive, got {}", value))
            })
    }
}

/// Raw query parameters of a tracking fetch, before validation.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TrackingQuery {
    pub id: Option<String>,
    pub num: Option<String>,
}

impl TrackingQuery {
    pub fn new(id: Option<&str>, num: Option<&str>) -> Self {
        Self {
            id: id.map(str::to_string),
            num: num.map(str::to_string),
        }
    }

    /// Validates the query.
    ///
    /// Returns `Ok(None)` when there is no identifier (nothing to track),
    /// and `Error::MalformedRequest` when an identifier is present but the
    /// slot number is missing or not a positive integer.
    pub fn into_request(self) -> Result<Option<TrackingRequest>> {
        let identifier = match self.id {
            Some(id) if !id.is_empty() => id,
            _ => return Ok(None),
        };
        let slot = self
            .num
            .as_deref()
            .ok_or_else(|| Error::MalformedRequest("missing slot number".to_string()))?
            .parse::<SlotNumber>()?;
        Ok(Some(TrackingRequest { identifier, slot }))
    }
}

/// A validated tracking request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TrackingRequest {
    pub identifier: String,
    pub slot: SlotNumber,
}

impl TrackingRequest {
    pub fn new(identifier: impl Into<String>, slot: SlotNumber) -> Self {
        Self {
            identifier: identifier.into(),
            slot,
        }
    }
}

/// Backend-specific locator of a tracked record.
///
/// Only valid for the duration of a single update; never cached.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RecordRef {
    /// Database entry, addressed by page id.
    Page { page_id: String },
    /// Spreadsheet cell holding the identifier, 1-based.
    Cell { row: u32, col: u32 },
}

impl fmt::Display for RecordRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RecordRef::Page { page_id } => write!(f, "page {}", page_id),
            RecordRef::Cell { row, col } => write!(f, "row {}, column {}", row, col),
        }
    }
}

/// Result of a lookup + update pass that did not fail.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OpenOutcome {
    Recorded {
        record: RecordRef,
        opened_at: NaiveDateTime,
    },
    NotFound,
}

/// Terminal state of one tracking fetch.
///
/// Produced for logging and tests; the HTTP response never depends on it.
#[derive(Debug)]
pub enum TrackingOutcome {
    /// No identifier was supplied.
    Skipped,
    /// Identifier present but slot number missing or invalid.
    Malformed(Error),
    NotFound {
        request: TrackingRequest,
    },
    Recorded {
        request: TrackingRequest,
        record: RecordRef,
        opened_at: NaiveDateTime,
    },
    /// Lookup or write failed. The update is lost.
    Failed {
        request: TrackingRequest,
        error: Error,
    },
}

impl TrackingOutcome {
    pub fn is_recorded(&self) -> bool {
        matches!(self, TrackingOutcome::Recorded { .. })
    }
}

/// Renders an open timestamp the way every backend stores it.
pub fn format_opened_at(opened_at: &NaiveDateTime) -> String {
    opened_at.format(OPENED_AT_FORMAT).to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn slot(n: u32) -> SlotNumber {
        SlotNumber::new(n).unwrap()
    }

    #[test]
    fn parses_slot_numbers() {
        assert_eq!("2".parse::<SlotNumber>().unwrap(), slot(2));
        assert_eq!(" 7 ".parse::<SlotNumber>().unwrap(), slot(7));
        assert_eq!("+3".parse::<SlotNumber>().unwrap(), slot(3));
    }

    #[test]
    fn rejects_non_positive_and_non_numeric_slots() {
        for raw in ["0", "-1", "abc", "", "1.5", "99999999999"] {
            let err = raw.parse::<SlotNumber>().unwrap_err();
            assert!(
                matches!(err, Error::MalformedRequest(_)),
                "expected malformed for {raw:?}, got {err:?}"
            );
        }
    }

    #[test]
    fn missing_or_empty_identifier_is_skipped() {
        assert_eq!(TrackingQuery::new(None, Some("1")).into_request().unwrap(), None);
        assert_eq!(TrackingQuery::new(Some(""), Some("1")).into_request().unwrap(), None);
        // no identifier wins over a bad slot
        assert_eq!(TrackingQuery::new(None, Some("x")).into_request().unwrap(), None);
    }

    #[test]
    fn identifier_without_valid_slot_is_malformed() {
        assert!(matches!(
            TrackingQuery::new(Some("alice"), None).into_request(),
            Err(Error::MalformedRequest(_))
        ));
        assert!(matches!(
            TrackingQuery::new(Some("alice"), Some("two")).into_request(),
            Err(Error::MalformedRequest(_))
        ));
    }

    #[test]
    fn valid_query_keeps_identifier_verbatim() {
        let request = TrackingQuery::new(Some("Alice.Promo@Example.com"), Some("2"))
            .into_request()
            .unwrap()
            .unwrap();
        assert_eq!(request.identifier, "Alice.Promo@Example.com");
        assert_eq!(request.slot, slot(2));
    }

    #[test]
    fn record_refs_describe_their_location() {
        let page = RecordRef::Page {
            page_id: "abc".to_string(),
        };
        let cell = RecordRef::Cell { row: 4, col: 1 };
        assert_eq!(page.to_string(), "page abc");
        assert_eq!(cell.to_string(), "row 4, column 1");
    }

    #[test]
    fn formats_opened_at_without_fraction() {
        let at = NaiveDate::from_ymd_opt(2024, 3, 9)
            .unwrap()
            .and_hms_milli_opt(7, 5, 3, 450)
            .unwrap();
        assert_eq!(format_opened_at(&at), "2024-03-09 07:05:03");
    }
}
