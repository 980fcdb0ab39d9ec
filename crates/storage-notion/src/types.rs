//! Types for Notion API requests and responses.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

// ─────────────────────────────────────────────────────────────────────────────
// Database Query
// ─────────────────────────────────────────────────────────────────────────────

/// Body of `POST /v1/databases/{id}/query`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct QueryDatabaseRequest {
    pub filter: PropertyFilter,
    pub page_size: u32,
}

/// Filter on a single title property.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct PropertyFilter {
    pub property: String,
    pub title: TextCondition,
}

/// Text condition. Only exact equality is used.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct TextCondition {
    pub equals: String,
}

impl QueryDatabaseRequest {
    /// Exact-match query on the title property, first page only.
    pub fn title_equals(property: &str, value: &str) -> Self {
        Self {
            filter: PropertyFilter {
                property: property.to_string(),
                title: TextCondition {
                    equals: value.to_string(),
                },
            },
            page_size: 1,
        }
    }
}

/// Response of a database query.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QueryDatabaseResponse {
    pub results: Vec<PageSummary>,
}

/// The part of a page object we care about.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PageSummary {
    pub id: String,
}

// ─────────────────────────────────────────────────────────────────────────────
// Page Update
// ─────────────────────────────────────────────────────────────────────────────

/// Body of `PATCH /v1/pages/{id}`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct UpdatePageRequest {
    pub properties: BTreeMap<String, DatePropertyValue>,
}

/// Value of a date property.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct DatePropertyValue {
    pub date: DateValue,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct DateValue {
    pub start: String,
}

impl UpdatePageRequest {
    /// Sets one date property, leaving every other property untouched.
    pub fn set_date(property: impl Into<String>, start: impl Into<String>) -> Self {
        let mut properties = BTreeMap::new();
        properties.insert(
            property.into(),
            DatePropertyValue {
                date: DateValue {
                    start: start.into(),
                },
            },
        );
        Self { properties }
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Errors
// ─────────────────────────────────────────────────────────────────────────────

/// Error body returned by the Notion API.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiErrorResponse {
    #[serde(default)]
    pub code: String,
    #[serde(default)]
    pub message: String,
}
