//! Google Sheets storage for the read receipt tracker.
//!
//! Tracked records live on the first worksheet of a spreadsheet found by
//! name. The identifier sits in some cell, and the open timestamp of send `n`
//! is written `n` columns to its right as plain text.
//!
//! ```text
//!   A                B                     C
//! 1 alice-promo-42   2024-05-01 09:30:00   2024-05-08 17:02:11
//! 2 bob-promo-42     2024-05-02 08:00:40
//! ```
//!
//! Access uses a service account: a signed JWT is exchanged for an OAuth
//! access token, cached until shortly before it expires.

mod a1;
mod auth;
mod client;
mod credentials;
mod error;
mod store;
mod types;

pub use a1::{a1_cell, column_letters, locate, quote_sheet_title};
pub use auth::{
    ServiceAccountTokenProvider, StaticTokenProvider, TokenProvider, SHEETS_SCOPES,
};
pub use client::{SheetsClient, DEFAULT_DRIVE_API_URL, DEFAULT_SHEETS_API_URL};
pub use credentials::{ServiceAccountKey, DEFAULT_TOKEN_URI};
pub use error::{Result, SheetsError};
pub use store::{SheetsRecordStore, DEFAULT_SPREADSHEET_NAME};
pub use types::*;
