//! Notion storage for the read receipt tracker.
//!
//! Tracked records are pages of a Notion database. The identifier lives in
//! the database's title property and each tracked send has its own date
//! property named `Email {slot} Opened`, which must already exist in the
//! database schema.
//!
//! # Usage
//!
//! ```rust,ignore
//! use readreceipt_storage_notion::{
//!     NotionClient, NotionCredentials, NotionRecordStore, DEFAULT_NOTION_API_URL,
//! };
//!
//! let credentials = NotionCredentials::from_file("notion-keys.json")?;
//! let client = NotionClient::new(DEFAULT_NOTION_API_URL, &credentials.notion_token)?;
//! let store = NotionRecordStore::new(client, &credentials);
//! let page = store.find("alice-promo-42").await?;
//! ```

mod client;
mod credentials;
mod error;
mod store;
mod types;

pub use client::{NotionClient, DEFAULT_NOTION_API_URL, NOTION_API_VERSION};
pub use credentials::{NotionCredentials, DEFAULT_TITLE_PROPERTY};
pub use error::{NotionError, Result};
pub use store::{opened_property_name, NotionRecordStore};
pub use types::*;
