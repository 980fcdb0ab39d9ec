//! Read Receipt Core - Domain types, services, and traits.
//!
//! This crate contains the tracking logic for the read receipt pixel.
//! It is backend-agnostic and defines the `RecordStoreTrait` contract that is
//! implemented by the `storage-notion` and `storage-sheets` crates.

pub mod constants;
pub mod errors;
pub mod tracking;

// Re-export error types
pub use errors::Error;
pub use errors::Result;
