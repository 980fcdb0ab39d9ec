//! Tracking module - domain models, services, and traits.

mod tracking_model;
mod tracking_service;
mod tracking_traits;
mod tracking_url;

pub use tracking_model::{
    format_opened_at, OpenOutcome, RecordRef, SlotNumber, TrackingOutcome, TrackingQuery,
    TrackingRequest,
};
pub use tracking_service::TrackingService;
pub use tracking_traits::{RecordStoreTrait, TrackingServiceTrait};
pub use tracking_url::{tracking_image_tag, tracking_url};
