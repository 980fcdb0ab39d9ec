//! Builders for the pixel URL embedded in outgoing emails.

use crate::constants::{IDENTIFIER_PARAM, SLOT_PARAM};

use super::tracking_model::SlotNumber;

/// Builds `<base>?id=<identifier>&num=<slot>`.
///
/// `base_url` is the public address of the tracking route, e.g.
/// `https://mail.example.com/read`. An existing query string is extended.
pub fn tracking_url(base_url: &str, identifier: &str, slot: SlotNumber) -> String {
    let separator = if base_url.contains('?') { '&' } else { '?' };
    format!(
        "{}{}{}={}&{}={}",
        base_url,
        separator,
        IDENTIFIER_PARAM,
        urlencoding::encode(identifier),
        SLOT_PARAM,
        slot
    )
}

/// HTML image tag to append to an email body.
pub fn tracking_image_tag(base_url: &str, identifier: &str, slot: SlotNumber) -> String {
    format!("<img src='{}'>", tracking_url(base_url, identifier, slot))
}
