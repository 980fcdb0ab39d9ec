/// Format used for every recorded open timestamp, regardless of backend
pub const OPENED_AT_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Query parameter carrying the record identifier
pub const IDENTIFIER_PARAM: &str = "id";

/// Query parameter carrying the slot number
pub const SLOT_PARAM: &str = "num";

/// Path of the tracking route
pub const TRACKING_PATH: &str = "/read";
