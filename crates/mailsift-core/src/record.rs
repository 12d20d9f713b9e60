//! Normalized message records.

use chrono::NaiveDateTime;
use serde::Serialize;

/// ISO-8601 layout of `delivery_time`; the fraction only appears when the
/// timestamp has sub-second precision.
const ISO_FORMAT: &str = "%Y-%m-%dT%H:%M:%S%.f";

/// One message, normalized for filtering and output.
///
/// Serializes to an object with exactly the keys `subject`, `body`,
/// `from`, `to` and `delivery_time`, in that order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct EmailRecord {
    /// Subject line, empty if absent.
    pub subject: String,
    /// Plain-text body, else HTML body, else empty.
    pub body: String,
    /// Sender display string, empty if absent.
    pub from: String,
    /// Recipient display string, empty if absent.
    pub to: String,
    /// Delivery time in ISO-8601, `None` if unknown or undecodable.
    pub delivery_time: Option<String>,
}

impl EmailRecord {
    /// Parses `delivery_time` back into a timestamp.
    ///
    /// Returns `None` if the field is null or not in ISO-8601 form.
    #[must_use]
    pub fn delivered_at(&self) -> Option<NaiveDateTime> {
        self.delivery_time
            .as_deref()
            .and_then(|time| time.parse::<NaiveDateTime>().ok())
    }
}

/// Formats a timestamp the way records store it.
#[must_use]
pub fn format_timestamp(time: NaiveDateTime) -> String {
    time.format(ISO_FORMAT).to_string()
}
