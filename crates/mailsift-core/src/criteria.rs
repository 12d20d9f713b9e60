//! Filter criteria and the record matcher.

use chrono::{NaiveDate, NaiveDateTime, NaiveTime};

use crate::error::{Error, Result};
use crate::record::EmailRecord;

/// Date format accepted for date bounds.
pub const DATE_FORMAT: &str = "%Y-%m-%d";

/// Conjunctive filter over [`EmailRecord`]s.
///
/// Unset fields never constrain. Date bounds are inclusive; substring
/// filters are case-insensitive.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Criteria {
    /// Earliest accepted delivery time.
    pub date_from: Option<NaiveDateTime>,
    /// Latest accepted delivery time.
    pub date_to: Option<NaiveDateTime>,
    /// Substring required in the sender.
    pub from: Option<String>,
    /// Substring required in the subject.
    pub subject: Option<String>,
    /// Substring required in the body.
    pub body: Option<String>,
}

impl Criteria {
    /// Creates criteria that match everything.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the lower date bound.
    #[must_use]
    pub const fn with_date_from(mut self, date_from: NaiveDateTime) -> Self {
        self.date_from = Some(date_from);
        self
    }

    /// Sets the upper date bound.
    #[must_use]
    pub const fn with_date_to(mut self, date_to: NaiveDateTime) -> Self {
        self.date_to = Some(date_to);
        self
    }

    /// Requires `from` to contain `sender`.
    #[must_use]
    pub fn with_from(mut self, sender: impl Into<String>) -> Self {
        self.from = Some(sender.into());
        self
    }

    /// Requires `subject` to contain `subject`.
    #[must_use]
    pub fn with_subject(mut self, subject: impl Into<String>) -> Self {
        self.subject = Some(subject.into());
        self
    }

    /// Requires `body` to contain `body`.
    #[must_use]
    pub fn with_body(mut self, body: impl Into<String>) -> Self {
        self.body = Some(body.into());
        self
    }

    /// Returns true if either date bound is set.
    #[must_use]
    pub const fn has_date_bounds(&self) -> bool {
        self.date_from.is_some() || self.date_to.is_some()
    }

    /// Returns true if no filter is set, i.e. every record matches.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        !self.has_date_bounds()
            && self.from.is_none()
            && self.subject.is_none()
            && self.body.is_none()
    }

    /// Tests a record against every set filter.
    #[must_use]
    pub fn matches(&self, record: &EmailRecord) -> bool {
        if self.has_date_bounds() {
            // Undated records never satisfy a date range
            let Some(delivered) = record.delivered_at() else {
                return false;
            };
            if self.date_from.is_some_and(|from| delivered < from) {
                return false;
            }
            if self.date_to.is_some_and(|to| delivered > to) {
                return false;
            }
        }

        contains(self.from.as_deref(), &record.from)
            && contains(self.subject.as_deref(), &record.subject)
            && contains(self.body.as_deref(), &record.body)
    }
}

/// Case-insensitive containment; an unset needle always matches.
fn contains(needle: Option<&str>, haystack: &str) -> bool {
    needle.is_none_or(|needle| haystack.to_lowercase().contains(&needle.to_lowercase()))
}

/// Parses a `YYYY-MM-DD` date bound into midnight of that day.
///
/// # Errors
///
/// Returns [`Error::InvalidDate`] naming `flag` if the value is not a
/// valid date.
pub fn parse_date_bound(flag: &str, value: &str) -> Result<NaiveDateTime> {
    NaiveDate::parse_from_str(value.trim(), DATE_FORMAT)
        .map(|date| date.and_time(NaiveTime::MIN))
        .map_err(|_| Error::InvalidDate {
            flag: flag.to_string(),
            value: value.to_string(),
        })
}
