//! RFC 5322 date-time parsing.

use chrono::{DateTime, FixedOffset};

use crate::error::{Error, Result};

/// Parses an RFC 5322 `date-time` as found in `Date`, `Delivery-Date` and
/// the trailing part of `Received` headers.
///
/// Trailing comments such as `(PST)` or `(UTC)` are stripped before
/// parsing, since many mail agents append them.
///
/// # Errors
///
/// Returns [`Error::InvalidDate`] if the value is not a valid date-time.
pub fn parse_date(value: &str) -> Result<DateTime<FixedOffset>> {
    let trimmed = strip_trailing_comment(value.trim());
    DateTime::parse_from_rfc2822(trimmed).map_err(|source| Error::InvalidDate {
        value: value.to_string(),
        source,
    })
}

/// Extracts the date-time part of a `Received` trace header (the text after
/// the last `;`), if any.
#[must_use]
pub fn received_date(received: &str) -> Option<&str> {
    received
        .rsplit_once(';')
        .map(|(_, date)| date.trim())
        .filter(|date| !date.is_empty())
}

fn strip_trailing_comment(value: &str) -> &str {
    let mut value = value;
    while value.ends_with(')') {
        match value.rfind('(') {
            Some(open) => value = value[..open].trim_end(),
            None => break,
        }
    }
    value
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use chrono::{NaiveDate, TimeZone, Utc};

    #[test]
    fn test_parse_date() {
        let date = parse_date("Wed, 15 Mar 2023 10:30:00 +0000").unwrap();
        let expected = Utc.with_ymd_and_hms(2023, 3, 15, 10, 30, 0).unwrap();
        assert_eq!(date, expected);
    }

    #[test]
    fn test_parse_date_with_offset_and_comment() {
        let date = parse_date("Tue, 14 Mar 2023 20:30:00 -0800 (PST)").unwrap();
        assert_eq!(
            date.naive_utc(),
            NaiveDate::from_ymd_opt(2023, 3, 15)
                .unwrap()
                .and_hms_opt(4, 30, 0)
                .unwrap()
        );
    }

    #[test]
    fn test_parse_date_without_weekday() {
        assert!(parse_date("1 Jan 2024 00:00:00 +0000").is_ok());
    }

    #[test]
    fn test_parse_date_invalid() {
        let err = parse_date("sometime last week").unwrap_err();
        assert!(matches!(err, Error::InvalidDate { .. }));
        assert!(err.to_string().contains("sometime last week"));
    }

    #[test]
    fn test_received_date() {
        assert_eq!(
            received_date("from mx.example.com by mail.example.org; Mon, 1 Jan 2024 00:00:00 +0000"),
            Some("Mon, 1 Jan 2024 00:00:00 +0000")
        );
        assert_eq!(received_date("from nowhere"), None);
        assert_eq!(received_date("from nowhere;  "), None);
    }
}
