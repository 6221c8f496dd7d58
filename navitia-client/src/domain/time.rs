//! Navitia date-time handling.
//!
//! Navitia exchanges local date-times in the compact ISO 8601 basic form
//! `YYYYMMDDThhmmss` (e.g. `20230101T100000`), without an offset. The
//! coverage's timezone is implied.

use chrono::NaiveDateTime;

/// `strftime` pattern of the wire format.
pub const DATE_TIME_FORMAT: &str = "%Y%m%dT%H%M%S";

/// Error returned when parsing an invalid date-time string.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("invalid date-time {input:?}: expected YYYYMMDDThhmmss")]
pub struct DateTimeError {
    input: String,
}

/// Format a date-time the way Navitia expects it in a query.
///
/// # Examples
///
/// ```
/// use chrono::NaiveDate;
/// use navitia_client::domain::format_datetime;
///
/// let dt = NaiveDate::from_ymd_opt(2023, 1, 1)
///     .unwrap()
///     .and_hms_opt(10, 0, 0)
///     .unwrap();
/// assert_eq!(format_datetime(&dt), "20230101T100000");
/// ```
pub fn format_datetime(dt: &NaiveDateTime) -> String {
    dt.format(DATE_TIME_FORMAT).to_string()
}

/// Parse a date-time in the Navitia wire format.
pub fn parse_datetime(s: &str) -> Result<NaiveDateTime, DateTimeError> {
    // chrono accepts a few lenient variants; the wire format is fixed-width
    if s.len() != 15 {
        return Err(DateTimeError {
            input: s.to_string(),
        });
    }
    NaiveDateTime::parse_from_str(s, DATE_TIME_FORMAT).map_err(|_| DateTimeError {
        input: s.to_string(),
    })
}

/// Serde adapter for `Option<NaiveDateTime>` fields in the wire format.
pub mod serde_datetime_opt {
    use chrono::NaiveDateTime;
    use serde::{Deserialize, Deserializer};

    pub fn deserialize<'de, D>(deserializer: D) -> Result<Option<NaiveDateTime>, D::Error>
    where
        D: Deserializer<'de>,
    {
        match Option::<String>::deserialize(deserializer)? {
            None => Ok(None),
            Some(s) if s.is_empty() => Ok(None),
            Some(s) => super::parse_datetime(&s)
                .map(Some)
                .map_err(serde::de::Error::custom),
        }
    }
}
