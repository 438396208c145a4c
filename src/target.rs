//! Parsing and validation of countdown targets.
//!
//! Accepted forms:
//!
//! - RFC 3339: `2026-12-31T23:59:59Z`, `2026-12-31T23:59:59+02:00`
//! - naive date-time, read as UTC: `2026-12-31T23:59:59`, `2026-12-31 23:59`
//! - bare date, midnight UTC: `2026-12-31`
//! - Unix epoch milliseconds: `1798761599000`
//!
//! ```rust
//! use bubbletea_countdown::target::parse_target;
//!
//! let t = parse_target(" 2026-12-31 ").unwrap();
//! assert_eq!(t.to_rfc3339(), "2026-12-31T00:00:00+00:00");
//! assert!(parse_target("next tuesday").is_err());
//! ```

use crate::error::{CountdownError, Result};
use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};

const NAIVE_DATE_TIME_FORMATS: [&str; 4] = [
    "%Y-%m-%dT%H:%M:%S",
    "%Y-%m-%d %H:%M:%S",
    "%Y-%m-%dT%H:%M",
    "%Y-%m-%d %H:%M",
];

/// Parses a target instant from its textual form.
pub fn parse_target(input: &str) -> Result<DateTime<Utc>> {
    let s = input.trim();
    let invalid = || CountdownError::InvalidTarget {
        input: input.to_string(),
    };

    if s.is_empty() {
        return Err(invalid());
    }

    if s.bytes().all(|b| b.is_ascii_digit()) || (s.starts_with('-') && s.len() > 1) {
        return s
            .parse::<i64>()
            .ok()
            .and_then(DateTime::from_timestamp_millis)
            .ok_or_else(invalid);
    }

    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Ok(dt.with_timezone(&Utc));
    }

    for format in NAIVE_DATE_TIME_FORMATS {
        if let Ok(naive) = NaiveDateTime::parse_from_str(s, format) {
            return Ok(naive.and_utc());
        }
    }

    NaiveDate::parse_from_str(s, "%Y-%m-%d")
        .ok()
        .and_then(|date| date.and_hms_opt(0, 0, 0))
        .map(|naive| naive.and_utc())
        .ok_or_else(invalid)
}

/// Rejects targets that are not strictly after `now`.
pub fn ensure_future(target: DateTime<Utc>, now: DateTime<Utc>) -> Result<DateTime<Utc>> {
    if target <= now {
        return Err(CountdownError::PastTarget { target, now });
    }
    Ok(target)
}
