//! Time utilities: calendar dates normalized to one IANA timezone.

use anyhow::Result;
use chrono::{DateTime, NaiveDate, Utc};
use chrono_tz::Tz;

pub fn parse_tz(tz: &str) -> Result<Tz> {
    tz.parse()
        .map_err(|_| anyhow::anyhow!("invalid timezone: {tz}"))
}

/// The calendar date of a UTC instant as seen in `tz`.
pub fn local_date(ts: DateTime<Utc>, tz: Tz) -> NaiveDate {
    ts.with_timezone(&tz).date_naive()
}

/// Today's calendar date in `tz`.
pub fn today_in(tz: Tz) -> NaiveDate {
    local_date(Utc::now(), tz)
}

/// Parse a due date given as `YYYY-MM-DD` or an RFC 3339 timestamp.
/// Timestamps are reduced to their calendar date in `tz`.
pub fn parse_due_date(text: &str, tz: Tz) -> Option<NaiveDate> {
    let text = text.trim();
    if text.is_empty() {
        return None;
    }
    if let Ok(d) = NaiveDate::parse_from_str(text, "%Y-%m-%d") {
        return Some(d);
    }
    DateTime::parse_from_rfc3339(text)
        .ok()
        .map(|dt| local_date(dt.with_timezone(&Utc), tz))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_parse_plain_date() {
        let d = parse_due_date("2025-08-12", chrono_tz::UTC).unwrap();
        assert_eq!(d, NaiveDate::from_ymd_opt(2025, 8, 12).unwrap());
    }

    #[test]
    fn test_timestamp_uses_local_calendar_day() {
        // 02:30 UTC on Aug 12 is still the evening of Aug 11 in Toronto (EDT, UTC-4)
        let tz = parse_tz("America/Toronto").unwrap();
        let d = parse_due_date("2025-08-12T02:30:00Z", tz).unwrap();
        assert_eq!(d, NaiveDate::from_ymd_opt(2025, 8, 11).unwrap());
    }

    #[test]
    fn test_invalid_inputs() {
        assert!(parse_due_date("", chrono_tz::UTC).is_none());
        assert!(parse_due_date("next tuesday", chrono_tz::UTC).is_none());
        assert!(parse_due_date("2025-02-30", chrono_tz::UTC).is_none());
        assert!(parse_tz("Mars/Olympus").is_err());
    }

    #[test]
    fn test_local_date() {
        let tz = parse_tz("America/Vancouver").unwrap();
        let ts = Utc.with_ymd_and_hms(2026, 1, 1, 5, 0, 0).unwrap();
        assert_eq!(local_date(ts, tz), NaiveDate::from_ymd_opt(2025, 12, 31).unwrap());
    }
}
