//! Calendar helpers: "today" in a user's timezone and date key arithmetic.

use ascendia_types::DateKey;
use chrono::{DateTime, FixedOffset, Utc};
use chrono_tz::Tz;
use tracing::warn;

/// How a timezone string was understood.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Zone {
    /// IANA zone name (exact or case-insensitive match).
    Named(Tz),
    /// Fixed offset such as `+05:30` or `UTC-3`.
    Fixed(FixedOffset),
    /// Nothing matched; dates fall back to UTC.
    Unknown,
}

/// Resolve a timezone string through the fallback chain:
/// exact IANA name, case-insensitive IANA name, fixed UTC offset.
pub fn resolve_zone(name: &str) -> Zone {
    let name = name.trim();
    if let Ok(tz) = name.parse::<Tz>() {
        return Zone::Named(tz);
    }
    if let Ok(tz) = Tz::from_str_insensitive(name) {
        return Zone::Named(tz);
    }
    match parse_fixed_offset(name) {
        Some(offset) => Zone::Fixed(offset),
        None => Zone::Unknown,
    }
}

/// True if `name` resolves without falling back to UTC.
pub fn is_known_timezone(name: &str) -> bool {
    !matches!(resolve_zone(name), Zone::Unknown)
}

/// Accepts `+HH`, `+HH:MM`, `+HHMM`, optionally prefixed by `UTC` or `GMT`.
fn parse_fixed_offset(s: &str) -> Option<FixedOffset> {
    let upper = s.to_ascii_uppercase();
    let rest = upper
        .strip_prefix("UTC")
        .or_else(|| upper.strip_prefix("GMT"))
        .unwrap_or(&upper);
    if !rest.is_ascii() {
        return None;
    }

    let (sign, digits) = match rest.as_bytes().first()? {
        b'+' => (1, &rest[1..]),
        b'-' => (-1, &rest[1..]),
        _ => return None,
    };

    let (hours, minutes) = match digits.split_once(':') {
        Some((h, m)) => (h, m),
        None if digits.len() > 2 => digits.split_at(digits.len() - 2),
        None => (digits, "0"),
    };
    if hours.is_empty() || hours.len() > 2 || minutes.len() > 2 {
        return None;
    }
    let hours: i32 = hours.parse().ok()?;
    let minutes: i32 = minutes.parse().ok()?;
    if hours > 14 || minutes > 59 {
        return None;
    }
    FixedOffset::east_opt(sign * (hours * 3600 + minutes * 60))
}

/// Calendar date of `instant` in the named timezone, UTC if unresolvable.
pub fn date_key_in_time_zone(instant: DateTime<Utc>, timezone: &str) -> DateKey {
    let date = match resolve_zone(timezone) {
        Zone::Named(tz) => instant.with_timezone(&tz).date_naive(),
        Zone::Fixed(offset) => instant.with_timezone(&offset).date_naive(),
        Zone::Unknown => {
            warn!(timezone, "unrecognised timezone, using UTC date");
            instant.date_naive()
        }
    };
    DateKey::from_date(date)
}

/// Whole days `a - b`, both anchored at midnight UTC.
pub fn diff_days(a: DateKey, b: DateKey) -> i64 {
    a.days_since(b)
}

pub fn add_days(key: DateKey, days: i64) -> DateKey {
    key.add_days(days)
}

/// `count` days ending at `today`, newest first.
pub fn trailing_days(today: DateKey, count: usize) -> Vec<DateKey> {
    (0..count as i64).map(|i| today.add_days(-i)).collect()
}

/// Unix seconds for `instant`, clamped at the epoch.
pub fn unix_seconds(instant: DateTime<Utc>) -> u64 {
    u64::try_from(instant.timestamp()).unwrap_or(0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn key(s: &str) -> DateKey {
        s.parse().expect("date key")
    }

    fn at(y: i32, mo: u32, d: u32, h: u32, mi: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(y, mo, d, h, mi, 0)
            .single()
            .expect("valid instant")
    }

    #[test]
    fn test_named_zone_shifts_date() {
        // 02:30 UTC on Feb 1 is still Jan 31 in New York.
        let instant = at(2026, 2, 1, 2, 30);
        assert_eq!(
            date_key_in_time_zone(instant, "America/New_York"),
            key("2026-01-31")
        );
        assert_eq!(date_key_in_time_zone(instant, "UTC"), key("2026-02-01"));
        // 15:00 UTC on Jan 31 is already Feb 1 in Tokyo.
        assert_eq!(
            date_key_in_time_zone(at(2026, 1, 31, 15, 0), "Asia/Tokyo"),
            key("2026-02-01")
        );
    }

    #[test]
    fn test_case_insensitive_zone() {
        assert!(matches!(resolve_zone("europe/paris"), Zone::Named(_)));
    }

    #[test]
    fn test_fixed_offsets() {
        let instant = at(2026, 2, 1, 20, 0);
        assert_eq!(date_key_in_time_zone(instant, "+05:30"), key("2026-02-02"));
        assert_eq!(date_key_in_time_zone(instant, "UTC-3"), key("2026-02-01"));
        assert_eq!(date_key_in_time_zone(instant, "GMT+0530"), key("2026-02-02"));
        assert!(matches!(resolve_zone("+25:00"), Zone::Unknown));
    }

    #[test]
    fn test_non_ascii_offset_is_unknown() {
        for tz in ["+\u{e9}1", "-12\u{e9}", "UTC+\u{e9}\u{e9}"] {
            assert!(!is_known_timezone(tz));
        }
        assert_eq!(
            date_key_in_time_zone(at(2026, 2, 1, 20, 0), "+\u{e9}1"),
            key("2026-02-01")
        );
    }

    #[test]
    fn test_unknown_zone_falls_back_to_utc() {
        let instant = at(2026, 2, 1, 23, 59);
        assert!(!is_known_timezone("Mars/Olympus_Mons"));
        assert_eq!(
            date_key_in_time_zone(instant, "Mars/Olympus_Mons"),
            key("2026-02-01")
        );
    }

    #[test]
    fn test_diff_and_add() {
        assert_eq!(diff_days(key("2026-02-07"), key("2026-02-01")), 6);
        assert_eq!(add_days(key("2026-02-01"), -1), key("2026-01-31"));
    }

    #[test]
    fn test_trailing_days_newest_first() {
        let days = trailing_days(key("2026-02-02"), 3);
        assert_eq!(
            days,
            vec![key("2026-02-02"), key("2026-02-01"), key("2026-01-31")]
        );
    }
}
