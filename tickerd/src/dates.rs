//! UTC calendar-day helpers for the daily quota reset.
//!
//! All reset logic works on UTC day keys rather than device-local time, so
//! every user resets at the same absolute instant regardless of timezone and
//! two concurrent requests can never disagree about which day it is.

use chrono::{DateTime, Datelike, Utc};

const SECONDS_PER_WEEK: i64 = 7 * 24 * 60 * 60;

/// Canonical day key for a timestamp: `YYYY-MM-DD` in UTC.
///
/// The format is lexicographically sortable, so day keys compare correctly
/// as plain strings.
pub fn date_key(ts: DateTime<Utc>) -> String {
    ts.format("%Y-%m-%d").to_string()
}

/// Whether a record last reset on `last` needs its daily reset as of `today`.
///
/// A record that has never reset (`None`) always needs one.
pub fn needs_reset(last: Option<&str>, today: &str) -> bool {
    match last {
        None => true,
        Some(last) => last != today,
    }
}

/// Week counter since the Unix epoch. Used to vary the rotation theme from
/// one week to the next.
pub fn week_index(ts: DateTime<Utc>) -> i64 {
    ts.timestamp().div_euclid(SECONDS_PER_WEEK)
}

/// Day of week with Sunday = 0, matching the card-rotation schedule.
pub fn day_of_week(ts: DateTime<Utc>) -> u32 {
    ts.weekday().num_days_from_sunday()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn at(y: i32, m: u32, d: u32, h: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(y, m, d, h, 0, 0).unwrap()
    }

    #[test]
    fn date_key_is_utc_and_zero_padded() {
        assert_eq!(date_key(at(2025, 3, 7, 0)), "2025-03-07");
        assert_eq!(date_key(at(2025, 3, 7, 23)), "2025-03-07");
        assert_eq!(date_key(at(2025, 12, 31, 12)), "2025-12-31");
    }

    #[test]
    fn date_keys_sort_lexicographically() {
        let earlier = date_key(at(2025, 9, 30, 0));
        let later = date_key(at(2025, 10, 1, 0));
        assert!(earlier < later);
    }

    #[test]
    fn reset_needed_when_never_reset_or_day_changed() {
        assert!(needs_reset(None, "2025-03-07"));
        assert!(needs_reset(Some("2025-03-06"), "2025-03-07"));
        assert!(!needs_reset(Some("2025-03-07"), "2025-03-07"));
    }

    #[test]
    fn week_index_advances_across_week_boundary() {
        let a = at(2025, 3, 3, 0); // Monday
        let b = at(2025, 3, 17, 0); // two weeks later
        assert_eq!(week_index(b) - week_index(a), 2);
    }

    #[test]
    fn day_of_week_starts_on_sunday() {
        // 2025-03-09 was a Sunday.
        assert_eq!(day_of_week(at(2025, 3, 9, 10)), 0);
        assert_eq!(day_of_week(at(2025, 3, 10, 10)), 1);
    }
}
