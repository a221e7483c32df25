//! Lightweight UTC timestamps (no chrono dependency).

use std::time::{SystemTime, UNIX_EPOCH};

pub fn now_unix_secs() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap_or_default()
        .as_secs()
}

/// Current UTC timestamp, e.g. `2026-10-16T08:30:00Z`.
pub fn now_iso8601() -> String {
    unix_to_iso8601(now_unix_secs())
}

pub fn unix_to_iso8601(secs: u64) -> String {
    let days = (secs / 86_400) as i64;
    let rem = secs % 86_400;
    let (year, month, day) = date_from_epoch_days(days);
    format!(
        "{year:04}-{month:02}-{day:02}T{:02}:{:02}:{:02}Z",
        rem / 3600,
        (rem % 3600) / 60,
        rem % 60
    )
}

/// Proleptic Gregorian date for a count of days since 1970-01-01.
fn date_from_epoch_days(days: i64) -> (i64, u32, u32) {
    // shift to a March-based 400-year era so leap days fall at year end
    let shifted = days + 719_468;
    let era = shifted.div_euclid(146_097);
    let day_of_era = shifted.rem_euclid(146_097);
    let year_of_era =
        (day_of_era - day_of_era / 1460 + day_of_era / 36_524 - day_of_era / 146_096) / 365;
    let day_of_year = day_of_era - (365 * year_of_era + year_of_era / 4 - year_of_era / 100);
    let month_index = (5 * day_of_year + 2) / 153;
    let day = (day_of_year - (153 * month_index + 2) / 5 + 1) as u32;
    let month = if month_index < 10 {
        month_index + 3
    } else {
        month_index - 9
    } as u32;
    let year = year_of_era + era * 400 + i64::from(month <= 2);
    (year, month, day)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_epoch() {
        assert_eq!(unix_to_iso8601(0), "1970-01-01T00:00:00Z");
    }

    #[test]
    fn test_known_dates() {
        assert_eq!(unix_to_iso8601(951_782_400), "2000-02-29T00:00:00Z");
        assert_eq!(unix_to_iso8601(1_771_632_000), "2026-02-21T00:00:00Z");
        assert_eq!(unix_to_iso8601(1_771_632_000 + 3_661), "2026-02-21T01:01:01Z");
    }

    #[test]
    fn test_now_is_well_formed() {
        let now = now_iso8601();
        assert_eq!(now.len(), 20);
        assert!(now.ends_with('Z'));
    }
}
