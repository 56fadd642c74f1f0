//! Helpers for the `YYYY-MM-DD` date strings used throughout the pipelines.

use chrono::NaiveDate;

/// Wire format for all itinerary dates.
pub const DATE_FORMAT: &str = "%Y-%m-%d";

/// Parse a `YYYY-MM-DD` date string.
pub fn parse_date(s: &str) -> Option<NaiveDate> {
    NaiveDate::parse_from_str(s.trim(), DATE_FORMAT).ok()
}

/// Trip length in days, inclusive of both endpoints.
///
/// Falls back to a single day when either date fails to parse or the range
/// is inverted, so venue fetching can always proceed.
pub fn trip_length_days(start: &str, end: &str) -> u32 {
    match (parse_date(start), parse_date(end)) {
        (Some(s), Some(e)) if e >= s => (e - s).num_days() as u32 + 1,
        _ => 1,
    }
}

/// The date `offset` days after `start`, in wire format.
pub fn date_plus_days(start: &str, offset: u32) -> Option<String> {
    let base = parse_date(start)?;
    Some(
        (base + chrono::Duration::days(offset as i64))
            .format(DATE_FORMAT)
            .to_string(),
    )
}

/// Whether a date string is a template placeholder rather than a real date.
pub fn is_placeholder_date(s: &str) -> bool {
    let trimmed = s.trim();
    trimmed.is_empty() || trimmed.contains("YYYY") || trimmed.contains("MM") || trimmed.contains("DD")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn trip_length_is_inclusive() {
        assert_eq!(trip_length_days("2025-01-15", "2025-01-17"), 3);
        assert_eq!(trip_length_days("2025-01-15", "2025-01-15"), 1);
    }

    #[test]
    fn trip_length_defaults_to_one_day() {
        assert_eq!(trip_length_days("next friday", "2025-01-17"), 1);
        assert_eq!(trip_length_days("", ""), 1);
        // Inverted range is treated as unparseable, not negative.
        assert_eq!(trip_length_days("2025-01-17", "2025-01-15"), 1);
    }

    #[test]
    fn date_plus_days_advances_calendar() {
        assert_eq!(date_plus_days("2025-01-31", 1).unwrap(), "2025-02-01");
        assert_eq!(date_plus_days("2025-01-15", 0).unwrap(), "2025-01-15");
        assert!(date_plus_days("not a date", 1).is_none());
    }

    #[test]
    fn placeholder_dates_are_detected() {
        assert!(is_placeholder_date("YYYY-MM-DD"));
        assert!(is_placeholder_date(""));
        assert!(!is_placeholder_date("2025-01-15"));
    }
}
