//! Critical-only validation rules for generated itineraries.
//!
//! These checks gate whether a draft itinerary survives the planning
//! pipeline's validate node. They deliberately flag only defects severe
//! enough to discard a draft; soft issues (missing cost breakdowns,
//! unstated travel time, unverified opening hours) are tolerated so usable
//! plans are not over-rejected.

use chrono::NaiveTime;

use crate::dates;
use crate::models::{DayPlan, Itinerary, ValidationResult};

/// Two same-day activities may overlap by at most this many minutes.
pub const OVERLAP_TOLERANCE_MINUTES: i64 = 10;

/// Total cost may exceed the requested budget by at most this factor.
pub const BUDGET_OVERAGE_RATIO: f64 = 1.2;

/// Run every critical check against a draft itinerary.
///
/// A `budget` of 0 means the request carried no budget constraint and the
/// overage check is skipped.
pub fn validate_itinerary(itinerary: &Itinerary, budget: u64) -> ValidationResult {
    let mut errors = Vec::new();

    if itinerary.days.is_empty() {
        errors.push("Itinerary has no days planned".to_string());
    }

    for day in &itinerary.days {
        check_date(day, &mut errors);

        if day.activities.is_empty() {
            errors.push(format!("Day {} has no activities", day.day));
        }

        check_overlaps(day, &mut errors);
    }

    if budget > 0 {
        let limit = budget as f64 * BUDGET_OVERAGE_RATIO;
        if itinerary.total_cost as f64 > limit {
            errors.push(format!(
                "Total cost {} exceeds budget {} by more than {}%",
                itinerary.total_cost,
                budget,
                ((BUDGET_OVERAGE_RATIO - 1.0) * 100.0).round() as u32,
            ));
        }
    }

    ValidationResult {
        is_valid: errors.is_empty(),
        errors,
    }
}

fn check_date(day: &DayPlan, errors: &mut Vec<String>) {
    if dates::is_placeholder_date(&day.date) {
        errors.push(format!(
            "Day {} still contains a placeholder date: {:?}",
            day.day, day.date
        ));
    } else if dates::parse_date(&day.date).is_none() {
        errors.push(format!(
            "Day {} is missing a real date: {:?}",
            day.day, day.date
        ));
    }
}

/// Flag any pair of same-day activities whose time windows overlap beyond
/// the tolerance. Activities with unparseable start times are skipped here;
/// the itinerary is judged on what can be read.
fn check_overlaps(day: &DayPlan, errors: &mut Vec<String>) {
    let windows: Vec<(i64, i64, &str)> = day
        .activities
        .iter()
        .filter_map(|activity| {
            let start = minutes_from_midnight(&activity.time)?;
            let end = start + activity.duration_minutes as i64;
            Some((start, end, activity.venue_name.as_str()))
        })
        .collect();

    for (i, &(start_a, end_a, name_a)) in windows.iter().enumerate() {
        for &(start_b, end_b, name_b) in &windows[i + 1..] {
            let overlap = end_a.min(end_b) - start_a.max(start_b);
            if overlap > OVERLAP_TOLERANCE_MINUTES {
                errors.push(format!(
                    "Day {}: \"{}\" and \"{}\" overlap by {} minutes",
                    day.day, name_a, name_b, overlap
                ));
            }
        }
    }
}

fn minutes_from_midnight(time: &str) -> Option<i64> {
    use chrono::Timelike;
    let parsed = NaiveTime::parse_from_str(time.trim(), "%H:%M").ok()?;
    Some(parsed.hour() as i64 * 60 + parsed.minute() as i64)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Activity, VenueKind};

    fn activity(time: &str, name: &str, duration_minutes: u32) -> Activity {
        Activity {
            time: time.to_string(),
            venue_name: name.to_string(),
            venue_kind: VenueKind::Attraction,
            duration_minutes,
            estimated_cost: 0,
            note: String::new(),
        }
    }

    fn day(n: u32, date: &str, activities: Vec<Activity>) -> DayPlan {
        DayPlan {
            day: n,
            date: date.to_string(),
            theme: "test".to_string(),
            activities,
            daily_cost: 0,
        }
    }

    fn itinerary(days: Vec<DayPlan>, total_cost: u64) -> Itinerary {
        Itinerary {
            title: "test".to_string(),
            total_days: days.len() as u32,
            total_cost,
            days,
            lodging: None,
            summary: String::new(),
        }
    }

    #[test]
    fn valid_itinerary_passes() {
        let plan = itinerary(
            vec![day(
                1,
                "2025-01-15",
                vec![activity("10:00", "Museum", 120), activity("12:30", "Lunch", 60)],
            )],
            100_000,
        );
        let result = validate_itinerary(&plan, 100_000);
        assert!(result.is_valid, "unexpected errors: {:?}", result.errors);
    }

    #[test]
    fn overlap_beyond_tolerance_is_flagged() {
        // 10:00-12:00 vs 11:30-12:30 overlap by 30 minutes.
        let plan = itinerary(
            vec![day(
                1,
                "2025-01-15",
                vec![activity("10:00", "Museum", 120), activity("11:30", "Market", 60)],
            )],
            0,
        );
        let result = validate_itinerary(&plan, 0);
        assert!(!result.is_valid);
        assert!(result.errors[0].contains("overlap by 30 minutes"));
    }

    #[test]
    fn small_overlap_is_tolerated() {
        // 10:00-12:00 vs 11:50-13:00 overlap by exactly 10 minutes.
        let plan = itinerary(
            vec![day(
                1,
                "2025-01-15",
                vec![activity("10:00", "Museum", 120), activity("11:50", "Cafe", 70)],
            )],
            0,
        );
        assert!(validate_itinerary(&plan, 0).is_valid);
    }

    #[test]
    fn budget_overage_beyond_twenty_percent_is_flagged() {
        let plan = itinerary(
            vec![day(1, "2025-01-15", vec![activity("10:00", "Museum", 60)])],
            121_000,
        );
        let result = validate_itinerary(&plan, 100_000);
        assert!(!result.is_valid);
        assert!(result.errors[0].contains("exceeds budget"));
    }

    #[test]
    fn budget_overage_within_twenty_percent_passes() {
        let plan = itinerary(
            vec![day(1, "2025-01-15", vec![activity("10:00", "Museum", 60)])],
            120_000,
        );
        assert!(validate_itinerary(&plan, 100_000).is_valid);
    }

    #[test]
    fn zero_budget_means_unconstrained() {
        let plan = itinerary(
            vec![day(1, "2025-01-15", vec![activity("10:00", "Museum", 60)])],
            9_999_999,
        );
        assert!(validate_itinerary(&plan, 0).is_valid);
    }

    #[test]
    fn placeholder_and_missing_dates_are_flagged() {
        let plan = itinerary(
            vec![
                day(1, "YYYY-MM-DD", vec![activity("10:00", "Museum", 60)]),
                day(2, "soonish", vec![activity("10:00", "Park", 60)]),
            ],
            0,
        );
        let result = validate_itinerary(&plan, 0);
        assert_eq!(result.errors.len(), 2);
        assert!(result.errors[0].contains("placeholder"));
        assert!(result.errors[1].contains("missing a real date"));
    }

    #[test]
    fn empty_day_and_empty_itinerary_are_flagged() {
        let result = validate_itinerary(&itinerary(vec![], 0), 0);
        assert!(!result.is_valid);

        let plan = itinerary(vec![day(1, "2025-01-15", vec![])], 0);
        let result = validate_itinerary(&plan, 0);
        assert!(result.errors.iter().any(|e| e.contains("no activities")));
    }
}
