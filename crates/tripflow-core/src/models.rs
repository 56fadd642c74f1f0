//! Core data types shared by the planning and review pipelines.

use serde::{Deserialize, Serialize};

/// A user's trip request as handed to the planning pipeline.
///
/// Fields other than the free-text description are optional: whatever the
/// caller already collected is kept as-is, and the rest is inferred from the
/// description by the intent-extraction node.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct TripRequest {
    /// Free-text description of the trip the user wants.
    pub description: String,
    /// Trip start date in `YYYY-MM-DD` format, if already known.
    pub start_date: Option<String>,
    /// Trip end date in `YYYY-MM-DD` format (inclusive), if already known.
    pub end_date: Option<String>,
    /// Total budget, currency-agnostic, if already known.
    pub budget: Option<u64>,
    /// Interest tags, e.g. "history", "street food".
    pub interests: Vec<String>,
}

/// Kind of venue an activity takes place at.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum VenueKind {
    #[default]
    Attraction,
    /// Aliases cover the synonyms models historically emit for meals.
    #[serde(alias = "restaurant", alias = "food", alias = "meal")]
    Dining,
    #[serde(alias = "accommodation", alias = "hotel")]
    Lodging,
    Cafe,
    Shopping,
}

impl std::fmt::Display for VenueKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            VenueKind::Attraction => "attraction",
            VenueKind::Dining => "dining",
            VenueKind::Lodging => "lodging",
            VenueKind::Cafe => "cafe",
            VenueKind::Shopping => "shopping",
        };
        write!(f, "{}", s)
    }
}

/// A single scheduled activity within a day.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct Activity {
    /// Start time in `HH:MM` format.
    pub time: String,
    pub venue_name: String,
    pub venue_kind: VenueKind,
    /// Duration in minutes, expected > 0.
    pub duration_minutes: u32,
    pub estimated_cost: u64,
    /// Free-text tip or note for the traveler.
    pub note: String,
}

/// One calendar day's worth of activities.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct DayPlan {
    /// Day number, 1-indexed and contiguous across the itinerary.
    pub day: u32,
    /// Calendar date in `YYYY-MM-DD` format.
    pub date: String,
    /// Short theme label for the day.
    pub theme: String,
    pub activities: Vec<Activity>,
    pub daily_cost: u64,
}

/// The single lodging selection covering the whole trip.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct Lodging {
    pub name: String,
    pub cost_per_night: u64,
    pub nights: u32,
}

/// The complete generated travel plan artifact.
///
/// All fields tolerate absence during deserialization: itineraries are
/// parsed from model output, and a structurally incomplete parse is handled
/// by validation rather than by a serde error.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct Itinerary {
    pub title: String,
    pub total_days: u32,
    pub total_cost: u64,
    pub days: Vec<DayPlan>,
    pub lodging: Option<Lodging>,
    pub summary: String,
}

/// Geographic coordinates in WGS84.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Location {
    pub latitude: f64,
    pub longitude: f64,
}

/// A place record retrieved from an external catalog or search provider,
/// used as raw material for itinerary generation and modification.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct VenueCandidate {
    pub name: String,
    pub category: String,
    pub description: String,
    pub address: String,
    pub location: Option<Location>,
}

/// Outcome of running the validation rules against an itinerary draft.
///
/// Recomputed on every check; never persisted.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct ValidationResult {
    pub is_valid: bool,
    /// Human-readable critical-error descriptions, empty when valid.
    pub errors: Vec<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn venue_kind_accepts_historical_synonyms() {
        let kind: VenueKind = serde_json::from_str("\"restaurant\"").unwrap();
        assert_eq!(kind, VenueKind::Dining);
        let kind: VenueKind = serde_json::from_str("\"hotel\"").unwrap();
        assert_eq!(kind, VenueKind::Lodging);
        let kind: VenueKind = serde_json::from_str("\"attraction\"").unwrap();
        assert_eq!(kind, VenueKind::Attraction);
    }

    #[test]
    fn venue_kind_serializes_snake_case() {
        assert_eq!(serde_json::to_string(&VenueKind::Dining).unwrap(), "\"dining\"");
        assert_eq!(serde_json::to_string(&VenueKind::Cafe).unwrap(), "\"cafe\"");
    }

    #[test]
    fn itinerary_tolerates_partial_model_output() {
        let json = r#"{"title": "Weekend in the old town", "days": []}"#;
        let itinerary: Itinerary = serde_json::from_str(json).unwrap();
        assert_eq!(itinerary.title, "Weekend in the old town");
        assert_eq!(itinerary.total_days, 0);
        assert!(itinerary.lodging.is_none());
    }

    #[test]
    fn itinerary_round_trips_losslessly() {
        let itinerary = Itinerary {
            title: "Three days of history".to_string(),
            total_days: 1,
            total_cost: 120_000,
            days: vec![DayPlan {
                day: 1,
                date: "2025-01-15".to_string(),
                theme: "Palaces".to_string(),
                activities: vec![Activity {
                    time: "10:00".to_string(),
                    venue_name: "Old Palace".to_string(),
                    venue_kind: VenueKind::Attraction,
                    duration_minutes: 120,
                    estimated_cost: 3000,
                    note: "Rent a costume".to_string(),
                }],
                daily_cost: 40_000,
            }],
            lodging: Some(Lodging {
                name: "City Hotel".to_string(),
                cost_per_night: 80_000,
                nights: 2,
            }),
            summary: "A compact history trip".to_string(),
        };

        let json = serde_json::to_string(&itinerary).unwrap();
        let back: Itinerary = serde_json::from_str(&json).unwrap();
        assert_eq!(back, itinerary);
    }
}
