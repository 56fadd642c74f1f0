//! Domain model for the tripflow planning and review pipelines.
//!
//! This crate is the foundation layer: plain data types shared by the agent
//! pipelines and the search clients, date helpers for the `YYYY-MM-DD` wire
//! format, and the critical-only itinerary validation rules.
//!
//! Nothing here performs I/O; the types are serde-friendly because itinerary
//! structures are parsed from model output and stored in pipeline sessions.

pub mod dates;
pub mod models;
pub mod validation;

pub use models::{
    Activity, DayPlan, Itinerary, Location, Lodging, TripRequest, ValidationResult,
    VenueCandidate, VenueKind,
};
pub use validation::{validate_itinerary, BUDGET_OVERAGE_RATIO, OVERLAP_TOLERANCE_MINUTES};
