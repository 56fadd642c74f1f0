//! Pipeline definitions.
//!
//! Two fixed graphs: the planning pipeline (request → itinerary) and the
//! review pipeline (itinerary + feedback → outcome). Each task keeps its
//! state in the session context under the pipeline's state key.

pub mod planner;
pub mod reviewer;

use tripflow_core::Location;

/// Fallback anchor for nearby searches when no venue location is known:
/// the city center the catalog is built around.
pub(crate) const DEFAULT_ANCHOR: Location = Location {
    latitude: 37.5665,
    longitude: 126.978,
};
