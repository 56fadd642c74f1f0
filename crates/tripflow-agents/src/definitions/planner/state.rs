//! State types for the planning pipeline.

use serde::{Deserialize, Serialize};

use tripflow_core::{Itinerary, TripRequest, VenueCandidate};

/// State threaded through the planning pipeline.
///
/// Created when a session starts and discarded when it terminates. The
/// `errors` list is append-only across nodes; the single exception is the
/// validate node clearing it when a draft passes.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct PlanningState {
    /// The originating request, kept verbatim.
    pub request: TripRequest,
    /// Resolved trip start date, `YYYY-MM-DD`; empty until resolved.
    pub start_date: String,
    /// Resolved trip end date, `YYYY-MM-DD`; empty until resolved.
    pub end_date: String,
    /// Resolved budget; 0 means unconstrained.
    pub budget: u64,
    /// Resolved interest tags.
    pub interests: Vec<String>,
    /// Attraction candidates from the catalog, one query per trip day.
    pub attractions: Vec<VenueCandidate>,
    /// Dining candidates fetched near each attraction.
    pub dining: Vec<VenueCandidate>,
    /// Lodging candidates fetched near the first attraction.
    pub lodging: Vec<VenueCandidate>,
    /// Current itinerary draft; `None` until generated, and reset to
    /// `None` when validation discards it.
    pub draft: Option<Itinerary>,
    /// Generation attempts consumed, counting failed parses.
    pub attempts: u32,
    /// Error messages accumulated across the run.
    pub errors: Vec<String>,
    /// Current pipeline stage.
    pub stage: PlanningStage,
}

/// Planning pipeline execution stage.
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
pub enum PlanningStage {
    #[default]
    Initialized,
    CollectingInfo,
    FetchingVenues,
    Generating,
    Validating,
    Done,
    Failed,
}
