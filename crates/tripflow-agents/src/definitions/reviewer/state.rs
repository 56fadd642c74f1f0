//! State types for the review pipeline.

use serde::{Deserialize, Serialize};

use tripflow_core::{Itinerary, VenueCandidate};

/// Rounds of modification the caller should allow before forcing a full
/// replan. Carried in state for the caller; the pipeline itself never
/// loops.
pub const MAX_REVIEW_ITERATIONS: u32 = 3;

/// How a piece of feedback was classified.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FeedbackCategory {
    /// The user is satisfied; the itinerary stands as-is.
    Approve,
    /// The user wants to start over; the caller must replan.
    Reject,
    /// The user wants a bounded change to the existing itinerary.
    Modify,
}

/// Category of change a modify-feedback message requests.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ModificationKind {
    /// Aliases cover the synonyms the classifier historically emits.
    #[serde(alias = "restaurant", alias = "food", alias = "meal")]
    Dining,
    #[serde(alias = "activity")]
    Attraction,
    #[serde(alias = "accommodation", alias = "hotel")]
    Lodging,
    Budget,
    #[serde(alias = "time")]
    Timing,
    General,
}

impl ModificationKind {
    /// Whether this kind needs fresh venue data before modification.
    pub fn needs_venue_context(&self) -> bool {
        matches!(
            self,
            ModificationKind::Dining | ModificationKind::Attraction | ModificationKind::Lodging
        )
    }
}

/// State threaded through the review pipeline.
///
/// Created per review invocation and discarded when it terminates. The
/// original itinerary is read-only reference material; only `modified`
/// ever holds a new plan.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReviewState {
    /// The itinerary under review, kept verbatim.
    pub original: Itinerary,
    /// Raw feedback text from the user.
    pub feedback: String,
    /// Classification result; `None` until classified.
    pub category: Option<FeedbackCategory>,
    /// Which section the feedback targets, e.g. "day_2", "budget".
    pub target_section: Option<String>,
    /// What category of change is requested.
    pub kind: Option<ModificationKind>,
    /// The classifier's short rationale, kept for observability.
    pub reasoning: String,
    /// Freshly fetched venue candidates; empty unless the modification
    /// kind required an external lookup.
    pub candidates: Vec<VenueCandidate>,
    /// The replacement itinerary; `None` until modification runs.
    pub modified: Option<Itinerary>,
    /// Which feedback round this is, supplied by the caller.
    pub iteration: u32,
    /// The round limit the caller is expected to enforce.
    pub max_iterations: u32,
    /// Current pipeline stage.
    pub stage: ReviewStage,
}

impl Default for ReviewState {
    fn default() -> Self {
        Self {
            original: Itinerary::default(),
            feedback: String::new(),
            category: None,
            target_section: None,
            kind: None,
            reasoning: String::new(),
            candidates: Vec::new(),
            modified: None,
            iteration: 0,
            max_iterations: MAX_REVIEW_ITERATIONS,
            stage: ReviewStage::default(),
        }
    }
}

/// Review pipeline execution stage.
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
pub enum ReviewStage {
    #[default]
    Initialized,
    Classifying,
    FetchingContext,
    Modifying,
    Validating,
    Done,
}
