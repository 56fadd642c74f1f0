//! Structural sanity check for modified itineraries.
//!
//! Not a re-run of full budget/time validation: it only verifies the
//! replacement carries the same required top-level fields as the original,
//! reverting to the original otherwise.

use async_trait::async_trait;
use graph_flow::{Context, NextAction, Task, TaskResult};

use tripflow_core::Itinerary;

use super::{ReviewStage, ReviewState, STATE_KEY};

/// Required top-level fields a modified plan must carry. With
/// serde-defaulted parsing, "missing" shows up as empty or zero.
pub(crate) fn missing_required_fields(itinerary: &Itinerary) -> Vec<&'static str> {
    let mut missing = Vec::new();
    if itinerary.title.is_empty() {
        missing.push("title");
    }
    if itinerary.total_days == 0 {
        missing.push("total_days");
    }
    if itinerary.days.is_empty() {
        missing.push("days");
    }
    if itinerary.total_cost == 0 {
        missing.push("total_cost");
    }
    missing
}

/// Reverts structurally broken modifications to the original itinerary.
pub struct ValidateModificationTask;

#[async_trait]
impl Task for ValidateModificationTask {
    fn id(&self) -> &str {
        "validate_modification"
    }

    async fn run(&self, context: Context) -> graph_flow::Result<TaskResult> {
        let mut state: ReviewState = context.get(STATE_KEY).await.unwrap_or_default();
        state.stage = ReviewStage::Validating;

        let mut output = "Modification passed the structural check".to_string();

        if let Some(modified) = &state.modified {
            let missing = missing_required_fields(modified);
            if !missing.is_empty() {
                tracing::warn!(
                    "Modified plan missing required field(s) {:?}; reverting to original",
                    missing
                );
                state.modified = Some(state.original.clone());
                output = format!(
                    "Modification reverted: missing required field(s) {}",
                    missing.join(", ")
                );
            }
        }

        context.set(STATE_KEY, state).await;

        Ok(TaskResult::new(Some(output), NextAction::ContinueAndExecute))
    }
}
