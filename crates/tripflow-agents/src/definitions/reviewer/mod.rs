//! Review pipeline: existing itinerary + free-text feedback → outcome.
//!
//! Graph structure:
//! ```text
//! initialize -> parse_feedback -> fetch_context -> modify_plan -> validate_modification -> finalize
//!                     |
//!                     +--[approve / reject]----------------------------------------------> finalize
//! ```
//!
//! Each feedback message is one pipeline run; the iteration bound is the
//! caller's to enforce. A failed modification always falls back to the
//! original itinerary, never to a blank plan.

mod fetch_context;
mod modify_plan;
mod parse_feedback;
mod state;
mod validate_modification;

pub use fetch_context::FetchContextTask;
pub use modify_plan::ModifyPlanTask;
pub use parse_feedback::ParseFeedbackTask;
pub use state::{
    FeedbackCategory, ModificationKind, ReviewStage, ReviewState, MAX_REVIEW_ITERATIONS,
};
pub use validate_modification::ValidateModificationTask;

use std::sync::Arc;

use async_trait::async_trait;
use graph_flow::{Context, GraphBuilder, NextAction, Task, TaskResult};

use tripflow_core::Itinerary;
use tripflow_venues::{NearbyPlaceSearch, VenueCatalog};

use crate::config::PlannerConfig;
use crate::models::CompletionExecutor;

/// State key for storing `ReviewState` in the session context.
pub const STATE_KEY: &str = "review_state";

/// Context keys the caller seeds before running.
pub const ORIGINAL_KEY: &str = "original_itinerary";
pub const FEEDBACK_KEY: &str = "feedback_text";
pub const ITERATION_KEY: &str = "iteration";

/// Initialize task - seeds the review state from the caller's inputs.
pub struct InitializeTask;

#[async_trait]
impl Task for InitializeTask {
    fn id(&self) -> &str {
        "initialize"
    }

    async fn run(&self, context: Context) -> graph_flow::Result<TaskResult> {
        let original: Itinerary = context.get(ORIGINAL_KEY).await.unwrap_or_default();
        let feedback: String = context.get(FEEDBACK_KEY).await.unwrap_or_default();
        let iteration: u32 = context.get(ITERATION_KEY).await.unwrap_or(0);

        let state = ReviewState {
            original,
            feedback,
            iteration,
            ..Default::default()
        };
        context.set(STATE_KEY, state).await;

        Ok(TaskResult::new(
            Some("Review session initialized".to_string()),
            NextAction::ContinueAndExecute,
        ))
    }
}

/// Finalize task - stamps the terminal stage and composes the run summary.
pub struct FinalizeTask;

#[async_trait]
impl Task for FinalizeTask {
    fn id(&self) -> &str {
        "finalize"
    }

    async fn run(&self, context: Context) -> graph_flow::Result<TaskResult> {
        let mut state: ReviewState = context.get(STATE_KEY).await.unwrap_or_default();
        state.stage = ReviewStage::Done;

        let output = match state.category {
            Some(FeedbackCategory::Approve) => "Feedback approved the itinerary".to_string(),
            Some(FeedbackCategory::Modify) => "Itinerary modified per feedback".to_string(),
            Some(FeedbackCategory::Reject) | None => {
                "Feedback rejected the itinerary; a replan is needed".to_string()
            }
        };

        tracing::info!("{}", output);
        context.set(STATE_KEY, state).await;

        Ok(TaskResult::new(Some(output), NextAction::End))
    }
}

/// Create the review pipeline graph.
pub fn create_reviewer_graph(
    executor: Arc<dyn CompletionExecutor>,
    catalog: Arc<dyn VenueCatalog>,
    places: Arc<dyn NearbyPlaceSearch>,
    config: PlannerConfig,
) -> Arc<graph_flow::Graph> {
    let initialize = Arc::new(InitializeTask);
    let parse_feedback = Arc::new(ParseFeedbackTask::new(executor.clone()));
    let fetch_context = Arc::new(FetchContextTask::new(catalog, places, config));
    let modify_plan = Arc::new(ModifyPlanTask::new(executor));
    let validate_modification = Arc::new(ValidateModificationTask);
    let finalize = Arc::new(FinalizeTask);

    let graph = GraphBuilder::new("trip_reviewer")
        .add_task(initialize.clone())
        .add_task(parse_feedback.clone())
        .add_task(fetch_context.clone())
        .add_task(modify_plan.clone())
        .add_task(validate_modification.clone())
        .add_task(finalize.clone())
        .add_edge(initialize.id(), parse_feedback.id())
        .add_edge(parse_feedback.id(), fetch_context.id())
        .add_edge(fetch_context.id(), modify_plan.id())
        .add_edge(modify_plan.id(), validate_modification.id())
        .add_edge(validate_modification.id(), finalize.id())
        .build();

    Arc::new(graph)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::definitions::planner::tests_support::{
        sample_itinerary, MockCatalog, MockExecutor, MockPlaces,
    };

    #[tokio::test]
    async fn initialize_seeds_state_from_inputs() {
        let task = InitializeTask;
        let context = Context::new();

        context.set(ORIGINAL_KEY, sample_itinerary()).await;
        context.set(FEEDBACK_KEY, "looks great".to_string()).await;
        context.set(ITERATION_KEY, 2u32).await;

        task.run(context.clone()).await.unwrap();

        let state: ReviewState = context.get(STATE_KEY).await.unwrap();
        assert_eq!(state.original, sample_itinerary());
        assert_eq!(state.feedback, "looks great");
        assert_eq!(state.iteration, 2);
        assert_eq!(state.max_iterations, MAX_REVIEW_ITERATIONS);
        assert!(state.category.is_none());
    }

    #[tokio::test]
    async fn graph_contains_every_node() {
        let graph = create_reviewer_graph(
            Arc::new(MockExecutor::ok("{}")),
            Arc::new(MockCatalog::default()),
            Arc::new(MockPlaces::default()),
            PlannerConfig::default(),
        );

        for id in [
            "initialize",
            "parse_feedback",
            "fetch_context",
            "modify_plan",
            "validate_modification",
            "finalize",
        ] {
            assert!(graph.get_task(id).is_some(), "missing task {}", id);
        }
    }
}
