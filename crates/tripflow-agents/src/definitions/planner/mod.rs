//! Planning pipeline: natural-language trip request → validated itinerary.
//!
//! Graph structure:
//! ```text
//! initialize -> collect_info -> fetch_venues -> generate_plan -> validate -> finalize
//!                    |                               ^              |
//!                    |                               +--[retry]-----+
//!                    +--[intent parse failure]---------------------> finalize
//! ```
//!
//! The retry edge is bounded by `PlannerConfig::max_attempts`; the routing
//! decision itself lives in [`route_after_validation`] so the bound is
//! testable without running any node.

mod collect_info;
mod fetch_venues;
mod generate_plan;
mod state;
mod validate;

pub use collect_info::CollectInfoTask;
pub use fetch_venues::FetchVenuesTask;
pub use generate_plan::GeneratePlanTask;
pub use state::{PlanningStage, PlanningState};
pub use validate::ValidateTask;

use std::sync::Arc;

use async_trait::async_trait;
use graph_flow::{Context, GraphBuilder, NextAction, Task, TaskResult};

use tripflow_core::TripRequest;
use tripflow_venues::{NearbyPlaceSearch, VenueCatalog};

use crate::config::PlannerConfig;
use crate::models::CompletionExecutor;

/// State key for storing `PlanningState` in the session context.
pub const STATE_KEY: &str = "planning_state";

/// Context key the caller seeds with the `TripRequest`.
pub const REQUEST_KEY: &str = "trip_request";

/// Nodes reported to the streaming observer (initialize and finalize are
/// bookkeeping and stay silent, as does every reviewer node).
pub(crate) const NODE_COUNT: usize = 4;

/// Initialize task - seeds the planning state from the request.
pub struct InitializeTask;

#[async_trait]
impl Task for InitializeTask {
    fn id(&self) -> &str {
        "initialize"
    }

    async fn run(&self, context: Context) -> graph_flow::Result<TaskResult> {
        let request: TripRequest = context.get(REQUEST_KEY).await.unwrap_or_default();

        let state = PlanningState {
            start_date: request.start_date.clone().unwrap_or_default(),
            end_date: request.end_date.clone().unwrap_or_default(),
            budget: request.budget.unwrap_or(0),
            interests: request.interests.clone(),
            request,
            ..Default::default()
        };

        context.set(STATE_KEY, state).await;

        Ok(TaskResult::new(
            Some("Planning session initialized".to_string()),
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
        let mut state: PlanningState = context.get(STATE_KEY).await.unwrap_or_default();

        let output = match &state.draft {
            Some(itinerary) => {
                state.stage = PlanningStage::Done;
                format!(
                    "Itinerary ready: {} ({} days, total cost {})",
                    itinerary.title, itinerary.total_days, itinerary.total_cost
                )
            }
            None => {
                state.stage = PlanningStage::Failed;
                format!(
                    "Planning failed after {} attempt(s): {}",
                    state.attempts,
                    state.errors.join("; ")
                )
            }
        };

        tracing::info!("{}", output);
        context.set(STATE_KEY, state).await;

        Ok(TaskResult::new(Some(output), NextAction::End))
    }
}

/// Where the pipeline goes after the validate node.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlannerRoute {
    /// Regenerate the draft.
    Retry,
    /// Proceed to finalize, with or without a draft.
    Finish,
}

/// Routing decision after validation: retry while errors remain and the
/// attempt budget is not exhausted, otherwise finish.
pub fn route_after_validation(has_errors: bool, attempts: u32, max_attempts: u32) -> PlannerRoute {
    if has_errors && attempts < max_attempts {
        PlannerRoute::Retry
    } else {
        PlannerRoute::Finish
    }
}

/// Create the planning pipeline graph.
pub fn create_planner_graph(
    executor: Arc<dyn CompletionExecutor>,
    catalog: Arc<dyn VenueCatalog>,
    places: Arc<dyn NearbyPlaceSearch>,
    config: PlannerConfig,
) -> Arc<graph_flow::Graph> {
    let initialize = Arc::new(InitializeTask);
    let collect_info = Arc::new(CollectInfoTask::new(executor.clone()));
    let fetch_venues = Arc::new(FetchVenuesTask::new(
        executor.clone(),
        catalog,
        places,
        config.clone(),
    ));
    let generate_plan = Arc::new(GeneratePlanTask::new(executor.clone()));
    let validate = Arc::new(ValidateTask::new(executor, config));
    let finalize = Arc::new(FinalizeTask);

    let graph = GraphBuilder::new("trip_planner")
        .add_task(initialize.clone())
        .add_task(collect_info.clone())
        .add_task(fetch_venues.clone())
        .add_task(generate_plan.clone())
        .add_task(validate.clone())
        .add_task(finalize.clone())
        .add_edge(initialize.id(), collect_info.id())
        .add_edge(collect_info.id(), fetch_venues.id())
        .add_edge(fetch_venues.id(), generate_plan.id())
        .add_edge(generate_plan.id(), validate.id())
        .add_edge(validate.id(), finalize.id())
        .build();

    Arc::new(graph)
}
