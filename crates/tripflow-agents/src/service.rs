//! Public service surface for the trip pipelines.
//!
//! `TripPlannerService` is a plain constructed instance holding its
//! collaborators explicitly; there is no process-wide state. Each call
//! builds a fresh graph and in-memory session, so invocations are
//! stateless with respect to each other.

use std::sync::Arc;

use tokio::sync::mpsc;

use tripflow_core::{Itinerary, TripRequest};
use tripflow_venues::{NearbyPlaceSearch, VenueCatalog};

use crate::config::PlannerConfig;
use crate::definitions::{planner, reviewer};
use crate::error::{PlanningFailure, ReviewFailure};
use crate::events::ProgressEvent;
use crate::models::CompletionExecutor;
use crate::runner::PipelineRunner;

/// Outcome of one review invocation.
#[derive(Debug, Clone, PartialEq)]
pub enum ReviewOutcome {
    /// The user accepted the plan; it is returned unchanged.
    Approved(Itinerary),
    /// The user wants to start over; the caller must plan again.
    Rejected,
    /// The plan was modified per the feedback.
    Modified(Itinerary),
}

/// Entry point for planning and reviewing trip itineraries.
pub struct TripPlannerService {
    executor: Arc<dyn CompletionExecutor>,
    catalog: Arc<dyn VenueCatalog>,
    places: Arc<dyn NearbyPlaceSearch>,
    config: PlannerConfig,
}

impl TripPlannerService {
    pub fn new(
        executor: Arc<dyn CompletionExecutor>,
        catalog: Arc<dyn VenueCatalog>,
        places: Arc<dyn NearbyPlaceSearch>,
        config: PlannerConfig,
    ) -> Self {
        Self {
            executor,
            catalog,
            places,
            config,
        }
    }

    /// Turn a trip request into a validated itinerary, or fail with the
    /// accumulated error list after the bounded retries.
    pub async fn plan(&self, request: TripRequest) -> Result<Itinerary, PlanningFailure> {
        run_planner(
            self.executor.clone(),
            self.catalog.clone(),
            self.places.clone(),
            self.config.clone(),
            request,
        )
        .await
    }

    /// The planning pipeline with progress observation: one event per
    /// completed node, then exactly one terminal `Complete` or `Error`.
    pub fn plan_stream(&self, request: TripRequest) -> mpsc::UnboundedReceiver<ProgressEvent> {
        let (events, receiver) = mpsc::unbounded_channel();

        let executor: Arc<dyn CompletionExecutor> = Arc::new(StreamingExecutor {
            inner: self.executor.clone(),
            events: events.clone(),
        });
        let catalog = self.catalog.clone();
        let places = self.places.clone();
        let config = self.config.clone();

        tokio::spawn(async move {
            let outcome = run_planner(executor, catalog, places, config, request).await;
            let terminal = match outcome {
                Ok(itinerary) => ProgressEvent::Complete { itinerary },
                Err(failure) => ProgressEvent::Error {
                    message: failure.to_string(),
                },
            };
            if events.send(terminal).is_err() {
                tracing::debug!("Progress stream receiver dropped before completion");
            }
        });

        receiver
    }

    /// Run one round of review against `itinerary`. The caller supplies
    /// and increments `iteration`; after `MAX_REVIEW_ITERATIONS` rounds it
    /// should force a full replan instead of calling again.
    pub async fn review(
        &self,
        itinerary: Itinerary,
        feedback: &str,
        iteration: u32,
    ) -> Result<ReviewOutcome, ReviewFailure> {
        let graph = reviewer::create_reviewer_graph(
            self.executor.clone(),
            self.catalog.clone(),
            self.places.clone(),
            self.config.clone(),
        );
        let runner = PipelineRunner::new_in_memory(graph);

        let state = async {
            let session_id = runner.start_session("initialize").await?;
            let session = runner.session(&session_id).await?;
            session
                .context
                .set(reviewer::ORIGINAL_KEY, itinerary.clone())
                .await;
            session
                .context
                .set(reviewer::FEEDBACK_KEY, feedback.to_string())
                .await;
            session.context.set(reviewer::ITERATION_KEY, iteration).await;
            runner.save_session(session).await?;

            runner.run_to_completion(&session_id).await?;

            let session = runner.session(&session_id).await?;
            let state: reviewer::ReviewState = session
                .context
                .get(reviewer::STATE_KEY)
                .await
                .unwrap_or_default();
            Ok::<_, anyhow::Error>(state)
        }
        .await
        .map_err(|e| ReviewFailure {
            message: e.to_string(),
        })?;

        let outcome = match state.category {
            Some(reviewer::FeedbackCategory::Approve) => ReviewOutcome::Approved(itinerary),
            Some(reviewer::FeedbackCategory::Modify) => {
                ReviewOutcome::Modified(state.modified.unwrap_or(itinerary))
            }
            Some(reviewer::FeedbackCategory::Reject) | None => ReviewOutcome::Rejected,
        };
        Ok(outcome)
    }
}

/// One planning pipeline run over fresh in-memory storage.
async fn run_planner(
    executor: Arc<dyn CompletionExecutor>,
    catalog: Arc<dyn VenueCatalog>,
    places: Arc<dyn NearbyPlaceSearch>,
    config: PlannerConfig,
    request: TripRequest,
) -> Result<Itinerary, PlanningFailure> {
    let graph = planner::create_planner_graph(executor, catalog, places, config);
    let runner = PipelineRunner::new_in_memory(graph);

    let state = async {
        let session_id = runner.start_session("initialize").await?;
        let session = runner.session(&session_id).await?;
        session.context.set(planner::REQUEST_KEY, request).await;
        runner.save_session(session).await?;

        runner.run_to_completion(&session_id).await?;

        let session = runner.session(&session_id).await?;
        let state: planner::PlanningState = session
            .context
            .get(planner::STATE_KEY)
            .await
            .unwrap_or_default();
        Ok::<_, anyhow::Error>(state)
    }
    .await;

    match state {
        Ok(state) => match state.draft {
            Some(itinerary) => Ok(itinerary),
            None => Err(PlanningFailure {
                errors: state.errors,
                attempts: state.attempts,
            }),
        },
        Err(e) => Err(PlanningFailure {
            errors: vec![format!("Pipeline execution failed: {}", e)],
            attempts: 0,
        }),
    }
}

/// Wraps the configured executor and forwards node events onto the
/// progress channel. Completion calls pass straight through.
struct StreamingExecutor {
    inner: Arc<dyn CompletionExecutor>,
    events: mpsc::UnboundedSender<ProgressEvent>,
}

#[async_trait::async_trait]
impl CompletionExecutor for StreamingExecutor {
    async fn complete(
        &self,
        system_prompt: &str,
        user_prompt: &str,
        temperature: f64,
    ) -> anyhow::Result<String> {
        self.inner.complete(system_prompt, user_prompt, temperature).await
    }

    fn emit_node_started(&self, node: &str, node_index: usize, total_nodes: usize) {
        let _ = self.events.send(ProgressEvent::NodeStarted {
            node: node.to_string(),
            node_index,
            total_nodes,
        });
    }

    fn emit_node_completed(&self, node: &str, output: Option<&str>, duration_ms: u64) {
        let _ = self.events.send(ProgressEvent::NodeCompleted {
            node: node.to_string(),
            output: output.map(|s| s.to_string()),
            duration_ms,
        });
    }
}
