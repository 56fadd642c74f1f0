//! Context-fetch task for the review pipeline.
//!
//! Pulls fresh venue candidates when the requested modification needs
//! them. Budget, timing, and general changes re-reason over the existing
//! plan, so for those this node is a no-op.

use std::sync::Arc;
use std::time::Instant;

use async_trait::async_trait;
use graph_flow::{Context, NextAction, Task, TaskResult};

use tripflow_core::{Itinerary, Location};
use tripflow_venues::{NearbyPlaceSearch, VenueCatalog};

use super::{ModificationKind, ReviewStage, ReviewState, STATE_KEY};
use crate::config::PlannerConfig;
use crate::definitions::DEFAULT_ANCHOR;

/// Fetches kind-specific venue candidates for the modification step.
pub struct FetchContextTask {
    catalog: Arc<dyn VenueCatalog>,
    places: Arc<dyn NearbyPlaceSearch>,
    config: PlannerConfig,
}

impl FetchContextTask {
    pub fn new(
        catalog: Arc<dyn VenueCatalog>,
        places: Arc<dyn NearbyPlaceSearch>,
        config: PlannerConfig,
    ) -> Self {
        Self {
            catalog,
            places,
            config,
        }
    }

    /// Anchor for nearby searches: the first activity of day one, resolved
    /// through the catalog; the fixed default location otherwise.
    async fn resolve_anchor(&self, itinerary: &Itinerary) -> Location {
        let Some(first_activity) = itinerary
            .days
            .first()
            .and_then(|day| day.activities.first())
        else {
            return DEFAULT_ANCHOR;
        };

        match self.catalog.search(&first_activity.venue_name, 1).await {
            Ok(hits) => hits
                .into_iter()
                .find_map(|hit| hit.location)
                .unwrap_or(DEFAULT_ANCHOR),
            Err(e) => {
                tracing::warn!(
                    "Anchor lookup for {:?} failed: {}",
                    first_activity.venue_name,
                    e
                );
                DEFAULT_ANCHOR
            }
        }
    }
}

#[async_trait]
impl Task for FetchContextTask {
    fn id(&self) -> &str {
        "fetch_context"
    }

    async fn run(&self, context: Context) -> graph_flow::Result<TaskResult> {
        let start_time = Instant::now();

        let mut state: ReviewState = context.get(STATE_KEY).await.unwrap_or_default();
        state.stage = ReviewStage::FetchingContext;

        let needs_context = state
            .kind
            .map(|kind| kind.needs_venue_context())
            .unwrap_or(false);

        if !needs_context {
            tracing::debug!("Modification kind {:?} needs no venue context", state.kind);
            context.set(STATE_KEY, state).await;
            return Ok(TaskResult::new(
                Some("No venue context needed".to_string()),
                NextAction::ContinueAndExecute,
            ));
        }

        let limit = self.config.context_candidates;
        let result = match state.kind {
            Some(ModificationKind::Attraction) => {
                self.catalog.search(&state.feedback, limit).await
            }
            Some(ModificationKind::Dining) | Some(ModificationKind::Lodging) => {
                let anchor = self.resolve_anchor(&state.original).await;
                self.places.search(&state.feedback, anchor, limit).await
            }
            _ => unreachable!("needs_venue_context filtered the other kinds"),
        };

        match result {
            Ok(candidates) => {
                tracing::info!(
                    "Fetched {} candidate(s) for {:?} modification",
                    candidates.len(),
                    state.kind
                );
                state.candidates = candidates;
            }
            Err(e) => {
                // Degrade to an empty set; modification proceeds on the
                // existing plan alone.
                tracing::warn!("Context fetch failed: {}", e);
            }
        }

        context.set(STATE_KEY, state.clone()).await;

        let output = format!(
            "Fetched {} context candidate(s) in {} ms",
            state.candidates.len(),
            start_time.elapsed().as_millis()
        );
        Ok(TaskResult::new(Some(output), NextAction::ContinueAndExecute))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::definitions::planner::tests_support::{
        candidate, sample_itinerary, MockCatalog, MockPlaces,
    };
    use crate::definitions::reviewer::FeedbackCategory;

    fn modify_state(kind: Option<ModificationKind>, feedback: &str) -> ReviewState {
        ReviewState {
            original: sample_itinerary(),
            feedback: feedback.to_string(),
            category: Some(FeedbackCategory::Modify),
            kind,
            ..Default::default()
        }
    }

    async fn run_task(task: &FetchContextTask, state: ReviewState) -> ReviewState {
        let context = Context::new();
        context.set(STATE_KEY, state).await;
        task.run(context.clone()).await.unwrap();
        context.get(STATE_KEY).await.unwrap()
    }

    #[tokio::test]
    async fn budget_kind_is_a_no_op() {
        let catalog = Arc::new(MockCatalog::with(vec![candidate("Somewhere")]));
        let places = Arc::new(MockPlaces::with(vec![candidate("Elsewhere")]));
        let task = FetchContextTask::new(catalog.clone(), places.clone(), PlannerConfig::default());

        let state = run_task(
            &task,
            modify_state(Some(ModificationKind::Budget), "cut the budget"),
        )
        .await;

        assert!(state.candidates.is_empty());
        assert!(catalog.queries.lock().unwrap().is_empty());
        assert!(places.queries.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn missing_kind_is_a_no_op() {
        let catalog = Arc::new(MockCatalog::default());
        let task = FetchContextTask::new(
            catalog.clone(),
            Arc::new(MockPlaces::default()),
            PlannerConfig::default(),
        );

        let state = run_task(&task, modify_state(None, "do something")).await;

        assert!(state.candidates.is_empty());
        assert!(catalog.queries.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn attraction_kind_queries_the_catalog_with_the_feedback() {
        let catalog = Arc::new(MockCatalog::with(vec![candidate("New Museum")]));
        let task = FetchContextTask::new(
            catalog.clone(),
            Arc::new(MockPlaces::default()),
            PlannerConfig::default(),
        );

        let state = run_task(
            &task,
            modify_state(Some(ModificationKind::Attraction), "something more fun"),
        )
        .await;

        assert_eq!(state.candidates.len(), 1);
        let queries = catalog.queries.lock().unwrap();
        assert_eq!(queries[0], "something more fun");
    }

    #[tokio::test]
    async fn dining_kind_anchors_on_the_first_activity() {
        // The catalog resolves the anchor venue; places get the search.
        let catalog = Arc::new(MockCatalog::with(vec![candidate("Old Palace")]));
        let places = Arc::new(MockPlaces::with(vec![candidate("Korean Kitchen")]));
        let task = FetchContextTask::new(catalog.clone(), places.clone(), PlannerConfig::default());

        let state = run_task(
            &task,
            modify_state(Some(ModificationKind::Dining), "둘째날 점심을 한식으로 바꿔줘"),
        )
        .await;

        assert_eq!(state.candidates.len(), 1);
        // Anchor lookup used the first activity's venue name.
        assert_eq!(catalog.queries.lock().unwrap()[0], "Old Palace");
        let place_queries = places.queries.lock().unwrap();
        let (_, near) = &place_queries[0];
        assert!((near.latitude - 37.58).abs() < 1e-9);
    }

    #[tokio::test]
    async fn empty_itinerary_falls_back_to_the_default_anchor() {
        let places = Arc::new(MockPlaces::with(vec![candidate("City Hotel")]));
        let task = FetchContextTask::new(
            Arc::new(MockCatalog::default()),
            places.clone(),
            PlannerConfig::default(),
        );

        let mut state = modify_state(Some(ModificationKind::Lodging), "nicer hotel");
        state.original = Itinerary::default();

        run_task(&task, state).await;

        let queries = places.queries.lock().unwrap();
        let (_, near) = &queries[0];
        assert!((near.latitude - DEFAULT_ANCHOR.latitude).abs() < 1e-9);
    }

    #[tokio::test]
    async fn provider_failure_degrades_to_no_candidates() {
        let task = FetchContextTask::new(
            Arc::new(MockCatalog::failing()),
            Arc::new(MockPlaces::failing()),
            PlannerConfig::default(),
        );

        let state = run_task(
            &task,
            modify_state(Some(ModificationKind::Dining), "better lunch"),
        )
        .await;

        assert!(state.candidates.is_empty());
    }
}
