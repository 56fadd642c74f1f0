//! Venue-fetch task for the planning pipeline.
//!
//! Gathers candidate attractions, dining, and lodging for the generator.
//! Strictly best-effort: a plan can still be generated without external
//! venue data, so every provider failure degrades to an empty list.

use std::collections::HashSet;
use std::sync::Arc;
use std::time::Instant;

use async_trait::async_trait;
use graph_flow::{Context, NextAction, Task, TaskResult};

use tripflow_core::{dates, VenueCandidate};
use tripflow_venues::{NearbyPlaceSearch, VenueCatalog};

use super::{PlanningStage, PlanningState, NODE_COUNT, STATE_KEY};
use crate::config::PlannerConfig;
use crate::definitions::DEFAULT_ANCHOR;
use crate::models::CompletionExecutor;

/// Fetches venue candidates for each day of the trip.
pub struct FetchVenuesTask {
    executor: Arc<dyn CompletionExecutor>,
    catalog: Arc<dyn VenueCatalog>,
    places: Arc<dyn NearbyPlaceSearch>,
    config: PlannerConfig,
}

impl FetchVenuesTask {
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

    /// One attraction query per day, cycling through the interest terms so
    /// the independent queries differ.
    fn attraction_query(interests: &[String], day_index: u32) -> String {
        if interests.is_empty() {
            "top attractions".to_string()
        } else {
            let interest = &interests[day_index as usize % interests.len()];
            format!("{} attractions", interest)
        }
    }

    async fn fetch_attractions(&self, state: &PlanningState, days: u32) -> Vec<VenueCandidate> {
        let queries: Vec<String> = (0..days)
            .map(|i| Self::attraction_query(&state.interests, i))
            .collect();

        let results = futures::future::join_all(
            queries.iter().map(|query| self.catalog.search(query, 1)),
        )
        .await;

        let mut seen = HashSet::new();
        let mut attractions = Vec::new();
        for (query, result) in queries.iter().zip(results) {
            match result {
                Ok(candidates) => {
                    for candidate in candidates {
                        if seen.insert(candidate.name.clone()) {
                            attractions.push(candidate);
                        }
                    }
                }
                Err(e) => {
                    tracing::warn!("Attraction search {:?} failed: {}", query, e);
                }
            }
        }
        attractions
    }

    async fn fetch_dining(&self, attractions: &[VenueCandidate]) -> Vec<VenueCandidate> {
        let searches = attractions.iter().map(|attraction| {
            let near = attraction.location.unwrap_or(DEFAULT_ANCHOR);
            let query = format!("restaurants near {}", attraction.name);
            async move {
                self.places
                    .search(&query, near, self.config.dining_per_attraction)
                    .await
            }
        });

        let mut dining = Vec::new();
        for result in futures::future::join_all(searches).await {
            match result {
                Ok(mut candidates) => dining.append(&mut candidates),
                Err(e) => tracing::warn!("Dining search failed: {}", e),
            }
        }
        dining
    }

    async fn fetch_lodging(&self, attractions: &[VenueCandidate]) -> Vec<VenueCandidate> {
        let anchor = attractions
            .first()
            .and_then(|attraction| attraction.location)
            .unwrap_or(DEFAULT_ANCHOR);

        match self
            .places
            .search("hotels", anchor, self.config.lodging_candidates)
            .await
        {
            Ok(candidates) => candidates,
            Err(e) => {
                tracing::warn!("Lodging search failed: {}", e);
                Vec::new()
            }
        }
    }
}

#[async_trait]
impl Task for FetchVenuesTask {
    fn id(&self) -> &str {
        "fetch_venues"
    }

    async fn run(&self, context: Context) -> graph_flow::Result<TaskResult> {
        let start_time = Instant::now();
        self.executor.emit_node_started("fetch_venues", 1, NODE_COUNT);

        let mut state: PlanningState = context.get(STATE_KEY).await.unwrap_or_default();
        state.stage = PlanningStage::FetchingVenues;

        let days = dates::trip_length_days(&state.start_date, &state.end_date);

        let attractions = self.fetch_attractions(&state, days).await;

        // Dining and lodging both anchor on the fetched attractions but are
        // independent of each other.
        let (dining, lodging) = futures::join!(
            self.fetch_dining(&attractions),
            self.fetch_lodging(&attractions)
        );

        tracing::info!(
            "Fetched {} attraction(s), {} dining, {} lodging candidate(s) for {} day(s)",
            attractions.len(),
            dining.len(),
            lodging.len(),
            days
        );

        state.attractions = attractions;
        state.dining = dining;
        state.lodging = lodging;
        context.set(STATE_KEY, state.clone()).await;

        let output = format!(
            "Fetched {} attraction, {} dining, {} lodging candidates",
            state.attractions.len(),
            state.dining.len(),
            state.lodging.len()
        );
        self.executor.emit_node_completed(
            "fetch_venues",
            Some(&output),
            start_time.elapsed().as_millis() as u64,
        );

        Ok(TaskResult::new(Some(output), NextAction::ContinueAndExecute))
    }
}
