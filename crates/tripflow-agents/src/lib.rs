//! Graph-based planning and review pipelines for trip itineraries.
//!
//! Two pipelines built on graph-flow:
//! - **Planning**: natural-language trip request → candidate venues →
//!   generated itinerary → critical-only validation, with a bounded retry
//!   loop (3 generation attempts).
//! - **Review**: free-text feedback on an existing itinerary → classify
//!   (approve / reject / modify) → contextual venue fetch → complete-plan
//!   modification → structural sanity check with revert-to-original.
//!
//! # Architecture
//!
//! - Each pipeline node implements the graph-flow `Task` trait
//! - Node state lives in the session `Context` under one state key
//! - The `PipelineRunner` handles session-based execution
//! - External capabilities (`CompletionExecutor`, `VenueCatalog`,
//!   `NearbyPlaceSearch`) are injected into the graph at construction
//!
//! # Example
//!
//! ```rust,ignore
//! use std::sync::Arc;
//! use tripflow_agents::{PlannerConfig, RigCompletionExecutor, TripPlannerService};
//! use tripflow_venues::{CatalogClient, PlaceSearchClient};
//!
//! let service = TripPlannerService::new(
//!     Arc::new(RigCompletionExecutor::new(&api_key, "gpt-4o")),
//!     Arc::new(CatalogClient::new(catalog_url)),
//!     Arc::new(PlaceSearchClient::new(places_url, client_id, client_secret)),
//!     PlannerConfig::default(),
//! );
//!
//! let itinerary = service.plan(request).await?;
//! let outcome = service.review(itinerary, "둘째날 점심을 한식으로 바꿔줘", 1).await?;
//! ```

pub mod config;
pub mod definitions;
pub mod error;
pub mod events;
pub mod executor;
pub mod json;
pub mod models;
pub mod runner;
pub mod service;

// Re-export core types
pub use config::PlannerConfig;
pub use error::{PlanningFailure, ReviewFailure};
pub use events::ProgressEvent;
pub use executor::RigCompletionExecutor;
pub use models::CompletionExecutor;
pub use runner::{PipelineRunner, PipelineStatus, PipelineStepResult};
pub use service::{ReviewOutcome, TripPlannerService};

// Re-export pipeline definitions for convenience
pub use definitions::planner::{
    create_planner_graph, PlannerRoute, PlanningStage, PlanningState,
};
pub use definitions::reviewer::{
    create_reviewer_graph, FeedbackCategory, ModificationKind, ReviewStage, ReviewState,
    MAX_REVIEW_ITERATIONS,
};
