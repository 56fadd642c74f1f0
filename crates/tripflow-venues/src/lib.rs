//! Venue search providers for tripflow.
//!
//! Two narrow interfaces feed the agent pipelines with place candidates:
//! - [`VenueCatalog`]: semantic/fuzzy lookup against the venue-catalog
//!   service (attractions and general venues).
//! - [`NearbyPlaceSearch`]: keyword lookup against a local-search API
//!   (dining and lodging near a location).
//!
//! Both are best-effort. Callers in the pipelines treat provider failures
//! as empty candidate sets; the clients here surface errors so the caller
//! can make that call.

pub mod catalog;
pub mod places;

pub use catalog::{CatalogClient, VenueCatalog};
pub use places::{NearbyPlaceSearch, PlaceSearchClient};
