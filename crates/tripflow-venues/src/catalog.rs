//! Venue catalog search client.
//!
//! Talks to the venue-catalog service's semantic search endpoint. The
//! catalog owns ingestion and embedding; this client only queries it.

use anyhow::Result;
use async_trait::async_trait;
use serde::Deserialize;

use tripflow_core::{Location, VenueCandidate};

/// Semantic lookup of venue candidates.
#[async_trait]
pub trait VenueCatalog: Send + Sync {
    /// Fuzzy-match `query` against the catalog. Best-effort: may return
    /// fewer than `limit` results.
    async fn search(&self, query: &str, limit: usize) -> Result<Vec<VenueCandidate>>;
}

/// HTTP client for the venue-catalog service.
pub struct CatalogClient {
    base_url: String,
    client: reqwest::Client,
}

impl CatalogClient {
    pub fn new(base_url: impl Into<String>) -> Self {
        let base_url = base_url.into();
        tracing::debug!("Venue catalog client targeting {}", base_url);
        Self {
            base_url,
            client: reqwest::Client::new(),
        }
    }
}

#[async_trait]
impl VenueCatalog for CatalogClient {
    async fn search(&self, query: &str, limit: usize) -> Result<Vec<VenueCandidate>> {
        let url = format!("{}/venues/search", self.base_url);
        let limit_str = limit.to_string();

        let response = self
            .client
            .get(&url)
            .query(&[("query", query), ("limit", limit_str.as_str())])
            .send()
            .await
            .map_err(|e| anyhow::anyhow!("Failed to send catalog request: {}", e))?;

        if !response.status().is_success() {
            let status = response.status();
            let error_text = response.text().await.unwrap_or_default();
            return Err(anyhow::anyhow!(
                "Catalog request failed with status {}: {}",
                status,
                error_text
            ));
        }

        let parsed: CatalogSearchResponse = response
            .json()
            .await
            .map_err(|e| anyhow::anyhow!("Failed to parse catalog response: {}", e))?;

        tracing::debug!(
            "Catalog returned {} candidates for query {:?}",
            parsed.results.len(),
            query
        );

        Ok(parsed.results.into_iter().map(VenueCandidate::from).collect())
    }
}

// ============================================================================
// Response types (internal - from the catalog service)
// ============================================================================

#[derive(Debug, Deserialize)]
struct CatalogSearchResponse {
    #[serde(default)]
    results: Vec<CatalogVenue>,
}

#[derive(Debug, Deserialize)]
struct CatalogVenue {
    name: String,
    #[serde(default)]
    category: String,
    #[serde(default)]
    description: String,
    #[serde(default)]
    address: String,
    #[serde(default)]
    latitude: Option<f64>,
    #[serde(default)]
    longitude: Option<f64>,
}

impl From<CatalogVenue> for VenueCandidate {
    fn from(venue: CatalogVenue) -> Self {
        let location = match (venue.latitude, venue.longitude) {
            (Some(latitude), Some(longitude)) => Some(Location {
                latitude,
                longitude,
            }),
            _ => None,
        };
        VenueCandidate {
            name: venue.name,
            category: venue.category,
            description: venue.description,
            address: venue.address,
            location,
        }
    }
}
