//! Nearby-place keyword search client.
//!
//! Wraps a local-search API that matches on keywords and returns place
//! records with provider-specific quirks: coordinates scaled by 1e7 and
//! markup tags embedded in titles. Those quirks stay inside this module.

use anyhow::Result;
use async_trait::async_trait;
use serde::Deserialize;

use tripflow_core::{Location, VenueCandidate};

/// The upstream API caps results per request.
const MAX_DISPLAY: usize = 5;

/// Keyword lookup of places near a location.
#[async_trait]
pub trait NearbyPlaceSearch: Send + Sync {
    /// Search for places matching `query` around `near`. Best-effort: may
    /// return fewer than `limit` results.
    async fn search(&self, query: &str, near: Location, limit: usize)
        -> Result<Vec<VenueCandidate>>;
}

/// HTTP client for the local-search API.
pub struct PlaceSearchClient {
    base_url: String,
    client_id: String,
    client_secret: String,
    client: reqwest::Client,
}

impl PlaceSearchClient {
    pub fn new(
        base_url: impl Into<String>,
        client_id: impl Into<String>,
        client_secret: impl Into<String>,
    ) -> Self {
        Self {
            base_url: base_url.into(),
            client_id: client_id.into(),
            client_secret: client_secret.into(),
            client: reqwest::Client::new(),
        }
    }
}

#[async_trait]
impl NearbyPlaceSearch for PlaceSearchClient {
    async fn search(
        &self,
        query: &str,
        near: Location,
        limit: usize,
    ) -> Result<Vec<VenueCandidate>> {
        // The upstream matches on keywords only; the anchor bounds result
        // count here and is kept for trace context.
        tracing::debug!(
            "Place search {:?} near ({}, {})",
            query,
            near.latitude,
            near.longitude
        );

        let display = limit.min(MAX_DISPLAY).to_string();
        let response = self
            .client
            .get(&self.base_url)
            .header("X-Search-Client-Id", &self.client_id)
            .header("X-Search-Client-Secret", &self.client_secret)
            .query(&[
                ("query", query),
                ("display", display.as_str()),
                ("sort", "random"),
            ])
            .send()
            .await
            .map_err(|e| anyhow::anyhow!("Failed to send place search request: {}", e))?;

        if !response.status().is_success() {
            let status = response.status();
            let error_text = response.text().await.unwrap_or_default();
            return Err(anyhow::anyhow!(
                "Place search failed with status {}: {}",
                status,
                error_text
            ));
        }

        let parsed: PlaceSearchResponse = response
            .json()
            .await
            .map_err(|e| anyhow::anyhow!("Failed to parse place search response: {}", e))?;

        let candidates: Vec<VenueCandidate> = parsed
            .items
            .into_iter()
            .take(limit)
            .map(VenueCandidate::from)
            .collect();

        tracing::debug!("Place search returned {} candidates", candidates.len());
        Ok(candidates)
    }
}

// ============================================================================
// Response types (internal - from the local-search API)
// ============================================================================

#[derive(Debug, Deserialize)]
struct PlaceSearchResponse {
    #[serde(default)]
    items: Vec<PlaceItem>,
}

#[derive(Debug, Deserialize)]
struct PlaceItem {
    title: String,
    #[serde(default)]
    category: String,
    #[serde(default)]
    description: String,
    #[serde(default)]
    address: String,
    #[serde(default, rename = "roadAddress")]
    road_address: String,
    /// Longitude scaled by 1e7, as a decimal string.
    #[serde(default)]
    mapx: String,
    /// Latitude scaled by 1e7, as a decimal string.
    #[serde(default)]
    mapy: String,
}

impl From<PlaceItem> for VenueCandidate {
    fn from(item: PlaceItem) -> Self {
        let location = match (scaled_coordinate(&item.mapy), scaled_coordinate(&item.mapx)) {
            (Some(latitude), Some(longitude)) => Some(Location {
                latitude,
                longitude,
            }),
            _ => None,
        };
        let address = if item.road_address.is_empty() {
            item.address
        } else {
            item.road_address
        };
        VenueCandidate {
            name: strip_markup(&item.title),
            category: item.category,
            description: item.description,
            address,
            location,
        }
    }
}

/// Convert a 1e7-scaled coordinate string to WGS84 degrees.
fn scaled_coordinate(raw: &str) -> Option<f64> {
    raw.trim().parse::<i64>().ok().map(|v| v as f64 / 10_000_000.0)
}

/// Strip the markup tags and entities the upstream embeds in titles.
fn strip_markup(title: &str) -> String {
    title
        .replace("<b>", "")
        .replace("</b>", "")
        .replace("&amp;", "&")
}
