//! Settings schema definitions for tripflow configuration.
//!
//! All settings structs use `#[serde(default)]` to allow partial
//! configuration files. Missing fields are filled with sensible defaults.

use serde::{Deserialize, Serialize};

/// Top-level settings for the tripflow services.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct TripflowSettings {
    pub completion: CompletionSettings,
    pub search: SearchSettings,
    pub planner: PlannerSettings,
}

/// Structured-completion provider settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct CompletionSettings {
    /// Model identifier passed to the provider.
    pub model: String,
    /// API key; falls back to environment variables when absent.
    pub api_key: Option<String>,
}

impl Default for CompletionSettings {
    fn default() -> Self {
        Self {
            model: "gpt-4o".to_string(),
            api_key: None,
        }
    }
}

/// Venue catalog and nearby-place search provider settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SearchSettings {
    /// Base URL of the semantic venue-catalog service.
    pub catalog_url: String,
    /// Base URL of the keyword local-search API.
    pub places_url: String,
    /// Local-search API credentials; environment fallback when absent.
    pub client_id: Option<String>,
    pub client_secret: Option<String>,
}

impl Default for SearchSettings {
    fn default() -> Self {
        Self {
            catalog_url: "http://localhost:8600".to_string(),
            places_url: "https://openapi.example.com/v1/search/local.json".to_string(),
            client_id: None,
            client_secret: None,
        }
    }
}

/// Planning pipeline knobs.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PlannerSettings {
    /// Maximum itinerary-generation attempts before the pipeline fails.
    pub max_attempts: u32,
    /// Whether the draft-validation node is active. Keep this on; it is the
    /// pipeline's only correctness backstop.
    pub validation_enabled: bool,
    /// Dining candidates fetched per attraction.
    pub dining_per_attraction: usize,
    /// Lodging candidates fetched near the first attraction.
    pub lodging_candidates: usize,
    /// Candidate limit for review-time context fetches.
    pub context_candidates: usize,
}

impl Default for PlannerSettings {
    fn default() -> Self {
        Self {
            max_attempts: 3,
            validation_enabled: true,
            dining_per_attraction: 3,
            lodging_candidates: 5,
            context_candidates: 5,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_sensible() {
        let settings = TripflowSettings::default();
        assert_eq!(settings.planner.max_attempts, 3);
        assert!(settings.planner.validation_enabled);
        assert_eq!(settings.completion.model, "gpt-4o");
    }

    #[test]
    fn partial_file_fills_missing_sections() {
        let settings: TripflowSettings = toml::from_str(
            r#"
            [planner]
            max_attempts = 5
            "#,
        )
        .unwrap();
        assert_eq!(settings.planner.max_attempts, 5);
        // Untouched sections keep their defaults.
        assert!(settings.planner.validation_enabled);
        assert_eq!(settings.completion.model, "gpt-4o");
    }
}
