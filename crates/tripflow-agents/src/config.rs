//! Pipeline configuration.

use tripflow_settings::PlannerSettings;

/// Knobs for the planning and review pipelines.
#[derive(Debug, Clone)]
pub struct PlannerConfig {
    /// Maximum itinerary-generation attempts before the planning pipeline
    /// fails terminally.
    pub max_attempts: u32,
    /// Whether the draft-validation node is active. It is the pipeline's
    /// only correctness backstop; disable it only for debugging.
    pub validation_enabled: bool,
    /// Dining candidates fetched per attraction during venue fetch.
    pub dining_per_attraction: usize,
    /// Lodging candidates fetched near the first attraction.
    pub lodging_candidates: usize,
    /// Candidate limit for review-time context fetches.
    pub context_candidates: usize,
}

impl Default for PlannerConfig {
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

impl From<&PlannerSettings> for PlannerConfig {
    fn from(settings: &PlannerSettings) -> Self {
        Self {
            max_attempts: settings.max_attempts,
            validation_enabled: settings.validation_enabled,
            dining_per_attraction: settings.dining_per_attraction,
            lodging_candidates: settings.lodging_candidates,
            context_candidates: settings.context_candidates,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_the_retry_bound() {
        let config = PlannerConfig::default();
        assert_eq!(config.max_attempts, 3);
        assert!(config.validation_enabled);
    }

    #[test]
    fn settings_map_onto_config() {
        let mut settings = PlannerSettings::default();
        settings.max_attempts = 2;
        settings.validation_enabled = false;
        let config = PlannerConfig::from(&settings);
        assert_eq!(config.max_attempts, 2);
        assert!(!config.validation_enabled);
    }
}
