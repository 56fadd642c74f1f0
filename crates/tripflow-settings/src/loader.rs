//! Settings loading with environment-variable fallback.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};

use crate::schema::TripflowSettings;

/// Location of the user settings file, `~/.tripflow/settings.toml`.
pub fn settings_path() -> Option<PathBuf> {
    dirs::home_dir().map(|home| home.join(".tripflow").join("settings.toml"))
}

/// Loads and holds the parsed settings.
pub struct SettingsManager {
    settings: TripflowSettings,
}

impl SettingsManager {
    /// Load settings from the default path, falling back to defaults when
    /// the file does not exist.
    pub async fn load() -> Result<Self> {
        match settings_path() {
            Some(path) if path.exists() => {
                let settings = Self::read_file(&path).await?;
                Ok(Self { settings })
            }
            _ => {
                tracing::debug!("No settings file found, using defaults");
                Ok(Self {
                    settings: TripflowSettings::default(),
                })
            }
        }
    }

    /// Load settings from an explicit path. The file must exist.
    pub async fn load_from(path: &Path) -> Result<Self> {
        let settings = Self::read_file(path).await?;
        Ok(Self { settings })
    }

    async fn read_file(path: &Path) -> Result<TripflowSettings> {
        let raw = tokio::fs::read_to_string(path)
            .await
            .with_context(|| format!("Failed to read settings file {}", path.display()))?;
        let settings = toml::from_str(&raw)
            .with_context(|| format!("Failed to parse settings file {}", path.display()))?;
        tracing::info!("Loaded settings from {}", path.display());
        Ok(settings)
    }

    pub fn get(&self) -> &TripflowSettings {
        &self.settings
    }
}

/// Resolve a credential: a non-empty settings value wins, otherwise the
/// first non-empty environment variable from `env_vars`.
pub fn get_with_env_fallback(value: &Option<String>, env_vars: &[&str]) -> Option<String> {
    if let Some(v) = value {
        if !v.is_empty() {
            return Some(v.clone());
        }
    }
    env_vars
        .iter()
        .find_map(|name| std::env::var(name).ok().filter(|v| !v.is_empty()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[tokio::test]
    async fn load_from_reads_partial_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "[completion]\nmodel = \"gpt-4o-mini\"").unwrap();

        let manager = SettingsManager::load_from(file.path()).await.unwrap();
        assert_eq!(manager.get().completion.model, "gpt-4o-mini");
        assert_eq!(manager.get().planner.max_attempts, 3);
    }

    #[tokio::test]
    async fn load_from_rejects_malformed_toml() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "not toml at all [").unwrap();

        assert!(SettingsManager::load_from(file.path()).await.is_err());
    }

    #[test]
    fn settings_value_wins_over_environment() {
        std::env::set_var("TRIPFLOW_TEST_FALLBACK_A", "from-env");
        let resolved =
            get_with_env_fallback(&Some("from-settings".to_string()), &["TRIPFLOW_TEST_FALLBACK_A"]);
        assert_eq!(resolved.as_deref(), Some("from-settings"));
        std::env::remove_var("TRIPFLOW_TEST_FALLBACK_A");
    }

    #[test]
    fn empty_settings_value_falls_back_to_environment() {
        std::env::set_var("TRIPFLOW_TEST_FALLBACK_B", "from-env");
        let resolved = get_with_env_fallback(&Some(String::new()), &["TRIPFLOW_TEST_FALLBACK_B"]);
        assert_eq!(resolved.as_deref(), Some("from-env"));
        std::env::remove_var("TRIPFLOW_TEST_FALLBACK_B");
    }
}
