//! Centralized TOML-based settings system for tripflow.
//!
//! This crate provides configuration management for the tripflow services:
//! - Loading settings from `~/.tripflow/settings.toml`
//! - Environment variable fallback for credentials
//! - Type-safe settings schema with serde defaults
//!
//! # Usage
//!
//! ```rust,ignore
//! use tripflow_settings::{get_with_env_fallback, SettingsManager};
//!
//! let manager = SettingsManager::load().await?;
//! let settings = manager.get();
//!
//! let api_key = get_with_env_fallback(
//!     &settings.completion.api_key,
//!     &["TRIPFLOW_COMPLETION_API_KEY", "OPENAI_API_KEY"],
//! );
//! ```

pub mod loader;
pub mod schema;

pub use loader::{get_with_env_fallback, settings_path, SettingsManager};
pub use schema::{
    CompletionSettings, PlannerSettings, SearchSettings, TripflowSettings,
};
