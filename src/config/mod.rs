//! Application configuration module
//!
//! This module provides type-safe configuration loading from environment variables
//! using the `config` and `dotenvy` crates. Configuration is loaded with the
//! `PRD_EXPERT` prefix and nested values use double underscores as separators.
//!
//! # Example
//!
//! ```no_run
//! use prd_expert::config::AppConfig;
//!
//! let config = AppConfig::load().expect("Failed to load configuration");
//! config.validate().expect("Invalid configuration");
//!
//! println!("Research service at {}", config.research.base_url);
//! ```

mod error;
mod export;
mod logging;
mod research;
mod tracker;

pub use error::{ConfigError, ValidationError};
pub use export::ExportConfig;
pub use logging::LoggingConfig;
pub use research::ResearchConfig;
pub use tracker::TrackerConfig;

use serde::Deserialize;

/// Root application configuration
///
/// Only the research service base URL is required; every other section
/// falls back to its defaults. Load using [`AppConfig::load()`].
#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    /// Analysis service connection
    pub research: ResearchConfig,

    /// Issue tracker (GitHub) connection
    #[serde(default)]
    pub tracker: TrackerConfig,

    /// Document export pipeline
    #[serde(default)]
    pub export: ExportConfig,

    /// Log output
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl AppConfig {
    /// Load configuration from environment variables
    ///
    /// This function:
    /// 1. Loads `.env` file if present (for development)
    /// 2. Reads environment variables with `PRD_EXPERT` prefix
    /// 3. Uses `__` (double underscore) to separate nested values
    /// 4. Deserializes into typed configuration structs
    ///
    /// # Environment Variable Format
    ///
    /// - `PRD_EXPERT__RESEARCH__BASE_URL=http://localhost:8001/api` -> `research.base_url`
    /// - `PRD_EXPERT__EXPORT__SCALE=2` -> `export.scale = 2.0`
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if:
    /// - Required environment variables are missing
    /// - Values cannot be parsed into expected types
    pub fn load() -> Result<Self, ConfigError> {
        // Load .env file if present (development)
        dotenvy::dotenv().ok();

        let config = config::Config::builder()
            .add_source(
                config::Environment::default()
                    .prefix("PRD_EXPERT")
                    .separator("__"),
            )
            .build()?
            .try_deserialize()?;

        Ok(config)
    }

    /// Validate all configuration values
    ///
    /// # Errors
    ///
    /// Returns `ValidationError` if any configuration value is invalid.
    pub fn validate(&self) -> Result<(), ValidationError> {
        self.research.validate()?;
        self.tracker.validate()?;
        self.export.validate()?;
        self.logging.validate()?;
        Ok(())
    }
}
