//! Configuration error types

use thiserror::Error;

/// Errors that can occur during configuration loading
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Configuration loading failed: {0}")]
    LoadError(#[from] config::ConfigError),

    #[error("Validation failed: {0}")]
    ValidationFailed(#[from] ValidationError),
}

/// Errors that can occur during configuration validation
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ValidationError {
    #[error("Required configuration missing: {0}")]
    MissingRequired(&'static str),

    #[error("{0} must be an http(s) URL")]
    InvalidUrl(&'static str),

    #[error("Invalid request timeout")]
    InvalidTimeout,

    #[error("Export scale must be a positive number")]
    InvalidScale,

    #[error("Viewport width must be positive")]
    InvalidViewport,

    #[error("Invalid log level: {0}")]
    InvalidLogLevel(String),
}
