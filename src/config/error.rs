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
    #[error("max_violations must be at least 1")]
    InvalidMaxViolations,

    #[error("Violation cool-down must be positive")]
    InvalidCooldown,

    #[error("Dev-tools poll interval must be positive")]
    InvalidPollInterval,

    #[error("Dev-tools threshold must be positive")]
    InvalidThreshold,

    #[error("Invalid log filter: {0}")]
    InvalidLogFilter(String),
}
