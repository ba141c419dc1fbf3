//! Monitor configuration module
//!
//! This module provides type-safe configuration loading from environment variables
//! using the `config` and `dotenvy` crates. Configuration is loaded with the
//! `EXAM_LOCKDOWN` prefix and nested values use double underscores as separators.
//!
//! # Example
//!
//! ```no_run
//! use exam_lockdown::config::MonitorSettings;
//!
//! let settings = MonitorSettings::load().expect("Failed to load configuration");
//! settings.validate().expect("Invalid configuration");
//!
//! let config = settings.into_monitor_config();
//! ```

mod devtools;
mod error;
mod monitor;
mod telemetry;

pub use devtools::DevToolsSection;
pub use error::{ConfigError, ValidationError};
pub use monitor::MonitorSection;
pub use telemetry::TelemetrySection;

use serde::Deserialize;

use crate::application::MonitorConfig;

/// Root configuration
///
/// Every section has defaults, so an empty environment yields the documented
/// policy: three tolerated violations, 500ms cool-down, probe every second.
#[derive(Debug, Clone, Default, Deserialize, PartialEq, Eq)]
pub struct MonitorSettings {
    /// Violation policy
    #[serde(default)]
    pub monitor: MonitorSection,

    /// Developer-tools probe
    #[serde(default)]
    pub devtools: DevToolsSection,

    /// Log output
    #[serde(default)]
    pub telemetry: TelemetrySection,
}

impl MonitorSettings {
    /// Load configuration from environment variables
    ///
    /// This function:
    /// 1. Loads `.env` file if present (for development)
    /// 2. Reads environment variables with `EXAM_LOCKDOWN` prefix
    /// 3. Uses `__` (double underscore) to separate nested values
    /// 4. Deserializes into typed configuration structs
    ///
    /// # Environment Variable Format
    ///
    /// - `EXAM_LOCKDOWN__MONITOR__MAX_VIOLATIONS=5` -> `monitor.max_violations = 5`
    /// - `EXAM_LOCKDOWN__DEVTOOLS__ENABLED=false` -> `devtools.enabled = false`
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if values cannot be parsed into expected types.
    pub fn load() -> Result<Self, ConfigError> {
        // Load .env file if present (development)
        dotenvy::dotenv().ok();

        let settings = config::Config::builder()
            .add_source(
                config::Environment::default()
                    .prefix("EXAM_LOCKDOWN")
                    .separator("__"),
            )
            .build()?
            .try_deserialize()?;

        Ok(settings)
    }

    /// Validate all configuration values
    ///
    /// # Errors
    ///
    /// Returns `ValidationError` for zero limits, zero durations or a
    /// malformed log filter.
    pub fn validate(&self) -> Result<(), ValidationError> {
        self.monitor.validate()?;
        self.devtools.validate()?;
        self.telemetry.validate()?;
        Ok(())
    }

    /// Builds the runtime monitor configuration.
    pub fn into_monitor_config(self) -> MonitorConfig {
        MonitorConfig::default()
            .with_max_violations(self.monitor.max_violations)
            .with_security_enabled(self.monitor.security_enabled)
            .with_start_mode(self.monitor.start_mode)
            .with_cooldown(self.monitor.cooldown())
            .with_devtools(self.devtools.probe())
    }
}
