//! Logging configuration

use serde::Deserialize;
use tracing_subscriber::EnvFilter;

use super::error::ValidationError;

/// Log output settings
#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
pub struct TelemetrySection {
    /// Emit JSON lines instead of human-readable output
    #[serde(default)]
    pub json_logs: bool,

    /// Rust log filter directive, used when `RUST_LOG` is unset
    #[serde(default = "default_log_filter")]
    pub log_filter: String,
}

impl TelemetrySection {
    pub fn validate(&self) -> Result<(), ValidationError> {
        EnvFilter::try_new(&self.log_filter)
            .map(|_| ())
            .map_err(|e| ValidationError::InvalidLogFilter(e.to_string()))
    }
}

impl Default for TelemetrySection {
    fn default() -> Self {
        Self {
            json_logs: false,
            log_filter: default_log_filter(),
        }
    }
}

fn default_log_filter() -> String {
    "info,exam_lockdown=debug".to_string()
}
