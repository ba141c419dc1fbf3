//! Developer-tools probe configuration

use serde::Deserialize;
use std::time::Duration;

use super::error::ValidationError;
use crate::application::DevToolsProbe;

/// Viewport-gap heuristic settings
#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
pub struct DevToolsSection {
    #[serde(default = "default_enabled")]
    pub enabled: bool,

    /// Poll interval in milliseconds
    #[serde(default = "default_poll_interval_ms")]
    pub poll_interval_ms: u64,

    /// Gap in CSS pixels above which dev tools are assumed open
    #[serde(default = "default_threshold_px")]
    pub threshold_px: u32,
}

impl DevToolsSection {
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.poll_interval_ms == 0 {
            return Err(ValidationError::InvalidPollInterval);
        }
        if self.threshold_px == 0 {
            return Err(ValidationError::InvalidThreshold);
        }
        Ok(())
    }

    pub fn probe(&self) -> DevToolsProbe {
        DevToolsProbe {
            enabled: self.enabled,
            interval: Duration::from_millis(self.poll_interval_ms),
            threshold_px: self.threshold_px,
        }
    }
}

impl Default for DevToolsSection {
    fn default() -> Self {
        Self {
            enabled: default_enabled(),
            poll_interval_ms: default_poll_interval_ms(),
            threshold_px: default_threshold_px(),
        }
    }
}

fn default_enabled() -> bool {
    true
}

fn default_poll_interval_ms() -> u64 {
    1000
}

fn default_threshold_px() -> u32 {
    160
}
