//! Monitor policy configuration

use serde::Deserialize;
use std::time::Duration;

use super::error::ValidationError;
use crate::application::StartMode;
use crate::domain::exam::{DEFAULT_COOLDOWN, DEFAULT_MAX_VIOLATIONS};

/// Violation policy
#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
pub struct MonitorSection {
    /// Violations tolerated before the exam is submitted
    #[serde(default = "default_max_violations")]
    pub max_violations: u32,

    /// Lockdown master switch
    #[serde(default = "default_security_enabled")]
    pub security_enabled: bool,

    /// Whether `start_exam` requests fullscreen itself
    #[serde(default)]
    pub start_mode: StartMode,

    /// Minimum spacing between counted violations, in milliseconds
    #[serde(default = "default_cooldown_ms")]
    pub cooldown_ms: u64,
}

impl MonitorSection {
    pub fn cooldown(&self) -> Duration {
        Duration::from_millis(self.cooldown_ms)
    }

    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.max_violations == 0 {
            return Err(ValidationError::InvalidMaxViolations);
        }
        if self.cooldown_ms == 0 {
            return Err(ValidationError::InvalidCooldown);
        }
        Ok(())
    }
}

impl Default for MonitorSection {
    fn default() -> Self {
        Self {
            max_violations: default_max_violations(),
            security_enabled: default_security_enabled(),
            start_mode: StartMode::default(),
            cooldown_ms: default_cooldown_ms(),
        }
    }
}

fn default_max_violations() -> u32 {
    DEFAULT_MAX_VIOLATIONS
}

fn default_security_enabled() -> bool {
    true
}

fn default_cooldown_ms() -> u64 {
    DEFAULT_COOLDOWN.as_millis() as u64
}
