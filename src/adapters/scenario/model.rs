//! Scenario file format.
//!
//! ```yaml
//! name: three strikes
//! monitor:
//!   max_violations: 3
//! browser:
//!   fullscreen: false
//! steps:
//!   - at_ms: 0
//!     do: start
//!   - at_ms: 100
//!     do: signal
//!     signal: { type: visibility_changed, hidden: true }
//!   - at_ms: 200
//!     do: re_enter
//! ```

use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::Path;

use crate::application::{MonitorConfig, StartMode};
use crate::domain::exam::{BrowserSignal, ViewportGap};

use super::ScenarioError;

/// A timed script of browser signals and host actions.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Scenario {
    pub name: String,
    #[serde(default)]
    pub monitor: MonitorOverrides,
    #[serde(default)]
    pub browser: BrowserSetup,
    pub steps: Vec<Step>,
}

/// Per-scenario overrides applied on top of the configured monitor.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MonitorOverrides {
    pub max_violations: Option<u32>,
    pub security_enabled: Option<bool>,
    pub final_submission: Option<bool>,
    pub start_mode: Option<StartMode>,
    pub cooldown_ms: Option<u64>,
}

impl MonitorOverrides {
    pub fn apply(&self, mut config: MonitorConfig) -> MonitorConfig {
        if let Some(max) = self.max_violations {
            config = config.with_max_violations(max);
        }
        if let Some(enabled) = self.security_enabled {
            config = config.with_security_enabled(enabled);
        }
        if let Some(active) = self.final_submission {
            config = config.with_final_submission(active);
        }
        if let Some(mode) = self.start_mode {
            config = config.with_start_mode(mode);
        }
        if let Some(ms) = self.cooldown_ms {
            config = config.with_cooldown(std::time::Duration::from_millis(ms));
        }
        config
    }
}

/// Initial state of the simulated browser.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BrowserSetup {
    #[serde(default)]
    pub fullscreen: bool,
    #[serde(default)]
    pub viewport_gap: ViewportGap,
    /// Deny every fullscreen request with this reason.
    pub deny_fullscreen: Option<String>,
    #[serde(default)]
    pub request_delay_ms: u64,
}

/// One scripted step, `at_ms` after the scenario starts.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Step {
    pub at_ms: u64,
    #[serde(flatten)]
    pub action: StepAction,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "do", rename_all = "snake_case")]
pub enum StepAction {
    /// Host calls `start_exam`.
    Start,
    /// Host calls `re_enter_full_screen`.
    ReEnter,
    /// Host calls `exit_full_screen`.
    ExitFullscreen,
    /// Browser delivers a signal.
    Signal { signal: BrowserSignal },
    /// Host reports a violation it detected itself.
    Record { reason: String },
    SetFinalSubmission { active: bool },
    SetSecurity { enabled: bool },
    /// Fullscreen changes without a request (F11, Esc).
    SetFullscreen { fullscreen: bool },
    SetViewportGap { gap: ViewportGap },
    DenyFullscreen { reason: String },
    AllowFullscreen,
}

impl fmt::Display for StepAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StepAction::Start => write!(f, "start"),
            StepAction::ReEnter => write!(f, "re_enter"),
            StepAction::ExitFullscreen => write!(f, "exit_fullscreen"),
            StepAction::Signal { signal } => write!(f, "signal {}", signal.kind()),
            StepAction::Record { reason } => write!(f, "record \"{}\"", reason),
            StepAction::SetFinalSubmission { active } => write!(f, "final_submission={}", active),
            StepAction::SetSecurity { enabled } => write!(f, "security={}", enabled),
            StepAction::SetFullscreen { fullscreen } => write!(f, "fullscreen={}", fullscreen),
            StepAction::SetViewportGap { gap } => {
                write!(f, "viewport_gap={}x{}", gap.width, gap.height)
            }
            StepAction::DenyFullscreen { .. } => write!(f, "deny_fullscreen"),
            StepAction::AllowFullscreen => write!(f, "allow_fullscreen"),
        }
    }
}

impl Scenario {
    /// Parses a scenario from YAML and checks step ordering.
    pub fn from_yaml(yaml: &str) -> Result<Self, ScenarioError> {
        let scenario: Scenario = serde_yaml::from_str(yaml)?;
        scenario.validate()?;
        Ok(scenario)
    }

    /// Reads and parses a scenario file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ScenarioError> {
        let yaml = std::fs::read_to_string(path)?;
        Self::from_yaml(&yaml)
    }

    /// Steps must be listed in non-decreasing `at_ms` order.
    pub fn validate(&self) -> Result<(), ScenarioError> {
        if self.steps.is_empty() {
            return Err(ScenarioError::NoSteps);
        }
        for (index, pair) in self.steps.windows(2).enumerate() {
            if pair[1].at_ms < pair[0].at_ms {
                return Err(ScenarioError::OutOfOrder {
                    index: index + 1,
                    at_ms: pair[1].at_ms,
                    previous: pair[0].at_ms,
                });
            }
        }
        Ok(())
    }
}
