//! Runtime configuration for an `ExamMonitor`.

use serde::{Deserialize, Serialize};
use std::sync::Arc;
use std::time::Duration;

use crate::domain::exam::{DEFAULT_COOLDOWN, DEFAULT_MAX_VIOLATIONS};
use crate::ports::{EnvironmentQuery, ExamHost, FullscreenController, SignalSource};

/// How `start_exam` relates to the fullscreen request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StartMode {
    /// `start_exam` requests fullscreen itself and only starts on success.
    #[default]
    RequestFullscreen,
    /// `start_exam` only arms the counter; the host requests fullscreen.
    ArmOnly,
}

/// Periodic developer-tools heuristic.
///
/// A docked inspector shrinks the inner window while the outer size stays
/// put. Narrow or zoomed windows can trip it too; that is a known
/// limitation of the heuristic.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DevToolsProbe {
    pub enabled: bool,
    pub interval: Duration,
    pub threshold_px: u32,
}

impl Default for DevToolsProbe {
    fn default() -> Self {
        Self {
            enabled: true,
            interval: Duration::from_secs(1),
            threshold_px: 160,
        }
    }
}

impl DevToolsProbe {
    pub fn disabled() -> Self {
        Self {
            enabled: false,
            ..Self::default()
        }
    }
}

/// Configuration supplied when constructing a monitor.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MonitorConfig {
    /// Violations tolerated; the one after this submits the exam.
    pub max_violations: u32,
    /// Master switch for lockdown. When false monitoring is vacuous.
    pub security_enabled: bool,
    /// Start in final-submission state (monitoring suppressed).
    pub final_submission: bool,
    pub start_mode: StartMode,
    /// Minimum spacing between counted violations.
    pub cooldown: Duration,
    pub devtools: DevToolsProbe,
}

impl Default for MonitorConfig {
    fn default() -> Self {
        Self {
            max_violations: DEFAULT_MAX_VIOLATIONS,
            security_enabled: true,
            final_submission: false,
            start_mode: StartMode::default(),
            cooldown: DEFAULT_COOLDOWN,
            devtools: DevToolsProbe::default(),
        }
    }
}

impl MonitorConfig {
    pub fn with_max_violations(mut self, max: u32) -> Self {
        self.max_violations = max;
        self
    }

    pub fn with_security_enabled(mut self, enabled: bool) -> Self {
        self.security_enabled = enabled;
        self
    }

    pub fn with_final_submission(mut self, active: bool) -> Self {
        self.final_submission = active;
        self
    }

    pub fn with_start_mode(mut self, mode: StartMode) -> Self {
        self.start_mode = mode;
        self
    }

    pub fn with_cooldown(mut self, cooldown: Duration) -> Self {
        self.cooldown = cooldown;
        self
    }

    pub fn with_devtools(mut self, probe: DevToolsProbe) -> Self {
        self.devtools = probe;
        self
    }
}

/// Adapters the monitor talks to.
#[derive(Clone)]
pub struct MonitorPorts {
    pub environment: Arc<dyn EnvironmentQuery>,
    pub fullscreen: Arc<dyn FullscreenController>,
    pub signals: Arc<dyn SignalSource>,
    pub host: Arc<dyn ExamHost>,
}
