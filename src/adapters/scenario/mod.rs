//! Scenario replay.
//!
//! A scenario is a YAML script of timed browser signals and host actions.
//! The runner wires a real `ExamMonitor` to the in-memory adapters and
//! reports what the host would have seen. Used by the `exam-lockdown`
//! binary and by integration tests.

mod model;
mod runner;

use thiserror::Error;

use crate::application::MonitorError;

pub use model::{BrowserSetup, MonitorOverrides, Scenario, Step, StepAction};
pub use runner::{ScenarioReport, ScenarioRunner, StepRecord};

/// Errors loading or replaying a scenario.
#[derive(Debug, Error)]
pub enum ScenarioError {
    #[error("Failed to read scenario: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to parse scenario: {0}")]
    Parse(#[from] serde_yaml::Error),

    #[error("Scenario has no steps")]
    NoSteps,

    #[error("Step {index} at {at_ms}ms comes before the previous step at {previous}ms")]
    OutOfOrder { index: usize, at_ms: u64, previous: u64 },

    #[error("Failed to build monitor: {0}")]
    Monitor(#[from] MonitorError),
}
