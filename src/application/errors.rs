//! Application-level error type for the monitor facade.

use thiserror::Error;

use crate::domain::exam::ExamError;
use crate::domain::foundation::{DomainError, ValidationError};
use crate::ports::FullscreenError;

/// Errors surfaced by `ExamMonitor` operations.
#[derive(Debug, Clone, Error)]
pub enum MonitorError {
    /// Fullscreen was refused at exam start; the exam did not start.
    #[error("Fullscreen is required to start the exam: {0}")]
    FullscreenRequired(#[source] FullscreenError),

    /// A fullscreen transition other than the start request failed.
    #[error(transparent)]
    Fullscreen(FullscreenError),

    #[error(transparent)]
    Exam(#[from] ExamError),

    #[error("Invalid monitor configuration: {0}")]
    InvalidConfig(#[from] ValidationError),

    /// Listener registration or probe scheduling failed.
    #[error("Browser integration failed: {0}")]
    Integration(#[from] DomainError),

    /// The monitor was shut down while the operation was in flight.
    #[error("Monitor has been shut down")]
    ShutDown,
}

impl MonitorError {
    /// True if retrying `start_exam` may succeed.
    pub fn is_retryable(&self) -> bool {
        matches!(self, MonitorError::FullscreenRequired(_))
    }
}
