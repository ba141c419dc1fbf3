//! Outcomes of feeding a candidate violation to the state machine.

use serde::{Deserialize, Serialize};
use std::fmt;

use super::{ViolationReason, WarningLevel};

/// Warning shown to the candidate after a counted violation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WarningMessage {
    pub level: WarningLevel,
    pub count: u32,
    pub max_violations: u32,
    pub reason: ViolationReason,
}

impl WarningMessage {
    /// Builds the message for a freshly counted violation `count <= max`.
    pub fn new(count: u32, max_violations: u32, reason: ViolationReason) -> Self {
        Self {
            level: WarningLevel::for_count(count, max_violations),
            count,
            max_violations,
            reason,
        }
    }

    /// Returns true for the last warning before auto-submission.
    pub fn is_final(&self) -> bool {
        self.level == WarningLevel::FinalWarning
    }

    /// Violations left before the exam is submitted.
    pub fn remaining(&self) -> u32 {
        self.max_violations.saturating_sub(self.count)
    }
}

impl fmt::Display for WarningMessage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.level {
            WarningLevel::Warning => write!(
                f,
                "Warning: violation {} of {} detected ({}). Return to the exam and stay in fullscreen.",
                self.count, self.max_violations, self.reason
            ),
            WarningLevel::FinalWarning => write!(
                f,
                "Final warning: violation {} of {} detected ({}). One more violation will submit your exam automatically.",
                self.count, self.max_violations, self.reason
            ),
        }
    }
}

/// Why a candidate violation was dropped without touching the counter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum IgnoredBecause {
    /// The exam has not been started yet.
    NotStarted,
    /// Security is disabled, so monitoring is vacuous.
    SecurityDisabled,
    /// Final submission is in progress.
    FinalSubmission,
    /// The exam was already terminated.
    AlreadyTerminated,
}

impl fmt::Display for IgnoredBecause {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            IgnoredBecause::NotStarted => "not_started",
            IgnoredBecause::SecurityDisabled => "security_disabled",
            IgnoredBecause::FinalSubmission => "final_submission",
            IgnoredBecause::AlreadyTerminated => "already_terminated",
        };
        write!(f, "{}", s)
    }
}

/// Result of `ExamSession::record_violation`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ViolationOutcome {
    /// Counted; the host should show this warning.
    Warned(WarningMessage),
    /// Counted and the limit was exceeded; the host must submit the exam.
    Terminated { count: u32 },
    /// Dropped by the reentrancy guard.
    Debounced,
    /// Dropped because the session is not in a counting state.
    Ignored(IgnoredBecause),
}

impl ViolationOutcome {
    /// Returns true if the counter moved.
    pub fn is_counted(&self) -> bool {
        matches!(
            self,
            ViolationOutcome::Warned(_) | ViolationOutcome::Terminated { .. }
        )
    }

    /// Short label for structured logs.
    pub fn label(&self) -> &'static str {
        match self {
            ViolationOutcome::Warned(m) if m.is_final() => "final_warning",
            ViolationOutcome::Warned(_) => "warning",
            ViolationOutcome::Terminated { .. } => "terminated",
            ViolationOutcome::Debounced => "debounced",
            ViolationOutcome::Ignored(_) => "ignored",
        }
    }
}
