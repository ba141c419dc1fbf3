//! ExamStatus enum for tracking the lifecycle of a monitored exam.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::domain::foundation::StateMachine;

/// Lifecycle status of a monitored exam.
///
/// ```text
/// Unstarted --start--> Active --count > max--> Terminated
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum ExamStatus {
    /// Exam not yet started; the violation counter reads -1.
    #[default]
    Unstarted,
    /// Exam running; 0 <= violations <= max.
    Active,
    /// Exam must be submitted; no further violations are counted.
    Terminated,
}

impl ExamStatus {
    /// Returns true while violations can still be counted.
    pub fn is_active(&self) -> bool {
        matches!(self, ExamStatus::Active)
    }
}

impl StateMachine for ExamStatus {
    fn can_transition_to(&self, target: &Self) -> bool {
        use ExamStatus::*;
        matches!((self, target), (Unstarted, Active) | (Active, Terminated))
    }

    fn valid_transitions(&self) -> Vec<Self> {
        use ExamStatus::*;
        match self {
            Unstarted => vec![Active],
            Active => vec![Terminated],
            Terminated => vec![],
        }
    }
}

impl fmt::Display for ExamStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            ExamStatus::Unstarted => "Unstarted",
            ExamStatus::Active => "Active",
            ExamStatus::Terminated => "Terminated",
        };
        write!(f, "{}", s)
    }
}

/// Sub-condition of an active exam, used only to pick the warning wording.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WarningLevel {
    /// More than one violation remains before submission.
    Warning,
    /// The next violation submits the exam.
    FinalWarning,
}

impl WarningLevel {
    /// Picks the level for a freshly incremented count that did not exceed `max`.
    pub fn for_count(count: u32, max_violations: u32) -> Self {
        if count < max_violations {
            WarningLevel::Warning
        } else {
            WarningLevel::FinalWarning
        }
    }
}
