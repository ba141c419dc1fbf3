//! Notices the host renders outside the warning flow.

use serde::{Deserialize, Serialize};
use std::fmt;

use super::SuppressedAction;

/// Message for the host's inline toast or blocking dialog.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "action", rename_all = "snake_case")]
pub enum Notice {
    /// A suppressed action; shown inline, never blocks.
    ActionDisabled(SuppressedAction),
    /// Fullscreen was refused at exam start; blocks until retried.
    FullscreenRequired,
}

impl Notice {
    /// Returns true for notices that must block the exam UI.
    pub fn is_blocking(&self) -> bool {
        matches!(self, Notice::FullscreenRequired)
    }
}

impl fmt::Display for Notice {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Notice::ActionDisabled(action) => write!(f, "{}", action.notice_text()),
            Notice::FullscreenRequired => write!(
                f,
                "Fullscreen mode is required to take this exam. Allow fullscreen and start again."
            ),
        }
    }
}
