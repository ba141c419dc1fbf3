//! ViolationReason value object.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::domain::foundation::ValidationError;

/// Human-readable reason attached to a detected violation.
///
/// Advisory only: it is shown to the candidate and kept in the violation
/// log, but never drives the state machine. The one invariant is that it
/// is not blank.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct ViolationReason(String);

impl ViolationReason {
    /// Creates a reason from arbitrary text.
    ///
    /// # Errors
    ///
    /// Returns `EmptyField` if the text is empty or whitespace only.
    pub fn new(reason: impl Into<String>) -> Result<Self, ValidationError> {
        let reason = reason.into();
        let trimmed = reason.trim();
        if trimmed.is_empty() {
            return Err(ValidationError::empty_field("reason"));
        }
        Ok(Self(trimmed.to_string()))
    }

    fn fixed(reason: &'static str) -> Self {
        Self(reason.to_string())
    }

    /// Document visibility became hidden.
    pub fn switched_tabs() -> Self {
        Self::fixed("switched tabs")
    }

    /// Window lost focus while the exam was in fullscreen.
    pub fn switched_window() -> Self {
        Self::fixed("switched window")
    }

    /// The fullscreen element disappeared.
    pub fn exited_fullscreen() -> Self {
        Self::fixed("exited fullscreen")
    }

    /// The viewport probe saw a docked inspector.
    pub fn developer_tools_opened() -> Self {
        Self::fixed("developer tools opened")
    }

    pub(crate) fn from_static(reason: &'static str) -> Self {
        Self::fixed(reason)
    }

    /// Returns the reason text.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ViolationReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl TryFrom<String> for ViolationReason {
    type Error = ValidationError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<ViolationReason> for String {
    fn from(reason: ViolationReason) -> Self {
        reason.0
    }
}
