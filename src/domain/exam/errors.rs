//! Exam-specific error types.

use thiserror::Error;

use crate::domain::foundation::{DomainError, ErrorCode, ValidationError};

/// Errors raised by the exam session aggregate.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ExamError {
    /// A value failed validation (limits, reasons, transitions).
    #[error(transparent)]
    Validation(#[from] ValidationError),

    /// The exam was already terminated and cannot be restarted.
    #[error("Exam has already been terminated")]
    AlreadyTerminated,
}

impl From<ExamError> for DomainError {
    fn from(err: ExamError) -> Self {
        match err {
            ExamError::Validation(e) => e.into(),
            ExamError::AlreadyTerminated => {
                DomainError::new(ErrorCode::ExamTerminated, err.to_string())
            }
        }
    }
}
