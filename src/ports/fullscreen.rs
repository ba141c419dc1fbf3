//! FullscreenController port - Asynchronous fullscreen requests.
//!
//! `Element.requestFullscreen()` returns a promise that may reject because
//! the user refused, the call lacked a user gesture, or the platform does
//! not support it. The rejection is a first-class result here.

use async_trait::async_trait;
use thiserror::Error;

use crate::domain::foundation::{DomainError, ErrorCode};

/// Why a fullscreen transition failed.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FullscreenError {
    /// The browser or the user refused the request.
    #[error("Fullscreen request denied: {0}")]
    Denied(String),

    /// The platform has no fullscreen support.
    #[error("Fullscreen is not supported in this environment")]
    Unsupported,

    /// Any other failure reported by the platform.
    #[error("Fullscreen transition failed: {0}")]
    Failed(String),
}

impl From<FullscreenError> for DomainError {
    fn from(err: FullscreenError) -> Self {
        DomainError::new(ErrorCode::FullscreenUnavailable, err.to_string())
    }
}

/// Port for entering and leaving fullscreen presentation.
///
/// Both calls may suspend for an arbitrary time. Callers must re-check the
/// exam state after the await: the session may have been terminated or torn
/// down in the meantime.
#[async_trait]
pub trait FullscreenController: Send + Sync {
    /// Requests fullscreen for the exam document.
    async fn request_fullscreen(&self) -> Result<(), FullscreenError>;

    /// Leaves fullscreen.
    async fn exit_fullscreen(&self) -> Result<(), FullscreenError>;
}
