//! FullscreenLifecycleManager - Transitions into and out of fullscreen.

use std::sync::Arc;

use crate::ports::{EnvironmentQuery, FullscreenController, FullscreenError};

/// Result of a restore attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Restore {
    /// Already fullscreen; no request was made.
    AlreadyFullscreen,
    /// A request was made and granted.
    Restored,
}

/// Wraps the fullscreen port with the "only ask when needed" rules.
pub struct FullscreenLifecycleManager {
    controller: Arc<dyn FullscreenController>,
    environment: Arc<dyn EnvironmentQuery>,
}

impl FullscreenLifecycleManager {
    pub fn new(
        controller: Arc<dyn FullscreenController>,
        environment: Arc<dyn EnvironmentQuery>,
    ) -> Self {
        Self {
            controller,
            environment,
        }
    }

    /// Requests fullscreen unconditionally (exam start).
    pub async fn enter(&self) -> Result<(), FullscreenError> {
        self.controller.request_fullscreen().await
    }

    /// Requests fullscreen only if the document is not already fullscreen.
    pub async fn restore(&self) -> Result<Restore, FullscreenError> {
        if self.environment.is_fullscreen() {
            return Ok(Restore::AlreadyFullscreen);
        }
        self.controller.request_fullscreen().await?;
        Ok(Restore::Restored)
    }

    /// Leaves fullscreen if currently in it. Returns whether a request was made.
    pub async fn leave(&self) -> Result<bool, FullscreenError> {
        if !self.environment.is_fullscreen() {
            return Ok(false);
        }
        self.controller.exit_fullscreen().await?;
        Ok(true)
    }
}
