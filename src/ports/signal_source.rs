//! SignalSource port - Registration of browser event listeners.
//!
//! The source hands out a [`SignalRegistration`] per subscription. Dropping
//! the registration removes every listener it installed, so teardown cannot
//! be forgotten on any exit path.

use std::sync::Arc;

use crate::domain::exam::{BrowserSignal, SignalKind};
use crate::domain::foundation::DomainError;

/// What the adapter should do with the native event after handling.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct SignalResponse {
    /// Call `event.preventDefault()`.
    pub prevent_default: bool,
}

impl SignalResponse {
    pub fn proceed() -> Self {
        Self { prevent_default: false }
    }

    pub fn prevent() -> Self {
        Self { prevent_default: true }
    }
}

/// Handler invoked for every signal of a subscribed kind.
///
/// Runs to completion on the delivering thread; must not block.
pub trait SignalHandler: Send + Sync {
    fn handle(&self, signal: &BrowserSignal) -> SignalResponse;
}

/// Live listener set. Dropping it unregisters every listener at once.
pub trait SignalRegistration: Send {
    /// Kinds covered by this registration.
    fn kinds(&self) -> &[SignalKind];
}

/// Port for subscribing to browser signals.
///
/// # Example
///
/// ```ignore
/// let registration = source.subscribe(&SignalKind::ALL, handler)?;
/// // ... monitoring ...
/// drop(registration); // all listeners removed
/// ```
pub trait SignalSource: Send + Sync {
    /// Registers `handler` for all `kinds` as a single unit.
    ///
    /// Either every listener is installed or none is.
    fn subscribe(
        &self,
        kinds: &[SignalKind],
        handler: Arc<dyn SignalHandler>,
    ) -> Result<Box<dyn SignalRegistration>, DomainError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[allow(dead_code)]
    fn assert_source_object_safe(_: &dyn SignalSource) {}

    #[allow(dead_code)]
    fn assert_handler_object_safe(_: &dyn SignalHandler) {}

    #[test]
    fn default_response_lets_the_event_proceed() {
        assert_eq!(SignalResponse::default(), SignalResponse::proceed());
        assert!(SignalResponse::prevent().prevent_default);
    }
}
