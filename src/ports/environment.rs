//! EnvironmentQuery port - Read-only view of ambient browser state.
//!
//! Handlers never touch `document.fullscreenElement` or the window
//! dimensions directly; they ask this port, so the gateway and the state
//! machine run without a browser in tests.

use crate::domain::exam::ViewportGap;

/// Port for reading ambient presentation state.
///
/// Implementations must be cheap: the gateway calls `is_fullscreen` for
/// every blur and fullscreen signal and `viewport_gap` once per probe tick.
pub trait EnvironmentQuery: Send + Sync {
    /// Returns true if the document currently has a fullscreen element.
    fn is_fullscreen(&self) -> bool;

    /// Returns the gap between outer and inner window dimensions.
    fn viewport_gap(&self) -> ViewportGap;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[allow(dead_code)]
    fn assert_object_safe(_: &dyn EnvironmentQuery) {}

    #[allow(dead_code)]
    fn assert_send_sync<T: Send + Sync>() {}

    #[test]
    fn environment_query_is_send_sync() {
        #[allow(dead_code)]
        fn check<T: EnvironmentQuery>() {
            assert_send_sync::<T>();
        }
    }
}
