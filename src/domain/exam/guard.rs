//! Reentrancy guard that debounces bursts of violation signals.
//!
//! A single user action often fires several browser signals at once
//! (Alt-Tab raises blur, visibility and fullscreen changes in one turn).
//! The guard makes sure such a burst is counted as one violation.

use std::time::{Duration, Instant};

/// Default cool-down between two counted violations.
pub const DEFAULT_COOLDOWN: Duration = Duration::from_millis(500);

/// Latch with a fixed cool-down.
///
/// # Invariants
///
/// - At most one `try_enter` succeeds per cool-down window.
/// - The latch is set before the caller does any other work.
/// - The latch releases itself once the cool-down has elapsed; there is no
///   manual release.
#[derive(Debug, Clone)]
pub struct ReentrancyGuard {
    cooldown: Duration,
    latched_until: Option<Instant>,
}

impl ReentrancyGuard {
    /// Creates an open guard with the given cool-down.
    pub fn new(cooldown: Duration) -> Self {
        Self {
            cooldown,
            latched_until: None,
        }
    }

    /// Returns the configured cool-down.
    pub fn cooldown(&self) -> Duration {
        self.cooldown
    }

    /// Returns true if a violation at `now` would be debounced.
    pub fn is_latched(&self, now: Instant) -> bool {
        matches!(self.latched_until, Some(until) if now < until)
    }

    /// Attempts to take the latch at `now`.
    ///
    /// Returns `false` (debounced) while a previous entry is still cooling
    /// down. On success the latch is held until `now + cooldown`.
    pub fn try_enter(&mut self, now: Instant) -> bool {
        if self.is_latched(now) {
            return false;
        }
        self.latched_until = Some(now + self.cooldown);
        true
    }
}

impl Default for ReentrancyGuard {
    fn default() -> Self {
        Self::new(DEFAULT_COOLDOWN)
    }
}
