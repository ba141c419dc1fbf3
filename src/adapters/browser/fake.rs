//! Scriptable browser for tests and scenario replay.
//!
//! Implements both browser-facing ports over one shared state, so a
//! granted fullscreen request is immediately visible to `is_fullscreen`.
//!
//! # Features
//!
//! - Fullscreen state and viewport gap set directly
//! - Request denial injection
//! - Simulated request latency
//! - Call counting for verification
//!
//! # Example
//!
//! ```ignore
//! let browser = Arc::new(FakeBrowser::new());
//! browser.deny_requests("no user gesture");
//!
//! let err = browser.request_fullscreen().await.unwrap_err();
//! assert_eq!(browser.request_count(), 1);
//! ```

use async_trait::async_trait;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Mutex, MutexGuard, PoisonError};
use std::time::Duration;
use tokio::time::sleep;

use crate::domain::exam::ViewportGap;
use crate::ports::{EnvironmentQuery, FullscreenController, FullscreenError};

#[derive(Debug, Default)]
struct Scripted {
    gap: ViewportGap,
    refusal: Option<FullscreenError>,
    delay: Duration,
}

/// In-memory browser double.
#[derive(Debug, Default)]
pub struct FakeBrowser {
    fullscreen: AtomicBool,
    scripted: Mutex<Scripted>,
    requests: AtomicUsize,
    exits: AtomicUsize,
}

impl FakeBrowser {
    /// Creates a windowed browser with no viewport gap that grants requests.
    pub fn new() -> Self {
        Self::default()
    }

    fn scripted(&self) -> MutexGuard<'_, Scripted> {
        self.scripted.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Sets the fullscreen state as if the user pressed F11 or Esc.
    pub fn set_fullscreen(&self, fullscreen: bool) {
        self.fullscreen.store(fullscreen, Ordering::SeqCst);
    }

    pub fn is_fullscreen_now(&self) -> bool {
        self.fullscreen.load(Ordering::SeqCst)
    }

    pub fn set_viewport_gap(&self, gap: ViewportGap) {
        self.scripted().gap = gap;
    }

    /// Makes every subsequent request fail with `Denied(reason)`.
    pub fn deny_requests(&self, reason: &str) {
        self.scripted().refusal = Some(FullscreenError::Denied(reason.to_string()));
    }

    /// Makes every subsequent request fail with `error`.
    pub fn fail_requests(&self, error: FullscreenError) {
        self.scripted().refusal = Some(error);
    }

    /// Grants subsequent requests again.
    pub fn allow_requests(&self) {
        self.scripted().refusal = None;
    }

    /// Delays each request by `delay` before it resolves.
    pub fn set_request_delay(&self, delay: Duration) {
        self.scripted().delay = delay;
    }

    pub fn request_count(&self) -> usize {
        self.requests.load(Ordering::SeqCst)
    }

    pub fn exit_count(&self) -> usize {
        self.exits.load(Ordering::SeqCst)
    }
}

impl EnvironmentQuery for FakeBrowser {
    fn is_fullscreen(&self) -> bool {
        self.is_fullscreen_now()
    }

    fn viewport_gap(&self) -> ViewportGap {
        self.scripted().gap
    }
}

#[async_trait]
impl FullscreenController for FakeBrowser {
    async fn request_fullscreen(&self) -> Result<(), FullscreenError> {
        self.requests.fetch_add(1, Ordering::SeqCst);

        let delay = self.scripted().delay;
        if !delay.is_zero() {
            sleep(delay).await;
        }

        // Read the refusal after the delay so tests can flip it mid-flight.
        let refusal = self.scripted().refusal.clone();
        if let Some(err) = refusal {
            return Err(err);
        }
        self.set_fullscreen(true);
        Ok(())
    }

    async fn exit_fullscreen(&self) -> Result<(), FullscreenError> {
        self.exits.fetch_add(1, Ordering::SeqCst);
        self.set_fullscreen(false);
        Ok(())
    }
}
