//! In-memory signal bus.
//!
//! Stands in for the DOM's `addEventListener`: tests and the scenario
//! replayer `emit` signals, the bus dispatches them synchronously to every
//! registration that covers the signal's kind.

use std::collections::BTreeMap;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::{Arc, PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard, Weak};

use crate::domain::exam::{BrowserSignal, SignalKind};
use crate::domain::foundation::{DomainError, ErrorCode};
use crate::ports::{SignalHandler, SignalRegistration, SignalResponse, SignalSource};

struct Listener {
    kinds: Vec<SignalKind>,
    handler: Arc<dyn SignalHandler>,
}

#[derive(Default)]
struct BusState {
    listeners: RwLock<BTreeMap<u64, Listener>>,
    next_id: AtomicU64,
    fail_next_subscribe: AtomicBool,
}

impl BusState {
    fn read(&self) -> RwLockReadGuard<'_, BTreeMap<u64, Listener>> {
        self.listeners.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn write(&self) -> RwLockWriteGuard<'_, BTreeMap<u64, Listener>> {
        self.listeners.write().unwrap_or_else(PoisonError::into_inner)
    }
}

/// Synchronous, in-process signal source.
///
/// Features:
/// - Dispatch in registration order
/// - Handlers are cloned out before dispatch, so a handler may drop its own
///   registration while running
/// - Listener counts for assertions
///
/// # Example
///
/// ```ignore
/// let bus = Arc::new(InMemorySignalBus::new());
/// let registration = bus.subscribe(&SignalKind::ALL, handler)?;
///
/// let response = bus.emit(&BrowserSignal::ContextMenu);
/// assert!(response.prevent_default);
/// ```
#[derive(Default)]
pub struct InMemorySignalBus {
    state: Arc<BusState>,
}

impl InMemorySignalBus {
    /// Creates a bus with no listeners.
    pub fn new() -> Self {
        Self::default()
    }

    /// Delivers `signal` to every matching handler.
    ///
    /// The combined response prevents the default action if any handler
    /// asked for it.
    pub fn emit(&self, signal: &BrowserSignal) -> SignalResponse {
        let kind = signal.kind();
        let handlers: Vec<Arc<dyn SignalHandler>> = self
            .state
            .read()
            .values()
            .filter(|l| l.kinds.contains(&kind))
            .map(|l| Arc::clone(&l.handler))
            .collect();

        let prevent_default = handlers
            .iter()
            .fold(false, |prevent, handler| handler.handle(signal).prevent_default || prevent);

        SignalResponse { prevent_default }
    }

    // === Test Helpers ===

    /// Number of live registrations.
    pub fn subscription_count(&self) -> usize {
        self.state.read().len()
    }

    /// Number of individual (registration, kind) listeners.
    pub fn listener_count(&self) -> usize {
        self.state.read().values().map(|l| l.kinds.len()).sum()
    }

    /// Makes the next `subscribe` call fail, as a browser would on a
    /// detached document.
    pub fn fail_next_subscribe(&self) {
        self.state.fail_next_subscribe.store(true, Ordering::SeqCst);
    }
}

impl SignalSource for InMemorySignalBus {
    fn subscribe(
        &self,
        kinds: &[SignalKind],
        handler: Arc<dyn SignalHandler>,
    ) -> Result<Box<dyn SignalRegistration>, DomainError> {
        if self.state.fail_next_subscribe.swap(false, Ordering::SeqCst) {
            return Err(DomainError::new(
                ErrorCode::SubscriptionFailed,
                "Listener registration rejected",
            ));
        }

        let id = self.state.next_id.fetch_add(1, Ordering::SeqCst);
        self.state.write().insert(
            id,
            Listener {
                kinds: kinds.to_vec(),
                handler,
            },
        );

        Ok(Box::new(BusRegistration {
            id,
            kinds: kinds.to_vec(),
            state: Arc::downgrade(&self.state),
        }))
    }
}

struct BusRegistration {
    id: u64,
    kinds: Vec<SignalKind>,
    state: Weak<BusState>,
}

impl SignalRegistration for BusRegistration {
    fn kinds(&self) -> &[SignalKind] {
        &self.kinds
    }
}

impl Drop for BusRegistration {
    fn drop(&mut self) {
        if let Some(state) = self.state.upgrade() {
            state.write().remove(&self.id);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::AtomicUsize;
    use std::sync::Mutex;

    struct CountingHandler {
        calls: AtomicUsize,
        prevent: bool,
    }

    impl CountingHandler {
        fn new(prevent: bool) -> Arc<Self> {
            Arc::new(Self {
                calls: AtomicUsize::new(0),
                prevent,
            })
        }

        fn calls(&self) -> usize {
            self.calls.load(Ordering::SeqCst)
        }
    }

    impl SignalHandler for CountingHandler {
        fn handle(&self, _signal: &BrowserSignal) -> SignalResponse {
            self.calls.fetch_add(1, Ordering::SeqCst);
            SignalResponse {
                prevent_default: self.prevent,
            }
        }
    }

    #[test]
    fn emit_reaches_only_matching_kinds() {
        let bus = InMemorySignalBus::new();
        let handler = CountingHandler::new(false);
        let _reg = bus.subscribe(&[SignalKind::Focus], handler.clone()).unwrap();

        bus.emit(&BrowserSignal::WindowBlurred);
        bus.emit(&BrowserSignal::ContextMenu);

        assert_eq!(handler.calls(), 1);
    }

    #[test]
    fn any_handler_can_prevent_default() {
        let bus = InMemorySignalBus::new();
        let _a = bus.subscribe(&SignalKind::ALL, CountingHandler::new(false)).unwrap();
        let _b = bus.subscribe(&SignalKind::ALL, CountingHandler::new(true)).unwrap();

        assert!(bus.emit(&BrowserSignal::DragStarted).prevent_default);
    }

    #[test]
    fn dropping_registration_unsubscribes() {
        let bus = InMemorySignalBus::new();
        let handler = CountingHandler::new(false);
        let reg = bus.subscribe(&SignalKind::ALL, handler.clone()).unwrap();
        assert_eq!(bus.listener_count(), 8);
        assert_eq!(reg.kinds().len(), 8);

        drop(reg);
        bus.emit(&BrowserSignal::ContextMenu);

        assert_eq!(bus.subscription_count(), 0);
        assert_eq!(handler.calls(), 0);
    }

    #[test]
    fn fail_next_subscribe_fails_once() {
        let bus = InMemorySignalBus::new();
        bus.fail_next_subscribe();

        let err = bus.subscribe(&SignalKind::ALL, CountingHandler::new(false)).err().unwrap();
        assert_eq!(err.code, ErrorCode::SubscriptionFailed);
        assert!(bus.subscribe(&SignalKind::ALL, CountingHandler::new(false)).is_ok());
    }

    /// Handler that drops its own registration on first call.
    struct SelfRemoving {
        registration: Mutex<Option<Box<dyn SignalRegistration>>>,
        calls: AtomicUsize,
    }

    impl SignalHandler for SelfRemoving {
        fn handle(&self, _signal: &BrowserSignal) -> SignalResponse {
            self.calls.fetch_add(1, Ordering::SeqCst);
            self.registration.lock().unwrap().take();
            SignalResponse::proceed()
        }
    }

    #[test]
    fn handler_may_unsubscribe_during_dispatch() {
        let bus = InMemorySignalBus::new();
        let handler = Arc::new(SelfRemoving {
            registration: Mutex::new(None),
            calls: AtomicUsize::new(0),
        });
        let reg = bus.subscribe(&SignalKind::ALL, handler.clone()).unwrap();
        *handler.registration.lock().unwrap() = Some(reg);

        bus.emit(&BrowserSignal::ContextMenu);
        bus.emit(&BrowserSignal::ContextMenu);

        assert_eq!(handler.calls.load(Ordering::SeqCst), 1);
        assert_eq!(bus.listener_count(), 0);
    }
}
