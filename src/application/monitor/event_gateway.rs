//! EventGateway - Owns the listener set and the developer-tools probe.
//!
//! The gateway is armed while the session is monitoring-eligible and
//! disarmed otherwise. Arming installs every listener and starts the probe
//! as one unit; disarming drops the [`ActiveSubscription`], which removes the
//! listeners and aborts the probe together.

use std::sync::{Arc, Mutex, MutexGuard, PoisonError, Weak};

use tokio::runtime::Handle;
use tokio::task::JoinHandle;
use tokio::time::{self, Instant, MissedTickBehavior};

use crate::domain::exam::{classify, BrowserSignal, Classification, Notice, SignalKind, ViolationReason};
use crate::domain::foundation::{DomainError, ErrorCode};
use crate::ports::{
    EnvironmentQuery, SignalHandler, SignalRegistration, SignalResponse, SignalSource,
};

use super::DevToolsProbe;

/// Receiver of classified signals (the violation state machine side).
pub trait ViolationSink: Send + Sync {
    /// A candidate violation.
    fn record(&self, reason: ViolationReason);

    /// A suppressed action the candidate should be told about.
    fn notify(&self, notice: Notice);
}

/// What a reconcile pass did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GatewayTransition {
    Armed,
    Disarmed,
    Unchanged,
}

/// Listener registration plus probe task, released together on drop.
pub struct ActiveSubscription {
    registration: Box<dyn SignalRegistration>,
    probe: Option<JoinHandle<()>>,
}

impl ActiveSubscription {
    pub fn kinds(&self) -> &[SignalKind] {
        self.registration.kinds()
    }

    pub fn has_probe(&self) -> bool {
        self.probe.is_some()
    }
}

impl Drop for ActiveSubscription {
    fn drop(&mut self) {
        if let Some(probe) = self.probe.take() {
            probe.abort();
        }
    }
}

/// Translates raw signals into suppressions and candidate violations.
struct GatewayHandler {
    environment: Arc<dyn EnvironmentQuery>,
    sink: Weak<dyn ViolationSink>,
}

impl SignalHandler for GatewayHandler {
    fn handle(&self, signal: &BrowserSignal) -> SignalResponse {
        let Some(sink) = self.sink.upgrade() else {
            return SignalResponse::proceed();
        };

        let classification = classify(signal, self.environment.is_fullscreen());
        let response = SignalResponse {
            prevent_default: classification.prevents_default(),
        };

        match classification {
            Classification::Suppress(action) => {
                tracing::debug!(kind = %signal.kind(), action = %action, "Suppressed action");
                sink.notify(Notice::ActionDisabled(action));
            }
            Classification::Violation { reason, .. } => {
                sink.record(reason);
            }
            Classification::Ignore => {}
        }

        response
    }
}

/// Owner of the subscription set.
pub struct EventGateway {
    source: Arc<dyn SignalSource>,
    environment: Arc<dyn EnvironmentQuery>,
    probe: DevToolsProbe,
    active: Mutex<Option<ActiveSubscription>>,
}

impl EventGateway {
    pub fn new(
        source: Arc<dyn SignalSource>,
        environment: Arc<dyn EnvironmentQuery>,
        probe: DevToolsProbe,
    ) -> Self {
        Self {
            source,
            environment,
            probe,
            active: Mutex::new(None),
        }
    }

    fn active(&self) -> MutexGuard<'_, Option<ActiveSubscription>> {
        self.active.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Returns true while listeners are installed.
    pub fn is_armed(&self) -> bool {
        self.active().is_some()
    }

    /// Brings the subscription set in line with `is_eligible`.
    ///
    /// `is_eligible` is evaluated while the gateway lock is held so that two
    /// concurrent reconciles cannot both arm. Arming is all-or-nothing: if
    /// registration or probe scheduling fails nothing stays installed.
    pub fn reconcile<F>(
        &self,
        is_eligible: F,
        sink: &Weak<dyn ViolationSink>,
    ) -> Result<GatewayTransition, DomainError>
    where
        F: FnOnce() -> bool,
    {
        let released = {
            let mut active = self.active();
            let eligible = is_eligible();
            match (eligible, active.is_some()) {
                (true, false) => {
                    *active = Some(self.acquire(sink)?);
                    return Ok(GatewayTransition::Armed);
                }
                (false, true) => active.take(),
                _ => return Ok(GatewayTransition::Unchanged),
            }
        };
        // Dropped outside the lock: the signal source may need its own lock.
        drop(released);
        Ok(GatewayTransition::Disarmed)
    }

    /// Unconditionally removes listeners and stops the probe.
    pub fn disarm(&self) -> bool {
        let released = self.active().take();
        released.is_some()
    }

    fn acquire(&self, sink: &Weak<dyn ViolationSink>) -> Result<ActiveSubscription, DomainError> {
        let handler: Arc<dyn SignalHandler> = Arc::new(GatewayHandler {
            environment: Arc::clone(&self.environment),
            sink: sink.clone(),
        });
        let registration = self.source.subscribe(&SignalKind::ALL, handler)?;

        let probe = if self.probe.enabled {
            let runtime = Handle::try_current().map_err(|e| {
                DomainError::new(
                    ErrorCode::InternalError,
                    format!("Developer tools probe needs a Tokio runtime: {}", e),
                )
                .with_detail("component", "devtools_probe")
            })?;
            Some(runtime.spawn(run_devtools_probe(
                Arc::clone(&self.environment),
                sink.clone(),
                self.probe,
            )))
        } else {
            None
        };

        Ok(ActiveSubscription {
            registration,
            probe,
        })
    }
}

impl Drop for EventGateway {
    fn drop(&mut self) {
        self.disarm();
    }
}

async fn run_devtools_probe(
    environment: Arc<dyn EnvironmentQuery>,
    sink: Weak<dyn ViolationSink>,
    probe: DevToolsProbe,
) {
    let mut ticker = time::interval_at(Instant::now() + probe.interval, probe.interval);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

    loop {
        ticker.tick().await;
        let Some(sink) = sink.upgrade() else {
            break;
        };
        let gap = environment.viewport_gap();
        if gap.exceeds(probe.threshold_px) {
            tracing::debug!(
                width = gap.width,
                height = gap.height,
                threshold = probe.threshold_px,
                "Viewport gap suggests developer tools"
            );
            sink.record(ViolationReason::developer_tools_opened());
        }
    }
}
