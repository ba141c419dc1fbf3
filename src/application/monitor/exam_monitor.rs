//! ExamMonitor - Host-facing facade composing the three subsystems.
//!
//! ```text
//! host ── start_exam ──► FullscreenLifecycleManager ──► ExamSession::start
//!                                                          │
//!                                    reconcile ◄───────────┘
//!                                        │
//! browser ── signals ──► EventGateway ──► ExamSession::record_violation ──► ExamHost
//! ```
//!
//! Locks are never held across an `.await` or a host callback.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError, Weak};

use tokio::time::Instant;

use crate::application::MonitorError;
use crate::domain::exam::{
    ExamError, ExamSession, ExamStatus, Notice, SessionSnapshot, ViolationOutcome, ViolationReason,
};
use crate::domain::foundation::MonitorId;
use crate::ports::ExamHost;

use super::{
    EventGateway, FullscreenLifecycleManager, GatewayTransition, MonitorConfig, MonitorPorts,
    Restore, StartMode, ViolationSink,
};

/// Result of `re_enter_full_screen`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReEntryOutcome {
    /// Document was already fullscreen; nothing was requested.
    AlreadyFullscreen,
    /// Fullscreen was requested and granted.
    Restored,
    /// The request failed and the exam was ended.
    Terminated,
    /// Security is off or the exam is not running; nothing to restore.
    Skipped,
}

struct MonitorCore {
    id: MonitorId,
    self_ref: Weak<MonitorCore>,
    session: Mutex<ExamSession>,
    host: Arc<dyn ExamHost>,
    gateway: EventGateway,
    fullscreen: FullscreenLifecycleManager,
    start_mode: StartMode,
    shut_down: AtomicBool,
}

impl MonitorCore {
    fn session(&self) -> MutexGuard<'_, ExamSession> {
        self.session.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn is_shut_down(&self) -> bool {
        self.shut_down.load(Ordering::SeqCst)
    }

    fn sink(&self) -> Weak<dyn ViolationSink> {
        let weak: Weak<dyn ViolationSink> = self.self_ref.clone();
        weak
    }

    /// Arms or disarms the gateway to match the session state.
    fn reconcile(&self) -> Result<GatewayTransition, MonitorError> {
        let transition = self.gateway.reconcile(
            || !self.is_shut_down() && self.session().is_monitoring_eligible(),
            &self.sink(),
        )?;
        match transition {
            GatewayTransition::Armed => {
                tracing::info!(monitor_id = %self.id, "Monitoring armed");
            }
            GatewayTransition::Disarmed => {
                tracing::info!(monitor_id = %self.id, "Monitoring disarmed");
            }
            GatewayTransition::Unchanged => {}
        }
        Ok(transition)
    }

    /// Reconcile on a path that cannot report errors to a caller.
    fn reconcile_quietly(&self) {
        if let Err(e) = self.reconcile() {
            tracing::error!(monitor_id = %self.id, error = %e, "Failed to reconcile monitoring");
        }
    }

    fn record_violation(&self, reason: ViolationReason) -> ViolationOutcome {
        let outcome = self
            .session()
            .record_violation(reason.clone(), Instant::now().into_std());

        match &outcome {
            ViolationOutcome::Warned(message) => {
                tracing::warn!(
                    monitor_id = %self.id,
                    count = message.count,
                    max = message.max_violations,
                    reason = %reason,
                    outcome = outcome.label(),
                    "Violation recorded"
                );
                self.host.on_warning(message);
            }
            ViolationOutcome::Terminated { count } => {
                tracing::info!(
                    monitor_id = %self.id,
                    count = *count,
                    reason = %reason,
                    "Violation limit exceeded, finishing exam"
                );
                self.reconcile_quietly();
                self.host.on_finish_exam();
            }
            ViolationOutcome::Debounced => {
                tracing::debug!(monitor_id = %self.id, reason = %reason, "Violation debounced");
            }
            ViolationOutcome::Ignored(because) => {
                tracing::debug!(
                    monitor_id = %self.id,
                    reason = %reason,
                    because = %because,
                    "Violation ignored"
                );
            }
        }

        outcome
    }
}

impl ViolationSink for MonitorCore {
    fn record(&self, reason: ViolationReason) {
        self.record_violation(reason);
    }

    fn notify(&self, notice: Notice) {
        self.host.on_notice(&notice);
    }
}

/// Exam lockdown monitor.
///
/// Construct one per exam attempt. Dropping the monitor releases every
/// listener and stops the probe.
///
/// # Example
///
/// ```ignore
/// let monitor = ExamMonitor::new(MonitorConfig::default(), ports)?;
/// monitor.start_exam().await?;
/// // host shows warnings via ExamHost::on_warning, then:
/// monitor.re_enter_full_screen().await;
/// ```
pub struct ExamMonitor {
    core: Arc<MonitorCore>,
}

impl ExamMonitor {
    /// Creates an unstarted monitor.
    ///
    /// # Errors
    ///
    /// - `InvalidConfig` if `max_violations` is zero
    pub fn new(config: MonitorConfig, ports: MonitorPorts) -> Result<Self, MonitorError> {
        let id = MonitorId::new();
        let mut session = ExamSession::new(id, config.max_violations, config.cooldown)?;
        session.set_security_enabled(config.security_enabled);
        session.set_suppressed(config.final_submission);

        let core = Arc::new_cyclic(|self_ref| MonitorCore {
            id,
            self_ref: self_ref.clone(),
            session: Mutex::new(session),
            host: ports.host,
            gateway: EventGateway::new(
                ports.signals,
                Arc::clone(&ports.environment),
                config.devtools,
            ),
            fullscreen: FullscreenLifecycleManager::new(ports.fullscreen, ports.environment),
            start_mode: config.start_mode,
            shut_down: AtomicBool::new(false),
        });

        tracing::debug!(
            monitor_id = %id,
            max_violations = config.max_violations,
            security_enabled = config.security_enabled,
            start_mode = ?config.start_mode,
            "Monitor created"
        );

        Ok(Self { core })
    }

    pub fn id(&self) -> MonitorId {
        self.core.id
    }

    /// Violation counter; -1 before the exam starts.
    pub fn violations(&self) -> i32 {
        self.core.session().violations()
    }

    pub fn status(&self) -> ExamStatus {
        self.core.session().status()
    }

    /// True while listeners are installed.
    pub fn is_monitoring(&self) -> bool {
        self.core.gateway.is_armed()
    }

    pub fn snapshot(&self) -> SessionSnapshot {
        self.core.session().snapshot()
    }

    /// Starts the exam.
    ///
    /// With security enabled in `RequestFullscreen` mode, fullscreen is
    /// requested first and the exam only starts once it is granted. Calling
    /// this on a running exam is a no-op.
    ///
    /// # Errors
    ///
    /// - `FullscreenRequired` if fullscreen was refused; the host got a
    ///   blocking notice and may retry
    /// - `Exam(AlreadyTerminated)` if the exam already ended
    /// - `ShutDown` if the monitor was shut down while waiting
    /// - `Integration` if listeners could not be installed
    pub async fn start_exam(&self) -> Result<(), MonitorError> {
        let core = &self.core;
        if core.is_shut_down() {
            return Err(MonitorError::ShutDown);
        }

        let needs_fullscreen = {
            let session = core.session();
            match session.status() {
                ExamStatus::Active => return Ok(()),
                ExamStatus::Terminated => return Err(ExamError::AlreadyTerminated.into()),
                ExamStatus::Unstarted => {}
            }
            session.security_enabled() && core.start_mode == StartMode::RequestFullscreen
        };

        if needs_fullscreen {
            if let Err(err) = core.fullscreen.enter().await {
                tracing::warn!(monitor_id = %core.id, error = %err, "Fullscreen refused at exam start");
                core.host.on_notice(&Notice::FullscreenRequired);
                return Err(MonitorError::FullscreenRequired(err));
            }
        }

        // The request may have resolved after teardown.
        if core.is_shut_down() {
            return Err(MonitorError::ShutDown);
        }

        if core.session().start()? {
            tracing::info!(monitor_id = %core.id, "Exam started");
        }
        core.reconcile()?;
        Ok(())
    }

    /// Asks for fullscreen again after a warning.
    ///
    /// Never fails: if fullscreen cannot be restored the exam is finished
    /// through `ExamHost::on_finish_exam` instead.
    pub async fn re_enter_full_screen(&self) -> ReEntryOutcome {
        let core = &self.core;
        let applicable = core.session().is_monitoring_eligible();
        if !applicable || core.is_shut_down() {
            return ReEntryOutcome::Skipped;
        }

        match core.fullscreen.restore().await {
            Ok(Restore::AlreadyFullscreen) => ReEntryOutcome::AlreadyFullscreen,
            Ok(Restore::Restored) => {
                tracing::info!(monitor_id = %core.id, "Fullscreen restored");
                ReEntryOutcome::Restored
            }
            Err(err) => {
                if core.is_shut_down() {
                    return ReEntryOutcome::Skipped;
                }
                // The session may have changed while the request was pending.
                {
                    let mut session = core.session();
                    if !session.is_monitoring_eligible() {
                        tracing::debug!(
                            monitor_id = %core.id,
                            error = %err,
                            "Fullscreen refused after monitoring stopped, ignoring"
                        );
                        return ReEntryOutcome::Skipped;
                    }
                    if !session.terminate() {
                        return ReEntryOutcome::Skipped;
                    }
                }
                tracing::warn!(
                    monitor_id = %core.id,
                    error = %err,
                    "Fullscreen could not be restored, finished exam"
                );
                core.reconcile_quietly();
                core.host.on_finish_exam();
                ReEntryOutcome::Terminated
            }
        }
    }

    /// Leaves fullscreen, typically after the host finished submission.
    ///
    /// Returns whether an exit request was made.
    pub async fn exit_full_screen(&self) -> Result<bool, MonitorError> {
        self.core
            .fullscreen
            .leave()
            .await
            .map_err(MonitorError::Fullscreen)
    }

    /// Feeds a violation detected outside the gateway (host-side checks).
    pub fn record_violation(&self, reason: ViolationReason) -> ViolationOutcome {
        self.core.record_violation(reason)
    }

    /// Turns lockdown on or off mid-exam.
    pub fn set_security_enabled(&self, enabled: bool) -> Result<(), MonitorError> {
        self.core.session().set_security_enabled(enabled);
        self.core.reconcile()?;
        Ok(())
    }

    /// Marks final submission; monitoring stops and the counter is kept.
    pub fn set_final_submission(&self, active: bool) -> Result<(), MonitorError> {
        self.core.session().set_suppressed(active);
        self.core.reconcile()?;
        Ok(())
    }

    /// Releases every listener and stops the probe. Idempotent.
    pub fn shutdown(&self) {
        if !self.core.shut_down.swap(true, Ordering::SeqCst) {
            self.core.gateway.disarm();
            tracing::debug!(monitor_id = %self.core.id, "Monitor shut down");
        }
    }
}

impl Drop for ExamMonitor {
    fn drop(&mut self) {
        self.shutdown();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::{FakeBrowser, HostEvent, InMemorySignalBus, RecordingHost};
    use crate::application::monitor::DevToolsProbe;
    use crate::domain::exam::{BrowserSignal, IgnoredBecause};
    use std::time::Duration;

    struct Harness {
        browser: Arc<FakeBrowser>,
        bus: Arc<InMemorySignalBus>,
        host: Arc<RecordingHost>,
        monitor: ExamMonitor,
    }

    fn harness(config: MonitorConfig) -> Harness {
        let browser = Arc::new(FakeBrowser::new());
        let bus = Arc::new(InMemorySignalBus::new());
        let host = Arc::new(RecordingHost::new());
        let monitor = ExamMonitor::new(
            config.with_devtools(DevToolsProbe::disabled()),
            MonitorPorts {
                environment: browser.clone(),
                fullscreen: browser.clone(),
                signals: bus.clone(),
                host: host.clone(),
            },
        )
        .unwrap();
        Harness {
            browser,
            bus,
            host,
            monitor,
        }
    }

    #[tokio::test]
    async fn start_requests_fullscreen_then_arms() {
        let h = harness(MonitorConfig::default());
        assert_eq!(h.monitor.violations(), -1);

        h.monitor.start_exam().await.unwrap();

        assert_eq!(h.browser.request_count(), 1);
        assert_eq!(h.monitor.violations(), 0);
        assert_eq!(h.monitor.status(), ExamStatus::Active);
        assert!(h.monitor.is_monitoring());
    }

    #[tokio::test]
    async fn denied_start_blocks_and_can_be_retried() {
        let h = harness(MonitorConfig::default());
        h.browser.deny_requests("no gesture");

        let err = h.monitor.start_exam().await.unwrap_err();
        assert!(err.is_retryable());
        assert_eq!(h.monitor.violations(), -1);
        assert!(!h.monitor.is_monitoring());
        assert_eq!(h.host.events(), vec![HostEvent::Notice(Notice::FullscreenRequired)]);

        h.browser.allow_requests();
        h.monitor.start_exam().await.unwrap();
        assert_eq!(h.monitor.violations(), 0);
    }

    #[tokio::test]
    async fn start_without_security_skips_fullscreen_and_listeners() {
        let h = harness(MonitorConfig::default().with_security_enabled(false));

        h.monitor.start_exam().await.unwrap();

        assert_eq!(h.browser.request_count(), 0);
        assert_eq!(h.monitor.violations(), 0);
        assert!(!h.monitor.is_monitoring());
        assert_eq!(h.bus.listener_count(), 0);
    }

    #[tokio::test]
    async fn arm_only_mode_does_not_request() {
        let h = harness(MonitorConfig::default().with_start_mode(StartMode::ArmOnly));

        h.monitor.start_exam().await.unwrap();

        assert_eq!(h.browser.request_count(), 0);
        assert!(h.monitor.is_monitoring());
    }

    #[tokio::test]
    async fn second_start_is_a_no_op() {
        let h = harness(MonitorConfig::default());
        h.monitor.start_exam().await.unwrap();
        h.monitor.record_violation(ViolationReason::switched_tabs());

        h.monitor.start_exam().await.unwrap();
        assert_eq!(h.browser.request_count(), 1);
        assert_eq!(h.monitor.violations(), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn termination_disarms_and_finishes_once() {
        let h = harness(MonitorConfig::default().with_max_violations(1));
        h.monitor.start_exam().await.unwrap();

        h.bus.emit(&BrowserSignal::VisibilityChanged { hidden: true });
        tokio::time::sleep(Duration::from_millis(600)).await;
        h.bus.emit(&BrowserSignal::VisibilityChanged { hidden: true });

        assert_eq!(h.host.finish_count(), 1);
        assert_eq!(h.monitor.status(), ExamStatus::Terminated);
        assert!(!h.monitor.is_monitoring());
        assert_eq!(h.bus.listener_count(), 0);

        tokio::time::sleep(Duration::from_millis(600)).await;
        let late = h.monitor.record_violation(ViolationReason::switched_window());
        assert_eq!(late, ViolationOutcome::Ignored(IgnoredBecause::AlreadyTerminated));
        assert_eq!(h.host.finish_count(), 1);
    }

    #[tokio::test]
    async fn start_after_termination_is_rejected() {
        let h = harness(MonitorConfig::default().with_max_violations(1));
        h.monitor.start_exam().await.unwrap();
        h.browser.set_fullscreen(false);
        h.browser.deny_requests("closed");
        assert_eq!(h.monitor.re_enter_full_screen().await, ReEntryOutcome::Terminated);

        let err = h.monitor.start_exam().await.unwrap_err();
        assert!(matches!(err, MonitorError::Exam(ExamError::AlreadyTerminated)));
    }

    #[tokio::test]
    async fn re_entry_before_start_is_skipped() {
        let h = harness(MonitorConfig::default());
        assert_eq!(h.monitor.re_enter_full_screen().await, ReEntryOutcome::Skipped);
        assert_eq!(h.browser.request_count(), 0);
    }

    #[tokio::test]
    async fn toggling_security_arms_and_disarms() {
        let h = harness(MonitorConfig::default());
        h.monitor.start_exam().await.unwrap();

        h.monitor.set_security_enabled(false).unwrap();
        assert!(!h.monitor.is_monitoring());

        h.monitor.set_security_enabled(true).unwrap();
        assert!(h.monitor.is_monitoring());
        assert_eq!(h.bus.subscription_count(), 1);
    }

    #[tokio::test]
    async fn shutdown_releases_listeners_and_blocks_start() {
        let h = harness(MonitorConfig::default());
        h.monitor.start_exam().await.unwrap();

        h.monitor.shutdown();
        h.monitor.shutdown();

        assert_eq!(h.bus.listener_count(), 0);
        assert!(matches!(h.monitor.start_exam().await, Err(MonitorError::ShutDown)));
        assert!(!h.monitor.is_monitoring());
        h.monitor.set_security_enabled(true).unwrap();
        assert!(!h.monitor.is_monitoring(), "shut down monitors never re-arm");
    }

    #[tokio::test]
    async fn dropping_the_monitor_releases_listeners() {
        let h = harness(MonitorConfig::default());
        h.monitor.start_exam().await.unwrap();
        let bus = h.bus.clone();

        drop(h.monitor);
        assert_eq!(bus.listener_count(), 0);
    }

    #[tokio::test]
    async fn suppressed_actions_surface_as_notices_without_counting() {
        let h = harness(MonitorConfig::default());
        h.monitor.start_exam().await.unwrap();

        h.bus.emit(&BrowserSignal::ContextMenu);
        h.bus.emit(&BrowserSignal::SelectionStarted);

        assert_eq!(h.monitor.violations(), 0);
        assert_eq!(h.host.notices().len(), 2);
        assert!(h.host.warnings().is_empty());
    }

    #[tokio::test]
    async fn exit_full_screen_leaves_only_when_fullscreen() {
        let h = harness(MonitorConfig::default());
        h.monitor.start_exam().await.unwrap();

        assert!(h.monitor.exit_full_screen().await.unwrap());
        assert!(!h.monitor.exit_full_screen().await.unwrap());
        assert_eq!(h.browser.exit_count(), 1);
    }
}
