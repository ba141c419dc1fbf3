//! Integration tests for the exam monitor lifecycle.
//!
//! These tests drive a real `ExamMonitor` through the in-memory adapters:
//! 1. Start (fullscreen request, arming)
//! 2. Violations through browser signals (classification, debounce, warnings)
//! 3. Termination (teardown, single finish callback)
//! 4. Fullscreen re-entry and the dev-tools probe
//!
//! Time is paused so the 500ms cool-down and the 1s probe are deterministic.

use std::sync::Arc;
use std::time::Duration;
use tokio::time::sleep;

use exam_lockdown::adapters::{FakeBrowser, HostEvent, InMemorySignalBus, RecordingHost};
use exam_lockdown::application::{
    DevToolsProbe, ExamMonitor, MonitorConfig, MonitorError, MonitorPorts, ReEntryOutcome,
};
use exam_lockdown::domain::exam::{
    BrowserSignal, ClipboardAction, ExamStatus, IgnoredBecause, KeyChord, Notice, SuppressedAction,
    ViewportGap, ViolationOutcome, ViolationReason, WarningLevel,
};

// =============================================================================
// Test Infrastructure
// =============================================================================

const PAST_COOLDOWN: Duration = Duration::from_millis(600);

struct Exam {
    browser: Arc<FakeBrowser>,
    bus: Arc<InMemorySignalBus>,
    host: Arc<RecordingHost>,
    monitor: ExamMonitor,
}

impl Exam {
    fn new(config: MonitorConfig) -> Self {
        let browser = Arc::new(FakeBrowser::new());
        let bus = Arc::new(InMemorySignalBus::new());
        let host = Arc::new(RecordingHost::new());
        let monitor = ExamMonitor::new(
            config,
            MonitorPorts {
                environment: browser.clone(),
                fullscreen: browser.clone(),
                signals: bus.clone(),
                host: host.clone(),
            },
        )
        .expect("valid config");
        Self {
            browser,
            bus,
            host,
            monitor,
        }
    }

    fn without_probe() -> Self {
        Self::new(MonitorConfig::default().with_devtools(DevToolsProbe::disabled()))
    }

    async fn started(config: MonitorConfig) -> Self {
        let exam = Self::new(config);
        exam.monitor.start_exam().await.expect("exam starts");
        exam
    }

    fn levels(&self) -> Vec<(WarningLevel, u32)> {
        self.host
            .warnings()
            .iter()
            .map(|w| (w.level, w.count))
            .collect()
    }
}

fn no_probe() -> MonitorConfig {
    MonitorConfig::default().with_devtools(DevToolsProbe::disabled())
}

// =============================================================================
// Counting
// =============================================================================

#[tokio::test(start_paused = true)]
async fn three_strikes_then_submission() {
    let exam = Exam::started(no_probe()).await;
    assert_eq!(exam.monitor.violations(), 0);

    // Switched tabs.
    exam.bus.emit(&BrowserSignal::VisibilityChanged { hidden: true });
    assert_eq!(exam.monitor.violations(), 1);
    sleep(PAST_COOLDOWN).await;

    // Exited fullscreen, then came back.
    exam.browser.set_fullscreen(false);
    exam.bus.emit(&BrowserSignal::FullscreenChanged);
    assert_eq!(
        exam.monitor.re_enter_full_screen().await,
        ReEntryOutcome::Restored
    );
    sleep(PAST_COOLDOWN).await;

    // Restricted shortcut.
    let response = exam
        .bus
        .emit(&BrowserSignal::KeyPressed(KeyChord::key("n").with_ctrl()));
    assert!(response.prevent_default);
    assert_eq!(exam.host.finish_count(), 0);
    sleep(PAST_COOLDOWN).await;

    // Switched window.
    exam.bus.emit(&BrowserSignal::WindowBlurred);

    assert_eq!(
        exam.levels(),
        vec![
            (WarningLevel::Warning, 1),
            (WarningLevel::Warning, 2),
            (WarningLevel::FinalWarning, 3),
        ]
    );
    assert_eq!(exam.host.finish_count(), 1);
    assert_eq!(exam.monitor.violations(), 4);
    assert_eq!(exam.monitor.status(), ExamStatus::Terminated);
    assert_eq!(exam.bus.listener_count(), 0);

    let reasons: Vec<String> = exam
        .monitor
        .snapshot()
        .log
        .iter()
        .map(|r| r.reason.to_string())
        .collect();
    assert_eq!(
        reasons,
        vec![
            "switched tabs",
            "exited fullscreen",
            "tried to open a new window",
            "switched window",
        ]
    );
}

#[tokio::test(start_paused = true)]
async fn finish_is_the_last_callback() {
    let exam = Exam::started(no_probe().with_max_violations(1)).await;

    exam.monitor.record_violation(ViolationReason::switched_tabs());
    sleep(PAST_COOLDOWN).await;
    exam.monitor.record_violation(ViolationReason::switched_tabs());
    sleep(PAST_COOLDOWN).await;
    exam.bus.emit(&BrowserSignal::VisibilityChanged { hidden: true });

    let events = exam.host.events();
    assert_eq!(events.len(), 2);
    assert!(matches!(events[0], HostEvent::Warning(_)));
    assert_eq!(events[1], HostEvent::Finished);
}

#[tokio::test(start_paused = true)]
async fn burst_inside_one_window_counts_once() {
    let exam = Exam::started(no_probe()).await;

    for _ in 0..10 {
        exam.bus.emit(&BrowserSignal::VisibilityChanged { hidden: true });
        sleep(Duration::from_millis(40)).await;
    }

    assert_eq!(exam.monitor.violations(), 1);
    assert_eq!(exam.host.warnings().len(), 1);
}

#[tokio::test(start_paused = true)]
async fn blur_and_fullscreen_exit_together_count_once() {
    let exam = Exam::started(no_probe()).await;

    // Alt-Tab out of fullscreen fires both events back to back.
    exam.bus.emit(&BrowserSignal::WindowBlurred);
    exam.browser.set_fullscreen(false);
    exam.bus.emit(&BrowserSignal::FullscreenChanged);

    assert_eq!(exam.monitor.violations(), 1);
}

#[tokio::test(start_paused = true)]
async fn cooldown_reopens_after_half_a_second() {
    let exam = Exam::started(no_probe()).await;

    exam.bus.emit(&BrowserSignal::VisibilityChanged { hidden: true });
    sleep(Duration::from_millis(499)).await;
    exam.bus.emit(&BrowserSignal::VisibilityChanged { hidden: true });
    assert_eq!(exam.monitor.violations(), 1);

    sleep(Duration::from_millis(2)).await;
    exam.bus.emit(&BrowserSignal::VisibilityChanged { hidden: true });
    assert_eq!(exam.monitor.violations(), 2);
}

// =============================================================================
// Suppression and gating
// =============================================================================

#[tokio::test]
async fn suppressed_actions_never_count() {
    let exam = Exam::started(no_probe()).await;

    let responses = [
        exam.bus.emit(&BrowserSignal::Clipboard {
            action: ClipboardAction::Copy,
        }),
        exam.bus.emit(&BrowserSignal::ContextMenu),
        exam.bus.emit(&BrowserSignal::DragStarted),
    ];

    assert!(responses.iter().all(|r| r.prevent_default));
    assert_eq!(exam.monitor.violations(), 0);
    assert_eq!(
        exam.host.notices(),
        vec![
            Notice::ActionDisabled(SuppressedAction::Copy),
            Notice::ActionDisabled(SuppressedAction::ContextMenu),
            Notice::ActionDisabled(SuppressedAction::Drag),
        ]
    );
}

#[tokio::test]
async fn security_disabled_means_no_listeners_and_no_callbacks() {
    let exam = Exam::started(no_probe().with_security_enabled(false)).await;

    assert_eq!(exam.bus.subscription_count(), 0);
    exam.bus.emit(&BrowserSignal::VisibilityChanged { hidden: true });
    exam.bus.emit(&BrowserSignal::ContextMenu);

    assert!(exam.host.events().is_empty());
    assert_eq!(exam.monitor.violations(), 0);
    assert_eq!(
        exam.monitor.record_violation(ViolationReason::switched_tabs()),
        ViolationOutcome::Ignored(IgnoredBecause::SecurityDisabled)
    );
}

#[tokio::test(start_paused = true)]
async fn final_submission_tears_down_and_keeps_the_count() {
    let exam = Exam::started(no_probe()).await;
    exam.bus.emit(&BrowserSignal::VisibilityChanged { hidden: true });
    sleep(PAST_COOLDOWN).await;

    exam.monitor.set_final_submission(true).unwrap();

    assert!(!exam.monitor.is_monitoring());
    assert_eq!(exam.bus.listener_count(), 0);
    exam.bus.emit(&BrowserSignal::VisibilityChanged { hidden: true });
    assert_eq!(
        exam.monitor.record_violation(ViolationReason::switched_window()),
        ViolationOutcome::Ignored(IgnoredBecause::FinalSubmission)
    );
    assert_eq!(exam.monitor.violations(), 1);
    assert_eq!(exam.monitor.re_enter_full_screen().await, ReEntryOutcome::Skipped);

    exam.monitor.set_final_submission(false).unwrap();
    assert!(exam.monitor.is_monitoring());
    assert_eq!(exam.bus.subscription_count(), 1);
}

#[tokio::test]
async fn violations_before_start_are_ignored() {
    let exam = Exam::without_probe();

    assert_eq!(exam.monitor.violations(), -1);
    assert_eq!(
        exam.monitor.record_violation(ViolationReason::switched_tabs()),
        ViolationOutcome::Ignored(IgnoredBecause::NotStarted)
    );
    assert_eq!(exam.monitor.violations(), -1);
    assert_eq!(exam.bus.listener_count(), 0);
}

// =============================================================================
// Fullscreen
// =============================================================================

#[tokio::test]
async fn re_entry_while_fullscreen_is_a_no_op() {
    let exam = Exam::started(no_probe()).await;
    let requests = exam.browser.request_count();

    assert_eq!(
        exam.monitor.re_enter_full_screen().await,
        ReEntryOutcome::AlreadyFullscreen
    );
    assert_eq!(exam.browser.request_count(), requests);
    assert!(exam.host.events().is_empty());
}

#[tokio::test]
async fn rejected_re_entry_finishes_exactly_once() {
    let exam = Exam::started(no_probe()).await;
    exam.browser.set_fullscreen(false);
    exam.browser.deny_requests("permission revoked");

    assert_eq!(
        exam.monitor.re_enter_full_screen().await,
        ReEntryOutcome::Terminated
    );
    assert_eq!(exam.monitor.re_enter_full_screen().await, ReEntryOutcome::Skipped);

    assert_eq!(exam.host.events(), vec![HostEvent::Finished]);
    assert_eq!(exam.monitor.status(), ExamStatus::Terminated);
    assert_eq!(exam.monitor.violations(), 0, "termination by refusal is not a violation");
    assert_eq!(exam.bus.listener_count(), 0);
}

#[tokio::test(start_paused = true)]
async fn refusal_after_final_submission_does_not_finish() {
    let exam = Exam::started(no_probe()).await;
    exam.browser.set_fullscreen(false);
    exam.browser.set_request_delay(Duration::from_secs(1));
    exam.browser.deny_requests("dismissed");

    let (outcome, ()) = tokio::join!(exam.monitor.re_enter_full_screen(), async {
        sleep(Duration::from_millis(10)).await;
        exam.monitor.set_final_submission(true).unwrap();
    });

    assert_eq!(outcome, ReEntryOutcome::Skipped);
    assert_eq!(exam.host.finish_count(), 0);
    assert_eq!(exam.monitor.status(), ExamStatus::Active);
}

#[tokio::test(start_paused = true)]
async fn refusal_after_security_disabled_does_not_finish() {
    let exam = Exam::started(no_probe()).await;
    exam.browser.set_fullscreen(false);
    exam.browser.set_request_delay(Duration::from_secs(1));
    exam.browser.deny_requests("dismissed");

    let (outcome, ()) = tokio::join!(exam.monitor.re_enter_full_screen(), async {
        sleep(Duration::from_millis(10)).await;
        exam.monitor.set_security_enabled(false).unwrap();
    });

    assert_eq!(outcome, ReEntryOutcome::Skipped);
    assert!(exam.host.events().is_empty());
    assert_eq!(exam.monitor.status(), ExamStatus::Active);
    assert_eq!(exam.bus.listener_count(), 0);
}

#[tokio::test]
async fn refused_start_shows_blocking_notice() {
    let exam = Exam::without_probe();
    exam.browser.deny_requests("no user gesture");

    let err = exam.monitor.start_exam().await.unwrap_err();

    assert!(matches!(err, MonitorError::FullscreenRequired(_)));
    assert_eq!(exam.monitor.status(), ExamStatus::Unstarted);
    let notices = exam.host.notices();
    assert_eq!(notices, vec![Notice::FullscreenRequired]);
    assert!(notices[0].is_blocking());
}

#[tokio::test(start_paused = true)]
async fn shutdown_while_request_pending_aborts_start() {
    let exam = Exam::without_probe();
    exam.browser.set_request_delay(Duration::from_secs(1));

    let (result, ()) = tokio::join!(exam.monitor.start_exam(), async {
        sleep(Duration::from_millis(100)).await;
        exam.monitor.shutdown();
    });

    assert!(matches!(result, Err(MonitorError::ShutDown)));
    assert_eq!(exam.monitor.status(), ExamStatus::Unstarted);
    assert_eq!(exam.bus.listener_count(), 0);
}

// =============================================================================
// Dev-tools probe
// =============================================================================

#[tokio::test(start_paused = true)]
async fn probe_reports_docked_dev_tools_every_interval() {
    let exam = Exam::started(MonitorConfig::default()).await;
    exam.browser.set_viewport_gap(ViewportGap::new(0, 320));

    sleep(Duration::from_millis(1100)).await;
    assert_eq!(exam.monitor.violations(), 1);
    assert_eq!(
        exam.host.warnings()[0].reason,
        ViolationReason::developer_tools_opened()
    );

    sleep(Duration::from_millis(1000)).await;
    assert_eq!(exam.monitor.violations(), 2);
}

#[tokio::test(start_paused = true)]
async fn probe_stops_with_the_exam() {
    let exam = Exam::started(MonitorConfig::default().with_max_violations(1)).await;
    exam.browser.set_viewport_gap(ViewportGap::new(400, 0));

    sleep(Duration::from_millis(5500)).await;

    assert_eq!(exam.host.finish_count(), 1);
    assert_eq!(exam.monitor.violations(), 2);
    assert!(!exam.monitor.is_monitoring());
}
