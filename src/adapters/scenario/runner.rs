//! Replays a [`Scenario`] against a monitor wired to in-memory adapters.

use serde::Serialize;
use std::sync::Arc;
use std::time::Duration;
use tokio::time::{sleep_until, Instant};

use crate::adapters::{FakeBrowser, HostEvent, InMemorySignalBus, RecordingHost};
use crate::application::{ExamMonitor, MonitorConfig, MonitorPorts};
use crate::domain::exam::{Notice, SessionSnapshot, ViolationReason, WarningMessage};
use crate::ports::ExamHost;

use super::{Scenario, ScenarioError, StepAction};

/// What happened at one step.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StepRecord {
    pub at_ms: u64,
    pub step: String,
    pub result: String,
}

/// Outcome of a replay.
#[derive(Debug, Clone, Serialize)]
pub struct ScenarioReport {
    pub name: String,
    pub steps: Vec<StepRecord>,
    pub host_events: Vec<HostEvent>,
    pub session: SessionSnapshot,
}

impl ScenarioReport {
    pub fn finished(&self) -> bool {
        self.host_events
            .iter()
            .any(|e| matches!(e, HostEvent::Finished))
    }
}

/// Forwards callbacks to the recorder and an optional observer.
struct TeeHost {
    recorder: Arc<RecordingHost>,
    observer: Option<Arc<dyn ExamHost>>,
}

impl ExamHost for TeeHost {
    fn on_warning(&self, message: &WarningMessage) {
        self.recorder.on_warning(message);
        if let Some(observer) = &self.observer {
            observer.on_warning(message);
        }
    }

    fn on_finish_exam(&self) {
        self.recorder.on_finish_exam();
        if let Some(observer) = &self.observer {
            observer.on_finish_exam();
        }
    }

    fn on_notice(&self, notice: &Notice) {
        self.recorder.on_notice(notice);
        if let Some(observer) = &self.observer {
            observer.on_notice(notice);
        }
    }
}

/// Drives a scenario step by step in (tokio) time.
pub struct ScenarioRunner {
    config: MonitorConfig,
    observer: Option<Arc<dyn ExamHost>>,
}

impl ScenarioRunner {
    /// `config` is the baseline; the scenario's overrides apply on top.
    pub fn new(config: MonitorConfig) -> Self {
        Self {
            config,
            observer: None,
        }
    }

    /// Also delivers host callbacks to `observer`.
    pub fn with_observer(mut self, observer: Arc<dyn ExamHost>) -> Self {
        self.observer = Some(observer);
        self
    }

    /// Replays `scenario` and returns what the host saw.
    ///
    /// Step failures are recorded in the report; only setup problems
    /// abort the replay.
    pub async fn run(&self, scenario: &Scenario) -> Result<ScenarioReport, ScenarioError> {
        scenario.validate()?;

        let browser = Arc::new(FakeBrowser::new());
        browser.set_fullscreen(scenario.browser.fullscreen);
        browser.set_viewport_gap(scenario.browser.viewport_gap);
        browser.set_request_delay(Duration::from_millis(scenario.browser.request_delay_ms));
        if let Some(reason) = &scenario.browser.deny_fullscreen {
            browser.deny_requests(reason);
        }

        let bus = Arc::new(InMemorySignalBus::new());
        let recorder = Arc::new(RecordingHost::new());
        let host = Arc::new(TeeHost {
            recorder: Arc::clone(&recorder),
            observer: self.observer.clone(),
        });

        let monitor = ExamMonitor::new(
            scenario.monitor.apply(self.config.clone()),
            MonitorPorts {
                environment: browser.clone(),
                fullscreen: browser.clone(),
                signals: bus.clone(),
                host,
            },
        )?;

        tracing::info!(
            scenario = %scenario.name,
            monitor_id = %monitor.id(),
            steps = scenario.steps.len(),
            "Replaying scenario"
        );

        let origin = Instant::now();
        let mut steps = Vec::with_capacity(scenario.steps.len());
        for step in &scenario.steps {
            sleep_until(origin + Duration::from_millis(step.at_ms)).await;
            let result = apply(&monitor, &browser, &bus, &step.action).await;
            tracing::debug!(at_ms = step.at_ms, step = %step.action, result = %result, "Step applied");
            steps.push(StepRecord {
                at_ms: step.at_ms,
                step: step.action.to_string(),
                result,
            });
        }

        let session = monitor.snapshot();
        monitor.shutdown();

        Ok(ScenarioReport {
            name: scenario.name.clone(),
            steps,
            host_events: recorder.events(),
            session,
        })
    }
}

async fn apply(
    monitor: &ExamMonitor,
    browser: &FakeBrowser,
    bus: &InMemorySignalBus,
    action: &StepAction,
) -> String {
    match action {
        StepAction::Start => match monitor.start_exam().await {
            Ok(()) => format!("started, violations={}", monitor.violations()),
            Err(e) => format!("error: {}", e),
        },
        StepAction::ReEnter => format!("{:?}", monitor.re_enter_full_screen().await),
        StepAction::ExitFullscreen => match monitor.exit_full_screen().await {
            Ok(true) => "left fullscreen".to_string(),
            Ok(false) => "not fullscreen".to_string(),
            Err(e) => format!("error: {}", e),
        },
        StepAction::Signal { signal } => {
            let response = bus.emit(signal);
            format!(
                "violations={}, prevent_default={}",
                monitor.violations(),
                response.prevent_default
            )
        }
        StepAction::Record { reason } => match ViolationReason::new(reason.as_str()) {
            Ok(reason) => monitor.record_violation(reason).label().to_string(),
            Err(e) => format!("error: {}", e),
        },
        StepAction::SetFinalSubmission { active } => {
            result_of(monitor.set_final_submission(*active), monitor)
        }
        StepAction::SetSecurity { enabled } => {
            result_of(monitor.set_security_enabled(*enabled), monitor)
        }
        StepAction::SetFullscreen { fullscreen } => {
            browser.set_fullscreen(*fullscreen);
            "ok".to_string()
        }
        StepAction::SetViewportGap { gap } => {
            browser.set_viewport_gap(*gap);
            "ok".to_string()
        }
        StepAction::DenyFullscreen { reason } => {
            browser.deny_requests(reason);
            "ok".to_string()
        }
        StepAction::AllowFullscreen => {
            browser.allow_requests();
            "ok".to_string()
        }
    }
}

fn result_of(result: Result<(), crate::application::MonitorError>, monitor: &ExamMonitor) -> String {
    match result {
        Ok(()) => format!("monitoring={}", monitor.is_monitoring()),
        Err(e) => format!("error: {}", e),
    }
}
