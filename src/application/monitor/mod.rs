//! Exam monitor - Composition of gateway, state machine and fullscreen manager.
//!
//! - `ExamMonitor` - Host-facing facade (start, re-enter, toggles, teardown)
//! - `EventGateway` - Scoped listener set and developer-tools probe
//! - `FullscreenLifecycleManager` - Fullscreen enter/restore/leave rules

mod config;
mod event_gateway;
mod exam_monitor;
mod fullscreen_manager;

pub use config::{DevToolsProbe, MonitorConfig, MonitorPorts, StartMode};
pub use event_gateway::{ActiveSubscription, EventGateway, GatewayTransition, ViolationSink};
pub use exam_monitor::{ExamMonitor, ReEntryOutcome};
pub use fullscreen_manager::{FullscreenLifecycleManager, Restore};
