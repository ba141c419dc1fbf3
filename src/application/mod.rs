//! Application layer - Orchestration of the lockdown domain over its ports.
//!
//! The domain decides (classification, counting, escalation); this layer
//! wires those decisions to listener lifecycles, fullscreen requests and
//! host callbacks.

mod errors;
pub mod monitor;

pub use errors::MonitorError;
pub use monitor::{
    DevToolsProbe, ExamMonitor, MonitorConfig, MonitorPorts, ReEntryOutcome, StartMode,
};
