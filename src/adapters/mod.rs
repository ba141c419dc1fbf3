//! Adapters - Implementations of port interfaces.
//!
//! Adapters connect the monitor to its surroundings:
//! - `browser` - Scriptable browser (fullscreen state, viewport gap)
//! - `signals` - In-memory signal bus standing in for DOM listeners
//! - `host` - Exam host implementations (recording, tracing)
//! - `scenario` - YAML scenario replay on top of the above

pub mod browser;
pub mod host;
pub mod scenario;
pub mod signals;

pub use browser::FakeBrowser;
pub use host::{HostEvent, RecordingHost, TracingHost};
pub use scenario::{Scenario, ScenarioError, ScenarioReport, ScenarioRunner};
pub use signals::InMemorySignalBus;
