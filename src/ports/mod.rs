//! Ports - Interfaces for external dependencies.
//!
//! Following hexagonal architecture, ports define the contracts between
//! the lockdown domain and the browser / host page. Adapters implement them.
//!
//! ## Browser Ports
//!
//! - `EnvironmentQuery` - Fullscreen state and viewport gap
//! - `FullscreenController` - Asynchronous fullscreen enter/exit
//! - `SignalSource` - Scoped registration of event listeners
//!
//! ## Host Ports
//!
//! - `ExamHost` - Warning, finish and notice callbacks

mod environment;
mod exam_host;
mod fullscreen;
mod signal_source;

pub use environment::EnvironmentQuery;
pub use exam_host::ExamHost;
pub use fullscreen::{FullscreenController, FullscreenError};
pub use signal_source::{SignalHandler, SignalRegistration, SignalResponse, SignalSource};
