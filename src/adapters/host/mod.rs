//! ExamHost adapters.

mod recording;
mod tracing_host;

pub use recording::{HostEvent, RecordingHost};
pub use tracing_host::TracingHost;
