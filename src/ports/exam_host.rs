//! ExamHost port - Callbacks into the page that embeds the monitor.
//!
//! The host renders warnings and notices and owns the actual submission
//! (network call, navigation). The monitor only signals intent.

use crate::domain::exam::{Notice, WarningMessage};

/// Port implemented by the exam page.
///
/// Callbacks are invoked synchronously and are not wrapped: a panicking
/// callback is the host's responsibility.
pub trait ExamHost: Send + Sync {
    /// A counted violation that did not end the exam.
    fn on_warning(&self, message: &WarningMessage);

    /// The exam must be submitted now. Invoked at most once per session.
    fn on_finish_exam(&self);

    /// An inline or blocking notice. Hosts without a toast area may ignore it.
    fn on_notice(&self, _notice: &Notice) {}
}
