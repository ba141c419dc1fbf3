//! Host that reports callbacks through `tracing`.
//!
//! Used by the replay binary, where there is no page to render into.

use std::sync::atomic::{AtomicBool, Ordering};

use crate::domain::exam::{Notice, WarningMessage};
use crate::ports::ExamHost;

/// Logs warnings, notices and the finish request.
#[derive(Debug, Default)]
pub struct TracingHost {
    finished: AtomicBool,
}

impl TracingHost {
    pub fn new() -> Self {
        Self::default()
    }

    /// True once `on_finish_exam` has been called.
    pub fn is_finished(&self) -> bool {
        self.finished.load(Ordering::SeqCst)
    }
}

impl ExamHost for TracingHost {
    fn on_warning(&self, message: &WarningMessage) {
        tracing::warn!(
            level = ?message.level,
            count = message.count,
            max = message.max_violations,
            "{}",
            message
        );
    }

    fn on_finish_exam(&self) {
        if self.finished.swap(true, Ordering::SeqCst) {
            tracing::error!("Finish requested more than once");
        } else {
            tracing::info!("Exam submitted");
        }
    }

    fn on_notice(&self, notice: &Notice) {
        if notice.is_blocking() {
            tracing::warn!(blocking = true, "{}", notice);
        } else {
            tracing::info!(blocking = false, "{}", notice);
        }
    }
}
