//! Recording host for tests.

use serde::Serialize;
use std::sync::{Mutex, MutexGuard, PoisonError};

use crate::domain::exam::{Notice, WarningMessage};
use crate::ports::ExamHost;

/// A single callback received by [`RecordingHost`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum HostEvent {
    Warning(WarningMessage),
    Finished,
    Notice(Notice),
}

/// Host that records every callback in order.
#[derive(Debug, Default)]
pub struct RecordingHost {
    events: Mutex<Vec<HostEvent>>,
}

impl RecordingHost {
    pub fn new() -> Self {
        Self::default()
    }

    fn log(&self) -> MutexGuard<'_, Vec<HostEvent>> {
        self.events.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// All callbacks received so far.
    pub fn events(&self) -> Vec<HostEvent> {
        self.log().clone()
    }

    pub fn warnings(&self) -> Vec<WarningMessage> {
        self.log()
            .iter()
            .filter_map(|e| match e {
                HostEvent::Warning(m) => Some(m.clone()),
                _ => None,
            })
            .collect()
    }

    pub fn notices(&self) -> Vec<Notice> {
        self.log()
            .iter()
            .filter_map(|e| match e {
                HostEvent::Notice(notice) => Some(*notice),
                _ => None,
            })
            .collect()
    }

    pub fn finish_count(&self) -> usize {
        self.log()
            .iter()
            .filter(|e| matches!(e, HostEvent::Finished))
            .count()
    }
}

impl ExamHost for RecordingHost {
    fn on_warning(&self, message: &WarningMessage) {
        self.log().push(HostEvent::Warning(message.clone()));
    }

    fn on_finish_exam(&self) {
        self.log().push(HostEvent::Finished);
    }

    fn on_notice(&self, notice: &Notice) {
        self.log().push(HostEvent::Notice(*notice));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::exam::ViolationReason;

    #[test]
    fn records_callbacks_in_order() {
        let host = RecordingHost::new();
        let warning = WarningMessage::new(1, 3, ViolationReason::switched_tabs());

        host.on_notice(&Notice::FullscreenRequired);
        host.on_warning(&warning);
        host.on_finish_exam();

        assert_eq!(
            host.events(),
            vec![
                HostEvent::Notice(Notice::FullscreenRequired),
                HostEvent::Warning(warning.clone()),
                HostEvent::Finished,
            ]
        );
        assert_eq!(host.warnings(), vec![warning]);
        assert_eq!(host.notices(), vec![Notice::FullscreenRequired]);
        assert_eq!(host.finish_count(), 1);
    }
}
