//! Exam lockdown domain module.
//!
//! Holds the violation state machine (`ExamSession`) and the pure pieces
//! around it: signal vocabulary, classification, warning messages and the
//! reentrancy guard.
//!
//! # Lifecycle
//!
//! ```text
//! Unstarted(-1) --start--> Active(0..=max) --count > max--> Terminated
//! ```

mod classifier;
mod errors;
mod guard;
mod notice;
mod outcome;
mod reason;
mod session;
mod signal;
mod status;

pub use classifier::{classify, restricted_chord, Classification, SuppressedAction};
pub use errors::ExamError;
pub use guard::{ReentrancyGuard, DEFAULT_COOLDOWN};
pub use notice::Notice;
pub use outcome::{IgnoredBecause, ViolationOutcome, WarningMessage};
pub use reason::ViolationReason;
pub use session::{
    ExamSession, SessionSnapshot, ViolationRecord, DEFAULT_MAX_VIOLATIONS, UNSTARTED_COUNT,
};
pub use signal::{BrowserSignal, ClipboardAction, KeyChord, SignalKind, ViewportGap};
pub use status::{ExamStatus, WarningLevel};
