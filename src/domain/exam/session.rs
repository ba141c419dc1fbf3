//! ExamSession aggregate - the violation state machine.
//!
//! The session owns the violation counter, the lockdown flags and the
//! reentrancy guard. Every counted violation goes through
//! [`ExamSession::record_violation`]; nothing else mutates the counter.

use serde::{Deserialize, Serialize};
use std::time::{Duration, Instant};

use crate::domain::foundation::{MonitorId, StateMachine, Timestamp, ValidationError};

use super::{
    ExamError, ExamStatus, IgnoredBecause, ReentrancyGuard, ViolationOutcome, ViolationReason,
    WarningMessage,
};

/// Counter value reported before the exam has started.
pub const UNSTARTED_COUNT: i32 = -1;

/// Default number of violations tolerated before auto-submission.
pub const DEFAULT_MAX_VIOLATIONS: u32 = 3;

/// One counted violation, kept for the host's terminal screen or submission.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ViolationRecord {
    /// 1-based position in the session.
    pub sequence: u32,
    pub reason: ViolationReason,
    pub recorded_at: Timestamp,
}

/// Serializable view of a session.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionSnapshot {
    pub monitor_id: MonitorId,
    pub status: ExamStatus,
    pub violations: i32,
    pub max_violations: u32,
    pub security_enabled: bool,
    pub final_submission: bool,
    pub started_at: Option<Timestamp>,
    pub terminated_at: Option<Timestamp>,
    pub log: Vec<ViolationRecord>,
}

/// Exam session aggregate.
///
/// # Invariants
///
/// - `violation_count == -1` iff status is `Unstarted`
/// - the counter only moves inside `record_violation`, by exactly one
/// - at most one violation is counted per guard cool-down
/// - once `Terminated`, no outcome other than `Ignored` is produced
/// - `suppressed` never resets the counter
#[derive(Debug, Clone)]
pub struct ExamSession {
    id: MonitorId,
    status: ExamStatus,
    violation_count: i32,
    max_violations: u32,
    security_enabled: bool,
    suppressed: bool,
    guard: ReentrancyGuard,
    started_at: Option<Timestamp>,
    terminated_at: Option<Timestamp>,
    log: Vec<ViolationRecord>,
}

impl ExamSession {
    /// Creates an unstarted session.
    ///
    /// # Errors
    ///
    /// - `OutOfRange` if `max_violations` is zero or does not fit the counter
    /// - `OutOfRange` if `cooldown` is zero
    pub fn new(
        id: MonitorId,
        max_violations: u32,
        cooldown: Duration,
    ) -> Result<Self, ValidationError> {
        Self::validate_max_violations(max_violations)?;
        Self::validate_cooldown(cooldown)?;

        Ok(Self {
            id,
            status: ExamStatus::Unstarted,
            violation_count: UNSTARTED_COUNT,
            max_violations,
            security_enabled: true,
            suppressed: false,
            guard: ReentrancyGuard::new(cooldown),
            started_at: None,
            terminated_at: None,
            log: Vec::new(),
        })
    }

    fn validate_max_violations(max_violations: u32) -> Result<(), ValidationError> {
        if max_violations == 0 || max_violations >= i32::MAX as u32 {
            return Err(ValidationError::out_of_range(
                "max_violations",
                1,
                i64::from(i32::MAX) - 1,
                i64::from(max_violations),
            ));
        }
        Ok(())
    }

    /// The guard only latches for a positive cool-down.
    fn validate_cooldown(cooldown: Duration) -> Result<(), ValidationError> {
        if cooldown.is_zero() {
            return Err(ValidationError::out_of_range("cooldown_ms", 1, i64::MAX, 0));
        }
        Ok(())
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Accessors
    // ─────────────────────────────────────────────────────────────────────────

    pub fn id(&self) -> &MonitorId {
        &self.id
    }

    pub fn status(&self) -> ExamStatus {
        self.status
    }

    /// Violation counter; -1 before the exam starts.
    pub fn violations(&self) -> i32 {
        self.violation_count
    }

    pub fn max_violations(&self) -> u32 {
        self.max_violations
    }

    pub fn security_enabled(&self) -> bool {
        self.security_enabled
    }

    /// True while final submission is in progress.
    pub fn is_suppressed(&self) -> bool {
        self.suppressed
    }

    pub fn log(&self) -> &[ViolationRecord] {
        &self.log
    }

    /// Security enabled, exam active and not in final submission.
    ///
    /// Signal subscriptions exist exactly while this holds.
    pub fn is_monitoring_eligible(&self) -> bool {
        self.security_enabled && self.status.is_active() && !self.suppressed
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Flags
    // ─────────────────────────────────────────────────────────────────────────

    pub fn set_security_enabled(&mut self, enabled: bool) {
        self.security_enabled = enabled;
    }

    /// Marks final submission; the counter is left untouched.
    pub fn set_suppressed(&mut self, suppressed: bool) {
        self.suppressed = suppressed;
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Lifecycle
    // ─────────────────────────────────────────────────────────────────────────

    /// Moves the session to `Active` with a zero counter.
    ///
    /// Returns `Ok(true)` if the exam started now and `Ok(false)` if it was
    /// already running.
    ///
    /// # Errors
    ///
    /// - `AlreadyTerminated` if the exam already ended
    pub fn start(&mut self) -> Result<bool, ExamError> {
        match self.status {
            ExamStatus::Active => Ok(false),
            ExamStatus::Terminated => Err(ExamError::AlreadyTerminated),
            ExamStatus::Unstarted => {
                self.status = self.status.transition_to(ExamStatus::Active)?;
                self.violation_count = 0;
                self.started_at = Some(Timestamp::now());
                Ok(true)
            }
        }
    }

    /// Ends an active exam without counting a violation.
    ///
    /// Used when fullscreen cannot be restored. Returns `true` if this call
    /// performed the transition, so the caller finishes the exam once.
    pub fn terminate(&mut self) -> bool {
        match self.status.transition_to(ExamStatus::Terminated) {
            Ok(status) => {
                self.status = status;
                self.terminated_at = Some(Timestamp::now());
                true
            }
            Err(_) => false,
        }
    }

    /// Feeds one candidate violation observed at `now`.
    ///
    /// Outcome for the incremented count `n`:
    /// - `n < max`: warning
    /// - `n == max`: final warning
    /// - `n > max`: terminated, exactly once
    pub fn record_violation(&mut self, reason: ViolationReason, now: Instant) -> ViolationOutcome {
        match self.status {
            ExamStatus::Unstarted => return ViolationOutcome::Ignored(IgnoredBecause::NotStarted),
            ExamStatus::Terminated => {
                return ViolationOutcome::Ignored(IgnoredBecause::AlreadyTerminated)
            }
            ExamStatus::Active => {}
        }
        if !self.security_enabled {
            return ViolationOutcome::Ignored(IgnoredBecause::SecurityDisabled);
        }
        if self.suppressed {
            return ViolationOutcome::Ignored(IgnoredBecause::FinalSubmission);
        }
        if !self.guard.try_enter(now) {
            return ViolationOutcome::Debounced;
        }

        self.violation_count += 1;
        let count = self.violation_count as u32;
        self.log.push(ViolationRecord {
            sequence: count,
            reason: reason.clone(),
            recorded_at: Timestamp::now(),
        });

        if count > self.max_violations {
            self.terminate();
            ViolationOutcome::Terminated { count }
        } else {
            ViolationOutcome::Warned(WarningMessage::new(count, self.max_violations, reason))
        }
    }

    pub fn snapshot(&self) -> SessionSnapshot {
        SessionSnapshot {
            monitor_id: self.id,
            status: self.status,
            violations: self.violation_count,
            max_violations: self.max_violations,
            security_enabled: self.security_enabled,
            final_submission: self.suppressed,
            started_at: self.started_at,
            terminated_at: self.terminated_at,
            log: self.log.clone(),
        }
    }
}
