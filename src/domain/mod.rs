//! Domain layer containing business logic and domain types.
//!
//! # Module Organization
//!
//! - `foundation` - Shared domain primitives (IDs, timestamps, errors, state machine trait)
//! - `exam` - Exam session lifecycle, violation counting and signal classification

pub mod exam;
pub mod foundation;
