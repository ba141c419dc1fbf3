//! Exam Lockdown - Client-side exam integrity monitor
//!
//! This crate keeps a candidate inside the exam context: it suppresses escape
//! actions (copy, context menu, restricted shortcuts), counts violations that
//! cannot be suppressed (tab switches, leaving fullscreen, dev tools) and asks
//! the host to submit the exam once the allowance is used up.

pub mod adapters;
pub mod application;
pub mod config;
pub mod domain;
pub mod ports;
