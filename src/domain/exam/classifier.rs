//! Classification of raw browser signals.
//!
//! Every signal lands in exactly one bucket:
//! - **Suppress**: prevent the default action, show an inline notice, never count
//! - **Violation**: forward to the state machine with a reason
//! - **Ignore**: let the browser proceed
//!
//! Classification is pure; the only ambient input is whether the document
//! is currently fullscreen, which the caller reads from the environment.

use serde::{Deserialize, Serialize};
use std::fmt;

use super::{BrowserSignal, ClipboardAction, KeyChord, ViolationReason};

/// Default actions that are blocked without counting as a violation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SuppressedAction {
    Copy,
    Cut,
    Paste,
    ContextMenu,
    Drag,
    TextSelection,
}

impl SuppressedAction {
    /// Inline notice shown when the action is blocked.
    pub fn notice_text(&self) -> &'static str {
        match self {
            SuppressedAction::Copy => "Copying is disabled during the exam.",
            SuppressedAction::Cut => "Cutting is disabled during the exam.",
            SuppressedAction::Paste => "Pasting is disabled during the exam.",
            SuppressedAction::ContextMenu => "The context menu is disabled during the exam.",
            SuppressedAction::Drag => "Dragging content is disabled during the exam.",
            SuppressedAction::TextSelection => "Text selection is disabled during the exam.",
        }
    }
}

impl From<ClipboardAction> for SuppressedAction {
    fn from(action: ClipboardAction) -> Self {
        match action {
            ClipboardAction::Copy => SuppressedAction::Copy,
            ClipboardAction::Cut => SuppressedAction::Cut,
            ClipboardAction::Paste => SuppressedAction::Paste,
        }
    }
}

impl fmt::Display for SuppressedAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            SuppressedAction::Copy => "copy",
            SuppressedAction::Cut => "cut",
            SuppressedAction::Paste => "paste",
            SuppressedAction::ContextMenu => "context_menu",
            SuppressedAction::Drag => "drag",
            SuppressedAction::TextSelection => "text_selection",
        };
        write!(f, "{}", s)
    }
}

/// What the gateway should do with a signal.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Classification {
    /// Prevent the default action and show a notice.
    Suppress(SuppressedAction),
    /// Count a violation; `prevent_default` is set for key chords.
    Violation {
        reason: ViolationReason,
        prevent_default: bool,
    },
    /// Not a lockdown concern.
    Ignore,
}

impl Classification {
    /// True if the browser default action must be cancelled.
    pub fn prevents_default(&self) -> bool {
        match self {
            Classification::Suppress(_) => true,
            Classification::Violation { prevent_default, .. } => *prevent_default,
            Classification::Ignore => false,
        }
    }
}

/// Classifies a signal given the current fullscreen state.
pub fn classify(signal: &BrowserSignal, is_fullscreen: bool) -> Classification {
    match signal {
        BrowserSignal::VisibilityChanged { hidden: true } => violation(ViolationReason::switched_tabs()),
        BrowserSignal::VisibilityChanged { hidden: false } => Classification::Ignore,
        // Blur outside fullscreen is already reported by the fullscreen change.
        BrowserSignal::WindowBlurred if is_fullscreen => violation(ViolationReason::switched_window()),
        BrowserSignal::WindowBlurred => Classification::Ignore,
        BrowserSignal::FullscreenChanged if !is_fullscreen => {
            violation(ViolationReason::exited_fullscreen())
        }
        BrowserSignal::FullscreenChanged => Classification::Ignore,
        BrowserSignal::KeyPressed(chord) => match restricted_chord(chord) {
            Some(reason) => Classification::Violation {
                reason,
                prevent_default: true,
            },
            None => Classification::Ignore,
        },
        BrowserSignal::Clipboard { action } => Classification::Suppress((*action).into()),
        BrowserSignal::ContextMenu => Classification::Suppress(SuppressedAction::ContextMenu),
        BrowserSignal::DragStarted => Classification::Suppress(SuppressedAction::Drag),
        BrowserSignal::SelectionStarted => Classification::Suppress(SuppressedAction::TextSelection),
    }
}

fn violation(reason: ViolationReason) -> Classification {
    Classification::Violation {
        reason,
        prevent_default: false,
    }
}

/// Returns the violation reason for a restricted key chord.
///
/// Restricted: Ctrl+{T,N,W,P,S,O,U}, Ctrl/Alt+Tab, F12, Ctrl+Shift+{I,J,C}.
/// Cmd is treated as Ctrl.
pub fn restricted_chord(chord: &KeyChord) -> Option<ViolationReason> {
    let reason = if chord.is("F12") {
        "tried to open developer tools"
    } else if chord.is("Tab") && (chord.is_command() || chord.alt) {
        "switched applications with a shortcut"
    } else if chord.is_command() && chord.shift && ["i", "j", "c"].iter().any(|k| chord.is(k)) {
        "tried to open developer tools"
    } else if chord.is_command() {
        match chord.key.to_ascii_lowercase().as_str() {
            "t" => "tried to open a new tab",
            "n" => "tried to open a new window",
            "w" => "tried to close the exam tab",
            "p" => "tried to print the page",
            "s" => "tried to save the page",
            "o" => "tried to open a file",
            "u" => "tried to view the page source",
            _ => return None,
        }
    } else {
        return None;
    };
    Some(ViolationReason::from_static(reason))
}
