//! Raw browser signals as the lockdown domain sees them.
//!
//! Adapters translate real DOM events into [`BrowserSignal`] values; the
//! gateway classifies them. Everything here is plain data so scenarios can
//! be written in YAML and replayed.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Family of browser events a subscription listens to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SignalKind {
    Visibility,
    Focus,
    Fullscreen,
    Keyboard,
    Clipboard,
    ContextMenu,
    Drag,
    Selection,
}

impl SignalKind {
    /// The fixed subscription set registered while monitoring.
    pub const ALL: [SignalKind; 8] = [
        SignalKind::Visibility,
        SignalKind::Focus,
        SignalKind::Fullscreen,
        SignalKind::Keyboard,
        SignalKind::Clipboard,
        SignalKind::ContextMenu,
        SignalKind::Drag,
        SignalKind::Selection,
    ];
}

impl fmt::Display for SignalKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            SignalKind::Visibility => "visibility",
            SignalKind::Focus => "focus",
            SignalKind::Fullscreen => "fullscreen",
            SignalKind::Keyboard => "keyboard",
            SignalKind::Clipboard => "clipboard",
            SignalKind::ContextMenu => "context_menu",
            SignalKind::Drag => "drag",
            SignalKind::Selection => "selection",
        };
        write!(f, "{}", s)
    }
}

/// Clipboard operation attempted by the candidate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ClipboardAction {
    Copy,
    Cut,
    Paste,
}

/// A key press with its modifier state.
///
/// `key` follows `KeyboardEvent.key`: single characters for letters,
/// names such as `Tab` or `F12` otherwise. Letter matching is
/// case-insensitive because Shift changes the reported character.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct KeyChord {
    pub key: String,
    #[serde(default)]
    pub ctrl: bool,
    #[serde(default)]
    pub alt: bool,
    #[serde(default)]
    pub shift: bool,
    #[serde(default)]
    pub meta: bool,
}

impl KeyChord {
    /// A bare key with no modifiers.
    pub fn key(key: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            ctrl: false,
            alt: false,
            shift: false,
            meta: false,
        }
    }

    pub fn with_ctrl(mut self) -> Self {
        self.ctrl = true;
        self
    }

    pub fn with_alt(mut self) -> Self {
        self.alt = true;
        self
    }

    pub fn with_shift(mut self) -> Self {
        self.shift = true;
        self
    }

    pub fn with_meta(mut self) -> Self {
        self.meta = true;
        self
    }

    /// Ctrl, or Cmd on macOS.
    pub fn is_command(&self) -> bool {
        self.ctrl || self.meta
    }

    /// Returns true if the key matches `name`, ignoring ASCII case.
    pub fn is(&self, name: &str) -> bool {
        self.key.eq_ignore_ascii_case(name)
    }
}

impl fmt::Display for KeyChord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.ctrl {
            write!(f, "Ctrl+")?;
        }
        if self.meta {
            write!(f, "Meta+")?;
        }
        if self.alt {
            write!(f, "Alt+")?;
        }
        if self.shift {
            write!(f, "Shift+")?;
        }
        if self.key.chars().count() == 1 {
            write!(f, "{}", self.key.to_ascii_uppercase())
        } else {
            write!(f, "{}", self.key)
        }
    }
}

/// Gap between outer and inner window dimensions, in CSS pixels.
///
/// A docked inspector shows up as a large gap on one axis.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct ViewportGap {
    pub width: u32,
    pub height: u32,
}

impl ViewportGap {
    pub fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }

    /// Computes the gap from outer and inner sizes, clamping negatives to 0.
    pub fn between(outer: (u32, u32), inner: (u32, u32)) -> Self {
        Self {
            width: outer.0.saturating_sub(inner.0),
            height: outer.1.saturating_sub(inner.1),
        }
    }

    /// True if either axis exceeds `threshold_px`.
    pub fn exceeds(&self, threshold_px: u32) -> bool {
        self.width > threshold_px || self.height > threshold_px
    }
}

/// A raw browser event delivered to the gateway.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum BrowserSignal {
    /// `visibilitychange`; `hidden` mirrors `document.hidden`.
    VisibilityChanged { hidden: bool },
    /// `blur` on the window.
    WindowBlurred,
    /// `fullscreenchange`; the current state is read from the environment.
    FullscreenChanged,
    /// `keydown`.
    KeyPressed(KeyChord),
    /// `copy`, `cut` or `paste`.
    Clipboard { action: ClipboardAction },
    /// `contextmenu`.
    ContextMenu,
    /// `dragstart`.
    DragStarted,
    /// `selectstart`.
    SelectionStarted,
}

impl BrowserSignal {
    /// The subscription family this signal arrives through.
    pub fn kind(&self) -> SignalKind {
        match self {
            BrowserSignal::VisibilityChanged { .. } => SignalKind::Visibility,
            BrowserSignal::WindowBlurred => SignalKind::Focus,
            BrowserSignal::FullscreenChanged => SignalKind::Fullscreen,
            BrowserSignal::KeyPressed(_) => SignalKind::Keyboard,
            BrowserSignal::Clipboard { .. } => SignalKind::Clipboard,
            BrowserSignal::ContextMenu => SignalKind::ContextMenu,
            BrowserSignal::DragStarted => SignalKind::Drag,
            BrowserSignal::SelectionStarted => SignalKind::Selection,
        }
    }
}
