//! Runtime-agnostic input event types.
//!
//! The native runtime converts crossterm events into these types before
//! calling the shared reducer.

/// Key codes the application reacts to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AppKeyCode {
    Char(char),
    Up,
    Down,
    Left,
    Right,
    Tab,
    BackTab,
    Enter,
    Esc,
    Delete,
    Home,
    End,
    PageUp,
    PageDown,
    Backspace,
}

/// A runtime-agnostic keyboard event.
#[derive(Debug, Clone, Copy)]
pub struct AppKeyEvent {
    pub code: AppKeyCode,
    pub ctrl: bool,
    pub alt: bool,
    pub shift: bool,
    /// `true` when the key was released (ignored by the reducer).
    pub is_release: bool,
}

impl AppKeyEvent {
    pub fn new(code: AppKeyCode) -> Self {
        Self {
            code,
            ctrl: false,
            alt: false,
            shift: false,
            is_release: false,
        }
    }

    pub fn ctrl(code: AppKeyCode) -> Self {
        Self {
            ctrl: true,
            ..Self::new(code)
        }
    }
}

/// The kind of a pointer gesture, already resolved from raw press/release pairs.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AppMouseKind {
    Tap,
    LongPress,
    ScrollUp,
    ScrollDown,
}

/// A pointer gesture in terminal cell coordinates.
#[derive(Debug, Clone, Copy)]
pub struct AppMouseEvent {
    pub kind: AppMouseKind,
    pub column: u16,
    pub row: u16,
}
