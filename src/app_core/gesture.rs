//! Turns raw press/release pairs into taps and long presses.

use crate::app_core::input::{AppMouseEvent, AppMouseKind};
use std::time::{Duration, Instant};

/// Hold time after which a press counts as a long press.
pub const LONG_PRESS: Duration = Duration::from_millis(500);

#[derive(Debug, Default)]
pub struct PressTracker {
    pressed: Option<(u16, u16, Instant)>,
}

impl PressTracker {
    pub fn press(&mut self, column: u16, row: u16, at: Instant) {
        self.pressed = Some((column, row, at));
    }

    /// Resolves the gesture started by the last [`press`](Self::press).
    /// A release on a different cell, or without a press, yields nothing.
    pub fn release(&mut self, column: u16, row: u16, at: Instant) -> Option<AppMouseEvent> {
        let (start_col, start_row, started) = self.pressed.take()?;
        if start_col != column || start_row != row {
            return None;
        }
        let kind = if at.saturating_duration_since(started) >= LONG_PRESS {
            AppMouseKind::LongPress
        } else {
            AppMouseKind::Tap
        };
        Some(AppMouseEvent { kind, column, row })
    }

    pub fn cancel(&mut self) {
        self.pressed = None;
    }
}
