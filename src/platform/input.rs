//! Device input -> [`TickInput`]
//!
//! Keyboard and touch handlers write into an [`InputLatch`] whenever events
//! arrive; the frame loop reads it once per frame. Held controls are plain
//! flags. Pause and restart are edges that stay latched until consumed.

use crate::sim::TickInput;

/// Which half of the screen a touch landed on
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TouchSide {
    Left,
    Right,
}

impl TouchSide {
    /// `x_fraction` is the touch x divided by the element width
    pub fn from_fraction(x_fraction: f32) -> Self {
        if x_fraction < 0.5 {
            TouchSide::Left
        } else {
            TouchSide::Right
        }
    }
}

/// Logical action bound to a key
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyAction {
    SteerLeft,
    SteerRight,
    Boost,
    Pause,
    Restart,
}

impl KeyAction {
    /// Map a `KeyboardEvent.key` value
    pub fn from_key(key: &str) -> Option<Self> {
        match key {
            "ArrowLeft" | "a" | "A" => Some(KeyAction::SteerLeft),
            "ArrowRight" | "d" | "D" => Some(KeyAction::SteerRight),
            "ArrowUp" | "w" | "W" => Some(KeyAction::Boost),
            "p" | "P" | "Escape" => Some(KeyAction::Pause),
            "r" | "R" => Some(KeyAction::Restart),
            _ => None,
        }
    }
}

/// Accumulates device events between frames
#[derive(Debug, Clone, Default)]
pub struct InputLatch {
    key_left: bool,
    key_right: bool,
    key_boost: bool,
    touch_left: u32,
    touch_right: u32,
    pause_pending: bool,
    restart_pending: bool,
}

impl InputLatch {
    pub fn new() -> Self {
        Self::default()
    }

    /// Handle a key press; returns true if the key is bound
    pub fn key_down(&mut self, key: &str, repeat: bool) -> bool {
        let Some(action) = KeyAction::from_key(key) else {
            return false;
        };
        match action {
            KeyAction::SteerLeft => self.key_left = true,
            KeyAction::SteerRight => self.key_right = true,
            KeyAction::Boost => self.key_boost = true,
            // Auto-repeat must not flicker pause on and off
            KeyAction::Pause if !repeat => self.pause_pending = true,
            KeyAction::Restart if !repeat => self.restart_pending = true,
            _ => {}
        }
        true
    }

    /// Handle a key release; returns true if the key is bound
    pub fn key_up(&mut self, key: &str) -> bool {
        let Some(action) = KeyAction::from_key(key) else {
            return false;
        };
        match action {
            KeyAction::SteerLeft => self.key_left = false,
            KeyAction::SteerRight => self.key_right = false,
            KeyAction::Boost => self.key_boost = false,
            KeyAction::Pause | KeyAction::Restart => {}
        }
        true
    }

    pub fn touch_start(&mut self, side: TouchSide) {
        match side {
            TouchSide::Left => self.touch_left += 1,
            TouchSide::Right => self.touch_right += 1,
        }
    }

    pub fn touch_end(&mut self, side: TouchSide) {
        match side {
            TouchSide::Left => self.touch_left = self.touch_left.saturating_sub(1),
            TouchSide::Right => self.touch_right = self.touch_right.saturating_sub(1),
        }
    }

    /// Drop every held control (e.g. on window blur, when key-ups get lost)
    pub fn release_all(&mut self) {
        self.key_left = false;
        self.key_right = false;
        self.key_boost = false;
        self.touch_left = 0;
        self.touch_right = 0;
    }

    pub fn request_pause(&mut self) {
        self.pause_pending = true;
    }

    pub fn request_restart(&mut self) {
        self.restart_pending = true;
    }

    /// Current held state plus pending edges, without consuming anything
    pub fn peek(&self) -> TickInput {
        TickInput {
            steer_left: self.key_left || self.touch_left > 0,
            steer_right: self.key_right || self.touch_right > 0,
            boost: self.key_boost,
            pause_toggle: self.pause_pending,
            restart: self.restart_pending,
        }
    }

    /// Read this frame's input and clear the one-shot edges
    pub fn take(&mut self) -> TickInput {
        let input = self.peek();
        self.pause_pending = false;
        self.restart_pending = false;
        input
    }
}
