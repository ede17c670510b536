//! Platform events
//!
//! Raw events as delivered by the windowing or console layer.
//! Timestamps are milliseconds on a monotonic clock chosen by
//! the producer; only differences between them are used.

use super::key::Modifiers;

/// Mouse button numbers as reported by the platform
pub const BUTTON_LEFT: u8 = 1;
pub const BUTTON_MIDDLE: u8 = 2;
pub const BUTTON_RIGHT: u8 = 3;
pub const BUTTON_WHEEL_UP: u8 = 4;
pub const BUTTON_WHEEL_DOWN: u8 = 5;
pub const BUTTON_X1: u8 = 6;
pub const BUTTON_X2: u8 = 7;

/// Keyboard event payload
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct KeyEvent {
    /// Hardware scancode (informational)
    pub scancode: u32,
    /// Platform keysym (`keycodes::SYM_*` or ASCII)
    pub sym: u32,
    /// Character produced, if any
    pub unicode: Option<char>,
    pub modifiers: Modifiers,
    pub time_ms: u64,
}

impl KeyEvent {
    pub fn new(sym: u32, unicode: Option<char>, modifiers: Modifiers, time_ms: u64) -> Self {
        Self {
            scancode: 0,
            sym,
            unicode,
            modifiers,
            time_ms,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MouseButtonEvent {
    pub button: u8,
    pub x: u16,
    pub y: u16,
    pub time_ms: u64,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MotionEvent {
    pub x: u16,
    pub y: u16,
    pub time_ms: u64,
}

/// Touch event, already classified by the gesture recogniser
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TouchEvent {
    /// Touch action id (`ACTION_TOUCH_*` / `ACTION_GESTURE_*`)
    pub action: u32,
    /// Number of contact points
    pub pointers: u32,
    pub x: f32,
    pub y: f32,
    pub x2: f32,
    pub y2: f32,
    pub x3: f32,
    pub y3: f32,
}

impl TouchEvent {
    pub fn new(action: u32, pointers: u32, x: f32, y: f32) -> Self {
        Self {
            action,
            pointers,
            x,
            y,
            x2: 0.0,
            y2: 0.0,
            x3: 0.0,
            y3: 0.0,
        }
    }
}

/// Inbound platform event
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum PlatformEvent {
    KeyDown(KeyEvent),
    KeyUp(KeyEvent),
    MouseButtonDown(MouseButtonEvent),
    MouseButtonUp(MouseButtonEvent),
    MouseMotion(MotionEvent),
    Touch(TouchEvent),
}
