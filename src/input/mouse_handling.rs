//! Mouse driver adapter
//!
//! Bridges raw pointer events to a `MouseInputHandler`: absolute
//! positions become relative motion of the "pointer" feature and
//! platform button numbers become button names of the mouse
//! controller profile.

use std::sync::{Mutex, Weak};

use super::event::{
    BUTTON_LEFT, BUTTON_MIDDLE, BUTTON_RIGHT, BUTTON_WHEEL_DOWN, BUTTON_WHEEL_UP, BUTTON_X1,
    BUTTON_X2,
};
use super::handlers::{MouseDriverHandler, MouseInputHandler};
use super::lock;

/// Controller profile of the windowing mouse
pub const MOUSE_CONTROLLER_ID: &str = "game.controller.mouse";

/// Name of the relative pointer feature
pub const POINTER_FEATURE: &str = "pointer";

/// Platform button numbers to controller feature names
#[derive(Debug, Default, Clone, Copy)]
pub struct MouseWindowingButtonMap;

impl MouseWindowingButtonMap {
    pub fn controller_id(&self) -> &'static str {
        MOUSE_CONTROLLER_ID
    }

    pub fn button_name(&self, button: u8) -> Option<&'static str> {
        match button {
            BUTTON_LEFT => Some("left"),
            BUTTON_MIDDLE => Some("middle"),
            BUTTON_RIGHT => Some("right"),
            BUTTON_WHEEL_UP => Some("wheelup"),
            BUTTON_WHEEL_DOWN => Some("wheeldown"),
            BUTTON_X1 => Some("button4"),
            BUTTON_X2 => Some("button5"),
            _ => None,
        }
    }

    pub fn pointer_name(&self) -> &'static str {
        POINTER_FEATURE
    }
}

/// Driver handler feeding one input handler
pub struct MouseInputHandling {
    handler: Weak<Mutex<dyn MouseInputHandler>>,
    button_map: MouseWindowingButtonMap,
    last: Option<(i32, i32)>,
}

impl MouseInputHandling {
    pub fn new(handler: Weak<Mutex<dyn MouseInputHandler>>, button_map: MouseWindowingButtonMap) -> Self {
        Self {
            handler,
            button_map,
            last: None,
        }
    }

    /// True while the wrapped handler is alive
    pub fn is_alive(&self) -> bool {
        self.handler.strong_count() > 0
    }

    pub fn wraps(&self, handler: &Weak<Mutex<dyn MouseInputHandler>>) -> bool {
        self.handler.as_ptr() as *const () == handler.as_ptr() as *const ()
    }
}

impl MouseDriverHandler for MouseInputHandling {
    fn on_position(&mut self, x: i32, y: i32) -> bool {
        let Some(handler) = self.handler.upgrade() else {
            return false;
        };
        // First sample only establishes the origin
        let handled = match self.last {
            Some((lx, ly)) if (lx, ly) != (x, y) => {
                lock(&handler).on_motion(self.button_map.pointer_name(), x - lx, y - ly)
            }
            _ => false,
        };
        self.last = Some((x, y));
        handled
    }

    fn on_button_press(&mut self, button: u8) -> bool {
        let (Some(handler), Some(name)) = (self.handler.upgrade(), self.button_map.button_name(button))
        else {
            return false;
        };
        let handled = lock(&handler).on_button_press(name);
        handled
    }

    fn on_button_release(&mut self, button: u8) {
        if let (Some(handler), Some(name)) = (self.handler.upgrade(), self.button_map.button_name(button)) {
            lock(&handler).on_button_release(name);
        }
    }
}
