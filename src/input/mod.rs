//! Input handling
//!
//! Turns raw device input into actions.
//! - Value types: keys, actions, window ids, platform events
//! - Device state: keyboard hold tracking, mouse tracker, remote control
//! - Sources: event server, peripheral buffer, console TTY
//! - Keymap translation and the input manager driving it all

pub mod action;
pub mod easter_egg;
pub mod error;
pub mod event;
pub mod event_server;
pub mod handlers;
pub mod key;
pub mod keyboard;
pub mod keycodes;
pub mod manager;
pub mod mouse;
pub mod mouse_handling;
pub mod peripherals;
#[cfg(feature = "remote")]
pub mod remote;
pub mod translator;
pub mod tty;
pub mod window;

use std::sync::{Mutex, MutexGuard, PoisonError};

pub use action::{Action, Point};
pub use error::{InputError, KeymapError};
pub use event::{KeyEvent, MotionEvent, MouseButtonEvent, PlatformEvent, TouchEvent};
pub use event_server::{ButtonEvent, ChannelEventServer, EventServer, EventServerHandle};
pub use handlers::{KeyboardHandler, MouseDriverHandler, MouseInputHandler};
pub use key::{Key, KeySource, Modifiers};
pub use manager::{ActionQueue, InputManager, KeymapEvent};
pub use mouse::{MouseState, PointerButton};
pub use peripherals::{KeypressBuffer, KeypressHandle, PeripheralSource};
#[cfg(feature = "remote")]
pub use remote::{RemoteControl, RemoteDevice};
pub use tty::{TtyDecoder, TtyKeyboard};
pub use window::WindowId;

/// Lock a mutex, recovering the data if a holder panicked
pub(crate) fn lock<T: ?Sized>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}
