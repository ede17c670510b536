//! Application services
//!
//! The input manager never reaches for global state. Everything it
//! calls into (application, window manager, audio cues, messenger,
//! settings) is handed to it as a `Services` bundle.

use std::sync::Arc;

use crate::input::action::Action;
use crate::input::window::WindowId;
use crate::settings::Settings;

/// Application layer receiving resolved actions
pub trait Application: Send + Sync {
    /// Execute an action; true if something handled it
    fn on_action(&self, action: &Action) -> bool;

    fn reset_system_idle_timer(&self);

    fn reset_screensaver(&self);

    /// Wake screensaver/DPMS
    ///
    /// Returns true if it was active and the waking input should be eaten.
    /// `power_key` is set for shutdown-type commands.
    fn wake_up_screensaver(&self, power_key: bool) -> bool;

    fn is_app_focused(&self) -> bool {
        true
    }
}

/// Kind of the focused control in the active window
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ControlKind {
    /// Text entry field
    Edit,
    /// List, panel or other item container
    Container,
    Other,
}

pub trait WindowManager: Send + Sync {
    fn active_window(&self) -> WindowId;

    /// Focused control of the active window, if any
    fn focused_control(&self) -> Option<ControlKind>;
}

pub trait AudioCues: Send + Sync {
    fn play_action_sound(&self, action: &Action);
}

/// Messages for the GUI thread
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GuiMessage {
    /// Drop focus from every control
    UnfocusAll,
}

/// Application message queue
pub trait Messenger: Send + Sync {
    /// Queue an action for asynchronous execution
    fn post_action(&self, action: Action);

    fn send_gui_message(&self, message: GuiMessage);

    /// Toggle the playing CEC device; false if that failed
    fn send_cec_toggle_state(&self) -> bool;

    fn post_cec_standby(&self);
}

/// Everything the input manager calls into
#[derive(Clone)]
pub struct Services {
    pub app: Arc<dyn Application>,
    pub windows: Arc<dyn WindowManager>,
    pub audio: Arc<dyn AudioCues>,
    pub messenger: Arc<dyn Messenger>,
    pub settings: Arc<dyn Settings>,
}
