//! Recording service doubles shared by the end-to-end tests

#![allow(dead_code)]

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};

use mcinput::input::action::Action;
use mcinput::input::manager::{InputManager, InputOptions};
use mcinput::input::window::{WindowId, WINDOW_HOME};
use mcinput::services::{
    Application, AudioCues, ControlKind, GuiMessage, Messenger, Services, WindowManager,
};
use mcinput::settings::Settings;

/// Everything the manager told the outside world, in order
#[derive(Debug, Clone, PartialEq)]
pub enum Call {
    Action(u32),
    Sound(u32),
    Posted(u32),
    Gui(GuiMessage),
}

pub struct Harness {
    calls: Mutex<Vec<Call>>,
    actions: Mutex<Vec<Action>>,
    posted: Mutex<Vec<Action>>,
    window: Mutex<WindowId>,
    control: Mutex<Option<ControlKind>>,
    pub handles: AtomicBool,
    pub mouse_setting: Mutex<Option<bool>>,
}

impl Harness {
    pub fn new() -> Arc<Self> {
        Arc::new(Self {
            calls: Mutex::new(Vec::new()),
            actions: Mutex::new(Vec::new()),
            posted: Mutex::new(Vec::new()),
            window: Mutex::new(WINDOW_HOME),
            control: Mutex::new(None),
            handles: AtomicBool::new(true),
            mouse_setting: Mutex::new(None),
        })
    }

    pub fn services(self: &Arc<Self>) -> Services {
        Services {
            app: self.clone(),
            windows: self.clone(),
            audio: self.clone(),
            messenger: self.clone(),
            settings: self.clone(),
        }
    }

    /// Manager with the built-in keymap loaded
    pub fn manager(self: &Arc<Self>) -> InputManager {
        self.manager_with(InputOptions::default())
    }

    pub fn manager_with(self: &Arc<Self>, options: InputOptions) -> InputManager {
        let mut manager = InputManager::new(self.services(), options);
        assert!(manager.load_keymaps());
        manager
    }

    pub fn set_window(&self, window: WindowId) {
        *self.window.lock().unwrap() = window;
    }

    pub fn set_control(&self, control: Option<ControlKind>) {
        *self.control.lock().unwrap() = control;
    }

    pub fn calls(&self) -> Vec<Call> {
        self.calls.lock().unwrap().clone()
    }

    pub fn actions(&self) -> Vec<Action> {
        self.actions.lock().unwrap().clone()
    }

    pub fn action_ids(&self) -> Vec<u32> {
        self.actions().iter().map(Action::id).collect()
    }

    pub fn posted(&self) -> Vec<Action> {
        self.posted.lock().unwrap().clone()
    }

    pub fn clear(&self) {
        self.calls.lock().unwrap().clear();
        self.actions.lock().unwrap().clear();
        self.posted.lock().unwrap().clear();
    }
}

impl Application for Harness {
    fn on_action(&self, action: &Action) -> bool {
        self.calls.lock().unwrap().push(Call::Action(action.id()));
        self.actions.lock().unwrap().push(action.clone());
        self.handles.load(Ordering::SeqCst)
    }

    fn reset_system_idle_timer(&self) {}

    fn reset_screensaver(&self) {}

    fn wake_up_screensaver(&self, _power_key: bool) -> bool {
        false
    }
}

impl WindowManager for Harness {
    fn active_window(&self) -> WindowId {
        *self.window.lock().unwrap()
    }

    fn focused_control(&self) -> Option<ControlKind> {
        *self.control.lock().unwrap()
    }
}

impl AudioCues for Harness {
    fn play_action_sound(&self, action: &Action) {
        self.calls.lock().unwrap().push(Call::Sound(action.id()));
    }
}

impl Messenger for Harness {
    fn post_action(&self, action: Action) {
        self.calls.lock().unwrap().push(Call::Posted(action.id()));
        self.posted.lock().unwrap().push(action);
    }

    fn send_gui_message(&self, message: GuiMessage) {
        self.calls.lock().unwrap().push(Call::Gui(message));
    }

    fn send_cec_toggle_state(&self) -> bool {
        true
    }

    fn post_cec_standby(&self) {}
}

impl Settings for Harness {
    fn get_bool(&self, _id: &str) -> Option<bool> {
        *self.mouse_setting.lock().unwrap()
    }
}
