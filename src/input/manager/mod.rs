//! Input manager
//!
//! Owns the device state, the keymap translator and the registered
//! handlers, and turns everything that arrives (platform events,
//! remote buttons, event server input, peripheral keys, queued
//! actions) into actions for the application.
//!
//! `process` runs once per frame on the dispatch thread. Producers on
//! other threads only ever touch the `ActionQueue`.

mod long_press;
mod queue;

pub use long_press::LongPress;
pub use queue::ActionQueue;

use std::path::PathBuf;
use std::sync::mpsc::{self, Receiver, Sender};
use std::sync::{Arc, Mutex};

use log::{debug, info, warn};
use smol_str::SmolStr;

use super::action::*;
use super::easter_egg::KeyboardEasterEgg;
use super::error::InputError;
use super::event::{MotionEvent, PlatformEvent, TouchEvent};
use super::event_server::{ButtonEvent, EventServer};
use super::handlers::{
    HandlerRegistry, KeyboardHandler, KeyboardHandlerRef, MouseDriverHandler, MouseInputHandlerRef,
};
use super::key::{Key, KeySource, Modifiers};
use super::keyboard::KeyboardStat;
use super::keycodes::{self, KEY_ASCII, KEY_INVALID, KEY_MOUSE_NOOP, KEY_VKEY, VK_A, VK_Z};
use super::lock;
use super::mouse::{MouseStat, MouseState, PointerButton};
use super::mouse_handling::{MouseInputHandling, MouseWindowingButtonMap};
use super::peripherals::PeripheralSource;
#[cfg(feature = "remote")]
use super::remote::RemoteControl;
use super::translator::keymap::KeySignature;
use super::translator::{
    ButtonTranslator, CustomControllerTranslator, IrTranslator, JoystickKeymap, JoystickMapper,
    KeymapEnvironment, TouchTranslator,
};
use super::window::{
    WindowId, WINDOW_DIALOG_KEYBOARD, WINDOW_DIALOG_NUMERIC, WINDOW_FULLSCREEN_GAME,
    WINDOW_FULLSCREEN_VIDEO,
};
use crate::constants::{
    DOUBLE_CLICK_THRESHOLD_MS, ES_FLAG_UNICODE, KEY_HOLD_THRESHOLD_MS, LONG_CLICK_THRESHOLD_MS,
};
use crate::services::{ControlKind, GuiMessage, Services};
use crate::settings::{SettingValue, SettingsCallback, SETTING_INPUT_ENABLEMOUSE};

/// Built-in commands that still run while the screensaver is up
const ALWAYS_PROCESS_BUILTINS: &[&str] = &[
    "powerdown",
    "reboot",
    "restart",
    "restartapp",
    "suspend",
    "hibernate",
    "quit",
    "shutdown",
];

/// Actions the virtual keyboard passes through from the generic keymap
const KEYBOARD_NAVIGATION_ACTIONS: &[u32] = &[
    ACTION_MOVE_LEFT,
    ACTION_MOVE_RIGHT,
    ACTION_MOVE_UP,
    ACTION_MOVE_DOWN,
    ACTION_SELECT_ITEM,
    ACTION_ENTER,
    ACTION_PREVIOUS_MENU,
    ACTION_NAV_BACK,
    ACTION_VOICE_RECOGNIZE,
];

/// Actions the virtual keyboard takes from its own section
const KEYBOARD_CONTROL_ACTIONS: &[u32] = &[
    ACTION_BACKSPACE,
    ACTION_SHIFT,
    ACTION_SYMBOLS,
    ACTION_CURSOR_LEFT,
    ACTION_CURSOR_RIGHT,
];

/// Keymap change notification
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum KeymapEvent {
    Loaded,
    Cleared,
    DeviceAdded(String),
    DeviceRemoved(String),
}

/// Construction options
#[derive(Debug, Clone)]
pub struct InputOptions {
    /// Keymaps applied on top of the built-in one
    pub keymap_paths: Vec<PathBuf>,
    /// Directories searched for device keymaps
    pub device_dirs: Vec<PathBuf>,
    /// Key signature that pastes into text fields
    pub paste_binding: String,
    pub hold_threshold_ms: u32,
    pub double_click_ms: u64,
    pub long_click_ms: u64,
}

impl Default for InputOptions {
    fn default() -> Self {
        Self {
            keymap_paths: Vec::new(),
            device_dirs: Vec::new(),
            paste_binding: default_paste_binding().to_string(),
            hold_threshold_ms: KEY_HOLD_THRESHOLD_MS,
            double_click_ms: DOUBLE_CLICK_THRESHOLD_MS,
            long_click_ms: LONG_CLICK_THRESHOLD_MS,
        }
    }
}

/// Platform paste shortcut
pub fn default_paste_binding() -> &'static str {
    if cfg!(target_os = "macos") {
        "meta+v"
    } else {
        "ctrl+v"
    }
}

fn always_process(action: &Action) -> bool {
    !action.name().is_empty()
        && ALWAYS_PROCESS_BUILTINS.contains(&builtin_command(action.name()).as_str())
}

fn starts_with_ignore_case(s: &str, prefix: &str) -> bool {
    s.len() >= prefix.len()
        && s.is_char_boundary(prefix.len())
        && s[..prefix.len()].eq_ignore_ascii_case(prefix)
}

pub struct InputManager {
    services: Services,
    translator: ButtonTranslator,
    keymap_env: KeymapEnvironment,
    touch: Arc<Mutex<TouchTranslator>>,
    custom_controller: Arc<Mutex<CustomControllerTranslator>>,
    joystick: Arc<Mutex<JoystickMapper>>,
    ir: IrTranslator,
    keyboard: KeyboardStat,
    mouse: MouseStat,
    #[cfg(feature = "remote")]
    remote: Option<RemoteControl>,
    event_server: Option<Box<dyn EventServer>>,
    peripherals: Option<Box<dyn PeripheralSource>>,
    queue: ActionQueue,
    long_press: LongPress,
    keyboard_handlers: HandlerRegistry<dyn KeyboardHandler>,
    mouse_handlers: Vec<MouseInputHandling>,
    easter_egg: Arc<Mutex<KeyboardEasterEgg>>,
    paste_binding: KeySignature,
    keymap_observers: Vec<Sender<KeymapEvent>>,
    /// Timestamp of the latest platform event
    last_event_ms: u64,
}

impl InputManager {
    pub fn new(services: Services, options: InputOptions) -> Self {
        let mut translator = ButtonTranslator::new(options.keymap_paths, options.device_dirs);

        let touch = Arc::new(Mutex::new(TouchTranslator::default()));
        let custom_controller = Arc::new(Mutex::new(CustomControllerTranslator::default()));
        let joystick = Arc::new(Mutex::new(JoystickMapper::default()));
        translator.register_mapper("touch", touch.clone());
        translator.register_mapper("customcontroller", custom_controller.clone());
        translator.register_mapper("joystick", joystick.clone());

        let easter_egg = Arc::new(Mutex::new(KeyboardEasterEgg::default()));
        let egg_handler: KeyboardHandlerRef = easter_egg.clone();
        let mut keyboard_handlers = HandlerRegistry::default();
        keyboard_handlers.register(&egg_handler);

        Self {
            services,
            translator,
            keymap_env: KeymapEnvironment::default(),
            touch,
            custom_controller,
            joystick,
            ir: IrTranslator::default(),
            keyboard: KeyboardStat::new(options.hold_threshold_ms),
            mouse: MouseStat::new(options.double_click_ms, options.long_click_ms),
            #[cfg(feature = "remote")]
            remote: None,
            event_server: None,
            peripherals: None,
            queue: ActionQueue::new(),
            long_press: LongPress::Idle,
            keyboard_handlers,
            mouse_handlers: Vec::new(),
            easter_egg,
            paste_binding: KeySignature::parse(&options.paste_binding),
            keymap_observers: Vec::new(),
            last_event_ms: 0,
        }
    }

    pub fn set_event_server(&mut self, server: Box<dyn EventServer>) {
        self.event_server = Some(server);
    }

    pub fn set_peripherals(&mut self, source: Box<dyn PeripheralSource>) {
        self.peripherals = Some(source);
    }

    /// Connect the remote and apply the mouse setting
    pub fn initialize_inputs(&mut self) {
        self.initialize_remote_control();
        let enabled = self
            .services
            .settings
            .get_bool(SETTING_INPUT_ENABLEMOUSE)
            .unwrap_or(true);
        self.mouse.set_enabled(enabled);
        info!("Inputs initialized (mouse {})", if enabled { "enabled" } else { "disabled" });
    }

    pub fn deinitialize(&mut self) {
        self.disable_remote_control_device();
    }

    // ========================================================================
    // Per-frame processing
    // ========================================================================

    /// Poll every source once and drain the action queue
    pub fn process(&mut self, window: WindowId, frame_time: f32) -> bool {
        self.process_remote();
        self.process_event_server(window, frame_time);
        self.process_peripherals(frame_time);
        self.process_queued_actions();

        self.keymap_env.set_window_id(window);
        true
    }

    fn process_event_server(&mut self, window: WindowId, frame_time: f32) -> bool {
        let Some(mut server) = self.event_server.take() else {
            return false;
        };
        let handled = self.poll_event_server(server.as_mut(), window, frame_time);
        self.event_server = Some(server);
        handled
    }

    fn poll_event_server(&mut self, es: &mut dyn EventServer, window: WindowId, frame_time: f32) -> bool {
        if !es.is_running() || es.client_count() == 0 {
            return false;
        }

        let app = self.services.app.clone();
        if es.execute_next_action(app.as_ref()) {
            app.reset_system_idle_timer();
            app.reset_screensaver();
            app.wake_up_screensaver(false);
        }

        // The action may have stopped the server
        if !es.is_running() || es.client_count() == 0 {
            return false;
        }

        if let Some(button) = es.next_button().filter(|b| b.code != 0) {
            match button.map_name.as_deref() {
                Some(map_name) if button.is_joystick => {
                    debug!("Joystick '{}' is not supported via the event server", map_name);
                    return false;
                }
                Some(map_name) => {
                    if let Some(handled) = self.event_server_controller(window, map_name, &button) {
                        return handled;
                    }
                }
                None => return self.event_server_key(&button, frame_time),
            }
        }

        if let Some(pos) = es.mouse_position() {
            if self.mouse.is_enabled() {
                let motion = MotionEvent {
                    x: pos.x.max(0.0) as u16,
                    y: pos.y.max(0.0) as u16,
                    time_ms: self.last_event_ms,
                };
                self.mouse.handle_event(&PlatformEvent::MouseMotion(motion));
                return app.on_action(&Action::pointer(
                    ACTION_MOUSE_MOVE,
                    0,
                    pos,
                    Point::default(),
                    "",
                ));
            }
        }
        false
    }

    /// Custom controller button; None if it could not be mapped
    fn event_server_controller(&mut self, window: WindowId, controller: &str, button: &ButtonEvent) -> Option<bool> {
        let Some((id, name)) = self.translate_custom_controller_string(window, controller, button.code) else {
            warn!(
                "Failed to map custom controller action: controller '{}' button {}",
                controller, button.code
            );
            return None;
        };

        let app = &self.services.app;
        app.reset_system_idle_timer();
        app.reset_screensaver();
        if app.wake_up_screensaver(false) {
            return Some(true);
        }

        self.mouse.set_active(false);
        Some(self.execute_input_action(&Action::with_amount(id, button.amount, &name)))
    }

    fn event_server_key(&mut self, button: &ButtonEvent, frame_time: f32) -> bool {
        if button.code & ES_FLAG_UNICODE != 0 {
            let Some(ch) = char::from_u32(button.code & !ES_FLAG_UNICODE) else {
                debug!("Event server: invalid character {:#x}", button.code);
                return false;
            };
            return self.on_key(&Key::from_unicode(ch));
        }

        let key = if keycodes::is_analog_button(button.code) {
            Key::analog(button.code, button.amount, frame_time)
        } else {
            Key::new(button.code, 0)
        };
        self.on_key(&key.with_source(KeySource::Service))
    }

    fn process_peripherals(&mut self, frame_time: f32) -> bool {
        match self.peripherals.as_mut().and_then(|p| p.next_keypress(frame_time)) {
            Some(key) => self.on_key(&key),
            None => false,
        }
    }

    fn process_queued_actions(&mut self) {
        for action in self.queue.take() {
            self.services.app.on_action(&action);
        }
    }

    // ========================================================================
    // Action queue
    // ========================================================================

    pub fn queue_action(&self, action: Action) {
        self.queue.push(action);
    }

    /// Producer entry point; see `ActionQueue::on_action`
    pub fn on_action(&self, action: &Action) -> bool {
        self.queue.on_action(action)
    }

    /// Handle for producers on other threads
    pub fn action_queue(&self) -> ActionQueue {
        self.queue.clone()
    }

    // ========================================================================
    // Platform events
    // ========================================================================

    /// Feed one platform event
    ///
    /// Returns false only for touch input that resolves to nothing.
    pub fn on_event(&mut self, event: &PlatformEvent) -> bool {
        match event {
            PlatformEvent::KeyDown(ev) => {
                self.last_event_ms = ev.time_ms;
                if keycodes::is_modifier_sym(ev.sym) {
                    return true;
                }
                self.keyboard.process_key_down(ev);
                let key = self.keyboard.translate_key(ev);
                self.on_key(&key);
            }
            PlatformEvent::KeyUp(ev) => {
                self.last_event_ms = ev.time_ms;
                if keycodes::is_modifier_sym(ev.sym) {
                    return true;
                }
                self.keyboard.process_key_up(ev);
                let key = self.keyboard.translate_key(ev);
                self.on_key_up(&key);
            }
            PlatformEvent::MouseButtonDown(ev) | PlatformEvent::MouseButtonUp(ev) => {
                self.last_event_ms = ev.time_ms;
                self.on_pointer_event(event);
            }
            PlatformEvent::MouseMotion(ev) => {
                self.last_event_ms = ev.time_ms;
                self.on_pointer_event(event);
            }
            PlatformEvent::Touch(touch) => return self.on_touch(touch),
        }
        true
    }

    fn on_pointer_event(&mut self, event: &PlatformEvent) {
        self.mouse_handlers.retain(MouseInputHandling::is_alive);

        let mut handled = false;
        for driver in &mut self.mouse_handlers {
            handled = match event {
                PlatformEvent::MouseMotion(m) => driver.on_position(m.x as i32, m.y as i32),
                PlatformEvent::MouseButtonDown(b) => driver.on_button_press(b.button),
                PlatformEvent::MouseButtonUp(b) => {
                    driver.on_button_release(b.button);
                    false
                }
                _ => false,
            };
            if handled {
                break;
            }
        }

        if !handled {
            self.mouse.handle_event(event);
            let window = self.services.windows.active_window();
            self.process_mouse(window);
        }
    }

    fn process_mouse(&mut self, window: WindowId) -> bool {
        let app = self.services.app.clone();
        if !self.mouse.is_active() || !app.is_app_focused() {
            return false;
        }

        let mouse_key = self.mouse.key();
        if mouse_key == KEY_MOUSE_NOOP {
            return true;
        }

        app.reset_system_idle_timer();
        app.reset_screensaver();
        if app.wake_up_screensaver(false) {
            return true;
        }

        let action = self.translator.get_action(window, &Key::new(mouse_key, 0), true);

        if !action.is_mouse() {
            self.mouse.set_active(false);
        }

        // Sensitive mice would close dialogs that react to any action
        if action.id() == ACTION_NOOP {
            return false;
        }

        if action.id() == ACTION_NONE {
            debug!("unknown mouse command {:#06x}", mouse_key);
            return false;
        }

        if action.id() != ACTION_MOUSE_MOVE {
            debug!("trying mouse action {}", action.name());
        }

        // Wheel bound to volume and the like: no position
        if !action.is_mouse() {
            return app.on_action(&action);
        }

        app.on_action(&Action::pointer(
            action.id(),
            self.mouse.hold(PointerButton::Left),
            self.mouse.position(),
            self.mouse.delta(),
            action.name(),
        ))
    }

    fn on_touch(&mut self, touch: &TouchEvent) -> bool {
        let position = Point::new(touch.x, touch.y);
        if touch.action == ACTION_TOUCH_TAP {
            // Zero-delta move selects the item under the finger first
            self.services.app.on_action(&Action::pointer(
                ACTION_MOUSE_MOVE,
                0,
                position,
                Point::default(),
                "",
            ));
        }

        let (id, name) = match touch.action {
            ACTION_GESTURE_BEGIN | ACTION_GESTURE_END | ACTION_GESTURE_ABORT => {
                (touch.action, SmolStr::default())
            }
            _ => {
                let window = self.services.windows.active_window();
                self.translate_touch_action(window, touch.action, touch.pointers)
                    .unwrap_or_default()
            }
        };

        if id == ACTION_NONE {
            return false;
        }

        let action = if (ACTION_TOUCH_TAP..=ACTION_GESTURE_END).contains(&id)
            || (ACTION_MOUSE_START..=ACTION_MOUSE_END).contains(&id)
        {
            Action::touch(
                id,
                [
                    position,
                    Point::new(touch.x2, touch.y2),
                    Point::new(touch.x3, touch.y3),
                ],
            )
        } else if id == ACTION_BUILT_IN_FUNCTION && !name.is_empty() {
            Action::named(id, &name)
        } else {
            Action::new(id)
        };
        self.services.messenger.post_action(action);

        if touch.action == ACTION_GESTURE_END || touch.action == ACTION_TOUCH_TAP {
            self.services.messenger.send_gui_message(GuiMessage::UnfocusAll);
        }
        true
    }

    // ========================================================================
    // Keys
    // ========================================================================

    /// Dispatch a key press
    ///
    /// Keyboard handlers get the first chance. Keys with a long-press
    /// binding are held back until they either escalate or are released.
    pub fn on_key(&mut self, key: &Key) -> bool {
        let mut claimed = false;
        for handler in self.keyboard_handlers.snapshot() {
            if lock(&handler).on_key_press(key) {
                claimed = true;
                break;
            }
        }
        if claimed {
            self.long_press.reset();
            return true;
        }

        if self.long_press.is_escalated_repeat(key) {
            // Long presses do not repeat
            return false;
        }

        let window = self.services.windows.active_window();
        if !self.translator.has_longpress_mapping(window, key) {
            self.long_press.reset();
            return self.handle_key(key);
        }

        let mut handled = false;
        if self.long_press.escalates(key) {
            self.long_press.track(key);
            handled = self.handle_key(key);
        }
        self.long_press.track(key);
        handled
    }

    /// Dispatch a key release, firing a pending short press
    pub fn on_key_up(&mut self, key: &Key) {
        for handler in self.keyboard_handlers.snapshot() {
            lock(&handler).on_key_release(key);
        }

        if let Some(pending) = self.long_press.take_pending() {
            self.handle_key(&pending);
        }
    }

    fn handle_key(&mut self, key: &Key) -> bool {
        // A key from controller or remote turns the pointer off
        self.mouse.set_active(false);

        let window = self.services.windows.active_window();
        let app = self.services.app.clone();

        let mut action = self.translator.get_action(window, key, true);

        app.reset_system_idle_timer();
        let process_key = always_process(&action);

        if starts_with_ignore_case(action.name(), "CECToggleState") {
            debug!("{} pressed, toggling state of playing device", key.name());
            if !self.services.messenger.send_cec_toggle_state() {
                return true;
            }
        } else if starts_with_ignore_case(action.name(), "CECStandby") {
            self.services.messenger.post_cec_standby();
            return true;
        }

        app.reset_screensaver();

        if app.wake_up_screensaver(process_key) && !process_key {
            debug!("{} pressed, screen saver/dpms woken up", key.name());
            return true;
        }

        if window != WINDOW_FULLSCREEN_VIDEO && window != WINDOW_FULLSCREEN_GAME {
            if self.uses_keyboard(window, key) {
                let keyboard_action = self.keyboard_action(key);
                debug!(
                    "{} pressed, trying keyboard action {:#x}",
                    key.name(),
                    keyboard_action.id()
                );
                if app.on_action(&keyboard_action) {
                    return true;
                }
                // Not handled: fall through to the generic mapping
            }

            if !key.from_service() || key.code() != KEY_INVALID {
                action = self.translator.get_action(window, key, true);
            }
        }

        if !key.is_analog_button() {
            debug!(
                "{} pressed, window {}, action is {}",
                key.name(),
                window,
                action_name(action.id()).unwrap_or(action.name())
            );
        }
        self.execute_input_action(&action)
    }

    /// Whether the key goes to text input instead of the window keymap
    fn uses_keyboard(&self, window: WindowId, key: &Key) -> bool {
        if key.from_keyboard_device()
            && (window == WINDOW_DIALOG_KEYBOARD || window == WINDOW_DIALOG_NUMERIC)
        {
            return true;
        }
        match self.services.windows.focused_control() {
            Some(ControlKind::Edit) => true,
            // Shift+letter jumps within lists
            Some(ControlKind::Container) => {
                key.modifiers().contains(Modifiers::SHIFT) && (VK_A..=VK_Z).contains(&key.vkey())
            }
            _ => false,
        }
    }

    /// Resolve a key for text input
    ///
    /// Navigation from the generic keymap and the virtual keyboard's own
    /// controls pass through; anything else becomes a raw character.
    fn keyboard_action(&self, key: &Key) -> Action {
        let action = self.translator.get_action(WINDOW_DIALOG_KEYBOARD, key, true);
        if KEYBOARD_NAVIGATION_ACTIONS.contains(&action.id()) {
            return action;
        }

        let action = self.translator.get_action(WINDOW_DIALOG_KEYBOARD, key, false);
        if (REMOTE_0..=REMOTE_9).contains(&action.id())
            || KEYBOARD_CONTROL_ACTIONS.contains(&action.id())
        {
            return action;
        }

        if key.from_service() {
            let id = if key.code() != KEY_INVALID {
                key.button_code()
            } else {
                ACTION_NONE
            };
            Action::with_unicode(id, key.unicode())
        } else if self.paste_binding.matches(key) {
            Action::new(ACTION_PASTE)
        } else if key.unicode().is_some() {
            Action::with_unicode(key.ascii() as u32 | KEY_ASCII, key.unicode())
        } else {
            Action::with_unicode(key.vkey() as u32 | KEY_VKEY, key.unicode())
        }
    }

    /// Run an action with its sound cue
    ///
    /// Fresh presses play the cue first. Held actions are not fired every
    /// frame, so their cue plays only after they were handled.
    fn execute_input_action(&self, action: &Action) -> bool {
        let app = &self.services.app;
        let audio = &self.services.audio;
        if action.hold_time_ms() > 0 {
            let handled = app.on_action(action);
            if handled {
                audio.play_action_sound(action);
            }
            handled
        } else {
            audio.play_action_sound(action);
            app.on_action(action)
        }
    }

    // ========================================================================
    // Handlers
    // ========================================================================

    pub fn register_keyboard_handler(&mut self, handler: &KeyboardHandlerRef) -> bool {
        self.keyboard_handlers.register(handler)
    }

    pub fn unregister_keyboard_handler(&mut self, handler: &KeyboardHandlerRef) -> bool {
        self.keyboard_handlers.unregister(handler)
    }

    /// Register a pointer consumer; returns the controller profile it sees
    pub fn register_mouse_handler(&mut self, handler: &MouseInputHandlerRef) -> &'static str {
        let weak = Arc::downgrade(handler);
        self.mouse_handlers.retain(MouseInputHandling::is_alive);
        if !self.mouse_handlers.iter().any(|h| h.wraps(&weak)) {
            self.mouse_handlers
                .insert(0, MouseInputHandling::new(weak, MouseWindowingButtonMap));
        }
        MouseWindowingButtonMap.controller_id()
    }

    pub fn unregister_mouse_handler(&mut self, handler: &MouseInputHandlerRef) {
        let weak = Arc::downgrade(handler);
        self.mouse_handlers
            .retain(|h| h.is_alive() && !h.wraps(&weak));
    }

    // ========================================================================
    // Mouse
    // ========================================================================

    pub fn set_mouse_active(&mut self, active: bool) {
        self.mouse.set_active(active);
    }

    pub fn set_mouse_enabled(&mut self, enabled: bool) {
        self.mouse.set_enabled(enabled);
    }

    pub fn is_mouse_active(&self) -> bool {
        self.mouse.is_active()
    }

    pub fn is_mouse_enabled(&self) -> bool {
        self.mouse.is_enabled()
    }

    pub fn mouse_state(&self) -> MouseState {
        self.mouse.state()
    }

    pub fn set_mouse_state(&mut self, state: MouseState) {
        self.mouse.set_state(state);
    }

    pub fn mouse_position(&self) -> Point {
        self.mouse.position()
    }

    pub fn set_mouse_resolution(&mut self, max_x: u32, max_y: u32, speed_x: f32, speed_y: f32) {
        self.mouse.set_resolution(max_x, max_y, speed_x, speed_y);
    }

    // ========================================================================
    // Keymaps
    // ========================================================================

    /// Receive a notification on every keymap change
    pub fn subscribe_keymap_changes(&mut self) -> Receiver<KeymapEvent> {
        let (tx, rx) = mpsc::channel();
        self.keymap_observers.push(tx);
        rx
    }

    fn notify_keymap_observers(&mut self, event: KeymapEvent) {
        self.keymap_observers
            .retain(|tx| tx.send(event.clone()).is_ok());
    }

    pub fn load_keymaps(&mut self) -> bool {
        let loaded = self.translator.load();
        if loaded {
            self.ir.load(self.translator.documents());
        }
        self.notify_keymap_observers(KeymapEvent::Loaded);
        loaded
    }

    pub fn reload_keymaps(&mut self) -> bool {
        self.load_keymaps()
    }

    pub fn clear_keymaps(&mut self) {
        self.translator.clear();
        self.ir.clear();
        self.notify_keymap_observers(KeymapEvent::Cleared);
    }

    /// Layer a device keymap; notifies only if something changed
    pub fn add_keymap(&mut self, name: &str) -> bool {
        if !self.translator.add_device(name) {
            return false;
        }
        self.ir.load(self.translator.documents());
        self.notify_keymap_observers(KeymapEvent::DeviceAdded(name.to_string()));
        true
    }

    pub fn remove_keymap(&mut self, name: &str) -> bool {
        if !self.translator.remove_device(name) {
            return false;
        }
        self.ir.load(self.translator.documents());
        self.notify_keymap_observers(KeymapEvent::DeviceRemoved(name.to_string()));
        true
    }

    pub fn set_keymap_paths(&mut self, keymap_paths: Vec<PathBuf>, device_dirs: Vec<PathBuf>) {
        self.translator.set_keymap_paths(keymap_paths, device_dirs);
    }

    pub fn keymap_environment(&self) -> &KeymapEnvironment {
        &self.keymap_env
    }

    // ========================================================================
    // Translator facade
    // ========================================================================

    pub fn get_action(&self, window: WindowId, key: &Key) -> Action {
        self.translator.get_action(window, key, true)
    }

    pub fn get_global_action(&self, key: &Key) -> Action {
        self.translator.get_global_action(key)
    }

    pub fn has_longpress_mapping(&self, window: WindowId, key: &Key) -> bool {
        self.translator.has_longpress_mapping(window, key)
    }

    pub fn translate_custom_controller_string(
        &self,
        window: WindowId,
        controller: &str,
        button: u32,
    ) -> Option<(u32, SmolStr)> {
        lock(&self.custom_controller)
            .translate(window, controller, button)
            .map(|t| (t.id, t.name.clone()))
    }

    pub fn translate_touch_action(
        &self,
        window: WindowId,
        touch_action: u32,
        pointers: u32,
    ) -> Option<(u32, SmolStr)> {
        lock(&self.touch)
            .translate(window, touch_action, pointers)
            .map(|t| (t.id, t.name.clone()))
    }

    pub fn get_joystick_keymaps(&self) -> Vec<JoystickKeymap> {
        lock(&self.joystick).keymaps()
    }

    pub fn translate_lirc_remote_string(&self, remote: &str, button: &str) -> Option<u32> {
        self.ir.translate(remote, button)
    }

    /// Toggled by the keyboard easter egg sequence
    pub fn easter_egg_enabled(&self) -> bool {
        lock(&self.easter_egg).is_enabled()
    }
}

// ============================================================================
// Remote control
// ============================================================================

#[cfg(feature = "remote")]
impl InputManager {
    pub fn set_remote_control(&mut self, remote: RemoteControl) {
        self.remote = Some(remote);
    }

    fn process_remote(&mut self) -> bool {
        let Some(remote) = self.remote.as_mut() else {
            return false;
        };
        remote.update(&self.ir);
        let Some(button) = remote.button() else {
            return false;
        };
        remote.reset();
        self.on_key(&Key::new(button.code, button.hold_time_ms))
    }

    pub fn has_builtin(&self, command: &str) -> bool {
        matches!(
            command.to_ascii_lowercase().as_str(),
            "remote.start" | "remote.stop" | "remote.send"
        )
    }

    /// Run a remote built-in command
    pub fn execute_builtin(&mut self, command: &str, params: &[&str]) -> Result<(), InputError> {
        let command = command.to_ascii_lowercase();
        if !self.has_builtin(&command) {
            return Err(InputError::UnknownBuiltin(command));
        }
        let remote = self.remote.as_mut().ok_or(InputError::RemoteUnavailable)?;
        match command.as_str() {
            "remote.stop" => {
                remote.disconnect();
                remote.set_enabled(false);
            }
            "remote.start" => {
                remote.set_enabled(true);
                remote.initialize();
            }
            _ => remote.add_send_command(params.join(" ")),
        }
        Ok(())
    }

    pub fn is_remote_control_enabled(&self) -> bool {
        self.remote.as_ref().is_some_and(RemoteControl::is_in_use)
    }

    pub fn is_remote_control_initialized(&self) -> bool {
        self.remote.as_ref().is_some_and(RemoteControl::is_initialized)
    }

    pub fn enable_remote_control(&mut self) {
        if let Some(remote) = self.remote.as_mut() {
            remote.set_enabled(true);
            if !remote.is_initialized() {
                remote.initialize();
            }
        }
    }

    pub fn disable_remote_control(&mut self) {
        self.disable_remote_control_device();
    }

    fn disable_remote_control_device(&mut self) {
        if let Some(remote) = self.remote.as_mut() {
            remote.disconnect();
            remote.set_enabled(false);
        }
    }

    pub fn initialize_remote_control(&mut self) {
        if let Some(remote) = self.remote.as_mut() {
            if !remote.is_initialized() {
                remote.initialize();
            }
        }
    }

    pub fn set_remote_control_name(&mut self, name: &str) {
        if let Some(remote) = self.remote.as_mut() {
            remote.set_device_name(name);
        }
    }
}

#[cfg(not(feature = "remote"))]
impl InputManager {
    fn process_remote(&mut self) -> bool {
        false
    }

    pub fn has_builtin(&self, _command: &str) -> bool {
        false
    }

    pub fn execute_builtin(&mut self, _command: &str, _params: &[&str]) -> Result<(), InputError> {
        Ok(())
    }

    pub fn is_remote_control_enabled(&self) -> bool {
        false
    }

    pub fn is_remote_control_initialized(&self) -> bool {
        false
    }

    pub fn enable_remote_control(&mut self) {}

    pub fn disable_remote_control(&mut self) {}

    fn disable_remote_control_device(&mut self) {}

    pub fn initialize_remote_control(&mut self) {}

    pub fn set_remote_control_name(&mut self, _name: &str) {}
}

impl SettingsCallback for InputManager {
    fn on_setting_changed(&mut self, id: &str, value: &SettingValue) {
        if id == SETTING_INPUT_ENABLEMOUSE {
            if let Some(enabled) = value.as_bool() {
                self.mouse.set_enabled(enabled);
            }
        }
    }
}

impl Drop for InputManager {
    fn drop(&mut self) {
        self.deinitialize();
    }
}
