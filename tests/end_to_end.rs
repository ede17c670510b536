//! Dispatch through every input source, observed from the service side

mod common;

use std::sync::atomic::Ordering;
use std::sync::{Arc, Mutex};

use common::{Call, Harness};
use mcinput::input::action::*;
use mcinput::input::event::{MotionEvent, MouseButtonEvent, PlatformEvent, TouchEvent, BUTTON_LEFT};
use mcinput::input::event_server::{ButtonEvent, ChannelEventServer};
use mcinput::input::handlers::{MouseInputHandler, MouseInputHandlerRef};
use mcinput::input::keycodes::{KEY_ASCII, KEY_BUTTON_A, KEY_BUTTON_B};
use mcinput::input::manager::{InputOptions, KeymapEvent};
use mcinput::input::peripherals::KeypressBuffer;
use mcinput::input::window::WINDOW_HOME;
use mcinput::services::{ControlKind, GuiMessage};
use mcinput::settings::{SettingValue, SettingsCallback, SETTING_INPUT_ENABLEMOUSE};

const FRAME: f32 = 0.016;

fn motion(x: u16, y: u16, time_ms: u64) -> PlatformEvent {
    PlatformEvent::MouseMotion(MotionEvent { x, y, time_ms })
}

fn left(down: bool, x: u16, y: u16, time_ms: u64) -> PlatformEvent {
    let ev = MouseButtonEvent {
        button: BUTTON_LEFT,
        x,
        y,
        time_ms,
    };
    if down {
        PlatformEvent::MouseButtonDown(ev)
    } else {
        PlatformEvent::MouseButtonUp(ev)
    }
}

// ============================================================================
// Touch
// ============================================================================

#[test]
fn test_tap_moves_pointer_then_posts_click() {
    let harness = Harness::new();
    let mut manager = harness.manager();

    let tap = TouchEvent::new(ACTION_TOUCH_TAP, 1, 40.0, 60.0);
    assert!(manager.on_event(&PlatformEvent::Touch(tap)));

    assert_eq!(
        harness.calls(),
        vec![
            Call::Action(ACTION_MOUSE_MOVE),
            Call::Posted(ACTION_MOUSE_LEFT_CLICK),
            Call::Gui(GuiMessage::UnfocusAll),
        ]
    );
    let moved = &harness.actions()[0];
    assert_eq!(moved.position(), Point::new(40.0, 60.0));
    assert_eq!(harness.posted()[0].position(), Point::new(40.0, 60.0));
}

#[test]
fn test_gesture_bracket_is_posted() {
    let harness = Harness::new();
    let mut manager = harness.manager();

    manager.on_event(&PlatformEvent::Touch(TouchEvent::new(ACTION_GESTURE_BEGIN, 2, 10.0, 10.0)));
    manager.on_event(&PlatformEvent::Touch(TouchEvent::new(ACTION_GESTURE_END, 2, 30.0, 10.0)));

    assert_eq!(
        harness.calls(),
        vec![
            Call::Posted(ACTION_GESTURE_BEGIN),
            Call::Posted(ACTION_GESTURE_END),
            Call::Gui(GuiMessage::UnfocusAll),
        ]
    );
    assert!(harness.actions().is_empty());
}

#[test]
fn test_two_finger_swipe_uses_pointer_count() {
    let harness = Harness::new();
    let mut manager = harness.manager();

    let swipe = TouchEvent::new(ACTION_GESTURE_SWIPE_LEFT, 2, 200.0, 50.0);
    assert!(manager.on_event(&PlatformEvent::Touch(swipe)));

    let posted: Vec<u32> = harness.posted().iter().map(Action::id).collect();
    assert_eq!(posted, vec![ACTION_NAV_BACK]);
}

// ============================================================================
// Remote control
// ============================================================================

#[cfg(feature = "remote")]
mod remote {
    use std::collections::VecDeque;

    use super::*;
    use mcinput::input::error::InputError;
    use mcinput::input::keycodes::REMOTE_MENU;
    use mcinput::input::remote::{RemoteControl, RemoteDevice, RemoteInput};

    /// Device double sharing its traffic with the test
    #[derive(Clone, Default)]
    struct FakeRemote {
        log: Arc<Mutex<Vec<String>>>,
        inputs: Arc<Mutex<VecDeque<RemoteInput>>>,
    }

    impl FakeRemote {
        fn log(&self) -> Vec<String> {
            self.log.lock().unwrap().clone()
        }

        fn feed(&self, input: RemoteInput) {
            self.inputs.lock().unwrap().push_back(input);
        }
    }

    impl RemoteDevice for FakeRemote {
        fn connect(&mut self, device_name: &str) -> Result<(), InputError> {
            self.log.lock().unwrap().push(format!("connect {}", device_name));
            Ok(())
        }

        fn disconnect(&mut self) {
            self.log.lock().unwrap().push("disconnect".to_string());
        }

        fn poll(&mut self) -> Option<RemoteInput> {
            self.inputs.lock().unwrap().pop_front()
        }

        fn send(&mut self, command: &str) -> Result<(), InputError> {
            self.log.lock().unwrap().push(format!("send {}", command));
            Ok(())
        }
    }

    fn remote_manager(harness: &Arc<Harness>) -> (mcinput::input::InputManager, FakeRemote) {
        let device = FakeRemote::default();
        let mut manager = harness.manager();
        let mut remote = RemoteControl::new(Box::new(device.clone()));
        remote.set_device_name("lircd");
        manager.set_remote_control(remote);
        manager.initialize_inputs();
        (manager, device)
    }

    #[test]
    fn test_builtins_drive_the_device() {
        let harness = Harness::new();
        let (mut manager, device) = remote_manager(&harness);
        assert!(manager.is_remote_control_enabled());
        assert!(manager.has_builtin("Remote.Send"));

        manager.execute_builtin("remote.send", &["KEY_POWER", "tv"]).unwrap();
        // Sent on the next frame, not immediately
        assert_eq!(device.log(), vec!["connect lircd"]);
        manager.process(WINDOW_HOME, FRAME);
        assert_eq!(device.log(), vec!["connect lircd", "send KEY_POWER tv"]);

        manager.execute_builtin("remote.stop", &[]).unwrap();
        assert!(!manager.is_remote_control_enabled());
        assert!(!manager.is_remote_control_initialized());
        assert_eq!(device.log().last().map(String::as_str), Some("disconnect"));

        manager.execute_builtin("remote.start", &[]).unwrap();
        assert!(manager.is_remote_control_enabled());
        assert_eq!(device.log().last().map(String::as_str), Some("connect lircd"));
    }

    #[test]
    fn test_remote_buttons_resolve() {
        let harness = Harness::new();
        let (mut manager, device) = remote_manager(&harness);

        device.feed(RemoteInput::Code {
            code: REMOTE_MENU,
            hold_time_ms: 0,
        });
        manager.process(WINDOW_HOME, FRAME);

        device.feed(RemoteInput::Named {
            remote: "mceusb".to_string(),
            button: "KEY_OK".to_string(),
            hold_time_ms: 0,
        });
        manager.process(WINDOW_HOME, FRAME);

        // Unmapped names are skipped
        device.feed(RemoteInput::Named {
            remote: "mceusb".to_string(),
            button: "KEY_NOT_THERE".to_string(),
            hold_time_ms: 0,
        });
        manager.process(WINDOW_HOME, FRAME);

        assert_eq!(harness.action_ids(), vec![ACTION_CONTEXT_MENU, ACTION_SELECT_ITEM]);
    }

    #[test]
    fn test_deinitialize_disconnects() {
        let harness = Harness::new();
        let (mut manager, device) = remote_manager(&harness);
        manager.deinitialize();
        assert!(!manager.is_remote_control_initialized());
        assert_eq!(device.log(), vec!["connect lircd", "disconnect"]);
    }
}

// ============================================================================
// Event server
// ============================================================================

fn event_server_manager(harness: &Arc<Harness>, options: InputOptions) -> (mcinput::input::InputManager, mcinput::input::EventServerHandle) {
    let mut manager = harness.manager_with(options);
    let server = ChannelEventServer::new();
    let handle = server.handle();
    handle.set_running(true);
    handle.client_connected();
    manager.set_event_server(Box::new(server));
    (manager, handle)
}

#[test]
fn test_event_server_button() {
    let harness = Harness::new();
    let (mut manager, handle) = event_server_manager(&harness, InputOptions::default());

    handle.send_button(ButtonEvent::button(KEY_BUTTON_A));
    manager.process(WINDOW_HOME, FRAME);

    assert_eq!(harness.action_ids(), vec![ACTION_SELECT_ITEM]);
}

#[test]
fn test_event_server_character_into_edit_control() {
    let harness = Harness::new();
    harness.set_control(Some(ControlKind::Edit));
    let (mut manager, handle) = event_server_manager(&harness, InputOptions::default());

    handle.send_button(ButtonEvent::unicode('x'));
    manager.process(WINDOW_HOME, FRAME);

    let actions = harness.actions();
    assert_eq!(actions.len(), 1);
    assert_eq!(actions[0].id(), 'x' as u32 | KEY_ASCII);
    assert_eq!(actions[0].unicode(), Some('x'));
}

#[test]
fn test_event_server_action_by_name() {
    let harness = Harness::new();
    let (mut manager, handle) = event_server_manager(&harness, InputOptions::default());

    handle.send_action("Pause");
    manager.process(WINDOW_HOME, FRAME);

    assert_eq!(harness.action_ids(), vec![ACTION_PAUSE]);
}

#[test]
fn test_event_server_custom_controller() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("controllers.toml");
    std::fs::write(&path, "[global.customcontroller.MyRemote]\n\"3\" = \"Info\"\n").unwrap();

    let harness = Harness::new();
    let options = InputOptions {
        keymap_paths: vec![path],
        ..InputOptions::default()
    };
    let (mut manager, handle) = event_server_manager(&harness, options);

    handle.send_button(ButtonEvent::mapped("MyRemote", 3, false));
    manager.process(WINDOW_HOME, FRAME);
    // Unknown controller button: nothing runs
    handle.send_button(ButtonEvent::mapped("MyRemote", 4, false));
    manager.process(WINDOW_HOME, FRAME);

    assert_eq!(
        harness.calls(),
        vec![Call::Sound(ACTION_SHOW_INFO), Call::Action(ACTION_SHOW_INFO)]
    );
}

#[test]
fn test_event_server_ignores_joysticks() {
    let harness = Harness::new();
    let (mut manager, handle) = event_server_manager(&harness, InputOptions::default());

    handle.send_button(ButtonEvent::mapped("game.controller.default", KEY_BUTTON_A, true));
    manager.process(WINDOW_HOME, FRAME);

    assert!(harness.calls().is_empty());
}

#[test]
fn test_event_server_mouse_position() {
    let harness = Harness::new();
    let (mut manager, handle) = event_server_manager(&harness, InputOptions::default());

    handle.send_mouse(320.0, 200.0);
    manager.process(WINDOW_HOME, FRAME);

    let actions = harness.actions();
    assert_eq!(actions.len(), 1);
    assert_eq!(actions[0].id(), ACTION_MOUSE_MOVE);
    assert_eq!(actions[0].position(), Point::new(320.0, 200.0));
    assert_eq!(manager.mouse_position(), Point::new(320.0, 200.0));
}

#[test]
fn test_event_server_idle_without_clients() {
    let harness = Harness::new();
    let (mut manager, handle) = event_server_manager(&harness, InputOptions::default());
    handle.client_disconnected();

    handle.send_button(ButtonEvent::button(KEY_BUTTON_A));
    manager.process(WINDOW_HOME, FRAME);

    assert!(harness.actions().is_empty());
}

// ============================================================================
// Peripherals
// ============================================================================

#[test]
fn test_peripheral_keypress() {
    let harness = Harness::new();
    let mut manager = harness.manager();
    let buffer = KeypressBuffer::new();
    let handle = buffer.handle();
    manager.set_peripherals(Box::new(buffer));

    handle.push(KEY_BUTTON_B);
    manager.process(WINDOW_HOME, FRAME);
    manager.process(WINDOW_HOME, FRAME);

    assert_eq!(harness.action_ids(), vec![ACTION_NAV_BACK]);
}

// ============================================================================
// Mouse
// ============================================================================

#[test]
fn test_mouse_move_and_click() {
    let harness = Harness::new();
    let mut manager = harness.manager();

    manager.on_event(&motion(100, 50, 0));
    assert!(manager.is_mouse_active());
    manager.on_event(&left(true, 100, 50, 100));
    manager.on_event(&left(false, 100, 50, 150));

    let actions = harness.actions();
    let ids: Vec<u32> = actions.iter().map(Action::id).collect();
    assert_eq!(ids, vec![ACTION_MOUSE_MOVE, ACTION_MOUSE_LEFT_CLICK]);
    assert_eq!(actions[1].position(), Point::new(100.0, 50.0));
}

#[test]
fn test_disabled_mouse_stays_inactive() {
    let harness = Harness::new();
    *harness.mouse_setting.lock().unwrap() = Some(false);
    let mut manager = harness.manager();
    manager.initialize_inputs();

    manager.on_event(&motion(100, 50, 0));

    assert!(!manager.is_mouse_active());
    assert!(harness.actions().is_empty());
}

#[test]
fn test_key_deactivates_mouse() {
    let harness = Harness::new();
    let mut manager = harness.manager();
    manager.on_event(&motion(100, 50, 0));
    assert!(manager.is_mouse_active());

    manager.on_key(&mcinput::input::Key::new(KEY_BUTTON_A, 0));
    assert!(!manager.is_mouse_active());
}

#[derive(Default)]
struct PointerRecorder {
    motions: Vec<(String, i32, i32)>,
}

impl MouseInputHandler for PointerRecorder {
    fn on_motion(&mut self, pointer: &str, dx: i32, dy: i32) -> bool {
        self.motions.push((pointer.to_string(), dx, dy));
        true
    }

    fn on_button_press(&mut self, _button: &str) -> bool {
        false
    }

    fn on_button_release(&mut self, _button: &str) {}
}

#[test]
fn test_mouse_handler_claims_motion() {
    let harness = Harness::new();
    let mut manager = harness.manager();
    let recorder = Arc::new(Mutex::new(PointerRecorder::default()));
    let handler: MouseInputHandlerRef = recorder.clone();

    assert_eq!(manager.register_mouse_handler(&handler), "game.controller.mouse");

    // First sample only sets the origin and falls through
    manager.on_event(&motion(10, 10, 0));
    manager.on_event(&motion(15, 8, 16));

    assert_eq!(harness.action_ids(), vec![ACTION_MOUSE_MOVE]);
    assert_eq!(recorder.lock().unwrap().motions, vec![("pointer".to_string(), 5, -2)]);

    manager.unregister_mouse_handler(&handler);
    manager.on_event(&motion(20, 8, 32));
    assert_eq!(harness.action_ids(), vec![ACTION_MOUSE_MOVE, ACTION_MOUSE_MOVE]);
}

// ============================================================================
// Queue, notifications and settings
// ============================================================================

#[test]
fn test_queued_analog_actions_collapse() {
    let harness = Harness::new();
    let mut manager = harness.manager();

    manager.queue_action(Action::with_amount(ACTION_SCROLL_UP, 0.2, "ScrollUp"));
    manager.queue_action(Action::new(ACTION_SELECT_ITEM));
    manager.queue_action(Action::with_amount(ACTION_SCROLL_UP, 0.9, "ScrollUp"));
    manager.process(WINDOW_HOME, FRAME);

    let actions = harness.actions();
    let ids: Vec<u32> = actions.iter().map(Action::id).collect();
    assert_eq!(ids, vec![ACTION_SELECT_ITEM, ACTION_SCROLL_UP]);
    assert_eq!(actions[1].amount(0), 0.9);

    // Nothing left for the next frame
    manager.process(WINDOW_HOME, FRAME);
    assert_eq!(harness.actions().len(), 2);
}

#[test]
fn test_queue_handle_from_another_thread() {
    let harness = Harness::new();
    let mut manager = harness.manager();
    let queue = manager.action_queue();

    std::thread::spawn(move || {
        queue.on_action(&Action::new(ACTION_MOVE_DOWN));
    })
    .join()
    .unwrap();
    assert!(harness.actions().is_empty());

    manager.process(WINDOW_HOME, FRAME);
    assert_eq!(harness.action_ids(), vec![ACTION_MOVE_DOWN]);
}

#[test]
fn test_keymap_subscribers_see_device_changes() {
    let dir = tempfile::tempdir().unwrap();
    std::fs::write(dir.path().join("mypad.toml"), "[global.gamepad]\na = \"Info\"\n").unwrap();

    let harness = Harness::new();
    let options = InputOptions {
        device_dirs: vec![dir.path().to_path_buf()],
        ..InputOptions::default()
    };
    let mut manager = harness.manager_with(options);
    let changes = manager.subscribe_keymap_changes();

    assert!(manager.add_keymap("mypad"));
    manager.on_key(&mcinput::input::Key::new(KEY_BUTTON_A, 0));
    assert!(manager.remove_keymap("mypad"));
    manager.on_key(&mcinput::input::Key::new(KEY_BUTTON_A, 0));

    assert_eq!(
        changes.try_iter().collect::<Vec<_>>(),
        vec![
            KeymapEvent::DeviceAdded("mypad".to_string()),
            KeymapEvent::DeviceRemoved("mypad".to_string()),
        ]
    );
    assert_eq!(harness.action_ids(), vec![ACTION_SHOW_INFO, ACTION_SELECT_ITEM]);
}

#[test]
fn test_mouse_setting_change() {
    let harness = Harness::new();
    let mut manager = harness.manager();

    manager.on_setting_changed(SETTING_INPUT_ENABLEMOUSE, &SettingValue::Bool(false));
    manager.on_event(&motion(100, 50, 0));
    assert!(harness.actions().is_empty());

    manager.on_setting_changed(SETTING_INPUT_ENABLEMOUSE, &SettingValue::Bool(true));
    manager.on_event(&motion(120, 50, 16));
    assert_eq!(harness.action_ids(), vec![ACTION_MOUSE_MOVE]);
}

#[test]
fn test_unhandled_action_plays_sound_anyway() {
    let harness = Harness::new();
    harness.handles.store(false, Ordering::SeqCst);
    let mut manager = harness.manager();

    manager.on_key(&mcinput::input::Key::new(KEY_BUTTON_A, 0));

    assert_eq!(
        harness.calls(),
        vec![Call::Sound(ACTION_SELECT_ITEM), Call::Action(ACTION_SELECT_ITEM)]
    );
}
