//! Event server bridge
//!
//! Network clients inject buttons, axes, mouse positions and whole
//! actions. The protocol itself lives elsewhere; the input manager
//! only sees the `EventServer` query surface. `ChannelEventServer`
//! is an in-process implementation fed through a cloneable handle.

use std::collections::VecDeque;
use std::sync::{Arc, Mutex};

use log::{debug, warn};

use super::action::{translate_action_string, Action, Point};
use super::lock;
use crate::constants::ES_FLAG_UNICODE;
use crate::services::Application;

/// Button or axis reported by a client
#[derive(Debug, Clone, PartialEq)]
pub struct ButtonEvent {
    /// Button code; `ES_FLAG_UNICODE` marks a character
    pub code: u32,
    /// Device map the code belongs to (custom controller or joystick)
    pub map_name: Option<String>,
    pub is_axis: bool,
    pub amount: f32,
    pub is_joystick: bool,
}

impl ButtonEvent {
    /// Plain button from the default keymap space
    pub fn button(code: u32) -> Self {
        Self {
            code,
            map_name: None,
            is_axis: false,
            amount: 1.0,
            is_joystick: false,
        }
    }

    pub fn unicode(ch: char) -> Self {
        Self::button(ES_FLAG_UNICODE | ch as u32)
    }

    pub fn axis(code: u32, amount: f32) -> Self {
        Self {
            is_axis: true,
            amount,
            ..Self::button(code)
        }
    }

    /// Button of a named device map
    pub fn mapped(map_name: &str, code: u32, is_joystick: bool) -> Self {
        Self {
            map_name: Some(map_name.to_string()),
            is_joystick,
            ..Self::button(code)
        }
    }
}

/// Query surface of a running event server
pub trait EventServer: Send {
    fn is_running(&self) -> bool;

    fn client_count(&self) -> usize;

    /// Run one queued client action; true if one ran
    fn execute_next_action(&mut self, app: &dyn Application) -> bool;

    fn next_button(&mut self) -> Option<ButtonEvent>;

    /// Absolute pointer position, if a client moved it
    fn mouse_position(&mut self) -> Option<Point>;
}

#[derive(Debug, Default)]
struct Shared {
    running: bool,
    clients: usize,
    actions: VecDeque<String>,
    buttons: VecDeque<ButtonEvent>,
    mouse: Option<Point>,
}

/// Event server fed from other threads
#[derive(Debug, Default)]
pub struct ChannelEventServer {
    shared: Arc<Mutex<Shared>>,
}

/// Producer side of a `ChannelEventServer`
#[derive(Debug, Clone)]
pub struct EventServerHandle {
    shared: Arc<Mutex<Shared>>,
}

impl ChannelEventServer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn handle(&self) -> EventServerHandle {
        EventServerHandle {
            shared: self.shared.clone(),
        }
    }
}

impl EventServerHandle {
    pub fn set_running(&self, running: bool) {
        lock(&self.shared).running = running;
    }

    pub fn client_connected(&self) {
        lock(&self.shared).clients += 1;
    }

    pub fn client_disconnected(&self) {
        let mut shared = lock(&self.shared);
        shared.clients = shared.clients.saturating_sub(1);
    }

    pub fn send_button(&self, event: ButtonEvent) {
        lock(&self.shared).buttons.push_back(event);
    }

    /// Queue an action or built-in by keymap name
    pub fn send_action(&self, name: &str) {
        lock(&self.shared).actions.push_back(name.to_string());
    }

    pub fn send_mouse(&self, x: f32, y: f32) {
        lock(&self.shared).mouse = Some(Point::new(x, y));
    }
}

impl EventServer for ChannelEventServer {
    fn is_running(&self) -> bool {
        lock(&self.shared).running
    }

    fn client_count(&self) -> usize {
        lock(&self.shared).clients
    }

    fn execute_next_action(&mut self, app: &dyn Application) -> bool {
        let Some(name) = lock(&self.shared).actions.pop_front() else {
            return false;
        };
        match translate_action_string(&name) {
            Some((id, name)) => {
                debug!("Event server action: {}", name);
                app.on_action(&Action::named(id, &name));
            }
            None => warn!("Event server: unknown action '{}'", name),
        }
        true
    }

    fn next_button(&mut self) -> Option<ButtonEvent> {
        lock(&self.shared).buttons.pop_front()
    }

    fn mouse_position(&mut self) -> Option<Point> {
        lock(&self.shared).mouse.take()
    }
}
