//! Peripheral keypresses
//!
//! Buses such as CEC or IR receivers that are not keyboards report
//! presses asynchronously. They land in a `KeypressBuffer` that the
//! input manager drains one key per frame. A held button repeats
//! with its accumulated hold time.

use std::collections::VecDeque;
use std::sync::{Arc, Mutex};

use super::key::Key;
use super::lock;
use crate::constants::PERIPHERAL_REPEAT_INTERVAL_MS;

/// Source of buffered peripheral keys
pub trait PeripheralSource: Send {
    /// Next key, if any; `frame_time` is the elapsed frame in seconds
    fn next_keypress(&mut self, frame_time: f32) -> Option<Key>;
}

#[derive(Debug, Clone, Copy)]
enum Transition {
    Press(u32),
    Release(u32),
}

#[derive(Debug, Clone, Copy)]
struct Held {
    code: u32,
    hold_ms: u32,
    since_repeat_ms: u32,
}

#[derive(Debug, Default)]
struct Shared {
    transitions: VecDeque<Transition>,
}

/// Keypress buffer with press/release tracking
#[derive(Debug, Default)]
pub struct KeypressBuffer {
    shared: Arc<Mutex<Shared>>,
    held: Option<Held>,
}

/// Producer side of a `KeypressBuffer`
#[derive(Debug, Clone)]
pub struct KeypressHandle {
    shared: Arc<Mutex<Shared>>,
}

impl KeypressHandle {
    pub fn press(&self, code: u32) {
        lock(&self.shared).transitions.push_back(Transition::Press(code));
    }

    pub fn release(&self, code: u32) {
        lock(&self.shared).transitions.push_back(Transition::Release(code));
    }

    /// Press and release in one go
    pub fn push(&self, code: u32) {
        let mut shared = lock(&self.shared);
        shared.transitions.push_back(Transition::Press(code));
        shared.transitions.push_back(Transition::Release(code));
    }
}

impl KeypressBuffer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn handle(&self) -> KeypressHandle {
        KeypressHandle {
            shared: self.shared.clone(),
        }
    }
}

impl PeripheralSource for KeypressBuffer {
    fn next_keypress(&mut self, frame_time: f32) -> Option<Key> {
        let elapsed_ms = (frame_time.max(0.0) * 1000.0) as u32;
        loop {
            let next = lock(&self.shared).transitions.pop_front();
            match next {
                Some(Transition::Press(code)) => {
                    self.held = Some(Held {
                        code,
                        hold_ms: 0,
                        since_repeat_ms: 0,
                    });
                    return Some(Key::new(code, 0));
                }
                Some(Transition::Release(code)) => {
                    if self.held.map(|h| h.code) == Some(code) {
                        self.held = None;
                    }
                }
                None => break,
            }
        }

        let held = self.held.as_mut()?;
        held.hold_ms = held.hold_ms.saturating_add(elapsed_ms);
        held.since_repeat_ms += elapsed_ms;
        if held.since_repeat_ms < PERIPHERAL_REPEAT_INTERVAL_MS {
            return None;
        }
        held.since_repeat_ms = 0;
        Some(Key::new(held.code, held.hold_ms))
    }
}
