//! Keyboard state tracking
//!
//! Turns key-down/key-up events into `Key`s. A key that keeps
//! arriving without an intervening release accumulates hold time
//! from its first press; past the threshold the long-press bit is
//! set on the produced key.

use log::debug;

use super::event::KeyEvent;
use super::key::{Key, Modifiers};
use super::keycodes;
use crate::constants::KEY_HOLD_THRESHOLD_MS;

/// First press of the key currently held
#[derive(Debug, Clone, Copy)]
struct HeldKey {
    sym: u32,
    modifiers: Modifiers,
    since_ms: u64,
}

/// Keyboard state between events
#[derive(Debug)]
pub struct KeyboardStat {
    held: Option<HeldKey>,
    hold_threshold_ms: u32,
}

impl Default for KeyboardStat {
    fn default() -> Self {
        Self::new(KEY_HOLD_THRESHOLD_MS)
    }
}

impl KeyboardStat {
    pub fn new(hold_threshold_ms: u32) -> Self {
        Self {
            held: None,
            hold_threshold_ms,
        }
    }

    pub fn set_hold_threshold(&mut self, ms: u32) {
        self.hold_threshold_ms = ms;
    }

    /// Record a key press; repeats of the held key keep its start time
    pub fn process_key_down(&mut self, event: &KeyEvent) {
        match self.held {
            Some(h) if h.sym == event.sym && h.modifiers == event.modifiers => {}
            _ => {
                self.held = Some(HeldKey {
                    sym: event.sym,
                    modifiers: event.modifiers,
                    since_ms: event.time_ms,
                });
            }
        }
    }

    pub fn process_key_up(&mut self, _event: &KeyEvent) {
        self.held = None;
    }

    /// Build the `Key` for an event, including hold time and long bit
    pub fn translate_key(&self, event: &KeyEvent) -> Key {
        let vkey = keycodes::sym_to_vkey(event.sym);
        let unicode = event.unicode.or_else(|| {
            // Printable keysyms are their own character
            if (0x20..0x7F).contains(&event.sym) {
                char::from_u32(event.sym)
            } else {
                None
            }
        });

        let held_ms = match self.held {
            Some(h) if h.sym == event.sym && h.modifiers == event.modifiers => {
                event.time_ms.saturating_sub(h.since_ms)
            }
            _ => 0,
        };
        let held_ms = u32::try_from(held_ms).unwrap_or(u32::MAX);

        let mut modifiers = event.modifiers;
        if held_ms > self.hold_threshold_ms {
            modifiers |= Modifiers::LONG;
        }

        let key = Key::from_keyboard(vkey, unicode, modifiers, held_ms);
        debug!("keyboard: {} held {}ms", key.name(), held_ms);
        key
    }
}
