//! Keyboard easter egg
//!
//! Watches keys for up, up, down, down, left, right, left, right,
//! b, a and claims the final key of the sequence.

use log::info;

use super::handlers::KeyboardHandler;
use super::key::Key;
use super::keycodes::{VK_A, VK_B, VK_DOWN, VK_LEFT, VK_RIGHT, VK_UP};

const SEQUENCE: [u8; 10] = [
    VK_UP, VK_UP, VK_DOWN, VK_DOWN, VK_LEFT, VK_RIGHT, VK_LEFT, VK_RIGHT, VK_B, VK_A,
];

/// Longest prefix of the sequence that ends the keys seen so far
///
/// The first `matched` keys were a prefix; `vkey` broke it.
fn restart_position(matched: usize, vkey: u8) -> usize {
    (1..=matched)
        .rev()
        .find(|&len| {
            SEQUENCE[len - 1] == vkey && SEQUENCE[..len - 1] == SEQUENCE[matched + 1 - len..matched]
        })
        .unwrap_or(0)
}

#[derive(Debug, Default)]
pub struct KeyboardEasterEgg {
    position: usize,
    enabled: bool,
}

impl KeyboardEasterEgg {
    /// Toggled each time the sequence completes
    pub fn is_enabled(&self) -> bool {
        self.enabled
    }
}

impl KeyboardHandler for KeyboardEasterEgg {
    fn on_key_press(&mut self, key: &Key) -> bool {
        // Repeats of a held key do not advance the sequence
        if key.hold_time_ms() > 0 || !key.from_keyboard_device() {
            return false;
        }
        if key.vkey() == SEQUENCE[self.position] {
            self.position += 1;
        } else {
            self.position = restart_position(self.position, key.vkey());
            return false;
        }
        if self.position == SEQUENCE.len() {
            self.position = 0;
            self.enabled = !self.enabled;
            info!("Easter egg {}", if self.enabled { "enabled" } else { "disabled" });
            return true;
        }
        false
    }

    fn on_key_release(&mut self, _key: &Key) {}
}
