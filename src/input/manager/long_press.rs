//! Long-press tracking
//!
//! A key with a long-press binding is not dispatched on press. It is
//! tracked until either the keyboard source sets the long bit (the
//! long binding fires once) or the key is released (the short
//! binding fires once).

use crate::input::key::Key;
use crate::input::keycodes::KEY_INVALID;

#[derive(Debug, Clone, Default, PartialEq)]
pub enum LongPress {
    #[default]
    Idle,
    /// Pressed, short binding still pending
    Tracking(Key),
    /// Long binding already fired
    Escalated(Key),
}

impl LongPress {
    fn last_code(&self) -> Option<u32> {
        match self {
            LongPress::Idle => None,
            LongPress::Tracking(k) | LongPress::Escalated(k) => Some(k.button_code()),
        }
    }

    /// Repeat of a key whose long binding already fired
    pub fn is_escalated_repeat(&self, key: &Key) -> bool {
        matches!(self, LongPress::Escalated(k) if k.button_code() == key.button_code())
    }

    /// The long bit just appeared on this key
    pub fn escalates(&self, key: &Key) -> bool {
        key.is_long_press() && self.last_code() != Some(key.button_code())
    }

    /// Remember the key as the one being held
    pub fn track(&mut self, key: &Key) {
        *self = if key.is_long_press() {
            LongPress::Escalated(key.clone())
        } else {
            LongPress::Tracking(key.clone())
        };
    }

    pub fn reset(&mut self) {
        *self = LongPress::Idle;
    }

    /// Clear tracking, returning the key whose short binding is still owed
    pub fn take_pending(&mut self) -> Option<Key> {
        match std::mem::take(self) {
            LongPress::Tracking(key) if key.code() != KEY_INVALID => Some(key),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::input::key::Modifiers;
    use crate::input::keycodes::VK_RETURN;

    fn enter(hold: u32, long: bool) -> Key {
        let mods = if long { Modifiers::LONG } else { Modifiers::empty() };
        Key::from_keyboard(VK_RETURN, None, mods, hold)
    }

    #[test]
    fn test_transitions() {
        let mut lp = LongPress::default();
        assert!(!lp.escalates(&enter(0, false)));
        lp.track(&enter(0, false));
        assert!(matches!(lp, LongPress::Tracking(_)));

        let long = enter(300, true);
        assert!(lp.escalates(&long));
        lp.track(&long);
        assert!(lp.is_escalated_repeat(&enter(350, true)));
        assert!(!lp.escalates(&enter(350, true)));

        assert_eq!(lp.take_pending(), None);
        assert_eq!(lp, LongPress::Idle);
    }

    #[test]
    fn test_pending_short_press() {
        let mut lp = LongPress::default();
        lp.track(&enter(0, false));
        lp.track(&enter(100, false));
        assert_eq!(lp.take_pending().map(|k| k.hold_time_ms()), Some(100));
        assert_eq!(lp.take_pending(), None);
    }
}
