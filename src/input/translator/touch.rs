//! Touch gesture mapping
//!
//! `[<window>.touch]` sections bind gestures to actions. A gesture
//! name may carry a pointer count: `"swipeleft:2" = "Back"`.

use std::collections::{BTreeMap, HashMap};

use log::warn;

use super::keymap::{string_entries, ActionTemplate};
use super::ButtonMapper;
use crate::input::action::{
    ACTION_GESTURE_PAN, ACTION_GESTURE_ROTATE, ACTION_GESTURE_SWIPE_DOWN,
    ACTION_GESTURE_SWIPE_LEFT, ACTION_GESTURE_SWIPE_RIGHT, ACTION_GESTURE_SWIPE_UP,
    ACTION_GESTURE_ZOOM, ACTION_TOUCH_LONGPRESS, ACTION_TOUCH_TAP,
};
use crate::input::window::{WindowId, WINDOW_GLOBAL};

const GESTURE_NAMES: &[(&str, u32)] = &[
    ("tap", ACTION_TOUCH_TAP),
    ("longpress", ACTION_TOUCH_LONGPRESS),
    ("pan", ACTION_GESTURE_PAN),
    ("zoom", ACTION_GESTURE_ZOOM),
    ("rotate", ACTION_GESTURE_ROTATE),
    ("swipeleft", ACTION_GESTURE_SWIPE_LEFT),
    ("swiperight", ACTION_GESTURE_SWIPE_RIGHT),
    ("swipeup", ACTION_GESTURE_SWIPE_UP),
    ("swipedown", ACTION_GESTURE_SWIPE_DOWN),
];

/// (touch action, pointer count)
type GestureKey = (u32, u32);

/// Touch gesture to action lookup
#[derive(Debug, Default)]
pub struct TouchTranslator {
    windows: HashMap<WindowId, BTreeMap<GestureKey, ActionTemplate>>,
}

impl TouchTranslator {
    fn parse_gesture(name: &str) -> Option<GestureKey> {
        let (gesture, pointers) = match name.split_once(':') {
            Some((g, p)) => (g, p.trim().parse::<u32>().ok()?),
            None => (name, 1),
        };
        if pointers == 0 {
            return None;
        }
        GESTURE_NAMES
            .iter()
            .find(|(n, _)| n.eq_ignore_ascii_case(gesture.trim()))
            .map(|&(_, id)| (id, pointers))
    }

    /// Resolve a touch action in a window, falling back to global
    pub fn translate(&self, window: WindowId, touch_action: u32, pointers: u32) -> Option<&ActionTemplate> {
        let key = (touch_action, pointers);
        self.windows
            .get(&window)
            .and_then(|m| m.get(&key))
            .or_else(|| self.windows.get(&WINDOW_GLOBAL).and_then(|m| m.get(&key)))
    }
}

impl ButtonMapper for TouchTranslator {
    fn map_actions(&mut self, window: WindowId, section: &toml::Value) {
        let Some(table) = section.as_table() else {
            warn!("Touch keymap for window {} is not a table", window);
            return;
        };
        let map = self.windows.entry(window).or_default();
        for (gesture, action_name) in string_entries(table, "touch") {
            let Some(key) = Self::parse_gesture(gesture) else {
                warn!("Unknown touch gesture '{}' in window {}", gesture, window);
                continue;
            };
            match ActionTemplate::parse(action_name) {
                Some(template) => {
                    map.insert(key, template);
                }
                None => warn!("Unknown touch action '{}' in window {}", action_name, window),
            }
        }
    }

    fn clear(&mut self) {
        self.windows.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::input::action::{ACTION_MOUSE_LEFT_CLICK, ACTION_NAV_BACK};
    use crate::input::window::WINDOW_HOME;

    #[test]
    fn test_pointer_counts() {
        let mut touch = TouchTranslator::default();
        let section: toml::Value = toml::from_str(
            r#"
tap = "LeftClick"
"swipeleft:2" = "Back"
"pinch" = "Back"
"#,
        )
        .unwrap();
        touch.map_actions(WINDOW_GLOBAL, &section);

        let tap = touch.translate(WINDOW_HOME, ACTION_TOUCH_TAP, 1).unwrap();
        assert_eq!(tap.id, ACTION_MOUSE_LEFT_CLICK);
        assert!(touch.translate(WINDOW_HOME, ACTION_GESTURE_SWIPE_LEFT, 1).is_none());
        let swipe = touch.translate(WINDOW_HOME, ACTION_GESTURE_SWIPE_LEFT, 2).unwrap();
        assert_eq!(swipe.id, ACTION_NAV_BACK);

        touch.clear();
        assert!(touch.translate(WINDOW_HOME, ACTION_TOUCH_TAP, 1).is_none());
    }
}
