//! Joystick keymaps
//!
//! Joysticks are described by controller profiles with named
//! features ("a", "leftstick.up", ...). Each profile gets its own
//! window keymap: `[<window>.joystick."<controller id>"]`.

use std::collections::{BTreeMap, HashMap};

use log::warn;
use smol_str::SmolStr;

use super::keymap::{string_entries, ActionTemplate};
use super::ButtonMapper;
use crate::input::window::{self, WindowId, WINDOW_GLOBAL};

/// Window keymap of one controller profile
#[derive(Debug, Clone, Default)]
pub struct JoystickKeymap {
    controller_id: SmolStr,
    windows: HashMap<WindowId, BTreeMap<SmolStr, ActionTemplate>>,
}

impl JoystickKeymap {
    pub fn new(controller_id: &str) -> Self {
        Self {
            controller_id: SmolStr::new(controller_id),
            windows: HashMap::new(),
        }
    }

    pub fn controller_id(&self) -> &str {
        &self.controller_id
    }

    fn lookup(&self, window: WindowId, feature: &str) -> Option<&ActionTemplate> {
        self.windows
            .get(&window)
            .and_then(|m| m.get(feature.to_ascii_lowercase().as_str()))
    }

    /// Action bound to a feature: window, its fallback window, then global
    pub fn get_action(&self, window: WindowId, feature: &str) -> Option<&ActionTemplate> {
        self.lookup(window, feature)
            .or_else(|| window::fallback_window(window).and_then(|w| self.lookup(w, feature)))
            .or_else(|| self.lookup(WINDOW_GLOBAL, feature))
    }

    pub fn is_empty(&self) -> bool {
        self.windows.values().all(|m| m.is_empty())
    }
}

/// Collects joystick keymaps per controller profile
#[derive(Debug, Default)]
pub struct JoystickMapper {
    keymaps: BTreeMap<SmolStr, JoystickKeymap>,
}

impl JoystickMapper {
    /// Snapshot of all controller keymaps
    pub fn keymaps(&self) -> Vec<JoystickKeymap> {
        self.keymaps.values().cloned().collect()
    }

    pub fn keymap(&self, controller_id: &str) -> Option<&JoystickKeymap> {
        self.keymaps.get(controller_id)
    }
}

impl ButtonMapper for JoystickMapper {
    fn map_actions(&mut self, window: WindowId, section: &toml::Value) {
        let Some(controllers) = section.as_table() else {
            warn!("Joystick keymap for window {} is not a table", window);
            return;
        };
        for (controller, features) in controllers {
            let Some(features) = features.as_table() else {
                warn!(
                    "Joystick controller '{}' in window {}: expected a table of features",
                    controller, window
                );
                continue;
            };
            let keymap = self
                .keymaps
                .entry(SmolStr::new(controller))
                .or_insert_with(|| JoystickKeymap::new(controller));
            let map = keymap.windows.entry(window).or_default();
            for (feature, action_name) in string_entries(features, controller) {
                match ActionTemplate::parse(action_name) {
                    Some(template) => {
                        map.insert(SmolStr::new(feature.to_ascii_lowercase()), template);
                    }
                    None => warn!(
                        "Unknown action '{}' for joystick feature '{}' of '{}'",
                        action_name, feature, controller
                    ),
                }
            }
        }
    }

    fn clear(&mut self) {
        self.keymaps.clear();
    }
}
