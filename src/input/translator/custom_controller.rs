//! Custom controller mapping
//!
//! Network clients may send buttons of named controllers that have
//! no fixed code space. `[<window>.customcontroller.<name>]` maps
//! numeric button ids of each controller to actions.

use std::collections::{BTreeMap, HashMap};

use log::warn;
use smol_str::SmolStr;

use super::keymap::{string_entries, ActionTemplate};
use super::ButtonMapper;
use crate::input::window::{WindowId, WINDOW_GLOBAL};

type ControllerMap = BTreeMap<u32, ActionTemplate>;

/// Custom controller button lookup
#[derive(Debug, Default)]
pub struct CustomControllerTranslator {
    /// window -> controller name -> button id -> action
    windows: HashMap<WindowId, HashMap<SmolStr, ControllerMap>>,
}

impl CustomControllerTranslator {
    fn lookup(&self, window: WindowId, controller: &str, button: u32) -> Option<&ActionTemplate> {
        self.windows
            .get(&window)
            .and_then(|c| c.get(controller))
            .and_then(|m| m.get(&button))
    }

    /// Resolve a controller button in a window, falling back to global
    pub fn translate(&self, window: WindowId, controller: &str, button: u32) -> Option<&ActionTemplate> {
        self.lookup(window, controller, button)
            .or_else(|| self.lookup(WINDOW_GLOBAL, controller, button))
    }
}

impl ButtonMapper for CustomControllerTranslator {
    fn map_actions(&mut self, window: WindowId, section: &toml::Value) {
        let Some(controllers) = section.as_table() else {
            warn!("Custom controller keymap for window {} is not a table", window);
            return;
        };
        for (controller, buttons) in controllers {
            let Some(buttons) = buttons.as_table() else {
                warn!(
                    "Custom controller '{}' in window {}: expected a table of buttons",
                    controller, window
                );
                continue;
            };
            let map = self
                .windows
                .entry(window)
                .or_default()
                .entry(SmolStr::new(controller))
                .or_default();
            for (button, action_name) in string_entries(buttons, controller) {
                let Ok(id) = button.trim().parse::<u32>() else {
                    warn!(
                        "Invalid custom controller button id '{}' for controller '{}' in window {}",
                        button, controller, window
                    );
                    continue;
                };
                match ActionTemplate::parse(action_name) {
                    Some(template) => {
                        map.insert(id, template);
                    }
                    None => warn!(
                        "Unknown action '{}' for custom controller '{}' button {}",
                        action_name, controller, id
                    ),
                }
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
    use crate::input::action::{ACTION_MOVE_UP, ACTION_SELECT_ITEM};
    use crate::input::window::WINDOW_HOME;

    #[test]
    fn test_controller_buttons() {
        let mut cc = CustomControllerTranslator::default();
        let global: toml::Value = toml::from_str(
            r#"
[MyRemote]
1 = "Select"
2 = "Up"
x = "Down"

[Broken]
"#,
        )
        .unwrap();
        cc.map_actions(WINDOW_GLOBAL, &global);
        let home: toml::Value = toml::from_str("[MyRemote]\n1 = \"Up\"").unwrap();
        cc.map_actions(WINDOW_HOME, &home);

        assert_eq!(cc.translate(WINDOW_HOME, "MyRemote", 1).unwrap().id, ACTION_MOVE_UP);
        assert_eq!(cc.translate(WINDOW_GLOBAL, "MyRemote", 1).unwrap().id, ACTION_SELECT_ITEM);
        assert_eq!(cc.translate(WINDOW_HOME, "MyRemote", 2).unwrap().id, ACTION_MOVE_UP);
        assert!(cc.translate(WINDOW_HOME, "MyRemote", 3).is_none());
        assert!(cc.translate(WINDOW_HOME, "Other", 1).is_none());
    }
}
