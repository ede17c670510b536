//! Keymap documents
//!
//! Keymaps are TOML files. Top-level tables name a window
//! (`global`, `home`, `fullscreenvideo`, ...) and hold one table per
//! device:
//!
//! ```toml
//! [global.keyboard]
//! enter = "Select"
//! "ctrl+v" = "Paste"
//! "long+enter" = "ContextMenu"
//!
//! [global.remote]
//! menu = "ContextMenu"
//!
//! [home.customcontroller.MyRemote]
//! 1 = "Select"
//! ```
//!
//! Entries are `key signature = action name`. Signatures are parsed
//! the same way as configured key bindings ("ctrl+shift+v").

use std::path::Path;

use log::warn;
use smol_str::SmolStr;

use crate::input::action::{self, Action};
use crate::input::error::KeymapError;
use crate::input::key::{Key, Modifiers};
use crate::input::keycodes;
use crate::input::window::{self, WindowId};

/// Action id plus the keymap string it came from
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ActionTemplate {
    pub id: u32,
    pub name: SmolStr,
}

impl ActionTemplate {
    /// Parse an action name or built-in string
    pub fn parse(name: &str) -> Option<Self> {
        action::translate_action_string(name).map(|(id, name)| Self { id, name })
    }

    /// Instantiate for a concrete key press
    pub fn to_action(&self, key: &Key) -> Action {
        Action::from_key(self.id, &self.name, key)
    }
}

/// Devices whose bindings live directly in the button translator
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ButtonDevice {
    Keyboard,
    Remote,
    Gamepad,
    Mouse,
}

impl ButtonDevice {
    pub fn from_tag(tag: &str) -> Option<Self> {
        match tag.to_ascii_lowercase().as_str() {
            "keyboard" => Some(Self::Keyboard),
            "remote" => Some(Self::Remote),
            "gamepad" => Some(Self::Gamepad),
            "mouse" => Some(Self::Mouse),
            _ => None,
        }
    }
}

/// Parsed key signature
/// Example: "ctrl+shift+v" -> (CTRL | SHIFT, "v")
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct KeySignature {
    pub modifiers: Modifiers,
    pub key: String,
}

impl KeySignature {
    pub fn parse(s: &str) -> Self {
        let lowercase = s.trim().to_lowercase();
        let mut result = Self::default();

        for part in lowercase.split('+') {
            match part {
                "ctrl" | "control" => result.modifiers |= Modifiers::CTRL,
                "shift" => result.modifiers |= Modifiers::SHIFT,
                "alt" => result.modifiers |= Modifiers::ALT,
                "ralt" | "altgr" => result.modifiers |= Modifiers::RALT,
                "super" | "win" => result.modifiers |= Modifiers::SUPER,
                "meta" | "cmd" => result.modifiers |= Modifiers::META,
                "long" | "longpress" => result.modifiers |= Modifiers::LONG,
                // "ctrl++" binds the plus key
                "" if !result.key.is_empty() => {}
                "" => result.key = "plus".to_string(),
                other => result.key = other.to_string(),
            }
        }

        result
    }

    /// Button code this signature binds on the given device
    pub fn button_code(&self, device: ButtonDevice) -> Option<u32> {
        let code = match device {
            ButtonDevice::Keyboard => {
                keycodes::vkey_from_name(&self.key).map(|vk| keycodes::KEY_VKEY | vk as u32)
            }
            ButtonDevice::Remote => keycodes::remote_button_from_name(&self.key)
                .or_else(|| self.key.parse::<u32>().ok().filter(|c| *c < 0x100)),
            ButtonDevice::Gamepad => keycodes::gamepad_button_from_name(&self.key),
            ButtonDevice::Mouse => keycodes::mouse_key_from_name(&self.key),
        }?;
        Some(code | self.modifiers.bits())
    }

    /// Check a keyboard key against this binding
    ///
    /// The key must carry at least the signature's modifiers.
    pub fn matches(&self, key: &Key) -> bool {
        match keycodes::vkey_from_name(&self.key) {
            Some(vk) => key.vkey() == vk && key.modifiers().contains(self.modifiers),
            None => false,
        }
    }
}

/// String-valued entries of a device table
///
/// Non-string values are skipped with a warning.
pub fn string_entries<'a>(
    table: &'a toml::Table,
    context: &'a str,
) -> impl Iterator<Item = (&'a str, &'a str)> + 'a {
    table.iter().filter_map(move |(k, v)| match v.as_str() {
        Some(s) => Some((k.as_str(), s)),
        None => {
            warn!("Keymap {}: entry '{}' is not an action name, skipped", context, k);
            None
        }
    })
}

/// One parsed keymap file
#[derive(Debug, Clone)]
pub struct KeymapDocument {
    name: String,
    root: toml::Table,
}

impl KeymapDocument {
    /// Top-level tables that are not windows
    const RESERVED: &'static [&'static str] = &["ir"];

    pub fn parse(name: &str, content: &str) -> Result<Self, KeymapError> {
        let root: toml::Table = toml::from_str(content).map_err(|source| KeymapError::Parse {
            name: name.to_string(),
            source,
        })?;
        Ok(Self {
            name: name.to_string(),
            root,
        })
    }

    pub fn load(path: &Path) -> Result<Self, KeymapError> {
        let content = std::fs::read_to_string(path).map_err(|source| KeymapError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        Self::parse(&path.display().to_string(), &content)
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Window sections with their device tables
    pub fn windows(&self) -> Vec<(WindowId, &toml::Table)> {
        let mut out = Vec::new();
        for (section, value) in &self.root {
            if Self::RESERVED.contains(&section.as_str()) {
                continue;
            }
            let Some(window) = window::window_from_name(section) else {
                warn!("Keymap {}: unknown window '{}'", self.name, section);
                continue;
            };
            match value.as_table() {
                Some(devices) => out.push((window, devices)),
                None => warn!("Keymap {}: section '{}' is not a table", self.name, section),
            }
        }
        out
    }

    /// Non-window top-level table ("ir")
    pub fn table(&self, name: &str) -> Option<&toml::Table> {
        self.root.get(name).and_then(|v| v.as_table())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::input::keycodes::*;

    #[test]
    fn test_parse_signature() {
        let sig = KeySignature::parse("ctrl+shift+c");
        assert_eq!(sig.modifiers, Modifiers::CTRL | Modifiers::SHIFT);
        assert_eq!(sig.key, "c");

        let sig = KeySignature::parse("Long+Select");
        assert!(sig.modifiers.contains(Modifiers::LONG));
        assert_eq!(
            sig.button_code(ButtonDevice::Remote),
            Some(REMOTE_SELECT | Modifiers::LONG.bits())
        );
    }

    #[test]
    fn test_signature_codes() {
        assert_eq!(
            KeySignature::parse("enter").button_code(ButtonDevice::Keyboard),
            Some(KEY_VKEY | VK_RETURN as u32)
        );
        assert_eq!(
            KeySignature::parse("dpadup").button_code(ButtonDevice::Gamepad),
            Some(KEY_BUTTON_DPAD_UP)
        );
        assert_eq!(
            KeySignature::parse("wheelup").button_code(ButtonDevice::Mouse),
            Some(KEY_MOUSE_WHEEL_UP)
        );
        assert_eq!(KeySignature::parse("nosuchkey").button_code(ButtonDevice::Keyboard), None);
    }

    #[test]
    fn test_signature_matches_key() {
        let paste = KeySignature::parse("ctrl+v");
        let key = Key::from_keyboard(VK_V, Some('v'), Modifiers::CTRL | Modifiers::SHIFT, 0);
        assert!(paste.matches(&key));
        let key = Key::from_keyboard(VK_V, Some('v'), Modifiers::META, 0);
        assert!(!paste.matches(&key));
    }

    #[test]
    fn test_document_windows() {
        let doc = KeymapDocument::parse(
            "test",
            r#"
[global.keyboard]
enter = "Select"

[nowhere.keyboard]
a = "Up"

[ir.mceusb]
KEY_OK = "select"
"#,
        )
        .unwrap();
        let windows = doc.windows();
        assert_eq!(windows.len(), 1);
        assert_eq!(windows[0].0, crate::input::window::WINDOW_GLOBAL);
        assert!(doc.table("ir").is_some());
    }

    #[test]
    fn test_parse_error() {
        let err = KeymapDocument::parse("broken", "[global.keyboard\n").unwrap_err();
        assert!(matches!(err, KeymapError::Parse { .. }));
    }
}
