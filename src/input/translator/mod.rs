//! Button/action translation
//!
//! Resolves (window, key) into an action using layered keymaps:
//! the window's own section, its fallback window, then `global`.
//! Devices without a fixed code space (touch, custom controllers,
//! joysticks) are handled by mappers registered under a tag; the
//! translator hands them their device sections while loading.

pub mod custom_controller;
pub mod ir;
pub mod joystick;
pub mod keymap;
pub mod touch;

use std::collections::{BTreeMap, HashMap};
use std::path::PathBuf;
use std::sync::{Arc, Mutex};

use log::{debug, info, warn};

use self::keymap::{string_entries, ActionTemplate, ButtonDevice, KeySignature, KeymapDocument};
use super::action::Action;
use super::error::KeymapError;
use super::key::{Key, Modifiers};
use super::lock;
use super::window::{self, WindowId, WINDOW_GLOBAL};

pub use custom_controller::CustomControllerTranslator;
pub use ir::IrTranslator;
pub use joystick::{JoystickKeymap, JoystickMapper};
pub use touch::TouchTranslator;

/// Built-in keymap, always loaded first
pub const DEFAULT_KEYMAP: &str = include_str!("../../../keymaps/default.toml");

/// Receives the device sections it is registered for
pub trait ButtonMapper: Send {
    /// Take the bindings of one window's device section
    fn map_actions(&mut self, window: WindowId, section: &toml::Value);

    /// Forget all bindings
    fn clear(&mut self);
}

/// Shared handle to a registered mapper
pub type MapperRef = Arc<Mutex<dyn ButtonMapper>>;

/// Window the keymap environment currently resolves against
#[derive(Debug, Clone, Copy)]
pub struct KeymapEnvironment {
    window_id: WindowId,
}

impl Default for KeymapEnvironment {
    fn default() -> Self {
        Self {
            window_id: WINDOW_GLOBAL,
        }
    }
}

impl KeymapEnvironment {
    pub fn window_id(&self) -> WindowId {
        self.window_id
    }

    pub fn set_window_id(&mut self, window: WindowId) {
        self.window_id = window;
    }

    /// Window consulted after `window` and before global
    pub fn fallthrough(&self, window: WindowId) -> Option<WindowId> {
        window::fallback_window(window)
    }
}

type WindowMap = BTreeMap<u32, ActionTemplate>;

/// Layered keymap lookup
pub struct ButtonTranslator {
    windows: HashMap<WindowId, WindowMap>,
    /// Parsed base keymaps in load order
    base: Vec<KeymapDocument>,
    /// Extra keymaps added per device
    devices: BTreeMap<String, KeymapDocument>,
    keymap_paths: Vec<PathBuf>,
    device_dirs: Vec<PathBuf>,
    mappers: Vec<(String, MapperRef)>,
}

impl Default for ButtonTranslator {
    fn default() -> Self {
        Self::new(Vec::new(), Vec::new())
    }
}

impl ButtonTranslator {
    /// `keymap_paths` override the built-in keymap in order;
    /// `device_dirs` are searched for `<device>.toml`
    pub fn new(keymap_paths: Vec<PathBuf>, device_dirs: Vec<PathBuf>) -> Self {
        Self {
            windows: HashMap::new(),
            base: Vec::new(),
            devices: BTreeMap::new(),
            keymap_paths,
            device_dirs,
            mappers: Vec::new(),
        }
    }

    pub fn set_keymap_paths(&mut self, keymap_paths: Vec<PathBuf>, device_dirs: Vec<PathBuf>) {
        self.keymap_paths = keymap_paths;
        self.device_dirs = device_dirs;
    }

    pub fn register_mapper(&mut self, tag: &str, mapper: MapperRef) {
        self.mappers.push((tag.to_ascii_lowercase(), mapper));
    }

    pub fn unregister_mapper(&mut self, mapper: &MapperRef) {
        let target = Arc::as_ptr(mapper) as *const ();
        self.mappers
            .retain(|(_, m)| Arc::as_ptr(m) as *const () != target);
    }

    /// Parse the base keymaps and rebuild all tables
    ///
    /// Returns true if at least one keymap was applied.
    pub fn load(&mut self) -> bool {
        let mut base = Vec::new();
        match KeymapDocument::parse("built-in", DEFAULT_KEYMAP) {
            Ok(doc) => base.push(doc),
            Err(e) => warn!("{}", e),
        }
        for path in &self.keymap_paths {
            match KeymapDocument::load(path) {
                Ok(doc) => {
                    info!("Loaded keymap: {}", path.display());
                    base.push(doc);
                }
                Err(e) => warn!("{}", e),
            }
        }
        self.base = base;
        self.rebuild();
        !self.base.is_empty()
    }

    /// Drop every binding, including device keymaps
    pub fn clear(&mut self) {
        self.windows.clear();
        self.base.clear();
        self.devices.clear();
        for (_, mapper) in &self.mappers {
            lock(mapper).clear();
        }
    }

    /// Layer `<device>.toml` on top of the base keymaps
    pub fn add_device(&mut self, name: &str) -> bool {
        if self.devices.contains_key(name) {
            return false;
        }
        match self.find_device_keymap(name) {
            Ok(doc) => {
                info!("Loaded device keymap: {}", doc.name());
                self.devices.insert(name.to_string(), doc);
                self.rebuild();
                true
            }
            Err(e) => {
                warn!("{}", e);
                false
            }
        }
    }

    pub fn remove_device(&mut self, name: &str) -> bool {
        if self.devices.remove(name).is_some() {
            self.rebuild();
            true
        } else {
            false
        }
    }

    /// Loaded documents in application order
    pub fn documents(&self) -> impl Iterator<Item = &KeymapDocument> {
        self.base.iter().chain(self.devices.values())
    }

    fn find_device_keymap(&self, name: &str) -> Result<KeymapDocument, KeymapError> {
        // Device names are plain file stems inside the keymap directories
        if name.is_empty() || name == ".." || name.contains(['/', '\\']) {
            return Err(KeymapError::InvalidDeviceName(name.to_string()));
        }
        let file = format!("{}.toml", name);
        for dir in &self.device_dirs {
            let path = dir.join(&file);
            if path.exists() {
                return KeymapDocument::load(&path);
            }
        }
        Err(KeymapError::DeviceNotFound(name.to_string()))
    }

    fn rebuild(&mut self) {
        self.windows.clear();
        for (_, mapper) in &self.mappers {
            lock(mapper).clear();
        }
        let docs: Vec<KeymapDocument> = self.documents().cloned().collect();
        for doc in &docs {
            self.apply(doc);
        }
        debug!(
            "Keymaps rebuilt: {} documents, {} windows",
            docs.len(),
            self.windows.len()
        );
    }

    fn apply(&mut self, doc: &KeymapDocument) {
        for (window, devices) in doc.windows() {
            for (tag, section) in devices {
                if let Some(device) = ButtonDevice::from_tag(tag) {
                    let Some(table) = section.as_table() else {
                        warn!("Keymap {}: '{}' is not a table", doc.name(), tag);
                        continue;
                    };
                    let map = self.windows.entry(window).or_default();
                    for (signature, action_name) in string_entries(table, doc.name()) {
                        let Some(code) = KeySignature::parse(signature).button_code(device) else {
                            warn!(
                                "Keymap {}: unknown {} key '{}'",
                                doc.name(),
                                tag,
                                signature
                            );
                            continue;
                        };
                        match ActionTemplate::parse(action_name) {
                            Some(template) => {
                                map.insert(code, template);
                            }
                            None => warn!(
                                "Keymap {}: unknown action '{}' for '{}'",
                                doc.name(),
                                action_name,
                                signature
                            ),
                        }
                    }
                    continue;
                }

                let tag = tag.to_ascii_lowercase();
                let mut mapped = false;
                for (mapper_tag, mapper) in &self.mappers {
                    if *mapper_tag == tag {
                        lock(mapper).map_actions(window, section);
                        mapped = true;
                    }
                }
                if !mapped {
                    debug!("Keymap {}: no mapper for device '{}'", doc.name(), tag);
                }
            }
        }
    }

    fn lookup_exact(&self, window: WindowId, code: u32) -> Option<&ActionTemplate> {
        self.windows.get(&window).and_then(|m| m.get(&code))
    }

    /// A long press without its own binding resolves to the short one
    fn lookup(&self, window: WindowId, code: u32) -> Option<&ActionTemplate> {
        let long = Modifiers::LONG.bits();
        self.lookup_exact(window, code).or_else(|| {
            if code & long != 0 {
                self.lookup_exact(window, code & !long)
            } else {
                None
            }
        })
    }

    /// Resolve a key in a window
    ///
    /// With `allow_fallback` the fallback window and the global section are
    /// consulted when the window has no binding.
    pub fn get_action(&self, window: WindowId, key: &Key, allow_fallback: bool) -> Action {
        let code = key.button_code();
        let mut template = self.lookup(window, code);
        if template.is_none() && allow_fallback {
            if let Some(fallback) = window::fallback_window(window) {
                template = self.lookup(fallback, code);
            }
            if template.is_none() {
                template = self.lookup(WINDOW_GLOBAL, code);
            }
        }
        match template {
            Some(t) => t.to_action(key),
            None => Action::none(),
        }
    }

    /// Resolve against the global section only
    pub fn get_global_action(&self, key: &Key) -> Action {
        self.get_action(WINDOW_GLOBAL, key, false)
    }

    /// True if the key with the long-press bit is bound for the window
    pub fn has_longpress_mapping(&self, window: WindowId, key: &Key) -> bool {
        let code = key.button_code() | Modifiers::LONG.bits();
        if self.lookup_exact(window, code).is_some() {
            return true;
        }
        if window != WINDOW_GLOBAL {
            if let Some(fallback) = window::fallback_window(window) {
                if self.lookup_exact(fallback, code).is_some() {
                    return true;
                }
            }
            return self.lookup_exact(WINDOW_GLOBAL, code).is_some();
        }
        false
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::input::action::*;
    use crate::input::keycodes::*;
    use crate::input::window::*;
    use std::io::Write;

    fn translator() -> ButtonTranslator {
        let mut t = ButtonTranslator::default();
        assert!(t.load());
        t
    }

    fn vkey(vk: u8) -> Key {
        Key::from_keyboard(vk, None, Modifiers::empty(), 0)
    }

    #[test]
    fn test_builtin_keymap_global() {
        let t = translator();
        let action = t.get_action(WINDOW_HOME, &vkey(VK_RETURN), true);
        assert_eq!(action.id(), ACTION_SELECT_ITEM);
        let action = t.get_action(WINDOW_HOME, &vkey(VK_RETURN), false);
        assert_eq!(action.id(), ACTION_NONE);
        assert_eq!(t.get_global_action(&vkey(VK_UP)).id(), ACTION_MOVE_UP);
    }

    #[test]
    fn test_window_overrides_global() {
        let t = translator();
        let action = t.get_action(WINDOW_FULLSCREEN_VIDEO, &vkey(VK_SPACE), true);
        assert_eq!(action.id(), ACTION_PAUSE);
        // live TV falls back to fullscreen video
        let action = t.get_action(WINDOW_FULLSCREEN_LIVETV, &vkey(VK_SPACE), true);
        assert_eq!(action.id(), ACTION_PAUSE);
    }

    #[test]
    fn test_longpress_mapping() {
        let t = translator();
        assert!(t.has_longpress_mapping(WINDOW_HOME, &vkey(VK_RETURN)));
        assert!(!t.has_longpress_mapping(WINDOW_HOME, &vkey(VK_UP)));
        let long = Key::from_keyboard(VK_RETURN, None, Modifiers::LONG, 600);
        assert_eq!(t.get_action(WINDOW_HOME, &long, true).id(), ACTION_CONTEXT_MENU);
        let long_up = Key::from_keyboard(VK_UP, None, Modifiers::LONG, 600);
        assert_eq!(t.get_action(WINDOW_HOME, &long_up, true).id(), ACTION_MOVE_UP);
    }

    #[test]
    fn test_remote_and_mouse_sections() {
        let t = translator();
        assert_eq!(
            t.get_action(WINDOW_HOME, &Key::new(REMOTE_MENU, 0), true).id(),
            ACTION_CONTEXT_MENU
        );
        assert_eq!(
            t.get_action(WINDOW_HOME, &Key::new(KEY_MOUSE_CLICK, 0), true).id(),
            ACTION_MOUSE_LEFT_CLICK
        );
    }

    #[test]
    fn test_device_layer() {
        let dir = tempfile::tempdir().unwrap();
        let mut file = std::fs::File::create(dir.path().join("mceusb.toml")).unwrap();
        writeln!(file, "[global.remote]\nmenu = \"Info\"").unwrap();

        let mut t = ButtonTranslator::new(Vec::new(), vec![dir.path().to_path_buf()]);
        assert!(t.load());
        assert!(t.add_device("mceusb"));
        assert!(!t.add_device("mceusb"));
        assert_eq!(
            t.get_action(WINDOW_HOME, &Key::new(REMOTE_MENU, 0), true).id(),
            ACTION_SHOW_INFO
        );
        assert!(t.remove_device("mceusb"));
        assert!(!t.remove_device("mceusb"));
        assert_eq!(
            t.get_action(WINDOW_HOME, &Key::new(REMOTE_MENU, 0), true).id(),
            ACTION_CONTEXT_MENU
        );
        assert!(!t.add_device("missing"));
    }

    #[test]
    fn test_device_name_stays_inside_keymap_dirs() {
        let root = tempfile::tempdir().unwrap();
        let devices = root.path().join("devices");
        std::fs::create_dir(&devices).unwrap();
        std::fs::write(root.path().join("outside.toml"), "[global.remote]\nmenu = \"Info\"\n").unwrap();

        let mut t = ButtonTranslator::new(Vec::new(), vec![devices.clone()]);
        assert!(t.load());
        assert!(!t.add_device("../outside"));
        assert!(!t.add_device("..\\outside"));
        assert!(matches!(
            t.find_device_keymap("../outside"),
            Err(KeymapError::InvalidDeviceName(_))
        ));
        assert_eq!(
            t.get_action(WINDOW_HOME, &Key::new(REMOTE_MENU, 0), true).id(),
            ACTION_CONTEXT_MENU
        );
    }

    #[test]
    fn test_clear_drops_bindings() {
        let mut t = translator();
        t.clear();
        assert_eq!(t.get_action(WINDOW_HOME, &vkey(VK_RETURN), true).id(), ACTION_NONE);
        assert_eq!(t.documents().count(), 0);
    }

    #[test]
    fn test_mapper_receives_sections() {
        let touch = Arc::new(Mutex::new(TouchTranslator::default()));
        let mut t = ButtonTranslator::default();
        let mapper: MapperRef = touch.clone();
        t.register_mapper("touch", mapper.clone());
        t.load();
        assert!(lock(&touch)
            .translate(WINDOW_HOME, ACTION_TOUCH_TAP, 1)
            .is_some());
        t.unregister_mapper(&mapper);
        t.clear();
        // unregistered mappers are not cleared
        assert!(lock(&touch)
            .translate(WINDOW_HOME, ACTION_TOUCH_TAP, 1)
            .is_some());
    }
}
