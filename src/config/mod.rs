//! Configuration file management
//!
//! Loads TOML configuration files and provides application settings.
//! Default config path: ~/.config/mcinput/config.toml

use anyhow::{Context, Result};
use log::{info, warn};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

#[cfg(target_os = "linux")]
use notify::{Event, RecommendedWatcher, RecursiveMode, Watcher};
#[cfg(target_os = "linux")]
use std::sync::mpsc;

use crate::constants::{
    DEFAULT_MOUSE_MAX_X, DEFAULT_MOUSE_MAX_Y, DOUBLE_CLICK_THRESHOLD_MS, FRAME_INTERVAL_MS,
    KEY_HOLD_THRESHOLD_MS, LIRC_SOCKET_PATH, LONG_CLICK_THRESHOLD_MS, TTY_RELEASE_TIMEOUT_MS,
};
use crate::input::manager::{default_paste_binding, InputOptions};
use crate::settings::{Settings, SETTING_INPUT_ENABLEMOUSE};

/// Application settings
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Dispatch settings
    pub input: InputConfig,
    /// Keyboard settings
    pub keyboard: KeyboardConfig,
    /// Pointer settings
    pub mouse: MouseConfig,
    /// Remote control settings
    pub remote: RemoteConfig,
    /// Keymap files
    pub keymaps: KeymapConfig,
    /// Console front end settings
    pub console: ConsoleConfig,
}

/// Dispatch settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct InputConfig {
    /// Mouse input enabled (setting "input.enablemouse")
    pub enable_mouse: bool,
    /// Key that pastes into text fields (empty = platform default)
    pub paste: String,
}

impl Default for InputConfig {
    fn default() -> Self {
        Self {
            enable_mouse: true,
            paste: String::new(),
        }
    }
}

/// Keyboard settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct KeyboardConfig {
    /// Hold time before a key counts as a long press (default: 250)
    pub hold_threshold_ms: u32,
    /// Console only: a key is released when no repeat arrived for this long
    pub release_timeout_ms: u64,
}

impl Default for KeyboardConfig {
    fn default() -> Self {
        Self {
            hold_threshold_ms: KEY_HOLD_THRESHOLD_MS,
            release_timeout_ms: TTY_RELEASE_TIMEOUT_MS,
        }
    }
}

/// Pointer settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MouseConfig {
    /// Double-click window in milliseconds (default: 300)
    pub double_click_ms: u64,
    /// Hold time of a long click in milliseconds (default: 1000)
    pub long_click_ms: u64,
    /// Screen resolution the pointer is clamped to
    pub max_x: u32,
    pub max_y: u32,
    /// Motion multipliers
    pub speed_x: f32,
    pub speed_y: f32,
}

impl Default for MouseConfig {
    fn default() -> Self {
        Self {
            double_click_ms: DOUBLE_CLICK_THRESHOLD_MS,
            long_click_ms: LONG_CLICK_THRESHOLD_MS,
            max_x: DEFAULT_MOUSE_MAX_X,
            max_y: DEFAULT_MOUSE_MAX_Y,
            speed_x: 1.0,
            speed_y: 1.0,
        }
    }
}

/// Remote control settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RemoteConfig {
    /// Connect to the remote daemon at startup
    pub enabled: bool,
    /// LIRC socket path
    pub device: String,
}

impl Default for RemoteConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            device: LIRC_SOCKET_PATH.to_string(),
        }
    }
}

/// Keymap files
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct KeymapConfig {
    /// Keymaps applied on top of the built-in one, in order
    #[serde(deserialize_with = "deserialize_paths")]
    pub paths: Vec<String>,
    /// Directories searched for `<device>.toml`
    #[serde(deserialize_with = "deserialize_paths")]
    pub device_dirs: Vec<String>,
    /// Device keymaps layered at startup
    #[serde(deserialize_with = "deserialize_paths")]
    pub devices: Vec<String>,
}

/// Console front end settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ConsoleConfig {
    /// Frame interval in milliseconds (default: 16)
    pub frame_interval_ms: u64,
    /// Window the console pretends to show (keymap section name)
    pub window: String,
}

impl Default for ConsoleConfig {
    fn default() -> Self {
        Self {
            frame_interval_ms: FRAME_INTERVAL_MS,
            window: "home".to_string(),
        }
    }
}

/// Path list deserializer: accepts string or array
fn deserialize_paths<'de, D>(deserializer: D) -> Result<Vec<String>, D::Error>
where
    D: serde::Deserializer<'de>,
{
    use serde::de::{self, Visitor};

    struct PathsVisitor;

    impl<'de> Visitor<'de> for PathsVisitor {
        type Value = Vec<String>;

        fn expecting(&self, formatter: &mut std::fmt::Formatter) -> std::fmt::Result {
            formatter.write_str("a string or array of strings")
        }

        fn visit_str<E>(self, value: &str) -> Result<Self::Value, E>
        where
            E: de::Error,
        {
            Ok(vec![value.to_string()])
        }

        fn visit_seq<A>(self, mut seq: A) -> Result<Self::Value, A::Error>
        where
            A: de::SeqAccess<'de>,
        {
            let mut paths = Vec::new();
            while let Some(path) = seq.next_element::<String>()? {
                paths.push(path);
            }
            Ok(paths)
        }
    }

    deserializer.deserialize_any(PathsVisitor)
}

/// Expand a leading `~/`
fn expand_home(path: &str) -> PathBuf {
    match (path.strip_prefix("~/"), dirs::home_dir()) {
        (Some(rest), Some(home)) => home.join(rest),
        _ => PathBuf::from(path),
    }
}

impl Config {
    /// System-wide config path
    const SYSTEM_CONFIG_PATH: &'static str = "/etc/mcinput/config.toml";

    /// Get the path that would be used for loading config
    /// Returns None if using built-in defaults
    pub fn config_path() -> Option<PathBuf> {
        // 1. MCINPUT_CONFIG environment variable
        if let Ok(path) = std::env::var("MCINPUT_CONFIG") {
            let p = Path::new(&path);
            if p.exists() {
                return Some(p.to_path_buf());
            }
        }

        // 2. User config: ~/.config/mcinput/config.toml
        if let Some(config_path) = default_config_path() {
            if config_path.exists() {
                return Some(config_path);
            }
        }

        // 3. System config: /etc/mcinput/config.toml
        let system_config = Path::new(Self::SYSTEM_CONFIG_PATH);
        if system_config.exists() {
            return Some(system_config.to_path_buf());
        }

        None
    }

    /// Load configuration with priority:
    /// 1. MCINPUT_CONFIG environment variable
    /// 2. ~/.config/mcinput/config.toml (user config)
    /// 3. /etc/mcinput/config.toml (system config)
    /// 4. Built-in defaults
    pub fn load() -> Self {
        if let Some(path) = Self::config_path() {
            match Self::load_from_file(&path) {
                Ok(config) => {
                    info!("Loaded config: {}", path.display());
                    return config;
                }
                Err(e) => {
                    warn!("Failed to load config {}: {:#}", path.display(), e);
                }
            }
        }
        info!("Using built-in default config");
        Self::default()
    }

    /// Load settings from specified path
    pub fn load_from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;
        Self::parse(&content)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))
    }

    pub fn parse(content: &str) -> Result<Self> {
        Ok(toml::from_str(content)?)
    }

    /// Write the commented default config to the user config directory
    ///
    /// An existing file is only replaced with `force`.
    pub fn write_default_config(force: bool) -> Result<PathBuf> {
        let config_path =
            default_config_path().ok_or_else(|| anyhow::anyhow!("Config directory not found"))?;
        Self::write_default_config_to(&config_path, force)?;
        Ok(config_path)
    }

    pub fn write_default_config_to(config_path: &Path, force: bool) -> Result<()> {
        if config_path.exists() && !force {
            anyhow::bail!(
                "{} already exists (use --force to overwrite)",
                config_path.display()
            );
        }
        if let Some(dir) = config_path.parent() {
            std::fs::create_dir_all(dir)
                .with_context(|| format!("Failed to create {}", dir.display()))?;
        }
        std::fs::write(config_path, Self::default_template())
            .with_context(|| format!("Failed to write {}", config_path.display()))?;
        Ok(())
    }

    /// Default config with explanatory comments
    pub fn default_template() -> String {
        let d = Self::default();
        format!(
            r#"# mcinput configuration
#
# Lookup order: $MCINPUT_CONFIG, ~/.config/mcinput/config.toml,
# /etc/mcinput/config.toml. Missing keys use the values shown here.
# Changes are picked up while running.

[input]
enable_mouse = {enable_mouse}
# Paste shortcut in text fields; empty uses "{paste}"
paste = ""

[keyboard]
# Held longer than this a key fires its "long+" binding
hold_threshold_ms = {hold}
# Console only: no repeat for this long counts as a release
release_timeout_ms = {release}

[mouse]
double_click_ms = {double}
long_click_ms = {long}
max_x = {max_x}
max_y = {max_y}
speed_x = 1.0
speed_y = 1.0

[remote]
enabled = {remote_enabled}
# LIRC daemon socket
device = "{device}"

[keymaps]
# Applied on top of the built-in keymap, later files win
# paths = ["~/.config/mcinput/keymap.toml"]
paths = []
# Searched for <device>.toml by add_keymap
device_dirs = []
# Device keymaps layered at startup
devices = []

[console]
frame_interval_ms = {frame}
# Keymap section the console resolves against
window = "{window}"
"#,
            enable_mouse = d.input.enable_mouse,
            paste = default_paste_binding(),
            hold = d.keyboard.hold_threshold_ms,
            release = d.keyboard.release_timeout_ms,
            double = d.mouse.double_click_ms,
            long = d.mouse.long_click_ms,
            max_x = d.mouse.max_x,
            max_y = d.mouse.max_y,
            remote_enabled = d.remote.enabled,
            device = d.remote.device,
            frame = d.console.frame_interval_ms,
            window = d.console.window,
        )
    }

    /// Keymap files in application order
    pub fn keymap_paths(&self) -> Vec<PathBuf> {
        self.keymaps.paths.iter().map(|p| expand_home(p)).collect()
    }

    /// Device keymap directories; the user keymap directory comes last
    pub fn device_dirs(&self) -> Vec<PathBuf> {
        let mut dirs: Vec<PathBuf> = self.keymaps.device_dirs.iter().map(|p| expand_home(p)).collect();
        if let Some(user) = dirs::config_dir().map(|d| d.join("mcinput").join("keymaps")) {
            if !dirs.contains(&user) {
                dirs.push(user);
            }
        }
        dirs
    }

    /// Construction options for the input manager
    pub fn input_options(&self) -> InputOptions {
        let paste = if self.input.paste.trim().is_empty() {
            default_paste_binding().to_string()
        } else {
            self.input.paste.clone()
        };
        InputOptions {
            keymap_paths: self.keymap_paths(),
            device_dirs: self.device_dirs(),
            paste_binding: paste,
            hold_threshold_ms: self.keyboard.hold_threshold_ms,
            double_click_ms: self.mouse.double_click_ms,
            long_click_ms: self.mouse.long_click_ms,
        }
    }
}

impl Settings for Config {
    fn get_bool(&self, id: &str) -> Option<bool> {
        match id {
            SETTING_INPUT_ENABLEMOUSE => Some(self.input.enable_mouse),
            _ => None,
        }
    }
}

/// Config and keymap change watcher (Linux only)
#[cfg(target_os = "linux")]
pub struct ConfigWatcher {
    watcher: RecommendedWatcher,
    rx: mpsc::Receiver<()>,
}

#[cfg(target_os = "linux")]
impl ConfigWatcher {
    /// Start watching config file
    pub fn new(config_path: &Path) -> Result<Self> {
        let (tx, rx) = mpsc::channel();

        let watcher = notify::recommended_watcher(move |res: Result<Event, notify::Error>| {
            if let Ok(event) = res {
                // Editors often save by writing a temp file then renaming
                use notify::EventKind;
                match event.kind {
                    EventKind::Modify(_) | EventKind::Create(_) => {
                        let _ = tx.send(());
                    }
                    _ => {}
                }
            }
        })?;

        let mut this = Self { watcher, rx };
        this.watch(config_path)?;
        Ok(this)
    }

    /// Also watch a keymap file
    pub fn watch(&mut self, path: &Path) -> Result<()> {
        // Watch the parent directory to catch rename operations
        let watch_path = path.parent().unwrap_or(path);
        self.watcher
            .watch(watch_path, RecursiveMode::NonRecursive)
            .with_context(|| format!("Failed to watch {}", watch_path.display()))?;
        Ok(())
    }

    /// Check if anything was modified (non-blocking, drains pending events)
    pub fn check_reload(&self) -> bool {
        let mut changed = false;
        while self.rx.try_recv().is_ok() {
            changed = true;
        }
        changed
    }
}

/// Get default config file path
pub fn default_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|d| d.join("mcinput").join("config.toml"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_partial_config_uses_defaults() {
        let config = Config::parse("[mouse]\ndouble_click_ms = 500\n").unwrap();
        assert_eq!(config.mouse.double_click_ms, 500);
        assert_eq!(config.mouse.long_click_ms, LONG_CLICK_THRESHOLD_MS);
        assert!(config.input.enable_mouse);
        assert_eq!(config.console.window, "home");
    }

    #[test]
    fn test_paths_string_or_array() {
        let config = Config::parse("[keymaps]\npaths = \"/tmp/a.toml\"\ndevices = [\"mceusb\", \"harmony\"]\n")
            .unwrap();
        assert_eq!(config.keymaps.paths, vec!["/tmp/a.toml"]);
        assert_eq!(config.keymaps.devices, vec!["mceusb", "harmony"]);
    }

    #[test]
    fn test_template_parses_to_defaults() {
        let config = Config::parse(&Config::default_template()).unwrap();
        assert_eq!(config, Config::default());
    }

    #[test]
    fn test_settings_and_options() {
        let config = Config::parse("[input]\nenable_mouse = false\npaste = \"shift+insert\"\n").unwrap();
        assert_eq!(config.get_bool(SETTING_INPUT_ENABLEMOUSE), Some(false));
        assert_eq!(config.get_bool("input.unknown"), None);
        let options = config.input_options();
        assert_eq!(options.paste_binding, "shift+insert");
        assert_eq!(options.hold_threshold_ms, KEY_HOLD_THRESHOLD_MS);

        let options = Config::default().input_options();
        assert_eq!(options.paste_binding, default_paste_binding());
    }

    #[test]
    fn test_write_default_config() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("mcinput").join("config.toml");
        Config::write_default_config_to(&path, false).unwrap();
        assert_eq!(Config::load_from_file(&path).unwrap(), Config::default());
        assert!(Config::write_default_config_to(&path, false).is_err());
        assert!(Config::write_default_config_to(&path, true).is_ok());
    }

    #[test]
    fn test_invalid_file_reports_path() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "[mouse]\ndouble_click_ms = \"soon\"\n").unwrap();
        let err = Config::load_from_file(&path).unwrap_err();
        assert!(format!("{:#}", err).contains("config.toml"));
    }
}
