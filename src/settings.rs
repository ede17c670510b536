//! Runtime settings
//!
//! The only setting that affects dispatch is whether the mouse is
//! enabled. Settings are read once at startup and then pushed to
//! interested components through `SettingsCallback`.

/// Mouse enablement
pub const SETTING_INPUT_ENABLEMOUSE: &str = "input.enablemouse";

/// Value of a changed setting
#[derive(Debug, Clone, PartialEq)]
pub enum SettingValue {
    Bool(bool),
    Int(i64),
    String(String),
}

impl SettingValue {
    pub fn as_bool(&self) -> Option<bool> {
        match self {
            SettingValue::Bool(b) => Some(*b),
            _ => None,
        }
    }
}

/// Read access to persisted settings
pub trait Settings: Send + Sync {
    /// None if the setting is unknown
    fn get_bool(&self, id: &str) -> Option<bool>;
}

/// Observer of setting changes
pub trait SettingsCallback {
    fn on_setting_changed(&mut self, id: &str, value: &SettingValue);
}
