//! Key descriptor
//!
//! A `Key` is an immutable snapshot of one physical press:
//! button code, modifier bits, hold duration, the character it
//! produced and any analog magnitudes. The modifier bits are part
//! of the button code, so two keys are "the same" for repeat and
//! long-press tracking exactly when their button codes are equal.

use bitflags::bitflags;

use super::keycodes::{
    self, KEY_BUTTON_LEFT_ANALOG_TRIGGER, KEY_BUTTON_LEFT_THUMB_STICK_DOWN,
    KEY_BUTTON_LEFT_THUMB_STICK_LEFT, KEY_BUTTON_LEFT_THUMB_STICK_RIGHT,
    KEY_BUTTON_LEFT_THUMB_STICK_UP, KEY_BUTTON_RIGHT_ANALOG_TRIGGER,
    KEY_BUTTON_RIGHT_THUMB_STICK_DOWN, KEY_BUTTON_RIGHT_THUMB_STICK_LEFT,
    KEY_BUTTON_RIGHT_THUMB_STICK_RIGHT, KEY_BUTTON_RIGHT_THUMB_STICK_UP, KEY_CODE_MASK,
    KEY_INVALID, KEY_UNICODE, KEY_VKEY,
};

bitflags! {
    /// Modifier bits, positioned above the 16-bit code space
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
    pub struct Modifiers: u32 {
        const CTRL = 0x0001_0000;
        const SHIFT = 0x0002_0000;
        const ALT = 0x0004_0000;
        const RALT = 0x0008_0000;
        const SUPER = 0x0010_0000;
        const META = 0x0020_0000;
        /// Set by the device source once the hold threshold is crossed
        const LONG = 0x0100_0000;
    }
}

/// Where a key came from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum KeySource {
    /// Local keyboard
    Keyboard,
    /// Network event server
    Service,
    /// Remote, gamepad, peripherals
    #[default]
    Other,
}

/// One resolved key press
#[derive(Debug, Clone, PartialEq)]
pub struct Key {
    code: u32,
    modifiers: Modifiers,
    vkey: u8,
    unicode: Option<char>,
    ascii: u8,
    hold_time_ms: u32,
    left_trigger: u8,
    right_trigger: u8,
    left_thumb_x: f32,
    left_thumb_y: f32,
    right_thumb_x: f32,
    right_thumb_y: f32,
    /// Frame time of analog repeats (seconds)
    repeat: f32,
    source: KeySource,
}

impl Default for Key {
    fn default() -> Self {
        Self {
            code: KEY_INVALID,
            modifiers: Modifiers::empty(),
            vkey: 0,
            unicode: None,
            ascii: 0,
            hold_time_ms: 0,
            left_trigger: 0,
            right_trigger: 0,
            left_thumb_x: 0.0,
            left_thumb_y: 0.0,
            right_thumb_x: 0.0,
            right_thumb_y: 0.0,
            repeat: 0.0,
            source: KeySource::Other,
        }
    }
}

impl Key {
    /// Key from a raw button code (remote, gamepad, peripherals)
    ///
    /// Modifier bits carried in the code are split out.
    pub fn new(button_code: u32, hold_time_ms: u32) -> Self {
        Self {
            code: button_code & KEY_CODE_MASK,
            modifiers: Modifiers::from_bits_truncate(button_code & !KEY_CODE_MASK),
            hold_time_ms,
            ..Self::default()
        }
    }

    /// Key produced by the local keyboard
    pub fn from_keyboard(
        vkey: u8,
        unicode: Option<char>,
        modifiers: Modifiers,
        hold_time_ms: u32,
    ) -> Self {
        let code = if vkey != 0 {
            KEY_VKEY | vkey as u32
        } else if unicode.is_some() {
            KEY_UNICODE
        } else {
            KEY_INVALID
        };
        let ascii = unicode
            .filter(|c| c.is_ascii())
            .map(|c| c as u8)
            .unwrap_or(0);
        Self {
            code,
            modifiers,
            vkey,
            unicode,
            ascii,
            hold_time_ms,
            source: KeySource::Keyboard,
            ..Self::default()
        }
    }

    /// Character key without a virtual key (typed over the network)
    pub fn from_unicode(ch: char) -> Self {
        Self {
            code: KEY_UNICODE,
            unicode: Some(ch),
            ascii: if ch.is_ascii() { ch as u8 } else { 0 },
            ..Self::default()
        }
    }

    /// Analog key: the magnitude lands in the field matching the axis
    ///
    /// Triggers are scaled to 0..255, thumbstick axes keep the sign of
    /// their direction (left/down negative).
    pub fn analog(code: u32, amount: f32, frame_time: f32) -> Self {
        let mut key = Self {
            code,
            repeat: frame_time,
            ..Self::default()
        };
        let trigger = (255.0 * amount.clamp(0.0, 1.0)) as u8;
        match code {
            KEY_BUTTON_LEFT_ANALOG_TRIGGER => key.left_trigger = trigger,
            KEY_BUTTON_RIGHT_ANALOG_TRIGGER => key.right_trigger = trigger,
            KEY_BUTTON_LEFT_THUMB_STICK_LEFT => key.left_thumb_x = -amount,
            KEY_BUTTON_LEFT_THUMB_STICK_RIGHT => key.left_thumb_x = amount,
            KEY_BUTTON_LEFT_THUMB_STICK_UP => key.left_thumb_y = amount,
            KEY_BUTTON_LEFT_THUMB_STICK_DOWN => key.left_thumb_y = -amount,
            KEY_BUTTON_RIGHT_THUMB_STICK_LEFT => key.right_thumb_x = -amount,
            KEY_BUTTON_RIGHT_THUMB_STICK_RIGHT => key.right_thumb_x = amount,
            KEY_BUTTON_RIGHT_THUMB_STICK_UP => key.right_thumb_y = amount,
            KEY_BUTTON_RIGHT_THUMB_STICK_DOWN => key.right_thumb_y = -amount,
            _ => {}
        }
        key
    }

    /// Mark the key as injected by the event server
    pub fn with_source(mut self, source: KeySource) -> Self {
        self.source = source;
        self
    }

    pub fn with_modifiers(mut self, modifiers: Modifiers) -> Self {
        self.modifiers = modifiers;
        self
    }

    /// Button code including modifier bits
    #[inline]
    pub fn button_code(&self) -> u32 {
        self.code | self.modifiers.bits()
    }

    /// Button code without modifier bits
    #[inline]
    pub fn code(&self) -> u32 {
        self.code
    }

    pub fn modifiers(&self) -> Modifiers {
        self.modifiers
    }

    pub fn is_long_press(&self) -> bool {
        self.modifiers.contains(Modifiers::LONG)
    }

    pub fn vkey(&self) -> u8 {
        self.vkey
    }

    pub fn unicode(&self) -> Option<char> {
        self.unicode
    }

    pub fn ascii(&self) -> u8 {
        self.ascii
    }

    pub fn hold_time_ms(&self) -> u32 {
        self.hold_time_ms
    }

    pub fn source(&self) -> KeySource {
        self.source
    }

    pub fn from_keyboard_device(&self) -> bool {
        self.source == KeySource::Keyboard
    }

    pub fn from_service(&self) -> bool {
        self.source == KeySource::Service
    }

    pub fn is_analog_button(&self) -> bool {
        keycodes::is_analog_button(self.code)
    }

    pub fn left_trigger(&self) -> u8 {
        self.left_trigger
    }

    pub fn right_trigger(&self) -> u8 {
        self.right_trigger
    }

    pub fn left_thumb(&self) -> (f32, f32) {
        (self.left_thumb_x, self.left_thumb_y)
    }

    pub fn right_thumb(&self) -> (f32, f32) {
        (self.right_thumb_x, self.right_thumb_y)
    }

    pub fn repeat(&self) -> f32 {
        self.repeat
    }

    /// Human readable name for logs ("ctrl+v", "remote 166")
    pub fn name(&self) -> String {
        let mut parts: Vec<String> = Vec::new();
        for (flag, name) in [
            (Modifiers::CTRL, "ctrl"),
            (Modifiers::SHIFT, "shift"),
            (Modifiers::ALT, "alt"),
            (Modifiers::RALT, "ralt"),
            (Modifiers::SUPER, "super"),
            (Modifiers::META, "meta"),
            (Modifiers::LONG, "long"),
        ] {
            if self.modifiers.contains(flag) {
                parts.push(name.to_string());
            }
        }
        let base = if self.code & 0xFF00 == KEY_VKEY {
            keycodes::vkey_name(self.vkey)
                .unwrap_or_else(|| format!("vkey {:#04x}", self.code & 0xFF))
        } else if self.code == KEY_UNICODE {
            match self.unicode {
                Some(c) => format!("'{}'", c),
                None => "unicode".to_string(),
            }
        } else if let Some(n) = keycodes::remote_button_name(self.code) {
            n.to_string()
        } else {
            format!("{:#06x}", self.code)
        };
        parts.push(base);
        parts.join("+")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::input::keycodes::*;

    #[test]
    fn test_button_code_embeds_modifiers() {
        let key = Key::from_keyboard(VK_V, Some('v'), Modifiers::CTRL, 0);
        assert_eq!(key.button_code(), KEY_VKEY | VK_V as u32 | Modifiers::CTRL.bits());
        assert_eq!(key.code(), KEY_VKEY | VK_V as u32);
        assert_eq!(key.ascii(), b'v');
        assert!(key.from_keyboard_device());
    }

    #[test]
    fn test_new_splits_modifiers() {
        let key = Key::new(REMOTE_SELECT | Modifiers::LONG.bits(), 600);
        assert_eq!(key.code(), REMOTE_SELECT);
        assert!(key.is_long_press());
        assert_eq!(key.hold_time_ms(), 600);
    }

    #[test]
    fn test_analog_axis_fields() {
        let key = Key::analog(KEY_BUTTON_LEFT_THUMB_STICK_LEFT, 0.5, 0.016);
        assert_eq!(key.left_thumb(), (-0.5, 0.0));
        let key = Key::analog(KEY_BUTTON_RIGHT_THUMB_STICK_DOWN, 0.25, 0.016);
        assert_eq!(key.right_thumb(), (0.0, -0.25));
        let key = Key::analog(KEY_BUTTON_RIGHT_ANALOG_TRIGGER, 1.0, 0.016);
        assert_eq!(key.right_trigger(), 255);
        assert!(key.is_analog_button());
    }

    #[test]
    fn test_key_name() {
        let key = Key::from_keyboard(VK_RETURN, Some('\r'), Modifiers::SHIFT, 0);
        assert_eq!(key.name(), "shift+return");
        assert_eq!(Key::new(REMOTE_MENU, 0).name(), "menu");
    }
}
