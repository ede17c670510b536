//! Key and button code constants
//!
//! Consolidates every code space the translator understands:
//! platform keysyms, virtual keys, gamepad buttons, IR remote
//! buttons, mouse pseudo-keys and the flagged keyboard spaces.
//! Each space has a name table used by keymap files and logs.

// ============================================================================
// Platform Keysyms (delivered in key events)
// ============================================================================

/// Backspace key
pub const SYM_BACKSPACE: u32 = 8;
/// Tab key
pub const SYM_TAB: u32 = 9;
/// Return key
pub const SYM_RETURN: u32 = 13;
/// Escape key
pub const SYM_ESCAPE: u32 = 27;
/// Space bar
pub const SYM_SPACE: u32 = 32;
/// Delete key
pub const SYM_DELETE: u32 = 127;

/// Up arrow key
pub const SYM_UP: u32 = 273;
/// Down arrow key
pub const SYM_DOWN: u32 = 274;
/// Right arrow key
pub const SYM_RIGHT: u32 = 275;
/// Left arrow key
pub const SYM_LEFT: u32 = 276;
/// Insert key
pub const SYM_INSERT: u32 = 277;
/// Home key
pub const SYM_HOME: u32 = 278;
/// End key
pub const SYM_END: u32 = 279;
/// Page Up key
pub const SYM_PAGEUP: u32 = 280;
/// Page Down key
pub const SYM_PAGEDOWN: u32 = 281;
/// F1 key (F2..F12 follow consecutively)
pub const SYM_F1: u32 = 282;
/// F12 key
pub const SYM_F12: u32 = 293;

pub const SYM_RSHIFT: u32 = 303;
pub const SYM_LSHIFT: u32 = 304;
pub const SYM_RCTRL: u32 = 305;
pub const SYM_LCTRL: u32 = 306;
pub const SYM_RALT: u32 = 307;
pub const SYM_LALT: u32 = 308;
pub const SYM_LSUPER: u32 = 311;
pub const SYM_RSUPER: u32 = 312;

pub const SYM_MEDIA_PLAY_PAUSE: u32 = 320;
pub const SYM_MEDIA_STOP: u32 = 321;
pub const SYM_MEDIA_NEXT: u32 = 322;
pub const SYM_MEDIA_PREV: u32 = 323;
pub const SYM_VOLUME_UP: u32 = 324;
pub const SYM_VOLUME_DOWN: u32 = 325;
pub const SYM_VOLUME_MUTE: u32 = 326;

// ============================================================================
// Virtual Keys (layout independent)
// ============================================================================

pub const VK_BACK: u8 = 0x08;
pub const VK_TAB: u8 = 0x09;
pub const VK_RETURN: u8 = 0x0D;
pub const VK_ESCAPE: u8 = 0x1B;
pub const VK_SPACE: u8 = 0x20;
pub const VK_PAGEUP: u8 = 0x21;
pub const VK_PAGEDOWN: u8 = 0x22;
pub const VK_END: u8 = 0x23;
pub const VK_HOME: u8 = 0x24;
pub const VK_LEFT: u8 = 0x25;
pub const VK_UP: u8 = 0x26;
pub const VK_RIGHT: u8 = 0x27;
pub const VK_DOWN: u8 = 0x28;
pub const VK_INSERT: u8 = 0x2D;
pub const VK_DELETE: u8 = 0x2E;
/// Digits 0-9 map to their ASCII codes
pub const VK_0: u8 = 0x30;
pub const VK_9: u8 = 0x39;
/// Letters A-Z map to their uppercase ASCII codes
pub const VK_A: u8 = 0x41;
pub const VK_B: u8 = 0x42;
pub const VK_V: u8 = 0x56;
pub const VK_Z: u8 = 0x5A;
pub const VK_F1: u8 = 0x70;
pub const VK_F12: u8 = 0x7B;
pub const VK_VOLUME_MUTE: u8 = 0xAD;
pub const VK_VOLUME_DOWN: u8 = 0xAE;
pub const VK_VOLUME_UP: u8 = 0xAF;
pub const VK_MEDIA_NEXT: u8 = 0xB0;
pub const VK_MEDIA_PREV: u8 = 0xB1;
pub const VK_MEDIA_STOP: u8 = 0xB2;
pub const VK_MEDIA_PLAY_PAUSE: u8 = 0xB3;
pub const VK_SEMICOLON: u8 = 0xBA;
pub const VK_PLUS: u8 = 0xBB;
pub const VK_COMMA: u8 = 0xBC;
pub const VK_MINUS: u8 = 0xBD;
pub const VK_PERIOD: u8 = 0xBE;
pub const VK_FORWARD_SLASH: u8 = 0xBF;
pub const VK_TILDE: u8 = 0xC0;
pub const VK_LEFTBRACKET: u8 = 0xDB;
pub const VK_BACKSLASH: u8 = 0xDC;
pub const VK_RIGHTBRACKET: u8 = 0xDD;
pub const VK_QUOTE: u8 = 0xDE;

// ============================================================================
// Flagged Code Spaces
// ============================================================================

/// Virtual mouse (also the mouse no-op code)
pub const KEY_VMOUSE: u32 = 0xEFFF;
/// Keyboard virtual keys: `KEY_VKEY | vkey`
pub const KEY_VKEY: u32 = 0xF000;
/// Printable characters: `KEY_ASCII | ascii`
pub const KEY_ASCII: u32 = 0xF100;
/// Characters without a virtual key
pub const KEY_UNICODE: u32 = 0xF200;
/// Code carried by keys that do not map to anything
pub const KEY_INVALID: u32 = 0xFFFF;

/// Mask selecting the code without modifier bits
pub const KEY_CODE_MASK: u32 = 0xFFFF;

// ============================================================================
// Gamepad Buttons
// ============================================================================

pub const KEY_BUTTON_A: u32 = 256;
pub const KEY_BUTTON_B: u32 = 257;
pub const KEY_BUTTON_X: u32 = 258;
pub const KEY_BUTTON_Y: u32 = 259;
pub const KEY_BUTTON_BLACK: u32 = 260;
pub const KEY_BUTTON_WHITE: u32 = 261;
pub const KEY_BUTTON_LEFT_TRIGGER: u32 = 262;
pub const KEY_BUTTON_RIGHT_TRIGGER: u32 = 263;
pub const KEY_BUTTON_LEFT_THUMB_STICK: u32 = 264;
pub const KEY_BUTTON_RIGHT_THUMB_STICK: u32 = 265;
pub const KEY_BUTTON_RIGHT_THUMB_STICK_UP: u32 = 266;
pub const KEY_BUTTON_RIGHT_THUMB_STICK_DOWN: u32 = 267;
pub const KEY_BUTTON_RIGHT_THUMB_STICK_LEFT: u32 = 268;
pub const KEY_BUTTON_RIGHT_THUMB_STICK_RIGHT: u32 = 269;
pub const KEY_BUTTON_DPAD_UP: u32 = 270;
pub const KEY_BUTTON_DPAD_DOWN: u32 = 271;
pub const KEY_BUTTON_DPAD_LEFT: u32 = 272;
pub const KEY_BUTTON_DPAD_RIGHT: u32 = 273;
pub const KEY_BUTTON_START: u32 = 274;
pub const KEY_BUTTON_BACK: u32 = 275;
pub const KEY_BUTTON_LEFT_THUMB_BUTTON: u32 = 276;
pub const KEY_BUTTON_RIGHT_THUMB_BUTTON: u32 = 277;
pub const KEY_BUTTON_LEFT_ANALOG_TRIGGER: u32 = 278;
pub const KEY_BUTTON_RIGHT_ANALOG_TRIGGER: u32 = 279;
pub const KEY_BUTTON_LEFT_THUMB_STICK_UP: u32 = 280;
pub const KEY_BUTTON_LEFT_THUMB_STICK_DOWN: u32 = 281;
pub const KEY_BUTTON_LEFT_THUMB_STICK_LEFT: u32 = 282;
pub const KEY_BUTTON_LEFT_THUMB_STICK_RIGHT: u32 = 283;

// ============================================================================
// IR Remote Buttons
// ============================================================================

pub const REMOTE_SELECT: u32 = 11;
pub const REMOTE_BACK: u32 = 216;
pub const REMOTE_UP: u32 = 166;
pub const REMOTE_DOWN: u32 = 167;
pub const REMOTE_RIGHT: u32 = 168;
pub const REMOTE_LEFT: u32 = 169;
pub const REMOTE_PAUSE: u32 = 176;
pub const REMOTE_MUTE: u32 = 192;
pub const REMOTE_INFO: u32 = 195;
pub const REMOTE_POWER: u32 = 196;
/// Remote digits: 0 is 207, 9 is 198
pub const REMOTE_0: u32 = 207;
pub const REMOTE_9: u32 = 198;
pub const REMOTE_VOLUME_PLUS: u32 = 208;
pub const REMOTE_VOLUME_MINUS: u32 = 209;
pub const REMOTE_CHANNEL_PLUS: u32 = 210;
pub const REMOTE_CHANNEL_MINUS: u32 = 211;
pub const REMOTE_DISPLAY: u32 = 213;
pub const REMOTE_SKIP_MINUS: u32 = 221;
pub const REMOTE_SKIP_PLUS: u32 = 223;
pub const REMOTE_STOP: u32 = 224;
pub const REMOTE_REVERSE: u32 = 226;
pub const REMOTE_FORWARD: u32 = 227;
pub const REMOTE_TITLE: u32 = 229;
pub const REMOTE_RECORD: u32 = 232;
pub const REMOTE_PLAY: u32 = 234;
pub const REMOTE_MENU: u32 = 247;
pub const REMOTE_ENTER: u32 = 250;

// ============================================================================
// Mouse Pseudo-Keys
// ============================================================================

/// Click codes: `KEY_MOUSE_CLICK + button index`
pub const KEY_MOUSE_CLICK: u32 = 0xE000;
pub const KEY_MOUSE_RIGHTCLICK: u32 = 0xE001;
pub const KEY_MOUSE_MIDDLECLICK: u32 = 0xE002;
pub const KEY_MOUSE_DOUBLE_CLICK: u32 = 0xE010;
pub const KEY_MOUSE_LONG_CLICK: u32 = 0xE020;
pub const KEY_MOUSE_WHEEL_UP: u32 = 0xE101;
pub const KEY_MOUSE_WHEEL_DOWN: u32 = 0xE102;
pub const KEY_MOUSE_MOVE: u32 = 0xE103;
pub const KEY_MOUSE_DRAG: u32 = 0xE104;
pub const KEY_MOUSE_DRAG_START: u32 = 0xE105;
pub const KEY_MOUSE_DRAG_END: u32 = 0xE106;
pub const KEY_MOUSE_RDRAG: u32 = 0xE107;
pub const KEY_MOUSE_RDRAG_START: u32 = 0xE108;
pub const KEY_MOUSE_RDRAG_END: u32 = 0xE109;
pub const KEY_MOUSE_NOOP: u32 = 0xEFFF;

// ============================================================================
// Name Tables
// ============================================================================

const VKEY_NAMES: &[(&str, u8)] = &[
    ("backspace", VK_BACK),
    ("tab", VK_TAB),
    ("return", VK_RETURN),
    ("enter", VK_RETURN),
    ("escape", VK_ESCAPE),
    ("esc", VK_ESCAPE),
    ("space", VK_SPACE),
    ("pageup", VK_PAGEUP),
    ("pagedown", VK_PAGEDOWN),
    ("end", VK_END),
    ("home", VK_HOME),
    ("left", VK_LEFT),
    ("up", VK_UP),
    ("right", VK_RIGHT),
    ("down", VK_DOWN),
    ("insert", VK_INSERT),
    ("delete", VK_DELETE),
    ("volume_mute", VK_VOLUME_MUTE),
    ("volume_down", VK_VOLUME_DOWN),
    ("volume_up", VK_VOLUME_UP),
    ("next_track", VK_MEDIA_NEXT),
    ("prev_track", VK_MEDIA_PREV),
    ("stop", VK_MEDIA_STOP),
    ("play_pause", VK_MEDIA_PLAY_PAUSE),
    ("semicolon", VK_SEMICOLON),
    ("plus", VK_PLUS),
    ("comma", VK_COMMA),
    ("minus", VK_MINUS),
    ("period", VK_PERIOD),
    ("forwardslash", VK_FORWARD_SLASH),
    ("tilde", VK_TILDE),
    ("leftbracket", VK_LEFTBRACKET),
    ("backslash", VK_BACKSLASH),
    ("rightbracket", VK_RIGHTBRACKET),
    ("quote", VK_QUOTE),
];

const GAMEPAD_NAMES: &[(&str, u32)] = &[
    ("a", KEY_BUTTON_A),
    ("b", KEY_BUTTON_B),
    ("x", KEY_BUTTON_X),
    ("y", KEY_BUTTON_Y),
    ("black", KEY_BUTTON_BLACK),
    ("white", KEY_BUTTON_WHITE),
    ("lefttrigger", KEY_BUTTON_LEFT_TRIGGER),
    ("righttrigger", KEY_BUTTON_RIGHT_TRIGGER),
    ("leftthumbstick", KEY_BUTTON_LEFT_THUMB_STICK),
    ("rightthumbstick", KEY_BUTTON_RIGHT_THUMB_STICK),
    ("rightthumbstickup", KEY_BUTTON_RIGHT_THUMB_STICK_UP),
    ("rightthumbstickdown", KEY_BUTTON_RIGHT_THUMB_STICK_DOWN),
    ("rightthumbstickleft", KEY_BUTTON_RIGHT_THUMB_STICK_LEFT),
    ("rightthumbstickright", KEY_BUTTON_RIGHT_THUMB_STICK_RIGHT),
    ("dpadup", KEY_BUTTON_DPAD_UP),
    ("dpaddown", KEY_BUTTON_DPAD_DOWN),
    ("dpadleft", KEY_BUTTON_DPAD_LEFT),
    ("dpadright", KEY_BUTTON_DPAD_RIGHT),
    ("start", KEY_BUTTON_START),
    ("back", KEY_BUTTON_BACK),
    ("leftthumbbutton", KEY_BUTTON_LEFT_THUMB_BUTTON),
    ("rightthumbbutton", KEY_BUTTON_RIGHT_THUMB_BUTTON),
    ("leftanalogtrigger", KEY_BUTTON_LEFT_ANALOG_TRIGGER),
    ("rightanalogtrigger", KEY_BUTTON_RIGHT_ANALOG_TRIGGER),
    ("leftthumbstickup", KEY_BUTTON_LEFT_THUMB_STICK_UP),
    ("leftthumbstickdown", KEY_BUTTON_LEFT_THUMB_STICK_DOWN),
    ("leftthumbstickleft", KEY_BUTTON_LEFT_THUMB_STICK_LEFT),
    ("leftthumbstickright", KEY_BUTTON_LEFT_THUMB_STICK_RIGHT),
];

const REMOTE_NAMES: &[(&str, u32)] = &[
    ("select", REMOTE_SELECT),
    ("back", REMOTE_BACK),
    ("up", REMOTE_UP),
    ("down", REMOTE_DOWN),
    ("right", REMOTE_RIGHT),
    ("left", REMOTE_LEFT),
    ("pause", REMOTE_PAUSE),
    ("mute", REMOTE_MUTE),
    ("info", REMOTE_INFO),
    ("power", REMOTE_POWER),
    ("zero", REMOTE_0),
    ("one", REMOTE_0 - 1),
    ("two", REMOTE_0 - 2),
    ("three", REMOTE_0 - 3),
    ("four", REMOTE_0 - 4),
    ("five", REMOTE_0 - 5),
    ("six", REMOTE_0 - 6),
    ("seven", REMOTE_0 - 7),
    ("eight", REMOTE_0 - 8),
    ("nine", REMOTE_9),
    ("volumeplus", REMOTE_VOLUME_PLUS),
    ("volumeminus", REMOTE_VOLUME_MINUS),
    ("channelplus", REMOTE_CHANNEL_PLUS),
    ("channelminus", REMOTE_CHANNEL_MINUS),
    ("display", REMOTE_DISPLAY),
    ("skipminus", REMOTE_SKIP_MINUS),
    ("skipplus", REMOTE_SKIP_PLUS),
    ("stop", REMOTE_STOP),
    ("reverse", REMOTE_REVERSE),
    ("forward", REMOTE_FORWARD),
    ("title", REMOTE_TITLE),
    ("record", REMOTE_RECORD),
    ("play", REMOTE_PLAY),
    ("menu", REMOTE_MENU),
    ("enter", REMOTE_ENTER),
];

const MOUSE_NAMES: &[(&str, u32)] = &[
    ("leftclick", KEY_MOUSE_CLICK),
    ("rightclick", KEY_MOUSE_RIGHTCLICK),
    ("middleclick", KEY_MOUSE_MIDDLECLICK),
    ("doubleclick", KEY_MOUSE_DOUBLE_CLICK),
    ("longclick", KEY_MOUSE_LONG_CLICK),
    ("wheelup", KEY_MOUSE_WHEEL_UP),
    ("wheeldown", KEY_MOUSE_WHEEL_DOWN),
    ("mousemove", KEY_MOUSE_MOVE),
    ("mousedrag", KEY_MOUSE_DRAG),
    ("mousedragstart", KEY_MOUSE_DRAG_START),
    ("mousedragend", KEY_MOUSE_DRAG_END),
    ("mouserdrag", KEY_MOUSE_RDRAG),
    ("mouserdragstart", KEY_MOUSE_RDRAG_START),
    ("mouserdragend", KEY_MOUSE_RDRAG_END),
];

fn lookup(table: &[(&str, u32)], name: &str) -> Option<u32> {
    table
        .iter()
        .find(|(n, _)| n.eq_ignore_ascii_case(name))
        .map(|&(_, code)| code)
}

fn reverse_lookup(table: &'static [(&'static str, u32)], code: u32) -> Option<&'static str> {
    table.iter().find(|&&(_, c)| c == code).map(|&(n, _)| n)
}

/// Look up a virtual key by keymap name ("enter", "a", "f5", "pageup")
pub fn vkey_from_name(name: &str) -> Option<u8> {
    let lower = name.to_ascii_lowercase();
    let bytes = lower.as_bytes();
    if bytes.len() == 1 {
        let c = bytes[0];
        if c.is_ascii_lowercase() {
            return Some(c.to_ascii_uppercase());
        }
        if c.is_ascii_digit() {
            return Some(c);
        }
    }
    if let Some(n) = lower.strip_prefix('f').and_then(|n| n.parse::<u8>().ok()) {
        if (1..=12).contains(&n) {
            return Some(VK_F1 + n - 1);
        }
    }
    VKEY_NAMES
        .iter()
        .find(|(n, _)| *n == lower)
        .map(|&(_, vk)| vk)
}

/// Keymap name of a virtual key
pub fn vkey_name(vkey: u8) -> Option<String> {
    match vkey {
        VK_0..=VK_9 => Some((vkey as char).to_string()),
        VK_A..=VK_Z => Some((vkey as char).to_ascii_lowercase().to_string()),
        VK_F1..=VK_F12 => Some(format!("f{}", vkey - VK_F1 + 1)),
        _ => VKEY_NAMES
            .iter()
            .find(|&&(_, vk)| vk == vkey)
            .map(|&(n, _)| n.to_string()),
    }
}

/// Look up a gamepad button by keymap name
pub fn gamepad_button_from_name(name: &str) -> Option<u32> {
    lookup(GAMEPAD_NAMES, name)
}

/// Look up an IR remote button by keymap name
pub fn remote_button_from_name(name: &str) -> Option<u32> {
    lookup(REMOTE_NAMES, name)
}

/// Keymap name of an IR remote button
pub fn remote_button_name(code: u32) -> Option<&'static str> {
    reverse_lookup(REMOTE_NAMES, code)
}

/// Look up a mouse pseudo-key by keymap name
pub fn mouse_key_from_name(name: &str) -> Option<u32> {
    lookup(MOUSE_NAMES, name)
}

// ============================================================================
// Helper Functions
// ============================================================================

/// Check if keysym is a modifier key
#[inline]
pub const fn is_modifier_sym(sym: u32) -> bool {
    matches!(
        sym,
        SYM_LSHIFT
            | SYM_RSHIFT
            | SYM_LCTRL
            | SYM_RCTRL
            | SYM_LALT
            | SYM_RALT
            | SYM_LSUPER
            | SYM_RSUPER
    )
}

/// Check if button code is an analog gamepad axis
#[inline]
pub const fn is_analog_button(code: u32) -> bool {
    matches!(
        code,
        KEY_BUTTON_LEFT_ANALOG_TRIGGER..=KEY_BUTTON_LEFT_THUMB_STICK_RIGHT
            | KEY_BUTTON_RIGHT_THUMB_STICK_UP..=KEY_BUTTON_RIGHT_THUMB_STICK_RIGHT
    )
}

/// Check if button code is a mouse pseudo-key
#[inline]
pub const fn is_mouse_key(code: u32) -> bool {
    code >= KEY_MOUSE_CLICK && code <= KEY_MOUSE_NOOP
}

/// Convert a platform keysym to a virtual key (0 if none)
pub const fn sym_to_vkey(sym: u32) -> u8 {
    match sym {
        0x61..=0x7A => (sym - 0x20) as u8,
        0x41..=0x5A | 0x30..=0x39 => sym as u8,
        SYM_BACKSPACE => VK_BACK,
        SYM_TAB => VK_TAB,
        SYM_RETURN => VK_RETURN,
        SYM_ESCAPE => VK_ESCAPE,
        SYM_SPACE => VK_SPACE,
        SYM_DELETE => VK_DELETE,
        SYM_UP => VK_UP,
        SYM_DOWN => VK_DOWN,
        SYM_LEFT => VK_LEFT,
        SYM_RIGHT => VK_RIGHT,
        SYM_INSERT => VK_INSERT,
        SYM_HOME => VK_HOME,
        SYM_END => VK_END,
        SYM_PAGEUP => VK_PAGEUP,
        SYM_PAGEDOWN => VK_PAGEDOWN,
        SYM_F1..=SYM_F12 => VK_F1 + (sym - SYM_F1) as u8,
        SYM_MEDIA_PLAY_PAUSE => VK_MEDIA_PLAY_PAUSE,
        SYM_MEDIA_STOP => VK_MEDIA_STOP,
        SYM_MEDIA_NEXT => VK_MEDIA_NEXT,
        SYM_MEDIA_PREV => VK_MEDIA_PREV,
        SYM_VOLUME_UP => VK_VOLUME_UP,
        SYM_VOLUME_DOWN => VK_VOLUME_DOWN,
        SYM_VOLUME_MUTE => VK_VOLUME_MUTE,
        0x2D => VK_MINUS,
        0x3D | 0x2B => VK_PLUS,
        0x2C => VK_COMMA,
        0x2E => VK_PERIOD,
        0x2F => VK_FORWARD_SLASH,
        0x3B => VK_SEMICOLON,
        0x27 => VK_QUOTE,
        0x5B => VK_LEFTBRACKET,
        0x5C => VK_BACKSLASH,
        0x5D => VK_RIGHTBRACKET,
        0x60 => VK_TILDE,
        _ => 0,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_vkey_names() {
        assert_eq!(vkey_from_name("Enter"), Some(VK_RETURN));
        assert_eq!(vkey_from_name("a"), Some(VK_A));
        assert_eq!(vkey_from_name("7"), Some(0x37));
        assert_eq!(vkey_from_name("f5"), Some(VK_F1 + 4));
        assert_eq!(vkey_from_name("f13"), None);
        assert_eq!(vkey_name(VK_Z).as_deref(), Some("z"));
        assert_eq!(vkey_name(VK_F12).as_deref(), Some("f12"));
    }

    #[test]
    fn test_remote_digits() {
        assert_eq!(remote_button_from_name("nine"), Some(REMOTE_9));
        assert_eq!(remote_button_name(REMOTE_0), Some("zero"));
    }

    #[test]
    fn test_sym_to_vkey() {
        assert_eq!(sym_to_vkey('q' as u32), b'Q');
        assert_eq!(sym_to_vkey(SYM_F1 + 11), VK_F12);
        assert_eq!(sym_to_vkey(SYM_LSHIFT), 0);
        assert!(is_modifier_sym(SYM_LCTRL));
    }

    #[test]
    fn test_analog_buttons() {
        assert!(is_analog_button(KEY_BUTTON_LEFT_THUMB_STICK_UP));
        assert!(is_analog_button(KEY_BUTTON_RIGHT_THUMB_STICK_LEFT));
        assert!(!is_analog_button(KEY_BUTTON_A));
        assert!(is_mouse_key(KEY_MOUSE_WHEEL_UP));
    }
}
