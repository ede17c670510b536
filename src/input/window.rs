//! Window identifiers
//!
//! Keymap sections are keyed by window id. `WINDOW_GLOBAL` holds
//! the bindings every window falls back to.

/// Window identifier as used by the window manager
pub type WindowId = i32;

pub const WINDOW_GLOBAL: WindowId = -1;
pub const WINDOW_HOME: WindowId = 10000;
pub const WINDOW_PROGRAMS: WindowId = 10001;
pub const WINDOW_PICTURES: WindowId = 10002;
pub const WINDOW_SETTINGS_MENU: WindowId = 10004;
pub const WINDOW_VIDEO_NAV: WindowId = 10025;
pub const WINDOW_DIALOG_KEYBOARD: WindowId = 10103;
pub const WINDOW_DIALOG_CONTEXT_MENU: WindowId = 10106;
pub const WINDOW_DIALOG_NUMERIC: WindowId = 10109;
pub const WINDOW_DIALOG_FULLSCREEN_INFO: WindowId = 10142;
pub const WINDOW_MUSIC_NAV: WindowId = 10502;
pub const WINDOW_FULLSCREEN_LIVETV: WindowId = 10614;
pub const WINDOW_FULLSCREEN_VIDEO: WindowId = 12005;
pub const WINDOW_VISUALISATION: WindowId = 12006;
pub const WINDOW_SLIDESHOW: WindowId = 12007;
pub const WINDOW_FULLSCREEN_GAME: WindowId = 12011;
pub const WINDOW_SCREENSAVER: WindowId = 12900;

const WINDOW_NAMES: &[(&str, WindowId)] = &[
    ("global", WINDOW_GLOBAL),
    ("home", WINDOW_HOME),
    ("programs", WINDOW_PROGRAMS),
    ("pictures", WINDOW_PICTURES),
    ("settings", WINDOW_SETTINGS_MENU),
    ("videos", WINDOW_VIDEO_NAV),
    ("virtualkeyboard", WINDOW_DIALOG_KEYBOARD),
    ("contextmenu", WINDOW_DIALOG_CONTEXT_MENU),
    ("numericinput", WINDOW_DIALOG_NUMERIC),
    ("fullscreeninfo", WINDOW_DIALOG_FULLSCREEN_INFO),
    ("music", WINDOW_MUSIC_NAV),
    ("fullscreenlivetv", WINDOW_FULLSCREEN_LIVETV),
    ("fullscreenvideo", WINDOW_FULLSCREEN_VIDEO),
    ("visualisation", WINDOW_VISUALISATION),
    ("slideshow", WINDOW_SLIDESHOW),
    ("fullscreengame", WINDOW_FULLSCREEN_GAME),
    ("screensaver", WINDOW_SCREENSAVER),
];

/// Look up a window by keymap section name
pub fn window_from_name(name: &str) -> Option<WindowId> {
    WINDOW_NAMES
        .iter()
        .find(|(n, _)| n.eq_ignore_ascii_case(name))
        .map(|&(_, id)| id)
}

pub fn window_name(id: WindowId) -> Option<&'static str> {
    WINDOW_NAMES
        .iter()
        .find(|&&(_, w)| w == id)
        .map(|&(n, _)| n)
}

/// Window whose bindings apply before the global section
pub fn fallback_window(id: WindowId) -> Option<WindowId> {
    match id {
        WINDOW_FULLSCREEN_LIVETV | WINDOW_DIALOG_FULLSCREEN_INFO => Some(WINDOW_FULLSCREEN_VIDEO),
        _ => None,
    }
}
