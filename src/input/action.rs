//! Semantic actions
//!
//! An `Action` is what the window manager consumes: an id, the
//! keymap name it was resolved from, analog amounts and pointer
//! coordinates. Actions are plain values and freely cloned.

use smol_str::SmolStr;

use super::key::Key;
use super::keycodes::{
    KEY_BUTTON_LEFT_ANALOG_TRIGGER, KEY_BUTTON_LEFT_THUMB_STICK_DOWN,
    KEY_BUTTON_LEFT_THUMB_STICK_LEFT, KEY_BUTTON_LEFT_THUMB_STICK_RIGHT,
    KEY_BUTTON_LEFT_THUMB_STICK_UP, KEY_BUTTON_RIGHT_ANALOG_TRIGGER,
    KEY_BUTTON_RIGHT_THUMB_STICK_DOWN, KEY_BUTTON_RIGHT_THUMB_STICK_LEFT,
    KEY_BUTTON_RIGHT_THUMB_STICK_RIGHT, KEY_BUTTON_RIGHT_THUMB_STICK_UP,
};

// ============================================================================
// Action Ids
// ============================================================================

pub const ACTION_NONE: u32 = 0;
pub const ACTION_MOVE_LEFT: u32 = 1;
pub const ACTION_MOVE_RIGHT: u32 = 2;
pub const ACTION_MOVE_UP: u32 = 3;
pub const ACTION_MOVE_DOWN: u32 = 4;
pub const ACTION_PAGE_UP: u32 = 5;
pub const ACTION_PAGE_DOWN: u32 = 6;
pub const ACTION_SELECT_ITEM: u32 = 7;
pub const ACTION_HIGHLIGHT_ITEM: u32 = 8;
pub const ACTION_PARENT_DIR: u32 = 9;
pub const ACTION_PREVIOUS_MENU: u32 = 10;
pub const ACTION_SHOW_INFO: u32 = 11;
pub const ACTION_PAUSE: u32 = 12;
pub const ACTION_STOP: u32 = 13;
pub const ACTION_NEXT_ITEM: u32 = 14;
pub const ACTION_PREV_ITEM: u32 = 15;
pub const ACTION_FORWARD: u32 = 16;
pub const ACTION_REWIND: u32 = 17;
pub const ACTION_SHOW_GUI: u32 = 18;
pub const ACTION_ASPECT_RATIO: u32 = 19;
pub const ACTION_STEP_FORWARD: u32 = 20;
pub const ACTION_STEP_BACK: u32 = 21;
pub const ACTION_BIG_STEP_FORWARD: u32 = 22;
pub const ACTION_BIG_STEP_BACK: u32 = 23;
pub const ACTION_SHOW_OSD: u32 = 24;
pub const ACTION_SHOW_SUBTITLES: u32 = 25;
pub const ACTION_NEXT_SUBTITLE: u32 = 26;
pub const ACTION_SHOW_CODEC: u32 = 27;
pub const ACTION_NEXT_PICTURE: u32 = 28;
pub const ACTION_PREV_PICTURE: u32 = 29;
pub const ACTION_ZOOM_OUT: u32 = 30;
pub const ACTION_ZOOM_IN: u32 = 31;
pub const ACTION_ANALOG_MOVE: u32 = 49;

/// Digit actions: 0 is 58, 9 is 67
pub const REMOTE_0: u32 = 58;
pub const REMOTE_9: u32 = 67;

pub const ACTION_PLAYER_FORWARD: u32 = 77;
pub const ACTION_PLAYER_REWIND: u32 = 78;
pub const ACTION_PLAYER_PLAY: u32 = 79;
pub const ACTION_VOLUME_UP: u32 = 88;
pub const ACTION_VOLUME_DOWN: u32 = 89;
pub const ACTION_MUTE: u32 = 91;
pub const ACTION_NAV_BACK: u32 = 92;

pub const ACTION_MOUSE_START: u32 = 100;
pub const ACTION_MOUSE_LEFT_CLICK: u32 = 100;
pub const ACTION_MOUSE_RIGHT_CLICK: u32 = 101;
pub const ACTION_MOUSE_MIDDLE_CLICK: u32 = 102;
pub const ACTION_MOUSE_DOUBLE_CLICK: u32 = 103;
pub const ACTION_MOUSE_WHEEL_UP: u32 = 104;
pub const ACTION_MOUSE_WHEEL_DOWN: u32 = 105;
pub const ACTION_MOUSE_DRAG: u32 = 106;
pub const ACTION_MOUSE_MOVE: u32 = 107;
pub const ACTION_MOUSE_LONG_CLICK: u32 = 108;
pub const ACTION_MOUSE_DRAG_END: u32 = 109;
pub const ACTION_MOUSE_END: u32 = 109;

pub const ACTION_BACKSPACE: u32 = 110;
pub const ACTION_SCROLL_UP: u32 = 111;
pub const ACTION_SCROLL_DOWN: u32 = 112;
pub const ACTION_ANALOG_FORWARD: u32 = 113;
pub const ACTION_ANALOG_REWIND: u32 = 114;
pub const ACTION_CONTEXT_MENU: u32 = 117;
pub const ACTION_SHIFT: u32 = 118;
pub const ACTION_SYMBOLS: u32 = 119;
pub const ACTION_CURSOR_LEFT: u32 = 120;
pub const ACTION_CURSOR_RIGHT: u32 = 121;
pub const ACTION_BUILT_IN_FUNCTION: u32 = 122;
pub const ACTION_SHOW_OSD_TIME: u32 = 123;
pub const ACTION_ANALOG_SEEK_FORWARD: u32 = 124;
pub const ACTION_ANALOG_SEEK_BACK: u32 = 125;
pub const ACTION_ENTER: u32 = 135;
pub const ACTION_PASTE: u32 = 180;
pub const ACTION_PLAYER_PLAYPAUSE: u32 = 229;
pub const ACTION_VOICE_RECOGNIZE: u32 = 300;

pub const ACTION_TOUCH_TAP: u32 = 401;
pub const ACTION_TOUCH_TAP_TEN: u32 = 410;
pub const ACTION_TOUCH_LONGPRESS: u32 = 411;
pub const ACTION_TOUCH_LONGPRESS_TEN: u32 = 420;
pub const ACTION_GESTURE_NOTIFY: u32 = 500;
pub const ACTION_GESTURE_BEGIN: u32 = 501;
pub const ACTION_GESTURE_ZOOM: u32 = 502;
pub const ACTION_GESTURE_ROTATE: u32 = 503;
pub const ACTION_GESTURE_PAN: u32 = 504;
pub const ACTION_GESTURE_ABORT: u32 = 505;
pub const ACTION_GESTURE_SWIPE_LEFT: u32 = 511;
pub const ACTION_GESTURE_SWIPE_LEFT_TEN: u32 = 520;
pub const ACTION_GESTURE_SWIPE_RIGHT: u32 = 521;
pub const ACTION_GESTURE_SWIPE_RIGHT_TEN: u32 = 530;
pub const ACTION_GESTURE_SWIPE_UP: u32 = 531;
pub const ACTION_GESTURE_SWIPE_UP_TEN: u32 = 540;
pub const ACTION_GESTURE_SWIPE_DOWN: u32 = 541;
pub const ACTION_GESTURE_SWIPE_DOWN_TEN: u32 = 550;
pub const ACTION_GESTURE_END: u32 = 599;

pub const ACTION_ANALOG_MOVE_X_LEFT: u32 = 601;
pub const ACTION_ANALOG_MOVE_X_RIGHT: u32 = 602;
pub const ACTION_ANALOG_MOVE_Y_UP: u32 = 603;
pub const ACTION_ANALOG_MOVE_Y_DOWN: u32 = 604;

/// Explicit "do nothing" that still counts as handled
pub const ACTION_NOOP: u32 = 999;

const ACTION_NAMES: &[(&str, u32)] = &[
    ("Left", ACTION_MOVE_LEFT),
    ("Right", ACTION_MOVE_RIGHT),
    ("Up", ACTION_MOVE_UP),
    ("Down", ACTION_MOVE_DOWN),
    ("PageUp", ACTION_PAGE_UP),
    ("PageDown", ACTION_PAGE_DOWN),
    ("Select", ACTION_SELECT_ITEM),
    ("Highlight", ACTION_HIGHLIGHT_ITEM),
    ("ParentDir", ACTION_PARENT_DIR),
    ("PreviousMenu", ACTION_PREVIOUS_MENU),
    ("Info", ACTION_SHOW_INFO),
    ("Pause", ACTION_PAUSE),
    ("Stop", ACTION_STOP),
    ("SkipNext", ACTION_NEXT_ITEM),
    ("SkipPrevious", ACTION_PREV_ITEM),
    ("FastForward", ACTION_FORWARD),
    ("Rewind", ACTION_REWIND),
    ("FullScreen", ACTION_SHOW_GUI),
    ("AspectRatio", ACTION_ASPECT_RATIO),
    ("StepForward", ACTION_STEP_FORWARD),
    ("StepBack", ACTION_STEP_BACK),
    ("BigStepForward", ACTION_BIG_STEP_FORWARD),
    ("BigStepBack", ACTION_BIG_STEP_BACK),
    ("OSD", ACTION_SHOW_OSD),
    ("ShowSubtitles", ACTION_SHOW_SUBTITLES),
    ("NextSubtitle", ACTION_NEXT_SUBTITLE),
    ("CodecInfo", ACTION_SHOW_CODEC),
    ("NextPicture", ACTION_NEXT_PICTURE),
    ("PreviousPicture", ACTION_PREV_PICTURE),
    ("ZoomOut", ACTION_ZOOM_OUT),
    ("ZoomIn", ACTION_ZOOM_IN),
    ("AnalogMove", ACTION_ANALOG_MOVE),
    ("Number0", REMOTE_0),
    ("Number1", REMOTE_0 + 1),
    ("Number2", REMOTE_0 + 2),
    ("Number3", REMOTE_0 + 3),
    ("Number4", REMOTE_0 + 4),
    ("Number5", REMOTE_0 + 5),
    ("Number6", REMOTE_0 + 6),
    ("Number7", REMOTE_0 + 7),
    ("Number8", REMOTE_0 + 8),
    ("Number9", REMOTE_9),
    ("PlayerForward", ACTION_PLAYER_FORWARD),
    ("PlayerRewind", ACTION_PLAYER_REWIND),
    ("Play", ACTION_PLAYER_PLAY),
    ("VolumeUp", ACTION_VOLUME_UP),
    ("VolumeDown", ACTION_VOLUME_DOWN),
    ("Mute", ACTION_MUTE),
    ("Back", ACTION_NAV_BACK),
    ("LeftClick", ACTION_MOUSE_LEFT_CLICK),
    ("RightClick", ACTION_MOUSE_RIGHT_CLICK),
    ("MiddleClick", ACTION_MOUSE_MIDDLE_CLICK),
    ("DoubleClick", ACTION_MOUSE_DOUBLE_CLICK),
    ("WheelUp", ACTION_MOUSE_WHEEL_UP),
    ("WheelDown", ACTION_MOUSE_WHEEL_DOWN),
    ("MouseDrag", ACTION_MOUSE_DRAG),
    ("MouseMove", ACTION_MOUSE_MOVE),
    ("LongClick", ACTION_MOUSE_LONG_CLICK),
    ("MouseDragEnd", ACTION_MOUSE_DRAG_END),
    ("Backspace", ACTION_BACKSPACE),
    ("ScrollUp", ACTION_SCROLL_UP),
    ("ScrollDown", ACTION_SCROLL_DOWN),
    ("AnalogFastForward", ACTION_ANALOG_FORWARD),
    ("AnalogRewind", ACTION_ANALOG_REWIND),
    ("ContextMenu", ACTION_CONTEXT_MENU),
    ("Shift", ACTION_SHIFT),
    ("Symbols", ACTION_SYMBOLS),
    ("CursorLeft", ACTION_CURSOR_LEFT),
    ("CursorRight", ACTION_CURSOR_RIGHT),
    ("ShowTime", ACTION_SHOW_OSD_TIME),
    ("AnalogSeekForward", ACTION_ANALOG_SEEK_FORWARD),
    ("AnalogSeekBack", ACTION_ANALOG_SEEK_BACK),
    ("Enter", ACTION_ENTER),
    ("Paste", ACTION_PASTE),
    ("PlayPause", ACTION_PLAYER_PLAYPAUSE),
    ("VoiceRecognize", ACTION_VOICE_RECOGNIZE),
    ("Tap", ACTION_TOUCH_TAP),
    ("LongPress", ACTION_TOUCH_LONGPRESS),
    ("GestureBegin", ACTION_GESTURE_BEGIN),
    ("Zoom", ACTION_GESTURE_ZOOM),
    ("Rotate", ACTION_GESTURE_ROTATE),
    ("Pan", ACTION_GESTURE_PAN),
    ("GestureAbort", ACTION_GESTURE_ABORT),
    ("SwipeLeft", ACTION_GESTURE_SWIPE_LEFT),
    ("SwipeRight", ACTION_GESTURE_SWIPE_RIGHT),
    ("SwipeUp", ACTION_GESTURE_SWIPE_UP),
    ("SwipeDown", ACTION_GESTURE_SWIPE_DOWN),
    ("GestureEnd", ACTION_GESTURE_END),
    ("AnalogMoveXLeft", ACTION_ANALOG_MOVE_X_LEFT),
    ("AnalogMoveXRight", ACTION_ANALOG_MOVE_X_RIGHT),
    ("AnalogMoveYUp", ACTION_ANALOG_MOVE_Y_UP),
    ("AnalogMoveYDown", ACTION_ANALOG_MOVE_Y_DOWN),
    ("Noop", ACTION_NOOP),
];

/// Built-in commands that can be bound without arguments
const BUILTIN_COMMANDS: &[&str] = &[
    "activatewindow",
    "action",
    "cecactivatesource",
    "cecstandby",
    "cectogglestate",
    "hibernate",
    "notification",
    "playercontrol",
    "playmedia",
    "powerdown",
    "quit",
    "reboot",
    "remote.send",
    "remote.start",
    "remote.stop",
    "restart",
    "restartapp",
    "runscript",
    "sendclick",
    "setvolume",
    "shutdown",
    "suspend",
];

/// Look up an action id by keymap name (case-insensitive)
pub fn action_id_from_name(name: &str) -> Option<u32> {
    ACTION_NAMES
        .iter()
        .find(|(n, _)| n.eq_ignore_ascii_case(name))
        .map(|&(_, id)| id)
}

/// Canonical name of an action id
pub fn action_name(id: u32) -> Option<&'static str> {
    ACTION_NAMES
        .iter()
        .find(|&&(_, i)| i == id)
        .map(|&(n, _)| n)
}

/// Command part of a built-in string, lowercased ("ActivateWindow(Home)" -> "activatewindow")
pub fn builtin_command(name: &str) -> String {
    let command = match name.find('(') {
        Some(pos) => &name[..pos],
        None => name,
    };
    command.trim().to_lowercase()
}

/// True if the string has built-in syntax: a known command or `Name(args)`
pub fn is_builtin(name: &str) -> bool {
    let command = builtin_command(name);
    if command.is_empty() {
        return false;
    }
    BUILTIN_COMMANDS.contains(&command.as_str())
        || (name.contains('(') && name.trim_end().ends_with(')'))
}

/// Translate a keymap action string into (id, name)
///
/// Returns None for names that are neither actions nor built-ins.
pub fn translate_action_string(name: &str) -> Option<(u32, SmolStr)> {
    let name = name.trim();
    if let Some(id) = action_id_from_name(name) {
        return Some((id, SmolStr::new(name)));
    }
    if is_builtin(name) {
        return Some((ACTION_BUILT_IN_FUNCTION, SmolStr::new(name)));
    }
    None
}

/// Pointer coordinates carried by mouse and touch actions
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Point {
    pub x: f32,
    pub y: f32,
}

impl Point {
    pub const fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }
}

/// A resolved action
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Action {
    id: u32,
    name: SmolStr,
    amount: [f32; 4],
    position: Point,
    aux: [Point; 2],
    repeat: f32,
    hold_time_ms: u32,
    button_code: u32,
    unicode: Option<char>,
}

impl Action {
    pub fn new(id: u32) -> Self {
        Self {
            id,
            amount: [1.0, 0.0, 0.0, 0.0],
            ..Self::default()
        }
    }

    /// The "nothing mapped" action (id 0)
    pub fn none() -> Self {
        Self::default()
    }

    /// Action with a single amount and name (event server, joystick)
    pub fn with_amount(id: u32, amount: f32, name: &str) -> Self {
        Self {
            id,
            name: SmolStr::new(name),
            amount: [amount, 0.0, 0.0, 0.0],
            ..Self::default()
        }
    }

    /// Raw character action used by text input
    pub fn with_unicode(id: u32, unicode: Option<char>) -> Self {
        Self {
            unicode,
            ..Self::new(id)
        }
    }

    /// Action carrying its keymap string (built-ins)
    pub fn named(id: u32, name: &str) -> Self {
        Self {
            name: SmolStr::new(name),
            ..Self::new(id)
        }
    }

    /// Pointer action: absolute position plus delta, hold time of the left button
    pub fn pointer(id: u32, hold_time_ms: u32, position: Point, delta: Point, name: &str) -> Self {
        Self {
            id,
            name: SmolStr::new(name),
            position,
            aux: [delta, Point::default()],
            hold_time_ms,
            ..Self::default()
        }
    }

    /// Touch action: up to three contact points
    pub fn touch(id: u32, points: [Point; 3]) -> Self {
        Self {
            id,
            position: points[0],
            aux: [points[1], points[2]],
            ..Self::default()
        }
    }

    /// Action resolved from a keymap entry for `key`
    ///
    /// Analog keys contribute their magnitude; digital keys get 1.0.
    pub fn from_key(id: u32, name: &str, key: &Key) -> Self {
        let mut amount = [1.0, 0.0, 0.0, 0.0];
        match key.code() {
            KEY_BUTTON_LEFT_ANALOG_TRIGGER => {
                amount[0] = key.left_trigger() as f32 / 255.0;
            }
            KEY_BUTTON_RIGHT_ANALOG_TRIGGER => {
                amount[0] = key.right_trigger() as f32 / 255.0;
            }
            KEY_BUTTON_LEFT_THUMB_STICK_LEFT
            | KEY_BUTTON_LEFT_THUMB_STICK_RIGHT
            | KEY_BUTTON_LEFT_THUMB_STICK_UP
            | KEY_BUTTON_LEFT_THUMB_STICK_DOWN => {
                let (x, y) = key.left_thumb();
                amount[0] = x;
                amount[1] = y;
            }
            KEY_BUTTON_RIGHT_THUMB_STICK_LEFT
            | KEY_BUTTON_RIGHT_THUMB_STICK_RIGHT
            | KEY_BUTTON_RIGHT_THUMB_STICK_UP
            | KEY_BUTTON_RIGHT_THUMB_STICK_DOWN => {
                let (x, y) = key.right_thumb();
                amount[0] = x;
                amount[1] = y;
            }
            _ => {}
        }
        Self {
            id,
            name: SmolStr::new(name),
            amount,
            position: Point::default(),
            aux: [Point::default(); 2],
            repeat: key.repeat(),
            hold_time_ms: key.hold_time_ms(),
            button_code: key.button_code(),
            unicode: key.unicode(),
        }
    }

    pub fn id(&self) -> u32 {
        self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn amount(&self, index: usize) -> f32 {
        self.amount.get(index).copied().unwrap_or(0.0)
    }

    pub fn position(&self) -> Point {
        self.position
    }

    /// Secondary points (pointer delta, further touch contacts)
    pub fn aux(&self) -> [Point; 2] {
        self.aux
    }

    pub fn repeat(&self) -> f32 {
        self.repeat
    }

    pub fn hold_time_ms(&self) -> u32 {
        self.hold_time_ms
    }

    pub fn button_code(&self) -> u32 {
        self.button_code
    }

    pub fn unicode(&self) -> Option<char> {
        self.unicode
    }

    /// Analog actions: the latest sample supersedes any queued one
    pub fn is_analog(&self) -> bool {
        matches!(
            self.id,
            ACTION_ANALOG_SEEK_FORWARD
                | ACTION_ANALOG_SEEK_BACK
                | ACTION_SCROLL_UP
                | ACTION_SCROLL_DOWN
                | ACTION_ANALOG_FORWARD
                | ACTION_ANALOG_REWIND
                | ACTION_ANALOG_MOVE
                | ACTION_ANALOG_MOVE_X_LEFT
                | ACTION_ANALOG_MOVE_X_RIGHT
                | ACTION_ANALOG_MOVE_Y_UP
                | ACTION_ANALOG_MOVE_Y_DOWN
                | ACTION_CURSOR_LEFT
                | ACTION_CURSOR_RIGHT
                | ACTION_VOLUME_UP
                | ACTION_VOLUME_DOWN
                | ACTION_ZOOM_IN
                | ACTION_ZOOM_OUT
        )
    }

    pub fn is_mouse(&self) -> bool {
        (ACTION_MOUSE_START..=ACTION_MOUSE_END).contains(&self.id)
    }

    pub fn is_touch_or_gesture(&self) -> bool {
        (ACTION_TOUCH_TAP..=ACTION_GESTURE_END).contains(&self.id)
    }

    /// Plain directional or paging navigation
    pub fn is_navigation(&self) -> bool {
        matches!(
            self.id,
            ACTION_MOVE_LEFT
                | ACTION_MOVE_RIGHT
                | ACTION_MOVE_UP
                | ACTION_MOVE_DOWN
                | ACTION_PAGE_UP
                | ACTION_PAGE_DOWN
        )
    }
}
