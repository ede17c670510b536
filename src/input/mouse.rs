//! Mouse state tracking
//!
//! Keeps the pointer position (clamped to the configured
//! resolution), per-button click state machines and the activity
//! flag. After each event `key()` reports the mouse pseudo-key the
//! event produced: click, double/long click, drag phases, wheel or
//! plain movement.

use log::debug;

use super::action::Point;
use super::event::{
    MotionEvent, MouseButtonEvent, PlatformEvent, BUTTON_LEFT, BUTTON_MIDDLE, BUTTON_RIGHT,
    BUTTON_WHEEL_DOWN, BUTTON_WHEEL_UP, BUTTON_X1, BUTTON_X2,
};
use super::keycodes::{
    KEY_MOUSE_CLICK, KEY_MOUSE_DOUBLE_CLICK, KEY_MOUSE_DRAG, KEY_MOUSE_DRAG_END,
    KEY_MOUSE_DRAG_START, KEY_MOUSE_LONG_CLICK, KEY_MOUSE_MOVE, KEY_MOUSE_NOOP, KEY_MOUSE_RDRAG,
    KEY_MOUSE_RDRAG_END, KEY_MOUSE_RDRAG_START, KEY_MOUSE_WHEEL_DOWN, KEY_MOUSE_WHEEL_UP,
};
use crate::constants::{
    DEFAULT_MOUSE_MAX_X, DEFAULT_MOUSE_MAX_Y, DOUBLE_CLICK_THRESHOLD_MS, DRAG_THRESHOLD_PX,
    LONG_CLICK_THRESHOLD_MS,
};

/// Number of tracked buttons: left, right, middle, x1, x2
const MOUSE_BUTTONS: usize = 5;

/// Pointer state as set by the GUI layer
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum MouseState {
    #[default]
    Normal,
    Focus,
    Drag,
    Click,
}

/// Button index of the pointer button (0 = left)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PointerButton {
    Left = 0,
    Right = 1,
    Middle = 2,
    X1 = 3,
    X2 = 4,
}

impl PointerButton {
    pub fn from_platform(button: u8) -> Option<Self> {
        match button {
            BUTTON_LEFT => Some(Self::Left),
            BUTTON_RIGHT => Some(Self::Right),
            BUTTON_MIDDLE => Some(Self::Middle),
            BUTTON_X1 => Some(Self::X1),
            BUTTON_X2 => Some(Self::X2),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ButtonPhase {
    Released,
    InClick,
    InDoubleClick,
    InDoubleIgnore,
    InDrag,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ButtonAction {
    None,
    ShortClick,
    LongClick,
    DoubleClick,
    DragStart,
    Drag,
    DragEnd,
}

/// Click/drag state machine for one button
#[derive(Debug, Clone, Copy)]
struct ButtonState {
    phase: ButtonPhase,
    time_ms: u64,
    x: f32,
    y: f32,
}

impl Default for ButtonState {
    fn default() -> Self {
        Self {
            phase: ButtonPhase::Released,
            time_ms: 0,
            x: 0.0,
            y: 0.0,
        }
    }
}

impl ButtonState {
    fn in_click_range(&self, x: f32, y: f32) -> bool {
        (x - self.x).abs() <= DRAG_THRESHOLD_PX && (y - self.y).abs() <= DRAG_THRESHOLD_PX
    }

    fn update(&mut self, time_ms: u64, x: f32, y: f32, down: bool, timing: &ClickTiming) -> ButtonAction {
        match self.phase {
            ButtonPhase::InDrag => {
                if down {
                    return ButtonAction::Drag;
                }
                self.phase = ButtonPhase::Released;
                ButtonAction::DragEnd
            }
            ButtonPhase::Released => {
                if down {
                    self.phase = ButtonPhase::InClick;
                    self.time_ms = time_ms;
                    self.x = x;
                    self.y = y;
                }
                ButtonAction::None
            }
            ButtonPhase::InClick => {
                if down {
                    if !self.in_click_range(x, y) {
                        self.phase = ButtonPhase::InDrag;
                        return ButtonAction::DragStart;
                    }
                    ButtonAction::None
                } else if time_ms.saturating_sub(self.time_ms) < timing.long_click_ms {
                    self.phase = ButtonPhase::InDoubleClick;
                    self.time_ms = time_ms;
                    ButtonAction::ShortClick
                } else {
                    self.phase = ButtonPhase::Released;
                    ButtonAction::LongClick
                }
            }
            ButtonPhase::InDoubleClick => {
                if time_ms.saturating_sub(self.time_ms) > timing.double_click_ms
                    || !self.in_click_range(x, y)
                {
                    self.phase = ButtonPhase::Released;
                    return self.update(time_ms, x, y, down, timing);
                }
                if down {
                    self.phase = ButtonPhase::InDoubleIgnore;
                }
                ButtonAction::None
            }
            ButtonPhase::InDoubleIgnore => {
                if !down {
                    self.phase = ButtonPhase::Released;
                    return ButtonAction::DoubleClick;
                }
                ButtonAction::None
            }
        }
    }
}

#[derive(Debug, Clone, Copy)]
struct ClickTiming {
    double_click_ms: u64,
    long_click_ms: u64,
}

/// Mouse state between events
#[derive(Debug)]
pub struct MouseStat {
    enabled: bool,
    active: bool,
    state: MouseState,
    max_x: u32,
    max_y: u32,
    speed_x: f32,
    speed_y: f32,
    x: f32,
    y: f32,
    dx: f32,
    dy: f32,
    down: [bool; MOUSE_BUTTONS],
    down_since_ms: [u64; MOUSE_BUTTONS],
    hold_ms: [u32; MOUSE_BUTTONS],
    buttons: [ButtonState; MOUSE_BUTTONS],
    timing: ClickTiming,
    key: u32,
}

impl Default for MouseStat {
    fn default() -> Self {
        Self::new(DOUBLE_CLICK_THRESHOLD_MS, LONG_CLICK_THRESHOLD_MS)
    }
}

impl MouseStat {
    pub fn new(double_click_ms: u64, long_click_ms: u64) -> Self {
        Self {
            enabled: true,
            active: false,
            state: MouseState::Normal,
            max_x: DEFAULT_MOUSE_MAX_X,
            max_y: DEFAULT_MOUSE_MAX_Y,
            speed_x: 1.0,
            speed_y: 1.0,
            x: 0.0,
            y: 0.0,
            dx: 0.0,
            dy: 0.0,
            down: [false; MOUSE_BUTTONS],
            down_since_ms: [0; MOUSE_BUTTONS],
            hold_ms: [0; MOUSE_BUTTONS],
            buttons: [ButtonState::default(); MOUSE_BUTTONS],
            timing: ClickTiming {
                double_click_ms,
                long_click_ms,
            },
            key: KEY_MOUSE_NOOP,
        }
    }

    /// Feed a pointer event; returns false for non-pointer events
    pub fn handle_event(&mut self, event: &PlatformEvent) -> bool {
        self.key = KEY_MOUSE_NOOP;
        let mut wheel = 0i32;
        let time_ms = match *event {
            PlatformEvent::MouseMotion(MotionEvent { x, y, time_ms }) => {
                self.move_to(x as f32, y as f32);
                time_ms
            }
            PlatformEvent::MouseButtonDown(MouseButtonEvent { button, x, y, time_ms }) => {
                self.move_to(x as f32, y as f32);
                match button {
                    BUTTON_WHEEL_UP => wheel = 1,
                    BUTTON_WHEEL_DOWN => wheel = -1,
                    _ => {
                        if let Some(b) = PointerButton::from_platform(button) {
                            let i = b as usize;
                            if !self.down[i] {
                                self.down_since_ms[i] = time_ms;
                            }
                            self.down[i] = true;
                        }
                    }
                }
                time_ms
            }
            PlatformEvent::MouseButtonUp(MouseButtonEvent { button, x, y, time_ms }) => {
                self.move_to(x as f32, y as f32);
                if let Some(b) = PointerButton::from_platform(button) {
                    self.down[b as usize] = false;
                }
                time_ms
            }
            _ => return false,
        };

        for i in 0..MOUSE_BUTTONS {
            self.hold_ms[i] = if self.down[i] {
                u32::try_from(time_ms.saturating_sub(self.down_since_ms[i])).unwrap_or(u32::MAX)
            } else {
                0
            };
            let action = self.buttons[i].update(time_ms, self.x, self.y, self.down[i], &self.timing);
            if let Some(key) = Self::button_key(i, action) {
                self.key = key;
            }
        }

        if self.key == KEY_MOUSE_NOOP {
            if wheel > 0 {
                self.key = KEY_MOUSE_WHEEL_UP;
            } else if wheel < 0 {
                self.key = KEY_MOUSE_WHEEL_DOWN;
            } else if self.dx != 0.0 || self.dy != 0.0 {
                self.key = KEY_MOUSE_MOVE;
            }
        }

        if self.enabled && self.key != KEY_MOUSE_NOOP {
            self.active = true;
        }
        debug!("mouse: key {:#06x} at ({}, {})", self.key, self.x, self.y);
        true
    }

    fn button_key(index: usize, action: ButtonAction) -> Option<u32> {
        let i = index as u32;
        let right = index == PointerButton::Right as usize;
        match action {
            ButtonAction::None => None,
            ButtonAction::ShortClick => Some(KEY_MOUSE_CLICK + i),
            ButtonAction::LongClick => Some(KEY_MOUSE_LONG_CLICK + i),
            ButtonAction::DoubleClick => Some(KEY_MOUSE_DOUBLE_CLICK + i),
            ButtonAction::DragStart if right => Some(KEY_MOUSE_RDRAG_START),
            ButtonAction::DragStart => Some(KEY_MOUSE_DRAG_START),
            ButtonAction::Drag if right => Some(KEY_MOUSE_RDRAG),
            ButtonAction::Drag => Some(KEY_MOUSE_DRAG),
            ButtonAction::DragEnd if right => Some(KEY_MOUSE_RDRAG_END),
            ButtonAction::DragEnd => Some(KEY_MOUSE_DRAG_END),
        }
    }

    fn move_to(&mut self, x: f32, y: f32) {
        let x = x.clamp(0.0, self.max_x.saturating_sub(1) as f32);
        let y = y.clamp(0.0, self.max_y.saturating_sub(1) as f32);
        self.dx = x - self.x;
        self.dy = y - self.y;
        self.x = x;
        self.y = y;
    }

    /// Relative movement from a pointer device, scaled by speed
    pub fn move_relative(&mut self, dx: f32, dy: f32) {
        self.move_to(self.x + dx * self.speed_x, self.y + dy * self.speed_y);
        if self.enabled && (self.dx != 0.0 || self.dy != 0.0) {
            self.active = true;
        }
    }

    /// Pseudo-key produced by the last event
    pub fn key(&self) -> u32 {
        self.key
    }

    /// How long a button has been held (0 when up)
    pub fn hold(&self, button: PointerButton) -> u32 {
        self.hold_ms[button as usize]
    }

    pub fn position(&self) -> Point {
        Point::new(self.x, self.y)
    }

    pub fn set_position(&mut self, position: Point) {
        self.move_to(position.x, position.y);
        self.dx = 0.0;
        self.dy = 0.0;
    }

    pub fn delta(&self) -> Point {
        Point::new(self.dx, self.dy)
    }

    pub fn set_resolution(&mut self, max_x: u32, max_y: u32, speed_x: f32, speed_y: f32) {
        self.max_x = max_x.max(1);
        self.max_y = max_y.max(1);
        self.speed_x = speed_x;
        self.speed_y = speed_y;
        // Re-clamp the current position
        self.set_position(Point::new(self.x, self.y));
    }

    pub fn resolution(&self) -> (u32, u32) {
        (self.max_x, self.max_y)
    }

    pub fn set_active(&mut self, active: bool) {
        self.active = active;
    }

    /// Active only while enabled and recently used
    pub fn is_active(&self) -> bool {
        self.active && self.enabled
    }

    pub fn set_enabled(&mut self, enabled: bool) {
        self.enabled = enabled;
        if !enabled {
            self.active = false;
        }
    }

    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    pub fn state(&self) -> MouseState {
        self.state
    }

    pub fn set_state(&mut self, state: MouseState) {
        self.state = state;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn press(button: u8, x: u16, y: u16, t: u64) -> PlatformEvent {
        PlatformEvent::MouseButtonDown(MouseButtonEvent { button, x, y, time_ms: t })
    }

    fn release(button: u8, x: u16, y: u16, t: u64) -> PlatformEvent {
        PlatformEvent::MouseButtonUp(MouseButtonEvent { button, x, y, time_ms: t })
    }

    fn motion(x: u16, y: u16, t: u64) -> PlatformEvent {
        PlatformEvent::MouseMotion(MotionEvent { x, y, time_ms: t })
    }

    #[test]
    fn test_click_and_double_click() {
        let mut mouse = MouseStat::default();
        mouse.handle_event(&motion(10, 10, 0));
        assert_eq!(mouse.key(), KEY_MOUSE_MOVE);
        mouse.handle_event(&press(BUTTON_LEFT, 10, 10, 0));
        assert_eq!(mouse.key(), KEY_MOUSE_NOOP);
        mouse.handle_event(&release(BUTTON_LEFT, 10, 10, 50));
        assert_eq!(mouse.key(), KEY_MOUSE_CLICK);
        mouse.handle_event(&press(BUTTON_LEFT, 10, 10, 120));
        mouse.handle_event(&release(BUTTON_LEFT, 10, 10, 160));
        assert_eq!(mouse.key(), KEY_MOUSE_DOUBLE_CLICK);
        assert!(mouse.is_active());
    }

    #[test]
    fn test_slow_second_click_is_single() {
        let mut mouse = MouseStat::default();
        mouse.handle_event(&press(BUTTON_RIGHT, 10, 10, 0));
        mouse.handle_event(&release(BUTTON_RIGHT, 10, 10, 50));
        assert_eq!(mouse.key(), KEY_MOUSE_CLICK + 1);
        mouse.handle_event(&press(BUTTON_RIGHT, 10, 10, 1000));
        mouse.handle_event(&release(BUTTON_RIGHT, 10, 10, 1050));
        assert_eq!(mouse.key(), KEY_MOUSE_CLICK + 1);
    }

    #[test]
    fn test_long_click() {
        let mut mouse = MouseStat::default();
        mouse.handle_event(&press(BUTTON_LEFT, 5, 5, 0));
        mouse.handle_event(&motion(5, 5, 700));
        assert_eq!(mouse.hold(PointerButton::Left), 700);
        mouse.handle_event(&release(BUTTON_LEFT, 5, 5, 1500));
        assert_eq!(mouse.key(), KEY_MOUSE_LONG_CLICK);
    }

    #[test]
    fn test_drag_sequence() {
        let mut mouse = MouseStat::default();
        mouse.handle_event(&press(BUTTON_LEFT, 100, 100, 0));
        mouse.handle_event(&motion(120, 100, 10));
        assert_eq!(mouse.key(), KEY_MOUSE_DRAG_START);
        mouse.handle_event(&motion(140, 100, 20));
        assert_eq!(mouse.key(), KEY_MOUSE_DRAG);
        assert_eq!(mouse.delta(), Point::new(20.0, 0.0));
        mouse.handle_event(&release(BUTTON_LEFT, 140, 100, 30));
        assert_eq!(mouse.key(), KEY_MOUSE_DRAG_END);
    }

    #[test]
    fn test_wheel_and_move() {
        let mut mouse = MouseStat::default();
        mouse.handle_event(&press(BUTTON_WHEEL_UP, 0, 0, 0));
        assert_eq!(mouse.key(), KEY_MOUSE_WHEEL_UP);
        mouse.handle_event(&motion(3, 4, 10));
        assert_eq!(mouse.key(), KEY_MOUSE_MOVE);
        mouse.handle_event(&motion(3, 4, 20));
        assert_eq!(mouse.key(), KEY_MOUSE_NOOP);
    }

    #[test]
    fn test_resolution_clamps() {
        let mut mouse = MouseStat::default();
        mouse.set_resolution(640, 480, 2.0, 2.0);
        mouse.handle_event(&motion(5000, 5000, 0));
        assert_eq!(mouse.position(), Point::new(639.0, 479.0));
        mouse.set_position(Point::new(10.0, 10.0));
        mouse.move_relative(5.0, -2.0);
        assert_eq!(mouse.position(), Point::new(20.0, 6.0));
    }

    #[test]
    fn test_disabled_never_active() {
        let mut mouse = MouseStat::default();
        mouse.set_enabled(false);
        mouse.handle_event(&motion(50, 50, 0));
        assert!(!mouse.is_active());
        assert!(!mouse.handle_event(&PlatformEvent::Touch(crate::input::event::TouchEvent::new(
            401, 1, 0.0, 0.0
        ))));
    }
}
