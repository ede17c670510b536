//! Global constants for mcinput
//!
//! Consolidates timing, pointer, and protocol constants
//! to eliminate magic numbers throughout the codebase.

// ============================================================================
// Timing Constants
// ============================================================================

/// Double-click detection threshold in milliseconds
pub const DOUBLE_CLICK_THRESHOLD_MS: u64 = 300;

/// Mouse button hold time before a click becomes a long click
pub const LONG_CLICK_THRESHOLD_MS: u64 = 1000;

/// Keyboard hold time after which the long-press bit is set
pub const KEY_HOLD_THRESHOLD_MS: u32 = 250;

/// Default frame interval of the polling loop (~60Hz)
pub const FRAME_INTERVAL_MS: u64 = 16;

/// Without key-up events from the TTY, a key counts as released
/// once no repeat arrived for this long (must exceed the repeat delay)
pub const TTY_RELEASE_TIMEOUT_MS: u64 = 450;

/// Hold time added per LIRC repeat line
pub const LIRC_REPEAT_INTERVAL_MS: u32 = 100;

// ============================================================================
// Pointer Constants
// ============================================================================

/// Pointer travel (pixels) before a held button starts a drag
pub const DRAG_THRESHOLD_PX: f32 = 2.0;

/// Default pointer resolution
pub const DEFAULT_MOUSE_MAX_X: u32 = 1920;
pub const DEFAULT_MOUSE_MAX_Y: u32 = 1080;

// ============================================================================
// Event Server Protocol
// ============================================================================

/// Button code flag marking a unicode character from a network client
pub const ES_FLAG_UNICODE: u32 = 0x8000_0000;

/// Default LIRC daemon socket
pub const LIRC_SOCKET_PATH: &str = "/var/run/lirc/lircd";

/// Interval between repeats of a held peripheral button
pub const PERIPHERAL_REPEAT_INTERVAL_MS: u32 = 100;
