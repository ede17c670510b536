//! Console keyboard input
//!
//! Set console TTY stdin to raw mode and read keystrokes
//! non-blocking, then decode bytes and escape sequences into key
//! events. The TTY reports no releases, so a key counts as released
//! when a different key arrives or no repeat came for a while.

use anyhow::{anyhow, Result};
use log::{debug, info};
use nix::fcntl::{fcntl, FcntlArg, OFlag};
use nix::sys::termios::{self, Termios};
use std::os::fd::{AsRawFd, BorrowedFd};

use super::event::{KeyEvent, PlatformEvent};
use super::key::Modifiers;
use super::keycodes::*;
use crate::constants::TTY_RELEASE_TIMEOUT_MS;

/// Raw-mode terminal input
pub struct TtyKeyboard {
    /// stdin file descriptor
    fd: i32,
    /// Original termios settings (for restoration)
    orig_termios: Termios,
}

impl TtyKeyboard {
    /// Initialize keyboard input by setting TTY to raw mode
    pub fn new() -> Result<Self> {
        let fd = std::io::stdin().as_raw_fd();
        let borrowed = unsafe { BorrowedFd::borrow_raw(fd) };

        let orig_termios =
            termios::tcgetattr(borrowed).map_err(|e| anyhow!("tcgetattr failed: {}", e))?;

        let mut raw = orig_termios.clone();
        termios::cfmakeraw(&mut raw);
        termios::tcsetattr(borrowed, termios::SetArg::TCSAFLUSH, &raw)
            .map_err(|e| anyhow!("tcsetattr failed: {}", e))?;

        let flags = fcntl(fd, FcntlArg::F_GETFL).map_err(|e| anyhow!("F_GETFL failed: {}", e))?;
        let mut flags = OFlag::from_bits_truncate(flags);
        flags.insert(OFlag::O_NONBLOCK);
        fcntl(fd, FcntlArg::F_SETFL(flags)).map_err(|e| anyhow!("F_SETFL failed: {}", e))?;

        info!("TTY keyboard initialized (raw mode)");

        Ok(Self { fd, orig_termios })
    }

    /// Read pending bytes; Ok(0) if none are available
    pub fn read(&self, buf: &mut [u8]) -> Result<usize> {
        match nix::unistd::read(self.fd, buf) {
            Ok(n) => Ok(n),
            Err(nix::errno::Errno::EAGAIN) => Ok(0),
            Err(e) => Err(anyhow!("Keyboard read error: {}", e)),
        }
    }
}

impl Drop for TtyKeyboard {
    fn drop(&mut self) {
        let borrowed = unsafe { BorrowedFd::borrow_raw(self.fd) };
        let _ = termios::tcsetattr(borrowed, termios::SetArg::TCSAFLUSH, &self.orig_termios);
        info!("Keyboard settings restored");
    }
}

// ============================================================================
// Byte decoding
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq)]
struct Pressed {
    sym: u32,
    unicode: Option<char>,
    modifiers: Modifiers,
}

/// Decodes TTY bytes into key down/up events
#[derive(Debug)]
pub struct TtyDecoder {
    held: Option<(Pressed, u64)>,
    release_timeout_ms: u64,
}

impl Default for TtyDecoder {
    fn default() -> Self {
        Self::new(TTY_RELEASE_TIMEOUT_MS)
    }
}

/// xterm modifier parameter (1 + bitmask)
fn csi_modifiers(param: u32) -> Modifiers {
    let bits = param.saturating_sub(1);
    let mut mods = Modifiers::empty();
    if bits & 1 != 0 {
        mods |= Modifiers::SHIFT;
    }
    if bits & 2 != 0 {
        mods |= Modifiers::ALT;
    }
    if bits & 4 != 0 {
        mods |= Modifiers::CTRL;
    }
    if bits & 8 != 0 {
        mods |= Modifiers::META;
    }
    mods
}

fn tilde_sym(code: u32) -> Option<u32> {
    match code {
        1 | 7 => Some(SYM_HOME),
        2 => Some(SYM_INSERT),
        3 => Some(SYM_DELETE),
        4 | 8 => Some(SYM_END),
        5 => Some(SYM_PAGEUP),
        6 => Some(SYM_PAGEDOWN),
        11..=15 => Some(SYM_F1 + code - 11),
        17..=21 => Some(SYM_F1 + 5 + code - 17),
        23 | 24 => Some(SYM_F1 + 10 + code - 23),
        _ => None,
    }
}

fn letter_sym(final_byte: u8) -> Option<u32> {
    match final_byte {
        b'A' => Some(SYM_UP),
        b'B' => Some(SYM_DOWN),
        b'C' => Some(SYM_RIGHT),
        b'D' => Some(SYM_LEFT),
        b'H' => Some(SYM_HOME),
        b'F' => Some(SYM_END),
        b'P'..=b'S' => Some(SYM_F1 + (final_byte - b'P') as u32),
        _ => None,
    }
}

fn plain(sym: u32, unicode: Option<char>, modifiers: Modifiers) -> Pressed {
    Pressed {
        sym,
        unicode,
        modifiers,
    }
}

/// Decode one key at the start of `bytes`; returns the key and bytes used
fn decode_one(bytes: &[u8]) -> (Option<Pressed>, usize) {
    let b = bytes[0];
    match b {
        0x1b => decode_escape(bytes),
        b'\r' | b'\n' => (Some(plain(SYM_RETURN, None, Modifiers::empty())), 1),
        b'\t' => (Some(plain(SYM_TAB, None, Modifiers::empty())), 1),
        0x7f | 0x08 => (Some(plain(SYM_BACKSPACE, None, Modifiers::empty())), 1),
        0x00 => (Some(plain(SYM_SPACE, None, Modifiers::CTRL)), 1),
        0x01..=0x1a => (Some(plain(0x60 + b as u32, None, Modifiers::CTRL)), 1),
        b'A'..=b'Z' => (
            Some(plain(b.to_ascii_lowercase() as u32, Some(b as char), Modifiers::SHIFT)),
            1,
        ),
        0x20..=0x7e => (Some(plain(b as u32, Some(b as char), Modifiers::empty())), 1),
        0x80.. => decode_utf8(bytes),
        _ => (None, 1),
    }
}

fn decode_utf8(bytes: &[u8]) -> (Option<Pressed>, usize) {
    let len = match bytes[0] {
        0xC0..=0xDF => 2,
        0xE0..=0xEF => 3,
        0xF0..=0xF7 => 4,
        _ => return (None, 1),
    };
    let Some(seq) = bytes.get(..len) else {
        return (None, bytes.len());
    };
    match std::str::from_utf8(seq).ok().and_then(|s| s.chars().next()) {
        Some(ch) => (Some(plain(0, Some(ch), Modifiers::empty())), len),
        None => (None, len),
    }
}

fn decode_escape(bytes: &[u8]) -> (Option<Pressed>, usize) {
    match bytes.get(1) {
        None | Some(0x1b) => (Some(plain(SYM_ESCAPE, None, Modifiers::empty())), 1),
        Some(b'[') => decode_csi(bytes),
        Some(b'O') => match bytes.get(2).copied().and_then(letter_sym) {
            Some(sym) => (Some(plain(sym, None, Modifiers::empty())), 3),
            None => (Some(plain(SYM_ESCAPE, None, Modifiers::empty())), 1),
        },
        // Alt+key arrives as ESC prefix
        Some(_) => {
            let (key, used) = decode_one(&bytes[1..]);
            let key = key.map(|mut k| {
                k.modifiers |= Modifiers::ALT;
                k
            });
            (key, used + 1)
        }
    }
}

fn decode_csi(bytes: &[u8]) -> (Option<Pressed>, usize) {
    // Linux console function keys: ESC [ [ A..E
    if bytes.get(2) == Some(&b'[') {
        return match bytes.get(3) {
            Some(&c @ b'A'..=b'E') => (
                Some(plain(SYM_F1 + (c - b'A') as u32, None, Modifiers::empty())),
                4,
            ),
            _ => (None, bytes.len().min(4)),
        };
    }

    let mut params = Vec::new();
    let mut current: Option<u32> = None;
    for (i, &c) in bytes.iter().enumerate().skip(2) {
        match c {
            b'0'..=b'9' => {
                current = Some(current.unwrap_or(0) * 10 + (c - b'0') as u32);
            }
            b';' => params.push(current.take().unwrap_or(1)),
            0x40..=0x7e => {
                if let Some(p) = current.take() {
                    params.push(p);
                }
                let mods = params.get(1).map(|&m| csi_modifiers(m)).unwrap_or_default();
                let sym = if c == b'~' {
                    params.first().copied().and_then(tilde_sym)
                } else {
                    letter_sym(c)
                };
                if sym.is_none() {
                    debug!("tty: unhandled escape sequence {:?}", &bytes[..=i]);
                }
                return (sym.map(|s| plain(s, None, mods)), i + 1);
            }
            _ => return (None, i + 1),
        }
    }
    // Incomplete sequence
    (None, bytes.len())
}

impl TtyDecoder {
    pub fn new(release_timeout_ms: u64) -> Self {
        Self {
            held: None,
            release_timeout_ms,
        }
    }

    /// Decode a chunk read at `now_ms`
    pub fn decode(&mut self, bytes: &[u8], now_ms: u64) -> Vec<PlatformEvent> {
        let mut events = Vec::new();
        let mut pos = 0;
        while pos < bytes.len() {
            let (key, used) = decode_one(&bytes[pos..]);
            pos += used.max(1);
            let Some(key) = key else {
                continue;
            };
            match self.held {
                Some((held, _)) if held == key => {}
                Some((held, _)) => events.push(Self::release(held, now_ms)),
                None => {}
            }
            self.held = Some((key, now_ms));
            events.push(PlatformEvent::KeyDown(KeyEvent::new(
                key.sym,
                key.unicode,
                key.modifiers,
                now_ms,
            )));
        }
        events
    }

    /// Release the held key if it stopped repeating
    pub fn poll_release(&mut self, now_ms: u64) -> Option<PlatformEvent> {
        let (held, last) = self.held?;
        if now_ms.saturating_sub(last) < self.release_timeout_ms {
            return None;
        }
        self.held = None;
        Some(Self::release(held, now_ms))
    }

    fn release(key: Pressed, now_ms: u64) -> PlatformEvent {
        PlatformEvent::KeyUp(KeyEvent::new(key.sym, key.unicode, key.modifiers, now_ms))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn downs(events: &[PlatformEvent]) -> Vec<(u32, Modifiers)> {
        events
            .iter()
            .filter_map(|e| match e {
                PlatformEvent::KeyDown(k) => Some((k.sym, k.modifiers)),
                _ => None,
            })
            .collect()
    }

    #[test]
    fn test_escape_sequences() {
        let mut dec = TtyDecoder::default();
        let events = dec.decode(b"\x1b[A\x1b[1;5C\x1b[5~\x1bOP\x1b[[B", 0);
        assert_eq!(
            downs(&events),
            vec![
                (SYM_UP, Modifiers::empty()),
                (SYM_RIGHT, Modifiers::CTRL),
                (SYM_PAGEUP, Modifiers::empty()),
                (SYM_F1, Modifiers::empty()),
                (SYM_F1 + 1, Modifiers::empty()),
            ]
        );
    }

    #[test]
    fn test_plain_bytes() {
        let mut dec = TtyDecoder::default();
        let events = dec.decode(b"aA\r\x16\x1bx\x1b", 0);
        assert_eq!(
            downs(&events),
            vec![
                ('a' as u32, Modifiers::empty()),
                ('a' as u32, Modifiers::SHIFT),
                (SYM_RETURN, Modifiers::empty()),
                ('v' as u32, Modifiers::CTRL),
                ('x' as u32, Modifiers::ALT),
                (SYM_ESCAPE, Modifiers::empty()),
            ]
        );
    }

    #[test]
    fn test_utf8_character() {
        let mut dec = TtyDecoder::default();
        let events = dec.decode("é".as_bytes(), 0);
        match events.as_slice() {
            [PlatformEvent::KeyDown(k)] => {
                assert_eq!(k.sym, 0);
                assert_eq!(k.unicode, Some('é'));
            }
            other => panic!("unexpected events {:?}", other),
        }
    }

    #[test]
    fn test_synthesized_releases() {
        let mut dec = TtyDecoder::new(450);
        let events = dec.decode(b"a", 0);
        assert_eq!(events.len(), 1);
        // repeat of the same key: no release
        assert_eq!(dec.decode(b"a", 30).len(), 1);
        assert!(dec.poll_release(200).is_none());
        // a different key releases the first
        let events = dec.decode(b"b", 300);
        assert!(matches!(events[0], PlatformEvent::KeyUp(k) if k.sym == 'a' as u32));
        assert!(matches!(events[1], PlatformEvent::KeyDown(k) if k.sym == 'b' as u32));
        assert!(matches!(dec.poll_release(800), Some(PlatformEvent::KeyUp(k)) if k.sym == 'b' as u32));
        assert!(dec.poll_release(2000).is_none());
    }
}
