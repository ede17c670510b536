//! Remote control
//!
//! A polled remote device (LIRC or anything implementing
//! `RemoteDevice`) wrapped with the enable/initialize lifecycle
//! and an outgoing command queue. Buttons reported by name are
//! resolved through the IR translator.

use std::collections::VecDeque;

use log::{debug, info, warn};

use super::error::InputError;
use super::translator::IrTranslator;

/// Input reported by a remote device
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RemoteInput {
    /// Already a remote button code
    Code { code: u32, hold_time_ms: u32 },
    /// Button named by the daemon, resolved through the IR translator
    Named {
        remote: String,
        button: String,
        hold_time_ms: u32,
    },
}

/// Resolved button waiting to be consumed by the input manager
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RemoteButton {
    pub code: u32,
    pub hold_time_ms: u32,
}

/// Connection to a remote control source
pub trait RemoteDevice: Send {
    fn connect(&mut self, device_name: &str) -> Result<(), InputError>;

    fn disconnect(&mut self);

    /// Next input without blocking
    fn poll(&mut self) -> Option<RemoteInput>;

    fn send(&mut self, command: &str) -> Result<(), InputError>;
}

/// Remote lifecycle around a device
pub struct RemoteControl {
    device: Box<dyn RemoteDevice>,
    device_name: String,
    enabled: bool,
    initialized: bool,
    pending: Option<RemoteButton>,
    send_queue: VecDeque<String>,
}

impl RemoteControl {
    pub fn new(device: Box<dyn RemoteDevice>) -> Self {
        Self {
            device,
            device_name: String::new(),
            enabled: true,
            initialized: false,
            pending: None,
            send_queue: VecDeque::new(),
        }
    }

    /// Connect if enabled and not yet connected
    pub fn initialize(&mut self) {
        if !self.enabled || self.initialized {
            return;
        }
        match self.device.connect(&self.device_name) {
            Ok(()) => {
                self.initialized = true;
                info!("Remote control connected: {}", self.display_name());
            }
            Err(e) => warn!("Remote control {}: {}", self.display_name(), e),
        }
    }

    pub fn disconnect(&mut self) {
        if self.initialized {
            self.device.disconnect();
            self.initialized = false;
            info!("Remote control disconnected: {}", self.display_name());
        }
        self.pending = None;
        self.send_queue.clear();
    }

    pub fn set_enabled(&mut self, enabled: bool) {
        self.enabled = enabled;
    }

    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    pub fn is_initialized(&self) -> bool {
        self.initialized
    }

    pub fn is_in_use(&self) -> bool {
        self.enabled && self.initialized
    }

    pub fn set_device_name(&mut self, name: &str) {
        self.device_name = name.to_string();
    }

    pub fn device_name(&self) -> &str {
        &self.device_name
    }

    fn display_name(&self) -> &str {
        if self.device_name.is_empty() {
            "default"
        } else {
            &self.device_name
        }
    }

    /// Flush queued commands and fetch the next button
    pub fn update(&mut self, ir: &IrTranslator) {
        if !self.is_in_use() {
            return;
        }
        while let Some(command) = self.send_queue.pop_front() {
            if let Err(e) = self.device.send(&command) {
                warn!("Remote send '{}' failed: {}", command, e);
            }
        }
        if self.pending.is_some() {
            return;
        }
        while let Some(input) = self.device.poll() {
            match input {
                RemoteInput::Code { code, hold_time_ms } => {
                    self.pending = Some(RemoteButton { code, hold_time_ms });
                    return;
                }
                RemoteInput::Named {
                    remote,
                    button,
                    hold_time_ms,
                } => match ir.translate(&remote, &button) {
                    Some(code) => {
                        self.pending = Some(RemoteButton { code, hold_time_ms });
                        return;
                    }
                    None => debug!("Unmapped remote button {} on {}", button, remote),
                },
            }
        }
    }

    /// Button pending since the last update
    pub fn button(&self) -> Option<RemoteButton> {
        self.pending
    }

    pub fn reset(&mut self) {
        self.pending = None;
    }

    pub fn add_send_command(&mut self, command: String) {
        self.send_queue.push_back(command);
    }
}

#[cfg(unix)]
pub use lirc::LircDevice;

#[cfg(unix)]
mod lirc {
    use std::io::{ErrorKind, Read, Write};
    use std::os::unix::net::UnixStream;
    use std::path::PathBuf;

    use log::debug;

    use super::{RemoteDevice, RemoteInput};
    use crate::constants::LIRC_REPEAT_INTERVAL_MS;
    use crate::input::error::InputError;

    /// LIRC daemon socket client
    ///
    /// The daemon writes one line per button event:
    /// `<code> <repeat count (hex)> <button> <remote>`.
    pub struct LircDevice {
        socket_path: PathBuf,
        stream: Option<UnixStream>,
        buffer: String,
    }

    impl LircDevice {
        pub fn new(socket_path: impl Into<PathBuf>) -> Self {
            Self {
                socket_path: socket_path.into(),
                stream: None,
                buffer: String::new(),
            }
        }

        /// Parse one daemon line
        pub fn parse_line(line: &str) -> Option<RemoteInput> {
            let mut fields = line.split_whitespace();
            let _code = fields.next()?;
            let repeat = u32::from_str_radix(fields.next()?, 16).ok()?;
            let button = fields.next()?;
            let remote = fields.next()?;
            Some(RemoteInput::Named {
                remote: remote.to_string(),
                button: button.to_string(),
                hold_time_ms: repeat.saturating_mul(LIRC_REPEAT_INTERVAL_MS),
            })
        }

        fn fill_buffer(&mut self) {
            let Some(stream) = self.stream.as_mut() else {
                return;
            };
            let mut chunk = [0u8; 256];
            loop {
                match stream.read(&mut chunk) {
                    Ok(0) => {
                        debug!("LIRC daemon closed the connection");
                        self.stream = None;
                        return;
                    }
                    Ok(n) => self.buffer.push_str(&String::from_utf8_lossy(&chunk[..n])),
                    Err(e) if e.kind() == ErrorKind::WouldBlock => return,
                    Err(e) if e.kind() == ErrorKind::Interrupted => continue,
                    Err(e) => {
                        debug!("LIRC read error: {}", e);
                        self.stream = None;
                        return;
                    }
                }
            }
        }
    }

    impl RemoteDevice for LircDevice {
        fn connect(&mut self, device_name: &str) -> Result<(), InputError> {
            if !device_name.is_empty() {
                self.socket_path = PathBuf::from(device_name);
            }
            let stream = UnixStream::connect(&self.socket_path)
                .map_err(|e| InputError::RemoteDevice(format!("{}: {}", self.socket_path.display(), e)))?;
            stream
                .set_nonblocking(true)
                .map_err(|e| InputError::RemoteDevice(e.to_string()))?;
            self.stream = Some(stream);
            self.buffer.clear();
            Ok(())
        }

        fn disconnect(&mut self) {
            self.stream = None;
            self.buffer.clear();
        }

        fn poll(&mut self) -> Option<RemoteInput> {
            self.fill_buffer();
            while let Some(pos) = self.buffer.find('\n') {
                let line: String = self.buffer.drain(..=pos).collect();
                // Replies to our own commands are framed by BEGIN/END
                if let Some(input) = Self::parse_line(&line) {
                    return Some(input);
                }
            }
            None
        }

        fn send(&mut self, command: &str) -> Result<(), InputError> {
            let stream = self.stream.as_mut().ok_or(InputError::RemoteUnavailable)?;
            stream
                .write_all(format!("{}\n", command).as_bytes())
                .map_err(|e| InputError::RemoteDevice(e.to_string()))
        }
    }
}
