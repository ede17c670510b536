//! Input error types

use std::path::PathBuf;

use thiserror::Error;

/// Errors raised while loading keymaps
#[derive(Debug, Error)]
pub enum KeymapError {
    #[error("failed to read keymap {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to parse keymap {name}: {source}")]
    Parse {
        name: String,
        #[source]
        source: toml::de::Error,
    },
    #[error("no keymap found for device '{0}'")]
    DeviceNotFound(String),
    #[error("invalid device keymap name '{0}'")]
    InvalidDeviceName(String),
}

/// Errors surfaced by the input manager's command interface
#[derive(Debug, Error)]
pub enum InputError {
    #[error("unknown built-in command '{0}'")]
    UnknownBuiltin(String),
    #[error("remote control is not available")]
    RemoteUnavailable,
    #[error("remote control device error: {0}")]
    RemoteDevice(String),
    #[error(transparent)]
    Keymap(#[from] KeymapError),
}
