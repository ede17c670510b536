//! mcinput - input dispatch and action resolution for a media center
//!
//! Raw input from keyboards, mice, touch screens, remotes, network
//! clients and peripherals is resolved against layered keymaps into
//! actions and handed to the application.

pub mod config;
pub mod constants;
pub mod input;
pub mod services;
pub mod settings;
