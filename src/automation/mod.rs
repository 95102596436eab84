//! UI automation for the Remote Play client.
//!
//! This module provides:
//! - Input simulation (click helper and System Events key codes)
//! - Appearance control and the dark-mode guard
//! - App lifecycle (open / close / process lookup)
//! - The connection state machine and the carousel search

pub mod app;
pub mod appearance;
pub mod config;
mod connect;
pub mod input;
mod launcher;
pub mod matcher;
pub mod osascript;
pub mod runner;
pub mod state;

#[cfg(test)]
pub mod mock;

pub use config::{get_config, init_config, RemotePlayConfig};
pub use runner::{RemotePlay, Reporter};

use std::time::Duration;

/// Sleeps for `duration`; zero returns immediately.
pub fn pause(duration: Duration) {
    if !duration.is_zero() {
        std::thread::sleep(duration);
    }
}
