//! Configuration types for automation.
//!
//! Loads settings from config.json at startup. Provides executable paths,
//! the UI string table, matching thresholds, and timing parameters.

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::OnceLock;

use crate::automation::input::Point;

/// Global configuration instance, initialized once at startup.
static CONFIG: OnceLock<RemotePlayConfig> = OnceLock::new();

/// Literal UI text the state machine and matcher look for.
///
/// These differ between client versions and locales, so they live in
/// config rather than in code.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(default)]
pub struct UiStrings {
    /// Shown when no PSN account is signed in
    pub not_signed_in: Vec<String>,
    /// Shown next to the connect button once signed in
    pub signed_in: Vec<String>,
    pub searching_for_connections: Vec<String>,
    pub checking_network: Vec<String>,
    pub connecting_console: Vec<String>,
    /// Substring present once the stream is up
    pub connected: Vec<String>,
    /// Title of the first carousel tile
    pub store_tile: String,
    /// Titles of the last carousel tile
    pub library_tiles: Vec<String>,
}

impl Default for UiStrings {
    fn default() -> Self {
        Self {
            not_signed_in: vec!["Sign In to PSN".to_string()],
            signed_in: vec!["Select the last console you connected to".to_string()],
            searching_for_connections: vec!["Searching for connections nearby...".to_string()],
            checking_network: vec![
                "Checking the network...".to_string(),
                "Checking the network..".to_string(),
                "Checking the network.".to_string(),
            ],
            connecting_console: vec!["Connecting and turning on your PS5...".to_string()],
            connected: vec!["connected using Remote".to_string()],
            store_tile: "playstation store".to_string(),
            library_tiles: vec!["game library".to_string(), "library".to_string()],
        }
    }
}

/// File names of the reference images inside the assets directory.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(default)]
pub struct AssetNames {
    /// Recognizer executable
    pub recognizer: String,
    /// "Other connections" link, used as an anchor for the connect button
    pub connect_anchor: String,
    /// PS button in the stream overlay
    pub ps_button: String,
}

impl Default for AssetNames {
    fn default() -> Self {
        Self {
            recognizer: "PSNOCR".to_string(),
            connect_anchor: "other connections.png".to_string(),
            ps_button: "ps button.png".to_string(),
        }
    }
}

/// Delays and budgets, all in milliseconds.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(default)]
pub struct Timing {
    /// Maximum time for the app to become frontmost
    pub open_timeout_ms: u64,
    pub open_poll_ms: u64,
    /// Pause after the app opens or goes full screen
    pub settle_ms: u64,
    /// Pause after clicking the connect button
    pub connect_settle_ms: u64,
    pub connect_poll_ms: u64,
    /// Maximum time to wait for the console connection
    pub connect_timeout_ms: u64,
    /// How long the PS button is held
    pub ps_button_hold_ms: u64,
    /// Pause after delete+escape before reading the tile
    pub library_settle_ms: u64,
    /// Pause after a failed library check
    pub library_backoff_ms: u64,
    /// Pause after each right-arrow press
    pub carousel_step_ms: u64,
    /// Pause between activating the app and sending a key
    pub key_activate_delay_ms: u64,
}

impl Default for Timing {
    fn default() -> Self {
        Self {
            open_timeout_ms: 10_000,
            open_poll_ms: 100,
            settle_ms: 1_000,
            connect_settle_ms: 2_000,
            connect_poll_ms: 100,
            connect_timeout_ms: 180_000,
            ps_button_hold_ms: 3_000,
            library_settle_ms: 500,
            library_backoff_ms: 1_000,
            carousel_step_ms: 200,
            key_activate_delay_ms: 1_000,
        }
    }
}

impl Timing {
    /// All delays zero. Used by tests so polling loops run instantly.
    #[cfg(test)]
    pub fn zero() -> Self {
        Self {
            open_timeout_ms: 0,
            open_poll_ms: 0,
            settle_ms: 0,
            connect_settle_ms: 0,
            connect_poll_ms: 0,
            connect_timeout_ms: 0,
            ps_button_hold_ms: 0,
            library_settle_ms: 0,
            library_backoff_ms: 0,
            carousel_step_ms: 0,
            key_activate_delay_ms: 0,
        }
    }
}

/// Complete automation configuration.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(default)]
pub struct RemotePlayConfig {
    /// Bundle path of the Remote Play client
    pub app_path: PathBuf,
    /// Process / application name used by System Events
    pub app_name: String,
    /// Click helper executable (cliclick-compatible)
    pub clicker_path: PathBuf,
    /// Game-name recognizer. Defaults to the bundled asset.
    pub recognizer_path: Option<PathBuf>,
    /// Tesseract executable. Discovered when unset.
    pub tesseract_path: Option<PathBuf>,
    /// Assets directory. Defaults to `<exe_dir>/assets`.
    pub assets_dir: Option<PathBuf>,
    /// Screenshot pixels per click point (2.0 on Retina displays)
    #[serde(default = "default_display_scale")]
    pub display_scale: f32,
    /// Mean absolute pixel difference accepted by template matching (0-255)
    #[serde(default = "default_locate_tolerance")]
    pub locate_tolerance: f32,
    /// Similarity ratio a title must exceed to count as a match
    #[serde(default = "default_match_threshold")]
    pub match_threshold: f64,
    pub library_attempts: u32,
    pub search_attempts: u32,
    /// Offset from the connect anchor to the connect button
    pub connect_offset: Point,
    pub assets: AssetNames,
    pub strings: UiStrings,
    pub timing: Timing,
}

fn default_display_scale() -> f32 {
    1.0
}

fn default_locate_tolerance() -> f32 {
    12.0
}

fn default_match_threshold() -> f64 {
    0.8
}

impl Default for RemotePlayConfig {
    fn default() -> Self {
        Self {
            app_path: PathBuf::from("/Applications/RemotePlay.app"),
            app_name: "RemotePlay".to_string(),
            clicker_path: PathBuf::from("/opt/homebrew/bin/cliclick"),
            recognizer_path: None,
            tesseract_path: None,
            assets_dir: None,
            display_scale: default_display_scale(),
            locate_tolerance: default_locate_tolerance(),
            match_threshold: default_match_threshold(),
            library_attempts: 10,
            search_attempts: 100,
            connect_offset: Point { x: 20, y: -50 },
            assets: AssetNames::default(),
            strings: UiStrings::default(),
            timing: Timing::default(),
        }
    }
}

impl RemotePlayConfig {
    /// Assets directory, falling back to the one next to the executable.
    pub fn assets_dir(&self) -> PathBuf {
        self.assets_dir
            .clone()
            .unwrap_or_else(crate::paths::get_assets_dir)
    }
}

/// Picks the config file: explicit path, then next to the executable,
/// then the per-user config directory.
fn find_config_path(explicit: Option<&Path>) -> Option<PathBuf> {
    if let Some(path) = explicit {
        return Some(path.to_path_buf());
    }

    let beside_exe = crate::paths::get_exe_dir().join("config.json");
    if beside_exe.exists() {
        return Some(beside_exe);
    }

    crate::paths::get_user_config_path().filter(|p| p.exists())
}

/// Loads configuration from a JSON file or returns defaults.
pub fn load_config(explicit: Option<&Path>) -> RemotePlayConfig {
    let Some(config_path) = find_config_path(explicit) else {
        crate::log("config.json not found. Using default config.");
        return RemotePlayConfig::default();
    };

    crate::log(&format!("Looking for config at: {}", config_path.display()));

    match fs::read_to_string(&config_path) {
        Ok(contents) => match parse_config(&contents) {
            Ok(config) => {
                crate::log("Config loaded");
                return config;
            }
            Err(e) => {
                crate::log(&format!(
                    "Failed to parse {}: {}. Using defaults.",
                    config_path.display(),
                    e
                ));
            }
        },
        Err(e) => {
            crate::log(&format!(
                "Failed to read {}: {}. Using defaults.",
                config_path.display(),
                e
            ));
        }
    }

    RemotePlayConfig::default()
}

pub fn parse_config(contents: &str) -> serde_json::Result<RemotePlayConfig> {
    serde_json::from_str(contents)
}

/// Initializes the global configuration. Call once at startup.
pub fn init_config(explicit: Option<&Path>) {
    let _ = CONFIG.set(load_config(explicit));
}

/// Returns a reference to the global configuration, or defaults if
/// `init_config` was never called.
pub fn get_config() -> &'static RemotePlayConfig {
    CONFIG.get_or_init(RemotePlayConfig::default)
}
