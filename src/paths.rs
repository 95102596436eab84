use std::path::{Path, PathBuf};
use std::sync::OnceLock;

use crate::error::{RemotePlayError, Result};

static EXE_DIR: OnceLock<PathBuf> = OnceLock::new();

/// Returns the directory containing the executable.
pub fn get_exe_dir() -> &'static PathBuf {
    EXE_DIR.get_or_init(|| {
        std::env::current_exe()
            .ok()
            .and_then(|p| p.parent().map(|p| p.to_path_buf()))
            .unwrap_or_else(|| PathBuf::from("."))
    })
}

/// Returns the logs directory: `<exe_dir>/logs/`
pub fn get_logs_dir() -> PathBuf {
    get_exe_dir().join("logs")
}

/// Returns the bundled assets directory: `<exe_dir>/assets/`
pub fn get_assets_dir() -> PathBuf {
    get_exe_dir().join("assets")
}

/// Returns the per-user config file: `<config_dir>/remoteplay-driver/config.json`
pub fn get_user_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|d| d.join("remoteplay-driver").join("config.json"))
}

/// Resolves a named asset inside `assets_dir`.
///
/// Fails with `AssetMissing` if the file does not exist. Finder metadata
/// files are never valid assets.
pub fn asset(assets_dir: &Path, name: &str) -> Result<PathBuf> {
    let path = assets_dir.join(name);
    if name == ".DS_Store" || name.ends_with("/.DS_Store") || !path.is_file() {
        return Err(RemotePlayError::AssetMissing(path));
    }
    Ok(path)
}

/// Ensures all output directories exist. Call at startup.
pub fn ensure_directories() -> std::io::Result<()> {
    std::fs::create_dir_all(get_logs_dir())?;
    Ok(())
}
