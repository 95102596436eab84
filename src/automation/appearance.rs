//! System appearance control and the dark-mode guard.
//!
//! OCR of the Remote Play client is tuned for its dark theme, so connection
//! runs switch the system to dark mode and put it back afterwards.

use crate::automation::osascript::OsaScript;
use crate::error::Result;

pub trait Appearance {
    fn is_dark_mode(&self) -> Result<bool>;
    fn set_dark_mode(&self, dark: bool) -> Result<()>;
}

impl Appearance for OsaScript {
    fn is_dark_mode(&self) -> Result<bool> {
        OsaScript::is_dark_mode(self)
    }

    fn set_dark_mode(&self, dark: bool) -> Result<()> {
        OsaScript::set_dark_mode(self, dark)
    }
}

/// Forces dark mode while alive and restores the recorded mode on drop.
pub struct DarkModeGuard<'a> {
    appearance: &'a dyn Appearance,
    was_dark: bool,
}

impl<'a> DarkModeGuard<'a> {
    pub fn engage(appearance: &'a dyn Appearance) -> Result<Self> {
        let was_dark = appearance.is_dark_mode()?;
        if !was_dark {
            appearance.set_dark_mode(true)?;
        }
        Ok(Self {
            appearance,
            was_dark,
        })
    }
}

impl Drop for DarkModeGuard<'_> {
    fn drop(&mut self) {
        if let Err(e) = self.appearance.set_dark_mode(self.was_dark) {
            crate::log(&format!("Failed to restore appearance: {}", e));
        }
    }
}

/// Runs `op` with the system in dark mode.
pub fn with_dark_mode<T>(
    appearance: &dyn Appearance,
    op: impl FnOnce() -> Result<T>,
) -> Result<T> {
    let _guard = DarkModeGuard::engage(appearance)?;
    op()
}
