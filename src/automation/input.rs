//! Mouse and keyboard input for UI automation.
//!
//! Clicks go through an external click helper (cliclick-compatible command
//! strings). Key presses go through System Events, after the target app is
//! activated, because the stream window only accepts keys while focused.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::process::Command;
use std::time::Duration;

use crate::automation::osascript::OsaScript;
use crate::automation::pause;
use crate::error::{RemotePlayError, Result};

/// A point in screen points (not screenshot pixels).
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Point {
    pub x: i32,
    pub y: i32,
}

impl Point {
    pub fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    pub fn offset(self, by: Point) -> Self {
        Self {
            x: self.x + by.x,
            y: self.y + by.y,
        }
    }
}

/// Keys the automation sends to the stream window.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Key {
    RightArrow,
    #[allow(dead_code)]
    LeftArrow,
    Escape,
    Enter,
    Delete,
}

impl Key {
    /// macOS virtual key code.
    pub fn code(self) -> u16 {
        match self {
            Key::RightArrow => 124,
            Key::LeftArrow => 123,
            Key::Escape => 53,
            Key::Enter => 36,
            Key::Delete => 51,
        }
    }
}

impl std::fmt::Display for Key {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Key::RightArrow => write!(f, "Right arrow"),
            Key::LeftArrow => write!(f, "Left arrow"),
            Key::Escape => write!(f, "Escape"),
            Key::Enter => write!(f, "Enter"),
            Key::Delete => write!(f, "Delete"),
        }
    }
}

/// Input operations used by the automation flows.
pub trait InputDriver {
    fn click(&self, at: Point) -> Result<()>;

    /// Presses at `at`, holds for `hold`, then releases.
    fn press_down_click(&self, at: Point, hold: Duration) -> Result<()>;

    fn press_key(&self, key: Key) -> Result<()>;
}

/// Command string for a single click.
pub fn click_command(at: Point) -> String {
    format!("c:{},{}", at.x, at.y)
}

/// Command string for pressing the button down.
pub fn mouse_down_command(at: Point) -> String {
    format!("dd:{},{}", at.x, at.y)
}

/// Command string for releasing the button.
pub fn mouse_up_command(at: Point) -> String {
    format!("du:{},{}", at.x, at.y)
}

/// Runs the click helper executable.
#[derive(Clone, Debug)]
pub struct Clicker {
    executable: PathBuf,
}

impl Clicker {
    pub fn new(executable: impl Into<PathBuf>) -> Self {
        Self {
            executable: executable.into(),
        }
    }

    fn run(&self, command: &str) -> Result<()> {
        if !self.executable.is_file() {
            return Err(RemotePlayError::MissingExecutable(self.executable.clone()));
        }

        let output = Command::new(&self.executable).arg(command).output()?;
        if !output.status.success() {
            return Err(RemotePlayError::command(
                &self.executable.display().to_string(),
                &output,
            ));
        }
        Ok(())
    }

    pub fn click(&self, at: Point) -> Result<()> {
        crate::log(&format!("Click at ({}, {})", at.x, at.y));
        self.run(&click_command(at))
    }

    pub fn press_down_click(&self, at: Point, hold: Duration) -> Result<()> {
        crate::log(&format!(
            "Press at ({}, {}) for {}ms",
            at.x,
            at.y,
            hold.as_millis()
        ));
        self.run(&mouse_down_command(at))?;
        pause(hold);
        self.run(&mouse_up_command(at))
    }
}

/// Real desktop input: click helper for the mouse, System Events for keys.
pub struct DesktopInput {
    clicker: Clicker,
    osa: OsaScript,
    app_name: String,
    activate_delay: Duration,
}

impl DesktopInput {
    pub fn new(clicker: Clicker, app_name: &str, activate_delay: Duration) -> Self {
        Self {
            clicker,
            osa: OsaScript,
            app_name: app_name.to_string(),
            activate_delay,
        }
    }
}

impl InputDriver for DesktopInput {
    fn click(&self, at: Point) -> Result<()> {
        self.clicker.click(at)
    }

    fn press_down_click(&self, at: Point, hold: Duration) -> Result<()> {
        self.clicker.press_down_click(at, hold)
    }

    fn press_key(&self, key: Key) -> Result<()> {
        crate::log(&format!("Key: {}", key));
        self.osa
            .press_key_code(&self.app_name, key.code(), self.activate_delay)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_command_strings() {
        let at = Point::new(512, 300);
        assert_eq!(click_command(at), "c:512,300");
        assert_eq!(mouse_down_command(at), "dd:512,300");
        assert_eq!(mouse_up_command(at), "du:512,300");
    }

    #[test]
    fn test_negative_coordinates() {
        assert_eq!(click_command(Point::new(-5, 10)), "c:-5,10");
    }

    #[test]
    fn test_point_offset() {
        let anchor = Point::new(400, 600);
        assert_eq!(anchor.offset(Point::new(20, -50)), Point::new(420, 550));
    }

    #[test]
    fn test_key_codes() {
        assert_eq!(Key::RightArrow.code(), 124);
        assert_eq!(Key::LeftArrow.code(), 123);
        assert_eq!(Key::Escape.code(), 53);
        assert_eq!(Key::Enter.code(), 36);
        assert_eq!(Key::Delete.code(), 51);
    }

    #[test]
    fn test_missing_clicker_is_error() {
        let clicker = Clicker::new("/nonexistent/cliclick");
        let err = clicker.click(Point::new(1, 1)).unwrap_err();
        assert!(matches!(err, RemotePlayError::MissingExecutable(_)));
    }
}
