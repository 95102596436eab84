//! AppleScript helpers run through `osascript`.

use std::process::Command;
use std::time::Duration;

use crate::error::{RemotePlayError, Result};

const DARK_MODE_QUERY: &str = r#"
tell application "System Events"
    tell appearance preferences
        return dark mode
    end tell
end tell
"#;

const FULL_SCREEN: &str = r#"
tell application "System Events"
    key code 3 using {command down, control down}
end tell
"#;

const FRONTMOST: &str =
    r#"tell application "System Events" to name of first application process whose frontmost is true"#;

/// Stateless handle for running AppleScript.
#[derive(Clone, Copy, Debug, Default)]
pub struct OsaScript;

impl OsaScript {
    /// Runs a script and returns its stdout.
    pub fn run(&self, script: &str) -> Result<String> {
        let output = Command::new("osascript").arg("-e").arg(script).output()?;
        if !output.status.success() {
            return Err(RemotePlayError::command("osascript", &output));
        }
        Ok(String::from_utf8_lossy(&output.stdout).to_string())
    }

    /// Name of the frontmost application process.
    pub fn frontmost_app(&self) -> Result<String> {
        let output = self.run(FRONTMOST)?;
        Ok(output.lines().next().unwrap_or_default().trim().to_string())
    }

    pub fn is_dark_mode(&self) -> Result<bool> {
        parse_dark_mode(&self.run(DARK_MODE_QUERY)?)
    }

    pub fn set_dark_mode(&self, dark: bool) -> Result<()> {
        self.run(&dark_mode_script(dark)).map(|_| ())
    }

    /// Sends ctrl+cmd+F to the frontmost window.
    pub fn set_full_screen(&self) -> Result<()> {
        self.run(FULL_SCREEN).map(|_| ())
    }

    /// Activates `app`, waits `delay`, then taps the key with `code`.
    pub fn press_key_code(&self, app: &str, code: u16, delay: Duration) -> Result<()> {
        self.run(&key_code_script(app, code, delay)).map(|_| ())
    }
}

pub fn dark_mode_script(dark: bool) -> String {
    format!(
        r#"
tell application "System Events"
    tell appearance preferences
        set dark mode to {}
    end tell
end tell
"#,
        dark
    )
}

pub fn key_code_script(app: &str, code: u16, delay: Duration) -> String {
    format!(
        r#"
tell application "{}" to activate
delay {}
tell application "System Events"
    key code {}
end tell
"#,
        app.replace('"', "\\\""),
        delay.as_secs_f32(),
        code
    )
}

/// Parses the `dark mode` query result. AppleScript prints `true` or `false`.
pub fn parse_dark_mode(output: &str) -> Result<bool> {
    let value = output.trim().to_lowercase();
    if value.starts_with('t') {
        Ok(true)
    } else if value.starts_with('f') {
        Ok(false)
    } else {
        Err(RemotePlayError::Appearance(output.to_string()))
    }
}
