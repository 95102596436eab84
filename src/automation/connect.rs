//! Connecting to the console.

use std::time::{Duration, Instant};

use crate::automation::appearance::with_dark_mode;
use crate::automation::pause;
use crate::automation::runner::RemotePlay;
use crate::automation::state::{classify, screen_contains, ConnectionState};
use crate::error::{RemotePlayError, Result};

impl RemotePlay {
    /// Opens the client, clicks the last-used console, and waits for the stream.
    ///
    /// Runs with the system in dark mode; the previous appearance is restored
    /// however this returns.
    pub fn connect(&self) -> Result<()> {
        with_dark_mode(self.appearance.as_ref(), || self.open_and_connect())
    }

    fn open_and_connect(&self) -> Result<()> {
        // Only text that appeared with the app is relevant
        let before = self.screen.read_text()?;
        self.app.open()?;
        let text = appeared_since(&before, self.screen.read_text()?);

        let strings = &self.config.strings;
        if screen_contains(&text, &strings.not_signed_in) {
            return Err(RemotePlayError::NotSignedIn);
        }
        if !screen_contains(&text, &strings.signed_in) {
            return Err(RemotePlayError::ElementNotFound("connect button".to_string()));
        }

        // The console name differs per account, so click relative to a fixed label
        let anchor_name = &self.config.assets.connect_anchor;
        let anchor = self
            .screen
            .locate(&self.asset(anchor_name)?)?
            .ok_or_else(|| RemotePlayError::ElementNotFound(anchor_name.clone()))?;
        let target = anchor.offset(self.config.connect_offset);

        self.report("Connecting to PS5...");
        self.input.click(target)?;
        pause(Duration::from_millis(self.config.timing.connect_settle_ms));

        self.wait_for_connection()
    }

    /// Polls the screen until the connected marker shows up.
    pub(crate) fn wait_for_connection(&self) -> Result<()> {
        let timing = &self.config.timing;
        let timeout = Duration::from_millis(timing.connect_timeout_ms);
        let poll = Duration::from_millis(timing.connect_poll_ms);
        let start = Instant::now();
        let mut last: Option<ConnectionState> = None;

        loop {
            pause(poll);
            let text = self.screen.read_text()?;
            let state = classify(&text, &self.config.strings);

            if last != Some(state) {
                crate::log(&format!("Connection state: {}", state));
                if let Some(msg) = state.message() {
                    self.report(msg);
                }
                last = Some(state);
            }

            if state.is_terminal() {
                return match state {
                    ConnectionState::Connected => Ok(()),
                    _ => Err(RemotePlayError::NotSignedIn),
                };
            }

            if start.elapsed() >= timeout {
                return Err(RemotePlayError::ConnectTimeout(timeout));
            }
        }
    }
}

/// Removes one occurrence of each line in `before` from `after`.
fn appeared_since(before: &[String], mut after: Vec<String>) -> Vec<String> {
    for line in before {
        if let Some(i) = after.iter().position(|l| l == line) {
            after.remove(i);
        }
    }
    after
}
