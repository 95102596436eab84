//! Launching a game from the library carousel.

use std::time::Duration;

use crate::automation::input::Key;
use crate::automation::matcher::{is_match, normalize_title, similarity, title_score};
use crate::automation::pause;
use crate::automation::runner::RemotePlay;
use crate::error::{RemotePlayError, Result};

impl RemotePlay {
    /// Finds `game` in the carousel and starts it.
    ///
    /// Expects a connected stream. Returns once enter has been pressed on the
    /// matching tile.
    pub fn open_game(&self, game: &str) -> Result<()> {
        let target = normalize_title(game);
        let timing = &self.config.timing;

        self.app.open()?;
        self.app.set_full_screen()?;
        pause(Duration::from_millis(timing.settle_ms));

        // Holding the PS button brings up the home screen from anywhere
        let button_name = &self.config.assets.ps_button;
        let button = self
            .screen
            .locate(&self.asset(button_name)?)?
            .ok_or_else(|| RemotePlayError::ElementNotFound(button_name.clone()))?;
        self.input
            .press_down_click(button, Duration::from_millis(timing.ps_button_hold_ms))?;

        self.return_to_library()?;
        self.search_carousel(&target)
    }

    /// Backs out to the first carousel tile and confirms it is the store.
    ///
    /// Returns the attempt number that succeeded.
    pub(crate) fn return_to_library(&self) -> Result<u32> {
        let timing = &self.config.timing;
        let store = normalize_title(&self.config.strings.store_tile);
        let attempts = self.config.library_attempts;

        for attempt in 1..=attempts {
            self.input.press_key(Key::Delete)?;
            self.input.press_key(Key::Escape)?;
            pause(Duration::from_millis(timing.library_settle_ms));

            // Only the search loop retries the recognizer
            let item = normalize_title(&self.screen.read_item_name()?);
            let score = similarity(&item, &store);
            if is_match(score, self.config.match_threshold) {
                crate::log(&format!("Library view reached on attempt {}", attempt));
                return Ok(attempt);
            }
            crate::log(&format!(
                "Attempt {}/{}: {:?} is not the store (ratio {:.2})",
                attempt, attempts, item, score
            ));

            pause(Duration::from_millis(timing.library_backoff_ms));
        }

        Err(RemotePlayError::LibraryNotReached(attempts))
    }

    /// Steps right through the carousel until `target` is focused.
    pub(crate) fn search_carousel(&self, target: &str) -> Result<()> {
        let step = Duration::from_millis(self.config.timing.carousel_step_ms);
        let threshold = self.config.match_threshold;
        let attempts = self.config.search_attempts;
        let library_tiles: Vec<String> = self
            .config
            .strings
            .library_tiles
            .iter()
            .map(|t| normalize_title(t))
            .collect();

        for attempt in 1..=attempts {
            self.input.press_key(Key::RightArrow)?;
            pause(step);

            let item = match self.screen.read_item_name() {
                Err(RemotePlayError::Ocr(e)) => {
                    crate::log(&format!("Recognition failed ({}), retrying once", e));
                    self.screen.read_item_name()?
                }
                other => other?,
            };
            let item = normalize_title(&item);

            let score = title_score(&item, target);
            crate::log(&format!(
                "Item {}: {:?} (ratio {:.2})",
                attempt, item, score
            ));

            if is_match(score, threshold) {
                self.report(&format!("Found game: {}", target));
                self.report("Opening game...");
                self.input.press_key(Key::Enter)?;
                return Ok(());
            }

            // The library tile sits at the end of the carousel
            if library_tiles
                .iter()
                .any(|tile| is_match(similarity(&item, tile), threshold))
            {
                return Err(RemotePlayError::GameNotFound(target.to_string()));
            }
        }

        Err(RemotePlayError::SearchExhausted {
            name: target.to_string(),
            attempts,
        })
    }
}
