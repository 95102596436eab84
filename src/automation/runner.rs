//! Automation runner - owns the collaborators the flows drive.
//!
//! `RemotePlay` bundles input, screen, app control, and appearance behind
//! traits so the connect and launch flows run the same against the desktop
//! or against scripted fakes.

use std::path::PathBuf;

use crate::automation::app::{AppControl, RemotePlayApp};
use crate::automation::appearance::Appearance;
use crate::automation::config::RemotePlayConfig;
use crate::automation::input::{Clicker, DesktopInput, InputDriver};
use crate::automation::osascript::OsaScript;
use crate::capture::{DesktopScreen, Screen};
use crate::error::Result;
use crate::ocr::find_tesseract;
use crate::paths;

/// Receives user-facing progress messages.
pub type Reporter = Box<dyn Fn(&str)>;

pub struct RemotePlay {
    pub(crate) config: RemotePlayConfig,
    pub(crate) assets_dir: PathBuf,
    pub(crate) input: Box<dyn InputDriver>,
    pub(crate) screen: Box<dyn Screen>,
    pub(crate) app: Box<dyn AppControl>,
    pub(crate) appearance: Box<dyn Appearance>,
    reporter: Reporter,
}

impl RemotePlay {
    pub fn new(
        config: RemotePlayConfig,
        assets_dir: PathBuf,
        input: Box<dyn InputDriver>,
        screen: Box<dyn Screen>,
        app: Box<dyn AppControl>,
        appearance: Box<dyn Appearance>,
    ) -> Self {
        Self {
            config,
            assets_dir,
            input,
            screen,
            app,
            appearance,
            reporter: Box::new(crate::log),
        }
    }

    /// Wires up the real desktop collaborators from config.
    pub fn from_config(config: &RemotePlayConfig) -> Result<Self> {
        let assets_dir = config.assets_dir();
        let recognizer = match &config.recognizer_path {
            Some(path) => path.clone(),
            None => paths::asset(&assets_dir, &config.assets.recognizer)?,
        };
        let tesseract = find_tesseract(config.tesseract_path.as_deref())?;

        let input = DesktopInput::new(
            Clicker::new(&config.clicker_path),
            &config.app_name,
            std::time::Duration::from_millis(config.timing.key_activate_delay_ms),
        );
        let screen = DesktopScreen::new(
            tesseract,
            recognizer,
            config.display_scale,
            config.locate_tolerance,
        );
        let app = RemotePlayApp::new(&config.app_path, &config.app_name, &config.timing);

        Ok(Self::new(
            config.clone(),
            assets_dir,
            Box::new(input),
            Box::new(screen),
            Box::new(app),
            Box::new(OsaScript),
        ))
    }

    /// Replaces the progress sink (default: the log file).
    pub fn with_reporter(mut self, reporter: Reporter) -> Self {
        self.reporter = reporter;
        self
    }

    pub(crate) fn report(&self, msg: &str) {
        (self.reporter)(msg);
    }

    pub(crate) fn asset(&self, name: &str) -> Result<PathBuf> {
        paths::asset(&self.assets_dir, name)
    }
}

/// Quits the app if it is running. Needs nothing beyond the process table.
pub fn close_app(app: &dyn AppControl, report: &dyn Fn(&str)) -> Result<()> {
    if app.is_running() {
        report("Closing Remote Play");
        app.close()?;
    }
    Ok(())
}
