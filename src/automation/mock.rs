//! Scripted stand-ins for the desktop, used by the flow tests.
//!
//! Each mock is a cheap handle around shared state: the test keeps one
//! clone to script and inspect, the `RemotePlay` under test owns another.
//! All timing in the harness config is zero so loops run instantly.

use std::cell::RefCell;
use std::collections::VecDeque;
use std::path::Path;
use std::rc::Rc;
use std::time::Duration;

use tempfile::TempDir;

use crate::automation::app::AppControl;
use crate::automation::appearance::Appearance;
use crate::automation::config::{RemotePlayConfig, Timing};
use crate::automation::input::{InputDriver, Key, Point};
use crate::automation::runner::RemotePlay;
use crate::capture::Screen;
use crate::error::{OcrError, RemotePlayError, Result};

/// One recorded input action.
#[derive(Debug, Clone, PartialEq)]
pub enum InputEvent {
    Click(Point),
    PressDownClick(Point, Duration),
    Key(Key),
}

#[derive(Clone, Default)]
pub struct MockInput {
    events: Rc<RefCell<Vec<InputEvent>>>,
}

impl MockInput {
    pub fn events(&self) -> Vec<InputEvent> {
        self.events.borrow().clone()
    }

    pub fn keys(&self) -> Vec<Key> {
        self.events
            .borrow()
            .iter()
            .filter_map(|e| match e {
                InputEvent::Key(k) => Some(*k),
                _ => None,
            })
            .collect()
    }
}

impl InputDriver for MockInput {
    fn click(&self, at: Point) -> Result<()> {
        self.events.borrow_mut().push(InputEvent::Click(at));
        Ok(())
    }

    fn press_down_click(&self, at: Point, hold: Duration) -> Result<()> {
        self.events
            .borrow_mut()
            .push(InputEvent::PressDownClick(at, hold));
        Ok(())
    }

    fn press_key(&self, key: Key) -> Result<()> {
        self.events.borrow_mut().push(InputEvent::Key(key));
        Ok(())
    }
}

#[derive(Default)]
struct ScreenScript {
    texts: VecDeque<Vec<String>>,
    items: VecDeque<std::result::Result<String, String>>,
    default_item: String,
    location: Option<Point>,
    text_reads: usize,
    item_reads: usize,
}

#[derive(Clone, Default)]
pub struct MockScreen {
    script: Rc<RefCell<ScreenScript>>,
}

impl MockScreen {
    /// Queues the text of the next `read_text` call.
    pub fn push_text(&self, lines: &[&str]) {
        self.script.borrow_mut().texts.push_back(screen_lines(lines));
    }

    /// Queues carousel titles for successive `read_item_name` calls.
    pub fn push_items(&self, items: &[&str]) {
        let mut script = self.script.borrow_mut();
        for item in items {
            script.items.push_back(Ok(item.to_string()));
        }
    }

    /// Queues a recognizer failure.
    pub fn push_item_error(&self, raw: &str) {
        self.script.borrow_mut().items.push_back(Err(raw.to_string()));
    }

    /// Title returned once the queue runs dry.
    pub fn set_default_item(&self, item: &str) {
        self.script.borrow_mut().default_item = item.to_string();
    }

    pub fn set_location(&self, location: Option<Point>) {
        self.script.borrow_mut().location = location;
    }

    pub fn text_reads(&self) -> usize {
        self.script.borrow().text_reads
    }

    pub fn item_reads(&self) -> usize {
        self.script.borrow().item_reads
    }
}

impl Screen for MockScreen {
    fn read_text(&self) -> Result<Vec<String>> {
        let mut script = self.script.borrow_mut();
        script.text_reads += 1;
        Ok(script.texts.pop_front().unwrap_or_default())
    }

    fn read_item_name(&self) -> Result<String> {
        let mut script = self.script.borrow_mut();
        script.item_reads += 1;
        match script.items.pop_front() {
            Some(Ok(item)) => Ok(item),
            Some(Err(raw)) => Err(OcrError::Recognition(raw).into()),
            None => Ok(script.default_item.clone()),
        }
    }

    fn locate(&self, _template: &Path) -> Result<Option<Point>> {
        Ok(self.script.borrow().location)
    }
}

#[derive(Default)]
struct AppState {
    opens: usize,
    full_screens: usize,
    closes: usize,
    running: bool,
}

#[derive(Clone, Default)]
pub struct MockApp {
    state: Rc<RefCell<AppState>>,
}

impl MockApp {
    pub fn opens(&self) -> usize {
        self.state.borrow().opens
    }

    pub fn full_screens(&self) -> usize {
        self.state.borrow().full_screens
    }

    pub fn closes(&self) -> usize {
        self.state.borrow().closes
    }

    pub fn set_running(&self, running: bool) {
        self.state.borrow_mut().running = running;
    }
}

impl AppControl for MockApp {
    fn open(&self) -> Result<()> {
        let mut state = self.state.borrow_mut();
        state.opens += 1;
        state.running = true;
        Ok(())
    }

    fn close(&self) -> Result<()> {
        let mut state = self.state.borrow_mut();
        state.closes += 1;
        state.running = false;
        Ok(())
    }

    fn is_running(&self) -> bool {
        self.state.borrow().running
    }

    fn set_full_screen(&self) -> Result<()> {
        self.state.borrow_mut().full_screens += 1;
        Ok(())
    }
}

struct AppearanceState {
    dark: bool,
    history: Vec<bool>,
    fail_queries: bool,
}

#[derive(Clone)]
pub struct MockAppearance {
    state: Rc<RefCell<AppearanceState>>,
}

impl MockAppearance {
    pub fn new(dark: bool) -> Self {
        Self {
            state: Rc::new(RefCell::new(AppearanceState {
                dark,
                history: Vec::new(),
                fail_queries: false,
            })),
        }
    }

    pub fn current(&self) -> bool {
        self.state.borrow().dark
    }

    /// Every `set_dark_mode` value, in order.
    pub fn history(&self) -> Vec<bool> {
        self.state.borrow().history.clone()
    }

    pub fn fail_queries(&self) {
        self.state.borrow_mut().fail_queries = true;
    }
}

impl Appearance for MockAppearance {
    fn is_dark_mode(&self) -> Result<bool> {
        let state = self.state.borrow();
        if state.fail_queries {
            return Err(RemotePlayError::Appearance("missing value".to_string()));
        }
        Ok(state.dark)
    }

    fn set_dark_mode(&self, dark: bool) -> Result<()> {
        let mut state = self.state.borrow_mut();
        state.dark = dark;
        state.history.push(dark);
        Ok(())
    }
}

pub fn screen_lines(lines: &[&str]) -> Vec<String> {
    lines.iter().map(|s| s.to_string()).collect()
}

/// A `RemotePlay` wired to mocks, plus handles to inspect them.
pub struct Harness {
    pub input: MockInput,
    pub screen: MockScreen,
    pub app: MockApp,
    pub appearance: MockAppearance,
    config: RefCell<RemotePlayConfig>,
    assets: TempDir,
    reported: Rc<RefCell<Vec<String>>>,
}

impl Harness {
    /// Light mode, zero timing, all assets present.
    pub fn new() -> Self {
        let assets = tempfile::tempdir().expect("temp dir");
        let config = RemotePlayConfig {
            timing: Timing::zero(),
            ..RemotePlayConfig::default()
        };
        for name in [
            &config.assets.recognizer,
            &config.assets.connect_anchor,
            &config.assets.ps_button,
        ] {
            std::fs::write(assets.path().join(name), b"").expect("write asset");
        }

        Self {
            input: MockInput::default(),
            screen: MockScreen::default(),
            app: MockApp::default(),
            appearance: MockAppearance::new(false),
            config: RefCell::new(config),
            assets,
            reported: Rc::new(RefCell::new(Vec::new())),
        }
    }

    pub fn config_mut(&self, edit: impl FnOnce(&mut RemotePlayConfig)) {
        edit(&mut self.config.borrow_mut());
    }

    pub fn remove_asset(&self, name: &str) {
        std::fs::remove_file(self.assets.path().join(name)).expect("remove asset");
    }

    pub fn build(&self) -> RemotePlay {
        let reported = Rc::clone(&self.reported);
        RemotePlay::new(
            self.config.borrow().clone(),
            self.assets.path().to_path_buf(),
            Box::new(self.input.clone()),
            Box::new(self.screen.clone()),
            Box::new(self.app.clone()),
            Box::new(self.appearance.clone()),
        )
        .with_reporter(Box::new(move |msg| reported.borrow_mut().push(msg.to_string())))
    }

    pub fn reported(&self) -> Vec<String> {
        self.reported.borrow().clone()
    }
}
