//! Remote Play Driver
//!
//! A macOS command-line tool that drives the PS Remote Play client: it
//! connects to the console and launches games by reading the screen with
//! OCR and sending clicks and key presses.

mod automation;
mod capture;
mod error;
mod ocr;
mod paths;

use anyhow::{anyhow, Context, Result};
use chrono::Local;
use clap::{Parser, Subcommand};
use std::fs::OpenOptions;
use std::io::Write;
use std::path::PathBuf;
use std::process::Command as Process;

use automation::app::{AppControl, RemotePlayApp};
use automation::runner::close_app;
use automation::{RemotePlay, Reporter};
use automation::appearance::Appearance;
use automation::osascript::OsaScript;
use capture::{DesktopScreen, Screen};

/// Logs a message to both console and log file with timestamp.
pub fn log(msg: &str) {
    let timestamp = Local::now().format("%H:%M:%S%.3f");
    let line = format!("[{}] {}\n", timestamp, msg);
    print!("{}", line);
    let log_path = paths::get_logs_dir().join("remoteplay.log");
    if let Ok(mut file) = OpenOptions::new()
        .create(true)
        .append(true)
        .open(&log_path)
    {
        let _ = file.write_all(line.as_bytes());
    }
}

#[derive(Debug, Parser)]
#[command(
    name = "remoteplay-driver",
    about = "Connects PS Remote Play to your console and launches games",
    version
)]
struct Cli {
    /// Path to config.json (defaults to next to the executable, then the user config dir)
    #[arg(long, global = true, env = "REMOTEPLAY_CONFIG")]
    config: Option<PathBuf>,

    /// Click helper executable, overriding the config
    #[arg(long, global = true, env = "REMOTEPLAY_CLICKER")]
    clicker: Option<PathBuf>,

    /// Also speak progress messages aloud
    #[arg(long, global = true)]
    speak: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Open Remote Play and connect to the last used console
    Connect,
    /// Find a game in the library carousel and start it
    Launch {
        /// Title as shown on the carousel tile
        game: String,
        /// Connect to the console first
        #[arg(long)]
        connect: bool,
    },
    /// Quit Remote Play if it is running
    Close,
    /// Show frontmost app, whether Remote Play runs, and the appearance
    Status,
    /// Run the game-name recognizer on an image
    Recognise { image: PathBuf },
    /// Print the text currently recognized on screen
    ReadScreen,
}

fn main() -> Result<()> {
    // Set up panic hook to log panics
    std::panic::set_hook(Box::new(|panic_info| {
        let msg = if let Some(s) = panic_info.payload().downcast_ref::<&str>() {
            s.to_string()
        } else if let Some(s) = panic_info.payload().downcast_ref::<String>() {
            s.clone()
        } else {
            "Unknown panic".to_string()
        };
        let location = if let Some(loc) = panic_info.location() {
            format!(" at {}:{}:{}", loc.file(), loc.line(), loc.column())
        } else {
            String::new()
        };
        log(&format!("[PANIC]{} {}", location, msg));
    }));

    // Ensure output directories exist
    paths::ensure_directories().context("creating log directory")?;

    let cli = Cli::parse();

    automation::init_config(cli.config.as_deref());
    let mut config = automation::get_config().clone();
    if let Some(clicker) = &cli.clicker {
        config.clicker_path = clicker.clone();
    }

    match run(&cli, &config) {
        Ok(()) => Ok(()),
        Err(e) => {
            log(&format!("Failed: {:#}", e));
            Err(e)
        }
    }
}

fn run(cli: &Cli, config: &automation::RemotePlayConfig) -> Result<()> {
    match &cli.command {
        Command::Connect => {
            let remote = build(config, cli.speak)?;
            remote.connect()?;
        }
        Command::Launch { game, connect } => {
            let remote = build(config, cli.speak)?;
            if *connect {
                remote.connect()?;
            }
            remote.open_game(game)?;
        }
        Command::Close => {
            // Only the process table is needed, not OCR
            let app = RemotePlayApp::new(&config.app_path, &config.app_name, &config.timing);
            let reporter = if cli.speak {
                speaking_reporter()
            } else {
                Box::new(log) as Reporter
            };
            close_app(&app, reporter.as_ref())?;
        }
        Command::Status => status(config)?,
        Command::Recognise { image } => {
            let recognizer = match &config.recognizer_path {
                Some(path) => path.clone(),
                None => paths::asset(&config.assets_dir(), &config.assets.recognizer)?,
            };
            let title = ocr::recognise_game(&recognizer, image)?;
            println!("{}", title);
        }
        Command::ReadScreen => {
            let tesseract = ocr::find_tesseract(config.tesseract_path.as_deref())?;
            // The recognizer is unused here
            let screen = DesktopScreen::new(
                tesseract,
                PathBuf::new(),
                config.display_scale,
                config.locate_tolerance,
            );
            for line in screen.read_text()? {
                println!("{}", line);
            }
        }
    }
    Ok(())
}

fn build(config: &automation::RemotePlayConfig, speak: bool) -> Result<RemotePlay> {
    let remote = RemotePlay::from_config(config)?;
    Ok(if speak {
        remote.with_reporter(speaking_reporter())
    } else {
        remote
    })
}

/// Logs each message, then reads it out with `say`.
fn speaking_reporter() -> Reporter {
    Box::new(|msg: &str| {
        log(msg);
        match Process::new("say").arg(msg).status() {
            Ok(status) if status.success() => {}
            Ok(status) => log(&format!("say exited with {}", status)),
            Err(e) => log(&format!("say failed: {}", e)),
        }
    })
}

fn status(config: &automation::RemotePlayConfig) -> Result<()> {
    let osa = OsaScript;
    let frontmost = osa
        .frontmost_app()
        .map_err(|e| anyhow!("could not query frontmost app: {}", e))?;
    let dark = Appearance::is_dark_mode(&osa)?;
    let app = RemotePlayApp::new(&config.app_path, &config.app_name, &config.timing);
    let running = app.is_running();
    let setup = RemotePlay::from_config(config);

    println!("Frontmost app: {}", frontmost);
    println!(
        "{}: {}",
        config.app_name,
        if running { "running" } else { "not running" }
    );
    println!("Appearance: {}", if dark { "dark" } else { "light" });
    if let Err(e) = setup {
        println!("Setup problem: {}", e);
    }
    Ok(())
}
