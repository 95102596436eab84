//! Remote Play application lifecycle: open, close, and process lookup.

use std::path::{Path, PathBuf};
use std::process::Command;
use std::time::{Duration, Instant};

use sysinfo::{ProcessRefreshKind, ProcessesToUpdate, System};

use crate::automation::config::Timing;
use crate::automation::osascript::OsaScript;
use crate::automation::pause;
use crate::error::{RemotePlayError, Result};

pub trait AppControl {
    /// Brings the app to the foreground, launching it if needed.
    fn open(&self) -> Result<()>;

    /// Terminates the app if it is running.
    fn close(&self) -> Result<()>;

    fn is_running(&self) -> bool;

    fn set_full_screen(&self) -> Result<()>;
}

pub struct RemotePlayApp {
    app_path: PathBuf,
    app_name: String,
    open_timeout: Duration,
    open_poll: Duration,
    settle: Duration,
    osa: OsaScript,
}

impl RemotePlayApp {
    pub fn new(app_path: &Path, app_name: &str, timing: &Timing) -> Self {
        Self {
            app_path: app_path.to_path_buf(),
            app_name: app_name.to_string(),
            open_timeout: Duration::from_millis(timing.open_timeout_ms),
            open_poll: Duration::from_millis(timing.open_poll_ms),
            settle: Duration::from_millis(timing.settle_ms),
            osa: OsaScript,
        }
    }

    fn is_frontmost(&self) -> Result<bool> {
        Ok(self.osa.frontmost_app()? == self.app_name)
    }

    fn refreshed_system() -> System {
        let mut system = System::new();
        system.refresh_processes_specifics(ProcessesToUpdate::All, ProcessRefreshKind::everything());
        system
    }
}

impl AppControl for RemotePlayApp {
    fn open(&self) -> Result<()> {
        if !self.is_frontmost()? {
            crate::log(&format!("Opening {}", self.app_path.display()));
            let output = Command::new("open").arg(&self.app_path).output()?;
            if !output.status.success() {
                return Err(RemotePlayError::command("open", &output));
            }
        }

        let start = Instant::now();
        while !self.is_frontmost()? {
            if start.elapsed() >= self.open_timeout {
                return Err(RemotePlayError::OpenTimeout {
                    app: self.app_name.clone(),
                    timeout: self.open_timeout,
                });
            }
            pause(self.open_poll);
        }

        pause(self.settle);
        Ok(())
    }

    fn close(&self) -> Result<()> {
        let system = Self::refreshed_system();
        let mut failed = Vec::new();
        for (pid, process) in system.processes() {
            if is_app_process(process, &self.app_path) {
                crate::log(&format!("Killing {} (pid {})", self.app_name, pid));
                if !process.kill() {
                    failed.push(pid.as_u32());
                }
            }
        }
        kill_outcome(&self.app_name, &failed)
    }

    fn is_running(&self) -> bool {
        let system = Self::refreshed_system();
        system
            .processes()
            .values()
            .any(|process| is_app_process(process, &self.app_path))
    }

    fn set_full_screen(&self) -> Result<()> {
        self.osa.set_full_screen()
    }
}

fn is_app_process(process: &sysinfo::Process, app_path: &Path) -> bool {
    if let Some(exe) = process.exe() {
        if exe.starts_with(app_path) {
            return true;
        }
    }

    let needle = app_path.to_string_lossy();
    process
        .cmd()
        .iter()
        .any(|arg| command_mentions(&arg.to_string_lossy(), &needle))
}

/// Fails with the pids that could not be killed, if any.
pub fn kill_outcome(app_name: &str, failed: &[u32]) -> Result<()> {
    if failed.is_empty() {
        return Ok(());
    }
    let pids = failed
        .iter()
        .map(|pid| pid.to_string())
        .collect::<Vec<_>>()
        .join(", ");
    Err(RemotePlayError::Command {
        program: "kill".to_string(),
        detail: format!("could not terminate {} (pid {})", app_name, pids),
    })
}

/// True when a command-line argument points into the app bundle.
pub fn command_mentions(arg: &str, app_path: &str) -> bool {
    !app_path.is_empty() && arg.contains(app_path)
}
