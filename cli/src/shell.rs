//! Entering the resolved directory by replacing this process with a shell.

use std::env;
use std::ffi::{OsStr, OsString};
use std::path::Path;
use std::process::Command;

use anyhow::{Context, Result};

#[cfg(unix)]
const DEFAULT_SHELL: &str = "/bin/sh";
#[cfg(not(unix))]
const DEFAULT_SHELL: &str = "cmd.exe";

/// Change into `target` and hand the terminal to an interactive shell.
///
/// Returns normally only when the current directory already is `target`.
pub fn enter_directory(target: &Path) -> Result<()> {
    if let Ok(current) = env::current_dir() {
        if current == target {
            println!("Already in: {}", target.display());
            return Ok(());
        }
    }

    env::set_current_dir(target)
        .with_context(|| format!("Could not enter directory {}", target.display()))?;

    let shell = user_shell(env::var_os("SHELL"));
    println!("cd {}", target.display());
    launch(&shell)
}

fn user_shell(shell: Option<OsString>) -> OsString {
    shell
        .filter(|shell| !shell.is_empty())
        .unwrap_or_else(|| OsString::from(DEFAULT_SHELL))
}

/// `-i` makes the shell load history and rc files.
#[cfg(unix)]
fn launch(shell: &OsStr) -> Result<()> {
    use std::os::unix::process::CommandExt;

    let err = Command::new(shell).arg("-i").exec();
    Err(err).with_context(|| format!("Failed to spawn new shell {}", shell.to_string_lossy()))
}

#[cfg(not(unix))]
fn launch(shell: &OsStr) -> Result<()> {
    let status = Command::new(shell)
        .status()
        .with_context(|| format!("Failed to spawn new shell {}", shell.to_string_lossy()))?;
    std::process::exit(status.code().unwrap_or(1));
}
