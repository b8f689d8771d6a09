//! Copying a path to the system clipboard through the platform's tool.

use std::io::Write;
use std::path::PathBuf;
use std::process::{Command, Stdio};

use anyhow::{Context, Result, bail};

/// A clipboard program and the arguments it needs to read stdin.
type ClipboardTool = (&'static str, &'static [&'static str]);

#[cfg(target_os = "macos")]
const CANDIDATES: &[ClipboardTool] = &[("pbcopy", &[])];

#[cfg(target_os = "linux")]
const CANDIDATES: &[ClipboardTool] = &[("xclip", &["-selection", "clipboard"]), ("wl-copy", &[])];

#[cfg(not(any(target_os = "macos", target_os = "linux")))]
const CANDIDATES: &[ClipboardTool] = &[];

/// Pipe `text` into the first clipboard tool found on `PATH`.
pub fn copy_to_clipboard(text: &str) -> Result<()> {
    let (program, args) = find_tool(CANDIDATES, |name| which::which(name).ok())?;

    let mut child = Command::new(&program)
        .args(args)
        .stdin(Stdio::piped())
        .spawn()
        .with_context(|| format!("failed to start {}", program.display()))?;

    // Dropping stdin closes the pipe so the tool sees end of input.
    {
        let mut stdin = child.stdin.take().context("clipboard stdin unavailable")?;
        stdin.write_all(text.as_bytes())?;
    }

    let status = child.wait()?;
    if !status.success() {
        bail!("{} exited with {status}", program.display());
    }
    Ok(())
}

fn find_tool<F>(
    candidates: &[ClipboardTool],
    lookup: F,
) -> Result<(PathBuf, &'static [&'static str])>
where
    F: Fn(&str) -> Option<PathBuf>,
{
    if candidates.is_empty() {
        bail!("unsupported OS");
    }
    candidates
        .iter()
        .find_map(|(name, args)| lookup(*name).map(|path| (path, *args)))
        .context("no clipboard tool found")
}
