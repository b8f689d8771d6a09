mod app;
mod cli;
mod clipboard;
mod shell;

use anyhow::{Context, Result};
use clap::Parser;
use tracing_subscriber::EnvFilter;

use crate::app::Action;
use crate::cli::Cli;

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let home = dirs::home_dir().context("Could not determine user home directory")?;
    match app::run(&cli, &home)? {
        Action::Updated => eprintln!("Database updated."),
        Action::Print(path) => println!("{}", path.display()),
        Action::Copy(path) => {
            clipboard::copy_to_clipboard(&path.to_string_lossy())
                .context("Failed to copy to clipboard")?;
            println!("Copied to clipboard: {}", path.display());
        }
        Action::Enter(path) => shell::enter_directory(&path)?,
    }
    Ok(())
}

/// Diagnostics go to stderr so `--print` output stays clean. `RUST_LOG`
/// takes precedence over `--verbose`.
fn init_tracing(verbose: bool) {
    let default_level = if verbose { "info" } else { "warn" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .without_time()
        .init();
}
