use std::path::PathBuf;

use clap::Parser;

const SEARCH_LOGIC: &str = "\
Search Logic:
  1. Searches for an Exact Match (case-insensitive) of the directory name.
  2. If not found, searches for a Partial Match.
  Within each kind the shortest path wins.

Typing exit in the new shell brings you back to the old directory.";

/// lcd - Library Change Directory
///
/// Fast directory navigation using a cached directory tree (~/.lcd-tree.txt).
/// The first run indexes your home directory automatically.
#[derive(Parser, Debug)]
#[command(name = "lcd", version, after_help = SEARCH_LOGIC)]
pub struct Cli {
    /// Show detailed logs during operation
    #[arg(long, short = 'v')]
    pub verbose: bool,

    /// Print the found path to stdout (do not cd)
    #[arg(long)]
    pub print: bool,

    /// Copy the found path to the system clipboard
    #[arg(long)]
    pub copy: bool,

    /// Force a rescan of the filesystem
    #[arg(long)]
    pub rescan: bool,

    /// Set a new root directory for scanning (implies --rescan)
    #[arg(long, value_name = "DIR")]
    pub newbasedir: Option<PathBuf>,

    /// Directory name or fragment; several words are joined with spaces
    #[arg(value_name = "NAME")]
    pub term: Vec<String>,
}

impl Cli {
    /// The search term, or `None` when nothing usable was given.
    pub fn search_term(&self) -> Option<String> {
        let term = self.term.join(" ");
        if term.trim().is_empty() {
            None
        } else {
            Some(term)
        }
    }
}
