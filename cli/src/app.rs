//! Decides whether to rescan, which root to use, and what to do with the
//! resolved directory.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result, anyhow};
use lcd_tree_index::{DirectoryIndexer, Resolver, ScanConfig, read_root, snapshot_path};
use path_absolutize::Absolutize;
use tracing::info;

use crate::cli::Cli;

/// What the caller should do once the engine is finished.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Action {
    /// The snapshot was rebuilt and there was nothing to search for.
    Updated,

    /// Print the path.
    Print(PathBuf),

    /// Copy the path to the clipboard.
    Copy(PathBuf),

    /// Change into the path and start a shell there.
    Enter(PathBuf),
}

/// Where the scan starts and whether it has to run at all.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScanPlan {
    pub root: PathBuf,
    pub rescan: bool,
}

impl ScanPlan {
    /// A missing snapshot or a new base directory forces a rescan. Otherwise
    /// the root comes from the snapshot header, falling back to `home`.
    pub fn decide(cli: &Cli, home: &Path, snapshot: &Path) -> Result<Self> {
        let mut rescan = cli.rescan;
        if !snapshot.exists() {
            info!("Database not found at {}. Initializing...", snapshot.display());
            rescan = true;
        }

        let root = if let Some(dir) = &cli.newbasedir {
            rescan = true;
            dir.absolutize()
                .with_context(|| format!("Could not resolve base directory {}", dir.display()))?
                .into_owned()
        } else if !rescan {
            read_root(snapshot)?.unwrap_or_else(|| home.to_path_buf())
        } else {
            home.to_path_buf()
        };

        Ok(Self { root, rescan })
    }
}

/// Rescan if needed, then resolve the search term.
pub fn run(cli: &Cli, home: &Path) -> Result<Action> {
    let snapshot = snapshot_path(home);
    let plan = ScanPlan::decide(cli, home, &snapshot)?;

    if plan.rescan {
        info!("Scanning directories starting from: {}", plan.root.display());
        eprintln!("(Re-)Scanning directory tree from {}", plan.root.display());
        DirectoryIndexer::new(ScanConfig::new(&plan.root))
            .build_snapshot(&snapshot)
            .context("Error generating database")?;
        info!("Scan complete. Database saved.");

        if cli.search_term().is_none() {
            return Ok(Action::Updated);
        }
    }

    let term = cli
        .search_term()
        .ok_or_else(|| anyhow!("Please provide a directory name to search for."))?;
    let resolver = Resolver::new(term);
    info!("Searching {} for {:?}", snapshot.display(), resolver.term());
    let found = resolver.resolve(&snapshot)?;

    Ok(if cli.print {
        Action::Print(found)
    } else if cli.copy {
        Action::Copy(found)
    } else {
        Action::Enter(found)
    })
}
