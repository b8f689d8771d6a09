//! Configuration types for directory scanning.

use std::path::{Path, PathBuf};

/// File name of the snapshot, relative to the user's home directory.
pub const SNAPSHOT_FILE_NAME: &str = ".lcd-tree.txt";

/// Well-known snapshot location under `home`.
pub fn snapshot_path(home: &Path) -> PathBuf {
    home.join(SNAPSHOT_FILE_NAME)
}

/// Configuration for one scan of a directory tree.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScanConfig {
    /// Directory the scan starts from. Recorded as the snapshot header.
    pub root: PathBuf,

    /// Directory base names that are skipped together with their subtree.
    pub excluded_names: Vec<String>,

    /// Whether to descend through symbolic links to directories.
    pub follow_symlinks: bool,
}

impl ScanConfig {
    /// Create a new scan config with the default exclusions.
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self {
            root: root.into(),
            excluded_names: Self::default_excludes(),
            follow_symlinks: false,
        }
    }

    /// Add a directory name to skip.
    pub fn exclude(mut self, name: impl Into<String>) -> Self {
        self.excluded_names.push(name.into());
        self
    }

    /// Enable following symbolic links. Link cycles are pruned.
    pub fn follow_symlinks(mut self) -> Self {
        self.follow_symlinks = true;
        self
    }

    /// Only version-control metadata is skipped by default; other hidden
    /// directories are indexed.
    fn default_excludes() -> Vec<String> {
        vec![".git".to_string()]
    }

    /// Check if a directory with this base name should be skipped.
    pub fn is_excluded(&self, name: &str) -> bool {
        self.excluded_names.iter().any(|excluded| excluded == name)
    }
}
