//! Directory scanning into a snapshot.

use std::fs;
use std::path::{Path, PathBuf};
use std::time::Instant;

use tracing::{debug, info};
use walkdir::{DirEntry, WalkDir};

use crate::config::ScanConfig;
use crate::error::{IndexError, Result};
use crate::snapshot::SnapshotWriter;

/// Walks a directory tree and records every directory below the root.
pub struct DirectoryIndexer {
    /// Configuration.
    config: ScanConfig,
}

impl DirectoryIndexer {
    /// Create a new directory indexer.
    pub fn new(config: ScanConfig) -> Self {
        Self { config }
    }

    /// Scan the tree and replace the snapshot at `snapshot_path`.
    ///
    /// The root is checked before the snapshot is touched, so a bad root
    /// leaves the previous snapshot intact. Subtrees that cannot be read are
    /// pruned and counted; a failed write aborts the scan and may leave a
    /// partial file behind.
    pub fn build_snapshot(&self, snapshot_path: &Path) -> Result<ScanSummary> {
        let start = Instant::now();
        self.check_root()?;

        let mut writer = SnapshotWriter::create(snapshot_path, &self.config.root)?;
        let pruned = self.walk(|dir| writer.push(dir).map(|_| ()))?;
        let directories = writer.finish()?;

        let duration = start.elapsed();
        info!(
            "Indexed {} directories under {} in {:?} (pruned: {})",
            directories,
            self.config.root.display(),
            duration,
            pruned
        );

        Ok(ScanSummary {
            root: self.config.root.clone(),
            directories,
            pruned,
            duration_ms: u64::try_from(duration.as_millis()).unwrap_or(u64::MAX),
        })
    }

    /// Visit every directory below the root in traversal order.
    ///
    /// The root itself is not visited. Returns the number of subtrees that
    /// were pruned because they could not be read.
    pub fn walk<F>(&self, mut visit: F) -> Result<usize>
    where
        F: FnMut(&Path) -> Result<()>,
    {
        let walker = WalkDir::new(&self.config.root)
            .follow_links(self.config.follow_symlinks)
            .min_depth(1)
            .into_iter()
            .filter_entry(|entry| !self.is_excluded(entry));

        let mut pruned = 0;
        for entry in walker {
            let entry = match entry {
                Ok(entry) => entry,
                Err(err) => {
                    debug!("Pruning unreadable subtree: {err}");
                    pruned += 1;
                    continue;
                }
            };

            if entry.file_type().is_dir() {
                visit(entry.path())?;
            }
        }

        Ok(pruned)
    }

    fn is_excluded(&self, entry: &DirEntry) -> bool {
        if entry.depth() == 0 || !entry.file_type().is_dir() {
            return false;
        }
        let excluded = entry
            .file_name()
            .to_str()
            .is_some_and(|name| self.config.is_excluded(name));
        if excluded {
            debug!("Skipping excluded directory: {}", entry.path().display());
        }
        excluded
    }

    fn check_root(&self) -> Result<()> {
        let root = &self.config.root;
        let metadata = fs::metadata(root).map_err(|source| IndexError::RootUnreadable {
            path: root.clone(),
            source,
        })?;
        if !metadata.is_dir() {
            return Err(IndexError::RootNotDirectory(root.clone()));
        }
        fs::read_dir(root).map_err(|source| IndexError::RootUnreadable {
            path: root.clone(),
            source,
        })?;
        Ok(())
    }
}

/// Result of a scan.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScanSummary {
    /// Root recorded in the snapshot header.
    pub root: PathBuf,

    /// Number of directories written to the body.
    pub directories: usize,

    /// Number of subtrees skipped because they could not be read.
    pub pruned: usize,

    /// Time taken in milliseconds.
    pub duration_ms: u64,
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use std::collections::BTreeSet;
    use std::fs::File;
    use tempfile::TempDir;

    fn snapshot_lines(path: &Path) -> Vec<String> {
        fs::read_to_string(path)
            .unwrap()
            .lines()
            .map(str::to_string)
            .collect()
    }

    fn build_tree(root: &Path) {
        fs::create_dir_all(root.join("projects/app/vendor/app")).unwrap();
        fs::create_dir_all(root.join("projects/.config")).unwrap();
        fs::create_dir_all(root.join("docs")).unwrap();
        File::create(root.join("docs/readme.txt")).unwrap();
    }

    #[test]
    fn test_snapshot_lists_directories_only() {
        let tree = TempDir::new().unwrap();
        let out = TempDir::new().unwrap();
        build_tree(tree.path());
        let db = out.path().join("tree.txt");

        let indexer = DirectoryIndexer::new(ScanConfig::new(tree.path()));
        let summary = indexer.build_snapshot(&db).unwrap();

        let lines = snapshot_lines(&db);
        assert_eq!(lines[0], tree.path().to_string_lossy());

        let body: BTreeSet<_> = lines[1..].iter().cloned().collect();
        let expected: BTreeSet<_> = [
            "docs",
            "projects",
            "projects/.config",
            "projects/app",
            "projects/app/vendor",
            "projects/app/vendor/app",
        ]
        .iter()
        .map(|rel| tree.path().join(rel).to_string_lossy().into_owned())
        .collect();
        assert_eq!(body, expected);
        assert_eq!(summary.directories, 6);
        assert_eq!(summary.pruned, 0);
        assert_eq!(summary.root, tree.path());
    }

    #[test]
    fn test_parents_precede_children() {
        let tree = TempDir::new().unwrap();
        let out = TempDir::new().unwrap();
        build_tree(tree.path());
        let db = out.path().join("tree.txt");

        DirectoryIndexer::new(ScanConfig::new(tree.path()))
            .build_snapshot(&db)
            .unwrap();

        let lines = snapshot_lines(&db);
        let position = |rel: &str| {
            let full = tree.path().join(rel).to_string_lossy().into_owned();
            lines.iter().position(|line| *line == full).unwrap()
        };
        assert!(position("projects") < position("projects/app"));
        assert!(position("projects/app") < position("projects/app/vendor/app"));
    }

    #[test]
    fn test_git_metadata_is_skipped() {
        let tree = TempDir::new().unwrap();
        let out = TempDir::new().unwrap();
        fs::create_dir_all(tree.path().join("a/.git/objects")).unwrap();
        fs::create_dir_all(tree.path().join("a/.github/workflows")).unwrap();
        let db = out.path().join("tree.txt");

        DirectoryIndexer::new(ScanConfig::new(tree.path()))
            .build_snapshot(&db)
            .unwrap();

        let git_dir = tree.path().join("a/.git");
        let lines = snapshot_lines(&db);
        assert!(
            !lines[1..].iter().any(|line| Path::new(line).starts_with(&git_dir)),
            "unexpected .git entries: {lines:?}"
        );
        let workflows = tree.path().join("a/.github/workflows");
        assert!(lines.contains(&workflows.to_string_lossy().into_owned()));
    }

    #[test]
    fn test_empty_tree_has_header_only() {
        let tree = TempDir::new().unwrap();
        let out = TempDir::new().unwrap();
        File::create(tree.path().join("only-a-file.txt")).unwrap();
        let db = out.path().join("tree.txt");

        let summary = DirectoryIndexer::new(ScanConfig::new(tree.path()))
            .build_snapshot(&db)
            .unwrap();

        assert_eq!(summary.directories, 0);
        assert_eq!(snapshot_lines(&db), vec![tree.path().to_string_lossy().into_owned()]);
    }

    #[test]
    fn test_rescan_is_idempotent() {
        let tree = TempDir::new().unwrap();
        let out = TempDir::new().unwrap();
        build_tree(tree.path());
        let first = out.path().join("first.txt");
        let second = out.path().join("second.txt");

        let indexer = DirectoryIndexer::new(ScanConfig::new(tree.path()));
        indexer.build_snapshot(&first).unwrap();
        indexer.build_snapshot(&second).unwrap();

        let first = snapshot_lines(&first);
        let second = snapshot_lines(&second);
        assert_eq!(first[0], second[0]);
        let first: BTreeSet<_> = first[1..].iter().collect();
        let second: BTreeSet<_> = second[1..].iter().collect();
        assert_eq!(first, second);
    }

    #[test]
    fn test_missing_root_keeps_old_snapshot() {
        let out = TempDir::new().unwrap();
        let db = out.path().join("tree.txt");
        fs::write(&db, "/old\n/old/a\n").unwrap();

        let err = DirectoryIndexer::new(ScanConfig::new(out.path().join("missing")))
            .build_snapshot(&db)
            .unwrap_err();

        assert!(matches!(err, IndexError::RootUnreadable { .. }));
        assert_eq!(fs::read_to_string(&db).unwrap(), "/old\n/old/a\n");
    }

    #[test]
    fn test_file_root_is_rejected() {
        let out = TempDir::new().unwrap();
        let file = out.path().join("file.txt");
        File::create(&file).unwrap();

        let err = DirectoryIndexer::new(ScanConfig::new(&file))
            .build_snapshot(&out.path().join("tree.txt"))
            .unwrap_err();

        assert!(matches!(err, IndexError::RootNotDirectory(_)));
    }

    #[test]
    fn test_unwritable_snapshot_fails() {
        let tree = TempDir::new().unwrap();
        let db = tree.path().join("no-such-dir/tree.txt");

        let err = DirectoryIndexer::new(ScanConfig::new(tree.path()))
            .build_snapshot(&db)
            .unwrap_err();

        assert!(matches!(err, IndexError::SnapshotWrite { .. }));
    }

    #[cfg(unix)]
    #[test]
    fn test_non_utf8_directories_are_left_out() {
        use std::ffi::OsStr;
        use std::os::unix::ffi::OsStrExt;

        use crate::resolver::Resolver;

        let tree = TempDir::new().unwrap();
        let out = TempDir::new().unwrap();
        let odd = tree.path().join(OsStr::from_bytes(b"caf\xffe"));
        // Some filesystems refuse names that are not valid UTF-8.
        if fs::create_dir_all(odd.join("inner")).is_err() {
            return;
        }
        fs::create_dir_all(tree.path().join("cafeteria")).unwrap();
        let db = out.path().join("tree.txt");

        let summary = DirectoryIndexer::new(ScanConfig::new(tree.path()))
            .build_snapshot(&db)
            .unwrap();

        let lines = snapshot_lines(&db);
        assert_eq!(summary.directories, 1);
        assert!(!lines.iter().any(|line| line.contains('\u{FFFD}')));
        for line in &lines[1..] {
            assert!(Path::new(line).is_dir(), "missing on disk: {line}");
        }

        let found = Resolver::new("caf").resolve(&db).unwrap();
        assert_eq!(found, tree.path().join("cafeteria"));
        assert!(found.exists());
    }

    #[cfg(unix)]
    #[test]
    fn test_symlinks_not_followed_by_default() {
        let tree = TempDir::new().unwrap();
        let out = TempDir::new().unwrap();
        fs::create_dir_all(tree.path().join("real/inner")).unwrap();
        std::os::unix::fs::symlink(tree.path().join("real"), tree.path().join("link")).unwrap();
        let db = out.path().join("tree.txt");

        DirectoryIndexer::new(ScanConfig::new(tree.path()))
            .build_snapshot(&db)
            .unwrap();

        let link = tree.path().join("link").to_string_lossy().into_owned();
        assert!(!snapshot_lines(&db).iter().any(|line| line.starts_with(&link)));
    }

    #[cfg(unix)]
    #[test]
    fn test_symlink_cycle_is_pruned() {
        let tree = TempDir::new().unwrap();
        let out = TempDir::new().unwrap();
        fs::create_dir_all(tree.path().join("a/b")).unwrap();
        std::os::unix::fs::symlink(tree.path().join("a"), tree.path().join("a/b/back")).unwrap();
        let db = out.path().join("tree.txt");

        let summary = DirectoryIndexer::new(ScanConfig::new(tree.path()).follow_symlinks())
            .build_snapshot(&db)
            .unwrap();

        assert_eq!(summary.directories, 2);
        assert_eq!(summary.pruned, 1);
    }

    #[cfg(unix)]
    #[test]
    fn test_unreadable_subtree_is_pruned() {
        use std::os::unix::fs::PermissionsExt;

        let tree = TempDir::new().unwrap();
        let out = TempDir::new().unwrap();
        let locked = tree.path().join("locked");
        fs::create_dir_all(locked.join("hidden")).unwrap();
        fs::create_dir_all(tree.path().join("open")).unwrap();
        fs::set_permissions(&locked, fs::Permissions::from_mode(0o000)).unwrap();

        // Privileged users can read the directory anyway.
        if fs::read_dir(&locked).is_ok() {
            fs::set_permissions(&locked, fs::Permissions::from_mode(0o755)).unwrap();
            return;
        }

        let db = out.path().join("tree.txt");
        let result = DirectoryIndexer::new(ScanConfig::new(tree.path())).build_snapshot(&db);
        fs::set_permissions(&locked, fs::Permissions::from_mode(0o755)).unwrap();

        let summary = result.unwrap();
        let lines = snapshot_lines(&db);
        assert_eq!(summary.pruned, 1);
        assert!(lines.contains(&locked.to_string_lossy().into_owned()));
        assert!(lines.contains(&tree.path().join("open").to_string_lossy().into_owned()));
        assert!(!lines.contains(&locked.join("hidden").to_string_lossy().into_owned()));
    }
}
