//! On-disk snapshot format.
//!
//! A snapshot is a UTF-8 text file. Line 1 holds the root the scan started
//! from; every following line is an absolute directory path, in the order the
//! walk discovered it. The file is always rewritten whole.

use std::fs::File;
use std::io::{self, BufRead, BufReader, BufWriter, Write};
use std::path::{Path, PathBuf};

use tracing::warn;

use crate::error::{IndexError, Result};

/// Writes a snapshot from scratch, truncating any previous file.
pub struct SnapshotWriter {
    /// Location of the snapshot file.
    path: PathBuf,

    /// Buffered handle; flushed in [`SnapshotWriter::finish`].
    writer: BufWriter<File>,

    /// Body lines written so far.
    entries: usize,
}

impl SnapshotWriter {
    /// Create or truncate the snapshot at `path` and write the header line.
    pub fn create(path: impl Into<PathBuf>, root: &Path) -> Result<Self> {
        let path = path.into();
        let header = root
            .to_str()
            .ok_or_else(|| IndexError::RootNotUtf8(root.to_path_buf()))?
            .to_string();
        let file = File::create(&path).map_err(|source| IndexError::SnapshotWrite {
            path: path.clone(),
            source,
        })?;

        let mut snapshot = Self {
            path,
            writer: BufWriter::new(file),
            entries: 0,
        };
        snapshot.write_line(&header)?;
        Ok(snapshot)
    }

    /// Append one directory to the body.
    ///
    /// Returns `false` when the path cannot be stored as a single UTF-8 line
    /// and was left out.
    pub fn push(&mut self, dir: &Path) -> Result<bool> {
        let Some(line) = dir.to_str() else {
            warn!("Skipping directory with a non UTF-8 name: {}", dir.display());
            return Ok(false);
        };
        if line.contains('\n') {
            warn!("Skipping directory with a newline in its name: {line:?}");
            return Ok(false);
        }
        self.write_line(line)?;
        self.entries += 1;
        Ok(true)
    }

    /// Flush everything to disk and return the number of body lines.
    pub fn finish(mut self) -> Result<usize> {
        self.writer
            .flush()
            .map_err(|source| IndexError::SnapshotWrite {
                path: self.path.clone(),
                source,
            })?;
        Ok(self.entries)
    }

    fn write_line(&mut self, line: &str) -> Result<()> {
        writeln!(self.writer, "{line}").map_err(|source| IndexError::SnapshotWrite {
            path: self.path.clone(),
            source,
        })
    }
}

/// Open a snapshot for sequential reading.
pub(crate) fn open(path: &Path) -> Result<BufReader<File>> {
    let file = File::open(path).map_err(|source| IndexError::SnapshotOpen {
        path: path.to_path_buf(),
        source,
    })?;
    Ok(BufReader::new(file))
}

/// Iterate over the body of a snapshot. The header line is discarded; an
/// empty input yields nothing.
pub(crate) fn body_lines<R: BufRead>(reader: R) -> impl Iterator<Item = io::Result<String>> {
    reader.lines().skip(1)
}

/// Read the root recorded in the snapshot header.
///
/// Returns `None` for an empty file or a blank header.
pub fn read_root(path: &Path) -> Result<Option<PathBuf>> {
    let mut reader = open(path)?;
    let mut header = String::new();
    reader
        .read_line(&mut header)
        .map_err(|source| IndexError::SnapshotRead {
            path: path.to_path_buf(),
            source,
        })?;

    let root = header.trim();
    if root.is_empty() {
        Ok(None)
    } else {
        Ok(Some(PathBuf::from(root)))
    }
}
