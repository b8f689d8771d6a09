//! Error types for snapshot building and resolution.

use std::path::PathBuf;

use thiserror::Error;

/// Result type alias for index operations.
pub type Result<T> = std::result::Result<T, IndexError>;

/// Errors that can occur while building or searching a snapshot.
#[derive(Error, Debug)]
pub enum IndexError {
    /// No directory in the snapshot matched the search term.
    #[error("directory not found: {0}")]
    NotFound(String),

    /// The scan root could not be opened.
    #[error("could not read scan root {}", .path.display())]
    RootUnreadable {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The scan root exists but is not a directory.
    #[error("scan root is not a directory: {}", .0.display())]
    RootNotDirectory(PathBuf),

    /// The scan root cannot be recorded in the UTF-8 header.
    #[error("scan root is not valid UTF-8: {}", .0.display())]
    RootNotUtf8(PathBuf),

    /// The snapshot file could not be opened.
    #[error("could not open database {}", .path.display())]
    SnapshotOpen {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Reading the snapshot failed part way through.
    #[error("could not read database {}", .path.display())]
    SnapshotRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Writing the snapshot failed; the file may be partially written.
    #[error("could not write database {}", .path.display())]
    SnapshotWrite {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// IO error.
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

impl IndexError {
    /// True when the search simply found nothing.
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound(_))
    }
}
