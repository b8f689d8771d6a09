//! # Tree Index
//!
//! This crate builds a flat snapshot of every directory under a root and
//! resolves short names against it.
//!
//! ## Features
//!
//! - **Snapshots**: A plain text file holding the scan root followed by one
//!   directory path per line, in traversal order
//! - **Pruning**: Unreadable subtrees and `.git` metadata are skipped
//! - **Resolution**: Exact base-name matches beat substring matches; within a
//!   tier the shortest path wins
//! - **Streaming**: Snapshots are read line by line, never held in memory
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────┐
//! │                         Tree Index                              │
//! ├─────────────────────────────────────────────────────────────────┤
//! │  ScanConfig ──► DirectoryIndexer ──► SnapshotWriter             │
//! │                                           │                     │
//! │                                           ▼                     │
//! │                                     .lcd-tree.txt               │
//! │                                           │                     │
//! │                                           ▼                     │
//! │  term ──────────────────────────────► Resolver ──► PathBuf      │
//! └─────────────────────────────────────────────────────────────────┘
//! ```

pub mod config;
pub mod error;
pub mod indexer;
pub mod resolver;
pub mod snapshot;

pub use config::{SNAPSHOT_FILE_NAME, ScanConfig, snapshot_path};
pub use error::{IndexError, Result};
pub use indexer::{DirectoryIndexer, ScanSummary};
pub use resolver::{MatchCandidate, MatchTier, Resolver};
pub use snapshot::{SnapshotWriter, read_root};
