//! Resolving a search term against a snapshot.
//!
//! Matching is on the base name only and ignores case. A base name equal to
//! the term is an exact match; one containing it is a partial match. Any
//! exact match beats every partial match, and within a tier the shortest
//! path wins, with the earliest line kept on ties.

use std::io::{self, BufRead};
use std::path::{Path, PathBuf};

use tracing::debug;

use crate::error::{IndexError, Result};
use crate::snapshot;

/// How a candidate matched the term.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MatchTier {
    /// Base name equals the term.
    Exact,

    /// Base name contains the term.
    Partial,
}

/// A snapshot line viewed as a possible match.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MatchCandidate<'a> {
    /// Full directory path as stored in the snapshot.
    pub path: &'a str,

    /// Final path component.
    pub name: &'a str,

    /// Length of `path` in bytes.
    pub len: usize,
}

impl<'a> MatchCandidate<'a> {
    /// Split a snapshot line into its base name and length.
    pub fn from_line(line: &'a str) -> Self {
        let name = line.rsplit(std::path::is_separator).next().unwrap_or(line);
        Self {
            path: line,
            name,
            len: line.len(),
        }
    }

    /// Classify this candidate against an already lowercased term.
    pub fn tier(&self, term_lower: &str) -> Option<MatchTier> {
        let name_lower = self.name.to_lowercase();
        if name_lower == term_lower {
            Some(MatchTier::Exact)
        } else if name_lower.contains(term_lower) {
            Some(MatchTier::Partial)
        } else {
            None
        }
    }
}

/// Best candidate seen so far in each tier.
#[derive(Debug, Default)]
struct BestMatches {
    exact: Option<(String, usize)>,
    partial: Option<(String, usize)>,
}

impl BestMatches {
    fn offer(&mut self, candidate: &MatchCandidate<'_>, tier: MatchTier) {
        let slot = match tier {
            MatchTier::Exact => &mut self.exact,
            MatchTier::Partial => &mut self.partial,
        };
        let improves = slot.as_ref().is_none_or(|(_, len)| candidate.len < *len);
        if improves {
            debug!("New best {tier:?} match: {}", candidate.path);
            *slot = Some((candidate.path.to_string(), candidate.len));
        }
    }

    fn into_best(self) -> Option<String> {
        self.exact.or(self.partial).map(|(path, _)| path)
    }
}

/// Finds the best directory for a search term.
#[derive(Debug, Clone)]
pub struct Resolver {
    /// Term as typed, kept for error reporting.
    term: String,

    /// Lowercased term used for comparisons.
    term_lower: String,
}

impl Resolver {
    /// Create a resolver for `term`. Callers reject empty terms.
    pub fn new(term: impl Into<String>) -> Self {
        let term = term.into();
        let term_lower = term.to_lowercase();
        Self { term, term_lower }
    }

    /// The term being searched for.
    pub fn term(&self) -> &str {
        &self.term
    }

    /// Resolve against the snapshot file at `snapshot_path`.
    pub fn resolve(&self, snapshot_path: &Path) -> Result<PathBuf> {
        let reader = snapshot::open(snapshot_path)?;
        let best = self
            .best_match(reader)
            .map_err(|source| IndexError::SnapshotRead {
                path: snapshot_path.to_path_buf(),
                source,
            })?;
        self.found(best)
    }

    /// Resolve against any snapshot-formatted reader.
    pub fn resolve_reader<R: BufRead>(&self, reader: R) -> Result<PathBuf> {
        let best = self.best_match(reader)?;
        self.found(best)
    }

    /// Single pass over the body, one line at a time.
    fn best_match<R: BufRead>(&self, reader: R) -> io::Result<Option<String>> {
        let mut best = BestMatches::default();

        for line in snapshot::body_lines(reader) {
            let line = line?;
            let candidate = MatchCandidate::from_line(&line);
            if let Some(tier) = candidate.tier(&self.term_lower) {
                best.offer(&candidate, tier);
            }
        }

        Ok(best.into_best())
    }

    fn found(&self, best: Option<String>) -> Result<PathBuf> {
        best.map(PathBuf::from)
            .ok_or_else(|| IndexError::NotFound(self.term.clone()))
    }
}
