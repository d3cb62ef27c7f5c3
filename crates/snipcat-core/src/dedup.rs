//! Whitespace-insensitive duplicate detection.
//!
//! Two snippets are duplicates when their contents are equal after removing
//! every whitespace character. Equality is decided on the SHA-256 digest of
//! the stripped text.

use std::collections::HashSet;
use std::fmt;
use std::sync::{Mutex, PoisonError};

use sha2::digest::Output;
use sha2::{Digest, Sha256};

/// SHA-256 digest of whitespace-stripped snippet content.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Fingerprint(Output<Sha256>);

impl fmt::Display for Fingerprint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:x}", self.0)
    }
}

/// Remove all whitespace (spaces, tabs, newlines and other Unicode
/// whitespace).
pub fn strip_whitespace(content: &str) -> String {
    content.chars().filter(|c| !c.is_whitespace()).collect()
}

pub fn fingerprint(content: &str) -> Fingerprint {
    let mut hasher = Sha256::new();
    hasher.update(strip_whitespace(content).as_bytes());
    Fingerprint(hasher.finalize())
}

/// Set of fingerprints seen so far.
///
/// Shared between worker threads; [`DedupSet::check_and_insert`] is the
/// atomic operation to use when deduplicating in parallel.
#[derive(Debug, Default)]
pub struct DedupSet {
    seen: Mutex<HashSet<Fingerprint>>,
}

impl DedupSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Whether `fp` has been recorded. Read-only.
    pub fn contains(&self, fp: &Fingerprint) -> bool {
        self.lock().contains(fp)
    }

    /// Record `fp`. Returns `true` if it was not already present.
    pub fn insert(&self, fp: Fingerprint) -> bool {
        self.lock().insert(fp)
    }

    /// Whether an equivalent snippet has been recorded. Does not record
    /// `content`.
    pub fn is_duplicate(&self, content: &str) -> bool {
        self.contains(&fingerprint(content))
    }

    /// Record `content` and report whether it was already present, as one
    /// step.
    pub fn check_and_insert(&self, content: &str) -> bool {
        !self.insert(fingerprint(content))
    }

    pub fn len(&self) -> usize {
        self.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, HashSet<Fingerprint>> {
        // The set stays consistent even if a holder panicked mid-insert
        self.seen.lock().unwrap_or_else(PoisonError::into_inner)
    }
}
