//! Error types and skip records

use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use thiserror::Error;

use crate::language::LanguageCategory;

pub type CoreResult<T> = Result<T, CoreError>;

/// Core errors.
///
/// Only [`CoreError::RootNotFound`], [`CoreError::InvalidExcludePattern`] and
/// [`CoreError::Config`] invalidate a whole batch. Everything else is scoped
/// to a single snippet and is reported as a [`SkippedSnippet`].
#[derive(Error, Debug)]
pub enum CoreError {
    #[error("Unmapped source language tag '{tag}'")]
    UnmappedLanguage { tag: String },

    #[error("No candidate categories for language category {0}")]
    NoCandidates(LanguageCategory),

    #[error("Failed to read file: {path}")]
    FileRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Refusing to read symlink: {path}")]
    FileSymlink { path: PathBuf },

    #[error("File too large: {path} ({size} bytes, limit {limit} bytes)")]
    FileTooBig {
        path: PathBuf,
        size: u64,
        limit: u64,
    },

    #[error("Not a regular file: {path}")]
    FileNotRegular { path: PathBuf },

    #[error("Snippet root does not exist: {path}")]
    RootNotFound { path: PathBuf },

    #[error("Invalid exclude pattern: {pattern} ({message})")]
    InvalidExcludePattern { pattern: String, message: String },

    #[error("Invalid configuration: {0}")]
    Config(String),
}

impl CoreError {
    /// Whether this error came from reading the snippet file itself.
    pub fn is_read_failure(&self) -> bool {
        matches!(
            self,
            CoreError::FileRead { .. }
                | CoreError::FileSymlink { .. }
                | CoreError::FileTooBig { .. }
                | CoreError::FileNotRegular { .. }
        )
    }
}

/// Why a snippet did not produce a classification record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SkipReason {
    ReadFailure,
    UnmappedLanguage,
}

/// A snippet that was left out of the classification counts.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SkippedSnippet {
    pub path: PathBuf,
    pub reason: SkipReason,
    pub message: String,
}

impl SkippedSnippet {
    pub fn from_error(path: PathBuf, error: &CoreError) -> Self {
        let reason = if error.is_read_failure() {
            SkipReason::ReadFailure
        } else {
            SkipReason::UnmappedLanguage
        };
        Self {
            path,
            reason,
            message: error.to_string(),
        }
    }
}
