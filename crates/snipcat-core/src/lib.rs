//! # snipcat-core
//!
//! Classification engine for code snippets extracted from technical
//! documentation.
//!
//! Each snippet goes through:
//! - the language classifier ([`language`]), which groups its source tag
//!   into a [`LanguageCategory`]
//! - the heuristic cascade ([`heuristics`]), an ordered prefix/substring
//!   rule table where the first hit wins
//! - the fallback adapter ([`fallback`]), which asks an
//!   [`ExternalClassifier`] and validates its answer, up to three times
//!
//! [`dedup`] flags whitespace-insensitive duplicates and [`aggregate`]
//! counts outcomes per category and language and estimates accuracy.

pub mod aggregate;
pub mod category;
pub mod config;
pub mod dedup;
pub mod diagnostics;
#[cfg(feature = "filesystem")]
pub mod discovery;
pub mod fallback;
pub mod fs;
pub mod heuristics;
pub mod language;
pub mod pipeline;
pub mod snippet;

pub use aggregate::{Aggregator, CategoryLanguageCounts, accuracy_estimate};
pub use category::{Category, ClassificationMethod, ClassificationOutcome};
pub use config::SnipcatConfig;
pub use dedup::{DedupSet, Fingerprint, fingerprint};
pub use diagnostics::{CoreError, CoreResult, SkipReason, SkippedSnippet};
#[cfg(feature = "filesystem")]
pub use discovery::discover_snippet_files;
pub use fallback::{
    ClassificationRequest, ClassifierError, DisabledClassifier, ExternalClassifier,
    FallbackAdapter, MAX_ATTEMPTS, candidate_categories,
};
pub use heuristics::HeuristicMatcher;
pub use language::{LanguageCategory, classify_language};
#[cfg(feature = "filesystem")]
pub use pipeline::run_batch;
pub use pipeline::{BatchOptions, BatchResult, SnippetRecord, classify_snippet};
pub use snippet::Snippet;
