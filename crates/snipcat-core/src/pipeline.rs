//! Classification pipeline: single snippets and whole batches.

use std::time::Duration;

use serde::Serialize;

use crate::aggregate::Aggregator;
use crate::category::{Category, ClassificationMethod, ClassificationOutcome};
use crate::diagnostics::{CoreResult, SkipReason, SkippedSnippet};
use crate::fallback::{ExternalClassifier, FallbackAdapter};
use crate::heuristics::HeuristicMatcher;
use crate::language::require_known_language;
use crate::snippet::Snippet;

/// Log a progress line every this many processed snippets.
pub const PROGRESS_INTERVAL: usize = 100;

/// Classify one snippet: heuristics first, the external classifier only
/// when no rule fires.
///
/// A snippet whose language tag is unmapped and that no rule recognizes is
/// returned as [`CoreError::UnmappedLanguage`](crate::diagnostics::CoreError)
/// so the caller can log and skip it.
pub fn classify_snippet<C: ExternalClassifier + ?Sized>(
    matcher: &HeuristicMatcher,
    adapter: &FallbackAdapter<'_, C>,
    snippet: &Snippet,
) -> CoreResult<ClassificationOutcome> {
    let language = snippet.language_category();

    if let Some(rule) = matcher.find_rule(snippet.content(), language) {
        tracing::trace!(rule = %rule.id, path = %snippet.origin().display(), "heuristic match");
        return Ok(ClassificationOutcome::string_match(rule.category));
    }

    let language = require_known_language(snippet.language_tag())?;
    adapter.classify_via_external_service(snippet.content(), language)
}

/// One row of the per-snippet report.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SnippetRecord {
    /// Path relative to the snippet root.
    pub page: String,
    pub category: Category,
    /// Source language tag.
    pub language: String,
    pub method: ClassificationMethod,
    pub attempts: u32,
    /// Content duplicates a snippet earlier in discovery order.
    pub duplicate: bool,
}

/// Everything a batch run produces.
#[derive(Debug)]
pub struct BatchResult {
    pub records: Vec<SnippetRecord>,
    pub aggregator: Aggregator,
    pub skipped: Vec<SkippedSnippet>,
    pub elapsed: Duration,
}

impl BatchResult {
    pub fn read_failure_count(&self) -> usize {
        self.count_skipped(SkipReason::ReadFailure)
    }

    pub fn unmapped_count(&self) -> usize {
        self.count_skipped(SkipReason::UnmappedLanguage)
    }

    pub fn duplicate_count(&self) -> usize {
        self.records.iter().filter(|r| r.duplicate).count()
    }

    fn count_skipped(&self, reason: SkipReason) -> usize {
        self.skipped.iter().filter(|s| s.reason == reason).count()
    }
}

/// Settings for [`run_batch`].
#[derive(Debug, Clone)]
pub struct BatchOptions {
    pub max_file_size: u64,
    pub dedup: bool,
}

impl From<&crate::config::SnipcatConfig> for BatchOptions {
    fn from(config: &crate::config::SnipcatConfig) -> Self {
        Self {
            max_file_size: config.max_file_size,
            dedup: config.dedup,
        }
    }
}

/// Result of the parallel phase for one file.
#[cfg(feature = "filesystem")]
enum Classified {
    Done {
        snippet: Snippet,
        outcome: ClassificationOutcome,
    },
    Skipped(SkippedSnippet),
}

/// Classify a pre-enumerated batch of snippet files.
///
/// Reading and classification run in parallel. Deduplication and counting
/// happen afterwards on one thread, in the order of `files`, so the first
/// occurrence of a duplicated snippet is the one left unflagged. Read
/// failures and unmapped languages are collected in
/// [`BatchResult::skipped`] and never abort the batch.
#[cfg(feature = "filesystem")]
pub fn run_batch<C: ExternalClassifier + ?Sized>(
    root: &std::path::Path,
    files: &[std::path::PathBuf],
    options: &BatchOptions,
    matcher: &HeuristicMatcher,
    classifier: &C,
    fs: &dyn crate::fs::FileSystem,
) -> BatchResult {
    use rayon::prelude::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    let start = std::time::Instant::now();
    let adapter = FallbackAdapter::new(classifier);
    let processed = AtomicUsize::new(0);

    tracing::info!(files = files.len(), "Categorizing snippets");

    let classified: Vec<Classified> = files
        .par_iter()
        .map(|path| {
            let result = Snippet::load(fs, path, options.max_file_size).and_then(|snippet| {
                let outcome = classify_snippet(matcher, &adapter, &snippet)?;
                Ok((snippet, outcome))
            });

            let done = processed.fetch_add(1, Ordering::Relaxed) + 1;
            if done % PROGRESS_INTERVAL == 0 {
                tracing::info!("Processed {} of {} snippets", done, files.len());
            }

            match result {
                Ok((snippet, outcome)) => Classified::Done { snippet, outcome },
                Err(e) => {
                    tracing::warn!(path = %path.display(), "Skipping snippet: {}", e);
                    Classified::Skipped(SkippedSnippet::from_error(path.clone(), &e))
                }
            }
        })
        .collect();

    let dedup = crate::dedup::DedupSet::new();
    let mut aggregator = Aggregator::new();
    let mut records = Vec::with_capacity(classified.len());
    let mut skipped = Vec::new();

    for item in classified {
        match item {
            Classified::Done { snippet, outcome } => {
                let duplicate = options.dedup && dedup.check_and_insert(snippet.content());
                aggregator.record(&outcome, snippet.language_tag());
                records.push(SnippetRecord {
                    page: crate::discovery::normalize_rel_path(snippet.origin(), root),
                    category: outcome.category,
                    language: snippet.language_tag().to_string(),
                    method: outcome.method,
                    attempts: outcome.attempts,
                    duplicate,
                });
            }
            Classified::Skipped(skip) => skipped.push(skip),
        }
    }

    let elapsed = start.elapsed();
    tracing::info!(
        processed = files.len(),
        classified = records.len(),
        skipped = skipped.len(),
        "Completed in {:.2?}",
        elapsed
    );

    BatchResult {
        records,
        aggregator,
        skipped,
        elapsed,
    }
}
