//! JSON reports written at the end of a run.

use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

use anyhow::Context;
use serde::Serialize;
use snipcat_core::{BatchResult, Category, CategoryLanguageCounts};

pub const SNIPPET_REPORT_FILE: &str = "snippets.json";
pub const COUNTS_REPORT_FILE: &str = "language_category_counts.json";

/// Contents of `language_category_counts.json`.
#[derive(Debug, Serialize)]
pub struct CountsReport {
    pub total_code_blocks: usize,
    pub llm_categorized_count: usize,
    pub string_matched_count: usize,
    pub read_failure_count: usize,
    /// Snippets left out of the counts for any reason.
    pub skipped_count: usize,
    pub duplicate_count: usize,
    pub accuracy_estimate: f64,
    pub category_totals: BTreeMap<Category, usize>,
    pub category_language_counts: CategoryLanguageCounts,
}

impl CountsReport {
    pub fn from_batch(result: &BatchResult) -> Self {
        let summary = result.aggregator.summary();
        Self {
            total_code_blocks: summary.total_code_blocks,
            llm_categorized_count: summary.llm_categorized_count,
            string_matched_count: summary.string_matched_count,
            read_failure_count: result.read_failure_count(),
            skipped_count: result.skipped.len(),
            duplicate_count: result.duplicate_count(),
            accuracy_estimate: summary.accuracy_estimate,
            category_totals: summary.category_totals,
            category_language_counts: summary.category_language_counts,
        }
    }
}

/// Paths of the written report files.
#[derive(Debug)]
pub struct WrittenReports {
    pub snippets: PathBuf,
    pub counts: PathBuf,
}

fn write_json<T: Serialize + ?Sized>(path: &Path, value: &T) -> anyhow::Result<()> {
    let json = serde_json::to_string_pretty(value)?;
    fs::write(path, json).with_context(|| format!("Failed to write {}", path.display()))
}

/// Write both reports into `dir`, creating it if needed.
pub fn write_reports(dir: &Path, result: &BatchResult) -> anyhow::Result<WrittenReports> {
    fs::create_dir_all(dir)
        .with_context(|| format!("Failed to create report directory {}", dir.display()))?;

    let snippets = dir.join(SNIPPET_REPORT_FILE);
    write_json(&snippets, &result.records)?;
    tracing::info!("Snippet report written to {}", snippets.display());

    let counts = dir.join(COUNTS_REPORT_FILE);
    write_json(&counts, &CountsReport::from_batch(result))?;
    tracing::info!("Category counts report written to {}", counts.display());

    Ok(WrittenReports { snippets, counts })
}
