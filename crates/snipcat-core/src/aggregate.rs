//! Per-category, per-language counting and the accuracy estimate.

use std::collections::BTreeMap;

use serde::Serialize;

use crate::category::{Category, ClassificationOutcome};

/// Weight given to heuristic matches when estimating accuracy.
pub const STRING_MATCH_WEIGHT: f64 = 1.0;
/// Weight given to external classifier results when estimating accuracy.
pub const EXTERNAL_WEIGHT: f64 = 0.8;

/// Category -> source language tag -> count.
pub type CategoryLanguageCounts = BTreeMap<Category, BTreeMap<String, usize>>;

/// Estimated share of correctly classified snippets, as a percentage.
///
/// Returns 0 when `total` is 0.
pub fn accuracy_estimate(total: usize, external: usize, heuristic: usize) -> f64 {
    if total == 0 {
        return 0.0;
    }
    let weighted = heuristic as f64 * STRING_MATCH_WEIGHT + external as f64 * EXTERNAL_WEIGHT;
    weighted / total as f64 * 100.0
}

/// Accumulates classification outcomes for one batch.
///
/// Owned by a single writer; the pipeline feeds it after classification
/// has finished.
#[derive(Debug, Clone, Default)]
pub struct Aggregator {
    counts: CategoryLanguageCounts,
    string_matched: usize,
    externally_classified: usize,
}

impl Aggregator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record(&mut self, outcome: &ClassificationOutcome, language_tag: &str) {
        *self
            .counts
            .entry(outcome.category)
            .or_default()
            .entry(language_tag.to_string())
            .or_insert(0) += 1;

        if outcome.is_string_match() {
            self.string_matched += 1;
        } else {
            self.externally_classified += 1;
        }
    }

    pub fn counts(&self) -> &CategoryLanguageCounts {
        &self.counts
    }

    pub fn count(&self, category: Category, language_tag: &str) -> usize {
        self.counts
            .get(&category)
            .and_then(|by_language| by_language.get(language_tag))
            .copied()
            .unwrap_or(0)
    }

    /// Totals per category, summed over languages.
    pub fn category_totals(&self) -> BTreeMap<Category, usize> {
        self.counts
            .iter()
            .map(|(category, by_language)| (*category, by_language.values().sum()))
            .collect()
    }

    pub fn total(&self) -> usize {
        self.string_matched + self.externally_classified
    }

    pub fn string_matched(&self) -> usize {
        self.string_matched
    }

    pub fn externally_classified(&self) -> usize {
        self.externally_classified
    }

    pub fn accuracy_estimate(&self) -> f64 {
        accuracy_estimate(
            self.total(),
            self.externally_classified,
            self.string_matched,
        )
    }

    /// Serializable snapshot of the counters.
    pub fn summary(&self) -> AggregateSummary {
        AggregateSummary {
            total_code_blocks: self.total(),
            llm_categorized_count: self.externally_classified,
            string_matched_count: self.string_matched,
            accuracy_estimate: self.accuracy_estimate(),
            category_totals: self.category_totals(),
            category_language_counts: self.counts.clone(),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct AggregateSummary {
    pub total_code_blocks: usize,
    pub llm_categorized_count: usize,
    pub string_matched_count: usize,
    pub accuracy_estimate: f64,
    pub category_totals: BTreeMap<Category, usize>,
    pub category_language_counts: CategoryLanguageCounts,
}
