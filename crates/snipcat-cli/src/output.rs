//! Console summary.

use colored::Colorize;
use snipcat_core::{BatchResult, SkipReason};

fn percentage(part: usize, total: usize) -> f64 {
    if total == 0 {
        0.0
    } else {
        part as f64 / total as f64 * 100.0
    }
}

/// Human-readable run summary. `offline` marks runs without an external
/// classifier.
pub fn render_summary(result: &BatchResult, offline: bool) -> String {
    let agg = &result.aggregator;
    let total = agg.total();
    let mut out = String::new();

    out.push_str(&format!("{}\n", "Snippet categorization summary".bold()));
    out.push_str(&format!(
        "  Categorized:                 {} ({} duplicates)\n",
        total,
        result.duplicate_count()
    ));
    out.push_str(&format!(
        "  String Matched Percentage:   {:.2}%\n",
        percentage(agg.string_matched(), total)
    ));
    out.push_str(&format!(
        "  LLM Categorized Percentage:  {:.2}%\n",
        percentage(agg.externally_classified(), total)
    ));
    let accuracy = format!("{:.2}%", agg.accuracy_estimate());
    out.push_str(&format!(
        "  Overall Accuracy Estimate:   {}\n",
        accuracy.green().bold()
    ));
    if offline && agg.externally_classified() > 0 {
        out.push_str(&format!(
            "  {} external classifier disabled; {} unmatched snippets are Uncategorized \
             but still weighted at 80%\n",
            "Note:".yellow().bold(),
            agg.externally_classified()
        ));
    }

    let totals = agg.category_totals();
    if !totals.is_empty() {
        out.push_str(&format!("\n{}\n", "By category".bold()));
        for (category, count) in totals {
            let name = format!("{:<32}", category.as_str());
            let name = if category == snipcat_core::Category::Uncategorized {
                name.yellow()
            } else {
                name.cyan()
            };
            out.push_str(&format!("  {name} {count}\n"));
        }
    }

    if !result.skipped.is_empty() {
        out.push_str(&format!(
            "\n{} {} read failures, {} unmapped languages\n",
            "Skipped:".yellow().bold(),
            result.read_failure_count(),
            result.unmapped_count()
        ));
        for skip in &result.skipped {
            let label = match skip.reason {
                SkipReason::ReadFailure => "read",
                SkipReason::UnmappedLanguage => "language",
            };
            out.push_str(&format!(
                "  {} {} {}\n",
                format!("[{label}]").dimmed(),
                skip.path.display(),
                skip.message.dimmed()
            ));
        }
    }

    out.push_str(&format!("\nCompleted in {:.2?}\n", result.elapsed));
    out
}
