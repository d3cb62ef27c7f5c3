//! Heuristic rule table for snipcat - documentation snippet categorizer.
//!
//! The rules that categorize a snippet without asking the external classifier
//! live in `rules.json` and are compiled into [`RULES_DATA`] at build time.
//! Adding or reordering a rule is a data change; the matcher in snipcat-core
//! walks the table top to bottom and the first hit wins.
//!
//! # Usage
//!
//! ```
//! use snipcat_rules::{RuleKind, RULES_DATA};
//!
//! for rule in RULES_DATA.iter().filter(|r| r.kind == RuleKind::Prefix) {
//!     println!("{}: {:?} -> {}", rule.id, rule.pattern, rule.category);
//! }
//! ```
//!
//! # Rule Families
//!
//! - **PFX-xxx**: literal prefix rules, evaluated first
//! - **SUB-xxx**: substring rules, evaluated only when no prefix rule fired
//!   and never for JSON-like snippets

/// How a rule's pattern is tested against snippet content.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RuleKind {
    /// Content must start with the pattern.
    Prefix,
    /// Pattern must occur inside the substring window (or the whole content
    /// when the content is no longer than the window).
    Substring,
}

/// One row of the heuristic rule table.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RuleData {
    /// Stable identifier, used by `disabled_rules` configuration.
    pub id: &'static str,
    pub kind: RuleKind,
    /// Literal text to look for. Matching is case-sensitive.
    pub pattern: &'static str,
    /// Category name the rule resolves to.
    pub category: &'static str,
    /// Language category names the rule is scoped to.
    pub languages: &'static [&'static str],
}

impl RuleData {
    /// Whether this rule is scoped to the given language category name.
    pub fn applies_to(&self, language: &str) -> bool {
        self.languages.contains(&language)
    }
}

// Include the auto-generated rules data from build.rs
include!(concat!(env!("OUT_DIR"), "/rules_data.rs"));

/// Returns the total number of rules.
pub fn rule_count() -> usize {
    RULES_DATA.len()
}

/// Looks up a rule by ID.
pub fn get_rule(id: &str) -> Option<&'static RuleData> {
    RULES_DATA.iter().find(|rule| rule.id == id)
}

/// Rules of one kind, in evaluation order.
pub fn rules_of_kind(kind: RuleKind) -> impl Iterator<Item = &'static RuleData> {
    RULES_DATA.iter().filter(move |rule| rule.kind == kind)
}
