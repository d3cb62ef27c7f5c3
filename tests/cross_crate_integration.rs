//! Cross-crate integration tests verifying contracts between workspace crates.
//!
//! snipcat-rules ships the rule table as data; snipcat-core interprets it.
//! These tests pin the pieces both sides must agree on: category and
//! language names, evaluation order, and the substring window.

use std::str::FromStr;

use snipcat_core::{Category, HeuristicMatcher, LanguageCategory};
use snipcat_rules::{RULES_DATA, RuleKind, SUBSTRING_WINDOW};

// ============================================================================
// Vocabulary
// ============================================================================

#[test]
fn every_rule_category_parses_in_core() {
    for rule in RULES_DATA {
        let category = Category::from_str(rule.category);
        assert!(
            category.is_ok(),
            "{} uses category {:?} that core does not know",
            rule.id,
            rule.category
        );
        assert_ne!(category.unwrap(), Category::Uncategorized, "{}", rule.id);
    }
}

#[test]
fn every_rule_language_parses_in_core() {
    for rule in RULES_DATA {
        for language in rule.languages {
            assert!(
                LanguageCategory::from_str(language).is_ok(),
                "{} is scoped to unknown language category {:?}",
                rule.id,
                language
            );
        }
    }
}

#[test]
fn default_matcher_loads_every_rule() {
    let matcher = HeuristicMatcher::with_defaults();
    assert_eq!(matcher.rule_count(), snipcat_rules::rule_count());
    assert_eq!(matcher.window(), SUBSTRING_WINDOW);
}

// ============================================================================
// Ordering
// ============================================================================

#[test]
fn specific_commands_win_over_generic_ones() {
    let matcher = HeuristicMatcher::with_defaults();
    for language in [LanguageCategory::Shell, LanguageCategory::Text] {
        assert_eq!(
            matcher.match_snippet("atlas clusters list", language),
            (Category::AtlasCliCommand, true)
        );
        assert_eq!(
            matcher.match_snippet("mongosh \"mongodb+srv://...\"", language),
            (Category::MongoshCommand, true)
        );
    }
}

#[test]
fn aggregate_wins_over_return_object_indicators() {
    let matcher = HeuristicMatcher::with_defaults();
    let content = "db.orders.aggregate([]) // error: _id missing";
    // Leading "db." keeps ".aggregate" at offset 9, inside the window
    assert!(content.find(".aggregate").unwrap() < SUBSTRING_WINDOW);
    assert_eq!(
        matcher.match_snippet(content, LanguageCategory::JavaScript),
        (Category::UsageExample, true)
    );
}

#[test]
fn json_like_is_never_matched_by_substrings() {
    let matcher = HeuristicMatcher::with_defaults();
    assert!(
        RULES_DATA
            .iter()
            .filter(|r| r.kind == RuleKind::Substring)
            .all(|r| !r.applies_to("json-like"))
    );
    assert_eq!(
        matcher.match_snippet("{ \"_id\": 1, \"error\": null }", LanguageCategory::JsonLike),
        (Category::Uncategorized, false)
    );
}
