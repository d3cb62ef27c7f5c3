//! Heuristic matcher: zero-cost categorization from literal text patterns.
//!
//! The matcher walks an ordered rule list loaded from `snipcat-rules`:
//!
//! 1. Prefix rules scoped to the snippet's language category, top to bottom.
//! 2. Only when no prefix rule fired, and never for JSON-like snippets,
//!    substring rules. They inspect the first [`SUBSTRING_WINDOW`] characters
//!    when the content is longer than that, otherwise the whole content.
//!
//! The first rule that fires decides the category. A match means the
//! external classifier is never consulted for the snippet.

use snipcat_rules::{RULES_DATA, RuleData, RuleKind};
pub use snipcat_rules::SUBSTRING_WINDOW;

use crate::category::Category;
use crate::diagnostics::{CoreError, CoreResult};
use crate::language::LanguageCategory;

/// A compiled heuristic rule.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HeuristicRule {
    pub id: String,
    pub kind: RuleKind,
    pub pattern: String,
    pub category: Category,
    pub languages: Vec<LanguageCategory>,
}

impl HeuristicRule {
    pub fn prefix(
        id: impl Into<String>,
        pattern: impl Into<String>,
        category: Category,
        languages: &[LanguageCategory],
    ) -> Self {
        Self {
            id: id.into(),
            kind: RuleKind::Prefix,
            pattern: pattern.into(),
            category,
            languages: languages.to_vec(),
        }
    }

    pub fn substring(
        id: impl Into<String>,
        pattern: impl Into<String>,
        category: Category,
        languages: &[LanguageCategory],
    ) -> Self {
        Self {
            kind: RuleKind::Substring,
            ..Self::prefix(id, pattern, category, languages)
        }
    }

    pub fn applies_to(&self, language: LanguageCategory) -> bool {
        self.languages.contains(&language)
    }

    fn fires_on(&self, text: &str) -> bool {
        match self.kind {
            RuleKind::Prefix => text.starts_with(&self.pattern),
            RuleKind::Substring => text.contains(&self.pattern),
        }
    }
}

impl TryFrom<&RuleData> for HeuristicRule {
    type Error = CoreError;

    fn try_from(data: &RuleData) -> CoreResult<Self> {
        let category = data
            .category
            .parse::<Category>()
            .map_err(|e| CoreError::Config(format!("rule {}: {}", data.id, e)))?;
        let languages = data
            .languages
            .iter()
            .map(|name| name.parse::<LanguageCategory>())
            .collect::<CoreResult<Vec<_>>>()?;
        Ok(Self {
            id: data.id.to_string(),
            kind: data.kind,
            pattern: data.pattern.to_string(),
            category,
            languages,
        })
    }
}

/// Ordered rule cascade.
#[derive(Debug, Clone)]
pub struct HeuristicMatcher {
    prefix_rules: Vec<HeuristicRule>,
    substring_rules: Vec<HeuristicRule>,
    window: usize,
}

impl Default for HeuristicMatcher {
    fn default() -> Self {
        Self::with_defaults()
    }
}

impl HeuristicMatcher {
    /// Matcher over the built-in rule table.
    pub fn with_defaults() -> Self {
        let rules = RULES_DATA
            .iter()
            .filter_map(|data| match HeuristicRule::try_from(data) {
                Ok(rule) => Some(rule),
                Err(e) => {
                    tracing::warn!("skipping heuristic rule: {}", e);
                    None
                }
            });
        Self::from_rules(rules, SUBSTRING_WINDOW)
    }

    /// Matcher over a custom rule list. Relative order within each rule kind
    /// is preserved.
    pub fn from_rules(rules: impl IntoIterator<Item = HeuristicRule>, window: usize) -> Self {
        let (prefix_rules, substring_rules): (Vec<_>, Vec<_>) = rules
            .into_iter()
            .partition(|rule| rule.kind == RuleKind::Prefix);
        Self {
            prefix_rules,
            substring_rules,
            window,
        }
    }

    /// Drop the rules with the given IDs.
    pub fn without_rules<S: AsRef<str>>(mut self, disabled: &[S]) -> Self {
        let is_enabled = |rule: &HeuristicRule| !disabled.iter().any(|id| id.as_ref() == rule.id);
        self.prefix_rules.retain(is_enabled);
        self.substring_rules.retain(is_enabled);
        self
    }

    pub fn rule_count(&self) -> usize {
        self.prefix_rules.len() + self.substring_rules.len()
    }

    pub fn window(&self) -> usize {
        self.window
    }

    /// The first rule that fires for `content`, if any.
    pub fn find_rule(&self, content: &str, language: LanguageCategory) -> Option<&HeuristicRule> {
        let prefix_hit = self
            .prefix_rules
            .iter()
            .filter(|rule| rule.applies_to(language))
            .find(|rule| rule.fires_on(content));
        if prefix_hit.is_some() {
            return prefix_hit;
        }

        // JSON, YAML and XML carry '_id' and 'error' fields legitimately
        if language == LanguageCategory::JsonLike {
            return None;
        }

        let scope = substring_scope(content, self.window);
        self.substring_rules
            .iter()
            .filter(|rule| rule.applies_to(language))
            .find(|rule| rule.fires_on(scope))
    }

    /// Returns the matched category and whether any rule fired. An unmatched
    /// snippet reports [`Category::Uncategorized`].
    pub fn match_snippet(&self, content: &str, language: LanguageCategory) -> (Category, bool) {
        match self.find_rule(content, language) {
            Some(rule) => (rule.category, true),
            None => (Category::Uncategorized, false),
        }
    }
}

/// Leading `window` characters of `content`, or all of it when shorter.
fn substring_scope(content: &str, window: usize) -> &str {
    match content.char_indices().nth(window) {
        Some((idx, _)) => &content[..idx],
        None => content,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn matcher() -> HeuristicMatcher {
        HeuristicMatcher::with_defaults()
    }

    #[test]
    fn test_default_matcher_loads_every_rule() {
        assert_eq!(matcher().rule_count(), snipcat_rules::rule_count());
        assert_eq!(matcher().window(), 50);
    }

    #[test]
    fn test_atlas_prefix_for_shell_and_text() {
        for language in [LanguageCategory::Shell, LanguageCategory::Text] {
            assert_eq!(
                matcher().match_snippet("atlas clusters list", language),
                (Category::AtlasCliCommand, true)
            );
        }
    }

    #[test]
    fn test_mongosh_prefix() {
        let content = "mongosh \"mongodb+srv://...\"";
        assert_eq!(
            matcher().match_snippet(content, LanguageCategory::Shell),
            (Category::MongoshCommand, true)
        );
        assert_eq!(
            matcher().match_snippet(content, LanguageCategory::Text),
            (Category::MongoshCommand, true)
        );
    }

    #[test]
    fn test_non_mongo_commands() {
        for content in [
            "mkdir project",
            "cd project",
            "docker run mongo",
            "docker-compose up",
            "brew install mongosh",
            "apt-get install gnupg",
            "go run main.go",
            "export MONGODB_URI=x",
        ] {
            assert_eq!(
                matcher().match_snippet(content, LanguageCategory::Shell),
                (Category::NonMongoCommand, true),
                "{content}"
            );
        }
    }

    #[test]
    fn test_atlas_is_never_a_generic_command() {
        let rule = matcher()
            .find_rule("atlas deployments setup", LanguageCategory::Shell)
            .cloned()
            .unwrap();
        assert_eq!(rule.id, "PFX-001");
    }

    #[test]
    fn test_usage_prefixes_only_for_text_in_shell_family() {
        assert_eq!(
            matcher().match_snippet("import pymongo", LanguageCategory::Text),
            (Category::UsageExample, true)
        );
        // Shell has no usage-prefix rules and no substring hit here
        assert_eq!(
            matcher().match_snippet("import pymongo", LanguageCategory::Shell),
            (Category::Uncategorized, false)
        );
    }

    #[test]
    fn test_usage_prefixes_for_driver_languages() {
        for (content, language) in [
            ("using MongoDB.Driver;", LanguageCategory::DriversMinusJs),
            ("package main", LanguageCategory::DriversMinusJs),
            ("from pymongo import MongoClient", LanguageCategory::DriversMinusJs),
            ("import { MongoClient } from 'mongodb';", LanguageCategory::JavaScript),
            ("mongodb://localhost:27017", LanguageCategory::Unknown),
        ] {
            assert_eq!(
                matcher().match_snippet(content, language),
                (Category::UsageExample, true),
                "{content}"
            );
        }
    }

    #[test]
    fn test_command_prefixes_do_not_apply_to_drivers() {
        assert_eq!(
            matcher().match_snippet("cd ..", LanguageCategory::DriversMinusJs),
            (Category::Uncategorized, false)
        );
    }

    #[test]
    fn test_prefix_match_is_case_sensitive() {
        assert_eq!(
            matcher().match_snippet("Atlas clusters list", LanguageCategory::Shell),
            (Category::Uncategorized, false)
        );
    }

    #[test]
    fn test_json_like_never_matches() {
        let content = "{ \"_id\": 1, \"error\": \"none\" }";
        assert_eq!(
            matcher().match_snippet(content, LanguageCategory::JsonLike),
            (Category::Uncategorized, false)
        );
        assert_eq!(
            matcher().match_snippet("import x", LanguageCategory::JsonLike),
            (Category::Uncategorized, false)
        );
    }

    #[test]
    fn test_aggregate_substring() {
        assert_eq!(
            matcher().match_snippet(
                "db.orders.aggregate([{ $match: {} }])",
                LanguageCategory::JavaScript
            ),
            (Category::UsageExample, true)
        );
    }

    #[test]
    fn test_return_object_substrings() {
        for content in [
            "{ _id: ObjectId('1') }",
            "connection error: timed out",
            "warning: something",
            "this option is deprecated",
        ] {
            assert_eq!(
                matcher().match_snippet(content, LanguageCategory::Text),
                (Category::ExampleReturnObject, true),
                "{content}"
            );
        }
    }

    #[test]
    fn test_substring_match_is_case_sensitive() {
        assert_eq!(
            matcher().match_snippet("MongoServerError: bad auth", LanguageCategory::Text),
            (Category::Uncategorized, false)
        );
    }

    #[test]
    fn test_aggregate_wins_over_return_object() {
        let content = "db.c.aggregate() // _id";
        assert_eq!(
            matcher().match_snippet(content, LanguageCategory::DriversMinusJs),
            (Category::UsageExample, true)
        );
    }

    #[test]
    fn test_substring_window_limits_long_content() {
        let padding = "x".repeat(60);
        let late = format!("{padding} db.c.aggregate() _id");
        assert_eq!(
            matcher().match_snippet(&late, LanguageCategory::Shell),
            (Category::Uncategorized, false)
        );

        let early = format!("db.c.aggregate(){padding}");
        assert_eq!(
            matcher().match_snippet(&early, LanguageCategory::Shell),
            (Category::UsageExample, true)
        );
    }

    #[test]
    fn test_substring_at_window_boundary() {
        // "_id" straddles the 50th character
        let straddling = format!("{}_id{}", "a".repeat(48), "b".repeat(10));
        assert_eq!(
            matcher().match_snippet(&straddling, LanguageCategory::Text),
            (Category::Uncategorized, false)
        );
        let inside = format!("{}_id{}", "a".repeat(47), "b".repeat(10));
        assert_eq!(
            matcher().match_snippet(&inside, LanguageCategory::Text),
            (Category::ExampleReturnObject, true)
        );
    }

    #[test]
    fn test_short_content_checks_everything() {
        assert_eq!(
            matcher().match_snippet("print(doc['_id'])", LanguageCategory::DriversMinusJs),
            (Category::ExampleReturnObject, true)
        );
    }

    #[test]
    fn test_window_counts_characters_not_bytes() {
        let content = format!("{}_id{}", "é".repeat(40), "z".repeat(20));
        assert_eq!(
            matcher().match_snippet(&content, LanguageCategory::Text),
            (Category::ExampleReturnObject, true)
        );
    }

    #[test]
    fn test_disabled_rules_are_skipped() {
        let matcher = matcher().without_rules(&["PFX-001"]);
        assert_eq!(
            matcher.match_snippet("atlas clusters list", LanguageCategory::Shell),
            (Category::Uncategorized, false)
        );
        assert_eq!(matcher.rule_count(), snipcat_rules::rule_count() - 1);
    }

    #[test]
    fn test_custom_rule_order_decides() {
        let rules = vec![
            HeuristicRule::prefix(
                "X-1",
                "atlas",
                Category::NonMongoCommand,
                &[LanguageCategory::Shell],
            ),
            HeuristicRule::prefix(
                "X-2",
                "atlas ",
                Category::AtlasCliCommand,
                &[LanguageCategory::Shell],
            ),
        ];
        let matcher = HeuristicMatcher::from_rules(rules, 50);
        assert_eq!(
            matcher.match_snippet("atlas login", LanguageCategory::Shell),
            (Category::NonMongoCommand, true)
        );
    }

    #[test]
    fn test_substring_scope() {
        assert_eq!(substring_scope("abc", 50), "abc");
        assert_eq!(substring_scope("abcdef", 3), "abc");
        assert_eq!(substring_scope("", 3), "");
    }
}
