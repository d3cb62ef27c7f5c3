//! Ordering invariants of the compiled rule table.
//!
//! The matcher is first-hit-wins, so the relative position of rules is part
//! of their meaning.

use snipcat_rules::{RULES_DATA, RuleKind, get_rule, rules_of_kind};

fn position(id: &str) -> usize {
    RULES_DATA
        .iter()
        .position(|r| r.id == id)
        .unwrap_or_else(|| panic!("{id} missing from RULES_DATA"))
}

#[test]
fn test_prefix_rules_precede_substring_rules() {
    let last_prefix = RULES_DATA
        .iter()
        .rposition(|r| r.kind == RuleKind::Prefix)
        .unwrap();
    let first_substring = RULES_DATA
        .iter()
        .position(|r| r.kind == RuleKind::Substring)
        .unwrap();
    assert!(last_prefix < first_substring);
}

#[test]
fn test_mongodb_commands_precede_generic_commands() {
    let first_generic = RULES_DATA
        .iter()
        .position(|r| r.category == "Non-MongoDB Command")
        .unwrap();
    assert!(position("PFX-001") < first_generic);
    assert!(position("PFX-002") < first_generic);
}

#[test]
fn test_aggregate_precedes_return_object_indicators() {
    let aggregate = position("SUB-001");
    for rule in rules_of_kind(RuleKind::Substring) {
        if rule.category == "Example return object" {
            assert!(aggregate < position(rule.id), "{} ran before SUB-001", rule.id);
        }
    }
}

#[test]
fn test_no_substring_rule_applies_to_json_like() {
    for rule in rules_of_kind(RuleKind::Substring) {
        assert!(!rule.applies_to("json-like"), "{} applies to json-like", rule.id);
    }
}

#[test]
fn test_usage_prefixes_scoped_away_from_shell() {
    let import = get_rule("PFX-030").unwrap();
    assert_eq!(import.pattern, "import ");
    assert!(!import.applies_to("shell"));
    assert!(import.applies_to("text"));
    assert!(import.applies_to("drivers-minus-js"));
}

#[test]
fn test_rules_json_is_valid() {
    let path = std::path::Path::new(env!("CARGO_MANIFEST_DIR")).join("rules.json");
    let content = std::fs::read_to_string(&path).unwrap();
    let json: serde_json::Value = serde_json::from_str(&content).unwrap();
    assert_eq!(
        json["rules"].as_array().unwrap().len(),
        snipcat_rules::rule_count()
    );
}
