//! Build script for snipcat-rules.
//!
//! Generates the static heuristic rule table from rules.json at compile time.

use std::env;
use std::fs;
use std::path::Path;

/// Maximum allowed file size for rules.json (1 MB)
const MAX_RULES_FILE_SIZE: u64 = 1024 * 1024;

/// Language category names a rule may be scoped to.
const KNOWN_LANGUAGES: &[&str] = &[
    "shell",
    "json-like",
    "drivers-minus-js",
    "javascript",
    "text",
    "unknown",
];

/// Category names a rule may resolve to. Must stay in lockstep with
/// `snipcat_core::Category::as_str`.
const KNOWN_CATEGORIES: &[&str] = &[
    "Atlas CLI Command",
    "Mongosh Command",
    "Non-MongoDB Command",
    "API Method Signature",
    "Example return object",
    "Example configuration object",
    "Task-based usage",
];

fn str_field<'a>(rule: &'a serde_json::Value, idx: usize, name: &str) -> &'a str {
    rule[name]
        .as_str()
        .unwrap_or_else(|| panic!("rule[{}] must have string '{}' field", idx, name))
}

fn main() {
    let manifest_dir = env::var("CARGO_MANIFEST_DIR").unwrap();
    let rules_path = Path::new(&manifest_dir).join("rules.json");

    println!("cargo:rerun-if-changed={}", rules_path.display());

    let file_size = fs::metadata(&rules_path)
        .unwrap_or_else(|e| panic!("Failed to get metadata for {}: {}", rules_path.display(), e))
        .len();
    if file_size > MAX_RULES_FILE_SIZE {
        panic!(
            "rules.json at {} is too large ({} bytes, max {} bytes)",
            rules_path.display(),
            file_size,
            MAX_RULES_FILE_SIZE
        );
    }

    let rules_json = fs::read_to_string(&rules_path).unwrap_or_else(|e| {
        panic!(
            "Failed to read rules.json at {}: {}",
            rules_path.display(),
            e
        )
    });

    let rules: serde_json::Value = serde_json::from_str(&rules_json).unwrap_or_else(|e| {
        panic!(
            "Failed to parse rules.json at {}: {}",
            rules_path.display(),
            e
        )
    });

    let window = rules["substring_window"]
        .as_u64()
        .expect("rules.json must have a numeric 'substring_window'");
    if window == 0 {
        panic!("substring_window must be positive");
    }

    let rules_array = rules["rules"]
        .as_array()
        .expect("rules.json must have a 'rules' array");

    let escape_str = |s: &str| {
        s.replace('\\', "\\\\")
            .replace('"', "\\\"")
            .replace('\n', "\\n")
            .replace('\r', "\\r")
            .replace('\t', "\\t")
    };

    // e.g. PFX-001, SUB-013
    let is_valid_id = |id: &str| -> bool {
        !id.is_empty()
            && id.len() <= 20
            && id.chars().all(|c| c.is_ascii_alphanumeric() || c == '-')
    };

    let mut generated_code = String::new();
    generated_code.push_str("// Auto-generated from rules.json by build.rs\n");
    generated_code.push_str("// Do not edit manually!\n\n");
    generated_code.push_str(&format!(
        "/// Number of leading characters inspected by substring rules.\npub const SUBSTRING_WINDOW: usize = {};\n\n",
        window
    ));
    generated_code.push_str("/// Heuristic rules in evaluation order.\n");
    generated_code.push_str("pub const RULES_DATA: &[RuleData] = &[\n");

    let mut seen_ids = Vec::new();
    for (idx, rule) in rules_array.iter().enumerate() {
        let id = str_field(rule, idx, "id");
        let kind = str_field(rule, idx, "kind");
        let pattern = str_field(rule, idx, "pattern");
        let category = str_field(rule, idx, "category");

        if !is_valid_id(id) {
            panic!(
                "rule[{}] has invalid id '{}': must be 1-20 alphanumeric/hyphen characters",
                idx, id
            );
        }
        if seen_ids.contains(&id) {
            panic!("rule[{}] reuses id '{}'", idx, id);
        }
        seen_ids.push(id);

        let kind_variant = match kind {
            "prefix" => "RuleKind::Prefix",
            "substring" => "RuleKind::Substring",
            other => panic!("rule '{}' has unknown kind '{}'", id, other),
        };
        if pattern.is_empty() || pattern.chars().any(|c| c.is_control()) {
            panic!("rule '{}' has an empty or non-printable pattern", id);
        }
        if !KNOWN_CATEGORIES.contains(&category) {
            panic!("rule '{}' resolves to unknown category '{}'", id, category);
        }

        let languages = rule["languages"]
            .as_array()
            .unwrap_or_else(|| panic!("rule '{}' must have a 'languages' array", id));
        if languages.is_empty() {
            panic!("rule '{}' must apply to at least one language category", id);
        }
        let mut language_literals = Vec::new();
        for language in languages {
            let language = language
                .as_str()
                .unwrap_or_else(|| panic!("rule '{}' has a non-string language", id));
            if !KNOWN_LANGUAGES.contains(&language) {
                panic!("rule '{}' names unknown language category '{}'", id, language);
            }
            if kind == "substring" && language == "json-like" {
                panic!("substring rule '{}' must not apply to json-like snippets", id);
            }
            language_literals.push(format!("\"{}\"", escape_str(language)));
        }

        generated_code.push_str(&format!(
            "    RuleData {{ id: \"{}\", kind: {}, pattern: \"{}\", category: \"{}\", languages: &[{}] }},\n",
            escape_str(id),
            kind_variant,
            escape_str(pattern),
            escape_str(category),
            language_literals.join(", ")
        ));
    }

    generated_code.push_str("];\n");

    let out_dir = env::var("OUT_DIR").unwrap();
    let dest_path = Path::new(&out_dir).join("rules_data.rs");
    fs::write(&dest_path, generated_code).expect("Failed to write generated rules");
}
