//! Source language tags and their behavioral language categories.
//!
//! A snippet's language tag comes from its file extension
//! ([`language_tag_for_path`]). The tag is then grouped into a
//! [`LanguageCategory`] ([`classify_language`]), which decides which
//! heuristic rules run and which categories the external classifier may
//! answer with.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::Path;
use std::str::FromStr;

use crate::diagnostics::{CoreError, CoreResult};

/// Canonical source language tags.
pub mod tags {
    pub const SHELL: &str = "shell";
    pub const JSON: &str = "json";
    pub const XML: &str = "xml";
    pub const YAML: &str = "yaml";
    pub const C: &str = "c";
    pub const CPP: &str = "c++";
    pub const CSHARP: &str = "c#";
    pub const GO: &str = "go";
    pub const JAVA: &str = "java";
    pub const KOTLIN: &str = "kotlin";
    pub const PHP: &str = "php";
    pub const PYTHON: &str = "python";
    pub const RUBY: &str = "ruby";
    pub const RUST: &str = "rust";
    pub const SCALA: &str = "scala";
    pub const SWIFT: &str = "swift";
    pub const TYPESCRIPT: &str = "typescript";
    pub const JAVASCRIPT: &str = "javascript";
    pub const TEXT: &str = "text";
    /// Tag for files without an extension.
    pub const NONE: &str = "none";
}

const JSON_LIKE_TAGS: &[&str] = &[tags::JSON, tags::XML, tags::YAML];

const DRIVER_TAGS: &[&str] = &[
    tags::C,
    tags::CPP,
    tags::CSHARP,
    tags::GO,
    tags::JAVA,
    tags::KOTLIN,
    tags::PHP,
    tags::PYTHON,
    tags::RUBY,
    tags::RUST,
    tags::SCALA,
    tags::SWIFT,
    tags::TYPESCRIPT,
];

/// Behavioral grouping of source language tags.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum LanguageCategory {
    Shell,
    JsonLike,
    /// Driver languages other than JavaScript.
    DriversMinusJs,
    JavaScript,
    Text,
    Unknown,
}

impl LanguageCategory {
    pub const ALL: [LanguageCategory; 6] = [
        LanguageCategory::Shell,
        LanguageCategory::JsonLike,
        LanguageCategory::DriversMinusJs,
        LanguageCategory::JavaScript,
        LanguageCategory::Text,
        LanguageCategory::Unknown,
    ];

    /// Name used by the rule table (`rules.json`).
    pub fn as_str(self) -> &'static str {
        match self {
            LanguageCategory::Shell => "shell",
            LanguageCategory::JsonLike => "json-like",
            LanguageCategory::DriversMinusJs => "drivers-minus-js",
            LanguageCategory::JavaScript => "javascript",
            LanguageCategory::Text => "text",
            LanguageCategory::Unknown => "unknown",
        }
    }
}

impl fmt::Display for LanguageCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for LanguageCategory {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        LanguageCategory::ALL
            .into_iter()
            .find(|category| category.as_str() == s)
            .ok_or_else(|| CoreError::Config(format!("unknown language category '{s}'")))
    }
}

/// Map a source language tag to its language category.
///
/// Total and deterministic: any tag outside the membership tables is
/// [`LanguageCategory::Unknown`].
pub fn classify_language(tag: &str) -> LanguageCategory {
    if tag == tags::SHELL {
        LanguageCategory::Shell
    } else if JSON_LIKE_TAGS.contains(&tag) {
        LanguageCategory::JsonLike
    } else if DRIVER_TAGS.contains(&tag) {
        LanguageCategory::DriversMinusJs
    } else if tag == tags::JAVASCRIPT {
        LanguageCategory::JavaScript
    } else if tag == tags::TEXT {
        LanguageCategory::Text
    } else {
        LanguageCategory::Unknown
    }
}

/// Like [`classify_language`], but an unmapped tag is an error the caller
/// must handle.
pub fn require_known_language(tag: &str) -> CoreResult<LanguageCategory> {
    match classify_language(tag) {
        LanguageCategory::Unknown => Err(CoreError::UnmappedLanguage {
            tag: tag.to_string(),
        }),
        category => Ok(category),
    }
}

/// Derive a source language tag from a file extension.
///
/// Unrecognized extensions pass through lowercased so that the unmapped tag
/// is visible in logs and reports.
pub fn language_tag_for_path(path: &Path) -> String {
    let Some(ext) = path.extension().and_then(|e| e.to_str()) else {
        return tags::NONE.to_string();
    };
    let ext = ext.to_ascii_lowercase();
    let tag = match ext.as_str() {
        "sh" | "bash" | "zsh" | "shell" => tags::SHELL,
        "json" => tags::JSON,
        "xml" => tags::XML,
        "yaml" | "yml" => tags::YAML,
        "c" | "h" => tags::C,
        "cpp" | "cc" | "cxx" | "hpp" => tags::CPP,
        "cs" => tags::CSHARP,
        "go" => tags::GO,
        "java" => tags::JAVA,
        "kt" | "kts" => tags::KOTLIN,
        "php" => tags::PHP,
        "py" => tags::PYTHON,
        "rb" => tags::RUBY,
        "rs" => tags::RUST,
        "scala" => tags::SCALA,
        "swift" => tags::SWIFT,
        "ts" => tags::TYPESCRIPT,
        "js" | "mjs" | "cjs" => tags::JAVASCRIPT,
        "txt" | "text" => tags::TEXT,
        _ => return ext,
    };
    tag.to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_every_known_tag_maps_to_one_category() {
        let expected = [
            (tags::SHELL, LanguageCategory::Shell),
            (tags::JSON, LanguageCategory::JsonLike),
            (tags::XML, LanguageCategory::JsonLike),
            (tags::YAML, LanguageCategory::JsonLike),
            (tags::JAVASCRIPT, LanguageCategory::JavaScript),
            (tags::TEXT, LanguageCategory::Text),
        ];
        for (tag, category) in expected {
            assert_eq!(classify_language(tag), category, "tag {tag}");
        }
        for tag in DRIVER_TAGS {
            assert_eq!(classify_language(tag), LanguageCategory::DriversMinusJs);
        }
    }

    #[test]
    fn test_membership_tables_are_disjoint() {
        for tag in JSON_LIKE_TAGS {
            assert!(!DRIVER_TAGS.contains(tag));
        }
        for tag in [tags::SHELL, tags::JAVASCRIPT, tags::TEXT] {
            assert!(!DRIVER_TAGS.contains(&tag));
            assert!(!JSON_LIKE_TAGS.contains(&tag));
        }
    }

    #[test]
    fn test_classify_is_deterministic() {
        for _ in 0..3 {
            assert_eq!(classify_language("python"), LanguageCategory::DriversMinusJs);
        }
    }

    #[test]
    fn test_unknown_tags() {
        assert_eq!(classify_language("cobol"), LanguageCategory::Unknown);
        assert_eq!(classify_language(""), LanguageCategory::Unknown);
        // Tags are matched exactly
        assert_eq!(classify_language("Shell"), LanguageCategory::Unknown);
    }

    #[test]
    fn test_require_known_surfaces_unmapped_tag() {
        assert_eq!(
            require_known_language("go").unwrap(),
            LanguageCategory::DriversMinusJs
        );
        match require_known_language("cobol") {
            Err(CoreError::UnmappedLanguage { tag }) => assert_eq!(tag, "cobol"),
            other => panic!("expected UnmappedLanguage, got {other:?}"),
        }
    }

    #[test]
    fn test_language_category_names_round_trip() {
        for category in LanguageCategory::ALL {
            assert_eq!(category.as_str().parse::<LanguageCategory>().unwrap(), category);
        }
        assert!("json".parse::<LanguageCategory>().is_err());
    }

    #[test]
    fn test_language_tag_for_path() {
        assert_eq!(language_tag_for_path(Path::new("a/b/list.sh")), "shell");
        assert_eq!(language_tag_for_path(Path::new("config.YML")), "yaml");
        assert_eq!(language_tag_for_path(Path::new("Program.cs")), "c#");
        assert_eq!(language_tag_for_path(Path::new("main.cpp")), "c++");
        assert_eq!(language_tag_for_path(Path::new("index.mjs")), "javascript");
        assert_eq!(language_tag_for_path(Path::new("notes.txt")), "text");
        assert_eq!(language_tag_for_path(Path::new("Makefile")), "none");
        assert_eq!(language_tag_for_path(Path::new("legacy.CBL")), "cbl");
    }
}
