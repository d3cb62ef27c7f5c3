//! Snippet categories and classification outcomes.
//!
//! The display name of a [`Category`] is the vocabulary exchanged with the
//! external classifier: the question lists these names and an answer is only
//! accepted when it is one of them.

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::str::FromStr;

/// Content type of a documentation snippet.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Category {
    AtlasCliCommand,
    MongoshCommand,
    NonMongoCommand,
    ApiMethodSignature,
    ExampleReturnObject,
    ExampleConfigurationObject,
    UsageExample,
    Uncategorized,
}

impl Category {
    pub const ALL: [Category; 8] = [
        Category::AtlasCliCommand,
        Category::MongoshCommand,
        Category::NonMongoCommand,
        Category::ApiMethodSignature,
        Category::ExampleReturnObject,
        Category::ExampleConfigurationObject,
        Category::UsageExample,
        Category::Uncategorized,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Category::AtlasCliCommand => "Atlas CLI Command",
            Category::MongoshCommand => "Mongosh Command",
            Category::NonMongoCommand => "Non-MongoDB Command",
            Category::ApiMethodSignature => "API Method Signature",
            Category::ExampleReturnObject => "Example return object",
            Category::ExampleConfigurationObject => "Example configuration object",
            Category::UsageExample => "Task-based usage",
            Category::Uncategorized => "Uncategorized",
        }
    }

    /// Definition given to the external classifier alongside the name.
    pub fn definition(self) -> &'static str {
        match self {
            Category::AtlasCliCommand => {
                "One line or only a few lines of code that shows an Atlas CLI command. Must start with 'atlas ' at the beginning of the snippet or after a comment. If 'atlas ' appears anywhere that does not immediately follow a newline, it is not an Atlas CLI Command."
            }
            Category::MongoshCommand => {
                "One line or only a few lines of code that shows a mongosh function call, similar to 'db.methodName(arguments)' or 'collection.methodName(arguments)'."
            }
            Category::NonMongoCommand => {
                "One line or only a few lines of code that demonstrate popular command-line commands, such as 'docker ', 'go run', 'jq ', 'vi ', 'mkdir ', 'npm ', 'cd ' or other common command-line command invocations. If it starts with 'atlas ' it is an Atlas CLI Command. If it starts with 'mongosh ' it is a Mongosh Command."
            }
            Category::ApiMethodSignature => {
                "One line that shows an API method signature, such as 'object.methodName(parameter1, parameter2)'. Code blocks showing 'main()' or other function declarations are not API method signatures; they are task-based usage. JSON blobs are not API method signatures."
            }
            Category::ExampleReturnObject => {
                "An example object, typically represented in JSON, enumerating fields in a return object and their types. Typically includes an '_id' field and represents one or more example documents. Text logged to console, such as an error or short status message like 'Backup completed.', also belongs here."
            }
            Category::ExampleConfigurationObject => {
                "Example configuration object, typically represented in JSON or YAML, enumerating required/optional parameters and their types. If it shows an '_id' field, it is a return object, not a configuration object."
            }
            Category::UsageExample => {
                "Longer code snippet that establishes parameters, performs basic set up code, and includes the larger context to demonstrate how to accomplish a task. If an example shows parameters but does not show initializing parameters, it does not fit this category. JSON blobs do not fit in this category."
            }
            Category::Uncategorized => "No other category applies.",
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error returned when a string is not a category name.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("'{0}' is not a category name")]
pub struct UnknownCategory(pub String);

impl FromStr for Category {
    type Err = UnknownCategory;

    /// Exact, case-sensitive match against [`Category::as_str`].
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Category::ALL
            .into_iter()
            .find(|category| category.as_str() == s)
            .ok_or_else(|| UnknownCategory(s.to_string()))
    }
}

impl Serialize for Category {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for Category {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let name = String::deserialize(deserializer)?;
        name.parse().map_err(serde::de::Error::custom)
    }
}

/// How a snippet's category was decided.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ClassificationMethod {
    StringMatch,
    ExternalClassifier,
}

/// Result of classifying one snippet.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClassificationOutcome {
    pub category: Category,
    pub method: ClassificationMethod,
    /// Number of decision attempts; always at least 1. Heuristic matches
    /// count as a single attempt.
    pub attempts: u32,
}

impl ClassificationOutcome {
    pub fn string_match(category: Category) -> Self {
        Self {
            category,
            method: ClassificationMethod::StringMatch,
            attempts: 1,
        }
    }

    pub fn external(category: Category, attempts: u32) -> Self {
        Self {
            category,
            method: ClassificationMethod::ExternalClassifier,
            attempts,
        }
    }

    pub fn is_string_match(&self) -> bool {
        self.method == ClassificationMethod::StringMatch
    }
}
