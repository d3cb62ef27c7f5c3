//! Classifier fallback adapter.
//!
//! Snippets the heuristics cannot place are handed to an
//! [`ExternalClassifier`] together with the candidate categories that make
//! sense for their language category. The classifier is probabilistic and
//! may answer outside the vocabulary, so the adapter runs a small validation
//! state machine:
//!
//! ```text
//! Pending(n) --valid answer--> ValidResult(category, n + 1)
//! Pending(n) --invalid answer or error--> Pending(n + 1) | ExhaustedInvalid(max)
//! ```
//!
//! Errors from the classifier (unreachable service, timeout) consume an
//! attempt exactly like an out-of-vocabulary answer. There is no backoff.

use std::time::Duration;

use thiserror::Error;

use crate::category::{Category, ClassificationOutcome};
use crate::diagnostics::{CoreError, CoreResult};
use crate::language::LanguageCategory;

/// Upper bound on classifier invocations per snippet.
pub const MAX_ATTEMPTS: u32 = 3;

const SHELL_CANDIDATES: &[Category] = &[
    Category::NonMongoCommand,
    Category::AtlasCliCommand,
    Category::MongoshCommand,
    Category::ExampleReturnObject,
    Category::ExampleConfigurationObject,
];

const JSON_LIKE_CANDIDATES: &[Category] = &[
    Category::ExampleReturnObject,
    Category::ExampleConfigurationObject,
];

const DRIVER_CANDIDATES: &[Category] = &[
    Category::ApiMethodSignature,
    Category::UsageExample,
    Category::ExampleConfigurationObject,
];

/// Categories the external classifier may answer with for a language
/// category. Empty for [`LanguageCategory::Unknown`].
pub fn candidate_categories(language: LanguageCategory) -> &'static [Category] {
    match language {
        LanguageCategory::Shell | LanguageCategory::Text => SHELL_CANDIDATES,
        LanguageCategory::JsonLike => JSON_LIKE_CANDIDATES,
        LanguageCategory::DriversMinusJs | LanguageCategory::JavaScript => DRIVER_CANDIDATES,
        LanguageCategory::Unknown => &[],
    }
}

/// Question posed to the external classifier.
#[derive(Debug, Clone, Copy)]
pub struct ClassificationRequest<'a> {
    pub content: &'a str,
    pub language: LanguageCategory,
    pub candidates: &'a [Category],
}

impl<'a> ClassificationRequest<'a> {
    pub fn new(content: &'a str, language: LanguageCategory) -> Self {
        Self {
            content,
            language,
            candidates: candidate_categories(language),
        }
    }

    /// `(name, definition)` pairs in the order they are offered.
    pub fn candidate_definitions(&self) -> impl Iterator<Item = (&'static str, &'static str)> + 'a {
        self.candidates
            .iter()
            .map(|category| (category.as_str(), category.definition()))
    }

    /// Map a raw answer to a candidate. Surrounding whitespace is ignored;
    /// everything else must match a candidate name exactly.
    pub fn accept(&self, answer: &str) -> Option<Category> {
        let answer = answer.trim();
        self.candidates
            .iter()
            .copied()
            .find(|category| category.as_str() == answer)
    }
}

/// Failures of the external classifier. All of them are recoverable per
/// snippet.
#[derive(Error, Debug)]
pub enum ClassifierError {
    #[error("classifier unavailable: {0}")]
    Unavailable(String),

    #[error("classifier timed out after {0:?}")]
    Timeout(Duration),

    #[error("classifier returned HTTP {status}: {message}")]
    Http { status: u16, message: String },

    #[error("malformed classifier response: {0}")]
    Malformed(String),

    #[error("external classifier is disabled")]
    Disabled,
}

/// A text-classification capability that answers with free text.
///
/// Implementations must be safe to call from several worker threads at once
/// and should bound each call with their own timeout.
pub trait ExternalClassifier: Send + Sync {
    fn classify(&self, request: &ClassificationRequest<'_>) -> Result<String, ClassifierError>;

    /// Short name for logs. Defaults to the unqualified type name.
    fn name(&self) -> &str {
        let full = std::any::type_name::<Self>();
        full.rsplit("::").next().unwrap_or(full)
    }
}

/// Classifier that always fails with [`ClassifierError::Disabled`].
#[derive(Debug, Clone, Copy, Default)]
pub struct DisabledClassifier;

impl ExternalClassifier for DisabledClassifier {
    fn classify(&self, _request: &ClassificationRequest<'_>) -> Result<String, ClassifierError> {
        Err(ClassifierError::Disabled)
    }
}

/// State of the retry-until-valid loop.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FallbackState {
    /// `attempts` invocations made so far, none valid.
    Pending { attempts: u32 },
    ValidResult { category: Category, attempts: u32 },
    ExhaustedInvalid { attempts: u32 },
}

impl FallbackState {
    pub fn start() -> Self {
        FallbackState::Pending { attempts: 0 }
    }

    pub fn is_terminal(&self) -> bool {
        !matches!(self, FallbackState::Pending { .. })
    }

    /// Advance by one classifier answer. Terminal states absorb further
    /// input unchanged.
    pub fn advance(self, accepted: Option<Category>, max_attempts: u32) -> Self {
        let FallbackState::Pending { attempts } = self else {
            return self;
        };
        let attempts = attempts + 1;
        match accepted {
            Some(category) => FallbackState::ValidResult { category, attempts },
            None if attempts >= max_attempts => FallbackState::ExhaustedInvalid { attempts },
            None => FallbackState::Pending { attempts },
        }
    }

    /// Outcome for a terminal state.
    pub fn outcome(&self) -> Option<ClassificationOutcome> {
        match *self {
            FallbackState::Pending { .. } => None,
            FallbackState::ValidResult { category, attempts } => {
                Some(ClassificationOutcome::external(category, attempts))
            }
            FallbackState::ExhaustedInvalid { attempts } => Some(ClassificationOutcome::external(
                Category::Uncategorized,
                attempts,
            )),
        }
    }
}

/// Wraps an [`ExternalClassifier`] with the bounded validation loop.
pub struct FallbackAdapter<'a, C: ExternalClassifier + ?Sized> {
    classifier: &'a C,
}

impl<'a, C: ExternalClassifier + ?Sized> FallbackAdapter<'a, C> {
    pub fn new(classifier: &'a C) -> Self {
        Self { classifier }
    }

    /// Ask the external classifier until it gives a valid candidate or the
    /// attempts run out.
    ///
    /// Fails only when the language category offers no candidates.
    pub fn classify_via_external_service(
        &self,
        content: &str,
        language: LanguageCategory,
    ) -> CoreResult<ClassificationOutcome> {
        let request = ClassificationRequest::new(content, language);
        if request.candidates.is_empty() {
            return Err(CoreError::NoCandidates(language));
        }

        let mut state = FallbackState::start();
        loop {
            if let Some(outcome) = state.outcome() {
                return Ok(outcome);
            }
            let accepted = match self.classifier.classify(&request) {
                Ok(answer) => {
                    let accepted = request.accept(&answer);
                    if accepted.is_none() {
                        tracing::debug!(
                            classifier = self.classifier.name(),
                            language = %language,
                            "answer outside candidate set: {:?}",
                            answer
                        );
                    }
                    accepted
                }
                Err(ClassifierError::Disabled) => {
                    tracing::debug!(classifier = self.classifier.name(), "classifier disabled");
                    None
                }
                Err(e) => {
                    tracing::warn!(classifier = self.classifier.name(), "{}", e);
                    None
                }
            };
            state = state.advance(accepted, MAX_ATTEMPTS);
        }
    }
}
