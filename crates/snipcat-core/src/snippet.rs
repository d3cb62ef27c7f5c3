//! Snippet values.

use std::path::{Path, PathBuf};

use crate::diagnostics::CoreResult;
use crate::fs::FileSystem;
use crate::language::{LanguageCategory, classify_language, language_tag_for_path};

/// One extracted block of documentation code, tagged with its source
/// language. Immutable once created.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Snippet {
    content: String,
    language_tag: String,
    origin: PathBuf,
}

impl Snippet {
    pub fn new(
        content: impl Into<String>,
        language_tag: impl Into<String>,
        origin: impl Into<PathBuf>,
    ) -> Self {
        Self {
            content: content.into(),
            language_tag: language_tag.into(),
            origin: origin.into(),
        }
    }

    /// Read a snippet file, deriving the language tag from its extension.
    pub fn load(fs: &dyn FileSystem, path: &Path, size_limit: u64) -> CoreResult<Self> {
        let content = fs.read_file(path, size_limit)?;
        Ok(Self::new(content, language_tag_for_path(path), path))
    }

    pub fn content(&self) -> &str {
        &self.content
    }

    pub fn language_tag(&self) -> &str {
        &self.language_tag
    }

    pub fn origin(&self) -> &Path {
        &self.origin
    }

    pub fn language_category(&self) -> LanguageCategory {
        classify_language(&self.language_tag)
    }
}
