//! Run configuration

use std::path::{Path, PathBuf};

use anyhow::Context;
use serde::{Deserialize, Serialize};

use crate::diagnostics::{CoreError, CoreResult};
use crate::fs::safe_read_file;

/// Default configuration file name looked up in the snippet root.
pub const CONFIG_FILE_NAME: &str = ".snipcat.toml";

/// Default per-file size limit in bytes.
pub const DEFAULT_MAX_FILE_SIZE: u64 = 1024 * 1024;

const MAX_CONFIG_SIZE: u64 = 256 * 1024;

/// External classifier connection settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ClassifierConfig {
    /// Base URL of the Ollama server.
    pub endpoint: String,
    pub model: String,
    /// Per-request timeout. A timed out request consumes one attempt.
    pub timeout_secs: u64,
}

impl Default for ClassifierConfig {
    fn default() -> Self {
        Self {
            endpoint: "http://localhost:11434".to_string(),
            model: "qwen2.5-coder".to_string(),
            timeout_secs: 60,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RuleConfig {
    /// Heuristic rule IDs to skip (e.g. `"PFX-014"`).
    pub disabled_rules: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SnipcatConfig {
    /// Report sub-directory name under `output_dir`.
    pub project_name: String,
    pub output_dir: PathBuf,
    /// Glob patterns, relative to the snippet root, to leave out.
    pub exclude: Vec<String>,
    pub max_file_size: u64,
    /// Flag snippets whose content duplicates an earlier one.
    pub dedup: bool,
    pub classifier: ClassifierConfig,
    pub rules: RuleConfig,
}

impl Default for SnipcatConfig {
    fn default() -> Self {
        Self {
            project_name: "snippets".to_string(),
            output_dir: PathBuf::from("output"),
            exclude: vec![".git/**".to_string()],
            max_file_size: DEFAULT_MAX_FILE_SIZE,
            dedup: true,
            classifier: ClassifierConfig::default(),
            rules: RuleConfig::default(),
        }
    }
}

/// Non-fatal configuration problem.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConfigWarning {
    pub field: String,
    pub message: String,
}

impl SnipcatConfig {
    /// Load config from file
    pub fn load<P: AsRef<Path>>(path: P) -> anyhow::Result<Self> {
        let path = path.as_ref();
        let content = safe_read_file(path, MAX_CONFIG_SIZE)?;
        let config = toml::from_str(&content)
            .with_context(|| format!("Failed to parse {}", path.display()))?;
        Ok(config)
    }

    /// Load config or fall back to defaults.
    ///
    /// A path that cannot be loaded yields the default config plus a warning
    /// describing why, so typos in the file are not silently ignored.
    pub fn load_or_default(path: Option<&Path>) -> (Self, Option<String>) {
        match path {
            Some(p) => match Self::load(p) {
                Ok(config) => (config, None),
                Err(e) => (
                    Self::default(),
                    Some(format!(
                        "Could not load config {}: {:#}. Using defaults.",
                        p.display(),
                        e
                    )),
                ),
            },
            None => (Self::default(), None),
        }
    }

    /// Compile the exclude globs. A trailing `/` means "everything under
    /// this directory".
    pub fn exclude_patterns(&self) -> CoreResult<Vec<glob::Pattern>> {
        self.exclude
            .iter()
            .map(|pattern| {
                let normalized = pattern.replace('\\', "/");
                let normalized = match normalized.strip_suffix('/') {
                    Some(dir) => format!("{dir}/**"),
                    None => normalized,
                };
                glob::Pattern::new(&normalized).map_err(|e| CoreError::InvalidExcludePattern {
                    pattern: pattern.clone(),
                    message: e.msg.to_string(),
                })
            })
            .collect()
    }

    /// Check settings that would invalidate the whole run. Unknown rule IDs
    /// are reported as warnings only.
    pub fn validate(&self) -> CoreResult<Vec<ConfigWarning>> {
        self.exclude_patterns()?;

        if self.project_name.trim().is_empty() {
            return Err(CoreError::Config("project_name must not be empty".into()));
        }
        if self.project_name.contains(['/', '\\']) || self.project_name == ".." {
            return Err(CoreError::Config(format!(
                "project_name '{}' must be a single path component",
                self.project_name
            )));
        }
        if self.max_file_size == 0 {
            return Err(CoreError::Config("max_file_size must be positive".into()));
        }
        if self.classifier.timeout_secs == 0 {
            return Err(CoreError::Config(
                "classifier.timeout_secs must be positive".into(),
            ));
        }

        let warnings = self
            .rules
            .disabled_rules
            .iter()
            .filter(|id| snipcat_rules::get_rule(id).is_none())
            .map(|id| ConfigWarning {
                field: "rules.disabled_rules".to_string(),
                message: format!("Unknown rule ID '{id}'"),
            })
            .collect();
        Ok(warnings)
    }

    /// Directory the reports for this run are written to.
    pub fn report_dir(&self) -> PathBuf {
        self.output_dir.join(&self.project_name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_defaults() {
        let config = SnipcatConfig::default();
        assert_eq!(config.max_file_size, 1_048_576);
        assert_eq!(config.classifier.endpoint, "http://localhost:11434");
        assert!(config.dedup);
        assert_eq!(config.report_dir(), PathBuf::from("output/snippets"));
        assert!(config.validate().unwrap().is_empty());
    }

    #[test]
    fn test_partial_toml_keeps_defaults() {
        let config: SnipcatConfig = toml::from_str(
            r#"
project_name = "atlas-docs"

[classifier]
model = "llama3"

[rules]
disabled_rules = ["PFX-024"]
"#,
        )
        .unwrap();
        assert_eq!(config.project_name, "atlas-docs");
        assert_eq!(config.classifier.model, "llama3");
        assert_eq!(config.classifier.timeout_secs, 60);
        assert_eq!(config.exclude, vec![".git/**".to_string()]);
        assert_eq!(config.rules.disabled_rules, vec!["PFX-024".to_string()]);
    }

    #[test]
    fn test_invalid_exclude_pattern() {
        let config = SnipcatConfig {
            exclude: vec!["[unclosed".to_string()],
            ..SnipcatConfig::default()
        };
        assert!(matches!(
            config.validate(),
            Err(CoreError::InvalidExcludePattern { .. })
        ));
    }

    #[test]
    fn test_project_name_must_be_component() {
        let config = SnipcatConfig {
            project_name: "../elsewhere".to_string(),
            ..SnipcatConfig::default()
        };
        assert!(matches!(config.validate(), Err(CoreError::Config(_))));
    }

    #[test]
    fn test_unknown_disabled_rule_warns() {
        let config = SnipcatConfig {
            rules: RuleConfig {
                disabled_rules: vec!["PFX-001".into(), "NOPE-1".into()],
            },
            ..SnipcatConfig::default()
        };
        let warnings = config.validate().unwrap();
        assert_eq!(warnings.len(), 1);
        assert!(warnings[0].message.contains("NOPE-1"));
    }

    #[test]
    fn test_load_or_default_reports_parse_error() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join(CONFIG_FILE_NAME);
        std::fs::write(&path, "project_name = [").unwrap();

        let (config, warning) = SnipcatConfig::load_or_default(Some(path.as_path()));
        assert_eq!(config, SnipcatConfig::default());
        assert!(warning.unwrap().contains(".snipcat.toml"));
    }

    #[test]
    fn test_load_from_file() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join(CONFIG_FILE_NAME);
        std::fs::write(&path, "dedup = false\nmax_file_size = 10\n").unwrap();

        let config = SnipcatConfig::load(&path).unwrap();
        assert!(!config.dedup);
        assert_eq!(config.max_file_size, 10);
    }
}
