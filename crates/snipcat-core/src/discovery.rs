//! Snippet file discovery.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use ignore::WalkBuilder;

use crate::config::SnipcatConfig;
use crate::diagnostics::{CoreError, CoreResult};

/// `*` stays within one path component; use `**` to cross directories.
const EXCLUDE_MATCH_OPTIONS: glob::MatchOptions = glob::MatchOptions {
    case_sensitive: true,
    require_literal_separator: true,
    require_literal_leading_dot: false,
};

/// Path of `entry_path` relative to `root`, with forward slashes.
pub fn normalize_rel_path(entry_path: &Path, root: &Path) -> String {
    let rel_path = entry_path.strip_prefix(root).unwrap_or(entry_path);
    let path_str = rel_path.to_string_lossy().replace('\\', "/");
    match path_str.strip_prefix("./") {
        Some(stripped) => stripped.to_string(),
        None => path_str,
    }
}

fn is_excluded(rel_path: &str, patterns: &[glob::Pattern]) -> bool {
    patterns
        .iter()
        .any(|p| p.matches_with(rel_path, EXCLUDE_MATCH_OPTIONS))
}

fn should_prune_dir(rel_dir: &str, patterns: &[glob::Pattern]) -> bool {
    if rel_dir.is_empty() {
        return false;
    }
    // Only `<prefix>/**` patterns exclude a whole subtree. The probe name must
    // not look like anything a file glob would target.
    let probe = format!("{}/__snipcat_probe__", rel_dir.trim_end_matches('/'));
    patterns.iter().any(|p| {
        p.matches_with(rel_dir, EXCLUDE_MATCH_OPTIONS)
            || (p.as_str().ends_with("/**") && p.matches_with(&probe, EXCLUDE_MATCH_OPTIONS))
    })
}

/// Collect every snippet file under `root`, sorted.
///
/// Hidden files and directories are skipped, as are paths matching the
/// configured exclude globs. A missing root invalidates the run.
pub fn discover_snippet_files(root: &Path, config: &SnipcatConfig) -> CoreResult<Vec<PathBuf>> {
    if !root.is_dir() {
        return Err(CoreError::RootNotFound {
            path: root.to_path_buf(),
        });
    }
    let patterns = Arc::new(config.exclude_patterns()?);
    let root_path = root.to_path_buf();

    let mut files: Vec<PathBuf> = WalkBuilder::new(root)
        .hidden(true)
        .git_ignore(false)
        .git_global(false)
        .git_exclude(false)
        .ignore(false)
        .parents(false)
        .filter_entry({
            let patterns = Arc::clone(&patterns);
            let root_path = root_path.clone();
            move |entry| {
                if entry.file_type().is_some_and(|ft| ft.is_dir()) {
                    let rel = normalize_rel_path(entry.path(), &root_path);
                    return !should_prune_dir(&rel, &patterns);
                }
                true
            }
        })
        .build()
        .filter_map(|entry| match entry {
            Ok(entry) => Some(entry),
            Err(e) => {
                tracing::warn!("Skipping unreadable directory entry: {}", e);
                None
            }
        })
        .filter(|entry| entry.file_type().is_some_and(|ft| ft.is_file()))
        .map(|entry| entry.into_path())
        .filter(|path| !is_excluded(&normalize_rel_path(path, &root_path), &patterns))
        .collect();

    files.sort();
    tracing::debug!(count = files.len(), root = %root.display(), "discovered snippet files");
    Ok(files)
}
