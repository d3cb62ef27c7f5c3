//! Filesystem abstraction for snippet loading.
//!
//! Production code reads through [`RealFileSystem`]; unit tests use
//! `mock::MockFileSystem` to avoid touching disk:
//!
//! ```ignore
//! let mut mock = MockFileSystem::new();
//! mock.add_file("docs/list.sh", "atlas clusters list");
//! let snippet = Snippet::load(&mock, Path::new("docs/list.sh"), 1024)?;
//! ```

use std::fs;
use std::io;
use std::path::Path;

use crate::diagnostics::{CoreError, CoreResult};

/// Filesystem operations needed to load snippets.
pub trait FileSystem: Send + Sync + std::fmt::Debug {
    /// Read a file as UTF-8.
    ///
    /// Implementations reject symlinks and non-regular files, and refuse
    /// files larger than `size_limit` bytes.
    fn read_file(&self, path: &Path, size_limit: u64) -> CoreResult<String>;
}

#[derive(Debug, Clone, Copy, Default)]
pub struct RealFileSystem;

impl FileSystem for RealFileSystem {
    fn read_file(&self, path: &Path, size_limit: u64) -> CoreResult<String> {
        safe_read_file(path, size_limit)
    }
}

/// Read a regular file, checking its metadata without following symlinks.
pub fn safe_read_file(path: &Path, size_limit: u64) -> CoreResult<String> {
    let read_err = |source: io::Error| CoreError::FileRead {
        path: path.to_path_buf(),
        source,
    };

    let metadata = fs::symlink_metadata(path).map_err(read_err)?;
    if metadata.file_type().is_symlink() {
        return Err(CoreError::FileSymlink {
            path: path.to_path_buf(),
        });
    }
    if !metadata.is_file() {
        return Err(CoreError::FileNotRegular {
            path: path.to_path_buf(),
        });
    }
    if metadata.len() > size_limit {
        return Err(CoreError::FileTooBig {
            path: path.to_path_buf(),
            size: metadata.len(),
            limit: size_limit,
        });
    }

    fs::read_to_string(path).map_err(read_err)
}
