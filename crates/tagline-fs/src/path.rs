//! Path resolution for edit targets

use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use crate::{Error, Result};

/// An existing regular file, resolved to an absolute path.
///
/// The size is captured once at resolution time and is not refreshed
/// when the file is later rewritten.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedPath {
    path: PathBuf,
    size: u64,
}

impl ResolvedPath {
    /// Absolute path of the file.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Size in bytes when the path was resolved.
    pub fn size(&self) -> u64 {
        self.size
    }

    pub fn into_path(self) -> PathBuf {
        self.path
    }
}

/// Resolve `path` to an absolute path and record its size.
///
/// Symlinks are followed, so rewrites land on the link target rather than
/// replacing the link. Fails with [`Error::NotFound`] when nothing exists at
/// `path` and [`Error::NotAFile`] when it is a directory or other non-file.
pub fn resolve(path: impl AsRef<Path>) -> Result<ResolvedPath> {
    let path = path.as_ref();

    let absolute = dunce::canonicalize(path).map_err(|e| match e.kind() {
        ErrorKind::NotFound => Error::NotFound {
            path: path.to_path_buf(),
        },
        _ => Error::io(path, e),
    })?;

    let metadata = fs::metadata(&absolute).map_err(|e| Error::io(&absolute, e))?;
    if !metadata.is_file() {
        return Err(Error::NotAFile { path: absolute });
    }

    tracing::debug!(path = %absolute.display(), size = metadata.len(), "Resolved target");

    Ok(ResolvedPath {
        path: absolute,
        size: metadata.len(),
    })
}
