//! Error types for tagline-fs

use std::path::PathBuf;

/// Result type for tagline-fs operations
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur in tagline-fs operations
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("Path not found: {path}")]
    NotFound { path: PathBuf },

    #[error("Not a regular file: {path}")]
    NotAFile { path: PathBuf },

    #[error("I/O error at {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl Error {
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }
}
