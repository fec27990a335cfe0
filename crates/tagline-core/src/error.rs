//! Error types for tagline-core

use std::path::PathBuf;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("File not found: {path}")]
    NotFound { path: PathBuf },

    #[error("Not a regular file: {path}")]
    NotAFile { path: PathBuf },

    #[error("I/O error at {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Tag must not be empty")]
    EmptyTag,

    #[error("Start tag not found: {tag}")]
    StartTagNotFound { tag: String },

    #[error("End tag not found: {tag}")]
    EndTagNotFound { tag: String },

    #[error("No `{end}` tag follows a `{start}` tag")]
    TagPairMismatch { start: String, end: String },

    #[error("Invalid pattern `{pattern}`: {source}")]
    InvalidPattern {
        pattern: String,
        #[source]
        source: regex::Error,
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

impl From<tagline_fs::Error> for Error {
    fn from(err: tagline_fs::Error) -> Self {
        match err {
            tagline_fs::Error::NotFound { path } => Self::NotFound { path },
            tagline_fs::Error::NotAFile { path } => Self::NotAFile { path },
            tagline_fs::Error::Io { path, source } => Self::Io { path, source },
        }
    }
}
