//! Error types for conf-store

use std::path::PathBuf;

/// Result type for conf-store operations
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur in conf-store operations
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("I/O error at {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("reload required but {path} is unreadable: {source}")]
    StaleRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("unsupported config format: {extension}")]
    UnsupportedFormat { extension: String },

    #[error("invalid key path: {path}")]
    InvalidPath { path: String },

    #[error("lock acquisition failed for {path}")]
    LockFailed { path: PathBuf },

    #[error(transparent)]
    Format(#[from] conf_format::Error),
}

impl Error {
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }
}
