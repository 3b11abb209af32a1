//! Error types for bayesgen.
//!
//! Every failure aborts the current generation run. Nothing here is retried:
//! bad parameters are the caller's to fix, and I/O or entropy problems come
//! from outside the process.

use std::path::{Path, PathBuf};
use thiserror::Error;

/// Top-level error type for network and dataset generation.
#[derive(Debug, Error)]
pub enum GeneratorError {
    /// A parameter value is outside its allowed range. Reported before any
    /// generation work starts.
    #[error("Invalid configuration: {0}")]
    InvalidConfiguration(String),

    /// The output destination could not be removed, created or written.
    #[error("IO failure on '{}'", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The operating system could not provide entropy for the strong RNG.
    #[error("Cryptographically strong random source unavailable: {0}")]
    RandomSourceUnavailable(String),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl GeneratorError {
    /// Create an IO error tagged with the offending path.
    pub fn io(path: impl AsRef<Path>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.as_ref().to_path_buf(),
            source,
        }
    }

    pub fn invalid(message: impl Into<String>) -> Self {
        Self::InvalidConfiguration(message.into())
    }
}

/// Result type alias for bayesgen.
pub type Result<T> = std::result::Result<T, GeneratorError>;
