//! Error types for the store layer.

use crate::path::{Path, PathError};

/// Errors raised by document reads and mutations.
///
/// `NotFound` is an ordinary outcome on the read side; callers that answer
/// queries fold it into a `null` result. The remaining variants describe a
/// request that could not be applied, and every one of them leaves the
/// document untouched.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// Path validation error.
    #[error("path error: {0}")]
    Path(#[from] PathError),

    /// The path does not resolve to a node.
    #[error("no data at path '{path}'")]
    NotFound { path: Path },

    /// The path exists but cannot be written the requested way, e.g. it
    /// descends through a scalar or indexes past the end of a sequence.
    #[error("invalid path: {message}")]
    InvalidPath { message: String },

    /// The mutation verb is not part of the store's vocabulary.
    #[error("unknown method '{method}'")]
    UnknownMethod { method: String },

    /// The verb is known but its parameters have the wrong shape.
    #[error("invalid params: {message}")]
    InvalidParams { message: String },

    /// Generic error with message.
    #[error("{message}")]
    Other { message: String },
}

impl Error {
    pub fn invalid_params(message: impl Into<String>) -> Self {
        Error::InvalidParams {
            message: message.into(),
        }
    }

    pub fn invalid_path(message: impl Into<String>) -> Self {
        Error::InvalidPath {
            message: message.into(),
        }
    }

    /// True for the benign "nothing there" outcome.
    pub fn is_not_found(&self) -> bool {
        matches!(self, Error::NotFound { .. })
    }
}
