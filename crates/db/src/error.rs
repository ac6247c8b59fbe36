use std::path::PathBuf;

use storyline_core::error::CoreError;

/// Errors raised by the persistence layer.
#[derive(Debug, thiserror::Error)]
pub enum DbError {
    #[error("I/O error on {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Malformed project data: {0}")]
    Format(#[from] CoreError),
}

impl DbError {
    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }
}
