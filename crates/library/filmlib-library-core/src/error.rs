use std::path::PathBuf;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum LibraryError {
    /// The requested entry is in neither store.
    #[error("animation not found: {0}")]
    NotFound(String),
    #[error("io error at {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),
    /// The internal document slot could not be written.
    #[error("document slot unavailable: {0}")]
    Slot(String),
}

impl LibraryError {
    pub fn is_not_found(&self) -> bool {
        matches!(self, LibraryError::NotFound(_))
    }

    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        LibraryError::Io {
            path: path.into(),
            source,
        }
    }
}
