//! Library configuration.

use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::LibraryError;

/// Name of the text block that holds the internal document.
pub const DEFAULT_INTERNAL_TEXT_NAME: &str = "procedural_animations.json";

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LibraryConfig {
    pub internal_text_name: String,
    /// Folder of external entry files. `None` turns every external
    /// operation into a no-op that reports failure.
    pub external_folder: Option<PathBuf>,
}

impl Default for LibraryConfig {
    fn default() -> Self {
        Self {
            internal_text_name: DEFAULT_INTERNAL_TEXT_NAME.to_string(),
            external_folder: None,
        }
    }
}

impl LibraryConfig {
    pub fn with_external_folder(mut self, folder: impl Into<PathBuf>) -> Self {
        self.external_folder = Some(folder.into());
        self
    }

    pub fn from_json_str(json: &str) -> Result<Self, LibraryError> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn from_path(path: impl AsRef<Path>) -> Result<Self, LibraryError> {
        let path = path.as_ref();
        let text = fs::read_to_string(path).map_err(|e| LibraryError::io(path, e))?;
        Self::from_json_str(&text)
    }
}
