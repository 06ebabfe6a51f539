use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use filmlib_codec_core::CaptureOptions;
use filmlib_export_core::ExportConfig;
use filmlib_library_core::LibraryConfig;

/// Everything an [`crate::Orchestrator`] needs besides the host.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct OrchestratorConfig {
    pub library: LibraryConfig,
    pub export: ExportConfig,
    /// Defaults used by [`crate::Orchestrator::save`].
    pub capture: CaptureOptions,
    /// Clear animation on objects the applied entry does not mention.
    pub remove_other_animations: bool,
}

impl Default for OrchestratorConfig {
    fn default() -> Self {
        Self {
            library: LibraryConfig::default(),
            export: ExportConfig::default(),
            capture: CaptureOptions::default(),
            remove_other_animations: true,
        }
    }
}

impl OrchestratorConfig {
    pub fn from_json_str(json: &str) -> Result<Self> {
        let cfg: Self = serde_json::from_str(json).context("parsing orchestrator config")?;
        cfg.export.validate()?;
        Ok(cfg)
    }

    pub fn from_path(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let text = fs::read_to_string(path)
            .with_context(|| format!("reading config {}", path.display()))?;
        Self::from_json_str(&text)
    }
}
