use thiserror::Error;

#[derive(Debug, Error)]
pub enum ExportError {
    #[error("invalid export config: {0}")]
    InvalidConfig(&'static str),
    /// Neither the entry nor the scene has a usable frame range.
    #[error("no frame range for clip {0}")]
    NoFrameRange(String),
    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),
}
