use thiserror::Error;

/// Failures reported by a [`crate::SceneHost`].
#[derive(Debug, Clone, PartialEq, Error)]
pub enum HostError {
    #[error("object not found: {0}")]
    ObjectNotFound(String),
    #[error("curve set not found: {0}")]
    CurveSetNotFound(String),
    #[error("curve set already exists: {0}")]
    CurveSetExists(String),
    #[error("curve {data_path}[{array_index}] not found in curve set {set}")]
    CurveNotFound {
        set: String,
        data_path: String,
        array_index: i32,
    },
    #[error("object {object} has no track {track}")]
    TrackOutOfRange { object: String, track: usize },
    #[error("track {track} on {object} has no strip {strip}")]
    StripOutOfRange {
        object: String,
        track: usize,
        strip: usize,
    },
    #[error("object {0} has no animation data")]
    NoAnimation(String),
    #[error("unsupported by this host: {0}")]
    Unsupported(&'static str),
    #[error("host rejected the request: {0}")]
    Rejected(String),
}

/// Structural failures of a codec unit of work.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum CodecError {
    #[error(transparent)]
    Host(#[from] HostError),
    #[error("curve set has no usable name")]
    EmptyName,
    #[error("object not in scene: {0}")]
    MissingObject(String),
}
