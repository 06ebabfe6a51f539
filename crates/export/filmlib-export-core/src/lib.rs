//! filmlib-export-core
//!
//! Bakes a stored library entry into a flattened clip for a three.js player:
//! vector position tracks on key frames, fixed-step quaternion tracks,
//! step-held `userData.fade` tracks, clamped alpha tracks and an annotation
//! tree pairing timeline markers with an outline text.

pub mod annotations;
pub mod bake;
pub mod clip;
pub mod config;
pub mod error;
pub mod keys;
pub mod quat;
pub mod sampling;

pub use annotations::build_tree;
pub use bake::{bake_clip, is_camera, node_id};
pub use clip::{AlphaTrack, AnnotationNode, Clip, ClipTrack, TrackKind};
pub use config::ExportConfig;
pub use error::ExportError;
pub use sampling::FrameGuard;
