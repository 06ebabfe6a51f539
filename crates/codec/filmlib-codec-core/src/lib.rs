//! filmlib-codec-core
//!
//! Converts a scene's animation state to library entries and back. The scene
//! itself is reached only through [`SceneHost`]; [`memory::MemoryHost`] is a
//! complete in-memory host for tests and headless tools.

pub mod applier;
pub mod capabilities;
pub mod cleanup;
pub mod curve_codec;
pub mod error;
pub mod host;
pub mod memory;
pub mod outcome;
pub mod snapshot;
pub mod track_codec;

pub use applier::{apply_entry, ApplyReport};
pub use cleanup::{clear_object_animation, purge_curve_sets, PurgeReport};
pub use capabilities::{Capabilities, StripField};
pub use curve_codec::{deserialize_curve_set, serialize_curve_set, CurveSetResolution};
pub use error::{CodecError, HostError};
pub use host::{
    AnimationBinding, LiveStrip, LiveTrack, ObjectInfo, ObjectKind, SceneHost, StripProperty,
    StripRef,
};
pub use memory::MemoryHost;
pub use outcome::{Outcome, SkipReason};
pub use snapshot::{capture, refresh, CaptureOptions, CaptureReport};
pub use track_codec::{deserialize_tracks, has_animatable_channels, pushdown, serialize_tracks};
