//! filmlib-api-core: shared data model (library entries, NLA snapshots, curves)
//!
//! Everything that crosses a crate boundary or lands on disk lives here. The
//! serde field names are the historical on-disk names, so library files written
//! by older tools stay readable.

pub mod animation;
pub mod channel;
pub mod entry;
pub mod frames;
pub mod lenient;
pub mod live;
pub mod time;

pub use animation::{
    BlendType, CurveData, CurveSetData, Interpolation, KeyframeData, StripData, TrackData,
    TrackSetData,
};
pub use channel::Channel;
pub use entry::{LibraryEntry, MarkerData, ObjectTracks, TextBlockData, VisibilityMode};
pub use live::{LiveCurve, LiveCurveSet, LiveKeyframe};
pub use time::{format_created, now_iso8601};
