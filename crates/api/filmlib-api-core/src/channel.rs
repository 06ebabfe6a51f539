//! Channel access shared by the codec and the clip baker.
//!
//! A channel is either a live host curve or a serialized curve from a library
//! entry. Both are read through the same accessors; the variant decides which
//! extraction runs.

use crate::animation::CurveData;
use crate::live::LiveCurve;

pub const LOCATION: &str = "location";
pub const DELTA_LOCATION: &str = "delta_location";
pub const ROTATION_EULER: &str = "rotation_euler";
pub const ROTATION_QUATERNION: &str = "rotation_quaternion";
pub const SCALE: &str = "scale";
pub const COLOR: &str = "color";
/// Opacity custom property.
pub const OPACITY: &str = "[\"alpha\"]";
/// Fade custom property, exported as `userData.fade`.
pub const FADE: &str = "[\"fade\"]";

/// Paths that make an object worth saving.
pub const ANIMATABLE_PATHS: [&str; 6] = [
    LOCATION,
    ROTATION_EULER,
    ROTATION_QUATERNION,
    SCALE,
    COLOR,
    OPACITY,
];

pub fn is_animatable_path(data_path: &str) -> bool {
    ANIMATABLE_PATHS.contains(&data_path)
}

#[derive(Clone, Copy, Debug)]
pub enum Channel<'a> {
    Live(&'a LiveCurve),
    Serialized(&'a CurveData),
}

impl<'a> Channel<'a> {
    pub fn data_path(&self) -> &'a str {
        match self {
            Channel::Live(c) => &c.data_path,
            Channel::Serialized(c) => &c.data_path,
        }
    }

    pub fn array_index(&self) -> i32 {
        match self {
            Channel::Live(c) => c.array_index,
            Channel::Serialized(c) => c.array_index,
        }
    }

    pub fn matches(&self, data_path: &str, array_index: i32) -> bool {
        self.data_path() == data_path && self.array_index() == array_index
    }

    /// `(frame, value)` pairs sorted by frame. Malformed serialized points are skipped.
    pub fn keyframes(&self) -> Vec<(f64, f64)> {
        let mut pts = match self {
            Channel::Live(c) => live_keyframes(c),
            Channel::Serialized(c) => serialized_keyframes(c),
        };
        pts.sort_by(|a, b| a.0.total_cmp(&b.0));
        pts
    }

    /// Like [`Channel::keyframes`] but limited to `start..=end`.
    pub fn keyframes_in(&self, start: f64, end: f64) -> Vec<(f64, f64)> {
        let mut pts = self.keyframes();
        pts.retain(|(f, _)| *f >= start && *f <= end);
        pts
    }
}

fn live_keyframes(curve: &LiveCurve) -> Vec<(f64, f64)> {
    curve
        .keyframes
        .iter()
        .filter(|k| k.frame.is_finite() && k.value.is_finite())
        .map(|k| (k.frame, k.value))
        .collect()
}

fn serialized_keyframes(curve: &CurveData) -> Vec<(f64, f64)> {
    curve
        .points
        .iter()
        .filter_map(|k| k.frame_value())
        .collect()
}

/// Keyframes of the first channel matching `(data_path, array_index)`.
pub fn find_keyframes<'a>(
    channels: impl IntoIterator<Item = Channel<'a>>,
    data_path: &str,
    array_index: i32,
) -> Vec<(f64, f64)> {
    channels
        .into_iter()
        .find(|c| c.matches(data_path, array_index))
        .map(|c| c.keyframes())
        .unwrap_or_default()
}
