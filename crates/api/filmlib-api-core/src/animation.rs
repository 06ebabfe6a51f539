//! Serialized NLA snapshot: curve sets, tracks and strips as stored in a library entry.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::lenient::{number, or_default, valid_items};

/// Per-keyframe interpolation mode.
///
/// Names the host does not know yet are carried verbatim in `Other` so an
/// entry written by a newer host still loads.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum Interpolation {
    Constant,
    Linear,
    Bezier,
    Sine,
    Quad,
    Cubic,
    Quart,
    Quint,
    Expo,
    Circ,
    Back,
    Bounce,
    Elastic,
    Other(String),
}

impl Interpolation {
    pub fn as_str(&self) -> &str {
        match self {
            Interpolation::Constant => "CONSTANT",
            Interpolation::Linear => "LINEAR",
            Interpolation::Bezier => "BEZIER",
            Interpolation::Sine => "SINE",
            Interpolation::Quad => "QUAD",
            Interpolation::Cubic => "CUBIC",
            Interpolation::Quart => "QUART",
            Interpolation::Quint => "QUINT",
            Interpolation::Expo => "EXPO",
            Interpolation::Circ => "CIRC",
            Interpolation::Back => "BACK",
            Interpolation::Bounce => "BOUNCE",
            Interpolation::Elastic => "ELASTIC",
            Interpolation::Other(name) => name,
        }
    }
}

impl Default for Interpolation {
    fn default() -> Self {
        Interpolation::Bezier
    }
}

impl From<String> for Interpolation {
    fn from(name: String) -> Self {
        match name.as_str() {
            "CONSTANT" => Interpolation::Constant,
            "LINEAR" => Interpolation::Linear,
            "BEZIER" => Interpolation::Bezier,
            "SINE" => Interpolation::Sine,
            "QUAD" => Interpolation::Quad,
            "CUBIC" => Interpolation::Cubic,
            "QUART" => Interpolation::Quart,
            "QUINT" => Interpolation::Quint,
            "EXPO" => Interpolation::Expo,
            "CIRC" => Interpolation::Circ,
            "BACK" => Interpolation::Back,
            "BOUNCE" => Interpolation::Bounce,
            "ELASTIC" => Interpolation::Elastic,
            _ => Interpolation::Other(name),
        }
    }
}

impl From<&str> for Interpolation {
    fn from(name: &str) -> Self {
        Interpolation::from(name.to_string())
    }
}

impl From<Interpolation> for String {
    fn from(value: Interpolation) -> Self {
        match value {
            Interpolation::Other(name) => name,
            known => known.as_str().to_string(),
        }
    }
}

impl fmt::Display for Interpolation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// How a strip's result is combined with the tracks below it.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum BlendType {
    Replace,
    Combine,
    Add,
    Subtract,
    Multiply,
    Other(String),
}

impl BlendType {
    pub fn as_str(&self) -> &str {
        match self {
            BlendType::Replace => "REPLACE",
            BlendType::Combine => "COMBINE",
            BlendType::Add => "ADD",
            BlendType::Subtract => "SUBTRACT",
            BlendType::Multiply => "MULTIPLY",
            BlendType::Other(name) => name,
        }
    }
}

impl Default for BlendType {
    fn default() -> Self {
        BlendType::Replace
    }
}

impl From<String> for BlendType {
    fn from(name: String) -> Self {
        match name.as_str() {
            "REPLACE" => BlendType::Replace,
            "COMBINE" => BlendType::Combine,
            "ADD" => BlendType::Add,
            "SUBTRACT" => BlendType::Subtract,
            "MULTIPLY" => BlendType::Multiply,
            _ => BlendType::Other(name),
        }
    }
}

impl From<BlendType> for String {
    fn from(value: BlendType) -> Self {
        match value {
            BlendType::Other(name) => name,
            known => known.as_str().to_string(),
        }
    }
}

/// One keyframe. `co` is `[frame, value]`; anything shorter is treated as
/// malformed and skipped by readers instead of failing the entry.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct KeyframeData {
    #[serde(default, deserialize_with = "or_default")]
    pub co: Vec<f64>,
    #[serde(
        default,
        deserialize_with = "or_default",
        skip_serializing_if = "Option::is_none"
    )]
    pub interpolation: Option<Interpolation>,
}

impl KeyframeData {
    pub fn new(frame: f64, value: f64, interpolation: Interpolation) -> Self {
        Self {
            co: vec![frame, value],
            interpolation: Some(interpolation),
        }
    }

    /// `(frame, value)` when `co` is well formed.
    pub fn frame_value(&self) -> Option<(f64, f64)> {
        match self.co.as_slice() {
            [frame, value, ..] if frame.is_finite() && value.is_finite() => Some((*frame, *value)),
            _ => None,
        }
    }
}

/// One animation curve, identified by `(data_path, array_index)` inside its set.
/// A curve without a `data_path` is not readable and is dropped from its set.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct CurveData {
    pub data_path: String,
    #[serde(default, deserialize_with = "or_default")]
    pub array_index: i32,
    #[serde(rename = "keyframes", default, deserialize_with = "valid_items")]
    pub points: Vec<KeyframeData>,
}

/// A named curve set ("Action" in host terms).
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct CurveSetData {
    /// May be empty in foreign files; restoring then picks a fallback name.
    #[serde(default, deserialize_with = "or_default")]
    pub name: String,
    /// Derived from the keyframes at capture time; informational only.
    #[serde(default, deserialize_with = "or_default")]
    pub frame_range: [f64; 2],
    #[serde(rename = "fcurves", default, deserialize_with = "valid_items")]
    pub curves: Vec<CurveData>,
}

impl CurveSetData {
    /// First curve matching `(data_path, array_index)`.
    pub fn curve(&self, data_path: &str, array_index: i32) -> Option<&CurveData> {
        self.curves
            .iter()
            .find(|c| c.data_path == data_path && c.array_index == array_index)
    }

    pub fn has_path(&self, data_path: &str) -> bool {
        self.curves.iter().any(|c| c.data_path == data_path)
    }
}

/// Placement of one curve set on one track.
///
/// Optional numeric fields are `None` when the capturing host did not expose
/// them; they are then left at the restoring host's defaults.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct StripData {
    #[serde(
        default,
        deserialize_with = "or_default",
        skip_serializing_if = "Option::is_none"
    )]
    pub name: Option<String>,
    #[serde(default, deserialize_with = "number", skip_serializing_if = "Option::is_none")]
    pub frame_start: Option<f64>,
    #[serde(default, deserialize_with = "number", skip_serializing_if = "Option::is_none")]
    pub frame_end: Option<f64>,
    #[serde(default, deserialize_with = "number")]
    pub action_frame_start: Option<f64>,
    #[serde(default, deserialize_with = "number")]
    pub action_frame_end: Option<f64>,
    #[serde(default, deserialize_with = "or_default")]
    pub action: Option<CurveSetData>,
    #[serde(default, deserialize_with = "number")]
    pub repeat: Option<f64>,
    #[serde(default, deserialize_with = "number")]
    pub scale: Option<f64>,
    #[serde(default, deserialize_with = "number")]
    pub influence: Option<f64>,
    #[serde(default, deserialize_with = "or_default")]
    pub muted: bool,
    #[serde(default, deserialize_with = "or_default")]
    pub blend_type: BlendType,
    #[serde(default, deserialize_with = "or_default")]
    pub use_reverse: bool,
}

impl StripData {
    /// Strip with only a name, a start frame and an embedded curve set.
    pub fn new(name: impl Into<String>, frame_start: f64, action: Option<CurveSetData>) -> Self {
        Self {
            name: Some(name.into()),
            frame_start: Some(frame_start),
            frame_end: None,
            action_frame_start: None,
            action_frame_end: None,
            action,
            repeat: None,
            scale: None,
            influence: None,
            muted: false,
            blend_type: BlendType::Replace,
            use_reverse: false,
        }
    }
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct TrackData {
    #[serde(
        default,
        deserialize_with = "or_default",
        skip_serializing_if = "Option::is_none"
    )]
    pub name: Option<String>,
    #[serde(default, deserialize_with = "valid_items")]
    pub strips: Vec<StripData>,
}

/// Per-object NLA snapshot.
///
/// `action` is the legacy single-curve-set shape written by early versions;
/// it is only consulted when `tracks` is empty.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct TrackSetData {
    #[serde(default, deserialize_with = "or_default")]
    pub active_action_name: Option<String>,
    #[serde(default, deserialize_with = "valid_items")]
    pub tracks: Vec<TrackData>,
    #[serde(
        default,
        deserialize_with = "or_default",
        skip_serializing_if = "Option::is_none"
    )]
    pub action: Option<CurveSetData>,
}

impl TrackSetData {
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn has_track_structure(&self) -> bool {
        !self.tracks.is_empty()
    }

    /// Every strip in declaration order.
    pub fn strips(&self) -> impl Iterator<Item = &StripData> {
        self.tracks.iter().flat_map(|t| t.strips.iter())
    }

    /// Every embedded curve set, one per strip that carries one.
    pub fn curve_sets(&self) -> impl Iterator<Item = &CurveSetData> {
        self.strips().filter_map(|s| s.action.as_ref())
    }

    /// Every embedded curve across all strips.
    pub fn curves(&self) -> impl Iterator<Item = &CurveData> {
        self.curve_sets().flat_map(|a| a.curves.iter())
    }
}
