//! The scene host seam.
//!
//! Objects and curve sets are addressed by name (both are unique in the host),
//! tracks and strips by index within their owner. Reads return owned
//! snapshots; writes report a [`HostError`] and never panic.

use nalgebra::Matrix4;
use serde_json::{Map, Value as JsonValue};

use filmlib_api_core::{BlendType, Interpolation, LiveCurveSet, MarkerData, TextBlockData};

use crate::capabilities::{Capabilities, StripField};
use crate::error::HostError;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ObjectKind {
    Mesh,
    Camera,
    Light,
    Empty,
    Other,
}

#[derive(Clone, Debug, PartialEq)]
pub struct ObjectInfo {
    pub name: String,
    pub kind: ObjectKind,
    pub parent: Option<String>,
    /// Custom properties.
    pub properties: Map<String, JsonValue>,
}

impl ObjectInfo {
    pub fn new(name: impl Into<String>, kind: ObjectKind) -> Self {
        Self {
            name: name.into(),
            kind,
            parent: None,
            properties: Map::new(),
        }
    }

    /// Non-blank string custom property, trimmed.
    pub fn string_property(&self, key: &str) -> Option<&str> {
        self.properties
            .get(key)
            .and_then(|v| v.as_str())
            .map(str::trim)
            .filter(|s| !s.is_empty())
    }
}

/// A strip as the host reports it. Optional fields are `None` when the host
/// does not expose them.
#[derive(Clone, Debug, PartialEq)]
pub struct LiveStrip {
    pub name: String,
    pub frame_start: f64,
    pub frame_end: f64,
    pub curve_set: Option<String>,
    pub action_frame_start: Option<f64>,
    pub action_frame_end: Option<f64>,
    pub repeat: Option<f64>,
    pub scale: Option<f64>,
    pub influence: Option<f64>,
    pub mute: Option<bool>,
    pub blend_type: Option<BlendType>,
    pub use_reverse: Option<bool>,
}

#[derive(Clone, Debug, PartialEq)]
pub struct LiveTrack {
    pub name: String,
    pub strips: Vec<LiveStrip>,
}

/// An object's animation binding: optional active curve set plus NLA tracks.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct AnimationBinding {
    pub active_curve_set: Option<String>,
    pub tracks: Vec<LiveTrack>,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct StripRef<'a> {
    pub object: &'a str,
    pub track: usize,
    pub strip: usize,
}

/// One assignable strip field.
#[derive(Clone, Debug, PartialEq)]
pub enum StripProperty {
    CurveSet(String),
    ActionFrameStart(f64),
    ActionFrameEnd(f64),
    Repeat(f64),
    Scale(f64),
    Influence(f64),
    Mute(bool),
    BlendType(BlendType),
    UseReverse(bool),
}

impl StripProperty {
    /// Capability this property needs; `None` for fields every host has.
    pub fn field(&self) -> Option<StripField> {
        match self {
            StripProperty::CurveSet(_) => None,
            StripProperty::ActionFrameStart(_) | StripProperty::ActionFrameEnd(_) => {
                Some(StripField::ActionFrameRange)
            }
            StripProperty::Repeat(_) => Some(StripField::Repeat),
            StripProperty::Scale(_) => Some(StripField::Scale),
            StripProperty::Influence(_) => Some(StripField::Influence),
            StripProperty::Mute(_) => Some(StripField::Mute),
            StripProperty::BlendType(_) => Some(StripField::BlendType),
            StripProperty::UseReverse(_) => Some(StripField::UseReverse),
        }
    }
}

pub trait SceneHost {
    /// Resolved once per host; see [`Capabilities`].
    fn capabilities(&self) -> Capabilities;

    // ----- curve sets -----

    fn curve_set(&self, name: &str) -> Option<LiveCurveSet>;
    fn curve_set_names(&self) -> Vec<String>;
    fn has_curve_set(&self, name: &str) -> bool {
        self.curve_set(name).is_some()
    }
    fn create_curve_set(&mut self, name: &str) -> Result<(), HostError>;
    fn remove_curve_set(&mut self, name: &str) -> Result<(), HostError>;
    fn add_curve(&mut self, set: &str, data_path: &str, array_index: i32)
        -> Result<(), HostError>;
    fn insert_keyframe(
        &mut self,
        set: &str,
        data_path: &str,
        array_index: i32,
        frame: f64,
        value: f64,
    ) -> Result<(), HostError>;
    fn set_keyframe_interpolation(
        &mut self,
        set: &str,
        data_path: &str,
        array_index: i32,
        frame: f64,
        interpolation: &Interpolation,
    ) -> Result<(), HostError>;

    // ----- objects -----

    fn object_names(&self) -> Vec<String>;
    fn selected_object_names(&self) -> Vec<String>;
    fn object(&self, name: &str) -> Option<ObjectInfo>;

    // ----- animation binding / NLA -----

    fn animation(&self, object: &str) -> Option<AnimationBinding>;
    fn ensure_animation(&mut self, object: &str) -> Result<(), HostError>;
    /// Drop the binding entirely.
    fn clear_animation(&mut self, object: &str) -> Result<(), HostError>;
    fn set_active_curve_set(&mut self, object: &str, name: Option<&str>)
        -> Result<(), HostError>;
    fn new_track(&mut self, object: &str, name: &str) -> Result<usize, HostError>;
    fn remove_track(&mut self, object: &str, track: usize) -> Result<(), HostError>;
    fn new_strip(
        &mut self,
        object: &str,
        track: usize,
        name: &str,
        start: i32,
        curve_set: Option<&str>,
    ) -> Result<usize, HostError>;
    fn remove_strip(&mut self, object: &str, track: usize, strip: usize)
        -> Result<(), HostError>;
    fn set_strip_property(
        &mut self,
        target: StripRef<'_>,
        property: &StripProperty,
    ) -> Result<(), HostError>;

    // ----- scene time -----

    fn frame_range(&self) -> Result<(i32, i32), HostError>;
    fn set_frame_start(&mut self, frame: i32) -> Result<(), HostError>;
    fn set_frame_end(&mut self, frame: i32) -> Result<(), HostError>;
    fn current_frame(&self) -> i32;
    /// Move to `frame` and re-evaluate the scene before returning.
    fn set_frame(&mut self, frame: i32) -> Result<(), HostError>;
    /// `(fps, fps_base)`; effective rate is `fps / fps_base`.
    fn fps(&self) -> (f64, f64);
    /// Evaluated world matrix at the current frame.
    fn world_matrix(&self, object: &str) -> Option<Matrix4<f64>>;

    // ----- markers and text -----

    fn timeline_markers(&self) -> Vec<MarkerData>;
    fn clear_markers(&mut self) -> Result<(), HostError>;
    fn add_marker(&mut self, name: &str, frame: i32) -> Result<(), HostError>;
    /// Text block shown in the focused text editor, if any.
    fn active_text(&self) -> Option<TextBlockData>;
    fn text(&self, name: &str) -> Option<String>;
    /// Get-or-create `name`, then replace its content.
    fn write_text(&mut self, name: &str, content: &str) -> Result<(), HostError>;

    // ----- visibility -----

    fn set_hidden(&mut self, object: &str, hidden: bool) -> Result<(), HostError>;
    fn set_render_hidden(&mut self, object: &str, hidden: bool) -> Result<(), HostError>;
}
