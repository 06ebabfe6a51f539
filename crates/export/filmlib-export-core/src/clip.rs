//! Clip schema as consumed by the three.js runtime.

use serde::{Deserialize, Serialize};

use filmlib_api_core::VisibilityMode;

use crate::error::ExportError;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TrackKind {
    Vector,
    Quaternion,
    Number,
}

/// One keyframe track, keyed `"<node_id>.<property>"`.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ClipTrack {
    #[serde(rename = "type")]
    pub kind: TrackKind,
    pub name: String,
    /// Seconds from the clip's first frame.
    pub times: Vec<f64>,
    /// Flat components: 3 per time for vectors, 4 (x, y, z, w) for
    /// quaternions, 1 for numbers.
    pub values: Vec<f64>,
}

impl ClipTrack {
    pub fn new(kind: TrackKind, node: &str, property: &str, times: Vec<f64>, values: Vec<f64>) -> Self {
        Self {
            kind,
            name: format!("{node}.{property}"),
            times,
            values,
        }
    }

    pub fn stride(&self) -> usize {
        match self.kind {
            TrackKind::Vector => 3,
            TrackKind::Quaternion => 4,
            TrackKind::Number => 1,
        }
    }
}

/// Opacity over time for one node, driven by the runtime itself.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct AlphaTrack {
    pub node: String,
    pub times: Vec<f64>,
    /// Clamped to `[0, 1]`.
    pub values: Vec<f64>,
    /// Channel the values came from: `["alpha"]` or `color[3]`.
    pub source: String,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct AnnotationNode {
    pub id: String,
    pub start: f64,
    pub end: f64,
    pub text: String,
    #[serde(default)]
    pub children: Vec<AnnotationNode>,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Clip {
    pub name: String,
    pub fps: f64,
    pub frame_start: i32,
    pub frame_end: i32,
    pub duration: f64,
    pub tracks: Vec<ClipTrack>,
    pub alpha_tracks: Vec<AlphaTrack>,
    pub visible_nodes_mode: VisibilityMode,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub visible_nodes: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub markers_text: Vec<AnnotationNode>,
}

impl Clip {
    pub fn track(&self, name: &str) -> Option<&ClipTrack> {
        self.tracks.iter().find(|t| t.name == name)
    }

    pub fn alpha_track(&self, node: &str) -> Option<&AlphaTrack> {
        self.alpha_tracks.iter().find(|t| t.node == node)
    }

    pub fn to_json_string(&self) -> Result<String, ExportError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    pub fn to_json_value(&self) -> Result<serde_json::Value, ExportError> {
        Ok(serde_json::to_value(self)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn wire_names_match_the_runtime() {
        let clip = Clip {
            name: "A".into(),
            fps: 24.0,
            frame_start: 0,
            frame_end: 24,
            duration: 1.0,
            tracks: vec![ClipTrack::new(
                TrackKind::Quaternion,
                "n1",
                "quaternion",
                vec![0.0],
                vec![0.0, 0.0, 0.0, 1.0],
            )],
            alpha_tracks: vec![],
            visible_nodes_mode: VisibilityMode::All,
            visible_nodes: None,
            markers_text: vec![],
        };
        let v = clip.to_json_value().unwrap();
        assert_eq!(v["tracks"][0]["type"], json!("quaternion"));
        assert_eq!(v["tracks"][0]["name"], json!("n1.quaternion"));
        assert_eq!(v["visible_nodes_mode"], json!("ALL"));
        assert!(v.get("visible_nodes").is_none());
        assert!(v.get("markers_text").is_none());
    }
}
