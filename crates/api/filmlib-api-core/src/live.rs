//! Host-side (live) curve data as reported by a scene host.

use serde::{Deserialize, Serialize};

use crate::animation::Interpolation;

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct LiveKeyframe {
    pub frame: f64,
    pub value: f64,
    pub interpolation: Interpolation,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct LiveCurve {
    pub data_path: String,
    pub array_index: i32,
    pub keyframes: Vec<LiveKeyframe>,
}

/// A curve set as it currently exists in the host.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct LiveCurveSet {
    pub name: String,
    pub curves: Vec<LiveCurve>,
}

impl LiveCurveSet {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            curves: Vec::new(),
        }
    }

    /// `[min, max]` keyframe frame over all curves, `[0, 0]` when empty.
    pub fn frame_range(&self) -> [f64; 2] {
        let mut frames = self
            .curves
            .iter()
            .flat_map(|c| c.keyframes.iter().map(|k| k.frame));
        let Some(first) = frames.next() else {
            return [0.0, 0.0];
        };
        frames.fold([first, first], |[lo, hi], f| [lo.min(f), hi.max(f)])
    }

    pub fn curve(&self, data_path: &str, array_index: i32) -> Option<&LiveCurve> {
        self.curves
            .iter()
            .find(|c| c.data_path == data_path && c.array_index == array_index)
    }
}
