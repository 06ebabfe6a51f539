//! Library entries: one named snapshot of scene animation.

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value as JsonValue};

use crate::animation::TrackSetData;
use crate::frames::coerce_frame;
use crate::lenient::{frame, optional_items, or_default, valid_items};
use crate::time::now_iso8601;

/// Which objects the snapshot wants visible when applied.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum VisibilityMode {
    #[default]
    All,
    Selected,
}

impl From<String> for VisibilityMode {
    fn from(mode: String) -> Self {
        // Anything but SELECTED has always meant "show everything".
        if mode == "SELECTED" {
            VisibilityMode::Selected
        } else {
            VisibilityMode::All
        }
    }
}

impl From<VisibilityMode> for String {
    fn from(mode: VisibilityMode) -> Self {
        match mode {
            VisibilityMode::All => "ALL".into(),
            VisibilityMode::Selected => "SELECTED".into(),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct MarkerData {
    #[serde(default, deserialize_with = "or_default")]
    pub name: String,
    /// Fractional and numeric-string frames are accepted; a marker whose
    /// frame cannot be read is dropped from the list.
    #[serde(deserialize_with = "frame")]
    pub frame: i32,
}

impl MarkerData {
    pub fn new(name: impl Into<String>, frame: i32) -> Self {
        Self {
            name: name.into(),
            frame,
        }
    }
}

/// A text block (name + full content).
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct TextBlockData {
    #[serde(default, deserialize_with = "or_default")]
    pub name: String,
    #[serde(default, deserialize_with = "or_default")]
    pub content: Option<String>,
}

impl TextBlockData {
    pub fn new(name: impl Into<String>, content: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            content: Some(content.into()),
        }
    }
}

/// NLA snapshot of one scene object.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ObjectTracks {
    pub object_name: String,
    #[serde(default, deserialize_with = "or_default")]
    pub animation: TrackSetData,
}

/// One saved animation.
///
/// `frame_start`/`frame_end` are kept as raw JSON so a malformed value on one
/// side never hides the other; read them through [`LibraryEntry::frame_start`].
/// Fields this version does not know are kept in `extra` and written back.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct LibraryEntry {
    #[serde(default, deserialize_with = "or_default")]
    pub created_at: String,
    #[serde(default, deserialize_with = "or_default")]
    pub description: String,
    /// Objects whose snapshot cannot be read (no `object_name`) are dropped.
    #[serde(default, deserialize_with = "valid_items")]
    pub tracks: Vec<ObjectTracks>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub frame_start: Option<JsonValue>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub frame_end: Option<JsonValue>,
    #[serde(default, deserialize_with = "or_default")]
    pub visible_objects_mode: VisibilityMode,
    #[serde(
        default,
        deserialize_with = "optional_items",
        skip_serializing_if = "Option::is_none"
    )]
    pub visible_objects: Option<Vec<String>>,
    #[serde(
        default,
        deserialize_with = "optional_items",
        skip_serializing_if = "Option::is_none"
    )]
    pub timeline_markers: Option<Vec<MarkerData>>,
    #[serde(
        default,
        deserialize_with = "or_default",
        skip_serializing_if = "Option::is_none"
    )]
    pub text_editor: Option<TextBlockData>,
    #[serde(flatten)]
    pub extra: Map<String, JsonValue>,
}

impl LibraryEntry {
    /// Fresh entry stamped with the current time.
    pub fn new(description: impl Into<String>) -> Self {
        Self {
            created_at: now_iso8601(),
            description: description.into(),
            tracks: Vec::new(),
            frame_start: None,
            frame_end: None,
            visible_objects_mode: VisibilityMode::All,
            visible_objects: None,
            timeline_markers: None,
            text_editor: None,
            extra: Map::new(),
        }
    }

    pub fn frame_start(&self) -> Option<i32> {
        self.frame_start.as_ref().and_then(coerce_frame)
    }

    pub fn frame_end(&self) -> Option<i32> {
        self.frame_end.as_ref().and_then(coerce_frame)
    }

    pub fn set_frame_range(&mut self, start: i32, end: i32) {
        self.frame_start = Some(JsonValue::from(start));
        self.frame_end = Some(JsonValue::from(end));
    }

    pub fn object_names(&self) -> impl Iterator<Item = &str> {
        self.tracks.iter().map(|t| t.object_name.as_str())
    }

    pub fn track_for(&self, object_name: &str) -> Option<&ObjectTracks> {
        self.tracks.iter().find(|t| t.object_name == object_name)
    }

    /// Names of every curve set embedded anywhere in the entry, including the
    /// legacy single-`action` shape.
    pub fn curve_set_names(&self) -> BTreeSet<String> {
        let mut names = BTreeSet::new();
        for t in &self.tracks {
            for set in t.animation.curve_sets() {
                if !set.name.is_empty() {
                    names.insert(set.name.clone());
                }
            }
            if let Some(set) = &t.animation.action {
                if !set.name.is_empty() {
                    names.insert(set.name.clone());
                }
            }
        }
        names
    }

    /// Markers sorted by frame (stable for equal frames).
    pub fn sorted_markers(&self) -> Vec<MarkerData> {
        let mut markers = self.timeline_markers.clone().unwrap_or_default();
        markers.sort_by_key(|m| m.frame);
        markers
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn malformed_frame_start_does_not_hide_frame_end() {
        let e: LibraryEntry = serde_json::from_value(json!({
            "created_at": "2024-01-01T00:00:00",
            "tracks": [],
            "frame_start": "abc",
            "frame_end": 120
        }))
        .unwrap();
        assert_eq!(e.frame_start(), None);
        assert_eq!(e.frame_end(), Some(120));
    }

    #[test]
    fn unknown_fields_are_preserved() {
        let e: LibraryEntry = serde_json::from_value(json!({
            "created_at": "x",
            "tracks": [],
            "author": "me",
            "visible_objects_mode": "whatever"
        }))
        .unwrap();
        assert_eq!(e.visible_objects_mode, VisibilityMode::All);
        let back = serde_json::to_value(&e).unwrap();
        assert_eq!(back["author"], "me");
        assert_eq!(back["visible_objects_mode"], "ALL");
        assert!(back.get("timeline_markers").is_none());
    }

    #[test]
    fn foreign_marker_and_text_values_are_coerced() {
        let e: LibraryEntry = serde_json::from_value(json!({
            "created_at": null,
            "timeline_markers": [
                {"name": "a", "frame": 12.0},
                {"name": "b", "frame": "30"},
                {"name": "c"},
                {"frame": 5}
            ],
            "text_editor": {"name": null, "content": "1. intro"},
            "tracks": [{"animation": {}}, {"object_name": "Cube", "animation": null}]
        }))
        .unwrap();
        let frames: Vec<_> = e.sorted_markers().iter().map(|m| m.frame).collect();
        assert_eq!(frames, vec![5, 12, 30]);
        assert_eq!(e.text_editor.as_ref().unwrap().name, "");
        assert_eq!(e.created_at, "");
        assert_eq!(e.object_names().collect::<Vec<_>>(), vec!["Cube"]);
        assert!(e.tracks[0].animation.tracks.is_empty());
    }

    #[test]
    fn markers_sort_by_frame() {
        let mut e = LibraryEntry::new("");
        e.timeline_markers = Some(vec![
            MarkerData::new("b", 48),
            MarkerData::new("a", 0),
            MarkerData::new("c", 24),
        ]);
        let names: Vec<_> = e.sorted_markers().into_iter().map(|m| m.name).collect();
        assert_eq!(names, vec!["a", "c", "b"]);
    }
}
