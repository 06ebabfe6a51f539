//! Where the internal document lives.
//!
//! The internal library is one JSON document, `{"animations": {name: entry}}`,
//! stored wholesale in a single slot. In the host that slot is a text block;
//! tests and tools use [`MemorySlot`] or [`FileSlot`].

use std::fs;
use std::path::PathBuf;

use indexmap::IndexMap;
use log::warn;
use serde::Serialize;
use serde_json::Value as JsonValue;

use filmlib_api_core::LibraryEntry;

use crate::error::LibraryError;

pub trait DocumentSlot {
    /// Current text, `None` when the slot does not exist yet.
    fn load(&self) -> Option<String>;
    /// Create the slot if needed and replace its text.
    fn store(&mut self, text: &str) -> Result<(), LibraryError>;
}

#[derive(Clone, Debug, Default)]
pub struct MemorySlot {
    text: Option<String>,
}

impl MemorySlot {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_text(text: impl Into<String>) -> Self {
        Self {
            text: Some(text.into()),
        }
    }

    pub fn text(&self) -> Option<&str> {
        self.text.as_deref()
    }
}

impl DocumentSlot for MemorySlot {
    fn load(&self) -> Option<String> {
        self.text.clone()
    }

    fn store(&mut self, text: &str) -> Result<(), LibraryError> {
        self.text = Some(text.to_string());
        Ok(())
    }
}

/// A document on disk.
#[derive(Clone, Debug)]
pub struct FileSlot {
    path: PathBuf,
}

impl FileSlot {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

impl DocumentSlot for FileSlot {
    fn load(&self) -> Option<String> {
        fs::read_to_string(&self.path).ok()
    }

    fn store(&mut self, text: &str) -> Result<(), LibraryError> {
        if let Some(dir) = self.path.parent().filter(|d| !d.as_os_str().is_empty()) {
            fs::create_dir_all(dir).map_err(|e| LibraryError::io(dir, e))?;
        }
        fs::write(&self.path, text).map_err(|e| LibraryError::io(&self.path, e))
    }
}

#[derive(Serialize)]
struct DocumentRef<'a> {
    animations: &'a IndexMap<String, LibraryEntry>,
}

pub(crate) fn render_document(
    entries: &IndexMap<String, LibraryEntry>,
) -> Result<String, LibraryError> {
    Ok(serde_json::to_string_pretty(&DocumentRef {
        animations: entries,
    })?)
}

/// Entries of the internal document. A missing, unparsable or oddly shaped
/// document reads as empty; a single malformed entry is dropped.
pub(crate) fn parse_document(text: &str) -> IndexMap<String, LibraryEntry> {
    let doc: JsonValue = match serde_json::from_str(text) {
        Ok(v) => v,
        Err(e) => {
            warn!("internal library document unreadable: {e}");
            return IndexMap::new();
        }
    };
    let Some(animations) = doc.get("animations").and_then(JsonValue::as_object) else {
        return IndexMap::new();
    };
    parse_entries(animations.iter())
}

pub(crate) fn parse_entries<'a>(
    raw: impl Iterator<Item = (&'a String, &'a JsonValue)>,
) -> IndexMap<String, LibraryEntry> {
    let mut out = IndexMap::new();
    for (name, value) in raw {
        match serde_json::from_value::<LibraryEntry>(value.clone()) {
            Ok(entry) => {
                out.insert(name.clone(), entry);
            }
            Err(e) => warn!("entry '{name}' skipped: {e}"),
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use filmlib_api_core::BlendType;

    #[test]
    fn odd_documents_read_as_empty() {
        assert!(parse_document("not json").is_empty());
        assert!(parse_document("[]").is_empty());
        assert!(parse_document(r#"{"animations": 3}"#).is_empty());
    }

    #[test]
    fn malformed_entry_does_not_hide_the_rest() {
        let doc = r#"{"animations": {
            "good": {"description": "ok", "tracks": []},
            "bad": "nope"
        }}"#;
        let entries = parse_document(doc);
        assert_eq!(entries.keys().collect::<Vec<_>>(), vec!["good"]);
    }

    #[test]
    fn bad_fields_inside_an_entry_keep_the_entry() {
        let doc = r#"{"animations": {
            "A": {
                "tracks": [{
                    "object_name": "Cube",
                    "animation": {"tracks": [{"name": "T", "strips": [{
                        "name": "S",
                        "frame_start": 10,
                        "blend_type": null,
                        "muted": null,
                        "action": {"fcurves": [
                            {"data_path": "location", "array_index": 0, "keyframes": [{"co": [0, 1]}]},
                            {"array_index": 1, "keyframes": []}
                        ]}
                    }]}]}
                }],
                "timeline_markers": [{"name": "m", "frame": 12.0}, {"name": "lost", "frame": "x"}],
                "visible_objects_mode": null
            }
        }}"#;
        let entries = parse_document(doc);
        let entry = &entries["A"];
        assert_eq!(entry.sorted_markers().len(), 1);
        assert_eq!(entry.sorted_markers()[0].frame, 12);

        let strip = &entry.tracks[0].animation.tracks[0].strips[0];
        assert_eq!(strip.blend_type, BlendType::Replace);
        assert!(!strip.muted);
        let action = strip.action.as_ref().unwrap();
        assert_eq!(action.name, "");
        assert_eq!(action.curves.len(), 1);
        assert_eq!(action.curves[0].data_path, "location");
    }

    #[test]
    fn rendered_document_parses_back() {
        let mut entries = IndexMap::new();
        entries.insert("A".to_string(), LibraryEntry::new("first"));
        let text = render_document(&entries).unwrap();
        assert!(text.contains("\"animations\""));
        assert_eq!(parse_document(&text)["A"].description, "first");
    }
}
