//! The external folder: per-entry files, shared library files and clip exports.
//!
//! Accepted file shapes:
//! - `{"animations": {name: entry, ...}}`
//! - `{name: entry, ...}` where only values carrying a `tracks` key count
//!
//! Files are read in lexicographic file-name order, so on a name collision
//! the entry from the last file wins. Every failure here is reported as
//! `false` or an empty map, never as an error.

use std::fs;
use std::path::{Path, PathBuf};

use indexmap::IndexMap;
use log::{debug, warn};
use serde::Serialize;
use serde_json::Value as JsonValue;

use filmlib_api_core::LibraryEntry;

use crate::slot::parse_entries;

/// Clip exports are written as `three_<name>.json`.
pub const CLIP_FILE_PREFIX: &str = "three_";

#[derive(Clone, Debug, Default)]
pub struct ExternalStore {
    folder: Option<PathBuf>,
}

impl ExternalStore {
    pub fn new(folder: Option<PathBuf>) -> Self {
        Self { folder }
    }

    pub fn folder(&self) -> Option<&Path> {
        self.folder.as_deref()
    }

    pub fn set_folder(&mut self, folder: Option<PathBuf>) {
        self.folder = folder;
    }

    pub fn entry_path(&self, name: &str) -> Option<PathBuf> {
        self.file_path(name, "")
    }

    pub fn clip_path(&self, name: &str) -> Option<PathBuf> {
        self.file_path(name, CLIP_FILE_PREFIX)
    }

    fn file_path(&self, name: &str, prefix: &str) -> Option<PathBuf> {
        let folder = self.folder.as_ref()?;
        let escapes = name.contains(|c: char| c == '/' || c == '\\');
        if name.is_empty() || escapes || name == "." || name == ".." {
            warn!("'{name}' is not usable as a file name");
            return None;
        }
        Some(folder.join(format!("{prefix}{name}.json")))
    }

    /// Every entry found in the folder.
    pub fn read_all(&self) -> IndexMap<String, LibraryEntry> {
        let mut out = IndexMap::new();
        let Some(folder) = self.folder.as_ref() else {
            return out;
        };
        let dir = match fs::read_dir(folder) {
            Ok(d) => d,
            Err(e) => {
                debug!("external folder {} not readable: {e}", folder.display());
                return out;
            }
        };

        let mut files: Vec<PathBuf> = dir
            .filter_map(|e| e.ok().map(|e| e.path()))
            .filter(|p| {
                p.is_file()
                    && p.extension()
                        .and_then(|s| s.to_str())
                        .is_some_and(|ext| ext.eq_ignore_ascii_case("json"))
                    && !p
                        .file_name()
                        .and_then(|s| s.to_str())
                        .is_some_and(|n| n.starts_with(CLIP_FILE_PREFIX))
            })
            .collect();
        files.sort();

        for path in files {
            let data: JsonValue = match fs::read_to_string(&path)
                .map_err(|e| e.to_string())
                .and_then(|text| serde_json::from_str(&text).map_err(|e| e.to_string()))
            {
                Ok(v) => v,
                Err(e) => {
                    warn!("skipping {}: {e}", path.display());
                    continue;
                }
            };
            let Some(map) = data.as_object() else {
                continue;
            };
            let entries = match map.get("animations").and_then(JsonValue::as_object) {
                Some(animations) => parse_entries(animations.iter()),
                None => parse_entries(
                    map.iter()
                        .filter(|(_, v)| v.as_object().is_some_and(|o| o.contains_key("tracks"))),
                ),
            };
            out.extend(entries);
        }
        out
    }

    /// Write the canonical copy `<name>.json` as `{name: entry}`.
    pub fn write_entry(&self, name: &str, entry: &LibraryEntry) -> bool {
        let Some(path) = self.entry_path(name) else {
            return false;
        };
        let mut doc = IndexMap::new();
        doc.insert(name, entry);
        write_json(&path, &doc)
    }

    pub fn remove_entry(&self, name: &str) -> bool {
        self.entry_path(name).is_some_and(|p| remove_file(&p))
    }

    pub fn write_clip<T: Serialize + ?Sized>(&self, name: &str, clip: &T) -> bool {
        let Some(path) = self.clip_path(name) else {
            return false;
        };
        write_json(&path, clip)
    }

    pub fn remove_clip(&self, name: &str) -> bool {
        self.clip_path(name).is_some_and(|p| remove_file(&p))
    }
}

fn write_json<T: Serialize + ?Sized>(path: &Path, value: &T) -> bool {
    let text = match serde_json::to_string_pretty(value) {
        Ok(t) => t,
        Err(e) => {
            warn!("{} not written: {e}", path.display());
            return false;
        }
    };
    if let Some(dir) = path.parent() {
        if let Err(e) = fs::create_dir_all(dir) {
            warn!("folder {} not created: {e}", dir.display());
            return false;
        }
    }
    match fs::write(path, text) {
        Ok(()) => true,
        Err(e) => {
            warn!("{} not written: {e}", path.display());
            false
        }
    }
}

fn remove_file(path: &Path) -> bool {
    if !path.is_file() {
        return false;
    }
    match fs::remove_file(path) {
        Ok(()) => true,
        Err(e) => {
            warn!("{} not removed: {e}", path.display());
            false
        }
    }
}
