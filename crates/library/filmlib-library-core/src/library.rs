use std::path::{Path, PathBuf};

use indexmap::IndexMap;
use log::debug;
use serde::Serialize;

use filmlib_api_core::LibraryEntry;

use crate::cache::LibraryCache;
use crate::config::LibraryConfig;
use crate::error::LibraryError;
use crate::external::ExternalStore;
use crate::slot::{parse_document, render_document, DocumentSlot};

/// Internal document + external folder + merged read cache.
///
/// The internal slot is passed per call because in the host it is a text
/// block owned by the scene, not by the library.
#[derive(Debug)]
pub struct Library {
    config: LibraryConfig,
    external: ExternalStore,
    cache: LibraryCache,
}

impl Library {
    pub fn new(config: LibraryConfig) -> Self {
        let external = ExternalStore::new(config.external_folder.clone());
        Self {
            config,
            external,
            cache: LibraryCache::new(),
        }
    }

    pub fn config(&self) -> &LibraryConfig {
        &self.config
    }

    pub fn external(&self) -> &ExternalStore {
        &self.external
    }

    pub fn external_folder(&self) -> Option<&Path> {
        self.external.folder()
    }

    pub fn set_external_folder(&mut self, folder: Option<PathBuf>) {
        self.config.external_folder = folder.clone();
        self.external.set_folder(folder);
        self.cache.invalidate();
    }

    pub fn is_dirty(&self) -> bool {
        self.cache.is_dirty()
    }

    pub fn invalidate(&mut self) {
        self.cache.invalidate();
    }

    pub fn cache(&self) -> &LibraryCache {
        &self.cache
    }

    // ----- internal document -----

    /// Entries of the internal document; empty when the slot is missing
    /// or unreadable.
    pub fn read_internal<S: DocumentSlot + ?Sized>(
        &self,
        slot: &S,
    ) -> IndexMap<String, LibraryEntry> {
        parse_internal(slot)
    }

    /// Replace the whole internal document, creating the slot on first write.
    pub fn write_internal<S: DocumentSlot + ?Sized>(
        &mut self,
        slot: &mut S,
        entries: &IndexMap<String, LibraryEntry>,
    ) -> Result<(), LibraryError> {
        let result = render_document(entries).and_then(|text| slot.store(&text));
        self.cache.invalidate();
        result
    }

    pub fn put<S: DocumentSlot + ?Sized>(
        &mut self,
        slot: &mut S,
        name: &str,
        entry: LibraryEntry,
    ) -> Result<(), LibraryError> {
        let mut entries = self.read_internal(slot);
        entries.insert(name.to_string(), entry);
        self.write_internal(slot, &entries)
    }

    /// Remove `name` from the internal document. `Ok(false)` when it was not
    /// there; the document is then left untouched.
    pub fn remove<S: DocumentSlot + ?Sized>(
        &mut self,
        slot: &mut S,
        name: &str,
    ) -> Result<bool, LibraryError> {
        let mut entries = self.read_internal(slot);
        if entries.shift_remove(name).is_none() {
            return Ok(false);
        }
        self.write_internal(slot, &entries)?;
        Ok(true)
    }

    // ----- external folder -----

    pub fn read_external(&self) -> IndexMap<String, LibraryEntry> {
        self.external.read_all()
    }

    pub fn write_external_entry(&mut self, name: &str, entry: &LibraryEntry) -> bool {
        let ok = self.external.write_entry(name, entry);
        self.cache.invalidate();
        ok
    }

    pub fn remove_external_entry(&mut self, name: &str) -> bool {
        let ok = self.external.remove_entry(name);
        self.cache.invalidate();
        ok
    }

    pub fn write_clip<T: Serialize + ?Sized>(&mut self, name: &str, clip: &T) -> bool {
        let ok = self.external.write_clip(name, clip);
        self.cache.invalidate();
        ok
    }

    pub fn remove_clip(&mut self, name: &str) -> bool {
        let ok = self.external.remove_clip(name);
        self.cache.invalidate();
        ok
    }

    // ----- merged view -----

    /// Internal and external entries merged, internal shadowing external.
    /// Served from the cache unless a write happened since the last read.
    pub fn entries<S: DocumentSlot + ?Sized>(
        &mut self,
        slot: &S,
    ) -> &IndexMap<String, LibraryEntry> {
        let external = &self.external;
        self.cache.get_or_refresh(|| {
            debug!("refreshing library cache");
            let mut merged = external.read_all();
            for (name, entry) in parse_internal(slot) {
                merged.insert(name, entry);
            }
            merged
        })
    }

    pub fn entry_names<S: DocumentSlot + ?Sized>(&mut self, slot: &S) -> Vec<String> {
        self.entries(slot).keys().cloned().collect()
    }

    pub fn contains<S: DocumentSlot + ?Sized>(&mut self, slot: &S, name: &str) -> bool {
        self.entries(slot).contains_key(name)
    }

    pub fn get<S: DocumentSlot + ?Sized>(
        &mut self,
        slot: &S,
        name: &str,
    ) -> Result<LibraryEntry, LibraryError> {
        self.entries(slot)
            .get(name)
            .cloned()
            .ok_or_else(|| LibraryError::NotFound(name.to_string()))
    }
}

fn parse_internal<S: DocumentSlot + ?Sized>(slot: &S) -> IndexMap<String, LibraryEntry> {
    slot.load()
        .map(|text| parse_document(&text))
        .unwrap_or_default()
}
