//! Merged read cache.

use indexmap::IndexMap;

use filmlib_api_core::LibraryEntry;

/// Last merged view of the library plus a dirty flag.
///
/// Every write path calls [`LibraryCache::invalidate`]; readers go through
/// [`LibraryCache::get_or_refresh`], which reloads only when dirty.
#[derive(Debug)]
pub struct LibraryCache {
    entries: IndexMap<String, LibraryEntry>,
    dirty: bool,
    refreshes: usize,
}

impl Default for LibraryCache {
    fn default() -> Self {
        Self::new()
    }
}

impl LibraryCache {
    /// Starts dirty so the first read loads.
    pub fn new() -> Self {
        Self {
            entries: IndexMap::new(),
            dirty: true,
            refreshes: 0,
        }
    }

    pub fn get_or_refresh<F>(&mut self, load: F) -> &IndexMap<String, LibraryEntry>
    where
        F: FnOnce() -> IndexMap<String, LibraryEntry>,
    {
        if self.dirty {
            self.entries = load();
            self.dirty = false;
            self.refreshes += 1;
        }
        &self.entries
    }

    pub fn invalidate(&mut self) {
        self.dirty = true;
    }

    pub fn is_dirty(&self) -> bool {
        self.dirty
    }

    /// How many times the cache has reloaded.
    pub fn refreshes(&self) -> usize {
        self.refreshes
    }
}
