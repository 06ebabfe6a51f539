//! filmlib-orchestrator
//!
//! User-level operations over one scene host: save the scene into the
//! library, apply a saved entry back, delete entries (optionally purging
//! their curve sets from the scene) and export three.js clips. The internal
//! library document lives in a host text block; the external folder holds a
//! canonical copy of every entry plus its baked clip.

pub mod config;
pub mod host_slot;

use std::collections::BTreeSet;
use std::path::{Path, PathBuf};

use anyhow::Result;
use log::{debug, info, warn};

use filmlib_api_core::LibraryEntry;
use filmlib_codec_core::{
    apply_entry, capture, purge_curve_sets, refresh, ApplyReport, CaptureOptions, CaptureReport,
    PurgeReport, SceneHost,
};
use filmlib_export_core::{bake_clip, Clip};
use filmlib_library_core::{Library, LibraryError};

pub use crate::config::OrchestratorConfig;
pub use crate::host_slot::HostTextSlot;

#[derive(Clone, Debug, PartialEq)]
pub struct SaveReport {
    pub name: String,
    /// `false` when an existing entry was refreshed in place.
    pub created: bool,
    pub capture: CaptureReport,
    pub external_written: bool,
    pub clip_written: bool,
}

#[derive(Clone, Debug, Default, PartialEq)]
pub struct DeleteReport {
    /// Whether the internal document held the entry.
    pub removed_internal: bool,
    pub external_removed: bool,
    pub clip_removed: bool,
    /// Present for a full delete.
    pub purge: Option<PurgeReport>,
    /// Curve sets left in the scene because another entry still uses them.
    pub kept_shared: Vec<String>,
}

#[derive(Debug)]
pub struct Orchestrator<H: SceneHost> {
    pub host: H,
    library: Library,
    config: OrchestratorConfig,
}

impl<H: SceneHost> Orchestrator<H> {
    pub fn new(host: H, config: OrchestratorConfig) -> Self {
        Self {
            host,
            library: Library::new(config.library.clone()),
            config,
        }
    }

    pub fn config(&self) -> &OrchestratorConfig {
        &self.config
    }

    pub fn library(&self) -> &Library {
        &self.library
    }

    pub fn external_folder(&self) -> Option<&Path> {
        self.library.external_folder()
    }

    /// Point the external store at another folder (or none).
    pub fn set_external_folder(&mut self, folder: Option<PathBuf>) {
        info!("external folder set to {folder:?}");
        self.config.library.external_folder = folder.clone();
        self.library.set_external_folder(folder);
    }

    /// Names in the merged library; internal entries shadow external ones.
    pub fn entry_names(&mut self) -> Vec<String> {
        let slot = HostTextSlot::new(&mut self.host, &self.config.library.internal_text_name);
        self.library.entry_names(&slot)
    }

    pub fn contains(&mut self, name: &str) -> bool {
        let slot = HostTextSlot::new(&mut self.host, &self.config.library.internal_text_name);
        self.library.contains(&slot, name)
    }

    pub fn get(&mut self, name: &str) -> Result<LibraryEntry> {
        let slot = HostTextSlot::new(&mut self.host, &self.config.library.internal_text_name);
        Ok(self.library.get(&slot, name)?)
    }

    /// Create `name` from the scene, or refresh it when it already exists.
    pub fn save(&mut self, name: &str, description: &str) -> Result<SaveReport> {
        let options = self.config.capture.clone();
        self.save_with(name, description, &options)
    }

    pub fn save_with(
        &mut self,
        name: &str,
        description: &str,
        options: &CaptureOptions,
    ) -> Result<SaveReport> {
        if self.contains(name) {
            self.update(name, options)
        } else {
            self.create(name, description, options)
        }
    }

    pub fn create(
        &mut self,
        name: &str,
        description: &str,
        options: &CaptureOptions,
    ) -> Result<SaveReport> {
        let (entry, report) = capture(&self.host, description, options);
        self.store(name, entry, report, true)
    }

    /// Re-capture an existing entry, keeping its description. An entry found
    /// only in the external folder is adopted into the internal document.
    pub fn update(&mut self, name: &str, options: &CaptureOptions) -> Result<SaveReport> {
        let mut entry = self.get(name)?;
        let report = refresh(&self.host, &mut entry, options);
        self.store(name, entry, report, false)
    }

    fn store(
        &mut self,
        name: &str,
        entry: LibraryEntry,
        capture: CaptureReport,
        created: bool,
    ) -> Result<SaveReport> {
        {
            let mut slot =
                HostTextSlot::new(&mut self.host, &self.config.library.internal_text_name);
            self.library.put(&mut slot, name, entry.clone())?;
        }
        let (external_written, clip_written) = self.write_side_outputs(name, &entry);
        info!(
            "{} {name}: {} objects captured",
            if created { "created" } else { "updated" },
            capture.captured.len()
        );
        Ok(SaveReport {
            name: name.to_string(),
            created,
            capture,
            external_written,
            clip_written,
        })
    }

    /// Canonical copy and clip; failures are logged, never returned.
    fn write_side_outputs(&mut self, name: &str, entry: &LibraryEntry) -> (bool, bool) {
        if self.library.external_folder().is_none() {
            debug!("no external folder; {name} kept internal only");
            return (false, false);
        }
        let external = self.library.write_external_entry(name, entry);
        if !external {
            warn!("could not write external copy of {name}");
        }
        let clip = match bake_clip(&mut self.host, name, entry, &self.config.export) {
            Ok(clip) => self.library.write_clip(name, &clip),
            Err(e) => {
                warn!("clip export for {name} failed: {e}");
                false
            }
        };
        (external, clip)
    }

    pub fn apply(&mut self, name: &str) -> Result<ApplyReport> {
        self.apply_with(name, self.config.remove_other_animations)
    }

    /// Restore `name` into the scene. A missing entry fails with
    /// [`LibraryError::NotFound`] before anything in the scene changes.
    pub fn apply_with(&mut self, name: &str, remove_others: bool) -> Result<ApplyReport> {
        let entry = self.get(name)?;
        Ok(apply_entry(&mut self.host, &entry, remove_others))
    }

    /// Bake `name` without writing anything.
    pub fn bake(&mut self, name: &str) -> Result<Clip> {
        let entry = self.get(name)?;
        Ok(bake_clip(&mut self.host, name, &entry, &self.config.export)?)
    }

    /// Bake `name` and write `three_<name>.json`; `false` when the clip
    /// could not be written.
    pub fn export_clip(&mut self, name: &str) -> Result<bool> {
        let clip = self.bake(name)?;
        Ok(self.library.write_clip(name, &clip))
    }

    /// Remove `name` from both stores and its clip. A full delete also
    /// purges the entry's curve sets from the scene, except those another
    /// entry still embeds.
    pub fn delete(&mut self, name: &str, full_delete: bool) -> Result<DeleteReport> {
        let slot = HostTextSlot::new(&mut self.host, &self.config.library.internal_text_name);
        let entry = match self.library.read_internal(&slot).shift_remove(name) {
            Some(entry) => entry,
            None => self
                .library
                .read_external()
                .shift_remove(name)
                .ok_or_else(|| LibraryError::NotFound(name.to_string()))?,
        };
        let shared: BTreeSet<String> = self
            .library
            .entries(&slot)
            .iter()
            .filter(|(other, _)| other.as_str() != name)
            .flat_map(|(_, e)| e.curve_set_names())
            .collect();

        let mut report = DeleteReport::default();
        {
            let mut slot =
                HostTextSlot::new(&mut self.host, &self.config.library.internal_text_name);
            report.removed_internal = self.library.remove(&mut slot, name)?;
        }
        report.external_removed = self.library.remove_external_entry(name);
        report.clip_removed = self.library.remove_clip(name);

        if full_delete {
            let (kept, purge): (Vec<String>, Vec<String>) = entry
                .curve_set_names()
                .into_iter()
                .partition(|set| shared.contains(set));
            if !kept.is_empty() {
                debug!("{name}: keeping shared curve sets {kept:?}");
            }
            report.purge = Some(purge_curve_sets(&mut self.host, purge));
            report.kept_shared = kept;
        }
        info!("deleted {name} (full: {full_delete})");
        Ok(report)
    }
}
