//! [`LibraryEntry`] -> scene.

use hashbrown::HashSet;
use log::{debug, info, warn};

use filmlib_api_core::{LibraryEntry, TrackSetData, VisibilityMode};

use crate::cleanup::clear_object_animation;
use crate::curve_codec::deserialize_curve_set;
use crate::error::CodecError;
use crate::host::SceneHost;
use crate::outcome::{Outcome, SkipReason};
use crate::track_codec::{deserialize_tracks, pushdown};

/// Per-object results of [`apply_entry`].
#[derive(Clone, Debug, Default, PartialEq)]
pub struct ApplyReport {
    pub applied: Vec<String>,
    pub skipped: Vec<(String, SkipReason)>,
    pub failed: Vec<(String, CodecError)>,
    /// Curve sets now referenced by restored strips.
    pub curve_sets: Vec<String>,
}

impl ApplyReport {
    pub fn summary(&self) -> String {
        format!("{} objects restored", self.applied.len())
    }
}

/// Restore `entry` into the scene.
///
/// With `remove_others`, every object the entry does not name loses its
/// animation first. Failures are contained per object and per step; the
/// report says what happened to each object the entry names.
pub fn apply_entry<H: SceneHost + ?Sized>(
    host: &mut H,
    entry: &LibraryEntry,
    remove_others: bool,
) -> ApplyReport {
    apply_frame_range(host, entry);

    if remove_others {
        let keep: HashSet<&str> = entry.object_names().collect();
        for object in host.object_names() {
            if !keep.contains(object.as_str()) {
                clear_object_animation(host, &object);
            }
        }
    }

    let mut report = ApplyReport::default();
    for tracks in &entry.tracks {
        let object = tracks.object_name.as_str();
        match restore_object(host, object, &tracks.animation) {
            Outcome::Applied(sets) => {
                for set in sets {
                    if !report.curve_sets.contains(&set) {
                        report.curve_sets.push(set);
                    }
                }
                report.applied.push(object.to_string());
            }
            Outcome::Skipped(reason) => {
                debug!("'{object}' skipped: {reason:?}");
                report.skipped.push((object.to_string(), reason));
            }
            Outcome::Failed(e) => {
                warn!("'{object}' not restored: {e}");
                report.failed.push((object.to_string(), e));
            }
        }
    }

    let current = host.current_frame();
    if let Err(e) = host.set_frame(current) {
        debug!("scene not re-evaluated: {e}");
    }

    apply_markers(host, entry);
    apply_text(host, entry);
    apply_visibility(host, entry);

    info!("{}", report.summary());
    report
}

fn apply_frame_range<H: SceneHost + ?Sized>(host: &mut H, entry: &LibraryEntry) {
    let mut updated = false;
    if let Some(start) = entry.frame_start() {
        match host.set_frame_start(start) {
            Ok(()) => updated = true,
            Err(e) => debug!("frame_start {start} not applied: {e}"),
        }
    } else if entry.frame_start.is_some() {
        debug!("malformed frame_start ignored");
    }
    if let Some(end) = entry.frame_end() {
        match host.set_frame_end(end) {
            Ok(()) => updated = true,
            Err(e) => debug!("frame_end {end} not applied: {e}"),
        }
    } else if entry.frame_end.is_some() {
        debug!("malformed frame_end ignored");
    }
    if !updated {
        return;
    }

    let Ok((start, end)) = host.frame_range() else {
        return;
    };
    let current = host.current_frame();
    let clamped = if current < start {
        start
    } else if current > end {
        end
    } else {
        return;
    };
    if let Err(e) = host.set_frame(clamped) {
        debug!("current frame not clamped to {clamped}: {e}");
    }
}

fn restore_object<H: SceneHost + ?Sized>(
    host: &mut H,
    object: &str,
    data: &TrackSetData,
) -> Outcome<Vec<String>> {
    if host.object(object).is_none() {
        return Outcome::Skipped(SkipReason::MissingObject(object.to_string()));
    }

    if data.has_track_structure() {
        let restored = match deserialize_tracks(host, object, data) {
            Ok(r) => r,
            Err(e) => return Outcome::Failed(e),
        };
        let active = restored
            .saved_active
            .as_deref()
            .filter(|name| host.has_curve_set(name));
        if let Err(e) = host.set_active_curve_set(object, active) {
            debug!("'{object}': active curve set not rebound: {e}");
        }
        return Outcome::Applied(restored.curve_sets);
    }

    let Some(action) = &data.action else {
        return Outcome::Skipped(SkipReason::NoData);
    };
    let preferred = format!("{object}__{}", action.name);
    let set = match deserialize_curve_set(host, action, Some(&preferred)) {
        Ok(r) => r.into_name(),
        Err(e) => return Outcome::Failed(e),
    };
    if let Err(e) = host.ensure_animation(object) {
        return Outcome::Failed(e.into());
    }
    if let Outcome::Failed(e) = pushdown(host, object, &set, None) {
        debug!("'{object}': curve set '{set}' not pushed down: {e}");
    }
    let active = data.active_action_name.as_ref().map(|_| set.as_str());
    if let Err(e) = host.set_active_curve_set(object, active) {
        debug!("'{object}': active curve set not rebound: {e}");
    }
    Outcome::Applied(vec![set])
}

fn apply_markers<H: SceneHost + ?Sized>(host: &mut H, entry: &LibraryEntry) {
    let Some(markers) = entry.timeline_markers.as_ref().filter(|m| !m.is_empty()) else {
        return;
    };
    if let Err(e) = host.clear_markers() {
        debug!("markers not cleared: {e}");
        return;
    }
    for marker in markers {
        if let Err(e) = host.add_marker(&marker.name, marker.frame) {
            debug!("marker '{}' at {} not restored: {e}", marker.name, marker.frame);
        }
    }
}

fn apply_text<H: SceneHost + ?Sized>(host: &mut H, entry: &LibraryEntry) {
    let Some(text) = &entry.text_editor else {
        return;
    };
    // Empty content is a valid state; a missing name is not.
    let Some(content) = text.content.as_deref() else {
        return;
    };
    if text.name.is_empty() {
        return;
    }
    if let Err(e) = host.write_text(&text.name, content) {
        debug!("text '{}' not restored: {e}", text.name);
    }
}

fn apply_visibility<H: SceneHost + ?Sized>(host: &mut H, entry: &LibraryEntry) {
    let visible: HashSet<&str> = match entry.visible_objects_mode {
        VisibilityMode::All => HashSet::new(),
        VisibilityMode::Selected => entry
            .visible_objects
            .iter()
            .flatten()
            .map(String::as_str)
            .collect(),
    };
    for object in host.object_names() {
        let hidden = entry.visible_objects_mode == VisibilityMode::Selected
            && !visible.contains(object.as_str());
        if let Err(e) = host.set_hidden(&object, hidden) {
            debug!("'{object}': hide={hidden} not applied: {e}");
        }
        if let Err(e) = host.set_render_hidden(&object, hidden) {
            debug!("'{object}': render hide={hidden} not applied: {e}");
        }
    }
}
