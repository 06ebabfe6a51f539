//! Scene -> [`LibraryEntry`].

use log::{debug, trace};
use serde::{Deserialize, Serialize};

use filmlib_api_core::{now_iso8601, LibraryEntry, MarkerData, ObjectTracks, VisibilityMode};

use crate::host::SceneHost;
use crate::track_codec::{has_animatable_channels, serialize_tracks};

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CaptureOptions {
    /// Capture only the selected objects and record them as the visible set.
    pub only_selected: bool,
    pub include_markers_and_text: bool,
}

impl Default for CaptureOptions {
    fn default() -> Self {
        Self {
            only_selected: false,
            include_markers_and_text: true,
        }
    }
}

impl CaptureOptions {
    pub fn selected() -> Self {
        Self {
            only_selected: true,
            ..Self::default()
        }
    }
}

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct CaptureReport {
    pub captured: Vec<String>,
    /// Objects with animation but no transform, color or opacity channel.
    pub excluded: Vec<String>,
}

/// Build a fresh entry from the current scene.
pub fn capture<H: SceneHost + ?Sized>(
    host: &H,
    description: &str,
    options: &CaptureOptions,
) -> (LibraryEntry, CaptureReport) {
    let mut entry = LibraryEntry::new(description);
    let report = fill(host, &mut entry, options);
    (entry, report)
}

/// Re-capture into an existing entry.
///
/// Tracks are replaced wholesale and `created_at` is restamped; the
/// description and unknown fields survive. Markers and text that are no
/// longer in the scene are removed from the entry.
pub fn refresh<H: SceneHost + ?Sized>(
    host: &H,
    entry: &mut LibraryEntry,
    options: &CaptureOptions,
) -> CaptureReport {
    entry.created_at = now_iso8601();
    fill(host, entry, options)
}

fn fill<H: SceneHost + ?Sized>(
    host: &H,
    entry: &mut LibraryEntry,
    options: &CaptureOptions,
) -> CaptureReport {
    let objects = if options.only_selected {
        let selected = host.selected_object_names();
        entry.visible_objects_mode = VisibilityMode::Selected;
        entry.visible_objects = Some(selected.clone());
        selected
    } else {
        entry.visible_objects_mode = VisibilityMode::All;
        entry.visible_objects = None;
        host.object_names()
    };

    let mut report = CaptureReport::default();
    entry.tracks = Vec::with_capacity(objects.len());
    for name in objects {
        let animation = serialize_tracks(host, &name);
        if has_animatable_channels(&animation) {
            entry.tracks.push(ObjectTracks {
                object_name: name.clone(),
                animation,
            });
            report.captured.push(name);
        } else if animation.has_track_structure() || animation.active_action_name.is_some() {
            trace!("'{name}' has no transform channels; not captured");
            report.excluded.push(name);
        }
    }

    match host.frame_range() {
        Ok((start, end)) => entry.set_frame_range(start, end),
        Err(e) => debug!("frame range not captured: {e}"),
    }

    entry.timeline_markers = None;
    entry.text_editor = None;
    if options.include_markers_and_text {
        let mut markers: Vec<MarkerData> = host.timeline_markers();
        markers.sort_by_key(|m| m.frame);
        if !markers.is_empty() {
            entry.timeline_markers = Some(markers);
        }
        entry.text_editor = host.active_text();
    }

    report
}
