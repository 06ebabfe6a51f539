//! Stored entry -> clip.
//!
//! Keys come from the entry's embedded curve sets; transforms come from the
//! host evaluated at each sampled frame. The host's current frame is put
//! back before returning.

use std::collections::BTreeSet;

use log::{debug, info};

use filmlib_api_core::channel::{
    COLOR, DELTA_LOCATION, FADE, LOCATION, OPACITY, ROTATION_EULER, ROTATION_QUATERNION,
};
use filmlib_api_core::{LibraryEntry, MarkerData, ObjectTracks, VisibilityMode};
use filmlib_codec_core::{ObjectInfo, ObjectKind, SceneHost};

use crate::annotations::build_tree;
use crate::clip::{AlphaTrack, Clip, ClipTrack, TrackKind};
use crate::config::ExportConfig;
use crate::error::ExportError;
use crate::keys::{
    collect_keys, dense_keys, fixed_step_frames, fixed_step_frames_with_end, key_frames,
    placements, step_value, stored_paths, Placement,
};
use crate::quat::{continuous, is_constant, Quat};
use crate::sampling::{decompose, local_matrix, FrameGuard};

/// Clip timing shared by every track of one bake.
#[derive(Clone, Copy, Debug)]
struct Timebase {
    fps: f64,
    start: i32,
    end: i32,
}

impl Timebase {
    fn time(&self, frame: i32) -> f64 {
        f64::from(frame - self.start) / self.fps
    }

    fn times(&self, frames: &[i32]) -> Vec<f64> {
        frames.iter().map(|f| self.time(*f)).collect()
    }
}

/// Stable node id: the configured id property, else the object name.
pub fn node_id(info: &ObjectInfo, cfg: &ExportConfig) -> String {
    info.string_property(&cfg.node_id_property)
        .map(str::to_string)
        .unwrap_or_else(|| info.name.clone())
}

pub fn is_camera(info: &ObjectInfo) -> bool {
    info.kind == ObjectKind::Camera || info.name.starts_with("Camera")
}

fn frame_range<H: SceneHost + ?Sized>(
    host: &H,
    name: &str,
    entry: &LibraryEntry,
) -> Result<(i32, i32), ExportError> {
    let scene = host.frame_range().ok();
    let start = entry.frame_start().or(scene.map(|r| r.0));
    let end = entry.frame_end().or(scene.map(|r| r.1));
    match (start, end) {
        (Some(s), Some(e)) => Ok((s, e)),
        _ => Err(ExportError::NoFrameRange(name.to_string())),
    }
}

/// Bake `entry` into a clip named `name`.
pub fn bake_clip<H: SceneHost + ?Sized>(
    host: &mut H,
    name: &str,
    entry: &LibraryEntry,
    cfg: &ExportConfig,
) -> Result<Clip, ExportError> {
    cfg.validate()?;
    let fps = cfg.effective_fps(host.fps());
    let (start, end) = frame_range(&*host, name, entry)?;
    let tb = Timebase { fps, start, end };

    let mut clip = Clip {
        name: name.to_string(),
        fps,
        frame_start: start,
        frame_end: end,
        duration: f64::from(end - start) / fps,
        tracks: Vec::new(),
        alpha_tracks: Vec::new(),
        visible_nodes_mode: VisibilityMode::All,
        visible_nodes: None,
        markers_text: Vec::new(),
    };

    if entry.visible_objects_mode == VisibilityMode::Selected {
        if let Some(names) = entry.visible_objects.as_ref().filter(|n| !n.is_empty()) {
            clip.visible_nodes_mode = VisibilityMode::Selected;
            clip.visible_nodes = Some(
                names
                    .iter()
                    .filter_map(|n| host.object(n))
                    .map(|info| node_id(&info, cfg))
                    .collect(),
            );
        }
    }

    {
        let mut guard = FrameGuard::new(host);
        for tracks in &entry.tracks {
            bake_object(&mut guard, tracks, tb, cfg, &mut clip);
        }
    }

    let (markers, text) = annotation_source(&*host, entry);
    if let Some(text) = text {
        clip.markers_text = build_tree(&markers, &text, fps);
    }

    info!(
        "baked clip {name}: {} tracks, {} alpha tracks, {} annotation roots",
        clip.tracks.len(),
        clip.alpha_tracks.len(),
        clip.markers_text.len()
    );
    Ok(clip)
}

/// Stored markers and text when present, otherwise the live scene's.
fn annotation_source<H: SceneHost + ?Sized>(
    host: &H,
    entry: &LibraryEntry,
) -> (Vec<MarkerData>, Option<String>) {
    let markers = match entry.timeline_markers.as_ref().filter(|m| !m.is_empty()) {
        Some(_) => entry.sorted_markers(),
        None => {
            let mut live = host.timeline_markers();
            live.sort_by_key(|m| m.frame);
            live
        }
    };
    let text = match entry.text_editor.as_ref().and_then(|t| t.content.clone()) {
        Some(content) => Some(content),
        None => host.active_text().and_then(|t| t.content),
    };
    (markers, text.filter(|t| !t.is_empty()))
}

fn bake_object<H: SceneHost + ?Sized>(
    guard: &mut FrameGuard<'_, H>,
    tracks: &ObjectTracks,
    tb: Timebase,
    cfg: &ExportConfig,
    clip: &mut Clip,
) {
    let Some(info) = guard.object(&tracks.object_name) else {
        debug!("skipping {}: not in scene", tracks.object_name);
        return;
    };
    let anim = &tracks.animation;
    let paths = stored_paths(anim);
    if paths.is_empty() {
        return;
    }
    let node = node_id(&info, cfg);
    let camera = is_camera(&info);
    let placed = placements(anim);

    if cfg.export_alpha_tracks && (paths.contains(COLOR) || paths.contains(OPACITY)) {
        if let Some(track) = alpha_track(&node, &placed, tb) {
            clip.alpha_tracks.push(track);
        }
    }

    if paths.contains(LOCATION) || paths.contains(DELTA_LOCATION) {
        let frames = if cfg.camera_bake_dense && camera {
            fixed_step_frames(tb.start, tb.end, cfg.camera_bake_step_frames)
        } else {
            position_frames(&placed, tb)
        };
        if !frames.is_empty() {
            let mut values = Vec::with_capacity(frames.len() * 3);
            for &f in &frames {
                guard.seek(f);
                let t = decompose(&local_matrix(&**guard, &info.name)).translation;
                values.extend([t.x, t.y, t.z]);
            }
            clip.tracks.push(ClipTrack::new(
                TrackKind::Vector,
                &node,
                "position",
                tb.times(&frames),
                values,
            ));
        }
    }

    if paths.contains(ROTATION_QUATERNION) || paths.contains(ROTATION_EULER) {
        let step = if cfg.camera_bake_dense && camera {
            cfg.camera_bake_step_frames
        } else {
            cfg.rot_bake_step_frames
        };
        let frames = fixed_step_frames_with_end(tb.start, tb.end, step);
        let mut values = Vec::with_capacity(frames.len() * 4);
        let mut prev: Option<Quat> = None;
        for &f in &frames {
            guard.seek(f);
            let q = decompose(&local_matrix(&**guard, &info.name)).quaternion_xyzw();
            let q = continuous(prev.as_ref(), q);
            values.extend(q);
            prev = Some(q);
        }
        if is_constant(&values, cfg.quaternion_epsilon) {
            debug!("{node}: rotation constant, track omitted");
        } else {
            clip.tracks.push(ClipTrack::new(
                TrackKind::Quaternion,
                &node,
                "quaternion",
                tb.times(&frames),
                values,
            ));
        }
    }

    let fade = collect_keys(&placed, FADE, 0, tb.start, tb.end);
    if !fade.is_empty() {
        let mut frames: Vec<i32> = fade.iter().map(|(f, _)| *f).collect();
        frames.dedup();
        let values = frames.iter().map(|f| step_value(&fade, *f)).collect();
        clip.tracks.push(ClipTrack::new(
            TrackKind::Number,
            &node,
            "userData.fade",
            tb.times(&frames),
            values,
        ));
    }
}

/// Union of location key frames, or delta-location when location has none.
fn position_frames(placed: &[Placement<'_>], tb: Timebase) -> Vec<i32> {
    let union = |path: &str| {
        (0..3)
            .flat_map(|i| key_frames(placed, path, i, tb.start, tb.end))
            .collect::<BTreeSet<i32>>()
    };
    let mut frames = union(LOCATION);
    if frames.is_empty() {
        frames = union(DELTA_LOCATION);
    }
    frames.into_iter().collect()
}

/// Opacity from the custom channel, else from the colour alpha; clamped.
fn alpha_track(node: &str, placed: &[Placement<'_>], tb: Timebase) -> Option<AlphaTrack> {
    [(OPACITY, 0, "[\"alpha\"]"), (COLOR, 3, "color[3]")]
        .into_iter()
        .find_map(|(path, idx, source)| {
            let dense = dense_keys(placed, path, idx, tb.start, tb.end);
            if dense.is_empty() {
                return None;
            }
            let frames: Vec<i32> = dense.keys().copied().collect();
            Some(AlphaTrack {
                node: node.to_string(),
                times: tb.times(&frames),
                values: dense.values().map(|v| v.clamp(0.0, 1.0)).collect(),
                source: source.to_string(),
            })
        })
}
