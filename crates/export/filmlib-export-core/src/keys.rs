//! Stored keyframes mapped from curve-set time into scene frames.
//!
//! Every collector walks the non-muted strips of a stored [`TrackSetData`],
//! maps each key through its strip's placement and keeps only frames inside
//! the clip range. Strip `repeat` and `use_reverse` are not applied.

use std::collections::{BTreeMap, BTreeSet};

use filmlib_api_core::channel::find_keyframes;
use filmlib_api_core::{Channel, CurveSetData, TrackSetData};

/// Where one stored curve set sits on the scene timeline.
#[derive(Clone, Copy, Debug)]
pub struct Placement<'a> {
    pub curve_set: &'a CurveSetData,
    pub frame_start: f64,
    pub action_frame_start: f64,
    pub scale: f64,
}

impl<'a> Placement<'a> {
    /// A loose curve set played in scene time.
    pub fn identity(curve_set: &'a CurveSetData) -> Self {
        Self {
            curve_set,
            frame_start: 0.0,
            action_frame_start: 0.0,
            scale: 1.0,
        }
    }

    /// Scene frame of a curve-set frame, rounded half to even.
    pub fn scene_frame(&self, action_frame: f64) -> i32 {
        let f = self.frame_start + (action_frame - self.action_frame_start) * self.scale;
        f.round_ties_even() as i32
    }

    fn keys(&self, data_path: &str, array_index: i32) -> Vec<(f64, f64)> {
        find_keyframes(
            self.curve_set.curves.iter().map(Channel::Serialized),
            data_path,
            array_index,
        )
    }
}

/// Missing or zero numbers fall back to `default`.
fn or_default(value: Option<f64>, default: f64) -> f64 {
    match value {
        Some(v) if v != 0.0 && v.is_finite() => v,
        _ => default,
    }
}

/// Placements of every non-muted strip carrying curves. An object stored in
/// the legacy single-set shape yields that set at identity placement.
pub fn placements(anim: &TrackSetData) -> Vec<Placement<'_>> {
    if !anim.has_track_structure() {
        return anim
            .action
            .iter()
            .filter(|set| !set.curves.is_empty())
            .map(Placement::identity)
            .collect();
    }
    anim.strips()
        .filter(|s| !s.muted)
        .filter_map(|s| {
            let set = s.action.as_ref().filter(|a| !a.curves.is_empty())?;
            Some(Placement {
                curve_set: set,
                frame_start: or_default(s.frame_start, 0.0),
                action_frame_start: or_default(s.action_frame_start, 0.0),
                scale: or_default(s.scale, 1.0),
            })
        })
        .collect()
}

/// Every data path stored for the object, muted strips included.
pub fn stored_paths(anim: &TrackSetData) -> BTreeSet<&str> {
    let legacy = anim
        .action
        .iter()
        .filter(|_| !anim.has_track_structure())
        .flat_map(|set| set.curves.iter());
    anim.curves()
        .chain(legacy)
        .map(|c| c.data_path.as_str())
        .collect()
}

/// `(scene_frame, value)` pairs in `[start, end]`, sorted by frame. Keys
/// landing on the same frame are all kept in strip order.
pub fn collect_keys(
    placements: &[Placement<'_>],
    data_path: &str,
    array_index: i32,
    start: i32,
    end: i32,
) -> Vec<(i32, f64)> {
    let mut out = Vec::new();
    for p in placements {
        for (frame, value) in p.keys(data_path, array_index) {
            let f = p.scene_frame(frame);
            if (start..=end).contains(&f) {
                out.push((f, value));
            }
        }
    }
    out.sort_by_key(|(f, _)| *f);
    out
}

pub fn key_frames(
    placements: &[Placement<'_>],
    data_path: &str,
    array_index: i32,
    start: i32,
    end: i32,
) -> BTreeSet<i32> {
    collect_keys(placements, data_path, array_index, start, end)
        .into_iter()
        .map(|(f, _)| f)
        .collect()
}

/// One value per frame; on collisions the last strip in declaration order wins.
pub fn dense_keys(
    placements: &[Placement<'_>],
    data_path: &str,
    array_index: i32,
    start: i32,
    end: i32,
) -> BTreeMap<i32, f64> {
    let mut out = BTreeMap::new();
    for p in placements {
        for (frame, value) in p.keys(data_path, array_index) {
            let f = p.scene_frame(frame);
            if (start..=end).contains(&f) {
                out.insert(f, value);
            }
        }
    }
    out
}

/// Step-hold lookup over frame-sorted keys: an exact frame match wins,
/// otherwise the last key before `frame`, otherwise the first key.
pub fn step_value(keys: &[(i32, f64)], frame: i32) -> f64 {
    let Some(&(_, first)) = keys.first() else {
        return 0.0;
    };
    let mut last = first;
    for &(f, v) in keys {
        if f == frame {
            return v;
        }
        if f > frame {
            break;
        }
        last = v;
    }
    last
}

/// `start, start + step, ...` up to `end` inclusive.
pub fn fixed_step_frames(start: i32, end: i32, step: u32) -> Vec<i32> {
    if start > end || step == 0 {
        return Vec::new();
    }
    (start..=end).step_by(step as usize).collect()
}

/// Fixed-step frames that always finish on `end`.
pub fn fixed_step_frames_with_end(start: i32, end: i32, step: u32) -> Vec<i32> {
    let mut frames = fixed_step_frames(start, end, step);
    if frames.is_empty() {
        frames = vec![start, end];
    }
    if frames.last() != Some(&end) {
        frames.push(end);
    }
    frames
}
