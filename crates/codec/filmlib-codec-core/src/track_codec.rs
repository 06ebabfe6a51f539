//! Object NLA structure <-> [`TrackSetData`].

use log::{debug, warn};

use filmlib_api_core::channel::is_animatable_path;
use filmlib_api_core::{StripData, TrackData, TrackSetData};

use crate::curve_codec::{deserialize_curve_set, serialize_curve_set};
use crate::error::{CodecError, HostError};
use crate::host::{SceneHost, StripProperty, StripRef};
use crate::outcome::Outcome;

/// Snapshot every track and strip of `object`, embedding a full copy of each
/// strip's curve set so the result replays without the source document.
pub fn serialize_tracks<H: SceneHost + ?Sized>(host: &H, object: &str) -> TrackSetData {
    let Some(binding) = host.animation(object) else {
        return TrackSetData::empty();
    };

    let tracks = binding
        .tracks
        .iter()
        .map(|track| TrackData {
            name: Some(track.name.clone()),
            strips: track
                .strips
                .iter()
                .map(|strip| StripData {
                    name: Some(strip.name.clone()),
                    frame_start: Some(strip.frame_start),
                    frame_end: Some(strip.frame_end),
                    action_frame_start: strip.action_frame_start,
                    action_frame_end: strip.action_frame_end,
                    action: strip
                        .curve_set
                        .as_deref()
                        .and_then(|name| serialize_curve_set(host.curve_set(name).as_ref())),
                    repeat: strip.repeat,
                    scale: strip.scale,
                    influence: strip.influence,
                    muted: strip.mute.unwrap_or(false),
                    blend_type: strip.blend_type.clone().unwrap_or_default(),
                    use_reverse: strip.use_reverse.unwrap_or(false),
                })
                .collect(),
        })
        .collect();

    TrackSetData {
        active_action_name: binding.active_curve_set,
        tracks,
        action: None,
    }
}

/// What [`deserialize_tracks`] produced.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct RestoredTracks {
    /// Every curve set referenced by at least one created strip, first-use order.
    pub curve_sets: Vec<String>,
    /// `active_action_name` from the data; the caller decides whether to bind it.
    pub saved_active: Option<String>,
    pub tracks_created: usize,
    pub strips_created: usize,
    /// Strip fields the host does not support or refused.
    pub fields_skipped: usize,
}

/// Replace every track on `object` with the tracks in `data`.
///
/// Curve sets are looked up by name first and only rebuilt from the embedded
/// payload when missing. A track or strip the host refuses is skipped; only a
/// missing object is an error.
pub fn deserialize_tracks<H: SceneHost + ?Sized>(
    host: &mut H,
    object: &str,
    data: &TrackSetData,
) -> Result<RestoredTracks, CodecError> {
    if host.object(object).is_none() {
        return Err(CodecError::MissingObject(object.to_string()));
    }
    host.ensure_animation(object)?;

    let mut out = RestoredTracks {
        saved_active: data.active_action_name.clone(),
        ..RestoredTracks::default()
    };

    let existing = host.animation(object).map(|b| b.tracks.len()).unwrap_or(0);
    for idx in (0..existing).rev() {
        if let Err(e) = host.remove_track(object, idx) {
            debug!("could not remove track {idx} on '{object}': {e}");
        }
    }

    let caps = host.capabilities();
    for (t_idx, tdata) in data.tracks.iter().enumerate() {
        let track_name = tdata
            .name
            .clone()
            .unwrap_or_else(|| format!("Track_{t_idx}"));
        let track = match host.new_track(object, &track_name) {
            Ok(i) => i,
            Err(e) => {
                warn!("track '{track_name}' on '{object}' not created: {e}");
                continue;
            }
        };
        out.tracks_created += 1;

        for (s_idx, sdata) in tdata.strips.iter().enumerate() {
            let curve_set = sdata.action.as_ref().and_then(|action| {
                if !action.name.is_empty() && host.has_curve_set(&action.name) {
                    return Some(action.name.clone());
                }
                match deserialize_curve_set(host, action, None) {
                    Ok(r) => Some(r.into_name()),
                    Err(e) => {
                        warn!("curve set '{}' for '{object}' not restored: {e}", action.name);
                        None
                    }
                }
            });

            let strip_name = sdata
                .name
                .clone()
                .unwrap_or_else(|| format!("Strip_{s_idx}"));
            let start = round_frame(sdata.frame_start.unwrap_or(1.0));

            let (strip, attached) =
                match host.new_strip(object, track, &strip_name, start, curve_set.as_deref()) {
                    Ok(i) => (i, curve_set.is_some()),
                    Err(first) => match host.new_strip(object, track, &strip_name, start, None) {
                        Ok(i) => {
                            debug!("strip '{strip_name}' created without curve set: {first}");
                            (i, false)
                        }
                        Err(e) => {
                            warn!("strip '{strip_name}' on '{object}' not created: {e}");
                            continue;
                        }
                    },
                };
            out.strips_created += 1;

            let target = StripRef {
                object,
                track,
                strip,
            };
            if let (Some(name), false) = (&curve_set, attached) {
                let late = StripProperty::CurveSet(name.clone());
                if let Err(e) = host.set_strip_property(target, &late) {
                    debug!("curve set '{name}' could not be attached late: {e}");
                }
            }

            for property in strip_properties(sdata) {
                match caps.assign(host, target, &property) {
                    Outcome::Applied(()) => {}
                    Outcome::Skipped(reason) => {
                        debug!("strip '{strip_name}': skipped {property:?} ({reason:?})");
                        out.fields_skipped += 1;
                    }
                    Outcome::Failed(e) => {
                        debug!("strip '{strip_name}': {property:?} failed: {e}");
                        out.fields_skipped += 1;
                    }
                }
            }

            if let Some(name) = curve_set {
                if !out.curve_sets.contains(&name) {
                    out.curve_sets.push(name);
                }
            }
        }
    }

    Ok(out)
}

/// Optional fields present in the data, in assignment order.
fn strip_properties(sdata: &StripData) -> Vec<StripProperty> {
    let mut props = Vec::with_capacity(9);
    if let Some(v) = sdata.action_frame_start {
        props.push(StripProperty::ActionFrameStart(v));
    }
    if let Some(v) = sdata.action_frame_end {
        props.push(StripProperty::ActionFrameEnd(v));
    }
    if let Some(v) = sdata.repeat {
        props.push(StripProperty::Repeat(v));
    }
    if let Some(v) = sdata.scale {
        props.push(StripProperty::Scale(v));
    }
    if let Some(v) = sdata.influence {
        props.push(StripProperty::Influence(v));
    }
    props.push(StripProperty::Mute(sdata.muted));
    props.push(StripProperty::BlendType(sdata.blend_type.clone()));
    props.push(StripProperty::UseReverse(sdata.use_reverse));
    props
}

fn round_frame(frame: f64) -> i32 {
    if frame.is_finite() {
        frame.round().clamp(i32::MIN as f64, i32::MAX as f64) as i32
    } else {
        1
    }
}

/// Wrap `curve_set` in a new track/strip on `object`.
///
/// `start_frame` defaults to the set's first keyframe frame, or 1 when the set
/// has no keyframes.
pub fn pushdown<H: SceneHost + ?Sized>(
    host: &mut H,
    object: &str,
    curve_set: &str,
    start_frame: Option<f64>,
) -> Outcome<(usize, usize)> {
    let Some(set) = host.curve_set(curve_set) else {
        return Outcome::Failed(HostError::CurveSetNotFound(curve_set.to_string()).into());
    };
    if host.object(object).is_none() {
        return Outcome::Failed(CodecError::MissingObject(object.to_string()));
    }
    if let Err(e) = host.ensure_animation(object) {
        return Outcome::Failed(e.into());
    }

    let start = start_frame.unwrap_or_else(|| {
        if set.curves.iter().any(|c| !c.keyframes.is_empty()) {
            set.frame_range()[0]
        } else {
            1.0
        }
    });

    let track = match host.new_track(object, &format!("Track_{curve_set}")) {
        Ok(t) => t,
        Err(e) => return Outcome::Failed(e.into()),
    };
    match host.new_strip(object, track, curve_set, round_frame(start), Some(curve_set)) {
        Ok(strip) => Outcome::Applied((track, strip)),
        Err(e) => Outcome::Failed(e.into()),
    }
}

/// True when at least one embedded curve drives a transform, color or opacity.
pub fn has_animatable_channels(data: &TrackSetData) -> bool {
    data.curves().any(|c| is_animatable_path(&c.data_path))
        || data
            .action
            .iter()
            .flat_map(|a| a.curves.iter())
            .any(|c| is_animatable_path(&c.data_path))
}
