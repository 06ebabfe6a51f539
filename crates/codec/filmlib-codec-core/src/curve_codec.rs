//! Curve set <-> serialized form.

use log::{debug, warn};

use filmlib_api_core::{CurveData, CurveSetData, KeyframeData, LiveCurveSet};

use crate::error::{CodecError, HostError};
use crate::host::SceneHost;

/// Name used when neither the data nor the caller offers one.
pub const FALLBACK_CURVE_SET_NAME: &str = "action";

/// How a serialized curve set was resolved against the host.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum CurveSetResolution {
    /// A same-named set already existed and was returned untouched.
    Reused(String),
    /// A new set was built from the payload under this (possibly suffixed) name.
    Created(String),
}

impl CurveSetResolution {
    pub fn name(&self) -> &str {
        match self {
            CurveSetResolution::Reused(n) | CurveSetResolution::Created(n) => n,
        }
    }

    pub fn into_name(self) -> String {
        match self {
            CurveSetResolution::Reused(n) | CurveSetResolution::Created(n) => n,
        }
    }
}

/// Capture every curve and every keyframe of `set`. `None` in, `None` out.
pub fn serialize_curve_set(set: Option<&LiveCurveSet>) -> Option<CurveSetData> {
    let set = set?;
    let curves = set
        .curves
        .iter()
        .map(|c| CurveData {
            data_path: c.data_path.clone(),
            array_index: c.array_index,
            points: c
                .keyframes
                .iter()
                .map(|k| KeyframeData::new(k.frame, k.value, k.interpolation.clone()))
                .collect(),
        })
        .collect();
    Some(CurveSetData {
        name: set.name.clone(),
        frame_range: set.frame_range(),
        curves,
    })
}

/// First free name among `desired`, `desired_1`, `desired_2`, ...
pub fn unique_curve_set_name<H: SceneHost + ?Sized>(host: &H, desired: &str) -> String {
    if !host.has_curve_set(desired) {
        return desired.to_string();
    }
    let mut i = 1usize;
    loop {
        let candidate = format!("{desired}_{i}");
        if !host.has_curve_set(&candidate) {
            return candidate;
        }
        i += 1;
    }
}

/// Resolve `data` against the host.
///
/// Order: a set named `data.name` is reused; else a set named `preferred_name`
/// is reused; else a new set is created under a unique name. A curve the host
/// refuses to add is skipped, and so is an interpolation it refuses to set. A
/// keyframe it refuses to insert aborts the set, which is then removed so no
/// partial set is left behind.
pub fn deserialize_curve_set<H: SceneHost + ?Sized>(
    host: &mut H,
    data: &CurveSetData,
    preferred_name: Option<&str>,
) -> Result<CurveSetResolution, CodecError> {
    let orig = Some(data.name.as_str()).filter(|n| !n.is_empty());
    if let Some(name) = orig {
        if host.has_curve_set(name) {
            return Ok(CurveSetResolution::Reused(name.to_string()));
        }
    }
    let preferred = preferred_name.filter(|n| !n.is_empty());
    if let Some(name) = preferred {
        if host.has_curve_set(name) {
            return Ok(CurveSetResolution::Reused(name.to_string()));
        }
    }

    let desired = orig.or(preferred).unwrap_or(FALLBACK_CURVE_SET_NAME);
    let name = unique_curve_set_name(host, desired);
    host.create_curve_set(&name)?;

    if let Err(e) = fill_curve_set(host, &name, data) {
        warn!("curve set '{name}' could not be rebuilt: {e}; removing partial set");
        if let Err(remove_err) = host.remove_curve_set(&name) {
            warn!("partial curve set '{name}' could not be removed: {remove_err}");
        }
        return Err(e.into());
    }
    Ok(CurveSetResolution::Created(name))
}

fn fill_curve_set<H: SceneHost + ?Sized>(
    host: &mut H,
    name: &str,
    data: &CurveSetData,
) -> Result<(), HostError> {
    for curve in &data.curves {
        if let Err(e) = host.add_curve(name, &curve.data_path, curve.array_index) {
            debug!(
                "skip curve {}[{}] in '{name}': {e}",
                curve.data_path, curve.array_index
            );
            continue;
        }
        for point in &curve.points {
            let (frame, value) = match point.co.as_slice() {
                [frame, value, ..] => (*frame, *value),
                _ => (0.0, 0.0),
            };
            host.insert_keyframe(name, &curve.data_path, curve.array_index, frame, value)?;
            if let Some(interp) = &point.interpolation {
                if let Err(e) = host.set_keyframe_interpolation(
                    name,
                    &curve.data_path,
                    curve.array_index,
                    frame,
                    interp,
                ) {
                    debug!(
                        "interpolation {interp} not applied at {}[{}]@{frame}: {e}",
                        curve.data_path, curve.array_index
                    );
                }
            }
        }
    }
    Ok(())
}
