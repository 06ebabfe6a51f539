//! Pose evaluation for [`super::MemoryHost`].
//!
//! Model:
//! - Curves interpolate linearly between keys; a CONSTANT key holds its value
//!   until the next key. Other easing modes are treated as linear.
//! - Before the first key the first value holds, after the last key the last.
//! - Strips replace in track order (influence and blend mode are ignored),
//!   then the active curve set is evaluated on top at scene time.

use nalgebra::{Matrix4, Quaternion, Translation3, UnitQuaternion, Vector3};

use filmlib_api_core::channel::{DELTA_LOCATION, LOCATION, ROTATION_EULER, ROTATION_QUATERNION, SCALE};
use filmlib_api_core::{Interpolation, LiveCurve, LiveCurveSet};

use crate::host::LiveStrip;

/// Evaluated local transform channels of one object.
#[derive(Clone, Debug, PartialEq)]
pub(crate) struct Pose {
    pub location: [f64; 3],
    pub delta_location: [f64; 3],
    pub rotation_euler: [f64; 3],
    /// `(w, x, y, z)`; set once any quaternion channel is animated.
    pub rotation_quaternion: Option<[f64; 4]>,
    pub scale: [f64; 3],
}

impl Pose {
    pub fn rest(location: [f64; 3], rotation_euler: [f64; 3], scale: [f64; 3]) -> Self {
        Self {
            location,
            delta_location: [0.0; 3],
            rotation_euler,
            rotation_quaternion: None,
            scale,
        }
    }

    pub fn apply_curve_set(&mut self, set: &LiveCurveSet, frame: f64) {
        for curve in &set.curves {
            let Some(value) = evaluate_curve(curve, frame) else {
                continue;
            };
            let idx = curve.array_index;
            match curve.data_path.as_str() {
                LOCATION => set_slot(&mut self.location, idx, value),
                DELTA_LOCATION => set_slot(&mut self.delta_location, idx, value),
                ROTATION_EULER => set_slot(&mut self.rotation_euler, idx, value),
                SCALE => set_slot(&mut self.scale, idx, value),
                ROTATION_QUATERNION => {
                    let q = self.rotation_quaternion.get_or_insert([1.0, 0.0, 0.0, 0.0]);
                    set_slot(q, idx, value);
                }
                _ => {}
            }
        }
    }

    pub fn rotation(&self) -> UnitQuaternion<f64> {
        match self.rotation_quaternion {
            Some([w, x, y, z]) => {
                let q = Quaternion::new(w, x, y, z);
                if q.norm() <= f64::EPSILON {
                    UnitQuaternion::identity()
                } else {
                    UnitQuaternion::from_quaternion(q)
                }
            }
            None => {
                let [x, y, z] = self.rotation_euler;
                UnitQuaternion::from_euler_angles(x, y, z)
            }
        }
    }

    /// Translation * rotation * scale.
    pub fn matrix(&self) -> Matrix4<f64> {
        let t = Vector3::from(self.location) + Vector3::from(self.delta_location);
        Translation3::from(t).to_homogeneous()
            * self.rotation().to_homogeneous()
            * Matrix4::new_nonuniform_scaling(&Vector3::from(self.scale))
    }
}

fn set_slot<const N: usize>(slots: &mut [f64; N], idx: i32, value: f64) {
    if let Some(slot) = usize::try_from(idx).ok().and_then(|i| slots.get_mut(i)) {
        *slot = value;
    }
}

/// Value of `curve` at `frame`; `None` for a curve without keys.
pub(crate) fn evaluate_curve(curve: &LiveCurve, frame: f64) -> Option<f64> {
    let keys = &curve.keyframes;
    let first = keys.first()?;
    if keys.len() == 1 || frame <= first.frame {
        return Some(first.value);
    }
    let last = &keys[keys.len() - 1];
    if frame >= last.frame {
        return Some(last.value);
    }
    for pair in keys.windows(2) {
        let (left, right) = (&pair[0], &pair[1]);
        if frame >= left.frame && frame <= right.frame {
            if left.interpolation == Interpolation::Constant {
                return Some(left.value);
            }
            let span = (right.frame - left.frame).max(f64::EPSILON);
            let t = ((frame - left.frame) / span).clamp(0.0, 1.0);
            return Some(left.value + (right.value - left.value) * t);
        }
    }
    Some(last.value)
}

/// Curve-set local frame for scene `frame`, held at the strip's action range.
pub(crate) fn strip_local_frame(strip: &LiveStrip, frame: f64) -> f64 {
    let action_start = strip.action_frame_start.unwrap_or(strip.frame_start);
    let action_end = strip.action_frame_end.unwrap_or(action_start);
    let scale = strip
        .scale
        .filter(|s| s.is_finite() && s.abs() > f64::EPSILON)
        .unwrap_or(1.0);
    let local = action_start + (frame - strip.frame_start) / scale;
    if action_end >= action_start {
        local.clamp(action_start, action_end)
    } else {
        local
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use filmlib_api_core::LiveKeyframe;

    fn curve(keys: &[(f64, f64, Interpolation)]) -> LiveCurve {
        LiveCurve {
            data_path: LOCATION.into(),
            array_index: 0,
            keyframes: keys
                .iter()
                .map(|(f, v, i)| LiveKeyframe {
                    frame: *f,
                    value: *v,
                    interpolation: i.clone(),
                })
                .collect(),
        }
    }

    #[test]
    fn linear_and_held_segments() {
        let c = curve(&[
            (0.0, 0.0, Interpolation::Linear),
            (10.0, 10.0, Interpolation::Constant),
            (20.0, 0.0, Interpolation::Linear),
        ]);
        assert_relative_eq!(evaluate_curve(&c, -5.0).unwrap(), 0.0);
        assert_relative_eq!(evaluate_curve(&c, 2.5).unwrap(), 2.5);
        assert_relative_eq!(evaluate_curve(&c, 15.0).unwrap(), 10.0);
        assert_relative_eq!(evaluate_curve(&c, 25.0).unwrap(), 0.0);
        assert!(evaluate_curve(&curve(&[]), 1.0).is_none());
    }

    #[test]
    fn strip_mapping_divides_by_scale() {
        let strip = LiveStrip {
            name: "S".into(),
            frame_start: 10.0,
            frame_end: 30.0,
            curve_set: None,
            action_frame_start: Some(0.0),
            action_frame_end: Some(10.0),
            repeat: Some(1.0),
            scale: Some(2.0),
            influence: Some(1.0),
            mute: Some(false),
            blend_type: None,
            use_reverse: Some(false),
        };
        assert_relative_eq!(strip_local_frame(&strip, 20.0), 5.0);
        assert_relative_eq!(strip_local_frame(&strip, 0.0), 0.0);
        assert_relative_eq!(strip_local_frame(&strip, 90.0), 10.0);
    }

    #[test]
    fn quaternion_channel_overrides_euler() {
        let mut pose = Pose::rest([0.0; 3], [0.3, 0.0, 0.0], [1.0; 3]);
        assert!(pose.rotation().angle() > 0.29);
        pose.rotation_quaternion = Some([1.0, 0.0, 0.0, 0.0]);
        assert_relative_eq!(pose.rotation().angle(), 0.0);
    }
}
