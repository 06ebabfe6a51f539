//! Clip export configuration.

use serde::{Deserialize, Serialize};

use crate::error::ExportError;

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ExportConfig {
    /// Rotation sampling step for non-camera objects, in frames.
    pub rot_bake_step_frames: u32,
    /// Sample cameras on a fixed dense grid regardless of their keys.
    pub camera_bake_dense: bool,
    pub camera_bake_step_frames: u32,
    /// Custom property holding a stable node id; the object name is used
    /// when it is absent or blank.
    pub node_id_property: String,
    pub export_alpha_tracks: bool,
    /// Per-component tolerance of the constant-rotation check.
    pub quaternion_epsilon: f64,
    /// Frame rate used when the scene reports a degenerate one.
    pub fallback_fps: f64,
}

impl Default for ExportConfig {
    fn default() -> Self {
        Self {
            rot_bake_step_frames: 24,
            camera_bake_dense: true,
            camera_bake_step_frames: 6,
            node_id_property: "gltf_id".to_string(),
            export_alpha_tracks: true,
            quaternion_epsilon: 1e-6,
            fallback_fps: 24.0,
        }
    }
}

impl ExportConfig {
    pub fn validate(&self) -> Result<(), ExportError> {
        if self.rot_bake_step_frames == 0 {
            return Err(ExportError::InvalidConfig("rot_bake_step_frames must be > 0"));
        }
        if self.camera_bake_step_frames == 0 {
            return Err(ExportError::InvalidConfig(
                "camera_bake_step_frames must be > 0",
            ));
        }
        if !(self.fallback_fps.is_finite() && self.fallback_fps > 0.0) {
            return Err(ExportError::InvalidConfig("fallback_fps must be > 0"));
        }
        if !(self.quaternion_epsilon.is_finite() && self.quaternion_epsilon >= 0.0) {
            return Err(ExportError::InvalidConfig("quaternion_epsilon must be >= 0"));
        }
        Ok(())
    }

    /// Effective rate from `(fps, fps_base)`.
    pub fn effective_fps(&self, (fps, fps_base): (f64, f64)) -> f64 {
        let base = if fps_base == 0.0 || !fps_base.is_finite() {
            1.0
        } else {
            fps_base
        };
        let rate = fps / base;
        if rate.is_finite() && rate > 0.0 {
            rate
        } else {
            self.fallback_fps
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn degenerate_rates_fall_back() {
        let cfg = ExportConfig::default();
        assert_eq!(cfg.effective_fps((30000.0, 1001.0)), 30000.0 / 1001.0);
        assert_eq!(cfg.effective_fps((25.0, 0.0)), 25.0);
        assert_eq!(cfg.effective_fps((0.0, 1.0)), 24.0);
        assert_eq!(cfg.effective_fps((-5.0, 1.0)), 24.0);
    }

    #[test]
    fn zero_steps_are_rejected() {
        let cfg = ExportConfig {
            rot_bake_step_frames: 0,
            ..ExportConfig::default()
        };
        assert!(cfg.validate().is_err());
        assert!(ExportConfig::default().validate().is_ok());
    }
}
