//! Frame scrubbing and parent-relative transform sampling.

use std::ops::{Deref, DerefMut};

use log::{debug, warn};
use nalgebra::{Matrix3, Matrix4, Rotation3, UnitQuaternion, Vector3};

use filmlib_codec_core::SceneHost;

use crate::quat::Quat;

/// Holds the host while frames are scrubbed; the frame current at
/// construction is restored on drop, whatever happened in between.
pub struct FrameGuard<'a, H: SceneHost + ?Sized> {
    host: &'a mut H,
    restore: i32,
}

impl<'a, H: SceneHost + ?Sized> FrameGuard<'a, H> {
    pub fn new(host: &'a mut H) -> Self {
        let restore = host.current_frame();
        Self { host, restore }
    }

    pub fn restore_frame(&self) -> i32 {
        self.restore
    }

    /// Move to `frame`; a refused frame change leaves the scene where it was
    /// and sampling continues.
    pub fn seek(&mut self, frame: i32) {
        if let Err(e) = self.host.set_frame(frame) {
            debug!("frame_set({frame}) failed: {e}");
        }
    }
}

impl<H: SceneHost + ?Sized> Deref for FrameGuard<'_, H> {
    type Target = H;

    fn deref(&self) -> &H {
        self.host
    }
}

impl<H: SceneHost + ?Sized> DerefMut for FrameGuard<'_, H> {
    fn deref_mut(&mut self) -> &mut H {
        self.host
    }
}

impl<H: SceneHost + ?Sized> Drop for FrameGuard<'_, H> {
    fn drop(&mut self) {
        if let Err(e) = self.host.set_frame(self.restore) {
            warn!("could not restore frame {}: {e}", self.restore);
        }
    }
}

/// Object transform relative to its evaluated parent at the current frame.
/// Falls back to the world matrix when there is no parent or the parent
/// matrix is singular.
pub fn local_matrix<H: SceneHost + ?Sized>(host: &H, object: &str) -> Matrix4<f64> {
    let world = host.world_matrix(object).unwrap_or_else(|| {
        debug!("no world matrix for {object}; using identity");
        Matrix4::identity()
    });
    let parent = host.object(object).and_then(|info| info.parent);
    match parent.as_deref().and_then(|p| host.world_matrix(p)) {
        Some(pw) => pw.try_inverse().map(|inv| inv * world).unwrap_or(world),
        None => world,
    }
}

/// Translation, rotation and scale of an affine matrix.
#[derive(Clone, Debug, PartialEq)]
pub struct Decomposed {
    pub translation: Vector3<f64>,
    pub rotation: UnitQuaternion<f64>,
    pub scale: Vector3<f64>,
}

impl Decomposed {
    /// Rotation as `[x, y, z, w]`.
    pub fn quaternion_xyzw(&self) -> Quat {
        let c = self.rotation.quaternion().coords;
        [c.x, c.y, c.z, c.w]
    }
}

pub fn decompose(m: &Matrix4<f64>) -> Decomposed {
    let translation = Vector3::new(m[(0, 3)], m[(1, 3)], m[(2, 3)]);
    let basis: Matrix3<f64> = m.fixed_view::<3, 3>(0, 0).into_owned();
    let mut scale = Vector3::new(
        basis.column(0).norm(),
        basis.column(1).norm(),
        basis.column(2).norm(),
    );
    if basis.determinant() < 0.0 {
        scale = -scale;
    }
    let mut rot = basis;
    for (i, s) in scale.iter().enumerate() {
        if s.abs() > f64::EPSILON {
            rot.column_mut(i).scale_mut(1.0 / s);
        }
    }
    let rotation = UnitQuaternion::from_rotation_matrix(&Rotation3::from_matrix(&rot));
    Decomposed {
        translation,
        rotation,
        scale,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use filmlib_codec_core::{MemoryHost, ObjectKind};

    #[test]
    fn decompose_recovers_trs() {
        let r = UnitQuaternion::from_euler_angles(0.0, 0.0, 0.5);
        let m = Matrix4::new_translation(&Vector3::new(1.0, 2.0, 3.0))
            * r.to_homogeneous()
            * Matrix4::new_nonuniform_scaling(&Vector3::new(2.0, 2.0, 2.0));
        let d = decompose(&m);
        assert_relative_eq!(d.translation, Vector3::new(1.0, 2.0, 3.0), epsilon = 1e-9);
        assert_relative_eq!(d.scale, Vector3::new(2.0, 2.0, 2.0), epsilon = 1e-9);
        assert_relative_eq!(d.rotation.angle(), 0.5, epsilon = 1e-9);
        let q = d.quaternion_xyzw();
        assert_relative_eq!(q[2], (0.25f64).sin(), epsilon = 1e-9);
        assert_relative_eq!(q[3], (0.25f64).cos(), epsilon = 1e-9);
    }

    #[test]
    fn guard_restores_the_frame() {
        let mut host = MemoryHost::new();
        host.add_object("Cube", ObjectKind::Mesh);
        host.set_frame(7).unwrap();
        {
            let mut guard = FrameGuard::new(&mut host);
            guard.seek(40);
            assert_eq!(guard.current_frame(), 40);
        }
        assert_eq!(host.current_frame(), 7);
    }

    #[test]
    fn local_matrix_is_parent_relative() {
        let mut host = MemoryHost::new();
        host.add_object("Root", ObjectKind::Empty)
            .add_object("Child", ObjectKind::Mesh);
        host.set_rest_location("Root", [0.0, 0.0, 5.0])
            .set_rest_location("Child", [1.0, 0.0, 0.0])
            .set_parent("Child", Some("Root"));
        let world = host.world_matrix("Child").unwrap();
        assert_relative_eq!(world[(2, 3)], 5.0);
        let local = local_matrix(&host, "Child");
        assert_relative_eq!(local[(0, 3)], 1.0);
        assert_relative_eq!(local[(2, 3)], 0.0);
    }
}
