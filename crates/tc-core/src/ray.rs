//! Rays for picking and plane projection

use glam::{Mat4, Vec3};

/// A half-line starting at `origin`.
///
/// `direction` is unit length for rays built in world space. Rays moved into
/// a handle's local frame with [`Ray::transformed`] keep the same parameter
/// `t` for the same point, so distances stay comparable across frames.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Ray {
    pub origin: Vec3,
    pub direction: Vec3,
}

impl Ray {
    pub fn new(origin: Vec3, direction: Vec3) -> Self {
        Self { origin, direction }
    }

    /// Point at parameter `t`
    pub fn at(&self, t: f32) -> Vec3 {
        self.origin + self.direction * t
    }

    /// Apply an affine transform without renormalizing the direction
    pub fn transformed(&self, matrix: &Mat4) -> Self {
        Self {
            origin: matrix.transform_point3(self.origin),
            direction: matrix.transform_vector3(self.direction),
        }
    }
}
