//! Decomposed node transforms

use glam::{Mat4, Quat, Vec3};
use serde::{Deserialize, Serialize};

/// Position, orientation and scale of a node.
///
/// The rotation is kept at unit length: every constructor and mutator that
/// composes rotations renormalizes.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Pose {
    pub position: Vec3,
    pub rotation: Quat,
    pub scale: Vec3,
}

impl Default for Pose {
    fn default() -> Self {
        Self::IDENTITY
    }
}

impl Pose {
    pub const IDENTITY: Self = Self {
        position: Vec3::ZERO,
        rotation: Quat::IDENTITY,
        scale: Vec3::ONE,
    };

    pub fn new(position: Vec3, rotation: Quat, scale: Vec3) -> Self {
        Self {
            position,
            rotation: rotation.normalize(),
            scale,
        }
    }

    pub fn from_position(position: Vec3) -> Self {
        Self {
            position,
            ..Self::IDENTITY
        }
    }

    pub fn from_rotation(rotation: Quat) -> Self {
        Self {
            rotation: rotation.normalize(),
            ..Self::IDENTITY
        }
    }

    /// Compose into a local-to-parent matrix (translate * rotate * scale)
    pub fn to_matrix(&self) -> Mat4 {
        Mat4::from_scale_rotation_translation(self.scale, self.rotation, self.position)
    }

    /// Decompose an affine matrix.
    ///
    /// A negative determinant is folded into the X scale, so mirrored
    /// transforms survive a decompose/compose round trip.
    pub fn from_matrix(matrix: &Mat4) -> Self {
        let (scale, rotation, position) = matrix.to_scale_rotation_translation();
        Self {
            position,
            rotation: rotation.normalize(),
            scale,
        }
    }

    /// Replace the rotation, renormalizing it
    pub fn set_rotation(&mut self, rotation: Quat) {
        self.rotation = rotation.normalize();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_compose_decompose_round_trip() {
        let pose = Pose::new(
            Vec3::new(2.0, 1.0, 3.0),
            Quat::from_euler(glam::EulerRot::XYZ, 0.3, -1.1, 2.0),
            Vec3::new(1.5, 0.5, 2.0),
        );

        let matrix = pose.to_matrix();
        let back = Pose::from_matrix(&matrix).to_matrix();

        for (a, b) in matrix.to_cols_array().iter().zip(back.to_cols_array()) {
            assert_relative_eq!(*a, b, epsilon = 1e-5);
        }
    }

    #[test]
    fn test_mirrored_round_trip() {
        let pose = Pose::new(
            Vec3::ZERO,
            Quat::from_rotation_y(0.7),
            Vec3::new(-2.0, 1.0, 1.0),
        );

        let matrix = pose.to_matrix();
        let back = Pose::from_matrix(&matrix).to_matrix();

        for (a, b) in matrix.to_cols_array().iter().zip(back.to_cols_array()) {
            assert_relative_eq!(*a, b, epsilon = 1e-5);
        }
    }

    #[test]
    fn test_rotation_is_normalized() {
        let mut pose = Pose::from_rotation(Quat::from_xyzw(0.0, 0.0, 2.0, 2.0));
        assert_relative_eq!(pose.rotation.length(), 1.0, epsilon = 1e-6);

        pose.set_rotation(Quat::from_xyzw(3.0, 0.0, 0.0, 4.0));
        assert_relative_eq!(pose.rotation.length(), 1.0, epsilon = 1e-6);
    }
}
