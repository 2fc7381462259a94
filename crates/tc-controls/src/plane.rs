//! Invisible plane the pointer ray is projected onto while dragging

use glam::{Mat4, Quat, Vec3};
use tc_core::collision::ray_rect_intersection;
use tc_core::constants::{EPSILON, PLANE_HALF_EXTENT};
use tc_core::math::look_at_rotation;
use tc_core::Ray;

use crate::state::SharedState;
use crate::types::{Axis, Mode};

/// Large double-sided plane through the object.
///
/// Oriented so that it contains the direction of the grabbed axis and
/// faces the camera as much as that allows. Free handles and every rotate
/// handle use a camera-facing plane.
#[derive(Debug, Clone)]
pub struct ConstraintPlane {
    state: SharedState,
    position: Vec3,
    rotation: Quat,
}

impl ConstraintPlane {
    pub fn new(state: SharedState) -> Self {
        let mut plane = Self {
            state,
            position: Vec3::ZERO,
            rotation: Quat::IDENTITY,
        };
        plane.update();
        plane
    }

    pub fn sync(&mut self, state: &SharedState) {
        self.state = *state;
    }

    /// Recompute placement from the last synced state
    pub fn update(&mut self) {
        let state = &self.state;
        self.position = state.world_position;

        let frame = state.handle_rotation();
        let unit_x = frame * Vec3::X;
        let unit_y = frame * Vec3::Y;
        let unit_z = frame * Vec3::Z;

        let (align, direction) = match (state.mode, state.axis) {
            (Mode::Translate | Mode::Scale, Some(axis)) => match axis {
                Axis::X => {
                    let align = state.eye.cross(unit_x);
                    (align, unit_x.cross(align))
                }
                Axis::Y => {
                    let align = state.eye.cross(unit_y);
                    (align, unit_y.cross(align))
                }
                Axis::Z => {
                    let align = state.eye.cross(unit_z);
                    (align, unit_z.cross(align))
                }
                Axis::XY => (unit_y, unit_z),
                Axis::YZ => (unit_y, unit_x),
                Axis::XZ => (unit_z, unit_y),
                _ => (unit_y, Vec3::ZERO),
            },
            _ => (unit_y, Vec3::ZERO),
        };

        self.rotation = if direction.length_squared() < EPSILON {
            state.camera_rotation
        } else {
            look_at_rotation(Vec3::ZERO, direction, align)
        };
    }

    pub fn position(&self) -> Vec3 {
        self.position
    }

    pub fn rotation(&self) -> Quat {
        self.rotation
    }

    /// Plane normal in world space
    pub fn normal(&self) -> Vec3 {
        self.rotation * Vec3::Z
    }

    pub fn world_matrix(&self) -> Mat4 {
        Mat4::from_rotation_translation(self.rotation, self.position)
    }

    /// World-space point where the ray meets the plane, from either side
    pub fn intersect(&self, ray: &Ray) -> Option<Vec3> {
        let to_local = self.world_matrix().inverse();
        let local = ray.transformed(&to_local);
        let t = ray_rect_intersection(
            local.origin,
            local.direction,
            PLANE_HALF_EXTENT,
            PLANE_HALF_EXTENT,
        )?;
        Some(ray.at(t))
    }
}
