//! Viewing camera used to cast pointer rays and size the gizmo

use glam::{Mat4, Quat, Vec2, Vec3, Vec4};
use serde::{Deserialize, Serialize};

use crate::math::look_at_rotation;
use crate::ray::Ray;

/// Camera projection parameters
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum Projection {
    Perspective {
        /// Vertical field of view in radians
        fov: f32,
        aspect: f32,
        near: f32,
        far: f32,
        zoom: f32,
    },
    Orthographic {
        left: f32,
        right: f32,
        top: f32,
        bottom: f32,
        near: f32,
        far: f32,
        zoom: f32,
    },
}

impl Projection {
    pub fn is_orthographic(&self) -> bool {
        matches!(self, Projection::Orthographic { .. })
    }

    pub fn near_far(&self) -> (f32, f32) {
        match *self {
            Projection::Perspective { near, far, .. } => (near, far),
            Projection::Orthographic { near, far, .. } => (near, far),
        }
    }

    pub fn matrix(&self) -> Mat4 {
        match *self {
            Projection::Perspective {
                fov,
                aspect,
                near,
                far,
                zoom,
            } => {
                let fov = 2.0 * ((fov * 0.5).tan() / zoom).atan();
                Mat4::perspective_rh_gl(fov, aspect, near, far)
            }
            Projection::Orthographic {
                left,
                right,
                top,
                bottom,
                near,
                far,
                zoom,
            } => {
                let cx = (right + left) * 0.5;
                let cy = (top + bottom) * 0.5;
                let dx = (right - left) / (2.0 * zoom);
                let dy = (top - bottom) / (2.0 * zoom);
                Mat4::orthographic_rh_gl(cx - dx, cx + dx, cy - dy, cy + dy, near, far)
            }
        }
    }
}

/// A camera placed with a look-at
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Camera {
    pub position: Vec3,
    pub target: Vec3,
    pub up: Vec3,
    pub projection: Projection,
}

impl Camera {
    /// Create a perspective camera looking at the origin
    pub fn perspective(fov_degrees: f32, aspect: f32, near: f32, far: f32) -> Self {
        Self {
            position: Vec3::new(0.0, 0.0, 10.0),
            target: Vec3::ZERO,
            up: Vec3::Y,
            projection: Projection::Perspective {
                fov: fov_degrees.to_radians(),
                aspect,
                near,
                far,
                zoom: 1.0,
            },
        }
    }

    /// Create an orthographic camera looking at the origin
    pub fn orthographic(left: f32, right: f32, top: f32, bottom: f32, near: f32, far: f32) -> Self {
        Self {
            position: Vec3::new(0.0, 0.0, 10.0),
            target: Vec3::ZERO,
            up: Vec3::Y,
            projection: Projection::Orthographic {
                left,
                right,
                top,
                bottom,
                near,
                far,
                zoom: 1.0,
            },
        }
    }

    /// Move the camera and aim it at `target`
    pub fn look_at(&mut self, position: Vec3, target: Vec3) {
        self.position = position;
        self.target = target;
    }

    /// Update aspect ratio (perspective cameras only)
    pub fn update_aspect(&mut self, new_aspect: f32) {
        if let Projection::Perspective { aspect, .. } = &mut self.projection {
            *aspect = new_aspect;
        }
    }

    /// Camera orientation; the camera looks down its local -Z
    pub fn rotation(&self) -> Quat {
        look_at_rotation(self.position, self.target, self.up)
    }

    /// Camera-to-world matrix
    pub fn world_matrix(&self) -> Mat4 {
        Mat4::from_rotation_translation(self.rotation(), self.position)
    }

    /// Get view matrix
    pub fn view_matrix(&self) -> Mat4 {
        self.world_matrix().inverse()
    }

    /// Get projection matrix
    pub fn projection_matrix(&self) -> Mat4 {
        self.projection.matrix()
    }

    /// Cast a ray through a point given in normalized device coordinates.
    ///
    /// Perspective rays start at the camera; orthographic rays start on the
    /// near plane and run along the view direction.
    pub fn ray_from_ndc(&self, ndc: Vec2) -> Ray {
        let inv_view_proj = self.world_matrix() * self.projection_matrix().inverse();
        let unproject = |z: f32| {
            let p = inv_view_proj * Vec4::new(ndc.x, ndc.y, z, 1.0);
            p.truncate() / p.w
        };

        if self.projection.is_orthographic() {
            let (near, far) = self.projection.near_far();
            let origin = unproject((near + far) / (near - far));
            let direction = self.rotation() * Vec3::NEG_Z;
            Ray::new(origin, direction)
        } else {
            let origin = self.position;
            let direction = (unproject(0.5) - origin).normalize();
            Ray::new(origin, direction)
        }
    }

    /// Convert screen coordinates to world ray
    pub fn screen_to_ray(
        &self,
        screen_x: f32,
        screen_y: f32,
        screen_width: f32,
        screen_height: f32,
    ) -> Ray {
        let ndc_x = (2.0 * screen_x / screen_width) - 1.0;
        let ndc_y = 1.0 - (2.0 * screen_y / screen_height);
        self.ray_from_ndc(Vec2::new(ndc_x, ndc_y))
    }
}
