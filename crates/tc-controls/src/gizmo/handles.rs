//! Handle descriptions: shape, baked placement, material and per-frame state

use glam::{EulerRot, Mat4, Quat, Vec3};
use tc_core::collision::{
    ray_box_intersection, ray_cylinder_intersection, ray_octahedron_intersection,
    ray_rect_intersection, ray_sphere_intersection, ray_torus_intersection,
};
use tc_core::Ray;

use crate::types::Axis;

/// Segments used when picking against a torus
const TORUS_PICK_SEGMENTS: u32 = 32;

/// Handles whose world matrix determinant is below this are collapsed
const MIN_PICK_DETERMINANT: f32 = 1e-12;

/// Primitive geometry of a handle, in its own frame
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum HandleShape {
    /// Cone or cylinder along Y, centered on the origin
    Cylinder {
        radius_top: f32,
        radius_bottom: f32,
        height: f32,
    },
    /// Cube centered on the origin
    Box { size: f32 },
    /// Octahedron with vertices at `±radius` on each axis
    Octahedron { radius: f32 },
    /// Rectangle in the XY plane
    Plane { width: f32, height: f32 },
    /// Torus in the XY plane around Z
    Torus { radius: f32, tube: f32, arc: f32 },
    Sphere { radius: f32 },
    /// Line segment
    Line { start: Vec3, end: Vec3 },
    /// Circular arc in the YZ plane around X, `arc` radians from +Y
    Arc { radius: f32, arc: f32 },
}

impl HandleShape {
    pub fn is_line(&self) -> bool {
        matches!(self, HandleShape::Line { .. } | HandleShape::Arc { .. })
    }

    /// Ray parameter of the nearest hit, with the ray already in the shape's frame.
    ///
    /// Lines are not pickable.
    pub fn raycast_local(&self, ray: &Ray) -> Option<f32> {
        match *self {
            HandleShape::Cylinder {
                radius_top,
                radius_bottom,
                height,
            } => ray_cylinder_intersection(
                ray.origin,
                ray.direction,
                Vec3::new(0.0, -height * 0.5, 0.0),
                Vec3::new(0.0, height * 0.5, 0.0),
                radius_top.max(radius_bottom),
            ),
            HandleShape::Box { size } => {
                ray_box_intersection(ray.origin, ray.direction, Vec3::splat(size * 0.5))
            }
            HandleShape::Octahedron { radius } => {
                ray_octahedron_intersection(ray.origin, ray.direction, radius)
            }
            HandleShape::Plane { width, height } => {
                ray_rect_intersection(ray.origin, ray.direction, width * 0.5, height * 0.5)
            }
            HandleShape::Torus { radius, tube, arc } => ray_torus_intersection(
                ray.origin,
                ray.direction,
                radius,
                tube,
                arc,
                TORUS_PICK_SEGMENTS,
            ),
            HandleShape::Sphere { radius } => {
                ray_sphere_intersection(ray.origin, ray.direction, Vec3::ZERO, radius)
            }
            HandleShape::Line { .. } | HandleShape::Arc { .. } => None,
        }
    }
}

/// What a handle represents
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum HandleName {
    /// Draggable handle for an axis identifier
    Axis(Axis),
    /// Marker at the drag start position
    Start,
    /// Marker at the current position
    End,
    /// Line from the start to the current position
    Delta,
    /// Guide line through the grabbed rotation axis
    RotationGuide,
}

impl HandleName {
    pub fn as_str(&self) -> &'static str {
        match self {
            HandleName::Axis(axis) => axis.as_str(),
            HandleName::Start => "START",
            HandleName::End => "END",
            HandleName::Delta => "DELTA",
            HandleName::RotationGuide => "AXIS",
        }
    }

    pub fn axis(&self) -> Option<Axis> {
        match self {
            HandleName::Axis(axis) => Some(*axis),
            _ => None,
        }
    }
}

/// Role tag for the arrow halves and drag helpers
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum HandleTag {
    #[default]
    None,
    /// Shown while its axis points toward the camera
    Forward,
    /// Shown while its axis points away from the camera
    Backward,
    /// Drag feedback, positioned by the helper rules
    Helper,
}

/// Base color and opacity of a handle
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HandleMaterial {
    pub color: [f32; 3],
    pub opacity: f32,
}

impl HandleMaterial {
    pub fn new(color: [f32; 3], opacity: f32) -> Self {
        Self { color, opacity }
    }

    pub fn opaque(color: [f32; 3]) -> Self {
        Self::new(color, 1.0)
    }
}

/// One drawable or pickable piece of the gizmo
#[derive(Debug, Clone, PartialEq)]
pub struct Handle {
    pub name: HandleName,
    pub tag: HandleTag,
    pub shape: HandleShape,
    /// Placement baked into the shape, applied before the handle transform
    pub shape_transform: Mat4,
    pub material: HandleMaterial,

    pub position: Vec3,
    pub rotation: Quat,
    pub scale: Vec3,
    pub visible: bool,
    /// Color after highlighting
    pub color: [f32; 3],
    /// Opacity after highlighting
    pub opacity: f32,
}

impl Handle {
    pub fn new(name: HandleName, part: Part) -> Self {
        Self {
            name,
            tag: part.tag,
            shape: part.shape,
            shape_transform: Mat4::from_scale_rotation_translation(
                part.scale,
                part.rotation,
                part.position,
            ),
            material: part.material,
            position: Vec3::ZERO,
            rotation: Quat::IDENTITY,
            scale: Vec3::ONE,
            visible: true,
            color: part.material.color,
            opacity: part.material.opacity,
        }
    }

    /// Handle transform without the baked shape placement
    pub fn transform(&self) -> Mat4 {
        Mat4::from_scale_rotation_translation(self.scale, self.rotation, self.position)
    }

    /// Shape-to-world matrix
    pub fn world_matrix(&self) -> Mat4 {
        self.transform() * self.shape_transform
    }

    /// Ray parameter of the nearest hit against this handle in world space
    pub fn raycast(&self, ray: &Ray) -> Option<f32> {
        let world = self.world_matrix();
        if world.determinant().abs() < MIN_PICK_DETERMINANT {
            return None;
        }
        let local = ray.transformed(&world.inverse());
        self.shape.raycast_local(&local)
    }
}

/// Table entry builder: a shape with its baked placement
#[derive(Debug, Clone, Copy)]
pub struct Part {
    pub shape: HandleShape,
    pub material: HandleMaterial,
    pub position: Vec3,
    pub rotation: Quat,
    pub scale: Vec3,
    pub tag: HandleTag,
}

impl Part {
    pub fn new(shape: HandleShape, material: HandleMaterial) -> Self {
        Self {
            shape,
            material,
            position: Vec3::ZERO,
            rotation: Quat::IDENTITY,
            scale: Vec3::ONE,
            tag: HandleTag::None,
        }
    }

    pub fn at(mut self, x: f32, y: f32, z: f32) -> Self {
        self.position = Vec3::new(x, y, z);
        self
    }

    /// Euler rotation in XYZ order
    pub fn rotated(mut self, x: f32, y: f32, z: f32) -> Self {
        self.rotation = Quat::from_euler(EulerRot::XYZ, x, y, z);
        self
    }

    pub fn scaled(mut self, x: f32, y: f32, z: f32) -> Self {
        self.scale = Vec3::new(x, y, z);
        self
    }

    pub fn tagged(mut self, tag: HandleTag) -> Self {
        self.tag = tag;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_baked_placement_moves_pick_volume() {
        let part = Part::new(
            HandleShape::Box { size: 0.2 },
            HandleMaterial::opaque([1.0, 0.0, 0.0]),
        )
        .at(1.0, 0.0, 0.0);
        let handle = Handle::new(HandleName::Axis(Axis::X), part);

        let hit = Ray::new(Vec3::new(1.0, 0.0, 5.0), Vec3::NEG_Z);
        let t = handle.raycast(&hit).unwrap();
        assert_relative_eq!(t, 4.9, epsilon = 1e-5);

        let miss = Ray::new(Vec3::new(0.0, 0.0, 5.0), Vec3::NEG_Z);
        assert!(handle.raycast(&miss).is_none());
    }

    #[test]
    fn test_scaled_handle_keeps_world_distance() {
        let part = Part::new(
            HandleShape::Sphere { radius: 1.0 },
            HandleMaterial::opaque([1.0, 1.0, 1.0]),
        );
        let mut handle = Handle::new(HandleName::Axis(Axis::XYZE), part);
        handle.scale = Vec3::splat(2.0);

        let ray = Ray::new(Vec3::new(0.0, 0.0, 10.0), Vec3::NEG_Z);
        assert_relative_eq!(handle.raycast(&ray).unwrap(), 8.0, epsilon = 1e-4);
    }

    #[test]
    fn test_collapsed_handle_not_pickable() {
        let part = Part::new(
            HandleShape::Box { size: 1.0 },
            HandleMaterial::opaque([1.0, 1.0, 1.0]),
        );
        let mut handle = Handle::new(HandleName::Axis(Axis::X), part);
        handle.scale = Vec3::splat(1e-10);

        let ray = Ray::new(Vec3::new(0.0, 0.0, 10.0), Vec3::NEG_Z);
        assert!(handle.raycast(&ray).is_none());
    }

    #[test]
    fn test_lines_are_not_pickable() {
        let part = Part::new(
            HandleShape::Line {
                start: Vec3::ZERO,
                end: Vec3::X,
            },
            HandleMaterial::opaque([1.0, 0.0, 0.0]),
        );
        let handle = Handle::new(HandleName::Axis(Axis::X), part);
        let ray = Ray::new(Vec3::new(0.5, 0.0, 10.0), Vec3::NEG_Z);
        assert!(handle.raycast(&ray).is_none());
    }
}
