//! Read-only snapshot the controls publish to the gizmo and the plane

use glam::{Quat, Vec3};
use tc_core::Camera;

use crate::types::{Axis, Mode, Space};

/// Controls state as seen by the visual gizmo and the constraint plane.
///
/// Refreshed by the controls before every pointer handler and whenever a
/// property changes; the consumers never write it back.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SharedState {
    pub camera: Camera,
    pub visible: bool,
    pub enabled: bool,
    pub dragging: bool,
    pub axis: Option<Axis>,
    pub mode: Mode,
    pub space: Space,
    pub size: f32,
    pub show_x: bool,
    pub show_y: bool,
    pub show_z: bool,
    pub camera_position: Vec3,
    pub camera_rotation: Quat,
    /// Unit direction from the object toward the camera
    pub eye: Vec3,
    pub world_position: Vec3,
    pub world_rotation: Quat,
    pub world_position_start: Vec3,
    pub world_rotation_start: Quat,
    /// Axis of the most recent rotation step
    pub rotation_axis: Vec3,
}

impl SharedState {
    pub fn new(camera: Camera) -> Self {
        Self {
            camera,
            visible: false,
            enabled: true,
            dragging: false,
            axis: None,
            mode: Mode::Translate,
            space: Space::World,
            size: 1.0,
            show_x: true,
            show_y: true,
            show_z: true,
            camera_position: camera.position,
            camera_rotation: camera.rotation(),
            eye: Vec3::Z,
            world_position: Vec3::ZERO,
            world_rotation: Quat::IDENTITY,
            world_position_start: Vec3::ZERO,
            world_rotation_start: Quat::IDENTITY,
            rotation_axis: Vec3::X,
        }
    }

    /// Orientation handles and the plane align to: the object's own for
    /// local space or scale mode, the world axes otherwise
    pub fn handle_rotation(&self) -> Quat {
        if self.mode == Mode::Scale || self.space == Space::Local {
            self.world_rotation
        } else {
            Quat::IDENTITY
        }
    }
}
