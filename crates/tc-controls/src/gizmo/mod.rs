//! Visual gizmo: handle layout, per-frame update and picking
//!
//! The gizmo is drawn at the attached object's world position. Its size is
//! recomputed every frame so it keeps a constant apparent size on screen.
//! Each mode owns three handle sets:
//!
//! - `gizmo`: what is drawn
//! - `picker`: invisible volumes the pointer is tested against
//! - `helper`: drag feedback (start/end markers, delta line, axis guides)

mod handles;
mod tables;

pub use handles::{Handle, HandleMaterial, HandleName, HandleShape, HandleTag, Part};
pub use tables::{HandleTables, PerMode, build_tables};

use std::f32::consts::FRAC_PI_2;

use glam::{EulerRot, Quat, Vec3};
use tc_core::constants::COLLAPSED_SCALE;
use tc_core::math::{lerp_rgb, look_at_rotation};
use tc_core::{Projection, Ray};

use crate::config::AppearanceConfig;
use crate::state::SharedState;
use crate::types::{Axis, Mode};

/// Gizmo size divisor, so that `size = 1` matches the default handle layout
const SIZE_DIVISOR: f32 = 7.0;

/// Upper bound on the perspective size factor
const MAX_PERSPECTIVE_FACTOR: f32 = 7.0;

/// Visual gizmo
#[derive(Debug, Clone)]
pub struct Gizmo {
    state: SharedState,
    appearance: AppearanceConfig,
    tables: HandleTables,
}

impl Gizmo {
    pub fn new(state: SharedState, appearance: AppearanceConfig) -> Self {
        let tables = build_tables(&appearance);
        let mut gizmo = Self {
            state,
            appearance,
            tables,
        };
        gizmo.update();
        gizmo
    }

    pub fn sync(&mut self, state: &SharedState) {
        self.state = *state;
    }

    pub fn state(&self) -> &SharedState {
        &self.state
    }

    pub fn appearance(&self) -> &AppearanceConfig {
        &self.appearance
    }

    /// Rebuild the handle tables with new colors
    pub fn set_appearance(&mut self, appearance: AppearanceConfig) {
        self.tables = build_tables(&appearance);
        self.appearance = appearance;
        self.update();
    }

    pub fn tables(&self) -> &HandleTables {
        &self.tables
    }

    /// Size factor that keeps the gizmo at a constant apparent size
    pub fn scale_factor(&self) -> f32 {
        let state = &self.state;
        let factor = match state.camera.projection {
            Projection::Orthographic {
                top, bottom, zoom, ..
            } => (top - bottom) / zoom,
            Projection::Perspective { fov, zoom, .. } => {
                let distance = state.world_position.distance(state.camera_position);
                distance * (1.9 * (fov * 0.5).tan() / zoom).min(MAX_PERSPECTIVE_FACTOR)
            }
        };
        factor * state.size / SIZE_DIVISOR
    }

    /// Place, orient, hide and highlight every handle of the current mode
    pub fn update(&mut self) {
        let factor = self.scale_factor();
        let Self {
            state,
            appearance,
            tables,
        } = self;
        let mode = state.mode;
        let frame = state.handle_rotation();

        for handle in tables.picker.get_mut(mode) {
            update_handle(handle, state, appearance, frame, factor);
        }
        for handle in tables.gizmo.get_mut(mode) {
            update_handle(handle, state, appearance, frame, factor);
        }
        for handle in tables.helper.get_mut(mode) {
            update_handle(handle, state, appearance, frame, factor);
        }
    }

    /// Axis of the nearest visible pick volume the ray hits
    pub fn pick(&self, ray: &Ray) -> Option<Axis> {
        self.tables
            .picker
            .get(self.state.mode)
            .iter()
            .filter(|handle| handle.visible)
            .filter_map(|handle| Some((handle.raycast(ray)?, handle.name.axis()?)))
            .min_by(|a, b| a.0.total_cmp(&b.0))
            .map(|(_, axis)| axis)
    }

    /// Handles to draw this frame: visible gizmo and helper handles of the
    /// current mode, nothing when the controls are hidden
    pub fn drawables(&self) -> impl Iterator<Item = &Handle> {
        let mode = self.state.mode;
        let shown = self.state.visible;
        self.tables
            .gizmo
            .get(mode)
            .iter()
            .chain(self.tables.helper.get(mode).iter())
            .filter(move |handle| shown && handle.visible)
    }

    /// Release all handle geometry
    pub fn dispose(&mut self) {
        self.tables = HandleTables::default();
    }
}

fn update_handle(
    handle: &mut Handle,
    state: &SharedState,
    appearance: &AppearanceConfig,
    frame: Quat,
    factor: f32,
) {
    handle.visible = true;
    handle.rotation = Quat::IDENTITY;
    handle.position = state.world_position;
    handle.scale = Vec3::splat(factor);

    if handle.tag == HandleTag::Helper {
        update_helper(handle, state, appearance, frame);
        return;
    }

    handle.rotation = frame;
    let Some(name) = handle.name.axis() else {
        return;
    };

    match state.mode {
        Mode::Translate | Mode::Scale => orient_linear(handle, name, state, appearance, frame),
        Mode::Rotate => orient_rotary(handle, name, state, frame),
    }

    if (name.contains('X') && !state.show_x)
        || (name.contains('Y') && !state.show_y)
        || (name.contains('Z') && !state.show_z)
        || (name.contains('E') && !(state.show_x && state.show_y && state.show_z))
    {
        handle.visible = false;
    }

    highlight(handle, name, state, appearance);
}

fn update_helper(
    handle: &mut Handle,
    state: &SharedState,
    appearance: &AppearanceConfig,
    frame: Quat,
) {
    handle.visible = false;
    match handle.name {
        HandleName::RotationGuide => {
            handle.position = state.world_position_start;
            handle.visible = state.axis.is_some();
            let faces_camera =
                |axis: Vec3| (frame * axis).dot(state.eye).abs() > appearance.guide_hide_threshold;
            match state.axis {
                Some(Axis::X) => {
                    handle.rotation = frame;
                    if faces_camera(Vec3::X) {
                        handle.visible = false;
                    }
                }
                Some(Axis::Y) => {
                    handle.rotation = frame * Quat::from_euler(EulerRot::XYZ, 0.0, 0.0, FRAC_PI_2);
                    if faces_camera(Vec3::Y) {
                        handle.visible = false;
                    }
                }
                Some(Axis::Z) => {
                    handle.rotation = frame * Quat::from_euler(EulerRot::XYZ, 0.0, FRAC_PI_2, 0.0);
                    if faces_camera(Vec3::Z) {
                        handle.visible = false;
                    }
                }
                Some(Axis::XYZE) => {
                    handle.rotation = look_at_rotation(Vec3::ZERO, state.rotation_axis, Vec3::Y)
                        * Quat::from_euler(EulerRot::XYZ, 0.0, FRAC_PI_2, 0.0);
                    handle.visible = state.dragging;
                }
                Some(Axis::E) => handle.visible = false,
                _ => {}
            }
        }
        HandleName::Start => {
            handle.position = state.world_position_start;
            handle.visible = state.dragging;
        }
        HandleName::End => {
            handle.position = state.world_position;
            handle.visible = state.dragging;
        }
        HandleName::Delta => {
            handle.position = state.world_position_start;
            handle.rotation = state.world_rotation_start;
            let span = Vec3::splat(COLLAPSED_SCALE) + state.world_position_start
                - state.world_position;
            handle.scale = -(state.world_rotation_start.inverse() * span);
            handle.visible = state.dragging;
        }
        HandleName::Axis(name) => {
            handle.rotation = frame;
            handle.position = if state.dragging {
                state.world_position_start
            } else {
                state.world_position
            };
            if let Some(axis) = state.axis {
                handle.visible = axis.as_str().contains(name.as_str());
            }
        }
    }
}

/// Translate and scale handles: hide when edge-on, flip toward the camera
fn orient_linear(
    handle: &mut Handle,
    name: Axis,
    state: &SharedState,
    appearance: &AppearanceConfig,
    frame: Quat,
) {
    let along = |axis: Vec3| (frame * axis).dot(state.eye);
    let collapse = |handle: &mut Handle| {
        handle.scale = Vec3::splat(COLLAPSED_SCALE);
        handle.visible = false;
    };

    let hidden = match name {
        Axis::X | Axis::XYZX => along(Vec3::X).abs() > appearance.axis_hide_threshold,
        Axis::Y | Axis::XYZY => along(Vec3::Y).abs() > appearance.axis_hide_threshold,
        Axis::Z | Axis::XYZZ => along(Vec3::Z).abs() > appearance.axis_hide_threshold,
        Axis::XY => along(Vec3::Z).abs() < appearance.plane_hide_threshold,
        Axis::YZ => along(Vec3::X).abs() < appearance.plane_hide_threshold,
        Axis::XZ => along(Vec3::Y).abs() < appearance.plane_hide_threshold,
        _ => false,
    };
    if hidden {
        collapse(handle);
    }

    for (letter, axis, index) in [('X', Vec3::X, 0), ('Y', Vec3::Y, 1), ('Z', Vec3::Z, 2)] {
        if !name.contains(letter) {
            continue;
        }
        if along(axis) < appearance.axis_flip_threshold {
            if handle.tag == HandleTag::Forward {
                handle.visible = false;
            } else {
                handle.scale[index] *= -1.0;
            }
        } else if handle.tag == HandleTag::Backward {
            handle.visible = false;
        }
    }
}

/// Rotate handles: turn each ring so its visible half faces the camera
fn orient_rotary(handle: &mut Handle, name: Axis, state: &SharedState, frame: Quat) {
    let align = frame.inverse() * state.eye;

    if name.contains('E') {
        handle.rotation = look_at_rotation(state.eye, Vec3::ZERO, Vec3::Y);
    }
    match name {
        Axis::X => {
            handle.rotation = frame * Quat::from_axis_angle(Vec3::X, (-align.y).atan2(align.z));
        }
        Axis::Y => {
            handle.rotation = frame * Quat::from_axis_angle(Vec3::Y, align.x.atan2(align.z));
        }
        Axis::Z => {
            handle.rotation = frame * Quat::from_axis_angle(Vec3::Z, align.y.atan2(align.x));
        }
        _ => {}
    }
}

fn highlight(handle: &mut Handle, name: Axis, state: &SharedState, appearance: &AppearanceConfig) {
    let base = handle.material;
    handle.color = base.color;
    handle.opacity = base.opacity;

    let target = appearance.highlight_color;
    if !state.enabled {
        handle.opacity *= 0.5;
        handle.color = lerp_rgb(base.color, target, 0.5);
    } else if let Some(axis) = state.axis {
        let active = name == axis || name.letter().is_some_and(|letter| axis.contains(letter));
        if active {
            handle.opacity = 1.0;
        } else {
            handle.opacity *= 0.25;
        }
        handle.color = lerp_rgb(base.color, target, 0.5);
    }
}
