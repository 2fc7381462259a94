//! Pointer-delta to transform math
//!
//! Pure functions from a drag session and the current pointer projection to
//! the object's new local position, scale or rotation.

use glam::{EulerRot, Quat, Vec3};
use tc_core::constants::EPSILON;
use tc_core::math::{angle_between, round_to_increment, safe_divide};

use crate::types::{Axis, Space};

/// Rotation speed numerator; divided by the camera distance
const ROTATION_SPEED: f32 = 2000.0;

/// Snapshot taken at pointer-down
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DragSession {
    pub axis: Axis,
    pub position_start: Vec3,
    pub rotation_start: Quat,
    pub scale_start: Vec3,
    pub world_position_start: Vec3,
    pub world_rotation_start: Quat,
    pub world_scale_start: Vec3,
    /// Plane hit relative to the object's world position at pointer-down
    pub point_start: Vec3,
}

/// World frame of the attached object and its parent for the current step
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DragFrame {
    pub space: Space,
    pub parent_position: Vec3,
    pub parent_rotation: Quat,
    pub parent_scale: Vec3,
    pub world_position: Vec3,
    pub world_rotation: Quat,
    pub camera_position: Vec3,
    pub eye: Vec3,
}

/// Result of a rotation step
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RotationStep {
    /// Rotation axis in world space
    pub axis: Vec3,
    /// Snapped angle in radians
    pub angle: f32,
    /// New local rotation, unit length
    pub rotation: Quat,
}

/// New local position for a translate step
pub fn translate(
    session: &DragSession,
    frame: &DragFrame,
    point_end: Vec3,
    snap: Option<f32>,
) -> Vec3 {
    let axis = session.axis;
    let mut offset = point_end - session.point_start;
    let local_frame = frame.space == Space::Local && axis != Axis::XYZ;

    if local_frame {
        offset = frame.world_rotation.inverse() * offset;
    }
    offset = axis.mask(offset, 0.0);

    offset = if local_frame {
        session.rotation_start * offset
    } else {
        frame.parent_rotation.inverse() * offset
    };
    offset = safe_divide(offset, frame.parent_scale, 0.0);

    let mut position = offset + session.position_start;

    if let Some(step) = snap {
        let round = |v: Vec3| {
            let snapped = Vec3::new(
                round_to_increment(v.x, step),
                round_to_increment(v.y, step),
                round_to_increment(v.z, step),
            );
            axis.mask(snapped, 0.0) + (v - axis.mask(v, 0.0))
        };
        position = match frame.space {
            Space::Local => {
                session.rotation_start * round(session.rotation_start.inverse() * position)
            }
            Space::World => {
                round(position + frame.parent_position) - frame.parent_position
            }
        };
    }

    position
}

/// New local scale for a scale step
pub fn scale(
    session: &DragSession,
    frame: &DragFrame,
    point_end: Vec3,
    snap: Option<f32>,
) -> Vec3 {
    let axis = session.axis;
    let start = session.point_start;

    let ratio = if axis.is_uniform() {
        let start_length = start.length();
        if start_length < EPSILON {
            Vec3::ONE
        } else {
            let mut d = point_end.length() / start_length;
            if point_end.dot(start) < 0.0 {
                d = -d;
            }
            Vec3::splat(d)
        }
    } else {
        let to_object = frame.world_rotation.inverse();
        let ratio = safe_divide(to_object * point_end, to_object * start, 1.0);
        axis.mask(ratio, 1.0)
    };

    let mut scale = session.scale_start * ratio;

    if let Some(step) = snap {
        let snap_component = |value: f32| {
            let snapped = round_to_increment(value, step);
            if snapped == 0.0 { step } else { snapped }
        };
        if axis.contains('X') {
            scale.x = snap_component(scale.x);
        }
        if axis.contains('Y') {
            scale.y = snap_component(scale.y);
        }
        if axis.contains('Z') {
            scale.z = snap_component(scale.z);
        }
    }

    scale
}

/// New local rotation for a rotate step.
///
/// Returns `None` for identifiers that do not rotate.
pub fn rotate(
    session: &DragSession,
    frame: &DragFrame,
    point_end: Vec3,
    snap: Option<f32>,
) -> Option<RotationStep> {
    let axis = session.axis;
    let start = session.point_start;
    let offset = point_end - start;
    let eye = frame.eye;

    let distance = frame.world_position.distance(frame.camera_position);
    let speed = if distance < EPSILON {
        0.0
    } else {
        ROTATION_SPEED / distance
    };

    let (rotation_axis, mut angle) = match axis {
        Axis::E => {
            let mut angle = angle_between(point_end, start);
            let turn = point_end
                .normalize_or_zero()
                .cross(start.normalize_or_zero())
                .dot(eye);
            if turn >= 0.0 {
                angle = -angle;
            }
            (eye, angle)
        }
        Axis::XYZE => {
            let rotation_axis = offset.cross(eye).normalize_or_zero();
            (rotation_axis, offset.dot(rotation_axis.cross(eye)) * speed)
        }
        Axis::X | Axis::Y | Axis::Z => {
            let unit = axis.unit()?;
            let mut tangent = unit;
            if frame.space == Space::Local {
                tangent = frame.world_rotation * tangent;
            }
            let along = tangent.cross(eye).normalize_or_zero();
            (unit, offset.dot(along) * speed)
        }
        _ => return None,
    };

    if let Some(step) = snap {
        angle = round_to_increment(angle, step);
    }

    if rotation_axis.length_squared() < EPSILON {
        return Some(RotationStep {
            axis: rotation_axis,
            angle: 0.0,
            rotation: session.rotation_start,
        });
    }

    let rotation = if frame.space == Space::Local && !matches!(axis, Axis::E | Axis::XYZE) {
        (session.rotation_start * Quat::from_axis_angle(rotation_axis, angle)).normalize()
    } else {
        let parent_axis = (frame.parent_rotation.inverse() * rotation_axis).normalize();
        (Quat::from_axis_angle(parent_axis, angle) * session.rotation_start).normalize()
    };

    Some(RotationStep {
        axis: rotation_axis,
        angle,
        rotation,
    })
}

/// Round the Euler component of `axis` to the snap increment.
///
/// Applied at pointer-down in local rotate mode so a snapped drag starts
/// from an aligned orientation.
pub fn snap_start_rotation(rotation: Quat, axis: Axis, snap: f32) -> Quat {
    let (mut x, mut y, mut z) = rotation.to_euler(EulerRot::XYZ);
    match axis {
        Axis::X => x = round_to_increment(x, snap),
        Axis::Y => y = round_to_increment(y, snap),
        Axis::Z => z = round_to_increment(z, snap),
        _ => return rotation,
    }
    Quat::from_euler(EulerRot::XYZ, x, y, z).normalize()
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn session(axis: Axis, point_start: Vec3) -> DragSession {
        DragSession {
            axis,
            position_start: Vec3::ZERO,
            rotation_start: Quat::IDENTITY,
            scale_start: Vec3::ONE,
            world_position_start: Vec3::ZERO,
            world_rotation_start: Quat::IDENTITY,
            world_scale_start: Vec3::ONE,
            point_start,
        }
    }

    fn frame(space: Space, camera_position: Vec3) -> DragFrame {
        DragFrame {
            space,
            parent_position: Vec3::ZERO,
            parent_rotation: Quat::IDENTITY,
            parent_scale: Vec3::ONE,
            world_position: Vec3::ZERO,
            world_rotation: Quat::IDENTITY,
            camera_position,
            eye: camera_position.normalize(),
        }
    }

    #[test]
    fn test_translate_single_axis_world() {
        let s = session(Axis::X, Vec3::new(0.8, 0.0, 0.0));
        let f = frame(Space::World, Vec3::new(0.0, 0.0, 10.0));

        let p = translate(&s, &f, Vec3::new(1.17, 0.3, 0.0), None);
        assert_relative_eq!(p.x, 0.37, epsilon = 1e-5);
        assert_eq!(p.y, 0.0);
        assert_eq!(p.z, 0.0);

        let snapped = translate(&s, &f, Vec3::new(1.17, 0.3, 0.0), Some(0.5));
        assert_relative_eq!(snapped.x, 0.5, epsilon = 1e-6);
        assert_eq!(snapped.y, 0.0);
    }

    #[test]
    fn test_translate_local_axis_follows_object() {
        let rotation = Quat::from_rotation_z(std::f32::consts::FRAC_PI_2);
        let s = DragSession {
            rotation_start: rotation,
            ..session(Axis::X, Vec3::ZERO)
        };
        let f = DragFrame {
            world_rotation: rotation,
            ..frame(Space::Local, Vec3::new(0.0, 0.0, 10.0))
        };

        // Local X points along world Y; sideways motion is dropped
        let p = translate(&s, &f, Vec3::new(0.4, 1.0, 0.0), None);
        assert_relative_eq!(p.x, 0.0, epsilon = 1e-5);
        assert_relative_eq!(p.y, 1.0, epsilon = 1e-5);
    }

    #[test]
    fn test_translate_divides_parent_scale() {
        let s = session(Axis::XYZ, Vec3::ZERO);
        let f = DragFrame {
            parent_scale: Vec3::splat(2.0),
            ..frame(Space::World, Vec3::new(0.0, 0.0, 10.0))
        };
        let p = translate(&s, &f, Vec3::new(1.0, 2.0, 0.0), None);
        assert_relative_eq!(p.x, 0.5);
        assert_relative_eq!(p.y, 1.0);
    }

    #[test]
    fn test_translate_world_snap_uses_parent_offset() {
        let s = session(Axis::X, Vec3::ZERO);
        let f = DragFrame {
            parent_position: Vec3::new(0.2, 0.0, 0.0),
            ..frame(Space::World, Vec3::new(0.0, 0.0, 10.0))
        };
        // World x = 0.2 + 0.7 rounds to 1.0, local 0.8
        let p = translate(&s, &f, Vec3::new(0.7, 0.0, 0.0), Some(0.5));
        assert_relative_eq!(p.x, 0.8, epsilon = 1e-5);
    }

    #[test]
    fn test_uniform_scale_through_origin_goes_negative() {
        let s = session(Axis::XYZ, Vec3::new(1.0, 0.0, 0.0));
        let f = frame(Space::Local, Vec3::new(0.0, 0.0, 10.0));

        let result = scale(&s, &f, Vec3::new(-2.0, 0.0, 0.0), None);
        assert_relative_eq!(result.x, -2.0);
        assert_relative_eq!(result.y, -2.0);
        assert_relative_eq!(result.z, -2.0);
    }

    #[test]
    fn test_scale_single_axis_keeps_others() {
        let s = session(Axis::Y, Vec3::new(0.0, 1.0, 0.0));
        let f = frame(Space::Local, Vec3::new(0.0, 0.0, 10.0));

        let result = scale(&s, &f, Vec3::new(0.5, 1.5, 0.0), None);
        assert_relative_eq!(result.x, 1.0);
        assert_relative_eq!(result.y, 1.5);
        assert_relative_eq!(result.z, 1.0);
    }

    #[test]
    fn test_scale_snap_never_zero() {
        let s = session(Axis::X, Vec3::new(1.0, 0.0, 0.0));
        let f = frame(Space::Local, Vec3::new(0.0, 0.0, 10.0));

        let result = scale(&s, &f, Vec3::new(0.05, 0.0, 0.0), Some(0.25));
        assert_relative_eq!(result.x, 0.25);
    }

    #[test]
    fn test_scale_zero_start_is_identity() {
        let s = session(Axis::XYZ, Vec3::ZERO);
        let f = frame(Space::Local, Vec3::new(0.0, 0.0, 10.0));
        let result = scale(&s, &f, Vec3::new(3.0, 0.0, 0.0), None);
        assert_eq!(result, Vec3::ONE);
    }

    #[test]
    fn test_rotate_snaps_angle() {
        // Camera above: dragging along -X turns the Z ring
        let s = session(Axis::Z, Vec3::ZERO);
        let f = frame(Space::Local, Vec3::new(0.0, 10.0, 0.0));
        let speed = ROTATION_SPEED / 10.0;

        let raw = 47.0_f32.to_radians();
        let end = Vec3::new(-raw / speed, 0.0, 0.0);

        let unsnapped = rotate(&s, &f, end, None).unwrap();
        assert_relative_eq!(unsnapped.angle, raw, epsilon = 1e-4);

        let step = rotate(&s, &f, end, Some(15.0_f32.to_radians())).unwrap();
        assert_relative_eq!(step.angle, 45.0_f32.to_radians(), epsilon = 1e-5);
        assert_relative_eq!(
            step.rotation.angle_between(Quat::IDENTITY),
            45.0_f32.to_radians(),
            epsilon = 1e-4
        );
        assert_relative_eq!(step.rotation.length(), 1.0, epsilon = 1e-6);
    }

    #[test]
    fn test_rotate_results_are_unit() {
        let start_rotation = Quat::from_euler(EulerRot::XYZ, 0.3, -0.7, 1.1);
        let ends = [
            Vec3::new(0.2, 0.1, -0.3),
            Vec3::new(-1.0, 0.5, 0.0),
            Vec3::new(0.0, 0.0, 0.001),
        ];
        for axis in [Axis::X, Axis::Y, Axis::Z, Axis::E, Axis::XYZE] {
            for space in [Space::World, Space::Local] {
                let s = DragSession {
                    rotation_start: start_rotation,
                    ..session(axis, Vec3::new(0.5, 0.5, 0.0))
                };
                let f = DragFrame {
                    parent_rotation: Quat::from_rotation_y(0.4),
                    ..frame(space, Vec3::new(3.0, 4.0, 5.0))
                };
                for end in ends {
                    let step = rotate(&s, &f, end, None).unwrap();
                    assert_relative_eq!(step.rotation.length(), 1.0, epsilon = 1e-5);
                    assert!(step.angle.is_finite());
                }
            }
        }
    }

    #[test]
    fn test_view_ring_angle_sign() {
        let s = session(Axis::E, Vec3::new(1.0, 0.0, 0.0));
        let f = frame(Space::World, Vec3::new(0.0, 0.0, 10.0));

        // Counter-clockwise as seen from the camera
        let step = rotate(&s, &f, Vec3::new(0.0, 1.0, 0.0), None).unwrap();
        assert_relative_eq!(step.angle, std::f32::consts::FRAC_PI_2, epsilon = 1e-5);
        let turned = step.rotation * Vec3::X;
        assert_relative_eq!(turned.y, 1.0, epsilon = 1e-5);

        let zero = rotate(&s, &f, Vec3::new(1.0, 0.0, 0.0), None).unwrap();
        assert_relative_eq!(zero.angle, 0.0);
    }

    #[test]
    fn test_snap_start_rotation() {
        let rotation = Quat::from_rotation_z(0.3);
        let snapped = snap_start_rotation(rotation, Axis::Z, 0.25);
        let (_, _, z) = snapped.to_euler(EulerRot::XYZ);
        assert_relative_eq!(z, 0.25, epsilon = 1e-5);

        assert_eq!(snap_start_rotation(rotation, Axis::E, 0.25), rotation);
    }
}
