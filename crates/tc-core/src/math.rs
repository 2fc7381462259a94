//! Small vector and rotation helpers shared by the controls

use glam::{Mat3, Quat, Vec3};

use crate::constants::EPSILON;

/// Rotation whose +Z axis points from `target` towards `eye`.
///
/// The resulting X axis is `up × z`. When `up` is parallel to the viewing
/// direction the direction is nudged slightly so the basis stays valid. A
/// zero-length viewing direction falls back to +Z.
pub fn look_at_rotation(eye: Vec3, target: Vec3, up: Vec3) -> Quat {
    let mut z = eye - target;
    if z.length_squared() == 0.0 {
        z.z = 1.0;
    }
    z = z.normalize();

    let mut x = up.cross(z);
    if x.length_squared() == 0.0 {
        if up.z.abs() == 1.0 {
            z.x += 0.0001;
        } else {
            z.z += 0.0001;
        }
        z = z.normalize();
        x = up.cross(z);
    }
    x = x.normalize();

    let y = z.cross(x);
    Quat::from_mat3(&Mat3::from_cols(x, y, z)).normalize()
}

/// Unsigned angle between two vectors, 0 if either has no length
pub fn angle_between(a: Vec3, b: Vec3) -> f32 {
    let denominator = (a.length_squared() * b.length_squared()).sqrt();
    if denominator < EPSILON {
        return 0.0;
    }
    (a.dot(b) / denominator).clamp(-1.0, 1.0).acos()
}

/// Round `value` to the nearest multiple of `increment`.
///
/// Halves round towards positive infinity.
pub fn round_to_increment(value: f32, increment: f32) -> f32 {
    if increment <= 0.0 {
        return value;
    }
    (value / increment + 0.5).floor() * increment
}

/// Component-wise division that keeps `fallback` where the divisor is ~0
pub fn safe_divide(numerator: Vec3, denominator: Vec3, fallback: f32) -> Vec3 {
    let div = |n: f32, d: f32| if d.abs() < EPSILON { fallback } else { n / d };
    Vec3::new(
        div(numerator.x, denominator.x),
        div(numerator.y, denominator.y),
        div(numerator.z, denominator.z),
    )
}

/// Linear blend of two RGB colors
pub fn lerp_rgb(from: [f32; 3], to: [f32; 3], t: f32) -> [f32; 3] {
    [
        from[0] + (to[0] - from[0]) * t,
        from[1] + (to[1] - from[1]) * t,
        from[2] + (to[2] - from[2]) * t,
    ]
}
