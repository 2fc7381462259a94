//! Ray intersection tests for handle picking and plane projection
//!
//! Every test returns the ray parameter `t` of the closest hit in front of
//! the ray origin. Directions do not need to be normalized; the parameter is
//! always relative to the direction as given, so a ray moved into a local
//! frame with [`crate::Ray::transformed`] yields the same `t` as in world
//! space.

use glam::Vec3;

use crate::constants::EPSILON;

/// Ray-cylinder intersection test.
///
/// Tests if a ray intersects with a finite cylinder defined by its axis
/// endpoints and radius.
///
/// # Algorithm
///
/// 1. **Infinite cylinder intersection**: Projects the ray and cylinder axis
///    into the plane perpendicular to the cylinder axis, then solves the
///    resulting 2D quadratic equation.
///
/// 2. **Finite bounds check**: Verifies that the intersection point lies
///    within the finite cylinder bounds (between `cylinder_start` and
///    `cylinder_end`).
///
/// A ray running parallel to the axis never hits the mantle and returns
/// `None`.
pub fn ray_cylinder_intersection(
    ray_origin: Vec3,
    ray_dir: Vec3,
    cylinder_start: Vec3,
    cylinder_end: Vec3,
    radius: f32,
) -> Option<f32> {
    let cylinder_length = (cylinder_end - cylinder_start).length();
    if cylinder_length < EPSILON {
        return None;
    }
    let cylinder_axis = (cylinder_end - cylinder_start) / cylinder_length;

    // Project ray direction and origin offset onto the plane perpendicular to cylinder axis
    let d = ray_dir - cylinder_axis * ray_dir.dot(cylinder_axis);
    let o = (ray_origin - cylinder_start)
        - cylinder_axis * (ray_origin - cylinder_start).dot(cylinder_axis);

    // Quadratic coefficients: at² + bt + c = 0
    let a = d.dot(d);
    if a < EPSILON {
        return None;
    }
    let b = 2.0 * d.dot(o);
    let c = o.dot(o) - radius * radius;

    let discriminant = b * b - 4.0 * a * c;
    if discriminant < 0.0 {
        return None;
    }

    let sqrt_disc = discriminant.sqrt();
    // Try the near root first, then the far one (ray starting inside)
    for t in [(-b - sqrt_disc) / (2.0 * a), (-b + sqrt_disc) / (2.0 * a)] {
        if t < 0.0 {
            continue;
        }
        let hit_point = ray_origin + ray_dir * t;
        let projection = (hit_point - cylinder_start).dot(cylinder_axis);
        if (0.0..=cylinder_length).contains(&projection) {
            return Some(t);
        }
    }

    None
}

/// Ray-ring intersection test.
///
/// Tests if a ray crosses the plane of a ring close to its center line.
/// The ring is defined by its center, normal (axis), radius, and thickness.
pub fn ray_ring_intersection(
    ray_origin: Vec3,
    ray_dir: Vec3,
    ring_center: Vec3,
    ring_normal: Vec3,
    ring_radius: f32,
    thickness: f32,
) -> Option<f32> {
    let t = ray_plane_intersection(ray_origin, ray_dir, ring_center, ring_normal)?;

    let hit_point = ray_origin + ray_dir * t;
    let distance_from_center = (hit_point - ring_center).length();
    let distance_from_ring = (distance_from_center - ring_radius).abs();

    if distance_from_ring <= thickness {
        Some(t)
    } else {
        None
    }
}

/// Ray-torus intersection test.
///
/// The torus lies in the XY plane around the Z axis (`radius` to the tube
/// center line, `tube` the tube radius), sweeping `arc` radians from +X.
/// The center line is approximated by `segments` straight tube sections,
/// which keeps the test robust for edge-on views where a planar ring test
/// degenerates.
pub fn ray_torus_intersection(
    ray_origin: Vec3,
    ray_dir: Vec3,
    radius: f32,
    tube: f32,
    arc: f32,
    segments: u32,
) -> Option<f32> {
    let segments = segments.max(3);
    let point = |i: u32| {
        let angle = arc * i as f32 / segments as f32;
        Vec3::new(angle.cos() * radius, angle.sin() * radius, 0.0)
    };

    (0..segments)
        .filter_map(|i| {
            ray_cylinder_intersection(ray_origin, ray_dir, point(i), point(i + 1), tube)
        })
        .min_by(f32::total_cmp)
}

/// Ray-sphere intersection test.
pub fn ray_sphere_intersection(
    ray_origin: Vec3,
    ray_dir: Vec3,
    sphere_center: Vec3,
    radius: f32,
) -> Option<f32> {
    let oc = ray_origin - sphere_center;
    let a = ray_dir.dot(ray_dir);
    if a < EPSILON {
        return None;
    }
    let b = 2.0 * oc.dot(ray_dir);
    let c = oc.dot(oc) - radius * radius;
    let discriminant = b * b - 4.0 * a * c;

    if discriminant < 0.0 {
        return None;
    }

    let sqrt_disc = discriminant.sqrt();
    let near = (-b - sqrt_disc) / (2.0 * a);
    let far = (-b + sqrt_disc) / (2.0 * a);
    if near >= 0.0 {
        Some(near)
    } else if far >= 0.0 {
        Some(far)
    } else {
        None
    }
}

/// Ray-plane intersection test (double sided).
///
/// Returns `None` when the ray is parallel to the plane or the plane lies
/// behind the ray origin.
pub fn ray_plane_intersection(
    ray_origin: Vec3,
    ray_dir: Vec3,
    plane_point: Vec3,
    plane_normal: Vec3,
) -> Option<f32> {
    let denom = ray_dir.dot(plane_normal);
    if denom.abs() < 1e-6 {
        return None;
    }

    let t = (plane_point - ray_origin).dot(plane_normal) / denom;
    if t < 0.0 {
        return None;
    }

    Some(t)
}

/// Ray-rectangle intersection test.
///
/// The rectangle lies in the XY plane centered on the origin.
pub fn ray_rect_intersection(
    ray_origin: Vec3,
    ray_dir: Vec3,
    half_width: f32,
    half_height: f32,
) -> Option<f32> {
    let t = ray_plane_intersection(ray_origin, ray_dir, Vec3::ZERO, Vec3::Z)?;
    let hit = ray_origin + ray_dir * t;
    (hit.x.abs() <= half_width && hit.y.abs() <= half_height).then_some(t)
}

/// Ray-box intersection test (slab method) for a box centered on the origin.
pub fn ray_box_intersection(ray_origin: Vec3, ray_dir: Vec3, half_extents: Vec3) -> Option<f32> {
    let mut t_min = f32::NEG_INFINITY;
    let mut t_max = f32::INFINITY;

    for i in 0..3 {
        let origin = ray_origin[i];
        let dir = ray_dir[i];
        let extent = half_extents[i];

        if dir.abs() < EPSILON {
            // Parallel to this slab: must already be inside it
            if origin.abs() > extent {
                return None;
            }
            continue;
        }

        let t1 = (-extent - origin) / dir;
        let t2 = (extent - origin) / dir;
        t_min = t_min.max(t1.min(t2));
        t_max = t_max.min(t1.max(t2));

        if t_min > t_max {
            return None;
        }
    }

    if t_max < 0.0 {
        return None;
    }
    Some(if t_min >= 0.0 { t_min } else { t_max })
}

/// Ray-octahedron intersection test.
///
/// The octahedron has its vertices at `±radius` on each axis; a point is
/// inside when `|x| + |y| + |z| <= radius`. The eight faces are tested as
/// planes with the same slab approach used for boxes.
pub fn ray_octahedron_intersection(ray_origin: Vec3, ray_dir: Vec3, radius: f32) -> Option<f32> {
    let mut t_min = f32::NEG_INFINITY;
    let mut t_max = f32::INFINITY;

    for sx in [-1.0_f32, 1.0] {
        for sy in [-1.0_f32, 1.0] {
            for sz in [-1.0_f32, 1.0] {
                let normal = Vec3::new(sx, sy, sz);
                let origin = normal.dot(ray_origin);
                let dir = normal.dot(ray_dir);

                if dir.abs() < EPSILON {
                    if origin > radius {
                        return None;
                    }
                    continue;
                }

                let t = (radius - origin) / dir;
                if dir > 0.0 {
                    t_max = t_max.min(t);
                } else {
                    t_min = t_min.max(t);
                }
                if t_min > t_max {
                    return None;
                }
            }
        }
    }

    if t_max < 0.0 {
        return None;
    }
    Some(if t_min >= 0.0 { t_min } else { t_max })
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_ray_hits_cylinder() {
        // Ray pointing straight at X-axis cylinder
        let ray_origin = Vec3::new(0.5, 0.0, 1.0);
        let ray_dir = Vec3::new(0.0, 0.0, -1.0);
        let result = ray_cylinder_intersection(ray_origin, ray_dir, Vec3::ZERO, Vec3::X, 0.1);
        assert_relative_eq!(result.unwrap(), 0.9, epsilon = 1e-5);
    }

    #[test]
    fn test_ray_misses_cylinder() {
        // Ray pointing away from cylinder
        let ray_origin = Vec3::new(0.5, 0.0, 1.0);
        let ray_dir = Vec3::new(0.0, 0.0, 1.0);
        let result = ray_cylinder_intersection(ray_origin, ray_dir, Vec3::ZERO, Vec3::X, 0.1);
        assert!(result.is_none());
    }

    #[test]
    fn test_ray_outside_cylinder_bounds() {
        // Ray hits infinite cylinder but outside finite bounds
        let ray_origin = Vec3::new(2.0, 0.0, 1.0);
        let ray_dir = Vec3::new(0.0, 0.0, -1.0);
        let result = ray_cylinder_intersection(ray_origin, ray_dir, Vec3::ZERO, Vec3::X, 0.1);
        assert!(result.is_none());
    }

    #[test]
    fn test_ray_parallel_to_cylinder_axis() {
        let result =
            ray_cylinder_intersection(Vec3::new(-1.0, 0.0, 0.0), Vec3::X, Vec3::ZERO, Vec3::X, 0.1);
        assert!(result.is_none());
    }

    #[test]
    fn test_ring_hit_and_miss() {
        let hit = ray_ring_intersection(
            Vec3::new(1.0, 0.0, 2.0),
            Vec3::NEG_Z,
            Vec3::ZERO,
            Vec3::Z,
            1.0,
            0.1,
        );
        assert_relative_eq!(hit.unwrap(), 2.0, epsilon = 1e-6);

        let miss = ray_ring_intersection(
            Vec3::new(0.0, 0.0, 2.0),
            Vec3::NEG_Z,
            Vec3::ZERO,
            Vec3::Z,
            1.0,
            0.1,
        );
        assert!(miss.is_none());
    }

    #[test]
    fn test_torus_edge_on() {
        // Looking along the torus plane: a planar ring test would fail here
        let t = ray_torus_intersection(
            Vec3::new(5.0, 1.0, 0.0),
            Vec3::NEG_X,
            1.0,
            0.1,
            std::f32::consts::TAU,
            24,
        );
        assert!(t.is_some());

        let miss = ray_torus_intersection(
            Vec3::new(5.0, 0.0, 0.5),
            Vec3::NEG_X,
            1.0,
            0.1,
            std::f32::consts::TAU,
            24,
        );
        assert!(miss.is_none());
    }

    #[test]
    fn test_sphere() {
        let t = ray_sphere_intersection(Vec3::new(0.0, 0.0, 5.0), Vec3::NEG_Z, Vec3::ZERO, 1.0);
        assert_relative_eq!(t.unwrap(), 4.0, epsilon = 1e-6);

        // Origin inside the sphere hits the far side
        let t = ray_sphere_intersection(Vec3::ZERO, Vec3::X, Vec3::ZERO, 1.0);
        assert_relative_eq!(t.unwrap(), 1.0, epsilon = 1e-6);
    }

    #[test]
    fn test_plane_behind_and_parallel() {
        assert!(ray_plane_intersection(Vec3::Z, Vec3::Z, Vec3::ZERO, Vec3::Z).is_none());
        assert!(ray_plane_intersection(Vec3::Z, Vec3::X, Vec3::ZERO, Vec3::Z).is_none());
        let t = ray_plane_intersection(Vec3::Z, Vec3::NEG_Z, Vec3::ZERO, Vec3::Z);
        assert_relative_eq!(t.unwrap(), 1.0);
    }

    #[test]
    fn test_rect() {
        let origin = Vec3::new(0.1, 0.1, 1.0);
        assert!(ray_rect_intersection(origin, Vec3::NEG_Z, 0.2, 0.2).is_some());
        assert!(ray_rect_intersection(origin, Vec3::NEG_Z, 0.05, 0.2).is_none());
    }

    #[test]
    fn test_box() {
        let t = ray_box_intersection(Vec3::new(0.0, 0.0, 3.0), Vec3::NEG_Z, Vec3::splat(0.5));
        assert_relative_eq!(t.unwrap(), 2.5, epsilon = 1e-6);

        let miss = ray_box_intersection(Vec3::new(1.0, 0.0, 3.0), Vec3::NEG_Z, Vec3::splat(0.5));
        assert!(miss.is_none());
    }

    #[test]
    fn test_octahedron() {
        let t = ray_octahedron_intersection(Vec3::new(0.0, 0.0, 3.0), Vec3::NEG_Z, 1.0);
        assert_relative_eq!(t.unwrap(), 2.0, epsilon = 1e-6);

        // Passes the bounding box corner region but outside the octahedron
        let miss = ray_octahedron_intersection(Vec3::new(0.6, 0.6, 3.0), Vec3::NEG_Z, 1.0);
        assert!(miss.is_none());
    }
}
