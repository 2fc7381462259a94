//! Global constants for tc-core

/// Length below which a vector or divisor is treated as zero
pub const EPSILON: f32 = 1e-8;

/// Near-zero scale used to collapse hidden geometry
pub const COLLAPSED_SCALE: f32 = 1e-10;

/// Half-extent of the drag constraint plane (the plane is effectively infinite)
pub const PLANE_HALF_EXTENT: f32 = 50_000.0;
