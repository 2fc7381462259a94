//! Rendering constants

/// MSAA sample count shared with the host renderer's color target
pub const SAMPLE_COUNT: u32 = 4;

/// Tessellation resolution for handle shapes
pub mod tessellation {
    /// Segments around a cylinder or cone
    pub const CYLINDER_SEGMENTS: u32 = 16;
    /// Segments along a full torus turn
    pub const TORUS_SEGMENTS: u32 = 64;
    /// Segments around the torus tube
    pub const TORUS_TUBE_SEGMENTS: u32 = 4;
    /// Longitude segments of a sphere
    pub const SPHERE_SEGMENTS: u32 = 16;
    /// Latitude rings of a sphere
    pub const SPHERE_RINGS: u32 = 12;
    /// Segments along a full arc turn
    pub const ARC_SEGMENTS: u32 = 64;
}
