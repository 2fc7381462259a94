//! Transform Controls Renderer
//!
//! WGPU rendering of the transform gizmo built by `tc-controls`.
//!
//! # Module Structure
//!
//! ```text
//! tc-renderer/
//! ├── camera.rs     # Camera uniform
//! ├── constants.rs  # Sample count, tessellation resolution
//! ├── geometry.rs   # Handle shape tessellation
//! └── gizmo.rs      # GizmoRenderer and per-frame batching
//! ```
//!
//! The host application owns the surface and render pass: call
//! [`GizmoRenderer::prepare`] after the controls have updated, then
//! [`GizmoRenderer::render`] as the last draw of the scene pass.

pub mod camera;
pub mod constants;
pub mod geometry;
pub mod gizmo;

pub use camera::CameraUniform;
pub use geometry::{GizmoInstance, GizmoVertex, Primitive, ShapeMesh, tessellate};
pub use gizmo::{DrawRange, GizmoBatch, GizmoRenderer};
