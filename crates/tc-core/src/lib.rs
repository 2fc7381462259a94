//! Transform Controls Core
//!
//! Math, camera and scene-graph primitives shared by the interactive
//! transform controls and their renderer.
//!
//! # Module Structure
//!
//! ```text
//! tc-core/
//! ├── pose.rs       # Position/rotation/scale decomposition
//! ├── math.rs       # Look-at rotation, snapping, safe division
//! ├── ray.rs        # Ray type
//! ├── collision.rs  # Ray-primitive intersection tests
//! ├── camera.rs     # Perspective/orthographic camera and pointer rays
//! ├── scene.rs      # Scene graph (nodes, parent chains, world matrices)
//! └── error.rs      # SceneError
//! ```

pub mod camera;
pub mod collision;
pub mod constants;
pub mod error;
pub mod math;
pub mod pose;
pub mod ray;
pub mod scene;

pub use camera::{Camera, Projection};
pub use error::SceneError;
pub use pose::Pose;
pub use ray::Ray;
pub use scene::{Node, NodeId, SceneGraph};
