//! Interactive transform gizmo for translating, rotating and scaling scene nodes
//!
//! ```text
//! TransformControls
//! ├── Gizmo            (handle layout, per-frame update, picking)
//! ├── ConstraintPlane  (pointer ray projection while dragging)
//! └── EventDispatcher  (change / objectChange / drag / property events)
//!
//! DualController       (translate + rotate controls on one object)
//! ```
//!
//! Pointer handlers take the [`tc_core::SceneGraph`] holding the attached
//! node; the controls read world transforms from it and write the node's
//! local pose back on every drag step.

pub mod config;
pub mod controls;
pub mod dual;
pub mod events;
pub mod gizmo;
pub mod plane;
pub mod state;
pub mod types;

pub use config::{AppearanceConfig, ConfigError, ControlsConfig};
pub use controls::{DragSession, TransformControls};
pub use dual::{DualController, RotationReport, TransformReport, TranslationReport};
pub use events::{ControlEvent, EventDispatcher, ListenerId, PropertyChange};
pub use gizmo::{Gizmo, Handle, HandleName, HandleShape, HandleTag};
pub use plane::ConstraintPlane;
pub use state::SharedState;
pub use types::{
    Axis, Mode, Pointer, PointerButton, PointerInput, PointerPhase, PointerType, Space,
    ViewportRect, resolve_space,
};
