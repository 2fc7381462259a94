//! Paired translate and rotate controls on one object
//!
//! Both controls receive every pointer event. Whichever starts dragging
//! disables the other until the drag ends. After each transform step the
//! controller reports the motion since attachment as a translation and an
//! axis-angle rotation.

use std::sync::Arc;

use glam::{Mat4, Vec3};
use parking_lot::Mutex;
use tc_core::{Camera, NodeId, Pose, SceneGraph};

use crate::controls::TransformControls;
use crate::events::{ControlEvent, ListenerId, PropertyChange};
use crate::types::{Mode, PointerInput, Space};

/// Rotate gizmo size relative to the translate gizmo
const ROTATE_GIZMO_SCALE: f32 = 0.6;

/// Below this `sin(angle / 2)` the rotation axis is undefined
const AXIS_EPSILON: f32 = 1e-5;

/// Translation since attachment
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TranslationReport {
    /// Unit direction of travel, zero if the object did not move
    pub direction: Vec3,
    pub distance: f32,
}

/// Rotation since attachment
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RotationReport {
    /// Point the axis passes through (current world position)
    pub origin: Vec3,
    /// Unit rotation axis
    pub axis: Vec3,
    pub angle_degrees: f32,
}

/// Payload of the `transform` notification
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TransformReport {
    pub translation: TranslationReport,
    pub rotation: RotationReport,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Role {
    Translate,
    Rotate,
}

type Inbox = Arc<Mutex<Vec<(Role, ControlEvent)>>>;
type ReportListener = Box<dyn FnMut(&TransformReport)>;

/// Translate and rotate controls sharing one attached object
pub struct DualController {
    translate: TransformControls,
    rotate: TransformControls,
    inbox: Inbox,
    listener_ids: [ListenerId; 2],
    object: Option<NodeId>,
    original_matrix: Option<Mat4>,
    report_listeners: Vec<ReportListener>,
    last_report: Option<TransformReport>,
}

impl DualController {
    pub fn new(camera: Camera) -> Self {
        let inbox: Inbox = Arc::new(Mutex::new(Vec::new()));

        let mut translate = TransformControls::new(camera);
        translate.set_space(Space::Local);

        let mut rotate = TransformControls::new(camera);
        rotate.set_mode(Mode::Rotate);
        rotate.set_space(Space::Local);
        rotate.set_size(rotate.size() * ROTATE_GIZMO_SCALE);

        let listener_ids = [
            forward_events(&mut translate, Role::Translate, &inbox),
            forward_events(&mut rotate, Role::Rotate, &inbox),
        ];

        Self {
            translate,
            rotate,
            inbox,
            listener_ids,
            object: None,
            original_matrix: None,
            report_listeners: Vec::new(),
            last_report: None,
        }
    }

    pub fn translate_controls(&self) -> &TransformControls {
        &self.translate
    }

    pub fn rotate_controls(&self) -> &TransformControls {
        &self.rotate
    }

    pub fn object(&self) -> Option<NodeId> {
        self.object
    }

    /// Report produced by the most recent transform step
    pub fn last_report(&self) -> Option<&TransformReport> {
        self.last_report.as_ref()
    }

    /// Register a `transform` listener
    pub fn on_transform(&mut self, listener: impl FnMut(&TransformReport) + 'static) {
        self.report_listeners.push(Box::new(listener));
    }

    /// Update both cameras, e.g. after the viewer moved
    pub fn set_camera(&mut self, camera: Camera) {
        self.translate.set_camera(camera);
        self.rotate.set_camera(camera);
    }

    /// Attach both controls and remember the object's world transform
    pub fn attach(&mut self, scene: &SceneGraph, node: NodeId) {
        let Ok(matrix) = scene.world_matrix(node) else {
            tracing::warn!("Cannot attach dual controller: node {} not found", node);
            return;
        };
        self.translate.attach(scene, node);
        self.rotate.attach(scene, node);
        self.object = Some(node);
        self.original_matrix = Some(matrix);
        self.last_report = None;
        self.drain(scene);
    }

    /// Detach both controls; a drag in progress is dropped and neither side stays locked
    pub fn detach(&mut self) {
        self.translate.detach();
        self.rotate.detach();
        self.translate.set_enabled(true);
        self.rotate.set_enabled(true);
        self.object = None;
        self.original_matrix = None;
        self.last_report = None;
        self.inbox.lock().clear();
    }

    /// Detach, drop every listener and dispose both controls
    pub fn destroy(&mut self) {
        self.detach();
        let [translate_id, rotate_id] = self.listener_ids;
        self.translate.remove_event_listener(translate_id);
        self.rotate.remove_event_listener(rotate_id);
        self.translate.dispose();
        self.rotate.dispose();
        self.report_listeners.clear();
        tracing::debug!("Dual controller destroyed");
    }

    /// Refresh both gizmos for the current frame
    pub fn update(&mut self, scene: &SceneGraph) {
        self.translate.update_matrix_world(scene);
        self.rotate.update_matrix_world(scene);
    }

    /// Deliver a pointer event to both controls, translate first
    pub fn handle_input(&mut self, scene: &mut SceneGraph, input: PointerInput) {
        self.translate.handle_input(scene, input);
        self.drain(scene);
        self.rotate.handle_input(scene, input);
        self.drain(scene);
    }

    /// Process queued notifications until none are left
    fn drain(&mut self, scene: &SceneGraph) {
        loop {
            let pending: Vec<(Role, ControlEvent)> = std::mem::take(&mut *self.inbox.lock());
            if pending.is_empty() {
                break;
            }
            for (role, event) in pending {
                match event {
                    ControlEvent::PropertyChanged(PropertyChange::Dragging(dragging)) => {
                        match role {
                            Role::Translate => self.rotate.set_enabled(!dragging),
                            Role::Rotate => self.translate.set_enabled(!dragging),
                        }
                    }
                    ControlEvent::ObjectChange => self.on_object_change(scene),
                    _ => {}
                }
            }
        }
    }

    fn on_object_change(&mut self, scene: &SceneGraph) {
        let Some(report) = self.compute_report(scene) else {
            return;
        };
        self.last_report = Some(report);
        for listener in &mut self.report_listeners {
            listener(&report);
        }
    }

    /// Motion of the attached object since attachment
    pub fn compute_report(&self, scene: &SceneGraph) -> Option<TransformReport> {
        let object = self.object?;
        let original = Pose::from_matrix(&self.original_matrix?);
        let current = Pose::from_matrix(&scene.world_matrix(object).ok()?);

        let travel = current.position - original.position;
        let translation = TranslationReport {
            direction: travel.normalize_or_zero(),
            distance: travel.length(),
        };

        let mut relative = (current.rotation * original.rotation.inverse()).normalize();
        if relative.w < 0.0 {
            relative = -relative;
        }
        let w = relative.w.clamp(-1.0, 1.0);
        let angle_degrees = (2.0 * w.acos()).to_degrees();
        let s = (1.0 - w * w).sqrt();
        let axis = if s < AXIS_EPSILON {
            Vec3::X
        } else {
            Vec3::new(relative.x, relative.y, relative.z) / s
        };

        Some(TransformReport {
            translation,
            rotation: RotationReport {
                origin: current.position,
                axis,
                angle_degrees,
            },
        })
    }
}

fn forward_events(controls: &mut TransformControls, role: Role, inbox: &Inbox) -> ListenerId {
    let inbox = inbox.clone();
    controls.add_event_listener(move |event| inbox.lock().push((role, *event)))
}

impl std::fmt::Debug for DualController {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DualController")
            .field("object", &self.object)
            .field("translate", &self.translate)
            .field("rotate", &self.rotate)
            .finish()
    }
}
