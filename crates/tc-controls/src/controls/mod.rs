//! Transform controls: pointer interaction, drag sessions and events
//!
//! The controls own a [`Gizmo`] and a [`ConstraintPlane`] and drive both
//! from a [`SharedState`] snapshot refreshed before every pointer handler.
//! The attached object lives in a [`SceneGraph`] the caller passes in; the
//! controls only ever write its local pose.

mod delta;

pub use delta::{DragFrame, DragSession, RotationStep};

use glam::{Quat, Vec3};
use tc_core::{Camera, NodeId, Pose, Ray, SceneError, SceneGraph};

use crate::config::{AppearanceConfig, ControlsConfig};
use crate::events::{ControlEvent, EventDispatcher, ListenerId, PropertyChange};
use crate::gizmo::Gizmo;
use crate::plane::ConstraintPlane;
use crate::state::SharedState;
use crate::types::{
    Axis, Mode, Pointer, PointerButton, PointerInput, PointerPhase, PointerType, Space,
    resolve_space,
};

/// World decomposition of the attached object and its parent
#[derive(Debug, Clone, Copy, PartialEq)]
struct WorldFrame {
    parent_position: Vec3,
    parent_rotation: Quat,
    parent_scale: Vec3,
    position: Vec3,
    rotation: Quat,
    scale: Vec3,
}

impl Default for WorldFrame {
    fn default() -> Self {
        Self {
            parent_position: Vec3::ZERO,
            parent_rotation: Quat::IDENTITY,
            parent_scale: Vec3::ONE,
            position: Vec3::ZERO,
            rotation: Quat::IDENTITY,
            scale: Vec3::ONE,
        }
    }
}

/// Interactive translate/rotate/scale controls for one scene node
#[derive(Debug)]
pub struct TransformControls {
    camera: Camera,
    object: Option<NodeId>,
    visible: bool,
    enabled: bool,
    axis: Option<Axis>,
    mode: Mode,
    space: Space,
    size: f32,
    dragging: bool,
    show_x: bool,
    show_y: bool,
    show_z: bool,
    translation_snap: Option<f32>,
    rotation_snap: Option<f32>,
    scale_snap: Option<f32>,

    world: WorldFrame,
    camera_position: Vec3,
    camera_rotation: Quat,
    eye: Vec3,
    session: Option<DragSession>,
    point_end: Vec3,
    rotation_axis: Vec3,
    rotation_angle: f32,

    gizmo: Gizmo,
    plane: ConstraintPlane,
    events: EventDispatcher,
    capturing: bool,
    disposed: bool,
    hierarchy_warned: bool,
}

impl TransformControls {
    /// Controls with default settings
    pub fn new(camera: Camera) -> Self {
        Self::with_config(camera, &ControlsConfig::default())
    }

    pub fn with_config(camera: Camera, config: &ControlsConfig) -> Self {
        let state = SharedState::new(camera);
        let mut controls = Self {
            camera,
            object: None,
            visible: false,
            enabled: config.enabled,
            axis: None,
            mode: config.mode,
            space: config.space,
            size: config.size,
            dragging: false,
            show_x: config.show_x,
            show_y: config.show_y,
            show_z: config.show_z,
            translation_snap: config.translation_snap,
            rotation_snap: config.rotation_snap,
            scale_snap: config.scale_snap,
            world: WorldFrame::default(),
            camera_position: camera.position,
            camera_rotation: camera.rotation(),
            eye: Vec3::Z,
            session: None,
            point_end: Vec3::ZERO,
            rotation_axis: Vec3::X,
            rotation_angle: 0.0,
            gizmo: Gizmo::new(state, config.appearance.clone()),
            plane: ConstraintPlane::new(state),
            events: EventDispatcher::new(),
            capturing: false,
            disposed: false,
            hierarchy_warned: false,
        };
        controls.publish();
        controls
    }

    // ============== Accessors ==============

    pub fn camera(&self) -> &Camera {
        &self.camera
    }

    /// Replace the camera, e.g. after the viewer moved it
    pub fn set_camera(&mut self, camera: Camera) {
        self.camera = camera;
        self.publish();
    }

    pub fn object(&self) -> Option<NodeId> {
        self.object
    }

    /// True while an object is attached
    pub fn is_visible(&self) -> bool {
        self.visible
    }

    pub fn enabled(&self) -> bool {
        self.enabled
    }

    /// Handle under the pointer or being dragged
    pub fn axis(&self) -> Option<Axis> {
        self.axis
    }

    pub fn mode(&self) -> Mode {
        self.mode
    }

    pub fn space(&self) -> Space {
        self.space
    }

    pub fn size(&self) -> f32 {
        self.size
    }

    pub fn is_dragging(&self) -> bool {
        self.dragging
    }

    pub fn show_x(&self) -> bool {
        self.show_x
    }

    pub fn show_y(&self) -> bool {
        self.show_y
    }

    pub fn show_z(&self) -> bool {
        self.show_z
    }

    pub fn translation_snap(&self) -> Option<f32> {
        self.translation_snap
    }

    pub fn rotation_snap(&self) -> Option<f32> {
        self.rotation_snap
    }

    pub fn scale_snap(&self) -> Option<f32> {
        self.scale_snap
    }

    pub fn gizmo(&self) -> &Gizmo {
        &self.gizmo
    }

    pub fn plane(&self) -> &ConstraintPlane {
        &self.plane
    }

    /// Drag session started by the last successful pointer-down
    pub fn session(&self) -> Option<&DragSession> {
        self.session.as_ref()
    }

    /// Angle of the most recent rotation step, in radians
    pub fn rotation_angle(&self) -> f32 {
        self.rotation_angle
    }

    /// True between a pointer-down and the matching pointer-up
    pub fn is_capturing(&self) -> bool {
        self.capturing
    }

    /// Snapshot published to the gizmo and the plane
    pub fn shared_state(&self) -> SharedState {
        let (world_position_start, world_rotation_start) = match &self.session {
            Some(session) => (session.world_position_start, session.world_rotation_start),
            None => (self.world.position, self.world.rotation),
        };
        SharedState {
            camera: self.camera,
            visible: self.visible,
            enabled: self.enabled,
            dragging: self.dragging,
            axis: self.axis,
            mode: self.mode,
            space: self.space,
            size: self.size,
            show_x: self.show_x,
            show_y: self.show_y,
            show_z: self.show_z,
            camera_position: self.camera_position,
            camera_rotation: self.camera_rotation,
            eye: self.eye,
            world_position: self.world.position,
            world_rotation: self.world.rotation,
            world_position_start,
            world_rotation_start,
            rotation_axis: self.rotation_axis,
        }
    }

    // ============== Events ==============

    pub fn add_event_listener(
        &mut self,
        listener: impl FnMut(&ControlEvent) + 'static,
    ) -> ListenerId {
        self.events.add_listener(listener)
    }

    pub fn remove_event_listener(&mut self, id: ListenerId) -> bool {
        self.events.remove_listener(id)
    }

    fn emit(&mut self, event: ControlEvent) {
        self.events.dispatch(event);
    }

    fn property_changed(&mut self, change: PropertyChange) {
        self.publish();
        self.emit(ControlEvent::PropertyChanged(change));
        self.emit(ControlEvent::Change);
    }

    // ============== Properties ==============

    pub fn set_mode(&mut self, mode: Mode) {
        if self.mode != mode {
            self.mode = mode;
            self.property_changed(PropertyChange::Mode(mode));
        }
    }

    pub fn set_space(&mut self, space: Space) {
        if self.space != space {
            self.space = space;
            self.property_changed(PropertyChange::Space(space));
        }
    }

    pub fn set_enabled(&mut self, enabled: bool) {
        if self.enabled != enabled {
            self.enabled = enabled;
            self.property_changed(PropertyChange::Enabled(enabled));
        }
    }

    pub fn set_size(&mut self, size: f32) {
        if self.size != size {
            self.size = size;
            self.property_changed(PropertyChange::Size(size));
        }
    }

    pub fn set_show_x(&mut self, show: bool) {
        if self.show_x != show {
            self.show_x = show;
            self.property_changed(PropertyChange::ShowX(show));
        }
    }

    pub fn set_show_y(&mut self, show: bool) {
        if self.show_y != show {
            self.show_y = show;
            self.property_changed(PropertyChange::ShowY(show));
        }
    }

    pub fn set_show_z(&mut self, show: bool) {
        if self.show_z != show {
            self.show_z = show;
            self.property_changed(PropertyChange::ShowZ(show));
        }
    }

    pub fn set_translation_snap(&mut self, snap: Option<f32>) {
        if self.translation_snap != snap {
            self.translation_snap = snap;
            self.property_changed(PropertyChange::TranslationSnap(snap));
        }
    }

    /// Rotation increment in radians
    pub fn set_rotation_snap(&mut self, snap: Option<f32>) {
        if self.rotation_snap != snap {
            self.rotation_snap = snap;
            self.property_changed(PropertyChange::RotationSnap(snap));
        }
    }

    pub fn set_scale_snap(&mut self, snap: Option<f32>) {
        if self.scale_snap != snap {
            self.scale_snap = snap;
            self.property_changed(PropertyChange::ScaleSnap(snap));
        }
    }

    /// Replace handle colors and thresholds
    pub fn set_appearance(&mut self, appearance: AppearanceConfig) {
        self.gizmo.set_appearance(appearance);
        self.publish();
        self.emit(ControlEvent::Change);
    }

    /// Apply every setting of a configuration through the property setters
    pub fn apply_config(&mut self, config: &ControlsConfig) {
        self.set_mode(config.mode);
        self.set_space(config.space);
        self.set_enabled(config.enabled);
        self.set_size(config.size);
        self.set_show_x(config.show_x);
        self.set_show_y(config.show_y);
        self.set_show_z(config.show_z);
        self.set_translation_snap(config.translation_snap);
        self.set_rotation_snap(config.rotation_snap);
        self.set_scale_snap(config.scale_snap);
        if *self.gizmo.appearance() != config.appearance {
            self.set_appearance(config.appearance.clone());
        }
    }

    fn set_axis(&mut self, axis: Option<Axis>) {
        if self.axis != axis {
            self.axis = axis;
            self.property_changed(PropertyChange::Axis(axis));
        }
    }

    fn set_dragging(&mut self, dragging: bool) {
        if self.dragging != dragging {
            self.dragging = dragging;
            self.property_changed(PropertyChange::Dragging(dragging));
        }
    }

    fn set_object(&mut self, object: Option<NodeId>) {
        if self.object != object {
            self.object = object;
            self.property_changed(PropertyChange::Object(object));
        }
    }

    // ============== Attachment ==============

    /// Attach to a scene node, replacing any previous attachment.
    ///
    /// Unknown nodes are ignored.
    pub fn attach(&mut self, scene: &SceneGraph, node: NodeId) {
        if !scene.contains(node) {
            tracing::warn!("Cannot attach transform controls: node {} not found", node);
            return;
        }
        self.session = None;
        self.capturing = false;
        self.set_dragging(false);
        self.set_axis(None);
        self.hierarchy_warned = false;
        self.visible = true;
        self.set_object(Some(node));
        self.update_matrix_world(scene);
        tracing::debug!("Transform controls attached to {}", node);
    }

    /// Detach from the current node and hide the gizmo
    pub fn detach(&mut self) {
        self.session = None;
        self.capturing = false;
        self.visible = false;
        self.set_object(None);
        self.set_dragging(false);
        self.set_axis(None);
        self.publish();
    }

    /// Remove all listeners and release the gizmo geometry
    pub fn dispose(&mut self) {
        if self.disposed {
            return;
        }
        self.detach();
        self.events.clear();
        self.gizmo.dispose();
        self.disposed = true;
        tracing::debug!("Transform controls disposed");
    }

    pub fn is_disposed(&self) -> bool {
        self.disposed
    }

    // ============== Frame update ==============

    /// Refresh world decompositions, the eye vector, the plane and the gizmo.
    ///
    /// An attached node outside the scene hierarchy is reported once and
    /// its decomposition is left as it was.
    pub fn update_matrix_world(&mut self, scene: &SceneGraph) {
        if let Some(object) = self.object {
            let matrices = if scene.is_in_hierarchy(object) {
                scene
                    .parent_world_matrix(object)
                    .and_then(|parent| scene.world_matrix(object).map(|world| (parent, world)))
            } else {
                Err(SceneError::NotInSceneGraph(object))
            };

            match matrices {
                Ok((parent, world)) => {
                    let parent = Pose::from_matrix(&parent);
                    let world = Pose::from_matrix(&world);
                    self.world = WorldFrame {
                        parent_position: parent.position,
                        parent_rotation: parent.rotation,
                        parent_scale: parent.scale,
                        position: world.position,
                        rotation: world.rotation,
                        scale: world.scale,
                    };
                }
                Err(err) => {
                    if !self.hierarchy_warned {
                        tracing::error!(
                            "Transform controls: the attached object must be part of the scene graph: {}",
                            err
                        );
                        self.hierarchy_warned = true;
                    }
                }
            }
        }

        self.camera_position = self.camera.position;
        self.camera_rotation = self.camera.rotation();
        self.eye = (self.camera_position - self.world.position).normalize_or_zero();
        self.publish();
    }

    /// Push the current state into the gizmo and the plane and refresh both
    fn publish(&mut self) {
        let state = self.shared_state();
        self.plane.sync(&state);
        self.plane.update();
        self.gizmo.sync(&state);
        self.gizmo.update();
    }

    fn drag_frame(&self, space: Space) -> DragFrame {
        DragFrame {
            space,
            parent_position: self.world.parent_position,
            parent_rotation: self.world.parent_rotation,
            parent_scale: self.world.parent_scale,
            world_position: self.world.position,
            world_rotation: self.world.rotation,
            camera_position: self.camera_position,
            eye: self.eye,
        }
    }

    // ============== Pointer handlers ==============

    /// Update the hovered handle
    pub fn pointer_hover(&mut self, scene: &SceneGraph, pointer: Pointer) {
        if self.object.is_none() || self.dragging || !self.enabled {
            return;
        }
        self.update_matrix_world(scene);
        let ray = self.camera.ray_from_ndc(pointer.ndc);
        let axis = self.gizmo.pick(&ray);
        self.set_axis(axis);
    }

    /// Start a drag on the hovered handle
    pub fn pointer_down(&mut self, scene: &mut SceneGraph, pointer: Pointer) {
        if !self.enabled || self.dragging || pointer.button != Some(PointerButton::Primary) {
            return;
        }
        let (Some(object), Some(axis)) = (self.object, self.axis) else {
            return;
        };

        self.update_matrix_world(scene);
        let ray = self.camera.ray_from_ndc(pointer.ndc);

        if self.plane.intersect(&ray).is_some() {
            let space = resolve_space(self.mode, axis, self.space);
            if space == Space::Local && self.mode == Mode::Rotate {
                if let Some(snap) = self.rotation_snap {
                    self.snap_start_rotation(scene, object, axis, snap);
                }
            }

            self.session = self.begin_session(scene, object, axis, &ray);
        } else {
            self.session = None;
            tracing::debug!("Pointer-down on {} missed the constraint plane", axis);
        }

        self.set_dragging(true);
        self.emit(ControlEvent::DragStart { mode: self.mode });
    }

    fn snap_start_rotation(&mut self, scene: &mut SceneGraph, object: NodeId, axis: Axis, snap: f32) {
        let Ok(mut pose) = scene.local_pose(object) else {
            return;
        };
        pose.rotation = delta::snap_start_rotation(pose.rotation, axis, snap);
        if scene.set_local_pose(object, pose).is_ok() {
            self.update_matrix_world(scene);
        }
    }

    fn begin_session(
        &self,
        scene: &SceneGraph,
        object: NodeId,
        axis: Axis,
        ray: &Ray,
    ) -> Option<DragSession> {
        let hit = self.plane.intersect(ray)?;
        let local = scene.local_pose(object).ok()?;
        Some(DragSession {
            axis,
            position_start: local.position,
            rotation_start: local.rotation,
            scale_start: local.scale,
            world_position_start: self.world.position,
            world_rotation_start: self.world.rotation,
            world_scale_start: self.world.scale,
            point_start: hit - self.world.position,
        })
    }

    /// Apply one drag step; only move samples (no button) are accepted
    pub fn pointer_move(&mut self, scene: &mut SceneGraph, pointer: Pointer) {
        if !self.enabled || !self.dragging || pointer.button.is_some() {
            return;
        }
        let (Some(object), Some(session)) = (self.object, self.session) else {
            return;
        };

        self.update_matrix_world(scene);
        let ray = self.camera.ray_from_ndc(pointer.ndc);
        let Some(hit) = self.plane.intersect(&ray) else {
            return;
        };
        let Ok(mut pose) = scene.local_pose(object) else {
            return;
        };

        self.point_end = hit - session.world_position_start;
        let frame = self.drag_frame(resolve_space(self.mode, session.axis, self.space));

        match self.mode {
            Mode::Translate => {
                pose.position =
                    delta::translate(&session, &frame, self.point_end, self.translation_snap);
            }
            Mode::Scale => {
                pose.scale = delta::scale(&session, &frame, self.point_end, self.scale_snap);
            }
            Mode::Rotate => {
                let Some(step) =
                    delta::rotate(&session, &frame, self.point_end, self.rotation_snap)
                else {
                    return;
                };
                self.rotation_axis = step.axis;
                self.rotation_angle = step.angle;
                pose.rotation = step.rotation;
            }
        }

        if let Err(err) = scene.set_local_pose(object, pose) {
            tracing::warn!("Failed to apply drag step: {}", err);
            return;
        }
        self.update_matrix_world(scene);
        self.emit(ControlEvent::Change);
        self.emit(ControlEvent::ObjectChange);
    }

    /// End the drag; only the primary button is accepted
    pub fn pointer_up(&mut self, pointer: Pointer) {
        if !self.enabled || pointer.button != Some(PointerButton::Primary) {
            return;
        }
        if self.dragging && self.axis.is_some() {
            self.emit(ControlEvent::DragEnd { mode: self.mode });
        }
        self.session = None;
        self.set_dragging(false);
        self.set_axis(None);
    }

    /// Route a raw pointer event the way a windowing layer delivers them.
    ///
    /// A press hovers then starts a drag and begins capturing moves; moves
    /// hover for mouse and pen and drive the drag while capturing; a release
    /// stops capturing.
    pub fn handle_input(&mut self, scene: &mut SceneGraph, input: PointerInput) {
        if !self.enabled || self.disposed {
            return;
        }
        let hovers = matches!(input.pointer_type, PointerType::Mouse | PointerType::Pen);
        match input.phase {
            PointerPhase::Down => {
                self.pointer_hover(scene, input.pointer);
                self.pointer_down(scene, input.pointer);
                self.capturing = true;
            }
            PointerPhase::Move => {
                if hovers {
                    self.pointer_hover(scene, input.pointer);
                }
                if self.capturing {
                    self.pointer_move(scene, Pointer { button: None, ..input.pointer });
                }
            }
            PointerPhase::Up => {
                self.capturing = false;
                self.pointer_up(input.pointer);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    use approx::assert_relative_eq;
    use glam::{Vec2, Vec4};
    use parking_lot::Mutex;

    fn camera() -> Camera {
        Camera::perspective(50.0, 1.0, 0.1, 1000.0)
    }

    fn ndc(camera: &Camera, point: Vec3) -> Vec2 {
        let clip: Vec4 = camera.projection_matrix() * camera.view_matrix() * point.extend(1.0);
        Vec2::new(clip.x / clip.w, clip.y / clip.w)
    }

    fn scene_with_object() -> (SceneGraph, NodeId) {
        let mut scene = SceneGraph::new();
        let object = scene
            .add_child(scene.root(), "object", Pose::IDENTITY)
            .unwrap();
        (scene, object)
    }

    fn record(controls: &mut TransformControls) -> Arc<Mutex<Vec<ControlEvent>>> {
        let log = Arc::new(Mutex::new(Vec::new()));
        let sink = log.clone();
        controls.add_event_listener(move |event| sink.lock().push(*event));
        log
    }

    /// Drag the X arrow from 0.8 to `to` along the screen
    fn drag_x(
        controls: &mut TransformControls,
        scene: &mut SceneGraph,
        from: Vec3,
        to: Vec3,
    ) {
        let cam = *controls.camera();
        let start = ndc(&cam, from);
        let end = ndc(&cam, to);
        controls.pointer_hover(scene, Pointer::moved(start.x, start.y));
        assert_eq!(controls.axis(), Some(Axis::X));
        controls.pointer_down(scene, Pointer::primary(start.x, start.y));
        controls.pointer_move(scene, Pointer::moved(end.x, end.y));
    }

    #[test]
    fn test_translate_x_with_snap() {
        let (mut scene, object) = scene_with_object();
        let mut controls = TransformControls::new(camera());
        controls.set_translation_snap(Some(0.5));
        controls.attach(&scene, object);
        let log = record(&mut controls);

        drag_x(
            &mut controls,
            &mut scene,
            Vec3::new(0.8, 0.0, 0.0),
            Vec3::new(1.17, 0.3, 0.0),
        );

        let pose = scene.local_pose(object).unwrap();
        assert_relative_eq!(pose.position.x, 0.5, epsilon = 1e-5);
        assert_eq!(pose.position.y, 0.0);
        assert_eq!(pose.position.z, 0.0);

        let events = log.lock().clone();
        assert!(events.contains(&ControlEvent::DragStart {
            mode: Mode::Translate
        }));
        assert!(events.contains(&ControlEvent::ObjectChange));
        assert!(events.contains(&ControlEvent::PropertyChanged(PropertyChange::Dragging(
            true
        ))));

        controls.pointer_up(Pointer::primary(0.0, 0.0));
        assert!(!controls.is_dragging());
        assert_eq!(controls.axis(), None);
        assert!(log.lock().contains(&ControlEvent::DragEnd {
            mode: Mode::Translate
        }));
    }

    #[test]
    fn test_translate_without_snap_follows_pointer() {
        let (mut scene, object) = scene_with_object();
        let mut controls = TransformControls::new(camera());
        controls.attach(&scene, object);

        drag_x(
            &mut controls,
            &mut scene,
            Vec3::new(0.8, 0.0, 0.0),
            Vec3::new(1.17, 0.3, 0.0),
        );

        let pose = scene.local_pose(object).unwrap();
        assert_relative_eq!(pose.position.x, 0.37, epsilon = 1e-4);
        assert_eq!(pose.position.y, 0.0);
    }

    #[test]
    fn test_pointer_move_needs_moving_sample() {
        let (mut scene, object) = scene_with_object();
        let mut controls = TransformControls::new(camera());
        controls.attach(&scene, object);

        let cam = *controls.camera();
        let start = ndc(&cam, Vec3::new(0.8, 0.0, 0.0));
        let end = ndc(&cam, Vec3::new(1.5, 0.0, 0.0));
        controls.pointer_hover(&scene, Pointer::moved(start.x, start.y));
        controls.pointer_down(&mut scene, Pointer::primary(start.x, start.y));

        controls.pointer_move(&mut scene, Pointer::primary(end.x, end.y));
        assert_eq!(scene.local_pose(object).unwrap().position, Vec3::ZERO);
    }

    #[test]
    fn test_secondary_button_ignored() {
        let (mut scene, object) = scene_with_object();
        let mut controls = TransformControls::new(camera());
        controls.attach(&scene, object);

        let cam = *controls.camera();
        let start = ndc(&cam, Vec3::new(0.8, 0.0, 0.0));
        controls.pointer_hover(&scene, Pointer::moved(start.x, start.y));
        controls.pointer_down(
            &mut scene,
            Pointer::new(start.x, start.y, Some(PointerButton::Secondary)),
        );
        assert!(!controls.is_dragging());

        controls.pointer_down(&mut scene, Pointer::primary(start.x, start.y));
        assert!(controls.is_dragging());
        controls.pointer_up(Pointer::new(0.0, 0.0, Some(PointerButton::Secondary)));
        assert!(controls.is_dragging());
    }

    #[test]
    fn test_disabled_controls_ignore_input() {
        let (mut scene, object) = scene_with_object();
        let mut controls = TransformControls::new(camera());
        controls.attach(&scene, object);
        controls.set_enabled(false);

        let cam = *controls.camera();
        let start = ndc(&cam, Vec3::new(0.8, 0.0, 0.0));
        controls.pointer_hover(&scene, Pointer::moved(start.x, start.y));
        assert_eq!(controls.axis(), None);
    }

    #[test]
    fn test_property_events_only_on_change() {
        let mut controls = TransformControls::new(camera());
        let log = record(&mut controls);

        controls.set_mode(Mode::Translate);
        assert!(log.lock().is_empty());

        controls.set_mode(Mode::Rotate);
        let events = log.lock().clone();
        assert_eq!(
            events,
            vec![
                ControlEvent::PropertyChanged(PropertyChange::Mode(Mode::Rotate)),
                ControlEvent::Change
            ]
        );
    }

    #[test]
    fn test_detach_attach_idempotent() {
        let (scene, object) = scene_with_object();
        let mut controls = TransformControls::new(camera());
        let before = scene.local_pose(object).unwrap();

        controls.detach();
        controls.attach(&scene, object);
        assert!(controls.is_visible());
        assert_eq!(controls.object(), Some(object));
        controls.detach();

        assert!(!controls.is_visible());
        assert_eq!(controls.object(), None);
        assert_eq!(controls.axis(), None);
        assert_eq!(scene.local_pose(object).unwrap(), before);
        assert_eq!(controls.gizmo().drawables().count(), 0);
    }

    #[test]
    fn test_attach_unknown_node_is_noop() {
        let scene = SceneGraph::new();
        let mut controls = TransformControls::new(camera());
        controls.attach(&scene, NodeId::new());
        assert_eq!(controls.object(), None);
        assert!(!controls.is_visible());
    }

    #[test]
    fn test_detached_node_keeps_previous_frame() {
        let mut scene = SceneGraph::new();
        let orphan = scene.add_detached("orphan", Pose::from_position(Vec3::new(5.0, 0.0, 0.0)));
        let mut controls = TransformControls::new(camera());
        controls.attach(&scene, orphan);

        controls.update_matrix_world(&scene);
        assert_eq!(controls.shared_state().world_position, Vec3::ZERO);
    }

    #[test]
    fn test_rotate_local_snapped() {
        let (mut scene, object) = scene_with_object();
        let mut cam = camera();
        cam.look_at(Vec3::new(0.0, 10.0, 0.01), Vec3::ZERO);
        let mut controls = TransformControls::new(cam);
        controls.set_mode(Mode::Rotate);
        controls.set_space(Space::Local);
        controls.set_rotation_snap(Some(15.0_f32.to_radians()));
        controls.attach(&scene, object);

        // Grab the Y ring from above, away from the edge-on X and Z rings
        let factor = controls.gizmo().scale_factor();
        let grab = Vec3::new(1.0, 0.0, 1.0).normalize() * factor;
        let start = ndc(&cam, grab);
        controls.pointer_hover(&scene, Pointer::moved(start.x, start.y));
        assert_eq!(controls.axis(), Some(Axis::Y));

        controls.pointer_down(&mut scene, Pointer::primary(start.x, start.y));
        for step in 1..=5 {
            let p = ndc(&cam, grab + Vec3::new(0.0005 * step as f32, 0.0, 0.0));
            controls.pointer_move(&mut scene, Pointer::moved(p.x, p.y));
            let rotation = scene.local_pose(object).unwrap().rotation;
            assert_relative_eq!(rotation.length(), 1.0, epsilon = 1e-5);
        }

        // Raw angle is about 0.5 rad, two 15 degree increments
        assert_relative_eq!(
            controls.rotation_angle().abs(),
            30.0_f32.to_radians(),
            epsilon = 1e-4
        );
        let rotation = scene.local_pose(object).unwrap().rotation;
        assert_relative_eq!(
            rotation.angle_between(Quat::IDENTITY),
            30.0_f32.to_radians(),
            epsilon = 1e-3
        );
    }

    #[test]
    fn test_handle_input_routes_drag() {
        let (mut scene, object) = scene_with_object();
        let mut controls = TransformControls::new(camera());
        controls.attach(&scene, object);

        let cam = *controls.camera();
        let start = ndc(&cam, Vec3::new(0.8, 0.0, 0.0));
        let end = ndc(&cam, Vec3::new(1.8, 0.0, 0.0));

        controls.handle_input(
            &mut scene,
            PointerInput::mouse(PointerPhase::Down, Pointer::primary(start.x, start.y)),
        );
        assert!(controls.is_capturing());
        assert!(controls.is_dragging());

        controls.handle_input(
            &mut scene,
            PointerInput::mouse(PointerPhase::Move, Pointer::moved(end.x, end.y)),
        );
        assert_relative_eq!(
            scene.local_pose(object).unwrap().position.x,
            1.0,
            epsilon = 1e-4
        );

        controls.handle_input(
            &mut scene,
            PointerInput::mouse(PointerPhase::Up, Pointer::primary(end.x, end.y)),
        );
        assert!(!controls.is_capturing());
        assert!(!controls.is_dragging());
    }

    #[test]
    fn test_detach_mid_drag_drops_session_silently() {
        let (mut scene, object) = scene_with_object();
        let mut controls = TransformControls::new(camera());
        controls.attach(&scene, object);
        let log = record(&mut controls);

        let cam = *controls.camera();
        let start = ndc(&cam, Vec3::new(0.8, 0.0, 0.0));
        controls.pointer_hover(&scene, Pointer::moved(start.x, start.y));
        controls.pointer_down(&mut scene, Pointer::primary(start.x, start.y));
        assert!(controls.session().is_some());

        controls.detach();
        assert!(controls.session().is_none());
        assert!(!controls.is_dragging());
        assert!(
            !log.lock()
                .iter()
                .any(|event| matches!(event, ControlEvent::DragEnd { .. }))
        );
    }

    #[test]
    fn test_plane_miss_still_drags_without_session() {
        let (mut scene, object) = scene_with_object();
        let mut controls = TransformControls::new(camera());
        controls.attach(&scene, object);
        let log = record(&mut controls);

        let cam = *controls.camera();
        let start = ndc(&cam, Vec3::new(0.8, 0.0, 0.0));
        controls.pointer_hover(&scene, Pointer::moved(start.x, start.y));
        assert_eq!(controls.axis(), Some(Axis::X));

        // Nearly parallel to the constraint plane, far past its extent
        controls.pointer_down(&mut scene, Pointer::primary(1.0e6, 0.0));
        assert!(controls.is_dragging());
        assert!(controls.session().is_none());
        assert!(log.lock().contains(&ControlEvent::DragStart {
            mode: Mode::Translate
        }));

        let end = ndc(&cam, Vec3::new(1.8, 0.0, 0.0));
        controls.pointer_move(&mut scene, Pointer::moved(end.x, end.y));
        assert_eq!(scene.local_pose(object).unwrap(), Pose::IDENTITY);
        assert!(!log.lock().contains(&ControlEvent::ObjectChange));
    }

    #[test]
    fn test_dispose_removes_listeners() {
        let mut controls = TransformControls::new(camera());
        let log = record(&mut controls);
        controls.dispose();
        log.lock().clear();

        controls.set_mode(Mode::Scale);
        assert!(log.lock().is_empty());
        assert!(controls.is_disposed());
    }
}
