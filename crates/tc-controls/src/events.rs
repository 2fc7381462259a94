//! Synchronous change notifications

use tc_core::NodeId;

use crate::types::{Axis, Mode, Space};

/// A settable property and its new value
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum PropertyChange {
    Object(Option<NodeId>),
    Enabled(bool),
    Axis(Option<Axis>),
    Mode(Mode),
    Space(Space),
    Size(f32),
    Dragging(bool),
    ShowX(bool),
    ShowY(bool),
    ShowZ(bool),
    TranslationSnap(Option<f32>),
    RotationSnap(Option<f32>),
    ScaleSnap(Option<f32>),
}

impl PropertyChange {
    /// Property name as used in `<name>-changed` notifications
    pub fn name(&self) -> &'static str {
        match self {
            PropertyChange::Object(_) => "object",
            PropertyChange::Enabled(_) => "enabled",
            PropertyChange::Axis(_) => "axis",
            PropertyChange::Mode(_) => "mode",
            PropertyChange::Space(_) => "space",
            PropertyChange::Size(_) => "size",
            PropertyChange::Dragging(_) => "dragging",
            PropertyChange::ShowX(_) => "showX",
            PropertyChange::ShowY(_) => "showY",
            PropertyChange::ShowZ(_) => "showZ",
            PropertyChange::TranslationSnap(_) => "translationSnap",
            PropertyChange::RotationSnap(_) => "rotationSnap",
            PropertyChange::ScaleSnap(_) => "scaleSnap",
        }
    }
}

/// Notifications emitted by the transform controls
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ControlEvent {
    /// Anything visual changed, including every drag step
    Change,
    /// The attached object's transform changed
    ObjectChange,
    /// A drag started on a handle
    DragStart { mode: Mode },
    /// A drag ended with a primary button release
    DragEnd { mode: Mode },
    /// A settable property changed value
    PropertyChanged(PropertyChange),
}

/// Handle returned by [`EventDispatcher::add_listener`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ListenerId(u64);

type Listener = Box<dyn FnMut(&ControlEvent)>;

/// Observer list. Listeners run in registration order on the caller's
/// thread; none of them may call back into the emitting controls.
#[derive(Default)]
pub struct EventDispatcher {
    listeners: Vec<(ListenerId, Listener)>,
    next_id: u64,
}

impl EventDispatcher {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_listener(&mut self, listener: impl FnMut(&ControlEvent) + 'static) -> ListenerId {
        let id = ListenerId(self.next_id);
        self.next_id += 1;
        self.listeners.push((id, Box::new(listener)));
        id
    }

    /// Returns false if the listener was not registered
    pub fn remove_listener(&mut self, id: ListenerId) -> bool {
        let before = self.listeners.len();
        self.listeners.retain(|(lid, _)| *lid != id);
        self.listeners.len() != before
    }

    pub fn dispatch(&mut self, event: ControlEvent) {
        for (_, listener) in &mut self.listeners {
            listener(&event);
        }
    }

    pub fn clear(&mut self) {
        self.listeners.clear();
    }

    pub fn len(&self) -> usize {
        self.listeners.len()
    }

    pub fn is_empty(&self) -> bool {
        self.listeners.is_empty()
    }
}

impl std::fmt::Debug for EventDispatcher {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EventDispatcher")
            .field("listeners", &self.listeners.len())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    use parking_lot::Mutex;

    #[test]
    fn test_dispatch_in_order_and_remove() {
        let log = Arc::new(Mutex::new(Vec::new()));
        let mut dispatcher = EventDispatcher::new();

        let first = {
            let log = log.clone();
            dispatcher.add_listener(move |_| log.lock().push(1))
        };
        {
            let log = log.clone();
            dispatcher.add_listener(move |_| log.lock().push(2));
        }

        dispatcher.dispatch(ControlEvent::Change);
        assert_eq!(*log.lock(), vec![1, 2]);

        assert!(dispatcher.remove_listener(first));
        assert!(!dispatcher.remove_listener(first));
        dispatcher.dispatch(ControlEvent::Change);
        assert_eq!(*log.lock(), vec![1, 2, 2]);
    }

    #[test]
    fn test_property_names() {
        assert_eq!(PropertyChange::Mode(Mode::Rotate).name(), "mode");
        assert_eq!(PropertyChange::TranslationSnap(None).name(), "translationSnap");
        assert_eq!(PropertyChange::Dragging(true).name(), "dragging");
    }
}
