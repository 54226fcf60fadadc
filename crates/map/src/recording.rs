use std::collections::{BTreeMap, BTreeSet};

use foundation::geo::LatLng;
use tracing::trace;

use crate::adapter::{
    ContainerHandle, EngineHandle, MapAdapter, MapError, SubscriptionId, ViewportHandler,
};
use crate::drawable::{Drawable, DrawableId};
use crate::layer::{LayerId, MapLayer};
use crate::viewport::{ViewportChangeEvent, ViewportState};

/// One call made through the adapter, in call order.
#[derive(Debug, Clone, PartialEq)]
pub enum MapOp {
    Initialize(ContainerHandle),
    SetZoom(f64),
    SetCenter(LatLng),
    AddObject(DrawableId),
    RemoveObject(DrawableId),
    AddLayer(LayerId),
    RemoveLayer(LayerId),
    Subscribe(SubscriptionId),
    Unsubscribe(SubscriptionId),
}

impl MapOp {
    pub fn is_attach(&self) -> bool {
        matches!(self, MapOp::AddObject(_) | MapOp::AddLayer(_))
    }

    pub fn is_detach(&self) -> bool {
        matches!(self, MapOp::RemoveObject(_) | MapOp::RemoveLayer(_))
    }
}

/// In-memory engine that records every adapter call.
///
/// Contract misuse (double add, removing an unknown id, calls before
/// `initialize`) is recorded as a violation instead of panicking, so tests can
/// assert on it.
#[derive(Default)]
pub struct RecordingMap {
    containers: Option<BTreeSet<String>>,
    engine: Option<EngineHandle>,
    viewport: Option<ViewportState>,
    ops: Vec<MapOp>,
    objects: BTreeMap<DrawableId, Drawable>,
    layers: BTreeMap<LayerId, MapLayer>,
    handlers: BTreeMap<SubscriptionId, ViewportHandler>,
    next_subscription: u64,
    violations: Vec<String>,
}

impl std::fmt::Debug for RecordingMap {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RecordingMap")
            .field("engine", &self.engine)
            .field("viewport", &self.viewport)
            .field("ops", &self.ops.len())
            .field("objects", &self.objects.len())
            .field("layers", &self.layers.len())
            .field("subscribers", &self.handlers.len())
            .field("violations", &self.violations)
            .finish()
    }
}

impl RecordingMap {
    pub fn new() -> Self {
        Self::default()
    }

    /// Only the listed containers exist; initializing any other fails.
    pub fn with_containers<I, S>(containers: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            containers: Some(containers.into_iter().map(Into::<String>::into).collect()),
            ..Self::default()
        }
    }

    pub fn is_initialized(&self) -> bool {
        self.engine.is_some()
    }

    pub fn viewport(&self) -> Option<ViewportState> {
        self.viewport
    }

    pub fn ops(&self) -> &[MapOp] {
        &self.ops
    }

    pub fn take_ops(&mut self) -> Vec<MapOp> {
        std::mem::take(&mut self.ops)
    }

    pub fn live_objects(&self) -> impl Iterator<Item = &Drawable> {
        self.objects.values()
    }

    pub fn object(&self, id: DrawableId) -> Option<&Drawable> {
        self.objects.get(&id)
    }

    pub fn object_count(&self) -> usize {
        self.objects.len()
    }

    pub fn layer(&self, id: LayerId) -> Option<&MapLayer> {
        self.layers.get(&id)
    }

    pub fn layer_count(&self) -> usize {
        self.layers.len()
    }

    pub fn subscriber_count(&self) -> usize {
        self.handlers.len()
    }

    pub fn violations(&self) -> &[String] {
        &self.violations
    }

    /// Simulates a user gesture: updates the viewport and notifies subscribers.
    ///
    /// Returns the number of handlers notified.
    pub fn emit(&mut self, state: ViewportState) -> usize {
        self.viewport = Some(state);
        let event = ViewportChangeEvent::new(state);
        for handler in self.handlers.values_mut() {
            handler(event);
        }
        self.handlers.len()
    }

    fn require_engine(&mut self, op: &str) -> bool {
        if self.engine.is_none() {
            self.violations.push(format!("{op} before initialize"));
            return false;
        }
        true
    }

    fn emit_current(&mut self) {
        if let Some(state) = self.viewport {
            self.emit(state);
        }
    }
}

impl MapAdapter for RecordingMap {
    fn initialize(
        &mut self,
        container: &ContainerHandle,
        initial: ViewportState,
    ) -> Result<EngineHandle, MapError> {
        if self.engine.is_some() {
            return Err(MapError::AlreadyInitialized);
        }
        if let Some(known) = &self.containers {
            if !known.contains(&container.0) {
                return Err(MapError::ContainerNotFound(container.0.clone()));
            }
        }
        trace!(container = %container.0, zoom = initial.zoom, "engine initialize");
        let handle = EngineHandle(1);
        self.engine = Some(handle);
        self.viewport = Some(initial);
        self.ops.push(MapOp::Initialize(container.clone()));
        Ok(handle)
    }

    fn set_zoom(&mut self, level: f64) {
        if !self.require_engine("set_zoom") {
            return;
        }
        trace!(level, "engine set_zoom");
        self.ops.push(MapOp::SetZoom(level));
        if let Some(v) = self.viewport.as_mut() {
            v.zoom = level;
        }
        self.emit_current();
    }

    fn set_center(&mut self, center: LatLng) {
        if !self.require_engine("set_center") {
            return;
        }
        trace!(lat = center.lat, lng = center.lng, "engine set_center");
        self.ops.push(MapOp::SetCenter(center));
        if let Some(v) = self.viewport.as_mut() {
            v.center = center;
        }
        self.emit_current();
    }

    fn add_object(&mut self, drawable: &Drawable) {
        if !self.require_engine("add_object") {
            return;
        }
        self.ops.push(MapOp::AddObject(drawable.id));
        if self.objects.insert(drawable.id, drawable.clone()).is_some() {
            self.violations
                .push(format!("object {} added twice", drawable.id.0));
        }
    }

    fn remove_object(&mut self, id: DrawableId) {
        if !self.require_engine("remove_object") {
            return;
        }
        self.ops.push(MapOp::RemoveObject(id));
        if self.objects.remove(&id).is_none() {
            self.violations
                .push(format!("removed unknown object {}", id.0));
        }
    }

    fn add_layer(&mut self, layer: &MapLayer) {
        if !self.require_engine("add_layer") {
            return;
        }
        trace!(layer = layer.id.0, samples = layer.sample_count(), "engine add_layer");
        self.ops.push(MapOp::AddLayer(layer.id));
        if self.layers.insert(layer.id, layer.clone()).is_some() {
            self.violations.push(format!("layer {} added twice", layer.id.0));
        }
    }

    fn remove_layer(&mut self, id: LayerId) {
        if !self.require_engine("remove_layer") {
            return;
        }
        trace!(layer = id.0, "engine remove_layer");
        self.ops.push(MapOp::RemoveLayer(id));
        if self.layers.remove(&id).is_none() {
            self.violations.push(format!("removed unknown layer {}", id.0));
        }
    }

    fn subscribe(&mut self, handler: ViewportHandler) -> SubscriptionId {
        let id = SubscriptionId(self.next_subscription);
        self.next_subscription += 1;
        self.handlers.insert(id, handler);
        self.ops.push(MapOp::Subscribe(id));
        id
    }

    fn unsubscribe(&mut self, id: SubscriptionId) {
        self.ops.push(MapOp::Unsubscribe(id));
        if self.handlers.remove(&id).is_none() {
            self.violations
                .push(format!("unsubscribed unknown subscription {}", id.0));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::{MapOp, RecordingMap};
    use crate::adapter::{ContainerHandle, MapAdapter, MapError};
    use crate::drawable::{Drawable, DrawableId, MarkerStyle};
    use crate::viewport::{ViewportChangeEvent, ViewportState};
    use foundation::geo::LatLng;
    use std::sync::{Arc, Mutex};

    fn initial() -> ViewportState {
        ViewportState::new(7.0, LatLng::new(38.0, 23.7))
    }

    fn marker(id: u64) -> Drawable {
        Drawable::new(DrawableId(id), LatLng::new(38.0, 23.7), MarkerStyle::default(), "m")
    }

    #[test]
    fn unknown_container_fails_initialize() {
        let mut map = RecordingMap::with_containers(["map"]);
        let err = map
            .initialize(&ContainerHandle::new("missing"), initial())
            .unwrap_err();
        assert_eq!(err, MapError::ContainerNotFound("missing".into()));
        assert!(!map.is_initialized());
    }

    #[test]
    fn second_initialize_is_rejected() {
        let mut map = RecordingMap::new();
        map.initialize(&ContainerHandle::new("map"), initial()).unwrap();
        assert_eq!(
            map.initialize(&ContainerHandle::new("map"), initial()),
            Err(MapError::AlreadyInitialized)
        );
    }

    #[test]
    fn tracks_live_objects_and_violations() {
        let mut map = RecordingMap::new();
        map.initialize(&ContainerHandle::new("map"), initial()).unwrap();
        map.add_object(&marker(1));
        map.add_object(&marker(1));
        map.remove_object(DrawableId(1));
        map.remove_object(DrawableId(2));
        assert_eq!(map.object_count(), 0);
        assert_eq!(map.violations().len(), 2);
    }

    #[test]
    fn calls_before_initialize_are_violations() {
        let mut map = RecordingMap::new();
        map.add_object(&marker(1));
        map.set_zoom(3.0);
        assert_eq!(map.object_count(), 0);
        assert!(map.ops().is_empty());
        assert_eq!(map.violations().len(), 2);
    }

    #[test]
    fn emit_notifies_subscribers_until_unsubscribed() {
        let seen = Arc::new(Mutex::new(Vec::new()));
        let mut map = RecordingMap::new();
        map.initialize(&ContainerHandle::new("map"), initial()).unwrap();

        let sink = Arc::clone(&seen);
        let sub = map.subscribe(Box::new(move |e: ViewportChangeEvent| {
            sink.lock().unwrap().push(e.zoom())
        }));
        assert_eq!(map.emit(initial().with_zoom(9.0)), 1);
        map.set_zoom(12.0);
        map.unsubscribe(sub);
        assert_eq!(map.emit(initial().with_zoom(3.0)), 0);

        assert_eq!(*seen.lock().unwrap(), vec![9.0, 12.0]);
        assert_eq!(map.viewport().map(|v| v.zoom), Some(3.0));
        assert!(matches!(map.ops().last(), Some(MapOp::Unsubscribe(_))));
    }
}
