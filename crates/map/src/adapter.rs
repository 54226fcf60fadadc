use foundation::geo::LatLng;

use crate::drawable::{Drawable, DrawableId};
use crate::layer::{LayerId, MapLayer};
use crate::viewport::{ViewportChangeEvent, ViewportState};

/// Host element the engine renders into (a DOM id in a browser host).
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ContainerHandle(pub String);

impl ContainerHandle {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }
}

#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub struct EngineHandle(pub u64);

#[derive(Debug, Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct SubscriptionId(pub u64);

pub type ViewportHandler = Box<dyn FnMut(ViewportChangeEvent) + Send>;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MapError {
    ContainerNotFound(String),
    AlreadyInitialized,
}

impl std::fmt::Display for MapError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            MapError::ContainerNotFound(id) => write!(f, "map container not found: {id}"),
            MapError::AlreadyInitialized => write!(f, "map engine already initialized"),
        }
    }
}

impl std::error::Error for MapError {}

/// Capability set the controller needs from a map engine.
///
/// Engines are free to emit viewport-change events from inside `set_zoom` /
/// `set_center`; handlers must therefore only enqueue work.
pub trait MapAdapter {
    fn initialize(
        &mut self,
        container: &ContainerHandle,
        initial: ViewportState,
    ) -> Result<EngineHandle, MapError>;

    fn set_zoom(&mut self, level: f64);
    fn set_center(&mut self, center: LatLng);

    fn add_object(&mut self, drawable: &Drawable);
    fn remove_object(&mut self, id: DrawableId);

    fn add_layer(&mut self, layer: &MapLayer);
    fn remove_layer(&mut self, id: LayerId);

    fn subscribe(&mut self, handler: ViewportHandler) -> SubscriptionId;
    fn unsubscribe(&mut self, id: SubscriptionId);
}

impl<M: MapAdapter + ?Sized> MapAdapter for Box<M> {
    fn initialize(
        &mut self,
        container: &ContainerHandle,
        initial: ViewportState,
    ) -> Result<EngineHandle, MapError> {
        (**self).initialize(container, initial)
    }

    fn set_zoom(&mut self, level: f64) {
        (**self).set_zoom(level)
    }

    fn set_center(&mut self, center: LatLng) {
        (**self).set_center(center)
    }

    fn add_object(&mut self, drawable: &Drawable) {
        (**self).add_object(drawable)
    }

    fn remove_object(&mut self, id: DrawableId) {
        (**self).remove_object(id)
    }

    fn add_layer(&mut self, layer: &MapLayer) {
        (**self).add_layer(layer)
    }

    fn remove_layer(&mut self, id: LayerId) {
        (**self).remove_layer(id)
    }

    fn subscribe(&mut self, handler: ViewportHandler) -> SubscriptionId {
        (**self).subscribe(handler)
    }

    fn unsubscribe(&mut self, id: SubscriptionId) {
        (**self).unsubscribe(id)
    }
}
