use std::sync::mpsc::{self, Receiver};

use foundation::geo::LatLng;
use foundation::time::Time;
use incidents::{FireDepartmentRecord, IncidentRecord, SpatialRecord};
use layers::info::info_window;
use layers::mode::{DisplayMode, Transition};
use layers::stack::{LayerStack, RenderSummary};
use map::adapter::{ContainerHandle, EngineHandle, MapAdapter, MapError, SubscriptionId};
use map::drawable::DrawableId;
use map::viewport::{ViewportChangeEvent, ViewportState};
use runtime::debounce::Debouncer;
use runtime::metrics::{Counter, Metrics};
use tracing::{debug, info, warn};

use crate::config::ControllerConfig;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ControllerError {
    AlreadyInitialized,
    TornDown,
    Map(MapError),
}

impl std::fmt::Display for ControllerError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ControllerError::AlreadyInitialized => write!(f, "controller already initialized"),
            ControllerError::TornDown => write!(f, "controller has been torn down"),
            ControllerError::Map(e) => write!(f, "map engine error: {e}"),
        }
    }
}

impl std::error::Error for ControllerError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ControllerError::Map(e) => Some(e),
            _ => None,
        }
    }
}

impl From<MapError> for ControllerError {
    fn from(e: MapError) -> Self {
        ControllerError::Map(e)
    }
}

/// Incidents and fire departments, always replaced as a pair.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DataSet {
    pub incidents: Vec<IncidentRecord>,
    pub fire_departments: Vec<FireDepartmentRecord>,
}

pub type RawObserver = Box<dyn FnMut(&ViewportChangeEvent)>;

/// View controller for one map instance.
///
/// Lifecycle: `new` → `initialize` → any number of `pump`/`render` calls →
/// `teardown` (also run on drop). Nothing reaches the engine before
/// `initialize` succeeds or after `teardown`.
pub struct MapController<M: MapAdapter> {
    config: ControllerConfig,
    map: M,
    engine: Option<EngineHandle>,
    subscription: Option<SubscriptionId>,
    inbox: Option<Receiver<ViewportChangeEvent>>,
    debouncer: Debouncer<ViewportChangeEvent>,
    stack: LayerStack,
    viewport: ViewportState,
    data: DataSet,
    queued: Option<DataSet>,
    observers: Vec<RawObserver>,
    metrics: Metrics,
    torn_down: bool,
}

impl<M: MapAdapter> MapController<M> {
    pub fn new(map: M, config: ControllerConfig) -> Self {
        let viewport = config.initial_viewport();
        Self {
            debouncer: Debouncer::new(config.debounce_interval()),
            stack: LayerStack::new(config.zoom_threshold, config.heat_radius_px),
            config,
            map,
            engine: None,
            subscription: None,
            inbox: None,
            viewport,
            data: DataSet::default(),
            queued: None,
            observers: Vec::new(),
            metrics: Metrics::new(),
            torn_down: false,
        }
    }

    pub fn config(&self) -> &ControllerConfig {
        &self.config
    }

    pub fn mode(&self) -> DisplayMode {
        self.stack.mode()
    }

    /// Last settled viewport.
    pub fn viewport(&self) -> ViewportState {
        self.viewport
    }

    pub fn is_ready(&self) -> bool {
        self.engine.is_some() && !self.torn_down
    }

    pub fn is_torn_down(&self) -> bool {
        self.torn_down
    }

    pub fn has_pending_viewport(&self) -> bool {
        self.debouncer.is_pending()
    }

    pub fn has_queued_render(&self) -> bool {
        self.queued.is_some()
    }

    pub fn layers(&self) -> &LayerStack {
        &self.stack
    }

    pub fn data(&self) -> &DataSet {
        &self.data
    }

    pub fn metrics(&self) -> &Metrics {
        &self.metrics
    }

    pub fn map(&self) -> &M {
        &self.map
    }

    /// Direct engine access for hosts that drive a headless engine.
    ///
    /// Mutating drawables or layers through this bypasses the controller's
    /// bookkeeping; use it only to feed input into the engine.
    pub fn engine_mut(&mut self) -> &mut M {
        &mut self.map
    }

    /// Registers a callback that sees every raw viewport event, before
    /// debouncing.
    pub fn observe_raw(&mut self, observer: impl FnMut(&ViewportChangeEvent) + 'static) {
        self.observers.push(Box::new(observer));
    }

    pub fn initialize(&mut self, container: &ContainerHandle) -> Result<(), ControllerError> {
        if self.torn_down {
            return Err(ControllerError::TornDown);
        }
        if self.engine.is_some() {
            return Err(ControllerError::AlreadyInitialized);
        }

        let engine = self.map.initialize(container, self.viewport)?;
        let (tx, rx) = mpsc::channel::<ViewportChangeEvent>();
        let subscription = self.map.subscribe(Box::new(move |event: ViewportChangeEvent| {
            // The receiver is gone only after teardown.
            let _ = tx.send(event);
        }));
        self.engine = Some(engine);
        self.subscription = Some(subscription);
        self.inbox = Some(rx);
        info!(container = %container.0, zoom = self.viewport.zoom, "map controller initialized");

        if self.stack.apply_zoom(&mut self.map, self.viewport.zoom).is_some() {
            self.metrics.inc(Counter::ModeTransitions);
        }
        if let Some(data) = self.queued.take() {
            debug!("applying render queued before initialization");
            self.apply_render(data);
        }
        self.update_gauges();
        Ok(())
    }

    /// Accepts one raw viewport event.
    ///
    /// Observers see it immediately; the layer decision only sees the last
    /// event of a burst, once the quiet interval has elapsed.
    pub fn on_viewport_change(&mut self, now: Time, event: ViewportChangeEvent) {
        if self.torn_down {
            return;
        }
        self.metrics.inc(Counter::RawViewportEvents);
        for observer in &mut self.observers {
            observer(&event);
        }
        if self.debouncer.is_pending() {
            self.metrics.inc(Counter::CoalescedViewportEvents);
        }
        self.debouncer.schedule(now, event);
    }

    /// Fires a slot that is already due, then drains events delivered by the
    /// engine and advances the slot again.
    ///
    /// Drained events are stamped with `now`; a burst already due fires first.
    pub fn pump(&mut self, now: Time) -> Option<Transition> {
        let settled = self.tick(now);
        let events: Vec<ViewportChangeEvent> = match &self.inbox {
            Some(rx) => rx.try_iter().collect(),
            None => Vec::new(),
        };
        for event in events {
            self.on_viewport_change(now, event);
        }
        self.tick(now).or(settled)
    }

    /// Applies the settled viewport if the quiet interval has elapsed.
    pub fn tick(&mut self, now: Time) -> Option<Transition> {
        if !self.is_ready() {
            return None;
        }
        let event = self.debouncer.poll(now)?;
        self.metrics.inc(Counter::SettledViewportEvents);
        self.settle(event.state)
    }

    /// Replaces the data set on the map.
    ///
    /// Before initialization the latest input is queued and `None` is
    /// returned; after teardown input is dropped.
    pub fn render(
        &mut self,
        incidents: Vec<IncidentRecord>,
        fire_departments: Vec<FireDepartmentRecord>,
    ) -> Option<RenderSummary> {
        let data = DataSet {
            incidents,
            fire_departments,
        };
        if self.torn_down {
            debug!("render after teardown ignored");
            return None;
        }
        if self.engine.is_none() {
            if self.queued.replace(data).is_some() {
                debug!("replacing queued render");
            }
            self.metrics.inc(Counter::QueuedRenders);
            return None;
        }
        Some(self.apply_render(data))
    }

    /// Moves the view programmatically.
    ///
    /// Supersedes any gesture still waiting in the debounce slot.
    pub fn recenter(&mut self, center: LatLng, zoom: f64) -> Option<Transition> {
        if !self.is_ready() {
            return None;
        }
        let center = match LatLng::checked(center.lat, center.lng) {
            Ok(c) => c,
            Err(error) => {
                warn!(%error, "ignoring recenter to invalid position");
                return None;
            }
        };
        let zoom = if zoom.is_finite() {
            self.config.clamp_zoom(zoom)
        } else {
            self.viewport.zoom
        };
        self.debouncer.cancel();
        self.map.set_center(center);
        self.map.set_zoom(zoom);
        self.settle(ViewportState::new(zoom, center))
    }

    /// Centers on a record close enough that its marker is shown.
    pub fn focus(&mut self, record: &SpatialRecord) -> Option<Transition> {
        let position = match record.position() {
            Ok(p) => p,
            Err(error) => {
                warn!(id = record.id(), %error, "cannot focus record without a position");
                return None;
            }
        };
        let zoom = self.viewport.zoom.max(self.stack.threshold());
        self.recenter(position, zoom)
    }

    pub fn record_for(&self, id: DrawableId) -> Option<&SpatialRecord> {
        self.stack.record_for(id)
    }

    /// Popup text for a clicked marker.
    pub fn info_for(&self, id: DrawableId) -> Option<String> {
        self.record_for(id)
            .map(|record| info_window(record, &self.data.fire_departments))
    }

    /// Releases everything this controller acquired. Idempotent.
    pub fn teardown(&mut self) {
        if self.torn_down {
            return;
        }
        self.torn_down = true;
        let cancelled = self.debouncer.close();
        if self.engine.is_some() {
            self.stack.clear(&mut self.map);
        }
        if let Some(subscription) = self.subscription.take() {
            self.map.unsubscribe(subscription);
        }
        self.inbox = None;
        self.queued = None;
        self.observers.clear();
        self.update_gauges();
        info!(
            cancelled_pending = cancelled.is_some(),
            "map controller torn down"
        );
    }

    fn settle(&mut self, state: ViewportState) -> Option<Transition> {
        let zoom = if state.zoom.is_finite() {
            state.zoom
        } else {
            warn!(zoom = state.zoom, "ignoring non-finite settled zoom");
            self.viewport.zoom
        };
        let center = match LatLng::checked(state.center.lat, state.center.lng) {
            Ok(c) => c,
            Err(error) => {
                warn!(%error, "ignoring invalid settled center");
                self.viewport.center
            }
        };
        let state = ViewportState::new(zoom, center);
        self.viewport = state;
        let transition = self.stack.apply_zoom(&mut self.map, state.zoom);
        if transition.is_some() {
            self.metrics.inc(Counter::ModeTransitions);
            self.update_gauges();
        }
        transition
    }

    fn apply_render(&mut self, data: DataSet) -> RenderSummary {
        let summary = self
            .stack
            .render(&mut self.map, &data.incidents, &data.fire_departments);
        self.data = data;
        self.metrics.inc(Counter::Renders);
        self.metrics
            .add(Counter::SkippedRecords, summary.skipped.len() as u64);
        self.update_gauges();
        summary
    }

    fn update_gauges(&mut self) {
        self.metrics
            .set_gauge("live_markers", self.stack.live_object_count() as i64);
        let heat_live = self.stack.heat().is_some_and(|h| h.is_attached());
        self.metrics.set_gauge("heat_layer_live", i64::from(heat_live));
    }
}

impl<M: MapAdapter> Drop for MapController<M> {
    fn drop(&mut self) {
        self.teardown();
    }
}
