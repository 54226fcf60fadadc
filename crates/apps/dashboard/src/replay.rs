//! Scripted viewport sessions against the recording engine.
//!
//! A script is a list of zoom changes stamped with an offset from the start
//! of the session. Steps are injected through the engine, so they travel the
//! same subscribe/pump path a real gesture would.

use std::collections::VecDeque;
use std::time::Duration;

use controller::MapController;
use foundation::geo::LatLng;
use foundation::time::Time;
use layers::stack::RenderSummary;
use map::recording::RecordingMap;
use map::viewport::ViewportState;
use runtime::metrics::MetricsSnapshot;
use serde::{Deserialize, Serialize};
use tokio::time::{Instant, MissedTickBehavior, interval};
use tracing::{debug, info};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScriptStep {
    pub at_ms: u64,
    pub zoom: f64,
    /// Keeps the current center when absent.
    #[serde(default)]
    pub center: Option<LatLng>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Script {
    pub steps: Vec<ScriptStep>,
}

impl Default for Script {
    /// Zoom out of the marker band, into it, and back out.
    fn default() -> Self {
        let step = |at_ms, zoom| ScriptStep {
            at_ms,
            zoom,
            center: None,
        };
        Self {
            steps: vec![step(0, 8.0), step(400, 11.0), step(800, 9.0)],
        }
    }
}

impl Script {
    pub fn from_json_str(text: &str) -> Result<Self, serde_json::Error> {
        let mut script: Script = serde_json::from_str(text)?;
        script.steps.sort_by_key(|s| s.at_ms);
        Ok(script)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TransitionRecord {
    pub at_ms: u64,
    pub from: &'static str,
    pub to: &'static str,
    pub zoom: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ReplaySummary {
    pub final_mode: &'static str,
    pub final_zoom: f64,
    pub incidents: usize,
    pub fire_departments: usize,
    pub heat_samples: usize,
    pub skipped: usize,
    pub transitions: Vec<TransitionRecord>,
    pub engine_ops: usize,
    pub violations: Vec<String>,
    pub metrics: MetricsSnapshot,
}

pub struct Replay {
    controller: MapController<RecordingMap>,
    steps: VecDeque<ScriptStep>,
    transitions: Vec<TransitionRecord>,
    render: RenderSummary,
}

impl Replay {
    /// `controller` must already be initialized and rendered.
    pub fn new(
        controller: MapController<RecordingMap>,
        script: Script,
        render: RenderSummary,
    ) -> Self {
        Self {
            controller,
            steps: script.steps.into(),
            transitions: Vec::new(),
            render,
        }
    }

    /// Injects every step due at `now`, then pumps the controller once.
    pub fn advance(&mut self, now: Time) {
        while self
            .steps
            .front()
            .is_some_and(|s| s.at_ms <= now.as_millis())
        {
            let Some(step) = self.steps.pop_front() else {
                break;
            };
            let current = self
                .controller
                .map()
                .viewport()
                .unwrap_or_else(|| self.controller.viewport());
            let state = ViewportState::new(step.zoom, step.center.unwrap_or(current.center));
            debug!(at_ms = step.at_ms, zoom = step.zoom, "injecting viewport change");
            self.controller.engine_mut().emit(state);
        }
        if let Some(t) = self.controller.pump(now) {
            info!(
                at_ms = now.as_millis(),
                from = t.from.as_str(),
                to = t.to.as_str(),
                zoom = t.zoom,
                "layer mode switched"
            );
            self.transitions.push(TransitionRecord {
                at_ms: now.as_millis(),
                from: t.from.as_str(),
                to: t.to.as_str(),
                zoom: t.zoom,
            });
        }
    }

    /// True once every step has been injected and the last burst settled.
    pub fn is_finished(&self) -> bool {
        self.steps.is_empty() && !self.controller.has_pending_viewport()
    }

    /// Tears the controller down and reports what happened.
    pub fn finish(mut self) -> ReplaySummary {
        let final_mode = self.controller.mode().as_str();
        let final_zoom = self.controller.viewport().zoom;
        self.controller.teardown();
        let map = self.controller.map();
        ReplaySummary {
            final_mode,
            final_zoom,
            incidents: self.render.incidents,
            fire_departments: self.render.fire_departments,
            heat_samples: self.render.heat_samples,
            skipped: self.render.skipped.len(),
            transitions: self.transitions,
            engine_ops: map.ops().len(),
            violations: map.violations().to_vec(),
            metrics: self.controller.metrics().snapshot(),
        }
    }
}

/// Runs the session in real time, pumping once per `tick`.
pub async fn run(mut replay: Replay, tick: Duration) -> ReplaySummary {
    let start = Instant::now();
    let mut ticker = interval(tick);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);
    loop {
        ticker.tick().await;
        let elapsed = u64::try_from(start.elapsed().as_millis()).unwrap_or(u64::MAX);
        replay.advance(Time::from_millis(elapsed));
        if replay.is_finished() {
            break;
        }
    }
    replay.finish()
}
