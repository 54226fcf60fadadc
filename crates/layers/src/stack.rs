use incidents::{FireDepartmentRecord, IncidentRecord, SpatialRecord};
use map::adapter::MapAdapter;
use map::drawable::DrawableId;
use tracing::debug;

use crate::group::DrawableGroup;
use crate::heat::HeatGroup;
use crate::mode::{DisplayMode, ModeMachine, Transition};
use crate::reconcile::{GroupBuilder, Rebuild, SkippedRecord};

#[derive(Debug, Clone, Default, PartialEq)]
pub struct RenderSummary {
    pub incidents: usize,
    pub fire_departments: usize,
    pub heat_samples: usize,
    pub skipped: Vec<SkippedRecord>,
}

/// Everything the controller has put on the map.
///
/// Invariants:
/// - At most one group per category is attached.
/// - Fire-department markers are attached whenever a data set is present.
/// - Incident markers are attached iff the mode is `Discrete`; the heat layer
///   is attached iff the mode is `Aggregated`.
/// - Every swap removes the outgoing representation before adding the
///   incoming one.
#[derive(Debug, Clone)]
pub struct LayerStack {
    modes: ModeMachine,
    builder: GroupBuilder,
    incidents: Option<DrawableGroup>,
    fire_departments: Option<DrawableGroup>,
    heat: Option<HeatGroup>,
}

impl LayerStack {
    pub fn new(threshold: f64, heat_radius_px: u32) -> Self {
        Self {
            modes: ModeMachine::new(threshold),
            builder: GroupBuilder::new(heat_radius_px),
            incidents: None,
            fire_departments: None,
            heat: None,
        }
    }

    pub fn mode(&self) -> DisplayMode {
        self.modes.mode()
    }

    pub fn threshold(&self) -> f64 {
        self.modes.threshold()
    }

    pub fn incidents(&self) -> Option<&DrawableGroup> {
        self.incidents.as_ref()
    }

    pub fn fire_departments(&self) -> Option<&DrawableGroup> {
        self.fire_departments.as_ref()
    }

    pub fn heat(&self) -> Option<&HeatGroup> {
        self.heat.as_ref()
    }

    /// Objects currently attached through this stack (markers only).
    pub fn live_object_count(&self) -> usize {
        [&self.incidents, &self.fire_departments]
            .into_iter()
            .flatten()
            .filter(|g| g.is_attached())
            .map(DrawableGroup::len)
            .sum()
    }

    pub fn record_for(&self, id: DrawableId) -> Option<&SpatialRecord> {
        [&self.incidents, &self.fire_departments]
            .into_iter()
            .flatten()
            .find_map(|g| g.find(id))
            .map(|m| &m.record)
    }

    /// Evaluates a settled zoom and swaps representations on a band crossing.
    pub fn apply_zoom(&mut self, map: &mut dyn MapAdapter, zoom: f64) -> Option<Transition> {
        let transition = self.modes.evaluate(zoom)?;
        debug!(
            from = transition.from.as_str(),
            to = transition.to.as_str(),
            zoom,
            "display mode transition"
        );
        match transition.to {
            DisplayMode::Discrete => {
                if let Some(heat) = self.heat.as_mut() {
                    heat.detach(map);
                }
                if let Some(group) = self.incidents.as_mut() {
                    group.attach(map);
                }
            }
            DisplayMode::Aggregated => {
                if let Some(group) = self.incidents.as_mut() {
                    group.detach(map);
                }
                if let Some(heat) = self.heat.as_mut() {
                    heat.attach(map);
                }
            }
        }
        Some(transition)
    }

    /// Replaces everything on the map with a representation of the given data.
    ///
    /// The new groups are fully built before anything is touched, old groups
    /// are detached next, and only then are the new ones attached.
    pub fn render(
        &mut self,
        map: &mut dyn MapAdapter,
        incidents: &[IncidentRecord],
        fire_departments: &[FireDepartmentRecord],
    ) -> RenderSummary {
        let Rebuild {
            incidents: mut incident_group,
            fire_departments: mut department_group,
            heat: mut heat_group,
            skipped,
        } = self.builder.build(incidents, fire_departments);

        self.dispose_all(map);

        department_group.attach(map);
        match self.modes.mode() {
            DisplayMode::Discrete => incident_group.attach(map),
            DisplayMode::Aggregated => heat_group.attach(map),
        }

        let summary = RenderSummary {
            incidents: incident_group.len(),
            fire_departments: department_group.len(),
            heat_samples: heat_group.sample_count(),
            skipped,
        };
        debug!(
            mode = self.modes.mode().as_str(),
            incidents = summary.incidents,
            fire_departments = summary.fire_departments,
            skipped = summary.skipped.len(),
            "rendered data set"
        );

        self.incidents = Some(incident_group);
        self.fire_departments = Some(department_group);
        self.heat = Some(heat_group);
        summary
    }

    /// Detaches and drops every group. The current mode is kept.
    pub fn clear(&mut self, map: &mut dyn MapAdapter) {
        self.dispose_all(map);
    }

    fn dispose_all(&mut self, map: &mut dyn MapAdapter) {
        if let Some(group) = self.incidents.take() {
            group.dispose(map);
        }
        if let Some(heat) = self.heat.take() {
            heat.dispose(map);
        }
        if let Some(group) = self.fire_departments.take() {
            group.dispose(map);
        }
    }
}
