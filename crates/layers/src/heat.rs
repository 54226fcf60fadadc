use map::adapter::MapAdapter;
use map::layer::{HeatSample, LayerId, MapLayer};
use tracing::trace;

pub const DEFAULT_HEAT_RADIUS_PX: u32 = 25;

/// Incidents without a severity count as the backend default of 1.
const DEFAULT_SEVERITY: f64 = 1.0;
const MAX_SEVERITY: f64 = 5.0;
const MIN_WEIGHT: f64 = 0.2;

/// Heat contribution of one incident.
pub fn severity_weight(severity: Option<f64>) -> f64 {
    let s = match severity {
        Some(s) if s.is_finite() => s,
        _ => DEFAULT_SEVERITY,
    };
    (s / MAX_SEVERITY).clamp(MIN_WEIGHT, 1.0)
}

/// The aggregated representation of the incident set.
///
/// Same ownership rules as [`crate::group::DrawableGroup`]: attach and detach
/// are idempotent and the layer is detached on dispose.
#[derive(Debug, Clone, PartialEq)]
pub struct HeatGroup {
    layer: MapLayer,
    attached: bool,
}

impl HeatGroup {
    pub fn new(id: LayerId, samples: Vec<HeatSample>, radius_px: u32) -> Self {
        Self {
            layer: MapLayer::heat(id, samples, radius_px),
            attached: false,
        }
    }

    pub fn layer(&self) -> &MapLayer {
        &self.layer
    }

    pub fn id(&self) -> LayerId {
        self.layer.id
    }

    pub fn sample_count(&self) -> usize {
        self.layer.sample_count()
    }

    pub fn is_attached(&self) -> bool {
        self.attached
    }

    pub fn attach(&mut self, map: &mut dyn MapAdapter) {
        if self.attached {
            return;
        }
        trace!(layer = self.layer.id.0, samples = self.sample_count(), "attach heat layer");
        map.add_layer(&self.layer);
        self.attached = true;
    }

    pub fn detach(&mut self, map: &mut dyn MapAdapter) {
        if !self.attached {
            return;
        }
        trace!(layer = self.layer.id.0, "detach heat layer");
        map.remove_layer(self.layer.id);
        self.attached = false;
    }

    pub fn dispose(mut self, map: &mut dyn MapAdapter) {
        self.detach(map);
    }
}

#[cfg(test)]
mod tests {
    use super::{HeatGroup, severity_weight};
    use foundation::geo::LatLng;
    use map::adapter::{ContainerHandle, MapAdapter};
    use map::layer::{HeatSample, LayerId};
    use map::recording::{MapOp, RecordingMap};
    use map::viewport::ViewportState;

    #[test]
    fn weight_scales_with_severity() {
        assert_eq!(severity_weight(Some(5.0)), 1.0);
        assert_eq!(severity_weight(Some(2.5)), 0.5);
        assert_eq!(severity_weight(Some(50.0)), 1.0);
        assert_eq!(severity_weight(Some(0.0)), 0.2);
    }

    #[test]
    fn missing_or_bad_severity_uses_default() {
        assert_eq!(severity_weight(None), 0.2);
        assert_eq!(severity_weight(Some(f64::NAN)), 0.2);
    }

    #[test]
    fn attach_detach_round_trip_uses_one_layer() {
        let mut map = RecordingMap::new();
        map.initialize(
            &ContainerHandle::new("map"),
            ViewportState::new(5.0, LatLng::new(0.0, 0.0)),
        )
        .unwrap();
        map.take_ops();

        let samples = vec![HeatSample {
            position: LatLng::new(1.0, 2.0),
            weight: 0.4,
        }];
        let mut heat = HeatGroup::new(LayerId(3), samples, 25);
        heat.attach(&mut map);
        heat.attach(&mut map);
        assert_eq!(map.layer_count(), 1);
        heat.dispose(&mut map);
        assert_eq!(map.layer_count(), 0);
        assert_eq!(
            map.ops(),
            &[MapOp::AddLayer(LayerId(3)), MapOp::RemoveLayer(LayerId(3))]
        );
    }
}
