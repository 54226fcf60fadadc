use foundation::geo::LatLng;

#[derive(Debug, Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct LayerId(pub u64);

#[derive(Debug, Copy, Clone, PartialEq)]
pub struct HeatSample {
    pub position: LatLng,
    /// Intensity contribution in `[0, 1]`.
    pub weight: f64,
}

#[derive(Debug, Clone, PartialEq)]
pub enum LayerKind {
    /// Continuous density rendering of all samples.
    Heat {
        samples: Vec<HeatSample>,
        radius_px: u32,
    },
}

/// A layer handed to the engine as a unit.
#[derive(Debug, Clone, PartialEq)]
pub struct MapLayer {
    pub id: LayerId,
    pub kind: LayerKind,
}

impl MapLayer {
    pub fn heat(id: LayerId, samples: Vec<HeatSample>, radius_px: u32) -> Self {
        Self {
            id,
            kind: LayerKind::Heat { samples, radius_px },
        }
    }

    pub fn sample_count(&self) -> usize {
        match &self.kind {
            LayerKind::Heat { samples, .. } => samples.len(),
        }
    }
}
