use foundation::geo::LatLng;
use serde::{Deserialize, Serialize};

#[derive(Debug, Copy, Clone, PartialEq, Serialize, Deserialize)]
pub struct ViewportState {
    pub zoom: f64,
    pub center: LatLng,
}

impl ViewportState {
    pub const fn new(zoom: f64, center: LatLng) -> Self {
        Self { zoom, center }
    }

    pub fn with_zoom(self, zoom: f64) -> Self {
        Self { zoom, ..self }
    }
}

/// "The viewport has possibly changed".
///
/// Engines emit these at gesture rate with no de-duplication; two
/// consecutive events may carry identical state.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct ViewportChangeEvent {
    pub state: ViewportState,
}

impl ViewportChangeEvent {
    pub const fn new(state: ViewportState) -> Self {
        Self { state }
    }

    pub fn zoom(&self) -> f64 {
        self.state.zoom
    }
}

impl From<ViewportState> for ViewportChangeEvent {
    fn from(state: ViewportState) -> Self {
        Self { state }
    }
}
