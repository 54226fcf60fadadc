/// Zoom at and above which incidents are drawn as individual markers.
pub const DISCRETE_ZOOM_THRESHOLD: f64 = 11.0;

#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Default)]
pub enum DisplayMode {
    /// Heat layer; used at low zoom to avoid marker clutter.
    #[default]
    Aggregated,
    /// One marker per incident.
    Discrete,
}

impl DisplayMode {
    pub fn for_zoom(zoom: f64, threshold: f64) -> Self {
        if zoom >= threshold {
            DisplayMode::Discrete
        } else {
            DisplayMode::Aggregated
        }
    }

    pub const fn as_str(self) -> &'static str {
        match self {
            DisplayMode::Aggregated => "aggregated",
            DisplayMode::Discrete => "discrete",
        }
    }
}

#[derive(Debug, Copy, Clone, PartialEq)]
pub struct Transition {
    pub from: DisplayMode,
    pub to: DisplayMode,
    /// Settled zoom that triggered the transition.
    pub zoom: f64,
}

/// Two-state machine deciding the active representation.
///
/// Re-evaluating inside the same zoom band is a no-op; only a band crossing
/// yields a [`Transition`].
#[derive(Debug, Clone, PartialEq)]
pub struct ModeMachine {
    threshold: f64,
    mode: DisplayMode,
}

impl Default for ModeMachine {
    fn default() -> Self {
        Self::new(DISCRETE_ZOOM_THRESHOLD)
    }
}

impl ModeMachine {
    pub fn new(threshold: f64) -> Self {
        Self {
            threshold,
            mode: DisplayMode::Aggregated,
        }
    }

    pub fn mode(&self) -> DisplayMode {
        self.mode
    }

    pub fn threshold(&self) -> f64 {
        self.threshold
    }

    /// Advances the machine for a settled zoom.
    ///
    /// Non-finite zoom values are ignored.
    pub fn evaluate(&mut self, zoom: f64) -> Option<Transition> {
        if !zoom.is_finite() {
            return None;
        }
        let target = DisplayMode::for_zoom(zoom, self.threshold);
        if target == self.mode {
            return None;
        }
        let from = std::mem::replace(&mut self.mode, target);
        Some(Transition {
            from,
            to: target,
            zoom,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::{DisplayMode, ModeMachine};

    #[test]
    fn starts_aggregated() {
        assert_eq!(ModeMachine::default().mode(), DisplayMode::Aggregated);
    }

    #[test]
    fn threshold_is_inclusive() {
        let mut m = ModeMachine::default();
        let t = m.evaluate(11.0).unwrap();
        assert_eq!((t.from, t.to), (DisplayMode::Aggregated, DisplayMode::Discrete));
        assert_eq!(m.mode(), DisplayMode::Discrete);
    }

    #[test]
    fn same_band_is_idempotent() {
        let mut m = ModeMachine::default();
        assert!(m.evaluate(12.0).is_some());
        assert!(m.evaluate(12.0).is_none());
        assert!(m.evaluate(15.5).is_none());
        assert!(m.evaluate(10.99).is_some());
        assert!(m.evaluate(3.0).is_none());
    }

    #[test]
    fn ignores_non_finite_zoom() {
        let mut m = ModeMachine::default();
        assert!(m.evaluate(f64::NAN).is_none());
        assert!(m.evaluate(f64::INFINITY).is_none());
        assert_eq!(m.mode(), DisplayMode::Aggregated);
    }
}
