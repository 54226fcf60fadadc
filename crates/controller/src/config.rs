use std::env;
use std::str::FromStr;
use std::time::Duration;

use foundation::geo::LatLng;
use layers::heat::DEFAULT_HEAT_RADIUS_PX;
use layers::mode::DISCRETE_ZOOM_THRESHOLD;
use map::viewport::ViewportState;
use runtime::debounce::DEFAULT_QUIET_INTERVAL;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq)]
pub enum ConfigError {
    Parse(String),
    Invalid { field: &'static str, reason: String },
}

impl std::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ConfigError::Parse(msg) => write!(f, "config parse error: {msg}"),
            ConfigError::Invalid { field, reason } => write!(f, "invalid {field}: {reason}"),
        }
    }
}

impl std::error::Error for ConfigError {}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ControllerConfig {
    /// Quiet interval before a viewport burst is considered settled.
    pub debounce_ms: u64,
    pub zoom_threshold: f64,
    pub min_zoom: f64,
    pub max_zoom: f64,
    pub initial_center: LatLng,
    pub initial_zoom: f64,
    pub heat_radius_px: u32,
}

impl Default for ControllerConfig {
    fn default() -> Self {
        Self {
            debounce_ms: DEFAULT_QUIET_INTERVAL.as_millis() as u64,
            zoom_threshold: DISCRETE_ZOOM_THRESHOLD,
            min_zoom: 2.0,
            max_zoom: 19.0,
            // Athens.
            initial_center: LatLng::new(37.9838, 23.7275),
            initial_zoom: 7.0,
            heat_radius_px: DEFAULT_HEAT_RADIUS_PX,
        }
    }
}

impl ControllerConfig {
    pub fn from_json_str(text: &str) -> Result<Self, ConfigError> {
        let cfg: Self = serde_json::from_str(text).map_err(|e| ConfigError::Parse(e.to_string()))?;
        cfg.validate()?;
        Ok(cfg)
    }

    /// Defaults overridden by `MAP_*` environment variables.
    ///
    /// Unparseable values fall back to the default for that field.
    pub fn from_env() -> Result<Self, ConfigError> {
        let d = Self::default();
        let cfg = Self {
            debounce_ms: env_var_or("MAP_DEBOUNCE_MS", d.debounce_ms),
            zoom_threshold: env_var_or("MAP_ZOOM_THRESHOLD", d.zoom_threshold),
            min_zoom: env_var_or("MAP_MIN_ZOOM", d.min_zoom),
            max_zoom: env_var_or("MAP_MAX_ZOOM", d.max_zoom),
            initial_center: LatLng::new(
                env_var_or("MAP_INITIAL_LAT", d.initial_center.lat),
                env_var_or("MAP_INITIAL_LNG", d.initial_center.lng),
            ),
            initial_zoom: env_var_or("MAP_INITIAL_ZOOM", d.initial_zoom),
            heat_radius_px: env_var_or("MAP_HEAT_RADIUS_PX", d.heat_radius_px),
        };
        cfg.validate()?;
        Ok(cfg)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.debounce_ms == 0 {
            return Err(invalid("debounce_ms", "must be greater than zero"));
        }
        for (field, value) in [
            ("zoom_threshold", self.zoom_threshold),
            ("min_zoom", self.min_zoom),
            ("max_zoom", self.max_zoom),
            ("initial_zoom", self.initial_zoom),
        ] {
            if !value.is_finite() {
                return Err(invalid(field, format!("not a finite number: {value}")));
            }
        }
        if self.min_zoom > self.max_zoom {
            return Err(invalid(
                "min_zoom",
                format!("{} is above max_zoom {}", self.min_zoom, self.max_zoom),
            ));
        }
        if !(self.min_zoom..=self.max_zoom).contains(&self.zoom_threshold) {
            return Err(invalid(
                "zoom_threshold",
                format!(
                    "{} is outside the zoom range {}..={}",
                    self.zoom_threshold, self.min_zoom, self.max_zoom
                ),
            ));
        }
        if let Err(e) = LatLng::checked(self.initial_center.lat, self.initial_center.lng) {
            return Err(invalid("initial_center", e.to_string()));
        }
        Ok(())
    }

    pub fn debounce_interval(&self) -> Duration {
        Duration::from_millis(self.debounce_ms)
    }

    pub fn initial_viewport(&self) -> ViewportState {
        ViewportState::new(self.clamp_zoom(self.initial_zoom), self.initial_center)
    }

    pub fn clamp_zoom(&self, zoom: f64) -> f64 {
        zoom.max(self.min_zoom).min(self.max_zoom)
    }
}

fn invalid(field: &'static str, reason: impl Into<String>) -> ConfigError {
    ConfigError::Invalid {
        field,
        reason: reason.into(),
    }
}

fn env_var_or<T: FromStr>(key: &str, default: T) -> T {
    env::var(key)
        .ok()
        .and_then(|v| v.parse().ok())
        .unwrap_or(default)
}

#[cfg(test)]
mod tests {
    use super::{ConfigError, ControllerConfig};
    use pretty_assertions::assert_eq;
    use std::time::Duration;

    #[test]
    fn defaults_are_valid() {
        let cfg = ControllerConfig::default();
        assert!(cfg.validate().is_ok());
        assert_eq!(cfg.debounce_interval(), Duration::from_millis(100));
        assert_eq!(cfg.zoom_threshold, 11.0);
    }

    #[test]
    fn partial_json_keeps_defaults() {
        let cfg = ControllerConfig::from_json_str(r#"{"debounce_ms": 250, "initial_zoom": 12}"#)
            .unwrap();
        assert_eq!(cfg.debounce_ms, 250);
        assert_eq!(cfg.initial_zoom, 12.0);
        assert_eq!(cfg.zoom_threshold, ControllerConfig::default().zoom_threshold);
    }

    #[test]
    fn rejects_inverted_zoom_range() {
        let err = ControllerConfig::from_json_str(r#"{"min_zoom": 15, "max_zoom": 3}"#)
            .unwrap_err();
        assert!(matches!(err, ConfigError::Invalid { field: "min_zoom", .. }));
    }

    #[test]
    fn rejects_threshold_outside_zoom_range() {
        let err = ControllerConfig::from_json_str(r#"{"max_zoom": 10}"#).unwrap_err();
        assert!(matches!(err, ConfigError::Invalid { field: "zoom_threshold", .. }));

        let err = ControllerConfig::from_json_str(r#"{"zoom_threshold": 1.5}"#).unwrap_err();
        assert!(matches!(err, ConfigError::Invalid { field: "zoom_threshold", .. }));

        assert!(ControllerConfig::from_json_str(r#"{"max_zoom": 11}"#).is_ok());
    }

    #[test]
    fn rejects_zero_debounce() {
        let err = ControllerConfig::from_json_str(r#"{"debounce_ms": 0}"#).unwrap_err();
        assert!(matches!(err, ConfigError::Invalid { field: "debounce_ms", .. }));
    }

    #[test]
    fn rejects_bad_initial_center() {
        let err = ControllerConfig::from_json_str(
            r#"{"initial_center": {"lat": 120.0, "lng": 0.0}}"#,
        )
        .unwrap_err();
        assert!(matches!(err, ConfigError::Invalid { field: "initial_center", .. }));
    }

    #[test]
    fn malformed_json_is_parse_error() {
        assert!(matches!(
            ControllerConfig::from_json_str("{"),
            Err(ConfigError::Parse(_))
        ));
    }

    #[test]
    fn initial_viewport_is_clamped() {
        let cfg = ControllerConfig {
            initial_zoom: 30.0,
            ..ControllerConfig::default()
        };
        assert_eq!(cfg.initial_viewport().zoom, cfg.max_zoom);
    }
}
