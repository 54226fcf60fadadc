use serde::{Deserialize, Serialize};

/// Mean Earth radius used for great-circle distances (km).
pub const EARTH_RADIUS_KM: f64 = 6371.0;

/// Geographic position in degrees.
#[derive(Debug, Copy, Clone, PartialEq, Serialize, Deserialize)]
pub struct LatLng {
    pub lat: f64,
    pub lng: f64,
}

#[derive(Debug, Copy, Clone, PartialEq)]
pub enum CoordError {
    NotFinite { lat: f64, lng: f64 },
    LatitudeOutOfRange(f64),
    LongitudeOutOfRange(f64),
}

impl std::fmt::Display for CoordError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            CoordError::NotFinite { lat, lng } => {
                write!(f, "coordinate is not finite: lat={lat} lng={lng}")
            }
            CoordError::LatitudeOutOfRange(lat) => {
                write!(f, "latitude out of range [-90, 90]: {lat}")
            }
            CoordError::LongitudeOutOfRange(lng) => {
                write!(f, "longitude out of range [-180, 180]: {lng}")
            }
        }
    }
}

impl std::error::Error for CoordError {}

impl LatLng {
    /// Unchecked constructor; use [`LatLng::checked`] for data coming off the wire.
    pub const fn new(lat: f64, lng: f64) -> Self {
        Self { lat, lng }
    }

    pub fn checked(lat: f64, lng: f64) -> Result<Self, CoordError> {
        if !lat.is_finite() || !lng.is_finite() {
            return Err(CoordError::NotFinite { lat, lng });
        }
        if !(-90.0..=90.0).contains(&lat) {
            return Err(CoordError::LatitudeOutOfRange(lat));
        }
        if !(-180.0..=180.0).contains(&lng) {
            return Err(CoordError::LongitudeOutOfRange(lng));
        }
        Ok(Self { lat, lng })
    }

    pub fn is_valid(&self) -> bool {
        Self::checked(self.lat, self.lng).is_ok()
    }
}

/// Great-circle distance on a spherical Earth.
pub fn haversine_km(a: LatLng, b: LatLng) -> f64 {
    let lat1 = a.lat.to_radians();
    let lat2 = b.lat.to_radians();
    let dlat = lat2 - lat1;
    let dlng = (b.lng - a.lng).to_radians();

    let h = (dlat / 2.0).sin().powi(2) + lat1.cos() * lat2.cos() * (dlng / 2.0).sin().powi(2);
    let c = 2.0 * h.sqrt().atan2((1.0 - h).sqrt());
    EARTH_RADIUS_KM * c
}

#[cfg(test)]
mod tests {
    use super::{CoordError, LatLng, haversine_km};

    fn assert_close(a: f64, b: f64, eps: f64) {
        let diff = (a - b).abs();
        assert!(diff <= eps, "expected {a} ~= {b} (diff {diff})");
    }

    #[test]
    fn checked_accepts_bounds() {
        assert!(LatLng::checked(90.0, 180.0).is_ok());
        assert!(LatLng::checked(-90.0, -180.0).is_ok());
    }

    #[test]
    fn checked_rejects_nan_and_infinity() {
        assert!(matches!(
            LatLng::checked(f64::NAN, 0.0),
            Err(CoordError::NotFinite { .. })
        ));
        assert!(matches!(
            LatLng::checked(0.0, f64::INFINITY),
            Err(CoordError::NotFinite { .. })
        ));
    }

    #[test]
    fn checked_rejects_out_of_range() {
        assert_eq!(
            LatLng::checked(91.0, 0.0),
            Err(CoordError::LatitudeOutOfRange(91.0))
        );
        assert_eq!(
            LatLng::checked(0.0, -180.5),
            Err(CoordError::LongitudeOutOfRange(-180.5))
        );
    }

    #[test]
    fn haversine_zero_for_same_point() {
        let p = LatLng::new(37.98, 23.72);
        assert_close(haversine_km(p, p), 0.0, 1e-9);
    }

    #[test]
    fn haversine_athens_to_thessaloniki() {
        let athens = LatLng::new(37.9838, 23.7275);
        let thessaloniki = LatLng::new(40.6401, 22.9444);
        // ~300 km as the crow flies.
        assert_close(haversine_km(athens, thessaloniki), 302.0, 5.0);
    }
}
