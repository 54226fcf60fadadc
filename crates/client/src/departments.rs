use foundation::geo::LatLng;
use incidents::RecordId;
use serde::Serialize;

use crate::error::ApiError;

/// Body of a fire-department create or update.
///
/// Without an `id` the backend creates a new station; with one it rewrites
/// that station in full.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DepartmentUpsert {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<RecordId>,
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub city: Option<String>,
    pub latitude: f64,
    pub longitude: f64,
    pub available_trucks: u32,
    pub available_staff: u32,
}

impl DepartmentUpsert {
    pub fn create(name: impl Into<String>, position: LatLng) -> Self {
        Self {
            id: None,
            name: name.into(),
            city: None,
            latitude: position.lat,
            longitude: position.lng,
            available_trucks: 0,
            available_staff: 0,
        }
    }

    pub fn update(id: RecordId, name: impl Into<String>, position: LatLng) -> Self {
        Self {
            id: Some(id),
            ..Self::create(name, position)
        }
    }

    pub fn validate(&self) -> Result<(), ApiError> {
        if self.name.trim().is_empty() {
            return Err(ApiError::Invalid {
                field: "name",
                reason: "must not be empty".to_string(),
            });
        }
        LatLng::checked(self.latitude, self.longitude)
            .map(|_| ())
            .map_err(|e| ApiError::Invalid {
                field: "position",
                reason: e.to_string(),
            })
    }
}

#[cfg(test)]
mod tests {
    use super::DepartmentUpsert;
    use crate::error::ApiError;
    use foundation::geo::LatLng;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    #[test]
    fn create_body_omits_id() {
        let body = DepartmentUpsert {
            city: Some("Athens".to_string()),
            available_trucks: 6,
            available_staff: 25,
            ..DepartmentUpsert::create("Athens Central", LatLng::new(37.98, 23.72))
        };
        assert_eq!(
            serde_json::to_value(&body).unwrap(),
            json!({
                "name": "Athens Central",
                "city": "Athens",
                "latitude": 37.98,
                "longitude": 23.72,
                "available_trucks": 6,
                "available_staff": 25
            })
        );
    }

    #[test]
    fn update_body_carries_id() {
        let body = DepartmentUpsert::update(4, "Patras", LatLng::new(38.24, 21.73));
        let value = serde_json::to_value(&body).unwrap();
        assert_eq!(value["id"], json!(4));
        assert!(value.get("city").is_none());
    }

    #[test]
    fn blank_name_and_bad_position_are_rejected() {
        let blank = DepartmentUpsert::create("  ", LatLng::new(38.0, 23.0));
        assert!(matches!(blank.validate(), Err(ApiError::Invalid { field: "name", .. })));

        let off_map = DepartmentUpsert::create("Somewhere", LatLng::new(0.0, 200.0));
        assert!(matches!(
            off_map.validate(),
            Err(ApiError::Invalid { field: "position", .. })
        ));
    }
}
