use foundation::geo::{CoordError, LatLng};
use serde::{Deserialize, Deserializer, Serialize};

pub type RecordId = u64;

/// Incident kinds accepted by the report form.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum IncidentType {
    ForestFire,
    Flood,
    Blackout,
    /// Kinds the backend knows about but the dashboard does not style.
    #[serde(other)]
    Other,
}

impl IncidentType {
    pub const REPORTABLE: [IncidentType; 3] = [
        IncidentType::ForestFire,
        IncidentType::Flood,
        IncidentType::Blackout,
    ];

    pub const fn as_str(self) -> &'static str {
        match self {
            IncidentType::ForestFire => "forest_fire",
            IncidentType::Flood => "flood",
            IncidentType::Blackout => "blackout",
            IncidentType::Other => "other",
        }
    }

    pub const fn label(self) -> &'static str {
        match self {
            IncidentType::ForestFire => "Forest fire",
            IncidentType::Flood => "Flood",
            IncidentType::Blackout => "Blackout",
            IncidentType::Other => "Incident",
        }
    }
}

impl std::str::FromStr for IncidentType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        IncidentType::REPORTABLE
            .into_iter()
            .find(|t| t.as_str() == s)
            .ok_or_else(|| format!("unknown incident type: {s} (expected forest_fire|flood|blackout)"))
    }
}

#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum IncidentStatus {
    #[default]
    Open,
    #[serde(alias = "in_progress")]
    InProcess,
    Resolved,
}

impl IncidentStatus {
    pub const fn as_str(self) -> &'static str {
        match self {
            IncidentStatus::Open => "open",
            IncidentStatus::InProcess => "in_process",
            IncidentStatus::Resolved => "resolved",
        }
    }
}

impl std::str::FromStr for IncidentStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "open" => Ok(IncidentStatus::Open),
            "in_process" | "in_progress" => Ok(IncidentStatus::InProcess),
            "resolved" => Ok(IncidentStatus::Resolved),
            other => Err(format!(
                "unknown status: {other} (expected open|in_process|resolved)"
            )),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Attachment {
    pub id: RecordId,
    pub file_name: String,
    #[serde(default)]
    pub mime_type: Option<String>,
    #[serde(default)]
    pub file_size_bytes: Option<u64>,
    #[serde(default)]
    pub created_at: Option<String>,
    #[serde(default)]
    pub url: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IncidentRecord {
    pub id: RecordId,
    #[serde(rename = "type")]
    pub kind: IncidentType,
    #[serde(deserialize_with = "nullable_coord")]
    pub latitude: f64,
    #[serde(deserialize_with = "nullable_coord")]
    pub longitude: f64,
    #[serde(default)]
    pub severity_score: Option<f64>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub status: Option<IncidentStatus>,
    #[serde(default)]
    pub priority_score: Option<f64>,
    #[serde(default)]
    pub dispatched_responders: Option<u32>,
    #[serde(default)]
    pub created_at: Option<String>,
    #[serde(default)]
    pub attachments: Vec<Attachment>,
}

impl IncidentRecord {
    pub fn new(id: RecordId, kind: IncidentType, latitude: f64, longitude: f64) -> Self {
        Self {
            id,
            kind,
            latitude,
            longitude,
            severity_score: None,
            description: None,
            status: None,
            priority_score: None,
            dispatched_responders: None,
            created_at: None,
            attachments: Vec::new(),
        }
    }

    pub fn with_severity(mut self, severity: f64) -> Self {
        self.severity_score = Some(severity);
        self
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    pub fn position(&self) -> Result<LatLng, CoordError> {
        LatLng::checked(self.latitude, self.longitude)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FireDepartmentRecord {
    pub id: RecordId,
    pub name: String,
    #[serde(default)]
    pub city: Option<String>,
    #[serde(deserialize_with = "nullable_coord")]
    pub latitude: f64,
    #[serde(deserialize_with = "nullable_coord")]
    pub longitude: f64,
    #[serde(alias = "available_staff", default)]
    pub available_responders: u32,
    #[serde(default)]
    pub available_trucks: Option<u32>,
}

impl FireDepartmentRecord {
    pub fn new(id: RecordId, name: impl Into<String>, latitude: f64, longitude: f64) -> Self {
        Self {
            id,
            name: name.into(),
            city: None,
            latitude,
            longitude,
            available_responders: 0,
            available_trucks: None,
        }
    }

    pub fn with_responders(mut self, responders: u32) -> Self {
        self.available_responders = responders;
        self
    }

    pub fn position(&self) -> Result<LatLng, CoordError> {
        LatLng::checked(self.latitude, self.longitude)
    }
}

#[derive(Debug, Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum RecordKind {
    Incident,
    FireDepartment,
}

/// Either kind of record that can be placed on the map.
#[derive(Debug, Clone, PartialEq)]
pub enum SpatialRecord {
    Incident(IncidentRecord),
    FireDepartment(FireDepartmentRecord),
}

impl SpatialRecord {
    pub fn id(&self) -> RecordId {
        match self {
            SpatialRecord::Incident(r) => r.id,
            SpatialRecord::FireDepartment(r) => r.id,
        }
    }

    pub fn kind(&self) -> RecordKind {
        match self {
            SpatialRecord::Incident(_) => RecordKind::Incident,
            SpatialRecord::FireDepartment(_) => RecordKind::FireDepartment,
        }
    }

    /// Records are the same entity iff kind and id match; field values are ignored.
    pub fn same_entity(&self, other: &SpatialRecord) -> bool {
        self.kind() == other.kind() && self.id() == other.id()
    }

    pub fn position(&self) -> Result<LatLng, CoordError> {
        match self {
            SpatialRecord::Incident(r) => r.position(),
            SpatialRecord::FireDepartment(r) => r.position(),
        }
    }
}

impl From<IncidentRecord> for SpatialRecord {
    fn from(r: IncidentRecord) -> Self {
        SpatialRecord::Incident(r)
    }
}

impl From<FireDepartmentRecord> for SpatialRecord {
    fn from(r: FireDepartmentRecord) -> Self {
        SpatialRecord::FireDepartment(r)
    }
}

// The backend stores coordinates as nullable columns.
fn nullable_coord<'de, D>(deserializer: D) -> Result<f64, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<f64>::deserialize(deserializer)?.unwrap_or(f64::NAN))
}
