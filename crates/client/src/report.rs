use std::path::{Path, PathBuf};

use foundation::geo::LatLng;
use incidents::{IncidentType, RecordId};
use reqwest::multipart::{Form, Part};
use serde::{Deserialize, Serialize};

use crate::error::ReportError;

pub const SEVERITY_RANGE: std::ops::RangeInclusive<u8> = 1..=5;

/// Body of a successful report.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReportReceipt {
    pub incident_id: RecordId,
    #[serde(default)]
    pub saved_files: Vec<String>,
    #[serde(default)]
    pub severity_score: Option<u8>,
}

/// A citizen report, sent as a multipart form.
#[derive(Debug, Clone, PartialEq)]
pub struct IncidentReport {
    pub kind: IncidentType,
    pub position: LatLng,
    pub description: Option<String>,
    /// The backend assumes 1 when absent.
    pub severity: Option<u8>,
    pub files: Vec<PathBuf>,
}

impl IncidentReport {
    pub fn new(kind: IncidentType, position: LatLng) -> Self {
        Self {
            kind,
            position,
            description: None,
            severity: None,
            files: Vec::new(),
        }
    }

    pub fn validate(&self) -> Result<(), ReportError> {
        check_position(self.position)?;
        if let Some(s) = self.severity {
            check_severity(s)?;
        }
        Ok(())
    }

    /// Builds the form, reading every attachment from disk.
    pub async fn into_form(self) -> Result<Form, ReportError> {
        self.validate()?;
        let mut form = Form::new()
            .text("type", self.kind.as_str())
            .text("latitude", self.position.lat.to_string())
            .text("longitude", self.position.lng.to_string());
        if let Some(desc) = self.description.filter(|d| !d.trim().is_empty()) {
            form = form.text("description", desc);
        }
        if let Some(s) = self.severity {
            form = form.text("severity_score", s.to_string());
        }
        for path in &self.files {
            form = form.part("files", load_attachment(path).await?);
        }
        Ok(form)
    }
}

/// A synthetic incident posted as JSON, used to exercise the pipeline
/// without a photo.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SimulatedIncident {
    #[serde(rename = "type")]
    pub kind: IncidentType,
    pub latitude: f64,
    pub longitude: f64,
    pub severity_score: u8,
}

impl SimulatedIncident {
    pub fn new(kind: IncidentType, position: LatLng, severity: u8) -> Result<Self, ReportError> {
        check_position(position)?;
        check_severity(severity)?;
        Ok(Self {
            kind,
            latitude: position.lat,
            longitude: position.lng,
            severity_score: severity,
        })
    }
}

fn check_severity(severity: u8) -> Result<(), ReportError> {
    if SEVERITY_RANGE.contains(&severity) {
        Ok(())
    } else {
        Err(ReportError::InvalidSeverity(severity))
    }
}

fn check_position(position: LatLng) -> Result<(), ReportError> {
    LatLng::checked(position.lat, position.lng)
        .map(|_| ())
        .map_err(ReportError::InvalidPosition)
}

pub(crate) async fn load_attachment(path: &Path) -> Result<Part, ReportError> {
    let bytes = tokio::fs::read(path)
        .await
        .map_err(|source| ReportError::Attachment {
            path: path.to_path_buf(),
            source,
        })?;
    let name = path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| "attachment".to_string());
    Ok(Part::bytes(bytes).file_name(name))
}
