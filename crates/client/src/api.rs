use incidents::mock::{mock_fire_departments, mock_incidents};
use incidents::{FireDepartmentRecord, IncidentRecord, IncidentStatus, RecordId};
use reqwest::StatusCode;
use serde::de::DeserializeOwned;
use serde_json::json;
use tracing::{debug, info, warn};

use crate::config::ApiConfig;
use crate::departments::DepartmentUpsert;
use crate::error::{ApiError, ReportError, classify_report_failure, error_message};
use crate::report::{IncidentReport, ReportReceipt, SimulatedIncident};

const REPORT_PATH: &str = "api/incidents/report";
const INCIDENTS_PATH: &str = "api/incidents";
const FIRE_DEPARTMENTS_PATH: &str = "api/fire-departments";

pub struct IncidentApi {
    config: ApiConfig,
    http: reqwest::Client,
}

impl IncidentApi {
    pub fn new(config: ApiConfig) -> Result<Self, ApiError> {
        let http = reqwest::Client::builder().timeout(config.timeout).build()?;
        Ok(Self { config, http })
    }

    pub fn config(&self) -> &ApiConfig {
        &self.config
    }

    pub async fn list_incidents(&self) -> Result<Vec<IncidentRecord>, ApiError> {
        self.get_json(INCIDENTS_PATH).await
    }

    pub async fn list_fire_departments(&self) -> Result<Vec<FireDepartmentRecord>, ApiError> {
        self.get_json(FIRE_DEPARTMENTS_PATH).await
    }

    /// Incidents from the backend, or the built-in sample set if that fails.
    pub async fn incidents_or_fallback(&self) -> Vec<IncidentRecord> {
        match self.list_incidents().await {
            Ok(records) => records,
            Err(error) => {
                warn!(%error, "incident list unavailable, using sample data");
                mock_incidents()
            }
        }
    }

    pub async fn fire_departments_or_fallback(&self) -> Vec<FireDepartmentRecord> {
        match self.list_fire_departments().await {
            Ok(records) => records,
            Err(error) => {
                warn!(%error, "fire department list unavailable, using sample data");
                mock_fire_departments()
            }
        }
    }

    pub async fn report_incident(
        &self,
        report: IncidentReport,
    ) -> Result<ReportReceipt, ReportError> {
        let kind = report.kind;
        let files = report.files.len();
        let form = report.into_form().await?;
        let resp = self
            .http
            .post(self.config.url(REPORT_PATH))
            .multipart(form)
            .send()
            .await?;
        let receipt = read_receipt(resp).await?;
        info!(
            incident_id = receipt.incident_id,
            kind = kind.as_str(),
            files,
            "incident reported"
        );
        Ok(receipt)
    }

    pub async fn simulate_incident(
        &self,
        incident: &SimulatedIncident,
    ) -> Result<ReportReceipt, ReportError> {
        let resp = self
            .http
            .post(self.config.url(REPORT_PATH))
            .json(incident)
            .send()
            .await?;
        let receipt = read_receipt(resp).await?;
        info!(
            incident_id = receipt.incident_id,
            kind = incident.kind.as_str(),
            severity = incident.severity_score,
            "simulated incident accepted"
        );
        Ok(receipt)
    }

    /// Sets an incident's status and returns the updated record.
    pub async fn update_status(
        &self,
        id: RecordId,
        status: IncidentStatus,
    ) -> Result<IncidentRecord, ApiError> {
        let url = self.config.url(&format!("{INCIDENTS_PATH}/{id}/status"));
        let resp = self
            .http
            .put(url)
            .json(&json!({ "status": status.as_str() }))
            .send()
            .await?;
        if resp.status() == StatusCode::NOT_FOUND {
            return Err(ApiError::NotFound {
                resource: "incident",
                id,
            });
        }
        let record: IncidentRecord = read_json(resp).await?;
        info!(id, status = status.as_str(), "incident status updated");
        Ok(record)
    }

    /// Creates a fire department, or updates it in full when `body.id` is set.
    pub async fn upsert_fire_department(
        &self,
        body: &DepartmentUpsert,
    ) -> Result<FireDepartmentRecord, ApiError> {
        body.validate()?;
        let resp = self
            .http
            .post(self.config.url(FIRE_DEPARTMENTS_PATH))
            .json(body)
            .send()
            .await?;
        if let (StatusCode::NOT_FOUND, Some(id)) = (resp.status(), body.id) {
            return Err(ApiError::NotFound {
                resource: "fire department",
                id,
            });
        }
        let created = resp.status() == StatusCode::CREATED;
        let record: FireDepartmentRecord = read_json(resp).await?;
        info!(
            id = record.id,
            name = %record.name,
            created,
            "fire department saved"
        );
        Ok(record)
    }

    async fn get_json<T: DeserializeOwned>(&self, path: &str) -> Result<T, ApiError> {
        let url = self.config.url(path);
        debug!(%url, "GET");
        let resp = self.http.get(&url).send().await?;
        read_json(resp).await
    }
}

async fn read_json<T: DeserializeOwned>(resp: reqwest::Response) -> Result<T, ApiError> {
    let status = resp.status();
    let body = resp.text().await?;
    if !status.is_success() {
        return Err(ApiError::Status {
            status: status.as_u16(),
            message: error_message(&body),
        });
    }
    Ok(serde_json::from_str(&body)?)
}

async fn read_receipt(resp: reqwest::Response) -> Result<ReportReceipt, ReportError> {
    let status = resp.status();
    let body = resp.text().await?;
    if !status.is_success() {
        let error = classify_report_failure(status.as_u16(), &body);
        warn!(status = status.as_u16(), %error, "incident report refused");
        return Err(error);
    }
    Ok(serde_json::from_str(&body)?)
}

#[cfg(test)]
mod tests {
    use super::IncidentApi;
    use crate::config::ApiConfig;
    use incidents::mock::{mock_fire_departments, mock_incidents};
    use pretty_assertions::assert_eq;
    use std::time::Duration;

    fn unreachable_api() -> IncidentApi {
        // Nothing listens on the discard port.
        let config = ApiConfig {
            timeout: Duration::from_millis(500),
            ..ApiConfig::new("http://127.0.0.1:9")
        };
        IncidentApi::new(config).unwrap()
    }

    #[tokio::test]
    async fn unreachable_backend_falls_back_to_sample_data() {
        let api = unreachable_api();
        assert!(api.list_incidents().await.is_err());
        assert_eq!(api.incidents_or_fallback().await, mock_incidents());
        assert_eq!(
            api.fire_departments_or_fallback().await,
            mock_fire_departments()
        );
    }
}
