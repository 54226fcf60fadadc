//! HTTP client for the incident reporting backend.

pub mod api;
pub mod config;
pub mod departments;
pub mod error;
pub mod report;

pub use api::IncidentApi;
pub use config::ApiConfig;
pub use departments::DepartmentUpsert;
pub use error::{ApiError, ReportError};
pub use report::{IncidentReport, ReportReceipt, SimulatedIncident};
