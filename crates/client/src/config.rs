use std::env;
use std::time::Duration;

pub const DEFAULT_BASE_URL: &str = "http://localhost:5000";
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);

#[derive(Debug, Clone, PartialEq)]
pub struct ApiConfig {
    pub base_url: String,
    pub timeout: Duration,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            timeout: DEFAULT_TIMEOUT,
        }
    }
}

impl ApiConfig {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            ..Self::default()
        }
    }

    /// `INCIDENT_API_URL` and `INCIDENT_API_TIMEOUT_SECS`, falling back to
    /// defaults when unset or unparseable.
    pub fn from_env() -> Self {
        let base_url = env::var("INCIDENT_API_URL")
            .ok()
            .map(|v| v.trim().to_string())
            .filter(|v| !v.is_empty())
            .unwrap_or_else(|| DEFAULT_BASE_URL.to_string());
        let timeout = env::var("INCIDENT_API_TIMEOUT_SECS")
            .ok()
            .and_then(|v| v.parse::<u64>().ok())
            .filter(|secs| *secs > 0)
            .map(Duration::from_secs)
            .unwrap_or(DEFAULT_TIMEOUT);
        Self { base_url, timeout }
    }

    pub fn url(&self, path: &str) -> String {
        format!(
            "{}/{}",
            self.base_url.trim_end_matches('/'),
            path.trim_start_matches('/')
        )
    }
}

#[cfg(test)]
mod tests {
    use super::ApiConfig;
    use pretty_assertions::assert_eq;

    #[test]
    fn url_joins_without_double_slash() {
        let cfg = ApiConfig::new("http://api.local:5000/");
        assert_eq!(cfg.url("/api/incidents"), "http://api.local:5000/api/incidents");
        assert_eq!(cfg.url("api/fire-departments"), "http://api.local:5000/api/fire-departments");
    }

    #[test]
    fn default_points_at_local_backend() {
        assert_eq!(ApiConfig::default().url("api/incidents"), "http://localhost:5000/api/incidents");
    }
}
