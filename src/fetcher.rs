use crate::errors::FetchError;
use serde::de::DeserializeOwned;
use tracing::{debug, warn};

/// Logical resources exposed by the monitoring backend.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Resource {
    CurrentStats,
    AdvancedStats,
    PeopleFlow,
    PeakPrediction,
    AreasOccupation,
    PoolCurrent,
    PoolQuality,
    ActiveAlerts,
    Sensors,
}

impl Resource {
    pub fn path(self) -> &'static str {
        match self {
            Resource::CurrentStats => "current-stats",
            Resource::AdvancedStats => "advanced-stats",
            Resource::PeopleFlow => "people-flow",
            Resource::PeakPrediction => "peak-prediction",
            Resource::AreasOccupation => "areas-occupation",
            Resource::PoolCurrent => "pool/current",
            Resource::PoolQuality => "pool/quality",
            Resource::ActiveAlerts => "alerts/active",
            Resource::Sensors => "sensors",
        }
    }
}

/// GET-only client for the backend. One request per call: no retry, no
/// backoff, no cache, and the transport's default timeout.
#[derive(Debug, Clone)]
pub struct ApiClient {
    http: reqwest::Client,
    base_url: String,
}

impl ApiClient {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self::with_client(reqwest::Client::new(), base_url)
    }

    pub fn with_client(http: reqwest::Client, base_url: impl Into<String>) -> Self {
        let base_url = base_url.into().trim_end_matches('/').to_string();
        Self { http, base_url }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn url(&self, resource: Resource) -> String {
        format!("{}/{}", self.base_url, resource.path())
    }

    /// Fetches and decodes a snapshot, or `None` on any failure. The reason
    /// is logged and never reaches the caller.
    pub async fn fetch<T: DeserializeOwned>(&self, resource: Resource) -> Option<T> {
        match self.try_fetch(resource).await {
            Ok(snapshot) => Some(snapshot),
            Err(err) => {
                warn!(resource = resource.path(), "fetch failed: {err}");
                None
            }
        }
    }

    pub async fn try_fetch<T: DeserializeOwned>(&self, resource: Resource) -> Result<T, FetchError> {
        let url = self.url(resource);
        debug!(%url, "fetching snapshot");
        let response = self.http.get(&url).send().await?;
        let status = response.status();
        if !status.is_success() {
            return Err(FetchError::Status(status));
        }
        let body = response.bytes().await?;
        Ok(serde_json::from_slice(&body)?)
    }
}
