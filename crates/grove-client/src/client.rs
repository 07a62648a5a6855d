//! HTTP client for the tree-tracker admin API.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use serde::de::DeserializeOwned;
use serde_json::json;
use tracing::{debug, instrument};

use grove_core::{
    CaptureCount, CaptureCountSource, CaptureFilter, Error, Grower, GrowerFilter, GrowerSource,
    RegistrationEvent, RegistrationSource, Result,
};

use crate::config::ClientConfig;
use crate::error::{to_grove_error, ApiErrorCode};

/// Admin API client implementing every grove remote source.
pub struct TreeTrackerClient {
    client: Client,
    config: ClientConfig,
}

impl TreeTrackerClient {
    /// Create a new client with the given configuration.
    pub fn new(config: ClientConfig) -> Result<Self> {
        config.validate()?;

        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| Error::Config(format!("Failed to create HTTP client: {}", e)))?;

        Ok(Self { client, config })
    }

    /// Create from environment variables.
    pub fn from_env() -> Result<Self> {
        Self::new(ClientConfig::from_env()?)
    }

    /// Get the configuration.
    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    /// Build a GET request with authentication.
    fn build_get_request(&self, endpoint: &str) -> reqwest::RequestBuilder {
        let url = format!("{}{}", self.config.base_url.trim_end_matches('/'), endpoint);
        let mut req = self.client.get(&url);

        if let Some(ref token) = self.config.api_token {
            req = req.header("Authorization", format!("Bearer {}", token));
        }

        req
    }

    /// Send a request and decode the JSON body. A 404 yields `Ok(None)`.
    async fn get_json<T: DeserializeOwned>(
        &self,
        req: reqwest::RequestBuilder,
    ) -> Result<Option<T>> {
        let response = req.send().await?;
        let status = response.status();

        if status == StatusCode::NOT_FOUND {
            return Ok(None);
        }

        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            let code = ApiErrorCode::from_status(status.as_u16());
            debug!(
                http_status = status.as_u16(),
                ?code,
                retryable = code.is_retryable(),
                "Admin API request failed"
            );
            return Err(to_grove_error(
                code,
                &format!("HTTP {}: {}", status.as_u16(), body),
            ));
        }

        let body = response.bytes().await?;
        Ok(Some(serde_json::from_slice(&body)?))
    }
}

#[async_trait]
impl GrowerSource for TreeTrackerClient {
    #[instrument(skip(self), fields(subsystem = "client", op = "fetch_growers"))]
    async fn fetch_growers(&self, filter: &GrowerFilter) -> Result<Vec<Grower>> {
        let filter = json!({ "where": filter }).to_string();
        let req = self
            .build_get_request("/planter")
            .query(&[("filter", filter)]);
        let growers: Vec<Grower> = self.get_json(req).await?.unwrap_or_default();
        debug!(result_count = growers.len(), "Fetched grower list");
        Ok(growers)
    }

    #[instrument(skip(self), fields(subsystem = "client", op = "fetch_grower_by_id"))]
    async fn fetch_grower_by_id(&self, id: i64) -> Result<Option<Grower>> {
        let req = self.build_get_request(&format!("/planter/{}", id));
        self.get_json(req).await
    }
}

#[async_trait]
impl RegistrationSource for TreeTrackerClient {
    #[instrument(skip(self), fields(subsystem = "client", op = "fetch_registrations"))]
    async fn fetch_registrations(&self, grower_id: i64) -> Result<Vec<RegistrationEvent>> {
        let filter = json!({ "where": { "planter_id": grower_id } }).to_string();
        let req = self
            .build_get_request("/planter-registration")
            .query(&[("filter", filter)]);
        let events: Vec<RegistrationEvent> = self.get_json(req).await?.unwrap_or_default();
        debug!(result_count = events.len(), "Fetched registrations");
        Ok(events)
    }
}

#[async_trait]
impl CaptureCountSource for TreeTrackerClient {
    #[instrument(skip(self), fields(subsystem = "client", op = "fetch_capture_count"))]
    async fn fetch_capture_count(&self, filter: &CaptureFilter) -> Result<CaptureCount> {
        let filter = serde_json::to_string(filter)?;
        let req = self
            .build_get_request("/trees/count")
            .query(&[("where", filter)]);
        Ok(self.get_json(req).await?.unwrap_or_default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_rejects_invalid_config() {
        let config = ClientConfig {
            base_url: "localhost:3000".to_string(),
            ..ClientConfig::default()
        };
        let err = TreeTrackerClient::new(config).err().unwrap();
        assert!(matches!(err, Error::Config(_)));
    }

    #[test]
    fn test_build_get_request_joins_url_and_sets_auth() {
        let client = TreeTrackerClient::new(ClientConfig {
            base_url: "http://tracker.test/api/admin/".to_string(),
            api_token: Some("secret".to_string()),
            timeout_secs: 5,
        })
        .unwrap();

        let req = client.build_get_request("/planter/7").build().unwrap();
        assert_eq!(req.url().as_str(), "http://tracker.test/api/admin/planter/7");
        assert_eq!(req.headers()["Authorization"], "Bearer secret");
    }

    #[test]
    fn test_build_get_request_without_token_has_no_auth() {
        let client = TreeTrackerClient::new(ClientConfig::default()).unwrap();
        let req = client.build_get_request("/planter").build().unwrap();
        assert!(req.headers().get("Authorization").is_none());
    }
}
