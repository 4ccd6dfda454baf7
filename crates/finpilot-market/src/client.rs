//! Shared HTTP client for the internal market-data API.

use std::time::Duration;

use finpilot_core::config::MarketConfig;
use finpilot_core::ToolError;

/// HTTP client for the internal data API the tool handlers fetch from.
///
/// One instance is built at startup and shared (via `Arc`) by every handler.
/// Responses are passed through as raw JSON; handlers never reshape the body.
pub struct MarketDataClient {
    base_url: String,
    client: reqwest::Client,
}

impl MarketDataClient {
    pub fn from_config(config: &MarketConfig) -> Self {
        Self::new(
            config.base_url.clone(),
            Duration::from_secs(config.request_timeout_secs),
        )
    }

    pub fn new(base_url: String, timeout: Duration) -> Self {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .unwrap_or_else(|_| reqwest::Client::new());
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            client,
        }
    }

    /// GET a path under the base URL and parse the body as JSON.
    pub async fn get(&self, path: &str) -> Result<serde_json::Value, ToolError> {
        self.get_with_query(path, &[]).await
    }

    /// GET with query-string parameters.
    pub async fn get_with_query(
        &self,
        path: &str,
        query: &[(&str, String)],
    ) -> Result<serde_json::Value, ToolError> {
        let url = format!("{}/{}", self.base_url, path.trim_start_matches('/'));
        let res = self
            .client
            .get(&url)
            .query(query)
            .send()
            .await
            .map_err(|e| ToolError::Upstream(e.to_string()))?;

        if !res.status().is_success() {
            return Err(ToolError::Upstream(format!(
                "{} returned status {}",
                path,
                res.status().as_u16()
            )));
        }

        res.json()
            .await
            .map_err(|e| ToolError::Upstream(format!("invalid JSON from {}: {}", path, e)))
    }

    #[cfg(test)]
    pub(crate) fn base_url(&self) -> &str {
        &self.base_url
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_client_trims_trailing_slash() {
        let client = MarketDataClient::new(
            "http://127.0.0.1:5000/api/".to_string(),
            Duration::from_secs(5),
        );
        assert_eq!(client.base_url(), "http://127.0.0.1:5000/api");
    }

    #[tokio::test]
    async fn test_get_unreachable_host_is_upstream_error() {
        // Port 9 (discard) is not listening; the request must fail fast and
        // surface as an Upstream error, not a panic.
        let client =
            MarketDataClient::new("http://127.0.0.1:9/api".to_string(), Duration::from_millis(200));
        let err = client.get("overview").await.unwrap_err();
        assert!(matches!(err, ToolError::Upstream(_)));
    }
}
