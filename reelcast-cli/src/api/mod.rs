//! API client module
//!
//! HTTP client for the Reelcast server.

use anyhow::{Context, Result};
use reelcast_core::dto::run::{RunRequest, RunResponse};
use reqwest::Client;
use serde_json::Value;

/// HTTP client for the Reelcast server API
pub struct ApiClient {
    base_url: String,
    client: Client,
}

impl ApiClient {
    /// Create a new API client
    ///
    /// # Arguments
    /// * `base_url` - The base URL of the Reelcast server
    pub fn new(base_url: &str) -> Self {
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            client: Client::new(),
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Run the pipeline and wait for its outcome
    ///
    /// Both success (200) and failure (400) bodies are returned as a
    /// `RunResponse`; any other status is an error.
    pub async fn run(&self, req: &RunRequest) -> Result<RunResponse> {
        let url = format!("{}/api/run", self.base_url);
        let response = self
            .client
            .post(&url)
            .json(req)
            .send()
            .await
            .context("Failed to send run request")?;

        let status = response.status();
        if !status.is_success() && status != reqwest::StatusCode::BAD_REQUEST {
            let error_text = response
                .text()
                .await
                .unwrap_or_else(|_| "Unknown error".to_string());
            anyhow::bail!("Server error ({}): {}", status, error_text);
        }

        response
            .json()
            .await
            .context("Failed to parse run response")
    }

    /// Check server health
    pub async fn health(&self) -> Result<Value> {
        let url = format!("{}/health", self.base_url);
        let response = self
            .client
            .get(&url)
            .send()
            .await
            .context("Failed to reach server")?;

        let status = response.status();
        if !status.is_success() {
            anyhow::bail!("Health check failed with status {}", status);
        }

        response
            .json()
            .await
            .context("Failed to parse health response")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_client_trims_trailing_slash() {
        let client = ApiClient::new("http://localhost:8080/");
        assert_eq!(client.base_url(), "http://localhost:8080");
    }
}
