//! Canva Connect API client
//!
//! Covers the calls a run makes against Canva: asset upload jobs, design
//! creation and lookup, placing a video element on a page, and export jobs.
//! Upload and export are asynchronous on Canva's side; this client only
//! starts jobs and reads their status; waiting is left to the caller.

use std::time::Duration;

use async_trait::async_trait;
use base64::Engine;
use base64::engine::general_purpose::STANDARD as BASE64;
use reelcast_core::domain::request::ExportFormat;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use serde_json::json;
use tracing::debug;

use crate::error::Result;
use crate::handle_response;

/// Canva caps asset names at 50 characters
const MAX_ASSET_NAME_CHARS: usize = 50;

/// Status of an asynchronous Canva job
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum JobStatus {
    InProgress,
    Success,
    Failed,
}

/// Error detail attached to a failed job
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct JobError {
    pub code: Option<String>,
    pub message: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct AssetRef {
    pub id: String,
    pub name: Option<String>,
}

/// Asset upload job
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct AssetUploadJob {
    pub id: String,
    pub status: JobStatus,
    pub asset: Option<AssetRef>,
    pub error: Option<JobError>,
}

/// Export job
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct ExportJob {
    pub id: String,
    pub status: JobStatus,
    #[serde(default)]
    pub urls: Vec<String>,
    pub error: Option<JobError>,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct DesignUrls {
    pub edit_url: Option<String>,
    pub view_url: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct Design {
    pub id: String,
    pub title: Option<String>,
    pub urls: Option<DesignUrls>,
}

/// Element created on a design page
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct PlacedElement {
    pub id: String,
}

/// Common view over Canva's asynchronous jobs
pub trait ProviderJob {
    fn id(&self) -> &str;
    fn status(&self) -> JobStatus;
    fn error_message(&self) -> Option<&str>;
}

impl ProviderJob for AssetUploadJob {
    fn id(&self) -> &str {
        &self.id
    }

    fn status(&self) -> JobStatus {
        self.status
    }

    fn error_message(&self) -> Option<&str> {
        self.error.as_ref()?.message.as_deref()
    }
}

impl ProviderJob for ExportJob {
    fn id(&self) -> &str {
        &self.id
    }

    fn status(&self) -> JobStatus {
        self.status
    }

    fn error_message(&self) -> Option<&str> {
        self.error.as_ref()?.message.as_deref()
    }
}

#[derive(Deserialize)]
struct AssetUploadEnvelope {
    job: AssetUploadJob,
}

#[derive(Deserialize)]
struct ExportEnvelope {
    job: ExportJob,
}

#[derive(Deserialize)]
struct DesignEnvelope {
    design: Design,
}

#[derive(Deserialize)]
struct ElementEnvelope {
    element: PlacedElement,
}

/// Operations the pipeline needs from Canva
#[async_trait]
pub trait CanvaApi: Send + Sync {
    /// Start an asset upload job for raw media bytes
    async fn start_asset_upload(
        &self,
        access_token: &str,
        name: &str,
        data: Vec<u8>,
    ) -> Result<AssetUploadJob>;

    async fn get_asset_upload(&self, access_token: &str, job_id: &str) -> Result<AssetUploadJob>;

    /// Create a new design
    async fn create_design(
        &self,
        access_token: &str,
        title: &str,
        team_id: Option<&str>,
    ) -> Result<Design>;

    /// Fetch an existing design
    async fn get_design(&self, access_token: &str, design_id: &str) -> Result<Design>;

    /// Place an uploaded video asset on a design page (1-based page index)
    async fn place_video(
        &self,
        access_token: &str,
        design_id: &str,
        page: u32,
        asset_id: &str,
    ) -> Result<PlacedElement>;

    /// Start an export job for one page of a design
    async fn start_export(
        &self,
        access_token: &str,
        design_id: &str,
        format: ExportFormat,
        page: u32,
    ) -> Result<ExportJob>;

    async fn get_export(&self, access_token: &str, export_id: &str) -> Result<ExportJob>;
}

/// HTTP client for the Canva Connect API
#[derive(Debug, Clone)]
pub struct CanvaClient {
    /// Connect API base URL (e.g. "https://api.canva.com/rest/v1")
    base_url: String,
    client: Client,
    /// Replaces the client-wide timeout on video transfers
    transfer_timeout: Option<Duration>,
}

impl CanvaClient {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self::with_client(base_url, Client::new())
    }

    /// Create a client with a configured reqwest `Client` (timeouts, proxies)
    pub fn with_client(base_url: impl Into<String>, client: Client) -> Self {
        let base_url = base_url.into();
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            client,
            transfer_timeout: None,
        }
    }

    /// Give video transfers their own timeout instead of the client's
    pub fn with_transfer_timeout(mut self, timeout: Duration) -> Self {
        self.transfer_timeout = Some(timeout);
        self
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }
}

/// Value of the `Asset-Upload-Metadata` header for an asset name
fn upload_metadata_header(name: &str) -> String {
    let name: String = name.chars().take(MAX_ASSET_NAME_CHARS).collect();
    json!({ "name_base64": BASE64.encode(name.as_bytes()) }).to_string()
}

#[async_trait]
impl CanvaApi for CanvaClient {
    async fn start_asset_upload(
        &self,
        access_token: &str,
        name: &str,
        data: Vec<u8>,
    ) -> Result<AssetUploadJob> {
        let url = format!("{}/asset-uploads", self.base_url);
        debug!("Uploading {} bytes to Canva as '{}'", data.len(), name);

        let mut request = self
            .client
            .post(&url)
            .bearer_auth(access_token)
            .header(reqwest::header::CONTENT_TYPE, "application/octet-stream")
            .header("Asset-Upload-Metadata", upload_metadata_header(name))
            .body(data);
        if let Some(timeout) = self.transfer_timeout {
            request = request.timeout(timeout);
        }
        let response = request.send().await?;

        let envelope: AssetUploadEnvelope = handle_response(response).await?;
        Ok(envelope.job)
    }

    async fn get_asset_upload(&self, access_token: &str, job_id: &str) -> Result<AssetUploadJob> {
        let url = format!("{}/asset-uploads/{}", self.base_url, job_id);
        let response = self.client.get(&url).bearer_auth(access_token).send().await?;

        let envelope: AssetUploadEnvelope = handle_response(response).await?;
        Ok(envelope.job)
    }

    async fn create_design(
        &self,
        access_token: &str,
        title: &str,
        team_id: Option<&str>,
    ) -> Result<Design> {
        let url = format!("{}/designs", self.base_url);
        let mut body = json!({
            "design_type": { "type": "preset", "name": "presentation" },
            "title": title,
        });
        if let Some(team_id) = team_id {
            body["team_id"] = json!(team_id);
        }

        let response = self
            .client
            .post(&url)
            .bearer_auth(access_token)
            .json(&body)
            .send()
            .await?;

        let envelope: DesignEnvelope = handle_response(response).await?;
        Ok(envelope.design)
    }

    async fn get_design(&self, access_token: &str, design_id: &str) -> Result<Design> {
        let url = format!("{}/designs/{}", self.base_url, design_id);
        let response = self.client.get(&url).bearer_auth(access_token).send().await?;

        let envelope: DesignEnvelope = handle_response(response).await?;
        Ok(envelope.design)
    }

    async fn place_video(
        &self,
        access_token: &str,
        design_id: &str,
        page: u32,
        asset_id: &str,
    ) -> Result<PlacedElement> {
        let url = format!(
            "{}/designs/{}/pages/{}/elements",
            self.base_url, design_id, page
        );
        let body = json!({
            "type": "video",
            "asset_id": asset_id,
            "position": { "left": 0, "top": 0 },
            "fill": "page",
        });

        let response = self
            .client
            .post(&url)
            .bearer_auth(access_token)
            .json(&body)
            .send()
            .await?;

        let envelope: ElementEnvelope = handle_response(response).await?;
        Ok(envelope.element)
    }

    async fn start_export(
        &self,
        access_token: &str,
        design_id: &str,
        format: ExportFormat,
        page: u32,
    ) -> Result<ExportJob> {
        let url = format!("{}/exports", self.base_url);
        let body = json!({
            "design_id": design_id,
            "format": { "type": format.as_str(), "pages": [page] },
        });

        let response = self
            .client
            .post(&url)
            .bearer_auth(access_token)
            .json(&body)
            .send()
            .await?;

        let envelope: ExportEnvelope = handle_response(response).await?;
        Ok(envelope.job)
    }

    async fn get_export(&self, access_token: &str, export_id: &str) -> Result<ExportJob> {
        let url = format!("{}/exports/{}", self.base_url, export_id);
        let response = self.client.get(&url).bearer_auth(access_token).send().await?;

        let envelope: ExportEnvelope = handle_response(response).await?;
        Ok(envelope.job)
    }
}
