//! Instagram Graph API client
//!
//! Resolves a public reel URL to its media object and downloads the video
//! file from the CDN URL the Graph API hands back.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use tracing::debug;

use crate::error::{ClientError, Result};
use crate::handle_response;

/// Resolved reel metadata
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReelMetadata {
    pub media_id: String,
    pub media_type: String,
    /// Direct video URL (short-lived CDN link)
    pub media_url: String,
    pub permalink: Option<String>,
    pub caption: Option<String>,
    pub thumbnail_url: Option<String>,
}

/// A downloaded media file
#[derive(Debug, Clone)]
pub struct MediaDownload {
    pub data: Vec<u8>,
    pub content_type: Option<String>,
}

/// Operations the pipeline needs from Instagram
#[async_trait]
pub trait InstagramApi: Send + Sync {
    /// Resolve a reel URL into metadata with a downloadable video URL
    async fn resolve_reel(&self, access_token: &str, reel_url: &str) -> Result<ReelMetadata>;

    /// Download a media file, failing once more than `max_bytes` arrive
    async fn download_media(&self, media_url: &str, max_bytes: u64) -> Result<MediaDownload>;
}

#[derive(Debug, Deserialize)]
struct OEmbedResponse {
    media_id: Option<String>,
}

#[derive(Debug, Deserialize)]
struct MediaObject {
    id: String,
    media_type: Option<String>,
    media_url: Option<String>,
    permalink: Option<String>,
    caption: Option<String>,
    thumbnail_url: Option<String>,
}

impl MediaObject {
    fn into_reel(self) -> Result<ReelMetadata> {
        let media_type = self.media_type.unwrap_or_default();
        if !media_type.eq_ignore_ascii_case("VIDEO") {
            return Err(ClientError::InvalidResponse(format!(
                "media {} is not a video (media_type '{}')",
                self.id, media_type
            )));
        }

        let media_url = self.media_url.filter(|url| !url.is_empty()).ok_or_else(|| {
            ClientError::InvalidResponse(format!("media {} has no downloadable video URL", self.id))
        })?;

        Ok(ReelMetadata {
            media_id: self.id,
            media_type,
            media_url,
            permalink: self.permalink,
            caption: self.caption,
            thumbnail_url: self.thumbnail_url,
        })
    }
}

/// HTTP client for the Instagram Graph API
#[derive(Debug, Clone)]
pub struct InstagramClient {
    /// Graph API base URL including version (e.g. "https://graph.facebook.com/v19.0")
    base_url: String,
    client: Client,
    /// Replaces the client-wide timeout on video transfers
    transfer_timeout: Option<Duration>,
}

impl InstagramClient {
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

    async fn lookup_media_id(&self, access_token: &str, reel_url: &str) -> Result<String> {
        let url = format!("{}/instagram_oembed", self.base_url);
        let response = self
            .client
            .get(&url)
            .bearer_auth(access_token)
            .query(&[("url", reel_url), ("fields", "media_id")])
            .send()
            .await?;

        let oembed: OEmbedResponse = handle_response(response).await?;
        oembed
            .media_id
            .filter(|id| !id.is_empty())
            .ok_or_else(|| ClientError::InvalidResponse("oEmbed response has no media_id".into()))
    }
}

#[async_trait]
impl InstagramApi for InstagramClient {
    async fn resolve_reel(&self, access_token: &str, reel_url: &str) -> Result<ReelMetadata> {
        let media_id = self.lookup_media_id(access_token, reel_url).await?;
        debug!("Reel {} resolved to media {}", reel_url, media_id);

        let url = format!("{}/{}", self.base_url, media_id);
        let response = self
            .client
            .get(&url)
            .bearer_auth(access_token)
            .query(&[(
                "fields",
                "id,media_type,media_url,permalink,caption,thumbnail_url",
            )])
            .send()
            .await?;

        let media: MediaObject = handle_response(response).await?;
        media.into_reel()
    }

    async fn download_media(&self, media_url: &str, max_bytes: u64) -> Result<MediaDownload> {
        let mut request = self.client.get(media_url);
        if let Some(timeout) = self.transfer_timeout {
            request = request.timeout(timeout);
        }
        let mut response = request.send().await?;

        let status = response.status();
        if !status.is_success() {
            return Err(ClientError::api_error(
                status.as_u16(),
                format!("media download failed with status {}", status),
            ));
        }

        if response.content_length().is_some_and(|len| len > max_bytes) {
            return Err(ClientError::TooLarge { limit: max_bytes });
        }

        let content_type = response
            .headers()
            .get(reqwest::header::CONTENT_TYPE)
            .and_then(|value| value.to_str().ok())
            .map(str::to_string);

        let mut data = Vec::new();
        while let Some(chunk) = response.chunk().await? {
            if (data.len() + chunk.len()) as u64 > max_bytes {
                return Err(ClientError::TooLarge { limit: max_bytes });
            }
            data.extend_from_slice(&chunk);
        }

        if data.is_empty() {
            return Err(ClientError::InvalidResponse(
                "media download returned an empty body".into(),
            ));
        }

        Ok(MediaDownload { data, content_type })
    }
}
