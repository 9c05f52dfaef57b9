//! In-process fakes for Instagram and Canva

use std::sync::Arc;
use std::sync::atomic::{AtomicU64, AtomicUsize, Ordering};
use std::time::Duration;

use async_trait::async_trait;
use reelcast_client::canva::{AssetRef, DesignUrls, JobError};
use reelcast_client::{
    AssetUploadJob, CanvaApi, ClientError, Design, ExportJob, InstagramApi, JobStatus,
    MediaDownload, PlacedElement, ReelMetadata, Result,
};
use reelcast_core::domain::request::ExportFormat;

use crate::service::pipeline::PipelineRunner;
use crate::service::poll::PollPolicy;
use crate::service::run_config::RunConfig;

pub fn test_config() -> RunConfig {
    RunConfig {
        reel_url: "https://www.instagram.com/reel/C1a2b3c4d5e/".to_string(),
        design_title: "Test design".to_string(),
        instagram_access_token: "ig-token".to_string(),
        canva_access_token: "canva-token".to_string(),
        canva_team_id: None,
        canva_template_id: None,
        page: 1,
        export_format: ExportFormat::Mp4,
    }
}

pub fn runner(
    instagram: Arc<impl InstagramApi + 'static>,
    canva: Arc<impl CanvaApi + 'static>,
) -> PipelineRunner {
    let poll = PollPolicy {
        interval: Duration::from_millis(2),
        timeout: Duration::from_millis(100),
    };
    PipelineRunner::new(instagram, canva, poll, 1024 * 1024)
}

#[derive(Default)]
pub struct FakeInstagram {
    fail_resolve: bool,
    resolve_calls: AtomicUsize,
    download_calls: AtomicUsize,
}

impl FakeInstagram {
    /// Resolution answers like a Graph API 404
    pub fn failing_resolve() -> Self {
        Self {
            fail_resolve: true,
            ..Self::default()
        }
    }

    pub fn resolve_calls(&self) -> usize {
        self.resolve_calls.load(Ordering::SeqCst)
    }

    pub fn download_calls(&self) -> usize {
        self.download_calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl InstagramApi for FakeInstagram {
    async fn resolve_reel(&self, _access_token: &str, reel_url: &str) -> Result<ReelMetadata> {
        self.resolve_calls.fetch_add(1, Ordering::SeqCst);
        if self.fail_resolve {
            return Err(ClientError::api_error(404, "Media not found"));
        }
        Ok(ReelMetadata {
            media_id: "17800000000000001".to_string(),
            media_type: "VIDEO".to_string(),
            media_url: "https://cdn.example/reel.mp4".to_string(),
            permalink: Some(reel_url.to_string()),
            caption: None,
            thumbnail_url: None,
        })
    }

    async fn download_media(&self, _media_url: &str, _max_bytes: u64) -> Result<MediaDownload> {
        self.download_calls.fetch_add(1, Ordering::SeqCst);
        Ok(MediaDownload {
            data: vec![0u8; 512],
            content_type: Some("video/mp4".to_string()),
        })
    }
}

/// Canva fake that hands out fresh ids on every call
#[derive(Default)]
pub struct FakeCanva {
    stuck_export: bool,
    failed_upload: bool,
    failing_placement: bool,
    next_id: AtomicU64,
    calls: AtomicUsize,
    designs_created: AtomicUsize,
    exports_started: AtomicUsize,
}

impl FakeCanva {
    /// Export jobs never leave `in_progress`
    pub fn stuck_export() -> Self {
        Self {
            stuck_export: true,
            ..Self::default()
        }
    }

    /// Upload jobs end in `failed`
    pub fn failed_upload() -> Self {
        Self {
            failed_upload: true,
            ..Self::default()
        }
    }

    /// Placing the video answers like a Canva 500
    pub fn failing_placement() -> Self {
        Self {
            failing_placement: true,
            ..Self::default()
        }
    }

    pub fn exports_started(&self) -> usize {
        self.exports_started.load(Ordering::SeqCst)
    }

    pub fn total_calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    pub fn designs_created(&self) -> usize {
        self.designs_created.load(Ordering::SeqCst)
    }

    fn fresh_id(&self, prefix: &str) -> String {
        self.calls.fetch_add(1, Ordering::SeqCst);
        format!("{}-{}", prefix, self.next_id.fetch_add(1, Ordering::SeqCst))
    }
}

#[async_trait]
impl CanvaApi for FakeCanva {
    async fn start_asset_upload(
        &self,
        _access_token: &str,
        _name: &str,
        _data: Vec<u8>,
    ) -> Result<AssetUploadJob> {
        Ok(AssetUploadJob {
            id: self.fresh_id("upload"),
            status: JobStatus::InProgress,
            asset: None,
            error: None,
        })
    }

    async fn get_asset_upload(&self, _access_token: &str, job_id: &str) -> Result<AssetUploadJob> {
        if self.failed_upload {
            self.calls.fetch_add(1, Ordering::SeqCst);
            return Ok(AssetUploadJob {
                id: job_id.to_string(),
                status: JobStatus::Failed,
                asset: None,
                error: Some(JobError {
                    code: Some("file_too_big".to_string()),
                    message: Some("Video is too large".to_string()),
                }),
            });
        }
        Ok(AssetUploadJob {
            id: job_id.to_string(),
            status: JobStatus::Success,
            asset: Some(AssetRef {
                id: self.fresh_id("asset"),
                name: None,
            }),
            error: None,
        })
    }

    async fn create_design(
        &self,
        _access_token: &str,
        title: &str,
        _team_id: Option<&str>,
    ) -> Result<Design> {
        self.designs_created.fetch_add(1, Ordering::SeqCst);
        Ok(Design {
            id: self.fresh_id("design"),
            title: Some(title.to_string()),
            urls: Some(DesignUrls {
                edit_url: Some("https://canva.example/edit".to_string()),
                view_url: None,
            }),
        })
    }

    async fn get_design(&self, _access_token: &str, design_id: &str) -> Result<Design> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if design_id == "missing" {
            return Err(ClientError::api_error(404, "Design not found"));
        }
        Ok(Design {
            id: design_id.to_string(),
            title: None,
            urls: None,
        })
    }

    async fn place_video(
        &self,
        _access_token: &str,
        _design_id: &str,
        _page: u32,
        _asset_id: &str,
    ) -> Result<PlacedElement> {
        if self.failing_placement {
            self.calls.fetch_add(1, Ordering::SeqCst);
            return Err(ClientError::api_error(500, "Internal error"));
        }
        Ok(PlacedElement {
            id: self.fresh_id("element"),
        })
    }

    async fn start_export(
        &self,
        _access_token: &str,
        _design_id: &str,
        _format: ExportFormat,
        _page: u32,
    ) -> Result<ExportJob> {
        self.exports_started.fetch_add(1, Ordering::SeqCst);
        Ok(ExportJob {
            id: self.fresh_id("export"),
            status: JobStatus::InProgress,
            urls: vec![],
            error: None,
        })
    }

    async fn get_export(&self, _access_token: &str, export_id: &str) -> Result<ExportJob> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if self.stuck_export {
            return Ok(ExportJob {
                id: export_id.to_string(),
                status: JobStatus::InProgress,
                urls: vec![],
                error: None,
            });
        }
        Ok(ExportJob {
            id: export_id.to_string(),
            status: JobStatus::Success,
            urls: vec![format!("https://export.example/{}.mp4", export_id)],
            error: None,
        })
    }
}

/// Instagram fake whose resolution panics
pub struct PanickingInstagram;

#[async_trait]
impl InstagramApi for PanickingInstagram {
    async fn resolve_reel(&self, _access_token: &str, _reel_url: &str) -> Result<ReelMetadata> {
        panic!("graph response missing media type");
    }

    async fn download_media(&self, _media_url: &str, _max_bytes: u64) -> Result<MediaDownload> {
        unreachable!("resolution never succeeds")
    }
}
