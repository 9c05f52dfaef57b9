//! Pipeline runner
//!
//! Runs the fixed reel-to-Canva sequence for one request:
//! - Resolve the reel's metadata on Instagram
//! - Download the video
//! - Upload it to Canva as an asset
//! - Create a design (or open the configured one)
//! - Place the video on a page
//! - Export the design and wait for the download URL
//!
//! Every step appends exactly one entry to the run's step log. The first
//! failing step ends the run; resources already created on Canva stay in
//! place.

use std::sync::Arc;
use std::time::Duration;

use reelcast_client::{CanvaApi, ClientError, Design, InstagramApi, ReelMetadata};
use reelcast_core::domain::log::{PipelineStep, StepLog};
use reelcast_core::domain::request::ValidationError;
use reelcast_core::domain::result::PipelineResult;
use serde_json::{Value, json};
use thiserror::Error;
use tracing::{error, info};

use crate::config::Settings;
use crate::service::poll::{PollPolicy, wait_for_job};
use crate::service::run_config::RunConfig;

/// Message returned to callers for internal failures
pub const INTERNAL_ERROR_MESSAGE: &str = "Unexpected server error";

/// Service error type
#[derive(Debug, Error)]
pub enum PipelineError {
    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error("{step} failed: {message}")]
    ExternalService { step: PipelineStep, message: String },

    #[error("{step} timed out after {waited:?} waiting for Canva to finish")]
    Timeout { step: PipelineStep, waited: Duration },

    #[error("internal error: {0}")]
    Internal(String),
}

impl PipelineError {
    pub fn external(step: PipelineStep, message: impl Into<String>) -> Self {
        PipelineError::ExternalService {
            step,
            message: message.into(),
        }
    }

    pub fn from_client(step: PipelineStep, err: ClientError) -> Self {
        PipelineError::external(step, err.to_string())
    }

    /// Message safe to hand back to the HTTP caller
    pub fn public_message(&self) -> String {
        match self {
            PipelineError::Internal(_) => INTERNAL_ERROR_MESSAGE.to_string(),
            other => other.to_string(),
        }
    }
}

pub type Result<T> = std::result::Result<T, PipelineError>;

/// A failed run: the terminal error plus the logs written up to it
#[derive(Debug)]
pub struct PipelineFailure {
    pub error: PipelineError,
    pub logs: Vec<StepLog>,
}

/// Successful step output: the value handed to later steps plus its log line
struct StepOutcome<T> {
    value: T,
    message: String,
    meta: Value,
}

impl<T> StepOutcome<T> {
    fn new(value: T, message: impl Into<String>, meta: Value) -> Self {
        Self {
            value,
            message: message.into(),
            meta,
        }
    }
}

/// Append the step's log entry and unwrap its value
fn record<T>(
    logs: &mut Vec<StepLog>,
    step: PipelineStep,
    outcome: Result<StepOutcome<T>>,
) -> Result<T> {
    match outcome {
        Ok(outcome) => {
            info!("Step {} succeeded: {}", step, outcome.message);
            logs.push(StepLog::success(step, outcome.message, outcome.meta));
            Ok(outcome.value)
        }
        Err(err) => {
            error!("Step {} failed: {}", step, err);
            logs.push(StepLog::error(step, err.public_message()));
            Err(err)
        }
    }
}

/// Executes pipeline runs against Instagram and Canva
pub struct PipelineRunner {
    instagram: Arc<dyn InstagramApi>,
    canva: Arc<dyn CanvaApi>,
    poll: PollPolicy,
    max_video_bytes: u64,
}

impl PipelineRunner {
    pub fn new(
        instagram: Arc<dyn InstagramApi>,
        canva: Arc<dyn CanvaApi>,
        poll: PollPolicy,
        max_video_bytes: u64,
    ) -> Self {
        Self {
            instagram,
            canva,
            poll,
            max_video_bytes,
        }
    }

    /// Creates a runner with limits taken from the settings
    pub fn from_settings(
        settings: &Settings,
        instagram: Arc<dyn InstagramApi>,
        canva: Arc<dyn CanvaApi>,
    ) -> Self {
        let poll = PollPolicy {
            interval: settings.job_poll_interval,
            timeout: settings.job_timeout,
        };
        Self::new(instagram, canva, poll, settings.max_video_bytes)
    }

    /// Run the full sequence once
    pub async fn run(&self, config: &RunConfig) -> std::result::Result<PipelineResult, PipelineFailure> {
        info!("Starting pipeline for {}", config.reel_url);

        let mut logs = Vec::new();
        match self.execute(config, &mut logs).await {
            Ok(mut result) => {
                info!("Pipeline completed with {} log entries", logs.len());
                result.logs = logs;
                Ok(result)
            }
            Err(error) => Err(PipelineFailure { error, logs }),
        }
    }

    async fn execute(&self, config: &RunConfig, logs: &mut Vec<StepLog>) -> Result<PipelineResult> {
        let reel = record(logs, PipelineStep::InstagramResolve, self.resolve(config).await)?;

        let video = record(
            logs,
            PipelineStep::InstagramDownload,
            self.download(&reel).await,
        )?;

        let asset_id = record(
            logs,
            PipelineStep::CanvaUpload,
            self.upload(config, &reel, video).await,
        )?;

        let design = record(logs, PipelineStep::CanvaDesign, self.open_design(config).await)?;

        record(
            logs,
            PipelineStep::CanvaPlaceVideo,
            self.place_video(config, &design.id, &asset_id).await,
        )?;

        let (export_id, download_url) = record(
            logs,
            PipelineStep::CanvaExport,
            self.export(config, &design.id).await,
        )?;

        logs.push(StepLog::success(
            PipelineStep::Complete,
            "Pipeline completed",
            json!({
                "downloadUrl": download_url,
                "designId": design.id,
                "exportId": export_id,
                "assetId": asset_id,
            }),
        ));

        Ok(PipelineResult {
            download_url: Some(download_url),
            design_id: Some(design.id),
            export_id: Some(export_id),
            asset_id: Some(asset_id),
            logs: Vec::new(),
        })
    }

    // =========================================================================
    // Steps
    // =========================================================================

    async fn resolve(&self, config: &RunConfig) -> Result<StepOutcome<ReelMetadata>> {
        let step = PipelineStep::InstagramResolve;
        let reel = self
            .instagram
            .resolve_reel(&config.instagram_access_token, &config.reel_url)
            .await
            .map_err(|e| PipelineError::from_client(step, e))?;

        let meta = json!({
            "mediaId": reel.media_id,
            "mediaUrl": reel.media_url,
            "permalink": reel.permalink,
            "caption": reel.caption,
        });
        Ok(StepOutcome::new(
            reel,
            "Resolved reel metadata",
            meta,
        ))
    }

    async fn download(&self, reel: &ReelMetadata) -> Result<StepOutcome<Vec<u8>>> {
        let step = PipelineStep::InstagramDownload;
        let download = self
            .instagram
            .download_media(&reel.media_url, self.max_video_bytes)
            .await
            .map_err(|e| PipelineError::from_client(step, e))?;

        let size = download.data.len();
        Ok(StepOutcome::new(
            download.data,
            format!("Downloaded {} bytes", size),
            json!({ "bytes": size, "contentType": download.content_type }),
        ))
    }

    async fn upload(
        &self,
        config: &RunConfig,
        reel: &ReelMetadata,
        video: Vec<u8>,
    ) -> Result<StepOutcome<String>> {
        let step = PipelineStep::CanvaUpload;
        let token = config.canva_access_token.as_str();
        let canva = self.canva.as_ref();
        let name = format!("reel-{}.mp4", reel.media_id);

        let started = canva
            .start_asset_upload(token, &name, video)
            .await
            .map_err(|e| PipelineError::from_client(step, e))?;
        let job_id = started.id.clone();

        let job = wait_for_job(step, started, self.poll, move |id| async move {
            canva.get_asset_upload(token, &id).await
        })
        .await?;

        let asset_id = job
            .asset
            .map(|asset| asset.id)
            .filter(|id| !id.is_empty())
            .ok_or_else(|| {
                PipelineError::external(step, format!("upload job {} returned no asset", job_id))
            })?;

        let meta = json!({ "assetId": asset_id, "jobId": job_id });
        Ok(StepOutcome::new(
            asset_id,
            "Uploaded video to Canva",
            meta,
        ))
    }

    async fn open_design(&self, config: &RunConfig) -> Result<StepOutcome<Design>> {
        let step = PipelineStep::CanvaDesign;
        let token = &config.canva_access_token;

        let (design, created) = match &config.canva_template_id {
            Some(design_id) => {
                let design = self
                    .canva
                    .get_design(token, design_id)
                    .await
                    .map_err(|e| {
                        if e.is_not_found() {
                            PipelineError::external(
                                step,
                                format!("template design {} not found", design_id),
                            )
                        } else {
                            PipelineError::from_client(step, e)
                        }
                    })?;
                (design, false)
            }
            None => {
                let design = self
                    .canva
                    .create_design(token, &config.design_title, config.canva_team_id.as_deref())
                    .await
                    .map_err(|e| PipelineError::from_client(step, e))?;
                (design, true)
            }
        };

        if design.id.is_empty() {
            return Err(PipelineError::external(step, "Canva returned a design without an id"));
        }

        let message = if created {
            format!("Created design {}", design.id)
        } else {
            format!("Opened design {}", design.id)
        };
        let meta = json!({
            "designId": design.id,
            "title": design.title,
            "editUrl": design.urls.as_ref().and_then(|urls| urls.edit_url.clone()),
            "created": created,
        });
        Ok(StepOutcome::new(design, message, meta))
    }

    async fn place_video(
        &self,
        config: &RunConfig,
        design_id: &str,
        asset_id: &str,
    ) -> Result<StepOutcome<()>> {
        let step = PipelineStep::CanvaPlaceVideo;
        let element = self
            .canva
            .place_video(&config.canva_access_token, design_id, config.page, asset_id)
            .await
            .map_err(|e| PipelineError::from_client(step, e))?;

        Ok(StepOutcome::new(
            (),
            format!("Placed video on page {}", config.page),
            json!({ "elementId": element.id, "page": config.page }),
        ))
    }

    async fn export(
        &self,
        config: &RunConfig,
        design_id: &str,
    ) -> Result<StepOutcome<(String, String)>> {
        let step = PipelineStep::CanvaExport;
        let token = config.canva_access_token.as_str();
        let canva = self.canva.as_ref();

        let started = canva
            .start_export(token, design_id, config.export_format, config.page)
            .await
            .map_err(|e| PipelineError::from_client(step, e))?;

        let job = wait_for_job(step, started, self.poll, move |id| async move {
            canva.get_export(token, &id).await
        })
        .await?;

        let download_url = job
            .urls
            .iter()
            .find(|url| !url.is_empty())
            .cloned()
            .ok_or_else(|| {
                PipelineError::external(step, format!("export job {} returned no URL", job.id))
            })?;

        let meta = json!({
            "exportId": job.id,
            "downloadUrl": download_url,
            "format": config.export_format,
        });
        Ok(StepOutcome::new(
            (job.id, download_url),
            format!("Exported design as {}", config.export_format),
            meta,
        ))
    }
}
