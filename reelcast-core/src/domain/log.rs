//! Step log domain types

use serde::{Deserialize, Serialize};
use serde_json::Value;
use uuid::Uuid;

/// A pipeline step, in execution order
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PipelineStep {
    #[serde(rename = "instagram:resolve")]
    InstagramResolve,
    #[serde(rename = "instagram:download")]
    InstagramDownload,
    #[serde(rename = "canva:upload")]
    CanvaUpload,
    #[serde(rename = "canva:design")]
    CanvaDesign,
    #[serde(rename = "canva:place-video")]
    CanvaPlaceVideo,
    #[serde(rename = "canva:export")]
    CanvaExport,
    #[serde(rename = "complete")]
    Complete,
}

impl PipelineStep {
    /// Every step, in the order the runner executes them
    pub const SEQUENCE: [PipelineStep; 7] = [
        PipelineStep::InstagramResolve,
        PipelineStep::InstagramDownload,
        PipelineStep::CanvaUpload,
        PipelineStep::CanvaDesign,
        PipelineStep::CanvaPlaceVideo,
        PipelineStep::CanvaExport,
        PipelineStep::Complete,
    ];

    /// Wire identifier (e.g. `canva:place-video`)
    pub fn as_str(&self) -> &'static str {
        match self {
            PipelineStep::InstagramResolve => "instagram:resolve",
            PipelineStep::InstagramDownload => "instagram:download",
            PipelineStep::CanvaUpload => "canva:upload",
            PipelineStep::CanvaDesign => "canva:design",
            PipelineStep::CanvaPlaceVideo => "canva:place-video",
            PipelineStep::CanvaExport => "canva:export",
            PipelineStep::Complete => "complete",
        }
    }

    /// Human readable label
    pub fn label(&self) -> &'static str {
        match self {
            PipelineStep::InstagramResolve => "Resolve Instagram metadata",
            PipelineStep::InstagramDownload => "Download reel",
            PipelineStep::CanvaUpload => "Upload to Canva",
            PipelineStep::CanvaDesign => "Create Canva design",
            PipelineStep::CanvaPlaceVideo => "Place video element",
            PipelineStep::CanvaExport => "Export design",
            PipelineStep::Complete => "Complete",
        }
    }
}

impl std::fmt::Display for PipelineStep {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StepStatus {
    Pending,
    Success,
    Error,
}

/// One entry of a run's step log
///
/// Entries are appended in execution order and never modified afterwards.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StepLog {
    pub id: Uuid,
    pub step: PipelineStep,
    pub status: StepStatus,
    pub message: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub meta: Option<Value>,
    pub timestamp: chrono::DateTime<chrono::Utc>,
}

impl StepLog {
    fn new(step: PipelineStep, status: StepStatus, message: String, meta: Option<Value>) -> Self {
        Self {
            id: Uuid::new_v4(),
            step,
            status,
            message,
            meta,
            timestamp: chrono::Utc::now(),
        }
    }

    pub fn success(step: PipelineStep, message: impl Into<String>, meta: Value) -> Self {
        Self::new(step, StepStatus::Success, message.into(), Some(meta))
    }

    pub fn error(step: PipelineStep, message: impl Into<String>) -> Self {
        Self::new(step, StepStatus::Error, message.into(), None)
    }

    /// Read a string field from `meta`
    pub fn meta_str(&self, key: &str) -> Option<&str> {
        self.meta.as_ref()?.get(key)?.as_str()
    }
}
