//! Run DTOs for the `/api/run` endpoint

use serde::{Deserialize, Serialize};

use crate::domain::log::StepLog;
use crate::domain::request::ExportFormat;
use crate::domain::result::PipelineResult;

/// Request body for `POST /api/run`
///
/// The server parses bodies as untyped JSON and validates them into an
/// `AgentRequest`; this struct is the shape clients send.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RunRequest {
    pub reel_url: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub design_title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub instagram_access_token: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub canva_access_token: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub canva_team_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub canva_template_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub canva_page_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub export_format: Option<ExportFormat>,
}

/// Response body for `POST /api/run`
///
/// Serialized untagged so that the success and failure shapes share the
/// `success` discriminator field.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(untagged)]
pub enum RunResponse {
    Success(RunSuccess),
    Failure(RunFailure),
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RunSuccess {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub download_url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub design_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub export_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub asset_id: Option<String>,
    pub logs: Vec<StepLog>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RunFailure {
    pub success: bool,
    pub error: String,
}

impl RunResponse {
    pub fn failure(error: impl Into<String>) -> Self {
        RunResponse::Failure(RunFailure {
            success: false,
            error: error.into(),
        })
    }

    pub fn is_success(&self) -> bool {
        matches!(self, RunResponse::Success(_))
    }
}

impl From<PipelineResult> for RunResponse {
    fn from(result: PipelineResult) -> Self {
        RunResponse::Success(RunSuccess {
            success: true,
            download_url: result.download_url,
            design_id: result.design_id,
            export_id: result.export_id,
            asset_id: result.asset_id,
            logs: result.logs,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_failure_shape() {
        let value = serde_json::to_value(RunResponse::failure("reelUrl is required")).unwrap();
        assert_eq!(value, json!({ "success": false, "error": "reelUrl is required" }));
    }

    #[test]
    fn test_success_shape() {
        let response = RunResponse::from(PipelineResult {
            download_url: Some("https://export.example/video.mp4".to_string()),
            design_id: Some("D1".to_string()),
            export_id: Some("E1".to_string()),
            asset_id: None,
            logs: vec![],
        });
        let value = serde_json::to_value(&response).unwrap();

        assert_eq!(value["success"], true);
        assert_eq!(value["downloadUrl"], "https://export.example/video.mp4");
        assert_eq!(value["designId"], "D1");
        assert!(value.get("assetId").is_none());
        assert_eq!(value["logs"], json!([]));
    }

    #[test]
    fn test_failure_body_deserializes_as_failure() {
        let response: RunResponse =
            serde_json::from_value(json!({ "success": false, "error": "boom" })).unwrap();
        assert!(!response.is_success());
    }

    #[test]
    fn test_run_request_skips_empty_overrides() {
        let req = RunRequest {
            reel_url: "https://www.instagram.com/reel/abc/".to_string(),
            export_format: Some(ExportFormat::Gif),
            ..Default::default()
        };
        let value = serde_json::to_value(&req).unwrap();

        assert_eq!(
            value,
            json!({ "reelUrl": "https://www.instagram.com/reel/abc/", "exportFormat": "gif" })
        );
    }
}
