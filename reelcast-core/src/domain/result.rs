//! Pipeline result domain types

use serde::{Deserialize, Serialize};

use crate::domain::log::StepLog;

/// Outcome of a fully successful pipeline run
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PipelineResult {
    pub download_url: Option<String>,
    pub design_id: Option<String>,
    pub export_id: Option<String>,
    pub asset_id: Option<String>,
    pub logs: Vec<StepLog>,
}
