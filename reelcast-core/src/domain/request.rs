//! Run request domain types
//!
//! `AgentRequest` is the validated form of the untyped JSON payload posted
//! to `/api/run`. Parsing is pure: no defaults are filled in here beyond the
//! export format, credential fallbacks are merged later by the server.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use thiserror::Error;
use url::Url;

/// Hosts accepted for reel URLs (subdomains included)
const INSTAGRAM_DOMAINS: &[&str] = &["instagram.com", "instagr.am"];

/// Validation failure for a run request
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("request body must be a JSON object")]
    NotAnObject,

    #[error("{field} is required")]
    Missing { field: &'static str },

    #[error("{field} is required: pass it in the request or set {env_var}")]
    MissingCredential {
        field: &'static str,
        env_var: &'static str,
    },

    #[error("{field} is invalid: {reason}")]
    Invalid { field: &'static str, reason: String },
}

impl ValidationError {
    /// Create an invalid-field error
    pub fn invalid(field: &'static str, reason: impl Into<String>) -> Self {
        Self::Invalid {
            field,
            reason: reason.into(),
        }
    }

    /// Name of the offending field, if the error is about a single field
    pub fn field(&self) -> Option<&'static str> {
        match self {
            Self::NotAnObject => None,
            Self::Missing { field }
            | Self::MissingCredential { field, .. }
            | Self::Invalid { field, .. } => Some(*field),
        }
    }
}

/// Output format requested for the Canva export
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ExportFormat {
    #[default]
    Mp4,
    Gif,
    Mov,
}

impl ExportFormat {
    pub const ALL: [ExportFormat; 3] = [ExportFormat::Mp4, ExportFormat::Gif, ExportFormat::Mov];

    pub fn as_str(&self) -> &'static str {
        match self {
            ExportFormat::Mp4 => "mp4",
            ExportFormat::Gif => "gif",
            ExportFormat::Mov => "mov",
        }
    }
}

impl fmt::Display for ExportFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ExportFormat {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let value = s.trim();
        ExportFormat::ALL
            .into_iter()
            .find(|format| format.as_str() == value)
            .ok_or_else(|| {
                ValidationError::invalid(
                    "exportFormat",
                    format!("unsupported format '{}' (expected mp4, gif or mov)", s.trim()),
                )
            })
    }
}

/// A validated run request
///
/// Immutable once parsed. Optional overrides stay `None` when the caller
/// omitted them (or sent blank strings).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AgentRequest {
    reel_url: Url,
    design_title: Option<String>,
    instagram_access_token: Option<String>,
    canva_access_token: Option<String>,
    canva_team_id: Option<String>,
    canva_template_id: Option<String>,
    canva_page_id: Option<String>,
    export_format: ExportFormat,
}

impl AgentRequest {
    /// Parse and validate an untyped JSON payload
    pub fn parse(payload: &Value) -> Result<Self, ValidationError> {
        let object = payload.as_object().ok_or(ValidationError::NotAnObject)?;

        let reel_url = optional_string(object, "reelUrl")?
            .ok_or(ValidationError::Missing { field: "reelUrl" })?;
        let reel_url = parse_reel_url(&reel_url)?;

        let export_format = match optional_string(object, "exportFormat")? {
            Some(raw) => raw.parse()?,
            None => ExportFormat::default(),
        };

        Ok(Self {
            reel_url,
            design_title: optional_string(object, "designTitle")?,
            instagram_access_token: optional_string(object, "instagramAccessToken")?,
            canva_access_token: optional_string(object, "canvaAccessToken")?,
            canva_team_id: optional_string(object, "canvaTeamId")?,
            canva_template_id: optional_string(object, "canvaTemplateId")?,
            canva_page_id: optional_string(object, "canvaPageId")?,
            export_format,
        })
    }

    pub fn reel_url(&self) -> &Url {
        &self.reel_url
    }

    pub fn design_title(&self) -> Option<&str> {
        self.design_title.as_deref()
    }

    pub fn instagram_access_token(&self) -> Option<&str> {
        self.instagram_access_token.as_deref()
    }

    pub fn canva_access_token(&self) -> Option<&str> {
        self.canva_access_token.as_deref()
    }

    pub fn canva_team_id(&self) -> Option<&str> {
        self.canva_team_id.as_deref()
    }

    pub fn canva_template_id(&self) -> Option<&str> {
        self.canva_template_id.as_deref()
    }

    pub fn canva_page_id(&self) -> Option<&str> {
        self.canva_page_id.as_deref()
    }

    pub fn export_format(&self) -> ExportFormat {
        self.export_format
    }
}

/// Read an optional string field; blank strings count as absent
fn optional_string(
    object: &Map<String, Value>,
    field: &'static str,
) -> Result<Option<String>, ValidationError> {
    match object.get(field) {
        None | Some(Value::Null) => Ok(None),
        Some(Value::String(raw)) => {
            let trimmed = raw.trim();
            Ok((!trimmed.is_empty()).then(|| trimmed.to_string()))
        }
        Some(_) => Err(ValidationError::invalid(field, "expected a string")),
    }
}

fn parse_reel_url(raw: &str) -> Result<Url, ValidationError> {
    let url = Url::parse(raw)
        .map_err(|e| ValidationError::invalid("reelUrl", format!("not a valid URL ({})", e)))?;

    if url.scheme() != "http" && url.scheme() != "https" {
        return Err(ValidationError::invalid(
            "reelUrl",
            "URL must use http or https",
        ));
    }

    match url.host_str() {
        Some(host) if is_instagram_host(host) => Ok(url),
        _ => Err(ValidationError::invalid(
            "reelUrl",
            "URL must point to instagram.com",
        )),
    }
}

fn is_instagram_host(host: &str) -> bool {
    let host = host.trim_end_matches('.').to_ascii_lowercase();
    INSTAGRAM_DOMAINS
        .iter()
        .any(|domain| host == *domain || host.ends_with(&format!(".{}", domain)))
}
