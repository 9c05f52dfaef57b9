//! Run configuration
//!
//! Merges a validated request with the server's default credentials into
//! the fully-resolved configuration a pipeline run executes with.

use reelcast_core::domain::request::{AgentRequest, ExportFormat, ValidationError};

use crate::config::{Settings, parse_page};

/// Title used when the request does not name the design
pub const DEFAULT_DESIGN_TITLE: &str = "Instagram Reel";

/// Fully-resolved configuration for one run
#[derive(Clone)]
pub struct RunConfig {
    pub reel_url: String,
    pub design_title: String,
    pub instagram_access_token: String,
    pub canva_access_token: String,
    pub canva_team_id: Option<String>,
    /// Existing design to open instead of creating one
    pub canva_template_id: Option<String>,
    /// 1-based page the video is placed on and exported from
    pub page: u32,
    pub export_format: ExportFormat,
}

impl RunConfig {
    /// Request values win; settings fill the gaps
    pub fn resolve(request: &AgentRequest, settings: &Settings) -> Result<Self, ValidationError> {
        let instagram_access_token = pick(
            request.instagram_access_token(),
            &settings.instagram_access_token,
        )
        .ok_or(ValidationError::MissingCredential {
            field: "instagramAccessToken",
            env_var: "INSTAGRAM_ACCESS_TOKEN",
        })?;

        let canva_access_token = pick(request.canva_access_token(), &settings.canva_access_token)
            .ok_or(ValidationError::MissingCredential {
                field: "canvaAccessToken",
                env_var: "CANVA_ACCESS_TOKEN",
            })?;

        let page = match request.canva_page_id() {
            Some(raw) => parse_page(raw).ok_or_else(|| {
                ValidationError::invalid("canvaPageId", "must be a positive page number")
            })?,
            None => settings.canva_page.unwrap_or(1),
        };

        Ok(Self {
            reel_url: request.reel_url().to_string(),
            design_title: request
                .design_title()
                .unwrap_or(DEFAULT_DESIGN_TITLE)
                .to_string(),
            instagram_access_token,
            canva_access_token,
            canva_team_id: pick(request.canva_team_id(), &settings.canva_team_id),
            canva_template_id: pick(request.canva_template_id(), &settings.canva_template_id),
            page,
            export_format: request.export_format(),
        })
    }
}

// Tokens stay out of logs
impl std::fmt::Debug for RunConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RunConfig")
            .field("reel_url", &self.reel_url)
            .field("design_title", &self.design_title)
            .field("instagram_access_token", &"<redacted>")
            .field("canva_access_token", &"<redacted>")
            .field("canva_team_id", &self.canva_team_id)
            .field("canva_template_id", &self.canva_template_id)
            .field("page", &self.page)
            .field("export_format", &self.export_format)
            .finish()
    }
}

fn pick(overridden: Option<&str>, default: &Option<String>) -> Option<String> {
    overridden.map(str::to_string).or_else(|| default.clone())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn request(extra: serde_json::Value) -> AgentRequest {
        let mut payload = json!({ "reelUrl": "https://www.instagram.com/reel/abc/" });
        if let (Some(target), Some(source)) = (payload.as_object_mut(), extra.as_object()) {
            target.extend(source.clone());
        }
        AgentRequest::parse(&payload).unwrap()
    }

    fn settings_with_tokens() -> Settings {
        Settings {
            instagram_access_token: Some("env-ig".to_string()),
            canva_access_token: Some("env-canva".to_string()),
            canva_team_id: Some("env-team".to_string()),
            canva_page: Some(2),
            ..Settings::default()
        }
    }

    #[test]
    fn test_defaults_fill_missing_fields() {
        let config = RunConfig::resolve(&request(json!({})), &settings_with_tokens()).unwrap();

        assert_eq!(config.instagram_access_token, "env-ig");
        assert_eq!(config.canva_access_token, "env-canva");
        assert_eq!(config.canva_team_id.as_deref(), Some("env-team"));
        assert_eq!(config.design_title, DEFAULT_DESIGN_TITLE);
        assert_eq!(config.page, 2);
        assert_eq!(config.export_format, ExportFormat::Mp4);
    }

    #[test]
    fn test_request_overrides_win() {
        let config = RunConfig::resolve(
            &request(json!({
                "instagramAccessToken": "req-ig",
                "canvaAccessToken": "req-canva",
                "canvaTeamId": "req-team",
                "canvaTemplateId": "DAF-template",
                "canvaPageId": "4",
                "designTitle": "Teaser",
                "exportFormat": "mov"
            })),
            &settings_with_tokens(),
        )
        .unwrap();

        assert_eq!(config.instagram_access_token, "req-ig");
        assert_eq!(config.canva_access_token, "req-canva");
        assert_eq!(config.canva_team_id.as_deref(), Some("req-team"));
        assert_eq!(config.canva_template_id.as_deref(), Some("DAF-template"));
        assert_eq!(config.page, 4);
        assert_eq!(config.design_title, "Teaser");
        assert_eq!(config.export_format, ExportFormat::Mov);
    }

    #[test]
    fn test_missing_tokens_rejected() {
        let err = RunConfig::resolve(&request(json!({})), &Settings::default()).unwrap_err();
        assert_eq!(err.field(), Some("instagramAccessToken"));
        assert!(err.to_string().contains("INSTAGRAM_ACCESS_TOKEN"));

        let err = RunConfig::resolve(
            &request(json!({ "instagramAccessToken": "req-ig" })),
            &Settings::default(),
        )
        .unwrap_err();
        assert_eq!(err.field(), Some("canvaAccessToken"));
    }

    #[test]
    fn test_invalid_page_rejected() {
        let err = RunConfig::resolve(
            &request(json!({ "canvaPageId": "zero" })),
            &settings_with_tokens(),
        )
        .unwrap_err();
        assert_eq!(err.field(), Some("canvaPageId"));
    }

    #[test]
    fn test_debug_redacts_tokens() {
        let config = RunConfig::resolve(&request(json!({})), &settings_with_tokens()).unwrap();
        let debug = format!("{:?}", config);
        assert!(!debug.contains("env-ig"));
        assert!(!debug.contains("env-canva"));
    }
}
