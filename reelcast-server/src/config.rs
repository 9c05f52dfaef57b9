//! Server configuration
//!
//! Process-wide settings: bind address, provider endpoints, default
//! credentials used when a run request omits them, and the timeouts that
//! bound outbound calls and Canva job polling.

use std::time::Duration;

/// Default Graph API endpoint (versioned)
pub const DEFAULT_INSTAGRAM_API_BASE: &str = "https://graph.facebook.com/v19.0";
/// Default Canva Connect endpoint
pub const DEFAULT_CANVA_API_BASE: &str = "https://api.canva.com/rest/v1";

/// Server settings
#[derive(Debug, Clone)]
pub struct Settings {
    /// Address the HTTP server binds to (e.g., "0.0.0.0:8080")
    pub bind_addr: String,

    pub instagram_api_base: String,
    pub canva_api_base: String,

    /// Default credentials and ids, overridable per request
    pub instagram_access_token: Option<String>,
    pub canva_access_token: Option<String>,
    pub canva_team_id: Option<String>,
    pub canva_template_id: Option<String>,
    pub canva_page: Option<u32>,

    /// Per-call timeout for outbound HTTP requests
    pub http_timeout: Duration,

    /// Timeout for the video download and the asset upload. These move up to
    /// `max_video_bytes` and replace `http_timeout` on those two calls, so it
    /// must not be shorter than `http_timeout`.
    pub transfer_timeout: Duration,

    /// Upper bound on waiting for a Canva upload or export job
    pub job_timeout: Duration,

    /// Delay between Canva job status checks
    pub job_poll_interval: Duration,

    /// Largest reel download accepted, in bytes
    pub max_video_bytes: u64,
}

impl Settings {
    /// Creates settings with defaults and no credentials
    pub fn new() -> Self {
        Self {
            bind_addr: "0.0.0.0:8080".to_string(),
            instagram_api_base: DEFAULT_INSTAGRAM_API_BASE.to_string(),
            canva_api_base: DEFAULT_CANVA_API_BASE.to_string(),
            instagram_access_token: None,
            canva_access_token: None,
            canva_team_id: None,
            canva_template_id: None,
            canva_page: None,
            http_timeout: Duration::from_secs(30),
            transfer_timeout: Duration::from_secs(600),
            job_timeout: Duration::from_secs(120),
            job_poll_interval: Duration::from_millis(2000),
            max_video_bytes: 250 * 1024 * 1024,
        }
    }

    /// Creates settings from environment variables
    ///
    /// Recognized environment variables:
    /// - REELCAST_BIND_ADDR (optional, default: 0.0.0.0:8080)
    /// - INSTAGRAM_API_BASE, CANVA_API_BASE (optional)
    /// - INSTAGRAM_ACCESS_TOKEN, CANVA_ACCESS_TOKEN (optional defaults)
    /// - CANVA_TEAM_ID, CANVA_TEMPLATE_ID, CANVA_PAGE_ID (optional defaults)
    /// - HTTP_TIMEOUT_SECS (optional, default: 30)
    /// - TRANSFER_TIMEOUT_SECS (optional, default: 600)
    /// - JOB_TIMEOUT_SECS (optional, default: 120)
    /// - JOB_POLL_INTERVAL_MS (optional, default: 2000)
    /// - MAX_VIDEO_BYTES (optional, default: 262144000)
    pub fn from_env() -> anyhow::Result<Self> {
        let defaults = Self::new();

        let canva_page = match env_string("CANVA_PAGE_ID") {
            Some(raw) => Some(parse_page(&raw).ok_or_else(|| {
                anyhow::anyhow!("CANVA_PAGE_ID must be a positive page number, got '{}'", raw)
            })?),
            None => None,
        };

        Ok(Self {
            bind_addr: env_string("REELCAST_BIND_ADDR").unwrap_or(defaults.bind_addr),
            instagram_api_base: env_string("INSTAGRAM_API_BASE")
                .unwrap_or(defaults.instagram_api_base),
            canva_api_base: env_string("CANVA_API_BASE").unwrap_or(defaults.canva_api_base),
            instagram_access_token: env_string("INSTAGRAM_ACCESS_TOKEN"),
            canva_access_token: env_string("CANVA_ACCESS_TOKEN"),
            canva_team_id: env_string("CANVA_TEAM_ID"),
            canva_template_id: env_string("CANVA_TEMPLATE_ID"),
            canva_page,
            http_timeout: env_parse("HTTP_TIMEOUT_SECS")
                .map(Duration::from_secs)
                .unwrap_or(defaults.http_timeout),
            transfer_timeout: env_parse("TRANSFER_TIMEOUT_SECS")
                .map(Duration::from_secs)
                .unwrap_or(defaults.transfer_timeout),
            job_timeout: env_parse("JOB_TIMEOUT_SECS")
                .map(Duration::from_secs)
                .unwrap_or(defaults.job_timeout),
            job_poll_interval: env_parse("JOB_POLL_INTERVAL_MS")
                .map(Duration::from_millis)
                .unwrap_or(defaults.job_poll_interval),
            max_video_bytes: env_parse("MAX_VIDEO_BYTES").unwrap_or(defaults.max_video_bytes),
        })
    }

    /// Validates the settings
    pub fn validate(&self) -> anyhow::Result<()> {
        if self.bind_addr.is_empty() {
            anyhow::bail!("bind_addr cannot be empty");
        }

        for (name, url) in [
            ("instagram_api_base", &self.instagram_api_base),
            ("canva_api_base", &self.canva_api_base),
        ] {
            if !url.starts_with("http://") && !url.starts_with("https://") {
                anyhow::bail!("{} must start with http:// or https://", name);
            }
        }

        if self.http_timeout.is_zero() {
            anyhow::bail!("http_timeout must be greater than 0");
        }

        if self.transfer_timeout < self.http_timeout {
            anyhow::bail!("transfer_timeout cannot be shorter than http_timeout");
        }

        if self.job_timeout.is_zero() {
            anyhow::bail!("job_timeout must be greater than 0");
        }

        if self.job_poll_interval.is_zero() {
            anyhow::bail!("job_poll_interval must be greater than 0");
        }

        if self.max_video_bytes == 0 {
            anyhow::bail!("max_video_bytes must be greater than 0");
        }

        Ok(())
    }
}

impl Default for Settings {
    fn default() -> Self {
        Self::new()
    }
}

/// Parse a 1-based page number
pub fn parse_page(raw: &str) -> Option<u32> {
    raw.trim().parse::<u32>().ok().filter(|page| *page > 0)
}

fn env_string(key: &str) -> Option<String> {
    std::env::var(key)
        .ok()
        .map(|value| value.trim().to_string())
        .filter(|value| !value.is_empty())
}

fn env_parse<T: std::str::FromStr>(key: &str) -> Option<T> {
    env_string(key).and_then(|value| value.parse::<T>().ok())
}
