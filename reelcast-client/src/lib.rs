//! Reelcast provider clients
//!
//! Typed HTTP clients for the two external services a Reelcast run talks to:
//! the Instagram Graph API (reel metadata and media download) and the Canva
//! Connect API (asset upload, designs, element placement, exports).
//!
//! Each client implements a trait (`InstagramApi`, `CanvaApi`) so the
//! pipeline runner can be driven by fakes in tests.
//!
//! # Example
//!
//! ```no_run
//! use reelcast_client::{InstagramApi, InstagramClient};
//!
//! #[tokio::main]
//! async fn main() -> reelcast_client::Result<()> {
//!     let instagram = InstagramClient::new("https://graph.facebook.com/v19.0");
//!     let reel = instagram
//!         .resolve_reel("token", "https://www.instagram.com/reel/C1a2b3c4d5e/")
//!         .await?;
//!
//!     println!("Video URL: {}", reel.media_url);
//!     Ok(())
//! }
//! ```

pub mod canva;
pub mod error;
pub mod instagram;

// Re-export commonly used types
pub use canva::{
    AssetUploadJob, CanvaApi, CanvaClient, Design, ExportJob, JobStatus, PlacedElement,
    ProviderJob,
};
pub use error::{ClientError, Result};
pub use instagram::{InstagramApi, InstagramClient, MediaDownload, ReelMetadata};

use serde::de::DeserializeOwned;
use serde_json::Value;

/// Longest provider error body quoted verbatim in an error message
const MAX_ERROR_BODY_CHARS: usize = 300;

// =============================================================================
// Response Handlers
// =============================================================================

/// Handle a provider response and deserialize JSON
///
/// Checks the status code and returns an `ApiError` carrying the provider's
/// message if the request failed, or deserializes the body if it succeeded.
pub(crate) async fn handle_response<T: DeserializeOwned>(response: reqwest::Response) -> Result<T> {
    let status = response.status();

    if !status.is_success() {
        let body = response
            .text()
            .await
            .unwrap_or_else(|_| "Unknown error".to_string());
        return Err(ClientError::api_error(
            status.as_u16(),
            provider_error_message(&body),
        ));
    }

    response
        .json()
        .await
        .map_err(|e| ClientError::ParseError(format!("Failed to parse JSON response: {}", e)))
}

/// Pull a human readable message out of a provider error body
///
/// Graph API errors look like `{"error": {"message": ...}}`, Canva errors
/// like `{"code": ..., "message": ...}`. Anything else is quoted as text.
pub(crate) fn provider_error_message(body: &str) -> String {
    if let Ok(value) = serde_json::from_str::<Value>(body) {
        let message = value
            .pointer("/error/message")
            .or_else(|| value.get("message"))
            .and_then(Value::as_str);
        if let Some(message) = message {
            return message.to_string();
        }
    }

    let trimmed = body.trim();
    if trimmed.is_empty() {
        return "empty response body".to_string();
    }
    trimmed.chars().take(MAX_ERROR_BODY_CHARS).collect()
}


#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_graph_error_message() {
        let body = r#"{"error":{"message":"Invalid OAuth access token.","type":"OAuthException","code":190}}"#;
        assert_eq!(provider_error_message(body), "Invalid OAuth access token.");
    }

    #[test]
    fn test_canva_error_message() {
        let body = r#"{"code":"design_not_found","message":"Design not found"}"#;
        assert_eq!(provider_error_message(body), "Design not found");
    }

    #[test]
    fn test_plain_text_error_is_truncated() {
        let body = "x".repeat(1000);
        assert_eq!(provider_error_message(&body).len(), MAX_ERROR_BODY_CHARS);
    }

    #[test]
    fn test_empty_error_body() {
        assert_eq!(provider_error_message("  "), "empty response body");
    }
}
