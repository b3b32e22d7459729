//! # Remote Compression Service
//!
//! Shrinking a PDF is delegated to a hosted API. The flow has three remote
//! steps, each of which can fail independently:
//!
//! 1. **Upload**: `POST /v1/file/upload` (multipart field `file`) → `{url}`
//! 2. **Compress**: `POST /v2/pdf/compress` with the uploaded `url` and an
//!    image-compression config → `{url}` of the result
//! 3. **Download**: `GET` the result URL into a local file
//!
//! The provider sometimes reports failures inside a 2xx body
//! (`{"error": true, "message": ...}`), so every response is inspected, not
//! just its status.
//!
//! ## Quality Tiers
//!
//! | Tier | JPEG quality (color/gray) |
//! |------|---------------------------|
//! | low | 30 |
//! | medium | 60 |
//! | high | 80 |
//!
//! Color and grayscale images above 225 ppi are downsampled to 150 ppi.
//! Monochrome images above 450 ppi go to 300 ppi and are stored as CCITT G4.
//!
//! Uploads are never cleaned up on failure; orphaned files are left to the
//! provider's own expiry.

use crate::config::CompressionConfig;
use crate::files;
use crate::prefs::Quality;
use reqwest::blocking::{multipart, Client};
use serde::Deserialize;
use serde_json::{json, Value};
use std::fmt;
use std::path::Path;
use std::time::Duration;
use thiserror::Error;
use tracing::{debug, info};

const UPLOAD_PATH: &str = "/v1/file/upload";
const COMPRESS_PATH: &str = "/v2/pdf/compress";
const API_KEY_HEADER: &str = "x-api-key";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RemoteStage {
    Upload,
    Compress,
    Download,
}

impl fmt::Display for RemoteStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RemoteStage::Upload => write!(f, "upload"),
            RemoteStage::Compress => write!(f, "compress"),
            RemoteStage::Download => write!(f, "download"),
        }
    }
}

/// A failed remote step, with the provider's raw response when there was one.
#[derive(Error, Debug, Clone)]
#[error("Compression {stage} failed: {message}")]
pub struct RemoteError {
    pub stage: RemoteStage,
    pub message: String,
    pub payload: Option<String>,
}

impl RemoteError {
    pub fn new(stage: RemoteStage, message: impl Into<String>) -> Self {
        Self {
            stage,
            message: message.into(),
            payload: None,
        }
    }

    pub fn with_payload(mut self, payload: impl Into<String>) -> Self {
        self.payload = Some(payload.into());
        self
    }

    /// Text for a user-facing notice: the provider payload if any, else the message.
    pub fn user_message(&self) -> String {
        match &self.payload {
            Some(payload) if !payload.trim().is_empty() => {
                format!("Compression {} failed: {}", self.stage, payload.trim())
            }
            _ => self.to_string(),
        }
    }
}

pub type RemoteResult<T> = std::result::Result<T, RemoteError>;

/// Remote collaborator for the compression producer.
pub trait CompressionService: Send {
    /// Uploads a local PDF and returns the provider URL for it.
    fn upload(&self, path: &Path) -> RemoteResult<String>;

    /// Compresses a previously uploaded file, returning the download URL.
    fn compress(&self, url: &str, tier: Quality) -> RemoteResult<String>;

    /// Downloads `url` to `dest`, returning the number of bytes written.
    fn download(&self, url: &str, dest: &Path) -> RemoteResult<u64>;
}

/// JPEG quality applied to color and grayscale images for a tier.
pub fn jpeg_quality(tier: Quality) -> u8 {
    match tier {
        Quality::Low => 30,
        Quality::Medium => 60,
        Quality::High => 80,
    }
}

/// Request body for the compress endpoint.
pub fn compress_request(url: &str, tier: Quality) -> Value {
    let lossy = |quality: u8| {
        json!({
            "skip": false,
            "downsample": { "skip": false, "downsample_ppi": 150, "threshold_ppi": 225 },
            "compression": {
                "skip": false,
                "compression_format": "jpeg",
                "compression_params": { "quality": quality }
            }
        })
    };
    let quality = jpeg_quality(tier);

    json!({
        "url": url,
        "async": false,
        "config": {
            "images": {
                "color": lossy(quality),
                "grayscale": lossy(quality),
                "monochrome": {
                    "skip": false,
                    "downsample": { "skip": false, "downsample_ppi": 300, "threshold_ppi": 450 },
                    "compression": {
                        "skip": false,
                        "compression_format": "ccitt_g4",
                        "compression_params": {}
                    }
                }
            },
            "save": { "garbage": 4 }
        }
    })
}

#[derive(Debug, Deserialize)]
struct UrlResponse {
    #[serde(default)]
    error: bool,
    #[serde(default)]
    message: Option<String>,
    #[serde(default)]
    url: Option<String>,
}

/// Extracts the `url` from a provider response body.
fn parse_url_response(stage: RemoteStage, status_ok: bool, body: &str) -> RemoteResult<String> {
    if !status_ok {
        return Err(RemoteError::new(stage, "provider rejected the request").with_payload(body));
    }
    let parsed: UrlResponse = serde_json::from_str(body).map_err(|e| {
        RemoteError::new(stage, format!("unreadable response: {}", e)).with_payload(body)
    })?;
    if parsed.error {
        let message = parsed
            .message
            .unwrap_or_else(|| "provider reported an error".to_string());
        return Err(RemoteError::new(stage, message).with_payload(body));
    }
    parsed
        .url
        .filter(|url| !url.is_empty())
        .ok_or_else(|| RemoteError::new(stage, "no URL in response").with_payload(body))
}

/// PDF.co client.
pub struct PdfCoClient {
    client: Client,
    base_url: String,
    api_key: String,
}

impl PdfCoClient {
    pub fn new(config: &CompressionConfig) -> RemoteResult<Self> {
        let api_key = config
            .api_key
            .clone()
            .filter(|key| !key.trim().is_empty())
            .ok_or_else(|| {
                RemoteError::new(
                    RemoteStage::Upload,
                    "no API key configured (set SCANMATE_API_KEY)",
                )
            })?;
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .user_agent(concat!("scanmate/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| RemoteError::new(RemoteStage::Upload, e.to_string()))?;

        Ok(Self {
            client,
            base_url: config.api_base.trim_end_matches('/').to_string(),
            api_key,
        })
    }

    fn endpoint(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }
}

impl CompressionService for PdfCoClient {
    fn upload(&self, path: &Path) -> RemoteResult<String> {
        let stage = RemoteStage::Upload;
        let form = multipart::Form::new()
            .file("file", path)
            .map_err(|e| RemoteError::new(stage, format!("cannot read {}: {}", path.display(), e)))?;

        debug!(path = %path.display(), "uploading PDF for compression");
        let response = self
            .client
            .post(self.endpoint(UPLOAD_PATH))
            .header(API_KEY_HEADER, &self.api_key)
            .multipart(form)
            .send()
            .map_err(|e| RemoteError::new(stage, e.to_string()))?;
        let ok = response.status().is_success();
        let body = response
            .text()
            .map_err(|e| RemoteError::new(stage, e.to_string()))?;
        parse_url_response(stage, ok, &body)
    }

    fn compress(&self, url: &str, tier: Quality) -> RemoteResult<String> {
        let stage = RemoteStage::Compress;
        debug!(%tier, "requesting compression");
        let response = self
            .client
            .post(self.endpoint(COMPRESS_PATH))
            .header(API_KEY_HEADER, &self.api_key)
            .json(&compress_request(url, tier))
            .send()
            .map_err(|e| RemoteError::new(stage, e.to_string()))?;
        let ok = response.status().is_success();
        let body = response
            .text()
            .map_err(|e| RemoteError::new(stage, e.to_string()))?;
        parse_url_response(stage, ok, &body)
    }

    fn download(&self, url: &str, dest: &Path) -> RemoteResult<u64> {
        let stage = RemoteStage::Download;
        let response = self
            .client
            .get(url)
            .send()
            .map_err(|e| RemoteError::new(stage, e.to_string()))?;
        let status = response.status();
        if !status.is_success() {
            let body = response.text().unwrap_or_default();
            return Err(RemoteError::new(stage, format!("HTTP {}", status)).with_payload(body));
        }
        let bytes = response
            .bytes()
            .map_err(|e| RemoteError::new(stage, e.to_string()))?;
        files::write_atomic(dest, &bytes).map_err(|e| RemoteError::new(stage, e.to_string()))?;
        info!(bytes = bytes.len(), dest = %dest.display(), "downloaded compressed PDF");
        Ok(bytes.len() as u64)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tier_table() {
        assert_eq!(jpeg_quality(Quality::Low), 30);
        assert_eq!(jpeg_quality(Quality::Medium), 60);
        assert_eq!(jpeg_quality(Quality::High), 80);
    }

    #[test]
    fn test_compress_request_shape() {
        let body = compress_request("https://files/x.pdf", Quality::Medium);
        assert_eq!(body["url"], "https://files/x.pdf");
        assert_eq!(body["async"], false);
        let images = &body["config"]["images"];
        assert_eq!(images["color"]["compression"]["compression_params"]["quality"], 60);
        assert_eq!(images["grayscale"]["compression"]["compression_params"]["quality"], 60);
        assert_eq!(images["color"]["downsample"]["downsample_ppi"], 150);
        assert_eq!(images["monochrome"]["compression"]["compression_format"], "ccitt_g4");
        assert_eq!(images["monochrome"]["downsample"]["threshold_ppi"], 450);
        assert_eq!(body["config"]["save"]["garbage"], 4);
    }

    #[test]
    fn test_parse_url_ok() {
        let url = parse_url_response(RemoteStage::Upload, true, r#"{"url":"https://u"}"#);
        assert_eq!(url.unwrap(), "https://u");
    }

    #[test]
    fn test_parse_error_flag_keeps_payload() {
        let body = r#"{"error":true,"message":"Not enough credits","status":402}"#;
        let err = parse_url_response(RemoteStage::Compress, true, body).unwrap_err();
        assert_eq!(err.stage, RemoteStage::Compress);
        assert_eq!(err.message, "Not enough credits");
        assert_eq!(err.payload.as_deref(), Some(body));
        assert!(err.user_message().contains("Not enough credits"));
    }

    #[test]
    fn test_parse_missing_url_fails() {
        let err = parse_url_response(RemoteStage::Upload, true, "{}").unwrap_err();
        assert_eq!(err.message, "no URL in response");
    }

    #[test]
    fn test_parse_http_failure() {
        let err = parse_url_response(RemoteStage::Upload, false, "Unauthorized").unwrap_err();
        assert_eq!(err.payload.as_deref(), Some("Unauthorized"));
    }

    #[test]
    fn test_client_requires_api_key() {
        let config = CompressionConfig {
            api_key: None,
            ..Default::default()
        };
        assert!(PdfCoClient::new(&config).is_err());
    }
}
