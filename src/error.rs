use reqwest::StatusCode;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use url::ParseError;

#[derive(Debug, Error)]
pub enum CompileError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    #[error("Invalid URL: {0}")]
    InvalidUrl(#[from] ParseError),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Malformed manifest: {0}")]
    MalformedManifest(String),

    #[error("Raw content missing for content hash {hash} (node {node})")]
    MissingRawContent { hash: String, node: String },

    #[error("Raw content for content hash {hash} is not a supported image: {message}")]
    InvalidRawContent { hash: String, message: String },

    #[error("Upload failed (status: {status:?}): {message}")]
    Upload {
        status: Option<StatusCode>,
        message: String,
    },

    #[error("Upload operation {operation} did not complete after {attempts} polls")]
    PollTimeout { operation: String, attempts: u32 },

    #[error("Configuration error: {0}")]
    Config(String),
}

impl CompileError {
    pub fn upload(status: Option<StatusCode>, message: impl Into<String>) -> Self {
        CompileError::Upload {
            status,
            message: message.into(),
        }
    }

    pub fn malformed(message: impl Into<String>) -> Self {
        CompileError::MalformedManifest(message.into())
    }

    pub fn to_payload(&self) -> ErrorPayload {
        match self {
            CompileError::Io(e) => ErrorPayload::new(
                ErrorCategory::Config,
                e.to_string(),
                "Check file paths/permissions.",
            ),
            CompileError::Network(e) => ErrorPayload::new(
                ErrorCategory::Network,
                e.to_string(),
                "Check connectivity/proxy/VPN and retry.",
            ),
            CompileError::InvalidUrl(e) => ErrorPayload::new(
                ErrorCategory::Config,
                e.to_string(),
                "Verify upload.base_url in the config (e.g., https://apis.roblox.com).",
            ),
            CompileError::Serialization(e) => ErrorPayload::new(
                ErrorCategory::Manifest,
                e.to_string(),
                "Check the JSON inputs (manifest, snapshot, cache); re-run the export if the file is truncated.",
            ),
            CompileError::MalformedManifest(msg) => ErrorPayload::new(
                ErrorCategory::Manifest,
                msg.to_string(),
                "Re-run the plugin export; the manifest must contain a root node.",
            ),
            CompileError::MissingRawContent { .. } => ErrorPayload::new(
                ErrorCategory::Asset,
                self.to_string(),
                "Re-export from the plugin so every unresolved hash ships its raw pixels, or restore the asset cache file.",
            ),
            CompileError::InvalidRawContent { .. } => ErrorPayload::new(
                ErrorCategory::Asset,
                self.to_string(),
                "Raw content must be base64-encoded PNG/JPEG/GIF/WebP/BMP/TGA bytes.",
            ),
            CompileError::Upload { status, message } => ErrorPayload::new(
                ErrorCategory::Upload,
                format!("Upload failed (status {:?}): {}", status, message),
                "Check ROBLOX_API_KEY scopes, creator id and rate limits; retry after waiting.",
            ),
            CompileError::PollTimeout { .. } => ErrorPayload::new(
                ErrorCategory::Upload,
                self.to_string(),
                "Increase upload.max_poll_attempts or upload.poll_interval; moderation can delay asset creation.",
            ),
            CompileError::Config(msg) => {
                let lower = msg.to_ascii_lowercase();
                if lower.contains("roblox_api_key") || lower.contains("api key") {
                    ErrorPayload::new(
                        ErrorCategory::Config,
                        msg.to_string(),
                        "Set ROBLOX_API_KEY (Open Cloud key with asset:write) before compiling designs with new images.",
                    )
                } else if lower.contains("creator") {
                    ErrorPayload::new(
                        ErrorCategory::Config,
                        msg.to_string(),
                        "Set upload.creator in the config or ROBLOX_CREATOR_ID / ROBLOX_GROUP_ID in the environment.",
                    )
                } else if lower.contains("regex") || lower.contains("pattern") {
                    ErrorPayload::new(
                        ErrorCategory::Config,
                        msg.to_string(),
                        "Fix the pattern in [classification] or [[overrides]]; patterns use Rust regex syntax.",
                    )
                } else {
                    ErrorPayload::new(
                        ErrorCategory::Config,
                        msg.to_string(),
                        "Check flags/paths and the config file.",
                    )
                }
            }
        }
    }
}

pub type Result<T> = std::result::Result<T, CompileError>;

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum ErrorCategory {
    Config,
    Network,
    Manifest,
    Asset,
    Upload,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ErrorPayload {
    pub category: ErrorCategory,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub remediation: Option<String>,
}

impl ErrorPayload {
    pub fn new(category: ErrorCategory, message: String, remediation: impl Into<String>) -> Self {
        Self {
            category,
            message,
            remediation: Some(remediation.into()),
        }
    }
}
