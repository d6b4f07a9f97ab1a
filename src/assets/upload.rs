//! Remote asset store: create an asset, then poll its operation.

use reqwest::multipart::{Form, Part};
use reqwest::{header::RETRY_AFTER, Client, RequestBuilder, StatusCode};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use url::Url;

use crate::config::{Creator, UploadConfig};
use crate::{CompileError, Result};

const API_KEY_HEADER: &str = "x-api-key";

/// Outcome of a create or poll call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UploadStatus {
    Complete(String),
    /// Still processing; carries the operation path to poll.
    Pending(String),
}

#[derive(Debug, Clone)]
pub struct UploadRequest {
    pub hash: String,
    pub display_name: String,
    pub content_type: &'static str,
    pub extension: &'static str,
    pub bytes: Vec<u8>,
}

#[allow(async_fn_in_trait)]
pub trait AssetUploader {
    /// Whether uploads can happen at all (credentials present).
    fn is_available(&self) -> bool {
        true
    }

    async fn create_asset(&self, request: UploadRequest) -> Result<UploadStatus>;

    async fn poll_operation(&self, operation: &str) -> Result<UploadStatus>;
}

/// Stand-in when no credentials are configured; every call is a config error.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoUploader;

impl AssetUploader for NoUploader {
    fn is_available(&self) -> bool {
        false
    }

    async fn create_asset(&self, request: UploadRequest) -> Result<UploadStatus> {
        Err(CompileError::Config(format!(
            "ROBLOX_API_KEY is required to upload asset {}",
            request.hash
        )))
    }

    async fn poll_operation(&self, operation: &str) -> Result<UploadStatus> {
        Err(CompileError::Config(format!(
            "ROBLOX_API_KEY is required to poll {operation}"
        )))
    }
}

#[derive(Debug, Clone)]
pub struct OpenCloudClient {
    http: Client,
    api_key: String,
    base_url: Url,
    asset_type: String,
    creator: Creator,
}

impl OpenCloudClient {
    pub fn new(api_key: impl Into<String>, creator: Creator, config: &UploadConfig) -> Result<Self> {
        let base_url = Url::parse(&config.base_url)?;
        let http = Client::builder()
            .timeout(config.timeout)
            .build()
            .map_err(CompileError::Network)?;
        Ok(Self {
            http,
            api_key: api_key.into(),
            base_url,
            asset_type: config.asset_type.clone(),
            creator,
        })
    }

    /// Build from `ROBLOX_API_KEY`; `Ok(None)` when the key is absent.
    pub fn from_env(config: &UploadConfig) -> Result<Option<Self>> {
        let Some(api_key) = std::env::var("ROBLOX_API_KEY")
            .ok()
            .filter(|key| !key.is_empty())
        else {
            return Ok(None);
        };
        let creator = config
            .creator
            .clone()
            .or_else(Creator::from_env)
            .ok_or_else(|| {
                CompileError::Config(
                    "no upload creator configured (upload.creator, ROBLOX_CREATOR_ID or ROBLOX_GROUP_ID)"
                        .into(),
                )
            })?;
        Self::new(api_key, creator, config).map(Some)
    }

    fn endpoint(&self, path: &str) -> Result<Url> {
        self.base_url.join(path).map_err(CompileError::InvalidUrl)
    }

    fn authed(&self, builder: RequestBuilder) -> RequestBuilder {
        builder.header(API_KEY_HEADER, &self.api_key)
    }

    fn request_metadata(&self, request: &UploadRequest) -> AssetCreateRequest {
        let creator = match &self.creator {
            Creator::UserId(id) => CreatorRef {
                user_id: Some(id.clone()),
                group_id: None,
            },
            Creator::GroupId(id) => CreatorRef {
                user_id: None,
                group_id: Some(id.clone()),
            },
        };
        AssetCreateRequest {
            asset_type: self.asset_type.clone(),
            display_name: request.display_name.clone(),
            description: format!("figrbx raster {}", request.hash),
            creation_context: CreationContext { creator },
        }
    }

    async fn send_json<T: DeserializeOwned>(&self, request: RequestBuilder) -> Result<T> {
        let response = request.send().await.map_err(CompileError::Network)?;
        let status = response.status();
        let retry_after = response
            .headers()
            .get(RETRY_AFTER)
            .and_then(|value| value.to_str().ok())
            .map(str::to_owned);

        let body = response.text().await.unwrap_or_default();

        if status.is_success() {
            return serde_json::from_str(&body).map_err(CompileError::Serialization);
        }

        Err(CompileError::upload(
            Some(status),
            error_message(status, &body, retry_after.as_deref()),
        ))
    }
}

impl AssetUploader for OpenCloudClient {
    async fn create_asset(&self, request: UploadRequest) -> Result<UploadStatus> {
        let url = self.endpoint("/assets/v1/assets")?;
        let metadata = serde_json::to_string(&self.request_metadata(&request))?;
        let file = Part::bytes(request.bytes)
            .file_name(format!("{}.{}", request.hash, request.extension))
            .mime_str(request.content_type)
            .map_err(CompileError::Network)?;
        let form = Form::new().text("request", metadata).part("fileContent", file);

        let operation: Operation = self
            .send_json(self.authed(self.http.post(url)).multipart(form))
            .await?;
        operation.into_status()
    }

    async fn poll_operation(&self, operation: &str) -> Result<UploadStatus> {
        let url = self.endpoint(&format!("/assets/v1/{}", operation.trim_start_matches('/')))?;
        let operation: Operation = self.send_json(self.authed(self.http.get(url))).await?;
        operation.into_status()
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct AssetCreateRequest {
    asset_type: String,
    display_name: String,
    description: String,
    creation_context: CreationContext,
}

#[derive(Debug, Serialize)]
struct CreationContext {
    creator: CreatorRef,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct CreatorRef {
    #[serde(skip_serializing_if = "Option::is_none")]
    user_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    group_id: Option<String>,
}

#[derive(Debug, Deserialize)]
struct Operation {
    #[serde(default)]
    path: String,
    #[serde(default)]
    done: bool,
    #[serde(default)]
    response: Option<OperationResponse>,
    #[serde(default)]
    error: Option<OperationError>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct OperationResponse {
    #[serde(default)]
    asset_id: Option<Value>,
}

#[derive(Debug, Deserialize)]
struct OperationError {
    #[serde(default)]
    code: Option<Value>,
    #[serde(default)]
    message: String,
}

impl Operation {
    fn into_status(self) -> Result<UploadStatus> {
        if let Some(error) = self.error {
            let code = error.code.map(|c| format!(" ({c})")).unwrap_or_default();
            return Err(CompileError::upload(
                None,
                format!("operation {} failed{}: {}", self.path, code, error.message),
            ));
        }
        if !self.done {
            if self.path.is_empty() {
                return Err(CompileError::upload(
                    None,
                    "pending operation returned without a path",
                ));
            }
            return Ok(UploadStatus::Pending(self.path));
        }
        let asset_id = self
            .response
            .and_then(|r| r.asset_id)
            .and_then(|id| match id {
                Value::String(s) if !s.is_empty() => Some(s),
                Value::Number(n) => Some(n.to_string()),
                _ => None,
            })
            .ok_or_else(|| {
                CompileError::upload(
                    None,
                    format!("operation {} completed without an asset id", self.path),
                )
            })?;
        Ok(UploadStatus::Complete(asset_id))
    }
}

fn error_message(status: StatusCode, body: &str, retry_after: Option<&str>) -> String {
    let fallback = format!("Open Cloud returned status {}", status.as_u16());
    let parsed = serde_json::from_str::<Value>(body).ok();
    let from_body = parsed
        .as_ref()
        .and_then(|value| value.get("message").or_else(|| value.get("error")))
        .and_then(Value::as_str)
        .map(str::to_owned);

    match (status, retry_after, from_body) {
        (StatusCode::TOO_MANY_REQUESTS, Some(retry), Some(msg)) => {
            format!("{msg} (rate limited, retry after {retry}s)")
        }
        (StatusCode::TOO_MANY_REQUESTS, Some(retry), None) => {
            format!("rate limited by Open Cloud, retry after {retry}s")
        }
        (_, _, Some(msg)) => msg,
        _ => fallback,
    }
}

/// The uploader a CLI run uses: Open Cloud when `ROBLOX_API_KEY` is set,
/// otherwise disabled so cache-only runs still work.
#[derive(Debug, Clone)]
pub enum EnvUploader {
    OpenCloud(OpenCloudClient),
    Disabled(NoUploader),
}

impl EnvUploader {
    pub fn from_env(config: &UploadConfig) -> Result<Self> {
        Ok(match OpenCloudClient::from_env(config)? {
            Some(client) => EnvUploader::OpenCloud(client),
            None => EnvUploader::Disabled(NoUploader),
        })
    }
}

impl AssetUploader for EnvUploader {
    fn is_available(&self) -> bool {
        match self {
            EnvUploader::OpenCloud(client) => client.is_available(),
            EnvUploader::Disabled(none) => none.is_available(),
        }
    }

    async fn create_asset(&self, request: UploadRequest) -> Result<UploadStatus> {
        match self {
            EnvUploader::OpenCloud(client) => client.create_asset(request).await,
            EnvUploader::Disabled(none) => none.create_asset(request).await,
        }
    }

    async fn poll_operation(&self, operation: &str) -> Result<UploadStatus> {
        match self {
            EnvUploader::OpenCloud(client) => client.poll_operation(operation).await,
            EnvUploader::Disabled(none) => none.poll_operation(operation).await,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn operation(json: &str) -> Operation {
        serde_json::from_str(json).expect("parse operation")
    }

    #[test]
    fn done_operation_yields_asset_id() {
        let status = operation(
            r#"{ "path": "operations/abc", "done": true,
                 "response": { "assetId": "123456", "displayName": "Logo" } }"#,
        )
        .into_status()
        .expect("status");
        assert_eq!(status, UploadStatus::Complete("123456".into()));
    }

    #[test]
    fn numeric_asset_id_is_accepted() {
        let status = operation(r#"{ "path": "operations/abc", "done": true, "response": { "assetId": 42 } }"#)
            .into_status()
            .expect("status");
        assert_eq!(status, UploadStatus::Complete("42".into()));
    }

    #[test]
    fn pending_operation_returns_path() {
        let status = operation(r#"{ "path": "operations/abc" }"#)
            .into_status()
            .expect("status");
        assert_eq!(status, UploadStatus::Pending("operations/abc".into()));
    }

    #[test]
    fn operation_error_is_an_upload_error() {
        let err = operation(
            r#"{ "path": "operations/abc", "done": true,
                 "error": { "code": "INVALID_ARGUMENT", "message": "image rejected" } }"#,
        )
        .into_status()
        .unwrap_err();
        assert!(matches!(err, CompileError::Upload { message, .. } if message.contains("image rejected")));
    }

    #[test]
    fn rate_limit_message_includes_retry_after() {
        let msg = error_message(
            StatusCode::TOO_MANY_REQUESTS,
            r#"{ "message": "Too many requests" }"#,
            Some("30"),
        );
        assert_eq!(msg, "Too many requests (rate limited, retry after 30s)");
        assert_eq!(
            error_message(StatusCode::BAD_GATEWAY, "", None),
            "Open Cloud returned status 502"
        );
    }

    #[test]
    fn metadata_names_the_configured_creator() {
        let client = OpenCloudClient::new(
            "key",
            Creator::GroupId("77".into()),
            &UploadConfig::default(),
        )
        .expect("client");
        let request = UploadRequest {
            hash: "h1".into(),
            display_name: "Logo".into(),
            content_type: "image/png",
            extension: "png",
            bytes: vec![],
        };
        let json = serde_json::to_value(client.request_metadata(&request)).expect("json");
        assert_eq!(json["assetType"], "Decal");
        assert_eq!(json["creationContext"]["creator"]["groupId"], "77");
        assert!(json["creationContext"]["creator"].get("userId").is_none());
    }

    #[tokio::test]
    async fn no_uploader_refuses_with_config_error() {
        assert!(!NoUploader.is_available());
        let err = NoUploader.poll_operation("operations/x").await.unwrap_err();
        assert!(matches!(err, CompileError::Config(msg) if msg.contains("ROBLOX_API_KEY")));
    }
}
