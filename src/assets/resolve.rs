//! Sequential resolution of content hashes to asset ids.
//!
//! Every miss is validated before the first upload starts, so a bad manifest
//! never leaves a half-uploaded run behind. Uploads run one at a time with a
//! fixed delay between them, and each success is persisted before the next.

use std::collections::{HashMap, HashSet};

use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use image::ImageFormat;

use super::cache::AssetCache;
use super::upload::{AssetUploader, UploadRequest, UploadStatus};
use crate::config::UploadConfig;
use crate::{CompileError, Result};

/// A hash some node needs, with the first node that asked for it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UploadJob {
    pub hash: String,
    pub node_id: String,
    pub node_name: String,
}

#[derive(Debug, Clone, Default)]
pub struct ResolveOutcome {
    /// Every requested hash mapped to its asset id.
    pub resolved: HashMap<String, String>,
    /// Hashes uploaded during this run, in upload order.
    pub uploaded: Vec<String>,
    pub cache_hits: usize,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DecodedContent {
    pub bytes: Vec<u8>,
    pub content_type: &'static str,
    pub extension: &'static str,
}

/// Decode base64 raster bytes and sniff their image format.
pub fn decode_raw_content(hash: &str, encoded: &str) -> Result<DecodedContent> {
    let bytes = STANDARD
        .decode(encoded.trim())
        .map_err(|e| CompileError::InvalidRawContent {
            hash: hash.to_string(),
            message: format!("invalid base64: {e}"),
        })?;
    let format = image::guess_format(&bytes).map_err(|e| CompileError::InvalidRawContent {
        hash: hash.to_string(),
        message: e.to_string(),
    })?;
    let (content_type, extension) = match format {
        ImageFormat::Png => ("image/png", "png"),
        ImageFormat::Jpeg => ("image/jpeg", "jpg"),
        ImageFormat::Gif => ("image/gif", "gif"),
        ImageFormat::WebP => ("image/webp", "webp"),
        ImageFormat::Bmp => ("image/bmp", "bmp"),
        ImageFormat::Tga => ("image/tga", "tga"),
        other => {
            return Err(CompileError::InvalidRawContent {
                hash: hash.to_string(),
                message: format!("unsupported image format {other:?}"),
            })
        }
    };
    Ok(DecodedContent {
        bytes,
        content_type,
        extension,
    })
}

/// Resolve every job against the cache, uploading misses in order.
pub async fn resolve_all<U: AssetUploader>(
    jobs: &[UploadJob],
    raw_content: &HashMap<String, String>,
    cache: &mut AssetCache,
    uploader: &U,
    config: &UploadConfig,
) -> Result<ResolveOutcome> {
    let mut outcome = ResolveOutcome::default();
    let mut seen = HashSet::new();
    let mut misses: Vec<(&UploadJob, DecodedContent)> = Vec::new();

    for job in jobs {
        if !seen.insert(job.hash.as_str()) {
            continue;
        }
        if let Some(asset_id) = cache.asset_id(&job.hash) {
            outcome.resolved.insert(job.hash.clone(), asset_id.to_string());
            outcome.cache_hits += 1;
            continue;
        }
        let encoded = raw_content
            .get(&job.hash)
            .ok_or_else(|| CompileError::MissingRawContent {
                hash: job.hash.clone(),
                node: job.node_id.clone(),
            })?;
        misses.push((job, decode_raw_content(&job.hash, encoded)?));
    }

    if misses.is_empty() {
        return Ok(outcome);
    }
    if !uploader.is_available() {
        return Err(CompileError::Config(format!(
            "ROBLOX_API_KEY is required to upload {} assets",
            misses.len()
        )));
    }

    tracing::info!(
        uploads = misses.len(),
        cached = outcome.cache_hits,
        "uploading new rasters"
    );
    for (index, (job, content)) in misses.into_iter().enumerate() {
        if index > 0 && !config.inter_upload_delay.is_zero() {
            tokio::time::sleep(config.inter_upload_delay).await;
        }
        let asset_id = upload_one(job, content, uploader, config).await?;
        cache.insert(&job.hash, &asset_id)?;
        tracing::info!(hash = %job.hash, node = %job.node_id, asset_id = %asset_id, "uploaded raster");
        outcome.resolved.insert(job.hash.clone(), asset_id);
        outcome.uploaded.push(job.hash.clone());
    }
    Ok(outcome)
}

async fn upload_one<U: AssetUploader>(
    job: &UploadJob,
    content: DecodedContent,
    uploader: &U,
    config: &UploadConfig,
) -> Result<String> {
    let request = UploadRequest {
        hash: job.hash.clone(),
        display_name: display_name(&job.node_name, &job.hash),
        content_type: content.content_type,
        extension: content.extension,
        bytes: content.bytes,
    };
    let mut operation = match uploader.create_asset(request).await? {
        UploadStatus::Complete(asset_id) => return Ok(asset_id),
        UploadStatus::Pending(operation) => operation,
    };

    for attempt in 1..=config.max_poll_attempts {
        tokio::time::sleep(config.poll_interval).await;
        tracing::debug!(operation = %operation, attempt, "polling upload operation");
        match uploader.poll_operation(&operation).await? {
            UploadStatus::Complete(asset_id) => return Ok(asset_id),
            UploadStatus::Pending(next) => operation = next,
        }
    }
    Err(CompileError::PollTimeout {
        operation,
        attempts: config.max_poll_attempts,
    })
}

/// Asset names are capped at 50 characters by the store.
fn display_name(node_name: &str, hash: &str) -> String {
    let base = if node_name.trim().is_empty() {
        hash
    } else {
        node_name.trim()
    };
    base.chars().take(50).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;
    use std::time::Duration;

    const PNG_1X1: &str = "iVBORw0KGgoAAAANSUhEUgAAAAEAAAABCAYAAAAfFcSJAAAADUlEQVR42mNkYPhfDwAChwGA60e6kgAAAABJRU5ErkJggg==";

    #[derive(Default)]
    struct ScriptedUploader {
        pending_polls: u32,
        created: RefCell<Vec<String>>,
        polls: RefCell<u32>,
    }

    impl AssetUploader for ScriptedUploader {
        async fn create_asset(&self, request: UploadRequest) -> Result<UploadStatus> {
            self.created.borrow_mut().push(request.hash.clone());
            Ok(UploadStatus::Pending(format!("operations/{}", request.hash)))
        }

        async fn poll_operation(&self, operation: &str) -> Result<UploadStatus> {
            let mut polls = self.polls.borrow_mut();
            *polls += 1;
            if *polls > self.pending_polls {
                *polls = 0;
                Ok(UploadStatus::Complete(format!(
                    "asset-{}",
                    operation.trim_start_matches("operations/")
                )))
            } else {
                Ok(UploadStatus::Pending(operation.to_string()))
            }
        }
    }

    fn fast_config() -> UploadConfig {
        UploadConfig {
            poll_interval: Duration::ZERO,
            inter_upload_delay: Duration::ZERO,
            max_poll_attempts: 3,
            ..UploadConfig::default()
        }
    }

    fn job(hash: &str) -> UploadJob {
        UploadJob {
            hash: hash.into(),
            node_id: format!("node-{hash}"),
            node_name: "Icon".into(),
        }
    }

    fn raw(hashes: &[&str]) -> HashMap<String, String> {
        hashes
            .iter()
            .map(|h| (h.to_string(), PNG_1X1.to_string()))
            .collect()
    }

    #[test]
    fn decode_sniffs_png() {
        let decoded = decode_raw_content("h", PNG_1X1).expect("decode");
        assert_eq!(decoded.content_type, "image/png");
        assert_eq!(decoded.extension, "png");
    }

    #[test]
    fn decode_rejects_non_images() {
        let err = decode_raw_content("h", &STANDARD.encode(b"plain text")).unwrap_err();
        assert!(matches!(err, CompileError::InvalidRawContent { .. }));
        let err = decode_raw_content("h", "***").unwrap_err();
        assert!(matches!(err, CompileError::InvalidRawContent { message, .. } if message.contains("base64")));
    }

    #[tokio::test]
    async fn duplicate_hashes_upload_once_and_cache_serves_the_rest() {
        let uploader = ScriptedUploader::default();
        let mut cache = AssetCache::in_memory();
        let jobs = vec![job("a"), job("b"), job("a")];

        let first = resolve_all(&jobs, &raw(&["a", "b"]), &mut cache, &uploader, &fast_config())
            .await
            .expect("resolve");
        assert_eq!(first.uploaded, vec!["a".to_string(), "b".to_string()]);
        assert_eq!(first.resolved.get("a").map(String::as_str), Some("asset-a"));

        let second = resolve_all(&jobs, &HashMap::new(), &mut cache, &uploader, &fast_config())
            .await
            .expect("resolve again");
        assert!(second.uploaded.is_empty());
        assert_eq!(second.cache_hits, 2);
        assert_eq!(uploader.created.borrow().len(), 2);
    }

    #[tokio::test]
    async fn missing_raw_content_fails_before_any_upload() {
        let uploader = ScriptedUploader::default();
        let mut cache = AssetCache::in_memory();
        let err = resolve_all(
            &[job("a"), job("b")],
            &raw(&["a"]),
            &mut cache,
            &uploader,
            &fast_config(),
        )
        .await
        .unwrap_err();
        assert!(matches!(err, CompileError::MissingRawContent { hash, node } if hash == "b" && node == "node-b"));
        assert!(uploader.created.borrow().is_empty());
        assert!(cache.is_empty());
    }

    #[tokio::test]
    async fn polling_gives_up_after_max_attempts() {
        let uploader = ScriptedUploader {
            pending_polls: 10,
            ..ScriptedUploader::default()
        };
        let mut cache = AssetCache::in_memory();
        let err = resolve_all(&[job("a")], &raw(&["a"]), &mut cache, &uploader, &fast_config())
            .await
            .unwrap_err();
        assert!(matches!(err, CompileError::PollTimeout { attempts: 3, .. }));
        assert_eq!(*uploader.polls.borrow(), 3);
        assert!(cache.is_empty());
    }

    #[tokio::test]
    async fn pending_then_complete_within_budget() {
        let uploader = ScriptedUploader {
            pending_polls: 2,
            ..ScriptedUploader::default()
        };
        let mut cache = AssetCache::in_memory();
        let outcome = resolve_all(&[job("a")], &raw(&["a"]), &mut cache, &uploader, &fast_config())
            .await
            .expect("resolve");
        assert_eq!(outcome.resolved.get("a").map(String::as_str), Some("asset-a"));
        assert_eq!(cache.asset_id("a"), Some("asset-a"));
    }

    #[tokio::test]
    async fn unavailable_uploader_reports_count() {
        let mut cache = AssetCache::in_memory();
        let err = resolve_all(
            &[job("a"), job("b")],
            &raw(&["a", "b"]),
            &mut cache,
            &super::super::NoUploader,
            &fast_config(),
        )
        .await
        .unwrap_err();
        assert!(matches!(err, CompileError::Config(msg) if msg.contains("upload 2 assets")));
    }

    #[test]
    fn display_name_is_trimmed_and_capped() {
        assert_eq!(display_name("  Logo ", "h"), "Logo");
        assert_eq!(display_name("", "hash"), "hash");
        assert_eq!(display_name(&"x".repeat(80), "h").len(), 50);
    }
}
