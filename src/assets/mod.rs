//! Raster content: hashing, the persistent asset cache, and uploads.

pub mod cache;
pub mod hash;
pub mod resolve;
pub mod upload;

pub use cache::{AssetCache, CacheEntry};
pub use hash::{background_hash, content_hash_for};
pub use resolve::{decode_raw_content, resolve_all, DecodedContent, ResolveOutcome, UploadJob};
pub use upload::{AssetUploader, EnvUploader, NoUploader, OpenCloudClient, UploadRequest, UploadStatus};
