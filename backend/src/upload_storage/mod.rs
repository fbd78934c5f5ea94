//! Direct-to-bucket uploads: key derivation and URL signing
mod config;
mod error;
mod s3;

use std::collections::BTreeMap;
use std::sync::{Arc, LazyLock};

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use regex::Regex;

pub use config::StorageConfig;
pub use error::{StorageError, StorageResult};
pub use s3::S3UploadSigner;

/// Default lifetime of an issued upload URL
pub const PRESIGNED_URL_EXPIRY_SECS: u64 = 60 * 60;

/// Longest lifetime SigV4 accepts for a presigned URL (one week)
pub const MAX_PRESIGNED_URL_EXPIRY_SECS: u64 = 7 * 24 * 60 * 60;

/// Prefix shared by every uploaded object
pub const UPLOAD_KEY_PREFIX: &str = "uploads";

static WHITESPACE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\s+").expect("Invalid regex"));

/// Presigned URL with expiration information
#[derive(Debug, Clone)]
pub struct PresignedUrl {
    /// The presigned URL for PUT operations
    pub url: String,
    /// Headers covered by the signature, lowercase names; the PUT must carry
    /// them verbatim
    pub headers: BTreeMap<String, String>,
    /// UTC instant when the URL expires
    pub expires_at: DateTime<Utc>,
}

/// Capability to authorize a single object upload without sharing credentials
#[async_trait]
pub trait ObjectStorageSigner: Send + Sync {
    /// Signs a PUT of `key` with `content_type`
    async fn presign_put(&self, key: &str, content_type: &str) -> StorageResult<PresignedUrl>;

    /// Public URL under which `key` is retrievable once uploaded
    fn public_url(&self, key: &str) -> String;
}

/// Signer shared by all request handlers
pub type SharedSigner = Arc<dyn ObjectStorageSigner>;

/// URLs handed to a client for one upload
#[derive(Debug, Clone)]
pub struct UploadUrls {
    /// Object key inside the bucket
    pub key: String,
    /// Signed, time-limited PUT URL
    pub upload_url: String,
    /// Headers the PUT to `upload_url` must send
    pub upload_headers: BTreeMap<String, String>,
    /// Stable public URL of the object
    pub file_url: String,
    /// When `upload_url` stops being accepted
    pub expires_at: DateTime<Utc>,
}

/// Replaces each run of whitespace with a single hyphen
#[must_use]
pub fn normalize_file_name(file_name: &str) -> String {
    WHITESPACE.replace_all(file_name, "-").into_owned()
}

/// Builds `uploads/<epoch_millis>-<normalized file name>`
#[must_use]
pub fn object_key(file_name: &str, epoch_millis: i64) -> String {
    format!(
        "{UPLOAD_KEY_PREFIX}/{epoch_millis}-{}",
        normalize_file_name(file_name)
    )
}

/// Issues upload URLs for `file_name`, keyed on the current time
///
/// # Errors
///
/// Propagates any `StorageError` from the signer
pub async fn issue_upload_url(
    signer: &dyn ObjectStorageSigner,
    file_name: &str,
    file_type: &str,
) -> StorageResult<UploadUrls> {
    issue_upload_url_at(signer, file_name, file_type, Utc::now().timestamp_millis()).await
}

/// Issues upload URLs for `file_name` keyed on `epoch_millis`
///
/// # Errors
///
/// Propagates any `StorageError` from the signer
pub async fn issue_upload_url_at(
    signer: &dyn ObjectStorageSigner,
    file_name: &str,
    file_type: &str,
    epoch_millis: i64,
) -> StorageResult<UploadUrls> {
    let key = object_key(file_name, epoch_millis);
    let presigned = signer.presign_put(&key, file_type).await?;
    let file_url = signer.public_url(&key);

    Ok(UploadUrls {
        key,
        upload_url: presigned.url,
        upload_headers: presigned.headers,
        file_url,
        expires_at: presigned.expires_at,
    })
}
