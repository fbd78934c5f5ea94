//! Presigned PUT URLs against an S3-compatible endpoint

use std::collections::BTreeMap;
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use aws_sdk_s3::{presigning::PresigningConfig, types::ObjectCannedAcl, Client as S3Client};
use chrono::{DateTime, Utc};
use percent_encoding::{utf8_percent_encode, AsciiSet, NON_ALPHANUMERIC};
use tracing::{debug, info};

use super::{ObjectStorageSigner, PresignedUrl, StorageConfig, StorageError, StorageResult};

/// Characters left as-is in a key segment of the public URL (RFC 3986 unreserved)
const KEY_SEGMENT: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'.')
    .remove(b'_')
    .remove(b'~');

/// Signs uploads with the AWS SDK for either the generic S3 or the R2 setup
pub struct S3UploadSigner {
    s3_client: Arc<S3Client>,
    bucket_name: String,
    public_base_url: String,
    object_acl: Option<ObjectCannedAcl>,
    presigned_url_expiry_secs: u64,
}

impl S3UploadSigner {
    /// Creates a new signer
    ///
    /// # Arguments
    ///
    /// * `s3_client` - Pre-configured S3 client
    /// * `bucket_name` - Bucket the uploads land in
    /// * `public_base_url` - Public root for uploaded objects, without trailing slash
    /// * `object_acl` - Canned ACL signed into the request, if any
    /// * `presigned_url_expiry_secs` - Lifetime of each issued URL
    #[must_use]
    pub const fn new(
        s3_client: Arc<S3Client>,
        bucket_name: String,
        public_base_url: String,
        object_acl: Option<ObjectCannedAcl>,
        presigned_url_expiry_secs: u64,
    ) -> Self {
        Self {
            s3_client,
            bucket_name,
            public_base_url,
            object_acl,
            presigned_url_expiry_secs,
        }
    }

    /// Builds the signer and its S3 client from a storage configuration
    pub async fn from_config(config: &StorageConfig, presigned_url_expiry_secs: u64) -> Self {
        let s3_client = Arc::new(S3Client::from_conf(config.s3_client_config().await));

        info!(
            provider = config.provider(),
            bucket = config.bucket_name(),
            "Initialized upload signer with {presigned_url_expiry_secs}s URL expiry"
        );

        Self::new(
            s3_client,
            config.bucket_name().to_string(),
            config.public_base_url(),
            config.object_acl(),
            presigned_url_expiry_secs,
        )
    }
}

#[async_trait]
impl ObjectStorageSigner for S3UploadSigner {
    /// Generates a presigned URL for a PUT of `key` with the given content type
    ///
    /// # Errors
    ///
    /// Returns `StorageError::ConfigError` if the presigning config is rejected
    /// Returns `StorageError::S3Error` if the SDK fails to sign the request
    async fn presign_put(&self, key: &str, content_type: &str) -> StorageResult<PresignedUrl> {
        debug!("Generating presigned URL for object: {key} ({content_type})");

        let presigned_config =
            PresigningConfig::expires_in(Duration::from_secs(self.presigned_url_expiry_secs))
                .map_err(|e| {
                    StorageError::ConfigError(format!("Failed to create presigning config: {e}"))
                })?;

        let put_request = self
            .s3_client
            .put_object()
            .bucket(&self.bucket_name)
            .key(key)
            .content_type(content_type)
            .set_acl(self.object_acl.clone());

        let presigned_request = put_request
            .presigned(presigned_config)
            .await
            .map_err(|e| StorageError::S3Error(format!("Failed to generate presigned URL: {e}")))?;

        let expires_at: DateTime<Utc> =
            Utc::now() + Duration::from_secs(self.presigned_url_expiry_secs);

        debug!("Generated presigned URL for object: {key} expires at: {expires_at}");

        // Signed headers (content-type, x-amz-acl) the uploader must replay
        let headers: BTreeMap<String, String> = presigned_request
            .headers()
            .map(|(name, value)| (name.to_ascii_lowercase(), value.to_string()))
            .collect();

        Ok(PresignedUrl {
            url: presigned_request.uri().to_string(),
            headers,
            expires_at,
        })
    }

    fn public_url(&self, key: &str) -> String {
        let encoded_key = key
            .split('/')
            .map(|segment| utf8_percent_encode(segment, KEY_SEGMENT).to_string())
            .collect::<Vec<_>>()
            .join("/");

        format!("{}/{encoded_key}", self.public_base_url)
    }
}
