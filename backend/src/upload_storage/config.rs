//! Storage configuration selected from the process environment

use std::env;
use std::time::Duration;

use aws_config::{retry::RetryConfig, timeout::TimeoutConfig, BehaviorVersion, Region};
use aws_sdk_s3::{
    config::{Credentials, RequestChecksumCalculation},
    types::ObjectCannedAcl,
};
use tracing::warn;

use super::{StorageError, StorageResult};

const DEFAULT_REGION: &str = "auto";

/// Connection details for the bucket that receives direct uploads.
///
/// Exactly one variant is active per process. The generic S3 set wins when
/// both sets are present in the environment.
#[derive(Clone, PartialEq, Eq)]
pub enum StorageConfig {
    /// Any S3-compatible endpoint (`S3_*` variables)
    S3Compatible {
        /// Endpoint URL, e.g. `https://s3.eu-central-1.amazonaws.com`
        endpoint: String,
        /// Access key id
        access_key_id: String,
        /// Secret access key
        secret_access_key: String,
        /// Signing region, `auto` when unset
        region: String,
        /// Target bucket
        bucket_name: String,
        /// Public base URL for uploaded objects
        public_url: Option<String>,
    },
    /// Cloudflare R2 (`R2_*` variables)
    R2 {
        /// Cloudflare account id, used to build the endpoint
        account_id: String,
        /// Access key id
        access_key_id: String,
        /// Secret access key
        secret_access_key: String,
        /// Target bucket
        bucket_name: String,
        /// Public base URL for uploaded objects (r2.dev or custom domain)
        public_url: Option<String>,
    },
}

// Secrets stay out of logs.
impl std::fmt::Debug for StorageConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::S3Compatible {
                endpoint,
                region,
                bucket_name,
                ..
            } => f
                .debug_struct("S3Compatible")
                .field("endpoint", endpoint)
                .field("region", region)
                .field("bucket_name", bucket_name)
                .finish_non_exhaustive(),
            Self::R2 {
                account_id,
                bucket_name,
                ..
            } => f
                .debug_struct("R2")
                .field("account_id", account_id)
                .field("bucket_name", bucket_name)
                .finish_non_exhaustive(),
        }
    }
}

impl StorageConfig {
    /// Reads the storage configuration from environment variables
    ///
    /// Returns `Ok(None)` when neither variable set is present, which disables
    /// uploads for the lifetime of the process.
    ///
    /// # Errors
    ///
    /// Returns `StorageError::ConfigError` when a set is selected but is
    /// missing its secret key or bucket name
    pub fn from_env() -> StorageResult<Option<Self>> {
        Self::from_lookup(|name| env::var(name).ok())
    }

    /// Same as [`Self::from_env`] but reads variables through `lookup`
    ///
    /// Empty values are treated as unset.
    ///
    /// # Errors
    ///
    /// See [`Self::from_env`]
    pub fn from_lookup<F>(lookup: F) -> StorageResult<Option<Self>>
    where
        F: Fn(&str) -> Option<String>,
    {
        let var = |name: &str| lookup(name).filter(|value| !value.trim().is_empty());
        let require = |name: &str| {
            var(name).ok_or_else(|| {
                StorageError::ConfigError(format!("{name} environment variable is not set"))
            })
        };

        let s3_selected = var("S3_ENDPOINT").is_some() && var("S3_ACCESS_KEY_ID").is_some();
        let r2_selected = var("R2_ACCOUNT_ID").is_some() && var("R2_ACCESS_KEY_ID").is_some();

        if s3_selected {
            if r2_selected {
                warn!("Both S3_* and R2_* storage variables are set, using S3_*");
            }

            return Ok(Some(Self::S3Compatible {
                endpoint: require("S3_ENDPOINT")?,
                access_key_id: require("S3_ACCESS_KEY_ID")?,
                secret_access_key: require("S3_SECRET_ACCESS_KEY")?,
                region: var("S3_REGION").unwrap_or_else(|| DEFAULT_REGION.to_string()),
                bucket_name: require("S3_BUCKET_NAME")?,
                public_url: var("S3_PUBLIC_URL"),
            }));
        }

        if r2_selected {
            return Ok(Some(Self::R2 {
                account_id: require("R2_ACCOUNT_ID")?,
                access_key_id: require("R2_ACCESS_KEY_ID")?,
                secret_access_key: require("R2_SECRET_ACCESS_KEY")?,
                bucket_name: require("R2_BUCKET_NAME")?,
                public_url: var("R2_PUBLIC_URL"),
            }));
        }

        Ok(None)
    }

    /// Endpoint URL the SDK signs against
    #[must_use]
    pub fn endpoint(&self) -> String {
        match self {
            Self::S3Compatible { endpoint, .. } => endpoint.trim_end_matches('/').to_string(),
            Self::R2 { account_id, .. } => format!("https://{account_id}.r2.cloudflarestorage.com"),
        }
    }

    /// Signing region
    #[must_use]
    pub fn region(&self) -> &str {
        match self {
            Self::S3Compatible { region, .. } => region,
            Self::R2 { .. } => DEFAULT_REGION,
        }
    }

    /// Target bucket name
    #[must_use]
    pub fn bucket_name(&self) -> &str {
        match self {
            Self::S3Compatible { bucket_name, .. } | Self::R2 { bucket_name, .. } => bucket_name,
        }
    }

    /// Root under which uploaded objects are publicly retrievable, without a
    /// trailing slash
    #[must_use]
    pub fn public_base_url(&self) -> String {
        let base = match self {
            Self::S3Compatible {
                public_url: Some(url),
                ..
            }
            | Self::R2 {
                public_url: Some(url),
                ..
            } => url.clone(),
            Self::S3Compatible {
                public_url: None, ..
            } => self.endpoint(),
            Self::R2 {
                public_url: None,
                bucket_name,
                ..
            } => format!("{}/{bucket_name}", self.endpoint()),
        };

        base.trim_end_matches('/').to_string()
    }

    /// Canned ACL attached to uploads
    ///
    /// R2 does not implement object ACLs, so nothing is sent there.
    #[must_use]
    pub fn object_acl(&self) -> Option<ObjectCannedAcl> {
        match self {
            Self::S3Compatible { .. } => Some(ObjectCannedAcl::PublicRead),
            Self::R2 { .. } => None,
        }
    }

    /// Short label used in logs and the health endpoint
    #[must_use]
    pub const fn provider(&self) -> &'static str {
        match self {
            Self::S3Compatible { .. } => "s3",
            Self::R2 { .. } => "r2",
        }
    }

    /// S3 client configuration with static credentials, retry and timeout
    /// settings
    pub async fn s3_client_config(&self) -> aws_sdk_s3::Config {
        let (access_key_id, secret_access_key) = match self {
            Self::S3Compatible {
                access_key_id,
                secret_access_key,
                ..
            }
            | Self::R2 {
                access_key_id,
                secret_access_key,
                ..
            } => (access_key_id.clone(), secret_access_key.clone()),
        };

        let retry_config = RetryConfig::standard()
            .with_max_attempts(3)
            .with_initial_backoff(Duration::from_millis(50));

        let timeout_config = TimeoutConfig::builder()
            .operation_timeout(Duration::from_secs(30))
            .build();

        let aws_config = aws_config::defaults(BehaviorVersion::latest())
            .region(Region::new(self.region().to_string()))
            .endpoint_url(self.endpoint())
            .credentials_provider(Credentials::new(
                access_key_id,
                secret_access_key,
                None,
                None,
                "static",
            ))
            .retry_config(retry_config)
            .timeout_config(timeout_config)
            .load()
            .await;

        // Custom endpoints (MinIO, R2, ...) do not all resolve bucket subdomains.
        // Browsers cannot compute SDK checksums, so none are signed into the URL.
        aws_sdk_s3::config::Builder::from(&aws_config)
            .force_path_style(true)
            .request_checksum_calculation(RequestChecksumCalculation::WhenRequired)
            .build()
    }
}
