use std::collections::BTreeMap;
use std::sync::{
    atomic::{AtomicUsize, Ordering},
    Arc,
};

use async_trait::async_trait;
use chrono::Utc;
use travel_backend::upload_storage::{
    ObjectStorageSigner, PresignedUrl, SharedSigner, StorageError, StorageResult,
};

pub const FAKE_SIGNER_HOST: &str = "https://signer.test";
pub const FAKE_BUCKET: &str = "travel-images";
pub const FAKE_PUBLIC_BASE: &str = "https://cdn.test";

/// Path-style signer that never leaves the process and counts its calls
#[derive(Default)]
pub struct FakeSigner {
    calls: AtomicUsize,
}

impl FakeSigner {
    pub fn shared() -> (Arc<Self>, SharedSigner) {
        let signer = Arc::new(Self::default());
        let shared: SharedSigner = signer.clone();
        (signer, shared)
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl ObjectStorageSigner for FakeSigner {
    async fn presign_put(&self, key: &str, content_type: &str) -> StorageResult<PresignedUrl> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        Ok(PresignedUrl {
            url: format!(
                "{FAKE_SIGNER_HOST}/{FAKE_BUCKET}/{key}?content-type={content_type}&X-Amz-Expires=3600&X-Amz-Signature=deadbeef"
            ),
            headers: BTreeMap::from([("content-type".to_string(), content_type.to_string())]),
            expires_at: Utc::now() + chrono::Duration::seconds(3600),
        })
    }

    fn public_url(&self, key: &str) -> String {
        format!("{FAKE_PUBLIC_BASE}/{key}")
    }
}

/// Signer whose every call fails, like a malformed bucket or bad credentials
pub struct FailingSigner;

#[async_trait]
impl ObjectStorageSigner for FailingSigner {
    async fn presign_put(&self, _key: &str, _content_type: &str) -> StorageResult<PresignedUrl> {
        Err(StorageError::S3Error(
            "InvalidAccessKeyId: The AWS Access Key Id you provided does not exist".to_string(),
        ))
    }

    fn public_url(&self, key: &str) -> String {
        format!("{FAKE_PUBLIC_BASE}/{key}")
    }
}
