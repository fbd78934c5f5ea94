use aide::axum::IntoApiResponse;
use axum::{Extension, Json};
use schemars::JsonSchema;
use serde::Serialize;

use crate::upload_storage::SharedSigner;

/// Whether this deployment can issue upload URLs
#[derive(Debug, Serialize, JsonSchema)]
#[serde(rename_all = "lowercase")]
pub enum StorageStatus {
    /// A storage provider was configured at startup
    Configured,
    /// No provider configured, uploads answer 503
    Disabled,
}

/// Body of `GET /health`
#[derive(Debug, Serialize, JsonSchema)]
pub struct HealthResponse {
    /// Always `ok` while the process is serving
    status: String,
    /// Current version of the application
    semver: String,
    /// Commit hash of the current build (if available)
    rev: Option<String>,
    /// Whether upload URLs can be issued
    storage: StorageStatus,
}

/// Liveness check
///
/// Plain-text confirmation that the process is serving requests.
#[allow(clippy::unused_async)]
pub async fn liveness() -> String {
    "Travel Backend is running!".to_string()
}

/// Health check endpoint
///
/// Returns the current status and version information of the service.
/// This endpoint can be used for monitoring and deployment verification.
pub async fn handler(Extension(signer): Extension<Option<SharedSigner>>) -> impl IntoApiResponse {
    let storage = if signer.is_some() {
        StorageStatus::Configured
    } else {
        StorageStatus::Disabled
    };

    Json(HealthResponse {
        status: "ok".to_string(),
        semver: env!("CARGO_PKG_VERSION").to_string(),
        rev: option_env!("GIT_REV").map(ToString::to_string),
        storage,
    })
}
