use std::sync::Arc;

use travel_backend::{
    server,
    types::Environment,
    upload_storage::{S3UploadSigner, SharedSigner, StorageConfig},
};
use tracing_subscriber::{fmt, EnvFilter};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    let environment = Environment::from_env();

    let env_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(environment.tracing_level().as_str()));

    // JSON logs for staging/production (Datadog), regular format for development
    if environment.json_logs() {
        fmt().json().with_env_filter(env_filter).init();
    } else {
        fmt().with_env_filter(env_filter).init();
    }

    let upload_signer: Option<SharedSigner> = match StorageConfig::from_env()? {
        Some(config) => Some(Arc::new(
            S3UploadSigner::from_config(&config, environment.presigned_url_expiry_secs()).await,
        )),
        None => {
            tracing::warn!("Storage config missing. Image upload will be disabled.");
            None
        }
    };

    server::start(&environment, upload_signer).await
}
