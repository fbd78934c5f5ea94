use std::sync::Arc;
use std::time::Duration;

use aide::openapi::OpenApi;
use axum::{
    http::{
        header::{AUTHORIZATION, CONTENT_TYPE},
        Method, StatusCode,
    },
    Extension, Router,
};
use datadog_tracing::axum::{shutdown_signal, OtelAxumLayer, OtelInResponseLayer};
use tokio::net::TcpListener;
use tower_http::{
    cors::{Any, CorsLayer},
    timeout::TimeoutLayer,
};

use crate::routes;
use crate::{types::Environment, upload_storage::SharedSigner};

const REQUEST_TIMEOUT: Duration = Duration::from_secs(5);

/// Requests still running after `timeout` are answered with 408
fn timeout_layer(timeout: Duration) -> TimeoutLayer {
    TimeoutLayer::with_status_code(StatusCode::REQUEST_TIMEOUT, timeout)
}

/// Builds the application router with its dependencies attached
///
/// `upload_signer` is `None` when no storage is configured; the upload route
/// then answers 503 while every other route keeps working.
pub fn router(environment: &Environment, upload_signer: Option<SharedSigner>) -> Router {
    let mut openapi = OpenApi::default();

    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods([Method::GET, Method::POST, Method::PUT, Method::DELETE])
        .allow_headers([CONTENT_TYPE, AUTHORIZATION]);

    routes::handler(environment)
        .finish_api(&mut openapi)
        .layer(Extension(Arc::new(openapi)))
        .layer(Extension(upload_signer))
        .layer(cors)
        .layer(timeout_layer(REQUEST_TIMEOUT))
}

/// Starts the server with the given environment and dependencies
///
/// # Errors
///
/// Returns an error if the server fails to start or bind to the port
pub async fn start(
    environment: &Environment,
    upload_signer: Option<SharedSigner>,
) -> anyhow::Result<()> {
    let router = router(environment, upload_signer)
        // Include trace context as header into the response
        .layer(OtelInResponseLayer)
        // Start OpenTelemetry trace on incoming request
        .layer(OtelAxumLayer::default());

    let addr = std::net::SocketAddr::from(([0, 0, 0, 0], Environment::port()?));

    let listener = TcpListener::bind(&addr).await?;
    tracing::info!("🔄 Travel Backend started on http://{addr}");

    axum::serve(listener, router.into_make_service())
        .with_graceful_shutdown(shutdown_signal())
        .await
        .map_err(anyhow::Error::from)
}
