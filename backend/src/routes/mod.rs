mod docs;
/// Liveness and health checks
pub mod health;
/// Upload URL issuance
pub mod upload;

use aide::axum::{
    routing::{get, post},
    ApiRouter,
};

use crate::types::Environment;

/// Creates the router with all handler routes
///
/// API docs are only mounted where the environment allows them.
pub fn handler(environment: &Environment) -> ApiRouter {
    let api = ApiRouter::new()
        .api_route("/", get(health::liveness))
        .api_route("/health", get(health::handler))
        .api_route("/api/upload-url", post(upload::create_upload_url));

    if environment.show_api_docs() {
        api.merge(docs::handler())
    } else {
        api
    }
}
