use std::sync::Arc;

use aide::{axum::ApiRouter, openapi::OpenApi, scalar::Scalar};
use axum::{response::IntoResponse, routing::get, Extension, Json};

/// Scalar UI and the raw OpenAPI document
pub fn handler() -> ApiRouter {
    let scalar = Scalar::new("/openapi.json").with_title("Travel Backend Docs");

    ApiRouter::new()
        .route("/docs", scalar.axum_route())
        .route("/openapi.json", get(openapi_schema))
}

#[allow(clippy::unused_async)]
async fn openapi_schema(Extension(openapi): Extension<Arc<OpenApi>>) -> impl IntoResponse {
    Json(openapi.as_ref()).into_response()
}
