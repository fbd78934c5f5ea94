//! Universal error handling for the API

use aide::OperationOutput;
use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use schemars::JsonSchema;
use serde::Serialize;

use crate::upload_storage::StorageError;

/// Error body returned to clients
#[derive(Debug, Serialize, JsonSchema)]
pub struct ApiErrorResponse {
    /// Human-readable error message, never carries internal detail
    pub error: &'static str,
}

/// Application error type that wraps the API error response
#[derive(Debug)]
pub struct AppError {
    status: StatusCode,
    code: &'static str,
    inner: ApiErrorResponse,
}

impl AppError {
    /// Create a new application error
    #[must_use]
    pub const fn new(status: StatusCode, code: &'static str, msg: &'static str) -> Self {
        Self {
            status,
            code,
            inner: ApiErrorResponse { error: msg },
        }
    }

    /// Storage is not configured for this process
    #[must_use]
    pub const fn storage_unavailable() -> Self {
        Self::new(
            StatusCode::SERVICE_UNAVAILABLE,
            "storage_not_configured",
            "Storage not configured. Cannot upload image.",
        )
    }

    /// Request body rejected before reaching the handler
    #[must_use]
    pub const fn bad_request(code: &'static str) -> Self {
        Self::new(StatusCode::BAD_REQUEST, code, "Invalid request payload")
    }

    /// HTTP status of this error
    #[must_use]
    pub const fn status(&self) -> StatusCode {
        self.status
    }

    /// Machine-readable code, used in logs only
    #[must_use]
    pub const fn code(&self) -> &'static str {
        self.code
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        // Log the error based on status code
        match self.status.as_u16() {
            400..=499 => tracing::warn!("Client error: {} - {}", self.code, self.inner.error),
            500..=599 => tracing::error!("Server error: {} - {}", self.code, self.inner.error),
            _ => {}
        }

        (self.status, Json(self.inner)).into_response()
    }
}

/// Convert storage errors to application errors
impl From<StorageError> for AppError {
    fn from(err: StorageError) -> Self {
        match &err {
            StorageError::S3Error(msg) => tracing::error!("Storage error: {msg}"),
            StorageError::ConfigError(msg) => tracing::error!("Configuration error: {msg}"),
        }

        Self::new(
            StatusCode::INTERNAL_SERVER_ERROR,
            "internal_error",
            "Failed to create upload URL",
        )
    }
}

impl OperationOutput for AppError {
    type Inner = ApiErrorResponse;

    fn operation_response(
        ctx: &mut aide::generate::GenContext,
        operation: &mut aide::openapi::Operation,
    ) -> Option<aide::openapi::Response> {
        Json::<ApiErrorResponse>::operation_response(ctx, operation)
    }
}

#[cfg(test)]
mod tests {
    use http_body_util::BodyExt;

    use super::*;

    async fn body_json(response: Response) -> serde_json::Value {
        let body = response.into_body().collect().await.unwrap().to_bytes();
        serde_json::from_slice(&body).unwrap()
    }

    #[tokio::test]
    async fn test_storage_error_hides_cause() {
        let err = AppError::from(StorageError::S3Error(
            "InvalidAccessKeyId: AKIDEXAMPLE".to_string(),
        ));
        assert_eq!(err.status(), StatusCode::INTERNAL_SERVER_ERROR);

        let response = err.into_response();
        let body = body_json(response).await;

        assert_eq!(body, serde_json::json!({ "error": "Failed to create upload URL" }));
    }

    #[tokio::test]
    async fn test_storage_unavailable_response() {
        let response = AppError::storage_unavailable().into_response();
        assert_eq!(response.status(), StatusCode::SERVICE_UNAVAILABLE);

        let body = body_json(response).await;
        assert_eq!(
            body["error"],
            "Storage not configured. Cannot upload image."
        );
    }

    #[test]
    fn test_bad_request_code() {
        let err = AppError::bad_request("invalid_json");
        assert_eq!(err.status(), StatusCode::BAD_REQUEST);
        assert_eq!(err.code(), "invalid_json");
    }
}
