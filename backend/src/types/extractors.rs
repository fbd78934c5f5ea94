//! Custom extractors for request validation

use aide::operation::OperationInput;
use axum::{
    extract::{rejection::JsonRejection, FromRequest, Request},
    Json,
};
use schemars::JsonSchema;
use validator::Validate;

use crate::types::error::AppError;

/// Custom JSON extractor that validates the payload
pub struct ValidatedJson<T>(pub T);

impl<T, S> FromRequest<S> for ValidatedJson<T>
where
    T: serde::de::DeserializeOwned + Validate + JsonSchema,
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        // First extract JSON
        let Json(payload) = Json::<T>::from_request(req, state)
            .await
            .map_err(|err| {
                tracing::warn!("Rejected JSON payload: {err}");
                match err {
                    JsonRejection::MissingJsonContentType(_) => {
                        AppError::bad_request("invalid_content_type")
                    }
                    _ => AppError::bad_request("invalid_json"),
                }
            })?;

        // Then validate
        payload.validate().map_err(|errors| {
            // The first field error carries our error code as its message
            let code = errors
                .field_errors()
                .into_values()
                .find_map(|field_errors| field_errors.first()?.message.clone());

            tracing::warn!("Payload validation failed: {errors}");

            match code {
                Some(std::borrow::Cow::Borrowed(code)) => AppError::bad_request(code),
                _ => AppError::bad_request("validation_error"),
            }
        })?;

        Ok(Self(payload))
    }
}

impl<T> OperationInput for ValidatedJson<T>
where
    T: JsonSchema,
{
    fn operation_input(
        ctx: &mut aide::generate::GenContext,
        operation: &mut aide::openapi::Operation,
    ) {
        // Same wire format as Json<T>
        Json::<T>::operation_input(ctx, operation);
    }
}
