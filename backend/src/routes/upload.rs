use std::collections::BTreeMap;

use axum::{Extension, Json};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use tracing::{info, instrument};
use validator::{Validate, ValidationError};

use crate::{
    types::{AppError, ValidatedJson},
    upload_storage::{self, SharedSigner},
};

fn not_blank(value: &str) -> Result<(), ValidationError> {
    if value.trim().is_empty() {
        Err(ValidationError::new("blank"))
    } else {
        Ok(())
    }
}

/// Body of `POST /api/upload-url`
#[derive(Debug, Deserialize, Validate, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct UploadUrlRequest {
    /// Original file name, whitespace runs become hyphens in the object key
    #[validate(custom(function = not_blank, message = "invalid_file_name"))]
    pub file_name: String,
    /// MIME type the client will send with the upload, e.g. `image/jpeg`
    #[validate(custom(function = not_blank, message = "invalid_file_type"))]
    pub file_type: String,
}

/// Where to upload the file and where it will be served from
#[derive(Debug, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct UploadUrlResponse {
    /// Presigned URL to PUT the file to
    pub upload_url: String,
    /// Headers covered by the signature; the PUT must send each one verbatim
    pub upload_headers: BTreeMap<String, String>,
    /// Public URL of the file once uploaded
    pub file_url: String,
    /// ISO-8601 UTC timestamp when the upload URL expires
    pub expires_at: String,
}

/// Creates a presigned URL for uploading an image straight to the bucket
///
/// The object key is `uploads/<epoch millis>-<file name>`, so repeated
/// requests for the same file name get distinct keys. The client must send
/// every entry of `uploadHeaders` with the PUT, `Content-Type` included.
///
/// # Errors
///
/// - 503 when storage is not configured for this deployment, whatever the
///   body; nothing is signed
/// - 400 when the body is malformed or a field is blank
/// - 500 when signing fails, the cause is only logged
#[instrument(skip_all)]
pub async fn create_upload_url(
    Extension(signer): Extension<Option<SharedSigner>>,
    payload: Result<ValidatedJson<UploadUrlRequest>, AppError>,
) -> Result<Json<UploadUrlResponse>, AppError> {
    let Some(signer) = signer else {
        return Err(AppError::storage_unavailable());
    };
    let ValidatedJson(payload) = payload?;

    let urls =
        upload_storage::issue_upload_url(signer.as_ref(), &payload.file_name, &payload.file_type)
            .await?;

    info!(key = %urls.key, content_type = %payload.file_type, "Issued upload URL");

    Ok(Json(UploadUrlResponse {
        upload_url: urls.upload_url,
        upload_headers: urls.upload_headers,
        file_url: urls.file_url,
        expires_at: urls.expires_at.to_rfc3339(),
    }))
}
