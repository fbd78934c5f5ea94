use axum::response::Response;
use http_body_util::BodyExt;
use serde_json::json;

/// Parse response body to JSON
pub async fn parse_response_body(response: Response) -> serde_json::Value {
    let body = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&body).unwrap()
}

/// Read response body as UTF-8 text
pub async fn response_text(response: Response) -> String {
    let body = response.into_body().collect().await.unwrap().to_bytes();
    String::from_utf8(body.to_vec()).unwrap()
}

pub fn create_upload_request(file_name: &str, file_type: &str) -> serde_json::Value {
    json!({
        "fileName": file_name,
        "fileType": file_type
    })
}

/// Object key encoded in the path of a path-style presigned URL
pub fn key_from_upload_url(upload_url: &str, bucket: &str) -> String {
    let url = url::Url::parse(upload_url).expect("upload URL must be absolute");
    url.path()
        .strip_prefix(&format!("/{bucket}/"))
        .expect("path must start with the bucket")
        .to_string()
}

/// Epoch millis component of an `uploads/<millis>-<name>` key
pub fn millis_from_key(key: &str) -> i64 {
    key.strip_prefix("uploads/")
        .and_then(|rest| rest.split_once('-'))
        .map(|(millis, _)| millis.parse().unwrap())
        .expect("key must look like uploads/<millis>-<name>")
}
