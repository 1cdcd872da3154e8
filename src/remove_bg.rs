//! Background-removal client.
//!
//! Thin wrapper over the withoutbg.com API: the rest of the system treats
//! this as an opaque capability that turns image bytes into a PNG cutout with
//! alpha, or an error. No retries here; that is the caller's call.

use std::time::Duration;

use thiserror::Error;

const API_ENDPOINT: &str = "https://api.withoutbg.com/v1.0/image-without-background";
const API_KEY_VAR: &str = "WITHOUTBG_API_KEY";
const TIMEOUT: Duration = Duration::from_secs(30);

#[derive(Debug, Error)]
pub enum RemoveBgError {
    #[error("background removal API key not set ({API_KEY_VAR})")]
    MissingApiKey,
    #[error("background removal request failed: {0}")]
    Http(#[from] reqwest::Error),
    #[error("background removal API returned {status}: {body}")]
    Api { status: u16, body: String },
}

/// Send `image_bytes` to the removal service and return the cutout bytes.
pub async fn remove_background(
    http: &reqwest::Client,
    image_bytes: Vec<u8>,
    filename: &str,
) -> Result<Vec<u8>, RemoveBgError> {
    let api_key = std::env::var(API_KEY_VAR)
        .ok()
        .filter(|k| !k.is_empty())
        .ok_or(RemoveBgError::MissingApiKey)?;

    let part = reqwest::multipart::Part::bytes(image_bytes).file_name(filename.to_string());
    let form = reqwest::multipart::Form::new().part("file", part);

    let resp = http
        .post(API_ENDPOINT)
        .header("X-Api-Key", api_key)
        .multipart(form)
        .timeout(TIMEOUT)
        .send()
        .await?;

    let status = resp.status();
    if !status.is_success() {
        let body = resp.text().await.unwrap_or_default();
        return Err(RemoveBgError::Api {
            status: status.as_u16(),
            body: error_detail(&body),
        });
    }
    Ok(resp.bytes().await?.to_vec())
}

/// Pull the human-readable message out of the API's JSON error body
/// (`{"message": ...}` or `{"detail": ...}`). Non-JSON bodies pass through
/// unchanged.
fn error_detail(body: &str) -> String {
    let parsed: serde_json::Value = match serde_json::from_str(body) {
        Ok(v) => v,
        Err(_) => return body.to_string(),
    };
    parsed
        .get("message")
        .or_else(|| parsed.get("detail"))
        .and_then(|v| v.as_str())
        .map(|s| s.to_string())
        .unwrap_or_else(|| body.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn json_error_bodies_reduce_to_their_message() {
        assert_eq!(error_detail(r#"{"message": "invalid image"}"#), "invalid image");
        assert_eq!(error_detail(r#"{"detail": "quota exceeded"}"#), "quota exceeded");
        assert_eq!(error_detail(r#"{"code": 42}"#), r#"{"code": 42}"#);
        assert_eq!(error_detail("plain text error"), "plain text error");
        assert_eq!(error_detail(""), "");
    }

    #[tokio::test]
    async fn missing_api_key_is_rejected_before_any_request() {
        std::env::remove_var(API_KEY_VAR);
        let http = reqwest::Client::new();
        let err = remove_background(&http, vec![1, 2, 3], "photo.jpg")
            .await
            .expect_err("must fail without an api key");
        assert!(matches!(err, RemoveBgError::MissingApiKey));
    }
}
