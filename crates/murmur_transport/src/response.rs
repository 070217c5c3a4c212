//! Response classification.
//!
//! Media endpoints answer failures with a structured JSON body under a
//! successful status at times. Requests declare which shape they expect so
//! a JSON body on a binary request is reported as a service failure and
//! never handed to the renderer as content.

use bytes::Bytes;
use murmur_core::MEDIA_PATH_PREFIX;
use murmur_error::{DecodeError, MurmurResult, ServiceError};
use serde::de::DeserializeOwned;

use crate::RawResponse;

/// Shape of body a request expects on success.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, derive_more::Display)]
pub enum ResponseMode {
    /// Raw media bytes
    #[display("binary")]
    Binary,
    /// JSON document
    #[display("structured")]
    Structured,
}

impl ResponseMode {
    /// Media retrieval paths expect binary; everything else is structured.
    ///
    /// ```
    /// use murmur_transport::ResponseMode;
    ///
    /// assert_eq!(ResponseMode::for_path("/api/media/42"), ResponseMode::Binary);
    /// assert_eq!(ResponseMode::for_path("/api/posts"), ResponseMode::Structured);
    /// ```
    pub fn for_path(path: &str) -> Self {
        if path.contains(MEDIA_PATH_PREFIX) {
            ResponseMode::Binary
        } else {
            ResponseMode::Structured
        }
    }
}

/// A successful, classified response.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Response {
    status: u16,
    content_type: Option<String>,
    body: Bytes,
}

impl Response {
    /// HTTP status.
    pub fn status(&self) -> u16 {
        self.status
    }

    /// Declared content type.
    pub fn content_type(&self) -> Option<&str> {
        self.content_type.as_deref()
    }

    /// Raw body.
    pub fn bytes(&self) -> &Bytes {
        &self.body
    }

    /// Consume into the raw body.
    pub fn into_bytes(self) -> Bytes {
        self.body
    }

    /// Decode the body as JSON.
    ///
    /// # Errors
    ///
    /// Returns a decode error if the body is not valid JSON for `T`.
    pub fn json<T: DeserializeOwned>(&self) -> MurmurResult<T> {
        serde_json::from_slice(&self.body).map_err(|e| {
            DecodeError::new(format!("Failed to decode response body: {}", e)).into()
        })
    }
}

fn is_json(content_type: Option<&str>) -> bool {
    content_type
        .and_then(|ct| ct.split(';').next())
        .map(|essence| {
            let essence = essence.trim().to_ascii_lowercase();
            essence == "application/json" || essence.ends_with("+json")
        })
        .unwrap_or(false)
}

fn canonical_reason(status: u16) -> String {
    reqwest::StatusCode::from_u16(status)
        .ok()
        .and_then(|s| s.canonical_reason())
        .unwrap_or("request failed")
        .to_string()
}

/// Message carried by an error body: `message`, else `error`, else the text.
fn error_message(body: &[u8]) -> Option<String> {
    if let Ok(value) = serde_json::from_slice::<serde_json::Value>(body) {
        let field = ["message", "error"]
            .iter()
            .find_map(|key| value.get(key).and_then(|v| v.as_str()))
            .map(str::to_string);
        if field.is_some() {
            return field;
        }
    }
    let text = String::from_utf8_lossy(body).trim().to_string();
    (!text.is_empty()).then_some(text)
}

/// Status declared inside a structured error body.
fn declared_status(body: &[u8]) -> Option<u16> {
    let value = serde_json::from_slice::<serde_json::Value>(body).ok()?;
    ["status", "statusCode", "code"]
        .iter()
        .find_map(|key| value.get(key).and_then(|v| v.as_u64()))
        .and_then(|s| u16::try_from(s).ok())
        .filter(|s| !(200..300).contains(s))
}

/// Turn a raw response into a success or a service failure.
///
/// Authentication statuses are handled by the client before this runs.
pub(crate) fn classify(raw: RawResponse, mode: ResponseMode) -> Result<Response, ServiceError> {
    if !(200..300).contains(&raw.status) {
        let message = error_message(&raw.body).unwrap_or_else(|| canonical_reason(raw.status));
        return Err(ServiceError::new(raw.status, message));
    }

    if mode == ResponseMode::Binary && is_json(raw.content_type.as_deref()) {
        let status = declared_status(&raw.body).unwrap_or(raw.status);
        let message = error_message(&raw.body)
            .unwrap_or_else(|| "structured body returned for a media request".to_string());
        return Err(ServiceError::new(status, message));
    }

    Ok(Response {
        status: raw.status,
        content_type: raw.content_type,
        body: raw.body,
    })
}
