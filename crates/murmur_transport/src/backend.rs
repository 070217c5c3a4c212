//! Pluggable HTTP backend.
//!
//! [`TransportClient`](crate::TransportClient) owns credentials, classification
//! and retry; a backend only moves one request over the wire and reports
//! what came back. Production uses [`ReqwestBackend`]; tests substitute
//! scripted backends.

use bytes::Bytes;
use murmur_core::UploadFile;
use murmur_error::{ConfigError, MurmurResult, NetworkError};
use reqwest::header::{CONTENT_TYPE, HeaderMap};
use reqwest::multipart::{Form, Part};
use reqwest::{Method, Url};
use std::time::Duration;
use tracing::{debug, instrument, warn};

/// One part of a multipart upload.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FormPart {
    /// Plain text field
    Text {
        /// Field name
        name: String,
        /// Field value
        value: String,
    },
    /// File field
    File {
        /// Field name
        name: String,
        /// File to send
        file: UploadFile,
    },
}

impl FormPart {
    /// Text field.
    pub fn text(name: impl Into<String>, value: impl Into<String>) -> Self {
        FormPart::Text {
            name: name.into(),
            value: value.into(),
        }
    }

    /// File field.
    pub fn file(name: impl Into<String>, file: UploadFile) -> Self {
        FormPart::File {
            name: name.into(),
            file,
        }
    }
}

/// Request payload. Cloneable so every attempt can resend it.
#[derive(Debug, Clone, Default, PartialEq)]
pub enum RequestBody {
    /// No body
    #[default]
    Empty,
    /// JSON document
    Json(serde_json::Value),
    /// Multipart form
    Multipart(Vec<FormPart>),
}

/// A fully prepared request: absolute URL, headers, deadline.
#[derive(Debug, Clone)]
pub struct OutboundRequest {
    /// HTTP method
    pub method: Method,
    /// Absolute target URL
    pub url: Url,
    /// Headers including authorization
    pub headers: HeaderMap,
    /// Payload
    pub body: RequestBody,
    /// Request-scoped deadline
    pub timeout: Duration,
}

/// What the wire returned, before any classification.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawResponse {
    /// HTTP status code
    pub status: u16,
    /// Declared `Content-Type`, if any
    pub content_type: Option<String>,
    /// Full body
    pub body: Bytes,
}

impl RawResponse {
    /// Response with the given status, content type and body.
    pub fn new(status: u16, content_type: Option<&str>, body: impl Into<Bytes>) -> Self {
        Self {
            status,
            content_type: content_type.map(str::to_string),
            body: body.into(),
        }
    }
}

/// Moves a single request over the wire.
///
/// Implementations report only network-level failures as errors; any
/// response the server produced, whatever its status, is `Ok`.
#[async_trait::async_trait]
pub trait HttpBackend: Send + Sync {
    /// Send the request and read the full body.
    async fn send(&self, request: OutboundRequest) -> Result<RawResponse, NetworkError>;
}

/// Backend built on a shared `reqwest::Client`.
#[derive(Debug, Clone)]
pub struct ReqwestBackend {
    client: reqwest::Client,
}

impl ReqwestBackend {
    /// Build a backend with a fresh client.
    ///
    /// # Errors
    ///
    /// Returns a configuration error if the TLS backend cannot be initialised.
    pub fn new() -> MurmurResult<Self> {
        let client = reqwest::Client::builder()
            .user_agent(concat!("murmur/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| ConfigError::new(format!("Failed to build HTTP client: {}", e)))?;
        Ok(Self { client })
    }

    /// Wrap an existing client.
    pub fn with_client(client: reqwest::Client) -> Self {
        Self { client }
    }
}

fn network_error(e: reqwest::Error) -> NetworkError {
    if e.is_timeout() {
        NetworkError::timeout(e.to_string())
    } else {
        NetworkError::connectivity(e.to_string())
    }
}

fn file_part(file: &UploadFile) -> Part {
    let part = || Part::bytes(file.bytes().to_vec()).file_name(file.filename().clone());
    match part().mime_str(file.content_type()) {
        Ok(part) => part,
        Err(e) => {
            warn!(content_type = %file.content_type(), error = %e, "Sending file part without content type");
            part()
        }
    }
}

fn build_form(parts: &[FormPart]) -> Form {
    parts.iter().fold(Form::new(), |form, part| match part {
        FormPart::Text { name, value } => form.text(name.clone(), value.clone()),
        FormPart::File { name, file } => form.part(name.clone(), file_part(file)),
    })
}

#[async_trait::async_trait]
impl HttpBackend for ReqwestBackend {
    #[instrument(skip(self, request), fields(method = %request.method, url = %request.url))]
    async fn send(&self, request: OutboundRequest) -> Result<RawResponse, NetworkError> {
        let mut builder = self
            .client
            .request(request.method, request.url)
            .headers(request.headers)
            .timeout(request.timeout);

        builder = match &request.body {
            RequestBody::Empty => builder,
            RequestBody::Json(value) => builder.json(value),
            RequestBody::Multipart(parts) => builder.multipart(build_form(parts)),
        };

        let response = builder.send().await.map_err(network_error)?;
        let status = response.status().as_u16();
        let content_type = response
            .headers()
            .get(CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .map(str::to_string);
        let body = response.bytes().await.map_err(network_error)?;

        debug!(status, size = body.len(), content_type = ?content_type, "Received response");
        Ok(RawResponse {
            status,
            content_type,
            body,
        })
    }
}
