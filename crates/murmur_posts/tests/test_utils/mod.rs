//! Test utilities for post tests.

use async_trait::async_trait;
use murmur_core::{CredentialScheme, Session, TransportConfig};
use murmur_error::NetworkError;
use murmur_transport::{
    CredentialProvider, HttpBackend, MemorySessionStore, OutboundRequest, RawResponse,
    TransportClient,
};
use murmur_posts::PostClient;
use std::collections::VecDeque;
use std::sync::{Arc, Mutex};

/// Backend replaying queued responses and recording every request.
#[derive(Debug, Default)]
pub struct RecordingBackend {
    responses: Mutex<VecDeque<Result<RawResponse, NetworkError>>>,
    requests: Mutex<Vec<OutboundRequest>>,
}

#[allow(dead_code)]
impl RecordingBackend {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn then_json(self, status: u16, body: serde_json::Value) -> Self {
        self.responses.lock().unwrap().push_back(Ok(RawResponse::new(
            status,
            Some("application/json"),
            body.to_string(),
        )));
        self
    }

    pub fn then_fail(self, err: NetworkError) -> Self {
        self.responses.lock().unwrap().push_back(Err(err));
        self
    }

    pub fn calls(&self) -> usize {
        self.requests.lock().unwrap().len()
    }

    pub fn requests(&self) -> Vec<OutboundRequest> {
        self.requests.lock().unwrap().clone()
    }
}

#[async_trait]
impl HttpBackend for RecordingBackend {
    async fn send(&self, request: OutboundRequest) -> Result<RawResponse, NetworkError> {
        self.requests.lock().unwrap().push(request);
        self.responses
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| Err(NetworkError::connectivity("no scripted response")))
    }
}

/// Post client signed in as user 3.
#[allow(dead_code)]
pub fn signed_in_client(backend: Arc<RecordingBackend>) -> PostClient {
    let store = Arc::new(MemorySessionStore::with_session(&Session::new("3", "Ada", "t0k")));
    client_with_store(backend, store)
}

#[allow(dead_code)]
pub fn client_with_store(backend: Arc<RecordingBackend>, store: Arc<MemorySessionStore>) -> PostClient {
    let credentials = CredentialProvider::new(store, CredentialScheme::Bearer);
    let transport = TransportClient::with_backend(
        TransportConfig::default().with_max_retries(1u32),
        credentials,
        backend,
    )
    .expect("valid transport config");
    PostClient::new(transport)
}

#[allow(dead_code)]
pub fn post_json(id: &str, content: &str) -> serde_json::Value {
    serde_json::json!({
        "id": id,
        "userId": 3,
        "userName": "Ada",
        "content": content,
        "imageUrls": [],
        "videoUrl": null,
        "createdAt": "2024-05-01T09:30:00Z",
        "likes": 0,
        "comments": []
    })
}
