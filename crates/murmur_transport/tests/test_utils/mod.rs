//! Test utilities for transport tests.
//!
//! Provides a scripted `HttpBackend` and session helpers.

use async_trait::async_trait;
use murmur_core::{CredentialScheme, Session, TransportConfig};
use murmur_error::NetworkError;
use murmur_transport::{
    CredentialProvider, HttpBackend, MemorySessionStore, OutboundRequest, RawResponse,
    TransportClient,
};
use std::collections::VecDeque;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

/// One scripted outcome.
#[derive(Debug, Clone)]
pub enum Step {
    /// Answer with this response
    Respond(RawResponse),
    /// Fail at the network level
    Fail(NetworkError),
    /// Never answer within any sane deadline
    Hang,
}

/// Backend that replays a script, then repeats its fallback step.
#[derive(Debug)]
pub struct ScriptedBackend {
    script: Mutex<VecDeque<Step>>,
    fallback: Step,
    attempts: AtomicUsize,
    requests: Mutex<Vec<OutboundRequest>>,
}

#[allow(dead_code)]
impl ScriptedBackend {
    pub fn new(script: Vec<Step>, fallback: Step) -> Self {
        Self {
            script: Mutex::new(script.into()),
            fallback,
            attempts: AtomicUsize::new(0),
            requests: Mutex::new(Vec::new()),
        }
    }

    /// Always answer with `response`.
    pub fn always(response: RawResponse) -> Self {
        Self::new(Vec::new(), Step::Respond(response))
    }

    /// Fail with connectivity errors `failures` times, then answer.
    pub fn flaky(failures: usize, response: RawResponse) -> Self {
        let script = (0..failures)
            .map(|_| Step::Fail(NetworkError::connectivity("connection refused")))
            .collect();
        Self::new(script, Step::Respond(response))
    }

    pub fn attempts(&self) -> usize {
        self.attempts.load(Ordering::SeqCst)
    }

    pub fn requests(&self) -> Vec<OutboundRequest> {
        self.requests.lock().unwrap().clone()
    }

    pub fn last_request(&self) -> Option<OutboundRequest> {
        self.requests.lock().unwrap().last().cloned()
    }
}

#[async_trait]
impl HttpBackend for ScriptedBackend {
    async fn send(&self, request: OutboundRequest) -> Result<RawResponse, NetworkError> {
        self.attempts.fetch_add(1, Ordering::SeqCst);
        self.requests.lock().unwrap().push(request);
        let step = self
            .script
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| self.fallback.clone());
        match step {
            Step::Respond(response) => Ok(response),
            Step::Fail(err) => Err(err),
            Step::Hang => {
                tokio::time::sleep(Duration::from_secs(24 * 60 * 60)).await;
                Err(NetworkError::timeout("hung"))
            }
        }
    }
}

#[allow(dead_code)]
pub fn json(status: u16, body: &str) -> RawResponse {
    RawResponse::new(status, Some("application/json"), body.to_string())
}

#[allow(dead_code)]
pub fn png(bytes: &[u8]) -> RawResponse {
    RawResponse::new(200, Some("image/png"), bytes.to_vec())
}

#[allow(dead_code)]
pub fn test_session() -> Session {
    Session::new("7", "Grace", "s3cret")
}

/// Client over `backend` with a signed-in session and the default settings.
#[allow(dead_code)]
pub fn client_with(
    backend: Arc<ScriptedBackend>,
    store: Arc<MemorySessionStore>,
) -> TransportClient {
    let credentials = CredentialProvider::new(store, CredentialScheme::Bearer);
    TransportClient::with_backend(TransportConfig::default(), credentials, backend)
        .expect("default config is valid")
}
