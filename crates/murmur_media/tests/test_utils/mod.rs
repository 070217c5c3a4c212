//! Test utilities for media tests.
//!
//! Provides a path-routed `HttpBackend` and resolver wiring.

use async_trait::async_trait;
use murmur_core::{CredentialScheme, MediaConfig, Session, TransportConfig};
use murmur_error::NetworkError;
use murmur_media::{InMemoryBlobRegistry, MediaResolver, ResourceLifecycleManager};
use murmur_transport::{
    CredentialProvider, HttpBackend, MemorySessionStore, OutboundRequest, RawResponse,
    TransportClient,
};
use std::collections::{HashMap, VecDeque};
use std::sync::{Arc, Mutex};
use tokio::sync::Notify;

/// One scripted outcome for a route.
#[derive(Debug, Clone)]
#[allow(dead_code)]
pub enum Step {
    /// Answer immediately
    Respond(RawResponse),
    /// Fail at the network level
    Fail(NetworkError),
    /// Answer once the gate is opened
    Gated(Arc<Notify>, RawResponse),
}

#[derive(Debug)]
struct Route {
    script: VecDeque<Step>,
    fallback: Step,
    attempts: usize,
}

/// Backend answering per URL path; unknown paths get a JSON 404.
#[derive(Debug, Default)]
pub struct RoutedBackend {
    routes: Mutex<HashMap<String, Route>>,
}

#[allow(dead_code)]
impl RoutedBackend {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replay `script` for `path`, then repeat `fallback`.
    pub fn route(self, path: &str, script: Vec<Step>, fallback: Step) -> Self {
        self.routes.lock().unwrap().insert(
            path.to_string(),
            Route {
                script: script.into(),
                fallback,
                attempts: 0,
            },
        );
        self
    }

    /// Always answer `path` with `response`.
    pub fn serve(self, path: &str, response: RawResponse) -> Self {
        self.route(path, Vec::new(), Step::Respond(response))
    }

    /// Always fail `path` with a connectivity error.
    pub fn unreachable(self, path: &str) -> Self {
        self.route(
            path,
            Vec::new(),
            Step::Fail(NetworkError::connectivity("connection refused")),
        )
    }

    pub fn attempts(&self, path: &str) -> usize {
        self.routes
            .lock()
            .unwrap()
            .get(path)
            .map(|route| route.attempts)
            .unwrap_or(0)
    }
}

#[async_trait]
impl HttpBackend for RoutedBackend {
    async fn send(&self, request: OutboundRequest) -> Result<RawResponse, NetworkError> {
        let step = {
            let mut routes = self.routes.lock().unwrap();
            match routes.get_mut(request.url.path()) {
                Some(route) => {
                    route.attempts += 1;
                    route.script.pop_front().unwrap_or_else(|| route.fallback.clone())
                }
                None => Step::Respond(RawResponse::new(
                    404,
                    Some("application/json"),
                    r#"{"status":404,"message":"Media not found"}"#,
                )),
            }
        };
        match step {
            Step::Respond(response) => Ok(response),
            Step::Fail(err) => Err(err),
            Step::Gated(gate, response) => {
                gate.notified().await;
                Ok(response)
            }
        }
    }
}

#[allow(dead_code)]
pub fn png(bytes: &[u8]) -> RawResponse {
    RawResponse::new(200, Some("image/png"), bytes.to_vec())
}

#[allow(dead_code)]
pub fn mp4(bytes: &[u8]) -> RawResponse {
    RawResponse::new(200, Some("video/mp4"), bytes.to_vec())
}

/// Resolver, its lifecycle manager and registry.
#[allow(dead_code)]
pub struct Harness {
    pub resolver: MediaResolver,
    pub lifecycle: Arc<ResourceLifecycleManager>,
    pub registry: Arc<InMemoryBlobRegistry>,
}

#[allow(dead_code)]
pub fn harness(backend: Arc<RoutedBackend>, config: &MediaConfig) -> Harness {
    let store = Arc::new(MemorySessionStore::with_session(&Session::new("3", "Ada", "t0k")));
    let credentials = CredentialProvider::new(store, CredentialScheme::Bearer);
    let transport = TransportClient::with_backend(
        TransportConfig::default().with_base_url("https://feed.example.com"),
        credentials,
        backend,
    )
    .expect("valid transport config");
    let registry = Arc::new(InMemoryBlobRegistry::new());
    let lifecycle = Arc::new(ResourceLifecycleManager::new(registry.clone()));
    let resolver = MediaResolver::new(transport, lifecycle.clone(), config);
    Harness {
        resolver,
        lifecycle,
        registry,
    }
}
