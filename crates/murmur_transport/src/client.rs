//! The transport client.

use crate::response::classify;
use crate::{
    CredentialProvider, FormPart, HttpBackend, OutboundRequest, RequestBody, ReqwestBackend,
    Response, ResponseMode, RetryState, SessionEvent,
};
use murmur_core::{MediaId, TransportConfig};
use murmur_error::{
    AuthError, ConfigError, MurmurResult, NetworkError, RetryableError,
};
use reqwest::header::{ACCEPT, AUTHORIZATION, CACHE_CONTROL, HeaderMap, HeaderValue, PRAGMA};
use reqwest::{Method, Url};
use serde::de::DeserializeOwned;
use std::fmt;
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tokio::sync::broadcast;
use tokio_retry2::strategy::FixedInterval;
use tokio_retry2::{Retry, RetryError};
use tracing::{debug, instrument, warn};

/// Capacity of the session event channel.
const EVENT_CAPACITY: usize = 16;

/// Per-request overrides.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RequestOptions {
    timeout: Option<Duration>,
    mode: Option<ResponseMode>,
    query: Vec<(String, String)>,
}

impl RequestOptions {
    /// No overrides.
    pub fn new() -> Self {
        Self::default()
    }

    /// Use this deadline instead of the configured default.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    /// Expect this response shape instead of inferring it from the path.
    pub fn with_mode(mut self, mode: ResponseMode) -> Self {
        self.mode = Some(mode);
        self
    }

    /// Append a query parameter.
    pub fn with_query(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.query.push((key.into(), value.into()));
        self
    }
}

/// The single path through which every call to the service is made.
///
/// Cheap to clone; clones share the backend, session store and event channel.
#[derive(Clone)]
pub struct TransportClient {
    backend: Arc<dyn HttpBackend>,
    credentials: CredentialProvider,
    config: TransportConfig,
    base_url: Url,
    events: broadcast::Sender<SessionEvent>,
}

impl fmt::Debug for TransportClient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TransportClient")
            .field("base_url", &self.base_url.as_str())
            .field("credentials", &self.credentials)
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}

impl TransportClient {
    /// Client over the reqwest backend.
    ///
    /// # Errors
    ///
    /// Returns a configuration error if `base_url` does not parse or the HTTP
    /// client cannot be built.
    pub fn new(config: TransportConfig, credentials: CredentialProvider) -> MurmurResult<Self> {
        let backend = ReqwestBackend::new()?;
        Self::with_backend(config, credentials, Arc::new(backend))
    }

    /// Client over an arbitrary backend.
    ///
    /// # Errors
    ///
    /// Returns a configuration error if `base_url` does not parse.
    pub fn with_backend(
        config: TransportConfig,
        credentials: CredentialProvider,
        backend: Arc<dyn HttpBackend>,
    ) -> MurmurResult<Self> {
        let base_url = Url::parse(config.base_url()).map_err(|e| {
            ConfigError::new(format!("Invalid base_url {:?}: {}", config.base_url(), e))
        })?;
        let (events, _) = broadcast::channel(EVENT_CAPACITY);
        debug!(base_url = %base_url, "Transport client ready");
        Ok(Self {
            backend,
            credentials,
            config,
            base_url,
            events,
        })
    }

    /// Credential provider shared with this client.
    pub fn credentials(&self) -> &CredentialProvider {
        &self.credentials
    }

    /// Transport settings.
    pub fn config(&self) -> &TransportConfig {
        &self.config
    }

    /// Endpoint every relative path is resolved against.
    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// Receive session events such as re-authentication requests.
    pub fn subscribe(&self) -> broadcast::Receiver<SessionEvent> {
        self.events.subscribe()
    }

    /// Absolute URL for `path`, which may itself already be absolute.
    pub fn url_for(&self, path: &str) -> MurmurResult<Url> {
        let joined = if path.starts_with("http://") || path.starts_with("https://") {
            Url::parse(path)
        } else {
            let base = self.base_url.as_str().trim_end_matches('/');
            let path = path.trim_start_matches('/');
            Url::parse(&format!("{}/{}", base, path))
        };
        joined.map_err(|e| ConfigError::new(format!("Invalid request path {:?}: {}", path, e)).into())
    }

    /// Issue a request, retrying connectivity failures up to `max_retries`
    /// total attempts with a fixed delay between them.
    ///
    /// Timeouts, service errors and authentication failures are surfaced
    /// after a single attempt. An authentication failure also clears the
    /// stored session and broadcasts [`SessionEvent::ReauthenticationRequired`].
    ///
    /// # Errors
    ///
    /// Returns the classified failure of the last attempt.
    #[instrument(skip(self, body, options), fields(method = %method, path = %path))]
    pub async fn request(
        &self,
        method: Method,
        path: &str,
        body: RequestBody,
        options: RequestOptions,
    ) -> MurmurResult<Response> {
        let mut url = self.url_for(path)?;
        if !options.query.is_empty() {
            url.query_pairs_mut().extend_pairs(options.query.iter());
        }
        let mode = options.mode.unwrap_or_else(|| ResponseMode::for_path(path));
        let timeout = options.timeout.unwrap_or_else(|| self.config.default_timeout());
        let max_attempts = (*self.config.max_retries()).max(1);
        let delay = self.config.retry_delay();

        let state = Mutex::new(RetryState::new(max_attempts));
        let strategy = FixedInterval::new(delay).take(max_attempts as usize - 1);

        Retry::spawn(strategy, || {
            let state = &state;
            let request = OutboundRequest {
                method: method.clone(),
                url: url.clone(),
                headers: self.headers(mode),
                body: body.clone(),
                timeout,
            };
            async move {
                let attempt = lock(state).begin_attempt();
                debug!(attempt, max_attempts, "Sending request");

                match self.attempt(request, mode).await {
                    Ok(response) => Ok(response),
                    Err(e) if e.is_retryable() => {
                        let mut state = lock(state);
                        if let Some(kind) = e.network_kind() {
                            state.record_failure(kind, delay);
                        }
                        if state.is_exhausted() {
                            warn!(attempt, error = %e, "Connectivity failure, attempts exhausted");
                        } else {
                            warn!(attempt, max_attempts, error = %e, "Connectivity failure, will retry");
                        }
                        Err(RetryError::Transient {
                            err: e,
                            retry_after: None,
                        })
                    }
                    Err(e) => {
                        debug!(attempt, error = %e, "Permanent failure, not retrying");
                        Err(RetryError::Permanent(e))
                    }
                }
            }
        })
        .await
    }

    async fn attempt(&self, request: OutboundRequest, mode: ResponseMode) -> MurmurResult<Response> {
        let deadline = request.timeout;
        let raw = match tokio::time::timeout(deadline, self.backend.send(request)).await {
            Ok(result) => result?,
            Err(_) => {
                return Err(NetworkError::timeout(format!(
                    "no response within {}ms",
                    deadline.as_millis()
                ))
                .into());
            }
        };

        if raw.status == 401 || raw.status == 403 {
            self.reject_session(raw.status);
            return Err(AuthError::new(raw.status).into());
        }

        Ok(classify(raw, mode)?)
    }

    fn reject_session(&self, status: u16) {
        warn!(status, "Credential rejected, clearing session");
        self.credentials.invalidate();
        if self
            .events
            .send(SessionEvent::ReauthenticationRequired { status })
            .is_err()
        {
            debug!("No session event subscribers");
        }
    }

    fn headers(&self, mode: ResponseMode) -> HeaderMap {
        let mut headers = HeaderMap::new();
        if let Some(credential) = self.credentials.current_credential() {
            match HeaderValue::from_str(&credential.header_value()) {
                Ok(mut value) => {
                    value.set_sensitive(true);
                    headers.insert(AUTHORIZATION, value);
                }
                Err(_) => warn!("Session credential is not a valid header value, sending unauthenticated"),
            }
        }
        match mode {
            ResponseMode::Binary => {
                headers.insert(ACCEPT, HeaderValue::from_static("*/*"));
                headers.insert(CACHE_CONTROL, HeaderValue::from_static("no-cache, no-store"));
                headers.insert(PRAGMA, HeaderValue::from_static("no-cache"));
            }
            ResponseMode::Structured => {
                headers.insert(ACCEPT, HeaderValue::from_static("application/json"));
            }
        }
        headers
    }

    /// `GET` a JSON document.
    pub async fn get_json<T: DeserializeOwned>(&self, path: &str) -> MurmurResult<T> {
        self.request(Method::GET, path, RequestBody::Empty, RequestOptions::new())
            .await?
            .json()
    }

    /// Retrieve a protected media object as binary.
    pub async fn fetch_media(&self, media_id: &MediaId) -> MurmurResult<Response> {
        self.request(
            Method::GET,
            &media_id.media_path(),
            RequestBody::Empty,
            RequestOptions::new().with_mode(ResponseMode::Binary),
        )
        .await
    }

    /// Send a multipart form under the upload deadline and decode the JSON reply.
    pub async fn upload<T: DeserializeOwned>(
        &self,
        method: Method,
        path: &str,
        parts: Vec<FormPart>,
    ) -> MurmurResult<T> {
        let options = RequestOptions::new()
            .with_timeout(self.config.upload_timeout())
            .with_mode(ResponseMode::Structured);
        self.request(method, path, RequestBody::Multipart(parts), options)
            .await?
            .json()
    }

    /// `DELETE` a resource, discarding any confirmation body.
    pub async fn delete(&self, path: &str, options: RequestOptions) -> MurmurResult<()> {
        self.request(Method::DELETE, path, RequestBody::Empty, options)
            .await
            .map(|_| ())
    }
}

fn lock(state: &Mutex<RetryState>) -> std::sync::MutexGuard<'_, RetryState> {
    state.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}

