// Transport client retry, timeout and authentication behaviour.
//
// Timer-driven tests run with paused time so retry delays and deadlines
// elapse instantly.

mod test_utils;

use murmur_core::{CredentialScheme, MediaId, TransportConfig, UploadFile};
use murmur_error::{MurmurErrorKind, NetworkError, NetworkErrorKind};
use murmur_transport::{
    CredentialProvider, FormPart, MemorySessionStore, Method, RequestBody, RequestOptions,
    SessionEvent, TransportClient,
};
use reqwest::header::{ACCEPT, AUTHORIZATION, CACHE_CONTROL};
use std::sync::Arc;
use std::time::Duration;
use test_utils::{ScriptedBackend, Step, client_with, json, png, test_session};

fn signed_in() -> Arc<MemorySessionStore> {
    Arc::new(MemorySessionStore::with_session(&test_session()))
}

#[tokio::test(start_paused = true)]
async fn test_connectivity_failures_exhaust_attempts() {
    let backend = Arc::new(ScriptedBackend::new(
        Vec::new(),
        Step::Fail(NetworkError::connectivity("connection refused")),
    ));
    let client = client_with(backend.clone(), signed_in());

    let err = client.fetch_media(&MediaId::new("42")).await.unwrap_err();

    assert_eq!(err.network_kind(), Some(NetworkErrorKind::ConnectivityFailure));
    assert_eq!(backend.attempts(), 3);
}

#[tokio::test(start_paused = true)]
async fn test_recovers_on_third_attempt() {
    let backend = Arc::new(ScriptedBackend::flaky(2, png(b"\x89PNG")));
    let client = client_with(backend.clone(), signed_in());

    let response = client.fetch_media(&MediaId::new("42")).await.unwrap();

    assert_eq!(response.bytes().as_ref(), b"\x89PNG");
    assert_eq!(backend.attempts(), 3);
}

#[tokio::test(start_paused = true)]
async fn test_retry_waits_configured_delay() {
    let backend = Arc::new(ScriptedBackend::flaky(2, png(b"ok")));
    let client = client_with(backend.clone(), signed_in());

    let started = tokio::time::Instant::now();
    client.fetch_media(&MediaId::new("42")).await.unwrap();

    assert!(started.elapsed() >= Duration::from_millis(2000));
}

#[tokio::test(start_paused = true)]
async fn test_single_attempt_budget_never_retries() {
    let backend = Arc::new(ScriptedBackend::flaky(1, png(b"ok")));
    let store = signed_in();
    let config = TransportConfig::default().with_max_retries(1u32);
    let credentials = CredentialProvider::new(store, CredentialScheme::Bearer);
    let client = TransportClient::with_backend(config, credentials, backend.clone()).unwrap();

    assert!(client.fetch_media(&MediaId::new("42")).await.is_err());
    assert_eq!(backend.attempts(), 1);
}

#[tokio::test(start_paused = true)]
async fn test_backend_timeout_is_not_retried() {
    let backend = Arc::new(ScriptedBackend::new(
        Vec::new(),
        Step::Fail(NetworkError::timeout("operation timed out")),
    ));
    let client = client_with(backend.clone(), signed_in());

    let err = client.get_json::<serde_json::Value>("/api/posts").await.unwrap_err();

    assert_eq!(err.network_kind(), Some(NetworkErrorKind::Timeout));
    assert_eq!(backend.attempts(), 1);
}

#[tokio::test(start_paused = true)]
async fn test_elapsed_deadline_is_timeout() {
    let backend = Arc::new(ScriptedBackend::new(Vec::new(), Step::Hang));
    let client = client_with(backend.clone(), signed_in());

    let err = client
        .request(
            Method::GET,
            "/api/posts",
            RequestBody::Empty,
            RequestOptions::new().with_timeout(Duration::from_millis(50)),
        )
        .await
        .unwrap_err();

    assert_eq!(err.network_kind(), Some(NetworkErrorKind::Timeout));
    assert_eq!(backend.attempts(), 1);
}

#[tokio::test]
async fn test_service_error_is_not_retried() {
    let backend = Arc::new(ScriptedBackend::always(json(
        500,
        r#"{"message":"database unavailable"}"#,
    )));
    let client = client_with(backend.clone(), signed_in());

    let err = client.get_json::<serde_json::Value>("/api/posts").await.unwrap_err();

    let service = err.as_service().expect("service error");
    assert_eq!(service.status, 500);
    assert_eq!(service.message, "database unavailable");
    assert_eq!(backend.attempts(), 1);
}

#[tokio::test]
async fn test_forbidden_clears_session_once() {
    let backend = Arc::new(ScriptedBackend::always(json(403, r#"{"message":"forbidden"}"#)));
    let store = signed_in();
    let client = client_with(backend.clone(), store.clone());
    let mut events = client.subscribe();

    let err = client.fetch_media(&MediaId::new("42")).await.unwrap_err();

    assert!(err.is_auth());
    assert_eq!(backend.attempts(), 1);
    assert_eq!(store.clear_count(), 1);
    assert!(client.credentials().current_session().is_none());
    assert_eq!(
        events.try_recv().unwrap(),
        SessionEvent::ReauthenticationRequired { status: 403 }
    );
    assert!(events.try_recv().is_err());
}

#[tokio::test]
async fn test_json_body_on_media_is_service_error() {
    let backend = Arc::new(ScriptedBackend::always(json(
        200,
        r#"{"status":404,"message":"Media not found"}"#,
    )));
    let client = client_with(backend.clone(), signed_in());

    let err = client.fetch_media(&MediaId::new("missing")).await.unwrap_err();

    match err.kind() {
        MurmurErrorKind::Service(e) => {
            assert_eq!(e.status, 404);
            assert_eq!(e.message, "Media not found");
        }
        other => panic!("expected service error, got {other}"),
    }
}

#[tokio::test]
async fn test_media_request_headers() {
    let backend = Arc::new(ScriptedBackend::always(png(b"img")));
    let client = client_with(backend.clone(), signed_in());

    client.fetch_media(&MediaId::new("42")).await.unwrap();

    let request = backend.last_request().unwrap();
    assert_eq!(request.url.as_str(), "http://localhost:8080/api/media/42");
    assert_eq!(request.headers[AUTHORIZATION], "Bearer s3cret");
    assert_eq!(request.headers[ACCEPT], "*/*");
    assert_eq!(request.headers[CACHE_CONTROL], "no-cache, no-store");
    assert_eq!(request.timeout, Duration::from_millis(30_000));
}

#[tokio::test]
async fn test_basic_scheme_header() {
    let backend = Arc::new(ScriptedBackend::always(json(200, "[]")));
    let credentials = CredentialProvider::new(signed_in(), CredentialScheme::Basic);
    let client =
        TransportClient::with_backend(TransportConfig::default(), credentials, backend.clone())
            .unwrap();

    client.get_json::<Vec<serde_json::Value>>("/api/posts").await.unwrap();

    let request = backend.last_request().unwrap();
    // base64("7:s3cret")
    assert_eq!(request.headers[AUTHORIZATION], "Basic NzpzM2NyZXQ=");
}

#[tokio::test]
async fn test_no_session_sends_no_credential() {
    for store in [
        Arc::new(MemorySessionStore::new()),
        Arc::new(MemorySessionStore::with_record("not json")),
    ] {
        let backend = Arc::new(ScriptedBackend::always(json(200, "[]")));
        let client = client_with(backend.clone(), store);

        client.get_json::<Vec<serde_json::Value>>("/api/posts").await.unwrap();

        let request = backend.last_request().unwrap();
        assert!(!request.headers.contains_key(AUTHORIZATION));
        assert_eq!(request.headers[ACCEPT], "application/json");
    }
}

#[tokio::test]
async fn test_upload_uses_upload_deadline() {
    let backend = Arc::new(ScriptedBackend::always(json(201, r#"{"id":"p1"}"#)));
    let client = client_with(backend.clone(), signed_in());

    let parts = vec![
        FormPart::text("userId", "7"),
        FormPart::file("images", UploadFile::new("cat.png", b"png".to_vec())),
    ];
    let created: serde_json::Value = client.upload(Method::POST, "/api/posts", parts).await.unwrap();

    assert_eq!(created["id"], "p1");
    let request = backend.last_request().unwrap();
    assert_eq!(request.method, Method::POST);
    assert_eq!(request.timeout, Duration::from_millis(300_000));
    match request.body {
        RequestBody::Multipart(parts) => assert_eq!(parts.len(), 2),
        other => panic!("expected multipart body, got {other:?}"),
    }
}

#[tokio::test]
async fn test_query_parameters_are_encoded() {
    let backend = Arc::new(ScriptedBackend::always(json(200, r#"{"message":"deleted"}"#)));
    let client = client_with(backend.clone(), signed_in());

    client
        .delete("/api/posts/p1", RequestOptions::new().with_query("userId", "7"))
        .await
        .unwrap();

    let request = backend.last_request().unwrap();
    assert_eq!(request.method, Method::DELETE);
    assert_eq!(request.url.as_str(), "http://localhost:8080/api/posts/p1?userId=7");
}
