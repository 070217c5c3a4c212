// End-to-end: feed listing and media resolution through the context.

use murmur::{
    BlobRegistry, InMemoryBlobRegistry, MediaErrorKind, MediaReference, MemorySessionStore, Murmur,
    MurmurConfig, MurmurErrorKind, ResourceHandle, Session, SessionEvent,
};
use std::sync::Arc;
use wiremock::matchers::{header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn config_for(server: &MockServer) -> MurmurConfig {
    MurmurConfig::from_toml_str(&format!(
        "[transport]\nbase_url = \"{}\"\nretry_delay_ms = 10\n",
        server.uri()
    ))
    .unwrap()
}

fn signed_in() -> Arc<MemorySessionStore> {
    Arc::new(MemorySessionStore::with_session(&Session::new("3", "Ada", "t0k")))
}

#[tokio::test]
async fn test_feed_media_resolves_and_releases() -> anyhow::Result<()> {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/posts"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!([{
            "id": "p1",
            "userId": 3,
            "content": "harbour",
            "imageUrls": ["/api/media/img1", "/api/uploads/legacy.png"],
            "videoUrl": null,
            "createdAt": "2024-05-01T09:30:00Z",
            "likes": 4,
            "comments": []
        }])))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/api/media/img1"))
        .and(header("authorization", "Bearer t0k"))
        .respond_with(
            ResponseTemplate::new(200)
                .insert_header("content-type", "image/webp")
                .set_body_bytes(b"RIFF".to_vec()),
        )
        .expect(1)
        .mount(&server)
        .await;

    let registry = Arc::new(InMemoryBlobRegistry::new());
    let murmur = Murmur::new(config_for(&server), signed_in())?.with_registry(registry.clone());

    let mut feed = murmur.feed();
    feed.refresh().await?;
    let post = feed.get("p1").expect("post listed").clone();

    let mut media = murmur.post_media();
    let handles = media.sync(post.media_references()).await.clone();

    assert!(handles["img1"].is_local());
    assert_eq!(
        handles["/api/uploads/legacy.png"],
        ResourceHandle::Direct {
            url: format!("{}/api/uploads/legacy.png", server.uri())
        }
    );

    assert_eq!(media.teardown(), 1);
    assert_eq!(registry.stats().live(), 0);
    Ok(())
}

#[tokio::test]
async fn test_forbidden_emits_reauthentication_event() -> anyhow::Result<()> {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/posts"))
        .respond_with(ResponseTemplate::new(403))
        .expect(1)
        .mount(&server)
        .await;

    let store = signed_in();
    let murmur = Murmur::new(config_for(&server), store.clone())?;
    let mut events = murmur.subscribe();

    let err = murmur.posts().list().await.unwrap_err();

    assert!(err.is_auth());
    assert_eq!(events.recv().await?, SessionEvent::ReauthenticationRequired { status: 403 });
    assert!(murmur.credentials().current_session().is_none());
    assert_eq!(store.clear_count(), 1);
    Ok(())
}

#[tokio::test]
async fn test_save_media_reports_write_failure_as_media_error() -> anyhow::Result<()> {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/media/img1"))
        .respond_with(
            ResponseTemplate::new(200)
                .insert_header("content-type", "image/webp")
                .set_body_bytes(b"RIFF".to_vec()),
        )
        .mount(&server)
        .await;

    let murmur = Murmur::new(config_for(&server), signed_in())?;
    let resolver = murmur.resolver();
    let ResourceHandle::Local(local) = resolver.resolve(&MediaReference::image("img1")).await else {
        panic!("expected local handle");
    };
    let dir = tempfile::tempdir()?;

    let saved = dir.path().join("img1.webp");
    assert_eq!(murmur.save_media(&local, &saved).await?, 4);
    assert_eq!(std::fs::read(&saved)?, b"RIFF");

    let err = murmur
        .save_media(&local, &dir.path().join("missing").join("img1.webp"))
        .await
        .unwrap_err();
    match err.kind() {
        MurmurErrorKind::Media(e) => assert!(matches!(e.kind, MediaErrorKind::FileWrite(_))),
        other => panic!("expected media error, got {other:?}"),
    }
    assert!(!err.is_validation());
    assert!(err.user_message().contains("could not be saved"));

    resolver.lifecycle().release_all();
    Ok(())
}
