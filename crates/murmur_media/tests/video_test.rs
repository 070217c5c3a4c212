// Video reload state machine and loader.

mod test_utils;

use murmur_core::{MediaConfig, MediaReference};
use murmur_error::NetworkError;
use murmur_media::{ResourceHandle, VideoLoader, VideoPlayback, VideoState};
use std::sync::Arc;
use std::time::Duration;
use test_utils::{RoutedBackend, Step, harness, mp4};

#[test]
fn test_reload_bound() {
    let mut playback = VideoPlayback::new(3);
    assert!(playback.begin());
    for reload in 0..3 {
        assert!(playback.failed(None));
        assert_eq!(*playback.state(), VideoState::Failed { reloads: reload });
        assert!(playback.reload());
    }
    assert_eq!(*playback.state(), VideoState::Loading { reloads: 3 });
    assert!(playback.failed(Some("https://feed.example.com/v.mp4".to_string())));
    assert_eq!(
        *playback.state(),
        VideoState::FailedTerminal {
            fallback_url: Some("https://feed.example.com/v.mp4".to_string())
        }
    );
}

#[test]
fn test_out_of_order_events_are_ignored() {
    let mut playback = VideoPlayback::new(3);
    assert!(!playback.reload());
    assert!(!playback.failed(None));
    assert!(!playback.loaded(ResourceHandle::Unavailable));
    assert!(!playback.retry());
    assert_eq!(*playback.state(), VideoState::Idle);

    playback.begin();
    assert!(!playback.begin());
    assert!(playback.loaded(ResourceHandle::Unavailable));
    assert!(playback.is_ready());
    assert!(!playback.failed(None));
}

#[tokio::test(start_paused = true)]
async fn test_loader_gives_up_after_bounded_reloads() {
    let backend = Arc::new(RoutedBackend::new().unreachable("/api/media/clip"));
    let config = MediaConfig::default()
        .with_video_max_reloads(2u32)
        .with_video_reload_delay_ms(500u64);
    let h = harness(backend.clone(), &config);
    let loader = VideoLoader::new(h.resolver.clone(), &config);

    let started = tokio::time::Instant::now();
    let playback = loader.load(&MediaReference::video("clip")).await;

    assert!(playback.is_terminal());
    assert_eq!(
        *playback.state(),
        VideoState::FailedTerminal {
            fallback_url: Some("https://feed.example.com/api/media/clip".to_string())
        }
    );
    // One load plus two reloads, three transport attempts each.
    assert_eq!(backend.attempts("/api/media/clip"), 9);
    assert!(started.elapsed() >= Duration::from_millis(1000));
}

#[tokio::test(start_paused = true)]
async fn test_loader_recovers_on_reload() {
    let backend = Arc::new(RoutedBackend::new().route(
        "/api/media/clip",
        vec![
            Step::Fail(NetworkError::connectivity("reset")),
            Step::Fail(NetworkError::connectivity("reset")),
            Step::Fail(NetworkError::connectivity("reset")),
        ],
        Step::Respond(mp4(b"ftyp")),
    ));
    let config = MediaConfig::default();
    let h = harness(backend.clone(), &config);
    let loader = VideoLoader::new(h.resolver.clone(), &config);

    let playback = loader.load(&MediaReference::video("clip")).await;

    match playback.state() {
        VideoState::Ready { handle } => assert!(handle.is_local()),
        other => panic!("expected ready, got {other}"),
    }
    assert_eq!(backend.attempts("/api/media/clip"), 4);
}

#[tokio::test(start_paused = true)]
async fn test_manual_retry_resets_budget() {
    let backend = Arc::new(RoutedBackend::new().serve("/api/media/clip", mp4(b"ftyp")));
    let config = MediaConfig::default().with_video_max_reloads(0u32);
    let h = harness(backend, &config);
    let loader = VideoLoader::new(h.resolver.clone(), &config);
    let reference = MediaReference::video("clip");

    let mut playback = loader.load_with(&reference, |_| false).await;
    assert!(playback.is_terminal());

    loader
        .retry(&mut playback, &reference, ResourceHandle::is_local)
        .await;
    assert!(playback.is_ready());
}
