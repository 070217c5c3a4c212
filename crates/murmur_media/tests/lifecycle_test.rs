// Resource lifecycle manager: one live handle per id, each revoked exactly once.

use bytes::Bytes;
use murmur_core::MediaId;
use murmur_error::{MediaErrorKind, MurmurErrorKind};
use murmur_media::{BlobRegistry, InMemoryBlobRegistry, ResourceLifecycleManager};
use std::sync::Arc;

fn manager() -> (ResourceLifecycleManager, Arc<InMemoryBlobRegistry>) {
    let registry = Arc::new(InMemoryBlobRegistry::new());
    (ResourceLifecycleManager::new(registry.clone()), registry)
}

#[test]
fn test_acquire_records_handle() {
    let (manager, registry) = manager();
    let handle = manager
        .acquire(MediaId::new("42"), Bytes::from_static(b"jpeg"), "image/jpeg")
        .unwrap();

    assert_eq!(handle.media_id(), &MediaId::new("42"));
    assert_eq!(*handle.size(), 4);
    assert_eq!(manager.get(&MediaId::new("42")), Some(handle.clone()));
    assert_eq!(registry.open(handle.url()).unwrap().bytes().as_ref(), b"jpeg");
}

#[test]
fn test_supersession_revokes_previous() {
    let (manager, registry) = manager();
    let first = manager
        .acquire(MediaId::new("42"), Bytes::from_static(b"v1"), "image/png")
        .unwrap();
    let second = manager
        .acquire(MediaId::new("42"), Bytes::from_static(b"v2"), "image/png")
        .unwrap();

    assert_ne!(first.url(), second.url());
    assert!(registry.open(first.url()).is_none());
    assert_eq!(manager.live_count(), 1);
    assert_eq!(registry.stats().live(), 1);
    assert_eq!(*registry.stats().revoked(), 1);
}

#[test]
fn test_release_is_noop_when_absent() {
    let (manager, registry) = manager();
    assert!(!manager.release(&MediaId::new("missing")));

    manager
        .acquire(MediaId::new("7"), Bytes::from_static(b"x"), "image/gif")
        .unwrap();
    assert!(manager.release(&MediaId::new("7")));
    assert!(!manager.release(&MediaId::new("7")));

    let stats = registry.stats();
    assert_eq!(*stats.created(), 1);
    assert_eq!(*stats.revoked(), 1);
    assert_eq!(*stats.stale_revocations(), 0);
}

#[test]
fn test_every_handle_revoked_exactly_once() {
    let (manager, registry) = manager();
    for round in 0..3 {
        for id in ["a", "b", "c"] {
            manager
                .acquire(MediaId::new(id), Bytes::from(format!("{id}{round}")), "image/png")
                .unwrap();
        }
    }
    manager.release(&MediaId::new("b"));
    assert_eq!(manager.release_all(), 2);
    assert_eq!(manager.release_all(), 0);

    let stats = registry.stats();
    assert_eq!(*stats.created(), 9);
    assert_eq!(*stats.revoked(), 9);
    assert_eq!(*stats.stale_revocations(), 0);
    assert_eq!(stats.live(), 0);
}

#[test]
fn test_acquire_after_teardown_creates_nothing() {
    let (manager, registry) = manager();
    manager.release_all();

    let err = manager
        .acquire(MediaId::new("42"), Bytes::from_static(b"late"), "image/png")
        .unwrap_err();

    match err.kind() {
        MurmurErrorKind::Media(e) => assert_eq!(e.kind, MediaErrorKind::TornDown("42".to_string())),
        other => panic!("expected media error, got {other}"),
    }
    assert!(manager.is_torn_down());
    assert_eq!(*registry.stats().created(), 0);
}

#[test]
fn test_drop_releases_remaining_handles() {
    let registry = Arc::new(InMemoryBlobRegistry::new());
    {
        let manager = ResourceLifecycleManager::new(registry.clone());
        manager
            .acquire(MediaId::new("1"), Bytes::from_static(b"a"), "image/png")
            .unwrap();
        manager
            .acquire(MediaId::new("2"), Bytes::from_static(b"b"), "image/png")
            .unwrap();
    }
    assert_eq!(registry.stats().live(), 0);
    assert_eq!(*registry.stats().revoked(), 2);
}
