//! Store handle contract tests
//!
//! These tests pin down the behaviour every `BlobStore` is expected to share,
//! exercised through a shared trait object the way the channel layer uses it.

use blob_store::{
    AccessLevel, Blob, BlobStore, FailingBlobStore, FailurePolicy, GetOptions, MemoryBlobStore,
    PathResolver, PutOptions, SlashPathResolver, StoreError,
};
use std::sync::Arc;
use std::thread;

fn shared_store() -> Arc<dyn BlobStore> {
    Arc::new(MemoryBlobStore::with_containers(["photos"]))
}

#[test]
fn test_put_is_whole_object_replacement() {
    let store = shared_store();
    store
        .put("photos", Blob::new("cat.jpg", b"first version".to_vec()), &PutOptions::new())
        .unwrap();
    store
        .put("photos", Blob::new("cat.jpg", b"v2".to_vec()), &PutOptions::new())
        .unwrap();

    let blob = store.get("photos", "cat.jpg", &GetOptions::new()).unwrap().unwrap();
    assert_eq!(blob.payload, b"v2");
    assert_eq!(blob.metadata.content_length, 2);
}

#[test]
fn test_metadata_round_trips_through_store() {
    let store = shared_store();
    let blob = Blob::new("doc.txt", b"text".to_vec())
        .with_content_type("text/plain; charset=utf-8")
        .with_user_metadata("author", "bob");
    store.put("photos", blob, &PutOptions::new()).unwrap();

    let fetched = store.get("photos", "doc.txt", &GetOptions::new()).unwrap().unwrap();
    assert_eq!(
        fetched.metadata.content_type.as_deref(),
        Some("text/plain; charset=utf-8")
    );
    assert_eq!(fetched.metadata.user_metadata.get("author").unwrap(), "bob");
}

#[test]
fn test_resolved_path_addresses_store() {
    let store = shared_store();
    let path = SlashPathResolver.resolve("photos/2024/trip/beach.png").unwrap();
    store
        .put(path.container(), Blob::new(path.key(), vec![1, 2, 3]), &PutOptions::new())
        .unwrap();

    assert!(store.exists(path.container(), path.key()).unwrap());
    assert!(!store.exists("photos", "beach.png").unwrap());
}

#[test]
fn test_concurrent_puts_are_all_visible() {
    let store = shared_store();
    let handles: Vec<_> = (0..8)
        .map(|i| {
            let store = Arc::clone(&store);
            thread::spawn(move || {
                store
                    .put(
                        "photos",
                        Blob::new(format!("img-{}", i), vec![i as u8]),
                        &PutOptions::new(),
                    )
                    .unwrap();
            })
        })
        .collect();
    for handle in handles {
        handle.join().unwrap();
    }

    for i in 0..8 {
        assert!(store.exists("photos", &format!("img-{}", i)).unwrap());
    }
}

#[test]
fn test_failing_wrapper_preserves_access_calls() {
    let store = FailingBlobStore::new(
        MemoryBlobStore::with_containers(["photos"]),
        FailurePolicy::AfterPuts(1),
    );
    store
        .put("photos", Blob::new("a", Vec::new()), &PutOptions::new())
        .unwrap();
    store.set_access("photos", "a", AccessLevel::PublicRead).unwrap();
    assert_eq!(store.get_access("photos", "a").unwrap(), AccessLevel::PublicRead);

    let err = store
        .put("photos", Blob::new("b", Vec::new()), &PutOptions::new())
        .unwrap_err();
    assert!(matches!(err, StoreError::Injected(_)));
}
