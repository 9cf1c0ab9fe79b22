//! Asynchronous Bulk Add Tests
//!
//! Validates the two-phase add: the mirror and the indexing flag update
//! before the future is returned, the index catches up while the future
//! runs, and the flag drops once every in-flight add settles.

use mirrorsearch_core::{Config, DocumentId, Error, IndexError, SearchIndex, SearchOptions};
use mirrorsearch_engine::{AddAllOptions, RemoveAllOptions, SyncEngine};
use serde_json::{json, Value};

fn engine() -> SyncEngine<Value> {
    SyncEngine::in_memory(&Config::default()).unwrap()
}

fn docs(range: std::ops::Range<i64>) -> Vec<Value> {
    range
        .map(|i| json!({"id": i, "text": format!("bulk document {}", i)}))
        .collect()
}

#[tokio::test]
async fn test_flag_raised_before_future_is_polled() {
    let mut engine = engine();
    assert!(!engine.is_indexing());

    let pending = engine.add_all_async(docs(0..1000), AddAllOptions::chunk_size(100));
    assert!(engine.is_indexing());
    assert!(engine.state().is_indexing);
    assert_eq!(engine.document_count(), 1000);

    pending.await.unwrap();
    assert!(!engine.is_indexing());
    assert_eq!(engine.index().document_count(), 1000);
}

#[tokio::test]
async fn test_search_while_indexing() {
    let mut engine = engine();
    let pending = engine.add_all_async(docs(0..1000), AddAllOptions::chunk_size(100));
    let handle = tokio::spawn(pending);

    // Each poll of the spawned add indexes one chunk, then yields
    for _ in 0..3 {
        if engine.index().document_count() > 0 {
            break;
        }
        tokio::task::yield_now().await;
    }

    assert!(engine.is_indexing());
    engine.search("bulk", &SearchOptions::default()).unwrap();
    let state = engine.state();
    let found = state.raw_results.unwrap().len();
    assert!(found > 0 && found < 1000, "found {} mid-flight", found);
    assert!(state.results.unwrap().iter().all(Option::is_some));
    assert_eq!(engine.document_count(), 1000);

    handle.await.unwrap().unwrap();
    assert!(!engine.is_indexing());

    engine.search("bulk", &SearchOptions::default()).unwrap();
    assert_eq!(engine.state().raw_results.unwrap().len(), 1000);
}

#[tokio::test]
async fn test_clear_stops_pending_add() {
    let mut engine = engine();
    let pending = engine.add_all_async(docs(0..1000), AddAllOptions::chunk_size(100));
    let handle = tokio::spawn(pending);

    for _ in 0..3 {
        if engine.index().document_count() > 0 {
            break;
        }
        tokio::task::yield_now().await;
    }
    assert!(engine.is_indexing());

    engine.remove_all(None, RemoveAllOptions::default()).unwrap();
    handle.await.unwrap().unwrap();

    assert!(!engine.is_indexing());
    assert_eq!(engine.index().document_count(), 0);
    assert!(engine.mirror().is_empty());

    engine.search("bulk", &SearchOptions::default()).unwrap();
    assert!(engine.state().raw_results.unwrap().is_empty());
}

#[tokio::test]
async fn test_failure_resets_flag() {
    let mut engine = engine();
    engine.add(json!({"id": 5, "text": "already here"})).unwrap();

    let err = engine
        .add_all_async(docs(0..20), AddAllOptions::chunk_size(4))
        .await
        .unwrap_err();

    assert_eq!(
        err,
        Error::AsyncIndexing(IndexError::DuplicateId(DocumentId::from(5)))
    );
    assert!(!engine.is_indexing());
    // Chunks before the failing document stay indexed
    assert_eq!(engine.index().document_count(), 6);
}

#[tokio::test]
async fn test_dropped_future_resets_flag() {
    let mut engine = engine();
    let pending = engine.add_all_async(docs(0..50), AddAllOptions::default());
    assert!(engine.is_indexing());

    drop(pending);
    assert!(!engine.is_indexing());
    assert_eq!(engine.document_count(), 50);
    assert_eq!(engine.index().document_count(), 0);
}

#[tokio::test]
async fn test_overlapping_adds_keep_flag_until_last() {
    let mut engine = engine();
    let first = engine.add_all_async(docs(0..10), AddAllOptions::chunk_size(5));
    let second = engine.add_all_async(docs(10..20), AddAllOptions::chunk_size(5));

    first.await.unwrap();
    assert!(engine.is_indexing());

    second.await.unwrap();
    assert!(!engine.is_indexing());
    assert_eq!(engine.index().document_count(), 20);
}

#[tokio::test]
async fn test_default_chunk_size_from_config() {
    let config = Config::from_toml_str("[engine]\nchunk_size = 3\n").unwrap();
    let mut engine: SyncEngine<Value> = SyncEngine::in_memory(&config).unwrap();
    assert_eq!(engine.config().chunk_size, 3);

    engine.add_all_async_default(docs(0..10)).await.unwrap();
    assert_eq!(engine.index().document_count(), 10);
}

#[tokio::test]
async fn test_subscriber_observes_flag_transitions() {
    let mut engine = engine();
    let mut rx = engine.subscribe();

    let pending = engine.add_all_async(docs(0..200), AddAllOptions::chunk_size(50));
    assert!(rx.has_changed().unwrap());
    assert!(rx.borrow_and_update().is_indexing);

    let handle = tokio::spawn(pending);
    let state = rx.wait_for(|state| !state.is_indexing).await.unwrap();
    assert!(!state.is_indexing);
    drop(state);

    handle.await.unwrap().unwrap();
}

#[tokio::test]
async fn test_subscriber_observes_results() {
    let mut engine = engine();
    engine.add(json!({"id": 1, "text": "watched"})).unwrap();
    let mut rx = engine.subscribe();

    engine.search("watched", &SearchOptions::default()).unwrap();
    rx.changed().await.unwrap();
    assert_eq!(rx.borrow_and_update().documents().count(), 1);

    engine.clear_results();
    rx.changed().await.unwrap();
    assert!(rx.borrow().results.is_none());
}
