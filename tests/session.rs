//! Session stores and the typed repository on top of them.
mod common;
use common::*;
use formflow::finalize::Finalizer;
use formflow::prelude::*;
use formflow::session::SessionRepository;
use serde_json::json;
use std::sync::Arc;
use std::time::Duration;

fn repository(store: Arc<dyn SessionStore>) -> SessionRepository {
    SessionRepository::new(store, "formflow:session", Duration::from_secs(1800))
}

#[tokio::test]
async fn test_memory_store_basic_operations() {
    let store = MemorySessionStore::new();
    assert_eq!(store.get("k").await, None);

    assert_eq!(store.set("k", "v".to_string(), None).await, Some(()));
    assert_eq!(store.get("k").await.as_deref(), Some("v"));
    assert_eq!(store.len().await, 1);

    assert_eq!(store.del("k").await, Some(1));
    assert_eq!(store.del("k").await, Some(0));
    assert!(store.is_empty().await);
}

#[tokio::test(start_paused = true)]
async fn test_memory_store_expiry() {
    let store = MemorySessionStore::new();
    store
        .set("k", "v".to_string(), Some(Duration::from_secs(30)))
        .await;

    tokio::time::advance(Duration::from_secs(29)).await;
    assert_eq!(store.get("k").await.as_deref(), Some("v"));

    tokio::time::advance(Duration::from_secs(2)).await;
    assert_eq!(store.get("k").await, None);
    assert_eq!(store.del("k").await, Some(0));
}

#[tokio::test(start_paused = true)]
async fn test_memory_store_sweeps_abandoned_entries() {
    let store = MemorySessionStore::new();
    for i in 0..1000 {
        store
            .set(&format!("abandoned:{}", i), "v".to_string(), Some(Duration::from_secs(1)))
            .await;
    }
    assert_eq!(store.stored_len().await, 1000);

    // Within the sweep interval, expired keys are hidden but still held.
    tokio::time::advance(Duration::from_secs(5)).await;
    store.set("fresh:0", "v".to_string(), None).await;
    assert_eq!(store.len().await, 1);
    assert_eq!(store.stored_len().await, 1001);

    tokio::time::advance(Duration::from_secs(30)).await;
    store.set("fresh:1", "v".to_string(), None).await;
    assert_eq!(store.len().await, 2);
    assert_eq!(store.stored_len().await, 2);
}

#[tokio::test(start_paused = true)]
async fn test_save_refreshes_ttl() {
    let repo = repository(Arc::new(MemorySessionStore::new()));
    let session = Session::at("q1");

    repo.save("f", ACCOUNT, &session).await;
    tokio::time::advance(Duration::from_secs(1700)).await;
    repo.save("f", ACCOUNT, &session).await;
    tokio::time::advance(Duration::from_secs(1700)).await;

    assert_eq!(repo.load("f", ACCOUNT).await, Some(session));
}

#[tokio::test]
async fn test_repository_round_trip_and_key_layout() {
    let store = Arc::new(MemorySessionStore::new());
    let repo = repository(store.clone());
    assert_eq!(repo.key("f", ACCOUNT), format!("formflow:session:f:{}", ACCOUNT));

    let mut session = Session::at("q2");
    session.answers.insert("q1".to_string(), json!("Alice"));
    assert!(repo.save("f", ACCOUNT, &session).await);

    let raw = store.get(&repo.key("f", ACCOUNT)).await.unwrap();
    let stored: serde_json::Value = serde_json::from_str(&raw).unwrap();
    assert_eq!(stored["currentNodeId"], "q2");
    assert_eq!(stored["answers"]["q1"], "Alice");

    assert_eq!(repo.load("f", ACCOUNT).await, Some(session));
    assert_eq!(repo.load("other-form", ACCOUNT).await, None);

    assert!(repo.clear("f", ACCOUNT).await);
    assert_eq!(repo.load("f", ACCOUNT).await, None);
}

#[tokio::test]
async fn test_corrupt_record_reads_as_missing() {
    let store = Arc::new(MemorySessionStore::new());
    let repo = repository(store.clone());
    store
        .set(&repo.key("f", ACCOUNT), "{ not json".to_string(), None)
        .await;

    assert_eq!(repo.load("f", ACCOUNT).await, None);
}

#[tokio::test]
async fn test_record_without_answers_still_loads() {
    let store = Arc::new(MemorySessionStore::new());
    let repo = repository(store.clone());
    store
        .set(&repo.key("f", ACCOUNT), r#"{"currentNodeId":"q3"}"#.to_string(), None)
        .await;

    assert_eq!(repo.load("f", ACCOUNT).await, Some(Session::at("q3")));
}

#[tokio::test]
async fn test_unreachable_store_never_errors() {
    let repo = repository(Arc::new(UnreachableStore));
    assert!(!repo.save("f", ACCOUNT, &Session::at("q1")).await);
    assert_eq!(repo.load("f", ACCOUNT).await, None);
    assert!(!repo.clear("f", ACCOUNT).await);
}

#[tokio::test]
async fn test_finalizer_writes_before_clearing() {
    let repo = repository(Arc::new(MemorySessionStore::new()));
    repo.save("f", ACCOUNT, &Session::at("q1")).await;

    let broken = Finalizer::new(Arc::new(BrokenSink), repo.clone());
    assert!(broken.complete("f", ACCOUNT, Default::default(), None).await.is_err());
    assert!(repo.load("f", ACCOUNT).await.is_some());

    let sink = Arc::new(MemorySubmissionSink::new());
    let finalizer = Finalizer::new(sink.clone(), repo.clone());
    finalizer
        .complete("f", ACCOUNT, Default::default(), Some("transfer".to_string()))
        .await
        .unwrap();
    assert!(repo.load("f", ACCOUNT).await.is_none());

    let rows = sink.submissions().await;
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0].transaction_kind.as_deref(), Some("transfer"));

    let row = serde_json::to_value(&rows[0]).unwrap();
    assert_eq!(row["formId"], "f");
    assert!(row.get("submittedAt").is_some());
}
