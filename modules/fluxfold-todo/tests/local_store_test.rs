//! Local todo store: synchronous handlers over injected storage.

use std::sync::Arc;
use std::time::Duration;

use fluxfold_engine::{Changes, FoldStatus, StoreConfig};
use fluxfold_todo::storage::{self, StorageError};
use fluxfold_todo::{MemoryStorage, Todo, TodoList, TodoStorage, TodoStore};
use futures::StreamExt;
use serde_json::json;

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

const WAIT: Duration = Duration::from_secs(2);

async fn next(changes: &mut Changes<TodoList>) -> Arc<TodoList> {
    tokio::time::timeout(WAIT, changes.next())
        .await
        .expect("timed out waiting for a snapshot")
        .expect("change stream ended unexpectedly")
}

fn todo(id: &str, text: &str, completed: bool) -> Todo {
    Todo {
        id: id.into(),
        text: text.into(),
        completed,
    }
}

fn local(storage: Arc<MemoryStorage>) -> TodoStore {
    TodoStore::local(storage, StoreConfig::builder().name("local-test").build()).unwrap()
}

/// Storage whose writes always fail.
struct ReadOnlyStorage;

impl TodoStorage for ReadOnlyStorage {
    fn load(&self) -> Result<TodoList, StorageError> {
        Ok(TodoList::new())
    }

    fn save(&self, _list: &TodoList) -> Result<(), StorageError> {
        Err(StorageError::Io(std::io::Error::new(
            std::io::ErrorKind::PermissionDenied,
            "read-only",
        )))
    }
}

// =========================================================================
// Tests
// =========================================================================

#[tokio::test]
async fn create_appends_and_persists() {
    let storage = Arc::new(MemoryStorage::new());
    let store = local(storage.clone());
    let mut changes = store.changes();

    store.create("buy milk").unwrap();
    let list = next(&mut changes).await;

    assert_eq!(list.len(), 1);
    let created = list.iter().next().unwrap();
    assert_eq!(created.text, "buy milk");
    assert!(!created.completed);

    let persisted = storage::decode(&storage.raw().unwrap()).unwrap();
    assert_eq!(persisted, *list);
}

#[tokio::test]
async fn blank_create_is_ignored() {
    let storage = Arc::new(MemoryStorage::new());
    let store = local(storage.clone());
    let mut changes = store.changes();

    store.create("").unwrap();
    store.create("   ").unwrap();
    store.create("real").unwrap();

    let list = next(&mut changes).await;
    assert_eq!(list.len(), 1);
    assert_eq!(list.iter().next().unwrap().text, "real");
    assert_eq!(store.inner().version(), 1);
}

#[tokio::test]
async fn load_all_reads_storage() {
    let storage = Arc::new(
        MemoryStorage::with_todos(vec![todo("a", "one", false), todo("b", "two", true)]).unwrap(),
    );
    let store = local(storage);
    let mut changes = store.changes();

    store.load_all().unwrap();
    let list = next(&mut changes).await;

    assert_eq!(list.len(), 2);
    assert!(list.get("b").unwrap().completed);
}

#[tokio::test]
async fn edits_flow_through_to_storage() {
    let storage = Arc::new(
        MemoryStorage::with_todos(vec![
            todo("a", "one", false),
            todo("b", "two", false),
            todo("c", "three", false),
        ])
        .unwrap(),
    );
    let store = local(storage.clone());
    let mut changes = store.changes();

    store.load_all().unwrap();
    let loaded = next(&mut changes).await;

    store.update_text("a", "uno").unwrap();
    store.toggle_complete(loaded.get("b").unwrap()).unwrap();
    store.destroy("c").unwrap();
    next(&mut changes).await;
    next(&mut changes).await;
    let list = next(&mut changes).await;

    assert_eq!(list.get("a").unwrap().text, "uno");
    assert!(list.get("b").unwrap().completed);
    assert!(list.get("c").is_none());
    assert_eq!(storage.load().unwrap(), *list);
}

#[tokio::test]
async fn blank_update_text_is_ignored() {
    let storage = Arc::new(MemoryStorage::with_todos(vec![todo("a", "one", false)]).unwrap());
    let store = local(storage);
    let mut changes = store.changes();

    store.load_all().unwrap();
    next(&mut changes).await;

    store.update_text("a", "  ").unwrap();
    store.update_text("a", "kept").unwrap();
    let list = next(&mut changes).await;
    assert_eq!(list.get("a").unwrap().text, "kept");
    assert_eq!(store.inner().version(), 2);
}

#[tokio::test]
async fn toggle_all_then_clear_completed() {
    let storage = Arc::new(
        MemoryStorage::with_todos(vec![todo("a", "one", false), todo("b", "two", true)]).unwrap(),
    );
    let store = local(storage.clone());
    let mut changes = store.changes();

    store.load_all().unwrap();
    next(&mut changes).await;

    store.toggle_all(true).unwrap();
    let all_done = next(&mut changes).await;
    assert_eq!(all_done.completed_count(), 2);

    store.clear_completed().unwrap();
    let cleared = next(&mut changes).await;
    assert!(cleared.is_empty());
    assert!(storage.load().unwrap().is_empty());
}

#[tokio::test]
async fn malformed_payload_is_dropped() {
    let store = local(Arc::new(MemoryStorage::new()));
    let mut changes = store.changes();

    store.inner().dispatch("updateText", json!(5)).unwrap();
    store.inner().dispatch("toggleAll", json!("yes")).unwrap();
    store.create("after").unwrap();

    let list = next(&mut changes).await;
    assert_eq!(list.len(), 1);
    assert_eq!(store.inner().version(), 1);
}

#[tokio::test]
async fn storage_failure_halts_the_store() {
    let store = TodoStore::local(Arc::new(ReadOnlyStorage), StoreConfig::default()).unwrap();
    let mut changes = store.changes();

    store.create("doomed").unwrap();

    let ended = tokio::time::timeout(WAIT, changes.next()).await.unwrap();
    assert!(ended.is_none());
    assert!(matches!(
        store.status(),
        FoldStatus::Halted { ref action, .. } if action == "create"
    ));
    assert!(store.current().is_empty());
    assert!(store.create("too late").is_err());
}
