//! Typed facade over a todo [`Store`].

use std::sync::Arc;

use fluxfold_engine::{Changes, FoldStatus, Store, StoreConfig, StoreResult};
use serde_json::{json, Value};

use crate::backend::TodoBackend;
use crate::payload::TodoAction;
use crate::storage::TodoStorage;
use crate::todo::{Todo, TodoList};
use crate::{local, remote};

/// A todo store with one method per action.
pub struct TodoStore {
    inner: Store<TodoList, Value>,
}

impl TodoStore {
    /// Store persisted through `storage`. Starts empty; dispatch
    /// [`TodoStore::load_all`] to read what is stored.
    pub fn local(storage: Arc<dyn TodoStorage>, config: StoreConfig) -> StoreResult<Self> {
        let inner = Store::with_config(local::definitions(storage), TodoList::new(), config)?;
        Ok(Self { inner })
    }

    /// Store mirroring `backend`.
    pub fn remote(backend: Arc<dyn TodoBackend>, config: StoreConfig) -> StoreResult<Self> {
        let inner = Store::with_config(remote::definitions(backend), TodoList::new(), config)?;
        Ok(Self { inner })
    }

    /// Store mirroring `backend` with up to `in_flight` calls per action
    /// outstanding. Reducers for one action then land in completion order.
    pub fn remote_concurrent(
        backend: Arc<dyn TodoBackend>,
        config: StoreConfig,
        in_flight: usize,
    ) -> StoreResult<Self> {
        let definitions = remote::definitions_with_concurrency(backend, in_flight);
        let inner = Store::with_config(definitions, TodoList::new(), config)?;
        Ok(Self { inner })
    }

    pub fn load_all(&self) -> StoreResult<()> {
        self.send(TodoAction::LoadAll, Value::Null)
    }

    pub fn create(&self, text: &str) -> StoreResult<()> {
        self.send(TodoAction::Create, json!(text))
    }

    pub fn update_text(&self, id: &str, text: &str) -> StoreResult<()> {
        self.send(TodoAction::UpdateText, json!({ "id": id, "text": text }))
    }

    /// Flip `todo`'s completed flag.
    pub fn toggle_complete(&self, todo: &Todo) -> StoreResult<()> {
        self.send(
            TodoAction::ToggleComplete,
            json!({ "id": todo.id, "completed": todo.completed }),
        )
    }

    pub fn destroy(&self, id: &str) -> StoreResult<()> {
        self.send(TodoAction::Destroy, json!({ "id": id }))
    }

    pub fn clear_completed(&self) -> StoreResult<()> {
        self.send(TodoAction::ClearCompleted, Value::Null)
    }

    pub fn toggle_all(&self, checked: bool) -> StoreResult<()> {
        self.send(TodoAction::ToggleAll, json!(checked))
    }

    pub fn changes(&self) -> Changes<TodoList> {
        self.inner.changes()
    }

    pub fn current(&self) -> Arc<TodoList> {
        self.inner.current_state()
    }

    pub fn status(&self) -> FoldStatus {
        self.inner.status()
    }

    pub fn log(&self) {
        self.inner.log();
    }

    /// The underlying untyped store.
    pub fn inner(&self) -> &Store<TodoList, Value> {
        &self.inner
    }

    fn send(&self, action: TodoAction, payload: Value) -> StoreResult<()> {
        self.inner.dispatch(action.name(), payload)
    }
}
