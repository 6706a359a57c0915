//! Asynchronous todo backend used by the remote store.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Mutex, MutexGuard, PoisonError};
use std::time::Duration;

use async_trait::async_trait;
use thiserror::Error;

use crate::todo::Todo;

#[derive(Debug, Error)]
pub enum BackendError {
    #[error("todo not found: {0}")]
    NotFound(String),

    #[error("backend unavailable: {0}")]
    Unavailable(String),
}

/// Remote source of truth for todos. Each call completes asynchronously.
#[async_trait]
pub trait TodoBackend: Send + Sync {
    async fn list(&self) -> Result<Vec<Todo>, BackendError>;

    /// Create a todo; the backend assigns the id.
    async fn create(&self, text: &str) -> Result<Todo, BackendError>;

    async fn update_text(&self, id: &str, text: &str) -> Result<(), BackendError>;

    async fn set_completed(&self, id: &str, completed: bool) -> Result<(), BackendError>;

    async fn delete(&self, id: &str) -> Result<(), BackendError>;

    /// Delete completed todos and return what remains.
    async fn clear_completed(&self) -> Result<Vec<Todo>, BackendError>;

    /// Mark every todo and return the full list.
    async fn set_all_completed(&self, completed: bool) -> Result<Vec<Todo>, BackendError>;
}

/// In-process backend with optional simulated latency and outage.
#[derive(Debug, Default)]
pub struct MemoryBackend {
    todos: Mutex<Vec<Todo>>,
    latency: Duration,
    offline: AtomicBool,
}

impl MemoryBackend {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_latency(mut self, latency: Duration) -> Self {
        self.latency = latency;
        self
    }

    pub fn with_todos(self, todos: impl IntoIterator<Item = Todo>) -> Self {
        self.todos().extend(todos);
        self
    }

    /// While offline every call fails with [`BackendError::Unavailable`].
    pub fn set_offline(&self, offline: bool) {
        self.offline.store(offline, Ordering::SeqCst);
    }

    /// Copy of the backend's current todos.
    pub fn snapshot(&self) -> Vec<Todo> {
        self.todos().clone()
    }

    fn todos(&self) -> MutexGuard<'_, Vec<Todo>> {
        self.todos.lock().unwrap_or_else(PoisonError::into_inner)
    }

    async fn round_trip(&self) -> Result<(), BackendError> {
        if !self.latency.is_zero() {
            tokio::time::sleep(self.latency).await;
        }
        if self.offline.load(Ordering::SeqCst) {
            return Err(BackendError::Unavailable("memory backend is offline".into()));
        }
        Ok(())
    }

    fn with_todo(&self, id: &str, f: impl FnOnce(&mut Todo)) -> Result<(), BackendError> {
        let mut todos = self.todos();
        let todo = todos
            .iter_mut()
            .find(|t| t.id == id)
            .ok_or_else(|| BackendError::NotFound(id.to_string()))?;
        f(todo);
        Ok(())
    }
}

#[async_trait]
impl TodoBackend for MemoryBackend {
    async fn list(&self) -> Result<Vec<Todo>, BackendError> {
        self.round_trip().await?;
        Ok(self.snapshot())
    }

    async fn create(&self, text: &str) -> Result<Todo, BackendError> {
        self.round_trip().await?;
        let todo = Todo::new(text);
        self.todos().push(todo.clone());
        Ok(todo)
    }

    async fn update_text(&self, id: &str, text: &str) -> Result<(), BackendError> {
        self.round_trip().await?;
        self.with_todo(id, |t| t.text = text.to_string())
    }

    async fn set_completed(&self, id: &str, completed: bool) -> Result<(), BackendError> {
        self.round_trip().await?;
        self.with_todo(id, |t| t.completed = completed)
    }

    async fn delete(&self, id: &str) -> Result<(), BackendError> {
        self.round_trip().await?;
        let mut todos = self.todos();
        let before = todos.len();
        todos.retain(|t| t.id != id);
        if todos.len() == before {
            return Err(BackendError::NotFound(id.to_string()));
        }
        Ok(())
    }

    async fn clear_completed(&self) -> Result<Vec<Todo>, BackendError> {
        self.round_trip().await?;
        let mut todos = self.todos();
        todos.retain(|t| !t.completed);
        Ok(todos.clone())
    }

    async fn set_all_completed(&self, completed: bool) -> Result<Vec<Todo>, BackendError> {
        self.round_trip().await?;
        let mut todos = self.todos();
        for todo in todos.iter_mut() {
            todo.completed = completed;
        }
        Ok(todos.clone())
    }
}
