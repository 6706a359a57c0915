//! Injected persistence for the local store.
//!
//! The list is kept as a JSON array in a single slot. A missing slot loads as
//! an empty list.

use std::path::{Path, PathBuf};
use std::sync::{Mutex, PoisonError};

use thiserror::Error;
use tracing::debug;

use crate::todo::{Todo, TodoList};

#[derive(Debug, Error)]
pub enum StorageError {
    #[error("storage I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("storage JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// A single-slot store for the serialized todo list.
pub trait TodoStorage: Send + Sync {
    fn load(&self) -> Result<TodoList, StorageError>;
    fn save(&self, list: &TodoList) -> Result<(), StorageError>;
}

pub fn encode(list: &TodoList) -> Result<String, StorageError> {
    Ok(serde_json::to_string_pretty(&list.to_vec())?)
}

pub fn decode(raw: &str) -> Result<TodoList, StorageError> {
    let todos: Vec<Todo> = serde_json::from_str(raw)?;
    Ok(todos.into_iter().collect())
}

// ---------------------------------------------------------------------------
// MemoryStorage
// ---------------------------------------------------------------------------

/// In-process slot. Holds the serialized form so encode/decode are exercised
/// exactly as with a file.
#[derive(Debug, Default)]
pub struct MemoryStorage {
    slot: Mutex<Option<String>>,
}

impl MemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }

    /// Pre-populated slot.
    pub fn with_todos(todos: impl IntoIterator<Item = Todo>) -> Result<Self, StorageError> {
        let list: TodoList = todos.into_iter().collect();
        Ok(Self {
            slot: Mutex::new(Some(encode(&list)?)),
        })
    }

    /// Raw slot contents.
    pub fn raw(&self) -> Option<String> {
        self.slot
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }
}

impl TodoStorage for MemoryStorage {
    fn load(&self) -> Result<TodoList, StorageError> {
        match self.raw() {
            Some(raw) => decode(&raw),
            None => Ok(TodoList::new()),
        }
    }

    fn save(&self, list: &TodoList) -> Result<(), StorageError> {
        let raw = encode(list)?;
        *self.slot.lock().unwrap_or_else(PoisonError::into_inner) = Some(raw);
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// JsonFileStorage
// ---------------------------------------------------------------------------

/// Slot backed by a JSON file.
#[derive(Debug, Clone)]
pub struct JsonFileStorage {
    path: PathBuf,
}

impl JsonFileStorage {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl TodoStorage for JsonFileStorage {
    fn load(&self) -> Result<TodoList, StorageError> {
        match std::fs::read_to_string(&self.path) {
            Ok(raw) => decode(&raw),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                debug!(path = %self.path.display(), "No todo file yet, starting empty");
                Ok(TodoList::new())
            }
            Err(e) => Err(e.into()),
        }
    }

    fn save(&self, list: &TodoList) -> Result<(), StorageError> {
        std::fs::write(&self.path, encode(list)?)?;
        debug!(path = %self.path.display(), todos = list.len(), "Saved todo list");
        Ok(())
    }
}
