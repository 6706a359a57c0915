//! Todo list application built on `fluxfold-engine`.
//!
//! Two handler sets share one state type ([`TodoList`]) and one payload
//! vocabulary ([`TodoAction`]):
//!
//! - [`local`]: synchronous handlers that persist through an injected
//!   [`TodoStorage`] slot.
//! - [`remote`]: asynchronous handlers that wait on an injected
//!   [`TodoBackend`] before emitting a reducer.

pub mod backend;
pub mod config;
pub mod local;
pub mod payload;
pub mod remote;
pub mod storage;
pub mod store;
pub mod todo;

pub use backend::{BackendError, MemoryBackend, TodoBackend};
pub use config::TodoConfig;
pub use payload::TodoAction;
pub use storage::{JsonFileStorage, MemoryStorage, StorageError, TodoStorage};
pub use store::TodoStore;
pub use todo::{Todo, TodoList};
