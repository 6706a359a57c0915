//! Reactive state-store engine.
//!
//! Each named action owns an unbounded payload channel. Its handler turns the
//! payload stream into a stream of reducers (filtering, mapping, or awaiting
//! asynchronous work along the way). The store merges every reducer stream in
//! arrival order, folds them over the initial snapshot, and publishes each
//! resulting snapshot to its change subscribers.
//!
//! ```ignore
//! let defs = ActionDefinitions::new().with("increment", |payloads: PayloadStream<i64>| {
//!     Ok(payloads.map(|n| Reducer::new(move |s: &i64| s + n)).boxed())
//! });
//! let store = Store::new(defs, 0)?;
//! let mut changes = store.changes();
//! store.dispatch("increment", 3)?;
//! assert_eq!(*changes.next().await.unwrap(), 3);
//! ```

pub mod changes;
pub mod channel;
pub mod config;
mod diagnostics;
pub mod error;
mod fold;
pub mod handler;
pub mod reducer;
pub mod store;

pub use changes::{Changes, FoldStatus};
pub use channel::{Actions, Dispatcher};
pub use config::StoreConfig;
pub use error::{StoreError, StoreResult};
pub use handler::{ActionDefinitions, ActionHandler, PayloadStream, ReducerStream};
pub use reducer::Reducer;
pub use store::Store;
