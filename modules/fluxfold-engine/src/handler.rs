//! The action handler contract.

use anyhow::Result;
use futures::stream::BoxStream;

use crate::reducer::Reducer;

/// Payloads dispatched to one action, in dispatch order.
pub type PayloadStream<P> = BoxStream<'static, P>;

/// Reducers emitted by one action handler, in the order the handler chose.
pub type ReducerStream<S> = BoxStream<'static, Reducer<S>>;

/// Turns an action's payload stream into a reducer stream.
///
/// Called exactly once per store, at construction. The returned stream is a
/// persistent pipeline: it may filter payloads, map them synchronously, or
/// await asynchronous work before emitting a reducer. Returning `Err` aborts
/// store construction.
///
/// Any `FnOnce(PayloadStream<P>) -> Result<ReducerStream<S>>` closure is a
/// handler.
pub trait ActionHandler<S, P>: Send {
    fn attach(self: Box<Self>, payloads: PayloadStream<P>) -> Result<ReducerStream<S>>;
}

impl<S, P, F> ActionHandler<S, P> for F
where
    F: FnOnce(PayloadStream<P>) -> Result<ReducerStream<S>> + Send,
{
    fn attach(self: Box<Self>, payloads: PayloadStream<P>) -> Result<ReducerStream<S>> {
        (*self)(payloads)
    }
}

/// Ordered, name-keyed set of action handlers supplied at store construction.
///
/// Order is kept for diagnostics only; it has no bearing on merge order.
pub struct ActionDefinitions<S, P> {
    entries: Vec<(String, Box<dyn ActionHandler<S, P>>)>,
}

impl<S, P> ActionDefinitions<S, P> {
    pub fn new() -> Self {
        Self {
            entries: Vec::new(),
        }
    }

    /// Register a handler closure under `name`. Duplicate names are reported
    /// when the store is constructed.
    pub fn with<F>(self, name: impl Into<String>, handler: F) -> Self
    where
        F: FnOnce(PayloadStream<P>) -> Result<ReducerStream<S>> + Send + 'static,
    {
        self.with_handler(name, handler)
    }

    /// Register any [`ActionHandler`] implementation under `name`.
    pub fn with_handler<H>(mut self, name: impl Into<String>, handler: H) -> Self
    where
        H: ActionHandler<S, P> + 'static,
    {
        self.entries.push((name.into(), Box::new(handler)));
        self
    }

    /// First name registered more than once, if any.
    pub fn duplicate_name(&self) -> Option<&str> {
        self.entries.iter().enumerate().find_map(|(i, (name, _))| {
            self.entries[..i]
                .iter()
                .any(|(earlier, _)| earlier == name)
                .then_some(name.as_str())
        })
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|(name, _)| name.as_str())
    }

    pub(crate) fn into_entries(self) -> Vec<(String, Box<dyn ActionHandler<S, P>>)> {
        self.entries
    }
}

impl<S, P> Default for ActionDefinitions<S, P> {
    fn default() -> Self {
        Self::new()
    }
}
