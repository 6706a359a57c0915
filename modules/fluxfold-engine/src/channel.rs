//! Per-action payload channels and the dispatch table built on them.

use std::collections::HashMap;
use std::sync::Arc;

use futures::channel::mpsc::{self, UnboundedSender};
use futures::StreamExt;

use crate::error::{StoreError, StoreResult};
use crate::handler::PayloadStream;

/// Unbounded FIFO channel feeding one action handler.
///
/// Owned by the store. Callers only ever see the [`Dispatcher`] wrapping its
/// sending half.
pub(crate) struct ActionChannel<P> {
    name: Arc<str>,
    tx: UnboundedSender<P>,
}

impl<P: Send + 'static> ActionChannel<P> {
    /// Create the channel and the payload stream its handler subscribes to.
    pub(crate) fn open(name: &str) -> (Self, PayloadStream<P>) {
        let (tx, rx) = mpsc::unbounded();
        let channel = Self {
            name: Arc::from(name),
            tx,
        };
        (channel, rx.boxed())
    }

    pub(crate) fn dispatcher(&self) -> Dispatcher<P> {
        Dispatcher {
            action: self.name.clone(),
            tx: self.tx.clone(),
        }
    }
}

/// Cheap, cloneable dispatch function for one action.
pub struct Dispatcher<P> {
    action: Arc<str>,
    tx: UnboundedSender<P>,
}

impl<P> Dispatcher<P> {
    /// Push a payload into the action's channel.
    ///
    /// Never blocks. Fails only once the store's fold pipeline has stopped
    /// and nothing is left to consume the payload.
    pub fn dispatch(&self, payload: P) -> StoreResult<()> {
        self.tx
            .unbounded_send(payload)
            .map_err(|_| StoreError::Halted(self.action.to_string()))
    }

    pub fn action(&self) -> &str {
        &self.action
    }
}

impl<P> Clone for Dispatcher<P> {
    fn clone(&self) -> Self {
        Self {
            action: self.action.clone(),
            tx: self.tx.clone(),
        }
    }
}

impl<P> std::fmt::Debug for Dispatcher<P> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Dispatcher")
            .field("action", &self.action)
            .finish()
    }
}

/// The store's write surface: one [`Dispatcher`] per action name.
pub struct Actions<P> {
    order: Vec<Arc<str>>,
    by_name: HashMap<Arc<str>, Dispatcher<P>>,
}

impl<P> Actions<P> {
    pub(crate) fn from_dispatchers(dispatchers: Vec<Dispatcher<P>>) -> Self {
        let order = dispatchers.iter().map(|d| d.action.clone()).collect();
        let by_name = dispatchers
            .into_iter()
            .map(|d| (d.action.clone(), d))
            .collect();
        Self { order, by_name }
    }

    pub fn get(&self, action: &str) -> Option<&Dispatcher<P>> {
        self.by_name.get(action)
    }

    /// Dispatch by action name.
    pub fn dispatch(&self, action: &str, payload: P) -> StoreResult<()> {
        self.get(action)
            .ok_or_else(|| StoreError::UnknownAction(action.to_string()))?
            .dispatch(payload)
    }

    /// Action names in definition order.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.order.iter().map(|name| &**name)
    }

    pub fn len(&self) -> usize {
        self.order.len()
    }

    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }
}
