//! Current-state bookkeeping and the multicast change stream.
//!
//! The fold task is the only writer. Publishing swaps the current snapshot
//! and fans the new snapshot out to every live subscriber under one lock, so
//! a subscriber that attaches after N publications never sees any of them
//! and every attached subscriber sees every later one, in order.

use std::pin::Pin;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::task::{Context, Poll};

use futures::channel::mpsc::{self, UnboundedReceiver, UnboundedSender};
use futures::Stream;

/// Where the fold pipeline stands.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FoldStatus {
    /// Accepting reducers.
    Running,
    /// A reducer failed. The last good snapshot stays current.
    Halted { action: String, error: String },
    /// Every handler stream ended (the store was dropped).
    Finished,
}

struct Inner<S> {
    current: Arc<S>,
    version: u64,
    status: FoldStatus,
    subscribers: Vec<UnboundedSender<Arc<S>>>,
}

/// Shared between the store handle and its fold task.
pub(crate) struct ChangeBus<S> {
    inner: Mutex<Inner<S>>,
}

impl<S> ChangeBus<S> {
    pub(crate) fn new(initial: Arc<S>) -> Self {
        Self {
            inner: Mutex::new(Inner {
                current: initial,
                version: 0,
                status: FoldStatus::Running,
                subscribers: Vec::new(),
            }),
        }
    }

    fn lock(&self) -> MutexGuard<'_, Inner<S>> {
        // Reducers run before the lock is taken, so nothing panics while it is
        // held; recover the data regardless.
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }

    pub(crate) fn current(&self) -> Arc<S> {
        self.lock().current.clone()
    }

    pub(crate) fn version(&self) -> u64 {
        self.lock().version
    }

    pub(crate) fn status(&self) -> FoldStatus {
        self.lock().status.clone()
    }

    /// Attach a subscriber. Once the fold has stopped the returned stream
    /// is already closed.
    pub(crate) fn subscribe(&self) -> Changes<S> {
        let (tx, rx) = mpsc::unbounded();
        let mut inner = self.lock();
        if inner.status == FoldStatus::Running {
            inner.subscribers.push(tx);
        }
        Changes { rx }
    }

    /// Install `snapshot` as current, then notify subscribers. Dropped
    /// subscribers are pruned here.
    pub(crate) fn publish(&self, snapshot: Arc<S>) -> u64 {
        let mut inner = self.lock();
        inner.current = snapshot.clone();
        inner.version += 1;
        inner
            .subscribers
            .retain(|tx| tx.unbounded_send(snapshot.clone()).is_ok());
        inner.version
    }

    /// Record the terminal status and close every subscription.
    pub(crate) fn close(&self, status: FoldStatus) {
        let mut inner = self.lock();
        inner.status = status;
        inner.subscribers.clear();
    }
}

/// A subscription to a store's snapshots.
///
/// Yields every snapshot published after the subscription was created. Ends
/// only when the fold pipeline stops.
pub struct Changes<S> {
    rx: UnboundedReceiver<Arc<S>>,
}

impl<S> Stream for Changes<S> {
    type Item = Arc<S>;

    fn poll_next(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Option<Self::Item>> {
        Pin::new(&mut self.rx).poll_next(cx)
    }
}
