//! Reducer functions: one whole-snapshot transformation per processed payload.

use std::fmt;

type ReduceFn<S> = dyn FnOnce(&S) -> anyhow::Result<S> + Send;

/// A state transition produced by an action handler.
///
/// Receives the current snapshot by reference and returns a complete
/// replacement. The previous snapshot is never touched.
pub struct Reducer<S> {
    apply: Box<ReduceFn<S>>,
}

impl<S> Reducer<S> {
    /// Infallible reducer.
    pub fn new<F>(f: F) -> Self
    where
        F: FnOnce(&S) -> S + Send + 'static,
    {
        Self {
            apply: Box::new(move |state| Ok(f(state))),
        }
    }

    /// Reducer that may fail. A failure halts the store's fold pipeline.
    pub fn try_new<F>(f: F) -> Self
    where
        F: FnOnce(&S) -> anyhow::Result<S> + Send + 'static,
    {
        Self { apply: Box::new(f) }
    }

    /// Reducer that ignores the previous snapshot and installs `state`.
    pub fn replace(state: S) -> Self
    where
        S: Send + 'static,
    {
        Self::new(move |_| state)
    }

    pub fn apply(self, state: &S) -> anyhow::Result<S> {
        (self.apply)(state)
    }
}

impl<S> fmt::Debug for Reducer<S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Reducer")
    }
}
