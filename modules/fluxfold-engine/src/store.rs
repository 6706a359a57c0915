//! Store construction and the public read/write surface.

use std::fmt::Debug;
use std::sync::Arc;

use futures::stream::{self, BoxStream};
use futures::StreamExt;
use tokio::runtime::Handle;
use tracing::{info, info_span, Instrument, Span};

use crate::changes::{ChangeBus, Changes, FoldStatus};
use crate::channel::{ActionChannel, Actions, Dispatcher};
use crate::config::StoreConfig;
use crate::diagnostics::{self, Diagnostics};
use crate::error::{StoreError, StoreResult};
use crate::fold::{self, Tagged};
use crate::handler::ActionDefinitions;

/// A reactive state store.
///
/// Dispatch → handler → merge → fold → publish. The fold runs as one task on
/// the tokio runtime that was current at construction.
///
/// Dropping the store (and every cloned [`Dispatcher`]) ends each payload
/// stream; once all handler streams finish, the fold stops with
/// [`FoldStatus::Finished`] and change subscriptions end.
pub struct Store<S, P> {
    name: String,
    actions: Actions<P>,
    bus: Arc<ChangeBus<S>>,
    diagnostics: Arc<Diagnostics>,
    runtime: Handle,
    span: Span,
}

impl<S, P> Store<S, P>
where
    S: Send + Sync + 'static,
    P: Send + 'static,
{
    pub fn new(definitions: ActionDefinitions<S, P>, initial: S) -> StoreResult<Self> {
        Self::start(definitions, initial, StoreConfig::default())
    }

    /// Start from `S::default()`.
    pub fn with_default_state(definitions: ActionDefinitions<S, P>) -> StoreResult<Self>
    where
        S: Default,
    {
        Self::new(definitions, S::default())
    }

    /// Wire every handler and start the fold. `config.log` is left to the
    /// caller.
    ///
    /// Handlers are attached in definition order. If any of them fails to
    /// set up, nothing is spawned and the error is returned.
    fn start(
        definitions: ActionDefinitions<S, P>,
        initial: S,
        config: StoreConfig,
    ) -> StoreResult<Self> {
        let runtime = Handle::try_current().map_err(|_| StoreError::NoRuntime)?;

        if let Some(name) = definitions.duplicate_name() {
            return Err(StoreError::DuplicateAction(name.to_string()));
        }

        let entries = definitions.into_entries();
        let mut dispatchers: Vec<Dispatcher<P>> = Vec::with_capacity(entries.len());
        let mut reducer_streams: Vec<BoxStream<'static, Tagged<S>>> =
            Vec::with_capacity(entries.len());

        for (name, handler) in entries {
            let (channel, payloads) = ActionChannel::open(&name);
            let reducers = handler
                .attach(payloads)
                .map_err(|source| StoreError::HandlerSetup {
                    action: name.clone(),
                    source,
                })?;

            let tag: Arc<str> = Arc::from(name.as_str());
            reducer_streams.push(reducers.map(move |r| (tag.clone(), r)).boxed());
            dispatchers.push(channel.dispatcher());
        }

        // Fan-in: reducers are yielded in the order their streams woke up.
        let merged = stream::select_all(reducer_streams).boxed();

        let bus = Arc::new(ChangeBus::new(Arc::new(initial)));
        let diagnostics = Arc::new(Diagnostics::default());
        let span = info_span!("store", name = %config.name);

        runtime.spawn(
            fold::run(merged, bus.clone(), diagnostics.clone()).instrument(span.clone()),
        );

        let actions = Actions::from_dispatchers(dispatchers);
        span.in_scope(|| {
            info!(
                actions = ?actions.names().collect::<Vec<_>>(),
                "store started"
            );
        });

        Ok(Self {
            name: config.name,
            actions,
            bus,
            diagnostics,
            runtime,
            span,
        })
    }

    /// Dispatch table, one entry per action.
    pub fn actions(&self) -> &Actions<P> {
        &self.actions
    }

    /// Dispatch `payload` to the action registered as `action`.
    pub fn dispatch(&self, action: &str, payload: P) -> StoreResult<()> {
        self.actions.dispatch(action, payload)
    }

    /// New subscription. Sees only snapshots published from now on.
    pub fn changes(&self) -> Changes<S> {
        self.bus.subscribe()
    }

    /// The latest published snapshot, or the initial one.
    pub fn current_state(&self) -> Arc<S> {
        self.bus.current()
    }

    /// Number of snapshots published so far.
    pub fn version(&self) -> u64 {
        self.bus.version()
    }

    pub fn status(&self) -> FoldStatus {
        self.bus.status()
    }

    pub fn action_names(&self) -> impl Iterator<Item = &str> {
        self.actions.names()
    }

    pub fn name(&self) -> &str {
        &self.name
    }
}

impl<S, P> Store<S, P>
where
    S: Debug + Send + Sync + 'static,
    P: Send + 'static,
{
    /// Start a store with explicit settings. Switches on [`Store::log`] when
    /// `config.log` is set.
    pub fn with_config(
        definitions: ActionDefinitions<S, P>,
        initial: S,
        config: StoreConfig,
    ) -> StoreResult<Self> {
        let log = config.log;
        let store = Self::start(definitions, initial, config)?;
        if log {
            store.log();
        }
        Ok(store)
    }

    /// Report reducers and snapshots through `tracing`.
    ///
    /// Calling it again is a no-op.
    pub fn log(&self) {
        if !self.diagnostics.enable() {
            return;
        }
        let changes = self.changes();
        self.runtime
            .spawn(diagnostics::observe_changes(changes).instrument(self.span.clone()));
    }
}

impl<S, P> Debug for Store<S, P> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Store")
            .field("name", &self.name)
            .field("actions", &self.actions.names().collect::<Vec<_>>())
            .field("version", &self.bus.version())
            .finish()
    }
}
