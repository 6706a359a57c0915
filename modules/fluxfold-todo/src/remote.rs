//! Remote todo store: each payload waits for a [`TodoBackend`] call.
//!
//! A reducer is emitted only once the call succeeds. By default calls for
//! one action run one at a time, so reducers for an action keep dispatch
//! order; calls for different actions overlap freely.
//! [`definitions_with_concurrency`] lets several calls per action be in
//! flight at once, and their reducers then follow completion order instead.
//! Backend failures stay inside the handler: they are logged and produce no
//! reducer.

use std::sync::Arc;

use fluxfold_engine::{ActionDefinitions, PayloadStream, Reducer, ReducerStream};
use futures::future;
use futures::StreamExt;
use serde_json::Value;
use tracing::{debug, warn};

use crate::backend::{BackendError, TodoBackend};
use crate::payload::{self, parse, TextUpdate, TodoAction, TodoRef};
use crate::todo::{Todo, TodoList};

/// Handler set for a store mirroring `backend`, one call per action at a
/// time.
pub fn definitions(backend: Arc<dyn TodoBackend>) -> ActionDefinitions<TodoList, Value> {
    definitions_with_concurrency(backend, 1)
}

/// Handler set allowing up to `in_flight` backend calls per action (at
/// least one).
pub fn definitions_with_concurrency(
    backend: Arc<dyn TodoBackend>,
    in_flight: usize,
) -> ActionDefinitions<TodoList, Value> {
    let in_flight = in_flight.max(1);
    let mut defs = ActionDefinitions::new();
    for action in TodoAction::ALL {
        let backend = backend.clone();
        defs = defs.with(action.name(), move |payloads: PayloadStream<Value>| {
            Ok(handler(action, backend, in_flight, payloads))
        });
    }
    defs
}

/// Validated request for one backend call.
enum Request {
    List,
    Create(String),
    UpdateText(TextUpdate),
    SetCompleted { id: String, completed: bool },
    Delete(String),
    ClearCompleted,
    SetAllCompleted(bool),
}

fn handler(
    action: TodoAction,
    backend: Arc<dyn TodoBackend>,
    in_flight: usize,
    payloads: PayloadStream<Value>,
) -> ReducerStream<TodoList> {
    payloads
        .filter_map(move |payload| future::ready(request_for(action, payload)))
        .map(move |request| {
            let backend = backend.clone();
            async move { call(&*backend, request).await }
        })
        // A limit of one completes in submission order.
        .buffer_unordered(in_flight)
        .filter_map(move |result| {
            future::ready(match result {
                Ok(reducer) => Some(reducer),
                Err(e) => {
                    warn!(action = action.name(), error = %e, "Backend call failed, no state change");
                    None
                }
            })
        })
        .boxed()
}

fn request_for(action: TodoAction, payload: Value) -> Option<Request> {
    let request = match action {
        TodoAction::LoadAll => Request::List,
        TodoAction::Create => Request::Create(payload::create_text(payload)?),
        TodoAction::UpdateText => Request::UpdateText(payload::text_update(payload)?),
        TodoAction::ToggleComplete => {
            let todo: TodoRef = parse(action, payload)?;
            Request::SetCompleted {
                id: todo.id,
                completed: !todo.completed,
            }
        }
        TodoAction::Destroy => Request::Delete(parse::<TodoRef>(action, payload)?.id),
        TodoAction::ClearCompleted => Request::ClearCompleted,
        TodoAction::ToggleAll => Request::SetAllCompleted(parse(action, payload)?),
    };
    Some(request)
}

async fn call(
    backend: &dyn TodoBackend,
    request: Request,
) -> Result<Reducer<TodoList>, BackendError> {
    let reducer = match request {
        Request::List => replace_all(backend.list().await?),
        Request::Create(text) => {
            let todo = backend.create(&text).await?;
            debug!(id = %todo.id, "Backend created todo");
            Reducer::new(move |list: &TodoList| list.insert(todo))
        }
        Request::UpdateText(TextUpdate { id, text }) => {
            backend.update_text(&id, &text).await?;
            Reducer::new(move |list: &TodoList| list.set_text(&id, &text))
        }
        Request::SetCompleted { id, completed } => {
            backend.set_completed(&id, completed).await?;
            Reducer::new(move |list: &TodoList| list.set_completed(&id, completed))
        }
        Request::Delete(id) => {
            backend.delete(&id).await?;
            Reducer::new(move |list: &TodoList| list.remove(&id))
        }
        Request::ClearCompleted => replace_all(backend.clear_completed().await?),
        Request::SetAllCompleted(completed) => {
            replace_all(backend.set_all_completed(completed).await?)
        }
    };
    Ok(reducer)
}

fn replace_all(todos: Vec<Todo>) -> Reducer<TodoList> {
    Reducer::replace(todos.into_iter().collect())
}
