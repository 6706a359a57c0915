//! Local todo store: synchronous handlers persisting through [`TodoStorage`].
//!
//! Every reducer writes the list it produces back to storage. A storage
//! failure inside a reducer is a reducer failure and halts the store.

use std::sync::Arc;

use anyhow::Context;
use fluxfold_engine::{ActionDefinitions, PayloadStream, Reducer, ReducerStream};
use futures::future;
use futures::StreamExt;
use serde_json::Value;

use crate::payload::{self, parse, TextUpdate, TodoAction, TodoRef};
use crate::storage::TodoStorage;
use crate::todo::{Todo, TodoList};

/// Handler set for a store backed by `storage`.
pub fn definitions(storage: Arc<dyn TodoStorage>) -> ActionDefinitions<TodoList, Value> {
    let mut defs = ActionDefinitions::new();
    for action in TodoAction::ALL {
        let storage = storage.clone();
        defs = defs.with(action.name(), move |payloads: PayloadStream<Value>| {
            Ok(handler(action, storage, payloads))
        });
    }
    defs
}

fn handler(
    action: TodoAction,
    storage: Arc<dyn TodoStorage>,
    payloads: PayloadStream<Value>,
) -> ReducerStream<TodoList> {
    payloads
        .filter_map(move |payload| future::ready(reducer_for(action, &storage, payload)))
        .boxed()
}

fn reducer_for(
    action: TodoAction,
    storage: &Arc<dyn TodoStorage>,
    payload: Value,
) -> Option<Reducer<TodoList>> {
    let storage = storage.clone();
    let reducer = match action {
        TodoAction::LoadAll => Reducer::try_new(move |_: &TodoList| {
            storage.load().context("loading todo list")
        }),
        TodoAction::Create => {
            let todo = Todo::new(payload::create_text(payload)?);
            Reducer::try_new(move |list: &TodoList| persist(&*storage, list.insert(todo)))
        }
        TodoAction::UpdateText => {
            let TextUpdate { id, text } = payload::text_update(payload)?;
            Reducer::try_new(move |list: &TodoList| persist(&*storage, list.set_text(&id, &text)))
        }
        TodoAction::ToggleComplete => {
            let todo: TodoRef = parse(action, payload)?;
            Reducer::try_new(move |list: &TodoList| {
                persist(&*storage, list.set_completed(&todo.id, !todo.completed))
            })
        }
        TodoAction::Destroy => {
            let todo: TodoRef = parse(action, payload)?;
            Reducer::try_new(move |list: &TodoList| persist(&*storage, list.remove(&todo.id)))
        }
        TodoAction::ClearCompleted => {
            Reducer::try_new(move |list: &TodoList| persist(&*storage, list.retain_active()))
        }
        TodoAction::ToggleAll => {
            let checked: bool = parse(action, payload)?;
            Reducer::try_new(move |list: &TodoList| {
                persist(&*storage, list.set_all_completed(checked))
            })
        }
    };
    Some(reducer)
}

fn persist(storage: &dyn TodoStorage, list: TodoList) -> anyhow::Result<TodoList> {
    storage.save(&list).context("saving todo list")?;
    Ok(list)
}
