//! Todo items and the list snapshot folded by the store.

use std::sync::Arc;

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Todo {
    pub id: String,
    pub text: String,
    #[serde(default)]
    pub completed: bool,
}

impl Todo {
    /// New, not yet completed todo with a fresh id.
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            id: uuid::Uuid::new_v4().to_string(),
            text: text.into(),
            completed: false,
        }
    }
}

/// Insertion-ordered todo list.
///
/// Every operation returns a new list. Untouched todos are shared with the
/// previous list through `Arc`, so older snapshots stay valid and cheap.
/// Operations addressing an unknown id return an identical list.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TodoList {
    items: Vec<Arc<Todo>>,
}

impl TodoList {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn get(&self, id: &str) -> Option<&Todo> {
        self.items.iter().find(|t| t.id == id).map(|t| &**t)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Todo> {
        self.items.iter().map(|t| &**t)
    }

    pub fn active_count(&self) -> usize {
        self.iter().filter(|t| !t.completed).count()
    }

    pub fn completed_count(&self) -> usize {
        self.iter().filter(|t| t.completed).count()
    }

    /// Insert `todo`, replacing any existing todo with the same id in place.
    pub fn insert(&self, todo: Todo) -> Self {
        let mut items = self.items.clone();
        match items.iter().position(|t| t.id == todo.id) {
            Some(i) => items[i] = Arc::new(todo),
            None => items.push(Arc::new(todo)),
        }
        Self { items }
    }

    pub fn set_text(&self, id: &str, text: &str) -> Self {
        self.update(id, |todo| todo.text = text.to_string())
    }

    pub fn set_completed(&self, id: &str, completed: bool) -> Self {
        self.update(id, |todo| todo.completed = completed)
    }

    pub fn remove(&self, id: &str) -> Self {
        self.filtered(|t| t.id != id)
    }

    /// Drop every completed todo.
    pub fn retain_active(&self) -> Self {
        self.filtered(|t| !t.completed)
    }

    pub fn set_all_completed(&self, completed: bool) -> Self {
        let items = self
            .items
            .iter()
            .map(|t| {
                if t.completed == completed {
                    t.clone()
                } else {
                    let mut todo = (**t).clone();
                    todo.completed = completed;
                    Arc::new(todo)
                }
            })
            .collect();
        Self { items }
    }

    /// Owned copies, in order. Used for serialization.
    pub fn to_vec(&self) -> Vec<Todo> {
        self.iter().cloned().collect()
    }

    fn update(&self, id: &str, f: impl FnOnce(&mut Todo)) -> Self {
        let mut items = self.items.clone();
        if let Some(slot) = items.iter_mut().find(|t| t.id == id) {
            let mut todo = (**slot).clone();
            f(&mut todo);
            *slot = Arc::new(todo);
        }
        Self { items }
    }

    fn filtered(&self, keep: impl Fn(&Todo) -> bool) -> Self {
        Self {
            items: self.items.iter().filter(|t| keep(t)).cloned().collect(),
        }
    }
}

impl FromIterator<Todo> for TodoList {
    fn from_iter<I: IntoIterator<Item = Todo>>(iter: I) -> Self {
        let mut list = TodoList::new();
        for todo in iter {
            list = list.insert(todo);
        }
        list
    }
}
