//! Action names and payload shapes shared by the local and remote stores.

use serde::de::DeserializeOwned;
use serde::Deserialize;
use serde_json::Value;
use tracing::warn;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TodoAction {
    LoadAll,
    Create,
    UpdateText,
    ToggleComplete,
    Destroy,
    ClearCompleted,
    ToggleAll,
}

impl TodoAction {
    pub const ALL: [TodoAction; 7] = [
        TodoAction::LoadAll,
        TodoAction::Create,
        TodoAction::UpdateText,
        TodoAction::ToggleComplete,
        TodoAction::Destroy,
        TodoAction::ClearCompleted,
        TodoAction::ToggleAll,
    ];

    pub fn name(self) -> &'static str {
        match self {
            TodoAction::LoadAll => "loadAll",
            TodoAction::Create => "create",
            TodoAction::UpdateText => "updateText",
            TodoAction::ToggleComplete => "toggleComplete",
            TodoAction::Destroy => "destroy",
            TodoAction::ClearCompleted => "clearCompleted",
            TodoAction::ToggleAll => "toggleAll",
        }
    }
}

/// `updateText` payload.
#[derive(Debug, Clone, Deserialize)]
pub struct TextUpdate {
    pub id: String,
    pub text: String,
}

/// `toggleComplete` / `destroy` payload: the todo as the caller last saw it.
#[derive(Debug, Clone, Deserialize)]
pub struct TodoRef {
    pub id: String,
    #[serde(default)]
    pub completed: bool,
}

/// Deserialize a payload, logging and dropping it when malformed.
pub fn parse<T: DeserializeOwned>(action: TodoAction, payload: Value) -> Option<T> {
    match serde_json::from_value(payload) {
        Ok(parsed) => Some(parsed),
        Err(e) => {
            warn!(action = action.name(), error = %e, "Dropping malformed payload");
            None
        }
    }
}

pub fn is_blank(text: &str) -> bool {
    text.trim().is_empty()
}

/// `create` payload: non-blank text.
pub fn create_text(payload: Value) -> Option<String> {
    parse::<String>(TodoAction::Create, payload).filter(|text| !is_blank(text))
}

/// `updateText` payload with non-blank text.
pub fn text_update(payload: Value) -> Option<TextUpdate> {
    parse::<TextUpdate>(TodoAction::UpdateText, payload).filter(|u| !is_blank(&u.text))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn names_are_unique() {
        let mut names: Vec<_> = TodoAction::ALL.iter().map(|a| a.name()).collect();
        names.sort_unstable();
        names.dedup();
        assert_eq!(names.len(), TodoAction::ALL.len());
    }

    #[test]
    fn blank_create_text_is_rejected() {
        assert_eq!(create_text(json!("")), None);
        assert_eq!(create_text(json!("  \t ")), None);
        assert_eq!(create_text(json!("buy milk")).as_deref(), Some("buy milk"));
    }

    #[test]
    fn malformed_payload_is_dropped() {
        assert!(create_text(json!(42)).is_none());
        assert!(text_update(json!({"id": "a"})).is_none());
    }

    #[test]
    fn text_update_requires_non_blank_text() {
        assert!(text_update(json!({"id": "a", "text": "  "})).is_none());
        let update = text_update(json!({"id": "a", "text": "new"})).unwrap();
        assert_eq!(update.id, "a");
        assert_eq!(update.text, "new");
    }

    #[test]
    fn todo_ref_completed_defaults_to_false() {
        let todo: TodoRef = parse(TodoAction::Destroy, json!({"id": "x"})).unwrap();
        assert!(!todo.completed);
    }
}
