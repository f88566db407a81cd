//! Domain records for the todo list.
//!
//! # Design
//! `Todo` is the persisted shape shared by every storage backend: the JSON
//! file stores an array of these, the SQLite backend one row per item. Ids
//! are plain integers so both clock-based and auto-increment assignment fit.

use serde::{Deserialize, Serialize};

use crate::error::TodoError;

/// Identifier of a todo. Unique within a store, never reused while the item
/// exists.
pub type TodoId = i64;

/// Minimum number of characters a todo text must have after trimming.
pub const MIN_TEXT_LEN: usize = 3;

/// A single todo item.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Todo {
    pub id: TodoId,
    pub text: String,
    #[serde(default)]
    pub done: bool,
}

/// Partial update for an existing todo. Fields left as `None` keep their
/// current value.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct TodoPatch {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub done: Option<bool>,
}

impl TodoPatch {
    pub fn text(text: impl Into<String>) -> Self {
        Self {
            text: Some(text.into()),
            done: None,
        }
    }

    pub fn done(done: bool) -> Self {
        Self {
            text: None,
            done: Some(done),
        }
    }
}

/// Trim `text` and check it against [`MIN_TEXT_LEN`].
///
/// `field` names the form field the error is reported against (`text` for
/// the add form, `updateText` for inline edits).
pub fn validate_text(field: &str, text: Option<&str>) -> Result<String, TodoError> {
    let trimmed = text.map(str::trim).unwrap_or_default();
    if trimmed.chars().count() < MIN_TEXT_LEN {
        return Err(TodoError::Validation {
            field: field.to_string(),
            message: format!("Todo text must be at least {MIN_TEXT_LEN} characters."),
        });
    }
    Ok(trimmed.to_string())
}

/// Sort todos by text for display.
///
/// Comparison is case-insensitive first, then falls back to the raw text and
/// the id so the order is total and stable between requests.
pub fn sort_by_text(todos: &mut [Todo]) {
    todos.sort_by(|a, b| {
        a.text
            .to_lowercase()
            .cmp(&b.text.to_lowercase())
            .then_with(|| a.text.cmp(&b.text))
            .then_with(|| a.id.cmp(&b.id))
    });
}

#[cfg(test)]
mod tests {
    use super::*;

    fn todo(id: TodoId, text: &str) -> Todo {
        Todo {
            id,
            text: text.to_string(),
            done: false,
        }
    }

    #[test]
    fn todo_serializes_to_json() {
        let json = serde_json::to_value(todo(7, "Test")).unwrap();
        assert_eq!(json["id"], 7);
        assert_eq!(json["text"], "Test");
        assert_eq!(json["done"], false);
    }

    #[test]
    fn todo_done_defaults_to_false() {
        let todo: Todo = serde_json::from_str(r#"{"id":1,"text":"No done field"}"#).unwrap();
        assert!(!todo.done);
    }

    #[test]
    fn todo_rejects_missing_text() {
        let result: Result<Todo, _> = serde_json::from_str(r#"{"id":1,"done":true}"#);
        assert!(result.is_err());
    }

    #[test]
    fn patch_skips_absent_fields() {
        let json = serde_json::to_value(TodoPatch::text("New")).unwrap();
        assert_eq!(json["text"], "New");
        assert!(json.get("done").is_none());
    }

    #[test]
    fn validate_text_rejects_short_text() {
        let err = validate_text("text", Some("ab")).unwrap_err();
        assert!(matches!(err, TodoError::Validation { ref field, .. } if field == "text"));
    }

    #[test]
    fn validate_text_rejects_missing_text() {
        assert!(validate_text("text", None).is_err());
    }

    #[test]
    fn validate_text_trims_before_counting() {
        assert!(validate_text("text", Some("  ab  ")).is_err());
        assert_eq!(validate_text("text", Some("  abc ")).unwrap(), "abc");
    }

    #[test]
    fn sort_by_text_ignores_case() {
        let mut todos = vec![todo(1, "pear"), todo(2, "Apple"), todo(3, "banana")];
        sort_by_text(&mut todos);
        let texts: Vec<_> = todos.iter().map(|t| t.text.as_str()).collect();
        assert_eq!(texts, ["Apple", "banana", "pear"]);
    }

    #[test]
    fn sort_by_text_breaks_ties_by_id() {
        let mut todos = vec![todo(9, "same"), todo(2, "same")];
        sort_by_text(&mut todos);
        assert_eq!(todos[0].id, 2);
    }
}
