//! In-memory todo collection.
//!
//! # Design
//! `TodoList` owns the CRUD rules (validation, id assignment, not-found
//! checks) without doing any I/O. Storage backends load a list, apply one
//! operation, and persist the result, so every backend enforces the same
//! rules. The current time is passed in by the caller, keeping the list
//! deterministic under test.

use serde::{Deserialize, Serialize};

use crate::error::TodoError;
use crate::types::{validate_text, Todo, TodoId, TodoPatch};

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TodoList {
    todos: Vec<Todo>,
}

impl TodoList {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn todos(&self) -> &[Todo] {
        &self.todos
    }

    pub fn into_todos(self) -> Vec<Todo> {
        self.todos
    }

    pub fn len(&self) -> usize {
        self.todos.len()
    }

    pub fn is_empty(&self) -> bool {
        self.todos.is_empty()
    }

    pub fn get(&self, id: TodoId) -> Option<&Todo> {
        self.todos.iter().find(|t| t.id == id)
    }

    /// Next id: the clock value in milliseconds, bumped past the largest
    /// existing id so ids stay unique when the clock repeats or goes back.
    pub fn next_id(&self, now_millis: i64) -> Result<TodoId, TodoError> {
        let max = self.todos.iter().map(|t| t.id).max();
        match max {
            Some(max) if max >= now_millis => max.checked_add(1).ok_or(TodoError::IdsExhausted),
            _ => Ok(now_millis),
        }
    }

    pub fn create(&mut self, text: Option<&str>, now_millis: i64) -> Result<Todo, TodoError> {
        let text = validate_text("text", text)?;
        let todo = Todo {
            id: self.next_id(now_millis)?,
            text,
            done: false,
        };
        self.todos.push(todo.clone());
        Ok(todo)
    }

    pub fn update(&mut self, id: TodoId, patch: &TodoPatch) -> Result<Todo, TodoError> {
        let text = patch
            .text
            .as_deref()
            .map(|text| validate_text("updateText", Some(text)))
            .transpose()?;
        let todo = self.get_mut(id)?;
        if let Some(text) = text {
            todo.text = text;
        }
        if let Some(done) = patch.done {
            todo.done = done;
        }
        Ok(todo.clone())
    }

    pub fn toggle_done(&mut self, id: TodoId) -> Result<Todo, TodoError> {
        let todo = self.get_mut(id)?;
        todo.done = !todo.done;
        Ok(todo.clone())
    }

    pub fn delete(&mut self, id: TodoId) -> Result<Todo, TodoError> {
        let index = self
            .todos
            .iter()
            .position(|t| t.id == id)
            .ok_or(TodoError::NotFound(id))?;
        Ok(self.todos.remove(index))
    }

    fn get_mut(&mut self, id: TodoId) -> Result<&mut Todo, TodoError> {
        self.todos
            .iter_mut()
            .find(|t| t.id == id)
            .ok_or(TodoError::NotFound(id))
    }
}

impl From<Vec<Todo>> for TodoList {
    fn from(todos: Vec<Todo>) -> Self {
        Self { todos }
    }
}
