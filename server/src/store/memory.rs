use async_trait::async_trait;
use todo_core::{Todo, TodoId, TodoList, TodoPatch};
use tokio::sync::RwLock;

use super::{now_millis, StoreResult, TodoStore};

/// Volatile store; contents vanish with the process.
#[derive(Debug, Default)]
pub struct MemoryStore {
    todos: RwLock<TodoList>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_todos(todos: Vec<Todo>) -> Self {
        Self {
            todos: RwLock::new(TodoList::from(todos)),
        }
    }
}

#[async_trait]
impl TodoStore for MemoryStore {
    async fn list(&self) -> StoreResult<Vec<Todo>> {
        Ok(self.todos.read().await.todos().to_vec())
    }

    async fn get(&self, id: TodoId) -> StoreResult<Option<Todo>> {
        Ok(self.todos.read().await.get(id).cloned())
    }

    async fn create(&self, text: Option<&str>) -> StoreResult<Todo> {
        Ok(self.todos.write().await.create(text, now_millis())?)
    }

    async fn update(&self, id: TodoId, patch: TodoPatch) -> StoreResult<Todo> {
        Ok(self.todos.write().await.update(id, &patch)?)
    }

    async fn toggle_done(&self, id: TodoId) -> StoreResult<Todo> {
        Ok(self.todos.write().await.toggle_done(id)?)
    }

    async fn delete(&self, id: TodoId) -> StoreResult<Todo> {
        Ok(self.todos.write().await.delete(id)?)
    }
}
