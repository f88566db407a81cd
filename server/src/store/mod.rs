//! Todo persistence.
//!
//! # Design
//! `TodoStore` is the seam between request handlers and storage. Every
//! backend returns the same `StoreError`, and rule violations surface as
//! `StoreError::Todo` so handlers can tell "bad input" from "disk broke".
//! The memory and JSON-file backends delegate the rules to
//! `todo_core::TodoList`; SQLite re-states them as row operations.

mod json_file;
mod memory;
mod sqlite;

use std::sync::Arc;

use async_trait::async_trait;
use thiserror::Error;
use todo_core::{Todo, TodoError, TodoId, TodoPatch};

use crate::config::Backend;

pub use json_file::JsonFileStore;
pub use memory::MemoryStore;
pub use sqlite::SqliteStore;

pub type StoreResult<T> = Result<T, StoreError>;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error(transparent)]
    Todo(#[from] TodoError),

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    #[error("malformed todo file: {0}")]
    Json(#[from] serde_json::Error),

    #[error("sqlite error: {0}")]
    Sqlite(#[from] rusqlite::Error),

    #[error("store task failed: {0}")]
    Task(#[from] tokio::task::JoinError),

    #[error("store lock poisoned")]
    Poisoned,
}

#[async_trait]
pub trait TodoStore: Send + Sync {
    /// All todos, in no particular order.
    async fn list(&self) -> StoreResult<Vec<Todo>>;

    async fn get(&self, id: TodoId) -> StoreResult<Option<Todo>>;

    async fn create(&self, text: Option<&str>) -> StoreResult<Todo>;

    async fn update(&self, id: TodoId, patch: TodoPatch) -> StoreResult<Todo>;

    async fn toggle_done(&self, id: TodoId) -> StoreResult<Todo>;

    async fn delete(&self, id: TodoId) -> StoreResult<Todo>;
}

/// Open the backend named by the configuration.
pub async fn open(backend: &Backend) -> StoreResult<Arc<dyn TodoStore>> {
    let store: Arc<dyn TodoStore> = match backend {
        Backend::Memory => Arc::new(MemoryStore::new()),
        Backend::Json(path) => Arc::new(JsonFileStore::new(path)),
        Backend::Sqlite(path) => Arc::new(SqliteStore::open(path).await?),
    };
    Ok(store)
}

/// Clock source for new ids.
pub(crate) fn now_millis() -> i64 {
    chrono::Utc::now().timestamp_millis()
}
