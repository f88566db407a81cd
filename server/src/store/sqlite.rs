use std::path::Path;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use rusqlite::{params, Connection, OptionalExtension, Row};
use todo_core::{validate_text, Todo, TodoError, TodoId, TodoPatch};
use tracing::info;

use super::{StoreError, StoreResult, TodoStore};

const SCHEMA_SQL: &str = "CREATE TABLE IF NOT EXISTS todo (
    id   INTEGER PRIMARY KEY AUTOINCREMENT,
    text TEXT    NOT NULL,
    done INTEGER NOT NULL DEFAULT 0
)";

const TODO_SELECT_SQL: &str = "SELECT id, text, done FROM todo";

/// One row per todo. Each mutation touches only its own row; ids come from
/// SQLite's autoincrement.
#[derive(Debug, Clone)]
pub struct SqliteStore {
    conn: Arc<Mutex<Connection>>,
}

impl SqliteStore {
    pub async fn open(path: impl AsRef<Path>) -> StoreResult<Self> {
        let path = path.as_ref().to_path_buf();
        let conn = tokio::task::spawn_blocking(move || {
            let conn = Connection::open(&path)?;
            init_schema(&conn)?;
            Ok::<_, StoreError>(conn)
        })
        .await??;
        Ok(Self::from_connection(conn))
    }

    pub fn open_in_memory() -> StoreResult<Self> {
        let conn = Connection::open_in_memory()?;
        init_schema(&conn)?;
        Ok(Self::from_connection(conn))
    }

    fn from_connection(conn: Connection) -> Self {
        Self {
            conn: Arc::new(Mutex::new(conn)),
        }
    }

    async fn with_conn<T, F>(&self, op: F) -> StoreResult<T>
    where
        F: FnOnce(&Connection) -> StoreResult<T> + Send + 'static,
        T: Send + 'static,
    {
        let conn = Arc::clone(&self.conn);
        tokio::task::spawn_blocking(move || {
            let guard = conn.lock().map_err(|_| StoreError::Poisoned)?;
            op(&*guard)
        })
        .await?
    }
}

fn init_schema(conn: &Connection) -> StoreResult<()> {
    conn.execute_batch(SCHEMA_SQL)?;
    info!("sqlite todo table ready");
    Ok(())
}

fn map_todo(row: &Row<'_>) -> rusqlite::Result<Todo> {
    Ok(Todo {
        id: row.get(0)?,
        text: row.get(1)?,
        done: row.get(2)?,
    })
}

fn find(conn: &Connection, id: TodoId) -> StoreResult<Option<Todo>> {
    let sql = format!("{TODO_SELECT_SQL} WHERE id = ?1");
    Ok(conn.query_row(&sql, params![id], map_todo).optional()?)
}

fn require(conn: &Connection, id: TodoId) -> StoreResult<Todo> {
    find(conn, id)?.ok_or_else(|| TodoError::NotFound(id).into())
}

#[async_trait]
impl TodoStore for SqliteStore {
    async fn list(&self) -> StoreResult<Vec<Todo>> {
        self.with_conn(|conn| {
            let mut stmt = conn.prepare(TODO_SELECT_SQL)?;
            let todos = stmt
                .query_map([], map_todo)?
                .collect::<rusqlite::Result<Vec<_>>>()?;
            Ok(todos)
        })
        .await
    }

    async fn get(&self, id: TodoId) -> StoreResult<Option<Todo>> {
        self.with_conn(move |conn| find(conn, id)).await
    }

    async fn create(&self, text: Option<&str>) -> StoreResult<Todo> {
        let text = validate_text("text", text)?;
        self.with_conn(move |conn| {
            conn.execute("INSERT INTO todo (text, done) VALUES (?1, 0)", params![text])?;
            Ok(Todo {
                id: conn.last_insert_rowid(),
                text,
                done: false,
            })
        })
        .await
    }

    async fn update(&self, id: TodoId, patch: TodoPatch) -> StoreResult<Todo> {
        let text = patch
            .text
            .as_deref()
            .map(|text| validate_text("updateText", Some(text)))
            .transpose()?;
        let done = patch.done;
        self.with_conn(move |conn| {
            require(conn, id)?;
            if let Some(text) = text {
                conn.execute("UPDATE todo SET text = ?1 WHERE id = ?2", params![text, id])?;
            }
            if let Some(done) = done {
                conn.execute("UPDATE todo SET done = ?1 WHERE id = ?2", params![done, id])?;
            }
            require(conn, id)
        })
        .await
    }

    async fn toggle_done(&self, id: TodoId) -> StoreResult<Todo> {
        self.with_conn(move |conn| {
            let changed =
                conn.execute("UPDATE todo SET done = NOT done WHERE id = ?1", params![id])?;
            if changed == 0 {
                return Err(TodoError::NotFound(id).into());
            }
            require(conn, id)
        })
        .await
    }

    async fn delete(&self, id: TodoId) -> StoreResult<Todo> {
        self.with_conn(move |conn| {
            let todo = require(conn, id)?;
            conn.execute("DELETE FROM todo WHERE id = ?1", params![id])?;
            Ok(todo)
        })
        .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn store() -> SqliteStore {
        SqliteStore::open_in_memory().unwrap()
    }

    #[tokio::test]
    async fn create_short_text_fails() {
        let err = store().create(Some("ab")).await.unwrap_err();
        assert!(matches!(err, StoreError::Todo(TodoError::Validation { .. })));
    }

    #[tokio::test]
    async fn create_assigns_increasing_ids() {
        let store = store();
        let a = store.create(Some("first")).await.unwrap();
        let b = store.create(Some("second")).await.unwrap();
        assert!(b.id > a.id);
        assert_eq!(store.list().await.unwrap().len(), 2);
    }

    #[tokio::test]
    async fn toggle_twice_restores_done() {
        let store = store();
        let todo = store.create(Some("flip")).await.unwrap();
        assert!(store.toggle_done(todo.id).await.unwrap().done);
        assert!(!store.toggle_done(todo.id).await.unwrap().done);
    }

    #[tokio::test]
    async fn update_text_keeps_done() {
        let store = store();
        let todo = store.create(Some("old text")).await.unwrap();
        store.toggle_done(todo.id).await.unwrap();
        let updated = store.update(todo.id, TodoPatch::text("new")).await.unwrap();
        assert_eq!(updated.text, "new");
        assert!(updated.done);
    }

    #[tokio::test]
    async fn missing_rows_are_not_found() {
        let store = store();
        for err in [
            store.toggle_done(9).await.unwrap_err(),
            store.update(9, TodoPatch::done(true)).await.unwrap_err(),
            store.delete(9).await.unwrap_err(),
        ] {
            assert!(matches!(err, StoreError::Todo(TodoError::NotFound(9))));
        }
    }

    #[tokio::test]
    async fn delete_twice_is_not_found() {
        let store = store();
        let todo = store.create(Some("short lived")).await.unwrap();
        assert_eq!(store.delete(todo.id).await.unwrap(), todo);
        assert!(store.get(todo.id).await.unwrap().is_none());
        assert!(store.delete(todo.id).await.is_err());
    }

    #[tokio::test]
    async fn rows_survive_reopen() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("todos.db");
        let store = SqliteStore::open(&path).await.unwrap();
        let todo = store.create(Some("persisted")).await.unwrap();
        drop(store);
        let reopened = SqliteStore::open(&path).await.unwrap();
        assert_eq!(reopened.list().await.unwrap(), vec![todo]);
    }
}
