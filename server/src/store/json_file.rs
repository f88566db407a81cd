use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use async_trait::async_trait;
use todo_core::{Todo, TodoError, TodoId, TodoList, TodoPatch};
use tokio::sync::Mutex;
use tracing::debug;

use super::{now_millis, StoreResult, TodoStore};

/// Todos kept as one JSON array in a file, rewritten on every change.
///
/// Read-modify-write cycles hold `lock` for their whole duration, so two
/// concurrent requests cannot both read the old file and drop each other's
/// change. Writes go to a temporary sibling and are renamed into place.
#[derive(Debug)]
pub struct JsonFileStore {
    path: PathBuf,
    lock: Mutex<()>,
}

impl JsonFileStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            lock: Mutex::new(()),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// A missing file is an empty list.
    async fn load(&self) -> StoreResult<TodoList> {
        match tokio::fs::read_to_string(&self.path).await {
            Ok(json) if json.trim().is_empty() => Ok(TodoList::new()),
            Ok(json) => Ok(serde_json::from_str(&json)?),
            Err(e) if e.kind() == ErrorKind::NotFound => {
                debug!(path = %self.path.display(), "todo file missing, starting empty");
                Ok(TodoList::new())
            }
            Err(e) => Err(e.into()),
        }
    }

    async fn save(&self, list: &TodoList) -> StoreResult<()> {
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            tokio::fs::create_dir_all(parent).await?;
        }
        let tmp_path = self.path.with_extension("json.tmp");
        let content = serde_json::to_string(list)?;
        tokio::fs::write(&tmp_path, content).await?;
        tokio::fs::rename(&tmp_path, &self.path).await?;
        debug!(path = %self.path.display(), count = list.len(), "todo file written");
        Ok(())
    }

    async fn mutate<T, F>(&self, op: F) -> StoreResult<T>
    where
        F: FnOnce(&mut TodoList) -> Result<T, TodoError> + Send,
        T: Send,
    {
        let _guard = self.lock.lock().await;
        let mut list = self.load().await?;
        let out = op(&mut list)?;
        self.save(&list).await?;
        Ok(out)
    }
}

#[async_trait]
impl TodoStore for JsonFileStore {
    async fn list(&self) -> StoreResult<Vec<Todo>> {
        let _guard = self.lock.lock().await;
        Ok(self.load().await?.into_todos())
    }

    async fn get(&self, id: TodoId) -> StoreResult<Option<Todo>> {
        let _guard = self.lock.lock().await;
        Ok(self.load().await?.get(id).cloned())
    }

    async fn create(&self, text: Option<&str>) -> StoreResult<Todo> {
        let now = now_millis();
        self.mutate(|list| list.create(text, now)).await
    }

    async fn update(&self, id: TodoId, patch: TodoPatch) -> StoreResult<Todo> {
        self.mutate(|list| list.update(id, &patch)).await
    }

    async fn toggle_done(&self, id: TodoId) -> StoreResult<Todo> {
        self.mutate(|list| list.toggle_done(id)).await
    }

    async fn delete(&self, id: TodoId) -> StoreResult<Todo> {
        self.mutate(|list| list.delete(id)).await
    }
}
