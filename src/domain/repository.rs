use async_trait::async_trait;
use thiserror::Error;

use super::todo::{ToDoRow, TodoId};

#[derive(Debug, Error)]
pub enum StoreError {
    /// The backend reported that the addressed row does not exist.
    #[error("record {0} not found")]
    NotFound(TodoId),
    #[error(transparent)]
    Backend(#[from] anyhow::Error),
}

/// Row-level persistence for to-do records, keyed by a store-assigned id.
///
/// Implementations are shared by every in-flight call and must be safe for
/// concurrent use; isolation between concurrent writers is theirs to decide.
#[async_trait]
pub trait ToDoStore: Send + Sync + 'static {
    async fn init(&self) -> Result<(), StoreError>;
    /// Inserts `row` (its `id` is ignored) and returns the assigned id.
    async fn insert(&self, row: &ToDoRow) -> Result<TodoId, StoreError>;
    async fn get_by_id(&self, id: TodoId) -> Result<Option<ToDoRow>, StoreError>;
    /// Replaces every column of the row keyed by `row.id`; returns rows affected.
    async fn replace_by_id(&self, row: &ToDoRow) -> Result<u64, StoreError>;
    /// Returns rows affected.
    async fn delete_by_id(&self, id: TodoId) -> Result<u64, StoreError>;
    async fn list_all(&self) -> Result<Vec<ToDoRow>, StoreError>;
}
