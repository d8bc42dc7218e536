use std::str::FromStr;
use std::sync::Arc;

use anyhow::{Context, Result};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::{sqlite::{SqliteConnectOptions, SqlitePoolOptions, SqliteRow}, Pool, Row, Sqlite};

use crate::domain::{
    repository::{StoreError, ToDoStore},
    todo::{ToDoRow, TodoId},
};

#[derive(Clone)]
pub struct SqliteToDoStore {
    pool: Arc<Pool<Sqlite>>,
}

impl SqliteToDoStore {
    pub async fn connect(database_url: &str) -> Result<Self> {
        let connect_options = SqliteConnectOptions::from_str(database_url)
            .with_context(|| format!("invalid database url {database_url}"))?
            .create_if_missing(true);
        let options = if is_in_memory(database_url) {
            // each connection to :memory: opens a private database; keep exactly one alive
            SqlitePoolOptions::new().max_connections(1).min_connections(1).idle_timeout(None).max_lifetime(None)
        } else {
            prepare_parent_dir(database_url)?;
            SqlitePoolOptions::new().max_connections(5)
        };
        let pool = options
            .connect_with(connect_options)
            .await
            .with_context(|| format!("failed to open database {database_url}"))?;
        Ok(Self { pool: Arc::new(pool) })
    }
}

#[async_trait]
impl ToDoStore for SqliteToDoStore {
    async fn init(&self) -> Result<(), StoreError> {
        sqlx::query(
            "CREATE TABLE IF NOT EXISTS todos (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                title VARCHAR(200) NOT NULL,
                description VARCHAR(1024) NOT NULL,
                reminder TEXT NOT NULL
            )",
        )
        .execute(&*self.pool)
        .await
        .context("failed to create schema")?;
        Ok(())
    }

    async fn insert(&self, row: &ToDoRow) -> Result<TodoId, StoreError> {
        let result = sqlx::query("INSERT INTO todos (title, description, reminder) VALUES (?1, ?2, ?3)")
            .bind(&row.title)
            .bind(&row.description)
            .bind(row.reminder_text())
            .execute(&*self.pool)
            .await
            .context("INSERT failed")?;
        Ok(TodoId(result.last_insert_rowid()))
    }

    async fn get_by_id(&self, id: TodoId) -> Result<Option<ToDoRow>, StoreError> {
        let row = sqlx::query("SELECT id, title, description, reminder FROM todos WHERE id = ?1")
            .bind(id.0)
            .fetch_optional(&*self.pool)
            .await
            .context("SELECT failed")?;
        Ok(row.map(row_to_todo).transpose()?)
    }

    async fn replace_by_id(&self, row: &ToDoRow) -> Result<u64, StoreError> {
        let result = sqlx::query("UPDATE todos SET title = ?2, description = ?3, reminder = ?4 WHERE id = ?1")
            .bind(row.id.0)
            .bind(&row.title)
            .bind(&row.description)
            .bind(row.reminder_text())
            .execute(&*self.pool)
            .await
            .context("UPDATE failed")?;
        Ok(result.rows_affected())
    }

    async fn delete_by_id(&self, id: TodoId) -> Result<u64, StoreError> {
        let result = sqlx::query("DELETE FROM todos WHERE id = ?1")
            .bind(id.0)
            .execute(&*self.pool)
            .await
            .context("DELETE failed")?;
        Ok(result.rows_affected())
    }

    async fn list_all(&self) -> Result<Vec<ToDoRow>, StoreError> {
        let rows = sqlx::query("SELECT id, title, description, reminder FROM todos ORDER BY id ASC")
            .fetch_all(&*self.pool)
            .await
            .context("SELECT failed")?;
        Ok(rows.into_iter().map(row_to_todo).collect::<Result<Vec<_>>>()?)
    }
}

fn row_to_todo(row: SqliteRow) -> Result<ToDoRow> {
    let id: i64 = row.try_get("id")?;
    let reminder_str: String = row.try_get("reminder")?;
    let reminder = DateTime::parse_from_rfc3339(&reminder_str)
        .with_context(|| format!("row {id}: malformed reminder {reminder_str:?}"))?
        .with_timezone(&Utc);

    Ok(ToDoRow {
        id: TodoId(id),
        title: row.try_get("title")?,
        description: row.try_get("description")?,
        reminder,
    })
}

fn is_in_memory(database_url: &str) -> bool {
    database_url.starts_with("sqlite::memory:") || database_url.contains("mode=memory")
}

/// Path of the database file named by a `sqlite:` or `sqlite://` URL.
fn sqlite_file_path(database_url: &str) -> Option<&str> {
    let rest = database_url.strip_prefix("sqlite://").or_else(|| database_url.strip_prefix("sqlite:"))?;
    let path = rest.split('?').next().unwrap_or(rest);
    // On Windows, absolute paths may look like /C:/path; strip the leading slash
    let path = if cfg!(windows) && path.len() >= 3 && path.as_bytes()[0] == b'/' && path.as_bytes()[2] == b':' {
        &path[1..]
    } else {
        path
    };
    (!path.is_empty()).then_some(path)
}

/// Creates the parent directories of a file-backed database; sqlx creates the file itself.
fn prepare_parent_dir(database_url: &str) -> Result<()> {
    if let Some(parent) = sqlite_file_path(database_url).and_then(|p| std::path::Path::new(p).parent()) {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent).with_context(|| format!("failed to create {}", parent.display()))?;
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    async fn store() -> SqliteToDoStore {
        let store = SqliteToDoStore::connect("sqlite::memory:").await.unwrap();
        store.init().await.unwrap();
        store
    }

    fn row_at(title: &str, seconds: i64, nanos: u32) -> ToDoRow {
        ToDoRow { id: TodoId(0), title: title.into(), description: "description".into(), reminder: DateTime::from_timestamp(seconds, nanos).unwrap() }
    }

    fn row(title: &str) -> ToDoRow {
        let reminder = DateTime::from_timestamp(1_700_000_000, 987_654_321).unwrap();
        ToDoRow { id: TodoId(0), title: title.into(), description: "description".into(), reminder }
    }

    #[tokio::test]
    async fn insert_assigns_sequential_ids_and_reads_back() {
        let store = store().await;
        let a = store.insert(&row("a")).await.unwrap();
        let b = store.insert(&row("b")).await.unwrap();
        assert_eq!((a, b), (TodoId(1), TodoId(2)));

        let got = store.get_by_id(a).await.unwrap().unwrap();
        assert_eq!(got, ToDoRow { id: a, ..row("a") });
        assert!(store.get_by_id(TodoId(99)).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn replace_and_delete_report_affected_rows() {
        let store = store().await;
        let id = store.insert(&row("a")).await.unwrap();
        assert_eq!(store.replace_by_id(&ToDoRow { id, ..row("changed") }).await.unwrap(), 1);
        assert_eq!(store.get_by_id(id).await.unwrap().unwrap().title, "changed");
        assert_eq!(store.replace_by_id(&ToDoRow { id: TodoId(99), ..row("x") }).await.unwrap(), 0);

        assert_eq!(store.delete_by_id(id).await.unwrap(), 1);
        assert_eq!(store.delete_by_id(id).await.unwrap(), 0);
    }

    #[tokio::test]
    async fn ids_are_never_reused() {
        let store = store().await;
        let a = store.insert(&row("a")).await.unwrap();
        store.delete_by_id(a).await.unwrap();
        let b = store.insert(&row("b")).await.unwrap();
        assert!(b > a);
    }

    #[tokio::test]
    async fn list_all_in_key_order_and_rejects_corrupt_rows() {
        let store = store().await;
        assert!(store.list_all().await.unwrap().is_empty());
        for t in ["a", "b"] { store.insert(&row(t)).await.unwrap(); }
        let titles: Vec<_> = store.list_all().await.unwrap().into_iter().map(|r| r.title).collect();
        assert_eq!(titles, ["a", "b"]);

        sqlx::query("INSERT INTO todos (title, description, reminder) VALUES ('c', '', 'yesterday')")
            .execute(&*store.pool)
            .await
            .unwrap();
        assert!(matches!(store.list_all().await, Err(StoreError::Backend(_))));
    }

    #[tokio::test]
    async fn reminder_survives_the_column_at_range_edges() {
        use crate::domain::todo::{MAX_VALID_SECONDS, MIN_VALID_SECONDS, Timestamp, ToDo};

        let store = store().await;
        for (seconds, nanos) in [(MIN_VALID_SECONDS, 0), (MAX_VALID_SECONDS, 999_999_999), (-1, 1), (0, 0)] {
            let input = ToDo { id: 0, title: "edge".into(), description: String::new(), reminder: Some(Timestamp::new(seconds, nanos)) };
            let id = store.insert(&input.to_row().unwrap()).await.unwrap();
            let stored = store.get_by_id(id).await.unwrap().unwrap();
            assert_eq!(stored, ToDoRow { id, description: String::new(), ..row_at("edge", seconds, nanos as u32) });
            assert_eq!(stored.to_todo().unwrap(), ToDo { id: id.0, ..input });
        }
    }

    #[test]
    fn file_path_from_both_url_forms() {
        assert_eq!(sqlite_file_path("sqlite://data/todos.db"), Some("data/todos.db"));
        assert_eq!(sqlite_file_path("sqlite:todos.db?mode=rwc"), Some("todos.db"));
        assert_eq!(sqlite_file_path("sqlite://"), None);
        assert_eq!(sqlite_file_path("postgres://db"), None);
    }

    #[tokio::test]
    async fn connect_creates_missing_file_for_short_url_form() {
        let nonce = std::time::SystemTime::now().duration_since(std::time::UNIX_EPOCH).unwrap().as_nanos();
        let dir = std::env::temp_dir().join(format!("todo-api-{}-{nonce}", std::process::id()));
        let file = dir.join("nested").join("todos.db");
        let store = SqliteToDoStore::connect(&format!("sqlite:{}", file.display())).await.unwrap();
        store.init().await.unwrap();
        assert!(file.exists());
        drop(store);
        let _ = std::fs::remove_dir_all(dir);
    }
}
