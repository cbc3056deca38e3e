//! `SQLite` implementation of [`TodoRepository`].

use std::future::Future;
use std::str::FromStr;
use std::sync::Arc;

use sqlx::sqlite::SqliteRow;
use sqlx::{FromRow, Row, SqlitePool};

use todohub_app::ports::{TableName, TodoRepository};
use todohub_domain::error::TodoError;
use todohub_domain::id::TodoId;
use todohub_domain::time;
use todohub_domain::todo::{TodoChanges, TodoItem};

use crate::error::StorageError;

/// Wrapper for converting database rows into domain [`TodoItem`].
struct Wrapper(TodoItem);

impl Wrapper {
    fn maybe(value: Option<Self>) -> Option<TodoItem> {
        value.map(|w| w.0)
    }
}

impl<'r> FromRow<'r, SqliteRow> for Wrapper {
    fn from_row(row: &'r SqliteRow) -> Result<Self, sqlx::Error> {
        let id: String = row.try_get("id")?;
        let name: String = row.try_get("name")?;
        let description: String = row.try_get("description")?;
        let timestamp: String = row.try_get("timestamp")?;

        let id = TodoId::from_str(&id).map_err(|err| sqlx::Error::Decode(Box::new(err)))?;
        let timestamp =
            time::parse(&timestamp).map_err(|err| sqlx::Error::Decode(Box::new(err)))?;

        Ok(Self(TodoItem {
            id,
            name,
            description,
            timestamp,
        }))
    }
}

/// Statements bound to one table name.
struct Queries {
    insert: String,
    select_by_id: String,
    select_all: String,
    update: String,
    delete_by_id: String,
}

impl Queries {
    fn for_table(table: &TableName) -> Self {
        Self {
            insert: format!(
                r#"INSERT INTO "{table}" (id, name, description, timestamp) VALUES (?, ?, ?, ?)"#
            ),
            select_by_id: format!(
                r#"SELECT id, name, description, timestamp FROM "{table}" WHERE id = ?"#
            ),
            select_all: format!(
                r#"SELECT id, name, description, timestamp FROM "{table}" ORDER BY rowid"#
            ),
            update: format!(
                r#"UPDATE "{table}" SET name = ?, description = ?, timestamp = ? WHERE id = ?
                   RETURNING id, name, description, timestamp"#
            ),
            delete_by_id: format!(r#"DELETE FROM "{table}" WHERE id = ?"#),
        }
    }
}

/// `SQLite`-backed todo repository.
#[derive(Clone)]
pub struct SqliteTodoRepository {
    pool: SqlitePool,
    queries: Arc<Queries>,
}

impl SqliteTodoRepository {
    /// Create a new repository over `table_name` using the given connection pool.
    ///
    /// The table must already exist, see [`crate::Database::ensure_table`].
    #[must_use]
    pub fn new(pool: SqlitePool, table_name: &TableName) -> Self {
        Self {
            pool,
            queries: Arc::new(Queries::for_table(table_name)),
        }
    }
}

impl TodoRepository for SqliteTodoRepository {
    fn create(&self, item: TodoItem) -> impl Future<Output = Result<TodoItem, TodoError>> + Send {
        let pool = self.pool.clone();
        let queries = Arc::clone(&self.queries);
        async move {
            sqlx::query(&queries.insert)
                .bind(item.id.as_str())
                .bind(&item.name)
                .bind(&item.description)
                .bind(time::format(&item.timestamp))
                .execute(&pool)
                .await
                .map_err(StorageError::from)?;

            Ok(item)
        }
    }

    fn get_by_id(
        &self,
        id: &TodoId,
    ) -> impl Future<Output = Result<Option<TodoItem>, TodoError>> + Send {
        let pool = self.pool.clone();
        let queries = Arc::clone(&self.queries);
        let id = id.to_string();
        async move {
            let row: Option<Wrapper> = sqlx::query_as(&queries.select_by_id)
                .bind(id)
                .fetch_optional(&pool)
                .await
                .map_err(StorageError::from)?;

            Ok(Wrapper::maybe(row))
        }
    }

    fn update(
        &self,
        id: &TodoId,
        changes: TodoChanges,
    ) -> impl Future<Output = Result<Option<TodoItem>, TodoError>> + Send {
        let pool = self.pool.clone();
        let queries = Arc::clone(&self.queries);
        let id = id.to_string();
        async move {
            // Zero affected rows yields no returned row, so a missing id is never inserted.
            let row: Option<Wrapper> = sqlx::query_as(&queries.update)
                .bind(&changes.name)
                .bind(&changes.description)
                .bind(time::format(&changes.timestamp))
                .bind(id)
                .fetch_optional(&pool)
                .await
                .map_err(StorageError::from)?;

            Ok(Wrapper::maybe(row))
        }
    }

    fn delete(&self, id: &TodoId) -> impl Future<Output = Result<(), TodoError>> + Send {
        let pool = self.pool.clone();
        let queries = Arc::clone(&self.queries);
        let id = id.to_string();
        async move {
            sqlx::query(&queries.delete_by_id)
                .bind(id)
                .execute(&pool)
                .await
                .map_err(StorageError::from)?;

            Ok(())
        }
    }

    fn get_all(&self) -> impl Future<Output = Result<Vec<TodoItem>, TodoError>> + Send {
        let pool = self.pool.clone();
        let queries = Arc::clone(&self.queries);
        async move {
            let rows: Vec<Wrapper> = sqlx::query_as(&queries.select_all)
                .fetch_all(&pool)
                .await
                .map_err(StorageError::from)?;

            Ok(rows.into_iter().map(|w| w.0).collect())
        }
    }
}
