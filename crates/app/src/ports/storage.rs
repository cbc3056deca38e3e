//! Storage port: the key-value contract every todo store fulfils.
//!
//! Implementations hold no per-call mutable state and must be safe to share
//! between concurrently running request tasks.

use std::fmt;
use std::future::Future;
use std::str::FromStr;

use todohub_domain::error::TodoError;
use todohub_domain::id::TodoId;
use todohub_domain::todo::{TodoChanges, TodoItem};

/// Repository for persisting and querying [`TodoItem`]s, keyed by [`TodoId`].
pub trait TodoRepository {
    /// Write a new record unconditionally. The caller guarantees a fresh id.
    fn create(&self, item: TodoItem) -> impl Future<Output = Result<TodoItem, TodoError>> + Send;

    /// Read one record. Absence is `Ok(None)`, never an error.
    fn get_by_id(
        &self,
        id: &TodoId,
    ) -> impl Future<Output = Result<Option<TodoItem>, TodoError>> + Send;

    /// Overwrite `name`, `description` and `timestamp` of an existing record
    /// in a single conditional write.
    ///
    /// Returns the post-update record, or `Ok(None)` when no record exists
    /// for `id` at write time. Never creates a record.
    fn update(
        &self,
        id: &TodoId,
        changes: TodoChanges,
    ) -> impl Future<Output = Result<Option<TodoItem>, TodoError>> + Send;

    /// Remove a record. Deleting a missing id succeeds.
    fn delete(&self, id: &TodoId) -> impl Future<Output = Result<(), TodoError>> + Send;

    /// Every record, in store order.
    fn get_all(&self) -> impl Future<Output = Result<Vec<TodoItem>, TodoError>> + Send;
}

impl<T: TodoRepository + Send + Sync> TodoRepository for std::sync::Arc<T> {
    fn create(&self, item: TodoItem) -> impl Future<Output = Result<TodoItem, TodoError>> + Send {
        (**self).create(item)
    }

    fn get_by_id(
        &self,
        id: &TodoId,
    ) -> impl Future<Output = Result<Option<TodoItem>, TodoError>> + Send {
        (**self).get_by_id(id)
    }

    fn update(
        &self,
        id: &TodoId,
        changes: TodoChanges,
    ) -> impl Future<Output = Result<Option<TodoItem>, TodoError>> + Send {
        (**self).update(id, changes)
    }

    fn delete(&self, id: &TodoId) -> impl Future<Output = Result<(), TodoError>> + Send {
        (**self).delete(id)
    }

    fn get_all(&self) -> impl Future<Output = Result<Vec<TodoItem>, TodoError>> + Send {
        (**self).get_all()
    }
}

/// Name of the single logical table holding todo items.
///
/// Follows the `DynamoDB` naming rules (3 to 255 characters of
/// `[A-Za-z0-9_.-]`), which also makes the name safe to quote as an SQL
/// identifier.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TableName(String);

/// A table name violated the naming rules.
#[derive(Debug, thiserror::Error)]
#[error("invalid table name {0:?}: expected 3-255 characters of [A-Za-z0-9_.-]")]
pub struct InvalidTableName(pub String);

impl TableName {
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl FromStr for TableName {
    type Err = InvalidTableName;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let valid_len = (3..=255).contains(&s.len());
        let valid_chars = s
            .bytes()
            .all(|b| b.is_ascii_alphanumeric() || matches!(b, b'_' | b'.' | b'-'));
        if valid_len && valid_chars {
            Ok(Self(s.to_string()))
        } else {
            Err(InvalidTableName(s.to_string()))
        }
    }
}

impl fmt::Display for TableName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}
