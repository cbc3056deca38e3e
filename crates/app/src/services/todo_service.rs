//! Todo service, the use-cases for managing todo items.

use std::future::Future;
use std::time::Duration;

use todohub_domain::error::{NotFoundError, TodoError};
use todohub_domain::id::TodoId;
use todohub_domain::time::{Clock, Timestamp};
use todohub_domain::todo::{TodoDraft, TodoItem};

use crate::ports::TodoRepository;

/// Upper bound for a single storage round trip unless configured otherwise.
pub const DEFAULT_STORAGE_TIMEOUT: Duration = Duration::from_secs(5);

/// A storage call did not complete within the configured bound.
#[derive(Debug, thiserror::Error)]
#[error("storage call exceeded {0:?}")]
pub struct StorageTimeout(pub Duration);

/// Application service for todo CRUD operations.
pub struct TodoService<R, C> {
    repo: R,
    clock: C,
    timeout: Duration,
}

impl<R: TodoRepository, C: Clock> TodoService<R, C> {
    /// Create a new service backed by the given repository and clock.
    pub fn new(repo: R, clock: C) -> Self {
        Self {
            repo,
            clock,
            timeout: DEFAULT_STORAGE_TIMEOUT,
        }
    }

    /// Replace the per-call storage timeout.
    #[must_use]
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Current time according to the injected clock.
    pub fn now(&self) -> Timestamp {
        self.clock.now()
    }

    /// Create a new todo with a freshly generated id and the current time.
    ///
    /// # Errors
    ///
    /// Returns a storage error propagated from the repository.
    #[tracing::instrument(skip(self, draft), fields(todo_name = %draft.name))]
    pub async fn create_todo(&self, draft: TodoDraft) -> Result<TodoItem, TodoError> {
        let timestamp = self.clock.now();
        let item = TodoItem::new(TodoId::generate(timestamp), draft, timestamp);
        self.bounded(self.repo.create(item)).await
    }

    /// Look up a todo by id, returning an error if not found.
    ///
    /// # Errors
    ///
    /// Returns [`TodoError::NotFound`] when no todo with `id` exists,
    /// or a storage error from the repository.
    #[tracing::instrument(skip(self))]
    pub async fn get_todo(&self, id: &TodoId) -> Result<TodoItem, TodoError> {
        self.bounded(self.repo.get_by_id(id))
            .await?
            .ok_or_else(|| not_found(id))
    }

    /// List all todos.
    ///
    /// # Errors
    ///
    /// Returns a storage error propagated from the repository.
    pub async fn list_todos(&self) -> Result<Vec<TodoItem>, TodoError> {
        self.bounded(self.repo.get_all()).await
    }

    /// Overwrite name and description of an existing todo and refresh its
    /// timestamp. The write only lands if the record still exists.
    ///
    /// # Errors
    ///
    /// Returns [`TodoError::NotFound`] when no todo with `id` exists at write
    /// time, or a storage error from the repository.
    #[tracing::instrument(skip(self, draft))]
    pub async fn update_todo(&self, id: &TodoId, draft: TodoDraft) -> Result<TodoItem, TodoError> {
        let changes = draft.stamped(self.clock.now());
        self.bounded(self.repo.update(id, changes))
            .await?
            .ok_or_else(|| not_found(id))
    }

    /// Delete a todo by id. Succeeds whether or not it existed.
    ///
    /// # Errors
    ///
    /// Returns a storage error propagated from the repository.
    #[tracing::instrument(skip(self))]
    pub async fn delete_todo(&self, id: &TodoId) -> Result<(), TodoError> {
        self.bounded(self.repo.delete(id)).await
    }

    async fn bounded<T>(
        &self,
        call: impl Future<Output = Result<T, TodoError>>,
    ) -> Result<T, TodoError> {
        if let Ok(result) = tokio::time::timeout(self.timeout, call).await {
            result
        } else {
            tracing::warn!(timeout = ?self.timeout, "storage call timed out");
            Err(TodoError::Storage(Box::new(StorageTimeout(self.timeout))))
        }
    }
}

fn not_found(id: &TodoId) -> TodoError {
    NotFoundError {
        entity: "Todo",
        id: id.to_string(),
    }
    .into()
}
