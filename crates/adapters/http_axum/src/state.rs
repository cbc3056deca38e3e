//! Shared application state for axum handlers.

use std::sync::Arc;

use todohub_app::ports::TodoRepository;
use todohub_app::services::todo_service::TodoService;
use todohub_domain::time::{Clock, Timestamp};

/// Application state shared across all handlers.
///
/// `Clone` is implemented manually so the repository and clock types do not
/// need to be `Clone`; only the `Arc` is cloned.
pub struct AppState<R, C> {
    /// Todo CRUD service.
    pub todo_service: Arc<TodoService<R, C>>,
    /// When this state was assembled, reported by the health endpoint.
    pub started_at: Timestamp,
}

impl<R, C> Clone for AppState<R, C> {
    fn clone(&self) -> Self {
        Self {
            todo_service: Arc::clone(&self.todo_service),
            started_at: self.started_at,
        }
    }
}

impl<R, C> AppState<R, C>
where
    R: TodoRepository + Send + Sync + 'static,
    C: Clock + 'static,
{
    /// Create a new application state, stamping the start time from the
    /// service clock.
    pub fn new(todo_service: TodoService<R, C>) -> Self {
        Self::from_arc(Arc::new(todo_service))
    }

    /// Create a new application state from a pre-wrapped service.
    pub fn from_arc(todo_service: Arc<TodoService<R, C>>) -> Self {
        let started_at = todo_service.now();
        Self {
            todo_service,
            started_at,
        }
    }
}
