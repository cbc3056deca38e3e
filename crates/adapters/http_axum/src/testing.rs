//! In-memory doubles and request helpers shared by the handler tests.

use std::future::Future;
use std::sync::{Arc, Mutex};

use axum::Router;
use axum::body::Body;
use axum::http::{Method, Request, StatusCode, header};
use tower::ServiceExt;

use todohub_app::ports::TodoRepository;
use todohub_app::services::todo_service::TodoService;
use todohub_domain::error::TodoError;
use todohub_domain::id::TodoId;
use todohub_domain::time::{self, ManualClock, Timestamp};
use todohub_domain::todo::{TodoChanges, TodoItem};

use crate::router::RouteTable;
use crate::state::AppState;

/// Keeps insertion order so list assertions are stable.
#[derive(Default)]
pub(crate) struct MemoryRepo {
    items: Mutex<Vec<TodoItem>>,
}

impl TodoRepository for MemoryRepo {
    fn create(&self, item: TodoItem) -> impl Future<Output = Result<TodoItem, TodoError>> + Send {
        self.items.lock().unwrap().push(item.clone());
        async { Ok(item) }
    }

    fn get_by_id(
        &self,
        id: &TodoId,
    ) -> impl Future<Output = Result<Option<TodoItem>, TodoError>> + Send {
        let found = self
            .items
            .lock()
            .unwrap()
            .iter()
            .find(|item| &item.id == id)
            .cloned();
        async { Ok(found) }
    }

    fn update(
        &self,
        id: &TodoId,
        changes: TodoChanges,
    ) -> impl Future<Output = Result<Option<TodoItem>, TodoError>> + Send {
        let updated = self
            .items
            .lock()
            .unwrap()
            .iter_mut()
            .find(|item| &item.id == id)
            .map(|item| {
                item.name = changes.name;
                item.description = changes.description;
                item.timestamp = changes.timestamp;
                item.clone()
            });
        async { Ok(updated) }
    }

    fn delete(&self, id: &TodoId) -> impl Future<Output = Result<(), TodoError>> + Send {
        self.items.lock().unwrap().retain(|item| &item.id != id);
        async { Ok(()) }
    }

    fn get_all(&self) -> impl Future<Output = Result<Vec<TodoItem>, TodoError>> + Send {
        let all = self.items.lock().unwrap().clone();
        async { Ok(all) }
    }
}

/// Behaves like [`MemoryRepo`] except that the record is deleted between the
/// existence check and the write, so every update finds nothing.
#[derive(Default)]
pub(crate) struct DeletedMidUpdateRepo {
    inner: MemoryRepo,
}

impl TodoRepository for DeletedMidUpdateRepo {
    fn create(&self, item: TodoItem) -> impl Future<Output = Result<TodoItem, TodoError>> + Send {
        self.inner.create(item)
    }

    fn get_by_id(
        &self,
        id: &TodoId,
    ) -> impl Future<Output = Result<Option<TodoItem>, TodoError>> + Send {
        self.inner.get_by_id(id)
    }

    fn update(
        &self,
        id: &TodoId,
        _changes: TodoChanges,
    ) -> impl Future<Output = Result<Option<TodoItem>, TodoError>> + Send {
        self.inner.items.lock().unwrap().retain(|item| &item.id != id);
        async { Ok(None) }
    }

    fn delete(&self, id: &TodoId) -> impl Future<Output = Result<(), TodoError>> + Send {
        self.inner.delete(id)
    }

    fn get_all(&self) -> impl Future<Output = Result<Vec<TodoItem>, TodoError>> + Send {
        self.inner.get_all()
    }
}

/// Every call fails as if the store were unreachable.
pub(crate) struct FailingRepo;

fn unreachable_store() -> TodoError {
    TodoError::Storage("store unreachable".into())
}

impl TodoRepository for FailingRepo {
    fn create(&self, _item: TodoItem) -> impl Future<Output = Result<TodoItem, TodoError>> + Send {
        async { Err(unreachable_store()) }
    }

    fn get_by_id(
        &self,
        _id: &TodoId,
    ) -> impl Future<Output = Result<Option<TodoItem>, TodoError>> + Send {
        async { Err(unreachable_store()) }
    }

    fn update(
        &self,
        _id: &TodoId,
        _changes: TodoChanges,
    ) -> impl Future<Output = Result<Option<TodoItem>, TodoError>> + Send {
        async { Err(unreachable_store()) }
    }

    fn delete(&self, _id: &TodoId) -> impl Future<Output = Result<(), TodoError>> + Send {
        async { Err(unreachable_store()) }
    }

    fn get_all(&self) -> impl Future<Output = Result<Vec<TodoItem>, TodoError>> + Send {
        async { Err(unreachable_store()) }
    }
}

pub(crate) fn start() -> Timestamp {
    time::parse("2018-09-19 01:02:03").unwrap()
}

/// Standard router over `repo`, with a clock pinned at [`start`].
pub(crate) fn app<R>(repo: R) -> (Router, Arc<ManualClock>)
where
    R: TodoRepository + Send + Sync + 'static,
{
    app_with_routes(repo, RouteTable::standard().unwrap())
}

pub(crate) fn app_with_routes<R>(repo: R, routes: RouteTable) -> (Router, Arc<ManualClock>)
where
    R: TodoRepository + Send + Sync + 'static,
{
    let clock = Arc::new(ManualClock::new(start()));
    let service = TodoService::new(repo, Arc::clone(&clock));
    let router = crate::router::with_routes(AppState::new(service), routes);
    (router, clock)
}

/// Send one request and decode the JSON answer (`null` for an empty body).
pub(crate) async fn send(
    app: &Router,
    method: Method,
    uri: &str,
    body: Option<&str>,
) -> (StatusCode, serde_json::Value) {
    let request = Request::builder()
        .method(method)
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/json")
        .body(body.map_or_else(Body::empty, |text| Body::from(text.to_string())))
        .unwrap();

    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let json = if bytes.is_empty() {
        serde_json::Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap()
    };
    (status, json)
}
