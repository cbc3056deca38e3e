//! Ordered route table and axum router assembly.
//!
//! Routes are `(method, path pattern, endpoint)` triples scanned in
//! registration order. Patterns are regular expressions anchored to the whole
//! request path, so `/todo/<id>/extra` never reaches the `/todo/<id>` routes.
//! The todo routes accept any single path segment; the handlers validate it
//! and answer 400 for a malformed identifier.
//! The table is installed as the single axum fallback, which keeps the
//! tower stack (tracing, body extraction, `IntoResponse`) in front of it.

use std::sync::Arc;

use axum::Router;
use axum::body::Bytes;
use axum::extract::State;
use axum::http::{Method, Uri};
use axum::response::{IntoResponse, Response};
use regex::Regex;
use tower_http::trace::TraceLayer;

use todohub_app::ports::TodoRepository;
use todohub_domain::time::Clock;

use crate::api::{health, todos};
use crate::error::ApiError;
use crate::state::AppState;

/// Path pattern matching the identifier segment of a todo route.
pub const TODO_ID_SEGMENT: &str = "[^/]+";

/// What a matched route invokes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Endpoint {
    Health,
    CreateTodo,
    GetTodo,
    UpdateTodo,
    DeleteTodo,
    ListTodos,
}

#[derive(Debug)]
struct Route {
    method: Method,
    pattern: Regex,
    endpoint: Endpoint,
}

/// Ordered `(method, pattern, endpoint)` bindings.
#[derive(Debug, Default)]
pub struct RouteTable {
    routes: Vec<Route>,
}

impl RouteTable {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a route. `pattern` must match the entire path.
    ///
    /// # Errors
    ///
    /// Returns [`regex::Error`] when `pattern` does not compile.
    pub fn route(
        mut self,
        method: Method,
        pattern: &str,
        endpoint: Endpoint,
    ) -> Result<Self, regex::Error> {
        let pattern = Regex::new(&format!("^(?:{pattern})$"))?;
        self.routes.push(Route {
            method,
            pattern,
            endpoint,
        });
        Ok(self)
    }

    /// The todo API in its fixed registration order.
    ///
    /// # Errors
    ///
    /// Returns [`regex::Error`] if a built-in pattern fails to compile.
    pub fn standard() -> Result<Self, regex::Error> {
        let todo = format!("/todo/{TODO_ID_SEGMENT}");
        Self::new()
            .route(Method::GET, "/", Endpoint::Health)?
            .route(Method::POST, "/todo", Endpoint::CreateTodo)?
            .route(Method::GET, &todo, Endpoint::GetTodo)?
            .route(Method::PUT, &todo, Endpoint::UpdateTodo)?
            .route(Method::DELETE, &todo, Endpoint::DeleteTodo)?
            .route(Method::GET, "/todos", Endpoint::ListTodos)
    }

    /// First route whose pattern matches `path` and whose method is `method`.
    #[must_use]
    pub fn resolve(&self, method: &Method, path: &str) -> Option<Endpoint> {
        self.routes
            .iter()
            .find(|route| route.pattern.is_match(path) && route.method == *method)
            .map(|route| route.endpoint)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.routes.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.routes.is_empty()
    }
}

struct Dispatcher<R, C> {
    state: AppState<R, C>,
    routes: Arc<RouteTable>,
}

impl<R, C> Clone for Dispatcher<R, C> {
    fn clone(&self) -> Self {
        Self {
            state: self.state.clone(),
            routes: Arc::clone(&self.routes),
        }
    }
}

/// Build the top-level axum [`Router`] over the standard route table.
///
/// Includes a [`TraceLayer`] that logs each HTTP request/response at the
/// `DEBUG` level using the `tracing` ecosystem.
///
/// # Errors
///
/// Returns [`regex::Error`] if the route table fails to compile.
pub fn build<R, C>(state: AppState<R, C>) -> Result<Router, regex::Error>
where
    R: TodoRepository + Send + Sync + 'static,
    C: Clock + 'static,
{
    Ok(with_routes(state, RouteTable::standard()?))
}

/// Build an axum [`Router`] dispatching through `routes`.
pub fn with_routes<R, C>(state: AppState<R, C>, routes: RouteTable) -> Router
where
    R: TodoRepository + Send + Sync + 'static,
    C: Clock + 'static,
{
    let dispatcher = Dispatcher {
        state,
        routes: Arc::new(routes),
    };
    Router::new()
        .fallback(dispatch::<R, C>)
        .layer(TraceLayer::new_for_http())
        .with_state(dispatcher)
}

async fn dispatch<R, C>(
    State(dispatcher): State<Dispatcher<R, C>>,
    method: Method,
    uri: Uri,
    body: Bytes,
) -> Response
where
    R: TodoRepository + Send + Sync + 'static,
    C: Clock + 'static,
{
    let path = uri.path();
    let Some(endpoint) = dispatcher.routes.resolve(&method, path) else {
        return ApiError::RouteNotFound {
            method,
            path: path.to_string(),
        }
        .into_response();
    };

    let state = &dispatcher.state;
    match endpoint {
        Endpoint::Health => health::check(state).into_response(),
        Endpoint::CreateTodo => todos::create(state, &body).await.into_response(),
        Endpoint::GetTodo => todos::get(state, path).await.into_response(),
        Endpoint::UpdateTodo => todos::update(state, path, &body).await.into_response(),
        Endpoint::DeleteTodo => todos::delete(state, path).await.into_response(),
        Endpoint::ListTodos => todos::list(state).await.into_response(),
    }
}
