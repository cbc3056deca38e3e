//! JSON handlers for todo items.

use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};

use todohub_app::ports::TodoRepository;
use todohub_domain::id::TodoId;
use todohub_domain::time::Clock;
use todohub_domain::todo::{TodoItem, TodoPayload};

use crate::error::ApiError;
use crate::state::AppState;

/// Possible responses from the list endpoint.
pub enum ListResponse {
    Ok(Json<Vec<TodoItem>>),
}

impl IntoResponse for ListResponse {
    fn into_response(self) -> Response {
        match self {
            Self::Ok(json) => json.into_response(),
        }
    }
}

/// Possible responses from the get endpoint.
pub enum GetResponse {
    Ok(Json<TodoItem>),
}

impl IntoResponse for GetResponse {
    fn into_response(self) -> Response {
        match self {
            Self::Ok(json) => json.into_response(),
        }
    }
}

/// Possible responses from the create and update endpoints.
///
/// Update answers `201 Created` as well.
pub enum WriteResponse {
    Created(Json<TodoItem>),
}

impl IntoResponse for WriteResponse {
    fn into_response(self) -> Response {
        match self {
            Self::Created(json) => (StatusCode::CREATED, json).into_response(),
        }
    }
}

/// Possible responses from the delete endpoint.
pub enum DeleteResponse {
    NoContent,
}

impl IntoResponse for DeleteResponse {
    fn into_response(self) -> Response {
        match self {
            Self::NoContent => StatusCode::NO_CONTENT.into_response(),
        }
    }
}

/// `POST /todo`
pub async fn create<R, C>(state: &AppState<R, C>, body: &[u8]) -> Result<WriteResponse, ApiError>
where
    R: TodoRepository + Send + Sync + 'static,
    C: Clock + 'static,
{
    let draft = TodoPayload::from_json(body)?.into_create();
    let created = state.todo_service.create_todo(draft).await?;
    tracing::info!(id = %created.id, "todo created");
    Ok(WriteResponse::Created(Json(created)))
}

/// `GET /todo/:id`
pub async fn get<R, C>(state: &AppState<R, C>, path: &str) -> Result<GetResponse, ApiError>
where
    R: TodoRepository + Send + Sync + 'static,
    C: Clock + 'static,
{
    let id = TodoId::from_path(path)?;
    let item = state.todo_service.get_todo(&id).await?;
    Ok(GetResponse::Ok(Json(item)))
}

/// `PUT /todo/:id`
///
/// Checked in order: identifier, existence, body, forbidden `id` field.
pub async fn update<R, C>(
    state: &AppState<R, C>,
    path: &str,
    body: &[u8],
) -> Result<WriteResponse, ApiError>
where
    R: TodoRepository + Send + Sync + 'static,
    C: Clock + 'static,
{
    let id = TodoId::from_path(path)?;
    state.todo_service.get_todo(&id).await?;
    let draft = TodoPayload::from_json(body)?.into_update()?;
    let updated = state.todo_service.update_todo(&id, draft).await?;
    Ok(WriteResponse::Created(Json(updated)))
}

/// `DELETE /todo/:id`
pub async fn delete<R, C>(state: &AppState<R, C>, path: &str) -> Result<DeleteResponse, ApiError>
where
    R: TodoRepository + Send + Sync + 'static,
    C: Clock + 'static,
{
    let id = TodoId::from_path(path)?;
    state.todo_service.delete_todo(&id).await?;
    tracing::info!(%id, "todo deleted");
    Ok(DeleteResponse::NoContent)
}

/// `GET /todos`
pub async fn list<R, C>(state: &AppState<R, C>) -> Result<ListResponse, ApiError>
where
    R: TodoRepository + Send + Sync + 'static,
    C: Clock + 'static,
{
    let items = state.todo_service.list_todos().await?;
    Ok(ListResponse::Ok(Json(items)))
}
