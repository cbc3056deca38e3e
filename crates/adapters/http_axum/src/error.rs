//! HTTP error response mapping.

use axum::Json;
use axum::http::{Method, StatusCode};
use axum::response::{IntoResponse, Response};
use serde::Serialize;

use todohub_domain::error::{ForbiddenError, TodoError, ValidationError};

/// JSON error body returned by every failing request.
#[derive(Serialize)]
struct ErrorBody {
    error: String,
}

/// Every way a request can fail, mapped to one status code each.
#[derive(Debug)]
pub enum ApiError {
    /// A use-case or input check failed.
    Todo(TodoError),
    /// No route matched the method and path.
    RouteNotFound { method: Method, path: String },
}

impl From<TodoError> for ApiError {
    fn from(err: TodoError) -> Self {
        Self::Todo(err)
    }
}

impl From<ValidationError> for ApiError {
    fn from(err: ValidationError) -> Self {
        Self::Todo(err.into())
    }
}

impl From<ForbiddenError> for ApiError {
    fn from(err: ForbiddenError) -> Self {
        Self::Todo(err.into())
    }
}

impl ApiError {
    /// Status code this error is answered with.
    #[must_use]
    pub fn status(&self) -> StatusCode {
        match self {
            Self::Todo(TodoError::Validation(_)) => StatusCode::BAD_REQUEST,
            Self::Todo(TodoError::Forbidden(_)) => StatusCode::FORBIDDEN,
            Self::Todo(TodoError::NotFound(_)) | Self::RouteNotFound { .. } => {
                StatusCode::NOT_FOUND
            }
            Self::Todo(TodoError::Storage(_)) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        let message = match &self {
            Self::Todo(TodoError::Storage(err)) => {
                tracing::error!(error = ?err, "storage error");
                "internal server error".to_string()
            }
            Self::Todo(err) => {
                tracing::debug!(%status, error = %err, "request rejected");
                err.to_string()
            }
            Self::RouteNotFound { method, path } => {
                tracing::debug!(%method, %path, "no matching route");
                "route not found".to_string()
            }
        };

        (status, Json(ErrorBody { error: message })).into_response()
    }
}
