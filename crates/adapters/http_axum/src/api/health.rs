//! Liveness endpoint.

use axum::Json;
use serde::Serialize;

use todohub_app::ports::TodoRepository;
use todohub_domain::time::{Clock, Timestamp};

use crate::state::AppState;

/// Body of `GET /`.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Health {
    pub alive: bool,
    #[serde(with = "todohub_domain::time::text")]
    pub alive_at: Timestamp,
    #[serde(with = "todohub_domain::time::text")]
    pub timestamp: Timestamp,
}

/// `GET /`. Never touches storage.
pub fn check<R, C>(state: &AppState<R, C>) -> Json<Health>
where
    R: TodoRepository + Send + Sync + 'static,
    C: Clock + 'static,
{
    Json(Health {
        alive: true,
        alive_at: state.started_at,
        timestamp: state.todo_service.now(),
    })
}
