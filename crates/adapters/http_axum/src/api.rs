//! JSON API handler modules.
//!
//! Handlers are plain async functions invoked by the route table dispatcher;
//! each returns either a typed success response or an [`ApiError`](crate::error::ApiError).

#[allow(clippy::missing_errors_doc)]
pub mod health;
#[allow(clippy::missing_errors_doc)]
pub mod todos;
