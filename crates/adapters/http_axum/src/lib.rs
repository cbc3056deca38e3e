//! # todohub-adapter-http-axum
//!
//! HTTP adapter built on [axum](https://docs.rs/axum).
//!
//! ## Responsibilities
//! - Serve the JSON todo API (`/`, `/todo`, `/todo/{id}`, `/todos`)
//! - Resolve every request against an ordered table of
//!   `(method, path pattern, endpoint)` routes, first match wins
//! - Map HTTP requests into application service calls (driving adapter)
//! - Map application results and errors into exactly one JSON response
//!
//! ## Dependency rule
//! Depends on `todohub-app` (for port traits and services) and `todohub-domain`
//! (for domain types used in request/response mapping). Never leaks axum types
//! into the domain.

pub mod api;
pub mod error;
pub mod router;
pub mod state;

#[cfg(test)]
mod testing;

pub use router::{Endpoint, RouteTable, build};
pub use state::AppState;
