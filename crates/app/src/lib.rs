//! # todohub-app
//!
//! Application layer: use-cases and **port definitions** (traits).
//!
//! ## Responsibilities
//! - Define the **port trait** that storage adapters must implement:
//!   - `TodoRepository`: key-value CRUD for todo items
//! - Define the **driving/inbound port** as a use-case struct:
//!   - `TodoService`: create, read, update, delete and list todo items
//! - Bound every storage round trip with a timeout
//! - Orchestrate domain objects without knowing *how* persistence works
//!
//! ## Dependency rule
//! Depends on `todohub-domain` only (plus `tokio::time` for timeouts).
//! Never imports adapter crates. Adapters depend on *this* crate, not the reverse.

pub mod ports;
pub mod services;
