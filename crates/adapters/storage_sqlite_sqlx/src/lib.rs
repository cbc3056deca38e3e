//! # todohub-adapter-storage-sqlite-sqlx
//!
//! `SQLite` persistence adapter using [sqlx](https://docs.rs/sqlx).
//!
//! ## Responsibilities
//! - Implement the [`TodoRepository`](todohub_app::ports::TodoRepository) port
//! - Manage `SQLite` connection pool lifecycle
//! - Bootstrap the todo table (named at runtime) when it does not exist
//! - Map between domain types and database rows
//!
//! ## Dependency rule
//! Depends on `todohub-app` (for port traits) and `todohub-domain` (for domain types).
//! The `app` and `domain` crates must never reference this adapter.

pub mod error;
pub mod pool;
pub mod todo_repo;

pub use error::StorageError;
pub use pool::{Config, Database};
pub use todo_repo::SqliteTodoRepository;
