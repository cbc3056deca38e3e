//! # todohub-adapter-storage-dynamodb
//!
//! `DynamoDB` persistence adapter using the
//! [AWS SDK for Rust](https://docs.rs/aws-sdk-dynamodb).
//!
//! ## Responsibilities
//! - Implement the [`TodoRepository`](todohub_app::ports::TodoRepository) port
//! - Build the SDK client for a configured endpoint and region
//! - Create the todo table on startup when it does not exist
//! - Map between domain types and attribute maps
//!
//! ## Dependency rule
//! Depends on `todohub-app` (for port traits) and `todohub-domain` (for domain types).
//! The `app` and `domain` crates must never reference this adapter.

pub mod client;
pub mod error;
pub mod todo_repo;

pub use client::{Config, Database};
pub use error::StorageError;
pub use todo_repo::DynamoTodoRepository;
