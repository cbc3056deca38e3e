//! # todohub-domain
//!
//! Pure domain model for the todohub service.
//!
//! ## Responsibilities
//! - Foundational types: the [`TodoId`](id::TodoId) identifier, error
//!   conventions, timestamps and the injectable clock
//! - Define the **Todo item** (the only persisted record) and the shapes
//!   used to create and change it
//! - Contain all identifier validation and generation rules
//!
//! ## Dependency rule
//! This crate has **no internal dependencies**.
//! It must never import anything from `app`, adapters, or external IO crates.
//! All IO boundaries are expressed as traits in the `app` crate (ports).

pub mod error;
pub mod id;
pub mod time;
pub mod todo;
