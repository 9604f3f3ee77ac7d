//! SQLite storage layer for the shelf.
//!
//! This module provides the persistence layer using SQLite with:
//! - One table keyed by a unique string
//! - A commit per mutation
//! - A checksummed binary encoding for values
//!
//! # Submodules
//!
//! - [`codec`] - Value blob encoding
//! - [`schema`] - Table definition and bootstrap
//! - [`sqlite`] - The `Shelf` store

pub mod codec;
pub mod schema;
pub mod sqlite;

pub use sqlite::{Keys, Shelf};
