//! sqlite-shelf - a persistent key-value shelf over one SQLite table
//!
//! This crate provides the [`Shelf`] store and the `shelve-tool` CLI
//! built on top of it.
//!
//! # Architecture
//!
//! - [`storage`] - SQLite table, value codec and the `Shelf` store
//! - [`model`] - Stored value tree and CLI record conventions
//! - [`cli`] - Command-line interface using clap
//! - [`config`] - Path, user and timeout resolution
//! - [`validate`] - Keyword and name validation for CLI input
//! - [`error`] - Error types and handling
//!
//! # Example
//!
//! ```no_run
//! use shelf::{Shelf, Value};
//! use std::path::Path;
//!
//! # fn main() -> shelf::Result<()> {
//! let mut shelf = Shelf::open(Path::new("states.db"))?;
//! shelf.set("MN", &Value::from("Minnesota"))?;
//! assert_eq!(shelf.get("MN")?, Value::from("Minnesota"));
//! assert!(shelf.contains("MN")?);
//! shelf.close()?;
//! # Ok(())
//! # }
//! ```

#![forbid(unsafe_code)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

pub mod cli;
pub mod config;
pub mod error;
pub mod model;
pub mod storage;
pub mod validate;

pub use error::{Error, Result};
pub use model::{Map, Value};
pub use storage::Shelf;
