//! Data models for the shelf.
//!
//! - [`Value`] - the structural value space every key maps to
//! - [`record`] - typed record conventions used by `shelve-tool`

pub mod record;
pub mod value;

pub use record::Stamp;
pub use value::{Map, Value};
