//! Command implementations.

pub mod add;
pub mod add_type;
pub mod completions;
pub mod delete;
pub mod list;
pub mod show;
pub mod update;
pub mod version;

use crate::config::{busy_timeout_ms, default_user, resolve_db_path};
use crate::error::Result;
use crate::storage::Shelf;
use std::path::PathBuf;
use tracing::debug;

/// Open the shelf named by `--file` (or the configured default).
pub(crate) fn open_shelf(db_path: Option<&PathBuf>) -> Result<Shelf> {
    let path = resolve_db_path(db_path.map(PathBuf::as_path));
    debug!(path = %path.display(), "Opening shelf");
    Shelf::open_with_timeout(&path, busy_timeout_ms()?)
}

/// User for stamps: `--user` flag, else the environment default.
pub(crate) fn resolve_user(user: Option<&str>) -> String {
    user.map(ToString::to_string).unwrap_or_else(default_user)
}
