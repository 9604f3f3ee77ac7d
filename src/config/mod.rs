//! Configuration management.
//!
//! Resolves where the shelf lives, who is making changes, and how long to
//! wait on a locked database. Everything comes from flags or environment
//! variables; there is no configuration file.

use crate::error::{Error, Result};
use std::path::{Path, PathBuf};

/// Shelf file used when nothing else is configured.
pub const DEFAULT_DB_FILE: &str = "shelve.db";

/// Environment variable naming the shelf file.
pub const DB_ENV: &str = "SHELF_DB";

/// Older environment variable for the shelf file, still honored.
pub const LEGACY_DB_ENV: &str = "SHELVE_FILE";

/// Environment variable overriding the stamped user name.
pub const USER_ENV: &str = "SHELF_USER";

/// Environment variable for the busy timeout in milliseconds.
pub const BUSY_TIMEOUT_ENV: &str = "SHELF_BUSY_TIMEOUT_MS";

/// Timestamp layout for `created_ts` / `last_update_ts`.
pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S%.6f";

/// Resolve the shelf file path.
///
/// Priority:
/// 1. If `explicit_path` is provided (`--file`, or `SHELF_DB` through clap), use it
/// 2. `SHELVE_FILE` environment variable
/// 3. `shelve.db` in the current directory
#[must_use]
pub fn resolve_db_path(explicit_path: Option<&Path>) -> PathBuf {
    if let Some(path) = explicit_path {
        return path.to_path_buf();
    }

    if let Ok(db_path) = std::env::var(LEGACY_DB_ENV) {
        if !db_path.trim().is_empty() {
            return PathBuf::from(db_path);
        }
    }

    PathBuf::from(DEFAULT_DB_FILE)
}

/// Get the default user name for record stamps.
///
/// Priority:
/// 1. `SHELF_USER` environment variable
/// 2. `USER` (Unix) or `USERNAME` (Windows)
/// 3. "unknown"
#[must_use]
pub fn default_user() -> String {
    [USER_ENV, "USER", "USERNAME"]
        .iter()
        .filter_map(|var| std::env::var(var).ok())
        .find(|name| !name.trim().is_empty())
        .unwrap_or_else(|| "unknown".to_string())
}

/// Busy timeout from the environment, if set.
///
/// # Errors
///
/// Returns `Error::Config` if the variable is set but is not a whole
/// number of milliseconds.
pub fn busy_timeout_ms() -> Result<Option<u64>> {
    match std::env::var(BUSY_TIMEOUT_ENV) {
        Ok(raw) => parse_timeout(&raw).map(Some),
        Err(_) => Ok(None),
    }
}

fn parse_timeout(raw: &str) -> Result<u64> {
    raw.trim().parse().map_err(|_| {
        Error::Config(format!(
            "{BUSY_TIMEOUT_ENV} must be a whole number of milliseconds, got {raw:?}"
        ))
    })
}

/// Current local time in [`TIMESTAMP_FORMAT`].
#[must_use]
pub fn now_timestamp() -> String {
    chrono::Local::now().format(TIMESTAMP_FORMAT).to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_user() {
        let user = default_user();
        assert!(!user.is_empty());
    }

    #[test]
    fn test_resolve_db_path_with_explicit() {
        let explicit = PathBuf::from("/custom/path/records.db");
        let result = resolve_db_path(Some(&explicit));
        assert_eq!(result, explicit);
    }

    #[test]
    fn test_parse_timeout() {
        assert_eq!(parse_timeout("2500").unwrap(), 2500);
        assert_eq!(parse_timeout(" 10 ").unwrap(), 10);

        let err = parse_timeout("soon").unwrap_err();
        assert!(matches!(err, Error::Config(_)));
        assert!(parse_timeout("-1").is_err());
    }

    #[test]
    fn test_now_timestamp_shape() {
        let ts = now_timestamp();
        assert!(chrono::NaiveDateTime::parse_from_str(&ts, TIMESTAMP_FORMAT).is_ok());
        // "YYYY-MM-DD HH:MM:SS.ffffff"
        assert_eq!(ts.len(), 26);
    }
}
