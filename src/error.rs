//! Error types for the shelf store and `shelve-tool`.
//!
//! Provides structured error handling with:
//! - Machine-readable error codes (`ErrorCode`)
//! - Category-based exit codes (2=storage, 3=not_found, 4=validation, 5=codec, etc.)
//! - Context-aware recovery hints
//! - Structured JSON output for piped / scripted consumers

use std::path::PathBuf;
use thiserror::Error;

/// Result type alias for shelf operations.
pub type Result<T> = std::result::Result<T, Error>;

// ── Error Code ────────────────────────────────────────────────

/// Machine-readable error codes grouped by category.
///
/// Each code maps to a SCREAMING_SNAKE string and a category-based
/// exit code. Scripts can match on either.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCode {
    // Storage (exit 2)
    OpenError,
    DatabaseError,
    ConstraintViolation,

    // Not Found (exit 3)
    KeyNotFound,

    // Validation (exit 4)
    RecordExists,
    TypeExists,
    InvalidKeyword,
    InvalidArgument,

    // Codec (exit 5)
    DecodeError,
    EncodeError,

    // Config (exit 7)
    ConfigError,

    // I/O (exit 8)
    IoError,
    JsonError,

    // Internal (exit 1)
    UseAfterClose,
}

impl ErrorCode {
    /// Machine-readable SCREAMING_SNAKE code string.
    #[must_use]
    pub const fn as_str(&self) -> &str {
        match self {
            Self::OpenError => "OPEN_ERROR",
            Self::DatabaseError => "DATABASE_ERROR",
            Self::ConstraintViolation => "CONSTRAINT_VIOLATION",
            Self::KeyNotFound => "KEY_NOT_FOUND",
            Self::RecordExists => "RECORD_EXISTS",
            Self::TypeExists => "TYPE_EXISTS",
            Self::InvalidKeyword => "INVALID_KEYWORD",
            Self::InvalidArgument => "INVALID_ARGUMENT",
            Self::DecodeError => "DECODE_ERROR",
            Self::EncodeError => "ENCODE_ERROR",
            Self::ConfigError => "CONFIG_ERROR",
            Self::IoError => "IO_ERROR",
            Self::JsonError => "JSON_ERROR",
            Self::UseAfterClose => "USE_AFTER_CLOSE",
        }
    }

    /// Category-based exit code (1-8).
    #[must_use]
    pub const fn exit_code(&self) -> u8 {
        match self {
            Self::UseAfterClose => 1,
            Self::OpenError | Self::DatabaseError | Self::ConstraintViolation => 2,
            Self::KeyNotFound => 3,
            Self::RecordExists | Self::TypeExists | Self::InvalidKeyword | Self::InvalidArgument => 4,
            Self::DecodeError | Self::EncodeError => 5,
            Self::ConfigError => 7,
            Self::IoError | Self::JsonError => 8,
        }
    }

    /// Whether the caller can reasonably retry with corrected input.
    ///
    /// True for validation errors. False for open failures, corruption,
    /// and internal errors, which need a human to look at the file.
    #[must_use]
    pub const fn is_retryable(&self) -> bool {
        matches!(
            self,
            Self::RecordExists
                | Self::TypeExists
                | Self::InvalidKeyword
                | Self::InvalidArgument
                | Self::KeyNotFound
        )
    }
}

// ── Error Enum ────────────────────────────────────────────────

/// Errors that can occur in shelf operations.
#[derive(Error, Debug)]
pub enum Error {
    #[error("Cannot open shelf at {}: {source}", path.display())]
    Open {
        path: PathBuf,
        #[source]
        source: rusqlite::Error,
    },

    #[error("Database error: {0}")]
    Database(#[from] rusqlite::Error),

    #[error("Constraint violation: {0}")]
    ConstraintViolation(String),

    #[error("Shelf is closed")]
    UseAfterClose,

    #[error("Key: {key} does not exist.")]
    KeyNotFound { key: String },

    #[error("Record with key: {key} already exists.")]
    RecordExists { key: String },

    #[error("User type {name} already exists.")]
    TypeExists { name: String },

    #[error("Invalid keyword(s): {}", keywords.join(", "))]
    InvalidKeyword { keywords: Vec<String> },

    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    #[error("Cannot decode stored value: {0}")]
    Decode(String),

    #[error("Cannot encode value: {0}")]
    Encode(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl Error {
    /// Map this error to its structured `ErrorCode`.
    #[must_use]
    pub const fn error_code(&self) -> ErrorCode {
        match self {
            Self::Open { .. } => ErrorCode::OpenError,
            Self::Database(_) => ErrorCode::DatabaseError,
            Self::ConstraintViolation(_) => ErrorCode::ConstraintViolation,
            Self::UseAfterClose => ErrorCode::UseAfterClose,
            Self::KeyNotFound { .. } => ErrorCode::KeyNotFound,
            Self::RecordExists { .. } => ErrorCode::RecordExists,
            Self::TypeExists { .. } => ErrorCode::TypeExists,
            Self::InvalidKeyword { .. } => ErrorCode::InvalidKeyword,
            Self::InvalidArgument(_) => ErrorCode::InvalidArgument,
            Self::Decode(_) => ErrorCode::DecodeError,
            Self::Encode(_) => ErrorCode::EncodeError,
            Self::Config(_) => ErrorCode::ConfigError,
            Self::Io(_) => ErrorCode::IoError,
            Self::Json(_) => ErrorCode::JsonError,
        }
    }

    /// Category-based exit code, delegating to the `ErrorCode`.
    #[must_use]
    pub const fn exit_code(&self) -> u8 {
        self.error_code().exit_code()
    }

    /// Context-aware recovery hint.
    ///
    /// Returns `None` if no actionable suggestion exists.
    #[must_use]
    pub fn hint(&self) -> Option<String> {
        match self {
            Self::Open { path, .. } => Some(format!(
                "Check that {} is a writable SQLite file, or pass another path with --file.",
                path.display()
            )),

            Self::KeyNotFound { .. } => {
                Some("Use `shelve-tool list` to see available keys.".to_string())
            }

            Self::RecordExists { key } => Some(format!(
                "Use `shelve-tool update {key} field=value` to change an existing record."
            )),

            Self::TypeExists { .. } => Some(
                "Use `shelve-tool list --type metadata` to see registered types.".to_string(),
            ),

            Self::InvalidKeyword { .. } => {
                Some("All keywords should be formatted as key=value.".to_string())
            }

            Self::Decode(_) => Some(
                "The stored bytes were not written by this tool or are corrupted.".to_string(),
            ),

            Self::Database(_)
            | Self::ConstraintViolation(_)
            | Self::UseAfterClose
            | Self::InvalidArgument(_)
            | Self::Encode(_)
            | Self::Config(_)
            | Self::Io(_)
            | Self::Json(_) => None,
        }
    }

    /// Structured JSON representation for machine consumption.
    ///
    /// Includes error code, message, retryability, exit code, and
    /// optional recovery hint.
    #[must_use]
    pub fn to_structured_json(&self) -> serde_json::Value {
        let code = self.error_code();
        let mut obj = serde_json::json!({
            "error": {
                "code": code.as_str(),
                "message": self.to_string(),
                "retryable": code.is_retryable(),
                "exit_code": code.exit_code(),
            }
        });

        if let Some(hint) = self.hint() {
            obj["error"]["hint"] = serde_json::Value::String(hint);
        }

        obj
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_exit_codes_by_category() {
        let not_found = Error::KeyNotFound { key: "MN".into() };
        assert_eq!(not_found.exit_code(), 3);

        let exists = Error::RecordExists { key: "MN".into() };
        assert_eq!(exists.exit_code(), 4);

        assert_eq!(Error::Decode("bad magic".into()).exit_code(), 5);
        assert_eq!(Error::UseAfterClose.exit_code(), 1);
    }

    #[test]
    fn test_key_not_found_message() {
        let err = Error::KeyNotFound { key: "missing".into() };
        assert_eq!(err.to_string(), "Key: missing does not exist.");
    }

    #[test]
    fn test_structured_json_includes_hint() {
        let err = Error::InvalidKeyword {
            keywords: vec!["foo".into(), "bar".into()],
        };
        let json = err.to_structured_json();

        assert_eq!(json["error"]["code"], "INVALID_KEYWORD");
        assert_eq!(json["error"]["exit_code"], 4);
        assert_eq!(json["error"]["retryable"], true);
        assert_eq!(json["error"]["message"], "Invalid keyword(s): foo, bar");
        assert!(json["error"]["hint"].as_str().unwrap().contains("key=value"));
    }

    #[test]
    fn test_structured_json_without_hint() {
        let json = Error::UseAfterClose.to_structured_json();
        assert_eq!(json["error"]["code"], "USE_AFTER_CLOSE");
        assert!(json["error"].get("hint").is_none());
    }
}
