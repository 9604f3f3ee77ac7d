//! Input validation for `shelve-tool` arguments.
//!
//! Keywords arrive as `field=value` strings. Malformed input is rejected
//! as a whole so a half-parsed record is never written.

use crate::error::{Error, Result};
use crate::model::{Map, Value};
use crate::model::record::TYPE_PREFIX;

/// Parse `field=value` keywords into a field map.
///
/// Each keyword splits at its first `=`, so values may contain `=`.
/// Later duplicates of a field replace earlier ones. Values are stored
/// as strings.
///
/// # Errors
///
/// Returns `Error::InvalidKeyword` listing every keyword that has no `=`
/// or an empty field name.
pub fn parse_keywords(keywords: &[String]) -> Result<Map> {
    let mut fields = Map::new();
    let mut invalid = Vec::new();

    for kw in keywords {
        match kw.split_once('=') {
            Some((field, value)) if !field.trim().is_empty() => {
                fields.insert(field.trim().to_string(), Value::from(value));
            }
            _ => invalid.push(kw.clone()),
        }
    }

    if invalid.is_empty() {
        Ok(fields)
    } else {
        Err(Error::InvalidKeyword { keywords: invalid })
    }
}

/// Validate a record key.
///
/// # Errors
///
/// Returns `Error::InvalidArgument` for empty keys or keys with
/// surrounding whitespace.
pub fn validate_key(key: &str) -> Result<()> {
    if key.is_empty() {
        return Err(Error::InvalidArgument("key must not be empty".to_string()));
    }
    if key.trim() != key {
        return Err(Error::InvalidArgument(format!(
            "key {key:?} has leading or trailing whitespace"
        )));
    }
    Ok(())
}

/// Validate a user type name.
///
/// # Errors
///
/// Returns `Error::InvalidArgument` for names that are not valid keys or
/// that already carry the `UDT_` prefix.
pub fn validate_type_name(name: &str) -> Result<()> {
    validate_key(name).map_err(|_| {
        Error::InvalidArgument(format!("type name {name:?} must be non-empty without surrounding whitespace"))
    })?;
    if name.starts_with(TYPE_PREFIX) {
        return Err(Error::InvalidArgument(format!(
            "type name {name:?} must not start with {TYPE_PREFIX}; the prefix is added automatically"
        )));
    }
    Ok(())
}

/// Validate field names declared by `add-type --fieldnames`.
///
/// # Errors
///
/// Returns `Error::InvalidArgument` for empty names, names containing
/// `=`, or duplicates.
pub fn validate_fieldnames(names: &[String]) -> Result<()> {
    for (i, name) in names.iter().enumerate() {
        if name.trim().is_empty() {
            return Err(Error::InvalidArgument("field names must not be empty".to_string()));
        }
        if name.contains('=') {
            return Err(Error::InvalidArgument(format!(
                "field name {name:?} must not contain '='"
            )));
        }
        if names[..i].contains(name) {
            return Err(Error::InvalidArgument(format!("field name {name:?} is listed twice")));
        }
    }
    Ok(())
}
