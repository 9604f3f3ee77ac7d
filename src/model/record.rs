//! Typed record conventions for `shelve-tool`.
//!
//! The store itself knows nothing about these. A record is a [`Value::Map`]
//! with a `type` field; a type may be registered by storing a metadata
//! record under `UDT_<type>` that lists the type's field names.

use crate::error::{Error, Result};
use crate::model::{Map, Value};

/// Key prefix for type-metadata records.
pub const TYPE_PREFIX: &str = "UDT_";

/// `type` of a type-metadata record.
pub const METADATA_TYPE: &str = "metadata";

/// `type` given to records added without `--type`.
pub const DEFAULT_TYPE: &str = "user-object";

/// Reserved field names.
pub mod fields {
    pub const TYPE: &str = "type";
    pub const KEY: &str = "key";
    pub const NAME: &str = "name";
    pub const FIELDNAMES: &str = "fieldnames";
    pub const DESCRIPTION: &str = "description";
    pub const CREATED_TS: &str = "created_ts";
    pub const CREATE_USER: &str = "create_user";
    pub const LAST_UPDATE_TS: &str = "last_update_ts";
    pub const LAST_UPDATE_USER: &str = "last_update_user";
}

/// Who made a change and when.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Stamp {
    pub timestamp: String,
    pub user: String,
}

impl Stamp {
    #[must_use]
    pub fn new(timestamp: impl Into<String>, user: impl Into<String>) -> Self {
        Self {
            timestamp: timestamp.into(),
            user: user.into(),
        }
    }

    /// Stamp with the current local time.
    #[must_use]
    pub fn now(user: impl Into<String>) -> Self {
        Self::new(crate::config::now_timestamp(), user)
    }
}

/// Shelf key holding the metadata record for `type_name`.
#[must_use]
pub fn type_key(type_name: &str) -> String {
    format!("{TYPE_PREFIX}{type_name}")
}

/// The `type` field of a record, or `""` when absent or not a map.
#[must_use]
pub fn record_type(value: &Value) -> &str {
    value
        .get(fields::TYPE)
        .and_then(Value::as_str)
        .unwrap_or("")
}

#[must_use]
pub fn is_metadata(value: &Value) -> bool {
    record_type(value) == METADATA_TYPE
}

/// Field names declared by a type-metadata record.
///
/// Non-string entries are skipped.
#[must_use]
pub fn fieldnames(type_def: &Value) -> Vec<&str> {
    type_def
        .get(fields::FIELDNAMES)
        .and_then(Value::as_list)
        .map(|names| names.iter().filter_map(Value::as_str).collect())
        .unwrap_or_default()
}

/// Build a new user record.
///
/// `type` and `key` always reflect the arguments, overriding same-named
/// keywords. Fields declared by `type_def` but not supplied are set to
/// `null`.
#[must_use]
pub fn new_record(
    key: &str,
    type_name: &str,
    mut fields_in: Map,
    type_def: Option<&Value>,
    stamp: &Stamp,
) -> Value {
    fields_in.insert(fields::TYPE.into(), Value::from(type_name));
    fields_in.insert(fields::KEY.into(), Value::from(key));

    if let Some(def) = type_def {
        for name in fieldnames(def) {
            fields_in.entry(name.to_string()).or_insert(Value::Null);
        }
    }

    fields_in.insert(fields::CREATED_TS.into(), Value::from(stamp.timestamp.as_str()));
    fields_in.insert(fields::CREATE_USER.into(), Value::from(stamp.user.as_str()));
    Value::Map(fields_in)
}

/// Build the metadata record registering `type_name`.
#[must_use]
pub fn new_type_definition(
    type_name: &str,
    names: &[String],
    description: Option<&str>,
    stamp: &Stamp,
) -> Value {
    let mut rec = Map::new();
    rec.insert(fields::TYPE.into(), Value::from(METADATA_TYPE));
    rec.insert(fields::NAME.into(), Value::from(type_key(type_name)));
    rec.insert(
        fields::FIELDNAMES.into(),
        names.iter().map(|n| Value::from(n.as_str())).collect(),
    );
    rec.insert(fields::DESCRIPTION.into(), Value::from(description));
    rec.insert(fields::CREATED_TS.into(), Value::from(stamp.timestamp.as_str()));
    rec.insert(fields::CREATE_USER.into(), Value::from(stamp.user.as_str()));
    Value::Map(rec)
}

/// Merge `updates` into `record` and stamp the change.
///
/// # Errors
///
/// Returns `Error::InvalidArgument` if the stored value is not a map.
pub fn apply_update(key: &str, record: &mut Value, updates: Map, stamp: &Stamp) -> Result<()> {
    let kind = record.kind();
    let map = record.as_map_mut().ok_or_else(|| {
        Error::InvalidArgument(format!("record {key} is a {kind}, not a map of fields"))
    })?;

    map.extend(updates);
    map.insert(fields::LAST_UPDATE_TS.into(), Value::from(stamp.timestamp.as_str()));
    map.insert(fields::LAST_UPDATE_USER.into(), Value::from(stamp.user.as_str()));
    Ok(())
}

/// Which records `list` shows.
#[derive(Debug, Clone, Copy, Default)]
pub struct ListFilter<'a> {
    /// Only records of exactly this type.
    pub type_name: Option<&'a str>,
    /// Include metadata records when no type is given.
    pub show_metadata: bool,
}

impl ListFilter<'_> {
    #[must_use]
    pub fn matches(&self, value: &Value) -> bool {
        match self.type_name {
            Some(wanted) => record_type(value) == wanted,
            None => self.show_metadata || !is_metadata(value),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn stamp() -> Stamp {
        Stamp::new("2024-01-02 03:04:05.000006", "tester")
    }

    fn car_type() -> Value {
        new_type_definition(
            "car",
            &["make".to_string(), "model".to_string()],
            Some("Cars we own"),
            &stamp(),
        )
    }

    #[test]
    fn test_type_key() {
        assert_eq!(type_key("car"), "UDT_car");
    }

    #[test]
    fn test_new_type_definition() {
        let def = car_type();
        assert_eq!(record_type(&def), METADATA_TYPE);
        assert!(is_metadata(&def));
        assert_eq!(def.get("name").and_then(Value::as_str), Some("UDT_car"));
        assert_eq!(fieldnames(&def), ["make", "model"]);
        assert_eq!(def.get("description").and_then(Value::as_str), Some("Cars we own"));
        assert_eq!(def.get("create_user").and_then(Value::as_str), Some("tester"));
    }

    #[test]
    fn test_type_definition_without_description() {
        let def = new_type_definition("thing", &[], None, &stamp());
        assert_eq!(def.get("description"), Some(&Value::Null));
        assert!(fieldnames(&def).is_empty());
    }

    #[test]
    fn test_new_record_fills_declared_fields() {
        let mut supplied = Map::new();
        supplied.insert("make".into(), Value::from("Volvo"));
        supplied.insert("color".into(), Value::from("red"));

        let def = car_type();
        let rec = new_record("car1", "car", supplied, Some(&def), &stamp());

        assert_eq!(record_type(&rec), "car");
        assert_eq!(rec.get("key").and_then(Value::as_str), Some("car1"));
        assert_eq!(rec.get("make").and_then(Value::as_str), Some("Volvo"));
        assert_eq!(rec.get("model"), Some(&Value::Null));
        assert_eq!(rec.get("color").and_then(Value::as_str), Some("red"));
        assert_eq!(
            rec.get("created_ts").and_then(Value::as_str),
            Some("2024-01-02 03:04:05.000006")
        );
    }

    #[test]
    fn test_new_record_type_and_key_win_over_keywords() {
        let mut supplied = Map::new();
        supplied.insert("type".into(), Value::from("sneaky"));
        supplied.insert("key".into(), Value::from("other"));

        let rec = new_record("obj1", DEFAULT_TYPE, supplied, None, &stamp());
        assert_eq!(record_type(&rec), DEFAULT_TYPE);
        assert_eq!(rec.get("key").and_then(Value::as_str), Some("obj1"));
    }

    #[test]
    fn test_apply_update() {
        let mut rec = new_record("obj1", DEFAULT_TYPE, Map::new(), None, &stamp());

        let mut updates = Map::new();
        updates.insert("count".into(), Value::from("5"));
        apply_update("obj1", &mut rec, updates, &Stamp::new("later", "editor")).unwrap();

        assert_eq!(rec.get("count").and_then(Value::as_str), Some("5"));
        assert_eq!(rec.get("last_update_ts").and_then(Value::as_str), Some("later"));
        assert_eq!(rec.get("last_update_user").and_then(Value::as_str), Some("editor"));
        assert_eq!(rec.get("create_user").and_then(Value::as_str), Some("tester"));
    }

    #[test]
    fn test_apply_update_rejects_non_map() {
        let mut plain = Value::from("Minnesota");
        let err = apply_update("MN", &mut plain, Map::new(), &stamp()).unwrap_err();
        assert!(err.to_string().contains("is a str"));
    }

    #[test]
    fn test_record_type_of_plain_value() {
        assert_eq!(record_type(&Value::from("Minnesota")), "");
        assert_eq!(record_type(&Value::Map(Map::new())), "");
    }

    #[test]
    fn test_list_filter() {
        let def = car_type();
        let car = new_record("car1", "car", Map::new(), Some(&def), &stamp());
        let plain = Value::from("Minnesota");

        let default = ListFilter::default();
        assert!(default.matches(&car));
        assert!(default.matches(&plain));
        assert!(!default.matches(&def));

        let with_meta = ListFilter {
            show_metadata: true,
            ..ListFilter::default()
        };
        assert!(with_meta.matches(&def));

        let cars = ListFilter {
            type_name: Some("car"),
            show_metadata: false,
        };
        assert!(cars.matches(&car));
        assert!(!cars.matches(&plain));
        assert!(!cars.matches(&def));

        let metadata = ListFilter {
            type_name: Some(METADATA_TYPE),
            show_metadata: false,
        };
        assert!(metadata.matches(&def));
    }
}
