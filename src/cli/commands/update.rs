//! Update command implementation.

use crate::cli::commands::{open_shelf, resolve_user};
use crate::error::Result;
use crate::model::Stamp;
use crate::model::record::apply_update;
use crate::validate::parse_keywords;
use serde::Serialize;
use std::path::PathBuf;
use tracing::debug;

/// Output for update.
#[derive(Serialize)]
struct UpdateOutput<'a> {
    key: &'a str,
    fields: Vec<&'a str>,
}

/// Execute the update command.
///
/// # Errors
///
/// Returns `Error::KeyNotFound` if the record does not exist,
/// `Error::InvalidKeyword` for malformed keywords, or a storage error.
pub fn execute(
    key: &str,
    keywords: &[String],
    db_path: Option<&PathBuf>,
    user: Option<&str>,
    json: bool,
) -> Result<()> {
    let updates = parse_keywords(keywords)?;
    let mut shelf = open_shelf(db_path)?;

    let mut record = shelf.get(key)?;
    let changed: Vec<String> = updates.keys().cloned().collect();
    debug!(key, fields = ?changed, "Updating record");

    apply_update(key, &mut record, updates, &Stamp::now(resolve_user(user)))?;
    shelf.set(key, &record)?;
    shelf.close()?;

    if json {
        let output = UpdateOutput {
            key,
            fields: changed.iter().map(String::as_str).collect(),
        };
        println!("{}", serde_json::to_string(&output)?);
    } else {
        println!("Updated record: {key}");
    }

    Ok(())
}
