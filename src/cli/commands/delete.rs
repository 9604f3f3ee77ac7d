//! Delete command implementation.

use crate::cli::commands::open_shelf;
use crate::error::{Error, Result};
use std::path::PathBuf;

/// Execute the delete command.
///
/// Unlike `Shelf::delete`, deleting a key that does not exist is reported
/// as an error.
///
/// # Errors
///
/// Returns `Error::KeyNotFound` if the record does not exist, or a
/// storage error.
pub fn execute(key: &str, db_path: Option<&PathBuf>, json: bool) -> Result<()> {
    let mut shelf = open_shelf(db_path)?;

    if !shelf.delete(key)? {
        return Err(Error::KeyNotFound {
            key: key.to_string(),
        });
    }
    shelf.close()?;

    if json {
        let output = serde_json::json!({
            "key": key,
            "deleted": true
        });
        println!("{output}");
    } else {
        println!("Record for {key} deleted.");
    }

    Ok(())
}
