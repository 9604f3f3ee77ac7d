//! Show command implementation.

use crate::cli::commands::open_shelf;
use crate::error::Result;
use colored::Colorize;
use std::path::PathBuf;

/// Execute the show command.
///
/// # Errors
///
/// Returns `Error::KeyNotFound` if the record does not exist, or
/// `Error::Decode` if its bytes are unreadable.
pub fn execute(key: &str, db_path: Option<&PathBuf>, json: bool) -> Result<()> {
    let shelf = open_shelf(db_path)?;
    let record = shelf.get(key)?;

    if json {
        let output = serde_json::json!({
            "key": key,
            "record": record.to_json(),
        });
        println!("{output}");
    } else {
        println!("Displaying contents of record: {}", key.bold());
        println!("{record}");
    }

    Ok(())
}
