//! Add command implementation.

use crate::cli::AddArgs;
use crate::cli::commands::{open_shelf, resolve_user};
use crate::error::{Error, Result};
use crate::model::Stamp;
use crate::model::record::{new_record, type_key};
use crate::validate::{parse_keywords, validate_key, validate_type_name};
use serde::Serialize;
use std::path::PathBuf;
use tracing::debug;

/// Output for add.
#[derive(Serialize)]
struct AddOutput<'a> {
    key: &'a str,
    r#type: &'a str,
    added: bool,
}

/// Execute the add command.
///
/// # Errors
///
/// Returns `Error::RecordExists` if the key is taken, or a validation,
/// open or storage error.
pub fn execute(
    args: &AddArgs,
    db_path: Option<&PathBuf>,
    user: Option<&str>,
    json: bool,
) -> Result<()> {
    validate_key(&args.key)?;
    validate_type_name(&args.r#type)?;
    let fields = parse_keywords(&args.keywords)?;

    let mut shelf = open_shelf(db_path)?;

    if shelf.contains(&args.key)? {
        return Err(Error::RecordExists {
            key: args.key.clone(),
        });
    }

    let type_def = shelf.try_get(&type_key(&args.r#type))?;
    debug!(key = %args.key, record_type = %args.r#type, registered = type_def.is_some(), "Adding record");

    let stamp = Stamp::now(resolve_user(user));
    let record = new_record(&args.key, &args.r#type, fields, type_def.as_ref(), &stamp);
    shelf.set(&args.key, &record)?;
    shelf.close()?;

    if json {
        let output = AddOutput {
            key: &args.key,
            r#type: &args.r#type,
            added: true,
        };
        println!("{}", serde_json::to_string(&output)?);
    } else {
        println!("Entry {} added.", args.key);
    }

    Ok(())
}
