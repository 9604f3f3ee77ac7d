//! Add-type command implementation.
//!
//! A user type is a metadata record stored under `UDT_<name>`. Its field
//! names are filled with `null` on every record later added with that type.

use crate::cli::AddTypeArgs;
use crate::cli::commands::{open_shelf, resolve_user};
use crate::error::{Error, Result};
use crate::model::Stamp;
use crate::model::record::{new_type_definition, type_key};
use crate::validate::{validate_fieldnames, validate_type_name};
use serde::Serialize;
use std::path::PathBuf;

/// Output for add-type.
#[derive(Serialize)]
struct AddTypeOutput<'a> {
    type_name: &'a str,
    key: String,
    fieldnames: &'a [String],
}

/// Execute the add-type command.
///
/// # Errors
///
/// Returns `Error::TypeExists` if the type is already registered, or a
/// validation, open or storage error.
pub fn execute(
    args: &AddTypeArgs,
    db_path: Option<&PathBuf>,
    user: Option<&str>,
    json: bool,
) -> Result<()> {
    validate_type_name(&args.type_name)?;
    validate_fieldnames(&args.fieldnames)?;

    let key = type_key(&args.type_name);
    let mut shelf = open_shelf(db_path)?;

    if shelf.contains(&key)? {
        return Err(Error::TypeExists { name: key });
    }

    let stamp = Stamp::now(resolve_user(user));
    let definition = new_type_definition(
        &args.type_name,
        &args.fieldnames,
        args.description.as_deref(),
        &stamp,
    );
    shelf.set(&key, &definition)?;
    shelf.close()?;

    if json {
        let output = AddTypeOutput {
            type_name: &args.type_name,
            key,
            fieldnames: &args.fieldnames,
        };
        println!("{}", serde_json::to_string(&output)?);
    } else {
        println!("Record user-type: {} added.", args.type_name);
    }

    Ok(())
}
