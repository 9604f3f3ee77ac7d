//! List command implementation.

use crate::cli::ListArgs;
use crate::cli::commands::open_shelf;
use crate::error::Result;
use crate::model::record::{ListFilter, record_type};
use colored::Colorize;
use serde::Serialize;
use std::path::PathBuf;

const KEY_WIDTH: usize = 15;
const DATA_WIDTH: usize = 60;

/// Output for list.
#[derive(Serialize)]
struct ListOutput {
    records: Vec<ListItem>,
    count: usize,
}

#[derive(Serialize)]
struct ListItem {
    key: String,
    r#type: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    data: Option<serde_json::Value>,
}

/// Execute the list command.
///
/// Keys are visited in the shelf's iteration order (first insertion).
///
/// # Errors
///
/// Returns an open or storage error, or `Error::Decode` if any listed
/// record is unreadable.
pub fn execute(args: &ListArgs, db_path: Option<&PathBuf>, json: bool) -> Result<()> {
    let shelf = open_shelf(db_path)?;
    let filter = ListFilter {
        type_name: args.r#type.as_deref(),
        show_metadata: args.show_metadata,
    };

    let mut matched = Vec::new();
    for key in shelf.iter()? {
        let key = key?;
        let value = shelf.get(&key)?;
        if filter.matches(&value) {
            matched.push((key, value));
        }
    }

    if json {
        let records: Vec<ListItem> = matched
            .iter()
            .map(|(key, value)| ListItem {
                key: key.clone(),
                r#type: record_type(value).to_string(),
                data: args.long.then(|| value.to_json()),
            })
            .collect();
        let output = ListOutput {
            count: records.len(),
            records,
        };
        println!("{}", serde_json::to_string(&output)?);
        return Ok(());
    }

    let footer = if args.long {
        let header = format!("{:<KEY_WIDTH$}  {:<DATA_WIDTH$}", "Object Key", "Data");
        println!("{}", header.bold());
        println!("{}  {}", "-".repeat(KEY_WIDTH), "-".repeat(DATA_WIDTH));
        "-".repeat(KEY_WIDTH + 2 + DATA_WIDTH)
    } else {
        println!("{}", "Object Key".bold());
        println!("{}", "-".repeat(KEY_WIDTH));
        "-".repeat(KEY_WIDTH)
    };
    println!();

    for (key, value) in &matched {
        if args.long {
            println!("{key:<KEY_WIDTH$}  {:<DATA_WIDTH$}", value.to_string());
        } else {
            println!("{key}");
        }
    }

    println!("{footer}");
    println!("{} records", matched.len());
    Ok(())
}
