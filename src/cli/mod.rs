//! CLI definitions using clap.

use clap::{Parser, Subcommand};
use std::path::PathBuf;

use crate::config::{DB_ENV, USER_ENV};
use crate::model::record::DEFAULT_TYPE;

pub mod commands;

/// shelve-tool - manage typed records in a SQLite shelf
#[derive(Parser, Debug)]
#[command(name = "shelve-tool", author, version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Shelf file (default: ./shelve.db)
    #[arg(long, short = 'f', global = true, env = DB_ENV)]
    pub file: Option<PathBuf>,

    /// User name recorded in created/updated stamps
    #[arg(long, global = true, env = USER_ENV)]
    pub user: Option<String>,

    /// Output as JSON
    #[arg(long, global = true)]
    pub json: bool,

    /// Increase logging verbosity (-v, -vv)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Quiet mode (no logging, and errors only show as the exit code unless --json is set)
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Disable colored output
    #[arg(long, global = true)]
    pub no_color: bool,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Add a record of a registered (or ad-hoc) type
    Add(AddArgs),

    /// Register a user-defined record type
    AddType(AddTypeArgs),

    /// Update fields of an existing record
    Update {
        /// Key identifying the record
        key: String,

        /// Space-separated field=value pairs to set
        keywords: Vec<String>,
    },

    /// Remove a record from the shelf
    Delete {
        /// Key identifying the record
        key: String,
    },

    /// List the records in the shelf
    List(ListArgs),

    /// Show the contents of a record
    Show {
        /// Key identifying the record
        key: String,
    },

    /// Print version information
    Version,

    /// Generate shell completions
    Completions {
        /// Shell to generate completions for
        #[arg(value_enum)]
        shell: Shell,
    },
}

/// Supported shells for completions.
#[derive(clap::ValueEnum, Clone, Debug)]
pub enum Shell {
    Bash,
    Zsh,
    Fish,
    PowerShell,
    Elvish,
}

#[derive(clap::Args, Debug)]
pub struct AddArgs {
    /// A string that serves as a name for the new record
    pub key: String,

    /// User-defined type for this record, used to list records by type
    #[arg(long, short = 't', default_value = DEFAULT_TYPE)]
    pub r#type: String,

    /// Space-separated field=value pairs for the record
    pub keywords: Vec<String>,
}

#[derive(clap::Args, Debug)]
pub struct AddTypeArgs {
    /// Name of the user type
    pub type_name: String,

    /// Field names that records of this type get, defaulting to null
    #[arg(long, num_args = 0..)]
    pub fieldnames: Vec<String>,

    /// Description of the type
    #[arg(long)]
    pub description: Option<String>,
}

#[derive(clap::Args, Debug)]
pub struct ListArgs {
    /// Limit the list to records of this type
    #[arg(long, short = 't')]
    pub r#type: Option<String>,

    /// Show each record's data next to its key
    #[arg(long, short = 'l')]
    pub long: bool,

    /// Include type-metadata records
    #[arg(long, short = 'M')]
    pub show_metadata: bool,
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parse_add() {
        let cli = Cli::parse_from([
            "shelve-tool", "-f", "my.db", "add", "obj1", "--type", "car", "make=Volvo", "doors=4",
        ]);
        assert_eq!(cli.file, Some(PathBuf::from("my.db")));
        match cli.command {
            Commands::Add(args) => {
                assert_eq!(args.key, "obj1");
                assert_eq!(args.r#type, "car");
                assert_eq!(args.keywords, ["make=Volvo", "doors=4"]);
            }
            other => panic!("unexpected command: {other:?}"),
        }
    }

    #[test]
    fn test_parse_add_default_type() {
        let cli = Cli::parse_from(["shelve-tool", "add", "obj1"]);
        match cli.command {
            Commands::Add(args) => assert_eq!(args.r#type, DEFAULT_TYPE),
            other => panic!("unexpected command: {other:?}"),
        }
    }

    #[test]
    fn test_parse_add_type() {
        let cli = Cli::parse_from([
            "shelve-tool", "add-type", "car", "--fieldnames", "make", "model", "--description", "Cars",
        ]);
        match cli.command {
            Commands::AddType(args) => {
                assert_eq!(args.type_name, "car");
                assert_eq!(args.fieldnames, ["make", "model"]);
                assert_eq!(args.description.as_deref(), Some("Cars"));
            }
            other => panic!("unexpected command: {other:?}"),
        }
    }

    #[test]
    fn test_parse_list_flags() {
        let cli = Cli::parse_from(["shelve-tool", "list", "-l", "-M"]);
        match cli.command {
            Commands::List(args) => {
                assert!(args.long);
                assert!(args.show_metadata);
                assert!(args.r#type.is_none());
            }
            other => panic!("unexpected command: {other:?}"),
        }
    }
}
