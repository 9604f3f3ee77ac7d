//! shelve-tool entry point.

use clap::Parser;
use shelf::cli::commands;
use shelf::cli::{Cli, Commands};
use shelf::error::Error;
use std::process::ExitCode;

fn main() -> ExitCode {
    let cli = Cli::parse();

    if cli.no_color || !std::io::IsTerminal::is_terminal(&std::io::stdout()) {
        colored::control::set_override(false);
    }

    // Set up tracing based on verbosity
    init_tracing(cli.verbose, cli.quiet);

    match run(&cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            if cli.json {
                eprintln!("{}", e.to_structured_json());
            } else if !cli.quiet {
                if let Some(hint) = e.hint() {
                    eprintln!("Error: {e}\n  Hint: {hint}");
                } else {
                    eprintln!("Error: {e}");
                }
            }
            ExitCode::from(e.exit_code())
        }
    }
}

fn init_tracing(verbose: u8, quiet: bool) {
    use tracing_subscriber::EnvFilter;

    if quiet {
        return;
    }

    // Honor RUST_LOG if set, otherwise use verbosity flag
    let filter = if std::env::var("RUST_LOG").is_ok() {
        EnvFilter::from_default_env()
    } else {
        match verbose {
            0 => EnvFilter::new("warn"),
            1 => EnvFilter::new("info"),
            2 => EnvFilter::new("debug,rusqlite=info"),
            _ => EnvFilter::new("trace"),
        }
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .without_time()
        .init();
}

fn run(cli: &Cli) -> Result<(), Error> {
    let db = cli.file.as_ref();
    let user = cli.user.as_deref();

    match &cli.command {
        Commands::Add(args) => commands::add::execute(args, db, user, cli.json),
        Commands::AddType(args) => commands::add_type::execute(args, db, user, cli.json),
        Commands::Update { key, keywords } => {
            commands::update::execute(key, keywords, db, user, cli.json)
        }
        Commands::Delete { key } => commands::delete::execute(key, db, cli.json),
        Commands::List(args) => commands::list::execute(args, db, cli.json),
        Commands::Show { key } => commands::show::execute(key, db, cli.json),
        Commands::Version => commands::version::execute(cli.json),
        Commands::Completions { shell } => commands::completions::execute(shell),
    }
}
