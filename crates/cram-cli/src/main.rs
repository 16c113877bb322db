use std::io;
use std::path::Path;

use anyhow::{Context, Result};
use chrono::Local;
use clap::Parser;
use tracing_subscriber::EnvFilter;

use cram_cli::commands::{add, delete, edit, export, import, list, report, timeline, toggle};
use cram_cli::{Cli, Commands, Config};
use cram_db::Database;

/// Load config and open database, ensuring the parent directory exists.
fn open_database(config_path: Option<&Path>) -> Result<(Database, Config)> {
    let config = Config::load_from(config_path).context("failed to load configuration")?;
    tracing::debug!(?config, "loaded configuration");

    if let Some(parent) = config.database_path.parent() {
        std::fs::create_dir_all(parent).context("failed to create database directory")?;
    }

    let mut db = Database::open(&config.database_path).context("failed to open database")?;
    db.subscribe(|change| tracing::debug!(?change, "store changed"));
    Ok((db, config))
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize tracing with verbose flag support
    let filter = if cli.verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::from_default_env()
    };
    // Use try_init to avoid panic if tracing is already initialized (e.g., in tests)
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .try_init();

    let Some(command) = &cli.command else {
        // No subcommand, show help
        use clap::CommandFactory;
        Cli::command().print_help()?;
        println!();
        return Ok(());
    };

    let (mut db, config) = open_database(cli.config.as_deref())?;
    let mut out = io::stdout().lock();
    let today = Local::now().date_naive();

    match command {
        Commands::Add(args) => {
            add::run(&mut out, &mut db, args, &config)?;
        }
        Commands::Edit(args) => edit::run(&mut out, &mut db, args)?,
        Commands::Delete(args) => delete::run(&mut out, &mut db, args)?,
        Commands::Toggle(args) => toggle::run(&mut out, &mut db, args)?,
        Commands::List(args) => list::run(&mut out, &db, args)?,
        Commands::Timeline(args) => timeline::run(&mut out, &db, args, today)?,
        Commands::Report(args) => report::run(&mut out, &db, args, today)?,
        Commands::Import(args) => {
            import::run(&mut out, &mut db, args)?;
        }
        Commands::Export => {
            export::run(&mut out, &db)?;
        }
    }

    Ok(())
}
