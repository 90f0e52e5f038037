//! # sdm - Soft Deadline Manager CLI
//!
//! Track tasks whose deadlines are allowed to move, while keeping an honest record of
//! every move.
//!
//! ## Quick Start
//!
//! ```bash
//! # Add a task due on Friday
//! sdm add "Write project spec" --due friday --category Work --priority high
//!
//! # List active tasks, overdue first
//! sdm list --filter active
//!
//! # Push a deadline back three days and say why
//! sdm extend "Write project spec" --days 3 --reason "Low energy"
//!
//! # See where the time goes
//! sdm insights
//! ```
//!
//! Data is stored locally as `soft-deadline-manager.v1.json` in the data directory.
//! Set `RUST_LOG=debug` to trace storage activity.

use std::path::Path;

use clap::Parser;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use soft_deadlines::cli::Cli;
use soft_deadlines::cmd::*;
use soft_deadlines::config::{resolve_data_dir, Config};
use soft_deadlines::db::Database;
use soft_deadlines::error::Result;
use soft_deadlines::status::today;
use soft_deadlines::storage::FileStore;

fn main() {
    // Tracing is opt-in via RUST_LOG.
    let filter = std::env::var("RUST_LOG")
        .ok()
        .and_then(|raw| EnvFilter::try_new(raw.trim()).ok())
        .unwrap_or_else(|| EnvFilter::new("off"));

    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(std::io::stderr))
        .with(filter)
        .init();

    let cli = Cli::parse();
    if let Err(err) = run(cli) {
        eprintln!("error: {err}");
        std::process::exit(err.exit_code());
    }
}

fn run(cli: Cli) -> Result<()> {
    match cli.command {
        // Completions never open the store, so they work without a data directory.
        Commands::Completions { shell } => {
            cmd_completions(shell);
            Ok(())
        }
        command => run_with_store(cli.data_dir.as_deref(), command),
    }
}

fn run_with_store(data_dir: Option<&Path>, command: Commands) -> Result<()> {
    let data_dir = resolve_data_dir(data_dir);
    let config = Config::load_from_dir(&data_dir)?;
    let mut store = FileStore::new(&data_dir);
    tracing::debug!(dir = %data_dir.display(), "using data directory");

    let mut db = Database::load(&mut store);
    let today = today();

    match command {
        Commands::Add { title, due, category, priority, link } =>
            cmd_add(&mut db, &mut store, today, title, due, category, priority, link),

        Commands::List { filter, limit } => {
            cmd_list(&db, today, filter, limit.or(config.list_limit));
            Ok(())
        }

        Commands::View { id } => cmd_view(&db, today, id),

        Commands::Extend { id, to, days, reason } =>
            cmd_extend(&mut db, &mut store, &config, today, id, to, days, reason),

        Commands::Complete { id, at } => cmd_complete(&mut db, &mut store, today, id, at),

        Commands::Reopen { id } => cmd_reopen(&mut db, &mut store, id),

        Commands::Toggle { id } => cmd_toggle(&mut db, &mut store, id),

        Commands::Rename { id, title } => cmd_rename(&mut db, &mut store, id, title),

        Commands::Delete { id } => cmd_delete(&mut db, &mut store, id),

        Commands::Stats => {
            cmd_stats(&db, today);
            Ok(())
        }

        Commands::Insights => {
            cmd_insights(&db);
            Ok(())
        }

        Commands::Completions { shell } => {
            cmd_completions(shell);
            Ok(())
        }
    }
}
