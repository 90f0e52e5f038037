use std::path::PathBuf;

use clap::Parser;

use crate::cmd::Commands;

/// Deadline tracker that remembers every extension.
/// Storage defaults to the platform data directory, `$SDM_DATA_DIR`, or `--data-dir`.
#[derive(Parser)]
#[command(name = "sdm", version, about = "Soft deadline manager")]
pub struct Cli {
    /// Directory holding the task store and config.toml.
    #[arg(long, global = true)]
    pub data_dir: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}
