use std::path::PathBuf;

use clap::Parser;

use crate::cmd::Commands;

/// Single-user kanban board CLI.
/// Storage defaults to ~/.kanban/board.json or a path passed via --db.
#[derive(Parser)]
#[command(name = "kb", version, about = "Personal kanban board")]
pub struct Cli {
    /// Path to the JSON store file.
    #[arg(long, global = true)]
    pub db: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}
