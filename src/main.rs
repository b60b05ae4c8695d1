//! # KB - Personal Kanban Board
//!
//! A single-user kanban board for the terminal. Projects hold tasks, and
//! tasks move across three fixed columns: To-Do, Doing, Done.
//!
//! ## Key Features
//!
//! - **Three-Column Board**: the classic To-Do / Doing / Done flow, with
//!   keyboard "drag" between columns
//! - **Multiple Projects**: a side panel for selecting, creating, and
//!   deleting projects; deleting a project removes its tasks with it
//! - **Two Interfaces**: a CLI for scripted use + an interactive TUI
//! - **Local File Storage**: one schema-versioned JSON document, written
//!   atomically so the board is never half-saved
//!
//! ## Quick Start
//!
//! ```bash
//! # Create a project and add a task
//! kb add-project "Home"
//! kb add "Buy milk" --desc "2 litres"
//!
//! # Move it across the board
//! kb move <task-id> doing
//!
//! # See the columns
//! kb board
//!
//! # Or do all of the above interactively
//! kb ui
//! ```
//!
//! Data is stored locally in `~/.kanban/board.json`. There is no server,
//! no sync, and no multi-user mode: the board is yours alone.

use std::path::PathBuf;

use clap::Parser;

pub mod board;
pub mod cli;
pub mod cmd;
pub mod fields;
pub mod project;
pub mod session;
pub mod store;
pub mod task;
pub mod tui {
    pub mod app;
    pub mod colors;
    pub mod enums;
    pub mod input;
    pub mod run;
    pub mod task_form;
    pub mod utils;
}

use cli::Cli;
use cmd::*;
use store::Store;

fn main() {
    let cli = Cli::parse();

    // Determine the store path
    let store_path = cli.db.unwrap_or_else(|| {
        let home = std::env::var("HOME").unwrap_or_else(|_| ".".to_string());
        let kanban_dir = PathBuf::from(home).join(".kanban");
        if let Err(e) = std::fs::create_dir_all(&kanban_dir) {
            eprintln!(
                "Failed to create kanban directory {}: {}",
                kanban_dir.display(),
                e
            );
            std::process::exit(1);
        }
        kanban_dir.join("board.json")
    });

    // Commands that manage their own store lifecycle
    match &cli.command {
        Commands::Ui => {
            cmd_ui(&store_path);
            return;
        }
        Commands::Completions { shell } => {
            cmd_completions(*shell);
            return;
        }
        _ => {}
    }

    let mut store = match Store::load(&store_path) {
        Ok(s) => s,
        Err(e) => {
            eprintln!("Failed to load store: {e}");
            std::process::exit(1);
        }
    };

    match cli.command {
        Commands::Ui => unreachable!("UI command handled above"),
        Commands::Completions { .. } => unreachable!("Completions command handled above"),

        Commands::AddProject { title } => cmd_add_project(&mut store, &store_path, title),

        Commands::Projects => cmd_projects(&store),

        Commands::DeleteProject { project } => {
            cmd_delete_project(&mut store, &store_path, project)
        }

        Commands::Add { title, desc, project } => {
            cmd_add(&mut store, &store_path, title, desc, project)
        }

        Commands::List { project, status } => cmd_list(&store, project, status),

        Commands::Move { id, status } => cmd_move(&mut store, &store_path, id, status),

        Commands::Delete { id } => cmd_delete(&mut store, &store_path, id),

        Commands::Board { project } => cmd_board(&store, project),
    }
}
