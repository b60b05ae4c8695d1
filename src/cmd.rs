//! Command implementations for the CLI interface.
//!
//! This module contains all the command handlers that implement the
//! subcommands: project and task CRUD, status moves, the textual board
//! view, and the TUI launcher. Every mutation is commit-first: the store
//! is saved before any output claims success.

use clap::Subcommand;
use clap_complete::{generate, Shell};

use std::path::Path;

use chrono::Utc;

use crate::board;
use crate::fields::Status;
use crate::project::Project;
use crate::session::Session;
use crate::store::{format_age, format_status, truncate, validate_title, Store};
use crate::task::Task;
use crate::tui::run::run_board_tui;

#[derive(Subcommand)]
pub enum Commands {
    /// Launch the interactive board interface.
    Ui,

    /// Create a new project.
    AddProject {
        /// Display title for the project.
        title: String,
    },

    /// List projects with task counts.
    Projects,

    /// Delete a project and every task on it.
    DeleteProject {
        /// Project id or exact title.
        project: String,
    },

    /// Add a task.
    Add {
        /// Short title for the task.
        title: String,
        /// Optional longer description.
        #[arg(long)]
        desc: Option<String>,
        /// Project id or title. Defaults to the first project.
        #[arg(long)]
        project: Option<String>,
    },

    /// List tasks with optional filters.
    List {
        /// Filter by project id or title. Defaults to the first project.
        #[arg(long)]
        project: Option<String>,
        /// Filter by status.
        #[arg(long, value_enum)]
        status: Option<Status>,
    },

    /// Move a task to another column.
    Move {
        /// Task id.
        id: String,
        /// Target status: todo | doing | done.
        #[arg(value_enum)]
        status: Status,
    },

    /// Delete a task.
    Delete {
        /// Task id.
        id: String,
    },

    /// Print the three board columns for a project.
    Board {
        /// Project id or title. Defaults to the first project.
        #[arg(long)]
        project: Option<String>,
    },

    /// Generate shell completion scripts.
    Completions {
        /// Target shell.
        #[arg(value_enum)]
        shell: Shell,
    },
}

/// Resolve a project identifier (id or exact title) to a project.
/// Title matching is case-insensitive and must be unambiguous.
pub fn resolve_project(store: &Store, identifier: &str) -> Result<Project, String> {
    if let Some(p) = store.get_project(identifier) {
        return Ok(p.clone());
    }

    let matches: Vec<&Project> = store
        .projects
        .iter()
        .filter(|p| p.title.eq_ignore_ascii_case(identifier))
        .collect();

    match matches.len() {
        0 => Err(format!("No project found matching '{}'", identifier)),
        1 => Ok(matches[0].clone()),
        _ => {
            let mut msg = format!("Multiple projects titled '{}':\n", identifier);
            for p in matches {
                msg.push_str(&format!("  {} - {}\n", p.project_id, p.title));
            }
            msg.push_str("Please use the specific id instead.");
            Err(msg)
        }
    }
}

/// Pick the project a command should operate on: the explicit identifier
/// when given, otherwise the session default (first project in creation
/// order).
fn pick_project(store: &Store, identifier: Option<&str>) -> Result<Project, String> {
    if let Some(ident) = identifier {
        return resolve_project(store, ident);
    }
    let projects = store.projects();
    let mut session = Session::new();
    session.select_first(&projects);
    match session.current() {
        Some(id) => resolve_project(store, id),
        None => Err("No projects exist. Create one with 'kb add-project <title>'.".to_string()),
    }
}

/// Create a new project.
pub fn cmd_add_project(store: &mut Store, store_path: &Path, title: String) {
    let title = match validate_title(&title) {
        Ok(t) => t,
        Err(e) => {
            eprintln!("Invalid title: {e}");
            std::process::exit(1);
        }
    };

    let project = Project::new(&title);
    let id = project.project_id.clone();
    if let Err(e) = store.add_project(project) {
        eprintln!("Failed to add project: {e}");
        std::process::exit(1);
    }
    if let Err(e) = store.save(store_path) {
        eprintln!("Failed to save store: {e}");
        std::process::exit(1);
    }
    println!("Added project '{}' ({})", title, id);
}

/// List all projects with their task counts.
pub fn cmd_projects(store: &Store) {
    println!("{:<28} {:<24} {}", "ID", "Title", "Tasks");
    for p in store.projects() {
        let count = store.tasks_for_project(&p.project_id).len();
        println!(
            "{:<28} {:<24} {}",
            p.project_id,
            truncate(&p.title, 24),
            count
        );
    }
}

/// Delete a project and cascade-delete its tasks, committed in one save.
pub fn cmd_delete_project(store: &mut Store, store_path: &Path, identifier: String) {
    let project = match resolve_project(store, &identifier) {
        Ok(p) => p,
        Err(e) => {
            eprintln!("{e}");
            std::process::exit(1);
        }
    };

    store.delete_project(&project.project_id);
    let removed = store.delete_tasks_for_project(&project.project_id);
    if let Err(e) = store.save(store_path) {
        eprintln!("Failed to save store: {e}");
        std::process::exit(1);
    }
    println!(
        "Deleted project '{}' and {} task(s)",
        project.title, removed
    );
}

/// Add a task to a project.
pub fn cmd_add(
    store: &mut Store,
    store_path: &Path,
    title: String,
    desc: Option<String>,
    project: Option<String>,
) {
    let title = match validate_title(&title) {
        Ok(t) => t,
        Err(e) => {
            eprintln!("Invalid title: {e}");
            std::process::exit(1);
        }
    };

    let project = match pick_project(store, project.as_deref()) {
        Ok(p) => p,
        Err(e) => {
            eprintln!("{e}");
            std::process::exit(1);
        }
    };

    let task = Task::new(&project.project_id, &title, desc);
    let id = task.task_id.clone();
    if let Err(e) = store.add_task(task) {
        eprintln!("Failed to add task: {e}");
        std::process::exit(1);
    }
    if let Err(e) = store.save(store_path) {
        eprintln!("Failed to save store: {e}");
        std::process::exit(1);
    }
    println!("Added task {} to '{}'", id, project.title);
}

/// List tasks for a project in a formatted table.
pub fn cmd_list(store: &Store, project: Option<String>, status: Option<Status>) {
    let project = match pick_project(store, project.as_deref()) {
        Ok(p) => p,
        Err(e) => {
            eprintln!("{e}");
            std::process::exit(1);
        }
    };

    let now_ms = Utc::now().timestamp_millis();
    let tasks = store.tasks_for_project(&project.project_id);

    println!("Project: {}", project.title);
    println!("{:<28} {:<7} {:<14} {}", "ID", "Status", "Age", "Title");
    for t in tasks {
        if let Some(wanted) = status {
            if t.status != wanted {
                continue;
            }
        }
        println!(
            "{:<28} {:<7} {:<14} {}",
            t.task_id,
            format_status(t.status),
            format_age(&t, now_ms),
            t.title
        );
    }
}

/// Move a task to a target status column.
pub fn cmd_move(store: &mut Store, store_path: &Path, id: String, status: Status) {
    let Some(task) = store.get_task(&id).cloned() else {
        eprintln!("Task '{}' not found.", id);
        std::process::exit(1);
    };

    let mut moved = task;
    moved.status = status;
    if let Err(e) = store.update_task(moved) {
        eprintln!("Failed to move task: {e}");
        std::process::exit(1);
    }
    if let Err(e) = store.save(store_path) {
        eprintln!("Failed to save store: {e}");
        std::process::exit(1);
    }
    println!("Moved {} to {}", id, format_status(status));
}

/// Delete a task by id. Deleting an absent task is a no-op.
pub fn cmd_delete(store: &mut Store, store_path: &Path, id: String) {
    let was_present = store.delete_task(&id);
    if let Err(e) = store.save(store_path) {
        eprintln!("Failed to save store: {e}");
        std::process::exit(1);
    }
    if was_present {
        println!("Deleted.");
    } else {
        println!("Task '{}' was not present.", id);
    }
}

/// Print the three board columns as text.
pub fn cmd_board(store: &Store, project: Option<String>) {
    let project = match pick_project(store, project.as_deref()) {
        Ok(p) => p,
        Err(e) => {
            eprintln!("{e}");
            std::process::exit(1);
        }
    };

    let now_ms = Utc::now().timestamp_millis();
    let tasks = store.tasks_for_project(&project.project_id);
    let columns = board::partition(&tasks);

    println!("Board: {}", project.title);
    for status in Status::ALL {
        let cards = columns.get(status);
        println!();
        println!("== {} ({}) ==", format_status(status), cards.len());
        for t in cards {
            let desc = t.description.as_deref().unwrap_or("-");
            println!(
                "  {} {} [{}] {}",
                t.task_id,
                truncate(&t.title, 32),
                format_age(t, now_ms),
                truncate(desc, 40)
            );
        }
    }
}

/// Launch the interactive board TUI.
pub fn cmd_ui(store_path: &Path) {
    if let Err(e) = run_board_tui(store_path) {
        eprintln!("Error running TUI: {e}");
        std::process::exit(1);
    }
}

/// Generate shell completion scripts.
pub fn cmd_completions(shell: Shell) {
    use crate::cli::Cli;
    use clap::CommandFactory;

    let mut app = Cli::command();
    let app_name = app.get_name().to_string();
    generate(shell, &mut app, app_name, &mut std::io::stdout());
}
