//! Durable storage for the kanban board.
//!
//! The whole board — the `projects` and `tasks` collections plus a schema
//! version — lives in a single JSON document. Saving writes the document
//! atomically (temp file + rename), so a mutation that touches both
//! collections, such as a project delete with its task cascade, lands on
//! disk in one piece or not at all.

use std::fs::{self, File};
use std::io::{Read, Write};
use std::path::Path;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::fields::Status;
use crate::project::Project;
use crate::task::Task;

/// On-disk schema version written into every document.
pub const SCHEMA_VERSION: u32 = 1;

/// Maximum accepted length for project and task titles.
pub const MAX_TITLE_LEN: usize = 64;

/// Everything the store can fail at.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("failed to access store: {0}")]
    Io(#[from] std::io::Error),
    #[error("failed to parse store: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("store schema version {0} is newer than supported version {SCHEMA_VERSION}")]
    UnsupportedVersion(u32),
    #[error("project '{0}' already exists")]
    DuplicateProject(String),
    #[error("task '{0}' already exists")]
    DuplicateTask(String),
    #[error("task '{0}' not found")]
    TaskNotFound(String),
    #[error("title must not be empty")]
    EmptyTitle,
    #[error("title is longer than {MAX_TITLE_LEN} characters")]
    TitleTooLong,
}

/// The persisted board: two collections behind one schema version.
#[derive(Debug, Serialize, Deserialize)]
pub struct Store {
    pub version: u32,
    pub projects: Vec<Project>,
    pub tasks: Vec<Task>,
}

impl Default for Store {
    fn default() -> Self {
        Store {
            version: SCHEMA_VERSION,
            projects: Vec::new(),
            tasks: Vec::new(),
        }
    }
}

impl Store {
    /// Load the store from a JSON file. A missing file is a fresh empty
    /// board; a document written by a newer schema is refused.
    pub fn load(path: &Path) -> Result<Self, StoreError> {
        if !path.exists() {
            return Ok(Store::default());
        }
        let mut buf = String::new();
        File::open(path)?.read_to_string(&mut buf)?;
        let store: Store = serde_json::from_str(&buf)?;
        if store.version > SCHEMA_VERSION {
            return Err(StoreError::UnsupportedVersion(store.version));
        }
        Ok(store)
    }

    /// Save the store to a JSON file using atomic write (temp file + rename).
    pub fn save(&self, path: &Path) -> Result<(), StoreError> {
        let tmp = path.with_extension("json.tmp");
        let mut f = File::create(&tmp)?;
        let data = serde_json::to_string_pretty(self)?;
        f.write_all(data.as_bytes())?;
        f.flush()?;
        fs::rename(tmp, path)?;
        Ok(())
    }

    /// Insert a new project. Duplicate ids are rejected.
    pub fn add_project(&mut self, project: Project) -> Result<(), StoreError> {
        if self.get_project(&project.project_id).is_some() {
            return Err(StoreError::DuplicateProject(project.project_id));
        }
        self.projects.push(project);
        Ok(())
    }

    /// All projects in creation order (ULIDs sort lexicographically by
    /// creation time, which pins down the "first project" selection
    /// policy instead of leaving it to incidental store order).
    pub fn projects(&self) -> Vec<Project> {
        let mut out = self.projects.clone();
        out.sort_by(|a, b| a.project_id.cmp(&b.project_id));
        out
    }

    /// Get a project by id.
    pub fn get_project(&self, project_id: &str) -> Option<&Project> {
        self.projects.iter().find(|p| p.project_id == project_id)
    }

    /// Remove a project record. Returns whether it was present; removing
    /// an absent project is a no-op, not an error. Does not cascade — the
    /// caller pairs this with `delete_tasks_for_project` and commits both
    /// in one `save`.
    pub fn delete_project(&mut self, project_id: &str) -> bool {
        let before = self.projects.len();
        self.projects.retain(|p| p.project_id != project_id);
        self.projects.len() != before
    }

    /// Insert a new task. Duplicate ids are rejected.
    pub fn add_task(&mut self, task: Task) -> Result<(), StoreError> {
        if self.get_task(&task.task_id).is_some() {
            return Err(StoreError::DuplicateTask(task.task_id));
        }
        self.tasks.push(task);
        Ok(())
    }

    /// All tasks belonging to a project. The key compare is
    /// case-insensitive, matching the secondary-lookup semantics of the
    /// original store.
    pub fn tasks_for_project(&self, project_id: &str) -> Vec<Task> {
        self.tasks
            .iter()
            .filter(|t| t.project.eq_ignore_ascii_case(project_id))
            .cloned()
            .collect()
    }

    /// Get a task by id.
    pub fn get_task(&self, task_id: &str) -> Option<&Task> {
        self.tasks.iter().find(|t| t.task_id == task_id)
    }

    /// Replace the stored record matching the task's id (used for status
    /// moves). An unknown id is a validated error, never a blind write.
    pub fn update_task(&mut self, task: Task) -> Result<(), StoreError> {
        match self.tasks.iter_mut().find(|t| t.task_id == task.task_id) {
            Some(slot) => {
                *slot = task;
                Ok(())
            }
            None => Err(StoreError::TaskNotFound(task.task_id)),
        }
    }

    /// Remove a task record. Returns whether it was present; removing an
    /// absent task is a no-op.
    pub fn delete_task(&mut self, task_id: &str) -> bool {
        let before = self.tasks.len();
        self.tasks.retain(|t| t.task_id != task_id);
        self.tasks.len() != before
    }

    /// Remove every task referencing the project (case-insensitive key
    /// compare, same as the query side). Returns the number removed.
    pub fn delete_tasks_for_project(&mut self, project_id: &str) -> usize {
        let before = self.tasks.len();
        self.tasks
            .retain(|t| !t.project.eq_ignore_ascii_case(project_id));
        before - self.tasks.len()
    }
}

/// Validate a user-provided title: trimmed, non-empty, length-bounded.
pub fn validate_title(raw: &str) -> Result<String, StoreError> {
    let title = raw.trim();
    if title.is_empty() {
        return Err(StoreError::EmptyTitle);
    }
    if title.chars().count() > MAX_TITLE_LEN {
        return Err(StoreError::TitleTooLong);
    }
    Ok(title.to_string())
}

/// Format a status for table and column display.
pub fn format_status(s: Status) -> &'static str {
    match s {
        Status::Todo => "To-Do",
        Status::Doing => "Doing",
        Status::Done => "Done",
    }
}

/// Format a creation timestamp as a card age relative to `now_ms`.
pub fn format_age(task: &Task, now_ms: i64) -> String {
    match task.age_days(now_ms) {
        0 => "today".into(),
        1 => "1 day ago".into(),
        n => format!("{} days ago", n),
    }
}

/// Truncate a string to a maximum width, adding ellipsis if needed.
pub fn truncate(s: &str, width: usize) -> String {
    if s.chars().count() <= width {
        s.to_string()
    } else {
        let mut out = String::new();
        for (i, ch) in s.chars().enumerate() {
            if i + 1 >= width {
                out.push('…');
                break;
            }
            out.push(ch);
        }
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use std::collections::BTreeSet;
    use tempfile::TempDir;

    fn ids(tasks: &[Task]) -> BTreeSet<String> {
        tasks.iter().map(|t| t.task_id.clone()).collect()
    }

    #[test]
    fn test_add_then_list_projects_is_set_equal() {
        let mut store = Store::default();
        let a = Project::new("Home");
        let b = Project::new("Work");
        store.add_project(a.clone()).unwrap();
        store.add_project(b.clone()).unwrap();
        let listed: BTreeSet<String> = store
            .projects()
            .iter()
            .map(|p| p.project_id.clone())
            .collect();
        let expected: BTreeSet<String> =
            [a.project_id.clone(), b.project_id.clone()].into_iter().collect();
        assert_eq!(listed, expected);

        store.delete_project(&a.project_id);
        let listed: BTreeSet<String> = store
            .projects()
            .iter()
            .map(|p| p.project_id.clone())
            .collect();
        assert_eq!(listed, [b.project_id].into_iter().collect());
    }

    #[test]
    fn test_projects_listed_in_creation_order() {
        let mut store = Store::default();
        // Hand-built ids so ordering is deterministic regardless of clock.
        let first = Project {
            project_id: "01ARZ3NDEKTSV4RRFFQ69G5FAA".into(),
            title: "First".into(),
        };
        let second = Project {
            project_id: "01BRZ3NDEKTSV4RRFFQ69G5FAA".into(),
            title: "Second".into(),
        };
        store.add_project(second.clone()).unwrap();
        store.add_project(first.clone()).unwrap();
        let titles: Vec<String> = store.projects().iter().map(|p| p.title.clone()).collect();
        assert_eq!(titles, vec!["First".to_string(), "Second".to_string()]);
    }

    #[test]
    fn test_duplicate_project_rejected() {
        let mut store = Store::default();
        let p = Project::new("Home");
        store.add_project(p.clone()).unwrap();
        let err = store.add_project(p).unwrap_err();
        assert!(matches!(err, StoreError::DuplicateProject(_)));
    }

    #[test]
    fn test_duplicate_task_rejected() {
        let mut store = Store::default();
        let t = Task::new("p1", "Buy milk", None);
        store.add_task(t.clone()).unwrap();
        let err = store.add_task(t).unwrap_err();
        assert!(matches!(err, StoreError::DuplicateTask(_)));
    }

    #[test]
    fn test_tasks_for_project_matches_key_case_insensitively() {
        let mut store = Store::default();
        let mut t = Task::new("01arz3ndektsv4rrffq69g5fav", "lowercased key", None);
        t.project = "01arz3ndektsv4rrffq69g5fav".into();
        store.add_task(t.clone()).unwrap();
        let found = store.tasks_for_project("01ARZ3NDEKTSV4RRFFQ69G5FAV");
        assert_eq!(found, vec![t]);
    }

    #[test]
    fn test_update_task_replaces_record() {
        let mut store = Store::default();
        let mut t = Task::new("p1", "Buy milk", None);
        store.add_task(t.clone()).unwrap();
        t.status = Status::Doing;
        store.update_task(t.clone()).unwrap();
        assert_eq!(store.get_task(&t.task_id).unwrap().status, Status::Doing);
        assert_eq!(store.tasks.len(), 1);
    }

    #[test]
    fn test_update_unknown_task_is_an_error() {
        let mut store = Store::default();
        let t = Task::new("p1", "ghost", None);
        let err = store.update_task(t).unwrap_err();
        assert!(matches!(err, StoreError::TaskNotFound(_)));
    }

    #[test]
    fn test_delete_is_idempotent() {
        let mut store = Store::default();
        let p = Project::new("Home");
        let t = Task::new(&p.project_id, "Buy milk", None);
        store.add_project(p.clone()).unwrap();
        store.add_task(t.clone()).unwrap();

        assert!(store.delete_task(&t.task_id));
        assert!(!store.delete_task(&t.task_id));
        assert!(store.delete_project(&p.project_id));
        assert!(!store.delete_project(&p.project_id));
    }

    #[test]
    fn test_cascade_delete_removes_only_the_projects_tasks() {
        let mut store = Store::default();
        let home = Project::new("Home");
        let work = Project::new("Work");
        let t1 = Task::new(&home.project_id, "Buy milk", None);
        let t2 = Task::new(&home.project_id, "Mow lawn", None);
        let t3 = Task::new(&work.project_id, "Ship release", None);
        store.add_project(home.clone()).unwrap();
        store.add_project(work.clone()).unwrap();
        for t in [&t1, &t2, &t3] {
            store.add_task(t.clone()).unwrap();
        }

        store.delete_project(&home.project_id);
        let removed = store.delete_tasks_for_project(&home.project_id);
        assert_eq!(removed, 2);
        assert_eq!(ids(&store.tasks), ids(&[t3.clone()]));
        assert_eq!(store.projects().len(), 1);

        // Cascading again is a no-op.
        assert_eq!(store.delete_tasks_for_project(&home.project_id), 0);
    }

    #[test]
    fn test_save_and_load_round_trip() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("board.json");

        let mut store = Store::default();
        let p = Project::new("Home");
        let t = Task::new(&p.project_id, "Buy milk", Some("2 litres".into()));
        store.add_project(p.clone()).unwrap();
        store.add_task(t.clone()).unwrap();
        store.save(&path).unwrap();

        let loaded = Store::load(&path).unwrap();
        assert_eq!(loaded.version, SCHEMA_VERSION);
        assert_eq!(loaded.projects, vec![p]);
        assert_eq!(loaded.tasks, vec![t]);
    }

    #[test]
    fn test_load_missing_file_is_a_fresh_board() {
        let dir = TempDir::new().unwrap();
        let store = Store::load(&dir.path().join("absent.json")).unwrap();
        assert!(store.projects.is_empty());
        assert!(store.tasks.is_empty());
    }

    #[test]
    fn test_load_refuses_newer_schema() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("board.json");
        let mut store = Store::default();
        store.version = SCHEMA_VERSION + 1;
        store.save(&path).unwrap();
        let err = Store::load(&path).unwrap_err();
        assert!(matches!(err, StoreError::UnsupportedVersion(_)));
    }

    #[test]
    fn test_load_surfaces_corrupt_json() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("board.json");
        std::fs::write(&path, "{not json").unwrap();
        let err = Store::load(&path).unwrap_err();
        assert!(matches!(err, StoreError::Parse(_)));
    }

    #[test]
    fn test_validate_title() {
        assert_eq!(validate_title("  Buy milk ").unwrap(), "Buy milk");
        assert!(matches!(validate_title("   "), Err(StoreError::EmptyTitle)));
        let long = "x".repeat(MAX_TITLE_LEN + 1);
        assert!(matches!(validate_title(&long), Err(StoreError::TitleTooLong)));
        let exact = "x".repeat(MAX_TITLE_LEN);
        assert!(validate_title(&exact).is_ok());
    }

    #[test]
    fn test_truncate() {
        assert_eq!(truncate("short", 10), "short");
        assert_eq!(truncate("a rather long title", 8), "a rathe…");
    }
}
