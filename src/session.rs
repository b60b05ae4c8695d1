//! Session-scoped selection state.
//!
//! Tracks which project is current for the life of a running session. Never
//! persisted: each process starts with nothing selected, then adopts the
//! first available project. The `Session` value is passed by reference to
//! whatever needs the selection, so there is a single observable source of
//! truth and no hidden global.

use crate::project::Project;

/// The currently selected project, or none.
#[derive(Debug, Default)]
pub struct Session {
    current: Option<String>,
}

impl Session {
    /// A fresh session with nothing selected.
    pub fn new() -> Self {
        Session { current: None }
    }

    /// Id of the currently selected project, if any.
    pub fn current(&self) -> Option<&str> {
        self.current.as_deref()
    }

    /// Select a project by id, or clear the selection.
    pub fn set_current(&mut self, project_id: Option<String>) {
        self.current = project_id;
    }

    /// Default-selection policy: the first project in creation order, or
    /// nothing when the list is empty.
    pub fn select_first(&mut self, projects: &[Project]) {
        self.current = projects.first().map(|p| p.project_id.clone());
    }
}
