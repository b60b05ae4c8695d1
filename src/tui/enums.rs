//! Enumerations for TUI state management.

/// Application state for the terminal user interface.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum AppState {
    Board,
    AddTask,
    NewProject,
    ConfirmDeleteTask,
    ConfirmDeleteProject,
    Help,
}

/// Which panel owns arrow-key navigation.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Focus {
    Projects,
    Board,
}
