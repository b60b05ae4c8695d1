//! Field types shared between the store, the CLI, and the TUI.

use clap::ValueEnum;
use serde::{Deserialize, Serialize};

/// The three fixed stages a task occupies on the board.
///
/// Stored as `TODO` / `DOING` / `DONE` in the JSON document. Transitions
/// are unrestricted: any status may move to any other, including itself.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, ValueEnum, PartialEq, Eq, Hash)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Status {
    Todo,
    Doing,
    Done,
}

impl Status {
    /// All statuses in board-column order, left to right.
    pub const ALL: [Status; 3] = [Status::Todo, Status::Doing, Status::Done];

    /// Column index on the board (0 = To-Do, 2 = Done).
    pub fn column_index(self) -> usize {
        match self {
            Status::Todo => 0,
            Status::Doing => 1,
            Status::Done => 2,
        }
    }

    /// The status one column to the left, if any.
    pub fn left(self) -> Option<Status> {
        match self {
            Status::Todo => None,
            Status::Doing => Some(Status::Todo),
            Status::Done => Some(Status::Doing),
        }
    }

    /// The status one column to the right, if any.
    pub fn right(self) -> Option<Status> {
        match self {
            Status::Todo => Some(Status::Doing),
            Status::Doing => Some(Status::Done),
            Status::Done => None,
        }
    }
}
