//! Task record: a unit of work on the board.

use chrono::Utc;
use serde::{Deserialize, Serialize};
use ulid::Ulid;

use crate::fields::Status;

/// Milliseconds in a day, for card age display.
const DAY_MS: i64 = 86_400_000;

/// A single card on the board.
///
/// `task_id`, `project` and `date` are immutable after creation; `status`
/// is the only field a command may change. `date` is the creation time in
/// epoch milliseconds and is used solely to render the card's age.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Task {
    pub task_id: String,
    pub project: String,
    pub title: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub date: i64,
    pub status: Status,
}

impl Task {
    /// Create a task on the given project with a fresh ULID, status
    /// `TODO`, and the current time as creation timestamp.
    pub fn new(project_id: &str, title: &str, description: Option<String>) -> Self {
        Task {
            task_id: Ulid::new().to_string(),
            project: project_id.to_string(),
            title: title.to_string(),
            description: description.filter(|d| !d.is_empty()),
            date: Utc::now().timestamp_millis(),
            status: Status::Todo,
        }
    }

    /// Age in whole days (rounded) relative to `now_ms`.
    pub fn age_days(&self, now_ms: i64) -> i64 {
        let delta = now_ms.saturating_sub(self.date);
        (delta + DAY_MS / 2) / DAY_MS
    }
}
