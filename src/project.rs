//! Project record: the top-level container tasks belong to.

use serde::{Deserialize, Serialize};
use ulid::Ulid;

/// A named container for tasks.
///
/// The id is a ULID string assigned at creation and never changed; because
/// ULIDs sort lexicographically by timestamp, sorting by id reproduces
/// creation order. There is no rename operation; a title change is a
/// delete followed by a recreate.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Project {
    pub project_id: String,
    pub title: String,
}

impl Project {
    /// Create a project with a fresh ULID. Title validation is the
    /// caller's job (see `store::validate_title`).
    pub fn new(title: &str) -> Self {
        Project {
            project_id: Ulid::new().to_string(),
            title: title.to_string(),
        }
    }
}
