//! Render-ready grouping of a task list into the three board columns.

use crate::fields::Status;
use crate::task::Task;

/// Display titles for the three columns, left to right.
pub const COLUMN_TITLES: [&str; 3] = ["To-Do", "Doing", "Done"];

/// A task list partitioned by status.
///
/// The columns are disjoint and their union is exactly the input list;
/// `Status` is a closed enum, so every task lands in one bucket.
#[derive(Debug, Default, PartialEq)]
pub struct Columns {
    pub todo: Vec<Task>,
    pub doing: Vec<Task>,
    pub done: Vec<Task>,
}

impl Columns {
    /// The tasks in the column for a status.
    pub fn get(&self, status: Status) -> &[Task] {
        match status {
            Status::Todo => &self.todo,
            Status::Doing => &self.doing,
            Status::Done => &self.done,
        }
    }

    /// Total task count across all three columns.
    pub fn total(&self) -> usize {
        self.todo.len() + self.doing.len() + self.done.len()
    }
}

/// Partition tasks into the three columns, preserving list order within
/// each column.
pub fn partition(tasks: &[Task]) -> Columns {
    let mut columns = Columns::default();
    for task in tasks {
        match task.status {
            Status::Todo => columns.todo.push(task.clone()),
            Status::Doing => columns.doing.push(task.clone()),
            Status::Done => columns.done.push(task.clone()),
        }
    }
    columns
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use std::collections::BTreeSet;

    fn task(title: &str, status: Status) -> Task {
        let mut t = Task::new("p1", title, None);
        t.status = status;
        t
    }

    #[test]
    fn test_partition_buckets_by_status() {
        let tasks = vec![
            task("a", Status::Todo),
            task("b", Status::Doing),
            task("c", Status::Done),
            task("d", Status::Todo),
        ];
        let columns = partition(&tasks);
        let titles = |ts: &[Task]| ts.iter().map(|t| t.title.clone()).collect::<Vec<_>>();
        assert_eq!(titles(&columns.todo), vec!["a", "d"]);
        assert_eq!(titles(&columns.doing), vec!["b"]);
        assert_eq!(titles(&columns.done), vec!["c"]);
    }

    #[test]
    fn test_columns_are_disjoint_and_cover_the_list() {
        let tasks = vec![
            task("a", Status::Todo),
            task("b", Status::Doing),
            task("c", Status::Done),
            task("d", Status::Done),
        ];
        let columns = partition(&tasks);
        assert_eq!(columns.total(), tasks.len());

        let mut seen: BTreeSet<String> = BTreeSet::new();
        for status in Status::ALL {
            for t in columns.get(status) {
                // Unique ids across columns proves disjointness.
                assert!(seen.insert(t.task_id.clone()));
            }
        }
        let all: BTreeSet<String> = tasks.iter().map(|t| t.task_id.clone()).collect();
        assert_eq!(seen, all);
    }

    #[test]
    fn test_moving_a_task_lands_it_in_the_target_column() {
        let mut t1 = task("Buy milk", Status::Todo);
        t1.status = Status::Doing;
        let columns = partition(&[t1.clone()]);
        assert_eq!(columns.get(Status::Doing), &[t1]);
        assert!(columns.get(Status::Todo).is_empty());
    }

    #[test]
    fn test_empty_list_yields_empty_columns() {
        assert_eq!(partition(&[]), Columns::default());
    }
}
