//! Board column derivation
//!
//! A pure partition of the project's task list into the three status columns.
//! Tasks keep the order the server sent them in.

use taskboard_shared::models::task::{TaskStatus, TaskWithAssignee};
use uuid::Uuid;

/// Tasks grouped by status, indexed by [`TaskStatus::index`]
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BoardColumns {
    columns: [Vec<TaskWithAssignee>; 3],
}

/// One rendered column
#[derive(Debug, Clone, Copy)]
pub struct Column<'a> {
    pub status: TaskStatus,

    /// Drop-target identifier (`todo`, `in-progress`, `done`)
    pub id: &'static str,
    pub label: &'static str,
    pub tasks: &'a [TaskWithAssignee],
}

impl BoardColumns {
    /// Partitions `tasks` by status
    ///
    /// ```
    /// use taskboard_client::board::view_model::BoardColumns;
    /// use taskboard_client::mock::project_fixture;
    /// use taskboard_shared::models::task::TaskStatus;
    ///
    /// let project = project_fixture(&[("t1", TaskStatus::Todo), ("t2", TaskStatus::Done)]);
    /// let board = BoardColumns::derive(&project.tasks);
    ///
    /// assert_eq!(board.column(TaskStatus::Todo)[0].title, "t1");
    /// assert!(board.column(TaskStatus::InProgress).is_empty());
    /// assert_eq!(board.column(TaskStatus::Done)[0].title, "t2");
    /// ```
    pub fn derive(tasks: &[TaskWithAssignee]) -> Self {
        let mut columns: [Vec<TaskWithAssignee>; 3] = Default::default();
        for task in tasks {
            columns[task.status.index()].push(task.clone());
        }
        Self { columns }
    }

    pub fn column(&self, status: TaskStatus) -> &[TaskWithAssignee] {
        &self.columns[status.index()]
    }

    /// Columns in display order
    pub fn columns(&self) -> impl Iterator<Item = Column<'_>> {
        TaskStatus::ALL.into_iter().map(move |status| Column {
            status,
            id: status.column_id(),
            label: status.label(),
            tasks: self.column(status),
        })
    }

    /// Column currently holding `task_id`
    pub fn locate(&self, task_id: Uuid) -> Option<TaskStatus> {
        TaskStatus::ALL
            .into_iter()
            .find(|status| self.column(*status).iter().any(|t| t.id == task_id))
    }

    /// Task counts per column, in display order
    pub fn counts(&self) -> [usize; 3] {
        TaskStatus::ALL.map(|status| self.column(status).len())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mock::project_fixture;

    #[test]
    fn test_each_task_in_exactly_one_column() {
        let project = project_fixture(&[("t1", TaskStatus::Todo), ("t2", TaskStatus::Done)]);
        let (t1, t2) = (project.tasks[0].id, project.tasks[1].id);
        let board = BoardColumns::derive(&project.tasks);

        let todo: Vec<Uuid> = board.column(TaskStatus::Todo).iter().map(|t| t.id).collect();
        let done: Vec<Uuid> = board.column(TaskStatus::Done).iter().map(|t| t.id).collect();

        assert_eq!(todo, vec![t1]);
        assert_eq!(done, vec![t2]);
        assert!(board.column(TaskStatus::InProgress).is_empty());
        assert_eq!(board.locate(t1), Some(TaskStatus::Todo));
        assert_eq!(board.locate(t2), Some(TaskStatus::Done));
    }

    #[test]
    fn test_server_order_preserved() {
        let project = project_fixture(&[
            ("c", TaskStatus::InProgress),
            ("a", TaskStatus::InProgress),
            ("b", TaskStatus::InProgress),
        ]);
        let board = BoardColumns::derive(&project.tasks);

        let titles: Vec<&str> = board
            .column(TaskStatus::InProgress)
            .iter()
            .map(|t| t.title.as_str())
            .collect();
        assert_eq!(titles, ["c", "a", "b"]);
        assert_eq!(board.counts(), [0, 3, 0]);
    }

    #[test]
    fn test_counts_follow_column_order() {
        let project = project_fixture(&[
            ("a", TaskStatus::Done),
            ("b", TaskStatus::Todo),
            ("c", TaskStatus::Done),
        ]);
        let board = BoardColumns::derive(&project.tasks);

        let labelled: Vec<(&str, usize)> = board
            .columns()
            .zip(board.counts())
            .map(|(column, count)| (column.id, count))
            .collect();
        assert_eq!(labelled, [("todo", 1), ("in-progress", 0), ("done", 2)]);
    }

    #[test]
    fn test_columns_carry_identifiers() {
        let board = BoardColumns::derive(&[]);
        let ids: Vec<(&str, &str)> = board.columns().map(|c| (c.id, c.label)).collect();

        assert_eq!(
            ids,
            [("todo", "Todo"), ("in-progress", "In progress"), ("done", "Done")]
        );
        assert_eq!(board.locate(Uuid::new_v4()), None);
    }
}
