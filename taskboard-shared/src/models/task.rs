/// Task model and database operations
///
/// A task belongs to exactly one project and always carries one of three statuses.
/// Status transitions are unconstrained: any status is reachable from any other.
///
/// # Schema
///
/// ```sql
/// CREATE TYPE task_status AS ENUM ('TODO', 'IN_PROGRESS', 'DONE');
///
/// CREATE TABLE tasks (
///     id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
///     project_id UUID NOT NULL REFERENCES projects(id) ON DELETE CASCADE,
///     title TEXT NOT NULL,
///     description TEXT NOT NULL DEFAULT '',
///     status task_status NOT NULL DEFAULT 'TODO',
///     assignee_id UUID REFERENCES users(id) ON DELETE SET NULL,
///     created_at TIMESTAMPTZ NOT NULL DEFAULT NOW(),
///     updated_at TIMESTAMPTZ NOT NULL DEFAULT NOW()
/// );
/// ```

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::PgPool;
use uuid::Uuid;

use super::project::ProjectSummary;
use super::user::UserSummary;

/// Task status
///
/// Serialized and stored as `TODO`, `IN_PROGRESS` and `DONE`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "task_status", rename_all = "SCREAMING_SNAKE_CASE")]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TaskStatus {
    Todo,
    InProgress,
    Done,
}

/// Board columns: status, column identifier, column title.
///
/// The only place a status is tied to a column. Lookups in both directions go
/// through this table.
const STATUS_COLUMNS: [(TaskStatus, &str, &str); 3] = [
    (TaskStatus::Todo, "todo", "Todo"),
    (TaskStatus::InProgress, "in-progress", "In progress"),
    (TaskStatus::Done, "done", "Done"),
];

impl TaskStatus {
    /// All statuses in column display order
    pub const ALL: [TaskStatus; 3] = [TaskStatus::Todo, TaskStatus::InProgress, TaskStatus::Done];

    fn row(self) -> (TaskStatus, &'static str, &'static str) {
        // STATUS_COLUMNS covers every variant
        STATUS_COLUMNS[self.index()]
    }

    /// Position of this status in [`TaskStatus::ALL`]
    pub fn index(self) -> usize {
        match self {
            TaskStatus::Todo => 0,
            TaskStatus::InProgress => 1,
            TaskStatus::Done => 2,
        }
    }

    /// Board column identifier (`todo`, `in-progress`, `done`)
    pub fn column_id(self) -> &'static str {
        self.row().1
    }

    /// Inverse of [`TaskStatus::column_id`]; unknown identifiers map to `None`
    ///
    /// ```
    /// use taskboard_shared::models::task::TaskStatus;
    ///
    /// assert_eq!(TaskStatus::from_column_id("in-progress"), Some(TaskStatus::InProgress));
    /// assert_eq!(TaskStatus::from_column_id("IN_PROGRESS"), None);
    /// ```
    pub fn from_column_id(column_id: &str) -> Option<Self> {
        STATUS_COLUMNS
            .iter()
            .find(|(_, id, _)| *id == column_id)
            .map(|(status, _, _)| *status)
    }

    /// Human column title
    pub fn label(self) -> &'static str {
        self.row().2
    }

    /// Wire/database value (`TODO`, `IN_PROGRESS`, `DONE`)
    pub fn as_str(self) -> &'static str {
        match self {
            TaskStatus::Todo => "TODO",
            TaskStatus::InProgress => "IN_PROGRESS",
            TaskStatus::Done => "DONE",
        }
    }
}

impl fmt::Display for TaskStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for TaskStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "TODO" => Ok(TaskStatus::Todo),
            "IN_PROGRESS" => Ok(TaskStatus::InProgress),
            "DONE" => Ok(TaskStatus::Done),
            other => Err(format!("Invalid task status: {}", other)),
        }
    }
}

/// Task row
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct Task {
    pub id: Uuid,
    pub project_id: Uuid,
    pub title: String,
    pub description: String,
    pub status: TaskStatus,
    pub assignee_id: Option<Uuid>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Task as rendered by the board and the detail editor
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaskWithAssignee {
    pub id: Uuid,
    pub title: String,
    pub description: String,
    pub status: TaskStatus,
    pub assignee: Option<UserSummary>,
}

/// Flat join row behind [`TaskWithAssignee`]
#[derive(Debug, sqlx::FromRow)]
pub(crate) struct TaskAssigneeRow {
    id: Uuid,
    title: String,
    description: String,
    status: TaskStatus,
    assignee_id: Option<Uuid>,
    assignee_email: Option<String>,
}

impl From<TaskAssigneeRow> for TaskWithAssignee {
    fn from(row: TaskAssigneeRow) -> Self {
        let assignee = match (row.assignee_id, row.assignee_email) {
            (Some(id), Some(email)) => Some(UserSummary { id, email }),
            _ => None,
        };

        Self {
            id: row.id,
            title: row.title,
            description: row.description,
            status: row.status,
            assignee,
        }
    }
}

/// Input for creating a task
#[derive(Debug, Clone)]
pub struct CreateTask {
    pub project_id: Uuid,
    pub title: String,
    pub description: String,
    pub status: TaskStatus,
    pub assignee_id: Option<Uuid>,
}

/// Input for updating a task
///
/// `None` title/description/status keep the stored value. `assignee_id` is always
/// written, so `None` unassigns the task.
#[derive(Debug, Clone, Default)]
pub struct UpdateTask {
    pub title: Option<String>,
    pub description: Option<String>,
    pub status: Option<TaskStatus>,
    pub assignee_id: Option<Uuid>,
}

/// Per-project status counts used by the analytics view
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProjectTaskCounts {
    pub project: ProjectSummary,
    pub todo: i64,
    pub in_progress: i64,
    pub done: i64,
}

#[derive(Debug, sqlx::FromRow)]
struct TaskCountsRow {
    id: Uuid,
    name: String,
    image: String,
    created_at: DateTime<Utc>,
    todo: i64,
    in_progress: i64,
    done: i64,
}

const TASK_COLUMNS: &str =
    "id, project_id, title, description, status, assignee_id, created_at, updated_at";

impl Task {
    /// Creates a task
    ///
    /// # Errors
    ///
    /// Returns a foreign-key violation if the project or assignee does not exist.
    pub async fn create(pool: &PgPool, data: CreateTask) -> Result<Self, sqlx::Error> {
        let sql = format!(
            "INSERT INTO tasks (project_id, title, description, status, assignee_id) \
             VALUES ($1, $2, $3, $4, $5) RETURNING {}",
            TASK_COLUMNS
        );

        let task = sqlx::query_as::<_, Task>(&sql)
            .bind(data.project_id)
            .bind(data.title)
            .bind(data.description)
            .bind(data.status)
            .bind(data.assignee_id)
            .fetch_one(pool)
            .await?;

        Ok(task)
    }

    /// Finds a task, scoped to its project
    ///
    /// A task id from another project returns `None`.
    pub async fn find_in_project(
        pool: &PgPool,
        project_id: Uuid,
        task_id: Uuid,
    ) -> Result<Option<Self>, sqlx::Error> {
        let sql = format!(
            "SELECT {} FROM tasks WHERE id = $1 AND project_id = $2",
            TASK_COLUMNS
        );

        let task = sqlx::query_as::<_, Task>(&sql)
            .bind(task_id)
            .bind(project_id)
            .fetch_optional(pool)
            .await?;

        Ok(task)
    }

    /// Loads a task with its assignee, scoped to its project
    pub async fn find_detail(
        pool: &PgPool,
        project_id: Uuid,
        task_id: Uuid,
    ) -> Result<Option<TaskWithAssignee>, sqlx::Error> {
        let row = sqlx::query_as::<_, TaskAssigneeRow>(
            r#"
            SELECT t.id, t.title, t.description, t.status,
                   u.id AS assignee_id, u.email AS assignee_email
            FROM tasks t
            LEFT JOIN users u ON u.id = t.assignee_id
            WHERE t.id = $1 AND t.project_id = $2
            "#,
        )
        .bind(task_id)
        .bind(project_id)
        .fetch_optional(pool)
        .await?;

        Ok(row.map(TaskWithAssignee::from))
    }

    /// Lists a project's tasks with assignees, in insertion order
    pub async fn list_for_project(
        pool: &PgPool,
        project_id: Uuid,
    ) -> Result<Vec<TaskWithAssignee>, sqlx::Error> {
        let rows = sqlx::query_as::<_, TaskAssigneeRow>(
            r#"
            SELECT t.id, t.title, t.description, t.status,
                   u.id AS assignee_id, u.email AS assignee_email
            FROM tasks t
            LEFT JOIN users u ON u.id = t.assignee_id
            WHERE t.project_id = $1
            ORDER BY t.created_at ASC, t.id ASC
            "#,
        )
        .bind(project_id)
        .fetch_all(pool)
        .await?;

        Ok(rows.into_iter().map(TaskWithAssignee::from).collect())
    }

    /// Updates a task's mutable fields
    ///
    /// Returns `None` if the task does not exist in the project.
    pub async fn update(
        pool: &PgPool,
        project_id: Uuid,
        task_id: Uuid,
        data: UpdateTask,
    ) -> Result<Option<Self>, sqlx::Error> {
        let sql = format!(
            "UPDATE tasks SET \
                 title = COALESCE($3, title), \
                 description = COALESCE($4, description), \
                 status = COALESCE($5, status), \
                 assignee_id = $6, \
                 updated_at = NOW() \
             WHERE id = $1 AND project_id = $2 \
             RETURNING {}",
            TASK_COLUMNS
        );

        let task = sqlx::query_as::<_, Task>(&sql)
            .bind(task_id)
            .bind(project_id)
            .bind(data.title)
            .bind(data.description)
            .bind(data.status)
            .bind(data.assignee_id)
            .fetch_optional(pool)
            .await?;

        Ok(task)
    }

    /// Sets a task's status
    ///
    /// Any status may follow any other. Returns `None` if the task does not exist in
    /// the project.
    pub async fn update_status(
        pool: &PgPool,
        project_id: Uuid,
        task_id: Uuid,
        status: TaskStatus,
    ) -> Result<Option<Self>, sqlx::Error> {
        let sql = format!(
            "UPDATE tasks SET status = $3, updated_at = NOW() \
             WHERE id = $1 AND project_id = $2 RETURNING {}",
            TASK_COLUMNS
        );

        let task = sqlx::query_as::<_, Task>(&sql)
            .bind(task_id)
            .bind(project_id)
            .bind(status)
            .fetch_optional(pool)
            .await?;

        Ok(task)
    }

    /// Deletes a task; returns whether a row was removed
    pub async fn delete(pool: &PgPool, project_id: Uuid, task_id: Uuid) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM tasks WHERE id = $1 AND project_id = $2")
            .bind(task_id)
            .bind(project_id)
            .execute(pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }

    /// Counts tasks per status for every project the user owns, newest project first
    ///
    /// Projects without tasks are included with zero counts.
    pub async fn status_counts_for_owner(
        pool: &PgPool,
        owner_id: Uuid,
    ) -> Result<Vec<ProjectTaskCounts>, sqlx::Error> {
        let rows = sqlx::query_as::<_, TaskCountsRow>(
            r#"
            SELECT p.id, p.name, p.image, p.created_at,
                   COUNT(t.id) FILTER (WHERE t.status = 'TODO') AS todo,
                   COUNT(t.id) FILTER (WHERE t.status = 'IN_PROGRESS') AS in_progress,
                   COUNT(t.id) FILTER (WHERE t.status = 'DONE') AS done
            FROM projects p
            LEFT JOIN tasks t ON t.project_id = p.id
            WHERE p.owner_id = $1
            GROUP BY p.id
            ORDER BY p.created_at DESC
            "#,
        )
        .bind(owner_id)
        .fetch_all(pool)
        .await?;

        Ok(rows
            .into_iter()
            .map(|row| ProjectTaskCounts {
                project: ProjectSummary {
                    id: row.id,
                    name: row.name,
                    image: row.image,
                    created_at: row.created_at,
                },
                todo: row.todo,
                in_progress: row.in_progress,
                done: row.done,
            })
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_column_mapping_is_bijective() {
        for status in TaskStatus::ALL {
            assert_eq!(TaskStatus::from_column_id(status.column_id()), Some(status));
        }
        assert_eq!(TaskStatus::InProgress.column_id(), "in-progress");
        assert_eq!(TaskStatus::from_column_id("doing"), None);
        assert_eq!(TaskStatus::from_column_id(""), None);
    }

    #[test]
    fn test_all_is_in_display_order() {
        for (i, status) in TaskStatus::ALL.iter().enumerate() {
            assert_eq!(status.index(), i);
        }
        assert_eq!(TaskStatus::Done.label(), "Done");
    }

    #[test]
    fn test_status_serde() {
        assert_eq!(
            serde_json::to_string(&TaskStatus::InProgress).unwrap(),
            "\"IN_PROGRESS\""
        );
        let parsed: TaskStatus = serde_json::from_str("\"DONE\"").unwrap();
        assert_eq!(parsed, TaskStatus::Done);
        assert!(serde_json::from_str::<TaskStatus>("\"done\"").is_err());
    }

    #[test]
    fn test_status_from_str() {
        for status in TaskStatus::ALL {
            assert_eq!(status.to_string().parse::<TaskStatus>(), Ok(status));
        }
        assert!("BLOCKED".parse::<TaskStatus>().is_err());
    }

    #[test]
    fn test_assignee_row_conversion() {
        let id = Uuid::new_v4();
        let row = TaskAssigneeRow {
            id,
            title: "Write docs".to_string(),
            description: String::new(),
            status: TaskStatus::Todo,
            assignee_id: None,
            assignee_email: None,
        };

        let task = TaskWithAssignee::from(row);
        assert_eq!(task.id, id);
        assert!(task.assignee.is_none());
    }
}
