/// Project model and database operations
///
/// A project is owned by one user and holds tasks and memberships. Deleting a
/// project cascades to both through foreign keys.
///
/// # Schema
///
/// ```sql
/// CREATE TABLE projects (
///     id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
///     name TEXT NOT NULL,
///     image TEXT NOT NULL,
///     owner_id UUID NOT NULL REFERENCES users(id) ON DELETE CASCADE,
///     created_at TIMESTAMPTZ NOT NULL DEFAULT NOW()
/// );
/// ```

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::PgPool;
use uuid::Uuid;

use super::membership::{Membership, MembershipWithUser};
use super::task::{Task, TaskWithAssignee};

/// Project row
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct Project {
    pub id: Uuid,
    pub name: String,
    pub image: String,
    pub owner_id: Uuid,
    pub created_at: DateTime<Utc>,
}

/// Project as listed in navigation and analytics
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, sqlx::FromRow)]
pub struct ProjectSummary {
    pub id: Uuid,
    pub name: String,
    pub image: String,
    pub created_at: DateTime<Utc>,
}

/// Authoritative project snapshot consumed by the board
///
/// Tasks are in insertion order. The board derives its columns from this value
/// and nothing else.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProjectDetail {
    pub id: Uuid,
    pub name: String,
    pub image: String,
    pub created_at: DateTime<Utc>,
    pub owner_id: Uuid,
    pub tasks: Vec<TaskWithAssignee>,
    pub memberships: Vec<MembershipWithUser>,
}

/// Input for creating a project
#[derive(Debug, Clone)]
pub struct CreateProject {
    pub name: String,
    pub image: String,
    pub owner_id: Uuid,
}

impl Project {
    /// Creates a project owned by `data.owner_id`
    pub async fn create(pool: &PgPool, data: CreateProject) -> Result<Self, sqlx::Error> {
        let project = sqlx::query_as::<_, Project>(
            r#"
            INSERT INTO projects (name, image, owner_id)
            VALUES ($1, $2, $3)
            RETURNING id, name, image, owner_id, created_at
            "#,
        )
        .bind(data.name)
        .bind(data.image)
        .bind(data.owner_id)
        .fetch_one(pool)
        .await?;

        Ok(project)
    }

    /// Finds a project by ID
    pub async fn find_by_id(pool: &PgPool, id: Uuid) -> Result<Option<Self>, sqlx::Error> {
        let project = sqlx::query_as::<_, Project>(
            r#"
            SELECT id, name, image, owner_id, created_at
            FROM projects
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(pool)
        .await?;

        Ok(project)
    }

    /// Lists projects the user owns or is a member of, newest first
    pub async fn list_for_user(
        pool: &PgPool,
        user_id: Uuid,
    ) -> Result<Vec<ProjectSummary>, sqlx::Error> {
        let projects = sqlx::query_as::<_, ProjectSummary>(
            r#"
            SELECT p.id, p.name, p.image, p.created_at
            FROM projects p
            WHERE p.owner_id = $1
               OR EXISTS (
                   SELECT 1 FROM memberships m
                   WHERE m.project_id = p.id AND m.user_id = $1
               )
            ORDER BY p.created_at DESC
            "#,
        )
        .bind(user_id)
        .fetch_all(pool)
        .await?;

        Ok(projects)
    }

    /// Deletes a project if `owner_id` owns it
    ///
    /// Returns `false` both when the project does not exist and when the caller is
    /// not its owner; the two cases are indistinguishable to the caller.
    pub async fn delete(pool: &PgPool, id: Uuid, owner_id: Uuid) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM projects WHERE id = $1 AND owner_id = $2")
            .bind(id)
            .bind(owner_id)
            .execute(pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }

    /// Loads the full snapshot: project, tasks with assignees and memberships
    ///
    /// # Errors
    ///
    /// Returns an error if any of the three queries fails.
    pub async fn detail(pool: &PgPool, id: Uuid) -> Result<Option<ProjectDetail>, sqlx::Error> {
        let Some(project) = Self::find_by_id(pool, id).await? else {
            return Ok(None);
        };

        let tasks = Task::list_for_project(pool, id).await?;
        let memberships = Membership::list_with_users(pool, id).await?;

        Ok(Some(ProjectDetail {
            id: project.id,
            name: project.name,
            image: project.image,
            created_at: project.created_at,
            owner_id: project.owner_id,
            tasks,
            memberships,
        }))
    }

    pub fn summary(&self) -> ProjectSummary {
        ProjectSummary {
            id: self.id,
            name: self.name.clone(),
            image: self.image.clone(),
            created_at: self.created_at,
        }
    }
}
