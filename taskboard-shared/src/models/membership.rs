/// Membership model and database operations
///
/// A membership grants a non-owner user access to one project's tasks. The owner is
/// never stored as a member.
///
/// # Schema
///
/// ```sql
/// CREATE TABLE memberships (
///     project_id UUID NOT NULL REFERENCES projects(id) ON DELETE CASCADE,
///     user_id UUID NOT NULL REFERENCES users(id) ON DELETE CASCADE,
///     created_at TIMESTAMPTZ NOT NULL DEFAULT NOW(),
///     PRIMARY KEY (project_id, user_id)
/// );
/// ```

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::PgPool;
use uuid::Uuid;

use super::user::UserSummary;

/// Membership row
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct Membership {
    pub project_id: Uuid,
    pub user_id: Uuid,
    pub created_at: DateTime<Utc>,
}

/// Membership joined with its user, as shown in assignee pickers
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MembershipWithUser {
    pub user_id: Uuid,
    pub user: UserSummary,
}

#[derive(Debug, sqlx::FromRow)]
struct MembershipUserRow {
    user_id: Uuid,
    email: String,
}

impl Membership {
    /// Adds users to a project in one statement
    ///
    /// Users who are already members are skipped. Returns the number of new rows.
    ///
    /// # Errors
    ///
    /// Returns a foreign-key violation if any user id is unknown.
    pub async fn add_many(
        pool: &PgPool,
        project_id: Uuid,
        user_ids: &[Uuid],
    ) -> Result<u64, sqlx::Error> {
        if user_ids.is_empty() {
            return Ok(0);
        }

        let result = sqlx::query(
            r#"
            INSERT INTO memberships (project_id, user_id)
            SELECT $1, UNNEST($2::uuid[])
            ON CONFLICT (project_id, user_id) DO NOTHING
            "#,
        )
        .bind(project_id)
        .bind(user_ids)
        .execute(pool)
        .await?;

        Ok(result.rows_affected())
    }

    /// Whether the user is a member of the project
    pub async fn exists(pool: &PgPool, project_id: Uuid, user_id: Uuid) -> Result<bool, sqlx::Error> {
        let exists: bool = sqlx::query_scalar(
            "SELECT EXISTS (SELECT 1 FROM memberships WHERE project_id = $1 AND user_id = $2)",
        )
        .bind(project_id)
        .bind(user_id)
        .fetch_one(pool)
        .await?;

        Ok(exists)
    }

    /// Lists a project's members with their users, oldest membership first
    pub async fn list_with_users(
        pool: &PgPool,
        project_id: Uuid,
    ) -> Result<Vec<MembershipWithUser>, sqlx::Error> {
        let rows = sqlx::query_as::<_, MembershipUserRow>(
            r#"
            SELECT m.user_id, u.email
            FROM memberships m
            JOIN users u ON u.id = m.user_id
            WHERE m.project_id = $1
            ORDER BY m.created_at ASC, u.email ASC
            "#,
        )
        .bind(project_id)
        .fetch_all(pool)
        .await?;

        Ok(rows
            .into_iter()
            .map(|row| MembershipWithUser {
                user_id: row.user_id,
                user: UserSummary {
                    id: row.user_id,
                    email: row.email,
                },
            })
            .collect())
    }
}
