/// User model and database operations
///
/// # Schema
///
/// ```sql
/// CREATE TABLE users (
///     id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
///     email TEXT NOT NULL,
///     password_hash TEXT NOT NULL,
///     created_at TIMESTAMPTZ NOT NULL DEFAULT NOW(),
///     updated_at TIMESTAMPTZ NOT NULL DEFAULT NOW()
/// );
/// CREATE UNIQUE INDEX users_email_lower_idx ON users (lower(email));
/// ```
///
/// Emails are normalized to lowercase before they reach the database, so lookups
/// never depend on the caller's casing.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::PgPool;
use uuid::Uuid;

/// User account
///
/// Deliberately not `Serialize`: the password hash must never leave the server.
/// Convert to [`UserSummary`] for any response body.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct User {
    /// Unique user ID
    pub id: Uuid,

    /// Lowercased email address, unique across all users
    pub email: String,

    /// Argon2id password hash
    pub password_hash: String,

    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Public user shape (id + email)
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize, sqlx::FromRow)]
pub struct UserSummary {
    pub id: Uuid,
    pub email: String,
}

impl From<&User> for UserSummary {
    fn from(user: &User) -> Self {
        Self {
            id: user.id,
            email: user.email.clone(),
        }
    }
}

/// Input for creating a new user
#[derive(Debug, Clone)]
pub struct CreateUser {
    /// Email address (lowercased on insert)
    pub email: String,

    /// Argon2id password hash (NOT the plaintext password)
    pub password_hash: String,
}

/// Lowercases and trims an email address
pub fn normalize_email(email: &str) -> String {
    email.trim().to_lowercase()
}

impl User {
    /// Creates a new user
    ///
    /// # Errors
    ///
    /// Returns an error if the email is already registered (unique index violation)
    /// or the database is unreachable.
    ///
    /// # Example
    ///
    /// ```no_run
    /// # use taskboard_shared::models::user::{User, CreateUser};
    /// # use sqlx::PgPool;
    /// # async fn example(pool: PgPool) -> Result<(), sqlx::Error> {
    /// let user = User::create(
    ///     &pool,
    ///     CreateUser {
    ///         email: "Ana@Example.com".to_string(),
    ///         password_hash: "$argon2id$...".to_string(),
    ///     },
    /// )
    /// .await?;
    /// assert_eq!(user.email, "ana@example.com");
    /// # Ok(())
    /// # }
    /// ```
    pub async fn create(pool: &PgPool, data: CreateUser) -> Result<Self, sqlx::Error> {
        let user = sqlx::query_as::<_, User>(
            r#"
            INSERT INTO users (email, password_hash)
            VALUES ($1, $2)
            RETURNING id, email, password_hash, created_at, updated_at
            "#,
        )
        .bind(normalize_email(&data.email))
        .bind(data.password_hash)
        .fetch_one(pool)
        .await?;

        Ok(user)
    }

    /// Finds a user by ID
    pub async fn find_by_id(pool: &PgPool, id: Uuid) -> Result<Option<Self>, sqlx::Error> {
        let user = sqlx::query_as::<_, User>(
            r#"
            SELECT id, email, password_hash, created_at, updated_at
            FROM users
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(pool)
        .await?;

        Ok(user)
    }

    /// Finds a user by email address (case-insensitive)
    pub async fn find_by_email(pool: &PgPool, email: &str) -> Result<Option<Self>, sqlx::Error> {
        let user = sqlx::query_as::<_, User>(
            r#"
            SELECT id, email, password_hash, created_at, updated_at
            FROM users
            WHERE lower(email) = $1
            "#,
        )
        .bind(normalize_email(email))
        .fetch_optional(pool)
        .await?;

        Ok(user)
    }

    /// Lists users that could still be invited to a project
    ///
    /// The complement set: every user except current members, the project owner and
    /// the requester, ordered by email.
    ///
    /// # Arguments
    ///
    /// * `pool` - Database connection pool
    /// * `project_id` - Project being invited to
    /// * `requester_id` - User asking (excluded from the result)
    pub async fn list_non_members(
        pool: &PgPool,
        project_id: Uuid,
        requester_id: Uuid,
    ) -> Result<Vec<UserSummary>, sqlx::Error> {
        let users = sqlx::query_as::<_, UserSummary>(
            r#"
            SELECT u.id, u.email
            FROM users u
            WHERE u.id <> $2
              AND u.id <> (SELECT owner_id FROM projects WHERE id = $1)
              AND NOT EXISTS (
                  SELECT 1 FROM memberships m
                  WHERE m.project_id = $1 AND m.user_id = u.id
              )
            ORDER BY u.email ASC
            "#,
        )
        .bind(project_id)
        .bind(requester_id)
        .fetch_all(pool)
        .await?;

        Ok(users)
    }

    /// Returns the public shape of this user
    pub fn summary(&self) -> UserSummary {
        UserSummary::from(self)
    }
}
