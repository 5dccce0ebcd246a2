//! Project-level authorization
//!
//! Two roles exist per project. The owner may do everything; members may read the
//! project and move tasks between columns. Anyone else is refused.
//!
//! | Action | Owner | Member |
//! |--------|-------|--------|
//! | View project, tasks, members, invitable users | yes | yes |
//! | Change a task's status | yes | yes |
//! | Create, edit or delete a task | yes | no |
//! | Add members, delete the project | yes | no |
//!
//! # Example
//!
//! ```no_run
//! use taskboard_shared::auth::authorization::require_project_access;
//! use taskboard_shared::auth::middleware::AuthContext;
//! # use sqlx::PgPool;
//! # use uuid::Uuid;
//!
//! # async fn example(pool: PgPool, auth: AuthContext, project_id: Uuid) -> Result<(), Box<dyn std::error::Error>> {
//! let (project, role) = require_project_access(&pool, project_id, &auth).await?;
//! println!("{} is {:?} of {}", auth.email, role, project.name);
//! # Ok(())
//! # }
//! ```

use sqlx::PgPool;
use uuid::Uuid;

use super::middleware::AuthContext;
use crate::models::{membership::Membership, project::Project};

/// Authorization errors
#[derive(Debug, thiserror::Error)]
pub enum AuthzError {
    #[error("Project not found")]
    ProjectNotFound,

    #[error("Only the project owner can perform this action")]
    NotOwner,

    #[error("You are not a member of this project")]
    NotMember,

    #[error("Assignee must be the project owner or a member")]
    InvalidAssignee,

    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),
}

/// Caller's relation to a project
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProjectRole {
    Owner,
    Member,
}

impl ProjectRole {
    pub fn is_owner(&self) -> bool {
        matches!(self, ProjectRole::Owner)
    }
}

/// Resolves a user's role on an already-loaded project
///
/// Returns `None` for outsiders.
pub async fn project_role(
    pool: &PgPool,
    project: &Project,
    user_id: Uuid,
) -> Result<Option<ProjectRole>, AuthzError> {
    if project.owner_id == user_id {
        return Ok(Some(ProjectRole::Owner));
    }

    if Membership::exists(pool, project.id, user_id).await? {
        return Ok(Some(ProjectRole::Member));
    }

    Ok(None)
}

/// Requires the caller to be the owner or a member
///
/// # Errors
///
/// - `AuthzError::ProjectNotFound` if the project does not exist
/// - `AuthzError::NotMember` if the caller has no role on it
pub async fn require_project_access(
    pool: &PgPool,
    project_id: Uuid,
    auth: &AuthContext,
) -> Result<(Project, ProjectRole), AuthzError> {
    let project = Project::find_by_id(pool, project_id)
        .await?
        .ok_or(AuthzError::ProjectNotFound)?;

    let role = project_role(pool, &project, auth.user_id)
        .await?
        .ok_or(AuthzError::NotMember)?;

    Ok((project, role))
}

/// Requires the caller to be the owner
///
/// Members get `AuthzError::NotOwner`; outsiders get `AuthzError::NotMember`.
pub async fn require_project_owner(
    pool: &PgPool,
    project_id: Uuid,
    auth: &AuthContext,
) -> Result<Project, AuthzError> {
    let (project, role) = require_project_access(pool, project_id, auth).await?;

    if !role.is_owner() {
        return Err(AuthzError::NotOwner);
    }

    Ok(project)
}

/// Requires a prospective assignee to be the owner or a current member
pub async fn require_assignable(
    pool: &PgPool,
    project: &Project,
    assignee_id: Uuid,
) -> Result<(), AuthzError> {
    match project_role(pool, project, assignee_id).await? {
        Some(_) => Ok(()),
        None => Err(AuthzError::InvalidAssignee),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_role_is_owner() {
        assert!(ProjectRole::Owner.is_owner());
        assert!(!ProjectRole::Member.is_owner());
    }

    #[test]
    fn test_authz_error_display() {
        assert_eq!(AuthzError::ProjectNotFound.to_string(), "Project not found");
        assert!(AuthzError::NotOwner.to_string().contains("owner"));
        assert!(AuthzError::InvalidAssignee.to_string().contains("member"));
    }
}
