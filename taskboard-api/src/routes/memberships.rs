/// Membership routes
use crate::{
    app::AppState,
    error::ApiResult,
    extract::{ApiJson, ApiPath},
    routes::{ok, Envelope},
};
use axum::{extract::State, Extension};
use serde::{Deserialize, Serialize};
use taskboard_shared::{
    auth::{
        authorization::{require_project_access, require_project_owner},
        middleware::AuthContext,
    },
    models::{
        membership::{Membership, MembershipWithUser},
        user::{User, UserSummary},
    },
    validation::{validate_input, AddMembersInput},
};
use uuid::Uuid;

#[derive(Debug, Serialize, Deserialize)]
pub struct AddMembersResponse {
    /// Rows actually inserted; existing members are skipped
    pub added: u64,
}

/// GET /v1/projects/:id/memberships
pub async fn list_memberships(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
    ApiPath(project_id): ApiPath<Uuid>,
) -> ApiResult<Envelope<Vec<MembershipWithUser>>> {
    require_project_access(&state.db, project_id, &auth).await?;

    let members = Membership::list_with_users(&state.db, project_id).await?;
    Ok(ok(members))
}

/// POST /v1/projects/:id/memberships
///
/// Owner only. The owner is never added as a member of their own project.
pub async fn add_members(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
    ApiPath(project_id): ApiPath<Uuid>,
    ApiJson(req): ApiJson<AddMembersInput>,
) -> ApiResult<Envelope<AddMembersResponse>> {
    validate_input(&req)?;
    let project = require_project_owner(&state.db, project_id, &auth).await?;

    let user_ids: Vec<Uuid> = req
        .users
        .iter()
        .map(|u| u.id)
        .filter(|id| *id != project.owner_id)
        .collect();

    let added = Membership::add_many(&state.db, project_id, &user_ids).await?;
    tracing::info!(project_id = %project_id, requested = user_ids.len(), added, "Members added");

    Ok(ok(AddMembersResponse { added }))
}

/// GET /v1/projects/:id/non-memberships
///
/// Users that could still be invited: everyone except members, the owner and the
/// caller.
pub async fn list_non_members(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
    ApiPath(project_id): ApiPath<Uuid>,
) -> ApiResult<Envelope<Vec<UserSummary>>> {
    require_project_access(&state.db, project_id, &auth).await?;

    let users = User::list_non_members(&state.db, project_id, auth.user_id).await?;
    Ok(ok(users))
}
