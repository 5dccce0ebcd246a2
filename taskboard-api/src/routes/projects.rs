/// Project routes
use crate::{
    app::AppState,
    error::{ApiError, ApiResult},
    extract::{ApiJson, ApiPath},
    routes::{created, ok, Envelope},
};
use axum::{extract::State, http::StatusCode, Extension};
use taskboard_shared::{
    auth::{authorization::require_project_access, middleware::AuthContext},
    models::project::{CreateProject, Project, ProjectDetail, ProjectSummary},
    validation::{validate_input, CreateProjectInput},
    DEFAULT_PROJECT_IMAGE,
};
use uuid::Uuid;

/// GET /v1/projects
///
/// Projects the caller owns or is a member of, newest first.
pub async fn list_projects(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
) -> ApiResult<Envelope<Vec<ProjectSummary>>> {
    let projects = Project::list_for_user(&state.db, auth.user_id).await?;
    Ok(ok(projects))
}

/// POST /v1/projects
pub async fn create_project(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
    ApiJson(req): ApiJson<CreateProjectInput>,
) -> ApiResult<(StatusCode, Envelope<ProjectSummary>)> {
    validate_input(&req)?;

    let project = Project::create(
        &state.db,
        CreateProject {
            name: req.name,
            image: DEFAULT_PROJECT_IMAGE.to_string(),
            owner_id: auth.user_id,
        },
    )
    .await?;

    tracing::info!(project_id = %project.id, owner_id = %auth.user_id, "Project created");

    Ok(created(project.summary()))
}

/// GET /v1/projects/:id
///
/// The authoritative snapshot the board derives its columns from.
pub async fn get_project(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
    ApiPath(project_id): ApiPath<Uuid>,
) -> ApiResult<Envelope<ProjectDetail>> {
    require_project_access(&state.db, project_id, &auth).await?;

    let detail = Project::detail(&state.db, project_id)
        .await?
        .ok_or_else(|| ApiError::NotFound("Project not found".to_string()))?;

    Ok(ok(detail))
}

/// DELETE /v1/projects/:id
///
/// Owner only. Tasks and memberships go with it.
pub async fn delete_project(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
    ApiPath(project_id): ApiPath<Uuid>,
) -> ApiResult<Envelope<&'static str>> {
    if !Project::delete(&state.db, project_id, auth.user_id).await? {
        return Err(ApiError::NotFound(
            "Project not found or unauthorized".to_string(),
        ));
    }

    tracing::info!(project_id = %project_id, "Project deleted");

    Ok(ok("Project deleted successfully"))
}
