/// Task routes
///
/// Creating, editing and deleting a task is reserved to the project owner. Moving
/// a task between board columns (`PUT .../status`) is open to members too.
use crate::{
    app::AppState,
    error::{ApiError, ApiResult},
    extract::{ApiJson, ApiPath},
    routes::{created, ok, Envelope},
};
use axum::{extract::State, http::StatusCode, Extension};
use sqlx::PgPool;
use taskboard_shared::{
    auth::{
        authorization::{require_assignable, require_project_access, require_project_owner},
        middleware::AuthContext,
    },
    models::{
        project::Project,
        task::{CreateTask, Task, TaskWithAssignee, UpdateTask},
    },
    validation::{validate_input, CreateTaskInput, UpdateTaskInput, UpdateTaskStatusInput},
};
use uuid::Uuid;

fn task_not_found() -> ApiError {
    ApiError::NotFound("Task not found".to_string())
}

async fn check_assignee(pool: &PgPool, project: &Project, assignee: Option<Uuid>) -> ApiResult<()> {
    if let Some(assignee_id) = assignee {
        require_assignable(pool, project, assignee_id).await?;
    }
    Ok(())
}

async fn load_detail(pool: &PgPool, project_id: Uuid, task_id: Uuid) -> ApiResult<TaskWithAssignee> {
    Task::find_detail(pool, project_id, task_id)
        .await?
        .ok_or_else(task_not_found)
}

/// POST /v1/projects/:id/tasks
pub async fn create_task(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
    ApiPath(project_id): ApiPath<Uuid>,
    ApiJson(req): ApiJson<CreateTaskInput>,
) -> ApiResult<(StatusCode, Envelope<TaskWithAssignee>)> {
    validate_input(&req)?;
    let project = require_project_owner(&state.db, project_id, &auth).await?;
    check_assignee(&state.db, &project, req.assignee_id).await?;

    let task = Task::create(
        &state.db,
        CreateTask {
            project_id,
            title: req.title,
            description: req.description.unwrap_or_default(),
            status: req.status,
            assignee_id: req.assignee_id,
        },
    )
    .await?;

    tracing::info!(project_id = %project_id, task_id = %task.id, status = %task.status, "Task created");

    Ok(created(load_detail(&state.db, project_id, task.id).await?))
}

/// GET /v1/projects/:id/tasks/:task_id
///
/// The detail editor hydrates from this, never from the board's local copy.
pub async fn get_task(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
    ApiPath((project_id, task_id)): ApiPath<(Uuid, Uuid)>,
) -> ApiResult<Envelope<TaskWithAssignee>> {
    require_project_access(&state.db, project_id, &auth).await?;

    Ok(ok(load_detail(&state.db, project_id, task_id).await?))
}

/// PUT /v1/projects/:id/tasks/:task_id
pub async fn update_task(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
    ApiPath((project_id, task_id)): ApiPath<(Uuid, Uuid)>,
    ApiJson(req): ApiJson<UpdateTaskInput>,
) -> ApiResult<Envelope<TaskWithAssignee>> {
    validate_input(&req)?;
    let project = require_project_owner(&state.db, project_id, &auth).await?;
    check_assignee(&state.db, &project, req.assignee_id).await?;

    Task::update(
        &state.db,
        project_id,
        task_id,
        UpdateTask {
            title: req.title,
            description: req.description,
            status: req.status,
            assignee_id: req.assignee_id,
        },
    )
    .await?
    .ok_or_else(task_not_found)?;

    tracing::info!(project_id = %project_id, task_id = %task_id, "Task updated");

    Ok(ok(load_detail(&state.db, project_id, task_id).await?))
}

/// DELETE /v1/projects/:id/tasks/:task_id
pub async fn delete_task(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
    ApiPath((project_id, task_id)): ApiPath<(Uuid, Uuid)>,
) -> ApiResult<Envelope<&'static str>> {
    require_project_owner(&state.db, project_id, &auth).await?;

    if !Task::delete(&state.db, project_id, task_id).await? {
        return Err(task_not_found());
    }

    tracing::info!(project_id = %project_id, task_id = %task_id, "Task deleted");

    Ok(ok("Task deleted successfully"))
}

/// PUT /v1/projects/:id/tasks/:task_id/status
///
/// The persist half of a board drag-and-drop. Any status may follow any other.
pub async fn update_task_status(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
    ApiPath((project_id, task_id)): ApiPath<(Uuid, Uuid)>,
    ApiJson(req): ApiJson<UpdateTaskStatusInput>,
) -> ApiResult<Envelope<Task>> {
    require_project_access(&state.db, project_id, &auth).await?;

    let task = Task::update_status(&state.db, project_id, task_id, req.status)
        .await?
        .ok_or_else(task_not_found)?;

    tracing::info!(
        project_id = %project_id,
        task_id = %task_id,
        status = %task.status,
        user_id = %auth.user_id,
        "Task status updated"
    );

    Ok(ok(task))
}
