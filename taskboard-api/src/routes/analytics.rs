use crate::{
    app::AppState,
    error::ApiResult,
    routes::{ok, Envelope},
};
use axum::{extract::State, Extension};
use taskboard_shared::{auth::middleware::AuthContext, models::task::{ProjectTaskCounts, Task}};

/// GET /v1/analytics/tasks
///
/// Task counts per status for each project the caller owns, newest first.
pub async fn task_analytics(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
) -> ApiResult<Envelope<Vec<ProjectTaskCounts>>> {
    let counts = Task::status_counts_for_owner(&state.db, auth.user_id).await?;
    Ok(ok(counts))
}
