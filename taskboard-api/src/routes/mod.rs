/// API route handlers, by resource
///
/// - `health`: Health check
/// - `auth`: Register, login, refresh
/// - `projects`: Project list, creation, detail snapshot, deletion
/// - `memberships`: Members and invitable users
/// - `tasks`: Task CRUD and the drag-and-drop status persist
/// - `analytics`: Per-project status counts
use axum::{http::StatusCode, Json};
use taskboard_shared::envelope::ApiEnvelope;

pub mod analytics;
pub mod auth;
pub mod health;
pub mod memberships;
pub mod projects;
pub mod tasks;

/// JSON envelope response body
pub type Envelope<T> = Json<ApiEnvelope<T>>;

/// 200 with `data`
pub fn ok<T>(data: T) -> Envelope<T> {
    Json(ApiEnvelope::ok(data))
}

/// 201 with `data`
pub fn created<T>(data: T) -> (StatusCode, Envelope<T>) {
    (StatusCode::CREATED, Json(ApiEnvelope::ok(data)))
}
