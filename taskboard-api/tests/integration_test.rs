//! End-to-end API tests against PostgreSQL
//!
//! cargo test -p taskboard-api --test integration_test -- --ignored --test-threads=1
mod common;

use axum::http::StatusCode;
use common::{send, TestContext};
use serde_json::{json, Value};

async fn create_project(ctx: &TestContext, bearer: &str) -> String {
    let (status, body) = send(
        &ctx.app,
        "POST",
        "/v1/projects",
        Some(bearer),
        Some(json!({ "name": "Launch" })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED, "{}", body);
    body["data"]["id"].as_str().unwrap().to_string()
}

async fn create_task(ctx: &TestContext, bearer: &str, project: &str, title: &str, status: &str) -> String {
    let (code, body) = send(
        &ctx.app,
        "POST",
        &format!("/v1/projects/{}/tasks", project),
        Some(bearer),
        Some(json!({ "title": title, "status": status })),
    )
    .await;
    assert_eq!(code, StatusCode::CREATED, "{}", body);
    body["data"]["id"].as_str().unwrap().to_string()
}

#[tokio::test]
#[ignore]
async fn test_register_then_login() {
    let ctx = TestContext::new().await.unwrap();
    let email = format!("New-{}@Example.com", uuid::Uuid::new_v4());

    let (status, body) = send(
        &ctx.app,
        "POST",
        "/v1/auth/register",
        None,
        Some(json!({ "email": email, "password": "password123", "confirm_password": "password123" })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED, "{}", body);

    let (status, _) = send(
        &ctx.app,
        "POST",
        "/v1/auth/register",
        None,
        Some(json!({ "email": email, "password": "password123", "confirm_password": "password123" })),
    )
    .await;
    assert_eq!(status, StatusCode::CONFLICT);

    let (status, body) = send(
        &ctx.app,
        "POST",
        "/v1/auth/login",
        None,
        Some(json!({ "email": email.to_lowercase(), "password": "password123" })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert!(body["data"]["access_token"].is_string());

    let (status, body) = send(
        &ctx.app,
        "POST",
        "/v1/auth/login",
        None,
        Some(json!({ "email": email, "password": "wrong-password" })),
    )
    .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["error"], "Invalid email or password");
}

#[tokio::test]
#[ignore]
async fn test_board_snapshot_and_status_persist() {
    let ctx = TestContext::new().await.unwrap();
    let owner = ctx.user().await.unwrap();
    let project = create_project(&ctx, &owner.bearer()).await;

    let t1 = create_task(&ctx, &owner.bearer(), &project, "t1", "TODO").await;
    let t2 = create_task(&ctx, &owner.bearer(), &project, "t2", "DONE").await;

    let (status, body) = send(
        &ctx.app,
        "PUT",
        &format!("/v1/projects/{}/tasks/{}/status", project, t1),
        Some(&owner.bearer()),
        Some(json!({ "status": "DONE" })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], true);

    let (_, body) = send(
        &ctx.app,
        "GET",
        &format!("/v1/projects/{}", project),
        Some(&owner.bearer()),
        None,
    )
    .await;
    let tasks = body["data"]["tasks"].as_array().unwrap();
    let ids: Vec<&str> = tasks.iter().map(|t| t["id"].as_str().unwrap()).collect();
    assert_eq!(ids, vec![t1.as_str(), t2.as_str()]);
    assert!(tasks.iter().all(|t| t["status"] == "DONE"));
}

#[tokio::test]
#[ignore]
async fn test_unknown_status_rejected() {
    let ctx = TestContext::new().await.unwrap();
    let owner = ctx.user().await.unwrap();
    let project = create_project(&ctx, &owner.bearer()).await;
    let task = create_task(&ctx, &owner.bearer(), &project, "t", "TODO").await;

    let (status, body) = send(
        &ctx.app,
        "PUT",
        &format!("/v1/projects/{}/tasks/{}/status", project, task),
        Some(&owner.bearer()),
        Some(json!({ "status": "BLOCKED" })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["status"], false);
}

#[tokio::test]
#[ignore]
async fn test_member_can_move_but_not_edit() {
    let ctx = TestContext::new().await.unwrap();
    let owner = ctx.user().await.unwrap();
    let member = ctx.user().await.unwrap();
    let outsider = ctx.user().await.unwrap();
    let project = create_project(&ctx, &owner.bearer()).await;
    let task = create_task(&ctx, &owner.bearer(), &project, "t", "TODO").await;

    let (status, body) = send(
        &ctx.app,
        "POST",
        &format!("/v1/projects/{}/memberships", project),
        Some(&owner.bearer()),
        Some(json!({ "users": [{ "id": member.user.id, "email": member.user.email }] })),
    )
    .await;
    assert_eq!(status, StatusCode::OK, "{}", body);
    assert_eq!(body["data"]["added"], 1);

    let status_uri = format!("/v1/projects/{}/tasks/{}/status", project, task);
    let (status, _) = send(&ctx.app, "PUT", &status_uri, Some(&member.bearer()), Some(json!({ "status": "IN_PROGRESS" }))).await;
    assert_eq!(status, StatusCode::OK);

    let task_uri = format!("/v1/projects/{}/tasks/{}", project, task);
    let (status, _) = send(&ctx.app, "PUT", &task_uri, Some(&member.bearer()), Some(json!({ "title": "hijack" }))).await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    let (status, _) = send(&ctx.app, "PUT", &status_uri, Some(&outsider.bearer()), Some(json!({ "status": "DONE" }))).await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    let (status, body) = send(&ctx.app, "DELETE", &format!("/v1/projects/{}", project), Some(&member.bearer()), None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["error"], "Project not found or unauthorized");
}

#[tokio::test]
#[ignore]
async fn test_editor_paths() {
    let ctx = TestContext::new().await.unwrap();
    let owner = ctx.user().await.unwrap();
    let outsider = ctx.user().await.unwrap();
    let project = create_project(&ctx, &owner.bearer()).await;
    let task = create_task(&ctx, &owner.bearer(), &project, "t", "TODO").await;
    let uri = format!("/v1/projects/{}/tasks/{}", project, task);

    let (status, body) = send(&ctx.app, "PUT", &uri, Some(&owner.bearer()), Some(json!({ "title": "" }))).await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(body["details"][0]["message"], "Title is required");

    let (status, body) = send(
        &ctx.app,
        "PUT",
        &uri,
        Some(&owner.bearer()),
        Some(json!({ "assignee_id": outsider.user.id })),
    )
    .await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert!(body["details"].is_null());

    let (status, body) = send(
        &ctx.app,
        "PUT",
        &uri,
        Some(&owner.bearer()),
        Some(json!({ "title": "renamed", "assignee_id": owner.user.id })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["assignee"]["id"], Value::String(owner.user.id.to_string()));

    let (status, _) = send(&ctx.app, "DELETE", &uri, Some(&owner.bearer()), None).await;
    assert_eq!(status, StatusCode::OK);

    let (status, body) = send(&ctx.app, "GET", &uri, Some(&owner.bearer()), None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["error"], "Task not found");
}

#[tokio::test]
#[ignore]
async fn test_analytics_counts() {
    let ctx = TestContext::new().await.unwrap();
    let owner = ctx.user().await.unwrap();
    let project = create_project(&ctx, &owner.bearer()).await;
    create_task(&ctx, &owner.bearer(), &project, "a", "TODO").await;
    create_task(&ctx, &owner.bearer(), &project, "b", "IN_PROGRESS").await;

    let (status, body) = send(&ctx.app, "GET", "/v1/analytics/tasks", Some(&owner.bearer()), None).await;
    assert_eq!(status, StatusCode::OK);

    let row = &body["data"][0];
    assert_eq!(row["project"]["id"], Value::String(project));
    assert_eq!(row["todo"], 1);
    assert_eq!(row["in_progress"], 1);
    assert_eq!(row["done"], 0);
}
