//! Remote project API
//!
//! [`ProjectApi`] is the seam between the board components and the server. The
//! components only ever talk to the trait, so they run unchanged against
//! [`HttpProjectApi`] or the in-memory [`crate::mock::MockProjectApi`].
//!
//! # Example
//!
//! ```no_run
//! use taskboard_client::api::{HttpProjectApi, ProjectApi};
//! use taskboard_client::config::ClientConfig;
//! # use uuid::Uuid;
//!
//! # async fn example(project_id: Uuid) -> Result<(), Box<dyn std::error::Error>> {
//! let api = HttpProjectApi::new(&ClientConfig::default())?;
//! let project = api.fetch_project(project_id).await?;
//! println!("{} tasks", project.tasks.len());
//! # Ok(())
//! # }
//! ```

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Method;
use serde::de::DeserializeOwned;
use serde::Deserialize;
use serde_json::{json, Value};
use taskboard_shared::{
    envelope::ApiEnvelope,
    models::{
        membership::MembershipWithUser,
        project::ProjectDetail,
        task::{ProjectTaskCounts, TaskStatus, TaskWithAssignee},
        user::UserSummary,
    },
    validation::{CreateTaskInput, UpdateTaskInput},
};
use uuid::Uuid;

use crate::config::ClientConfig;
use crate::error::{ClientError, ClientResult};

/// Operations the board components need from the server
#[async_trait]
pub trait ProjectApi: Send + Sync {
    /// Authoritative project snapshot: metadata, tasks with assignees, memberships
    async fn fetch_project(&self, project_id: Uuid) -> ClientResult<ProjectDetail>;

    /// Persists a drag-and-drop status change
    async fn update_task_status(
        &self,
        project_id: Uuid,
        task_id: Uuid,
        status: TaskStatus,
    ) -> ClientResult<()>;

    /// Adds a task to a column; owner only
    async fn create_task(
        &self,
        project_id: Uuid,
        input: &CreateTaskInput,
    ) -> ClientResult<TaskWithAssignee>;

    async fn get_task(&self, project_id: Uuid, task_id: Uuid) -> ClientResult<TaskWithAssignee>;

    async fn update_task(
        &self,
        project_id: Uuid,
        task_id: Uuid,
        input: &UpdateTaskInput,
    ) -> ClientResult<TaskWithAssignee>;

    async fn delete_task(&self, project_id: Uuid, task_id: Uuid) -> ClientResult<()>;

    async fn list_memberships(&self, project_id: Uuid) -> ClientResult<Vec<MembershipWithUser>>;

    /// Users that could still be invited to the project
    async fn list_non_members(&self, project_id: Uuid) -> ClientResult<Vec<UserSummary>>;

    /// Adds users as members; returns how many were new
    async fn add_members(&self, project_id: Uuid, users: &[UserSummary]) -> ClientResult<u64>;

    async fn task_analytics(&self) -> ClientResult<Vec<ProjectTaskCounts>>;
}

/// reqwest-backed [`ProjectApi`]
#[derive(Debug, Clone)]
pub struct HttpProjectApi {
    client: reqwest::Client,
    base_url: String,
    token: Option<String>,
}

#[derive(Debug, Deserialize)]
struct AddMembersData {
    added: u64,
}

#[derive(Debug, Deserialize)]
struct LoginData {
    access_token: String,
}

impl HttpProjectApi {
    /// Builds a client from configuration
    ///
    /// # Errors
    ///
    /// Fails if the TLS backend cannot be initialised.
    pub fn new(config: &ClientConfig) -> ClientResult<Self> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.request_timeout_secs))
            .build()?;

        Ok(Self {
            client,
            base_url: config.api_url.trim_end_matches('/').to_string(),
            token: config.token.clone(),
        })
    }

    /// Replaces the bearer token used for subsequent requests
    pub fn with_token(mut self, token: impl Into<String>) -> Self {
        self.token = Some(token.into());
        self
    }

    /// Exchanges credentials for an access token
    pub async fn login(&self, email: &str, password: &str) -> ClientResult<String> {
        let data: LoginData = self
            .send(
                Method::POST,
                "/v1/auth/login",
                Some(json!({ "email": email, "password": password })),
            )
            .await
            .and_then(require)?;

        Ok(data.access_token)
    }

    /// Sends a request and unwraps the envelope
    ///
    /// Non-2xx responses become [`ClientError`]s carrying the envelope's `error`.
    async fn send<T: DeserializeOwned>(
        &self,
        method: Method,
        path: &str,
        body: Option<Value>,
    ) -> ClientResult<Option<T>> {
        let url = format!("{}{}", self.base_url, path);
        tracing::debug!(%method, %url, "API request");

        let mut request = self.client.request(method, &url);
        if let Some(token) = &self.token {
            request = request.bearer_auth(token);
        }
        if let Some(body) = body {
            request = request.json(&body);
        }

        let response = request.send().await?;
        let status = response.status();
        let bytes = response.bytes().await?;

        if !status.is_success() {
            let fallback = status
                .canonical_reason()
                .unwrap_or("Request failed")
                .to_string();

            let (message, details) = match serde_json::from_slice::<ApiEnvelope<Value>>(&bytes) {
                Ok(envelope) => (envelope.error.unwrap_or(fallback), envelope.details),
                Err(_) => (fallback, None),
            };

            tracing::debug!(status = status.as_u16(), %message, "API request failed");
            return Err(ClientError::from_status(status.as_u16(), message, details));
        }

        let envelope: ApiEnvelope<T> =
            serde_json::from_slice(&bytes).map_err(|e| ClientError::Decode(e.to_string()))?;

        envelope.into_result().map_err(|message| ClientError::Server {
            status: status.as_u16(),
            message,
        })
    }
}

fn require<T>(data: Option<T>) -> ClientResult<T> {
    data.ok_or_else(|| ClientError::Decode("Response carried no data".to_string()))
}

#[async_trait]
impl ProjectApi for HttpProjectApi {
    async fn fetch_project(&self, project_id: Uuid) -> ClientResult<ProjectDetail> {
        self.send(Method::GET, &format!("/v1/projects/{}", project_id), None)
            .await
            .and_then(require)
    }

    async fn update_task_status(
        &self,
        project_id: Uuid,
        task_id: Uuid,
        status: TaskStatus,
    ) -> ClientResult<()> {
        self.send::<Value>(
            Method::PUT,
            &format!("/v1/projects/{}/tasks/{}/status", project_id, task_id),
            Some(json!({ "status": status })),
        )
        .await
        .map(|_| ())
    }

    async fn create_task(
        &self,
        project_id: Uuid,
        input: &CreateTaskInput,
    ) -> ClientResult<TaskWithAssignee> {
        let body = serde_json::to_value(input).map_err(|e| ClientError::Decode(e.to_string()))?;

        self.send(
            Method::POST,
            &format!("/v1/projects/{}/tasks", project_id),
            Some(body),
        )
        .await
        .and_then(require)
    }

    async fn get_task(&self, project_id: Uuid, task_id: Uuid) -> ClientResult<TaskWithAssignee> {
        self.send(
            Method::GET,
            &format!("/v1/projects/{}/tasks/{}", project_id, task_id),
            None,
        )
        .await
        .and_then(require)
    }

    async fn update_task(
        &self,
        project_id: Uuid,
        task_id: Uuid,
        input: &UpdateTaskInput,
    ) -> ClientResult<TaskWithAssignee> {
        let body = serde_json::to_value(input).map_err(|e| ClientError::Decode(e.to_string()))?;

        self.send(
            Method::PUT,
            &format!("/v1/projects/{}/tasks/{}", project_id, task_id),
            Some(body),
        )
        .await
        .and_then(require)
    }

    async fn delete_task(&self, project_id: Uuid, task_id: Uuid) -> ClientResult<()> {
        self.send::<Value>(
            Method::DELETE,
            &format!("/v1/projects/{}/tasks/{}", project_id, task_id),
            None,
        )
        .await
        .map(|_| ())
    }

    async fn list_memberships(&self, project_id: Uuid) -> ClientResult<Vec<MembershipWithUser>> {
        self.send(
            Method::GET,
            &format!("/v1/projects/{}/memberships", project_id),
            None,
        )
        .await
        .and_then(require)
    }

    async fn list_non_members(&self, project_id: Uuid) -> ClientResult<Vec<UserSummary>> {
        self.send(
            Method::GET,
            &format!("/v1/projects/{}/non-memberships", project_id),
            None,
        )
        .await
        .and_then(require)
    }

    async fn add_members(&self, project_id: Uuid, users: &[UserSummary]) -> ClientResult<u64> {
        let data: AddMembersData = self
            .send(
                Method::POST,
                &format!("/v1/projects/{}/memberships", project_id),
                Some(json!({ "users": users })),
            )
            .await
            .and_then(require)?;

        Ok(data.added)
    }

    async fn task_analytics(&self) -> ClientResult<Vec<ProjectTaskCounts>> {
        self.send(Method::GET, "/v1/analytics/tasks", None)
            .await
            .and_then(require)
    }
}
