//! In-memory [`ProjectApi`]
//!
//! `MockProjectApi` keeps one project as its server-side truth, records every
//! call, and can be scripted to fail or to take time on any operation. The board
//! components are exercised against it in tests and in offline demos.
//!
//! # Example
//!
//! ```
//! use taskboard_client::api::ProjectApi;
//! use taskboard_client::mock::{project_fixture, MockProjectApi, Operation};
//! use taskboard_client::error::ClientError;
//! use taskboard_shared::models::task::TaskStatus;
//!
//! # async fn example() {
//! let project = project_fixture(&[("Write docs", TaskStatus::Todo)]);
//! let api = MockProjectApi::new(project.clone());
//!
//! api.fail_next(Operation::UpdateTaskStatus, ClientError::NotFound("Task not found".into()))
//!     .await;
//! let result = api
//!     .update_task_status(project.id, project.tasks[0].id, TaskStatus::Done)
//!     .await;
//! assert!(result.is_err());
//! # }
//! ```

use std::collections::{HashMap, VecDeque};
use std::time::Duration;

use async_trait::async_trait;
use chrono::Utc;
use taskboard_shared::{
    models::{
        membership::MembershipWithUser,
        project::{ProjectDetail, ProjectSummary},
        task::{ProjectTaskCounts, TaskStatus, TaskWithAssignee},
        user::UserSummary,
    },
    validation::{CreateTaskInput, UpdateTaskInput},
    DEFAULT_PROJECT_IMAGE,
};
use tokio::sync::Mutex;
use uuid::Uuid;

use crate::api::ProjectApi;
use crate::error::{ClientError, ClientResult};

/// API operation, used to script failures and latency
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Operation {
    FetchProject,
    UpdateTaskStatus,
    CreateTask,
    GetTask,
    UpdateTask,
    DeleteTask,
    ListMemberships,
    ListNonMembers,
    AddMembers,
    TaskAnalytics,
}

/// A recorded call
#[derive(Debug, Clone, PartialEq)]
pub enum ApiCall {
    FetchProject(Uuid),
    UpdateTaskStatus {
        project_id: Uuid,
        task_id: Uuid,
        status: TaskStatus,
    },
    CreateTask {
        project_id: Uuid,
        input: CreateTaskInput,
    },
    GetTask {
        project_id: Uuid,
        task_id: Uuid,
    },
    UpdateTask {
        project_id: Uuid,
        task_id: Uuid,
        input: UpdateTaskInput,
    },
    DeleteTask {
        project_id: Uuid,
        task_id: Uuid,
    },
    ListMemberships(Uuid),
    ListNonMembers(Uuid),
    AddMembers {
        project_id: Uuid,
        user_ids: Vec<Uuid>,
    },
    TaskAnalytics,
}

impl ApiCall {
    pub fn operation(&self) -> Operation {
        match self {
            ApiCall::FetchProject(_) => Operation::FetchProject,
            ApiCall::UpdateTaskStatus { .. } => Operation::UpdateTaskStatus,
            ApiCall::CreateTask { .. } => Operation::CreateTask,
            ApiCall::GetTask { .. } => Operation::GetTask,
            ApiCall::UpdateTask { .. } => Operation::UpdateTask,
            ApiCall::DeleteTask { .. } => Operation::DeleteTask,
            ApiCall::ListMemberships(_) => Operation::ListMemberships,
            ApiCall::ListNonMembers(_) => Operation::ListNonMembers,
            ApiCall::AddMembers { .. } => Operation::AddMembers,
            ApiCall::TaskAnalytics => Operation::TaskAnalytics,
        }
    }
}

#[derive(Debug)]
struct MockState {
    project: ProjectDetail,
    owner: Option<UserSummary>,
    non_members: Vec<UserSummary>,
    failures: HashMap<Operation, VecDeque<ClientError>>,
    latency: HashMap<Operation, Duration>,
    calls: Vec<ApiCall>,
}

impl MockState {
    fn project(&self, project_id: Uuid) -> ClientResult<&ProjectDetail> {
        if self.project.id == project_id {
            Ok(&self.project)
        } else {
            Err(ClientError::NotFound("Project not found".to_string()))
        }
    }

    fn task_mut(&mut self, project_id: Uuid, task_id: Uuid) -> ClientResult<&mut TaskWithAssignee> {
        self.project(project_id)?;
        self.project
            .tasks
            .iter_mut()
            .find(|t| t.id == task_id)
            .ok_or_else(|| ClientError::NotFound("Task not found".to_string()))
    }

    /// Owner or current member with this id
    fn assignable(&self, user_id: Uuid) -> Option<UserSummary> {
        self.owner
            .iter()
            .filter(|o| o.id == self.project.owner_id)
            .chain(self.project.memberships.iter().map(|m| &m.user))
            .find(|u| u.id == user_id)
            .cloned()
    }

    fn resolve_assignee(&self, assignee_id: Option<Uuid>) -> ClientResult<Option<UserSummary>> {
        assignee_id
            .map(|user_id| {
                self.assignable(user_id).ok_or_else(|| ClientError::Validation {
                    message: "Assignee must be the project owner or a member".to_string(),
                    details: Vec::new(),
                })
            })
            .transpose()
    }
}

/// In-memory project server
#[derive(Debug)]
pub struct MockProjectApi {
    state: Mutex<MockState>,
}

impl MockProjectApi {
    /// Serves `project` as the only project
    pub fn new(project: ProjectDetail) -> Self {
        Self {
            state: Mutex::new(MockState {
                project,
                owner: None,
                non_members: Vec::new(),
                failures: HashMap::new(),
                latency: HashMap::new(),
                calls: Vec::new(),
            }),
        }
    }

    /// Registers the owner's account so it can be chosen as assignee
    pub fn with_owner(mut self, owner: UserSummary) -> Self {
        self.state.get_mut().owner = Some(owner);
        self
    }

    /// Users returned by `list_non_members`
    pub fn with_non_members(mut self, users: Vec<UserSummary>) -> Self {
        self.state.get_mut().non_members = users;
        self
    }

    /// Makes the next call of `operation` fail with `error`
    ///
    /// Failures queue up; each call consumes one.
    pub async fn fail_next(&self, operation: Operation, error: ClientError) {
        self.state
            .lock()
            .await
            .failures
            .entry(operation)
            .or_default()
            .push_back(error);
    }

    /// Delays every call of `operation` by `delay`
    pub async fn set_latency(&self, operation: Operation, delay: Duration) {
        self.state.lock().await.latency.insert(operation, delay);
    }

    /// All calls received so far
    pub async fn calls(&self) -> Vec<ApiCall> {
        self.state.lock().await.calls.clone()
    }

    /// Calls of a single operation
    pub async fn calls_of(&self, operation: Operation) -> Vec<ApiCall> {
        self.calls()
            .await
            .into_iter()
            .filter(|c| c.operation() == operation)
            .collect()
    }

    /// Current server-side truth
    pub async fn project(&self) -> ProjectDetail {
        self.state.lock().await.project.clone()
    }

    /// Overwrites a task's status without recording a call
    pub async fn force_status(&self, task_id: Uuid, status: TaskStatus) {
        let mut state = self.state.lock().await;
        if let Some(task) = state.project.tasks.iter_mut().find(|t| t.id == task_id) {
            task.status = status;
        }
    }

    /// Records the call, waits out any latency, then pops a scripted failure
    async fn begin(&self, call: ApiCall) -> ClientResult<()> {
        let operation = call.operation();
        let delay = {
            let mut state = self.state.lock().await;
            state.calls.push(call);
            state.latency.get(&operation).copied()
        };

        if let Some(delay) = delay {
            tokio::time::sleep(delay).await;
        }

        let mut state = self.state.lock().await;
        match state.failures.get_mut(&operation).and_then(VecDeque::pop_front) {
            Some(error) => Err(error),
            None => Ok(()),
        }
    }
}

#[async_trait]
impl ProjectApi for MockProjectApi {
    async fn fetch_project(&self, project_id: Uuid) -> ClientResult<ProjectDetail> {
        self.begin(ApiCall::FetchProject(project_id)).await?;

        let state = self.state.lock().await;
        state.project(project_id).cloned()
    }

    async fn update_task_status(
        &self,
        project_id: Uuid,
        task_id: Uuid,
        status: TaskStatus,
    ) -> ClientResult<()> {
        self.begin(ApiCall::UpdateTaskStatus {
            project_id,
            task_id,
            status,
        })
        .await?;

        let mut state = self.state.lock().await;
        state.task_mut(project_id, task_id)?.status = status;
        Ok(())
    }

    async fn create_task(
        &self,
        project_id: Uuid,
        input: &CreateTaskInput,
    ) -> ClientResult<TaskWithAssignee> {
        self.begin(ApiCall::CreateTask {
            project_id,
            input: input.clone(),
        })
        .await?;

        let mut state = self.state.lock().await;
        state.project(project_id)?;
        let assignee = state.resolve_assignee(input.assignee_id)?;

        let task = TaskWithAssignee {
            id: Uuid::new_v4(),
            title: input.title.clone(),
            description: input.description.clone().unwrap_or_default(),
            status: input.status,
            assignee,
        };
        state.project.tasks.push(task.clone());
        Ok(task)
    }

    async fn get_task(&self, project_id: Uuid, task_id: Uuid) -> ClientResult<TaskWithAssignee> {
        self.begin(ApiCall::GetTask {
            project_id,
            task_id,
        })
        .await?;

        let mut state = self.state.lock().await;
        state.task_mut(project_id, task_id).map(|t| t.clone())
    }

    async fn update_task(
        &self,
        project_id: Uuid,
        task_id: Uuid,
        input: &UpdateTaskInput,
    ) -> ClientResult<TaskWithAssignee> {
        self.begin(ApiCall::UpdateTask {
            project_id,
            task_id,
            input: input.clone(),
        })
        .await?;

        let mut state = self.state.lock().await;
        let assignee = state.resolve_assignee(input.assignee_id)?;

        let task = state.task_mut(project_id, task_id)?;
        if let Some(title) = &input.title {
            task.title = title.clone();
        }
        if let Some(description) = &input.description {
            task.description = description.clone();
        }
        if let Some(status) = input.status {
            task.status = status;
        }
        task.assignee = assignee;

        Ok(task.clone())
    }

    async fn delete_task(&self, project_id: Uuid, task_id: Uuid) -> ClientResult<()> {
        self.begin(ApiCall::DeleteTask {
            project_id,
            task_id,
        })
        .await?;

        let mut state = self.state.lock().await;
        state.project(project_id)?;

        let before = state.project.tasks.len();
        state.project.tasks.retain(|t| t.id != task_id);
        if state.project.tasks.len() == before {
            return Err(ClientError::NotFound("Task not found".to_string()));
        }
        Ok(())
    }

    async fn list_memberships(&self, project_id: Uuid) -> ClientResult<Vec<MembershipWithUser>> {
        self.begin(ApiCall::ListMemberships(project_id)).await?;

        let state = self.state.lock().await;
        Ok(state.project(project_id)?.memberships.clone())
    }

    async fn list_non_members(&self, project_id: Uuid) -> ClientResult<Vec<UserSummary>> {
        self.begin(ApiCall::ListNonMembers(project_id)).await?;

        let state = self.state.lock().await;
        state.project(project_id)?;
        Ok(state.non_members.clone())
    }

    async fn add_members(&self, project_id: Uuid, users: &[UserSummary]) -> ClientResult<u64> {
        self.begin(ApiCall::AddMembers {
            project_id,
            user_ids: users.iter().map(|u| u.id).collect(),
        })
        .await?;

        let mut state = self.state.lock().await;
        state.project(project_id)?;

        let mut added = 0;
        for user in users {
            let already = user.id == state.project.owner_id
                || state.project.memberships.iter().any(|m| m.user_id == user.id);
            if already {
                continue;
            }

            state.project.memberships.push(MembershipWithUser {
                user_id: user.id,
                user: user.clone(),
            });
            state.non_members.retain(|u| u.id != user.id);
            added += 1;
        }

        Ok(added)
    }

    async fn task_analytics(&self) -> ClientResult<Vec<ProjectTaskCounts>> {
        self.begin(ApiCall::TaskAnalytics).await?;

        let state = self.state.lock().await;
        let project = &state.project;
        let count = |status: TaskStatus| {
            project.tasks.iter().filter(|t| t.status == status).count() as i64
        };

        Ok(vec![ProjectTaskCounts {
            project: ProjectSummary {
                id: project.id,
                name: project.name.clone(),
                image: project.image.clone(),
                created_at: project.created_at,
            },
            todo: count(TaskStatus::Todo),
            in_progress: count(TaskStatus::InProgress),
            done: count(TaskStatus::Done),
        }])
    }
}

/// Builds a project with one unassigned task per `(title, status)`, in order
pub fn project_fixture(tasks: &[(&str, TaskStatus)]) -> ProjectDetail {
    ProjectDetail {
        id: Uuid::new_v4(),
        name: "Fixture".to_string(),
        image: DEFAULT_PROJECT_IMAGE.to_string(),
        created_at: Utc::now(),
        owner_id: Uuid::new_v4(),
        tasks: tasks
            .iter()
            .map(|(title, status)| TaskWithAssignee {
                id: Uuid::new_v4(),
                title: title.to_string(),
                description: String::new(),
                status: *status,
                assignee: None,
            })
            .collect(),
        memberships: Vec::new(),
    }
}
