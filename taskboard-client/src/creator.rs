//! New task dialog
//!
//! Opens from a board column and creates the task in that column's status.
//! Success invalidates the project query; the board picks the new task up on its
//! next [`crate::board::BoardController::revalidate`].

use taskboard_shared::{
    models::task::{TaskStatus, TaskWithAssignee},
    validation::{validate_input, CreateTaskInput, FieldError},
};
use uuid::Uuid;

use crate::api::ProjectApi;
use crate::cache::{QueryCache, QueryKey};
use crate::editor::MembershipPicker;
use crate::error::{ClientError, ClientResult};
use crate::toast::ToastCenter;

/// Create-task form bound to one column
#[derive(Debug, Clone)]
pub struct TaskCreator {
    project_id: Uuid,
    status: TaskStatus,
    title: String,
    description: String,
    picker: MembershipPicker,
    errors: Vec<FieldError>,
    open: bool,
}

impl TaskCreator {
    /// Loads the member list for the assignee picker
    pub async fn open(
        api: &dyn ProjectApi,
        cache: &QueryCache,
        project_id: Uuid,
        status: TaskStatus,
    ) -> ClientResult<Self> {
        let memberships = api.list_memberships(project_id).await?;
        cache.mark_fresh(QueryKey::Memberships(project_id));

        let options = memberships.into_iter().map(|m| m.user).collect();

        Ok(Self {
            project_id,
            status,
            title: String::new(),
            description: String::new(),
            picker: MembershipPicker::new(options, None),
            errors: Vec::new(),
            open: true,
        })
    }

    pub fn status(&self) -> TaskStatus {
        self.status
    }

    /// Dialog title, e.g. `Add in progress Tasks`
    pub fn heading(&self) -> String {
        format!(
            "Add {} Tasks",
            self.status.as_str().to_lowercase().replace('_', " ")
        )
    }

    pub fn picker(&self) -> &MembershipPicker {
        &self.picker
    }

    pub fn is_open(&self) -> bool {
        self.open
    }

    pub fn set_title(&mut self, title: impl Into<String>) {
        self.title = title.into();
        self.errors.retain(|e| e.field != "title");
    }

    pub fn set_description(&mut self, description: impl Into<String>) {
        self.description = description.into();
        self.errors.retain(|e| e.field != "description");
    }

    pub fn search_assignee(&mut self, query: impl Into<String>) {
        self.picker.search(query);
    }

    pub fn select_assignee(&mut self, user_id: Uuid) -> bool {
        self.picker.select(user_id)
    }

    pub fn clear_assignee(&mut self) {
        self.picker.clear();
    }

    fn to_input(&self) -> CreateTaskInput {
        let description = self.description.trim();

        CreateTaskInput {
            title: self.title.trim().to_string(),
            description: (!description.is_empty()).then(|| self.description.clone()),
            status: self.status,
            assignee_id: self.picker.selected().map(|u| u.id),
        }
    }

    /// Checks the form and records inline errors
    pub fn validate(&mut self) -> Result<CreateTaskInput, Vec<FieldError>> {
        let input = self.to_input();
        match validate_input(&input) {
            Ok(()) => {
                self.errors.clear();
                Ok(input)
            }
            Err(errors) => {
                self.errors = errors.clone();
                Err(errors)
            }
        }
    }

    pub fn field_error(&self, field: &str) -> Option<&str> {
        self.errors
            .iter()
            .find(|e| e.field == field)
            .map(|e| e.message.as_str())
    }

    /// Creates the task
    ///
    /// Invalid input never reaches the network. On success the form resets and
    /// the dialog closes.
    pub async fn submit(
        &mut self,
        api: &dyn ProjectApi,
        cache: &QueryCache,
        toasts: &ToastCenter,
    ) -> ClientResult<TaskWithAssignee> {
        let input = self.validate().map_err(ClientError::invalid)?;

        match api.create_task(self.project_id, &input).await {
            Ok(task) => {
                cache.invalidate(QueryKey::Project(self.project_id));
                toasts.success(
                    format!(
                        "Successfully added task to {}!",
                        self.status.as_str().to_lowercase()
                    ),
                    None,
                );

                self.title.clear();
                self.description.clear();
                self.picker.clear();
                self.open = false;

                tracing::info!(task_id = %task.id, status = %self.status, "Task created");
                Ok(task)
            }
            Err(error) => {
                self.errors = error.details().to_vec();
                toasts.error(format!("Failed to add task: {}", error), None, None);
                Err(error)
            }
        }
    }
}
