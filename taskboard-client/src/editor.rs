//! Task detail editor
//!
//! Opens from the board for one task. The form is hydrated from a fresh fetch of
//! the task, never from the board's local copy, which may hold an unconfirmed
//! status. Saving or deleting invalidates the project, its memberships and the
//! task, so every view showing them refetches.

use taskboard_shared::{
    models::{
        task::{TaskStatus, TaskWithAssignee},
        user::UserSummary,
    },
    validation::{validate_input, FieldError, UpdateTaskInput},
};
use uuid::Uuid;

use crate::api::ProjectApi;
use crate::cache::{QueryCache, QueryKey};
use crate::error::{ClientError, ClientResult};
use crate::toast::ToastCenter;

pub const TASK_SAVED_MESSAGE: &str = "Task saved successfully!";
pub const TASK_DELETED_MESSAGE: &str = "Task deleted successfully!";

/// Editable task fields
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TaskForm {
    pub title: String,
    pub description: String,
    pub status: TaskStatus,
    pub assignee_id: Option<Uuid>,
}

impl TaskForm {
    fn from_task(task: &TaskWithAssignee) -> Self {
        Self {
            title: task.title.clone(),
            description: task.description.clone(),
            status: task.status,
            assignee_id: task.assignee.as_ref().map(|u| u.id),
        }
    }

    /// Full mutable field set, title trimmed
    pub fn to_input(&self) -> UpdateTaskInput {
        UpdateTaskInput {
            title: Some(self.title.trim().to_string()),
            description: Some(self.description.clone()),
            status: Some(self.status),
            assignee_id: self.assignee_id,
        }
    }
}

/// Searchable single-select over the project's members
#[derive(Debug, Clone, Default)]
pub struct MembershipPicker {
    options: Vec<UserSummary>,
    query: String,
    selected: Option<Uuid>,
}

impl MembershipPicker {
    pub fn new(options: Vec<UserSummary>, selected: Option<Uuid>) -> Self {
        Self {
            options,
            query: String::new(),
            selected,
        }
    }

    pub fn search(&mut self, query: impl Into<String>) {
        self.query = query.into();
    }

    /// Options whose email contains the query, case-insensitively
    pub fn visible(&self) -> Vec<&UserSummary> {
        let query = self.query.trim().to_lowercase();
        self.options
            .iter()
            .filter(|u| query.is_empty() || u.email.to_lowercase().contains(&query))
            .collect()
    }

    /// Selects a listed user; false if `user_id` is not an option
    pub fn select(&mut self, user_id: Uuid) -> bool {
        if !self.options.iter().any(|u| u.id == user_id) {
            return false;
        }
        self.selected = Some(user_id);
        true
    }

    pub fn clear(&mut self) {
        self.selected = None;
    }

    pub fn selected(&self) -> Option<&UserSummary> {
        self.selected
            .and_then(|id| self.options.iter().find(|u| u.id == id))
    }
}

/// Detail dialog for a single task
#[derive(Debug, Clone)]
pub struct TaskDetailEditor {
    project_id: Uuid,
    task_id: Uuid,
    form: TaskForm,
    picker: MembershipPicker,
    errors: Vec<FieldError>,
    confirming_delete: bool,
    open: bool,
}

impl TaskDetailEditor {
    /// Fetches the task and the member list and fills the form
    pub async fn open(
        api: &dyn ProjectApi,
        cache: &QueryCache,
        project_id: Uuid,
        task_id: Uuid,
    ) -> ClientResult<Self> {
        let (task, memberships) = tokio::try_join!(
            api.get_task(project_id, task_id),
            api.list_memberships(project_id)
        )?;
        cache.mark_fresh(QueryKey::Task(task_id));
        cache.mark_fresh(QueryKey::Memberships(project_id));

        let mut options: Vec<UserSummary> = memberships.into_iter().map(|m| m.user).collect();

        // Keep a current assignee who is not a member (the owner) selectable
        if let Some(assignee) = &task.assignee {
            if !options.iter().any(|u| u.id == assignee.id) {
                options.insert(0, assignee.clone());
            }
        }

        let form = TaskForm::from_task(&task);
        let picker = MembershipPicker::new(options, form.assignee_id);

        Ok(Self {
            project_id,
            task_id,
            form,
            picker,
            errors: Vec::new(),
            confirming_delete: false,
            open: true,
        })
    }

    pub fn task_id(&self) -> Uuid {
        self.task_id
    }

    pub fn form(&self) -> &TaskForm {
        &self.form
    }

    pub fn picker(&self) -> &MembershipPicker {
        &self.picker
    }

    pub fn is_open(&self) -> bool {
        self.open
    }

    pub fn set_title(&mut self, title: impl Into<String>) {
        self.form.title = title.into();
        self.clear_error("title");
    }

    pub fn set_description(&mut self, description: impl Into<String>) {
        self.form.description = description.into();
        self.clear_error("description");
    }

    pub fn set_status(&mut self, status: TaskStatus) {
        self.form.status = status;
    }

    pub fn search_assignee(&mut self, query: impl Into<String>) {
        self.picker.search(query);
    }

    /// Picks the assignee from the member list
    pub fn select_assignee(&mut self, user_id: Uuid) -> bool {
        let selected = self.picker.select(user_id);
        if selected {
            self.form.assignee_id = Some(user_id);
        }
        selected
    }

    pub fn clear_assignee(&mut self) {
        self.picker.clear();
        self.form.assignee_id = None;
    }

    /// Checks the form and records inline errors
    pub fn validate(&mut self) -> Result<UpdateTaskInput, Vec<FieldError>> {
        let input = self.form.to_input();
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

    pub fn errors(&self) -> &[FieldError] {
        &self.errors
    }

    /// First inline error for `field`
    pub fn field_error(&self, field: &str) -> Option<&str> {
        self.errors
            .iter()
            .find(|e| e.field == field)
            .map(|e| e.message.as_str())
    }

    fn clear_error(&mut self, field: &str) {
        self.errors.retain(|e| e.field != field);
    }

    /// Saves the form
    ///
    /// Invalid input never reaches the network. On success the editor closes.
    pub async fn submit(
        &mut self,
        api: &dyn ProjectApi,
        cache: &QueryCache,
        toasts: &ToastCenter,
    ) -> ClientResult<TaskWithAssignee> {
        let input = self.validate().map_err(ClientError::invalid)?;

        match api.update_task(self.project_id, self.task_id, &input).await {
            Ok(task) => {
                self.invalidate(cache);
                toasts.success(TASK_SAVED_MESSAGE, None);
                self.open = false;

                tracing::info!(task_id = %self.task_id, "Task saved");
                Ok(task)
            }
            Err(error) => {
                self.errors = error.details().to_vec();
                toasts.error(format!("Failed to save task: {}", error), None, None);
                Err(error)
            }
        }
    }

    /// Asks for delete confirmation
    pub fn request_delete(&mut self) {
        self.confirming_delete = true;
    }

    pub fn cancel_delete(&mut self) {
        self.confirming_delete = false;
    }

    pub fn is_confirming_delete(&self) -> bool {
        self.confirming_delete
    }

    /// Deletes the task if deletion was requested first
    ///
    /// Returns `Ok(false)` without a request when no confirmation is pending.
    pub async fn confirm_delete(
        &mut self,
        api: &dyn ProjectApi,
        cache: &QueryCache,
        toasts: &ToastCenter,
    ) -> ClientResult<bool> {
        if !self.confirming_delete {
            return Ok(false);
        }
        self.confirming_delete = false;

        match api.delete_task(self.project_id, self.task_id).await {
            Ok(()) => {
                self.invalidate(cache);
                toasts.success(TASK_DELETED_MESSAGE, None);
                self.open = false;

                tracing::info!(task_id = %self.task_id, "Task deleted");
                Ok(true)
            }
            Err(error) => {
                toasts.error(format!("Failed to delete task: {}", error), None, None);
                Err(error)
            }
        }
    }

    fn invalidate(&self, cache: &QueryCache) {
        cache.invalidate(QueryKey::Project(self.project_id));
        cache.invalidate(QueryKey::Memberships(self.project_id));
        cache.invalidate(QueryKey::Task(self.task_id));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mock::{project_fixture, MockProjectApi, Operation};
    use crate::toast::ToastKind;
    use taskboard_shared::models::membership::MembershipWithUser;

    fn member(email: &str) -> MembershipWithUser {
        let id = Uuid::new_v4();
        MembershipWithUser {
            user_id: id,
            user: UserSummary {
                id,
                email: email.to_string(),
            },
        }
    }

    async fn setup() -> (MockProjectApi, QueryCache, ToastCenter, TaskDetailEditor) {
        let mut project = project_fixture(&[("Write docs", TaskStatus::Todo)]);
        project.memberships = vec![member("alice@example.com"), member("bob@example.com")];

        let api = MockProjectApi::new(project.clone());
        let cache = QueryCache::new();
        let editor = TaskDetailEditor::open(&api, &cache, project.id, project.tasks[0].id)
            .await
            .unwrap();

        (api, cache, ToastCenter::new(), editor)
    }

    #[tokio::test]
    async fn test_open_hydrates_from_server() {
        let project = project_fixture(&[("Write docs", TaskStatus::Todo)]);
        let task_id = project.tasks[0].id;
        let api = MockProjectApi::new(project.clone());
        api.force_status(task_id, TaskStatus::Done).await;

        let editor = TaskDetailEditor::open(&api, &QueryCache::new(), project.id, task_id)
            .await
            .unwrap();

        assert_eq!(editor.form().title, "Write docs");
        assert_eq!(editor.form().status, TaskStatus::Done);
        assert!(editor.is_open());
    }

    #[tokio::test]
    async fn test_empty_title_blocks_submit() {
        let (api, cache, toasts, mut editor) = setup().await;
        editor.set_title("   ");

        let err = editor.submit(&api, &cache, &toasts).await.unwrap_err();

        assert_eq!(err.kind(), crate::error::ErrorKind::Validation);
        assert_eq!(editor.field_error("title"), Some("Title is required"));
        assert!(api.calls_of(Operation::UpdateTask).await.is_empty());
        assert!(toasts.snapshot().is_empty());
        assert!(editor.is_open());
    }

    #[tokio::test]
    async fn test_long_description_rejected() {
        let (api, cache, toasts, mut editor) = setup().await;
        editor.set_description("x".repeat(201));

        assert!(editor.submit(&api, &cache, &toasts).await.is_err());
        assert_eq!(editor.field_error("description"), Some("Description too long"));
        assert!(api.calls_of(Operation::UpdateTask).await.is_empty());

        editor.set_description("x".repeat(200));
        assert!(editor.field_error("description").is_none());
        assert!(editor.validate().is_ok());
    }

    #[tokio::test]
    async fn test_submit_invalidates_and_closes() {
        let (api, cache, toasts, mut editor) = setup().await;
        let project_id = api.project().await.id;

        editor.search_assignee("BOB");
        let bob = editor.picker().visible()[0].id;
        assert!(editor.select_assignee(bob));
        editor.set_title("  Write more docs ");
        editor.set_status(TaskStatus::InProgress);

        let task = editor.submit(&api, &cache, &toasts).await.unwrap();

        assert_eq!(task.title, "Write more docs");
        assert_eq!(task.status, TaskStatus::InProgress);
        assert_eq!(task.assignee.map(|u| u.id), Some(bob));
        assert_eq!(
            cache.invalidations(),
            vec![
                QueryKey::Project(project_id),
                QueryKey::Memberships(project_id),
                QueryKey::Task(editor.task_id()),
            ]
        );
        assert_eq!(toasts.latest().unwrap().message, TASK_SAVED_MESSAGE);
        assert!(!editor.is_open());
    }

    #[tokio::test]
    async fn test_server_rejection_keeps_editor_open() {
        let (api, cache, toasts, mut editor) = setup().await;
        api.fail_next(
            Operation::UpdateTask,
            ClientError::Unauthorized("Not a member of this project".into()),
        )
        .await;

        assert!(editor.submit(&api, &cache, &toasts).await.is_err());

        let toast = toasts.latest().unwrap();
        assert_eq!(toast.kind, ToastKind::Error);
        assert_eq!(toast.message, "Failed to save task: Not a member of this project");
        assert!(cache.invalidations().is_empty());
        assert!(editor.is_open());
    }

    #[tokio::test]
    async fn test_delete_requires_confirmation() {
        let (api, cache, toasts, mut editor) = setup().await;

        assert!(!editor.confirm_delete(&api, &cache, &toasts).await.unwrap());
        assert!(api.calls_of(Operation::DeleteTask).await.is_empty());

        editor.request_delete();
        editor.cancel_delete();
        assert!(!editor.confirm_delete(&api, &cache, &toasts).await.unwrap());

        editor.request_delete();
        assert!(editor.confirm_delete(&api, &cache, &toasts).await.unwrap());

        assert!(api.project().await.tasks.is_empty());
        assert_eq!(cache.invalidations().len(), 3);
        assert_eq!(toasts.latest().unwrap().message, TASK_DELETED_MESSAGE);
        assert!(!editor.is_open());
    }

    #[test]
    fn test_picker_rejects_unknown_user() {
        let alice = member("alice@example.com").user;
        let mut picker = MembershipPicker::new(vec![alice.clone()], None);

        assert!(!picker.select(Uuid::new_v4()));
        assert!(picker.selected().is_none());

        assert!(picker.select(alice.id));
        assert_eq!(picker.selected(), Some(&alice));

        picker.search("carol");
        assert!(picker.visible().is_empty());
    }
}
