//! Member invitation
//!
//! Lists the users that are not yet part of a project, lets the owner build up a
//! selection, and adds them in one request. A successful add invalidates both
//! the invite list and the member list so assignee pickers pick up the change.

use taskboard_shared::{
    models::user::UserSummary,
    validation::{validate_input, AddMembersInput},
};
use uuid::Uuid;

use crate::api::ProjectApi;
use crate::cache::{QueryCache, QueryKey};
use crate::error::{ClientError, ClientResult};
use crate::toast::ToastCenter;

#[derive(Debug, Clone)]
pub struct InviteFlow {
    project_id: Uuid,
    candidates: Vec<UserSummary>,
    query: String,

    /// Selection in the order users were picked
    selected: Vec<Uuid>,
    error: Option<String>,
}

impl InviteFlow {
    /// Fetches the users that can still be invited
    pub async fn load(
        api: &dyn ProjectApi,
        cache: &QueryCache,
        project_id: Uuid,
    ) -> ClientResult<Self> {
        let candidates = api.list_non_members(project_id).await?;
        cache.mark_fresh(QueryKey::NonMemberships(project_id));

        Ok(Self {
            project_id,
            candidates,
            query: String::new(),
            selected: Vec::new(),
            error: None,
        })
    }

    pub fn search(&mut self, query: impl Into<String>) {
        self.query = query.into();
    }

    /// Candidates matching the search, case-insensitively on email
    pub fn visible(&self) -> Vec<&UserSummary> {
        let query = self.query.trim().to_lowercase();
        self.candidates
            .iter()
            .filter(|u| query.is_empty() || u.email.to_lowercase().contains(&query))
            .collect()
    }

    /// Flips a user's selection; returns whether they are now selected
    pub fn toggle(&mut self, user_id: Uuid) -> bool {
        if let Some(pos) = self.selected.iter().position(|id| *id == user_id) {
            self.selected.remove(pos);
            return false;
        }

        if !self.candidates.iter().any(|u| u.id == user_id) {
            return false;
        }

        self.selected.push(user_id);
        self.error = None;
        true
    }

    pub fn is_selected(&self, user_id: Uuid) -> bool {
        self.selected.contains(&user_id)
    }

    pub fn selected(&self) -> Vec<UserSummary> {
        self.selected
            .iter()
            .filter_map(|id| self.candidates.iter().find(|u| u.id == *id))
            .cloned()
            .collect()
    }

    /// Inline error shown under the picker
    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    /// Adds the selected users as members
    ///
    /// An empty selection is rejected without a request. Returns the number of
    /// users the server actually added.
    pub async fn submit(
        &mut self,
        api: &dyn ProjectApi,
        cache: &QueryCache,
        toasts: &ToastCenter,
    ) -> ClientResult<u64> {
        let input = AddMembersInput {
            users: self.selected(),
        };

        if let Err(details) = validate_input(&input) {
            let error = ClientError::invalid(details);
            self.error = Some(error.to_string());
            toasts.error(error.to_string(), None, None);
            return Err(error);
        }

        match api.add_members(self.project_id, &input.users).await {
            Ok(added) => {
                toasts.success(
                    format!(
                        "Successfully added {} members to the project!",
                        input.users.len()
                    ),
                    None,
                );
                cache.invalidate(QueryKey::NonMemberships(self.project_id));
                cache.invalidate(QueryKey::Memberships(self.project_id));

                tracing::info!(
                    project_id = %self.project_id,
                    selected = input.users.len(),
                    added,
                    "Members invited"
                );

                self.selected.clear();
                Ok(added)
            }
            Err(error) => {
                toasts.error(format!("Failed to add members: {}", error), None, None);
                Err(error)
            }
        }
    }
}
