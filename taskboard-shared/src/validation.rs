//! Form validation rules
//!
//! These inputs are the request bodies accepted by the API. The server validates
//! them authoritatively; the client runs the same rules before sending anything so
//! that a validation failure never costs a network round trip.
//!
//! # Example
//!
//! ```
//! use taskboard_shared::validation::{validate_input, UpdateTaskInput};
//!
//! let input = UpdateTaskInput {
//!     title: Some(String::new()),
//!     ..Default::default()
//! };
//!
//! let errors = validate_input(&input).unwrap_err();
//! assert_eq!(errors[0].field, "title");
//! assert_eq!(errors[0].message, "Title is required");
//! ```

use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::{Validate, ValidationErrors};

use crate::models::{task::TaskStatus, user::UserSummary};

/// Maximum description length accepted for a task
pub const DESCRIPTION_MAX_LEN: u64 = 200;

/// A single field-level validation failure
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldError {
    /// Field that failed validation
    pub field: String,

    /// Error message
    pub message: String,
}

impl FieldError {
    pub fn new(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            message: message.into(),
        }
    }
}

/// Registration form
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct RegisterInput {
    #[validate(email(message = "Invalid email address"))]
    pub email: String,

    #[validate(length(min = 8, message = "Password must be at least 8 characters long"))]
    pub password: String,

    #[validate(must_match(other = "password", message = "Passwords do not match"))]
    pub confirm_password: String,
}

/// Login form
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct LoginInput {
    #[validate(email(message = "Invalid email address"))]
    pub email: String,

    #[validate(length(min = 8, message = "Password must be at least 8 characters long"))]
    pub password: String,
}

/// New project form
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct CreateProjectInput {
    #[validate(length(
        min = 3,
        max = 16,
        message = "Project name must be between 3 and 16 characters long"
    ))]
    pub name: String,
}

/// New task form
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Validate)]
pub struct CreateTaskInput {
    #[validate(length(min = 1, message = "Title is required"))]
    pub title: String,

    #[validate(length(max = 200, message = "Description too long"))]
    #[serde(default)]
    pub description: Option<String>,

    pub status: TaskStatus,

    #[serde(default)]
    pub assignee_id: Option<Uuid>,
}

/// Task edit form
///
/// Title, description and status are partial: `None` leaves the stored value as is.
/// The assignee is always written, so `None` clears it.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, Validate)]
pub struct UpdateTaskInput {
    #[validate(length(min = 1, message = "Title is required"))]
    #[serde(default)]
    pub title: Option<String>,

    #[validate(length(max = 200, message = "Description too long"))]
    #[serde(default)]
    pub description: Option<String>,

    #[serde(default)]
    pub status: Option<TaskStatus>,

    #[serde(default)]
    pub assignee_id: Option<Uuid>,
}

/// Body of the status-persist request issued after a drag-and-drop
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct UpdateTaskStatusInput {
    pub status: TaskStatus,
}

/// Bulk membership invitation
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct AddMembersInput {
    #[validate(length(min = 1, message = "Please select at least one user to add."))]
    pub users: Vec<UserSummary>,
}

/// Flattens `validator` errors into a stable, field-sorted list
pub fn field_errors(errors: &ValidationErrors) -> Vec<FieldError> {
    let mut out: Vec<FieldError> = errors
        .field_errors()
        .iter()
        .flat_map(|(field, errs)| {
            errs.iter().map(move |error| FieldError {
                field: field.to_string(),
                message: error
                    .message
                    .as_ref()
                    .map(|m| m.to_string())
                    .unwrap_or_else(|| format!("Invalid {}", field)),
            })
        })
        .collect();

    out.sort_by(|a, b| a.field.cmp(&b.field));
    out
}

/// Runs `Validate` and converts failures with [`field_errors`]
pub fn validate_input<T: Validate>(input: &T) -> Result<(), Vec<FieldError>> {
    input.validate().map_err(|e| field_errors(&e))
}
