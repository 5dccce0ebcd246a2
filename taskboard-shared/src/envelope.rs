//! Uniform response envelope
//!
//! Every response body produced by the API, success or failure, has the shape
//!
//! ```json
//! { "status": true, "data": { ... } }
//! { "status": false, "error": "Task not found" }
//! ```
//!
//! Callers branch on the HTTP status code first; a non-2xx response always carries
//! `status: false` and a populated `error`. Validation failures additionally carry
//! per-field `details`.

use serde::{Deserialize, Serialize};

use crate::validation::FieldError;

/// Response envelope wrapping every API payload
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ApiEnvelope<T> {
    /// True on success
    pub status: bool,

    /// Payload (success only)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,

    /// Human-readable failure message (failure only)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,

    /// Per-field validation failures
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<Vec<FieldError>>,
}

impl<T> ApiEnvelope<T> {
    /// Successful envelope carrying `data`
    pub fn ok(data: T) -> Self {
        Self {
            status: true,
            data: Some(data),
            error: None,
            details: None,
        }
    }

    /// Failed envelope carrying an error message
    pub fn err(message: impl Into<String>) -> Self {
        Self {
            status: false,
            data: None,
            error: Some(message.into()),
            details: None,
        }
    }

    /// Failed envelope carrying field-level validation failures
    pub fn invalid(message: impl Into<String>, details: Vec<FieldError>) -> Self {
        Self {
            status: false,
            data: None,
            error: Some(message.into()),
            details: Some(details),
        }
    }

    /// Converts the envelope into a `Result`, keeping the server message on failure
    pub fn into_result(self) -> Result<Option<T>, String> {
        if self.status {
            Ok(self.data)
        } else {
            Err(self
                .error
                .unwrap_or_else(|| "Request failed".to_string()))
        }
    }
}
