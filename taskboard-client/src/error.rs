//! Client error taxonomy
//!
//! Every failure a board component can see falls into one of four kinds. None of
//! them is retried automatically; the user repeats the action.

use taskboard_shared::validation::FieldError;

/// Client result type alias
pub type ClientResult<T> = Result<T, ClientError>;

/// Client error
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ClientError {
    /// Input rejected, either before sending or by the server (400, 409, 422)
    #[error("{message}")]
    Validation {
        message: String,
        details: Vec<FieldError>,
    },

    /// Not signed in, or not owner/member (401, 403)
    #[error("{0}")]
    Unauthorized(String),

    /// Stale project or task reference (404)
    #[error("{0}")]
    NotFound(String),

    /// Server-side failure (5xx and anything unexpected)
    #[error("{message}")]
    Server { status: u16, message: String },

    /// Request never completed
    #[error("Network error: {0}")]
    Network(String),

    /// Response did not match the envelope contract
    #[error("Invalid response: {0}")]
    Decode(String),
}

/// Error kind, as surfaced to the user
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// Shown inline next to the offending field
    Validation,
    /// Toast, no retry
    Authorization,
    /// Toast, no retry
    NotFound,
    /// Toast, no retry, no rollback
    Transient,
}

impl ClientError {
    /// Builds the error for a non-2xx response
    pub fn from_status(status: u16, message: String, details: Option<Vec<FieldError>>) -> Self {
        match status {
            400 | 409 | 422 => ClientError::Validation {
                message,
                details: details.unwrap_or_default(),
            },
            401 | 403 => ClientError::Unauthorized(message),
            404 => ClientError::NotFound(message),
            _ => ClientError::Server { status, message },
        }
    }

    /// Validation failure caught before any request was sent
    pub fn invalid(details: Vec<FieldError>) -> Self {
        let message = details
            .first()
            .map(|d| d.message.clone())
            .unwrap_or_else(|| "Invalid input".to_string());

        ClientError::Validation { message, details }
    }

    pub fn kind(&self) -> ErrorKind {
        match self {
            ClientError::Validation { .. } => ErrorKind::Validation,
            ClientError::Unauthorized(_) => ErrorKind::Authorization,
            ClientError::NotFound(_) => ErrorKind::NotFound,
            ClientError::Server { .. } | ClientError::Network(_) | ClientError::Decode(_) => {
                ErrorKind::Transient
            }
        }
    }

    /// Field-level details, if any
    pub fn details(&self) -> &[FieldError] {
        match self {
            ClientError::Validation { details, .. } => details,
            _ => &[],
        }
    }
}

impl From<reqwest::Error> for ClientError {
    fn from(err: reqwest::Error) -> Self {
        ClientError::Network(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_mapping() {
        assert_eq!(
            ClientError::from_status(422, "Title is required".into(), None).kind(),
            ErrorKind::Validation
        );
        assert_eq!(
            ClientError::from_status(403, "nope".into(), None).kind(),
            ErrorKind::Authorization
        );
        assert_eq!(
            ClientError::from_status(404, "Task not found".into(), None).kind(),
            ErrorKind::NotFound
        );
        assert_eq!(
            ClientError::from_status(503, "down".into(), None).kind(),
            ErrorKind::Transient
        );
    }

    #[test]
    fn test_message_is_server_message() {
        let err = ClientError::from_status(404, "Task not found".into(), None);
        assert_eq!(err.to_string(), "Task not found");
    }

    #[test]
    fn test_invalid_uses_first_message() {
        let err = ClientError::invalid(vec![FieldError::new("title", "Title is required")]);
        assert_eq!(err.to_string(), "Title is required");
        assert_eq!(err.details().len(), 1);
    }
}
