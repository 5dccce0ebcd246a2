/// API error type and its HTTP mapping
///
/// Every failure leaves the server as an [`ApiEnvelope`] with `status: false`:
///
/// ```json
/// { "status": false, "error": "Task not found" }
/// { "status": false, "error": "Title is required", "details": [{ "field": "title", "message": "Title is required" }] }
/// ```
///
/// Internal errors are logged and replaced with a generic message.
use axum::{
    extract::rejection::{JsonRejection, PathRejection},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use std::fmt;
use taskboard_shared::{
    auth::{authorization::AuthzError, jwt::JwtError, middleware::AuthError, password::PasswordError},
    envelope::ApiEnvelope,
    validation::FieldError,
};

pub type ApiResult<T> = Result<T, ApiError>;

#[derive(Debug)]
pub enum ApiError {
    /// 400
    BadRequest(String),

    /// 401
    Unauthorized(String),

    /// 403
    Forbidden(String),

    /// 404
    NotFound(String),

    /// 409
    Conflict(String),

    /// 422 with per-field details
    ValidationError(Vec<FieldError>),

    /// 422 without field details
    Unprocessable(String),

    /// 500; the message is logged, never returned
    InternalError(String),
}

impl ApiError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            ApiError::BadRequest(_) => StatusCode::BAD_REQUEST,
            ApiError::Unauthorized(_) => StatusCode::UNAUTHORIZED,
            ApiError::Forbidden(_) => StatusCode::FORBIDDEN,
            ApiError::NotFound(_) => StatusCode::NOT_FOUND,
            ApiError::Conflict(_) => StatusCode::CONFLICT,
            ApiError::ValidationError(_) | ApiError::Unprocessable(_) => {
                StatusCode::UNPROCESSABLE_ENTITY
            }
            ApiError::InternalError(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl fmt::Display for ApiError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ApiError::BadRequest(msg) => write!(f, "Bad request: {}", msg),
            ApiError::Unauthorized(msg) => write!(f, "Unauthorized: {}", msg),
            ApiError::Forbidden(msg) => write!(f, "Forbidden: {}", msg),
            ApiError::NotFound(msg) => write!(f, "Not found: {}", msg),
            ApiError::Conflict(msg) => write!(f, "Conflict: {}", msg),
            ApiError::ValidationError(errors) => {
                write!(f, "Validation failed: {} errors", errors.len())
            }
            ApiError::Unprocessable(msg) => write!(f, "Unprocessable: {}", msg),
            ApiError::InternalError(msg) => write!(f, "Internal error: {}", msg),
        }
    }
}

impl std::error::Error for ApiError {}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status_code();

        let envelope = match self {
            ApiError::ValidationError(details) => {
                let message = details
                    .iter()
                    .map(|d| d.message.as_str())
                    .collect::<Vec<_>>()
                    .join("; ");
                ApiEnvelope::<()>::invalid(message, details)
            }
            ApiError::InternalError(msg) => {
                tracing::error!(error = %msg, "Internal error");
                ApiEnvelope::err("An internal error occurred")
            }
            ApiError::BadRequest(msg)
            | ApiError::Unauthorized(msg)
            | ApiError::Forbidden(msg)
            | ApiError::NotFound(msg)
            | ApiError::Conflict(msg)
            | ApiError::Unprocessable(msg) => ApiEnvelope::err(msg),
        };

        (status, Json(envelope)).into_response()
    }
}

impl From<sqlx::Error> for ApiError {
    fn from(err: sqlx::Error) -> Self {
        match err {
            sqlx::Error::RowNotFound => ApiError::NotFound("Resource not found".to_string()),
            sqlx::Error::Database(db_err) => {
                if db_err.is_unique_violation() {
                    let on_email = db_err
                        .constraint()
                        .map(|c| c.contains("email"))
                        .unwrap_or(false);
                    if on_email {
                        return ApiError::Conflict("Email already exists".to_string());
                    }
                    return ApiError::Conflict("Resource already exists".to_string());
                }

                if db_err.is_foreign_key_violation() {
                    return ApiError::BadRequest("Referenced record does not exist".to_string());
                }

                ApiError::InternalError(format!("Database error: {}", db_err))
            }
            _ => ApiError::InternalError(format!("Database error: {}", err)),
        }
    }
}

impl From<AuthError> for ApiError {
    fn from(err: AuthError) -> Self {
        match err {
            AuthError::InvalidFormat(msg) => ApiError::BadRequest(msg),
            other => ApiError::Unauthorized(other.to_string()),
        }
    }
}

impl From<AuthzError> for ApiError {
    fn from(err: AuthzError) -> Self {
        match err {
            AuthzError::ProjectNotFound => ApiError::NotFound(err.to_string()),
            AuthzError::NotOwner | AuthzError::NotMember => ApiError::Forbidden(err.to_string()),
            AuthzError::InvalidAssignee => ApiError::Unprocessable(err.to_string()),
            AuthzError::Database(db) => ApiError::from(db),
        }
    }
}

impl From<PasswordError> for ApiError {
    fn from(err: PasswordError) -> Self {
        ApiError::InternalError(format!("Password operation failed: {}", err))
    }
}

impl From<JwtError> for ApiError {
    fn from(err: JwtError) -> Self {
        match err {
            JwtError::CreateError(msg) => ApiError::InternalError(msg),
            JwtError::Expired => ApiError::Unauthorized("Token expired".to_string()),
            other => ApiError::Unauthorized(other.to_string()),
        }
    }
}

impl From<Vec<FieldError>> for ApiError {
    fn from(errors: Vec<FieldError>) -> Self {
        ApiError::ValidationError(errors)
    }
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        ApiError::BadRequest(rejection.body_text())
    }
}

impl From<PathRejection> for ApiError {
    fn from(rejection: PathRejection) -> Self {
        ApiError::BadRequest(rejection.body_text())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::to_bytes;
    use serde_json::Value;

    async fn body_json(err: ApiError) -> (StatusCode, Value) {
        let response = err.into_response();
        let status = response.status();
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        (status, serde_json::from_slice(&bytes).unwrap())
    }

    #[test]
    fn test_error_display() {
        let err = ApiError::BadRequest("Invalid input".to_string());
        assert_eq!(err.to_string(), "Bad request: Invalid input");

        let err = ApiError::ValidationError(vec![FieldError::new("title", "Title is required")]);
        assert_eq!(err.to_string(), "Validation failed: 1 errors");
    }

    #[tokio::test]
    async fn test_not_found_envelope() {
        let (status, body) = body_json(ApiError::NotFound("Task not found".to_string())).await;

        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body["status"], false);
        assert_eq!(body["error"], "Task not found");
        assert!(body.get("data").is_none());
    }

    #[tokio::test]
    async fn test_validation_envelope_carries_details() {
        let (status, body) = body_json(ApiError::ValidationError(vec![FieldError::new(
            "description",
            "Description too long",
        )]))
        .await;

        assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
        assert_eq!(body["error"], "Description too long");
        assert_eq!(body["details"][0]["field"], "description");
    }

    #[tokio::test]
    async fn test_internal_error_not_leaked() {
        let (status, body) =
            body_json(ApiError::InternalError("connection refused to 10.0.0.3".to_string())).await;

        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body["error"], "An internal error occurred");
    }

    #[test]
    fn test_authz_mapping() {
        assert_eq!(
            ApiError::from(AuthzError::ProjectNotFound).status_code(),
            StatusCode::NOT_FOUND
        );
        assert_eq!(ApiError::from(AuthzError::NotOwner).status_code(), StatusCode::FORBIDDEN);
        assert_eq!(
            ApiError::from(AuthzError::InvalidAssignee).status_code(),
            StatusCode::UNPROCESSABLE_ENTITY
        );
    }

    #[test]
    fn test_row_not_found_maps_to_404() {
        assert_eq!(
            ApiError::from(sqlx::Error::RowNotFound).status_code(),
            StatusCode::NOT_FOUND
        );
    }
}
