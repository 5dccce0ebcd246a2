//! Bearer-token authentication for axum
//!
//! The middleware reads `Authorization: Bearer <access token>`, validates it and
//! inserts an [`AuthContext`] into the request extensions. Handlers then take
//! `Extension<AuthContext>`.
//!
//! # Example
//!
//! ```no_run
//! use axum::{routing::get, Extension, Router};
//! use taskboard_shared::auth::middleware::{create_jwt_middleware, AuthContext};
//!
//! async fn whoami(Extension(auth): Extension<AuthContext>) -> String {
//!     auth.email
//! }
//!
//! let app: Router = Router::new()
//!     .route("/whoami", get(whoami))
//!     .layer(axum::middleware::from_fn(create_jwt_middleware("secret")));
//! ```

use axum::{
    extract::Request,
    http::{header, HeaderMap, StatusCode},
    middleware::Next,
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::jwt::{validate_access_token, JwtError};
use crate::envelope::ApiEnvelope;

/// Authenticated caller
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuthContext {
    pub user_id: Uuid,
    pub email: String,
}

/// Authentication failure
#[derive(Debug, thiserror::Error)]
pub enum AuthError {
    #[error("Missing authorization header")]
    MissingCredentials,

    #[error("{0}")]
    InvalidFormat(String),

    #[error("{0}")]
    InvalidToken(String),
}

impl AuthError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            AuthError::InvalidFormat(_) => StatusCode::BAD_REQUEST,
            AuthError::MissingCredentials | AuthError::InvalidToken(_) => StatusCode::UNAUTHORIZED,
        }
    }
}

impl From<JwtError> for AuthError {
    fn from(err: JwtError) -> Self {
        match err {
            JwtError::Expired => AuthError::InvalidToken("Token expired".to_string()),
            other => AuthError::InvalidToken(other.to_string()),
        }
    }
}

impl IntoResponse for AuthError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        (status, Json(ApiEnvelope::<()>::err(self.to_string()))).into_response()
    }
}

/// Extracts the bearer token from request headers
pub fn bearer_token(headers: &HeaderMap) -> Result<&str, AuthError> {
    let value = headers
        .get(header::AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .ok_or(AuthError::MissingCredentials)?;

    value
        .strip_prefix("Bearer ")
        .ok_or_else(|| AuthError::InvalidFormat("Expected Bearer token".to_string()))
}

/// Validates the bearer token in `headers` and builds the caller's context
pub fn authenticate(headers: &HeaderMap, secret: &str) -> Result<AuthContext, AuthError> {
    let token = bearer_token(headers)?;
    let claims = validate_access_token(token, secret)?;

    Ok(AuthContext {
        user_id: claims.sub,
        email: claims.email,
    })
}

/// Middleware body: authenticate, then attach [`AuthContext`]
pub async fn jwt_auth_middleware(
    secret: String,
    mut req: Request,
    next: Next,
) -> Result<Response, AuthError> {
    let context = authenticate(req.headers(), &secret)?;
    tracing::trace!(user_id = %context.user_id, "Authenticated request");

    req.extensions_mut().insert(context);
    Ok(next.run(req).await)
}

/// Builds a closure for `axum::middleware::from_fn` bound to `secret`
#[allow(clippy::type_complexity)]
pub fn create_jwt_middleware(
    secret: impl Into<String>,
) -> impl Fn(
    Request,
    Next,
) -> std::pin::Pin<Box<dyn std::future::Future<Output = Result<Response, AuthError>> + Send>>
       + Clone {
    let secret = secret.into();
    move |req, next| {
        let secret = secret.clone();
        Box::pin(jwt_auth_middleware(secret, req, next))
    }
}
