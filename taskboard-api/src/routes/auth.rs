/// Authentication routes
///
/// - `POST /v1/auth/register`: create an account
/// - `POST /v1/auth/login`: exchange credentials for access + refresh tokens
/// - `POST /v1/auth/refresh`: exchange a refresh token for a new access token
use crate::{
    app::AppState,
    error::{ApiError, ApiResult},
    extract::ApiJson,
    routes::{created, ok, Envelope},
};
use axum::{extract::State, http::StatusCode};
use serde::{Deserialize, Serialize};
use taskboard_shared::{
    auth::{jwt, password},
    models::user::{CreateUser, User},
    validation::{validate_input, FieldError, LoginInput, RegisterInput},
};
use uuid::Uuid;

#[derive(Debug, Serialize, Deserialize)]
pub struct RegisterResponse {
    pub user_id: Uuid,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct LoginResponse {
    pub user_id: Uuid,
    pub email: String,
    pub access_token: String,
    pub refresh_token: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct RefreshRequest {
    pub refresh_token: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct RefreshResponse {
    pub access_token: String,
}

const BAD_CREDENTIALS: &str = "Invalid email or password";

/// POST /v1/auth/register
///
/// # Errors
///
/// - 422 if the form fails validation
/// - 409 if the email is already registered
pub async fn register(
    State(state): State<AppState>,
    ApiJson(req): ApiJson<RegisterInput>,
) -> ApiResult<(StatusCode, Envelope<RegisterResponse>)> {
    validate_input(&req)?;
    password::validate_password_strength(&req.password)
        .map_err(|message| ApiError::ValidationError(vec![FieldError::new("password", message)]))?;

    let password_hash = password::hash_password(&req.password)?;
    let user = User::create(
        &state.db,
        CreateUser {
            email: req.email,
            password_hash,
        },
    )
    .await?;

    tracing::info!(user_id = %user.id, "User registered");

    Ok(created(RegisterResponse { user_id: user.id }))
}

/// POST /v1/auth/login
///
/// Unknown email and wrong password produce the same 401.
pub async fn login(
    State(state): State<AppState>,
    ApiJson(req): ApiJson<LoginInput>,
) -> ApiResult<Envelope<LoginResponse>> {
    validate_input(&req)?;

    let user = User::find_by_email(&state.db, &req.email)
        .await?
        .ok_or_else(|| ApiError::Unauthorized(BAD_CREDENTIALS.to_string()))?;

    if !password::verify_password(&req.password, &user.password_hash)? {
        tracing::debug!(user_id = %user.id, "Login rejected");
        return Err(ApiError::Unauthorized(BAD_CREDENTIALS.to_string()));
    }

    let access = jwt::Claims::new(user.id, user.email.clone(), jwt::TokenType::Access);
    let refresh = jwt::Claims::new(user.id, user.email.clone(), jwt::TokenType::Refresh);

    Ok(ok(LoginResponse {
        user_id: user.id,
        email: user.email,
        access_token: jwt::create_token(&access, state.jwt_secret())?,
        refresh_token: jwt::create_token(&refresh, state.jwt_secret())?,
    }))
}

/// POST /v1/auth/refresh
pub async fn refresh(
    State(state): State<AppState>,
    ApiJson(req): ApiJson<RefreshRequest>,
) -> ApiResult<Envelope<RefreshResponse>> {
    let access_token = jwt::refresh_access_token(&req.refresh_token, state.jwt_secret())?;

    Ok(ok(RefreshResponse { access_token }))
}
