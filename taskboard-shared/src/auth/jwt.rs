//! JWT session tokens
//!
//! Sessions are HS256-signed JWTs. A login issues an access token (24 hours, the
//! session lifetime) and a refresh token (30 days). Only access tokens are accepted
//! by the auth middleware; only refresh tokens are accepted by the refresh route.
//!
//! # Example
//!
//! ```
//! use taskboard_shared::auth::jwt::{create_token, validate_access_token, Claims, TokenType};
//! use uuid::Uuid;
//!
//! let secret = "a-secret-of-at-least-thirty-two-bytes!!";
//! let claims = Claims::new(Uuid::new_v4(), "ana@example.com", TokenType::Access);
//! let token = create_token(&claims, secret).unwrap();
//!
//! let decoded = validate_access_token(&token, secret).unwrap();
//! assert_eq!(decoded.email, "ana@example.com");
//! ```

use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Issuer written into and required from every token
pub const ISSUER: &str = "taskboard";

/// JWT errors
#[derive(Debug, thiserror::Error)]
pub enum JwtError {
    #[error("Failed to create token: {0}")]
    CreateError(String),

    #[error("Invalid token: {0}")]
    ValidationError(String),

    #[error("Token has expired")]
    Expired,

    #[error("Wrong token type: expected {expected}")]
    WrongType { expected: &'static str },
}

/// Token kind
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TokenType {
    Access,
    Refresh,
}

impl TokenType {
    pub fn lifetime(&self) -> Duration {
        match self {
            TokenType::Access => Duration::hours(24),
            TokenType::Refresh => Duration::days(30),
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            TokenType::Access => "access",
            TokenType::Refresh => "refresh",
        }
    }
}

/// Token claims
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    /// User ID
    pub sub: Uuid,

    /// User email, so handlers never need a lookup to display it
    pub email: String,

    pub iss: String,
    pub iat: i64,
    pub exp: i64,
    pub nbf: i64,

    pub token_type: TokenType,
}

impl Claims {
    /// Claims with the default lifetime for `token_type`
    pub fn new(user_id: Uuid, email: impl Into<String>, token_type: TokenType) -> Self {
        Self::with_lifetime(user_id, email, token_type, token_type.lifetime())
    }

    /// Claims expiring `lifetime` from now
    pub fn with_lifetime(
        user_id: Uuid,
        email: impl Into<String>,
        token_type: TokenType,
        lifetime: Duration,
    ) -> Self {
        let now = Utc::now();

        Self {
            sub: user_id,
            email: email.into(),
            iss: ISSUER.to_string(),
            iat: now.timestamp(),
            exp: (now + lifetime).timestamp(),
            nbf: now.timestamp(),
            token_type,
        }
    }

    pub fn is_expired(&self) -> bool {
        Utc::now().timestamp() >= self.exp
    }
}

/// Signs claims with HS256
pub fn create_token(claims: &Claims, secret: &str) -> Result<String, JwtError> {
    let key = EncodingKey::from_secret(secret.as_bytes());

    encode(&Header::new(Algorithm::HS256), claims, &key)
        .map_err(|e| JwtError::CreateError(e.to_string()))
}

/// Verifies signature, issuer, expiry and not-before of a token of either type
///
/// # Errors
///
/// - `JwtError::Expired` if the token is past its expiry
/// - `JwtError::ValidationError` for any other failure
pub fn validate_token(token: &str, secret: &str) -> Result<Claims, JwtError> {
    let key = DecodingKey::from_secret(secret.as_bytes());

    let mut validation = Validation::new(Algorithm::HS256);
    validation.set_issuer(&[ISSUER]);
    validation.validate_nbf = true;

    decode::<Claims>(token, &key, &validation)
        .map(|data| data.claims)
        .map_err(|e| match e.kind() {
            jsonwebtoken::errors::ErrorKind::ExpiredSignature => JwtError::Expired,
            _ => JwtError::ValidationError(e.to_string()),
        })
}

fn validate_typed(token: &str, secret: &str, expected: TokenType) -> Result<Claims, JwtError> {
    let claims = validate_token(token, secret)?;

    if claims.token_type != expected {
        return Err(JwtError::WrongType {
            expected: expected.as_str(),
        });
    }

    Ok(claims)
}

/// Validates a token and requires it to be an access token
pub fn validate_access_token(token: &str, secret: &str) -> Result<Claims, JwtError> {
    validate_typed(token, secret, TokenType::Access)
}

/// Validates a token and requires it to be a refresh token
pub fn validate_refresh_token(token: &str, secret: &str) -> Result<Claims, JwtError> {
    validate_typed(token, secret, TokenType::Refresh)
}

/// Issues a fresh access token for the holder of a valid refresh token
pub fn refresh_access_token(refresh_token: &str, secret: &str) -> Result<String, JwtError> {
    let refresh = validate_refresh_token(refresh_token, secret)?;
    let access = Claims::new(refresh.sub, refresh.email, TokenType::Access);

    create_token(&access, secret)
}

#[cfg(test)]
mod tests {
    use super::*;

    const SECRET: &str = "test-secret-key-at-least-32-characters-long";

    #[test]
    fn test_lifetimes() {
        assert_eq!(TokenType::Access.lifetime(), Duration::hours(24));
        assert_eq!(TokenType::Refresh.lifetime(), Duration::days(30));
    }

    #[test]
    fn test_round_trip_access_token() {
        let user_id = Uuid::new_v4();
        let claims = Claims::new(user_id, "ana@example.com", TokenType::Access);
        let token = create_token(&claims, SECRET).unwrap();

        let decoded = validate_access_token(&token, SECRET).unwrap();
        assert_eq!(decoded.sub, user_id);
        assert_eq!(decoded.iss, ISSUER);
        assert!(!decoded.is_expired());
    }

    #[test]
    fn test_wrong_secret_rejected() {
        let claims = Claims::new(Uuid::new_v4(), "ana@example.com", TokenType::Access);
        let token = create_token(&claims, SECRET).unwrap();

        let result = validate_token(&token, "another-secret-key-at-least-32-characters");
        assert!(matches!(result, Err(JwtError::ValidationError(_))));
    }

    #[test]
    fn test_expired_token_rejected() {
        let claims = Claims::with_lifetime(
            Uuid::new_v4(),
            "ana@example.com",
            TokenType::Access,
            Duration::hours(-2),
        );
        let token = create_token(&claims, SECRET).unwrap();

        assert!(matches!(validate_token(&token, SECRET), Err(JwtError::Expired)));
    }

    #[test]
    fn test_token_types_not_interchangeable() {
        let refresh = create_token(
            &Claims::new(Uuid::new_v4(), "ana@example.com", TokenType::Refresh),
            SECRET,
        )
        .unwrap();

        assert!(matches!(
            validate_access_token(&refresh, SECRET),
            Err(JwtError::WrongType { expected: "access" })
        ));
        assert!(validate_refresh_token(&refresh, SECRET).is_ok());
    }

    #[test]
    fn test_refresh_issues_access_token() {
        let user_id = Uuid::new_v4();
        let refresh = create_token(
            &Claims::new(user_id, "ana@example.com", TokenType::Refresh),
            SECRET,
        )
        .unwrap();

        let access = refresh_access_token(&refresh, SECRET).unwrap();
        let claims = validate_access_token(&access, SECRET).unwrap();
        assert_eq!(claims.sub, user_id);
        assert_eq!(claims.email, "ana@example.com");
    }

    #[test]
    fn test_garbage_rejected() {
        assert!(validate_token("not.a.jwt", SECRET).is_err());
    }
}
