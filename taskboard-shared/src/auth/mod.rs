/// Authentication and authorization
///
/// # Modules
///
/// - [`password`]: Argon2id password hashing
/// - [`jwt`]: Access and refresh tokens
/// - [`middleware`]: Bearer-token middleware and [`middleware::AuthContext`]
/// - [`authorization`]: Owner/member checks on projects
///
/// # Example
///
/// ```
/// use taskboard_shared::auth::password::{hash_password, verify_password};
///
/// let hash = hash_password("correct horse battery").unwrap();
/// assert!(verify_password("correct horse battery", &hash).unwrap());
/// assert!(!verify_password("wrong", &hash).unwrap());
/// ```

pub mod authorization;
pub mod jwt;
pub mod middleware;
pub mod password;
