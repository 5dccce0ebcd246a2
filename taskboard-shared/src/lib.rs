//! # Taskboard Shared Library
//!
//! Types and business rules shared by the Taskboard API server and the board client.
//!
//! ## Module Organization
//!
//! - `models`: Database models, wire shapes and the task-status column table
//! - `envelope`: Uniform `{ status, data, error }` response envelope
//! - `validation`: Form rules enforced by the server and pre-checked by the client
//! - `auth`: Password hashing, JWT, auth middleware and project authorization
//! - `db`: Connection pool and embedded migrations

pub mod auth;
pub mod db;
pub mod envelope;
pub mod models;
pub mod validation;

/// Current version of the Taskboard shared library
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Image assigned to every new project until uploads exist
pub const DEFAULT_PROJECT_IMAGE: &str = "https://placehold.co/400x200";

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_version_is_set() {
        assert!(!VERSION.is_empty());
    }
}
