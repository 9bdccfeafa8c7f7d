//! # Inkpost Shared Library
//!
//! Shared types and business logic used by the Inkpost API server.
//!
//! ## Module Organization
//!
//! - `auth`: password hashing, session tokens, session resolution, ownership checks
//! - `models`: database models (users, posts)
//! - `db`: connection pool and migration runner

pub mod auth;
pub mod db;
pub mod models;

/// Current version of the Inkpost shared library
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_version_is_set() {
        assert!(!VERSION.is_empty());
    }
}
