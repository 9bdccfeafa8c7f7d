/// API route handlers
///
/// Organized by resource:
///
/// - `health`: health check endpoint
/// - `auth`: registration, login, logout, current identity
/// - `posts`: content CRUD with owner-gated mutation

pub mod auth;
pub mod health;
pub mod posts;
