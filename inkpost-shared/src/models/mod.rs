/// Database models for Inkpost
///
/// This module contains all database models and their CRUD operations.
///
/// # Models
///
/// - `user`: user accounts and the credential store
/// - `post`: content posts carrying an immutable owner reference
///
/// # Example
///
/// ```no_run
/// use inkpost_shared::models::user::{CreateUser, User};
/// use inkpost_shared::db::pool::{create_pool, DatabaseConfig};
///
/// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let pool = create_pool(DatabaseConfig::default()).await?;
///
/// let new_user = CreateUser {
///     username: "alice".to_string(),
///     password_hash: "$argon2id$...".to_string(),
/// };
///
/// let user = User::create(&pool, new_user).await?;
/// # Ok(())
/// # }
/// ```

pub mod post;
pub mod user;
