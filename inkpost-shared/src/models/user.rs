/// User model and credential store
///
/// A user record maps a unique, immutable username to an opaque password
/// hash. Records are created once at registration, read on every login and
/// session resolution, and never mutated or deleted here (password change is
/// out of scope).
///
/// # Schema
///
/// ```sql
/// CREATE TABLE users (
///     id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
///     username TEXT NOT NULL UNIQUE,
///     password_hash VARCHAR(255) NOT NULL,
///     created_at TIMESTAMPTZ NOT NULL DEFAULT NOW()
/// );
/// ```
///
/// Uniqueness is enforced by the database constraint, not by a read followed
/// by a write: concurrent registrations of the same username resolve to
/// exactly one success and the rest surface as
/// [`UserStoreError::DuplicateUsername`].
///
/// # Example
///
/// ```no_run
/// use inkpost_shared::models::user::{CreateUser, User};
/// # use sqlx::PgPool;
/// # async fn example(pool: PgPool) -> Result<(), Box<dyn std::error::Error>> {
/// let user = User::create(
///     &pool,
///     CreateUser {
///         username: "alice".to_string(),
///         password_hash: "$argon2id$...".to_string(),
///     },
/// )
/// .await?;
///
/// let found = User::find_by_username(&pool, "alice").await?;
/// assert!(found.is_some());
/// # Ok(())
/// # }
/// ```

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::PgPool;
use uuid::Uuid;

/// Error type for credential-store operations
#[derive(Debug, thiserror::Error)]
pub enum UserStoreError {
    /// The username is already taken (unique constraint violation)
    #[error("Username already exists")]
    DuplicateUsername,

    /// Any other storage failure; internal, not shown to callers
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),
}

/// User account record
///
/// The password hash is never serialized; callers that need to return a user
/// representation use [`User::profile`].
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct User {
    /// Unique user ID (UUID v4), assigned at creation
    pub id: Uuid,

    /// Username, unique and immutable after creation
    pub username: String,

    /// Argon2id password hash; opaque, never exposed outside the core
    #[serde(skip_serializing)]
    pub password_hash: String,

    /// When the account was created
    pub created_at: DateTime<Utc>,
}

/// Input for creating a new user
#[derive(Debug, Clone)]
pub struct CreateUser {
    /// Username (already shape-validated at the boundary)
    pub username: String,

    /// Argon2id password hash (NOT a plaintext password)
    pub password_hash: String,
}

/// Public representation of a user, safe to serialize in responses
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Profile {
    /// User ID
    pub id: Uuid,

    /// Username
    pub username: String,

    /// Account creation time
    pub created_at: DateTime<Utc>,
}

impl User {
    /// Creates a new user.
    ///
    /// The insert and the uniqueness check are a single atomic statement;
    /// a violation of the `users.username` unique constraint surfaces as
    /// [`UserStoreError::DuplicateUsername`].
    pub async fn create(pool: &PgPool, data: CreateUser) -> Result<Self, UserStoreError> {
        let user = sqlx::query_as::<_, User>(
            r#"
            INSERT INTO users (username, password_hash)
            VALUES ($1, $2)
            RETURNING id, username, password_hash, created_at
            "#,
        )
        .bind(data.username)
        .bind(data.password_hash)
        .fetch_one(pool)
        .await
        .map_err(|e| match e {
            sqlx::Error::Database(ref db_err) if db_err.is_unique_violation() => {
                UserStoreError::DuplicateUsername
            }
            other => UserStoreError::Database(other),
        })?;

        Ok(user)
    }

    /// Finds a user by username
    pub async fn find_by_username(
        pool: &PgPool,
        username: &str,
    ) -> Result<Option<Self>, UserStoreError> {
        let user = sqlx::query_as::<_, User>(
            r#"
            SELECT id, username, password_hash, created_at
            FROM users
            WHERE username = $1
            "#,
        )
        .bind(username)
        .fetch_optional(pool)
        .await?;

        Ok(user)
    }

    /// Finds a user by ID
    pub async fn find_by_id(pool: &PgPool, id: Uuid) -> Result<Option<Self>, UserStoreError> {
        let user = sqlx::query_as::<_, User>(
            r#"
            SELECT id, username, password_hash, created_at
            FROM users
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(pool)
        .await?;

        Ok(user)
    }

    /// Public representation of this user, without the password hash
    pub fn profile(&self) -> Profile {
        Profile {
            id: self.id,
            username: self.username.clone(),
            created_at: self.created_at,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_user() -> User {
        User {
            id: Uuid::new_v4(),
            username: "alice".to_string(),
            password_hash: "$argon2id$v=19$m=65536,t=3,p=4$c2FsdA$aGFzaA".to_string(),
            created_at: Utc::now(),
        }
    }

    #[test]
    fn test_serialized_user_never_contains_password_hash() {
        let user = sample_user();
        let json = serde_json::to_value(&user).unwrap();

        assert_eq!(json["username"], "alice");
        assert!(json.get("password_hash").is_none());
        assert!(!json.to_string().contains("argon2id"));
    }

    #[test]
    fn test_profile_contains_only_public_fields() {
        let user = sample_user();
        let profile = user.profile();

        assert_eq!(profile.id, user.id);
        assert_eq!(profile.username, user.username);

        let json = serde_json::to_value(&profile).unwrap();
        assert!(json.get("password_hash").is_none());
    }

    // Integration tests for the CRUD paths require a running database and
    // are exercised through the API test environment.
}
