/// Post model and CRUD operations
///
/// Posts are the owned content of the service. Every post embeds an owner
/// reference `{owner_id, owner_username}` stamped from the creating identity;
/// the reference is set once at creation and never updated. Updates touch
/// title and body only, and whether an update is allowed at all is decided
/// by the ownership guard, not here.
///
/// # Schema
///
/// ```sql
/// CREATE TABLE posts (
///     id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
///     title TEXT NOT NULL,
///     body TEXT NOT NULL,
///     owner_id UUID NOT NULL,
///     owner_username TEXT NOT NULL,
///     created_at TIMESTAMPTZ NOT NULL DEFAULT NOW(),
///     updated_at TIMESTAMPTZ NOT NULL DEFAULT NOW()
/// );
/// ```

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::PgPool;
use uuid::Uuid;

use crate::auth::ownership::OwnerRef;

/// Content post with an embedded, immutable owner reference
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct Post {
    /// Unique post ID (UUID v4)
    pub id: Uuid,

    /// Post title
    pub title: String,

    /// Post body
    pub body: String,

    /// Owner's user id, recorded at creation
    pub owner_id: Uuid,

    /// Owner's username, recorded at creation
    pub owner_username: String,

    /// When the post was created
    pub created_at: DateTime<Utc>,

    /// When title/body were last updated
    pub updated_at: DateTime<Utc>,
}

/// Input for creating a post
#[derive(Debug, Clone)]
pub struct CreatePost {
    pub title: String,
    pub body: String,

    /// Owner id taken from the resolved request identity
    pub owner_id: Uuid,

    /// Owner username taken from the resolved request identity
    pub owner_username: String,
}

/// Input for updating a post's content
///
/// Only non-None fields are written. The owner reference is not updatable.
#[derive(Debug, Clone, Default)]
pub struct UpdatePost {
    pub title: Option<String>,
    pub body: Option<String>,
}

impl Post {
    /// Creates a new post, stamping the owner reference
    pub async fn create(pool: &PgPool, data: CreatePost) -> Result<Self, sqlx::Error> {
        let post = sqlx::query_as::<_, Post>(
            r#"
            INSERT INTO posts (title, body, owner_id, owner_username)
            VALUES ($1, $2, $3, $4)
            RETURNING id, title, body, owner_id, owner_username, created_at, updated_at
            "#,
        )
        .bind(data.title)
        .bind(data.body)
        .bind(data.owner_id)
        .bind(data.owner_username)
        .fetch_one(pool)
        .await?;

        Ok(post)
    }

    /// Finds a post by ID
    pub async fn find_by_id(pool: &PgPool, id: Uuid) -> Result<Option<Self>, sqlx::Error> {
        let post = sqlx::query_as::<_, Post>(
            r#"
            SELECT id, title, body, owner_id, owner_username, created_at, updated_at
            FROM posts
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(pool)
        .await?;

        Ok(post)
    }

    /// Lists posts with pagination, newest first
    pub async fn list(pool: &PgPool, limit: i64, offset: i64) -> Result<Vec<Self>, sqlx::Error> {
        let posts = sqlx::query_as::<_, Post>(
            r#"
            SELECT id, title, body, owner_id, owner_username, created_at, updated_at
            FROM posts
            ORDER BY created_at DESC
            LIMIT $1 OFFSET $2
            "#,
        )
        .bind(limit)
        .bind(offset)
        .fetch_all(pool)
        .await?;

        Ok(posts)
    }

    /// Updates a post's title and/or body.
    ///
    /// Returns the updated post, or None if the post does not exist. The
    /// owner reference is never touched.
    pub async fn update(
        pool: &PgPool,
        id: Uuid,
        data: UpdatePost,
    ) -> Result<Option<Self>, sqlx::Error> {
        let post = sqlx::query_as::<_, Post>(
            r#"
            UPDATE posts
            SET title = COALESCE($2, title),
                body = COALESCE($3, body),
                updated_at = NOW()
            WHERE id = $1
            RETURNING id, title, body, owner_id, owner_username, created_at, updated_at
            "#,
        )
        .bind(id)
        .bind(data.title)
        .bind(data.body)
        .fetch_optional(pool)
        .await?;

        Ok(post)
    }

    /// Deletes a post by ID. Returns true if a row was removed.
    pub async fn delete(pool: &PgPool, id: Uuid) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM posts WHERE id = $1")
            .bind(id)
            .execute(pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }

    /// The owner reference consumed by the ownership guard
    pub fn owner_ref(&self) -> OwnerRef {
        OwnerRef {
            owner_id: self.owner_id.to_string(),
            owner_username: self.owner_username.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::ownership::check_owner;
    use crate::auth::session::{CurrentUser, Identity};

    fn sample_post(owner_id: Uuid) -> Post {
        Post {
            id: Uuid::new_v4(),
            title: "First post".to_string(),
            body: "Hello".to_string(),
            owner_id,
            owner_username: "alice".to_string(),
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    #[test]
    fn test_owner_ref_feeds_the_guard() {
        let owner_id = Uuid::new_v4();
        let post = sample_post(owner_id);

        let owner = CurrentUser::Authenticated(Identity {
            id: owner_id,
            username: "alice".to_string(),
        });
        let stranger = CurrentUser::Authenticated(Identity {
            id: Uuid::new_v4(),
            username: "bob".to_string(),
        });

        assert!(check_owner(&owner, &post.owner_ref()).is_ok());
        assert!(check_owner(&stranger, &post.owner_ref()).is_err());
    }

    #[test]
    fn test_update_post_default_changes_nothing() {
        let update = UpdatePost::default();
        assert!(update.title.is_none());
        assert!(update.body.is_none());
    }
}
