/// Post endpoints
///
/// # Endpoints
///
/// - `POST   /v1/posts` - create a post (authenticated)
/// - `GET    /v1/posts` - list posts (public, paginated)
/// - `GET    /v1/posts/:id` - read a post (public)
/// - `PUT    /v1/posts/:id` - update a post (owner only)
/// - `DELETE /v1/posts/:id` - delete a post (owner only)
///
/// Mutation of an existing post is gated by the ownership guard: the
/// resolved request identity must match the owner reference the post was
/// created with. An anonymous caller is `403 Forbidden` there like any other
/// non-owner; creation instead requires authentication up front (`401`).

use crate::{
    app::AppState,
    error::{ApiError, ApiResult},
};
use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Extension, Json,
};
use inkpost_shared::{
    auth::{ownership::check_owner, session::CurrentUser},
    models::post::{CreatePost, Post, UpdatePost},
};
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

/// Create post request
#[derive(Debug, Deserialize, Validate)]
pub struct CreatePostRequest {
    /// Post title
    #[validate(length(min = 1, max = 200, message = "Title must be 1-200 characters"))]
    pub title: String,

    /// Post body
    #[validate(length(min = 1, message = "Body must not be empty"))]
    pub body: String,
}

/// Update post request
///
/// Only title and body are updatable; the owner reference is immutable.
#[derive(Debug, Deserialize, Validate)]
pub struct UpdatePostRequest {
    #[validate(length(min = 1, max = 200, message = "Title must be 1-200 characters"))]
    pub title: Option<String>,

    #[validate(length(min = 1, message = "Body must not be empty"))]
    pub body: Option<String>,
}

/// Pagination query parameters
#[derive(Debug, Deserialize)]
pub struct ListQuery {
    /// Maximum number of posts to return (default 20, capped at 100)
    pub limit: Option<i64>,

    /// Number of posts to skip
    pub offset: Option<i64>,
}

/// Post list response
#[derive(Debug, Serialize)]
pub struct PostListResponse {
    pub posts: Vec<Post>,
}

/// Create a post
///
/// The owner reference is stamped from the resolved identity at creation
/// and never changes afterwards.
///
/// # Errors
///
/// - `422 Unprocessable Entity`: validation failed
/// - `401 Unauthorized`: anonymous request
pub async fn create_post(
    State(state): State<AppState>,
    Extension(current_user): Extension<CurrentUser>,
    Json(req): Json<CreatePostRequest>,
) -> ApiResult<(StatusCode, Json<Post>)> {
    // Validation first, like every other handler; the identity check follows
    req.validate().map_err(ApiError::from)?;

    let identity = current_user
        .identity()
        .ok_or_else(|| ApiError::Unauthorized("Not authenticated".to_string()))?;

    let post = Post::create(
        &state.db,
        CreatePost {
            title: req.title,
            body: req.body,
            owner_id: identity.id,
            owner_username: identity.username.clone(),
        },
    )
    .await?;

    Ok((StatusCode::CREATED, Json(post)))
}

/// List posts, newest first
pub async fn list_posts(
    State(state): State<AppState>,
    Query(query): Query<ListQuery>,
) -> ApiResult<Json<PostListResponse>> {
    let limit = query.limit.unwrap_or(20).clamp(1, 100);
    let offset = query.offset.unwrap_or(0).max(0);

    let posts = Post::list(&state.db, limit, offset).await?;

    Ok(Json(PostListResponse { posts }))
}

/// Read a single post
pub async fn get_post(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> ApiResult<Json<Post>> {
    let post = Post::find_by_id(&state.db, id)
        .await?
        .ok_or_else(|| ApiError::NotFound("Post not found".to_string()))?;

    Ok(Json(post))
}

/// Update a post's title and/or body
///
/// # Errors
///
/// - `404 Not Found`: no such post
/// - `403 Forbidden`: caller is anonymous or not the owner
/// - `422 Unprocessable Entity`: validation failed
pub async fn update_post(
    State(state): State<AppState>,
    Extension(current_user): Extension<CurrentUser>,
    Path(id): Path<Uuid>,
    Json(req): Json<UpdatePostRequest>,
) -> ApiResult<Json<Post>> {
    req.validate().map_err(ApiError::from)?;

    let post = Post::find_by_id(&state.db, id)
        .await?
        .ok_or_else(|| ApiError::NotFound("Post not found".to_string()))?;

    check_owner(&current_user, &post.owner_ref())?;

    let updated = Post::update(
        &state.db,
        id,
        UpdatePost {
            title: req.title,
            body: req.body,
        },
    )
    .await?
    .ok_or_else(|| ApiError::NotFound("Post not found".to_string()))?;

    Ok(Json(updated))
}

/// Delete a post
///
/// # Errors
///
/// - `404 Not Found`: no such post
/// - `403 Forbidden`: caller is anonymous or not the owner
pub async fn delete_post(
    State(state): State<AppState>,
    Extension(current_user): Extension<CurrentUser>,
    Path(id): Path<Uuid>,
) -> ApiResult<StatusCode> {
    let post = Post::find_by_id(&state.db, id)
        .await?
        .ok_or_else(|| ApiError::NotFound("Post not found".to_string()))?;

    check_owner(&current_user, &post.owner_ref())?;

    Post::delete(&state.db, id).await?;

    Ok(StatusCode::NO_CONTENT)
}
