/// Authentication endpoints
///
/// # Endpoints
///
/// - `POST /v1/auth/register` - register a new user, issue a session cookie
/// - `POST /v1/auth/login` - verify credentials, issue a session cookie
/// - `POST /v1/auth/logout` - clear the session cookie
/// - `GET  /v1/auth/me` - the resolved identity's profile
///
/// Registration and login both issue a token: the session contract is
/// uniform and stateless. Logout only clears the client-held cookie; a
/// previously issued token remains valid until its natural expiry, which is
/// an accepted limitation of stateless sessions.
///
/// Password hashing and verification run on the blocking pool
/// (`tokio::task::spawn_blocking`) so the CPU-heavy work never stalls the
/// async runtime.

use crate::{
    app::AppState,
    error::{ApiError, ApiResult},
};
use axum::{
    extract::State,
    http::{header, HeaderMap, StatusCode},
    Extension, Json,
};
use inkpost_shared::{
    auth::{
        password,
        session::{clear_session_cookie, session_cookie, CurrentUser},
        token::{issue_token, SessionClaims},
    },
    models::user::{CreateUser, Profile, User},
};
use serde::{Deserialize, Serialize};
use validator::Validate;

/// Register request
#[derive(Debug, Deserialize, Validate)]
pub struct RegisterRequest {
    /// Username (unique, immutable after creation)
    #[validate(length(min = 3, max = 32, message = "Username must be 3-32 characters"))]
    pub username: String,

    /// Password
    #[validate(length(min = 8, message = "Password must be at least 8 characters"))]
    pub password: String,
}

/// Login request
#[derive(Debug, Deserialize, Validate)]
pub struct LoginRequest {
    /// Username
    #[validate(length(min = 1, message = "Username is required"))]
    pub username: String,

    /// Password
    #[validate(length(min = 1, message = "Password is required"))]
    pub password: String,
}

/// Response for register and login
///
/// The token is also delivered as an HttpOnly `access_token` cookie; the
/// body copy exists for non-browser clients that prefer the Bearer header.
#[derive(Debug, Serialize)]
pub struct AuthResponse {
    /// Public user representation (never contains the password hash)
    pub user: Profile,

    /// Signed session token, expires 7 days after issuance
    pub access_token: String,
}

/// Register a new user
///
/// # Errors
///
/// - `422 Unprocessable Entity`: validation failed
/// - `409 Conflict`: username already exists
/// - `500 Internal Server Error`: hashing or storage failure (opaque)
pub async fn register(
    State(state): State<AppState>,
    Json(req): Json<RegisterRequest>,
) -> ApiResult<(StatusCode, HeaderMap, Json<AuthResponse>)> {
    req.validate().map_err(ApiError::from)?;

    // Hash on the blocking pool; one slow hash must not starve the runtime
    let password = req.password;
    let password_hash = tokio::task::spawn_blocking(move || password::hash_password(&password))
        .await
        .map_err(|e| ApiError::InternalError(format!("Hashing task failed: {}", e)))??;

    let user = User::create(
        &state.db,
        CreateUser {
            username: req.username,
            password_hash,
        },
    )
    .await?;

    let claims = SessionClaims::new(user.id, user.username.clone());
    let access_token = issue_token(&claims, state.token_secret())?;

    let mut headers = HeaderMap::new();
    headers.insert(header::SET_COOKIE, session_cookie(&access_token));

    Ok((
        StatusCode::CREATED,
        headers,
        Json(AuthResponse {
            user: user.profile(),
            access_token,
        }),
    ))
}

/// Login
///
/// Unknown username and wrong password collapse into the same 401 response
/// to avoid username enumeration.
///
/// # Errors
///
/// - `422 Unprocessable Entity`: validation failed
/// - `401 Unauthorized`: invalid username or password
/// - `500 Internal Server Error`: hashing or storage failure (opaque)
pub async fn login(
    State(state): State<AppState>,
    Json(req): Json<LoginRequest>,
) -> ApiResult<(HeaderMap, Json<AuthResponse>)> {
    req.validate().map_err(ApiError::from)?;

    let user = User::find_by_username(&state.db, &req.username)
        .await?
        .ok_or_else(|| ApiError::Unauthorized("Invalid username or password".to_string()))?;

    // Verify on the blocking pool for the same reason hashing does
    let password = req.password;
    let stored = user.password_hash.clone();
    let valid = tokio::task::spawn_blocking(move || password::verify_password(&password, &stored))
        .await
        .map_err(|e| ApiError::InternalError(format!("Hashing task failed: {}", e)))??;

    if !valid {
        return Err(ApiError::Unauthorized(
            "Invalid username or password".to_string(),
        ));
    }

    let claims = SessionClaims::new(user.id, user.username.clone());
    let access_token = issue_token(&claims, state.token_secret())?;

    let mut headers = HeaderMap::new();
    headers.insert(header::SET_COOKIE, session_cookie(&access_token));

    Ok((
        headers,
        Json(AuthResponse {
            user: user.profile(),
            access_token,
        }),
    ))
}

/// Logout
///
/// Clears the client-held session cookie. Sessions are stateless, so there
/// is nothing to revoke server-side; the old token stays valid until its
/// natural expiry.
pub async fn logout() -> (HeaderMap, Json<serde_json::Value>) {
    let mut headers = HeaderMap::new();
    headers.insert(header::SET_COOKIE, clear_session_cookie());

    (headers, Json(serde_json::json!({ "status": "ok" })))
}

/// Current identity's profile
///
/// # Errors
///
/// - `401 Unauthorized`: the request resolved to anonymous, or the token's
///   subject no longer exists
pub async fn me(
    State(state): State<AppState>,
    Extension(current_user): Extension<CurrentUser>,
) -> ApiResult<Json<Profile>> {
    let identity = current_user
        .identity()
        .ok_or_else(|| ApiError::Unauthorized("Not authenticated".to_string()))?;

    let user = User::find_by_id(&state.db, identity.id)
        .await?
        .ok_or_else(|| ApiError::Unauthorized("Not authenticated".to_string()))?;

    Ok(Json(user.profile()))
}
