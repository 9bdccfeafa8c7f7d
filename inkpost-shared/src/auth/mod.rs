/// Authentication and authorization primitives
///
/// This module contains the identity core of Inkpost:
///
/// # Modules
///
/// - [`password`]: Argon2id password hashing and verification
/// - [`token`]: signed session-token issuance and verification
/// - [`session`]: per-request session resolution middleware
/// - [`ownership`]: owner-only authorization for content mutation
///
/// # Security Notes
///
/// - **Password Hashing**: Argon2id with 64 MB memory, 3 iterations
/// - **Session Tokens**: HS256-signed JWTs, fixed 7-day expiry
/// - **Stateless Sessions**: a token is valid until it expires; logout only
///   clears the client-held cookie
///
/// # Example
///
/// ```no_run
/// use inkpost_shared::auth::password::{hash_password, verify_password};
/// use inkpost_shared::auth::token::{issue_token, SessionClaims};
/// use uuid::Uuid;
///
/// # fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let hash = hash_password("user_password")?;
/// assert!(verify_password("user_password", &hash)?);
///
/// let claims = SessionClaims::new(Uuid::new_v4(), "alice".to_string());
/// let token = issue_token(&claims, "secret-key-at-least-32-bytes-long!!")?;
/// # Ok(())
/// # }
/// ```

pub mod ownership;
pub mod password;
pub mod session;
pub mod token;
