/// Per-request session resolution
///
/// The session resolver is the first stage of every request: it turns the
/// presented credential (the `access_token` cookie, or an `Authorization:
/// Bearer` header as a fallback) into a request-scoped identity. It never
/// fails the request — a missing, invalid, or expired token resolves to
/// [`CurrentUser::Anonymous`], and downstream handlers decide whether
/// anonymity is acceptable.
///
/// The resolved identity is inserted into request extensions once and never
/// mutated afterwards; nothing is shared across requests. Each request starts
/// fresh from whatever token it presents.
///
/// # Example
///
/// ```no_run
/// use axum::{middleware, routing::get, Extension, Router};
/// use inkpost_shared::auth::session::{session_resolver, CurrentUser};
///
/// async fn whoami(Extension(user): Extension<CurrentUser>) -> String {
///     match user {
///         CurrentUser::Authenticated(identity) => identity.username,
///         CurrentUser::Anonymous => "anonymous".to_string(),
///     }
/// }
///
/// let app: Router = Router::new()
///     .route("/whoami", get(whoami))
///     .layer(middleware::from_fn(session_resolver("jwt-secret")));
/// ```

use axum::{
    extract::Request,
    http::{header, HeaderMap, HeaderValue},
    middleware::Next,
    response::Response,
};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::token::{decode_token, SESSION_TTL_DAYS};

/// Name of the client-held session cookie
pub const ACCESS_TOKEN_COOKIE: &str = "access_token";

/// Cookie max-age, matching the token expiry
pub const ACCESS_TOKEN_MAX_AGE_SECONDS: i64 = SESSION_TTL_DAYS * 24 * 3600;

/// A resolved, authenticated identity
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Identity {
    /// User ID (token subject)
    pub id: Uuid,

    /// Username carried in the token claims
    pub username: String,
}

/// Request-scoped identity, resolved once per request
///
/// `Anonymous --(valid token)--> Authenticated`; the state is never mutated
/// mid-request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CurrentUser {
    /// No token, or a token that failed verification
    Anonymous,

    /// A verified identity reconstructed from the token claims
    Authenticated(Identity),
}

impl CurrentUser {
    /// Returns the identity if authenticated
    pub fn identity(&self) -> Option<&Identity> {
        match self {
            CurrentUser::Authenticated(identity) => Some(identity),
            CurrentUser::Anonymous => None,
        }
    }

    /// Whether this request resolved to anonymous
    pub fn is_anonymous(&self) -> bool {
        matches!(self, CurrentUser::Anonymous)
    }
}

/// Session resolution middleware
///
/// Reads the credential channel, verifies the token, and attaches a
/// [`CurrentUser`] to request extensions. Token classification errors
/// (invalid signature, corruption, expiry) all collapse to anonymous here;
/// the codec's distinction between them is logged at debug level only.
pub async fn resolve_session(secret: String, mut req: Request, next: Next) -> Response {
    let current_user = match presented_token(req.headers()) {
        Some(token) => match decode_token(&token, &secret) {
            Ok(claims) => CurrentUser::Authenticated(Identity {
                id: claims.sub,
                username: claims.username,
            }),
            Err(e) => {
                tracing::debug!("session token rejected: {}", e);
                CurrentUser::Anonymous
            }
        },
        None => CurrentUser::Anonymous,
    };

    req.extensions_mut().insert(current_user);

    next.run(req).await
}

/// Creates a session-resolver middleware closure
///
/// Captures the process-wide signing secret and returns a function usable
/// with `axum::middleware::from_fn`.
pub fn session_resolver(
    secret: impl Into<String>,
) -> impl Fn(Request, Next) -> std::pin::Pin<Box<dyn std::future::Future<Output = Response> + Send>>
       + Clone {
    let secret = secret.into();
    move |req, next| {
        let secret = secret.clone();
        Box::pin(resolve_session(secret, req, next))
    }
}

/// Extracts the raw token from the request's credential channel.
///
/// The `access_token` cookie is the primary channel; an `Authorization:
/// Bearer` header is accepted as a fallback for non-browser clients.
fn presented_token(headers: &HeaderMap) -> Option<String> {
    if let Some(token) = parse_cookie(headers, ACCESS_TOKEN_COOKIE) {
        return Some(token);
    }

    headers
        .get(header::AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.strip_prefix("Bearer "))
        .map(str::to_string)
}

/// Reads a single cookie value from the Cookie header
pub fn parse_cookie(headers: &HeaderMap, name: &str) -> Option<String> {
    let cookie = headers.get(header::COOKIE)?;
    let s = cookie.to_str().ok()?;
    for part in s.split(';') {
        let p = part.trim();
        if let Some(eq) = p.find('=') {
            let (k, v) = p.split_at(eq);
            if k == name {
                return Some(v[1..].to_string());
            }
        }
    }
    None
}

/// Builds the Set-Cookie value that stores a session token.
///
/// HttpOnly so scripts cannot read it; Max-Age matches the token expiry.
pub fn session_cookie(token: &str) -> HeaderValue {
    HeaderValue::from_str(&format!(
        "{}={}; HttpOnly; Secure; SameSite=Strict; Path=/; Max-Age={}",
        ACCESS_TOKEN_COOKIE, token, ACCESS_TOKEN_MAX_AGE_SECONDS
    ))
    .unwrap()
}

/// Builds the Set-Cookie value that clears the session cookie.
///
/// This is all logout does. Sessions are stateless, so a previously issued
/// token remains valid until its natural expiry even after logout.
pub fn clear_session_cookie() -> HeaderValue {
    HeaderValue::from_str(&format!(
        "{}=deleted; Expires=Thu, 01 Jan 1970 00:00:00 GMT; HttpOnly; Secure; SameSite=Strict; Path=/",
        ACCESS_TOKEN_COOKIE
    ))
    .unwrap()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::token::{issue_token, SessionClaims};
    use axum::{body::Body, http::Request as HttpRequest, middleware, routing::get, Extension, Router};
    use chrono::Utc;
    use tower::ServiceExt as _;

    const SECRET: &str = "test-secret-key-at-least-32-bytes-long";

    async fn whoami(Extension(user): Extension<CurrentUser>) -> String {
        match user {
            CurrentUser::Authenticated(identity) => format!("user:{}", identity.username),
            CurrentUser::Anonymous => "anonymous".to_string(),
        }
    }

    fn test_router() -> Router {
        Router::new()
            .route("/whoami", get(whoami))
            .layer(middleware::from_fn(session_resolver(SECRET)))
    }

    async fn body_string(response: axum::response::Response) -> String {
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        String::from_utf8(bytes.to_vec()).unwrap()
    }

    #[tokio::test]
    async fn test_no_token_resolves_anonymous() {
        let response = test_router()
            .oneshot(HttpRequest::get("/whoami").body(Body::empty()).unwrap())
            .await
            .unwrap();

        assert_eq!(body_string(response).await, "anonymous");
    }

    #[tokio::test]
    async fn test_cookie_token_resolves_identity() {
        let claims = SessionClaims::new(Uuid::new_v4(), "alice".to_string());
        let token = issue_token(&claims, SECRET).unwrap();

        let response = test_router()
            .oneshot(
                HttpRequest::get("/whoami")
                    .header("cookie", format!("access_token={}", token))
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(body_string(response).await, "user:alice");
    }

    #[tokio::test]
    async fn test_bearer_token_resolves_identity() {
        let claims = SessionClaims::new(Uuid::new_v4(), "bob".to_string());
        let token = issue_token(&claims, SECRET).unwrap();

        let response = test_router()
            .oneshot(
                HttpRequest::get("/whoami")
                    .header("authorization", format!("Bearer {}", token))
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(body_string(response).await, "user:bob");
    }

    #[tokio::test]
    async fn test_garbage_token_resolves_anonymous() {
        let response = test_router()
            .oneshot(
                HttpRequest::get("/whoami")
                    .header("cookie", "access_token=garbage")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(body_string(response).await, "anonymous");
    }

    #[tokio::test]
    async fn test_expired_token_resolves_anonymous() {
        let now = Utc::now().timestamp();
        let claims = SessionClaims::with_timestamps(
            Uuid::new_v4(),
            "alice".to_string(),
            now - 7200,
            now - 3600,
        );
        let token = issue_token(&claims, SECRET).unwrap();

        let response = test_router()
            .oneshot(
                HttpRequest::get("/whoami")
                    .header("cookie", format!("access_token={}", token))
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(body_string(response).await, "anonymous");
    }

    #[test]
    fn test_parse_cookie_picks_named_value() {
        let mut headers = HeaderMap::new();
        headers.insert(
            header::COOKIE,
            HeaderValue::from_static("theme=dark; access_token=abc123; lang=en"),
        );

        assert_eq!(
            parse_cookie(&headers, ACCESS_TOKEN_COOKIE),
            Some("abc123".to_string())
        );
        assert_eq!(parse_cookie(&headers, "missing"), None);
    }

    #[test]
    fn test_session_cookie_attributes() {
        let value = session_cookie("tok");
        let s = value.to_str().unwrap();

        assert!(s.starts_with("access_token=tok"));
        assert!(s.contains("HttpOnly"));
        assert!(s.contains("Max-Age=604800"));
    }

    #[test]
    fn test_clear_session_cookie_expires_in_the_past() {
        let value = clear_session_cookie();
        let s = value.to_str().unwrap();

        assert!(s.starts_with("access_token=deleted"));
        assert!(s.contains("Expires=Thu, 01 Jan 1970"));
    }
}
