/// Session token issuance and verification
///
/// Sessions are stateless: everything needed to resolve an identity lives in
/// a compact, URL-safe, HS256-signed JWT. There is no server-held session
/// record and no revocation list; a token is valid until its natural expiry.
///
/// # Claims
///
/// - `sub`: subject (user ID)
/// - `username`: the subject's username at issuance
/// - `iat`: issued at (Unix timestamp)
/// - `exp`: expiration, always `iat` + 7 days (fixed policy)
/// - `iss`: always "inkpost"
///
/// # Example
///
/// ```
/// use inkpost_shared::auth::token::{issue_token, decode_token, SessionClaims};
/// use uuid::Uuid;
///
/// # fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let secret = "test-secret-key-at-least-32-bytes-long";
/// let claims = SessionClaims::new(Uuid::new_v4(), "alice".to_string());
/// let token = issue_token(&claims, secret)?;
///
/// let decoded = decode_token(&token, secret)?;
/// assert_eq!(decoded.username, "alice");
/// # Ok(())
/// # }
/// ```

use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Session lifetime. Fixed policy, not configurable per call.
pub const SESSION_TTL_DAYS: i64 = 7;

/// Token issuer claim value
const ISSUER: &str = "inkpost";

/// Error type for token operations
#[derive(Debug, thiserror::Error)]
pub enum TokenError {
    /// Failed to sign a token
    #[error("Failed to create token: {0}")]
    CreateError(String),

    /// Signature mismatch or structural corruption
    #[error("Invalid token: {0}")]
    Invalid(String),

    /// Correctly signed token past its expiry
    #[error("Token has expired")]
    Expired,
}

/// Claims embedded in a session token
///
/// Claims are never persisted; they exist only inside the signed token and
/// the request-scoped identity reconstructed from it.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionClaims {
    /// Subject - user ID
    pub sub: Uuid,

    /// Username of the subject at issuance
    pub username: String,

    /// Issued at (Unix timestamp)
    pub iat: i64,

    /// Expiration time (Unix timestamp), always `iat` + 7 days
    pub exp: i64,

    /// Issuer - always "inkpost"
    pub iss: String,
}

impl SessionClaims {
    /// Creates claims for a freshly authenticated user.
    ///
    /// Expiry is always seven days out from issuance.
    pub fn new(user_id: Uuid, username: String) -> Self {
        let now = Utc::now();
        let expiration = now + Duration::days(SESSION_TTL_DAYS);

        Self {
            sub: user_id,
            username,
            iat: now.timestamp(),
            exp: expiration.timestamp(),
            iss: ISSUER.to_string(),
        }
    }

    /// Creates claims with explicit timestamps.
    ///
    /// Used by tests to construct already-expired tokens; production code
    /// goes through [`SessionClaims::new`].
    pub fn with_timestamps(user_id: Uuid, username: String, iat: i64, exp: i64) -> Self {
        Self {
            sub: user_id,
            username,
            iat,
            exp,
            iss: ISSUER.to_string(),
        }
    }

    /// Checks whether the claims are past their expiry
    pub fn is_expired(&self) -> bool {
        Utc::now().timestamp() >= self.exp
    }
}

/// Signs claims into a compact, URL-safe token.
///
/// The signing secret is process-wide configuration, loaded once at startup
/// and injected explicitly; this function never reads it from anywhere else.
pub fn issue_token(claims: &SessionClaims, secret: &str) -> Result<String, TokenError> {
    let header = Header::new(Algorithm::HS256);
    let key = EncodingKey::from_secret(secret.as_bytes());

    encode(&header, claims, &key)
        .map_err(|e| TokenError::CreateError(format!("Token encoding failed: {}", e)))
}

/// Verifies a token and extracts its claims.
///
/// Classification stops here: a signature mismatch or structural corruption
/// is [`TokenError::Invalid`], a correctly signed token past its `exp` is
/// [`TokenError::Expired`]. What to do about either is the caller's decision
/// (the session resolver collapses both to anonymous).
pub fn decode_token(token: &str, secret: &str) -> Result<SessionClaims, TokenError> {
    let key = DecodingKey::from_secret(secret.as_bytes());

    let mut validation = Validation::new(Algorithm::HS256);
    validation.set_issuer(&[ISSUER]);
    validation.validate_exp = true;

    let token_data = decode::<SessionClaims>(token, &key, &validation).map_err(|e| {
        match e.kind() {
            jsonwebtoken::errors::ErrorKind::ExpiredSignature => TokenError::Expired,
            _ => TokenError::Invalid(format!("Token validation failed: {}", e)),
        }
    })?;

    Ok(token_data.claims)
}

#[cfg(test)]
mod tests {
    use super::*;

    const SECRET: &str = "test-secret-key-at-least-32-bytes-long";

    #[test]
    fn test_claims_expiry_is_seven_days_out() {
        let claims = SessionClaims::new(Uuid::new_v4(), "alice".to_string());

        assert_eq!(claims.exp - claims.iat, SESSION_TTL_DAYS * 24 * 3600);
        assert_eq!(claims.iss, "inkpost");
        assert!(!claims.is_expired());
    }

    #[test]
    fn test_issue_and_decode_token() {
        let user_id = Uuid::new_v4();
        let claims = SessionClaims::new(user_id, "alice".to_string());
        let token = issue_token(&claims, SECRET).expect("Should create token");

        // Compact three-part structure: header.claims.signature
        assert_eq!(token.split('.').count(), 3);

        let decoded = decode_token(&token, SECRET).expect("Should decode token");
        assert_eq!(decoded.sub, user_id);
        assert_eq!(decoded.username, "alice");
        assert_eq!(decoded.exp, claims.exp);
    }

    #[test]
    fn test_decode_with_wrong_secret() {
        let claims = SessionClaims::new(Uuid::new_v4(), "alice".to_string());
        let token = issue_token(&claims, SECRET).expect("Should create token");

        let result = decode_token(&token, "a-completely-different-secret-value");
        assert!(matches!(result, Err(TokenError::Invalid(_))));
    }

    #[test]
    fn test_decode_expired_token() {
        let now = Utc::now().timestamp();
        // Expired an hour ago, well past jsonwebtoken's default leeway
        let claims = SessionClaims::with_timestamps(
            Uuid::new_v4(),
            "alice".to_string(),
            now - 7200,
            now - 3600,
        );
        assert!(claims.is_expired());

        let token = issue_token(&claims, SECRET).expect("Should create token");
        let result = decode_token(&token, SECRET);
        assert!(matches!(result, Err(TokenError::Expired)));
    }

    #[test]
    fn test_tampered_token_is_invalid() {
        let claims = SessionClaims::new(Uuid::new_v4(), "alice".to_string());
        let token = issue_token(&claims, SECRET).expect("Should create token");

        // Flip a byte in the claims segment
        let mut parts: Vec<String> = token.split('.').map(str::to_string).collect();
        let mut payload = parts[1].clone().into_bytes();
        let idx = payload.len() / 2;
        payload[idx] = if payload[idx] == b'A' { b'B' } else { b'A' };
        parts[1] = String::from_utf8(payload).unwrap();
        let tampered = parts.join(".");

        assert!(matches!(
            decode_token(&tampered, SECRET),
            Err(TokenError::Invalid(_))
        ));

        // And a byte in the signature segment
        let mut parts: Vec<String> = token.split('.').map(str::to_string).collect();
        let mut sig = parts[2].clone().into_bytes();
        sig[0] = if sig[0] == b'A' { b'B' } else { b'A' };
        parts[2] = String::from_utf8(sig).unwrap();
        let tampered = parts.join(".");

        assert!(matches!(
            decode_token(&tampered, SECRET),
            Err(TokenError::Invalid(_))
        ));
    }

    #[test]
    fn test_garbage_token_is_invalid() {
        assert!(matches!(
            decode_token("not-a-token", SECRET),
            Err(TokenError::Invalid(_))
        ));
        assert!(matches!(
            decode_token("", SECRET),
            Err(TokenError::Invalid(_))
        ));
    }
}
