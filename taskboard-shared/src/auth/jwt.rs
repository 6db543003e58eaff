/// Session token issuance and verification
///
/// Tokens are signed using HS256 (HMAC-SHA256) and carry the authenticated
/// user's id, username, and role. They are valid for 8 hours from issuance.
///
/// Verification failures are always returned as [`JwtError`] values, never
/// panics: callers treat any failure as "unauthenticated", not as a fatal
/// error.
///
/// # Example
///
/// ```
/// use taskboard_shared::auth::jwt::{issue_token, verify_token, Claims};
/// use taskboard_shared::models::user::Role;
/// use uuid::Uuid;
///
/// # fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let claims = Claims::new(Uuid::new_v4(), "maria".to_string(), Role::Employee);
/// let token = issue_token(&claims, "secret-key-at-least-32-bytes-long!!")?;
///
/// let verified = verify_token(&token, "secret-key-at-least-32-bytes-long!!")?;
/// assert_eq!(verified.sub, claims.sub);
/// assert_eq!(verified.role, Role::Employee);
/// # Ok(())
/// # }
/// ```

use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::models::user::{Role, User};

/// Token issuer, checked during verification
pub const ISSUER: &str = "taskboard";

/// Session lifetime in hours
pub const TOKEN_TTL_HOURS: i64 = 8;

/// Error type for token operations
#[derive(Debug, thiserror::Error)]
pub enum JwtError {
    /// Failed to sign a token
    #[error("Failed to issue token: {0}")]
    IssueError(String),

    /// Token failed signature or structural validation
    #[error("Invalid token: {0}")]
    Invalid(String),

    /// Token has expired
    #[error("Token has expired")]
    Expired,
}

/// Decoded session token payload
///
/// `sub` is the user id; `role` drives every authorization decision after the
/// token is verified (no re-fetching of the role per request).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    /// Subject - user ID
    pub sub: Uuid,

    /// Username at issuance time
    pub username: String,

    /// Role at issuance time
    pub role: Role,

    /// Issuer - always "taskboard"
    pub iss: String,

    /// Issued at (Unix timestamp)
    pub iat: i64,

    /// Expiration time (Unix timestamp)
    pub exp: i64,
}

impl Claims {
    /// Creates claims expiring [`TOKEN_TTL_HOURS`] from now
    pub fn new(user_id: Uuid, username: String, role: Role) -> Self {
        Self::with_expiration(user_id, username, role, Duration::hours(TOKEN_TTL_HOURS))
    }

    /// Creates claims for a stored user
    pub fn for_user(user: &User) -> Self {
        Self::new(user.id, user.username.clone(), user.role)
    }

    /// Creates claims with a custom lifetime (used by expiry tests)
    pub fn with_expiration(user_id: Uuid, username: String, role: Role, ttl: Duration) -> Self {
        let now = Utc::now();

        Self {
            sub: user_id,
            username,
            role,
            iss: ISSUER.to_string(),
            iat: now.timestamp(),
            exp: (now + ttl).timestamp(),
        }
    }

    /// Checks if the claims have expired
    pub fn is_expired(&self) -> bool {
        Utc::now().timestamp() >= self.exp
    }
}

/// Signs claims into a token string
///
/// # Errors
///
/// Returns `JwtError::IssueError` if encoding fails
pub fn issue_token(claims: &Claims, secret: &str) -> Result<String, JwtError> {
    let header = Header::new(Algorithm::HS256);
    let key = EncodingKey::from_secret(secret.as_bytes());

    encode(&header, claims, &key).map_err(|e| JwtError::IssueError(format!("{}", e)))
}

/// Verifies a token and extracts its claims
///
/// Checks the signature, expiry, and issuer. Any malformed, expired, or
/// mis-signed input comes back as an error value.
pub fn verify_token(token: &str, secret: &str) -> Result<Claims, JwtError> {
    let key = DecodingKey::from_secret(secret.as_bytes());

    let mut validation = Validation::new(Algorithm::HS256);
    validation.set_issuer(&[ISSUER]);
    validation.validate_exp = true;

    let token_data = decode::<Claims>(token, &key, &validation).map_err(|e| match e.kind() {
        jsonwebtoken::errors::ErrorKind::ExpiredSignature => JwtError::Expired,
        _ => JwtError::Invalid(format!("{}", e)),
    })?;

    Ok(token_data.claims)
}
