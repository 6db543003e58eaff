/// Cookie session authentication for API routes
///
/// Extracts the `token` cookie, verifies it, and injects a [`CurrentUser`]
/// into request extensions. The authenticated context is resolved exactly
/// once per request; handlers receive it via `Extension<CurrentUser>` and
/// never re-fetch the caller's role.
///
/// # Example
///
/// ```no_run
/// use axum::Extension;
/// use taskboard_api::middleware::auth::CurrentUser;
///
/// async fn handler(Extension(current): Extension<CurrentUser>) -> String {
///     format!("User: {} ({})", current.username, current.role.as_str())
/// }
/// ```

use axum::{
    extract::{Request, State},
    http::{header, HeaderMap},
    middleware::Next,
    response::Response,
};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{app::AppState, error::ApiError};
use taskboard_shared::{auth::jwt, models::user::Role};

/// Name of the session cookie
pub const TOKEN_COOKIE: &str = "token";

/// Authenticated caller context, added to request extensions
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CurrentUser {
    /// Verified user ID
    pub id: Uuid,

    /// Username from the token claims
    pub username: String,

    /// Role from the token claims
    pub role: Role,
}

impl CurrentUser {
    /// Creates a context from verified claims
    pub fn from_claims(claims: jwt::Claims) -> Self {
        Self {
            id: claims.sub,
            username: claims.username,
            role: claims.role,
        }
    }

    /// Rejects callers whose role cannot manage users, tasks, and reports
    ///
    /// The single capability check consulted at every admin boundary.
    pub fn require_manage(&self) -> Result<(), ApiError> {
        if self.role.can_manage() {
            Ok(())
        } else {
            Err(ApiError::Unauthorized(
                "Administrator access required".to_string(),
            ))
        }
    }
}

/// Reads the session token from the Cookie header
pub fn token_from_headers(headers: &HeaderMap) -> Option<String> {
    let raw = headers.get(header::COOKIE)?.to_str().ok()?;

    raw.split(';')
        .map(str::trim)
        .find_map(|pair| pair.strip_prefix(TOKEN_COOKIE)?.strip_prefix('='))
        .filter(|value| !value.is_empty())
        .map(str::to_string)
}

/// Session authentication middleware layer
///
/// Verifies the `token` cookie and injects [`CurrentUser`]. Any missing,
/// malformed, expired, or mis-signed token yields 401.
pub async fn session_auth_layer(
    State(state): State<AppState>,
    mut req: Request,
    next: Next,
) -> Result<Response, ApiError> {
    let token = token_from_headers(req.headers())
        .ok_or_else(|| ApiError::Unauthorized("Missing session token".to_string()))?;

    let claims = jwt::verify_token(&token, state.jwt_secret())?;

    req.extensions_mut().insert(CurrentUser::from_claims(claims));

    Ok(next.run(req).await)
}
