/// Authentication endpoints
///
/// This module provides session authentication endpoints:
/// - Login (credential check + token issuance)
/// - Session info (current claims, no database hit)
///
/// The API never sets cookies itself; the client stores the returned token in
/// the `token` cookie, which the auth middleware and access guard then read.
///
/// # Endpoints
///
/// - `POST /api/auth/login` - Verify credentials and issue a session token
/// - `GET /api/auth/me` - Return the authenticated user's claims

use crate::{
    app::AppState,
    error::{ApiError, ApiResult, ValidationErrorDetail},
    extract::Json,
    middleware::auth::CurrentUser,
};
use axum::{extract::State, Extension};
use serde::{Deserialize, Serialize};
use taskboard_shared::{
    auth::{jwt, password},
    models::user::{Role, User},
};
use std::sync::OnceLock;
use uuid::Uuid;
use validator::Validate;

/// Hash verified against when the username does not exist, so the
/// unknown-username path costs as much as a real verification and response
/// timing does not reveal which usernames are taken
fn decoy_hash() -> &'static str {
    static DECOY: OnceLock<String> = OnceLock::new();
    DECOY.get_or_init(|| password::hash_password("decoy password").expect("decoy hash"))
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

/// Login response
#[derive(Debug, Serialize, Deserialize)]
pub struct LoginResponse {
    /// Signed session token (8h expiry)
    pub token: String,
}

/// Session info response
#[derive(Debug, Serialize, Deserialize)]
pub struct MeResponse {
    /// User ID
    pub id: Uuid,

    /// Username
    pub username: String,

    /// Role
    pub role: Role,
}

/// Login endpoint
///
/// Verifies the username and password and returns a signed session token.
/// Unknown usernames and wrong passwords produce the same error so the
/// response does not reveal which usernames exist.
///
/// # Endpoint
///
/// ```text
/// POST /api/auth/login
/// Content-Type: application/json
///
/// {
///   "username": "alice",
///   "password": "secret"
/// }
/// ```
///
/// # Response
///
/// ```json
/// {
///   "token": "eyJ..."
/// }
/// ```
///
/// # Errors
///
/// - `400 Bad Request`: Validation failed
/// - `401 Unauthorized`: Invalid credentials
/// - `500 Internal Server Error`: Server error
pub async fn login(
    State(state): State<AppState>,
    Json(req): Json<LoginRequest>,
) -> ApiResult<Json<LoginResponse>> {
    // Validate request
    req.validate().map_err(|e| {
        let errors: Vec<ValidationErrorDetail> = e
            .field_errors()
            .iter()
            .flat_map(|(field, errors)| {
                errors.iter().map(move |error| ValidationErrorDetail {
                    field: field.to_string(),
                    message: error
                        .message
                        .as_ref()
                        .map(|m| m.to_string())
                        .unwrap_or_else(|| "Validation failed".to_string()),
                })
            })
            .collect();
        ApiError::ValidationError(errors)
    })?;

    // Find user by username
    let user = match User::find_by_username(&state.db, &req.username).await? {
        Some(user) => user,
        None => {
            // Same work and same message as a wrong password
            let _ = password::verify_password(&req.password, decoy_hash());
            return Err(ApiError::Unauthorized(
                "Invalid username or password".to_string(),
            ));
        }
    };

    // Verify password
    let valid = password::verify_password(&req.password, &user.password_hash)?;
    if !valid {
        return Err(ApiError::Unauthorized(
            "Invalid username or password".to_string(),
        ));
    }

    // Issue session token
    let claims = jwt::Claims::for_user(&user);
    let token = jwt::issue_token(&claims, state.jwt_secret())?;

    Ok(Json(LoginResponse { token }))
}

/// Session info endpoint
///
/// Returns the identity carried by the verified session token. Reads only the
/// claims injected by the auth middleware, so a deleted user still resolves
/// until their token expires.
///
/// # Endpoint
///
/// ```text
/// GET /api/auth/me
/// Cookie: token=eyJ...
/// ```
///
/// # Response
///
/// ```json
/// {
///   "id": "uuid",
///   "username": "alice",
///   "role": "employee"
/// }
/// ```
///
/// # Errors
///
/// - `401 Unauthorized`: Missing, invalid, or expired token
pub async fn me(Extension(current): Extension<CurrentUser>) -> ApiResult<Json<MeResponse>> {
    Ok(Json(MeResponse {
        id: current.id,
        username: current.username,
        role: current.role,
    }))
}
