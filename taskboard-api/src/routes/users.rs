/// User administration endpoints
///
/// Listing is open to any authenticated user (assignee pickers need it);
/// everything that mutates users is admin-only. Passwords are hashed before
/// they touch the database and hashes never leave it.
///
/// # Endpoints
///
/// - `GET /api/users` - List user summaries
/// - `POST /api/users/create` - Create a user (admin only)
/// - `PUT /api/users/:id` - Update a user (admin only)
/// - `DELETE /api/users/:id` - Delete a user (admin only)

use crate::{
    app::AppState,
    error::{ApiError, ApiResult, ValidationErrorDetail},
    extract::Json,
    middleware::auth::CurrentUser,
};
use axum::{
    extract::{Path, State},
    http::StatusCode,
    Extension,
};
use serde::{Deserialize, Serialize};
use taskboard_shared::{
    auth::password,
    models::{
        task::Task,
        user::{Role, UpdateUser, User, UserSummary},
    },
};
use uuid::Uuid;
use validator::Validate;

/// User list response
#[derive(Debug, Serialize, Deserialize)]
pub struct UserListResponse {
    /// All users, without password hashes
    pub users: Vec<UserSummary>,
}

/// Create user request
#[derive(Debug, Deserialize, Validate)]
pub struct CreateUserRequest {
    /// Username (unique)
    #[validate(length(min = 3, max = 50, message = "Username must be 3-50 characters"))]
    pub username: String,

    /// Email address (unique)
    #[validate(email(message = "Invalid email format"))]
    pub email: String,

    /// Password
    #[validate(length(min = 8, message = "Password must be at least 8 characters"))]
    pub password: String,

    /// Display name
    #[validate(length(min = 1, max = 100, message = "Name must be 1-100 characters"))]
    pub name: String,

    /// Role (defaults to employee)
    #[serde(default = "default_role")]
    pub role: Role,
}

fn default_role() -> Role {
    Role::Employee
}

/// Create user response
#[derive(Debug, Serialize, Deserialize)]
pub struct CreateUserResponse {
    /// New user ID
    pub id: Uuid,
}

/// Update user request (any subset of fields)
#[derive(Debug, Deserialize, Validate)]
pub struct UpdateUserRequest {
    /// New username
    #[validate(length(min = 3, max = 50, message = "Username must be 3-50 characters"))]
    pub username: Option<String>,

    /// New email address
    #[validate(email(message = "Invalid email format"))]
    pub email: Option<String>,

    /// New password (re-hashed; existing hash untouched when absent)
    #[validate(length(min = 8, message = "Password must be at least 8 characters"))]
    pub password: Option<String>,

    /// New display name
    #[validate(length(min = 1, max = 100, message = "Name must be 1-100 characters"))]
    pub name: Option<String>,

    /// New role
    pub role: Option<Role>,
}

/// User response
#[derive(Debug, Serialize)]
pub struct UserResponse {
    /// The user after the update
    pub user: UserSummary,
}

/// Delete user response
#[derive(Debug, Serialize, Deserialize)]
pub struct DeleteResponse {
    /// Human-readable confirmation
    pub message: String,
}

fn validation_details(e: validator::ValidationErrors) -> ApiError {
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
}

/// List all users
///
/// Returns summaries only; the password hash has no serialized representation.
///
/// # Endpoint
///
/// ```text
/// GET /api/users
/// Cookie: token=eyJ...
/// ```
///
/// # Errors
///
/// - `401 Unauthorized`: Missing or invalid token
pub async fn list_users(State(state): State<AppState>) -> ApiResult<Json<UserListResponse>> {
    let users = User::list_summaries(&state.db).await?;
    Ok(Json(UserListResponse { users }))
}

/// Create a user (admin only)
///
/// The uniqueness check and the insert run in one transaction so two
/// concurrent creates cannot both pass the check.
///
/// # Endpoint
///
/// ```text
/// POST /api/users/create
/// Cookie: token=eyJ... (admin)
/// Content-Type: application/json
///
/// {
///   "username": "bob",
///   "email": "bob@example.com",
///   "password": "hunter2hunter2",
///   "name": "Bob Example",
///   "role": "employee"
/// }
/// ```
///
/// # Response
///
/// `201 Created`
/// ```json
/// {
///   "id": "uuid"
/// }
/// ```
///
/// # Errors
///
/// - `400 Bad Request`: Validation failed, or username/email already taken
/// - `401 Unauthorized`: Missing token or caller is not an administrator
pub async fn create_user(
    State(state): State<AppState>,
    Extension(current): Extension<CurrentUser>,
    Json(req): Json<CreateUserRequest>,
) -> ApiResult<(StatusCode, Json<CreateUserResponse>)> {
    current.require_manage()?;
    req.validate().map_err(validation_details)?;

    let password_hash = password::hash_password(&req.password)?;

    let mut tx = state.db.begin().await?;

    let taken =
        User::username_or_email_exists(&mut *tx, &req.username, &req.email, None).await?;
    if taken {
        return Err(ApiError::Conflict(
            "Username or email already in use".to_string(),
        ));
    }

    let user = User::create(
        &mut *tx,
        taskboard_shared::models::user::CreateUser {
            username: req.username,
            email: req.email,
            password_hash,
            name: req.name,
            role: req.role,
        },
    )
    .await?;

    tx.commit().await?;

    Ok((StatusCode::CREATED, Json(CreateUserResponse { id: user.id })))
}

/// Update a user (admin only)
///
/// Accepts any subset of fields; a present password is re-hashed, an absent
/// one leaves the stored hash untouched.
///
/// # Endpoint
///
/// ```text
/// PUT /api/users/:id
/// Cookie: token=eyJ... (admin)
/// Content-Type: application/json
/// ```
///
/// # Errors
///
/// - `400 Bad Request`: Validation failed, empty body, or username/email taken
/// - `401 Unauthorized`: Missing token or caller is not an administrator
/// - `404 Not Found`: No user with this id
pub async fn update_user(
    State(state): State<AppState>,
    Extension(current): Extension<CurrentUser>,
    Path(id): Path<Uuid>,
    Json(req): Json<UpdateUserRequest>,
) -> ApiResult<Json<UserResponse>> {
    current.require_manage()?;
    req.validate().map_err(validation_details)?;

    let password_hash = match &req.password {
        Some(plain) => Some(password::hash_password(plain)?),
        None => None,
    };

    let update = UpdateUser {
        username: req.username,
        email: req.email,
        password_hash,
        name: req.name,
        role: req.role,
    };

    if update.is_empty() {
        return Err(ApiError::BadRequest("No fields to update".to_string()));
    }

    let mut tx = state.db.begin().await?;

    // Uniqueness check only when an identity field changes
    if update.username.is_some() || update.email.is_some() {
        let existing = User::find_by_id(&mut *tx, id)
            .await?
            .ok_or_else(|| ApiError::NotFound("User not found".to_string()))?;

        let username = update.username.as_deref().unwrap_or(&existing.username);
        let email = update.email.as_deref().unwrap_or(&existing.email);

        if User::username_or_email_exists(&mut *tx, username, email, Some(id)).await? {
            return Err(ApiError::Conflict(
                "Username or email already in use".to_string(),
            ));
        }
    }

    let user = User::update(&mut *tx, id, update)
        .await?
        .ok_or_else(|| ApiError::NotFound("User not found".to_string()))?;

    tx.commit().await?;

    Ok(Json(UserResponse { user: user.into() }))
}

/// Delete a user (admin only)
///
/// Refused while any task still references the user, as creator or assignee.
/// Reassign or delete those tasks first.
///
/// # Endpoint
///
/// ```text
/// DELETE /api/users/:id
/// Cookie: token=eyJ... (admin)
/// ```
///
/// # Errors
///
/// - `400 Bad Request`: Tasks still reference this user
/// - `401 Unauthorized`: Missing token or caller is not an administrator
/// - `404 Not Found`: No user with this id
pub async fn delete_user(
    State(state): State<AppState>,
    Extension(current): Extension<CurrentUser>,
    Path(id): Path<Uuid>,
) -> ApiResult<Json<DeleteResponse>> {
    current.require_manage()?;

    User::find_by_id(&state.db, id)
        .await?
        .ok_or_else(|| ApiError::NotFound("User not found".to_string()))?;

    let referencing = Task::count_referencing_user(&state.db, id).await?;
    if referencing > 0 {
        return Err(ApiError::Conflict(format!(
            "User still has {referencing} task(s); reassign or delete them first"
        )));
    }

    let deleted = User::delete(&state.db, id).await?;
    if !deleted {
        return Err(ApiError::NotFound("User not found".to_string()));
    }

    Ok(Json(DeleteResponse {
        message: "User deleted".to_string(),
    }))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_create_request_defaults_to_employee() {
        let body = serde_json::json!({
            "username": "carol",
            "email": "carol@example.com",
            "password": "longenough",
            "name": "Carol"
        });
        let req: CreateUserRequest = serde_json::from_value(body).unwrap();
        assert_eq!(req.role, Role::Employee);
    }

    #[test]
    fn test_update_request_accepts_partial_body() {
        let req: UpdateUserRequest = serde_json::from_str(r#"{"name": "New Name"}"#).unwrap();
        assert_eq!(req.name.as_deref(), Some("New Name"));
        assert!(req.username.is_none());
        assert!(req.password.is_none());
    }

    #[test]
    fn test_create_request_rejects_bad_email() {
        let body = serde_json::json!({
            "username": "carol",
            "email": "not-an-email",
            "password": "longenough",
            "name": "Carol"
        });
        let req: CreateUserRequest = serde_json::from_value(body).unwrap();
        assert!(req.validate().is_err());
    }
}
