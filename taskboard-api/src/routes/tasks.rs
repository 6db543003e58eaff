/// Task management endpoints
///
/// This module provides task CRUD endpoints. Listing is role-scoped:
/// administrators see every task, employees only the ones assigned to them.
/// Updates come in two shapes, a status-only move and a full overwrite, told
/// apart by payload shape rather than by inspecting key counts.
///
/// # Endpoints
///
/// - `GET /api/tasks` - List tasks visible to the caller
/// - `POST /api/tasks` - Create a task
/// - `PUT /api/tasks/:id` - Update a task (full or status-only)
/// - `DELETE /api/tasks/:id` - Delete a task (admin only)

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
use taskboard_shared::models::{
    task::{CreateTask, Task, TaskPriority, TaskStatus, TaskWithNames, UpdateTask},
    user::User,
};
use uuid::Uuid;
use validator::Validate;

/// Task list response
#[derive(Debug, Serialize, Deserialize)]
pub struct TaskListResponse {
    /// Tasks visible to the caller, in creation order
    pub tasks: Vec<TaskWithNames>,
}

/// Create task request
///
/// Field names match the columns on the wire (`assigned_to`, not camelCase);
/// only the create response uses `taskId`.
#[derive(Debug, Deserialize, Validate)]
pub struct CreateTaskRequest {
    /// Task title
    #[validate(length(min = 1, max = 200, message = "Title must be 1-200 characters"))]
    pub title: String,

    /// Task description
    #[validate(length(max = 2000, message = "Description must be at most 2000 characters"))]
    pub description: String,

    /// Assignee user ID
    pub assigned_to: Uuid,

    /// Priority
    pub priority: TaskPriority,

    /// Initial status (defaults to pending)
    #[serde(default)]
    pub status: TaskStatus,
}

/// Create task response
#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateTaskResponse {
    /// New task ID
    pub task_id: Uuid,
}

/// Status-only update payload (`{"status": "..."}` and nothing else)
#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct StatusOnlyUpdate {
    /// New status
    pub status: TaskStatus,
}

/// Full update payload (overwrites every mutable field)
///
/// Every field is required; a body missing one is rejected rather than
/// silently overwriting the column with a default.
#[derive(Debug, Deserialize, Validate)]
#[serde(deny_unknown_fields)]
pub struct FullTaskUpdate {
    /// Task title
    #[validate(length(min = 1, max = 200, message = "Title must be 1-200 characters"))]
    pub title: String,

    /// Task description
    #[validate(length(max = 2000, message = "Description must be at most 2000 characters"))]
    pub description: String,

    /// Assignee user ID
    pub assigned_to: Uuid,

    /// Priority
    pub priority: TaskPriority,

    /// Status
    pub status: TaskStatus,
}

/// Update payload, distinguished by shape
///
/// The status-only variant is tried first; `deny_unknown_fields` on both
/// variants keeps the two shapes disjoint, so a body carrying `status` plus
/// anything else can only parse as a full update.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
pub enum TaskUpdateRequest {
    /// Move the task to a new status, leaving everything else untouched
    Status(StatusOnlyUpdate),

    /// Overwrite every mutable field
    Full(FullTaskUpdate),
}

/// Task update response
#[derive(Debug, Serialize)]
pub struct TaskResponse {
    /// The task after the update
    pub task: Task,
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

/// List tasks visible to the caller
///
/// Administrators get every task; employees only those assigned to them.
/// Each task carries the creator's and assignee's display names.
///
/// # Endpoint
///
/// ```text
/// GET /api/tasks
/// Cookie: token=eyJ...
/// ```
///
/// # Response
///
/// ```json
/// {
///   "tasks": [ { "id": "uuid", "title": "...", "creator_name": "...", ... } ]
/// }
/// ```
///
/// # Errors
///
/// - `401 Unauthorized`: Missing or invalid token
pub async fn list_tasks(
    State(state): State<AppState>,
    Extension(current): Extension<CurrentUser>,
) -> ApiResult<Json<TaskListResponse>> {
    let tasks = if current.role.sees_all_tasks() {
        Task::list_all_with_names(&state.db).await?
    } else {
        Task::list_assigned_with_names(&state.db, current.id).await?
    };

    Ok(Json(TaskListResponse { tasks }))
}

/// Create a task
///
/// The creator is always the authenticated caller; the request body cannot
/// override it. The assignee must exist. Status defaults to pending.
///
/// # Endpoint
///
/// ```text
/// POST /api/tasks
/// Cookie: token=eyJ...
/// Content-Type: application/json
///
/// {
///   "title": "Ship the release",
///   "description": "Cut and tag v1.2",
///   "assigned_to": "uuid",
///   "priority": "high"
/// }
/// ```
///
/// # Response
///
/// `201 Created`
/// ```json
/// {
///   "taskId": "uuid"
/// }
/// ```
///
/// # Errors
///
/// - `400 Bad Request`: Validation failed or unknown assignee
/// - `401 Unauthorized`: Missing or invalid token
pub async fn create_task(
    State(state): State<AppState>,
    Extension(current): Extension<CurrentUser>,
    Json(req): Json<CreateTaskRequest>,
) -> ApiResult<(StatusCode, Json<CreateTaskResponse>)> {
    req.validate().map_err(validation_details)?;

    // Assignee must exist before we write
    User::find_by_id(&state.db, req.assigned_to)
        .await?
        .ok_or_else(|| ApiError::BadRequest("Assignee does not exist".to_string()))?;

    let task = Task::create(
        &state.db,
        CreateTask {
            title: req.title,
            description: req.description,
            created_by: current.id,
            assigned_to: req.assigned_to,
            priority: req.priority,
            status: req.status,
        },
    )
    .await?;

    Ok((
        StatusCode::CREATED,
        Json(CreateTaskResponse { task_id: task.id }),
    ))
}

/// Update a task
///
/// Accepts either a status-only body (`{"status": "review"}`), which moves the
/// task without touching any other field, or a full body that overwrites
/// title, description, assignee, priority, and status.
///
/// # Endpoint
///
/// ```text
/// PUT /api/tasks/:id
/// Cookie: token=eyJ...
/// Content-Type: application/json
/// ```
///
/// # Response
///
/// ```json
/// {
///   "task": { "id": "uuid", "status": "review", ... }
/// }
/// ```
///
/// # Errors
///
/// - `400 Bad Request`: Validation failed or unknown assignee
/// - `401 Unauthorized`: Missing or invalid token
/// - `404 Not Found`: No task with this id
pub async fn update_task(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(req): Json<TaskUpdateRequest>,
) -> ApiResult<Json<TaskResponse>> {
    let updated = match req {
        TaskUpdateRequest::Status(body) => {
            Task::update_status(&state.db, id, body.status).await?
        }
        TaskUpdateRequest::Full(body) => {
            body.validate().map_err(validation_details)?;

            User::find_by_id(&state.db, body.assigned_to)
                .await?
                .ok_or_else(|| ApiError::BadRequest("Assignee does not exist".to_string()))?;

            Task::update(
                &state.db,
                id,
                UpdateTask {
                    title: body.title,
                    description: body.description,
                    assigned_to: body.assigned_to,
                    priority: body.priority,
                    status: body.status,
                },
            )
            .await?
        }
    };

    let task = updated.ok_or(ApiError::NotFound("Task not found".to_string()))?;

    Ok(Json(TaskResponse { task }))
}

/// Delete task response
#[derive(Debug, Serialize, Deserialize)]
pub struct DeleteResponse {
    /// Human-readable confirmation
    pub message: String,
}

/// Delete a task (admin only)
///
/// # Endpoint
///
/// ```text
/// DELETE /api/tasks/:id
/// Cookie: token=eyJ... (admin)
/// ```
///
/// # Errors
///
/// - `401 Unauthorized`: Missing token or caller is not an administrator
/// - `404 Not Found`: No task with this id
pub async fn delete_task(
    State(state): State<AppState>,
    Extension(current): Extension<CurrentUser>,
    Path(id): Path<Uuid>,
) -> ApiResult<Json<DeleteResponse>> {
    current.require_manage()?;

    let deleted = Task::delete(&state.db, id).await?;
    if !deleted {
        return Err(ApiError::NotFound("Task not found".to_string()));
    }

    Ok(Json(DeleteResponse {
        message: "Task deleted".to_string(),
    }))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_only_body_picks_status_branch() {
        let req: TaskUpdateRequest = serde_json::from_str(r#"{"status": "review"}"#).unwrap();
        assert!(matches!(
            req,
            TaskUpdateRequest::Status(StatusOnlyUpdate {
                status: TaskStatus::Review
            })
        ));
    }

    #[test]
    fn test_full_body_picks_full_branch() {
        let body = serde_json::json!({
            "title": "Write docs",
            "description": "API reference",
            "assigned_to": "550e8400-e29b-41d4-a716-446655440000",
            "priority": "low",
            "status": "in_progress"
        });
        let req: TaskUpdateRequest = serde_json::from_value(body).unwrap();
        match req {
            TaskUpdateRequest::Full(full) => {
                assert_eq!(full.title, "Write docs");
                assert_eq!(full.status, TaskStatus::InProgress);
            }
            TaskUpdateRequest::Status(_) => panic!("expected full update"),
        }
    }

    #[test]
    fn test_full_update_requires_description() {
        // Without a description the body is neither shape; rejecting it beats
        // overwriting the column with an empty string
        let body = serde_json::json!({
            "title": "Write docs",
            "assigned_to": "550e8400-e29b-41d4-a716-446655440000",
            "priority": "low",
            "status": "in_progress"
        });
        assert!(serde_json::from_value::<TaskUpdateRequest>(body).is_err());
    }

    #[test]
    fn test_status_plus_extra_key_is_not_status_only() {
        // An extra key beside status must not be silently dropped
        let body = serde_json::json!({"status": "completed", "title": "sneaky"});
        let req: Result<TaskUpdateRequest, _> = serde_json::from_value(body);
        assert!(req.is_err());
    }

    #[test]
    fn test_create_body_uses_snake_case_fields() {
        // The documented wire shape: status optional, everything else snake_case
        let body = serde_json::json!({
            "title": "New task",
            "description": "No status in the payload",
            "assigned_to": "550e8400-e29b-41d4-a716-446655440000",
            "priority": "medium"
        });
        let req: CreateTaskRequest = serde_json::from_value(body).unwrap();
        assert_eq!(req.status, TaskStatus::Pending);

        let camel = serde_json::json!({
            "title": "New task",
            "description": "Wrong casing",
            "assignedTo": "550e8400-e29b-41d4-a716-446655440000",
            "priority": "medium"
        });
        assert!(serde_json::from_value::<CreateTaskRequest>(camel).is_err());
    }

    #[test]
    fn test_create_requires_priority() {
        let body = serde_json::json!({
            "title": "New task",
            "description": "Missing priority",
            "assigned_to": "550e8400-e29b-41d4-a716-446655440000"
        });
        assert!(serde_json::from_value::<CreateTaskRequest>(body).is_err());
    }
}
