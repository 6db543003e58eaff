/// PDF report endpoints (admin only)
///
/// Both endpoints gather their data with the same store queries the JSON
/// endpoints use, hand the rows to the report compiler, and stream the
/// resulting bytes back as a file download.
///
/// # Endpoints
///
/// - `GET /api/reports/global` - All users and all tasks
/// - `GET /api/reports/user/:id` - One user and their assigned tasks

use crate::{
    app::AppState,
    error::{ApiError, ApiResult},
    middleware::auth::CurrentUser,
    report,
};
use axum::{
    extract::{Path, State},
    http::header,
    response::{IntoResponse, Response},
    Extension,
};
use taskboard_shared::models::{task::Task, user::User};
use uuid::Uuid;

fn pdf_response(bytes: Vec<u8>, filename: &str) -> Response {
    (
        [
            (header::CONTENT_TYPE, "application/pdf".to_string()),
            (
                header::CONTENT_DISPOSITION,
                format!("attachment; filename=\"{filename}\""),
            ),
        ],
        bytes,
    )
        .into_response()
}

/// Global report: every user and every task
///
/// # Endpoint
///
/// ```text
/// GET /api/reports/global
/// Cookie: token=eyJ... (admin)
/// ```
///
/// Responds with `application/pdf` and
/// `Content-Disposition: attachment; filename="report-global.pdf"`.
///
/// # Errors
///
/// - `401 Unauthorized`: Missing token or caller is not an administrator
/// - `500 Internal Server Error`: Report generation failed
pub async fn global_report(
    State(state): State<AppState>,
    Extension(current): Extension<CurrentUser>,
) -> ApiResult<Response> {
    current.require_manage()?;

    let users = User::list_summaries(&state.db).await?;
    let tasks = Task::list_all_with_names(&state.db).await?;

    let bytes = report::global_report(&users, &tasks)?;

    Ok(pdf_response(bytes, "report-global.pdf"))
}

/// Per-user report: one user's profile and assigned tasks
///
/// # Endpoint
///
/// ```text
/// GET /api/reports/user/:id
/// Cookie: token=eyJ... (admin)
/// ```
///
/// Responds with `application/pdf` and
/// `Content-Disposition: attachment; filename="report-<username>.pdf"`.
///
/// # Errors
///
/// - `401 Unauthorized`: Missing token or caller is not an administrator
/// - `404 Not Found`: No user with this id
/// - `500 Internal Server Error`: Report generation failed
pub async fn user_report(
    State(state): State<AppState>,
    Extension(current): Extension<CurrentUser>,
    Path(id): Path<Uuid>,
) -> ApiResult<Response> {
    current.require_manage()?;

    let user = User::find_by_id(&state.db, id)
        .await?
        .ok_or_else(|| ApiError::NotFound("User not found".to_string()))?;

    let tasks = Task::list_assigned_with_names(&state.db, user.id).await?;

    let filename = format!("report-{}.pdf", user.username);
    let bytes = report::user_report(&user.into(), &tasks)?;

    Ok(pdf_response(bytes, &filename))
}
