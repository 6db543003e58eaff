/// End-to-end API tests against a live PostgreSQL
///
/// All tests here are `#[ignore]`d; they need `DATABASE_URL` pointing at a
/// database the suite may write to. Run with:
///
/// ```bash
/// DATABASE_URL=postgres://... cargo test -p taskboard-api -- --ignored
/// ```

mod common;

use axum::body::Body;
use axum::http::{header, Request, StatusCode};
use common::TestContext;
use serde_json::json;
use tower::ServiceExt as _;

fn request(
    method: &str,
    uri: &str,
    token: &str,
    body: Option<serde_json::Value>,
) -> Request<Body> {
    let builder = Request::builder()
        .method(method)
        .uri(uri)
        .header(header::COOKIE, format!("token={token}"));

    match body {
        Some(json) => builder
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(json.to_string()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    }
}

async fn json_body(response: axum::response::Response) -> serde_json::Value {
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    serde_json::from_slice(&bytes).unwrap()
}

#[tokio::test]
#[ignore = "requires a running PostgreSQL instance"]
async fn test_login_returns_usable_token() {
    let ctx = TestContext::new().await.unwrap();

    let login = Request::builder()
        .method("POST")
        .uri("/api/auth/login")
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(
            json!({
                "username": ctx.employee.username,
                "password": "correct horse battery"
            })
            .to_string(),
        ))
        .unwrap();

    let response = ctx.app.clone().oneshot(login).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let body = json_body(response).await;
    let token = body["token"].as_str().expect("token in login response");

    // The returned token authenticates follow-up requests
    let me = request("GET", "/api/auth/me", token, None);
    let response = ctx.app.clone().oneshot(me).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let body = json_body(response).await;
    assert_eq!(body["username"], ctx.employee.username.as_str());

    ctx.cleanup().await.unwrap();
}

#[tokio::test]
#[ignore = "requires a running PostgreSQL instance"]
async fn test_login_rejects_wrong_password() {
    let ctx = TestContext::new().await.unwrap();

    let login = Request::builder()
        .method("POST")
        .uri("/api/auth/login")
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(
            json!({
                "username": ctx.employee.username,
                "password": "wrong password"
            })
            .to_string(),
        ))
        .unwrap();

    let response = ctx.app.clone().oneshot(login).await.unwrap();
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    let wrong_password_body = json_body(response).await;

    // Unknown usernames are indistinguishable from wrong passwords
    let login = Request::builder()
        .method("POST")
        .uri("/api/auth/login")
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(
            json!({
                "username": "no-such-user",
                "password": "wrong password"
            })
            .to_string(),
        ))
        .unwrap();

    let response = ctx.app.clone().oneshot(login).await.unwrap();
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    assert_eq!(json_body(response).await, wrong_password_body);

    ctx.cleanup().await.unwrap();
}

#[tokio::test]
#[ignore = "requires a running PostgreSQL instance"]
async fn test_create_task_defaults_to_pending() {
    let ctx = TestContext::new().await.unwrap();

    let create = request(
        "POST",
        "/api/tasks",
        &ctx.employee_token,
        Some(json!({
            "title": "Default status task",
            "description": "No status in the payload",
            "assigned_to": ctx.employee.id,
            "priority": "medium"
        })),
    );

    let response = ctx.app.clone().oneshot(create).await.unwrap();
    assert_eq!(response.status(), StatusCode::CREATED);

    let body = json_body(response).await;
    assert!(body["taskId"].is_string());

    // The employee sees the task in their scoped listing, status pending
    let list = request("GET", "/api/tasks", &ctx.employee_token, None);
    let response = ctx.app.clone().oneshot(list).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let body = json_body(response).await;
    let tasks = body["tasks"].as_array().unwrap();
    let created = tasks
        .iter()
        .find(|t| t["title"] == "Default status task")
        .expect("created task in listing");
    assert_eq!(created["status"], "pending");

    ctx.cleanup().await.unwrap();
}

#[tokio::test]
#[ignore = "requires a running PostgreSQL instance"]
async fn test_status_only_update_leaves_other_fields() {
    let ctx = TestContext::new().await.unwrap();

    let create = request(
        "POST",
        "/api/tasks",
        &ctx.admin_token,
        Some(json!({
            "title": "Original title",
            "description": "Original description",
            "assigned_to": ctx.employee.id,
            "priority": "high"
        })),
    );
    let response = ctx.app.clone().oneshot(create).await.unwrap();
    assert_eq!(response.status(), StatusCode::CREATED);
    let task_id = json_body(response).await["taskId"]
        .as_str()
        .unwrap()
        .to_string();

    let update = request(
        "PUT",
        &format!("/api/tasks/{task_id}"),
        &ctx.employee_token,
        Some(json!({"status": "review"})),
    );
    let response = ctx.app.clone().oneshot(update).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let task = &json_body(response).await["task"];
    assert_eq!(task["status"], "review");
    assert_eq!(task["title"], "Original title");
    assert_eq!(task["description"], "Original description");
    assert_eq!(task["priority"], "high");

    ctx.cleanup().await.unwrap();
}

#[tokio::test]
#[ignore = "requires a running PostgreSQL instance"]
async fn test_employee_listing_is_scoped_to_assignments() {
    let ctx = TestContext::new().await.unwrap();

    // One task for the employee, one for the admin
    for (title, assignee) in [
        ("Employee task", ctx.employee.id),
        ("Admin task", ctx.admin.id),
    ] {
        let create = request(
            "POST",
            "/api/tasks",
            &ctx.admin_token,
            Some(json!({
                "title": title,
                "description": "Scoping check",
                "assigned_to": assignee,
                "priority": "low"
            })),
        );
        let response = ctx.app.clone().oneshot(create).await.unwrap();
        assert_eq!(response.status(), StatusCode::CREATED);
    }

    let list = request("GET", "/api/tasks", &ctx.employee_token, None);
    let body = json_body(ctx.app.clone().oneshot(list).await.unwrap()).await;
    let titles: Vec<&str> = body["tasks"]
        .as_array()
        .unwrap()
        .iter()
        .map(|t| t["title"].as_str().unwrap())
        .collect();
    assert!(titles.contains(&"Employee task"));
    assert!(!titles.contains(&"Admin task"));

    ctx.cleanup().await.unwrap();
}

#[tokio::test]
#[ignore = "requires a running PostgreSQL instance"]
async fn test_duplicate_username_is_a_conflict() {
    let ctx = TestContext::new().await.unwrap();

    let create = request(
        "POST",
        "/api/users/create",
        &ctx.admin_token,
        Some(json!({
            "username": ctx.employee.username,
            "email": "different@example.com",
            "password": "longenough",
            "name": "Duplicate"
        })),
    );

    let response = ctx.app.clone().oneshot(create).await.unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let body = json_body(response).await;
    assert_eq!(body["error"], "conflict");

    ctx.cleanup().await.unwrap();
}

#[tokio::test]
#[ignore = "requires a running PostgreSQL instance"]
async fn test_delete_missing_user_is_404() {
    let ctx = TestContext::new().await.unwrap();

    let delete = request(
        "DELETE",
        "/api/users/00000000-0000-0000-0000-000000000000",
        &ctx.admin_token,
        None,
    );
    let response = ctx.app.clone().oneshot(delete).await.unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);

    ctx.cleanup().await.unwrap();
}

#[tokio::test]
#[ignore = "requires a running PostgreSQL instance"]
async fn test_delete_referenced_user_is_refused() {
    let ctx = TestContext::new().await.unwrap();

    let create = request(
        "POST",
        "/api/tasks",
        &ctx.admin_token,
        Some(json!({
            "title": "Blocks deletion",
            "description": "Assigned task pins the user",
            "assigned_to": ctx.employee.id,
            "priority": "high"
        })),
    );
    let response = ctx.app.clone().oneshot(create).await.unwrap();
    assert_eq!(response.status(), StatusCode::CREATED);

    let delete = request(
        "DELETE",
        &format!("/api/users/{}", ctx.employee.id),
        &ctx.admin_token,
        None,
    );
    let response = ctx.app.clone().oneshot(delete).await.unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let body = json_body(response).await;
    assert_eq!(body["error"], "conflict");

    ctx.cleanup().await.unwrap();
}

#[tokio::test]
#[ignore = "requires a running PostgreSQL instance"]
async fn test_global_report_downloads_pdf() {
    let ctx = TestContext::new().await.unwrap();

    let report = request("GET", "/api/reports/global", &ctx.admin_token, None);
    let response = ctx.app.clone().oneshot(report).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(
        response.headers()[header::CONTENT_TYPE],
        "application/pdf"
    );
    assert_eq!(
        response.headers()[header::CONTENT_DISPOSITION],
        "attachment; filename=\"report-global.pdf\""
    );

    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    assert!(bytes.starts_with(b"%PDF"));

    ctx.cleanup().await.unwrap();
}
