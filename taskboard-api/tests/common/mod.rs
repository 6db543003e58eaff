/// Common test utilities for integration tests
///
/// This module provides shared infrastructure for integration tests:
/// - Router construction without a live database (lazy pool)
/// - Session token generation for both roles
/// - A database-backed test context for the `#[ignore]`d end-to-end tests

use sqlx::postgres::PgPoolOptions;
use sqlx::PgPool;
use taskboard_api::app::{build_router, AppState};
use taskboard_api::config::{ApiConfig, Config, DatabaseConfig, JwtConfig};
use taskboard_shared::auth::{jwt, password};
use taskboard_shared::models::user::{CreateUser, Role, User};
use uuid::Uuid;

/// Secret used by every test router
pub const TEST_SECRET: &str = "test-secret-that-is-at-least-32-chars-long";

/// Builds a config that never has to come from the environment
pub fn test_config(database_url: &str) -> Config {
    Config {
        api: ApiConfig {
            host: "127.0.0.1".to_string(),
            port: 0,
            request_timeout_seconds: 30,
        },
        database: DatabaseConfig {
            url: database_url.to_string(),
            max_connections: 5,
        },
        jwt: JwtConfig {
            secret: TEST_SECRET.to_string(),
        },
    }
}

/// Builds the full router over a lazy pool
///
/// The pool never connects until a handler touches it, so guard and auth
/// tests run without Postgres.
pub fn app_without_db() -> axum::Router {
    let url = "postgres://localhost:1/never_connected";
    let db = PgPool::connect_lazy(url).expect("lazy pool");
    build_router(AppState::new(db, test_config(url)))
}

/// Issues a session token for an arbitrary user of the given role
pub fn token_for(role: Role) -> String {
    let claims = jwt::Claims::new(Uuid::new_v4(), "tester".to_string(), role);
    jwt::issue_token(&claims, TEST_SECRET).expect("token")
}

/// Formats a token as the `token` session cookie
pub fn session_cookie(token: &str) -> String {
    format!("token={token}")
}

/// Database-backed test context for the end-to-end tests
///
/// Requires `DATABASE_URL`; the tests using it are `#[ignore]`d by default.
#[allow(dead_code)]
pub struct TestContext {
    pub db: PgPool,
    pub app: axum::Router,
    pub admin: User,
    pub admin_token: String,
    pub employee: User,
    pub employee_token: String,
}

#[allow(dead_code)]
impl TestContext {
    /// Connects to `DATABASE_URL`, migrates, and seeds one admin and one
    /// employee with unique usernames
    pub async fn new() -> anyhow::Result<Self> {
        let url = std::env::var("DATABASE_URL")?;

        let db = PgPoolOptions::new()
            .max_connections(5)
            .connect(&url)
            .await?;

        taskboard_shared::db::migrations::run_migrations(&db).await?;

        let suffix = Uuid::new_v4().simple().to_string();
        let admin = Self::seed_user(&db, &format!("admin-{suffix}"), Role::Admin).await?;
        let employee =
            Self::seed_user(&db, &format!("employee-{suffix}"), Role::Employee).await?;

        let admin_token =
            jwt::issue_token(&jwt::Claims::for_user(&admin), TEST_SECRET)?;
        let employee_token =
            jwt::issue_token(&jwt::Claims::for_user(&employee), TEST_SECRET)?;

        let app = build_router(AppState::new(db.clone(), test_config(&url)));

        Ok(Self {
            db,
            app,
            admin,
            admin_token,
            employee,
            employee_token,
        })
    }

    async fn seed_user(db: &PgPool, username: &str, role: Role) -> anyhow::Result<User> {
        let user = User::create(
            db,
            CreateUser {
                username: username.to_string(),
                email: format!("{username}@example.com"),
                password_hash: password::hash_password("correct horse battery")?,
                name: username.to_string(),
                role,
            },
        )
        .await?;
        Ok(user)
    }

    /// Removes the rows this context created
    pub async fn cleanup(&self) -> anyhow::Result<()> {
        sqlx::query("DELETE FROM tasks WHERE created_by = $1 OR created_by = $2")
            .bind(self.admin.id)
            .bind(self.employee.id)
            .execute(&self.db)
            .await?;
        sqlx::query("DELETE FROM users WHERE id = $1 OR id = $2")
            .bind(self.admin.id)
            .bind(self.employee.id)
            .execute(&self.db)
            .await?;
        Ok(())
    }
}
