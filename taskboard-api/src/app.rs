/// Application state and router builder
///
/// This module defines the shared application state and provides
/// a function to build the Axum router with all routes and middleware.
///
/// # Example
///
/// ```no_run
/// use taskboard_api::{app::AppState, config::Config};
/// use sqlx::PgPool;
///
/// # async fn example() -> anyhow::Result<()> {
/// let config = Config::from_env()?;
/// let pool = PgPool::connect(&config.database.url).await?;
/// let state = AppState::new(pool, config);
/// let app = taskboard_api::app::build_router(state);
/// # Ok(())
/// # }
/// ```

use crate::{config::Config, middleware};
use axum::{
    routing::{get, post, put},
    Router,
};
use sqlx::PgPool;
use std::{sync::Arc, time::Duration};
use tower_http::{
    cors::CorsLayer,
    timeout::TimeoutLayer,
    trace::{DefaultMakeSpan, DefaultOnResponse, TraceLayer},
};
use tracing::Level;

/// Shared application state
///
/// This is cloned for each request handler via Axum's `State` extractor.
/// Uses Arc internally for cheap cloning.
#[derive(Clone)]
pub struct AppState {
    /// Database connection pool
    pub db: PgPool,

    /// Application configuration
    pub config: Arc<Config>,
}

impl AppState {
    /// Creates new application state
    pub fn new(db: PgPool, config: Config) -> Self {
        Self {
            db,
            config: Arc::new(config),
        }
    }

    /// Gets JWT secret for token operations
    pub fn jwt_secret(&self) -> &str {
        &self.config.jwt.secret
    }
}

/// Builds the complete Axum router with all routes and middleware
///
/// # Architecture
///
/// ```text
/// /
/// ├── /health                       # Health check (public)
/// ├── /, /login, /dashboard/*       # Page shells behind the access guard
/// └── /api/
///     ├── /auth/login               # POST, public
///     ├── /auth/me                  # GET, session cookie
///     ├── /tasks                    # GET, POST
///     ├── /tasks/:id                # PUT; DELETE is admin-gated in-handler
///     ├── /users                    # GET
///     ├── /users/create             # POST, admin
///     ├── /users/:id                # PUT, DELETE, admin
///     └── /reports/{global,user/:id}# GET, admin, PDF download
/// ```
///
/// Admin gating happens inside the handlers through one capability check
/// (`CurrentUser::require_manage`), so a route carrying both an open and an
/// admin method needs no per-method middleware.
///
/// # Middleware Stack
///
/// Applied in order (bottom to top):
/// 1. Logging (tower-http TraceLayer)
/// 2. CORS (tower-http CorsLayer)
/// 3. Request timeout (tower-http TimeoutLayer)
/// 4. Session auth on /api (cookie), access guard on pages
pub fn build_router(state: AppState) -> Router {
    use crate::routes;

    // Health check (public, no auth)
    let health_routes = Router::new().route("/health", get(routes::health::health_check));

    // Login is the only public API endpoint
    let public_api = Router::new().route("/auth/login", post(routes::auth::login));

    // Everything else under /api requires a valid session cookie
    let session_api = Router::new()
        .route("/auth/me", get(routes::auth::me))
        .route(
            "/tasks",
            get(routes::tasks::list_tasks).post(routes::tasks::create_task),
        )
        .route(
            "/tasks/:id",
            put(routes::tasks::update_task).delete(routes::tasks::delete_task),
        )
        .route("/users", get(routes::users::list_users))
        .route("/users/create", post(routes::users::create_user))
        .route(
            "/users/:id",
            put(routes::users::update_user).delete(routes::users::delete_user),
        )
        .route("/reports/global", get(routes::reports::global_report))
        .route("/reports/user/:id", get(routes::reports::user_report))
        .layer(axum::middleware::from_fn_with_state(
            state.clone(),
            middleware::auth::session_auth_layer,
        ));

    let api_routes = public_api.merge(session_api);

    // Page shells behind the access guard
    let page_routes = Router::new()
        .route("/", get(routes::pages::dashboard_page))
        .route("/login", get(routes::pages::login_page))
        .route("/dashboard", get(routes::pages::dashboard_page))
        .route("/dashboard/*rest", get(routes::pages::dashboard_section))
        .layer(axum::middleware::from_fn_with_state(
            state.clone(),
            middleware::access_guard::access_guard_layer,
        ));

    let timeout = Duration::from_secs(state.config.api.request_timeout_seconds);

    Router::new()
        .merge(health_routes)
        .merge(page_routes)
        .nest("/api", api_routes)
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(DefaultMakeSpan::new().level(Level::INFO))
                .on_response(DefaultOnResponse::new().level(Level::INFO)),
        )
        .layer(CorsLayer::permissive())
        .layer(TimeoutLayer::new(timeout))
        .with_state(state)
}
