/// Access guard for page routes
///
/// Runs once per incoming page request, before any handler, and decides
/// between redirecting and allowing the request through. The guard is
/// stateless: it reads the `token` cookie, asks the credential verifier, and
/// treats any verification failure as "no valid token".
///
/// Decision table, evaluated in order:
///
/// | Condition                                     | Action                |
/// |-----------------------------------------------|-----------------------|
/// | `/` with a valid token                        | redirect `/dashboard` |
/// | `/` without a valid token                     | redirect `/login`     |
/// | `/login` with a valid token                   | redirect `/dashboard` |
/// | `/login` without a valid token                | allow                 |
/// | `/dashboard/admin*` without a valid token     | redirect `/login`     |
/// | `/dashboard/admin*` as non-admin              | redirect `/dashboard` |
/// | `/dashboard*` without a valid token           | redirect `/login`     |
/// | anything else                                 | allow                 |

use axum::{
    extract::{Request, State},
    middleware::Next,
    response::{IntoResponse, Redirect, Response},
};

use crate::app::AppState;
use crate::middleware::auth::token_from_headers;
use taskboard_shared::auth::jwt::{self, Claims};

/// Where the guard sends authenticated users
pub const DASHBOARD_HOME: &str = "/dashboard";

/// Where the guard sends unauthenticated users
pub const LOGIN_PAGE: &str = "/login";

const ADMIN_PREFIX: &str = "/dashboard/admin";
const DASHBOARD_PREFIX: &str = "/dashboard";

/// Guard decision for one request
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GuardDecision {
    /// Let the request through to its handler
    Allow,

    /// Redirect to the given location
    Redirect(&'static str),
}

/// Evaluates the decision table for a path and optional verified claims
///
/// Pure function so the table is testable without a router.
pub fn decide(path: &str, claims: Option<&Claims>) -> GuardDecision {
    match path {
        "/" => match claims {
            Some(_) => GuardDecision::Redirect(DASHBOARD_HOME),
            None => GuardDecision::Redirect(LOGIN_PAGE),
        },
        LOGIN_PAGE => match claims {
            Some(_) => GuardDecision::Redirect(DASHBOARD_HOME),
            None => GuardDecision::Allow,
        },
        p if p.starts_with(ADMIN_PREFIX) => match claims {
            None => GuardDecision::Redirect(LOGIN_PAGE),
            Some(c) if !c.role.can_manage() => GuardDecision::Redirect(DASHBOARD_HOME),
            Some(_) => GuardDecision::Allow,
        },
        p if p.starts_with(DASHBOARD_PREFIX) => match claims {
            None => GuardDecision::Redirect(LOGIN_PAGE),
            Some(_) => GuardDecision::Allow,
        },
        _ => GuardDecision::Allow,
    }
}

/// Access guard middleware layer for page routes
pub async fn access_guard_layer(
    State(state): State<AppState>,
    req: Request,
    next: Next,
) -> Response {
    // Any failure during extraction or verification counts as "no token"
    let claims = token_from_headers(req.headers())
        .and_then(|token| jwt::verify_token(&token, state.jwt_secret()).ok());

    match decide(req.uri().path(), claims.as_ref()) {
        GuardDecision::Allow => next.run(req).await,
        GuardDecision::Redirect(location) => Redirect::to(location).into_response(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use taskboard_shared::models::user::Role;
    use uuid::Uuid;

    fn claims(role: Role) -> Claims {
        Claims::new(Uuid::new_v4(), "someone".to_string(), role)
    }

    #[test]
    fn test_root_redirects_by_token() {
        assert_eq!(
            decide("/", Some(&claims(Role::Employee))),
            GuardDecision::Redirect(DASHBOARD_HOME)
        );
        assert_eq!(decide("/", None), GuardDecision::Redirect(LOGIN_PAGE));
    }

    #[test]
    fn test_login_allows_only_unauthenticated() {
        assert_eq!(
            decide("/login", Some(&claims(Role::Admin))),
            GuardDecision::Redirect(DASHBOARD_HOME)
        );
        assert_eq!(decide("/login", None), GuardDecision::Allow);
    }

    #[test]
    fn test_dashboard_requires_token() {
        assert_eq!(
            decide("/dashboard", None),
            GuardDecision::Redirect(LOGIN_PAGE)
        );
        assert_eq!(
            decide("/dashboard/tasks", None),
            GuardDecision::Redirect(LOGIN_PAGE)
        );
        assert_eq!(
            decide("/dashboard/tasks", Some(&claims(Role::Employee))),
            GuardDecision::Allow
        );
    }

    #[test]
    fn test_admin_section_requires_admin_role() {
        // Unauthenticated goes to login, never to the dashboard
        assert_eq!(
            decide("/dashboard/admin/users", None),
            GuardDecision::Redirect(LOGIN_PAGE)
        );

        // Authenticated non-admin goes to dashboard home, never to login
        assert_eq!(
            decide("/dashboard/admin/users", Some(&claims(Role::Employee))),
            GuardDecision::Redirect(DASHBOARD_HOME)
        );

        assert_eq!(
            decide("/dashboard/admin/users", Some(&claims(Role::Admin))),
            GuardDecision::Allow
        );
    }

    #[test]
    fn test_other_paths_are_allowed() {
        assert_eq!(decide("/favicon.ico", None), GuardDecision::Allow);
        assert_eq!(decide("/about", Some(&claims(Role::Employee))), GuardDecision::Allow);
    }
}
