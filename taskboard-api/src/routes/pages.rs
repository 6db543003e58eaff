/// Page shells served behind the access guard
///
/// The client application renders the actual UI; these handlers only return
/// the HTML shell for each guarded route so the access guard has concrete
/// page paths to protect. The guard middleware runs before any of them and
/// performs the redirects, so by the time a handler executes the request is
/// already allowed.
///
/// # Endpoints
///
/// - `GET /login` - Login page
/// - `GET /dashboard` - Dashboard home (any authenticated user)
/// - `GET /dashboard/*` - Dashboard sections, including `/dashboard/admin/*`
///   which the guard restricts to administrators

use axum::response::Html;

fn shell(title: &str) -> Html<String> {
    Html(format!(
        "<!DOCTYPE html>\n<html lang=\"en\">\n<head><meta charset=\"utf-8\"><title>{title} - TaskBoard</title></head>\n<body><div id=\"app\" data-page=\"{title}\"></div></body>\n</html>\n"
    ))
}

/// Login page
pub async fn login_page() -> Html<String> {
    shell("Login")
}

/// Dashboard home page
pub async fn dashboard_page() -> Html<String> {
    shell("Dashboard")
}

/// Nested dashboard sections, including the admin area
pub async fn dashboard_section() -> Html<String> {
    shell("Dashboard")
}
