/// Request middleware
///
/// - `auth`: cookie session validation for `/api` routes
/// - `access_guard`: redirect/allow decisions for page routes

pub mod access_guard;
pub mod auth;
