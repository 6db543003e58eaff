/// API route handlers
///
/// This module contains all route handlers organized by resource:
///
/// - `health`: Health check endpoint
/// - `pages`: Server-rendered page shells guarded by the access guard
/// - `auth`: Authentication endpoints (login, session info)
/// - `tasks`: Task management endpoints
/// - `users`: User administration endpoints
/// - `reports`: PDF report endpoints

pub mod auth;
pub mod health;
pub mod pages;
pub mod reports;
pub mod tasks;
pub mod users;
