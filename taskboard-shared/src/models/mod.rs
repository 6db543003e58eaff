/// Database models for Taskboard
///
/// # Models
///
/// - `user`: User accounts with roles (admin / employee)
/// - `task`: Kanban tasks with status, priority, creator, and assignee
///
/// Each model owns its CRUD operations as inherent async methods taking a
/// `&PgPool`. Every operation is a single statement against the underlying
/// table unless noted otherwise.

pub mod task;
pub mod user;
