/// Task model and database operations
///
/// Tasks move through a kanban workflow. The workflow stages are ordered for
/// display, but any-to-any transitions are allowed (a reviewer can push a
/// task straight back to pending).
///
/// ```text
/// pending → in_progress → review → completed
/// ```
///
/// # Schema
///
/// ```sql
/// CREATE TYPE task_status AS ENUM ('pending', 'in_progress', 'review', 'completed');
/// CREATE TYPE task_priority AS ENUM ('low', 'medium', 'high');
///
/// CREATE TABLE tasks (
///     id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
///     title VARCHAR(255) NOT NULL,
///     description TEXT NOT NULL,
///     status task_status NOT NULL DEFAULT 'pending',
///     priority task_priority NOT NULL DEFAULT 'medium',
///     created_by UUID NOT NULL REFERENCES users(id) ON DELETE RESTRICT,
///     assigned_to UUID NOT NULL REFERENCES users(id) ON DELETE RESTRICT,
///     created_at TIMESTAMPTZ NOT NULL DEFAULT NOW()
/// );
/// ```
///
/// # Example
///
/// ```no_run
/// use taskboard_shared::models::task::{Task, CreateTask, TaskPriority, TaskStatus};
/// use taskboard_shared::db::pool::{create_pool, DatabaseConfig};
/// use uuid::Uuid;
///
/// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let pool = create_pool(DatabaseConfig::default()).await?;
///
/// let task = Task::create(&pool, CreateTask {
///     title: "Prepare the quarterly numbers".to_string(),
///     description: "Collect figures from every branch".to_string(),
///     created_by: Uuid::new_v4(),
///     assigned_to: Uuid::new_v4(),
///     priority: TaskPriority::High,
///     status: TaskStatus::Pending,
/// }).await?;
///
/// // Drag-and-drop moves only the status column
/// Task::update_status(&pool, task.id, TaskStatus::InProgress).await?;
/// # Ok(())
/// # }
/// ```

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::PgPool;
use uuid::Uuid;

/// Kanban workflow stage
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "task_status", rename_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum TaskStatus {
    /// Not started yet
    Pending,

    /// Someone is working on it
    InProgress,

    /// Waiting for review
    Review,

    /// Done
    Completed,
}

impl TaskStatus {
    /// All stages in board order
    pub const ALL: [TaskStatus; 4] = [
        TaskStatus::Pending,
        TaskStatus::InProgress,
        TaskStatus::Review,
        TaskStatus::Completed,
    ];

    /// Status as stored in the database
    pub fn as_str(&self) -> &'static str {
        match self {
            TaskStatus::Pending => "pending",
            TaskStatus::InProgress => "in_progress",
            TaskStatus::Review => "review",
            TaskStatus::Completed => "completed",
        }
    }

    /// Display label for rendered output
    pub fn label(&self) -> &'static str {
        match self {
            TaskStatus::Pending => "Pending",
            TaskStatus::InProgress => "In Progress",
            TaskStatus::Review => "In Review",
            TaskStatus::Completed => "Completed",
        }
    }
}

impl Default for TaskStatus {
    fn default() -> Self {
        TaskStatus::Pending
    }
}

/// Task priority
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "task_priority", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum TaskPriority {
    Low,
    Medium,
    High,
}

impl TaskPriority {
    /// Display label for rendered output
    pub fn label(&self) -> &'static str {
        match self {
            TaskPriority::Low => "Low",
            TaskPriority::Medium => "Medium",
            TaskPriority::High => "High",
        }
    }
}

/// Task model
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct Task {
    /// Unique task ID
    pub id: Uuid,

    /// Short title
    pub title: String,

    /// Free-text description
    pub description: String,

    /// Current workflow stage
    pub status: TaskStatus,

    /// Priority
    pub priority: TaskPriority,

    /// User who created the task (from the verified caller, never client input)
    pub created_by: Uuid,

    /// User the task is assigned to; always exactly one assignee
    pub assigned_to: Uuid,

    /// When the task was created (immutable)
    pub created_at: DateTime<Utc>,
}

/// Task joined with creator and assignee display names, for listings
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct TaskWithNames {
    pub id: Uuid,
    pub title: String,
    pub description: String,
    pub status: TaskStatus,
    pub priority: TaskPriority,
    pub created_by: Uuid,
    pub assigned_to: Uuid,
    pub created_at: DateTime<Utc>,

    /// Display name of the creator
    pub creator_name: String,

    /// Display name of the assignee
    pub assignee_name: String,
}

/// Input for creating a new task
#[derive(Debug, Clone)]
pub struct CreateTask {
    pub title: String,
    pub description: String,
    pub created_by: Uuid,
    pub assigned_to: Uuid,
    pub priority: TaskPriority,
    pub status: TaskStatus,
}

/// Input for a full task update
///
/// Every field is overwritten. Status-only moves go through
/// [`Task::update_status`] instead.
#[derive(Debug, Clone)]
pub struct UpdateTask {
    pub title: String,
    pub description: String,
    pub assigned_to: Uuid,
    pub priority: TaskPriority,
    pub status: TaskStatus,
}

impl Task {
    /// Creates a new task
    ///
    /// # Errors
    ///
    /// Returns an error if `created_by` or `assigned_to` does not reference
    /// an existing user (foreign key), or on connection failure.
    pub async fn create(pool: &PgPool, data: CreateTask) -> Result<Self, sqlx::Error> {
        let task = sqlx::query_as::<_, Task>(
            r#"
            INSERT INTO tasks (title, description, status, priority, created_by, assigned_to)
            VALUES ($1, $2, $3, $4, $5, $6)
            RETURNING id, title, description, status, priority, created_by, assigned_to, created_at
            "#,
        )
        .bind(data.title)
        .bind(data.description)
        .bind(data.status)
        .bind(data.priority)
        .bind(data.created_by)
        .bind(data.assigned_to)
        .fetch_one(pool)
        .await?;

        Ok(task)
    }

    /// Finds a task by ID
    pub async fn find_by_id(pool: &PgPool, id: Uuid) -> Result<Option<Self>, sqlx::Error> {
        let task = sqlx::query_as::<_, Task>(
            r#"
            SELECT id, title, description, status, priority, created_by, assigned_to, created_at
            FROM tasks
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(pool)
        .await?;

        Ok(task)
    }

    /// Lists every task with creator and assignee names, in insertion order
    ///
    /// Admin view of the board.
    pub async fn list_all_with_names(pool: &PgPool) -> Result<Vec<TaskWithNames>, sqlx::Error> {
        let tasks = sqlx::query_as::<_, TaskWithNames>(
            r#"
            SELECT t.id, t.title, t.description, t.status, t.priority,
                   t.created_by, t.assigned_to, t.created_at,
                   c.name AS creator_name, a.name AS assignee_name
            FROM tasks t
            JOIN users c ON t.created_by = c.id
            JOIN users a ON t.assigned_to = a.id
            ORDER BY t.created_at ASC
            "#,
        )
        .fetch_all(pool)
        .await?;

        Ok(tasks)
    }

    /// Lists the tasks assigned to one user, in insertion order
    ///
    /// Employee view of the board; also feeds the per-user report.
    pub async fn list_assigned_with_names(
        pool: &PgPool,
        user_id: Uuid,
    ) -> Result<Vec<TaskWithNames>, sqlx::Error> {
        let tasks = sqlx::query_as::<_, TaskWithNames>(
            r#"
            SELECT t.id, t.title, t.description, t.status, t.priority,
                   t.created_by, t.assigned_to, t.created_at,
                   c.name AS creator_name, a.name AS assignee_name
            FROM tasks t
            JOIN users c ON t.created_by = c.id
            JOIN users a ON t.assigned_to = a.id
            WHERE t.assigned_to = $1
            ORDER BY t.created_at ASC
            "#,
        )
        .bind(user_id)
        .fetch_all(pool)
        .await?;

        Ok(tasks)
    }

    /// Overwrites every mutable field of a task
    ///
    /// Returns `None` when the id does not exist, so a missing task surfaces
    /// as not-found instead of a silent no-op.
    pub async fn update(
        pool: &PgPool,
        id: Uuid,
        data: UpdateTask,
    ) -> Result<Option<Self>, sqlx::Error> {
        let task = sqlx::query_as::<_, Task>(
            r#"
            UPDATE tasks
            SET title = $2, description = $3, assigned_to = $4, priority = $5, status = $6
            WHERE id = $1
            RETURNING id, title, description, status, priority, created_by, assigned_to, created_at
            "#,
        )
        .bind(id)
        .bind(data.title)
        .bind(data.description)
        .bind(data.assigned_to)
        .bind(data.priority)
        .bind(data.status)
        .fetch_optional(pool)
        .await?;

        Ok(task)
    }

    /// Writes only the status column (drag-and-drop move)
    ///
    /// Title, description, assignee, and priority are untouched. Returns
    /// `None` when the id does not exist.
    pub async fn update_status(
        pool: &PgPool,
        id: Uuid,
        status: TaskStatus,
    ) -> Result<Option<Self>, sqlx::Error> {
        let task = sqlx::query_as::<_, Task>(
            r#"
            UPDATE tasks
            SET status = $2
            WHERE id = $1
            RETURNING id, title, description, status, priority, created_by, assigned_to, created_at
            "#,
        )
        .bind(id)
        .bind(status)
        .fetch_optional(pool)
        .await?;

        Ok(task)
    }

    /// Deletes a task by ID
    ///
    /// Returns true if a row was removed. The admin-only rule is enforced by
    /// the route layer, not here.
    pub async fn delete(pool: &PgPool, id: Uuid) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM tasks WHERE id = $1")
            .bind(id)
            .execute(pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }

    /// Counts tasks that reference a user as creator or assignee
    ///
    /// Used by the restrict-on-delete policy for users.
    pub async fn count_referencing_user(pool: &PgPool, user_id: Uuid) -> Result<i64, sqlx::Error> {
        let (count,): (i64,) = sqlx::query_as(
            "SELECT COUNT(*) FROM tasks WHERE created_by = $1 OR assigned_to = $1",
        )
        .bind(user_id)
        .fetch_one(pool)
        .await?;

        Ok(count)
    }
}
