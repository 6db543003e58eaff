/// User model and database operations
///
/// # Schema
///
/// ```sql
/// CREATE TYPE user_role AS ENUM ('admin', 'employee');
///
/// CREATE TABLE users (
///     id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
///     username VARCHAR(100) NOT NULL UNIQUE,
///     email VARCHAR(255) NOT NULL UNIQUE,
///     password_hash VARCHAR(255) NOT NULL,
///     name VARCHAR(255) NOT NULL,
///     role user_role NOT NULL DEFAULT 'employee',
///     created_at TIMESTAMPTZ NOT NULL DEFAULT NOW()
/// );
/// ```
///
/// # Example
///
/// ```no_run
/// use taskboard_shared::models::user::{User, CreateUser, Role};
/// use taskboard_shared::db::pool::{create_pool, DatabaseConfig};
///
/// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let pool = create_pool(DatabaseConfig::default()).await?;
///
/// let user = User::create(&pool, CreateUser {
///     username: "maria".to_string(),
///     email: "maria@example.com".to_string(),
///     password_hash: "$argon2id$...".to_string(),
///     name: "María García".to_string(),
///     role: Role::Employee,
/// }).await?;
///
/// println!("Created user: {}", user.id);
/// # Ok(())
/// # }
/// ```

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::{PgExecutor, PgPool};
use uuid::Uuid;

/// User role, the single source of authorization scope
///
/// Guarded boundaries call [`Role::can_manage`] instead of comparing
/// strings per route.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "user_role", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum Role {
    /// Full access: user management, any task, reports
    Admin,

    /// Sees and moves only tasks assigned to them
    Employee,
}

impl Role {
    /// Role as stored in the database
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Admin => "admin",
            Role::Employee => "employee",
        }
    }

    /// Display label for rendered output
    pub fn label(&self) -> &'static str {
        match self {
            Role::Admin => "Administrator",
            Role::Employee => "Employee",
        }
    }

    /// Whether this role may manage users, delete tasks, and pull reports
    pub fn can_manage(&self) -> bool {
        matches!(self, Role::Admin)
    }

    /// Whether this role sees every task rather than only assigned ones
    pub fn sees_all_tasks(&self) -> bool {
        matches!(self, Role::Admin)
    }
}

/// User model representing an account
///
/// The password is stored as an Argon2id hash, never plaintext, and never
/// serialized into API responses ([`UserSummary`] is the client-facing view).
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct User {
    /// Unique user ID (UUID v4, generated server-side)
    pub id: Uuid,

    /// Login name, unique across all users
    pub username: String,

    /// Email address, unique across all users
    pub email: String,

    /// Argon2id password hash
    pub password_hash: String,

    /// Display name
    pub name: String,

    /// Authorization role
    pub role: Role,

    /// When the account was created (immutable)
    pub created_at: DateTime<Utc>,
}

/// Client-facing view of a user, without the password hash
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct UserSummary {
    pub id: Uuid,
    pub username: String,
    pub email: String,
    pub name: String,
    pub role: Role,
    pub created_at: DateTime<Utc>,
}

impl From<User> for UserSummary {
    fn from(user: User) -> Self {
        Self {
            id: user.id,
            username: user.username,
            email: user.email,
            name: user.name,
            role: user.role,
            created_at: user.created_at,
        }
    }
}

/// Input for creating a new user
#[derive(Debug, Clone)]
pub struct CreateUser {
    pub username: String,
    pub email: String,

    /// Argon2id hash (NOT the plaintext password)
    pub password_hash: String,

    pub name: String,
    pub role: Role,
}

/// Input for updating an existing user
///
/// Only non-None fields are written. An omitted `password_hash` leaves the
/// stored hash untouched.
#[derive(Debug, Clone, Default)]
pub struct UpdateUser {
    pub username: Option<String>,
    pub email: Option<String>,
    pub name: Option<String>,
    pub role: Option<Role>,
    pub password_hash: Option<String>,
}

impl UpdateUser {
    /// True when the update would write nothing
    pub fn is_empty(&self) -> bool {
        self.username.is_none()
            && self.email.is_none()
            && self.name.is_none()
            && self.role.is_none()
            && self.password_hash.is_none()
    }
}

impl User {
    /// Creates a new user
    ///
    /// The caller is expected to have checked for duplicates first (see
    /// [`User::username_or_email_exists`]); the unique constraints are the
    /// backstop.
    ///
    /// # Errors
    ///
    /// Returns an error on unique constraint violation or connection failure.
    pub async fn create(
        executor: impl PgExecutor<'_>,
        data: CreateUser,
    ) -> Result<Self, sqlx::Error> {
        let user = sqlx::query_as::<_, User>(
            r#"
            INSERT INTO users (username, email, password_hash, name, role)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING id, username, email, password_hash, name, role, created_at
            "#,
        )
        .bind(data.username)
        .bind(data.email)
        .bind(data.password_hash)
        .bind(data.name)
        .bind(data.role)
        .fetch_one(executor)
        .await?;

        Ok(user)
    }

    /// Finds a user by ID
    pub async fn find_by_id(
        executor: impl PgExecutor<'_>,
        id: Uuid,
    ) -> Result<Option<Self>, sqlx::Error> {
        let user = sqlx::query_as::<_, User>(
            r#"
            SELECT id, username, email, password_hash, name, role, created_at
            FROM users
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(executor)
        .await?;

        Ok(user)
    }

    /// Finds a user by login name
    pub async fn find_by_username(
        pool: &PgPool,
        username: &str,
    ) -> Result<Option<Self>, sqlx::Error> {
        let user = sqlx::query_as::<_, User>(
            r#"
            SELECT id, username, email, password_hash, name, role, created_at
            FROM users
            WHERE username = $1
            "#,
        )
        .bind(username)
        .fetch_optional(pool)
        .await?;

        Ok(user)
    }

    /// Checks whether a username or email is already taken
    ///
    /// `exclude` skips one user id, so updates don't conflict with the row
    /// being updated.
    pub async fn username_or_email_exists(
        executor: impl PgExecutor<'_>,
        username: &str,
        email: &str,
        exclude: Option<Uuid>,
    ) -> Result<bool, sqlx::Error> {
        let (count,): (i64,) = sqlx::query_as(
            r#"
            SELECT COUNT(*) FROM users
            WHERE (username = $1 OR email = $2) AND ($3::uuid IS NULL OR id != $3)
            "#,
        )
        .bind(username)
        .bind(email)
        .bind(exclude)
        .fetch_one(executor)
        .await?;

        Ok(count > 0)
    }

    /// Lists all users without password hashes, in insertion order
    pub async fn list_summaries(pool: &PgPool) -> Result<Vec<UserSummary>, sqlx::Error> {
        let users = sqlx::query_as::<_, UserSummary>(
            r#"
            SELECT id, username, email, name, role, created_at
            FROM users
            ORDER BY created_at ASC
            "#,
        )
        .fetch_all(pool)
        .await?;

        Ok(users)
    }

    /// Updates a user
    ///
    /// Only non-None fields in `data` are written. Returns `None` when the
    /// id does not exist.
    ///
    /// # Errors
    ///
    /// Returns an error if the new username or email collides with another
    /// user (unique constraint) or on connection failure.
    pub async fn update(
        executor: impl PgExecutor<'_>,
        id: Uuid,
        data: UpdateUser,
    ) -> Result<Option<Self>, sqlx::Error> {
        if data.is_empty() {
            return Self::find_by_id(executor, id).await;
        }

        // Build the SET clause from whichever fields are present
        let mut query = String::from("UPDATE users SET id = id");
        let mut bind_count = 1;

        if data.username.is_some() {
            bind_count += 1;
            query.push_str(&format!(", username = ${}", bind_count));
        }
        if data.email.is_some() {
            bind_count += 1;
            query.push_str(&format!(", email = ${}", bind_count));
        }
        if data.name.is_some() {
            bind_count += 1;
            query.push_str(&format!(", name = ${}", bind_count));
        }
        if data.role.is_some() {
            bind_count += 1;
            query.push_str(&format!(", role = ${}", bind_count));
        }
        if data.password_hash.is_some() {
            bind_count += 1;
            query.push_str(&format!(", password_hash = ${}", bind_count));
        }

        query.push_str(
            " WHERE id = $1 RETURNING id, username, email, password_hash, name, role, created_at",
        );

        let mut q = sqlx::query_as::<_, User>(&query).bind(id);

        if let Some(username) = data.username {
            q = q.bind(username);
        }
        if let Some(email) = data.email {
            q = q.bind(email);
        }
        if let Some(name) = data.name {
            q = q.bind(name);
        }
        if let Some(role) = data.role {
            q = q.bind(role);
        }
        if let Some(password_hash) = data.password_hash {
            q = q.bind(password_hash);
        }

        let user = q.fetch_optional(executor).await?;

        Ok(user)
    }

    /// Deletes a user by ID
    ///
    /// Returns true if a row was removed, false if the id did not exist.
    /// Fails while tasks still reference the user (restrict policy); callers
    /// check [`crate::models::task::Task::count_referencing_user`] first to
    /// report that case cleanly.
    pub async fn delete(pool: &PgPool, id: Uuid) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM users WHERE id = $1")
            .bind(id)
            .execute(pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_role_capabilities() {
        assert!(Role::Admin.can_manage());
        assert!(Role::Admin.sees_all_tasks());
        assert!(!Role::Employee.can_manage());
        assert!(!Role::Employee.sees_all_tasks());
    }

    #[test]
    fn test_role_serde() {
        assert_eq!(serde_json::to_string(&Role::Admin).unwrap(), "\"admin\"");
        assert_eq!(
            serde_json::from_str::<Role>("\"employee\"").unwrap(),
            Role::Employee
        );
        assert!(serde_json::from_str::<Role>("\"manager\"").is_err());
    }

    #[test]
    fn test_summary_drops_hash() {
        let user = User {
            id: Uuid::new_v4(),
            username: "maria".to_string(),
            email: "maria@example.com".to_string(),
            password_hash: "$argon2id$secret".to_string(),
            name: "María".to_string(),
            role: Role::Employee,
            created_at: Utc::now(),
        };

        let summary = UserSummary::from(user);
        let json = serde_json::to_string(&summary).unwrap();
        assert!(!json.contains("argon2id"));
        assert!(!json.contains("password"));
        assert!(json.contains("maria@example.com"));
    }

    #[test]
    fn test_update_user_is_empty() {
        assert!(UpdateUser::default().is_empty());
        assert!(!UpdateUser {
            name: Some("New Name".to_string()),
            ..Default::default()
        }
        .is_empty());
    }
}
