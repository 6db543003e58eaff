/// Database layer
///
/// - [`pool`]: PostgreSQL connection pool built on sqlx
/// - [`migrations`]: embedded migration runner

pub mod migrations;
pub mod pool;
