use crate::backend::database::user_read::USERS_TABLE;
use crate::error::{AppError, AppResult};
use sqlx::SqlitePool;

/// Create the users table for SQLite if it does not exist yet
///
/// `created` is stored as RFC 3339 text in UTC so it decodes the same way as
/// PostgreSQL's `TIMESTAMP WITH TIME ZONE`.
pub async fn init_schema(pool: &SqlitePool) -> AppResult<()> {
    let users_sql = format!(
        r#"
        CREATE TABLE IF NOT EXISTS {} (
            id TEXT PRIMARY KEY,
            first_name TEXT NOT NULL,
            last_name TEXT NOT NULL,
            age INTEGER NOT NULL,
            email TEXT UNIQUE NOT NULL,
            created TEXT DEFAULT (strftime('%Y-%m-%dT%H:%M:%fZ', 'now'))
        )
        "#,
        USERS_TABLE
    );

    sqlx::query(&users_sql)
        .execute(pool)
        .await
        .map_err(|e| AppError::Database(format!("Failed to create users table: {}", e)))?;

    Ok(())
}
