use crate::backend::database::user_read::USERS_TABLE;
use crate::error::{AppError, AppResult};
use sqlx::PgPool;

/// Create the users table for PostgreSQL if it does not exist yet
pub async fn init_schema(pool: &PgPool) -> AppResult<()> {
    let users_sql = format!(
        r#"
        CREATE TABLE IF NOT EXISTS {} (
            id TEXT PRIMARY KEY,
            first_name TEXT NOT NULL,
            last_name TEXT NOT NULL,
            age INTEGER NOT NULL,
            email TEXT UNIQUE NOT NULL,
            created TIMESTAMP WITH TIME ZONE DEFAULT NOW()
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

#[cfg(test)]
mod tests {
    use super::*;
    use sqlx::postgres::PgPoolOptions;

    #[tokio::test]
    async fn test_schema_creation() {
        // This test requires a running PostgreSQL instance
        // Skip if DATABASE_URL is not set
        let Ok(url) = std::env::var("DATABASE_URL") else {
            return;
        };

        let pool = PgPoolOptions::new()
            .max_connections(1)
            .connect(&url)
            .await
            .unwrap();

        init_schema(&pool).await.unwrap();
        // Second run is a no-op
        init_schema(&pool).await.unwrap();

        let count: (i64,) = sqlx::query_as(&format!("SELECT COUNT(*) FROM {}", USERS_TABLE))
            .fetch_one(&pool)
            .await
            .unwrap();
        assert!(count.0 >= 0);
    }
}
