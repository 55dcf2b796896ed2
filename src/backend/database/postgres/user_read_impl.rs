use async_trait::async_trait;
use sqlx::PgPool;
use std::sync::Arc;
use tracing::debug;

use super::super::pool::PoolMetrics;
use super::super::user_read::{UserReader, UserRow, USERS_TABLE, USER_COLUMNS};
use crate::error::{map_database_error, AppResult};
use crate::models::User;

/// PostgreSQL-specific implementation of UserReader
pub struct PostgresUserReader {
    pool: PgPool,
    metrics: Arc<PoolMetrics>,
}

impl PostgresUserReader {
    pub fn new(pool: PgPool, metrics: Arc<PoolMetrics>) -> Self {
        Self { pool, metrics }
    }
}

#[async_trait]
impl UserReader for PostgresUserReader {
    async fn find_user_by_id(&self, id: &str) -> AppResult<Option<User>> {
        let sql = format!("SELECT {} FROM {} WHERE id = $1", USER_COLUMNS, USERS_TABLE);
        debug!(sql = %sql, id = %id, "executing user lookup");

        let mut conn = self
            .metrics
            .acquire(&self.pool)
            .await
            .map_err(|e| map_database_error(e, "fetch user"))?;

        let row: Option<UserRow> = sqlx::query_as(&sql)
            .bind(id)
            .fetch_optional(&mut *conn)
            .await
            .map_err(|e| map_database_error(e, "fetch user"))?;

        row.map(UserRow::into_user).transpose()
    }
}
