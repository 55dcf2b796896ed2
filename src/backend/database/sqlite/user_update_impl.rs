use async_trait::async_trait;
use sqlx::SqlitePool;
use std::sync::Arc;
use tracing::debug;

use super::super::pool::PoolMetrics;
use super::super::user_read::UserRow;
use super::super::user_update::{Placeholder, UpdateStatement, UpdateValue, UserUpdater};
use crate::error::{map_database_error, AppResult};
use crate::models::User;

/// SQLite-specific implementation of UserUpdater
pub struct SqliteUserUpdater {
    pool: SqlitePool,
    metrics: Arc<PoolMetrics>,
}

impl SqliteUserUpdater {
    pub fn new(pool: SqlitePool, metrics: Arc<PoolMetrics>) -> Self {
        Self { pool, metrics }
    }
}

#[async_trait]
impl UserUpdater for SqliteUserUpdater {
    async fn execute_user_update(
        &self,
        id: &str,
        statement: UpdateStatement,
    ) -> AppResult<Option<User>> {
        let sql = statement.render(Placeholder::Question);
        debug!(sql = %sql, id = %id, values = ?statement.values().collect::<Vec<_>>(), "executing user update");

        let mut query = sqlx::query_as::<_, UserRow>(&sql);
        for value in statement.values() {
            query = match value {
                UpdateValue::Text(text) => query.bind(text.clone()),
                UpdateValue::Integer(number) => query.bind(*number),
            };
        }

        let mut conn = self
            .metrics
            .acquire(&self.pool)
            .await
            .map_err(|e| map_database_error(e, "update user"))?;

        let row = query
            .bind(id)
            .fetch_optional(&mut *conn)
            .await
            .map_err(|e| map_database_error(e, "update user"))?;

        row.map(UserRow::into_user).transpose()
    }
}
