use async_trait::async_trait;
use sqlx::PgPool;
use std::sync::Arc;
use tracing::debug;

use super::super::pool::PoolMetrics;
use super::super::user_read::UserRow;
use super::super::user_update::{Placeholder, UpdateStatement, UpdateValue, UserUpdater};
use crate::error::{map_database_error, AppResult};
use crate::models::User;

/// PostgreSQL-specific implementation of UserUpdater
///
/// Runs the update and reads the new row back with `RETURNING` in a single
/// statement.
pub struct PostgresUserUpdater {
    pool: PgPool,
    metrics: Arc<PoolMetrics>,
}

impl PostgresUserUpdater {
    pub fn new(pool: PgPool, metrics: Arc<PoolMetrics>) -> Self {
        Self { pool, metrics }
    }
}

#[async_trait]
impl UserUpdater for PostgresUserUpdater {
    async fn execute_user_update(
        &self,
        id: &str,
        statement: UpdateStatement,
    ) -> AppResult<Option<User>> {
        let sql = statement.render(Placeholder::Dollar);
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
