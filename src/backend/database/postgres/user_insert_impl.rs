use async_trait::async_trait;
use sqlx::PgPool;
use std::sync::Arc;
use tracing::debug;

use super::super::pool::PoolMetrics;
use super::super::user_insert::{PreparedUserData, UserInserter};
use super::super::user_read::{UserRow, USERS_TABLE, USER_COLUMNS};
use crate::error::{map_database_error, AppResult};
use crate::models::User;

/// PostgreSQL-specific implementation of UserInserter
pub struct PostgresUserInserter {
    pool: PgPool,
    metrics: Arc<PoolMetrics>,
}

impl PostgresUserInserter {
    pub fn new(pool: PgPool, metrics: Arc<PoolMetrics>) -> Self {
        Self { pool, metrics }
    }
}

#[async_trait]
impl UserInserter for PostgresUserInserter {
    async fn execute_user_insert(&self, data: PreparedUserData) -> AppResult<User> {
        let sql = format!(
            "INSERT INTO {} (id, first_name, last_name, email, age) VALUES ($1, $2, $3, $4, $5) RETURNING {}",
            USERS_TABLE, USER_COLUMNS
        );
        debug!(
            sql = %sql,
            id = %data.id,
            first_name = %data.first_name,
            last_name = %data.last_name,
            email = %data.email,
            age = data.age,
            "executing user insert"
        );

        let mut conn = self
            .metrics
            .acquire(&self.pool)
            .await
            .map_err(|e| map_database_error(e, "create user"))?;

        let row: UserRow = sqlx::query_as(&sql)
            .bind(&data.id)
            .bind(&data.first_name)
            .bind(&data.last_name)
            .bind(&data.email)
            .bind(data.age)
            .fetch_one(&mut *conn)
            .await
            .map_err(|e| map_database_error(e, "create user"))?;

        row.into_user()
    }
}
