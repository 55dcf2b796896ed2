use async_trait::async_trait;
use sqlx::PgPool;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, info};

use super::super::config::DatabaseBackendConfig;
use super::super::health::{run_probe, HealthReport, HealthThresholds};
use super::super::pool::PoolMetrics;
use super::super::user_update::UpdateStatement;
use crate::backend::database::{
    PostgresUserInserter, PostgresUserReader, PostgresUserUpdater, UnifiedUserInsertOps,
    UnifiedUserReadOps, UnifiedUserUpdateOps,
};
use crate::backend::{Backend, UserBackend};
use crate::error::{AppError, AppResult};
use crate::models::{User, UserUpdate};

/// PostgreSQL database backend implementation
pub struct PostgresBackend {
    pool: PgPool,
    metrics: Arc<PoolMetrics>,
    database_name: String,
    user_insert_ops: UnifiedUserInsertOps<PostgresUserInserter>,
    user_update_ops: UnifiedUserUpdateOps<PostgresUserUpdater>,
    user_read_ops: UnifiedUserReadOps<PostgresUserReader>,
}

impl PostgresBackend {
    /// Create a new PostgreSQL backend instance
    pub fn new(pool: PgPool, metrics: Arc<PoolMetrics>, database_name: String) -> Self {
        let user_inserter = PostgresUserInserter::new(pool.clone(), Arc::clone(&metrics));
        let user_updater = PostgresUserUpdater::new(pool.clone(), Arc::clone(&metrics));
        let user_reader = PostgresUserReader::new(pool.clone(), Arc::clone(&metrics));

        Self {
            pool,
            metrics,
            database_name,
            user_insert_ops: UnifiedUserInsertOps::new(user_inserter),
            user_update_ops: UnifiedUserUpdateOps::new(user_updater),
            user_read_ops: UnifiedUserReadOps::new(user_reader),
        }
    }
}

#[async_trait]
impl Backend for PostgresBackend {
    async fn connect(config: &DatabaseBackendConfig) -> AppResult<Self> {
        config
            .validate()
            .map_err(|e| AppError::Configuration(format!("Invalid backend config: {}", e)))?;

        let metrics = PoolMetrics::new();
        let pool = metrics
            .pool_options::<sqlx::Postgres>(config)
            .connect(&config.connection_url)
            .await
            .map_err(|e| AppError::Unavailable(format!("Failed to connect to PostgreSQL: {}", e)))?;

        info!(database = %config.database_name, "Connected to PostgreSQL");
        Ok(Self::new(pool, metrics, config.database_name.clone()))
    }

    async fn health_check(&self, timeout: Duration, thresholds: &HealthThresholds) -> HealthReport {
        if self.pool.is_closed() {
            return HealthReport::down("db down: connection pool is closed");
        }

        let probe = async {
            let mut conn = self.metrics.acquire(&self.pool).await?;
            sqlx::query("SELECT 1").execute(&mut *conn).await?;
            Ok::<_, sqlx::Error>(self.metrics.snapshot_holding_one(&self.pool))
        };

        match run_probe(probe, timeout).await {
            Ok(stats) => HealthReport::up(stats, thresholds),
            Err(error) => HealthReport::down(error),
        }
    }

    async fn init_schema(&self) -> AppResult<()> {
        super::schema::init_schema(&self.pool).await
    }

    async fn close(&self) {
        self.pool.close().await;
        info!("Disconnected from database: {}", self.database_name);
    }
}

#[async_trait]
impl UserBackend for PostgresBackend {
    async fn create_user(&self, user: &User) -> AppResult<User> {
        self.user_insert_ops.create_user(user).await
    }

    async fn find_user_by_id(&self, id: &str) -> AppResult<Option<User>> {
        self.user_read_ops.find_user_by_id(id).await
    }

    async fn update_user_by_id(&self, id: &str, update: &UserUpdate) -> AppResult<Option<User>> {
        match UpdateStatement::from_update(update)? {
            Some(statement) => self.user_update_ops.update_user(id, statement).await,
            None => {
                debug!(id = %id, "update has no fields, returning current row");
                self.user_read_ops.find_user_by_id(id).await
            }
        }
    }
}
