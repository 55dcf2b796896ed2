use crate::backend::database::{DatabaseBackendConfig, HealthReport, HealthThresholds};
use crate::error::AppResult;
use crate::models::{User, UserUpdate};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use std::time::Duration;

pub mod database;

/// Supported database backend types
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum DatabaseType {
    #[serde(rename = "postgresql", alias = "postgres")]
    PostgreSQL,
    #[serde(rename = "sqlite")]
    SQLite,
}

impl std::str::FromStr for DatabaseType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "postgresql" | "postgres" => Ok(DatabaseType::PostgreSQL),
            "sqlite" => Ok(DatabaseType::SQLite),
            other => Err(format!("Unsupported database type: {}", other)),
        }
    }
}

/// Core backend abstraction
///
/// Owns the connection pool. Every operation is a single statement on one
/// pooled connection; nothing here retries.
#[async_trait]
pub trait Backend: Send + Sync {
    /// Connect and initialize the storage backend
    async fn connect(config: &DatabaseBackendConfig) -> AppResult<Self>
    where
        Self: Sized;

    /// Probe connectivity within `timeout` and report pool statistics
    async fn health_check(&self, timeout: Duration, thresholds: &HealthThresholds) -> HealthReport;

    /// Create the users table if needed
    async fn init_schema(&self) -> AppResult<()>;

    /// Close the pool. Later operations fail as unavailable.
    async fn close(&self);
}

/// User-specific backend operations
#[async_trait]
pub trait UserBackend: Backend {
    /// Insert a new user under a freshly minted ID and return the stored row
    async fn create_user(&self, user: &User) -> AppResult<User>;

    /// Find a user by ID
    async fn find_user_by_id(&self, id: &str) -> AppResult<Option<User>>;

    /// Apply the present fields of `update` and return the new row.
    /// An update with no fields returns the current row unchanged.
    async fn update_user_by_id(&self, id: &str, update: &UserUpdate) -> AppResult<Option<User>>;
}

/// Factory for creating backend instances
pub struct BackendFactory;

impl BackendFactory {
    /// Create a backend based on configuration
    pub async fn create(config: &DatabaseBackendConfig) -> AppResult<Arc<dyn UserBackend>> {
        let backend = Self::create_backend(config).await?;
        Ok(Arc::from(backend))
    }

    /// Create a backend based on configuration (returns Box)
    pub async fn create_backend(config: &DatabaseBackendConfig) -> AppResult<Box<dyn UserBackend>> {
        match config.database_type {
            DatabaseType::PostgreSQL => {
                let backend =
                    crate::backend::database::postgres::PostgresBackend::connect(config).await?;
                Ok(Box::new(backend))
            }
            DatabaseType::SQLite => {
                let backend =
                    crate::backend::database::sqlite::SqliteBackend::connect(config).await?;
                Ok(Box::new(backend))
            }
        }
    }
}
