//! Database abstraction layer for the user store
//!
//! This module provides a unified interface for database operations across
//! different database backends (PostgreSQL, SQLite) while keeping the SQL
//! dialect differences in the backend-specific modules.
//!
//! # Architecture
//!
//! ```text
//! Common Logic (user_insert.rs, user_read.rs, user_update.rs, health.rs, pool.rs)
//!     ↓
//! Database-specific implementations
//!     ├── postgres/ (PostgreSQL-specific code)
//!     └── sqlite/   (SQLite-specific code)
//! ```

pub mod config;
pub mod health;
pub mod pool;
pub mod postgres;
pub mod sqlite;
pub mod user_insert;
pub mod user_read;
pub mod user_update;


// Re-export key types for convenience
pub use config::DatabaseBackendConfig;

pub use health::{HealthReport, HealthStatus, HealthThresholds, PoolStats};

pub use pool::PoolMetrics;

pub use user_insert::UnifiedUserInsertOps;

pub use user_read::UnifiedUserReadOps;

pub use user_update::{UnifiedUserUpdateOps, UpdateStatement};

pub use postgres::{PostgresUserInserter, PostgresUserReader, PostgresUserUpdater};
pub use sqlite::{SqliteUserInserter, SqliteUserReader, SqliteUserUpdater};
