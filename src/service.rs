use std::sync::Arc;
use tracing::{error, info, warn};

use crate::backend::database::health::HEALTHY_MESSAGE;
use crate::backend::database::HealthReport;
use crate::backend::UserBackend;
use crate::config::{HealthConfig, HealthFailurePolicy};
use crate::error::{AppError, AppResult};
use crate::models::{User, UserUpdate};
use crate::schema::{validate_user, validate_user_update};

/// Data access service for users
///
/// One instance per process, shared through `Arc`. Input is validated here
/// so malformed values never reach the store.
pub struct UserService {
    backend: Arc<dyn UserBackend>,
    health: HealthConfig,
}

impl UserService {
    pub fn new(backend: Arc<dyn UserBackend>, health: HealthConfig) -> Self {
        Self { backend, health }
    }

    /// Probe the database and report pool statistics
    ///
    /// A `down` result is logged. Under `HealthFailurePolicy::Exit` the
    /// process then terminates with status 1.
    pub async fn health(&self) -> HealthReport {
        let report = self
            .backend
            .health_check(self.health.timeout(), &self.health.thresholds)
            .await;

        if report.is_up() {
            if let Some(message) = report.message.as_deref().filter(|m| *m != HEALTHY_MESSAGE) {
                warn!("{}", message);
            }
            return report;
        }

        let cause = report.error.as_deref().unwrap_or("db down");
        match self.health.on_failure {
            HealthFailurePolicy::Report => {
                error!("{}", cause);
                report
            }
            HealthFailurePolicy::Exit => {
                error!("{}, exiting", cause);
                std::process::exit(1);
            }
        }
    }

    /// Close the underlying pool
    pub async fn close(&self) {
        self.backend.close().await;
    }

    pub async fn init_schema(&self) -> AppResult<()> {
        self.backend.init_schema().await?;
        info!("Users schema is ready");
        Ok(())
    }

    /// Validate and insert `user`, returning the stored row
    pub async fn create_user(&self, user: &User) -> AppResult<User> {
        validate_user(user)?;
        self.backend.create_user(user).await
    }

    pub async fn get_user_by_id(&self, id: &str) -> AppResult<User> {
        self.backend
            .find_user_by_id(id)
            .await?
            .ok_or_else(|| not_found(id))
    }

    /// Validate the present fields of `update` and apply them to user `id`
    pub async fn update_user_by_id(&self, id: &str, update: &UserUpdate) -> AppResult<User> {
        validate_user_update(update)?;
        self.backend
            .update_user_by_id(id, update)
            .await?
            .ok_or_else(|| not_found(id))
    }
}

fn not_found(id: &str) -> AppError {
    AppError::NotFound(format!("user {} not found", id))
}
