use std::sync::Arc;
use tracing::info;

use crate::backend::BackendFactory;
use crate::config::AppConfig;
use crate::error::AppResult;
use crate::service::UserService;

/// Open the connection pool and build the process-wide `UserService`
pub async fn connect_service(config: &AppConfig) -> AppResult<Arc<UserService>> {
    let backend_config = config.database.to_backend_config()?;

    info!(
        "Setting up {:?} backend for database {}",
        backend_config.database_type, backend_config.database_name
    );
    let backend = BackendFactory::create(&backend_config).await?;

    Ok(Arc::new(UserService::new(backend, config.health.clone())))
}

/// Connect and create the users table if it does not exist yet
pub async fn initialize_schema(config: &AppConfig) -> AppResult<Arc<UserService>> {
    let service = connect_service(config).await?;
    service.init_schema().await?;
    Ok(service)
}
