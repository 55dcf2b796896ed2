pub mod backend;
pub mod config;
pub mod error;
pub mod logging;
pub mod models;
pub mod schema;
pub mod service;
pub mod startup;

// Re-export commonly used types for easier access
pub use backend::database::{HealthReport, HealthStatus, PoolStats};
pub use config::AppConfig;
pub use error::{AppError, AppResult};
pub use models::{User, UserUpdate};
pub use service::UserService;
