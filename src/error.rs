use thiserror::Error;

/// Errors produced by the user store and its service layer.
///
/// Store-originating messages are carried verbatim; the variant only records
/// which broad class of failure occurred.
#[derive(Debug, Error)]
pub enum AppError {
    /// Malformed input rejected before any store access
    #[error("Validation error: {0}")]
    Validation(String),

    /// No row matched the requested identity
    #[error("Not found: {0}")]
    NotFound(String),

    /// The store rejected a write because of a uniqueness constraint
    #[error("Conflict: {0}")]
    Conflict(String),

    /// The store could not be reached in time, or the pool is closed
    #[error("Database unavailable: {0}")]
    Unavailable(String),

    #[error("Database error: {0}")]
    Database(String),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Configuration error: {0}")]
    Configuration(String),
}

impl AppError {
    /// True for errors the caller can fix by correcting its input.
    pub fn is_client_error(&self) -> bool {
        matches!(
            self,
            AppError::Validation(_) | AppError::NotFound(_) | AppError::Conflict(_)
        )
    }
}

pub type AppResult<T> = Result<T, AppError>;

/// Map a sqlx error to the matching `AppError` class.
///
/// `action` names what was being attempted, e.g. "create user".
pub fn map_database_error(error: sqlx::Error, action: &str) -> AppError {
    match error {
        sqlx::Error::Database(db_err) => {
            if db_err.is_unique_violation() {
                AppError::Conflict(db_err.message().to_string())
            } else {
                AppError::Database(format!("Failed to {}: {}", action, db_err.message()))
            }
        }
        sqlx::Error::PoolTimedOut | sqlx::Error::PoolClosed | sqlx::Error::Io(_) => {
            AppError::Unavailable(format!("Failed to {}: {}", action, error))
        }
        other => AppError::Database(format!("Failed to {}: {}", action, other)),
    }
}
