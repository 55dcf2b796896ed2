//! User read operations
//!
//! This module provides the row shape shared by every backend and the
//! common interface for reading users back.

use async_trait::async_trait;
use chrono::{DateTime, Utc};

use crate::error::{AppError, AppResult};
use crate::models::User;

/// Table holding user rows
pub const USERS_TABLE: &str = "users";

/// Columns returned for every user read, in row order
pub const USER_COLUMNS: &str = "id, first_name, last_name, email, age, created";

/// A `users` row as both backends decode it
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct UserRow {
    pub id: String,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub age: i32,
    pub created: Option<DateTime<Utc>>,
}

impl UserRow {
    pub fn into_user(self) -> AppResult<User> {
        let age = u32::try_from(self.age).map_err(|_| {
            AppError::Database(format!(
                "Stored age {} for user {} is negative",
                self.age, self.id
            ))
        })?;

        Ok(User {
            id: self.id,
            first_name: self.first_name,
            last_name: self.last_name,
            age,
            email: self.email,
            created: self.created,
        })
    }
}

/// Convert an age to the `INTEGER` column type.
pub fn storage_age(age: u32) -> AppResult<i32> {
    i32::try_from(age)
        .map_err(|_| AppError::Validation("age is out of range for storage".to_string()))
}

/// Trait for user read operations
#[async_trait]
pub trait UserReader: Send + Sync {
    /// Find a user by ID
    async fn find_user_by_id(&self, id: &str) -> AppResult<Option<User>>;
}

/// Unified user read operations
///
/// This struct provides a unified interface for user read operations
/// that can work with any database backend implementation.
pub struct UnifiedUserReadOps<T: UserReader> {
    reader: T,
}

impl<T: UserReader> UnifiedUserReadOps<T> {
    pub fn new(reader: T) -> Self {
        Self { reader }
    }

    /// Find a user by ID
    pub async fn find_user_by_id(&self, id: &str) -> AppResult<Option<User>> {
        self.reader.find_user_by_id(id).await
    }
}
