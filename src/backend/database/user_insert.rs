use async_trait::async_trait;
use uuid::Uuid;

use super::user_read::storage_age;
use crate::error::AppResult;
use crate::models::User;

/// Prepared user data for database insertion
#[derive(Debug, Clone, PartialEq)]
pub struct PreparedUserData {
    pub id: String,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub age: i32,
}

/// Database-specific adapter for user INSERT operations
#[async_trait]
pub trait UserInserter: Send + Sync {
    /// Execute user insert and return the stored row
    async fn execute_user_insert(&self, data: PreparedUserData) -> AppResult<User>;
}

/// Shared business logic for user INSERT operations
pub struct UserInsertProcessor;

impl UserInsertProcessor {
    /// Prepare user data for database insertion
    ///
    /// Always mints a new ID; any `id` on the input is ignored. The input is
    /// not modified.
    pub fn prepare_user_for_insert(user: &User) -> AppResult<PreparedUserData> {
        Ok(PreparedUserData {
            id: Uuid::new_v4().to_string(),
            first_name: user.first_name.clone(),
            last_name: user.last_name.clone(),
            email: user.email.clone(),
            age: storage_age(user.age)?,
        })
    }
}

/// Unified user INSERT operations using the adapter pattern
pub struct UnifiedUserInsertOps<T: UserInserter> {
    inserter: T,
}

impl<T: UserInserter> UnifiedUserInsertOps<T> {
    pub fn new(inserter: T) -> Self {
        Self { inserter }
    }

    /// Create a new user using shared logic and database-specific execution
    pub async fn create_user(&self, user: &User) -> AppResult<User> {
        let prepared_data = UserInsertProcessor::prepare_user_for_insert(user)?;
        self.inserter.execute_user_insert(prepared_data).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_prepare_user_for_insert_mints_fresh_id() {
        let mut user = User::new("Ada", "Lovelace", 36, "ada@example.com");
        user.id = "client-supplied".to_string();

        let prepared = UserInsertProcessor::prepare_user_for_insert(&user).unwrap();

        assert_ne!(prepared.id, "client-supplied");
        assert!(Uuid::parse_str(&prepared.id).is_ok());
        assert_eq!(prepared.first_name, "Ada");
        assert_eq!(prepared.last_name, "Lovelace");
        assert_eq!(prepared.email, "ada@example.com");
        assert_eq!(prepared.age, 36);

        // Caller's value is untouched
        assert_eq!(user.id, "client-supplied");
    }

    #[test]
    fn test_prepared_ids_are_distinct() {
        let user = User::new("Ada", "Lovelace", 36, "ada@example.com");
        let first = UserInsertProcessor::prepare_user_for_insert(&user).unwrap();
        let second = UserInsertProcessor::prepare_user_for_insert(&user).unwrap();
        assert_ne!(first.id, second.id);
    }

    #[test]
    fn test_age_beyond_column_range_rejected() {
        let user = User::new("Ada", "Lovelace", u32::MAX, "ada@example.com");
        assert!(UserInsertProcessor::prepare_user_for_insert(&user).is_err());
    }
}
