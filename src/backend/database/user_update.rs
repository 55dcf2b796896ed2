use async_trait::async_trait;

use super::user_read::{storage_age, USERS_TABLE, USER_COLUMNS};
use crate::error::AppResult;
use crate::models::{User, UserUpdate};

/// Positional parameter syntax of the target database
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Placeholder {
    /// `$1`, `$2`, ... (PostgreSQL)
    Dollar,
    /// `?1`, `?2`, ... (SQLite)
    Question,
}

impl Placeholder {
    pub fn at(&self, position: usize) -> String {
        match self {
            Placeholder::Dollar => format!("${}", position),
            Placeholder::Question => format!("?{}", position),
        }
    }
}

/// A value bound into one `SET` assignment
#[derive(Debug, Clone, PartialEq)]
pub enum UpdateValue {
    Text(String),
    Integer(i32),
}

/// Ordered `UPDATE ... SET` builder for a partial user update
///
/// Only present fields become assignments, always in the order
/// first_name, last_name, age, email. The `id` column is never assigned.
#[derive(Debug, Clone, PartialEq)]
pub struct UpdateStatement {
    assignments: Vec<(&'static str, UpdateValue)>,
}

impl UpdateStatement {
    /// Collect the present fields of `update`.
    ///
    /// Returns `None` when nothing is present, since `SET` with no
    /// assignments is not valid SQL.
    pub fn from_update(update: &UserUpdate) -> AppResult<Option<Self>> {
        let mut assignments = Vec::new();

        if let Some(first_name) = &update.first_name {
            assignments.push(("first_name", UpdateValue::Text(first_name.clone())));
        }
        if let Some(last_name) = &update.last_name {
            assignments.push(("last_name", UpdateValue::Text(last_name.clone())));
        }
        if let Some(age) = update.age {
            assignments.push(("age", UpdateValue::Integer(storage_age(age)?)));
        }
        if let Some(email) = &update.email {
            assignments.push(("email", UpdateValue::Text(email.clone())));
        }

        if assignments.is_empty() {
            return Ok(None);
        }
        Ok(Some(Self { assignments }))
    }

    /// Assigned columns, in statement order
    pub fn columns(&self) -> Vec<&'static str> {
        self.assignments.iter().map(|(column, _)| *column).collect()
    }

    /// Values to bind, in statement order; the id is bound after these
    pub fn values(&self) -> impl Iterator<Item = &UpdateValue> {
        self.assignments.iter().map(|(_, value)| value)
    }

    /// Position of the `WHERE id = ...` parameter
    pub fn id_position(&self) -> usize {
        self.assignments.len() + 1
    }

    /// Render the parameterized statement, returning the updated row
    pub fn render(&self, placeholder: Placeholder) -> String {
        let set_clause = self
            .assignments
            .iter()
            .enumerate()
            .map(|(index, (column, _))| format!("{} = {}", column, placeholder.at(index + 1)))
            .collect::<Vec<_>>()
            .join(", ");

        format!(
            "UPDATE {} SET {} WHERE id = {} RETURNING {}",
            USERS_TABLE,
            set_clause,
            placeholder.at(self.id_position()),
            USER_COLUMNS
        )
    }
}

/// Common trait for user update operations across different database backends
#[async_trait]
pub trait UserUpdater: Send + Sync {
    /// Execute the update and return the post-update row, if one matched
    async fn execute_user_update(
        &self,
        id: &str,
        statement: UpdateStatement,
    ) -> AppResult<Option<User>>;
}

/// Unified user update operations handler
///
/// This provides a consistent interface for user update operations
/// while delegating to database-specific implementations.
pub struct UnifiedUserUpdateOps<T: UserUpdater> {
    updater: T,
}

impl<T: UserUpdater> UnifiedUserUpdateOps<T> {
    pub fn new(updater: T) -> Self {
        Self { updater }
    }

    /// Apply a non-empty update statement to the user with `id`
    pub async fn update_user(
        &self,
        id: &str,
        statement: UpdateStatement,
    ) -> AppResult<Option<User>> {
        self.updater.execute_user_update(id, statement).await
    }
}
