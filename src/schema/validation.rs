use crate::error::{AppError, AppResult};
use crate::models::{User, UserUpdate};
use lazy_static::lazy_static;
use regex::Regex;

lazy_static! {
    /// `local@domain.tld` shape. Syntactic filter only, not full RFC 5322.
    static ref EMAIL_REGEX: Regex =
        Regex::new(r"^[a-zA-Z0-9._%+-]+@[a-zA-Z0-9.-]+\.[a-zA-Z]{2,}$")
            .expect("email pattern is a valid regex");
}

/// Validates email format against the fixed `local@domain.tld` pattern
pub fn is_valid_email(email: &str) -> bool {
    EMAIL_REGEX.is_match(email)
}

fn require_first_name(first_name: &str) -> AppResult<()> {
    if first_name.is_empty() {
        return Err(AppError::Validation("first name is required".to_string()));
    }
    Ok(())
}

fn require_last_name(last_name: &str) -> AppResult<()> {
    if last_name.is_empty() {
        return Err(AppError::Validation("last name is required".to_string()));
    }
    Ok(())
}

fn require_email(email: &str) -> AppResult<()> {
    if !is_valid_email(email) {
        return Err(AppError::Validation("invalid email address".to_string()));
    }
    Ok(())
}

/// Validates a user before it is created.
///
/// Checks run in a fixed order (first name, last name, email) and the first
/// failure is returned. `age` is not checked, and email uniqueness is left to
/// the store.
pub fn validate_user(user: &User) -> AppResult<()> {
    require_first_name(&user.first_name)?;
    require_last_name(&user.last_name)?;
    require_email(&user.email)?;
    Ok(())
}

/// Validates only the fields present in a patch. Absent fields always pass.
pub fn validate_user_update(update: &UserUpdate) -> AppResult<()> {
    if let Some(first_name) = &update.first_name {
        require_first_name(first_name)?;
    }
    if let Some(last_name) = &update.last_name {
        require_last_name(last_name)?;
    }
    if let Some(email) = &update.email {
        require_email(email)?;
    }
    Ok(())
}
