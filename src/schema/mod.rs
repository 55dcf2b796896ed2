pub mod validation;

pub use validation::{is_valid_email, validate_user, validate_user_update};
