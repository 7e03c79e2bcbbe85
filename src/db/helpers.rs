//! Helpers that turn common query outcomes into `AppError`s.
//!
//! ```ignore
//! let athlete = require_record(queries.find_by_id(id).await, "Athlete not found")?;
//! ensure_not_exists(users.find_by_email(&email).await, "Unable to register with this email")?;
//! ```

use crate::error::{AppError, AppResult};

/// `Ok(None)` becomes `AppError::NotFound(not_found_message)`.
pub fn require_record<T>(
    result: Result<Option<T>, sqlx::Error>,
    not_found_message: &str,
) -> AppResult<T> {
    match result {
        Ok(Some(record)) => Ok(record),
        Ok(None) => Err(AppError::NotFound(not_found_message.to_string())),
        Err(e) => Err(AppError::Database(e)),
    }
}

/// `Ok(Some(_))` becomes `AppError::Conflict(conflict_message)`.
pub fn ensure_not_exists<T>(
    result: Result<Option<T>, sqlx::Error>,
    conflict_message: &str,
) -> AppResult<()> {
    match result {
        Ok(Some(_)) => Err(AppError::Conflict(conflict_message.to_string())),
        Ok(None) => Ok(()),
        Err(e) => Err(AppError::Database(e)),
    }
}
