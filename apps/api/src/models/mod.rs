pub mod assessment;
pub mod cover_letter;
pub mod insight;
pub mod resume;
pub mod user;

use uuid::Uuid;

use crate::errors::AppError;

/// A row that belongs to exactly one user.
pub trait Owned {
    fn owner_id(&self) -> Uuid;
}

/// Returns the row only if it exists and belongs to `user_id`.
///
/// Missing and foreign rows produce the same `NotFound`, so callers cannot probe
/// for other users' ids.
pub fn require_owner<T: Owned>(row: Option<T>, user_id: Uuid, what: &str) -> Result<T, AppError> {
    match row {
        Some(row) if row.owner_id() == user_id => Ok(row),
        _ => Err(AppError::NotFound(format!(
            "{what} not found or you don't have permission to access it"
        ))),
    }
}
