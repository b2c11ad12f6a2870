//! Error handling utilities for repositories

use reactions_core::error::DomainError;
use reactions_core::value_objects::Id;
use sqlx::Error as SqlxError;

/// Convert SQLx error to DomainError
pub fn map_db_error(e: SqlxError) -> DomainError {
    DomainError::DatabaseError(e.to_string())
}

/// Check for unique violation and return appropriate error or fallback
pub fn map_unique_violation<F>(e: SqlxError, on_unique: F) -> DomainError
where
    F: FnOnce() -> DomainError,
{
    if let Some(db_err) = e.as_database_error() {
        if db_err.is_unique_violation() {
            return on_unique();
        }
    }
    DomainError::DatabaseError(e.to_string())
}

/// Create a "reaction kind not found" error
pub fn kind_not_found(id: Id) -> DomainError {
    DomainError::KindNotFound(id)
}


/// Create a "reaction changed concurrently" error
pub fn reaction_conflict(post_id: Id, user_id: Id) -> DomainError {
    DomainError::ReactionConflict { post_id, user_id }
}
