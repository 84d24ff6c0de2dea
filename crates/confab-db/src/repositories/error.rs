//! Database error mapping

use confab_core::DomainError;

/// Map a sqlx error onto the domain error taxonomy
pub(crate) fn map_db_error(err: sqlx::Error) -> DomainError {
    if let sqlx::Error::Database(db_err) = &err {
        if db_err.is_unique_violation() {
            return DomainError::AlreadyExists(
                db_err.constraint().unwrap_or("row").to_string(),
            );
        }
    }

    DomainError::storage(err)
}
