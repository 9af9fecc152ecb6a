//! Helpers for classifying database errors.

/// Returns the violated constraint name if `e` is a unique violation.
///
/// Constraint names follow PostgreSQL's defaults for column-level `UNIQUE`
/// (`<table>_<column>_key`), e.g. `users_username_key` or `links_short_code_key`.
pub fn unique_violation_constraint(e: &sqlx::Error) -> Option<String> {
    let db_err = e.as_database_error()?;

    if !db_err.is_unique_violation() {
        return None;
    }

    Some(db_err.constraint().unwrap_or_default().to_string())
}
