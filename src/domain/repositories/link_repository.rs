//! Repository trait for short link data access.

use crate::domain::entities::{Link, LinkOwner, NewLink};
use crate::error::AppError;
use async_trait::async_trait;

/// Repository interface for managing short links.
///
/// The store enforces uniqueness of `short_code`; application-level lookups
/// are only an optimization on top of that constraint.
///
/// # Implementations
///
/// - [`crate::infrastructure::persistence::PgLinkRepository`] - PostgreSQL implementation
/// - Test mocks available with `cfg(test)`
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait LinkRepository: Send + Sync {
    /// Inserts a new link with `clicks = 0`.
    ///
    /// # Returns
    ///
    /// - `Ok(Some(Link))` if the link was stored
    /// - `Ok(None)` if the short code is already taken
    ///
    /// # Errors
    ///
    /// Returns [`AppError::StoreFailure`] on database errors.
    async fn create(&self, new_link: NewLink) -> Result<Option<Link>, AppError>;

    /// Finds a link by its short code.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::StoreFailure`] on database errors.
    async fn find_by_code(&self, short_code: &str) -> Result<Option<Link>, AppError>;

    /// Lists links newest first, optionally restricted to one owner.
    ///
    /// `None` lists every link.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::StoreFailure`] on database errors.
    async fn list(&self, owner: Option<LinkOwner>) -> Result<Vec<Link>, AppError>;

    /// Atomically adds one to the click counter of a link.
    ///
    /// Returns the number of rows updated (0 if the code does not exist).
    ///
    /// # Errors
    ///
    /// Returns [`AppError::StoreFailure`] on database errors.
    async fn increment_clicks(&self, short_code: &str) -> Result<u64, AppError>;

    /// Moves every link held by `anonymous_id` and not yet owned by a user to
    /// `user_id`, clearing `anonymous_id`, in a single statement.
    ///
    /// Returns the number of links claimed.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::StoreFailure`] on database errors.
    async fn claim_anonymous(&self, user_id: i64, anonymous_id: &str) -> Result<u64, AppError>;

    /// Checks that the store is reachable.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::StoreFailure`] if the store cannot be queried.
    async fn health_check(&self) -> Result<(), AppError>;
}
