//! Short code allocation with bounded collision retry.

use std::sync::Arc;

use tracing::warn;

use crate::domain::entities::{Link, LinkOwner, NewLink};
use crate::domain::repositories::LinkRepository;
use crate::error::AppError;
use crate::utils::code_generator::generate_code;

/// Maximum number of codes tried for a single link.
pub const MAX_ATTEMPTS: usize = 5;

/// Allocates a fresh short code and persists a link under it.
///
/// The lookup before each insert only saves wasted inserts. Uniqueness is
/// decided by the store: an insert that hits the `short_code` unique
/// constraint counts as a collision and the next candidate is tried.
pub struct CodeAllocator<L: LinkRepository + ?Sized> {
    link_repository: Arc<L>,
    max_attempts: usize,
}

impl<L: LinkRepository + ?Sized> CodeAllocator<L> {
    pub fn new(link_repository: Arc<L>) -> Self {
        Self {
            link_repository,
            max_attempts: MAX_ATTEMPTS,
        }
    }

    /// Stores a new link for `original_url` owned by `owner` under a unique code.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::AllocationExhausted`] if every attempt collided.
    /// Returns [`AppError::StoreFailure`] on database errors (not retried).
    pub async fn allocate(&self, original_url: &str, owner: &LinkOwner) -> Result<Link, AppError> {
        for attempt in 1..=self.max_attempts {
            let code = generate_code();

            if self.link_repository.find_by_code(&code).await?.is_some() {
                warn!(attempt, "Short code already in use, retrying");
                continue;
            }

            let new_link = NewLink {
                short_code: code,
                original_url: original_url.to_string(),
                owner: owner.clone(),
            };

            match self.link_repository.create(new_link).await? {
                Some(link) => return Ok(link),
                None => warn!(attempt, "Short code taken concurrently, retrying"),
            }
        }

        Err(AppError::allocation_exhausted(self.max_attempts))
    }
}
