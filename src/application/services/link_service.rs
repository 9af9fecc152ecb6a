//! Link creation, resolution, listing and ownership transfer.

use std::sync::Arc;

use serde_json::json;
use tokio::sync::mpsc;
use tracing::{info, warn};

use crate::application::services::CodeAllocator;
use crate::domain::click_event::ClickEvent;
use crate::domain::entities::{Link, LinkOwner};
use crate::domain::repositories::LinkRepository;
use crate::error::AppError;
use crate::utils::url_validator::validate_url;

/// Service managing links and their owners.
///
/// Links are created under either a user or an anonymous token. Resolving a
/// link queues a click for the background worker and never waits for it.
pub struct LinkService<L: LinkRepository + ?Sized> {
    link_repository: Arc<L>,
    allocator: CodeAllocator<L>,
    click_sender: mpsc::Sender<ClickEvent>,
}

impl<L: LinkRepository + ?Sized> LinkService<L> {
    /// Creates a new link service.
    ///
    /// # Arguments
    ///
    /// - `link_repository` - link storage
    /// - `click_sender` - bounded queue consumed by the click worker
    pub fn new(link_repository: Arc<L>, click_sender: mpsc::Sender<ClickEvent>) -> Self {
        Self {
            allocator: CodeAllocator::new(link_repository.clone()),
            link_repository,
            click_sender,
        }
    }

    /// Creates a short link owned by `owner`.
    ///
    /// The URL is stored exactly as given.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::InvalidUrl`] if the URL is not absolute with a host.
    /// Returns [`AppError::AllocationExhausted`] if no free code was found.
    /// Returns [`AppError::StoreFailure`] on database errors.
    pub async fn create_short_link(
        &self,
        original_url: &str,
        owner: LinkOwner,
    ) -> Result<Link, AppError> {
        validate_url(original_url).map_err(|e| {
            AppError::invalid_url("Invalid URL format", json!({ "reason": e.to_string() }))
        })?;

        let link = self.allocator.allocate(original_url, &owner).await?;

        info!(
            code = %link.short_code,
            user_id = ?link.user_id,
            anonymous = link.anonymous_id.is_some(),
            "Short link created"
        );

        Ok(link)
    }

    /// Resolves a short code to its link and queues a click.
    ///
    /// A full or closed click queue drops the click; the lookup still succeeds.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::NotFound`] if the code is unknown; no click is queued.
    /// Returns [`AppError::StoreFailure`] on database errors.
    pub async fn resolve(&self, code: &str) -> Result<Link, AppError> {
        let link = self.get_link(code).await?;

        if let Err(e) = self.click_sender.try_send(ClickEvent::new(code)) {
            warn!(code = %code, error = %e, "Click dropped");
        }

        Ok(link)
    }

    /// Retrieves a link without counting a click.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::NotFound`] if the code is unknown.
    /// Returns [`AppError::StoreFailure`] on database errors.
    pub async fn get_link(&self, code: &str) -> Result<Link, AppError> {
        self.link_repository
            .find_by_code(code)
            .await?
            .ok_or_else(|| AppError::not_found("Short URL not found", json!({ "code": code })))
    }

    /// Lists links newest first: all of them, or only those of one owner.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::StoreFailure`] on database errors.
    pub async fn list_links(&self, owner: Option<LinkOwner>) -> Result<Vec<Link>, AppError> {
        self.link_repository.list(owner).await
    }

    /// Transfers every unclaimed link of `anonymous_id` to `user_id`.
    ///
    /// Anyone presenting the anonymous token may claim its links. Claiming
    /// the same token again moves nothing and returns 0.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Validation`] if `anonymous_id` is blank.
    /// Returns [`AppError::StoreFailure`] on database errors.
    pub async fn claim_links(&self, user_id: i64, anonymous_id: &str) -> Result<u64, AppError> {
        if anonymous_id.trim().is_empty() {
            return Err(AppError::bad_request(
                "Anonymous ID is required",
                json!({ "field": "anonymous_id" }),
            ));
        }

        let claimed = self
            .link_repository
            .claim_anonymous(user_id, anonymous_id)
            .await?;

        info!(user_id, claimed, "Anonymous links claimed");

        Ok(claimed)
    }

    /// Checks that the link store is reachable.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::StoreFailure`] if the store cannot be queried.
    pub async fn health_check(&self) -> Result<(), AppError> {
        self.link_repository.health_check().await
    }

    /// Returns true while the click worker is still receiving events.
    pub fn click_queue_open(&self) -> bool {
        !self.click_sender.is_closed()
    }

    /// Free slots left in the click queue.
    pub fn click_queue_capacity(&self) -> usize {
        self.click_sender.capacity()
    }

    /// Builds the public short URL for a code.
    pub fn get_short_url(&self, base_url: &str, code: &str) -> String {
        format!("{}/{}", base_url.trim_end_matches('/'), code)
    }
}
