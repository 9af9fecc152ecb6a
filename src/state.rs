//! Shared application state injected into handlers and middleware.

use std::sync::Arc;

use tokio::sync::mpsc;

use crate::application::services::{AuthService, LinkService, LoginIdentifier, TokenService};
use crate::domain::click_event::ClickEvent;
use crate::domain::repositories::{LinkRepository, UserRepository};

/// Application state shared across all HTTP handlers.
///
/// Services sit behind `Arc` and are generic over trait objects, so the same
/// state type serves PostgreSQL in production and in-memory stores in tests.
#[derive(Clone)]
pub struct AppState {
    pub link_service: Arc<LinkService<dyn LinkRepository>>,
    pub auth_service: Arc<AuthService<dyn UserRepository>>,
    pub token_service: Arc<TokenService>,
    /// Public prefix of generated short URLs.
    pub base_url: String,
}

impl AppState {
    pub fn new(
        link_repository: Arc<dyn LinkRepository>,
        user_repository: Arc<dyn UserRepository>,
        token_service: TokenService,
        click_sender: mpsc::Sender<ClickEvent>,
        login_identifier: LoginIdentifier,
        base_url: impl Into<String>,
    ) -> Self {
        Self {
            link_service: Arc::new(LinkService::new(link_repository, click_sender)),
            auth_service: Arc::new(AuthService::new(user_repository, login_identifier)),
            token_service: Arc::new(token_service),
            base_url: base_url.into(),
        }
    }
}
