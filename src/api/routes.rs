//! API route configuration.
//!
//! Routes are split by authentication requirement; [`crate::routes::app_router`]
//! attaches the matching middleware from [`crate::api::middleware::auth`].

use crate::api::handlers::{
    claim_links_handler, link_details_handler, list_links_handler, login_handler,
    refresh_handler, register_handler, shorten_handler,
};
use crate::state::AppState;
use axum::{
    Router,
    routing::{get, post},
};

/// Routes that need no identity.
///
/// # Endpoints
///
/// - `POST /auth/register`  - Create an account, returns a token pair
/// - `POST /auth/login`     - Sign in, returns a token pair
/// - `POST /auth/refresh`   - Exchange a refresh token for a new pair
/// - `GET  /urls/{code}`    - Link details
pub fn public_routes() -> Router<AppState> {
    Router::new()
        .route("/auth/register", post(register_handler))
        .route("/auth/login", post(login_handler))
        .route("/auth/refresh", post(refresh_handler))
        .route("/urls/{code}", get(link_details_handler))
}

/// Routes that behave differently for signed-in callers.
///
/// # Endpoints
///
/// - `POST /shorten` - Create a short link (user- or anonymously-owned)
/// - `GET  /urls`    - List the caller's links
pub fn optional_auth_routes() -> Router<AppState> {
    Router::new()
        .route("/shorten", post(shorten_handler))
        .route("/urls", get(list_links_handler))
}

/// Routes that require a valid access token.
///
/// # Endpoints
///
/// - `POST /auth/claim-links` - Move anonymous links to the caller's account
pub fn protected_routes() -> Router<AppState> {
    Router::new().route("/auth/claim-links", post(claim_links_handler))
}
