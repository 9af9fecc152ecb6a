//! Top-level router configuration.
//!
//! # Route Structure
//!
//! - `GET  /{code}`              - Short link redirect (public)
//! - `GET  /health`              - Health check: database, click queue (public)
//! - `/api/auth/register|login|refresh`, `GET /api/urls/{code}` - public
//! - `POST /api/shorten`, `GET /api/urls` - bearer token optional
//! - `POST /api/auth/claim-links` - bearer token required
//!
//! # Middleware
//!
//! - **Tracing** - Structured request/response logging
//! - **Authentication** - JWT access token, required or optional per route
//!
//! Trailing-slash normalization wraps the router in [`crate::server::run`].

use crate::api;
use crate::api::handlers::{health_handler, redirect_handler};
use crate::api::middleware::{auth, tracing};
use crate::state::AppState;
use axum::routing::get;
use axum::{Router, middleware};

/// Constructs the application router with all routes and middleware.
pub fn app_router(state: AppState) -> Router {
    let protected = api::routes::protected_routes()
        .route_layer(middleware::from_fn_with_state(state.clone(), auth::require));

    let optional = api::routes::optional_auth_routes()
        .route_layer(middleware::from_fn_with_state(state.clone(), auth::optional));

    let api_router = Router::new()
        .merge(api::routes::public_routes())
        .merge(optional)
        .merge(protected);

    Router::new()
        .route("/health", get(health_handler))
        .route("/{code}", get(redirect_handler))
        .nest("/api", api_router)
        .with_state(state)
        .layer(tracing::layer())
}
