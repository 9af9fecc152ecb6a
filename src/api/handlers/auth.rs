//! Handlers for account and session endpoints.

use axum::{Extension, Json, extract::State, http::StatusCode};
use serde_json::json;
use validator::Validate;

use crate::api::dto::auth::{
    AuthResponse, ClaimLinksRequest, ClaimLinksResponse, LoginRequest, RefreshRequest,
    RefreshResponse, RegisterRequest,
};
use crate::application::services::LoginIdentifier;
use crate::domain::entities::Session;
use crate::error::AppError;
use crate::state::AppState;

/// Registers a user and signs them in.
///
/// # Endpoint
///
/// `POST /api/auth/register`
///
/// # Request Body
///
/// ```json
/// { "username": "alice", "email": "alice@x.com", "password": "secret1" }
/// ```
///
/// # Errors
///
/// - 400 if the body fails validation (password shorter than 6, bad email)
/// - 409 `username_taken` if the username exists
/// - 409 `conflict` if the email is already registered
pub async fn register_handler(
    State(state): State<AppState>,
    Json(payload): Json<RegisterRequest>,
) -> Result<(StatusCode, Json<AuthResponse>), AppError> {
    payload.validate()?;

    let user = state
        .auth_service
        .register(&payload.username, &payload.email, &payload.password)
        .await?;

    let tokens = state.token_service.issue_pair(user.id, &user.username)?;

    Ok((
        StatusCode::CREATED,
        Json(AuthResponse::new(user, tokens, "Registration successful")),
    ))
}

/// Authenticates with email or username (per deployment) and password.
///
/// # Endpoint
///
/// `POST /api/auth/login`
///
/// # Errors
///
/// - 400 if the configured identifier field is missing
/// - 401 `invalid_credentials` for an unknown account or a wrong password
pub async fn login_handler(
    State(state): State<AppState>,
    Json(payload): Json<LoginRequest>,
) -> Result<Json<AuthResponse>, AppError> {
    payload.validate()?;

    let login_identifier = state.auth_service.login_identifier();
    let identifier = match login_identifier {
        LoginIdentifier::Email => payload.email,
        LoginIdentifier::Username => payload.username,
    }
    .filter(|value| !value.trim().is_empty())
    .ok_or_else(|| {
        AppError::bad_request(
            format!("Field '{login_identifier}' is required"),
            json!({ "field": login_identifier.as_str() }),
        )
    })?;

    let user = state
        .auth_service
        .authenticate(&identifier, &payload.password)
        .await?;

    let tokens = state.token_service.issue_pair(user.id, &user.username)?;

    Ok(Json(AuthResponse::new(user, tokens, "Login successful")))
}

/// Exchanges a refresh token for a new token pair.
///
/// # Endpoint
///
/// `POST /api/auth/refresh`
///
/// The presented refresh token stays valid until it expires.
///
/// # Errors
///
/// - 401 `invalid_token` if the refresh token does not verify or is an access token
pub async fn refresh_handler(
    State(state): State<AppState>,
    Json(payload): Json<RefreshRequest>,
) -> Result<Json<RefreshResponse>, AppError> {
    payload.validate()?;

    let tokens = state.token_service.refresh(&payload.refresh_token)?;

    Ok(Json(RefreshResponse {
        access_token: tokens.access_token,
        refresh_token: tokens.refresh_token,
        message: "Token refreshed successfully".to_string(),
    }))
}

/// Moves the caller's anonymous links to their account.
///
/// # Endpoint
///
/// `POST /api/auth/claim-links` (bearer token required)
///
/// # Response
///
/// ```json
/// { "message": "Links claimed successfully", "user_id": 1, "claimed": 3 }
/// ```
///
/// Claiming a token twice succeeds with `claimed: 0`.
pub async fn claim_links_handler(
    State(state): State<AppState>,
    Extension(session): Extension<Session>,
    Json(payload): Json<ClaimLinksRequest>,
) -> Result<Json<ClaimLinksResponse>, AppError> {
    payload.validate()?;

    let claimed = state
        .link_service
        .claim_links(session.user_id, &payload.anonymous_id)
        .await?;

    Ok(Json(ClaimLinksResponse {
        message: "Links claimed successfully".to_string(),
        user_id: session.user_id,
        claimed,
    }))
}
